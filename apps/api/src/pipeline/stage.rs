//! Search pipeline stages, advanced strictly in order within a single
//! request. `Error` absorbs from any state except `Done`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    ProfileCheck,
    RegionCollect,
    Scoring,
    Enriching,
    Done,
    Error,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Error)
    }

    fn next(self) -> Stage {
        match self {
            Stage::Init => Stage::ProfileCheck,
            Stage::ProfileCheck => Stage::RegionCollect,
            Stage::RegionCollect => Stage::Scoring,
            Stage::Scoring => Stage::Enriching,
            Stage::Enriching => Stage::Done,
            Stage::Done => Stage::Done,
            Stage::Error => Stage::Error,
        }
    }
}

/// Tracks the current stage of one pipeline execution.
#[derive(Debug)]
pub struct StageTracker {
    current: Stage,
}

impl StageTracker {
    pub fn new() -> Self {
        Self {
            current: Stage::Init,
        }
    }

    pub fn current(&self) -> Stage {
        self.current
    }

    /// Moves to the next stage in order. Terminal stages stay put.
    pub fn advance(&mut self) -> Stage {
        self.current = self.current.next();
        self.current
    }

    /// Absorbing failure transition. A pipeline that already reached `Done`
    /// cannot fail retroactively.
    pub fn fail(&mut self) -> Stage {
        if self.current != Stage::Done {
            self.current = Stage::Error;
        }
        self.current
    }
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_through_stages_in_order() {
        let mut tracker = StageTracker::new();
        assert_eq!(tracker.current(), Stage::Init);
        assert_eq!(tracker.advance(), Stage::ProfileCheck);
        assert_eq!(tracker.advance(), Stage::RegionCollect);
        assert_eq!(tracker.advance(), Stage::Scoring);
        assert_eq!(tracker.advance(), Stage::Enriching);
        assert_eq!(tracker.advance(), Stage::Done);
        assert!(tracker.current().is_terminal());
        // Done is absorbing.
        assert_eq!(tracker.advance(), Stage::Done);
    }

    #[test]
    fn any_non_done_stage_can_fail() {
        for advances in 0..4 {
            let mut tracker = StageTracker::new();
            for _ in 0..advances {
                tracker.advance();
            }
            assert_eq!(tracker.fail(), Stage::Error);
            assert!(tracker.current().is_terminal());
            // Error is absorbing too.
            assert_eq!(tracker.advance(), Stage::Error);
        }
    }

    #[test]
    fn done_cannot_fail() {
        let mut tracker = StageTracker::new();
        for _ in 0..5 {
            tracker.advance();
        }
        assert_eq!(tracker.current(), Stage::Done);
        assert_eq!(tracker.fail(), Stage::Done);
    }
}
