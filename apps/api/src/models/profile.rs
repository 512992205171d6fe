use serde::{Deserialize, Serialize};

/// Candidate profile extracted from the résumé by the (external) profile
/// pipeline. Read-only here; immutable for the duration of one search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub name: String,
    pub title: String,
    pub skills: Vec<String>,
    pub experience_years: u32,
    pub location: String,
    pub languages: Vec<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

impl CandidateProfile {
    /// First `n` skills joined for display and prompt condensation.
    pub fn skills_summary(&self, n: usize) -> String {
        self.skills
            .iter()
            .take(n)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
