//! Keyword suggestion — pure function over the candidate profile.

use crate::models::profile::CandidateProfile;

pub const MAX_KEYWORDS: usize = 15;

/// Up to 15 normalized search keywords: title words longer than two
/// characters first (slashes treated as separators), then skills.
/// Lowercased, de-duplicated, insertion order preserved.
pub fn suggest_keywords(profile: &CandidateProfile) -> Vec<String> {
    let title = profile.title.replace('/', " ");
    let candidates = title
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .map(str::to_string)
        .chain(profile.skills.iter().cloned());

    let mut keywords: Vec<String> = Vec::new();
    for raw in candidates {
        let token = raw.trim().to_lowercase();
        if token.is_empty() || keywords.contains(&token) {
            continue;
        }
        keywords.push(token);
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
    }
    keywords
}
