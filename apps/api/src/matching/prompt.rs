//! Ranking prompt construction: condensed candidate profile, the full
//! posting pool, and preference hints as soft guidance.

use crate::models::job::JobPosting;
use crate::models::preferences::PreferenceSet;
use crate::models::profile::CandidateProfile;

/// Skills included in the condensed profile block.
const PROMPT_SKILLS: usize = 10;

/// Builds the single prompt sent to the scoring oracle. Preferences are
/// rendered as guidance, never as filters; the oracle is told to only
/// reduce scores for divergence.
pub fn build_ranking_prompt(
    profile: &CandidateProfile,
    pool: &[JobPosting],
    preferences: Option<&PreferenceSet>,
) -> String {
    let jobs_text = pool
        .iter()
        .map(|job| {
            format!(
                "- {} @ {} ({}): {}",
                job.title, job.company, job.location, job.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let pref_text = preferences
        .filter(|prefs| !prefs.is_empty())
        .map(|prefs| {
            format!(
                "\nPREFERENCIAS DO USUARIO:\n{}\n",
                prefs.hint_lines().join("\n")
            )
        })
        .unwrap_or_default();

    format!(
        r#"Voce eh um especialista em recrutamento. Analise TODAS estas vagas e selecione as MELHORES para este candidato:

CANDIDATO:
- Nome: {name}
- Cargo Atual: {title}
- Experiencia: {experience} anos
- Skills: {skills}
- Localizacao: {location}
- Idiomas: {languages}
- LinkedIn: {linkedin}

VAGAS DISPONIVEIS:
{jobs_text}
{pref_text}
Para CADA vaga, calcule:
1. Match de skills (0-100)
2. Match de experiencia (0-100)
3. Relevancia da localizacao (0-100)
4. Score final (media dos 3)

Use as preferencias como ORIENTACAO (nao filtro absoluto). Se divergir, apenas reduza levemente o score.

Retorne um JSON com as TOP 5 vagas, ordenadas por score decrescente:
[
    {{
        "title": "titulo",
        "company": "empresa",
        "score": 85,
        "reason": "Por que eh um bom match (1-2 frases)"
    }},
    ...
]

IMPORTANTE:
- Retorne APENAS o JSON, sem texto adicional
- Ordene por score descendente
- Minimo 5 vagas, maximo 10
"#,
        name = profile.name,
        title = profile.title,
        experience = profile.experience_years,
        skills = profile.skills_summary(PROMPT_SKILLS),
        location = profile.location,
        languages = profile.languages.join(", "),
        linkedin = profile.linkedin.as_deref().unwrap_or("-"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::preferences::WorkMode;

    fn sample_profile() -> CandidateProfile {
        CandidateProfile {
            name: "Ana Silva".into(),
            title: "Backend Developer".into(),
            skills: vec!["Python".into(), "Rust".into()],
            experience_years: 6,
            location: "Sao Paulo, BR".into(),
            languages: vec!["portugues".into(), "ingles".into()],
            ..CandidateProfile::default()
        }
    }

    fn sample_pool() -> Vec<JobPosting> {
        vec![JobPosting {
            title: "Dev Python".into(),
            company: "Nubank".into(),
            location: "Sao Paulo, BR".into(),
            url: None,
            description: "APIs REST".into(),
            posted: "2 dias".into(),
        }]
    }

    #[test]
    fn prompt_lists_every_posting() {
        let prompt = build_ranking_prompt(&sample_profile(), &sample_pool(), None);
        assert!(prompt.contains("- Dev Python @ Nubank (Sao Paulo, BR): APIs REST"));
        assert!(prompt.contains("Ana Silva"));
        assert!(prompt.contains("Python, Rust"));
        assert!(!prompt.contains("PREFERENCIAS DO USUARIO"));
    }

    #[test]
    fn prompt_includes_preference_hints_when_present() {
        let prefs = PreferenceSet {
            work_modes: vec![WorkMode::Remoto],
            ..PreferenceSet::default()
        };
        let prompt = build_ranking_prompt(&sample_profile(), &sample_pool(), Some(&prefs));
        assert!(prompt.contains("PREFERENCIAS DO USUARIO"));
        assert!(prompt.contains("- Modalidade: remoto"));
    }

    #[test]
    fn empty_preference_set_adds_no_hint_block() {
        let prefs = PreferenceSet::default();
        let prompt = build_ranking_prompt(&sample_profile(), &sample_pool(), Some(&prefs));
        assert!(!prompt.contains("PREFERENCIAS DO USUARIO"));
    }
}
