//! Search preferences. Every field is advisory: preferences bias the
//! ranking prompt but never remove a posting from consideration, so an
//! over-constrained set cannot collapse the result list to zero.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Estagio,
    Trainee,
    Junior,
    Pleno,
    Senior,
    Lead,
}

impl ExperienceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Estagio => "estagio",
            ExperienceLevel::Trainee => "trainee",
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::Pleno => "pleno",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    Remoto,
    Hibrido,
    Presencial,
}

impl WorkMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkMode::Remoto => "remoto",
            WorkMode::Hibrido => "hibrido",
            WorkMode::Presencial => "presencial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanySize {
    Startup,
    Pequena,
    Media,
    Grande,
}

impl CompanySize {
    pub fn as_str(self) -> &'static str {
        match self {
            CompanySize::Startup => "startup",
            CompanySize::Pequena => "pequena",
            CompanySize::Media => "media",
            CompanySize::Grande => "grande",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Clt,
    Pj,
    Freela,
    Estagio,
}

impl ContractType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContractType::Clt => "clt",
            ContractType::Pj => "pj",
            ContractType::Freela => "freela",
            ContractType::Estagio => "estagio",
        }
    }
}

/// Soft signals handed to the ranking oracle. All optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceSet {
    pub keywords: Vec<String>,
    pub required_keywords: Vec<String>,
    pub experience_levels: Vec<ExperienceLevel>,
    pub work_modes: Vec<WorkMode>,
    pub company_sizes: Vec<CompanySize>,
    pub contract_types: Vec<ContractType>,
    pub education_level: Option<String>,
    pub sectors: Vec<String>,
    pub accept_travel: Option<bool>,
    pub location_city: Option<String>,
    pub location_radius_km: Option<f64>,
}

impl PreferenceSet {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Decodes the URL-safe preference bundle (base64-encoded JSON) sent by
    /// the UI as the `config` query parameter. Any decode failure yields
    /// `None`: preferences are advisory, so a bad bundle is ignored rather
    /// than failing the search.
    pub fn decode_bundle(encoded: &str) -> Option<Self> {
        let bytes = BASE64_STANDARD
            .decode(encoded.trim())
            .map_err(|err| debug!("ignoring preference bundle, bad base64: {err}"))
            .ok()?;
        serde_json::from_slice(&bytes)
            .map_err(|err| debug!("ignoring preference bundle, bad JSON: {err}"))
            .ok()
    }

    /// Human-readable hint lines, shared by the progress narration and the
    /// ranking prompt. Empty fields produce no line.
    pub fn hint_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.keywords.is_empty() {
            lines.push(format!("- Keywords: {}", self.keywords.join(", ")));
        }
        if !self.required_keywords.is_empty() {
            lines.push(format!(
                "- Palavras importantes: {}",
                self.required_keywords.join(", ")
            ));
        }
        if !self.experience_levels.is_empty() {
            lines.push(format!(
                "- Nivel experiencia: {}",
                join_labels(self.experience_levels.iter().map(|v| v.as_str()))
            ));
        }
        if !self.work_modes.is_empty() {
            lines.push(format!(
                "- Modalidade: {}",
                join_labels(self.work_modes.iter().map(|v| v.as_str()))
            ));
        }
        if !self.company_sizes.is_empty() {
            lines.push(format!(
                "- Tamanho empresa: {}",
                join_labels(self.company_sizes.iter().map(|v| v.as_str()))
            ));
        }
        if !self.contract_types.is_empty() {
            lines.push(format!(
                "- Tipo contrato: {}",
                join_labels(self.contract_types.iter().map(|v| v.as_str()))
            ));
        }
        if !self.sectors.is_empty() {
            lines.push(format!("- Setores: {}", self.sectors.join(", ")));
        }
        if let Some(level) = &self.education_level {
            lines.push(format!("- Educacao: {level}"));
        }
        if let Some(travel) = self.accept_travel {
            let label = if travel { "aceita" } else { "nao aceita" };
            lines.push(format!("- Viagens: {label}"));
        }
        if let Some(city) = &self.location_city {
            lines.push(format!("- Cidade base: {city}"));
        }
        if let Some(radius) = self.location_radius_km {
            lines.push(format!("- Raio: {radius} km"));
        }
        lines
    }
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_bundle_roundtrip() {
        let prefs = PreferenceSet {
            keywords: vec!["rust".into(), "backend".into()],
            experience_levels: vec![ExperienceLevel::Pleno, ExperienceLevel::Senior],
            work_modes: vec![WorkMode::Remoto],
            accept_travel: Some(false),
            ..PreferenceSet::default()
        };
        let encoded = BASE64_STANDARD.encode(serde_json::to_vec(&prefs).unwrap());
        assert_eq!(PreferenceSet::decode_bundle(&encoded), Some(prefs));
    }

    #[test]
    fn decode_bundle_rejects_bad_base64() {
        assert_eq!(PreferenceSet::decode_bundle("%%% not base64 %%%"), None);
    }

    #[test]
    fn decode_bundle_rejects_bad_json() {
        let encoded = BASE64_STANDARD.encode(b"{\"experience_levels\": [\"diretor\"]}");
        assert_eq!(PreferenceSet::decode_bundle(&encoded), None);
    }

    #[test]
    fn empty_set_produces_no_hints() {
        let prefs = PreferenceSet::default();
        assert!(prefs.is_empty());
        assert!(prefs.hint_lines().is_empty());
    }

    #[test]
    fn hint_lines_cover_set_fields() {
        let prefs = PreferenceSet {
            keywords: vec!["python".into()],
            contract_types: vec![ContractType::Clt, ContractType::Pj],
            location_city: Some("Sao Paulo".into()),
            location_radius_km: Some(50.0),
            accept_travel: Some(true),
            ..PreferenceSet::default()
        };
        let lines = prefs.hint_lines();
        assert_eq!(
            lines,
            vec![
                "- Keywords: python",
                "- Tipo contrato: clt, pj",
                "- Viagens: aceita",
                "- Cidade base: Sao Paulo",
                "- Raio: 50 km",
            ]
        );
    }
}
