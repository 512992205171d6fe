//! Job catalog — the externally supplied posting pool, partitioned by
//! region. Ships with a built-in sample pool; an operator can override it
//! by dropping a `jobs_catalog.json` into the data directory.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::models::job::JobPosting;

#[derive(Debug, Clone, Deserialize)]
pub struct JobCatalog {
    br: Vec<JobPosting>,
    int: Vec<JobPosting>,
}

impl JobCatalog {
    /// Loads `jobs_catalog.json` from the data directory when present,
    /// otherwise falls back to the built-in sample pool.
    pub fn load_or_default(data_dir: &Path) -> Self {
        let path = data_dir.join("jobs_catalog.json");
        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<JobCatalog>(&raw) {
                Ok(catalog) => {
                    info!(
                        "loaded job catalog from {} ({} BR, {} INT)",
                        path.display(),
                        catalog.br.len(),
                        catalog.int.len()
                    );
                    catalog
                }
                Err(err) => {
                    warn!("invalid job catalog at {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn br(&self) -> &[JobPosting] {
        &self.br
    }

    pub fn int(&self) -> &[JobPosting] {
        &self.int
    }
}

fn posting(
    title: &str,
    company: &str,
    location: &str,
    url: &str,
    description: &str,
    posted: &str,
) -> JobPosting {
    JobPosting {
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        url: Some(url.to_string()),
        description: description.to_string(),
        posted: posted.to_string(),
    }
}

impl Default for JobCatalog {
    fn default() -> Self {
        Self {
            br: vec![
                posting(
                    "Desenvolvedor Python Senior",
                    "Nubank",
                    "Sao Paulo, BR",
                    "https://jobs.nubank.com.br/python-senior",
                    "Procuramos desenvolvedor Python com 5+ anos. Experiencia em APIs REST, Flask/Django. Salario: R$15-20k",
                    "2 dias",
                ),
                posting(
                    "Full Stack Developer (Node.js + React)",
                    "Stone Co",
                    "Sao Paulo, BR",
                    "https://jobs.stone.co/fullstack",
                    "Node.js, React, PostgreSQL. Remoto. Beneficios: vale refeicao, vale saude, flex.",
                    "1 semana",
                ),
                posting(
                    "Senior Frontend Engineer",
                    "Creditas",
                    "Sao Paulo, BR",
                    "https://jobs.creditas.com/frontend",
                    "React, TypeScript, 7+ anos. Trabalhe em produtos de impacto. R$18-25k",
                    "3 dias",
                ),
                posting(
                    "Backend Developer (Java/Spring)",
                    "BTG Pactual",
                    "Sao Paulo, BR",
                    "https://jobs.btgpactual.com/java",
                    "Java, Spring Boot, microservices. Fintech. 4+ anos experiencia.",
                    "5 dias",
                ),
                posting(
                    "DevOps Engineer",
                    "Rappi",
                    "Sao Paulo, BR",
                    "https://jobs.rappi.com/devops",
                    "Docker, Kubernetes, AWS. 3+ anos. Remoto, full-time.",
                    "1 semana",
                ),
            ],
            int: vec![
                posting(
                    "Senior Software Engineer",
                    "Google",
                    "Mountain View, USA",
                    "https://careers.google.com/senior-engineer",
                    "Full-stack engineer. Python/Go. 5+ years. Competitive salary + equity.",
                    "2 dias",
                ),
                posting(
                    "Backend Engineer (Python)",
                    "Stripe",
                    "San Francisco, USA",
                    "https://stripe.com/jobs/backend-python",
                    "Python, PostgreSQL, APIs. Remoto. $200k-250k USD + equity",
                    "3 dias",
                ),
                posting(
                    "Full Stack Developer",
                    "Airbnb",
                    "Remote, Worldwide",
                    "https://airbnb.com/careers/fullstack",
                    "React, Node.js, Python. 3+ years. Great benefits, remote.",
                    "4 dias",
                ),
                posting(
                    "Frontend Engineer (React)",
                    "Meta",
                    "London, UK",
                    "https://meta.com/jobs/frontend",
                    "React, TypeScript. 4+ years. Hybrid. GBP 140k-180k",
                    "1 dia",
                ),
                posting(
                    "DevOps / Infrastructure Engineer",
                    "AWS",
                    "Remote (LATAM)",
                    "https://aws.amazon.com/careers/devops",
                    "Kubernetes, Terraform, CI/CD. 3+ years. Remote for LATAM.",
                    "5 dias",
                ),
            ],
        }
    }
}
