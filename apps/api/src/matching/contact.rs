//! Application-contact inference. Pure string work, no I/O, no failure mode.

/// Derives an application email for a posting from its company name and
/// optional URL. The URL's authority (leading `www.` stripped) wins; without
/// a usable URL the domain is synthesized from the company name.
pub fn infer_apply_email(company: &str, url: Option<&str>) -> String {
    let domain = url
        .and_then(authority_of)
        .unwrap_or_else(|| synthesize_domain(company));
    format!("talentos@{domain}")
}

fn authority_of(url: &str) -> Option<String> {
    let rest = url.split_once("//")?.1;
    let host = rest.split(['/', '?', '#']).next()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

fn synthesize_domain(company: &str) -> String {
    let compact: String = company.to_lowercase().split_whitespace().collect();
    if compact.is_empty() {
        "empresa.com".to_string()
    } else {
        format!("{compact}.com")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_url_authority() {
        assert_eq!(
            infer_apply_email("Acme Co", Some("https://jobs.acme.com/x")),
            "talentos@jobs.acme.com"
        );
    }

    #[test]
    fn strips_leading_www() {
        assert_eq!(
            infer_apply_email("Acme Co", Some("https://www.acme.com/jobs")),
            "talentos@acme.com"
        );
    }

    #[test]
    fn synthesizes_domain_without_url() {
        assert_eq!(infer_apply_email("Acme Co", None), "talentos@acmeco.com");
    }

    #[test]
    fn unparseable_url_falls_back_to_company() {
        assert_eq!(
            infer_apply_email("Stone Co", Some("not-a-url")),
            "talentos@stoneco.com"
        );
        assert_eq!(
            infer_apply_email("Stone Co", Some("https:///")),
            "talentos@stoneco.com"
        );
    }

    #[test]
    fn empty_company_still_yields_contact() {
        assert_eq!(infer_apply_email("", None), "talentos@empresa.com");
        assert_eq!(infer_apply_email("   ", None), "talentos@empresa.com");
    }
}
