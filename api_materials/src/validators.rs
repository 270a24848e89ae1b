use common::error::{AppError, Res};
use url::Url;

/// Validates that a lesson's video URL points at an allow-listed domain.
/// Subdomains of an allowed domain pass; lookalike domains
/// ("evil-youtube.com") do not.
pub fn validate_video_url(value: &str, allowed_domains: &[String]) -> Res<()> {
    let parsed = Url::parse(value)
        .map_err(|_| AppError::BadRequest("Invalid video URL".to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::BadRequest(
            "Video URL must be an http(s) link".to_string(),
        ));
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| AppError::BadRequest("Invalid video URL".to_string()))?;

    let allowed = allowed_domains
        .iter()
        .any(|domain| host == domain || host.ends_with(&format!(".{}", domain)));
    if !allowed {
        return Err(AppError::BadRequest(format!(
            "Only links on {} are allowed",
            allowed_domains.join(", ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["youtube.com".to_string()]
    }

    #[test]
    fn accepts_allowed_domain_and_subdomains() {
        assert!(validate_video_url("https://youtube.com/watch?v=abc", &allowed()).is_ok());
        assert!(validate_video_url("https://www.youtube.com/watch?v=abc", &allowed()).is_ok());
    }

    #[test]
    fn rejects_foreign_domain() {
        let err = validate_video_url("https://vimeo.com/12345", &allowed()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn rejects_lookalike_domain() {
        assert!(validate_video_url("https://evil-youtube.com/x", &allowed()).is_err());
        assert!(validate_video_url("https://youtube.com.evil.org/x", &allowed()).is_err());
    }

    #[test]
    fn rejects_garbage_and_non_http_schemes() {
        assert!(validate_video_url("not a url", &allowed()).is_err());
        assert!(validate_video_url("ftp://youtube.com/file", &allowed()).is_err());
    }
}
