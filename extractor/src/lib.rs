use middleware::{extractor::ExtractionMiddleware, guard::AuthGuardMiddleware};

pub mod middleware {
    pub mod extractor;
    pub mod guard;
}

/// Decodes the Bearer token (when present) and stashes the claims in
/// request extensions. Never rejects by itself.
pub fn middleware() -> ExtractionMiddleware {
    ExtractionMiddleware::new()
}

/// Rejects requests that carry no valid access-token claims with 401.
pub fn auth_guard() -> AuthGuardMiddleware {
    AuthGuardMiddleware::new()
}
