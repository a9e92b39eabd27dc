//! Security response headers.

use actix_web::middleware::DefaultHeaders;

use cc_shared::config::Environment;

/// Headers added to every response; HSTS only in production
pub fn security_headers(environment: Environment) -> DefaultHeaders {
    let headers = DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "no-referrer"))
        .add(("Cache-Control", "no-store"));

    if environment.is_production() {
        headers.add(("Strict-Transport-Security", "max-age=31536000; includeSubDomains"))
    } else {
        headers
    }
}
