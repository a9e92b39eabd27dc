//! CORS configuration for browser and mobile clients.
//!
//! Development allows any origin. Production only allows the origins listed in
//! `CORS_ALLOWED_ORIGINS`.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use tracing::info;

use cc_shared::config::{CorsConfig, Environment};

/// Build the CORS middleware for `environment`
pub fn create_cors(config: &CorsConfig, environment: Environment) -> Cors {
    if environment.is_production() {
        create_production_cors(config)
    } else {
        create_development_cors(config)
    }
}

fn base_cors(max_age: usize) -> Cors {
    Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec![
            header::RETRY_AFTER,
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(max_age)
}

fn create_development_cors(config: &CorsConfig) -> Cors {
    info!("Configuring CORS for development environment");
    base_cors(config.max_age).allow_any_origin()
}

fn create_production_cors(config: &CorsConfig) -> Cors {
    info!(
        origins = config.allowed_origins.len(),
        "Configuring CORS for production environment"
    );

    config
        .allowed_origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .fold(base_cors(config.max_age), |cors, origin| cors.allowed_origin(origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    fn config() -> CorsConfig {
        CorsConfig {
            allowed_origins: vec!["https://craftconnect.in".to_string()],
            max_age: 600,
        }
    }

    #[actix_web::test]
    async fn test_production_echoes_configured_origin() {
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&config(), Environment::Production))
                .route("/health", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let allowed = test::TestRequest::get()
            .uri("/health")
            .insert_header((header::ORIGIN, "https://craftconnect.in"))
            .to_request();
        let resp = test::call_service(&app, allowed).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://craftconnect.in"
        );
    }
}
