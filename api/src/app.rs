//! Application state and factory
//!
//! This module holds the services shared by all workers and builds the
//! Actix-web application around them.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App,
};
use tracing_actix_web::TracingLogger;

use cc_core::errors::DomainResult;
use cc_core::repositories::{AccountRepository, VerificationRecordStore};
use cc_core::services::{AccountService, VerificationService};
use cc_shared::config::{CorsConfig, Environment};

use crate::handlers::error::{json_config, not_found, ApiError};
use crate::middleware::{create_cors, security_headers};
use crate::routes;

/// Services shared by every request
pub struct AppState<S, A>
where
    S: VerificationRecordStore,
    A: AccountRepository,
{
    pub verification: Arc<VerificationService<S, A>>,
    pub accounts: Arc<AccountService<A>>,
    /// Probed by the health endpoint
    pub records: Arc<S>,
    pub request_timeout: Duration,
}

impl<S, A> AppState<S, A>
where
    S: VerificationRecordStore,
    A: AccountRepository,
{
    pub fn new(
        verification: Arc<VerificationService<S, A>>,
        accounts: Arc<AccountService<A>>,
        records: Arc<S>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            verification,
            accounts,
            records,
            request_timeout,
        }
    }

    /// Run a core operation under the request timeout
    ///
    /// An elapsed timeout becomes `ApiError::Timeout` (503, retryable).
    pub async fn run<T, F>(&self, operation: F) -> Result<T, ApiError>
    where
        F: Future<Output = DomainResult<T>>,
    {
        match tokio::time::timeout(self.request_timeout, operation).await {
            Ok(result) => result.map_err(ApiError::from),
            Err(_) => Err(ApiError::Timeout),
        }
    }
}

/// Register the JSON config and all routes
pub fn configure<S, A>(cfg: &mut web::ServiceConfig)
where
    S: VerificationRecordStore + 'static,
    A: AccountRepository + 'static,
{
    cfg.app_data(json_config())
        .route("/health", web::get().to(routes::health::health_check::<S, A>))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/send-otp", web::post().to(routes::auth::send_otp::<S, A>))
                    .route("/verify-otp", web::post().to(routes::auth::verify_otp::<S, A>))
                    .route("/signup", web::post().to(routes::auth::signup::<S, A>))
                    .route("/login", web::post().to(routes::auth::login::<S, A>)),
            ),
        );
}

/// Create the application with middleware and a JSON 404 fallback
pub fn create_app<S, A>(
    state: web::Data<AppState<S, A>>,
    cors: &CorsConfig,
    environment: Environment,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: VerificationRecordStore + 'static,
    A: AccountRepository + 'static,
{
    App::new()
        .app_data(state)
        // Middleware order matters: the last wrap runs first
        .wrap(security_headers(environment))
        .wrap(create_cors(cors, environment))
        .wrap(TracingLogger::default())
        .configure(configure::<S, A>)
        .default_service(web::route().to(not_found))
}
