use actix_web::{web, HttpResponse};
use tracing::info;
use validator::Validate;

use cc_core::domain::value_objects::Identifier;
use cc_core::errors::DomainError;
use cc_core::repositories::{AccountRepository, VerificationRecordStore};
use cc_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{SendOtpRequest, SendOtpResponse};
use crate::handlers::error::ApiError;

/// Handler for POST /api/v1/auth/send-otp
///
/// Issues a new code for the identifier, superseding any outstanding one, and
/// sends it over every channel known for the identifier.
///
/// # Request Body
///
/// ```json
/// { "identifier": "maker@example.com" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "data": {
///         "expires_at": "2026-01-01T10:10:00Z",
///         "deliveries": [{ "channel": "email", "ok": true }]
///     },
///     "message": "Verification code sent",
///     "timestamp": "2026-01-01T10:00:00Z"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: malformed identifier
/// - 502 Bad Gateway: no channel delivered the code
/// - 503 Service Unavailable: store unavailable or request timed out
pub async fn send_otp<S, A>(
    state: web::Data<AppState<S, A>>,
    request: web::Json<SendOtpRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: VerificationRecordStore + 'static,
    A: AccountRepository + 'static,
{
    request.validate()?;
    let identifier = Identifier::parse(&request.identifier)?;

    let result = state
        .run(state.verification.start_verification(&identifier))
        .await?;

    if !result.any_delivered() {
        let reasons: Vec<String> = result
            .deliveries
            .iter()
            .map(|d| format!("{}: {}", d.channel, d.outcome.reason().unwrap_or("unknown")))
            .collect();
        return Err(DomainError::Dispatch {
            message: reasons.join("; "),
        }
        .into());
    }

    info!(
        identifier = %identifier.masked(),
        event = "otp_sent",
        "Verification code sent"
    );

    Ok(HttpResponse::Ok().json(
        ApiResponse::success(SendOtpResponse::from(&result)).with_message("Verification code sent"),
    ))
}
