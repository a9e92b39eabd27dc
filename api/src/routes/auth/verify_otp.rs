use actix_web::{web, HttpResponse};
use validator::Validate;

use cc_core::domain::value_objects::Identifier;
use cc_core::repositories::{AccountRepository, VerificationRecordStore};
use cc_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::error::ApiError;

/// Handler for POST /api/v1/auth/verify-otp
///
/// Rejections are not errors: a wrong, unknown or expired code answers 200
/// with `accepted: false` and a `reason` of `invalid_code` or `expired`.
///
/// # Request Body
///
/// ```json
/// { "identifier": "maker@example.com", "code": "482913" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: malformed identifier or code
/// - 429 Too Many Requests: attempt limit reached
/// - 503 Service Unavailable: store unavailable or request timed out
pub async fn verify_otp<S, A>(
    state: web::Data<AppState<S, A>>,
    request: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: VerificationRecordStore + 'static,
    A: AccountRepository + 'static,
{
    request.validate()?;
    let identifier = Identifier::parse(&request.identifier)?;

    let result = state
        .run(state.verification.confirm_verification(&identifier, &request.code))
        .await?;

    let message = if result.outcome.is_accepted() {
        "Verification successful"
    } else {
        "Verification failed"
    };

    let body = ApiResponse::success(VerifyOtpResponse::from(result)).with_message(message);
    Ok(HttpResponse::Ok().json(body))
}
