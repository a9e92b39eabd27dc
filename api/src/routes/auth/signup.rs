use actix_web::{web, HttpResponse};
use tracing::warn;
use validator::Validate;

use cc_core::domain::entities::account::AccountRole;
use cc_core::domain::value_objects::{AccountSummary, Identifier};
use cc_core::repositories::{AccountRepository, VerificationRecordStore};
use cc_core::services::RegisterAccount;
use cc_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{DeliveryStatus, SignupRequest, SignupResponse};
use crate::handlers::error::ApiError;

/// Handler for POST /api/v1/auth/signup
///
/// Registers a pending account and immediately starts verification. The
/// account cannot log in until the code is confirmed through `verify-otp`.
///
/// # Request Body
///
/// ```json
/// {
///     "name": "Meera",
///     "identifier": "meera@example.com",
///     "password": "handloom-2024",
///     "role": "artisan",
///     "mobile": "+919876543210"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: invalid field
/// - 409 Conflict: an activated account already uses the identifier
/// - 503 Service Unavailable: store unavailable or request timed out
pub async fn signup<S, A>(
    state: web::Data<AppState<S, A>>,
    request: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: VerificationRecordStore + 'static,
    A: AccountRepository + 'static,
{
    request.validate()?;
    let request = request.into_inner();

    let identifier = Identifier::parse(&request.identifier)?;
    let role: AccountRole = request.role.parse()?;
    let mobile = request.mobile.as_deref().map(Identifier::phone).transpose()?;

    let registration = RegisterAccount {
        identifier: identifier.clone(),
        display_name: request.name,
        password: request.password,
        role,
        mobile,
    };

    let (account, started) = state
        .run(async {
            let account = state.accounts.register(registration).await?;
            let started = state.verification.start_verification(&identifier).await?;
            Ok((account, started))
        })
        .await?;

    // The account is kept either way; the client can ask for a new code
    let message = if started.any_delivered() {
        "Account created, verification code sent"
    } else {
        warn!(
            identifier = %identifier.masked(),
            "No channel delivered the signup verification code"
        );
        "Account created, but the verification code could not be delivered"
    };

    let body = SignupResponse {
        account: AccountSummary::from(&account),
        expires_at: started.expires_at,
        deliveries: started.deliveries.iter().map(DeliveryStatus::from).collect(),
    };

    Ok(HttpResponse::Created().json(ApiResponse::success(body).with_message(message)))
}
