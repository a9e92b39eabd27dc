use actix_web::{web, HttpResponse};
use validator::Validate;

use cc_core::domain::value_objects::Identifier;
use cc_core::repositories::{AccountRepository, VerificationRecordStore};
use cc_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{LoginRequest, LoginResponse};
use crate::handlers::error::ApiError;

/// Handler for POST /api/v1/auth/login
///
/// Returns the account summary; no session token is issued.
///
/// ## Errors
/// - 401 Unauthorized: wrong password, or account not yet verified
/// - 404 Not Found: no account for the identifier
pub async fn login<S, A>(
    state: web::Data<AppState<S, A>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: VerificationRecordStore + 'static,
    A: AccountRepository + 'static,
{
    request.validate()?;
    let identifier = Identifier::parse(&request.identifier)?;

    let account = state
        .run(state.accounts.authenticate(&identifier, &request.password))
        .await?;

    let body = ApiResponse::success(LoginResponse { account }).with_message("Login successful");
    Ok(HttpResponse::Ok().json(body))
}
