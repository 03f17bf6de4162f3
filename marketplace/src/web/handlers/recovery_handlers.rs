// marketplace/src/web/handlers/recovery_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::response::ApiResponse;

#[derive(Deserialize, Debug)]
pub struct ForgotPasswordPayload {
  pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct ResetPasswordPayload {
  pub email: Option<String>,
  pub token: Option<String>,
  pub password: Option<String>,
}

#[instrument(name = "handler::forgot_password", skip(app_state, payload))]
pub async fn forgot_password_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<ForgotPasswordPayload>,
) -> Result<HttpResponse, AppError> {
  app_state.recovery.forgot_password(payload.email.as_deref()).await?;
  info!("Password reset link issued.");
  Ok(HttpResponse::Ok().json(ApiResponse::message("Password reset link sent to your email")))
}

#[instrument(name = "handler::reset_password", skip_all)]
pub async fn reset_password_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<ResetPasswordPayload>,
) -> Result<HttpResponse, AppError> {
  app_state
    .recovery
    .reset_password(
      payload.email.as_deref(),
      payload.token.as_deref(),
      payload.password.as_deref(),
    )
    .await?;
  Ok(HttpResponse::Ok().json(ApiResponse::message("Password reset successfully")))
}
