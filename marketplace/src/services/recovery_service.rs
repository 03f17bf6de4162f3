// marketplace/src/services/recovery_service.rs

//! Forgot-password / reset-password flow.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::db::UserStore;
use crate::errors::{AppError, Result as AppResult};
use crate::services::auth_service::{generate_reset_token, hash_password};
use crate::services::mailer::{Mailer, OutgoingEmail};

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone)]
pub struct RecoverySettings {
  pub app_base_url: String,
  pub email_sender: String,
  pub token_ttl: Duration,
}

impl Default for RecoverySettings {
  fn default() -> Self {
    Self {
      app_base_url: "http://127.0.0.1:8080".to_string(),
      email_sender: "noreply@example.com".to_string(),
      token_ttl: Duration::minutes(60),
    }
  }
}

pub struct RecoveryService {
  users: Arc<dyn UserStore>,
  mailer: Arc<dyn Mailer>,
  settings: RecoverySettings,
}

impl RecoveryService {
  pub fn new(users: Arc<dyn UserStore>, mailer: Arc<dyn Mailer>, settings: RecoverySettings) -> Self {
    Self { users, mailer, settings }
  }

  /// Issues a reset token for `email` and mails the reset link.
  ///
  /// The token is stored before the mail goes out, so a delivery failure leaves
  /// a valid but unsent token behind; requesting again replaces it.
  #[instrument(name = "recovery_service::forgot_password", skip(self))]
  pub async fn forgot_password(&self, email: Option<&str>) -> AppResult<()> {
    let email = required(email, "email")?;
    let user = self.users.find_user_by_email(email).await?.ok_or_else(|| {
      warn!("Password reset requested for unknown email.");
      AppError::NotFound("User not found".to_string())
    })?;

    let token = generate_reset_token();
    let expires_at = Utc::now() + self.settings.token_ttl;
    self.users.set_password_reset_token(user.id, &token, expires_at).await?;

    let reset_link = format!(
      "{}/reset-password/{}",
      self.settings.app_base_url.trim_end_matches('/'),
      token
    );
    let email = OutgoingEmail {
      to: user.email.clone(),
      from: self.settings.email_sender.clone(),
      subject: "Reset your password".to_string(),
      text_body: format!(
        "A password reset was requested for your account.\n\nFollow this link to choose a new password: {}\n\nThe link expires at {}.",
        reset_link,
        expires_at.to_rfc3339()
      ),
    };

    let sent = self.mailer.send(email).await.map_err(|mail_err| {
      error!(user_id = %user.id, error = %mail_err, "Failed to deliver password reset email.");
      AppError::Delivery(mail_err)
    })?;
    info!(user_id = %user.id, message_id = %sent.message_id, "Password reset email sent.");
    Ok(())
  }

  /// Sets a new password when `token` matches the one issued for `email` and has not expired.
  #[instrument(name = "recovery_service::reset_password", skip(self, token, password))]
  pub async fn reset_password(&self, email: Option<&str>, token: Option<&str>, password: Option<&str>) -> AppResult<()> {
    let password = password
      .filter(|p| !p.is_empty())
      .ok_or_else(|| AppError::field("password", "password is required"))?;
    if password.chars().count() < MIN_PASSWORD_LENGTH {
      return Err(AppError::field(
        "password",
        format!("password must be at least {} characters", MIN_PASSWORD_LENGTH),
      ));
    }
    let invalid_token = || AppError::Unauthorized("Invalid password reset token".to_string());
    let (Some(email), Some(token)) = (non_blank(email), non_blank(token)) else {
      return Err(invalid_token());
    };

    let user = self.users.find_user_by_reset_token(email, token).await?.ok_or_else(|| {
      warn!("Reset token did not match any user.");
      invalid_token()
    })?;
    match user.password_reset_expires_at {
      Some(expires_at) if expires_at > Utc::now() => {}
      _ => {
        warn!(user_id = %user.id, "Reset token has expired.");
        return Err(invalid_token());
      }
    }

    let password_hash = hash_password(password)?;
    self.users.update_password(user.id, &password_hash).await?;
    info!(user_id = %user.id, "Password reset completed.");
    Ok(())
  }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(value: Option<&'a str>, field: &str) -> AppResult<&'a str> {
  non_blank(value).ok_or_else(|| AppError::field(field, format!("{} is required", field)))
}
