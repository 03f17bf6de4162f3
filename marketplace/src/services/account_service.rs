// marketplace/src/services/account_service.rs

//! Start-up provisioning of the administrator account.

use std::fmt;
use tracing::{info, instrument, warn};

use crate::db::UserStore;
use crate::errors::{AppError, Result as AppResult};
use crate::models::{NewUser, User, UserRole};
use crate::services::auth_service::{hash_password, verify_password};
use crate::services::recovery_service::MIN_PASSWORD_LENGTH;

/// Credentials for the administrator created at start-up.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminSeed {
  pub email: String,
  pub password: String,
}

impl fmt::Debug for AdminSeed {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AdminSeed")
      .field("email", &self.email)
      .field("password", &"[REDACTED]")
      .finish()
  }
}

/// Creates the administrator if no user holds the email yet.
///
/// An existing account is left untouched; a differing password or role is only
/// reported, since it may have been changed through password recovery.
#[instrument(name = "account_service::ensure_admin", skip(users, seed), fields(email = %seed.email))]
pub async fn ensure_admin_account(users: &dyn UserStore, seed: &AdminSeed) -> AppResult<User> {
  if seed.password.chars().count() < MIN_PASSWORD_LENGTH {
    return Err(AppError::Config(format!(
      "SEED_ADMIN_PASSWORD must be at least {} characters",
      MIN_PASSWORD_LENGTH
    )));
  }

  if let Some(existing) = users.find_user_by_email(&seed.email).await? {
    if existing.role != UserRole::Admin {
      warn!(user_id = %existing.id, role = %existing.role, "Seed email belongs to a non-admin account.");
    } else if !verify_password(&existing.password_hash, &seed.password)? {
      warn!(user_id = %existing.id, "Stored admin password differs from the seed; leaving it unchanged.");
    }
    return Ok(existing);
  }

  let admin = users
    .insert_user(NewUser {
      email: seed.email.clone(),
      password_hash: hash_password(&seed.password)?,
      role: UserRole::Admin,
    })
    .await?;
  info!(user_id = %admin.id, "Administrator account created.");
  Ok(admin)
}
