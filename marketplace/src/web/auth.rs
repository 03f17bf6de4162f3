// marketplace/src/web/auth.rs

//! Caller identity extractors.
//!
//! Identity comes from an upstream authentication layer as two headers:
//! `X-User-ID` (a UUID) and `X-User-Role` (`customer`, `vendor` or `admin`).

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::UserRole;

pub const USER_ID_HEADER: &str = "X-User-ID";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
  pub role: UserRole,
}

impl AuthenticatedUser {
  fn from_headers(req: &HttpRequest) -> Result<Self, AppError> {
    let header = |name: &str| req.headers().get(name).and_then(|value| value.to_str().ok());

    let user_id = header(USER_ID_HEADER).and_then(|raw| Uuid::parse_str(raw.trim()).ok());
    let role = header(USER_ROLE_HEADER).and_then(|raw| raw.trim().parse::<UserRole>().ok());

    match (user_id, role) {
      (Some(user_id), Some(role)) => Ok(Self { user_id, role }),
      _ => {
        warn!("AuthenticatedUser extractor: missing or invalid identity headers.");
        Err(AppError::Unauthorized(
          "Authentication required. Provide valid X-User-ID and X-User-Role headers.".to_string(),
        ))
      }
    }
  }

  fn require_role(self, role: UserRole) -> Result<Self, AppError> {
    if self.role != role {
      warn!(user_id = %self.user_id, role = %self.role, required = %role, "Caller lacks required role.");
      return Err(AppError::Forbidden(format!("Only a {} can perform this action", role)));
    }
    Ok(self)
  }
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(Self::from_headers(req))
  }
}

/// An authenticated caller with the `vendor` role.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedVendor {
  pub vendor_id: Uuid,
}

impl FromRequest for AuthenticatedVendor {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let result = AuthenticatedUser::from_headers(req)
      .and_then(|user| user.require_role(UserRole::Vendor))
      .map(|user| AuthenticatedVendor { vendor_id: user.user_id });
    ready(result)
  }
}

/// An authenticated caller with the `admin` role.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedAdmin {
  pub admin_id: Uuid,
}

impl FromRequest for AuthenticatedAdmin {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let result = AuthenticatedUser::from_headers(req)
      .and_then(|user| user.require_role(UserRole::Admin))
      .map(|user| AuthenticatedAdmin { admin_id: user.user_id });
    ready(result)
  }
}
