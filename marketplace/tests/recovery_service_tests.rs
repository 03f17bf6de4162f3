// tests/recovery_service_tests.rs
mod common;
use chrono::{Duration, Utc};
use common::*;
use marketplace::db::UserStore;
use marketplace::errors::AppError;
use marketplace::services::auth_service::verify_password;
use marketplace::services::mailer::LogMailer;

#[tokio::test]
async fn forgot_password_stores_token_and_mails_link() {
  let fx = Fixture::new().await;
  let user = fx.user("ada@example.com").await;

  fx.recovery_service().forgot_password(Some("ada@example.com")).await.unwrap();

  let stored = fx.store.find_user_by_email("ada@example.com").await.unwrap().unwrap();
  let token = stored.password_reset_token.clone().expect("token stored");
  assert!(stored.password_reset_expires_at.unwrap() > Utc::now());

  let sent = fx.mailer.sent();
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].to, user.email);
  assert_eq!(sent[0].from, "noreply@example.com");
  assert!(sent[0].text_body.contains(&format!("http://shop.test/reset-password/{}", token)));
}

#[tokio::test]
async fn forgot_password_validates_and_reports_unknown_users() {
  let fx = Fixture::new().await;
  let service = fx.recovery_service();

  assert!(matches!(service.forgot_password(None).await, Err(AppError::Validation(_))));
  assert!(matches!(service.forgot_password(Some("  ")).await, Err(AppError::Validation(_))));
  assert!(matches!(
    service.forgot_password(Some("nobody@example.com")).await,
    Err(AppError::NotFound(_))
  ));
  assert!(fx.mailer.sent().is_empty());
}

#[tokio::test]
async fn mailer_failure_is_a_delivery_error() {
  let fx = Fixture::with_mailer(LogMailer::failing()).await;
  fx.user("ada@example.com").await;

  let err = fx
    .recovery_service()
    .forgot_password(Some("ada@example.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Delivery(_)));
}

#[tokio::test]
async fn reset_with_issued_token_changes_password_and_clears_token() {
  let fx = Fixture::new().await;
  let user = fx.user("ada@example.com").await;
  let service = fx.recovery_service();
  service.forgot_password(Some("ada@example.com")).await.unwrap();
  let token = fx
    .store
    .find_user_by_email("ada@example.com")
    .await
    .unwrap()
    .and_then(|u| u.password_reset_token)
    .unwrap();

  service
    .reset_password(Some("ada@example.com"), Some(&token), Some("brand-new-secret"))
    .await
    .unwrap();

  let updated = fx.store.find_user_by_email("ada@example.com").await.unwrap().unwrap();
  assert_ne!(updated.password_hash, user.password_hash);
  assert!(verify_password(&updated.password_hash, "brand-new-secret").unwrap());
  assert!(updated.password_reset_token.is_none());
  assert!(updated.password_reset_expires_at.is_none());

  // The token is single-use.
  let err = service
    .reset_password(Some("ada@example.com"), Some(&token), Some("another-secret"))
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn wrong_token_is_unauthorized() {
  let fx = Fixture::new().await;
  fx.user("ada@example.com").await;
  let service = fx.recovery_service();
  service.forgot_password(Some("ada@example.com")).await.unwrap();

  let err = service
    .reset_password(Some("ada@example.com"), Some("deadbeef"), Some("brand-new-secret"))
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
  let fx = Fixture::new().await;
  let user = fx.user("ada@example.com").await;
  fx.store
    .set_password_reset_token(user.id, "cafebabe", Utc::now() - Duration::minutes(1))
    .await
    .unwrap();

  let err = fx
    .recovery_service()
    .reset_password(Some("ada@example.com"), Some("cafebabe"), Some("brand-new-secret"))
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn short_or_missing_password_is_a_validation_error() {
  let fx = Fixture::new().await;
  let service = fx.recovery_service();

  let err = service
    .reset_password(Some("ada@example.com"), Some("token"), Some("short"))
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Validation(ref e) if e.get("password").is_some()));

  let err = service
    .reset_password(Some("ada@example.com"), Some("token"), None)
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Validation(_)));
}
