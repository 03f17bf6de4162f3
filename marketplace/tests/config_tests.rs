// tests/config_tests.rs
mod common;
use common::*;
use marketplace::config::{AppConfig, StoreBackend};
use marketplace::errors::AppError;
use serial_test::serial;
use std::env;

const VARS: &[&str] = &[
  "SERVER_HOST",
  "SERVER_PORT",
  "STORE_BACKEND",
  "DATABASE_URL",
  "DATABASE_MAX_CONNECTIONS",
  "RUN_MIGRATIONS",
  "APP_BASE_URL",
  "EMAIL_SENDER",
  "DEFAULT_PRODUCT_IMAGE_URL",
  "PASSWORD_RESET_TTL_MINUTES",
  "SEED_ADMIN_EMAIL",
  "SEED_ADMIN_PASSWORD",
];

fn clear_env() {
  for var in VARS {
    env::remove_var(var);
  }
}

#[test]
#[serial]
fn defaults_apply_for_the_memory_backend() {
  setup_tracing();
  clear_env();
  env::set_var("STORE_BACKEND", "memory");

  let config = AppConfig::from_env().unwrap();
  assert_eq!(config.store_backend, StoreBackend::Memory);
  assert_eq!(config.bind_address(), "127.0.0.1:8080");
  assert_eq!(config.app_base_url, "http://127.0.0.1:8080");
  assert_eq!(config.database_max_connections, 5);
  assert!(config.run_migrations);
  assert_eq!(config.email_sender, "noreply@example.com");
  assert_eq!(config.recovery_settings().token_ttl, chrono::Duration::minutes(60));
  assert!(config.seed_admin.is_none());
  clear_env();
}

#[test]
#[serial]
fn postgres_backend_requires_database_url() {
  setup_tracing();
  clear_env();

  let result = AppConfig::from_env();
  assert!(matches!(result, Err(AppError::Config(_))));

  env::set_var("DATABASE_URL", "postgres://localhost/marketplace");
  env::set_var("SERVER_PORT", "9090");
  let config = AppConfig::from_env().unwrap();
  assert_eq!(config.store_backend, StoreBackend::Postgres);
  assert_eq!(config.app_base_url, "http://127.0.0.1:9090");
  clear_env();
}

#[test]
#[serial]
fn invalid_values_are_config_errors() {
  setup_tracing();
  clear_env();
  env::set_var("STORE_BACKEND", "memory");

  env::set_var("SERVER_PORT", "not-a-port");
  assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
  env::remove_var("SERVER_PORT");

  env::set_var("PASSWORD_RESET_TTL_MINUTES", "0");
  assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
  env::remove_var("PASSWORD_RESET_TTL_MINUTES");

  env::set_var("STORE_BACKEND", "redis");
  assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
  clear_env();
}

#[test]
fn lookup_source_overrides_everything() {
  let config = AppConfig::from_lookup(|name| match name {
    "STORE_BACKEND" => Some("memory".to_string()),
    "APP_BASE_URL" => Some("https://shop.example".to_string()),
    "DEFAULT_PRODUCT_IMAGE_URL" => Some("https://cdn.example/none.svg".to_string()),
    _ => None,
  })
  .unwrap();
  assert_eq!(config.recovery_settings().app_base_url, "https://shop.example");
  assert_eq!(config.product_settings().default_image_url, "https://cdn.example/none.svg");
}

#[test]
#[serial]
fn admin_seed_needs_both_variables() {
  setup_tracing();
  clear_env();
  env::set_var("STORE_BACKEND", "memory");

  env::set_var("SEED_ADMIN_EMAIL", "admin@example.com");
  assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));

  env::set_var("SEED_ADMIN_PASSWORD", "admin-secret");
  let seed = AppConfig::from_env().unwrap().seed_admin.unwrap();
  assert_eq!(seed.email, "admin@example.com");
  assert_eq!(seed.password, "admin-secret");
  clear_env();
}
