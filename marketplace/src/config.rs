// marketplace/src/config.rs

use crate::errors::{AppError, Result};
use crate::services::account_service::AdminSeed;
use crate::services::product_service::{DEFAULT_PRODUCT_IMAGE_URL, MAX_PRODUCT_IMAGES};
use crate::services::{ProductSettings, RecoverySettings};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
      "memory" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORE_BACKEND '{}': expected 'postgres' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  pub database_url: Option<String>,
  pub database_max_connections: u32,
  pub run_migrations: bool,
  pub app_base_url: String,
  pub email_sender: String,
  pub default_product_image_url: String,
  pub password_reset_ttl_minutes: i64,
  pub seed_admin: Option<AdminSeed>,
}

impl AppConfig {
  /// Loads `.env` if present, then reads the process environment.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from an arbitrary variable source.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get_env = |var_name: &str| lookup(var_name).filter(|value| !value.trim().is_empty());
    let env_or = |var_name: &str, default: &str| get_env(var_name).unwrap_or_else(|| default.to_string());

    let server_host = env_or("SERVER_HOST", "127.0.0.1");
    let server_port = env_or("SERVER_PORT", "8080")
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let store_backend = env_or("STORE_BACKEND", "postgres").parse::<StoreBackend>()?;

    let database_url = get_env("DATABASE_URL");
    if store_backend == StoreBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required when STORE_BACKEND=postgres)".to_string(),
      ));
    }
    let database_max_connections = env_or("DATABASE_MAX_CONNECTIONS", "5")
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e)))?;
    let run_migrations = env_or("RUN_MIGRATIONS", "true")
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid RUN_MIGRATIONS value: {}", e)))?;

    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|| format!("http://{}:{}", server_host, server_port));
    let email_sender = env_or("EMAIL_SENDER", "noreply@example.com");
    let default_product_image_url = env_or("DEFAULT_PRODUCT_IMAGE_URL", DEFAULT_PRODUCT_IMAGE_URL);
    let password_reset_ttl_minutes = env_or("PASSWORD_RESET_TTL_MINUTES", "60")
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid PASSWORD_RESET_TTL_MINUTES: {}", e)))?;
    if password_reset_ttl_minutes <= 0 {
      return Err(AppError::Config("PASSWORD_RESET_TTL_MINUTES must be positive".to_string()));
    }

    let seed_admin = match (get_env("SEED_ADMIN_EMAIL"), get_env("SEED_ADMIN_PASSWORD")) {
      (Some(email), Some(password)) => Some(AdminSeed { email, password }),
      (None, None) => None,
      _ => {
        return Err(AppError::Config(
          "SEED_ADMIN_EMAIL and SEED_ADMIN_PASSWORD must be set together".to_string(),
        ))
      }
    };

    tracing::info!(backend = ?store_backend, "Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database_url,
      database_max_connections,
      run_migrations,
      app_base_url,
      email_sender,
      default_product_image_url,
      password_reset_ttl_minutes,
      seed_admin,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }

  pub fn product_settings(&self) -> ProductSettings {
    ProductSettings {
      default_image_url: self.default_product_image_url.clone(),
      max_images: MAX_PRODUCT_IMAGES,
    }
  }

  pub fn recovery_settings(&self) -> RecoverySettings {
    RecoverySettings {
      app_base_url: self.app_base_url.clone(),
      email_sender: self.email_sender.clone(),
      token_ttl: chrono::Duration::minutes(self.password_reset_ttl_minutes),
    }
  }
}
