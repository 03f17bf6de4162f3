// marketplace/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use marketplace::config::{AppConfig, StoreBackend};
use marketplace::db::{MemoryStore, PgStore, UserStore};
use marketplace::services::account_service::ensure_admin_account;
use marketplace::services::mailer::{LogMailer, Mailer};
use marketplace::state::AppState;
use marketplace::web::configure_app_routes;

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let json = std::env::var("LOG_FORMAT")
    .map(|format| format.eq_ignore_ascii_case("json"))
    .unwrap_or(false);

  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE);
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

async fn seed_admin(users: &dyn UserStore, config: &AppConfig) -> anyhow::Result<()> {
  if let Some(seed) = &config.seed_admin {
    ensure_admin_account(users, seed)
      .await
      .context("Failed to provision the administrator account")?;
  }
  Ok(())
}

async fn build_state(config: Arc<AppConfig>) -> anyhow::Result<AppState> {
  let mailer: Arc<dyn Mailer> = Arc::new(LogMailer::new());

  match config.store_backend {
    StoreBackend::Postgres => {
      let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres store")?;
      let store = PgStore::connect(database_url, config.database_max_connections)
        .await
        .context("Failed to connect to the database")?;
      tracing::info!("Successfully connected to the database.");

      if config.run_migrations {
        store.migrate().await.context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied.");
      }
      seed_admin(&store, &config).await?;
      Ok(AppState::from_store(Arc::new(store), mailer, config))
    }
    StoreBackend::Memory => {
      tracing::warn!("Using the in-memory store; data is lost on shutdown.");
      let store = MemoryStore::new();
      seed_admin(&store, &config).await?;
      Ok(AppState::from_store(Arc::new(store), mailer, config))
    }
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // .env is read before the filter is built so RUST_LOG from the file applies.
  dotenvy::dotenv().ok();
  init_tracing();
  tracing::info!("Starting marketplace server...");

  let app_config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);

  let app_state = build_state(app_config.clone()).await?;

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await
  .context("HTTP server terminated with an error")
}
