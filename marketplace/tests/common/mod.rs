// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset.

use marketplace::config::AppConfig;
use marketplace::db::{CategoryStore, MemoryStore, UserStore};
use marketplace::models::{Category, NewUser, User, UserRole};
use marketplace::services::auth_service::hash_password;
use marketplace::services::mailer::{LogMailer, Mailer};
use marketplace::services::{CategoryService, FlashSaleService, ProductService, ProductSettings, RecoveryService, RecoverySettings};
use marketplace::state::AppState;
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub const USER_PASSWORD: &str = "initial-password";

/// A fresh in-memory store with one category already in it.
pub struct Fixture {
  pub store: Arc<MemoryStore>,
  pub mailer: Arc<LogMailer>,
  pub category: Category,
}

impl Fixture {
  pub async fn new() -> Self {
    Self::with_mailer(LogMailer::new()).await
  }

  pub async fn with_mailer(mailer: LogMailer) -> Self {
    setup_tracing();
    let store = Arc::new(MemoryStore::new());
    let category = store.insert_category("Electronics").await.unwrap();
    Self {
      store,
      mailer: Arc::new(mailer),
      category,
    }
  }

  pub fn product_service(&self) -> ProductService {
    ProductService::new(self.store.clone(), self.store.clone(), ProductSettings::default())
  }

  pub fn flash_sale_service(&self) -> FlashSaleService {
    FlashSaleService::new(self.store.clone(), self.store.clone())
  }

  pub fn category_service(&self) -> CategoryService {
    CategoryService::new(self.store.clone())
  }

  pub fn recovery_service(&self) -> RecoveryService {
    let settings = RecoverySettings {
      app_base_url: "http://shop.test".to_string(),
      ..RecoverySettings::default()
    };
    RecoveryService::new(self.store.clone(), self.mailer.clone(), settings)
  }

  pub fn app_state(&self) -> AppState {
    let mailer: Arc<dyn Mailer> = self.mailer.clone();
    AppState::from_store(self.store.clone(), mailer, Arc::new(memory_config()))
  }

  pub async fn user(&self, email: &str) -> User {
    self
      .store
      .insert_user(NewUser {
        email: email.to_string(),
        password_hash: hash_password(USER_PASSWORD).unwrap(),
        role: UserRole::Vendor,
      })
      .await
      .unwrap()
  }

  /// A complete, valid product submission in this fixture's category.
  pub fn product_fields(&self, name: &str) -> Map<String, Value> {
    let body = json!({
      "name": name,
      "description": "Hand-made and sturdy",
      "price": 49.5,
      "category_id": self.category.id.to_string(),
      "quantity": 3,
    });
    body.as_object().cloned().unwrap()
  }
}

pub fn image_refs(count: usize) -> Vec<String> {
  (0..count).map(|i| format!("uploads/img_{}.png", i)).collect()
}

pub fn new_vendor() -> Uuid {
  Uuid::new_v4()
}

pub fn memory_config() -> AppConfig {
  let vars: HashMap<&str, &str> = HashMap::from([("STORE_BACKEND", "memory"), ("APP_BASE_URL", "http://shop.test")]);
  AppConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap()
}
