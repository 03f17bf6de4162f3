// marketplace/src/db/mod.rs

//! Persistence boundary.
//!
//! One async trait per collection. Services hold `Arc<dyn …Store>` handles that are
//! injected at construction, so the same service code runs against PostgreSQL
//! ([`postgres::PgStore`]) or the process-local [`memory::MemoryStore`].
//!
//! Uniqueness (a vendor's product names, one flash-sale entry per product) is enforced
//! by the store itself and surfaces as [`StoreError::UniqueViolation`].

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
  Category, FlashSaleEntry, FlashSaleListing, NewFlashSaleEntry, NewProduct, NewUser, Product, ProductPatch, User,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("unique constraint violated: {0}")]
  UniqueViolation(String),

  #[error("referenced record does not exist: {0}")]
  ForeignKeyViolation(String),

  #[error("check constraint violated: {0}")]
  CheckViolation(String),

  #[error("database error: {0}")]
  Sqlx(sqlx::Error),

  #[error("migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for StoreError {
  fn from(err: sqlx::Error) -> Self {
    if let sqlx::Error::Database(db_err) = &err {
      let constraint = db_err.constraint().unwrap_or("unknown").to_string();
      if db_err.is_unique_violation() {
        return StoreError::UniqueViolation(constraint);
      }
      if db_err.is_foreign_key_violation() {
        return StoreError::ForeignKeyViolation(constraint);
      }
      if db_err.is_check_violation() {
        return StoreError::CheckViolation(constraint);
      }
    }
    StoreError::Sqlx(err)
  }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait ProductStore: Send + Sync {
  async fn insert_product(&self, new_product: NewProduct) -> StoreResult<Product>;
  async fn list_products(&self) -> StoreResult<Vec<Product>>;
  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>>;
  /// Case-insensitive name match, scoped to one vendor.
  async fn find_product_by_vendor_and_name(&self, vendor_id: Uuid, name: &str) -> StoreResult<Option<Product>>;
  /// Returns `None` when no product has this id.
  async fn update_product(&self, id: Uuid, patch: &ProductPatch) -> StoreResult<Option<Product>>;
  /// Returns whether a row was removed. Flash-sale entries of the product go with it.
  async fn delete_product(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
  async fn insert_category(&self, name: &str) -> StoreResult<Category>;
  async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>>;
  async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>>;
  async fn list_categories(&self) -> StoreResult<Vec<Category>>;
}

#[async_trait]
pub trait FlashSaleStore: Send + Sync {
  async fn insert_flash_sale(&self, entry: NewFlashSaleEntry) -> StoreResult<FlashSaleEntry>;
  async fn find_flash_sale_by_product(&self, product_id: Uuid) -> StoreResult<Option<FlashSaleEntry>>;
  async fn delete_flash_sale(&self, id: Uuid) -> StoreResult<bool>;
  async fn list_flash_sales_with_products(&self) -> StoreResult<Vec<FlashSaleListing>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
  async fn insert_user(&self, new_user: NewUser) -> StoreResult<User>;
  async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
  async fn set_password_reset_token(&self, user_id: Uuid, token: &str, expires_at: DateTime<Utc>) -> StoreResult<()>;
  async fn find_user_by_reset_token(&self, email: &str, token: &str) -> StoreResult<Option<User>>;
  /// Stores the new hash and clears any pending reset token.
  async fn update_password(&self, user_id: Uuid, password_hash: &str) -> StoreResult<()>;
}

/// Every collection at once; what the server wires its services from.
pub trait Store: ProductStore + CategoryStore + FlashSaleStore + UserStore {}

impl<T> Store for T where T: ProductStore + CategoryStore + FlashSaleStore + UserStore {}
