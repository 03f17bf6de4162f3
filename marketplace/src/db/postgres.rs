// marketplace/src/db/postgres.rs

//! PostgreSQL-backed store using runtime-checked `sqlx` queries.
//! Schema lives in `marketplace/migrations`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{CategoryStore, FlashSaleStore, ProductStore, StoreResult, UserStore};
use crate::models::{
  Category, FlashSaleEntry, FlashSaleListing, NewFlashSaleEntry, NewProduct, NewUser, Product, ProductPatch, User,
};

const PRODUCT_COLUMNS: &str =
  "id, vendor_id, name, description, price, images, category_id, quantity, created_at, updated_at";
const USER_COLUMNS: &str =
  "id, email, password_hash, role, password_reset_token, password_reset_expires_at, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(max_connections)
      .connect(database_url)
      .await?;
    info!(max_connections, "Connected to PostgreSQL.");
    Ok(Self::new(pool))
  }

  /// Applies the embedded migrations.
  pub async fn migrate(&self) -> StoreResult<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    info!("Database migrations applied.");
    Ok(())
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

#[async_trait]
impl ProductStore for PgStore {
  #[instrument(name = "pg::insert_product", skip(self, new_product), fields(vendor_id = %new_product.vendor_id), err(Display))]
  async fn insert_product(&self, new_product: NewProduct) -> StoreResult<Product> {
    let now = Utc::now();
    let product = sqlx::query_as::<_, Product>(&format!(
      "INSERT INTO products (id, vendor_id, name, description, price, images, category_id, quantity, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(new_product.vendor_id)
    .bind(&new_product.name)
    .bind(&new_product.description)
    .bind(new_product.price)
    .bind(&new_product.images)
    .bind(new_product.category_id)
    .bind(new_product.quantity)
    .bind(now)
    .fetch_one(&self.pool)
    .await?;
    debug!(product_id = %product.id, "Product row inserted.");
    Ok(product)
  }

  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
      "SELECT {} FROM products ORDER BY created_at ASC, id ASC",
      PRODUCT_COLUMNS
    ))
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }

  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  async fn find_product_by_vendor_and_name(&self, vendor_id: Uuid, name: &str) -> StoreResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
      "SELECT {} FROM products WHERE vendor_id = $1 AND lower(name) = lower($2) LIMIT 1",
      PRODUCT_COLUMNS
    ))
    .bind(vendor_id)
    .bind(name)
    .fetch_optional(&self.pool)
    .await?;
    Ok(product)
  }

  #[instrument(name = "pg::update_product", skip(self, patch), err(Display))]
  async fn update_product(&self, id: Uuid, patch: &ProductPatch) -> StoreResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
      "UPDATE products SET \
         name = COALESCE($2, name), \
         description = COALESCE($3, description), \
         price = COALESCE($4, price), \
         images = COALESCE($5, images), \
         category_id = COALESCE($6, category_id), \
         quantity = COALESCE($7, quantity), \
         updated_at = $8 \
       WHERE id = $1 RETURNING {}",
      PRODUCT_COLUMNS
    ))
    .bind(id)
    .bind(&patch.name)
    .bind(&patch.description)
    .bind(patch.price)
    .bind(&patch.images)
    .bind(patch.category_id)
    .bind(patch.quantity)
    .bind(Utc::now())
    .fetch_optional(&self.pool)
    .await?;
    Ok(product)
  }

  async fn delete_product(&self, id: Uuid) -> StoreResult<bool> {
    // flash_sales.product_id cascades.
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[async_trait]
impl CategoryStore for PgStore {
  async fn insert_category(&self, name: &str) -> StoreResult<Category> {
    let category = sqlx::query_as::<_, Category>(
      "INSERT INTO categories (id, name, created_at) VALUES ($1, $2, $3) RETURNING id, name, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(Utc::now())
    .fetch_one(&self.pool)
    .await?;
    Ok(category)
  }

  async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT id, name, created_at FROM categories WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(category)
  }

  async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
    let category =
      sqlx::query_as::<_, Category>("SELECT id, name, created_at FROM categories WHERE lower(name) = lower($1)")
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
    Ok(category)
  }

  async fn list_categories(&self) -> StoreResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name, created_at FROM categories ORDER BY name ASC")
      .fetch_all(&self.pool)
      .await?;
    Ok(categories)
  }
}

/// One row of the flash-sale/product join; entry columns carry a `flash_` prefix.
#[derive(FromRow)]
struct FlashSaleListingRow {
  flash_id: Uuid,
  flash_vendor_id: Uuid,
  new_price: f64,
  flash_created_at: DateTime<Utc>,
  #[sqlx(flatten)]
  product: Product,
}

impl From<FlashSaleListingRow> for FlashSaleListing {
  fn from(row: FlashSaleListingRow) -> Self {
    FlashSaleListing {
      id: row.flash_id,
      vendor_id: row.flash_vendor_id,
      new_price: row.new_price,
      created_at: row.flash_created_at,
      product: row.product,
    }
  }
}

#[async_trait]
impl FlashSaleStore for PgStore {
  #[instrument(name = "pg::insert_flash_sale", skip(self, entry), fields(product_id = %entry.product_id), err(Display))]
  async fn insert_flash_sale(&self, entry: NewFlashSaleEntry) -> StoreResult<FlashSaleEntry> {
    let inserted = sqlx::query_as::<_, FlashSaleEntry>(
      "INSERT INTO flash_sales (id, product_id, vendor_id, new_price, created_at) VALUES ($1, $2, $3, $4, $5) \
       RETURNING id, product_id, vendor_id, new_price, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(entry.product_id)
    .bind(entry.vendor_id)
    .bind(entry.new_price)
    .bind(Utc::now())
    .fetch_one(&self.pool)
    .await?;
    Ok(inserted)
  }

  async fn find_flash_sale_by_product(&self, product_id: Uuid) -> StoreResult<Option<FlashSaleEntry>> {
    let entry = sqlx::query_as::<_, FlashSaleEntry>(
      "SELECT id, product_id, vendor_id, new_price, created_at FROM flash_sales WHERE product_id = $1",
    )
    .bind(product_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(entry)
  }

  async fn delete_flash_sale(&self, id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM flash_sales WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn list_flash_sales_with_products(&self) -> StoreResult<Vec<FlashSaleListing>> {
    let rows = sqlx::query_as::<_, FlashSaleListingRow>(
      "SELECT f.id AS flash_id, f.vendor_id AS flash_vendor_id, f.new_price, f.created_at AS flash_created_at, \
              p.id, p.vendor_id, p.name, p.description, p.price, p.images, p.category_id, p.quantity, \
              p.created_at, p.updated_at \
       FROM flash_sales f JOIN products p ON p.id = f.product_id \
       ORDER BY f.created_at ASC, f.id ASC",
    )
    .fetch_all(&self.pool)
    .await?;
    Ok(rows.into_iter().map(FlashSaleListing::from).collect())
  }
}

#[async_trait]
impl UserStore for PgStore {
  async fn insert_user(&self, new_user: NewUser) -> StoreResult<User> {
    let now = Utc::now();
    let user = sqlx::query_as::<_, User>(&format!(
      "INSERT INTO users (id, email, password_hash, role, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $5) \
       RETURNING {}",
      USER_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(new_user.role)
    .bind(now)
    .fetch_one(&self.pool)
    .await?;
    Ok(user)
  }

  async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
      "SELECT {} FROM users WHERE lower(email) = lower($1)",
      USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }

  #[instrument(name = "pg::set_password_reset_token", skip(self, token), err(Display))]
  async fn set_password_reset_token(&self, user_id: Uuid, token: &str, expires_at: DateTime<Utc>) -> StoreResult<()> {
    sqlx::query(
      "UPDATE users SET password_reset_token = $2, password_reset_expires_at = $3, updated_at = now() WHERE id = $1",
    )
    .bind(user_id)
    .bind(token)
    .bind(expires_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn find_user_by_reset_token(&self, email: &str, token: &str) -> StoreResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
      "SELECT {} FROM users WHERE lower(email) = lower($1) AND password_reset_token = $2",
      USER_COLUMNS
    ))
    .bind(email)
    .bind(token)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }

  #[instrument(name = "pg::update_password", skip(self, password_hash), err(Display))]
  async fn update_password(&self, user_id: Uuid, password_hash: &str) -> StoreResult<()> {
    sqlx::query(
      "UPDATE users SET password_hash = $2, password_reset_token = NULL, password_reset_expires_at = NULL, \
       updated_at = now() WHERE id = $1",
    )
    .bind(user_id)
    .bind(password_hash)
    .execute(&self.pool)
    .await?;
    Ok(())
  }
}
