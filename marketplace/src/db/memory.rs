// marketplace/src/db/memory.rs

//! Process-local store with the same constraints as the PostgreSQL schema.
//!
//! All collections sit behind one `parking_lot::RwLock`, so every uniqueness and
//! reference check happens atomically with the write it guards. Guards are never
//! held across an `.await`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use super::{CategoryStore, FlashSaleStore, ProductStore, StoreError, StoreResult, UserStore};
use crate::models::{
  Category, FlashSaleEntry, FlashSaleListing, NewFlashSaleEntry, NewProduct, NewUser, Product, ProductPatch, User,
};
use crate::services::product_service::MAX_PRODUCT_IMAGES;

#[derive(Default)]
struct Tables {
  users: Vec<User>,
  categories: Vec<Category>,
  products: Vec<Product>,
  flash_sales: Vec<FlashSaleEntry>,
}

impl Tables {
  fn check_product(&self, product: &Product) -> StoreResult<()> {
    if !(product.price > 0.0) {
      return Err(StoreError::CheckViolation("products_price_check".into()));
    }
    if product.quantity < 0 {
      return Err(StoreError::CheckViolation("products_quantity_check".into()));
    }
    if !(1..=MAX_PRODUCT_IMAGES).contains(&product.images.len()) {
      return Err(StoreError::CheckViolation("products_images_check".into()));
    }
    if !self.categories.iter().any(|c| c.id == product.category_id) {
      return Err(StoreError::ForeignKeyViolation("products_category_id_fkey".into()));
    }
    let duplicate = self.products.iter().any(|other| {
      other.id != product.id && other.vendor_id == product.vendor_id && eq_ignore_case(&other.name, &product.name)
    });
    if duplicate {
      return Err(StoreError::UniqueViolation("products_vendor_name_key".into()));
    }
    Ok(())
  }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
  a.to_lowercase() == b.to_lowercase()
}

#[derive(Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl ProductStore for MemoryStore {
  async fn insert_product(&self, new_product: NewProduct) -> StoreResult<Product> {
    let now = Utc::now();
    let product = Product {
      id: Uuid::new_v4(),
      vendor_id: new_product.vendor_id,
      name: new_product.name,
      description: new_product.description,
      price: new_product.price,
      images: new_product.images,
      category_id: new_product.category_id,
      quantity: new_product.quantity,
      created_at: now,
      updated_at: now,
    };
    let mut tables = self.tables.write();
    tables.check_product(&product)?;
    tables.products.push(product.clone());
    Ok(product)
  }

  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    Ok(self.tables.read().products.clone())
  }

  async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
    Ok(self.tables.read().products.iter().find(|p| p.id == id).cloned())
  }

  async fn find_product_by_vendor_and_name(&self, vendor_id: Uuid, name: &str) -> StoreResult<Option<Product>> {
    let tables = self.tables.read();
    Ok(
      tables
        .products
        .iter()
        .find(|p| p.vendor_id == vendor_id && eq_ignore_case(&p.name, name))
        .cloned(),
    )
  }

  async fn update_product(&self, id: Uuid, patch: &ProductPatch) -> StoreResult<Option<Product>> {
    let mut tables = self.tables.write();
    let Some(index) = tables.products.iter().position(|p| p.id == id) else {
      return Ok(None);
    };
    let mut updated = tables.products[index].clone();
    patch.apply_to(&mut updated, Utc::now());
    tables.check_product(&updated)?;
    tables.products[index] = updated.clone();
    Ok(Some(updated))
  }

  async fn delete_product(&self, id: Uuid) -> StoreResult<bool> {
    let mut tables = self.tables.write();
    let before = tables.products.len();
    tables.products.retain(|p| p.id != id);
    let removed = tables.products.len() < before;
    if removed {
      tables.flash_sales.retain(|f| f.product_id != id);
    }
    Ok(removed)
  }
}

#[async_trait]
impl CategoryStore for MemoryStore {
  async fn insert_category(&self, name: &str) -> StoreResult<Category> {
    let mut tables = self.tables.write();
    if tables.categories.iter().any(|c| eq_ignore_case(&c.name, name)) {
      return Err(StoreError::UniqueViolation("categories_name_key".into()));
    }
    let category = Category {
      id: Uuid::new_v4(),
      name: name.to_string(),
      created_at: Utc::now(),
    };
    tables.categories.push(category.clone());
    Ok(category)
  }

  async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
    Ok(self.tables.read().categories.iter().find(|c| c.id == id).cloned())
  }

  async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
    Ok(
      self
        .tables
        .read()
        .categories
        .iter()
        .find(|c| eq_ignore_case(&c.name, name))
        .cloned(),
    )
  }

  async fn list_categories(&self) -> StoreResult<Vec<Category>> {
    let mut categories = self.tables.read().categories.clone();
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(categories)
  }
}

#[async_trait]
impl FlashSaleStore for MemoryStore {
  async fn insert_flash_sale(&self, entry: NewFlashSaleEntry) -> StoreResult<FlashSaleEntry> {
    let mut tables = self.tables.write();
    if !(entry.new_price > 0.0) {
      return Err(StoreError::CheckViolation("flash_sales_new_price_check".into()));
    }
    if !tables.products.iter().any(|p| p.id == entry.product_id) {
      return Err(StoreError::ForeignKeyViolation("flash_sales_product_id_fkey".into()));
    }
    if tables.flash_sales.iter().any(|f| f.product_id == entry.product_id) {
      return Err(StoreError::UniqueViolation("flash_sales_product_key".into()));
    }
    let inserted = FlashSaleEntry {
      id: Uuid::new_v4(),
      product_id: entry.product_id,
      vendor_id: entry.vendor_id,
      new_price: entry.new_price,
      created_at: Utc::now(),
    };
    tables.flash_sales.push(inserted.clone());
    Ok(inserted)
  }

  async fn find_flash_sale_by_product(&self, product_id: Uuid) -> StoreResult<Option<FlashSaleEntry>> {
    Ok(
      self
        .tables
        .read()
        .flash_sales
        .iter()
        .find(|f| f.product_id == product_id)
        .cloned(),
    )
  }

  async fn delete_flash_sale(&self, id: Uuid) -> StoreResult<bool> {
    let mut tables = self.tables.write();
    let before = tables.flash_sales.len();
    tables.flash_sales.retain(|f| f.id != id);
    Ok(tables.flash_sales.len() < before)
  }

  async fn list_flash_sales_with_products(&self) -> StoreResult<Vec<FlashSaleListing>> {
    let tables = self.tables.read();
    let listings = tables
      .flash_sales
      .iter()
      .filter_map(|entry| {
        tables
          .products
          .iter()
          .find(|p| p.id == entry.product_id)
          .map(|product| FlashSaleListing::new(entry.clone(), product.clone()))
      })
      .collect();
    Ok(listings)
  }
}

#[async_trait]
impl UserStore for MemoryStore {
  async fn insert_user(&self, new_user: NewUser) -> StoreResult<User> {
    let mut tables = self.tables.write();
    if tables.users.iter().any(|u| eq_ignore_case(&u.email, &new_user.email)) {
      return Err(StoreError::UniqueViolation("users_email_key".into()));
    }
    let now = Utc::now();
    let user = User {
      id: Uuid::new_v4(),
      email: new_user.email,
      password_hash: new_user.password_hash,
      role: new_user.role,
      password_reset_token: None,
      password_reset_expires_at: None,
      created_at: now,
      updated_at: now,
    };
    tables.users.push(user.clone());
    Ok(user)
  }

  async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
    Ok(
      self
        .tables
        .read()
        .users
        .iter()
        .find(|u| eq_ignore_case(&u.email, email))
        .cloned(),
    )
  }

  async fn set_password_reset_token(&self, user_id: Uuid, token: &str, expires_at: DateTime<Utc>) -> StoreResult<()> {
    let mut tables = self.tables.write();
    if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
      user.password_reset_token = Some(token.to_string());
      user.password_reset_expires_at = Some(expires_at);
      user.updated_at = Utc::now();
    }
    Ok(())
  }

  async fn find_user_by_reset_token(&self, email: &str, token: &str) -> StoreResult<Option<User>> {
    Ok(
      self
        .tables
        .read()
        .users
        .iter()
        .find(|u| eq_ignore_case(&u.email, email) && u.password_reset_token.as_deref() == Some(token))
        .cloned(),
    )
  }

  async fn update_password(&self, user_id: Uuid, password_hash: &str) -> StoreResult<()> {
    let mut tables = self.tables.write();
    if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
      user.password_hash = password_hash.to_string();
      user.password_reset_token = None;
      user.password_reset_expires_at = None;
      user.updated_at = Utc::now();
    }
    Ok(())
  }
}
