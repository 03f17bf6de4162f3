// marketplace/src/services/category_service.rs

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::db::{CategoryStore, StoreError};
use crate::errors::{AppError, Result as AppResult};
use crate::models::Category;

pub struct CategoryService {
  categories: Arc<dyn CategoryStore>,
}

impl CategoryService {
  pub fn new(categories: Arc<dyn CategoryStore>) -> Self {
    Self { categories }
  }

  #[instrument(name = "category_service::create", skip(self))]
  pub async fn create(&self, name: &str) -> AppResult<Category> {
    let name = name.trim();
    if name.is_empty() {
      return Err(AppError::field("name", "name is required"));
    }
    if self.categories.find_category_by_name(name).await?.is_some() {
      warn!("Category already exists.");
      return Err(AppError::Conflict("Category already exists".to_string()));
    }

    let category = self.categories.insert_category(name).await.map_err(|err| match err {
      StoreError::UniqueViolation(_) => AppError::Conflict("Category already exists".to_string()),
      other => AppError::Store(other),
    })?;
    info!(category_id = %category.id, "Category created.");
    Ok(category)
  }

  pub async fn list(&self) -> AppResult<Vec<Category>> {
    Ok(self.categories.list_categories().await?)
  }
}
