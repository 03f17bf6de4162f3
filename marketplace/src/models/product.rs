// marketplace/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Product {
  pub id: Uuid,
  pub vendor_id: Uuid,
  pub name: String,
  pub description: String,
  pub price: f64,
  pub images: Vec<String>, // 1 to 5 references, ordered
  pub category_id: Uuid,
  pub quantity: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A validated product ready to be inserted. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
  pub vendor_id: Uuid,
  pub name: String,
  pub description: String,
  pub price: f64,
  pub images: Vec<String>,
  pub category_id: Uuid,
  pub quantity: i64,
}

/// Partial update applied verbatim: every field that is `Some` overwrites the stored value.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProductPatch {
  pub name: Option<String>,
  pub description: Option<String>,
  pub price: Option<f64>,
  pub images: Option<Vec<String>>,
  pub category_id: Option<Uuid>,
  pub quantity: Option<i64>,
}

impl ProductPatch {
  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }

  /// Applies the patch in place and bumps `updated_at`.
  pub fn apply_to(&self, product: &mut Product, now: DateTime<Utc>) {
    if let Some(name) = &self.name {
      product.name = name.clone();
    }
    if let Some(description) = &self.description {
      product.description = description.clone();
    }
    if let Some(price) = self.price {
      product.price = price;
    }
    if let Some(images) = &self.images {
      product.images = images.clone();
    }
    if let Some(category_id) = self.category_id {
      product.category_id = category_id;
    }
    if let Some(quantity) = self.quantity {
      product.quantity = quantity;
    }
    product.updated_at = now;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn patch_overwrites_only_present_fields() {
    let created = Utc::now();
    let mut product = Product {
      id: Uuid::new_v4(),
      vendor_id: Uuid::new_v4(),
      name: "Widget".into(),
      description: "A widget".into(),
      price: 10.0,
      images: vec!["a.png".into()],
      category_id: Uuid::new_v4(),
      quantity: 3,
      created_at: created,
      updated_at: created,
    };
    let patch: ProductPatch = serde_json::from_value(serde_json::json!({ "price": 12.5, "unknown": true })).unwrap();
    let later = created + chrono::Duration::seconds(5);
    patch.apply_to(&mut product, later);

    assert_eq!(product.price, 12.5);
    assert_eq!(product.name, "Widget");
    assert_eq!(product.quantity, 3);
    assert_eq!(product.updated_at, later);
    assert!(ProductPatch::default().is_empty());
    assert!(!patch.is_empty());
  }
}
