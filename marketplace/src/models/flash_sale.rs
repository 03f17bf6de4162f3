// marketplace/src/models/flash_sale.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::product::Product;

/// A discounted-price override attached to exactly one product.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct FlashSaleEntry {
  pub id: Uuid,
  pub product_id: Uuid,
  pub vendor_id: Uuid,
  pub new_price: f64,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFlashSaleEntry {
  pub product_id: Uuid,
  pub vendor_id: Uuid,
  pub new_price: f64,
}

/// An entry together with the product it discounts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FlashSaleListing {
  pub id: Uuid,
  pub vendor_id: Uuid,
  pub new_price: f64,
  pub created_at: DateTime<Utc>,
  pub product: Product,
}

impl FlashSaleListing {
  pub fn new(entry: FlashSaleEntry, product: Product) -> Self {
    Self {
      id: entry.id,
      vendor_id: entry.vendor_id,
      new_price: entry.new_price,
      created_at: entry.created_at,
      product,
    }
  }
}
