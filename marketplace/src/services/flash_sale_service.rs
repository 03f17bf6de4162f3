// marketplace/src/services/flash_sale_service.rs

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::db::{FlashSaleStore, ProductStore, StoreError};
use crate::errors::{AppError, Result as AppResult};
use crate::models::{FlashSaleEntry, FlashSaleListing, NewFlashSaleEntry};

const ALREADY_LISTED_MESSAGE: &str = "Product already added to flash sale";

pub struct FlashSaleService {
  flash_sales: Arc<dyn FlashSaleStore>,
  products: Arc<dyn ProductStore>,
}

impl FlashSaleService {
  pub fn new(flash_sales: Arc<dyn FlashSaleStore>, products: Arc<dyn ProductStore>) -> Self {
    Self { flash_sales, products }
  }

  /// Puts a product on flash sale at `new_price`.
  ///
  /// The duplicate check runs before ownership: a product that already has an
  /// entry is a conflict no matter who asks.
  #[instrument(name = "flash_sale_service::add", skip(self))]
  pub async fn add(&self, vendor_id: Uuid, product_id: Option<Uuid>, new_price: Option<f64>) -> AppResult<FlashSaleEntry> {
    let (product_id, new_price) = match (product_id, new_price) {
      (Some(product_id), Some(new_price)) => (product_id, new_price),
      _ => {
        warn!("Flash sale request is missing product_id or new_price.");
        return Err(AppError::InvalidInput("Please provide required fields".to_string()));
      }
    };
    if !(new_price > 0.0) {
      return Err(AppError::InvalidInput("new_price must be greater than 0".to_string()));
    }

    if let Some(existing) = self.flash_sales.find_flash_sale_by_product(product_id).await? {
      warn!(flash_sale_id = %existing.id, "Product already has a flash sale entry.");
      return Err(AppError::Conflict(ALREADY_LISTED_MESSAGE.to_string()));
    }

    let product = self
      .products
      .find_product(product_id)
      .await?
      .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    if product.vendor_id != vendor_id {
      warn!(owner = %product.vendor_id, "Caller does not own the product.");
      return Err(AppError::Forbidden("You are not the vendor of this product".to_string()));
    }

    let entry = self
      .flash_sales
      .insert_flash_sale(NewFlashSaleEntry {
        product_id,
        vendor_id,
        new_price,
      })
      .await
      .map_err(|err| match err {
        StoreError::UniqueViolation(_) => AppError::Conflict(ALREADY_LISTED_MESSAGE.to_string()),
        StoreError::ForeignKeyViolation(_) => AppError::NotFound("Product not found".to_string()),
        StoreError::CheckViolation(_) => AppError::InvalidInput("new_price must be greater than 0".to_string()),
        other => AppError::Store(other),
      })?;
    info!(flash_sale_id = %entry.id, "Product added to flash sale.");
    Ok(entry)
  }

  /// Takes a product off flash sale. Only the vendor who listed it may do so.
  #[instrument(name = "flash_sale_service::remove", skip(self))]
  pub async fn remove(&self, vendor_id: Uuid, product_id: Uuid) -> AppResult<()> {
    let entry = self
      .flash_sales
      .find_flash_sale_by_product(product_id)
      .await?
      .ok_or_else(|| {
        warn!("No flash sale entry for product.");
        AppError::NotFound("Product not found in flash sale".to_string())
      })?;

    if entry.vendor_id != vendor_id {
      warn!(owner = %entry.vendor_id, "Caller did not create this flash sale entry.");
      return Err(AppError::Forbidden("You are not the vendor of this product".to_string()));
    }

    if !self.flash_sales.delete_flash_sale(entry.id).await? {
      return Err(AppError::NotFound("Product not found in flash sale".to_string()));
    }
    info!(flash_sale_id = %entry.id, "Product removed from flash sale.");
    Ok(())
  }

  #[instrument(name = "flash_sale_service::list", skip(self))]
  pub async fn list(&self) -> AppResult<Vec<FlashSaleListing>> {
    let listings = self.flash_sales.list_flash_sales_with_products().await?;
    debug!(count = listings.len(), "Flash sales fetched.");
    Ok(listings)
  }
}
