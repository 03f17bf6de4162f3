// marketplace/src/state.rs

use crate::config::AppConfig;
use crate::db::Store;
use crate::services::mailer::Mailer;
use crate::services::{CategoryService, FlashSaleService, ProductService, RecoveryService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub products: Arc<ProductService>,
  pub flash_sales: Arc<FlashSaleService>,
  pub categories: Arc<CategoryService>,
  pub recovery: Arc<RecoveryService>,
}

impl AppState {
  /// Wires every service to the same store handle.
  pub fn from_store<S>(store: Arc<S>, mailer: Arc<dyn Mailer>, config: Arc<AppConfig>) -> Self
  where
    S: Store + 'static,
  {
    let products = ProductService::new(store.clone(), store.clone(), config.product_settings());
    let flash_sales = FlashSaleService::new(store.clone(), store.clone());
    let categories = CategoryService::new(store.clone());
    let recovery = RecoveryService::new(store, mailer, config.recovery_settings());

    Self {
      config,
      products: Arc::new(products),
      flash_sales: Arc::new(flash_sales),
      categories: Arc::new(categories),
      recovery: Arc::new(recovery),
    }
  }
}
