// marketplace/src/services/mod.rs

pub mod account_service;
pub mod auth_service;
pub mod category_service;
pub mod flash_sale_service;
pub mod mailer;
pub mod product_service;
pub mod recovery_service;

pub use category_service::CategoryService;
pub use flash_sale_service::FlashSaleService;
pub use product_service::{ProductService, ProductSettings};
pub use recovery_service::{RecoveryService, RecoverySettings};
