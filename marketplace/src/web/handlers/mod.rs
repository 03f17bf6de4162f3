// marketplace/src/web/handlers/mod.rs

pub mod category_handlers;
pub mod flash_sale_handlers;
pub mod product_handlers;
pub mod recovery_handlers;
