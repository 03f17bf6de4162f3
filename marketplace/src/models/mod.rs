// marketplace/src/models/mod.rs

//! Records persisted by the store and returned by the API.

pub mod category;
pub mod flash_sale;
pub mod product;
pub mod user;

pub use category::Category;
pub use flash_sale::{FlashSaleEntry, FlashSaleListing, NewFlashSaleEntry};
pub use product::{NewProduct, Product, ProductPatch};
pub use user::{NewUser, User, UserRole};
