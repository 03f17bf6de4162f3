// marketplace/src/services/product_service.rs

//! Vendor product lifecycle: validation, category lookup, per-vendor name
//! uniqueness and image limits in front of the product store.

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::db::{CategoryStore, ProductStore, StoreError};
use crate::errors::{AppError, Result as AppResult};
use crate::models::{NewProduct, Product, ProductPatch};
use crate::validation::{validate_data, FieldErrors};

pub const MAX_PRODUCT_IMAGES: usize = 5;
pub const DEFAULT_PRODUCT_IMAGE_URL: &str = "https://pic.onlinewebfonts.com/thumbnails/icons_90947.svg";

const CREATE_RULES: &[(&str, &str)] = &[
  ("name", "string|required"),
  ("description", "string|required"),
  ("price", "required|numeric|gt:0"),
  ("images", "array|min:1"),
  ("category_id", "required|uuid"),
  ("quantity", "integer|min:0"),
];

const CREATE_MESSAGES: &[(&str, &str)] = &[
  ("required", ":attribute is required"),
  ("string", ":attribute must be a string"),
  ("numeric", ":attribute must be a number"),
];

const DUPLICATE_NAME_MESSAGE: &str = "You already have a product with same name";
const NOT_OWNER_MESSAGE: &str = "You are not the vendor of this product";

#[derive(Debug, Clone)]
pub struct ProductSettings {
  pub default_image_url: String,
  pub max_images: usize,
}

impl Default for ProductSettings {
  fn default() -> Self {
    Self {
      default_image_url: DEFAULT_PRODUCT_IMAGE_URL.to_string(),
      max_images: MAX_PRODUCT_IMAGES,
    }
  }
}

pub struct ProductService {
  products: Arc<dyn ProductStore>,
  categories: Arc<dyn CategoryStore>,
  settings: ProductSettings,
}

impl ProductService {
  pub fn new(products: Arc<dyn ProductStore>, categories: Arc<dyn CategoryStore>, settings: ProductSettings) -> Self {
    Self {
      products,
      categories,
      settings,
    }
  }

  pub fn settings(&self) -> &ProductSettings {
    &self.settings
  }

  /// Creates a product owned by `vendor_id`.
  ///
  /// `fields` is the flat submitted payload; `uploaded_image_refs` are the
  /// references produced by the upload step, in order.
  #[instrument(
    name = "product_service::create",
    skip(self, fields, uploaded_image_refs),
    fields(%vendor_id, uploaded_images = uploaded_image_refs.len())
  )]
  pub async fn create(
    &self,
    vendor_id: Uuid,
    fields: &Map<String, Value>,
    uploaded_image_refs: Vec<String>,
  ) -> AppResult<Product> {
    validate_product_fields(fields).map_err(|errors| {
      warn!(invalid_fields = %errors.fields().collect::<Vec<_>>().join(","), "Product input failed validation.");
      AppError::Validation(errors)
    })?;
    let category_id = parse_category_id(fields)?;
    let name = string_field(fields, "name");

    self.ensure_category_exists(category_id).await?;
    self.ensure_name_available(vendor_id, &name).await?;
    let images = self.resolve_images(uploaded_image_refs)?;

    let new_product = NewProduct {
      vendor_id,
      name,
      description: string_field(fields, "description"),
      price: fields.get("price").and_then(Value::as_f64).unwrap_or_default(),
      images,
      category_id,
      quantity: fields.get("quantity").and_then(Value::as_i64).unwrap_or(0),
    };

    let product = self
      .products
      .insert_product(new_product)
      .await
      .map_err(|e| map_write_error(e, DUPLICATE_NAME_MESSAGE))?;
    info!(product_id = %product.id, "Product created successfully.");
    Ok(product)
  }

  #[instrument(name = "product_service::list", skip(self))]
  pub async fn list(&self) -> AppResult<Vec<Product>> {
    let products = self.products.list_products().await?;
    debug!(count = products.len(), "Products fetched.");
    Ok(products)
  }

  #[instrument(name = "product_service::get_by_id", skip(self))]
  pub async fn get_by_id(&self, id: Uuid) -> AppResult<Product> {
    self.load(id).await
  }

  /// Applies `patch` verbatim once the caller is confirmed as the owner.
  #[instrument(name = "product_service::update", skip(self, patch))]
  pub async fn update(&self, vendor_id: Uuid, id: Uuid, patch: ProductPatch) -> AppResult<Product> {
    let existing = self.load(id).await?;
    ensure_owner(&existing, vendor_id)?;

    let updated = self
      .products
      .update_product(id, &patch)
      .await
      .map_err(|e| map_write_error(e, DUPLICATE_NAME_MESSAGE))?
      .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    info!(product_id = %id, "Product updated.");
    Ok(updated)
  }

  #[instrument(name = "product_service::delete", skip(self))]
  pub async fn delete(&self, vendor_id: Uuid, id: Uuid) -> AppResult<()> {
    let existing = self.load(id).await?;
    ensure_owner(&existing, vendor_id)?;

    if !self.products.delete_product(id).await? {
      return Err(AppError::NotFound("Product not found".to_string()));
    }
    info!(product_id = %id, "Product deleted.");
    Ok(())
  }

  /// Attaches one more image. A product still showing only the placeholder gets it replaced.
  #[instrument(name = "product_service::add_image", skip(self, image_ref))]
  pub async fn add_image(&self, vendor_id: Uuid, id: Uuid, image_ref: &str) -> AppResult<Product> {
    let image_ref = image_ref.trim();
    if image_ref.is_empty() {
      return Err(AppError::InvalidInput("Image reference is required".to_string()));
    }
    let existing = self.load(id).await?;
    ensure_owner(&existing, vendor_id)?;

    let mut images = if existing.images == [self.settings.default_image_url.as_str()] {
      Vec::new()
    } else {
      existing.images
    };
    images.push(image_ref.to_string());
    if images.len() > self.settings.max_images {
      warn!(count = images.len(), "Image limit exceeded.");
      return Err(self.too_many_images());
    }

    let patch = ProductPatch {
      images: Some(images),
      ..ProductPatch::default()
    };
    let updated = self
      .products
      .update_product(id, &patch)
      .await?
      .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    info!(product_id = %id, image_count = updated.images.len(), "Product image added.");
    Ok(updated)
  }

  async fn load(&self, id: Uuid) -> AppResult<Product> {
    self.products.find_product(id).await?.ok_or_else(|| {
      warn!(product_id = %id, "Product not found.");
      AppError::NotFound("Product not found".to_string())
    })
  }

  async fn ensure_category_exists(&self, category_id: Uuid) -> AppResult<()> {
    match self.categories.find_category(category_id).await? {
      Some(_) => Ok(()),
      None => {
        warn!(%category_id, "Referenced category does not exist.");
        Err(AppError::NotFound("Category not found".to_string()))
      }
    }
  }

  async fn ensure_name_available(&self, vendor_id: Uuid, name: &str) -> AppResult<()> {
    match self.products.find_product_by_vendor_and_name(vendor_id, name).await? {
      Some(existing) => {
        warn!(existing_product_id = %existing.id, "Vendor already has a product with this name.");
        Err(AppError::Conflict(DUPLICATE_NAME_MESSAGE.to_string()))
      }
      None => Ok(()),
    }
  }

  fn resolve_images(&self, uploaded: Vec<String>) -> AppResult<Vec<String>> {
    if uploaded.is_empty() {
      return Ok(vec![self.settings.default_image_url.clone()]);
    }
    if uploaded.len() > self.settings.max_images {
      warn!(count = uploaded.len(), "Too many images uploaded.");
      return Err(self.too_many_images());
    }
    Ok(uploaded)
  }

  fn too_many_images(&self) -> AppError {
    AppError::InvalidInput(format!(
      "You can upload a maximum of {} images",
      self.settings.max_images
    ))
  }
}

/// Checks a product submission against the create rules.
pub fn validate_product_fields(fields: &Map<String, Value>) -> Result<(), FieldErrors> {
  validate_data(fields, CREATE_RULES, CREATE_MESSAGES)
}

fn ensure_owner(product: &Product, vendor_id: Uuid) -> AppResult<()> {
  if product.vendor_id != vendor_id {
    warn!(product_id = %product.id, owner = %product.vendor_id, caller = %vendor_id, "Ownership check failed.");
    return Err(AppError::Forbidden(NOT_OWNER_MESSAGE.to_string()));
  }
  Ok(())
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
  fields.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn parse_category_id(fields: &Map<String, Value>) -> AppResult<Uuid> {
  fields
    .get("category_id")
    .and_then(Value::as_str)
    .and_then(|raw| Uuid::parse_str(raw).ok())
    .ok_or_else(|| AppError::field("category_id", "category_id must be a valid identifier"))
}

fn map_write_error(err: StoreError, conflict_message: &str) -> AppError {
  match err {
    StoreError::UniqueViolation(constraint) => {
      warn!(%constraint, "Store rejected duplicate product.");
      AppError::Conflict(conflict_message.to_string())
    }
    StoreError::ForeignKeyViolation(_) => AppError::NotFound("Category not found".to_string()),
    StoreError::CheckViolation(constraint) => {
      let message = match constraint.as_str() {
        "products_price_check" => "price must be greater than 0".to_string(),
        "products_quantity_check" => "quantity must not be negative".to_string(),
        "products_images_check" => format!("A product must have between 1 and {} images", MAX_PRODUCT_IMAGES),
        _ => "Product violates a store constraint".to_string(),
      };
      warn!(%constraint, "Store rejected product values.");
      AppError::InvalidInput(message)
    }
    other => AppError::Store(other),
  }
}
