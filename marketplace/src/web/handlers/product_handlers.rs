// marketplace/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::ProductPatch;
use crate::services::product_service::validate_product_fields;
use crate::state::AppState;
use crate::validation::FieldErrors;
use crate::web::auth::AuthenticatedVendor;
use crate::web::response::ApiResponse;

#[derive(Deserialize, Debug)]
pub struct AddImagePayload {
  pub image: String,
}

const MALFORMED_IMAGES: &str = "images must be a list of image references";

/// Pulls the uploaded image references out of the submitted body.
fn take_image_refs(body: &mut Map<String, Value>) -> Result<Vec<String>, FieldErrors> {
  match body.remove("images") {
    None | Some(Value::Null) => Ok(Vec::new()),
    Some(Value::Array(items)) => items
      .into_iter()
      .map(|item| match item {
        Value::String(image_ref) if !image_ref.trim().is_empty() => Ok(image_ref),
        _ => Err(FieldErrors::single("images", MALFORMED_IMAGES)),
      })
      .collect(),
    Some(_) => Err(FieldErrors::single("images", MALFORMED_IMAGES)),
  }
}

#[instrument(
  name = "handler::create_product",
  skip(app_state, body, vendor),
  fields(vendor_id = %vendor.vendor_id)
)]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  body: web::Json<Map<String, Value>>,
  vendor: AuthenticatedVendor,
) -> Result<HttpResponse, AppError> {
  let mut fields = body.into_inner();
  let image_refs = match take_image_refs(&mut fields) {
    Ok(image_refs) => image_refs,
    Err(mut errors) => {
      // Report the remaining fields too, not just the images.
      if let Err(field_errors) = validate_product_fields(&fields) {
        errors.merge(field_errors);
      }
      warn!(invalid_fields = %errors.fields().collect::<Vec<_>>().join(","), "Product submission rejected.");
      return Err(AppError::Validation(errors));
    }
  };

  let product = app_state
    .products
    .create(vendor.vendor_id, &fields, image_refs)
    .await?;
  info!(product_id = %product.id, "Product created.");

  Ok(HttpResponse::Created().json(ApiResponse::success("Product created successfully", product)))
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.products.list().await?;
  info!("Successfully fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(ApiResponse::success("Products fetched successfully", products)))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.products.get_by_id(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success("Product fetched successfully", product)))
}

#[instrument(
  name = "handler::update_product",
  skip(app_state, path, patch, vendor),
  fields(product_id = %path.as_ref(), vendor_id = %vendor.vendor_id)
)]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  patch: web::Json<ProductPatch>,
  vendor: AuthenticatedVendor,
) -> Result<HttpResponse, AppError> {
  let patch = patch.into_inner();
  if patch.is_empty() {
    warn!("Update request carried no fields.");
    return Err(AppError::InvalidInput("No fields to update".to_string()));
  }

  let product = app_state
    .products
    .update(vendor.vendor_id, path.into_inner(), patch)
    .await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success("Product updated successfully", product)))
}

#[instrument(
  name = "handler::delete_product",
  skip(app_state, path, vendor),
  fields(product_id = %path.as_ref(), vendor_id = %vendor.vendor_id)
)]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  vendor: AuthenticatedVendor,
) -> Result<HttpResponse, AppError> {
  app_state.products.delete(vendor.vendor_id, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::message("Product deleted successfully")))
}

#[instrument(
  name = "handler::add_product_image",
  skip(app_state, path, payload, vendor),
  fields(product_id = %path.as_ref(), vendor_id = %vendor.vendor_id)
)]
pub async fn add_product_image_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<AddImagePayload>,
  vendor: AuthenticatedVendor,
) -> Result<HttpResponse, AppError> {
  let product = app_state
    .products
    .add_image(vendor.vendor_id, path.into_inner(), &payload.image)
    .await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success("Image added successfully", product)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn body(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
  }

  #[test]
  fn image_refs_are_taken_out_of_the_body() {
    let mut fields = body(json!({ "name": "Lamp", "images": ["a.png", "b.png"] }));
    let refs = take_image_refs(&mut fields).unwrap();
    assert_eq!(refs, vec!["a.png", "b.png"]);
    assert!(!fields.contains_key("images"));
  }

  #[test]
  fn missing_images_mean_none_uploaded() {
    let mut fields = body(json!({ "name": "Lamp" }));
    assert!(take_image_refs(&mut fields).unwrap().is_empty());
  }

  #[test]
  fn non_string_images_are_rejected() {
    let mut fields = body(json!({ "images": [1, 2] }));
    let errors = take_image_refs(&mut fields).unwrap_err();
    assert_eq!(errors.get("images").unwrap(), &vec![MALFORMED_IMAGES.to_string()]);
  }
}
