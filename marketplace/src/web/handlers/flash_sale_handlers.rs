// marketplace/src/web/handlers/flash_sale_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::auth::AuthenticatedVendor;
use crate::web::response::ApiResponse;

#[derive(Deserialize, Debug)]
pub struct AddFlashSalePayload {
  pub product_id: Option<Uuid>,
  pub new_price: Option<f64>,
}

#[instrument(
  name = "handler::add_flash_sale",
  skip(app_state, payload, vendor),
  fields(vendor_id = %vendor.vendor_id, product_id = ?payload.product_id)
)]
pub async fn add_flash_sale_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<AddFlashSalePayload>,
  vendor: AuthenticatedVendor,
) -> Result<HttpResponse, AppError> {
  let AddFlashSalePayload { product_id, new_price } = payload.into_inner();
  let entry = app_state.flash_sales.add(vendor.vendor_id, product_id, new_price).await?;
  info!(flash_sale_id = %entry.id, "Flash sale entry created.");
  Ok(HttpResponse::Created().json(ApiResponse::success("Product added to flash sale", entry)))
}

#[instrument(
  name = "handler::remove_flash_sale",
  skip(app_state, path, vendor),
  fields(product_id = %path.as_ref(), vendor_id = %vendor.vendor_id)
)]
pub async fn remove_flash_sale_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  vendor: AuthenticatedVendor,
) -> Result<HttpResponse, AppError> {
  app_state.flash_sales.remove(vendor.vendor_id, path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::message("Product removed from flash sale")))
}

#[instrument(name = "handler::list_flash_sales", skip(app_state))]
pub async fn list_flash_sales_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let listings = app_state.flash_sales.list().await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success("Flash sales fetched successfully", listings)))
}
