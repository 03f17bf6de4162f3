// marketplace/src/web/handlers/category_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::auth::AuthenticatedAdmin;
use crate::web::response::ApiResponse;

#[derive(Deserialize, Debug)]
pub struct CreateCategoryPayload {
  #[serde(default)]
  pub name: String,
}

#[instrument(name = "handler::create_category", skip(app_state, payload, admin), fields(admin_id = %admin.admin_id))]
pub async fn create_category_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateCategoryPayload>,
  admin: AuthenticatedAdmin,
) -> Result<HttpResponse, AppError> {
  let category = app_state.categories.create(&payload.name).await?;
  Ok(HttpResponse::Created().json(ApiResponse::success("Category created successfully", category)))
}

pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = app_state.categories.list().await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success("Categories fetched successfully", categories)))
}
