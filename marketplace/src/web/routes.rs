// marketplace/src/web/routes.rs

use actix_web::{error::JsonPayloadError, error::PathError, web, HttpRequest, HttpResponse};
use tracing::warn;

use crate::errors::AppError;
use crate::web::handlers::{category_handlers, flash_sale_handlers, product_handlers, recovery_handlers};
use crate::web::response::ApiResponse;

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(ApiResponse::message("ok"))
}

// Malformed bodies and ids get the same envelope as every other error.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  warn!(error = %err, "Rejected malformed JSON body.");
  AppError::InvalidInput(format!("Invalid request body: {}", err)).into()
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
  warn!(error = %err, "Rejected malformed path parameter.");
  AppError::InvalidInput("Invalid identifier in path".to_string()).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::PathConfig::default().error_handler(path_error_handler))
    .service(
      web::scope("/api/v1")
        .route("/health", web::get().to(health_check_handler))
        .service(
          web::scope("/auth")
            .route(
              "/forgot-password",
              web::post().to(recovery_handlers::forgot_password_handler),
            )
            .route(
              "/reset-password",
              web::post().to(recovery_handlers::reset_password_handler),
            ),
        )
        .service(
          web::scope("/products")
            .route("", web::get().to(product_handlers::list_products_handler))
            .route("", web::post().to(product_handlers::create_product_handler))
            .route("/{product_id}", web::get().to(product_handlers::get_product_handler))
            .route("/{product_id}", web::put().to(product_handlers::update_product_handler))
            .route("/{product_id}", web::delete().to(product_handlers::delete_product_handler))
            .route(
              "/{product_id}/images",
              web::post().to(product_handlers::add_product_image_handler),
            ),
        )
        .service(
          web::scope("/categories")
            .route("", web::get().to(category_handlers::list_categories_handler))
            .route("", web::post().to(category_handlers::create_category_handler)),
        )
        .service(
          web::scope("/flash-sales")
            .route("", web::get().to(flash_sale_handlers::list_flash_sales_handler))
            .route("", web::post().to(flash_sale_handlers::add_flash_sale_handler))
            .route(
              "/{product_id}",
              web::delete().to(flash_sale_handlers::remove_flash_sale_handler),
            ),
        ),
    );
}
