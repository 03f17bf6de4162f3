// tests/flash_sale_service_tests.rs
mod common;
use common::*;
use marketplace::errors::AppError;
use marketplace::models::Product;
use uuid::Uuid;

async fn product_for(fx: &Fixture, vendor: Uuid, name: &str) -> Product {
  fx.product_service()
    .create(vendor, &fx.product_fields(name), vec![])
    .await
    .unwrap()
}

#[tokio::test]
async fn owner_can_add_and_listing_embeds_the_product() {
  let fx = Fixture::new().await;
  let vendor = new_vendor();
  let product = product_for(&fx, vendor, "Lamp").await;
  let service = fx.flash_sale_service();

  let entry = service.add(vendor, Some(product.id), Some(19.99)).await.unwrap();
  assert_eq!(entry.product_id, product.id);
  assert_eq!(entry.vendor_id, vendor);
  assert_eq!(entry.new_price, 19.99);

  let listings = service.list().await.unwrap();
  assert_eq!(listings.len(), 1);
  assert_eq!(listings[0].id, entry.id);
  assert_eq!(listings[0].product, product);
}

#[tokio::test]
async fn missing_fields_or_bad_price_are_invalid_input() {
  let fx = Fixture::new().await;
  let vendor = new_vendor();
  let product = product_for(&fx, vendor, "Lamp").await;
  let service = fx.flash_sale_service();

  assert!(matches!(service.add(vendor, None, Some(5.0)).await, Err(AppError::InvalidInput(_))));
  assert!(matches!(service.add(vendor, Some(product.id), None).await, Err(AppError::InvalidInput(_))));
  assert!(matches!(
    service.add(vendor, Some(product.id), Some(0.0)).await,
    Err(AppError::InvalidInput(_))
  ));
  assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn second_add_conflicts_whoever_asks() {
  let fx = Fixture::new().await;
  let owner = new_vendor();
  let product = product_for(&fx, owner, "Lamp").await;
  let service = fx.flash_sale_service();
  service.add(owner, Some(product.id), Some(10.0)).await.unwrap();

  let err = service.add(owner, Some(product.id), Some(8.0)).await.unwrap_err();
  assert!(matches!(err, AppError::Conflict(_)));

  let err = service.add(new_vendor(), Some(product.id), Some(8.0)).await.unwrap_err();
  assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn add_for_someone_elses_product_is_forbidden() {
  let fx = Fixture::new().await;
  let product = product_for(&fx, new_vendor(), "Lamp").await;

  let err = fx
    .flash_sale_service()
    .add(new_vendor(), Some(product.id), Some(10.0))
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn add_for_unknown_product_is_not_found() {
  let fx = Fixture::new().await;
  let err = fx
    .flash_sale_service()
    .add(new_vendor(), Some(Uuid::new_v4()), Some(10.0))
    .await
    .unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn remove_checks_ownership_then_deletes() {
  let fx = Fixture::new().await;
  let owner = new_vendor();
  let product = product_for(&fx, owner, "Lamp").await;
  let service = fx.flash_sale_service();
  service.add(owner, Some(product.id), Some(10.0)).await.unwrap();

  let err = service.remove(new_vendor(), product.id).await.unwrap_err();
  assert!(matches!(err, AppError::Forbidden(_)));
  assert_eq!(service.list().await.unwrap().len(), 1);

  service.remove(owner, product.id).await.unwrap();
  assert!(service.list().await.unwrap().is_empty());

  let err = service.remove(owner, product.id).await.unwrap_err();
  assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn deleting_the_product_removes_its_flash_sale() {
  let fx = Fixture::new().await;
  let owner = new_vendor();
  let product = product_for(&fx, owner, "Lamp").await;
  let flash_sales = fx.flash_sale_service();
  flash_sales.add(owner, Some(product.id), Some(10.0)).await.unwrap();

  fx.product_service().delete(owner, product.id).await.unwrap();
  assert!(flash_sales.list().await.unwrap().is_empty());
}
