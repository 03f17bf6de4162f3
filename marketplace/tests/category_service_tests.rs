// tests/category_service_tests.rs
mod common;
use common::*;
use marketplace::errors::AppError;

#[tokio::test]
async fn create_and_list_sorted_by_name() {
  let fx = Fixture::new().await;
  let service = fx.category_service();
  service.create("Books").await.unwrap();
  service.create("  Toys ").await.unwrap();

  let names: Vec<_> = service.list().await.unwrap().into_iter().map(|c| c.name).collect();
  assert_eq!(names, vec!["Books", "Electronics", "Toys"]);
}

#[tokio::test]
async fn duplicate_names_conflict_ignoring_case() {
  let fx = Fixture::new().await;
  let err = fx.category_service().create("electronics").await.unwrap_err();
  assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn blank_name_is_a_validation_error() {
  let fx = Fixture::new().await;
  let err = fx.category_service().create("   ").await.unwrap_err();
  assert!(matches!(err, AppError::Validation(ref e) if e.get("name").is_some()));
}
