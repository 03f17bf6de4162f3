// marketplace/src/web/response.rs

use serde::Serialize;
use serde_json::Value;

/// Envelope for every JSON body the API returns.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize = Value> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<T>,
}

impl ApiResponse {
  pub fn failure(message: impl Into<String>) -> Self {
    Self {
      success: false,
      message: Some(message.into()),
      data: None,
    }
  }

  pub fn failure_with_data(message: impl Into<String>, data: &impl Serialize) -> Self {
    Self {
      success: false,
      message: Some(message.into()),
      data: serde_json::to_value(data).ok(),
    }
  }

  pub fn message(message: impl Into<String>) -> Self {
    Self {
      success: true,
      message: Some(message.into()),
      data: None,
    }
  }
}

impl<T: Serialize> ApiResponse<T> {
  pub fn success(message: impl Into<String>, data: T) -> Self {
    Self {
      success: true,
      message: Some(message.into()),
      data: Some(data),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn absent_fields_are_omitted() {
    let body = serde_json::to_value(ApiResponse::message("Deleted")).unwrap();
    assert_eq!(body, json!({ "success": true, "message": "Deleted" }));
  }

  #[test]
  fn success_wraps_data() {
    let body = serde_json::to_value(ApiResponse::success("ok", vec![1, 2])).unwrap();
    assert_eq!(body["data"], json!([1, 2]));
    assert_eq!(body["success"], true);
  }
}
