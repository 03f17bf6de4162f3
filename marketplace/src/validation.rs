// marketplace/src/validation.rs

//! Rule-based validation of flat request payloads.
//!
//! Rules are declared per field as pipe-delimited strings (`"required|string"`,
//! `"array|min:1"`) and messages per rule name, with `:attribute` replaced by the
//! field name and `:value` by the rule argument:
//!
//! ```
//! use marketplace::validation::validate_data;
//! use serde_json::json;
//!
//! let body = json!({ "name": "", "price": 12.5 });
//! let result = validate_data(
//!   body.as_object().unwrap(),
//!   &[("name", "required|string"), ("price", "required|numeric")],
//!   &[("required", ":attribute is required")],
//! );
//! let errors = result.unwrap_err();
//! assert_eq!(errors.get("name").unwrap(), &vec!["name is required".to_string()]);
//! assert!(errors.get("price").is_none());
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;
use uuid::Uuid;

/// Per-field validation messages. Fields without violations are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
  pub fn single(field: &str, message: impl Into<String>) -> Self {
    let mut errors = Self::default();
    errors.push(field, message);
    errors
  }

  pub fn push(&mut self, field: &str, message: impl Into<String>) {
    self.0.entry(field.to_string()).or_default().push(message.into());
  }

  /// Appends every message from `other`, keeping per-field order.
  pub fn merge(&mut self, other: FieldErrors) {
    for (field, messages) in other.0 {
      self.0.entry(field).or_default().extend(messages);
    }
  }

  pub fn get(&self, field: &str) -> Option<&Vec<String>> {
    self.0.get(field)
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for messages in self.0.values() {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        f.write_str(message)?;
        first = false;
      }
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Rule {
  Required,
  String,
  Array,
  Numeric,
  Integer,
  Uuid,
  Min(f64),
  Gt(f64),
}

impl Rule {
  fn name(&self) -> &'static str {
    match self {
      Rule::Required => "required",
      Rule::String => "string",
      Rule::Array => "array",
      Rule::Numeric => "numeric",
      Rule::Integer => "integer",
      Rule::Uuid => "uuid",
      Rule::Min(_) => "min",
      Rule::Gt(_) => "gt",
    }
  }

  fn argument(&self) -> Option<f64> {
    match self {
      Rule::Min(n) | Rule::Gt(n) => Some(*n),
      _ => None,
    }
  }

  fn default_message(&self) -> &'static str {
    match self {
      Rule::Required => ":attribute is required",
      Rule::String => ":attribute must be a string",
      Rule::Array => ":attribute must be an array",
      Rule::Numeric => ":attribute must be a number",
      Rule::Integer => ":attribute must be an integer",
      Rule::Uuid => ":attribute must be a valid identifier",
      Rule::Min(_) => ":attribute must be at least :value",
      Rule::Gt(_) => ":attribute must be greater than :value",
    }
  }
}

fn parse_rules(field: &str, declared: &str) -> Vec<Rule> {
  declared
    .split('|')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .filter_map(|raw| {
      let (name, arg) = match raw.split_once(':') {
        Some((name, arg)) => (name, Some(arg)),
        None => (raw, None),
      };
      let numeric_arg = arg.and_then(|a| a.trim().parse::<f64>().ok());
      let rule = match (name, numeric_arg) {
        ("required", _) => Some(Rule::Required),
        ("string", _) => Some(Rule::String),
        ("array", _) => Some(Rule::Array),
        ("numeric", _) => Some(Rule::Numeric),
        ("integer", _) => Some(Rule::Integer),
        ("uuid", _) => Some(Rule::Uuid),
        ("min", Some(n)) => Some(Rule::Min(n)),
        ("gt", Some(n)) => Some(Rule::Gt(n)),
        _ => None,
      };
      if rule.is_none() {
        warn!(%field, rule = %raw, "Ignoring unknown or malformed validation rule.");
      }
      rule
    })
    .collect()
}

fn is_empty_value(value: Option<&Value>) -> bool {
  match value {
    None | Some(Value::Null) => true,
    Some(Value::String(s)) => s.is_empty(),
    Some(Value::Array(items)) => items.is_empty(),
    Some(_) => false,
  }
}

/// Returns true when `value` satisfies `rule`. Absent values are handled by the caller.
fn check(rule: Rule, value: &Value, array_context: bool) -> bool {
  match rule {
    Rule::Required => true,
    Rule::String => value.is_string(),
    Rule::Array => value.is_array(),
    Rule::Numeric => value.is_number(),
    Rule::Integer => value.as_i64().is_some(),
    Rule::Uuid => value.as_str().map_or(false, |s| Uuid::parse_str(s).is_ok()),
    Rule::Min(n) => match value {
      Value::Array(items) => (items.len() as f64) >= n,
      // Non-arrays fail a `min` declared alongside `array`; the `array` rule reports why.
      _ if array_context => false,
      Value::String(s) => (s.chars().count() as f64) >= n,
      Value::Number(num) => num.as_f64().map_or(false, |v| v >= n),
      _ => false,
    },
    Rule::Gt(n) => value.as_f64().map_or(false, |v| v > n),
  }
}

fn render(template: &str, field: &str, rule: Rule) -> String {
  let rendered = template.replace(":attribute", field);
  match rule.argument() {
    Some(arg) => rendered.replace(":value", &format_argument(arg)),
    None => rendered,
  }
}

fn format_argument(arg: f64) -> String {
  if arg.fract() == 0.0 {
    format!("{}", arg as i64)
  } else {
    arg.to_string()
  }
}

/// Validates `data` against `rules`, rendering failures with `messages`.
///
/// Only `required` fails on an absent (or `null`) field; every other rule is
/// skipped for absent fields. Messages for one field accumulate in rule order.
pub fn validate_data(
  data: &Map<String, Value>,
  rules: &[(&str, &str)],
  messages: &[(&str, &str)],
) -> Result<(), FieldErrors> {
  let mut errors = FieldErrors::default();

  for (field, declared) in rules {
    let parsed = parse_rules(field, declared);
    let array_context = parsed.contains(&Rule::Array);
    let value = data.get(*field);
    let absent = matches!(value, None | Some(Value::Null));

    for rule in parsed {
      let passed = match (rule, value) {
        (Rule::Required, _) => !is_empty_value(value),
        (_, _) if absent => true,
        (_, Some(v)) => check(rule, v, array_context),
        (_, None) => true,
      };
      if !passed {
        let template = messages
          .iter()
          .find(|(name, _)| *name == rule.name())
          .map(|(_, template)| *template)
          .unwrap_or_else(|| rule.default_message());
        errors.push(field, render(template, field, rule));
      }
    }
  }

  if errors.is_empty() {
    Ok(())
  } else {
    Err(errors)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  const MESSAGES: &[(&str, &str)] = &[("required", ":attribute is required"), ("string", ":attribute must be a string")];

  fn run(body: Value, rules: &[(&str, &str)]) -> Result<(), FieldErrors> {
    validate_data(body.as_object().unwrap(), rules, MESSAGES)
  }

  #[test]
  fn required_rejects_absent_empty_and_null() {
    let errors = run(
      json!({ "b": "", "c": [], "d": null, "e": 0 }),
      &[("a", "required"), ("b", "required"), ("c", "required"), ("d", "required"), ("e", "required")],
    )
    .unwrap_err();
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
    assert_eq!(errors.get("a").unwrap(), &vec!["a is required".to_string()]);
  }

  #[test]
  fn violations_accumulate_per_field() {
    let errors = run(json!({ "name": "" }), &[("name", "string|required|min:3")]).unwrap_err();
    // "" is a string, so only `required` and `min` fail.
    assert_eq!(
      errors.get("name").unwrap(),
      &vec!["name is required".to_string(), "name must be at least 3".to_string()]
    );

    let errors = run(json!({ "name": 7 }), &[("name", "string|required")]).unwrap_err();
    assert_eq!(errors.get("name").unwrap(), &vec!["name must be a string".to_string()]);
  }

  #[test]
  fn optional_rules_skip_absent_fields() {
    assert!(run(json!({}), &[("images", "array|min:1"), ("quantity", "integer|min:0")]).is_ok());
  }

  #[test]
  fn array_min_checks_length() {
    let errors = run(json!({ "images": [] }), &[("images", "array|min:1")]).unwrap_err();
    assert_eq!(errors.get("images").unwrap(), &vec!["images must be at least 1".to_string()]);

    let errors = run(json!({ "images": "a.png" }), &[("images", "array|min:1")]).unwrap_err();
    assert_eq!(errors.get("images").unwrap().len(), 2);

    assert!(run(json!({ "images": ["a.png"] }), &[("images", "array|min:1")]).is_ok());
  }

  #[test]
  fn numeric_min_and_gt() {
    assert!(run(json!({ "quantity": 1 }), &[("quantity", "min:1")]).is_ok());
    assert!(run(json!({ "quantity": 0 }), &[("quantity", "min:1")]).is_err());
    assert!(run(json!({ "quantity": true }), &[("quantity", "min:1")]).is_err());

    assert!(run(json!({ "price": 0.01 }), &[("price", "numeric|gt:0")]).is_ok());
    let errors = run(json!({ "price": 0 }), &[("price", "numeric|gt:0")]).unwrap_err();
    assert_eq!(errors.get("price").unwrap(), &vec!["price must be greater than 0".to_string()]);
  }

  #[test]
  fn integer_and_uuid_rules() {
    assert!(run(json!({ "quantity": 2.5 }), &[("quantity", "integer")]).is_err());
    assert!(run(json!({ "quantity": u64::MAX }), &[("quantity", "integer")]).is_err());
    assert!(run(json!({ "quantity": i64::MAX }), &[("quantity", "integer")]).is_ok());
    assert!(run(json!({ "category_id": "not-a-uuid" }), &[("category_id", "uuid")]).is_err());
    assert!(run(json!({ "category_id": Uuid::new_v4().to_string() }), &[("category_id", "uuid")]).is_ok());
  }

  #[test]
  fn unknown_rules_are_ignored() {
    assert!(run(json!({ "name": "x" }), &[("name", "string|shiny|min:")]).is_ok());
  }

  #[test]
  fn merge_combines_fields() {
    let mut errors = FieldErrors::single("images", "images must be a list");
    let mut more = FieldErrors::single("name", "name is required");
    more.push("images", "images must be at least 1");
    errors.merge(more);
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["images", "name"]);
    assert_eq!(errors.get("images").unwrap().len(), 2);
  }

  #[test]
  fn serializes_as_plain_field_map() {
    let errors = FieldErrors::single("price", "price is required");
    assert_eq!(serde_json::to_value(&errors).unwrap(), json!({ "price": ["price is required"] }));
    assert_eq!(errors.to_string(), "price is required");
  }
}
