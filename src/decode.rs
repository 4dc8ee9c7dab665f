//! Resilient decoding of raw model responses.
//!
//! Generators frequently wrap valid JSON in prose ("Sure! Here is the
//! JSON: ...") or truncate trailing content. Direct parsing is tried first;
//! after that we slice between the outermost braces/brackets and try again.
//! Decoding never fails loudly: an unrecoverable response is `None`, which
//! the orchestrators treat as zero candidates.

use serde_json::Value;
use tracing::debug;

/// Best-effort parse of a response string into a JSON value.
pub fn decode_lenient(text: &str) -> Option<Value> {
  let trimmed = text.trim();
  if trimmed.is_empty() {
    return None;
  }
  if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
    return Some(value);
  }
  if let Some(value) = slice_between(trimmed, '{', '}') {
    return Some(value);
  }
  let fallback = slice_between(trimmed, '[', ']');
  if fallback.is_none() {
    debug!(target: "generator", len = trimmed.len(), "response not recoverable as JSON");
  }
  fallback
}

fn slice_between(text: &str, open: char, close: char) -> Option<Value> {
  let start = text.find(open)?;
  let end = text.rfind(close)?;
  if end <= start {
    return None;
  }
  serde_json::from_str(&text[start..=end]).ok()
}

/// Find the actual list of items inside an arbitrarily-shaped value.
///
/// Shallow: a bare array is returned as-is, and on an object the first
/// candidate key holding an array wins. Deep: failing that, property values
/// are scanned depth-first and the first array anywhere in the payload is
/// returned. An empty list means no array exists at all.
pub fn locate_array(value: &Value, candidate_keys: &[&str]) -> Vec<Value> {
  if let Value::Array(items) = value {
    return items.clone();
  }
  if let Value::Object(map) = value {
    for key in candidate_keys {
      if let Some(Value::Array(items)) = map.get(*key) {
        return items.clone();
      }
    }
    if let Some(items) = first_array_deep(value) {
      return items;
    }
  }
  Vec::new()
}

fn first_array_deep(value: &Value) -> Option<Vec<Value>> {
  let map = value.as_object()?;
  for nested in map.values() {
    if let Value::Array(items) = nested {
      return Some(items.clone());
    }
  }
  for nested in map.values() {
    if nested.is_object() {
      if let Some(found) = first_array_deep(nested) {
        return Some(found);
      }
    }
  }
  None
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn decodes_plain_json() {
    let value = decode_lenient(r#"{"questions": []}"#).expect("value");
    assert_eq!(value, json!({"questions": []}));
  }

  #[test]
  fn recovers_json_wrapped_in_prose() {
    let text = r#"Sure! Here is the JSON: {"questions":[{"question":"Q1"}]} Hope that helps."#;
    let value = decode_lenient(text).expect("value");
    let items = locate_array(&value, &["questions"]);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0], json!({"question": "Q1"}));
  }

  #[test]
  fn recovers_bare_array_in_prose() {
    let value = decode_lenient(r#"here you go: [1, 2, 3] enjoy"#).expect("value");
    assert_eq!(value, json!([1, 2, 3]));
  }

  #[test]
  fn refuses_plain_prose() {
    assert!(decode_lenient("I cannot help with that.").is_none());
    assert!(decode_lenient("").is_none());
    assert!(decode_lenient("{not json at all").is_none());
  }

  #[test]
  fn locates_array_under_candidate_key() {
    let value = json!({"flashcards": [{"front": "a"}], "meta": 1});
    assert_eq!(locate_array(&value, &["cards", "flashcards"]).len(), 1);
  }

  #[test]
  fn locates_nested_array_depth_first() {
    let value = json!({"data": {"inner": {"questions": [1, 2]}}});
    assert_eq!(locate_array(&value, &["questions"]), vec![json!(1), json!(2)]);
  }

  #[test]
  fn missing_array_yields_empty() {
    let value = json!({"message": "nothing here", "count": 3});
    assert!(locate_array(&value, &["questions"]).is_empty());
  }
}
