//! Total coercions from untrusted JSON values into the primitive shapes the
//! normalizers consume.
//!
//! Everything the model returns goes through these functions; nothing else in
//! the pipeline inspects `Value` shapes ad hoc. All of them are total:
//! garbage maps to empty/None, never to a panic or an error.

use serde_json::Value;

use crate::domain::RawMap;

/// First present, non-null value among the alias keys.
pub fn pick<'a>(record: &'a RawMap, keys: &[&str]) -> Option<&'a Value> {
  keys
    .iter()
    .find_map(|key| record.get(*key).filter(|value| !value.is_null()))
}

/// Object view of a value; anything else becomes an empty map.
pub fn as_record(value: Option<&Value>) -> RawMap {
  match value {
    Some(Value::Object(map)) => map.clone(),
    _ => RawMap::new(),
  }
}

/// String form of a scalar value. Objects, arrays and null yield None.
pub fn scalar_to_string(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}

/// Coerce a value to a list of trimmed, non-empty strings.
/// Arrays map each scalar element; a lone string or number becomes a
/// one-element list; everything else becomes an empty list.
pub fn to_string_array(value: Option<&Value>) -> Vec<String> {
  match value {
    Some(Value::Array(items)) => items
      .iter()
      .filter_map(scalar_to_string)
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty())
      .collect(),
    Some(Value::String(s)) => {
      let trimmed = s.trim();
      if trimmed.is_empty() {
        Vec::new()
      } else {
        vec![trimmed.to_string()]
      }
    }
    Some(Value::Number(n)) => vec![n.to_string()],
    Some(Value::Bool(b)) => vec![b.to_string()],
    _ => Vec::new(),
  }
}

/// Coerce a value to a finite number. Accepts numbers and numeric strings.
pub fn to_number(value: Option<&Value>) -> Option<f64> {
  match value {
    Some(Value::Number(n)) => n.as_f64().filter(|f| f.is_finite()),
    Some(Value::String(s)) => {
      let trimmed = s.trim();
      if trimmed.is_empty() {
        return None;
      }
      trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
    }
    _ => None,
  }
}

/// Coerce a value to a boolean. Accepts booleans, "true"/"false" in any
/// case, and the numbers 1 and 0.
pub fn to_boolean(value: Option<&Value>) -> Option<bool> {
  match value {
    Some(Value::Bool(b)) => Some(*b),
    Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
      "true" => Some(true),
      "false" => Some(false),
      _ => None,
    },
    Some(Value::Number(n)) => match n.as_f64() {
      Some(f) if f == 1.0 => Some(true),
      Some(f) if f == 0.0 => Some(false),
      _ => None,
    },
    _ => None,
  }
}

/// Stable de-duplication preserving first-seen order.
pub fn unique_strings(values: Vec<String>) -> Vec<String> {
  let mut seen = std::collections::HashSet::new();
  let mut result = Vec::with_capacity(values.len());
  for value in values {
    if seen.insert(value.clone()) {
      result.push(value);
    }
  }
  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn string_array_handles_scalars_and_garbage() {
    assert_eq!(to_string_array(Some(&json!(["a", "  b ", "", 3]))), vec!["a", "b", "3"]);
    assert_eq!(to_string_array(Some(&json!("single"))), vec!["single"]);
    assert_eq!(to_string_array(Some(&json!(42))), vec!["42"]);
    assert_eq!(to_string_array(Some(&json!(true))), vec!["true"]);
    assert!(to_string_array(Some(&json!(null))).is_empty());
    assert!(to_string_array(Some(&json!({"a": 1}))).is_empty());
    assert!(to_string_array(None).is_empty());
  }

  #[test]
  fn string_array_is_idempotent_on_string_lists() {
    let input = json!(["alpha", "beta", "gamma"]);
    let once = to_string_array(Some(&input));
    let twice = to_string_array(Some(&serde_json::to_value(&once).unwrap()));
    assert_eq!(once, twice);
  }

  #[test]
  fn number_accepts_numeric_strings_only() {
    assert_eq!(to_number(Some(&json!(2.5))), Some(2.5));
    assert_eq!(to_number(Some(&json!("  7 "))), Some(7.0));
    assert_eq!(to_number(Some(&json!("high"))), None);
    assert_eq!(to_number(Some(&json!(true))), None);
    assert_eq!(to_number(Some(&json!([1]))), None);
  }

  #[test]
  fn boolean_accepts_strings_and_binary_numbers() {
    assert_eq!(to_boolean(Some(&json!("TRUE"))), Some(true));
    assert_eq!(to_boolean(Some(&json!("false"))), Some(false));
    assert_eq!(to_boolean(Some(&json!(1))), Some(true));
    assert_eq!(to_boolean(Some(&json!(0))), Some(false));
    assert_eq!(to_boolean(Some(&json!("yes"))), None);
    assert_eq!(to_boolean(Some(&json!(2))), None);
  }

  #[test]
  fn unique_strings_keeps_first_occurrence() {
    let input = vec!["a".into(), "b".into(), "a".into(), "c".into(), "b".into()];
    assert_eq!(unique_strings(input), vec!["a", "b", "c"]);
  }

  #[test]
  fn pick_skips_missing_and_null_keys() {
    let record = as_record(Some(&json!({"options": null, "choices": ["x"]})));
    let found = pick(&record, &["options", "choices"]).cloned();
    assert_eq!(found, Some(json!(["x"])));
    assert!(pick(&record, &["answers"]).is_none());
  }
}
