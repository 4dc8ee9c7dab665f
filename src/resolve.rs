//! Index-base detection and list-reference resolution for paired data.
//!
//! Generators reference matching pairs sometimes by 0-based index, sometimes
//! by 1-based position, inconsistently per response. Detection runs once over
//! the whole pair list so the interpretation cannot flip mid-list; resolution
//! then maps each reference to a 0-based index or falls back to treating the
//! raw value as a literal item.

use serde_json::Value;

use crate::coerce::{scalar_to_string, to_number};

/// True iff every numeric value at `position` across the pair tuples fits a
/// 1-based reading of a list of `list_length` items. A single zero anywhere
/// is conclusive evidence of 0-based indexing, so ties default to 0-based.
pub fn detect_one_based_indexing(raw_pairs: &[Value], position: usize, list_length: usize) -> bool {
  if list_length == 0 {
    return false;
  }
  let values: Vec<i64> = raw_pairs
    .iter()
    .filter_map(|entry| entry.as_array())
    .filter(|tuple| tuple.len() > position)
    .filter_map(|tuple| to_number(Some(&tuple[position])))
    .map(|n| n.round() as i64)
    .collect();

  if values.is_empty() {
    return false;
  }
  let has_zero = values.iter().any(|v| *v == 0);
  let all_within_one_based = values.iter().all(|v| *v >= 1 && *v <= list_length as i64);
  all_within_one_based && !has_zero
}

/// Map a single reference to a 0-based index into a list of `list_length`
/// items, honoring the detected index base.
pub fn resolve_list_index(value: Option<&Value>, list_length: usize, prefer_one_based: bool) -> Option<usize> {
  let numeric = to_number(value)?;
  if list_length == 0 {
    return None;
  }
  let rounded = numeric.round() as i64;
  let len = list_length as i64;

  if prefer_one_based && rounded >= 1 && rounded <= len {
    return Some((rounded - 1) as usize);
  }
  if rounded >= 0 && rounded < len {
    return Some(rounded as usize);
  }
  // Last resort: an out-of-range 0-based reading may still be a valid
  // 1-based one.
  if !prefer_one_based && rounded >= 1 && rounded <= len {
    return Some((rounded - 1) as usize);
  }
  None
}

/// Resolve a reference to a list element, or fall back to the raw value as a
/// literal string. Empty literals are discarded.
pub fn resolve_list_value(value: Option<&Value>, values: &[String], prefer_one_based: bool) -> Option<String> {
  if let Some(index) = resolve_list_index(value, values.len(), prefer_one_based) {
    return Some(values[index].clone());
  }
  let text = value.and_then(scalar_to_string)?;
  let trimmed = text.trim();
  if trimmed.is_empty() {
    None
  } else {
    Some(trimmed.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn detects_one_based_when_no_zero_present() {
    let pairs = vec![json!([1, "B"]), json!([2, "A"])];
    assert!(detect_one_based_indexing(&pairs, 0, 2));
  }

  #[test]
  fn lone_zero_is_conclusive_for_zero_based() {
    let pairs = vec![json!([0, 0]), json!([1, 1])];
    assert!(!detect_one_based_indexing(&pairs, 0, 2));
  }

  #[test]
  fn out_of_range_values_disable_one_based() {
    let pairs = vec![json!([1, "x"]), json!([5, "y"])];
    assert!(!detect_one_based_indexing(&pairs, 0, 2));
  }

  #[test]
  fn non_numeric_pairs_default_to_zero_based() {
    let pairs = vec![json!(["Paris", "France"])];
    assert!(!detect_one_based_indexing(&pairs, 0, 3));
    assert!(!detect_one_based_indexing(&[], 0, 3));
    assert!(!detect_one_based_indexing(&pairs, 0, 0));
  }

  #[test]
  fn resolves_with_preferred_base() {
    assert_eq!(resolve_list_index(Some(&json!(1)), 3, true), Some(0));
    assert_eq!(resolve_list_index(Some(&json!(1)), 3, false), Some(1));
    assert_eq!(resolve_list_index(Some(&json!(3)), 3, false), Some(2));
    assert_eq!(resolve_list_index(Some(&json!(7)), 3, false), None);
    assert_eq!(resolve_list_index(Some(&json!("2")), 3, false), Some(2));
    assert_eq!(resolve_list_index(Some(&json!(0)), 0, false), None);
  }

  #[test]
  fn falls_back_to_literal_strings() {
    let values = vec!["alpha".to_string(), "beta".to_string()];
    assert_eq!(resolve_list_value(Some(&json!(1)), &values, false), Some("beta".into()));
    assert_eq!(resolve_list_value(Some(&json!("gamma")), &values, false), Some("gamma".into()));
    assert_eq!(resolve_list_value(Some(&json!("   ")), &values, false), None);
    assert_eq!(resolve_list_value(Some(&json!({"x": 1})), &values, false), None);
  }
}
