//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Head+tail truncation for oversized source text.
/// Keeps the first and last `budget / 2` characters and joins them with
/// `marker`. Text at or under the budget is returned unchanged.
/// Counts characters (not bytes) so multi-byte input is never split.
pub fn truncate_middle(text: &str, budget: usize, marker: &str) -> String {
  let chars: Vec<char> = text.chars().collect();
  if chars.len() <= budget {
    return text.to_string();
  }
  let half = budget / 2;
  let head: String = chars[..half].iter().collect();
  let tail: String = chars[chars.len() - half..].iter().collect();
  format!("{head}{marker}{tail}")
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    s.to_string()
  } else {
    let cut: String = s.chars().take(max).collect();
    format!("{}… ({} bytes total)", cut, s.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_all_pairs() {
    let out = fill_template("make {count} items about {topic}", &[("count", "5"), ("topic", "cells")]);
    assert_eq!(out, "make 5 items about cells");
  }

  #[test]
  fn truncate_middle_is_identity_under_budget() {
    let text = "short source text";
    assert_eq!(truncate_middle(text, 100, "[...]"), text);
  }

  #[test]
  fn truncate_middle_keeps_both_ends() {
    let text = "a".repeat(40) + &"b".repeat(40) + &"c".repeat(40);
    let out = truncate_middle(&text, 40, "[cut]");
    assert!(out.starts_with(&"a".repeat(20)));
    assert!(out.ends_with(&"c".repeat(20)));
    assert!(out.contains("[cut]"));
    assert_eq!(out.chars().count(), 40 + "[cut]".len());
  }

  #[test]
  fn truncate_middle_respects_char_boundaries() {
    let text = "日本語のテキスト".repeat(20);
    let out = truncate_middle(&text, 10, "|");
    assert_eq!(out.chars().count(), 11);
  }
}
