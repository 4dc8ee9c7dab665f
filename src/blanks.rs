//! `{{id}}` placeholder handling for fill-in-the-blank templates.
//!
//! Templates reference blanks as `{{some_id}}`. Generators also emit a
//! generic unscoped form, `{{blank}}`, repeated once per gap; those are
//! mapped onto the defined blank ids in order (or synthesized as `blank_0`,
//! `blank_1`, ...) so every placeholder ends up id-qualified.

use regex::Regex;

fn placeholder_regex() -> Regex {
  Regex::new(r"\{\{([^}]+)\}\}").unwrap()
}

fn generic_blank_regex() -> Regex {
  Regex::new(r"(?i)\{\{\s*blank\s*\}\}").unwrap()
}

/// Ordered, de-duplicated blank ids referenced by a template.
/// Generic `{{blank}}` occurrences take the next defined id, falling back to
/// a synthesized sequential id.
pub fn extract_blank_ids(template: &str, defined_ids: &[String]) -> Vec<String> {
  let mut seen = std::collections::HashSet::new();
  let mut ordered = Vec::new();
  let mut sequential = 0usize;

  for captures in placeholder_regex().captures_iter(template) {
    let token = captures[1].trim().to_string();
    let id = if token.eq_ignore_ascii_case("blank") {
      let mapped = defined_ids
        .get(sequential)
        .cloned()
        .unwrap_or_else(|| format!("blank_{sequential}"));
      sequential += 1;
      mapped
    } else if token.is_empty() {
      continue;
    } else {
      token
    };
    if seen.insert(id.clone()) {
      ordered.push(id);
    }
  }
  ordered
}

/// Rewrite generic `{{blank}}` placeholders into the id-qualified form, one
/// id per occurrence in order.
pub fn rewrite_generic_placeholders(template: &str, blank_ids: &[String]) -> String {
  let mut index = 0usize;
  generic_blank_regex()
    .replace_all(template, |_caps: &regex::Captures| {
      let id = blank_ids
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("blank_{index}"));
      index += 1;
      format!("{{{{{id}}}}}")
    })
    .into_owned()
}
