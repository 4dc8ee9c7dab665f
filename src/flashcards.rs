//! Flashcard-candidate normalization.
//!
//! Much simpler than questions: each side is resolved from a priority list
//! of alias field names and a candidate is dropped entirely when either side
//! comes out empty. Duplicates are left alone; they are a content-quality
//! concern, not a correctness one.

use serde_json::Value;

use crate::coerce::scalar_to_string;
use crate::domain::{GeneratedFlashcard, RawMap};

const FRONT_KEYS: &[&str] = &["front", "question", "prompt", "term", "title"];
const BACK_KEYS: &[&str] = &["back", "answer", "definition", "explanation", "description"];

pub fn normalize_flashcards(candidates: &[Value]) -> Vec<GeneratedFlashcard> {
  candidates.iter().filter_map(normalize_flashcard).collect()
}

fn normalize_flashcard(candidate: &Value) -> Option<GeneratedFlashcard> {
  let record = candidate.as_object()?;
  let front = first_text(record, FRONT_KEYS)?;
  let back = first_text(record, BACK_KEYS)?;
  Some(GeneratedFlashcard { front, back })
}

/// First alias key whose value is a non-empty string after trimming.
fn first_text(record: &RawMap, keys: &[&str]) -> Option<String> {
  keys.iter().find_map(|key| {
    record
      .get(*key)
      .and_then(scalar_to_string)
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty())
  })
}
