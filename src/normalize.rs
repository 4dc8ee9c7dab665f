//! Question-candidate normalization: one dispatcher, eight variant
//! normalizers.
//!
//! Candidates arrive as arbitrary JSON maps with inconsistent field names,
//! mixed index bases and half-empty payloads. Normalization is total and
//! best-effort: every defect except an empty question text is repaired with
//! defaults rather than rejected. The dispatcher matches exhaustively over
//! the closed type enum, so adding a ninth variant without a normalizer is a
//! compile error.

use std::collections::BTreeMap;

use chrono::{Datelike, Utc};
use serde_json::Value;

use crate::blanks::{extract_blank_ids, rewrite_generic_placeholders};
use crate::coerce::{as_record, pick, scalar_to_string, to_boolean, to_number, to_string_array, unique_strings};
use crate::resolve::{detect_one_based_indexing, resolve_list_value};
use crate::domain::{
  BlankDef, CorrectAnswerData, FillBlankAnswer, FillBlankConfig, MatchingAnswer, MatchingConfig,
  MultiSelectAnswer, MultiSelectConfig, MultipleChoiceAnswer, MultipleChoiceConfig, NormalizedQuestion,
  QuestionConfig, QuestionType, RawMap, TextInputAnswer, TextInputConfig, ToleranceType, TrueFalseAnswer,
  TrueFalseConfig, YearRangeAnswer, YearRangeConfig, NumericRangeAnswer, NumericRangeConfig,
};

/// Map an observed type spelling onto a canonical tag. Unrecognized slugs
/// pass through as `Custom` so new types degrade instead of disappearing.
pub fn canonical_question_type(raw: &str) -> QuestionType {
  match raw.trim().to_lowercase().as_str() {
    "multiple_choice" | "multiple choice" | "multiple-choice" | "multi_choice" | "mcq" => {
      QuestionType::MultipleChoice
    }
    "true_false" | "truefalse" | "boolean" => QuestionType::TrueFalse,
    "text_input" | "text" | "free_text" | "short_answer" | "shortanswer" => QuestionType::TextInput,
    "year_range" | "year" => QuestionType::YearRange,
    "numeric_range" | "number" | "numeric" | "number_range" => QuestionType::NumericRange,
    "matching" | "match" | "matching_pairs" => QuestionType::Matching,
    "fill_blank" | "fill_blanks" | "fill_in_blank" | "fill-in-the-blank" => QuestionType::FillBlank,
    "multi_select" | "multi-select" | "multi select" | "multiple_select" => QuestionType::MultiSelect,
    other => QuestionType::Custom(other.to_string()),
  }
}

/// Type tag of a candidate; a missing tag means plain multiple choice.
pub fn normalize_question_type(raw: Option<&Value>) -> QuestionType {
  let slug = raw
    .and_then(scalar_to_string)
    .unwrap_or_else(|| "multiple_choice".to_string());
  canonical_question_type(&slug)
}

/// Normalize one candidate into a trusted question record.
/// Returns `None` only when the question text is empty after trimming.
pub fn normalize_question(candidate: &Value) -> Option<NormalizedQuestion> {
  let record = candidate.as_object()?;
  let question = record
    .get("question")
    .and_then(scalar_to_string)
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())?;

  let question_type = normalize_question_type(record.get("questionType"));
  let config = as_record(record.get("questionConfig"));
  let answer = as_record(record.get("correctAnswerData"));

  let (question_config, correct_answer_data) = match &question_type {
    QuestionType::MultipleChoice => normalize_multiple_choice(&config, &answer, record),
    QuestionType::TrueFalse => normalize_true_false(&config, &answer, record),
    QuestionType::TextInput => normalize_text_input(&config, &answer),
    QuestionType::YearRange => normalize_year_range(&config, &answer, record),
    QuestionType::NumericRange => normalize_numeric_range(&config, &answer, record),
    QuestionType::Matching => normalize_matching(&config, &answer),
    QuestionType::FillBlank => normalize_fill_blank(&config, &answer),
    QuestionType::MultiSelect => normalize_multi_select(&config, &answer),
    QuestionType::Custom(_) => (QuestionConfig::Custom(config), CorrectAnswerData::Custom(answer)),
  };

  Some(NormalizedQuestion {
    question,
    question_type,
    question_config,
    correct_answer_data,
    points: clamp_points(record.get("points")),
    explanation: record
      .get("explanation")
      .and_then(scalar_to_string)
      .map(|s| s.trim().to_string())
      .unwrap_or_default(),
  })
}

/// Points are rounded and clamped into 1..=3 regardless of the source value.
fn clamp_points(value: Option<&Value>) -> u8 {
  match to_number(value) {
    Some(n) => n.round().clamp(1.0, 3.0) as u8,
    None => 1,
  }
}

// --- multiple_choice ---

fn normalize_multiple_choice(
  config: &RawMap,
  answer: &RawMap,
  candidate: &RawMap,
) -> (QuestionConfig, CorrectAnswerData) {
  let raw_options = to_string_array(
    pick(config, &["options", "choices"]).or_else(|| pick(candidate, &["options"])),
  );
  let options = unique_strings(raw_options.clone());

  let picked = to_number(
    pick(answer, &["correctIndex", "correctAnswer", "answerIndex"])
      .or_else(|| pick(candidate, &["correctAnswer"])),
  );
  let mut correct_index = picked.map(|n| remap_through_dedup(n, &raw_options, &options));

  if correct_index.is_none() {
    if let Some(Value::String(option)) = pick(answer, &["correctOption"]) {
      correct_index = options.iter().position(|o| o == option.trim());
    }
  }

  let correct_index = clamp_index(correct_index.unwrap_or(0), options.len());

  (
    QuestionConfig::MultipleChoice(MultipleChoiceConfig {
      options: options.clone(),
      shuffle_options: to_boolean(pick(config, &["shuffleOptions"])).unwrap_or(false),
    }),
    CorrectAnswerData::MultipleChoice(MultipleChoiceAnswer { correct_index }),
  )
}

/// An index into the raw option list keeps naming the same option after
/// de-duplication; a removed duplicate must not shift the correct answer.
fn remap_through_dedup(raw_index: f64, raw_options: &[String], deduped: &[String]) -> usize {
  let rounded = raw_index.round();
  if rounded >= 0.0 && (rounded as usize) < raw_options.len() {
    let chosen = &raw_options[rounded as usize];
    if let Some(position) = deduped.iter().position(|o| o == chosen) {
      return position;
    }
  }
  clamp_index(if rounded < 0.0 { 0 } else { rounded as usize }, deduped.len())
}

fn clamp_index(index: usize, len: usize) -> usize {
  if len == 0 {
    0
  } else {
    index.min(len - 1)
  }
}

// --- true_false ---

fn normalize_true_false(
  config: &RawMap,
  answer: &RawMap,
  candidate: &RawMap,
) -> (QuestionConfig, CorrectAnswerData) {
  // Legacy candidates encode the answer as an option index: 1 = true, 0 = false.
  let legacy = match to_number(pick(candidate, &["correctAnswer"])) {
    Some(n) if n == 1.0 => Some(true),
    Some(n) if n == 0.0 => Some(false),
    _ => None,
  };
  let correct_value = to_boolean(pick(answer, &["correctValue", "isTrue", "answer"]))
    .or(legacy)
    .unwrap_or(true);

  (
    QuestionConfig::TrueFalse(TrueFalseConfig {
      true_label: string_field(config, "trueLabel").unwrap_or_else(|| "True".to_string()),
      false_label: string_field(config, "falseLabel").unwrap_or_else(|| "False".to_string()),
    }),
    CorrectAnswerData::TrueFalse(TrueFalseAnswer { correct_value }),
  )
}

fn string_field(record: &RawMap, key: &str) -> Option<String> {
  match record.get(key) {
    Some(Value::String(s)) => Some(s.clone()),
    _ => None,
  }
}

// --- text_input ---

fn normalize_text_input(config: &RawMap, answer: &RawMap) -> (QuestionConfig, CorrectAnswerData) {
  let accepted = match pick(answer, &["acceptedAnswers", "answers", "correctAnswers"]) {
    Some(value) => to_string_array(Some(value)),
    None => match pick(answer, &["exactMatch"]) {
      Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
      _ => Vec::new(),
    },
  };
  let accepted_answers = unique_strings(accepted);

  let keywords = unique_strings(to_string_array(
    pick(answer, &["keywords"]).or_else(|| pick(config, &["acceptedKeywords"])),
  ));

  let max_length = to_number(pick(config, &["maxLength"]))
    .map(|n| n.round() as i64)
    .filter(|n| *n > 0);

  (
    QuestionConfig::TextInput(TextInputConfig {
      case_sensitive: to_boolean(pick(config, &["caseSensitive"])).unwrap_or(false),
      trim_whitespace: to_boolean(pick(config, &["trimWhitespace"])).unwrap_or(true),
      placeholder: string_field(config, "placeholder"),
      max_length,
    }),
    CorrectAnswerData::TextInput(TextInputAnswer {
      accepted_answers,
      keywords: if keywords.is_empty() { None } else { Some(keywords) },
    }),
  )
}

// --- year_range ---

fn normalize_year_range(
  config: &RawMap,
  answer: &RawMap,
  candidate: &RawMap,
) -> (QuestionConfig, CorrectAnswerData) {
  let correct_year = to_number(pick(answer, &["correctYear", "exactYear", "year"]))
    .or_else(|| to_number(pick(candidate, &["correctAnswer"])))
    .map(|y| y.round() as i64)
    .unwrap_or_else(|| i64::from(Utc::now().year()));

  (
    QuestionConfig::YearRange(YearRangeConfig {
      min_year: to_number(pick(config, &["minYear", "min"])).map(|n| n.round() as i64),
      max_year: to_number(pick(config, &["maxYear", "max"])).map(|n| n.round() as i64),
      tolerance: to_number(pick(config, &["tolerance", "toleranceYears"])).map(|n| (n.round() as i64).max(0)),
      placeholder: string_field(config, "placeholder"),
    }),
    CorrectAnswerData::YearRange(YearRangeAnswer { correct_year }),
  )
}

// --- numeric_range ---

fn normalize_numeric_range(
  config: &RawMap,
  answer: &RawMap,
  candidate: &RawMap,
) -> (QuestionConfig, CorrectAnswerData) {
  let mut tolerance = to_number(pick(config, &["tolerance"]));
  let mut tolerance_type = match string_field(config, "toleranceType").as_deref() {
    Some("absolute") => Some(ToleranceType::Absolute),
    Some("percentage") => Some(ToleranceType::Percentage),
    _ => None,
  };

  // A percent-style tolerance wins only when no plain tolerance was given.
  let tolerance_percent = to_number(
    pick(config, &["tolerancePercent"]).or_else(|| pick(answer, &["tolerancePercent"])),
  );
  if tolerance.is_none() {
    if let Some(percent) = tolerance_percent {
      tolerance = Some(percent);
      tolerance_type = Some(ToleranceType::Percentage);
    }
  }

  let correct_value = to_number(pick(answer, &["correctValue", "exactValue", "value"]))
    .or_else(|| to_number(pick(candidate, &["correctAnswer"])))
    .unwrap_or(0.0);

  (
    QuestionConfig::NumericRange(NumericRangeConfig {
      min: to_number(pick(config, &["min", "minValue"])),
      max: to_number(pick(config, &["max", "maxValue"])),
      step: to_number(pick(config, &["step"])).filter(|s| *s > 0.0),
      unit: string_field(config, "unit"),
      tolerance: tolerance.map(|t| t.max(0.0)),
      tolerance_type: tolerance.map(|_| tolerance_type.unwrap_or(ToleranceType::Absolute)),
      placeholder: string_field(config, "placeholder"),
    }),
    CorrectAnswerData::NumericRange(NumericRangeAnswer { correct_value }),
  )
}

// --- matching ---

fn normalize_matching(config: &RawMap, answer: &RawMap) -> (QuestionConfig, CorrectAnswerData) {
  let mut left_column = unique_strings(to_string_array(pick(config, &["leftColumn", "leftItems", "left"])));
  let mut right_column = unique_strings(to_string_array(pick(config, &["rightColumn", "rightItems", "right"])));

  // Some generators describe the columns only through a pairs list.
  if let Some(Value::Array(pairs)) = pick(config, &["pairs"]) {
    for pair in pairs {
      let record = as_record(Some(pair));
      let left = pick(&record, &["left", "term"])
        .and_then(scalar_to_string)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
      let right = pick(&record, &["right", "match", "definition"])
        .and_then(scalar_to_string)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
      if !left.is_empty() && !left_column.contains(&left) {
        left_column.push(left);
      }
      if !right.is_empty() && !right_column.contains(&right) {
        right_column.push(right);
      }
    }
  }

  let raw_pairs = pick(answer, &["correctPairs", "pairs", "matches"]);
  let pair_list: &[Value] = match raw_pairs {
    Some(Value::Array(entries)) => entries,
    _ => &[],
  };
  let one_based_left = detect_one_based_indexing(pair_list, 0, left_column.len());
  let one_based_right = detect_one_based_indexing(pair_list, 1, right_column.len());

  let mut correct_pairs: BTreeMap<String, String> = BTreeMap::new();
  match raw_pairs {
    Some(Value::Array(entries)) => {
      for entry in entries {
        if let Value::Array(tuple) = entry {
          if tuple.len() >= 2 {
            let left = resolve_list_value(Some(&tuple[0]), &left_column, one_based_left);
            let right = resolve_list_value(Some(&tuple[1]), &right_column, one_based_right);
            if let (Some(left), Some(right)) = (left, right) {
              correct_pairs.insert(left, right);
            }
            continue;
          }
        }
        let record = as_record(Some(entry));
        let left = resolve_list_value(
          pick(&record, &["left", "leftItem", "from"]),
          &left_column,
          one_based_left,
        );
        let right = resolve_list_value(
          pick(&record, &["right", "rightItem", "to"]),
          &right_column,
          one_based_right,
        );
        if let (Some(left), Some(right)) = (left, right) {
          correct_pairs.insert(left, right);
        }
      }
    }
    Some(Value::Object(map)) => {
      for (raw_left, raw_right) in map {
        let key = Value::String(raw_left.clone());
        let left = resolve_list_value(Some(&key), &left_column, one_based_left);
        let right = resolve_list_value(Some(raw_right), &right_column, one_based_right);
        if let (Some(left), Some(right)) = (left, right) {
          correct_pairs.insert(left, right);
        }
      }
    }
    _ => {}
  }

  // No recoverable pairs but structurally matched columns: pair positionally.
  if correct_pairs.is_empty() && left_column.len() == right_column.len() {
    for (left, right) in left_column.iter().zip(right_column.iter()) {
      correct_pairs.insert(left.clone(), right.clone());
    }
  }

  // Self-heal membership: anything referenced only inside the pairs joins
  // its column.
  for (left, right) in &correct_pairs {
    if !left_column.contains(left) {
      left_column.push(left.clone());
    }
    if !right_column.contains(right) {
      right_column.push(right.clone());
    }
  }

  (
    QuestionConfig::Matching(MatchingConfig {
      left_column,
      right_column,
      shuffle_right: to_boolean(pick(config, &["shuffleRight"])).unwrap_or(true),
      left_column_label: string_field(config, "leftColumnLabel"),
      right_column_label: string_field(config, "rightColumnLabel"),
    }),
    CorrectAnswerData::Matching(MatchingAnswer { correct_pairs }),
  )
}

// --- fill_blank ---

fn normalize_fill_blank(config: &RawMap, answer: &RawMap) -> (QuestionConfig, CorrectAnswerData) {
  let raw_template = string_field(config, "template")
    .map(|s| s.trim().to_string())
    .unwrap_or_default();

  let mut accepted_by_id: BTreeMap<String, Vec<String>> = BTreeMap::new();
  let mut config_blanks: Vec<BlankDef> = Vec::new();
  if let Some(Value::Array(raw_blanks)) = pick(config, &["blanks"]) {
    for (index, blank) in raw_blanks.iter().enumerate() {
      let record = as_record(Some(blank));
      let id = pick(&record, &["id"])
        .and_then(scalar_to_string)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("blank_{index}"));
      let accepted = unique_strings(to_string_array(pick(&record, &["acceptedAnswers", "answers", "answer"])));
      accepted_by_id.insert(id.clone(), accepted.clone());
      config_blanks.push(BlankDef { id, accepted_answers: accepted });
    }
  }

  // Answer-side entries override config-side ones.
  for (id, answers) in as_record(pick(answer, &["blanks", "correctBlanks"])) {
    accepted_by_id.insert(id, unique_strings(to_string_array(Some(&answers))));
  }

  let defined_ids: Vec<String> = config_blanks.iter().map(|b| b.id.clone()).collect();
  let mut blank_ids = extract_blank_ids(&raw_template, &defined_ids);
  if blank_ids.is_empty() {
    blank_ids = defined_ids.clone();
  }
  if blank_ids.is_empty() {
    blank_ids = accepted_by_id.keys().cloned().collect();
  }
  if blank_ids.is_empty() {
    blank_ids = vec!["blank_0".to_string()];
  }

  let template = if raw_template.is_empty() {
    blank_ids
      .iter()
      .map(|id| format!("{{{{{id}}}}}"))
      .collect::<Vec<_>>()
      .join(" ")
  } else {
    rewrite_generic_placeholders(&raw_template, &blank_ids)
  };

  let blanks: Vec<BlankDef> = blank_ids
    .iter()
    .enumerate()
    .map(|(index, id)| BlankDef {
      id: id.clone(),
      accepted_answers: accepted_by_id
        .get(id)
        .cloned()
        .or_else(|| config_blanks.get(index).map(|b| b.accepted_answers.clone()))
        .unwrap_or_default(),
    })
    .collect();

  let answer_blanks: BTreeMap<String, Vec<String>> = blanks
    .iter()
    .map(|blank| (blank.id.clone(), blank.accepted_answers.clone()))
    .collect();

  (
    QuestionConfig::FillBlank(FillBlankConfig {
      template,
      blanks,
      case_sensitive: to_boolean(pick(config, &["caseSensitive"])).unwrap_or(false),
    }),
    CorrectAnswerData::FillBlank(FillBlankAnswer { blanks: answer_blanks }),
  )
}

// --- multi_select ---

fn normalize_multi_select(config: &RawMap, answer: &RawMap) -> (QuestionConfig, CorrectAnswerData) {
  let raw_options = to_string_array(pick(config, &["options", "choices"]));
  let options = unique_strings(raw_options.clone());

  let raw_indices: &[Value] = match pick(answer, &["correctIndices", "indices"]) {
    Some(Value::Array(entries)) => entries,
    _ => &[],
  };

  let mut correct_indices: Vec<usize> = Vec::new();
  for entry in raw_indices {
    if let Some(n) = to_number(Some(entry)) {
      let rounded = n.round();
      if rounded < 0.0 || rounded as usize >= raw_options.len() {
        continue;
      }
      let chosen = &raw_options[rounded as usize];
      if let Some(position) = options.iter().position(|o| o == chosen) {
        if !correct_indices.contains(&position) {
          correct_indices.push(position);
        }
      }
    }
  }

  // Fall back to matching correct answers by option text.
  if correct_indices.is_empty() {
    if let Some(Value::Array(_)) = pick(answer, &["correctAnswers"]) {
      for option in to_string_array(pick(answer, &["correctAnswers"])) {
        if let Some(position) = options.iter().position(|o| *o == option) {
          if !correct_indices.contains(&position) {
            correct_indices.push(position);
          }
        }
      }
    }
  }

  (
    QuestionConfig::MultiSelect(MultiSelectConfig {
      options,
      shuffle_options: to_boolean(pick(config, &["shuffleOptions"])),
      min_selections: to_number(pick(config, &["minSelections"])).map(|n| (n.round() as i64).max(0)),
      max_selections: to_number(pick(config, &["maxSelections"])).map(|n| (n.round() as i64).max(1)),
    }),
    CorrectAnswerData::MultiSelect(MultiSelectAnswer { correct_indices }),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn question(value: serde_json::Value) -> NormalizedQuestion {
    normalize_question(&value).expect("question should normalize")
  }

  #[test]
  fn rejects_only_empty_question_text() {
    assert!(normalize_question(&json!({"question": "   "})).is_none());
    assert!(normalize_question(&json!({"questionType": "true_false"})).is_none());
    assert!(normalize_question(&json!("not a map")).is_none());
    assert!(normalize_question(&json!({"question": "Q?"})).is_some());
  }

  #[test]
  fn alias_table_covers_observed_spellings() {
    assert_eq!(canonical_question_type("Multiple Choice"), QuestionType::MultipleChoice);
    assert_eq!(canonical_question_type("mcq"), QuestionType::MultipleChoice);
    assert_eq!(canonical_question_type("TrueFalse"), QuestionType::TrueFalse);
    assert_eq!(canonical_question_type("short_answer"), QuestionType::TextInput);
    assert_eq!(canonical_question_type("year"), QuestionType::YearRange);
    assert_eq!(canonical_question_type("number_range"), QuestionType::NumericRange);
    assert_eq!(canonical_question_type("matching_pairs"), QuestionType::Matching);
    assert_eq!(canonical_question_type("fill-in-the-blank"), QuestionType::FillBlank);
    assert_eq!(canonical_question_type("multi select"), QuestionType::MultiSelect);
    assert_eq!(
      canonical_question_type("word_cloud"),
      QuestionType::Custom("word_cloud".to_string())
    );
  }

  #[test]
  fn points_are_rounded_and_clamped() {
    let cases = [
      (json!(-5), 1),
      (json!("high"), 1),
      (json!(7.6), 3),
      (json!(2.4), 2),
      (json!("2"), 2),
      (json!(null), 1),
    ];
    for (raw, expected) in cases {
      let q = question(json!({"question": "Q?", "points": raw.clone()}));
      assert_eq!(q.points, expected, "points {raw:?}");
    }
    let q = question(json!({"question": "Q?"}));
    assert_eq!(q.points, 1);
  }

  #[test]
  fn multiple_choice_deduplicates_and_keeps_the_intended_option() {
    let q = question(json!({
      "question": "Capital of France?",
      "questionType": "multiple_choice",
      "questionConfig": {"options": ["Paris", "Paris", "Berlin"]},
      "correctAnswerData": {"correctIndex": 1}
    }));
    match (&q.question_config, &q.correct_answer_data) {
      (QuestionConfig::MultipleChoice(config), CorrectAnswerData::MultipleChoice(answer)) => {
        assert_eq!(config.options, vec!["Paris", "Berlin"]);
        assert_eq!(answer.correct_index, 0, "index 1 named the second Paris");
      }
      other => panic!("unexpected shapes: {other:?}"),
    }
  }

  #[test]
  fn multiple_choice_index_stays_in_range() {
    let q = question(json!({
      "question": "Q?",
      "questionType": "mcq",
      "questionConfig": {"choices": ["A", "B"]},
      "correctAnswerData": {"correctAnswer": 9}
    }));
    match &q.correct_answer_data {
      CorrectAnswerData::MultipleChoice(answer) => assert_eq!(answer.correct_index, 1),
      other => panic!("unexpected answer: {other:?}"),
    }
  }

  #[test]
  fn multiple_choice_accepts_option_text_and_empty_options() {
    let q = question(json!({
      "question": "Q?",
      "questionType": "multiple_choice",
      "questionConfig": {"options": ["Red", "Green", "Blue"]},
      "correctAnswerData": {"correctOption": "Green"}
    }));
    match &q.correct_answer_data {
      CorrectAnswerData::MultipleChoice(answer) => assert_eq!(answer.correct_index, 1),
      other => panic!("unexpected answer: {other:?}"),
    }

    let q = question(json!({"question": "Q?", "questionType": "multiple_choice"}));
    match (&q.question_config, &q.correct_answer_data) {
      (QuestionConfig::MultipleChoice(config), CorrectAnswerData::MultipleChoice(answer)) => {
        assert!(config.options.is_empty());
        assert_eq!(answer.correct_index, 0);
      }
      other => panic!("unexpected shapes: {other:?}"),
    }
  }

  #[test]
  fn true_false_reads_aliases_and_legacy_index() {
    let q = question(json!({
      "question": "Q?",
      "questionType": "truefalse",
      "correctAnswerData": {"isTrue": "false"}
    }));
    match &q.correct_answer_data {
      CorrectAnswerData::TrueFalse(answer) => assert!(!answer.correct_value),
      other => panic!("unexpected answer: {other:?}"),
    }

    let q = question(json!({
      "question": "Q?",
      "questionType": "true_false",
      "correctAnswer": 0
    }));
    match &q.correct_answer_data {
      CorrectAnswerData::TrueFalse(answer) => assert!(!answer.correct_value),
      other => panic!("unexpected answer: {other:?}"),
    }
  }

  #[test]
  fn text_input_resolves_answers_and_keywords() {
    let q = question(json!({
      "question": "Q?",
      "questionType": "text_input",
      "questionConfig": {"caseSensitive": true, "maxLength": "40.2", "acceptedKeywords": ["cell"]},
      "correctAnswerData": {"exactMatch": " mitochondria "}
    }));
    match (&q.question_config, &q.correct_answer_data) {
      (QuestionConfig::TextInput(config), CorrectAnswerData::TextInput(answer)) => {
        assert!(config.case_sensitive);
        assert!(config.trim_whitespace);
        assert_eq!(config.max_length, Some(40));
        assert_eq!(answer.accepted_answers, vec!["mitochondria"]);
        assert_eq!(answer.keywords.as_deref(), Some(&["cell".to_string()][..]));
      }
      other => panic!("unexpected shapes: {other:?}"),
    }
  }

  #[test]
  fn year_range_defaults_to_current_utc_year() {
    let q = question(json!({
      "question": "When?",
      "questionType": "year",
      "correctAnswerData": {"exactYear": "1969"}
    }));
    match &q.correct_answer_data {
      CorrectAnswerData::YearRange(answer) => assert_eq!(answer.correct_year, 1969),
      other => panic!("unexpected answer: {other:?}"),
    }

    let q = question(json!({"question": "When?", "questionType": "year_range"}));
    match &q.correct_answer_data {
      CorrectAnswerData::YearRange(answer) => {
        assert_eq!(answer.correct_year, i64::from(Utc::now().year()));
      }
      other => panic!("unexpected answer: {other:?}"),
    }
  }

  #[test]
  fn numeric_range_promotes_percent_tolerance() {
    let q = question(json!({
      "question": "Distance?",
      "questionType": "numeric",
      "questionConfig": {"minValue": 0, "maxValue": 500000, "tolerancePercent": 5, "unit": "km"},
      "correctAnswerData": {"exactValue": 384400}
    }));
    match (&q.question_config, &q.correct_answer_data) {
      (QuestionConfig::NumericRange(config), CorrectAnswerData::NumericRange(answer)) => {
        assert_eq!(config.tolerance, Some(5.0));
        assert_eq!(config.tolerance_type, Some(ToleranceType::Percentage));
        assert_eq!(config.min, Some(0.0));
        assert_eq!(config.max, Some(500000.0));
        assert_eq!(config.unit.as_deref(), Some("km"));
        assert_eq!(answer.correct_value, 384400.0);
      }
      other => panic!("unexpected shapes: {other:?}"),
    }

    let q = question(json!({"question": "N?", "questionType": "numeric_range"}));
    match &q.correct_answer_data {
      CorrectAnswerData::NumericRange(answer) => assert_eq!(answer.correct_value, 0.0),
      other => panic!("unexpected answer: {other:?}"),
    }
  }

  #[test]
  fn matching_detects_one_based_pairs() {
    let q = question(json!({
      "question": "Match.",
      "questionType": "matching",
      "questionConfig": {"leftColumn": ["L1", "L2"], "rightColumn": ["A", "B"]},
      "correctAnswerData": {"correctPairs": [[1, "B"], [2, "A"]]}
    }));
    match &q.correct_answer_data {
      CorrectAnswerData::Matching(answer) => {
        assert_eq!(answer.correct_pairs.get("L1"), Some(&"B".to_string()));
        assert_eq!(answer.correct_pairs.get("L2"), Some(&"A".to_string()));
      }
      other => panic!("unexpected answer: {other:?}"),
    }
  }

  #[test]
  fn matching_closure_holds_after_self_healing() {
    let q = question(json!({
      "question": "Match.",
      "questionType": "match",
      "questionConfig": {"leftColumn": ["Known"], "rightColumn": ["Seen"]},
      "correctAnswerData": {"correctPairs": {"Known": "Seen", "Stray": "Orphan"}}
    }));
    match (&q.question_config, &q.correct_answer_data) {
      (QuestionConfig::Matching(config), CorrectAnswerData::Matching(answer)) => {
        for (left, right) in &answer.correct_pairs {
          assert!(config.left_column.contains(left), "{left} missing from left column");
          assert!(config.right_column.contains(right), "{right} missing from right column");
        }
        assert!(config.left_column.contains(&"Stray".to_string()));
        assert!(config.right_column.contains(&"Orphan".to_string()));
      }
      other => panic!("unexpected shapes: {other:?}"),
    }
  }

  #[test]
  fn matching_falls_back_to_positional_pairs() {
    let q = question(json!({
      "question": "Match.",
      "questionType": "matching",
      "questionConfig": {"left": ["a", "b"], "right": ["1", "2"]}
    }));
    match &q.correct_answer_data {
      CorrectAnswerData::Matching(answer) => {
        assert_eq!(answer.correct_pairs.get("a"), Some(&"1".to_string()));
        assert_eq!(answer.correct_pairs.get("b"), Some(&"2".to_string()));
      }
      other => panic!("unexpected answer: {other:?}"),
    }
  }

  #[test]
  fn matching_reads_pair_objects_and_config_pairs() {
    let q = question(json!({
      "question": "Match.",
      "questionType": "matching",
      "questionConfig": {"pairs": [
        {"term": "H2O", "definition": "Water"},
        {"term": "NaCl", "definition": "Salt"}
      ]},
      "correctAnswerData": {"pairs": [
        {"left": "H2O", "right": "Water"},
        {"from": "NaCl", "to": "Salt"}
      ]}
    }));
    match (&q.question_config, &q.correct_answer_data) {
      (QuestionConfig::Matching(config), CorrectAnswerData::Matching(answer)) => {
        assert_eq!(config.left_column, vec!["H2O", "NaCl"]);
        assert_eq!(config.right_column, vec!["Water", "Salt"]);
        assert_eq!(answer.correct_pairs.get("NaCl"), Some(&"Salt".to_string()));
      }
      other => panic!("unexpected shapes: {other:?}"),
    }
  }

  #[test]
  fn fill_blank_closure_between_template_and_blanks() {
    let q = question(json!({
      "question": "Complete.",
      "questionType": "fill_blank",
      "questionConfig": {
        "template": "The {{blank}} is the capital of {{blank}}.",
        "blanks": [
          {"id": "city", "acceptedAnswers": ["Paris"]},
          {"id": "country", "acceptedAnswers": ["France"]}
        ],
        "caseSensitive": false
      },
      "correctAnswerData": {"blanks": {"city": ["Paris", "paris"]}}
    }));
    match (&q.question_config, &q.correct_answer_data) {
      (QuestionConfig::FillBlank(config), CorrectAnswerData::FillBlank(answer)) => {
        assert_eq!(config.template, "The {{city}} is the capital of {{country}}.");
        let ids = extract_blank_ids(&config.template, &[]);
        for id in &ids {
          assert!(config.blanks.iter().any(|b| b.id == *id), "{id} missing blank def");
          assert!(answer.blanks.contains_key(id), "{id} missing answer entry");
        }
        assert_eq!(answer.blanks["city"], vec!["Paris", "paris"]);
        assert_eq!(answer.blanks["country"], vec!["France"]);
      }
      other => panic!("unexpected shapes: {other:?}"),
    }
  }

  #[test]
  fn fill_blank_synthesizes_ids_without_template() {
    let q = question(json!({
      "question": "Complete.",
      "questionType": "fill_in_blank",
      "correctAnswerData": {"blanks": {"gap": ["answer"]}}
    }));
    match (&q.question_config, &q.correct_answer_data) {
      (QuestionConfig::FillBlank(config), CorrectAnswerData::FillBlank(answer)) => {
        assert_eq!(config.template, "{{gap}}");
        assert_eq!(answer.blanks["gap"], vec!["answer"]);
      }
      other => panic!("unexpected shapes: {other:?}"),
    }

    let q = question(json!({"question": "Complete.", "questionType": "fill_blank"}));
    match &q.question_config {
      QuestionConfig::FillBlank(config) => {
        assert_eq!(config.template, "{{blank_0}}");
        assert_eq!(config.blanks.len(), 1);
      }
      other => panic!("unexpected config: {other:?}"),
    }
  }

  #[test]
  fn multi_select_indices_are_deduplicated_and_in_range() {
    let q = question(json!({
      "question": "Pick all.",
      "questionType": "multi-select",
      "questionConfig": {"options": ["A", "A", "B", "C"], "minSelections": -2, "maxSelections": 0},
      "correctAnswerData": {"correctIndices": [1, 0, 3, 9, "2"]}
    }));
    match (&q.question_config, &q.correct_answer_data) {
      (QuestionConfig::MultiSelect(config), CorrectAnswerData::MultiSelect(answer)) => {
        assert_eq!(config.options, vec!["A", "B", "C"]);
        assert_eq!(answer.correct_indices, vec![0, 2, 1]);
        for index in &answer.correct_indices {
          assert!(*index < config.options.len());
        }
        assert_eq!(config.min_selections, Some(0));
        assert_eq!(config.max_selections, Some(1));
      }
      other => panic!("unexpected shapes: {other:?}"),
    }
  }

  #[test]
  fn multi_select_falls_back_to_answer_text() {
    let q = question(json!({
      "question": "Pick all.",
      "questionType": "multi_select",
      "questionConfig": {"options": ["Mercury", "Venus", "Earth"]},
      "correctAnswerData": {"correctAnswers": ["Earth", "Mercury"]}
    }));
    match &q.correct_answer_data {
      CorrectAnswerData::MultiSelect(answer) => assert_eq!(answer.correct_indices, vec![2, 0]),
      other => panic!("unexpected answer: {other:?}"),
    }
  }

  #[test]
  fn unknown_types_pass_through_with_raw_maps() {
    let q = question(json!({
      "question": "Draw it.",
      "questionType": "sketch",
      "questionConfig": {"canvas": "small"},
      "correctAnswerData": {"strokes": 3},
      "points": 2
    }));
    assert_eq!(q.question_type, QuestionType::Custom("sketch".to_string()));
    match (&q.question_config, &q.correct_answer_data) {
      (QuestionConfig::Custom(config), CorrectAnswerData::Custom(answer)) => {
        assert_eq!(config.get("canvas"), Some(&json!("small")));
        assert_eq!(answer.get("strokes"), Some(&json!(3)));
      }
      other => panic!("unexpected shapes: {other:?}"),
    }
  }

  #[test]
  fn missing_type_defaults_to_multiple_choice() {
    let q = question(json!({
      "question": "Q?",
      "options": ["x", "y"],
      "correctAnswer": 1,
      "explanation": "legacy shape"
    }));
    assert_eq!(q.question_type, QuestionType::MultipleChoice);
    match (&q.question_config, &q.correct_answer_data) {
      (QuestionConfig::MultipleChoice(config), CorrectAnswerData::MultipleChoice(answer)) => {
        assert_eq!(config.options, vec!["x", "y"]);
        assert_eq!(answer.correct_index, 1);
      }
      other => panic!("unexpected shapes: {other:?}"),
    }
    assert_eq!(q.explanation, "legacy shape");
  }
}
