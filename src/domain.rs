//! Canonical data model for generated study content.
//!
//! The generator's output is untrusted; these are the trusted shapes the
//! normalization pipeline produces. Field renames follow the wire format the
//! dashboard and storage layers already speak (camelCase keys, snake_case
//! type slugs).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untrusted key-value candidate data, as decoded from a model response.
pub type RawMap = Map<String, Value>;

/// The closed set of question-type tags.
///
/// `Custom` carries any unrecognized slug through unchanged; such questions
/// keep their raw config/answer maps and are not guaranteed to satisfy the
/// per-variant invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionType {
  MultipleChoice,
  TrueFalse,
  TextInput,
  YearRange,
  NumericRange,
  Matching,
  FillBlank,
  MultiSelect,
  Custom(String),
}

impl QuestionType {
  pub fn as_str(&self) -> &str {
    match self {
      QuestionType::MultipleChoice => "multiple_choice",
      QuestionType::TrueFalse => "true_false",
      QuestionType::TextInput => "text_input",
      QuestionType::YearRange => "year_range",
      QuestionType::NumericRange => "numeric_range",
      QuestionType::Matching => "matching",
      QuestionType::FillBlank => "fill_blank",
      QuestionType::MultiSelect => "multi_select",
      QuestionType::Custom(slug) => slug,
    }
  }
}

impl Serialize for QuestionType {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl std::fmt::Display for QuestionType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// --- Per-variant question configuration ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceConfig {
  pub options: Vec<String>,
  pub shuffle_options: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrueFalseConfig {
  pub true_label: String,
  pub false_label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextInputConfig {
  pub case_sensitive: bool,
  pub trim_whitespace: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub placeholder: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_length: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearRangeConfig {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_year: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_year: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tolerance: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub placeholder: Option<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToleranceType {
  Absolute,
  Percentage,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NumericRangeConfig {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub step: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub unit: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tolerance: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tolerance_type: Option<ToleranceType>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub placeholder: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchingConfig {
  pub left_column: Vec<String>,
  pub right_column: Vec<String>,
  pub shuffle_right: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub left_column_label: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub right_column_label: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlankDef {
  pub id: String,
  pub accepted_answers: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankConfig {
  /// Text with `{{id}}` placeholders.
  pub template: String,
  pub blanks: Vec<BlankDef>,
  pub case_sensitive: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultiSelectConfig {
  pub options: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub shuffle_options: Option<bool>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_selections: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_selections: Option<i64>,
}

/// Variant-specific configuration, serialized as a bare object.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum QuestionConfig {
  MultipleChoice(MultipleChoiceConfig),
  TrueFalse(TrueFalseConfig),
  TextInput(TextInputConfig),
  YearRange(YearRangeConfig),
  NumericRange(NumericRangeConfig),
  Matching(MatchingConfig),
  FillBlank(FillBlankConfig),
  MultiSelect(MultiSelectConfig),
  Custom(RawMap),
}

// --- Per-variant correct-answer references ---

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceAnswer {
  pub correct_index: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrueFalseAnswer {
  pub correct_value: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextInputAnswer {
  pub accepted_answers: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub keywords: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearRangeAnswer {
  pub correct_year: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NumericRangeAnswer {
  pub correct_value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchingAnswer {
  /// left item -> right item
  pub correct_pairs: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankAnswer {
  /// blank id -> accepted answers
  pub blanks: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MultiSelectAnswer {
  pub correct_indices: Vec<usize>,
}

/// Variant-specific correct-answer data, serialized as a bare object.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CorrectAnswerData {
  MultipleChoice(MultipleChoiceAnswer),
  TrueFalse(TrueFalseAnswer),
  TextInput(TextInputAnswer),
  YearRange(YearRangeAnswer),
  NumericRange(NumericRangeAnswer),
  Matching(MatchingAnswer),
  FillBlank(FillBlankAnswer),
  MultiSelect(MultiSelectAnswer),
  Custom(RawMap),
}

/// A fully repaired, validated quiz question. Ownership transfers to the
/// caller; nothing in this crate persists it.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedQuestion {
  pub question: String,
  pub question_type: QuestionType,
  pub question_config: QuestionConfig,
  pub correct_answer_data: CorrectAnswerData,
  /// Difficulty-based point value, always in 1..=3.
  pub points: u8,
  pub explanation: String,
}

/// A normalized flashcard. Both sides are non-empty after alias resolution.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedFlashcard {
  pub front: String,
  pub back: String,
}

/// Token accounting as reported by the generator. Passed through verbatim;
/// never computed locally.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
  #[serde(default)]
  pub total_tokens: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prompt_tokens: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub completion_tokens: Option<u32>,
}

/// Which question types the extended-quiz orchestrator should ask for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeFilter {
  Mixed,
  All,
  Only(QuestionType),
}
