//! Generation orchestrators: the four public entry points of the pipeline.
//!
//! Each one follows the same shape: truncate the source text, call the
//! generator with a type-specific system prompt plus a locale directive,
//! then decode + locate + normalize the response. The only error that can
//! leave this module is the generator call itself failing; an unusable
//! response simply yields an empty result list.

use tracing::{info, instrument, warn};

use crate::config::Prompts;
use crate::decode::{decode_lenient, locate_array};
use crate::domain::{GeneratedFlashcard, NormalizedQuestion, TokenUsage, TypeFilter};
use crate::flashcards::normalize_flashcards;
use crate::normalize::normalize_question;
use crate::openai::{GeneratorError, OpenAI};
use crate::util::{fill_template, truncate_middle};

/// Character budget applied to source text before it is embedded in a user
/// prompt. Oversized text keeps its first and last halves around an elision
/// marker, so both the introduction and the conclusion survive.
pub const SOURCE_CHAR_BUDGET: usize = 24_000;
pub const ELISION_MARKER: &str = "\n\n[... middle of source omitted ...]\n\n";

const FLASHCARD_KEYS: &[&str] = &["flashcards", "cards", "items"];
const QUESTION_KEYS: &[&str] = &["questions", "items", "quiz"];

const LANGUAGE_NAMES: &[(&str, &str)] = &[("en", "English"), ("hu", "Hungarian")];

/// The four content types this crate can generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
  Summary,
  Flashcards,
  Quiz,
  ExtendedQuiz,
}

/// How many times each content type retries when the first response
/// normalizes to nothing. Only flashcards escalate; the asymmetry is
/// intentional and kept visible here instead of being buried in control
/// flow.
pub const RETRY_LIMITS: &[(ContentKind, u8)] = &[
  (ContentKind::Summary, 0),
  (ContentKind::Flashcards, 1),
  (ContentKind::Quiz, 0),
  (ContentKind::ExtendedQuiz, 0),
];

pub fn retry_limit(kind: ContentKind) -> u8 {
  RETRY_LIMITS
    .iter()
    .find(|(k, _)| *k == kind)
    .map(|(_, n)| *n)
    .unwrap_or(0)
}

/// Result list plus the generator's token accounting for the call(s).
#[derive(Clone, Debug)]
pub struct GenerationOutcome<T> {
  pub result: T,
  pub usage: Option<TokenUsage>,
}

fn language_instruction(locale: Option<&str>) -> String {
  let language = locale
    .and_then(|code| LANGUAGE_NAMES.iter().find(|(c, _)| *c == code))
    .map(|(_, name)| *name)
    .unwrap_or("English");
  format!("\nIMPORTANT: Generate ALL content in {language}.")
}

fn prepare_source(content: &str) -> String {
  truncate_middle(content, SOURCE_CHAR_BUDGET, ELISION_MARKER)
}

#[instrument(level = "info", skip(client, prompts, content), fields(content_len = content.len()))]
pub async fn generate_summary(
  client: &OpenAI,
  prompts: &Prompts,
  content: &str,
  locale: Option<&str>,
) -> Result<GenerationOutcome<String>, GeneratorError> {
  let source = prepare_source(content);
  let system = format!("{}{}", prompts.summary_system, language_instruction(locale));
  let user = fill_template(&prompts.summary_user_template, &[("content", &source)]);

  let outcome = client
    .chat_text(&client.fast_model, &system, &user, 0.7, Some(2000))
    .await?;
  Ok(GenerationOutcome {
    result: outcome.text.trim().to_string(),
    usage: outcome.usage,
  })
}

#[instrument(level = "info", skip(client, prompts, content), fields(count, content_len = content.len()))]
pub async fn generate_flashcards(
  client: &OpenAI,
  prompts: &Prompts,
  content: &str,
  count: usize,
  locale: Option<&str>,
) -> Result<GenerationOutcome<Vec<GeneratedFlashcard>>, GeneratorError> {
  let source = prepare_source(content);
  let language = language_instruction(locale);
  let user = fill_template(
    &prompts.flashcard_user_template,
    &[("count", &count.to_string()), ("content", &source)],
  );

  let system = format!("{}{language}", prompts.flashcard_system);
  let first = client
    .chat_json(&client.fast_model, &system, &user, 0.7, Some(3000))
    .await?;
  let mut usage = first.usage;
  let mut cards = parse_flashcards(&first.text, count);

  // Escalation: a stricter shape-only prompt on the strong model, once.
  for attempt in 0..retry_limit(ContentKind::Flashcards) {
    if !cards.is_empty() {
      break;
    }
    warn!(attempt, "flashcard response normalized to zero cards; retrying with strict prompt");
    let strict_system = format!("{}{language}", prompts.flashcard_retry_system);
    let retry = client
      .chat_json(&client.strong_model, &strict_system, &user, 0.2, Some(3000))
      .await?;
    if retry.usage.is_some() {
      usage = retry.usage;
    }
    cards = parse_flashcards(&retry.text, count);
  }

  info!(cards = cards.len(), "flashcard generation finished");
  Ok(GenerationOutcome { result: cards, usage })
}

#[instrument(level = "info", skip(client, prompts, content), fields(count, content_len = content.len()))]
pub async fn generate_quiz(
  client: &OpenAI,
  prompts: &Prompts,
  content: &str,
  count: usize,
  locale: Option<&str>,
) -> Result<GenerationOutcome<Vec<NormalizedQuestion>>, GeneratorError> {
  let source = prepare_source(content);
  let system = format!("{}{}", prompts.quiz_system, language_instruction(locale));
  let user = fill_template(
    &prompts.quiz_user_template,
    &[("count", &count.to_string()), ("content", &source)],
  );

  let outcome = client
    .chat_json(&client.fast_model, &system, &user, 0.7, Some(3000))
    .await?;
  let questions = parse_questions(&outcome.text, count);
  info!(questions = questions.len(), "quiz generation finished");
  Ok(GenerationOutcome { result: questions, usage: outcome.usage })
}

#[instrument(level = "info", skip(client, prompts, content), fields(count, content_len = content.len()))]
pub async fn generate_extended_quiz(
  client: &OpenAI,
  prompts: &Prompts,
  content: &str,
  count: usize,
  filter: &TypeFilter,
  locale: Option<&str>,
) -> Result<GenerationOutcome<Vec<NormalizedQuestion>>, GeneratorError> {
  let source = prepare_source(content);
  let system = format!("{}{}", prompts.extended_quiz_system, language_instruction(locale));
  let user = fill_template(
    &prompts.extended_quiz_user_template,
    &[
      ("count", &count.to_string()),
      ("type_instruction", &type_instruction(filter)),
      ("content", &source),
    ],
  );

  let outcome = client
    .chat_json(&client.strong_model, &system, &user, 0.7, Some(4000))
    .await?;
  let questions = parse_questions(&outcome.text, count);
  info!(questions = questions.len(), "extended quiz generation finished");
  Ok(GenerationOutcome { result: questions, usage: outcome.usage })
}

fn type_instruction(filter: &TypeFilter) -> String {
  match filter {
    TypeFilter::Mixed | TypeFilter::All => "Use a VARIETY of question types to make the quiz engaging. Include at least 3 different types.\n\
Aim for this distribution:\n\
- 30% multiple_choice\n\
- 15% true_false\n\
- 15% text_input or fill_blank\n\
- 15% numeric_range or year_range (if content contains numbers/dates)\n\
- 15% matching (if content has related concepts)\n\
- 10% multi_select"
      .to_string(),
    TypeFilter::Only(question_type) => {
      format!("Generate ONLY \"{question_type}\" type questions.")
    }
  }
}

/// Pure parsing half of the flashcard orchestrator: decode, locate the card
/// list, normalize, cap at the requested count.
pub fn parse_flashcards(text: &str, count: usize) -> Vec<GeneratedFlashcard> {
  let Some(value) = decode_lenient(text) else {
    return Vec::new();
  };
  let candidates = locate_array(&value, FLASHCARD_KEYS);
  normalize_flashcards(&candidates).into_iter().take(count).collect()
}

/// Pure parsing half of the quiz orchestrators.
pub fn parse_questions(text: &str, count: usize) -> Vec<NormalizedQuestion> {
  let Some(value) = decode_lenient(text) else {
    return Vec::new();
  };
  locate_array(&value, QUESTION_KEYS)
    .iter()
    .filter_map(normalize_question)
    .take(count)
    .collect()
}
