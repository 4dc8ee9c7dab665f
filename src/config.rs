//! Loading generator configuration (prompt set) from TOML.
//!
//! Built-in defaults cover all four content types; a TOML file referenced by
//! GENERATOR_CONFIG_PATH can override any prompt to tune tone or structure
//! without rebuilding.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GeneratorConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompts used by the generation orchestrators. User templates are filled
/// with `{count}` / `{content}` / `{type_instruction}` placeholders.
/// Missing keys in a TOML override fall back to the built-in defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub summary_system: String,
  pub summary_user_template: String,
  pub flashcard_system: String,
  /// Stricter shape-only prompt used when the first flashcard pass
  /// normalizes to zero cards.
  pub flashcard_retry_system: String,
  pub flashcard_user_template: String,
  pub quiz_system: String,
  pub quiz_user_template: String,
  pub extended_quiz_system: String,
  pub extended_quiz_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      summary_system: r#"You are an expert educator. Generate a clear, well-organized summary of the provided content.
Focus on key concepts, main ideas, and important details.
Use markdown formatting for better readability (headings, bullet points, etc.).
Keep the summary concise but comprehensive."#
        .into(),
      summary_user_template: "Please summarize the following content:\n\n{content}".into(),

      flashcard_system: r#"You are an expert educator creating flashcards for spaced repetition learning.
Generate flashcards that test understanding of key concepts.
Each flashcard should have:
- A clear, specific question or prompt on the front
- A concise, accurate answer on the back
Make sure the questions vary in difficulty and cover different aspects of the material.
Return as a JSON array with objects containing "front" and "back" fields."#
        .into(),
      flashcard_retry_system: r#"You are a flashcard generator. Return ONLY strict JSON, no prose.
The response must be exactly this shape:
{"flashcards": [{"front": "question text", "back": "answer text"}]}
Every "front" and every "back" must be a non-empty string."#
        .into(),
      flashcard_user_template: "Generate {count} flashcards from the following content. Return ONLY a JSON array, no other text:\n\n{content}".into(),

      quiz_system: r#"You are an expert educator creating multiple-choice quiz questions.
Generate questions that test understanding, not just memorization.
Each question should have:
- A clear question
- 4 answer options (one correct, three plausible distractors)
- An explanation of why the correct answer is right
Return as a JSON array with objects containing:
- "question": the question text
- "options": array of 4 answer strings
- "correctAnswer": index (0-3) of the correct option
- "explanation": brief explanation of the answer"#
        .into(),
      quiz_user_template: "Generate {count} multiple-choice quiz questions from the following content. Return ONLY a JSON array, no other text:\n\n{content}".into(),

      extended_quiz_system: r#"You are an expert educator creating diverse quiz questions.
Generate questions that test understanding using various question types.

Available question types:
1. multiple_choice - Traditional multiple choice with 4 options
2. true_false - Binary true/false questions
3. text_input - Free text answers with keywords to match
4. year_range - Questions asking for a year (with tolerance for partial credit)
5. numeric_range - Questions asking for a number (with tolerance)
6. matching - Match items from two columns
7. fill_blank - Complete sentences with missing words
8. multi_select - Select ALL correct answers from options

Return a JSON object with "questions" array. Each question object MUST have:
- "question": the question text
- "questionType": one of the types above
- "questionConfig": type-specific configuration
- "correctAnswerData": the correct answer(s)
- "points": point value (1-3 based on difficulty)
- "explanation": brief explanation

Type-specific formats:

multiple_choice:
  questionConfig: { options: ["A", "B", "C", "D"], shuffleOptions: true }
  correctAnswerData: { correctIndex: 0 }

true_false:
  questionConfig: { trueLabel: "True", falseLabel: "False" }
  correctAnswerData: { isTrue: true }

text_input:
  questionConfig: { caseSensitive: false, acceptedKeywords: ["keyword1", "keyword2"] }
  correctAnswerData: { exactMatch: "correct answer", keywords: ["key", "words"] }

year_range:
  questionConfig: { minYear: 1900, maxYear: 2024, toleranceYears: 5 }
  correctAnswerData: { exactYear: 1969 }

numeric_range:
  questionConfig: { minValue: 0, maxValue: 1000, tolerancePercent: 10, unit: "km" }
  correctAnswerData: { exactValue: 384400 }

matching:
  questionConfig: { leftColumn: ["Term1", "Term2"], rightColumn: ["Def1", "Def2"], shuffleRight: true }
  correctAnswerData: { correctPairs: [[0, 0], [1, 1]] }

fill_blank:
  question: "Fill in the blank to complete the sentence:"
  questionConfig: { template: "The {{blank}} is the capital of France.", blanks: [{ id: "blank_0", acceptedAnswers: ["Paris", "paris"] }], caseSensitive: false }
  correctAnswerData: { blanks: { "blank_0": ["Paris", "paris"] } }
  NOTE: Use {{blank}} as placeholder in template, NOT ___ or other formats. The question field should be instructions, template goes in questionConfig.

multi_select:
  questionConfig: { options: ["A", "B", "C", "D"], minSelections: 1, maxSelections: 4 }
  correctAnswerData: { correctIndices: [0, 2] }"#
        .into(),
      extended_quiz_user_template: r#"Generate {count} quiz questions from the following content.

{type_instruction}

Important:
- Questions should test understanding, not just memorization
- Vary difficulty (mix of easy, medium, hard questions)
- Assign points based on difficulty (1=easy, 2=medium, 3=hard)
- Provide clear explanations for each answer
- For matching questions, use 3-5 pairs maximum
- For fill_blank, use 1-2 blanks per question

Content to generate questions from:
{content}"#
        .into(),
    }
  }
}

/// Attempt to load `GeneratorConfig` from GENERATOR_CONFIG_PATH. On any
/// parsing/IO error, returns None and the built-in defaults apply.
pub fn load_generator_config_from_env() -> Option<GeneratorConfig> {
  let path = std::env::var("GENERATOR_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(raw) => match toml::from_str::<GeneratorConfig>(&raw) {
      Ok(cfg) => {
        info!(target: "studygen_backend", %path, "Loaded generator config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "studygen_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "studygen_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_prompts_mention_the_expected_shapes() {
    let prompts = Prompts::default();
    assert!(prompts.flashcard_system.contains("\"front\""));
    assert!(prompts.extended_quiz_system.contains("questionType"));
    assert!(prompts.flashcard_user_template.contains("{count}"));
    assert!(prompts.extended_quiz_user_template.contains("{type_instruction}"));
  }

  #[test]
  fn toml_override_keeps_missing_sections_default() {
    let cfg: GeneratorConfig = toml::from_str("").expect("empty config parses");
    assert_eq!(cfg.prompts.summary_system, Prompts::default().summary_system);
  }

  #[test]
  fn partial_prompt_override_keeps_other_defaults() {
    let cfg: GeneratorConfig = toml::from_str(
      "[prompts]\nsummary_system = \"Summarize tersely.\"\n",
    )
    .expect("partial config parses");
    assert_eq!(cfg.prompts.summary_system, "Summarize tersely.");
    assert_eq!(cfg.prompts.quiz_system, Prompts::default().quiz_system);
  }
}
