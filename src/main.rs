//! Studygen · AI study-material generation backend
//!
//! - Normalization pipeline for generated summaries, flashcards and quizzes
//! - OpenAI integration (via environment variables)
//! - CLI driver: generate content from a local source file and print JSON
//!
//! Important env variables:
//!   OPENAI_API_KEY        : required; enables the generator client
//!   OPENAI_BASE_URL       : default "https://api.openai.com/v1"
//!   OPENAI_FAST_MODEL     : default "gpt-4o-mini"
//!   OPENAI_STRONG_MODEL   : default "gpt-4o"
//!   GENERATOR_CONFIG_PATH : path to TOML config (prompt overrides)
//!   LOG_LEVEL             : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT            : "pretty" (default) or "json"
//!
//! Usage:
//!   studygen-backend <summary|flashcards|quiz|extended> <source-file> [count] [locale] [type]

mod telemetry;
mod util;
mod domain;
mod config;
mod coerce;
mod decode;
mod resolve;
mod blanks;
mod normalize;
mod flashcards;
mod openai;
mod generate;

use tracing::info;

use crate::domain::{TokenUsage, TypeFilter};
use crate::generate::{
  generate_extended_quiz, generate_flashcards, generate_quiz, generate_summary,
};
use crate::normalize::canonical_question_type;
use crate::openai::OpenAI;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  dotenv::dotenv().ok();
  telemetry::init_tracing();

  let args: Vec<String> = std::env::args().skip(1).collect();
  let (kind, path) = match (args.first(), args.get(1)) {
    (Some(kind), Some(path)) => (kind.as_str(), path.as_str()),
    _ => {
      eprintln!("usage: studygen-backend <summary|flashcards|quiz|extended> <source-file> [count] [locale] [type]");
      std::process::exit(2);
    }
  };
  let count = args.get(2).and_then(|raw| raw.parse::<usize>().ok());
  let locale = args.get(3).map(|s| s.as_str());

  let content = std::fs::read_to_string(path)?;

  let Some(client) = OpenAI::from_env() else {
    eprintln!("OPENAI_API_KEY is not set; cannot reach the generator");
    std::process::exit(1);
  };
  let prompts = config::load_generator_config_from_env()
    .map(|cfg| cfg.prompts)
    .unwrap_or_default();

  match kind {
    "summary" => {
      let out = generate_summary(&client, &prompts, &content, locale).await?;
      println!("{}", out.result);
      log_usage(out.usage.as_ref());
    }
    "flashcards" => {
      let out =
        generate_flashcards(&client, &prompts, &content, count.unwrap_or(10), locale).await?;
      println!("{}", serde_json::to_string_pretty(&out.result)?);
      log_usage(out.usage.as_ref());
    }
    "quiz" => {
      let out = generate_quiz(&client, &prompts, &content, count.unwrap_or(5), locale).await?;
      println!("{}", serde_json::to_string_pretty(&out.result)?);
      log_usage(out.usage.as_ref());
    }
    "extended" => {
      let filter = match args.get(4).map(|s| s.as_str()) {
        None | Some("mixed") => TypeFilter::Mixed,
        Some("all") => TypeFilter::All,
        Some(slug) => TypeFilter::Only(canonical_question_type(slug)),
      };
      let out =
        generate_extended_quiz(&client, &prompts, &content, count.unwrap_or(10), &filter, locale)
          .await?;
      println!("{}", serde_json::to_string_pretty(&out.result)?);
      log_usage(out.usage.as_ref());
    }
    other => {
      eprintln!("unknown content type: {other}");
      std::process::exit(2);
    }
  }

  Ok(())
}

fn log_usage(usage: Option<&TokenUsage>) {
  if let Some(usage) = usage {
    info!(
      target: "studygen_backend",
      total_tokens = usage.total_tokens,
      prompt_tokens = ?usage.prompt_tokens,
      completion_tokens = ?usage.completion_tokens,
      "generation usage"
    );
  }
}
