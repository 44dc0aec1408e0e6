//! Oracle Adapter — best-effort wrappers around the text-generation oracle.
//!
//! Four operations: answer validation, translation, professional summary, and
//! enrichment. None of them can fail: every oracle error, timeout, or
//! unparseable reply is logged and replaced by a deterministic fallback.
//!
//! Fallback tiers:
//! - validate:  Parsed JSON → heuristic text scan → offline length/phone rules
//! - translate: oracle text → original input unchanged
//! - summarize: oracle text → fixed template
//! - enrich:    oracle text → empty string

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, PLAIN_TEXT_SYSTEM, SPEECH_INPUT_NOTE};
use crate::llm_client::{LlmError, TextOracle};
use crate::models::field::{FieldType, FIELD_COUNT, GENERIC_TASK};

pub mod fallback;
pub mod messages;
pub mod prompts;
pub mod reply;
#[cfg(test)]
pub mod testing;

use fallback::{strip_wrapping_quotes, summary_template};
use prompts::{
    ADDITIONAL_SKILLS_PROMPT_TEMPLATE, EXPERIENCE_LEARNINGS_PROMPT_TEMPLATE, NOT_PROVIDED,
    SUMMARY_PROMPT_TEMPLATE, TRANSLATION_PROMPT_TEMPLATE, VALIDATION_PROMPT_TEMPLATE,
};
use reply::{interpret_validation_reply, OracleVerdict};

/// Verdict on one answer, as returned to the question loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_info: Option<String>,
}

impl ValidationResult {
    fn empty_answer() -> Self {
        Self {
            valid: false,
            message: messages::ANSWER_EMPTY.to_string(),
            extracted_info: None,
        }
    }
}

/// The two enrichment blocks added to a resume.
#[derive(Debug, Clone, Copy)]
pub enum Enrichment<'a> {
    AdditionalSkills { profession: &'a str, skills: &'a str },
    ExperienceLearnings { experience: &'a str, profession: &'a str },
}

impl Enrichment<'_> {
    fn label(&self) -> &'static str {
        match self {
            Enrichment::AdditionalSkills { .. } => "additional skills",
            Enrichment::ExperienceLearnings { .. } => "experience learnings",
        }
    }

    fn prompt(&self) -> String {
        match self {
            Enrichment::AdditionalSkills { profession, skills } => {
                ADDITIONAL_SKILLS_PROMPT_TEMPLATE
                    .replace("{profession}", profession)
                    .replace("{skills}", skills)
            }
            Enrichment::ExperienceLearnings {
                experience,
                profession,
            } => EXPERIENCE_LEARNINGS_PROMPT_TEMPLATE
                .replace("{experience}", experience)
                .replace("{profession}", profession),
        }
    }
}

#[derive(Clone)]
pub struct OracleAdapter {
    oracle: Arc<dyn TextOracle>,
    timeout: Duration,
}

impl OracleAdapter {
    pub fn new(oracle: Arc<dyn TextOracle>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    /// One bounded oracle round-trip. Expiry is reported as `LlmError::Timeout`.
    async fn ask(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        tokio::time::timeout(self.timeout, self.oracle.generate(prompt, system))
            .await
            .unwrap_or(Err(LlmError::Timeout(self.timeout)))
    }

    /// Validates one answer and extracts its value.
    ///
    /// `field` is `None` when the caller's field type is unknown; the generic
    /// task is used. Blank answers are rejected without calling the oracle.
    pub async fn validate(&self, field: Option<FieldType>, raw_answer: &str) -> ValidationResult {
        if raw_answer.trim().is_empty() {
            return ValidationResult::empty_answer();
        }

        let task = field.map(FieldType::task).unwrap_or(GENERIC_TASK);
        let prompt = VALIDATION_PROMPT_TEMPLATE
            .replace("{task}", task)
            .replace("{speech_note}", SPEECH_INPUT_NOTE)
            .replace("{answer}", raw_answer.trim());

        let verdict = match self.ask(&prompt, JSON_ONLY_SYSTEM).await {
            Ok(text) => interpret_validation_reply(&text),
            Err(e) => {
                warn!("Oracle unavailable for validation ({e}); using offline rules");
                OracleVerdict::Failed
            }
        };
        debug!(
            "Validation verdict for {:?}: {:?}",
            field.map(FieldType::token),
            verdict
        );

        verdict.resolve(field, raw_answer)
    }

    /// Translates free text to English. Returns the input unchanged on failure.
    pub async fn translate(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let prompt = TRANSLATION_PROMPT_TEMPLATE.replace("{text}", text.trim());
        match self.ask(&prompt, PLAIN_TEXT_SYSTEM).await {
            Ok(output) => {
                let cleaned = strip_wrapping_quotes(&output);
                if cleaned.is_empty() {
                    warn!("Oracle returned an empty translation; keeping original text");
                    text.to_string()
                } else {
                    cleaned
                }
            }
            Err(e) => {
                warn!("Oracle unavailable for translation ({e}); keeping original text");
                text.to_string()
            }
        }
    }

    /// Writes a 2–3 sentence professional summary from the (untranslated) answers.
    pub async fn summarize(&self, answers: &[String; FIELD_COUNT]) -> String {
        let value = |field: FieldType| {
            let answer = answers[field.index()].trim();
            if answer.is_empty() {
                NOT_PROVIDED
            } else {
                answer
            }
        };

        let prompt = SUMMARY_PROMPT_TEMPLATE
            .replace("{name}", value(FieldType::Name))
            .replace("{profession}", value(FieldType::Profession))
            .replace("{education}", value(FieldType::Education))
            .replace("{skills}", value(FieldType::Skills))
            .replace("{experience}", value(FieldType::Experience))
            .replace("{certifications}", value(FieldType::Certifications));

        match self.ask(&prompt, PLAIN_TEXT_SYSTEM).await {
            Ok(output) if !output.trim().is_empty() => strip_wrapping_quotes(&output),
            Ok(_) => {
                warn!("Oracle returned an empty summary; using template");
                summary_template(answers)
            }
            Err(e) => {
                warn!("Oracle unavailable for summary ({e}); using template");
                summary_template(answers)
            }
        }
    }

    /// Generates one enrichment block. Empty on failure; enrichment is optional.
    pub async fn enrich(&self, kind: Enrichment<'_>) -> String {
        match self.ask(&kind.prompt(), PLAIN_TEXT_SYSTEM).await {
            Ok(output) => output.trim().to_string(),
            Err(e) => {
                warn!("Oracle unavailable for {} ({e}); omitting", kind.label());
                String::new()
            }
        }
    }
}
