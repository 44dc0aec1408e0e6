//! Interpretation of the oracle's validation reply.
//!
//! The oracle is asked for a JSON object but often wraps it in prose, fences,
//! or produces something only JSON-shaped. Each reply is classified into one of
//! three tiers so every tier can be exercised on its own:
//!
//! - `Parsed`: a balanced `{...}` span deserialized cleanly.
//! - `HeuristicRecovered`: no usable JSON; validity and the extracted value
//!   were scraped from the raw text.
//! - `Failed`: nothing came back (call error, timeout, or empty text).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::models::field::{FieldType, PostProcess};
use crate::oracle::fallback::{extract_phone_digits, offline_validation};
use crate::oracle::messages;
use crate::oracle::ValidationResult;

static EXTRACTED_INFO_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)"?extractedInfo"?\s*:\s*"([^"]*)""#).unwrap());

/// The structured reply the validation prompt asks for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReply {
    pub valid: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    extracted_info: Option<Value>,
}

impl ValidationReply {
    /// The extracted value as text. Numbers are accepted since phone numbers
    /// sometimes come back unquoted.
    pub fn extracted_info(&self) -> Option<String> {
        match &self.extracted_info {
            Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OracleVerdict {
    Parsed(ValidationReply),
    HeuristicRecovered {
        valid: bool,
        extracted_info: Option<String>,
    },
    Failed,
}

/// Classifies raw oracle text into a verdict tier.
pub fn interpret_validation_reply(text: &str) -> OracleVerdict {
    if text.trim().is_empty() {
        return OracleVerdict::Failed;
    }

    if let Some(span) = first_json_object(text) {
        match serde_json::from_str::<ValidationReply>(span) {
            Ok(reply) => return OracleVerdict::Parsed(reply),
            Err(e) => warn!("Malformed oracle validation reply ({e}); scanning text instead"),
        }
    } else {
        warn!("Oracle validation reply contained no JSON object; scanning text instead");
    }

    heuristic_scan(text)
}

fn heuristic_scan(text: &str) -> OracleVerdict {
    let lowered = text.to_lowercase();
    let valid = lowered.contains("valid") && lowered.contains("true");
    let extracted_info = EXTRACTED_INFO_PATTERN
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());

    OracleVerdict::HeuristicRecovered {
        valid,
        extracted_info,
    }
}

/// Returns the first balanced `{...}` span, ignoring braces inside JSON strings.
/// An opening brace that never closes is skipped and the scan resumes at the next one.
pub fn first_json_object(text: &str) -> Option<&str> {
    text.match_indices('{')
        .find_map(|(start, _)| balanced_from(text, start))
}

fn balanced_from(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

impl OracleVerdict {
    /// Turns a verdict into the caller-facing result. `Failed` drops to the
    /// offline rules; the other tiers apply the field's post-processing.
    pub fn resolve(self, field: Option<FieldType>, raw_answer: &str) -> ValidationResult {
        let (valid, message, extracted) = match self {
            OracleVerdict::Failed => return offline_validation(field, raw_answer),
            OracleVerdict::Parsed(reply) => {
                let extracted = reply.extracted_info();
                (reply.valid, reply.message.trim().to_string(), extracted)
            }
            OracleVerdict::HeuristicRecovered {
                valid,
                extracted_info,
            } => {
                let extracted = match extracted_info {
                    Some(value) => Some(value),
                    None if valid => Some(raw_answer.trim().to_string()),
                    None => None,
                };
                (valid, String::new(), extracted)
            }
        };

        let extracted = match (field.map(FieldType::post_process), extracted) {
            (Some(PostProcess::PhoneDigits), Some(value)) if valid => {
                Some(extract_phone_digits(&value).unwrap_or(value))
            }
            (_, value) => value,
        };

        let message = if message.is_empty() {
            default_message(field, valid).to_string()
        } else {
            message
        };

        ValidationResult {
            valid,
            message,
            extracted_info: extracted,
        }
    }
}

fn default_message(field: Option<FieldType>, valid: bool) -> &'static str {
    match (field, valid) {
        (Some(FieldType::Contact), true) => messages::PHONE_VALID,
        (Some(FieldType::Contact), false) => messages::PHONE_INVALID,
        (_, true) => messages::ANSWER_VALID,
        (_, false) => messages::ANSWER_INVALID,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_json_object_skips_surrounding_prose() {
        let text = "Sure! Here it is: {\"valid\": true, \"extractedInfo\": \"Ali\"} Hope that helps.";
        assert_eq!(
            first_json_object(text),
            Some("{\"valid\": true, \"extractedInfo\": \"Ali\"}")
        );
    }

    #[test]
    fn test_first_json_object_handles_nesting_and_braces_in_strings() {
        let text = r#"{"valid": true, "message": "looks {fine}", "meta": {"a": 1}} trailing }"#;
        assert_eq!(
            first_json_object(text),
            Some(r#"{"valid": true, "message": "looks {fine}", "meta": {"a": 1}}"#)
        );
    }

    #[test]
    fn test_first_json_object_unbalanced_is_none() {
        assert_eq!(first_json_object("{\"valid\": true"), None);
        assert_eq!(first_json_object("no braces here"), None);
    }

    #[test]
    fn test_first_json_object_skips_unclosed_brace_in_prose() {
        let text = r#"see {note, then {"valid": true, "extractedInfo": "Ali"}"#;
        assert_eq!(
            first_json_object(text),
            Some(r#"{"valid": true, "extractedInfo": "Ali"}"#)
        );

        let verdict = interpret_validation_reply(text);
        assert!(matches!(verdict, OracleVerdict::Parsed(ref reply) if reply.valid));
    }

    #[test]
    fn test_clean_json_is_parsed() {
        let verdict = interpret_validation_reply(
            r#"{"valid": true, "message": "نام درست ہے", "extractedInfo": "Muhammad Ali"}"#,
        );
        match verdict {
            OracleVerdict::Parsed(reply) => {
                assert!(reply.valid);
                assert_eq!(reply.extracted_info().as_deref(), Some("Muhammad Ali"));
            }
            other => panic!("expected Parsed, got {other:?}"),
        }
    }

    #[test]
    fn test_numeric_extracted_info_is_stringified() {
        let verdict = interpret_validation_reply(r#"{"valid": true, "extractedInfo": 3001234567}"#);
        let OracleVerdict::Parsed(reply) = verdict else {
            panic!("expected Parsed");
        };
        assert_eq!(reply.extracted_info().as_deref(), Some("3001234567"));
    }

    #[test]
    fn test_broken_json_falls_to_heuristic() {
        let verdict = interpret_validation_reply(
            "{valid: true, extractedInfo: \"Electrician\", message: 'ok'}",
        );
        assert_eq!(
            verdict,
            OracleVerdict::HeuristicRecovered {
                valid: true,
                extracted_info: Some("Electrician".to_string()),
            }
        );
    }

    #[test]
    fn test_heuristic_without_true_is_invalid() {
        let verdict = interpret_validation_reply("The answer is not valid.");
        assert_eq!(
            verdict,
            OracleVerdict::HeuristicRecovered {
                valid: false,
                extracted_info: None,
            }
        );
    }

    #[test]
    fn test_empty_reply_is_failed() {
        assert_eq!(interpret_validation_reply("   \n"), OracleVerdict::Failed);
    }

    #[test]
    fn test_heuristic_resolution_defaults_to_raw_answer() {
        let verdict = OracleVerdict::HeuristicRecovered {
            valid: true,
            extracted_info: None,
        };
        let result = verdict.resolve(Some(FieldType::Profession), "  plumber ");
        assert!(result.valid);
        assert_eq!(result.extracted_info.as_deref(), Some("plumber"));
        assert_eq!(result.message, messages::ANSWER_VALID);
    }

    #[test]
    fn test_invalid_heuristic_resolution_has_no_extracted_info() {
        let verdict = OracleVerdict::HeuristicRecovered {
            valid: false,
            extracted_info: None,
        };
        let result = verdict.resolve(Some(FieldType::Profession), "  ہمم ");
        assert!(!result.valid);
        assert_eq!(result.extracted_info, None);
        assert_eq!(result.message, messages::ANSWER_INVALID);
    }

    #[test]
    fn test_parsed_contact_is_reduced_to_digits() {
        let verdict = interpret_validation_reply(
            r#"{"valid": true, "message": "", "extractedInfo": "+92 300-1234567"}"#,
        );
        let result = verdict.resolve(Some(FieldType::Contact), "+92 300-1234567");
        assert!(result.valid);
        assert_eq!(result.extracted_info.as_deref(), Some("923001234567"));
        assert_eq!(result.message, messages::PHONE_VALID);
    }

    #[test]
    fn test_parsed_message_is_kept() {
        let verdict = interpret_validation_reply(
            r#"{"valid": false, "message": "پیشہ واضح نہیں", "extractedInfo": ""}"#,
        );
        let result = verdict.resolve(Some(FieldType::Profession), "ہمم");
        assert!(!result.valid);
        assert_eq!(result.message, "پیشہ واضح نہیں");
        assert_eq!(result.extracted_info, None);
    }

    #[test]
    fn test_failed_verdict_uses_offline_rules() {
        let result = OracleVerdict::Failed.resolve(Some(FieldType::Name), "Ali Raza");
        assert!(result.valid);
        assert_eq!(result.extracted_info.as_deref(), Some("Ali Raza"));
    }
}
