//! Deterministic, oracle-free substitutes used when the oracle cannot answer.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::field::{FieldType, FIELD_COUNT};
use crate::oracle::messages;
use crate::oracle::ValidationResult;

/// Minimum trimmed length (in characters) for an answer to pass offline.
const MIN_OFFLINE_ANSWER_CHARS: usize = 3;
/// Shortest digit run accepted as a phone number.
const MIN_PHONE_DIGITS: usize = 4;

// A digit run that may be broken up by spaces or dashes, e.g. "0300-1234567".
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\d[\d\s\-]*\d").unwrap());

/// Finds the first phone-like run with at least four digits and returns its digits.
pub fn extract_phone_digits(text: &str) -> Option<String> {
    PHONE_PATTERN
        .find_iter(text)
        .map(|m| {
            m.as_str()
                .chars()
                .filter(char::is_ascii_digit)
                .collect::<String>()
        })
        .find(|digits| digits.len() >= MIN_PHONE_DIGITS)
}

/// Validation used when the oracle is unreachable.
///
/// Contact answers must contain a phone number; everything else passes on length.
pub fn offline_validation(field: Option<FieldType>, raw_answer: &str) -> ValidationResult {
    let trimmed = raw_answer.trim();

    if field == Some(FieldType::Contact) {
        return match extract_phone_digits(trimmed) {
            Some(digits) => ValidationResult {
                valid: true,
                message: messages::PHONE_VALID.to_string(),
                extracted_info: Some(digits),
            },
            None => ValidationResult {
                valid: false,
                message: messages::PHONE_INVALID.to_string(),
                extracted_info: None,
            },
        };
    }

    if trimmed.chars().count() >= MIN_OFFLINE_ANSWER_CHARS {
        ValidationResult {
            valid: true,
            message: messages::ANSWER_VALID.to_string(),
            extracted_info: Some(trimmed.to_string()),
        }
    } else {
        ValidationResult {
            valid: false,
            message: messages::ANSWER_UNVERIFIED.to_string(),
            extracted_info: None,
        }
    }
}

/// Template summary used when the oracle cannot write one.
pub fn summary_template(answers: &[String; FIELD_COUNT]) -> String {
    let non_empty = |field: FieldType| {
        let value = answers[field.index()].trim();
        (!value.is_empty()).then_some(value)
    };

    let profession = non_empty(FieldType::Profession).unwrap_or("Professional");
    let skills = non_empty(FieldType::Skills).unwrap_or("various skills");
    let experience_clause = match non_empty(FieldType::Experience) {
        Some(_) => "Has relevant work experience.",
        None => "Ready to contribute to organizational success.",
    };

    format!("{profession} with experience in {skills}. {experience_clause}")
}

/// Removes whitespace and any matching quote pairs wrapped around oracle text.
pub fn strip_wrapping_quotes(text: &str) -> String {
    const QUOTES: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('“', '”'), ('`', '`')];

    let mut current = text.trim();
    loop {
        let stripped = QUOTES.iter().find_map(|&(open, close)| {
            current
                .strip_prefix(open)
                .and_then(|s| s.strip_suffix(close))
        });
        match stripped {
            Some(inner) => current = inner.trim(),
            None => return current.to_string(),
        }
    }
}
