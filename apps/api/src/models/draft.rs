#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::field::{FieldType, FIELD_COUNT};

/// One question's answer as it moves through the confirmation loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub index: usize,
    pub raw_spoken_text: String,
    pub extracted_value: String,
    pub validated: bool,
    /// Set once the user confirms the extracted value. Committed records never change.
    pub committed: bool,
}

impl AnswerRecord {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    pub fn field(&self) -> Option<FieldType> {
        FieldType::from_index(self.index)
    }
}

/// The eight committed answers, in field order. The only input to resume assembly.
///
/// Construction enforces exactly eight entries and no blank entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeDraft {
    answers: [String; FIELD_COUNT],
}

impl ResumeDraft {
    pub fn new(answers: Vec<String>) -> Result<Self, AppError> {
        let count = answers.len();
        let answers: [String; FIELD_COUNT] = answers.try_into().map_err(|_| {
            AppError::InvalidDraft(format!("expected {FIELD_COUNT} answers, got {count}"))
        })?;

        if let Some(blank) = answers.iter().position(|a| a.trim().is_empty()) {
            let field = FieldType::ALL[blank].token();
            return Err(AppError::InvalidDraft(format!(
                "answer {blank} ({field}) is empty"
            )));
        }

        Ok(Self { answers })
    }

    pub fn answers(&self) -> &[String; FIELD_COUNT] {
        &self.answers
    }

    pub fn get(&self, field: FieldType) -> &str {
        &self.answers[field.index()]
    }
}

/// Everything the assembler produces for one draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedResume {
    pub translated_answers: [String; FIELD_COUNT],
    pub professional_summary: String,
    pub additional_skills: String,
    pub experience_learnings: String,
    #[serde(skip)]
    pub document_bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("answer {i}")).collect()
    }

    #[test]
    fn test_draft_accepts_eight_answers() {
        let draft = ResumeDraft::new(answers(8)).unwrap();
        assert_eq!(draft.get(FieldType::Contact), "answer 7");
        assert_eq!(draft.answers().len(), FIELD_COUNT);
    }

    #[test]
    fn test_draft_rejects_wrong_length() {
        for n in [0, 7, 9] {
            let err = ResumeDraft::new(answers(n)).unwrap_err();
            assert!(matches!(err, AppError::InvalidDraft(_)), "n={n}");
        }
    }

    #[test]
    fn test_draft_rejects_blank_entry() {
        let mut a = answers(8);
        a[3] = "   ".to_string();
        match ResumeDraft::new(a).unwrap_err() {
            AppError::InvalidDraft(msg) => assert!(msg.contains("skills")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_answer_record_starts_empty() {
        let record = AnswerRecord::new(2);
        assert_eq!(record.field(), Some(FieldType::Education));
        assert!(record.raw_spoken_text.is_empty());
        assert!(!record.validated);
        assert!(!record.committed);
    }
}
