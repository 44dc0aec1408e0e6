//! Answer Pipeline — validates one spoken/typed answer for a field index.
//!
//! The pipeline is stateless. The confirmation loop (accept → commit, reject →
//! ask the same question again) belongs to the caller; `AnswerSheet` models it
//! as a plain value for callers that want it.

pub mod handlers;

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::draft::{AnswerRecord, ResumeDraft};
use crate::models::field::{FieldType, FIELD_COUNT};
use crate::oracle::{OracleAdapter, ValidationResult};

/// Outcome of one submission, pending user confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub accepted: bool,
    pub value: String,
    pub message: String,
}

/// Validates `raw_text` against the field at `field_index`.
///
/// An accepted answer's value is the oracle's extracted value, or the trimmed raw
/// text when nothing was extracted. Re-submitting the same index is always allowed.
pub async fn submit(
    oracle: &OracleAdapter,
    field_index: usize,
    raw_text: &str,
) -> Result<Submission, AppError> {
    let field = FieldType::from_index(field_index).ok_or_else(|| {
        AppError::Validation(format!(
            "field index must be between 0 and {}, got {field_index}",
            FIELD_COUNT - 1
        ))
    })?;

    let result = oracle.validate(Some(field), raw_text).await;
    info!(
        "Answer for field {} ({}) accepted={}",
        field_index,
        field.token(),
        result.valid
    );

    Ok(to_submission(result, raw_text))
}

fn to_submission(result: ValidationResult, raw_text: &str) -> Submission {
    let value = if result.valid {
        result
            .extracted_info
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| raw_text.trim().to_string())
    } else {
        String::new()
    };

    Submission {
        accepted: result.valid,
        value,
        message: result.message,
    }
}

/// The eight answer records of one interview, held by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSheet {
    records: [AnswerRecord; FIELD_COUNT],
}

impl Default for AnswerSheet {
    fn default() -> Self {
        Self {
            records: std::array::from_fn(AnswerRecord::new),
        }
    }
}

#[allow(dead_code)]
impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, field: FieldType) -> &AnswerRecord {
        &self.records[field.index()]
    }

    /// Stores the pending triple for a field. Committed fields are left untouched.
    pub fn apply(&mut self, field: FieldType, raw_text: &str, submission: &Submission) -> bool {
        let record = &mut self.records[field.index()];
        if record.committed {
            return false;
        }
        record.raw_spoken_text = raw_text.to_string();
        record.extracted_value = submission.value.clone();
        record.validated = submission.accepted;
        true
    }

    /// The user's answer to "is this what you said?".
    ///
    /// `true` commits a validated pending value. `false` discards the pending
    /// triple so the same field is asked again. Returns whether the field is now
    /// committed.
    pub fn confirm(&mut self, field: FieldType, accepted: bool) -> bool {
        let record = &mut self.records[field.index()];
        if record.committed {
            return true;
        }
        if accepted && record.validated && !record.extracted_value.trim().is_empty() {
            record.committed = true;
        } else {
            *record = AnswerRecord::new(field.index());
        }
        record.committed
    }

    /// The first field still waiting for a committed answer.
    pub fn next_open(&self) -> Option<FieldType> {
        self.records
            .iter()
            .find(|r| !r.committed)
            .and_then(AnswerRecord::field)
    }

    pub fn into_draft(self) -> Result<ResumeDraft, AppError> {
        if let Some(open) = self.next_open() {
            return Err(AppError::InvalidDraft(format!(
                "field {} ({}) has not been confirmed",
                open.index(),
                open.token()
            )));
        }
        ResumeDraft::new(
            self.records
                .into_iter()
                .map(|r| r.extracted_value)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::oracle::testing::StubOracle;

    fn adapter(stub: &std::sync::Arc<StubOracle>) -> OracleAdapter {
        OracleAdapter::new(stub.clone(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_submit_uses_extracted_value() {
        let stub = StubOracle::replying(r#"{"valid": true, "message": "ٹھیک", "extractedInfo": "Plumber"}"#);
        let submission = submit(&adapter(&stub), 1, "میں پلمبر ہوں").await.unwrap();

        assert!(submission.accepted);
        assert_eq!(submission.value, "Plumber");
        assert!(stub.last_prompt().unwrap().contains(FieldType::Profession.task()));
    }

    #[tokio::test]
    async fn test_submit_falls_back_to_raw_text_when_nothing_extracted() {
        let stub = StubOracle::replying(r#"{"valid": true, "message": "ٹھیک"}"#);
        let submission = submit(&adapter(&stub), 0, "  محمد علی ").await.unwrap();

        assert!(submission.accepted);
        assert_eq!(submission.value, "محمد علی");
    }

    #[tokio::test]
    async fn test_submit_rejects_out_of_range_index() {
        let stub = StubOracle::replying("{}");
        let err = submit(&adapter(&stub), 8, "anything").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_submission_has_empty_value() {
        let stub = StubOracle::replying(r#"{"valid": false, "message": "دوبارہ بتائیں", "extractedInfo": ""}"#);
        let submission = submit(&adapter(&stub), 2, "پتہ نہیں").await.unwrap();

        assert!(!submission.accepted);
        assert_eq!(submission.value, "");
        assert_eq!(submission.message, "دوبارہ بتائیں");
    }

    fn accepted(value: &str) -> Submission {
        Submission {
            accepted: true,
            value: value.to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn test_rejection_reenters_same_field() {
        let mut sheet = AnswerSheet::new();
        assert!(sheet.apply(FieldType::Name, "ali", &accepted("Ali")));

        assert!(!sheet.confirm(FieldType::Name, false));
        assert_eq!(sheet.next_open(), Some(FieldType::Name));
        assert_eq!(sheet.record(FieldType::Name), &AnswerRecord::new(0));

        sheet.apply(FieldType::Name, "ali raza", &accepted("Ali Raza"));
        assert!(sheet.confirm(FieldType::Name, true));
        assert_eq!(sheet.next_open(), Some(FieldType::Profession));
    }

    #[test]
    fn test_committed_record_is_immutable() {
        let mut sheet = AnswerSheet::new();
        sheet.apply(FieldType::Skills, "wiring", &accepted("Wiring"));
        sheet.confirm(FieldType::Skills, true);

        assert!(!sheet.apply(FieldType::Skills, "plumbing", &accepted("Plumbing")));
        assert!(sheet.confirm(FieldType::Skills, false));
        assert_eq!(sheet.record(FieldType::Skills).extracted_value, "Wiring");
    }

    #[test]
    fn test_invalid_answer_cannot_be_committed() {
        let mut sheet = AnswerSheet::new();
        let rejected = Submission {
            accepted: false,
            value: String::new(),
            message: String::new(),
        };
        sheet.apply(FieldType::Contact, "no idea", &rejected);
        assert!(!sheet.confirm(FieldType::Contact, true));
    }

    #[test]
    fn test_complete_sheet_becomes_draft() {
        let mut sheet = AnswerSheet::new();
        for field in FieldType::ALL {
            sheet.apply(field, "raw", &accepted(field.token()));
            sheet.confirm(field, true);
        }
        assert_eq!(sheet.next_open(), None);

        let draft = sheet.into_draft().unwrap();
        assert_eq!(draft.get(FieldType::Address), "address");
    }

    #[test]
    fn test_incomplete_sheet_is_invalid_draft() {
        let err = AnswerSheet::new().into_draft().unwrap_err();
        assert!(matches!(err, AppError::InvalidDraft(_)));
    }
}
