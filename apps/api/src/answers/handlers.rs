//! Axum route handlers for the per-question loop.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::answers::{submit, Submission};
use crate::errors::AppError;
use crate::models::field::FieldType;
use crate::oracle::{OracleAdapter, ValidationResult};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateAnswerRequest {
    #[serde(default)]
    pub question_type: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub index: usize,
    pub field_type: FieldType,
    pub prompt: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/validate-answer
///
/// `questionType` is normally one of the eight field tokens. Anything else is
/// matched by keyword, and failing that validated with the generic task.
/// A blank answer is a normal `valid: false` result, not a request error.
pub async fn handle_validate_answer(
    State(state): State<AppState>,
    Json(request): Json<ValidateAnswerRequest>,
) -> Result<Json<ValidationResult>, AppError> {
    validate_request(&state.oracle, &request).await.map(Json)
}

async fn validate_request(
    oracle: &OracleAdapter,
    request: &ValidateAnswerRequest,
) -> Result<ValidationResult, AppError> {
    if request.question_type.trim().is_empty() {
        return Err(AppError::Validation("Missing questionType".to_string()));
    }

    let field = FieldType::from_token(&request.question_type)
        .or_else(|| FieldType::sniff(&request.question_type));
    info!(
        "Validating answer for questionType={:?} (resolved {:?})",
        request.question_type,
        field.map(FieldType::token)
    );

    Ok(oracle.validate(field, &request.answer).await)
}

/// POST /api/answers/:index
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<Submission>, AppError> {
    let submission = submit(&state.oracle, index, &request.answer).await?;
    Ok(Json(submission))
}

/// GET /api/questions
pub async fn handle_list_questions() -> Json<Vec<QuestionView>> {
    Json(
        FieldType::ALL
            .into_iter()
            .map(|field| QuestionView {
                index: field.index(),
                field_type: field,
                prompt: field.prompt(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{http::StatusCode, response::IntoResponse};

    use super::*;
    use crate::oracle::messages;
    use crate::oracle::testing::StubOracle;

    fn request(body: &str) -> ValidateAnswerRequest {
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn test_missing_question_type_is_bad_request() {
        let stub = StubOracle::replying(r#"{"valid": true}"#);
        let oracle = OracleAdapter::new(stub.clone(), Duration::from_secs(5));

        let err = validate_request(&oracle, &request(r#"{"answer": "Ali"}"#))
            .await
            .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_answer_is_invalid_not_an_error() {
        let stub = StubOracle::replying(r#"{"valid": true}"#);
        let oracle = OracleAdapter::new(stub.clone(), Duration::from_secs(5));

        let result = validate_request(
            &oracle,
            &request(r#"{"questionType": "name", "answer": "   "}"#),
        )
        .await
        .unwrap();

        assert!(!result.valid);
        assert_eq!(result.message, messages::ANSWER_EMPTY);
        assert_eq!(result.extracted_info, None);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_known_question_type_reaches_oracle() {
        let stub = StubOracle::replying(
            r#"{"valid": true, "message": "ٹھیک", "extractedInfo": "Muhammad Ali"}"#,
        );
        let oracle = OracleAdapter::new(stub.clone(), Duration::from_secs(5));

        let result = validate_request(
            &oracle,
            &request(r#"{"questionType": "name", "answer": "میرا نام محمد علی ہے"}"#),
        )
        .await
        .unwrap();

        assert!(result.valid);
        assert_eq!(result.extracted_info.as_deref(), Some("Muhammad Ali"));
        assert_eq!(stub.calls(), 1);
    }
}
