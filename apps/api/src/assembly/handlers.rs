//! Axum route handler for resume generation.

use axum::{extract::State, response::Response, Extension, Json};
use serde::Deserialize;
use tracing::info;

use crate::assembly::assemble;
use crate::errors::AppError;
use crate::models::draft::ResumeDraft;
use crate::session::SessionId;
use crate::state::AppState;
use crate::store::{self, handlers::pdf_response, NewResume};

#[derive(Debug, Deserialize)]
pub struct GenerateResumeRequest {
    #[serde(default)]
    pub answers: Vec<String>,
}

/// POST /api/generate-resume
///
/// Body: `{"answers": [8 strings]}`. Responds with the PDF itself, plus
/// `X-Session-ID` and `X-Resume-ID` headers.
///
/// Generation and persistence run on their own task: a client that disconnects
/// mid-request does not cut the sequence short.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Json(request): Json<GenerateResumeRequest>,
) -> Result<Response, AppError> {
    let draft = ResumeDraft::new(request.answers)?;
    info!(
        "Generating resume for session {}…",
        session.as_str().get(..8).unwrap_or_default()
    );

    let session_id = session.0.clone();
    let job = tokio::spawn(async move {
        let resume = assemble(&state.oracle, &draft).await?;
        let row = store::insert(
            &state.db,
            &state.s3,
            &state.config.s3_bucket,
            NewResume {
                session_id: &session_id,
                draft: &draft,
                resume: &resume,
            },
        )
        .await?;
        Ok::<_, AppError>((row.id, resume.document_bytes))
    });

    let (resume_id, bytes) = job
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("resume generation task failed: {e}")))??;

    Ok(pdf_response(bytes, "resume.pdf", session.as_str(), Some(resume_id)))
}
