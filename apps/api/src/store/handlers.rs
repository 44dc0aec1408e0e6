//! Axum route handlers for stored resumes. All routes sit behind the session
//! middleware, so a `SessionId` extension is always present.

use axum::{
    extract::{Path, State},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::{SessionId, SESSION_HEADER};
use crate::state::AppState;
use crate::store;

/// A PDF download response carrying the session (and, when known, resume) id.
pub fn pdf_response(
    bytes: impl Into<axum::body::Body>,
    filename: &str,
    session_id: &str,
    resume_id: Option<Uuid>,
) -> Response {
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
        (HeaderName::from_static(SESSION_HEADER), session_id.to_string()),
    ];
    let body: axum::body::Body = bytes.into();
    let mut response = (headers, body).into_response();

    if let Some(id) = resume_id {
        if let Ok(value) = id.to_string().parse() {
            response
                .headers_mut()
                .insert(HeaderName::from_static("x-resume-id"), value);
        }
    }
    response
}

/// GET /api/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> Result<Json<Value>, AppError> {
    let resumes = store::list_for_session(&state.db, session.as_str()).await?;
    Ok(Json(json!({
        "success": true,
        "count": resumes.len(),
        "resumes": resumes
    })))
}

/// GET /api/resumes/stats
pub async fn handle_resume_stats(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> Result<Json<Value>, AppError> {
    let stats = store::stats(&state.db, session.as_str()).await?;
    Ok(Json(json!({
        "success": true,
        "stats": stats
    })))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(resume_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let bytes = store::fetch_pdf(
        &state.db,
        &state.s3,
        &state.config.s3_bucket,
        session.as_str(),
        resume_id,
    )
    .await?;

    Ok(pdf_response(
        bytes,
        &format!("resume-{resume_id}.pdf"),
        session.as_str(),
        Some(resume_id),
    ))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    store::delete(
        &state.db,
        &state.s3,
        &state.config.s3_bucket,
        session.as_str(),
        resume_id,
    )
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Resume deleted successfully"
    })))
}
