//! Axum route handlers for explicit session management.

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::session::middleware::SessionQuery;
use crate::session::{create_session, get_session_info, validate_session};
use crate::state::AppState;

fn required_id(query: SessionQuery) -> Result<String, AppError> {
    query
        .session_id
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Session ID required".to_string()))
}

/// POST /api/session/init
pub async fn handle_init_session(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let session_id = create_session(&state.db).await?;
    Ok(Json(json!({
        "success": true,
        "sessionId": session_id,
        "message": "Session initialized successfully"
    })))
}

/// GET /api/session/validate?sessionId=
pub async fn handle_validate_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Value>, AppError> {
    let session_id = required_id(query)?;
    let valid = validate_session(&state.db, &session_id).await?;
    info!("Session validation: valid={valid}");

    let message = if valid {
        "Session is valid"
    } else {
        "Session is invalid"
    };
    Ok(Json(json!({
        "success": true,
        "sessionId": valid.then_some(session_id),
        "valid": valid,
        "message": message
    })))
}

/// GET /api/session/info?sessionId=
pub async fn handle_session_info(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<Value>, AppError> {
    let session_id = required_id(query)?;
    let session = get_session_info(&state.db, &session_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "session": session,
        "message": "Session information retrieved"
    })))
}
