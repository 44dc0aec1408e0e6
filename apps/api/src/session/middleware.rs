use axum::{
    extract::{Query, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::debug;

use crate::errors::AppError;
use crate::session::{create_session, validate_session, SessionId, SESSION_HEADER};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    pub session_id: Option<String>,
}

/// Session id presented by the client: header first, then `?sessionId=`.
pub fn presented_session_id(headers: &HeaderMap, query: &SessionQuery) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| {
            query
                .session_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
}

/// Guarantees every request downstream carries a live [`SessionId`].
///
/// A missing, unknown or deactivated id is replaced by a fresh session. The id
/// in effect is always echoed in the `X-Session-ID` response header.
pub async fn require_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = presented_session_id(request.headers(), &query);

    let live = match presented {
        Some(id) => validate_session(&state.db, &id).await?.then_some(id),
        None => None,
    };
    let session_id = match live {
        Some(id) => id,
        None => {
            debug!("No live session on request; issuing a new one");
            create_session(&state.db).await?
        }
    };

    request
        .extensions_mut()
        .insert(SessionId(session_id.clone()));
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&session_id) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }
    Ok(response)
}
