pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::answers::handlers as answers;
use crate::assembly::handlers as assembly;
use crate::session::{handlers as session, middleware::require_session};
use crate::state::AppState;
use crate::store::handlers as store;

pub fn build_router(state: AppState) -> Router {
    // Everything that reads or writes stored resumes needs a live session.
    let session_scoped = Router::new()
        .route("/api/generate-resume", post(assembly::handle_generate_resume))
        .route("/api/resumes", get(store::handle_list_resumes))
        .route("/api/resumes/stats", get(store::handle_resume_stats))
        .route(
            "/api/resumes/:id",
            get(store::handle_get_resume).delete(store::handle_delete_resume),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/health", get(health::health_handler))
        // Per-question loop
        .route("/api/questions", get(answers::handle_list_questions))
        .route("/api/validate-answer", post(answers::handle_validate_answer))
        .route("/api/answers/:index", post(answers::handle_submit_answer))
        // Sessions
        .route("/api/session/init", post(session::handle_init_session))
        .route("/api/session/validate", get(session::handle_validate_session))
        .route("/api/session/info", get(session::handle_session_info))
        .merge(session_scoped)
        .with_state(state)
}
