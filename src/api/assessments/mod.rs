mod handlers;
mod helpers;
mod queries;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_assessment).get(handlers::list_assessments))
        .route("/my", get(handlers::list_my_assessments))
        .route(
            "/:assessment_id",
            get(handlers::get_phase_view)
                .put(handlers::update_assessment)
                .delete(handlers::delete_assessment),
        )
        .route("/:assessment_id/progress", post(handlers::save_progress))
        .route("/:assessment_id/submit", post(handlers::submit_assessment))
        .route("/:assessment_id/result", get(handlers::get_my_result))
        .route("/:assessment_id/submissions", get(handlers::list_assessment_submissions))
}

#[cfg(test)]
mod tests;
