use axum::{extract::State, Json};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentCandidate;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::submission::SubmissionResponse;

/// Every attempt of the caller, in-progress and submitted, newest activity first.
pub(super) async fn list_my_submissions(
    CurrentCandidate(candidate): CurrentCandidate,
    State(state): State<AppState>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let rows = state
        .deadlines()
        .read(
            "submissions.list_for_candidate",
            repositories::submissions::list_for_candidate(state.db(), &candidate.id),
        )
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch submissions"))?;

    Ok(Json(rows.into_iter().map(SubmissionResponse::from).collect()))
}
