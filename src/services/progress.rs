use uuid::Uuid;

use crate::core::deadline::StoreError;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Answer, Submission};
use crate::repositories;

/// Upserts the candidate's single in-progress attempt with the latest answers.
pub(crate) async fn save_progress(
    state: &AppState,
    assessment_id: &str,
    candidate_id: &str,
    answers: &[Answer],
) -> Result<Submission, StoreError> {
    let submission = state
        .deadlines()
        .write(
            "submissions.upsert_progress",
            repositories::submissions::upsert_progress(
                state.db(),
                repositories::submissions::ProgressUpsert {
                    id: &Uuid::new_v4().to_string(),
                    assessment_id,
                    candidate_id,
                    answers,
                    now: primitive_now_utc(),
                },
            ),
        )
        .await?;

    tracing::debug!(
        assessment_id,
        candidate_id,
        submission_id = %submission.id,
        answers = answers.len(),
        "Saved progress"
    );

    Ok(submission)
}
