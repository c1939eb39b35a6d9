use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::Submission;
use crate::db::types::SubmissionStatus;

use super::types::{FinalSubmission, ProgressUpsert, ShuffleUpsert, COLUMNS};

/// Creates the pair's in-progress row or replaces its answers.
/// Submitted rows are outside the partial unique index and never match.
pub(crate) async fn upsert_progress(
    pool: &PgPool,
    params: ProgressUpsert<'_>,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (
            id, assessment_id, candidate_id, answers, score, status,
            started_at, submitted_at, updated_at, passed, next_phase_unlocked, shuffled_options
         )
         VALUES ($1, $2, $3, $4, 0, $5, $6, NULL, $6, FALSE, FALSE, '{{}}'::jsonb)
         ON CONFLICT (assessment_id, candidate_id) WHERE status = 'in_progress'
         DO UPDATE SET answers = EXCLUDED.answers,
                       updated_at = EXCLUDED.updated_at
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.assessment_id)
    .bind(params.candidate_id)
    .bind(Json(params.answers))
    .bind(SubmissionStatus::InProgress)
    .bind(params.now)
    .fetch_one(pool)
    .await
}

/// Merges freshly generated option orders into the in-progress row.
/// Orders already stored win over `shuffled_options`, so concurrent first views
/// converge on one order; `replaced_options` always overwrite.
pub(crate) async fn persist_shuffle(
    pool: &PgPool,
    params: ShuffleUpsert<'_>,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (
            id, assessment_id, candidate_id, answers, score, status,
            started_at, submitted_at, updated_at, passed, next_phase_unlocked, shuffled_options
         )
         VALUES ($1, $2, $3, '[]'::jsonb, 0, $4, $5, NULL, $5, FALSE, FALSE, $6::jsonb || $7::jsonb)
         ON CONFLICT (assessment_id, candidate_id) WHERE status = 'in_progress'
         DO UPDATE SET shuffled_options =
                           (EXCLUDED.shuffled_options || submissions.shuffled_options) || $7::jsonb,
                       updated_at = EXCLUDED.updated_at
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.assessment_id)
    .bind(params.candidate_id)
    .bind(SubmissionStatus::InProgress)
    .bind(params.now)
    .bind(Json(params.shuffled_options))
    .bind(Json(params.replaced_options))
    .fetch_one(pool)
    .await
}

pub(crate) async fn insert_final(
    pool: &PgPool,
    params: FinalSubmission<'_>,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (
            id, assessment_id, candidate_id, answers, score, status,
            started_at, submitted_at, updated_at, passed, next_phase_unlocked, shuffled_options
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8, $9, $10, '{{}}'::jsonb)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.assessment_id)
    .bind(params.candidate_id)
    .bind(Json(params.answers))
    .bind(params.score)
    .bind(SubmissionStatus::Submitted)
    .bind(params.started_at)
    .bind(params.submitted_at)
    .bind(params.passed)
    .bind(params.next_phase_unlocked)
    .fetch_one(pool)
    .await
}
