use sqlx::PgPool;

use crate::db::models::Submission;
use crate::db::types::SubmissionStatus;

use super::types::{SubmissionWithCandidate, COLUMNS};

pub(crate) async fn find_in_progress(
    pool: &PgPool,
    assessment_id: &str,
    candidate_id: &str,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS}
         FROM submissions
         WHERE assessment_id = $1 AND candidate_id = $2 AND status = $3"
    ))
    .bind(assessment_id)
    .bind(candidate_id)
    .bind(SubmissionStatus::InProgress)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn has_passed(
    pool: &PgPool,
    assessment_id: &str,
    candidate_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
            SELECT 1 FROM submissions
            WHERE assessment_id = $1 AND candidate_id = $2 AND passed
         )",
    )
    .bind(assessment_id)
    .bind(candidate_id)
    .fetch_one(pool)
    .await
}

/// Most recent final submission for the pair.
pub(crate) async fn latest_result(
    pool: &PgPool,
    assessment_id: &str,
    candidate_id: &str,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS}
         FROM submissions
         WHERE assessment_id = $1 AND candidate_id = $2 AND status = $3
         ORDER BY submitted_at DESC, id DESC
         LIMIT 1"
    ))
    .bind(assessment_id)
    .bind(candidate_id)
    .bind(SubmissionStatus::Submitted)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_for_candidate(
    pool: &PgPool,
    candidate_id: &str,
) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS}
         FROM submissions
         WHERE candidate_id = $1
         ORDER BY updated_at DESC, id DESC"
    ))
    .bind(candidate_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_assessment(
    pool: &PgPool,
    assessment_id: &str,
) -> Result<Vec<SubmissionWithCandidate>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionWithCandidate>(
        "SELECT s.id,
                s.assessment_id,
                s.candidate_id,
                s.answers,
                s.score,
                s.status,
                s.started_at,
                s.submitted_at,
                s.updated_at,
                s.passed,
                s.next_phase_unlocked,
                s.shuffled_options,
                u.full_name AS candidate_name,
                u.email AS candidate_email,
                u.phone AS candidate_phone
         FROM submissions s
         LEFT JOIN users u ON u.id = s.candidate_id
         WHERE s.assessment_id = $1
         ORDER BY s.submitted_at DESC NULLS LAST, s.started_at DESC",
    )
    .bind(assessment_id)
    .fetch_all(pool)
    .await
}
