use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{Assessment, Question};

pub(crate) const COLUMNS: &str = "\
    id, title, description, duration_minutes, questions, created_by, phase, \
    passing_score, total_marks, next_phase_id, created_at, updated_at";

/// Upper bound on chain walks; a longer series is treated as malformed.
const MAX_CHAIN_DEPTH: i32 = 1000;

pub(crate) struct CreateAssessment<'a> {
    pub(crate) id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: &'a str,
    pub(crate) duration_minutes: i32,
    pub(crate) questions: &'a [Question],
    pub(crate) created_by: &'a str,
    pub(crate) phase: i32,
    pub(crate) passing_score: i32,
    pub(crate) total_marks: i32,
    pub(crate) next_phase_id: Option<&'a str>,
    pub(crate) created_at: PrimitiveDateTime,
}

/// Full replacement of the author-editable fields.
pub(crate) struct ReplaceAssessment<'a> {
    pub(crate) title: &'a str,
    pub(crate) description: &'a str,
    pub(crate) duration_minutes: i32,
    pub(crate) questions: &'a [Question],
    pub(crate) phase: i32,
    pub(crate) passing_score: i32,
    pub(crate) total_marks: i32,
    pub(crate) next_phase_id: Option<&'a str>,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateAssessment<'_>,
) -> Result<Assessment, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "INSERT INTO assessments (
            id, title, description, duration_minutes, questions, created_by, phase,
            passing_score, total_marks, next_phase_id, created_at, updated_at
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.duration_minutes)
    .bind(Json(params.questions))
    .bind(params.created_by)
    .bind(params.phase)
    .bind(params.passing_score)
    .bind(params.total_marks)
    .bind(params.next_phase_id)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

/// Returns `None` when the id does not exist or belongs to someone else.
pub(crate) async fn replace_owned(
    pool: &PgPool,
    id: &str,
    owner_id: &str,
    params: ReplaceAssessment<'_>,
) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "UPDATE assessments
         SET title = $1,
             description = $2,
             duration_minutes = $3,
             questions = $4,
             phase = $5,
             passing_score = $6,
             total_marks = $7,
             next_phase_id = $8,
             updated_at = $9
         WHERE id = $10 AND created_by = $11
         RETURNING {COLUMNS}"
    ))
    .bind(params.title)
    .bind(params.description)
    .bind(params.duration_minutes)
    .bind(Json(params.questions))
    .bind(params.phase)
    .bind(params.passing_score)
    .bind(params.total_marks)
    .bind(params.next_phase_id)
    .bind(params.updated_at)
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!("SELECT {COLUMNS} FROM assessments WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_owned(
    pool: &PgPool,
    id: &str,
    owner_id: &str,
) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {COLUMNS} FROM assessments WHERE id = $1 AND created_by = $2"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn exists(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM assessments WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// The assessment whose `next_phase_id` points at `id`, regardless of owner.
/// Oldest wins if a malformed series has several.
pub(crate) async fn find_predecessor(
    pool: &PgPool,
    id: &str,
) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {COLUMNS}
         FROM assessments
         WHERE next_phase_id = $1
         ORDER BY created_at, id
         LIMIT 1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Whether following `next_phase_id` links from `start_id` ever reaches `target_id`.
pub(crate) async fn chain_reaches(
    pool: &PgPool,
    start_id: &str,
    target_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "WITH RECURSIVE chain (id, next_phase_id, depth) AS (
            SELECT id, next_phase_id, 1
            FROM assessments
            WHERE id = $1
            UNION ALL
            SELECT a.id, a.next_phase_id, chain.depth + 1
            FROM assessments a
            JOIN chain ON a.id = chain.next_phase_id
            WHERE chain.depth < $3
        )
        SELECT EXISTS(SELECT 1 FROM chain WHERE id = $2)",
    )
    .bind(start_id)
    .bind(target_id)
    .bind(MAX_CHAIN_DEPTH)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {COLUMNS}
         FROM assessments
         ORDER BY created_at DESC, id DESC
         OFFSET $1 LIMIT $2"
    ))
    .bind(skip.max(0))
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_owner(
    pool: &PgPool,
    owner_id: &str,
) -> Result<Vec<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {COLUMNS}
         FROM assessments
         WHERE created_by = $1
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete_owned(
    pool: &PgPool,
    id: &str,
    owner_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM assessments WHERE id = $1 AND created_by = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
