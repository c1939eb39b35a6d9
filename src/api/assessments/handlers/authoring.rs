use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::errors::{ApiError, NOT_FOUND_OR_DENIED};
use crate::api::guards::{CurrentInterviewer, CurrentUser};
use crate::api::validation::{parse_id, parse_optional_id, validate_payload};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::assessment::{
    AssessmentCreated, AssessmentDraft, AssessmentResponse, ChainDeleted,
};
use crate::services::cascade_delete::{self, PgChainStore};
use crate::services::phase_chain;

use super::super::queries::DeleteAssessmentQuery;

pub(in crate::api::assessments) async fn create_assessment(
    CurrentInterviewer(author): CurrentInterviewer,
    State(state): State<AppState>,
    Json(payload): Json<AssessmentDraft>,
) -> Result<(StatusCode, Json<AssessmentCreated>), ApiError> {
    validate_payload(&payload)?;
    let next_phase_id = parse_optional_id(payload.next_phase_id.as_deref())?;

    phase_chain::validate_link(&state, None, next_phase_id.as_deref())
        .await
        .map_err(|e| ApiError::chain_link(e, "Failed to validate next phase"))?;

    let questions = payload.to_questions();
    let id = Uuid::new_v4().to_string();
    let created = state
        .deadlines()
        .write(
            "assessments.create",
            repositories::assessments::create(
                state.db(),
                repositories::assessments::CreateAssessment {
                    id: &id,
                    title: &payload.title,
                    description: &payload.description,
                    duration_minutes: payload.duration,
                    questions: &questions,
                    created_by: &author.id,
                    phase: payload.phase,
                    passing_score: payload.passing_score,
                    total_marks: payload.total_marks,
                    next_phase_id: next_phase_id.as_deref(),
                    created_at: primitive_now_utc(),
                },
            ),
        )
        .await
        .map_err(|e| ApiError::store(e, "Failed to create assessment"))?;

    state.catalog_cache().invalidate().await;

    tracing::info!(
        assessment_id = %created.id,
        author_id = %author.id,
        phase = created.phase,
        action = "assessment_created",
        "Assessment created"
    );

    Ok((
        StatusCode::CREATED,
        Json(AssessmentCreated {
            message: "Assessment created successfully".to_string(),
            id: created.id,
        }),
    ))
}

pub(in crate::api::assessments) async fn update_assessment(
    Path(raw_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<AssessmentDraft>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let id = parse_id(&raw_id)?;
    validate_payload(&payload)?;
    let next_phase_id = parse_optional_id(payload.next_phase_id.as_deref())?;

    let owned = state
        .deadlines()
        .read(
            "assessments.find_owned",
            repositories::assessments::find_owned(state.db(), &id, &user.id),
        )
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch assessment"))?;
    if owned.is_none() {
        return Err(ApiError::NotFound(NOT_FOUND_OR_DENIED.to_string()));
    }

    phase_chain::validate_link(&state, Some(&id), next_phase_id.as_deref())
        .await
        .map_err(|e| ApiError::chain_link(e, "Failed to validate next phase"))?;

    let questions = payload.to_questions();
    let updated = state
        .deadlines()
        .write(
            "assessments.replace_owned",
            repositories::assessments::replace_owned(
                state.db(),
                &id,
                &user.id,
                repositories::assessments::ReplaceAssessment {
                    title: &payload.title,
                    description: &payload.description,
                    duration_minutes: payload.duration,
                    questions: &questions,
                    phase: payload.phase,
                    passing_score: payload.passing_score,
                    total_marks: payload.total_marks,
                    next_phase_id: next_phase_id.as_deref(),
                    updated_at: primitive_now_utc(),
                },
            ),
        )
        .await
        .map_err(|e| ApiError::store(e, "Failed to update assessment"))?;

    state.catalog_cache().invalidate().await;

    let Some(updated) = updated else {
        return Err(ApiError::NotFound(NOT_FOUND_OR_DENIED.to_string()));
    };

    Ok(Json(AssessmentResponse::authoring(&updated)))
}

pub(in crate::api::assessments) async fn delete_assessment(
    Path(raw_id): Path<String>,
    Query(params): Query<DeleteAssessmentQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ChainDeleted>, ApiError> {
    let id = parse_id(&raw_id)?;
    let store = PgChainStore::new(&state);

    let result = if params.cascade {
        cascade_delete::delete_chain(&store, &user.id, &id).await
    } else {
        cascade_delete::delete_single(&store, &user.id, &id).await
    };

    state.catalog_cache().invalidate().await;

    let deleted_count = result.map_err(|e| ApiError::cascade(e, "Failed to delete assessment"))?;
    let message = if params.cascade {
        "Assessment and linked phases deleted successfully"
    } else {
        "Assessment deleted successfully"
    };

    Ok(Json(ChainDeleted { message: message.to_string(), deleted_count }))
}
