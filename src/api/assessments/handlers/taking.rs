use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentCandidate, CurrentUser};
use crate::api::validation::{parse_id, validate_payload};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::assessment::{AssessmentResponse, PhaseViewResponse};
use crate::schemas::submission::{AnswersRequest, GradeResponse, ResultResponse};
use crate::schemas::MessageResponse;
use crate::services::{grading, progress, randomizer};

use super::super::helpers;

pub(in crate::api::assessments) async fn get_phase_view(
    Path(raw_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<PhaseViewResponse>, ApiError> {
    let id = parse_id(&raw_id)?;
    let assessment = helpers::load_assessment(&state, &id).await?;

    if user.role.is_candidate() {
        helpers::ensure_gate(&state, &user, &assessment).await?;
        let view = randomizer::present(&state, &assessment, &user.id)
            .await
            .map_err(|e| ApiError::store(e, "Failed to prepare assessment"))?;
        return Ok(Json(view));
    }

    let view = helpers::project(&user, AssessmentResponse::authoring(&assessment));
    Ok(Json(PhaseViewResponse { assessment: view, saved_answers: HashMap::new() }))
}

pub(in crate::api::assessments) async fn save_progress(
    Path(raw_id): Path<String>,
    CurrentCandidate(candidate): CurrentCandidate,
    State(state): State<AppState>,
    Json(payload): Json<AnswersRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&raw_id)?;
    validate_payload(&payload)?;

    let assessment = helpers::load_assessment(&state, &id).await?;
    helpers::ensure_gate(&state, &candidate, &assessment).await?;

    progress::save_progress(&state, &assessment.id, &candidate.id, &payload.ungraded())
        .await
        .map_err(|e| ApiError::store(e, "Failed to save progress"))?;

    Ok(Json(MessageResponse { message: "Progress saved".to_string() }))
}

pub(in crate::api::assessments) async fn submit_assessment(
    Path(raw_id): Path<String>,
    CurrentCandidate(candidate): CurrentCandidate,
    State(state): State<AppState>,
    Json(payload): Json<AnswersRequest>,
) -> Result<(StatusCode, Json<GradeResponse>), ApiError> {
    let id = parse_id(&raw_id)?;
    validate_payload(&payload)?;

    let assessment = helpers::load_assessment(&state, &id).await?;
    helpers::ensure_gate(&state, &candidate, &assessment).await?;

    let (submission, outcome) =
        grading::submit(&state, &assessment, &candidate.id, &payload.answers)
            .await
            .map_err(|e| ApiError::store(e, "Failed to submit assessment"))?;

    Ok((
        StatusCode::CREATED,
        Json(GradeResponse {
            message: "Assessment submitted successfully".to_string(),
            submission_id: submission.id,
            score: outcome.score,
            total_marks: outcome.total_marks,
            passed: outcome.passed,
            next_phase_unlocked: outcome.next_phase_unlocked,
            next_phase_id: outcome.unlocked_phase(&assessment).map(str::to_string),
        }),
    ))
}

pub(in crate::api::assessments) async fn get_my_result(
    Path(raw_id): Path<String>,
    CurrentCandidate(candidate): CurrentCandidate,
    State(state): State<AppState>,
) -> Result<Json<ResultResponse>, ApiError> {
    let id = parse_id(&raw_id)?;

    let submission = state
        .deadlines()
        .read(
            "submissions.latest_result",
            repositories::submissions::latest_result(state.db(), &id, &candidate.id),
        )
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch result"))?
        .ok_or_else(|| ApiError::NotFound("Result not found".to_string()))?;

    // The assessment may have been deleted since; the result still stands.
    let assessment = state
        .deadlines()
        .read("assessments.find_by_id", repositories::assessments::find_by_id(state.db(), &id))
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch assessment"))?;

    let total_marks = assessment.as_ref().map(|assessment| assessment.total_marks).unwrap_or(0);
    let next_phase_id = assessment
        .and_then(|assessment| assessment.next_phase_id)
        .filter(|_| submission.next_phase_unlocked);

    Ok(Json(ResultResponse { submission: submission.into(), total_marks, next_phase_id }))
}
