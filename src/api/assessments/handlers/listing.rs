use axum::extract::{Path, Query, State};
use axum::Json;

use crate::api::errors::{ApiError, NOT_FOUND_OR_DENIED};
use crate::api::guards::CurrentUser;
use crate::api::pagination::PageQuery;
use crate::api::validation::parse_id;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::assessment::{AssessmentPage, AssessmentResponse};
use crate::schemas::submission::CandidateSubmissionResponse;

use super::super::helpers;

pub(in crate::api::assessments) async fn list_assessments(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<AssessmentPage>, ApiError> {
    let cacheable = params.is_default_first_page();

    let generation = if cacheable {
        if let Some(page) = state.catalog_cache().get().await {
            return Ok(Json(helpers::project_page(&user, page)));
        }
        state.catalog_cache().generation().await
    } else {
        None
    };

    let rows = state
        .deadlines()
        .read(
            "assessments.list",
            repositories::assessments::list(state.db(), params.skip(), params.limit()),
        )
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch assessments"))?;

    let page = AssessmentPage {
        items: rows.iter().map(AssessmentResponse::authoring).collect(),
        page: params.page(),
        limit: params.limit(),
    };

    if cacheable {
        state.catalog_cache().put(&page, generation).await;
    }

    Ok(Json(helpers::project_page(&user, page)))
}

pub(in crate::api::assessments) async fn list_my_assessments(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<AssessmentResponse>>, ApiError> {
    let rows = state
        .deadlines()
        .read(
            "assessments.list_by_owner",
            repositories::assessments::list_by_owner(state.db(), &user.id),
        )
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch assessments"))?;

    let items = rows
        .iter()
        .map(|assessment| helpers::project(&user, AssessmentResponse::authoring(assessment)))
        .collect();

    Ok(Json(items))
}

pub(in crate::api::assessments) async fn list_assessment_submissions(
    Path(raw_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CandidateSubmissionResponse>>, ApiError> {
    let id = parse_id(&raw_id)?;

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

    let rows = state
        .deadlines()
        .read(
            "submissions.list_for_assessment",
            repositories::submissions::list_for_assessment(state.db(), &id),
        )
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch submissions"))?;

    let items = rows
        .into_iter()
        .map(|row| {
            CandidateSubmissionResponse::new(
                row.submission,
                row.candidate_name,
                row.candidate_email,
                row.candidate_phone,
            )
        })
        .collect();

    Ok(Json(items))
}
