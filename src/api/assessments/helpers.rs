use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::db::models::{Assessment, User};
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::assessment::{AssessmentPage, AssessmentResponse};
use crate::services::access_gate::{self, AccessDecision};

pub(super) async fn load_assessment(state: &AppState, id: &str) -> Result<Assessment, ApiError> {
    let assessment = state
        .deadlines()
        .read("assessments.find_by_id", repositories::assessments::find_by_id(state.db(), id))
        .await
        .map_err(|e| ApiError::store(e, "Failed to fetch assessment"))?;

    assessment.ok_or_else(|| ApiError::NotFound("Assessment not found".to_string()))
}

pub(super) async fn ensure_gate(
    state: &AppState,
    candidate: &User,
    assessment: &Assessment,
) -> Result<(), ApiError> {
    let decision = access_gate::can_access(state, &candidate.id, assessment)
        .await
        .map_err(|e| ApiError::store(e, "Failed to check phase access"))?;

    match decision {
        AccessDecision::Allow => Ok(()),
        AccessDecision::Deny(reason) => Err(ApiError::Forbidden(reason)),
    }
}

/// Owners and admins see the answer key; candidates never do.
pub(super) fn can_author(user: &User, created_by: &str) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Interviewer => user.id == created_by,
        UserRole::Candidate => false,
    }
}

pub(super) fn project(user: &User, assessment: AssessmentResponse) -> AssessmentResponse {
    if can_author(user, &assessment.created_by) {
        assessment
    } else {
        assessment.without_answer_key()
    }
}

pub(super) fn project_page(user: &User, page: AssessmentPage) -> AssessmentPage {
    if user.role.is_candidate() {
        return page.without_answer_keys();
    }

    AssessmentPage {
        items: page.items.into_iter().map(|item| project(user, item)).collect(),
        page: page.page,
        limit: page.limit,
    }
}
