use thiserror::Error;

use crate::core::deadline::StoreError;
use crate::core::state::AppState;
use crate::db::models::Assessment;
use crate::repositories;

#[derive(Debug, Error)]
pub(crate) enum ChainLinkError {
    #[error("next phase assessment not found")]
    UnknownTarget,
    #[error("an assessment cannot be its own next phase")]
    SelfReference,
    #[error("phase chain would form a cycle")]
    Cycle,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub(crate) fn next(assessment: &Assessment) -> Option<&str> {
    assessment.next_phase_id.as_deref()
}

/// Reverse lookup through the `next_phase_id` index, across all owners.
/// `None` means a first phase or a malformed series.
pub(crate) async fn previous(
    state: &AppState,
    assessment_id: &str,
) -> Result<Option<Assessment>, StoreError> {
    state
        .deadlines()
        .read(
            "assessments.find_predecessor",
            repositories::assessments::find_predecessor(state.db(), assessment_id),
        )
        .await
}

/// Checks that pointing `assessment_id` at `next_phase_id` keeps the chain acyclic.
/// `assessment_id` is `None` for an assessment that does not exist yet.
pub(crate) async fn validate_link(
    state: &AppState,
    assessment_id: Option<&str>,
    next_phase_id: Option<&str>,
) -> Result<(), ChainLinkError> {
    let Some(next_phase_id) = next_phase_id else {
        return Ok(());
    };

    if assessment_id == Some(next_phase_id) {
        return Err(ChainLinkError::SelfReference);
    }

    let exists = state
        .deadlines()
        .read("assessments.exists", repositories::assessments::exists(state.db(), next_phase_id))
        .await?;
    if !exists {
        return Err(ChainLinkError::UnknownTarget);
    }

    let Some(assessment_id) = assessment_id else {
        return Ok(());
    };

    let closes_loop = state
        .deadlines()
        .read(
            "assessments.chain_reaches",
            repositories::assessments::chain_reaches(state.db(), next_phase_id, assessment_id),
        )
        .await?;
    if closes_loop {
        return Err(ChainLinkError::Cycle);
    }

    Ok(())
}
