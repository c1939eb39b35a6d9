use crate::core::deadline::StoreError;
use crate::core::metrics;
use crate::core::state::AppState;
use crate::db::models::Assessment;
use crate::repositories;
use crate::services::phase_chain;

pub(crate) const PREVIOUS_PHASE_REQUIRED: &str =
    "You must pass the previous phase to access this assessment";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AccessDecision {
    Allow,
    Deny(&'static str),
}

impl AccessDecision {
    pub(crate) fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// `predecessor_passed` is `None` when no predecessor exists; the gate fails open then.
fn decide(phase: i32, predecessor_passed: Option<bool>) -> AccessDecision {
    if phase <= 1 {
        return AccessDecision::Allow;
    }

    match predecessor_passed {
        None | Some(true) => AccessDecision::Allow,
        Some(false) => AccessDecision::Deny(PREVIOUS_PHASE_REQUIRED),
    }
}

pub(crate) async fn can_access(
    state: &AppState,
    candidate_id: &str,
    assessment: &Assessment,
) -> Result<AccessDecision, StoreError> {
    if assessment.phase <= 1 {
        return Ok(AccessDecision::Allow);
    }

    let predecessor = phase_chain::previous(state, &assessment.id).await?;
    let predecessor_passed = match predecessor {
        Some(previous) => Some(
            state
                .deadlines()
                .read(
                    "submissions.has_passed",
                    repositories::submissions::has_passed(state.db(), &previous.id, candidate_id),
                )
                .await?,
        ),
        None => {
            tracing::debug!(
                assessment_id = %assessment.id,
                phase = assessment.phase,
                "No predecessor found for later phase; allowing access"
            );
            None
        }
    };

    let decision = decide(assessment.phase, predecessor_passed);
    if decision.is_allowed() {
        return Ok(decision);
    }

    metrics::record_gate_denied();
    tracing::info!(
        assessment_id = %assessment.id,
        candidate_id,
        action = "gate_denied",
        ?decision,
        "Phase access denied"
    );
    Ok(decision)
}
