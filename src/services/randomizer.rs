use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::core::deadline::StoreError;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Assessment, Question, Submission};
use crate::db::types::QuestionType;
use crate::repositories;
use crate::schemas::assessment::{AssessmentResponse, PhaseViewResponse};

fn is_permutation(order: &[String], options: &[String]) -> bool {
    if order.len() != options.len() {
        return false;
    }
    let mut order = order.to_vec();
    let mut options = options.to_vec();
    order.sort();
    options.sort();
    order == options
}

/// Whether `stored` still holds a usable order for `question`. An order drawn
/// before the author edited the options no longer counts.
fn has_current_order(question: &Question, stored: &HashMap<String, Vec<String>>) -> bool {
    stored.get(&question.id).is_some_and(|order| is_permutation(order, &question.options))
}

/// Fresh option orders for every multiple choice question without a current stored order.
pub(crate) fn missing_orders<R: Rng + ?Sized>(
    questions: &[Question],
    stored: &HashMap<String, Vec<String>>,
    rng: &mut R,
) -> HashMap<String, Vec<String>> {
    questions
        .iter()
        .filter(|question| {
            question.question_type == QuestionType::MultipleChoice
                && !question.options.is_empty()
                && !has_current_order(question, stored)
        })
        .map(|question| {
            let mut options = question.options.clone();
            options.shuffle(rng);
            (question.id.clone(), options)
        })
        .collect()
}

/// Candidate projection with stored option orders replayed. A stored order that
/// is not a permutation of the current options is ignored.
pub(crate) fn apply_orders(
    assessment: &Assessment,
    orders: &HashMap<String, Vec<String>>,
) -> AssessmentResponse {
    let mut response = AssessmentResponse::candidate(assessment);
    for question in &mut response.questions {
        if question.question_type != QuestionType::MultipleChoice {
            continue;
        }
        if let Some(order) = orders.get(&question.id) {
            if is_permutation(order, &question.options) {
                question.options = order.clone();
            }
        }
    }
    response
}

fn saved_answers(submission: &Submission) -> HashMap<String, String> {
    submission
        .answers
        .0
        .iter()
        .map(|answer| (answer.question_id.clone(), answer.value.clone()))
        .collect()
}

/// Builds the candidate's view of a phase, persisting any newly drawn option
/// orders into the in-progress submission before returning.
pub(crate) async fn present(
    state: &AppState,
    assessment: &Assessment,
    candidate_id: &str,
) -> Result<PhaseViewResponse, StoreError> {
    let existing = state
        .deadlines()
        .read(
            "submissions.find_in_progress",
            repositories::submissions::find_in_progress(state.db(), &assessment.id, candidate_id),
        )
        .await?;

    let stored = existing.as_ref().map(|row| row.shuffled_options.0.clone()).unwrap_or_default();
    let fresh = missing_orders(&assessment.questions.0, &stored, &mut rand::thread_rng());

    let (redrawn, drawn): (HashMap<_, _>, HashMap<_, _>) =
        fresh.into_iter().partition(|(question_id, _)| stored.contains_key(question_id));

    let submission = match existing {
        Some(row) if drawn.is_empty() && redrawn.is_empty() => row,
        _ => {
            let row = state
                .deadlines()
                .write(
                    "submissions.persist_shuffle",
                    repositories::submissions::persist_shuffle(
                        state.db(),
                        repositories::submissions::ShuffleUpsert {
                            id: &Uuid::new_v4().to_string(),
                            assessment_id: &assessment.id,
                            candidate_id,
                            shuffled_options: &drawn,
                            replaced_options: &redrawn,
                            now: primitive_now_utc(),
                        },
                    ),
                )
                .await?;
            tracing::info!(
                assessment_id = %assessment.id,
                candidate_id,
                submission_id = %row.id,
                shuffled_questions = drawn.len(),
                redrawn_questions = redrawn.len(),
                action = "shuffle_persisted",
                "Persisted option order for in-progress attempt"
            );
            row
        }
    };

    Ok(PhaseViewResponse {
        assessment: apply_orders(assessment, &submission.shuffled_options.0),
        saved_answers: saved_answers(&submission),
    })
}
