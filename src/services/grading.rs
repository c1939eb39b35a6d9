use uuid::Uuid;

use crate::core::deadline::StoreError;
use crate::core::metrics;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Answer, Assessment, Submission};
use crate::db::types::QuestionType;
use crate::repositories;
use crate::schemas::submission::AnswerInput;
use crate::services::phase_chain;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GradeOutcome {
    pub(crate) answers: Vec<Answer>,
    pub(crate) score: i32,
    pub(crate) passed: bool,
    pub(crate) next_phase_unlocked: bool,
    pub(crate) total_marks: i32,
}

impl GradeOutcome {
    /// The next phase id, surfaced only once it is unlocked.
    pub(crate) fn unlocked_phase<'a>(&self, assessment: &'a Assessment) -> Option<&'a str> {
        if self.next_phase_unlocked {
            phase_chain::next(assessment)
        } else {
            None
        }
    }
}

/// Scores each answer against the first question with its id. Only multiple
/// choice questions are auto-graded. Requests with repeated question ids are
/// rejected before they get here.
pub(crate) fn grade(assessment: &Assessment, inputs: &[AnswerInput]) -> GradeOutcome {
    let mut score = 0;

    let answers = inputs
        .iter()
        .map(|input| {
            let mut answer = Answer {
                question_id: input.question_id.clone(),
                value: input.value.clone(),
                is_correct: false,
                points: 0,
            };

            let question =
                assessment.questions.0.iter().find(|question| question.id == input.question_id);
            let Some(question) = question else {
                return answer;
            };
            if question.question_type != QuestionType::MultipleChoice {
                return answer;
            }

            if question.correct_answer.as_deref() == Some(input.value.as_str()) {
                answer.is_correct = true;
                answer.points = question.points;
                score += question.points;
            }
            answer
        })
        .collect();

    let passed = score >= assessment.passing_score;
    GradeOutcome {
        answers,
        score,
        passed,
        next_phase_unlocked: passed && phase_chain::next(assessment).is_some(),
        total_marks: assessment.total_marks,
    }
}

/// Grades and records a final submission. The in-progress row is left untouched.
pub(crate) async fn submit(
    state: &AppState,
    assessment: &Assessment,
    candidate_id: &str,
    inputs: &[AnswerInput],
) -> Result<(Submission, GradeOutcome), StoreError> {
    let outcome = grade(assessment, inputs);
    let now = primitive_now_utc();

    let started_at = state
        .deadlines()
        .read(
            "submissions.find_in_progress",
            repositories::submissions::find_in_progress(state.db(), &assessment.id, candidate_id),
        )
        .await?
        .map(|row| row.started_at)
        .unwrap_or(now);

    let submission = state
        .deadlines()
        .write(
            "submissions.insert_final",
            repositories::submissions::insert_final(
                state.db(),
                repositories::submissions::FinalSubmission {
                    id: &Uuid::new_v4().to_string(),
                    assessment_id: &assessment.id,
                    candidate_id,
                    answers: &outcome.answers,
                    score: outcome.score,
                    passed: outcome.passed,
                    next_phase_unlocked: outcome.next_phase_unlocked,
                    started_at,
                    submitted_at: now,
                },
            ),
        )
        .await?;

    metrics::record_submission(outcome.passed);
    tracing::info!(
        assessment_id = %assessment.id,
        candidate_id,
        submission_id = %submission.id,
        score = outcome.score,
        passed = outcome.passed,
        next_phase_unlocked = outcome.next_phase_unlocked,
        action = "submission_graded",
        "Graded submission"
    );

    Ok((submission, outcome))
}
