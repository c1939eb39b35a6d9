use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::time::{format_optional, format_primitive};
use crate::db::models::{Answer, Submission};
use crate::db::types::SubmissionStatus;

const UNKNOWN_CANDIDATE: &str = "Deleted User";

#[derive(Debug, Clone, Deserialize, Validate)]
pub(crate) struct AnswerInput {
    #[validate(length(min = 1, message = "question_id must not be empty"))]
    pub(crate) question_id: String,
    #[serde(default)]
    pub(crate) value: String,
}

/// Body of both the save-progress and the final submit calls.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_unique_answers"))]
pub(crate) struct AnswersRequest {
    #[serde(default)]
    #[validate(nested)]
    pub(crate) answers: Vec<AnswerInput>,
}

fn validate_unique_answers(request: &AnswersRequest) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for answer in &request.answers {
        if !seen.insert(answer.question_id.as_str()) {
            let mut err = ValidationError::new("duplicate_answer");
            err.message =
                Some(format!("question {} is answered more than once", answer.question_id).into());
            return Err(err);
        }
    }
    Ok(())
}

impl AnswersRequest {
    /// Answers as stored before grading: not correct, no points.
    pub(crate) fn ungraded(&self) -> Vec<Answer> {
        self.answers
            .iter()
            .map(|answer| Answer {
                question_id: answer.question_id.clone(),
                value: answer.value.clone(),
                is_correct: false,
                points: 0,
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GradeResponse {
    pub(crate) message: String,
    pub(crate) submission_id: String,
    pub(crate) score: i32,
    pub(crate) total_marks: i32,
    pub(crate) passed: bool,
    pub(crate) next_phase_unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) next_phase_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) candidate_id: String,
    pub(crate) answers: Vec<Answer>,
    pub(crate) score: i32,
    pub(crate) status: SubmissionStatus,
    pub(crate) started_at: String,
    pub(crate) submitted_at: Option<String>,
    pub(crate) updated_at: String,
    pub(crate) passed: bool,
    pub(crate) next_phase_unlocked: bool,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        Self {
            id: submission.id,
            assessment_id: submission.assessment_id,
            candidate_id: submission.candidate_id,
            answers: submission.answers.0,
            score: submission.score,
            status: submission.status,
            started_at: format_primitive(submission.started_at),
            submitted_at: format_optional(submission.submitted_at),
            updated_at: format_primitive(submission.updated_at),
            passed: submission.passed,
            next_phase_unlocked: submission.next_phase_unlocked,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultResponse {
    #[serde(flatten)]
    pub(crate) submission: SubmissionResponse,
    pub(crate) total_marks: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) next_phase_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CandidateSubmissionResponse {
    #[serde(flatten)]
    pub(crate) submission: SubmissionResponse,
    pub(crate) candidate_name: String,
    pub(crate) candidate_email: String,
    pub(crate) candidate_phone: String,
}

impl CandidateSubmissionResponse {
    pub(crate) fn new(
        submission: Submission,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
    ) -> Self {
        let known = name.is_some();
        Self {
            submission: submission.into(),
            candidate_name: name.unwrap_or_else(|| UNKNOWN_CANDIDATE.to_string()),
            candidate_email: if known { email.unwrap_or_default() } else { "Unknown".to_string() },
            candidate_phone: phone.unwrap_or_default(),
        }
    }
}
