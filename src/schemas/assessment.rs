use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::time::format_primitive;
use crate::db::models::{Assessment, Question};
use crate::db::types::QuestionType;

#[derive(Debug, Clone, Deserialize, Validate)]
pub(crate) struct QuestionDraft {
    #[serde(default)]
    pub(crate) id: Option<String>,
    #[validate(length(min = 1, message = "question text must not be empty"))]
    pub(crate) text: String,
    #[serde(rename = "type")]
    pub(crate) question_type: QuestionType,
    #[serde(default)]
    pub(crate) options: Vec<String>,
    #[serde(default)]
    pub(crate) correct_answer: Option<String>,
    #[validate(range(min = 0, message = "points must be non-negative"))]
    pub(crate) points: i32,
}

/// Author input for both create and full-replace update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_questions"))]
pub(crate) struct AssessmentDraft {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default, alias = "duration_minutes")]
    #[validate(range(min = 0, message = "duration must be non-negative"))]
    pub(crate) duration: i32,
    #[serde(default)]
    #[validate(nested)]
    pub(crate) questions: Vec<QuestionDraft>,
    #[serde(default = "default_phase")]
    #[validate(range(min = 1, message = "phase must be at least 1"))]
    pub(crate) phase: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "passing_score must be non-negative"))]
    pub(crate) passing_score: i32,
    #[serde(default)]
    #[validate(range(min = 0, message = "total_marks must be non-negative"))]
    pub(crate) total_marks: i32,
    #[serde(default)]
    pub(crate) next_phase_id: Option<String>,
}

const fn default_phase() -> i32 {
    1
}

fn validate_questions(draft: &AssessmentDraft) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for question in &draft.questions {
        if question.question_type == QuestionType::MultipleChoice && question.options.is_empty() {
            let mut err = ValidationError::new("mcq_options");
            err.message = Some("multiple choice questions need at least one option".into());
            return Err(err);
        }
        if let Some(id) = question.id.as_deref().filter(|id| !id.is_empty()) {
            if !seen.insert(id) {
                let mut err = ValidationError::new("duplicate_question_id");
                err.message = Some(format!("duplicate question id: {id}").into());
                return Err(err);
            }
        }
    }
    Ok(())
}

impl AssessmentDraft {
    /// Stored questions with ids assigned where the author left them blank.
    /// Answer keys and options only survive on multiple choice questions.
    pub(crate) fn to_questions(&self) -> Vec<Question> {
        self.questions
            .iter()
            .map(|draft| {
                let is_mcq = draft.question_type == QuestionType::MultipleChoice;
                Question {
                    id: draft
                        .id
                        .clone()
                        .filter(|id| !id.is_empty())
                        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                    text: draft.text.clone(),
                    question_type: draft.question_type,
                    options: if is_mcq { draft.options.clone() } else { Vec::new() },
                    correct_answer: if is_mcq { draft.correct_answer.clone() } else { None },
                    points: draft.points,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: String,
    pub(crate) text: String,
    #[serde(rename = "type")]
    pub(crate) question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) correct_answer: Option<String>,
    pub(crate) points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AssessmentResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) duration: i32,
    pub(crate) questions: Vec<QuestionResponse>,
    pub(crate) created_by: String,
    pub(crate) phase: i32,
    pub(crate) passing_score: i32,
    pub(crate) total_marks: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) next_phase_id: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl AssessmentResponse {
    /// Authoring projection, answer key included.
    pub(crate) fn authoring(assessment: &Assessment) -> Self {
        Self {
            id: assessment.id.clone(),
            title: assessment.title.clone(),
            description: assessment.description.clone(),
            duration: assessment.duration_minutes,
            questions: assessment.questions.0.iter().map(QuestionResponse::from).collect(),
            created_by: assessment.created_by.clone(),
            phase: assessment.phase,
            passing_score: assessment.passing_score,
            total_marks: assessment.total_marks,
            next_phase_id: assessment.next_phase_id.clone(),
            created_at: format_primitive(assessment.created_at),
            updated_at: format_primitive(assessment.updated_at),
        }
    }

    /// Candidate-safe projection; options keep their authored order.
    pub(crate) fn candidate(assessment: &Assessment) -> Self {
        Self::authoring(assessment).without_answer_key()
    }

    pub(crate) fn without_answer_key(mut self) -> Self {
        for question in &mut self.questions {
            question.correct_answer = None;
        }
        self
    }
}

impl From<&Question> for QuestionResponse {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            text: question.text.clone(),
            question_type: question.question_type,
            options: question.options.clone(),
            correct_answer: question.correct_answer.clone(),
            points: question.points,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssessmentPage {
    pub(crate) items: Vec<AssessmentResponse>,
    pub(crate) page: i64,
    pub(crate) limit: i64,
}

impl AssessmentPage {
    pub(crate) fn without_answer_keys(self) -> Self {
        Self {
            items: self.items.into_iter().map(AssessmentResponse::without_answer_key).collect(),
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessmentCreated {
    pub(crate) message: String,
    pub(crate) id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChainDeleted {
    pub(crate) message: String,
    pub(crate) deleted_count: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct PhaseViewResponse {
    pub(crate) assessment: AssessmentResponse,
    pub(crate) saved_answers: HashMap<String, String>,
}
