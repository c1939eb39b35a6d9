use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{QuestionType, SubmissionStatus, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) full_name: String,
    pub(crate) phone: Option<String>,
    pub(crate) role: UserRole,
    pub(crate) created_at: PrimitiveDateTime,
}

/// A question as stored inside `assessments.questions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Question {
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

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Assessment {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) duration_minutes: i32,
    pub(crate) questions: Json<Vec<Question>>,
    pub(crate) created_by: String,
    pub(crate) phase: i32,
    pub(crate) passing_score: i32,
    pub(crate) total_marks: i32,
    pub(crate) next_phase_id: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// A recorded answer. `is_correct` and `points` stay false/0 until grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Answer {
    pub(crate) question_id: String,
    pub(crate) value: String,
    #[serde(default)]
    pub(crate) is_correct: bool,
    #[serde(default)]
    pub(crate) points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Submission {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) candidate_id: String,
    pub(crate) answers: Json<Vec<Answer>>,
    pub(crate) score: i32,
    pub(crate) status: SubmissionStatus,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) submitted_at: Option<PrimitiveDateTime>,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) passed: bool,
    pub(crate) next_phase_unlocked: bool,
    pub(crate) shuffled_options: Json<HashMap<String, Vec<String>>>,
}
