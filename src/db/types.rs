use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "userrole", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Candidate,
    Interviewer,
    Admin,
}

impl UserRole {
    pub(crate) fn is_candidate(self) -> bool {
        matches!(self, Self::Candidate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "submissionstatus", rename_all = "snake_case")]
pub(crate) enum SubmissionStatus {
    InProgress,
    Submitted,
    // Reserved for manual review of subjective answers; no code path sets it yet.
    #[allow(dead_code)]
    Graded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum QuestionType {
    #[serde(rename = "MCQ")]
    MultipleChoice,
    #[serde(rename = "CODING")]
    Coding,
    #[serde(rename = "SUBJECTIVE")]
    Subjective,
}
