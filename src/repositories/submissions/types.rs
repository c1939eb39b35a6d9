use std::collections::HashMap;

use time::PrimitiveDateTime;

use crate::db::models::{Answer, Submission};

pub(crate) const COLUMNS: &str = "\
    id, assessment_id, candidate_id, answers, score, status, started_at, submitted_at, \
    updated_at, passed, next_phase_unlocked, shuffled_options";

pub(crate) struct ProgressUpsert<'a> {
    pub(crate) id: &'a str,
    pub(crate) assessment_id: &'a str,
    pub(crate) candidate_id: &'a str,
    pub(crate) answers: &'a [Answer],
    pub(crate) now: PrimitiveDateTime,
}

pub(crate) struct ShuffleUpsert<'a> {
    pub(crate) id: &'a str,
    pub(crate) assessment_id: &'a str,
    pub(crate) candidate_id: &'a str,
    pub(crate) shuffled_options: &'a HashMap<String, Vec<String>>,
    /// Orders that overwrite stale stored ones instead of yielding to them.
    pub(crate) replaced_options: &'a HashMap<String, Vec<String>>,
    pub(crate) now: PrimitiveDateTime,
}

pub(crate) struct FinalSubmission<'a> {
    pub(crate) id: &'a str,
    pub(crate) assessment_id: &'a str,
    pub(crate) candidate_id: &'a str,
    pub(crate) answers: &'a [Answer],
    pub(crate) score: i32,
    pub(crate) passed: bool,
    pub(crate) next_phase_unlocked: bool,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) submitted_at: PrimitiveDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SubmissionWithCandidate {
    #[sqlx(flatten)]
    pub(crate) submission: Submission,
    pub(crate) candidate_name: Option<String>,
    pub(crate) candidate_email: Option<String>,
    pub(crate) candidate_phone: Option<String>,
}
