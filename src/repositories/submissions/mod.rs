mod commands;
mod queries;
mod types;

pub(crate) use commands::{insert_final, persist_shuffle, upsert_progress};
pub(crate) use queries::{
    find_in_progress, has_passed, latest_result, list_for_assessment, list_for_candidate,
};
pub(crate) use types::{FinalSubmission, ProgressUpsert, ShuffleUpsert, SubmissionWithCandidate};
