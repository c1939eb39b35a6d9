mod authoring;
mod listing;
mod taking;

pub(super) use authoring::{create_assessment, delete_assessment, update_assessment};
pub(super) use listing::{list_assessment_submissions, list_assessments, list_my_assessments};
pub(super) use taking::{get_my_result, get_phase_view, save_progress, submit_assessment};
