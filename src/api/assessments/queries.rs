use serde::Deserialize;

const fn default_cascade() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub(super) struct DeleteAssessmentQuery {
    #[serde(default = "default_cascade")]
    pub(super) cascade: bool,
}
