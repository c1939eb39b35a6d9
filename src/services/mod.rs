pub(crate) mod access_gate;
pub(crate) mod cascade_delete;
pub(crate) mod catalog_cache;
pub(crate) mod grading;
pub(crate) mod phase_chain;
pub(crate) mod progress;
pub(crate) mod randomizer;
