use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

pub(crate) fn record_submission(passed: bool) {
    metrics::counter!("assessment_submissions_total", "passed" => passed.to_string()).increment(1);
}

pub(crate) fn record_gate_denied() {
    metrics::counter!("assessment_gate_denied_total").increment(1);
}

pub(crate) fn record_chain_deleted(count: u64) {
    metrics::counter!("assessment_chain_deleted_total").increment(count);
}

pub(crate) fn record_cache_lookup(result: &'static str) {
    metrics::counter!("catalog_cache_requests_total", "result" => result).increment(1);
}
