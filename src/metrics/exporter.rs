use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROM_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Installs the global Prometheus recorder.
///
/// Safe to call more than once; only the first call installs a recorder.
pub fn init_prometheus_exporter() -> Result<()> {
    PROM_HANDLE
        .get_or_try_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .context("failed to install Prometheus recorder")
        })
        .map(|_| ())
}

/// Renders every recorded metric in the Prometheus text format.
/// Returns `None` before [`init_prometheus_exporter`] succeeded.
pub fn scrape_prometheus_text() -> Option<String> {
    PROM_HANDLE.get().map(|h| h.render())
}
