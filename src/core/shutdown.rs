use tokio::signal;

/// Resolves on Ctrl+C or SIGTERM so in-flight requests can drain.
pub(crate) async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        let Ok(mut stream) = signal::unix::signal(signal::unix::SignalKind::terminate()) else {
            tracing::error!("Failed to listen for SIGTERM");
            return std::future::pending::<()>().await;
        };
        stream.recv().await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    let source = tokio::select! {
        _ = interrupt => "interrupt",
        _ = sigterm => "sigterm",
    };

    tracing::info!(source, "Shutdown signal received, draining connections");
}
