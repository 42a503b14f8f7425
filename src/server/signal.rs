// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

/// Resolve when the process is asked to stop
///
/// On Unix this is SIGTERM or SIGINT; elsewhere only Ctrl+C. If a handler
/// cannot be registered that signal is logged and never fires.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("SIGTERM received");
            }
            Err(e) => {
                crate::logger::log_error(&format!("Failed to register SIGTERM handler: {e}"));
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = ctrl_c() => {}
        () = terminate => {}
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("SIGINT received"),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to register Ctrl+C handler: {e}"));
            std::future::pending::<()>().await;
        }
    }
}
