// Server module entry point
// Accept loop, connection handling, listener setup and shutdown signals

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::config::AppState;
use crate::logger;

// Re-export commonly used items
pub use connection::accept_connection;
pub use listener::create_listener;
pub use signal::shutdown_signal;

/// Accept connections until `shutdown` resolves, then drain.
///
/// After the shutdown future completes no new connections are accepted.
/// Live connections are told to close once their current response is
/// written; they get `performance.shutdown_timeout` seconds to do so before
/// they are aborted.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()>,
) {
    let mut tasks = JoinSet::new();
    let (drain_tx, drain_rx) = watch::channel(false);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => break,

            accept_result = listener.accept() => match accept_result {
                Ok((stream, peer_addr)) => {
                    accept_connection(stream, peer_addr, &state, &drain_rx, &mut tasks);
                }
                Err(e) => {
                    logger::log_error(&format!("Failed to accept connection: {e}"));
                }
            },
        }
    }

    drop(listener);
    // Wake every connection task
    let _ = drain_tx.send(true);
    while tasks.try_join_next().is_some() {}
    logger::log_shutdown_started(tasks.len());

    let grace = Duration::from_secs(state.config.performance.shutdown_timeout);
    let drained = tokio::time::timeout(grace, async {
        while tasks.join_next().await.is_some() {}
    })
    .await
    .is_ok();

    if !drained {
        tasks.abort_all();
    }
    logger::log_shutdown_complete(drained);
}
