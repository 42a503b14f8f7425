// Connection handling module
// Serves a single TCP connection and writes access log lines

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::config::AppState;
use crate::handler;
use crate::http::HttpResponse;
use crate::logger::{self, AccessLogEntry};

/// Accept a connection if the limit allows, then serve it in a tracked task.
///
/// `tasks` holds every live connection; its length is the active count.
/// Connections over `performance.max_connections` are closed immediately.
/// A change on `shutdown` asks the connection to finish its current request
/// and close.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    shutdown: &watch::Receiver<bool>,
    tasks: &mut JoinSet<()>,
) {
    // Reap finished connections so len() reflects live ones
    while tasks.try_join_next().is_some() {}

    if let Some(max_conn) = state.config.performance.max_connections {
        let active = tasks.len();
        if active >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            logger::log_warning(&format!(
                "Max connections reached: {active}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    if let Err(e) = stream.set_nodelay(true) {
        logger::log_warning(&format!("Failed to set TCP_NODELAY for {peer_addr}: {e}"));
    }

    tasks.spawn(handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        shutdown.clone(),
    ));
}

/// Serve one connection until the client closes it, the timeout fires or
/// shutdown drains it.
async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    mut shutdown: watch::Receiver<bool>,
) {
    let io = TokioIo::new(stream);
    let performance = &state.config.performance;
    let timeout = (performance.connection_timeout > 0)
        .then(|| Duration::from_secs(performance.connection_timeout));

    let mut builder = http1::Builder::new();
    builder.keep_alive(performance.keep_alive);

    let service_state = Arc::clone(&state);
    let service = service_fn(move |req: Request<Incoming>| {
        let state = Arc::clone(&service_state);
        async move { Ok::<_, Infallible>(serve_request(&req, peer_addr, &state)) }
    });

    let conn = builder.serve_connection(io, service);
    tokio::pin!(conn);

    // Idle keep-alive connections close at once; busy ones finish the response
    let drive = async {
        tokio::select! {
            result = conn.as_mut() => result,
            _ = shutdown.changed() => {
                conn.as_mut().graceful_shutdown();
                conn.as_mut().await
            }
        }
    };

    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, drive).await {
            Ok(result) => result,
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} timed out after {} seconds",
                    limit.as_secs()
                ));
                return;
            }
        },
        None => drive.await,
    };

    if let Err(err) = result {
        logger::log_connection_error(&err);
    }
}

/// Run the handler for one request and log it
fn serve_request(req: &Request<Incoming>, peer_addr: SocketAddr, state: &AppState) -> HttpResponse {
    let started = Instant::now();
    let mut entry = state
        .access_log()
        .then(|| AccessLogEntry::from_request(req, peer_addr));

    let resp = handler::route_request(req, state);

    if let Some(entry) = entry.as_mut() {
        entry.record_response(&resp, started.elapsed());
        logger::log_access(entry, &state.config.logging.access_log_format);
    }
    resp
}
