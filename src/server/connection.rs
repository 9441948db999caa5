// Connection handling module
// Accepts a single TCP connection and serves it with hyper's HTTP/1 machinery

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;

use crate::config::AppState;
use crate::handler::{self, ConnInfo};
use crate::logger;

/// Accept a connection unless the connection cap is reached, then serve it.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    closing: &watch::Receiver<bool>,
) {
    // Increment first, then check, so two accepts can't both squeeze under the cap
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    let local_addr = match stream.local_addr() {
        Ok(addr) => addr,
        Err(e) => {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_error(&format!("Failed to read local address: {e}"));
            return;
        }
    };

    logger::log_connection_accepted(&peer_addr);

    handle_connection(
        stream,
        ConnInfo {
            peer_addr,
            local_addr,
        },
        Arc::clone(state),
        Arc::clone(conn_counter),
        closing.clone(),
    );
}

/// Serve one connection in a spawned task.
///
/// Keep-alive is on when `keep_alive_timeout > 0`. Only reading a request head is
/// bounded (by the larger of the read and write timeouts); a request waiting on
/// upstream runs until the upstream client's own timeout turns it into an error
/// envelope. When `closing` flips, the connection finishes its in-flight request
/// and closes. The counter is decremented when the task ends, whichever way it ends.
fn handle_connection(
    stream: TcpStream,
    conn: ConnInfo,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    mut closing: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let keep_alive = state.config.performance.keep_alive_timeout > 0;
        let header_timeout = Duration::from_secs(std::cmp::max(
            state.config.performance.read_timeout,
            state.config.performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .header_read_timeout(header_timeout)
            .keep_alive(keep_alive);

        let service_state = Arc::clone(&state);
        let conn_future = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), conn)),
        );
        let mut conn_future = std::pin::pin!(conn_future);
        let mut draining = false;

        loop {
            tokio::select! {
                result = conn_future.as_mut() => {
                    if let Err(err) = result {
                        logger::log_connection_error(&err);
                    }
                    break;
                }

                _ = closing.wait_for(|closed| *closed), if !draining => {
                    draining = true;
                    conn_future.as_mut().graceful_shutdown();
                }
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
