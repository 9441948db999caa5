// Server loop module
// Accepts connections until shutdown is requested, then waits for in-flight ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{watch, Notify};

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How often the drain phase re-checks the connection counter
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Inputs of the accept loop beyond the listener and state
pub struct ServerLoopConfig {
    pub shutdown: Arc<Notify>,
    pub active_connections: Arc<AtomicUsize>,
    /// Upper bound on how long shutdown waits for open connections
    pub drain_timeout: Duration,
}

/// Run the accept loop until `shutdown` fires, then drain.
///
/// New connections stop being accepted as soon as the signal arrives; open
/// connections finish their current request, then close. The wait is capped at
/// `drain_timeout`.
#[allow(clippy::ignored_unit_patterns)]
pub async fn run(listener: TcpListener, state: Arc<AppState>, config: ServerLoopConfig) {
    let (closing_tx, closing_rx) = watch::channel(false);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &config.active_connections,
                            &closing_rx,
                        );
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            _ = config.shutdown.notified() => break,
        }
    }

    drop(listener);
    closing_tx.send_replace(true);
    drain(&config.active_connections, config.drain_timeout).await;
}

async fn drain(active_connections: &AtomicUsize, drain_timeout: Duration) {
    let waiting = async {
        while active_connections.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    };

    if tokio::time::timeout(drain_timeout, waiting).await.is_err() {
        logger::log_warning(&format!(
            "Shutdown drain timed out with {} connection(s) still open",
            active_connections.load(Ordering::SeqCst)
        ));
    } else {
        tracing::info!("All connections closed, shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_reusable_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> Config {
        let mut config = Config::load_from("__hs_edge_missing_config__").unwrap();
        config.logging.access_log = false;
        config.proxy.public_origin = Some("https://example.com".to_string());
        config
    }

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(&test_config()).unwrap())
    }

    struct RunningServer {
        addr: std::net::SocketAddr,
        shutdown: Arc<Notify>,
        active_connections: Arc<AtomicUsize>,
        handle: tokio::task::JoinHandle<()>,
    }

    fn start(state: Arc<AppState>) -> RunningServer {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let active_connections = Arc::new(AtomicUsize::new(0));

        let handle = tokio::spawn(run(
            listener,
            state,
            ServerLoopConfig {
                shutdown: Arc::clone(&shutdown),
                active_connections: Arc::clone(&active_connections),
                drain_timeout: Duration::from_secs(5),
            },
        ));

        RunningServer {
            addr,
            shutdown,
            active_connections,
            handle,
        }
    }

    async fn roundtrip(addr: std::net::SocketAddr, request: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_then_stops_on_shutdown() {
        let server = start(test_state());

        let response = roundtrip(
            server.addr,
            "OPTIONS /upload HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.to_ascii_lowercase().contains("access-control-allow-origin: *"));

        server.shutdown.notify_one();
        tokio::time::timeout(Duration::from_secs(5), server.handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(server.active_connections.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_slow_upstream_outliving_read_timeout_still_gets_envelope() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow.png"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
            .mount(&upstream)
            .await;

        let mut config = test_config();
        config.performance.read_timeout = 1;
        config.performance.write_timeout = 1;
        config.upstream.base_url = upstream.uri();
        config.upstream.timeout_secs = 3;
        let server = start(Arc::new(AppState::new(&config).unwrap()));

        let response = roundtrip(
            server.addr,
            "GET /slow.png HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 500"), "got: {response:?}");
        assert!(response.to_ascii_lowercase().contains("access-control-allow-origin: *"));
        assert!(response.contains(r#"{"error":"File serve failed: "#));
    }

    #[tokio::test]
    async fn test_shutdown_closes_idle_keep_alive_connection() {
        let server = start(test_state());

        let mut stream = tokio::net::TcpStream::connect(server.addr).await.unwrap();
        stream
            .write_all(b"OPTIONS / HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        let mut buf = [0u8; 512];
        let n = stream.read(&mut buf).await.unwrap();
        assert!(buf[..n].starts_with(b"HTTP/1.1 200 OK"));

        server.shutdown.notify_one();
        tokio::time::timeout(Duration::from_secs(3), server.handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(server.active_connections.load(Ordering::SeqCst), 0);

        let mut rest = Vec::new();
        let read = stream.read_to_end(&mut rest).await.unwrap();
        assert_eq!(read, 0);
    }

    #[tokio::test]
    async fn test_drain_returns_once_idle() {
        let counter = AtomicUsize::new(0);
        tokio::time::timeout(Duration::from_secs(1), drain(&counter, Duration::from_secs(10)))
            .await
            .unwrap();
    }
}
