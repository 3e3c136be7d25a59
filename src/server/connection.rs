// Connection handling module
// Accepts a single TCP connection and serves it with the request router

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::sync::watch;

use crate::config;
use crate::handler;
use crate::logger;

/// Accept and process a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
/// * `shutdown` - Flips to `true` when the server is stopping
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<config::AppState>,
    conn_counter: &Arc<AtomicUsize>,
    shutdown: watch::Receiver<bool>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        shutdown,
    );
}

/// Upper bound on a connection's lifetime, including keep-alive idling
pub fn connection_timeout(performance: &config::PerformanceConfig) -> Duration {
    Duration::from_secs(
        performance
            .read_timeout
            .max(performance.write_timeout)
            .max(performance.keep_alive_timeout),
    )
}

/// Handle a single connection in a spawned task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 keep-alive and the header read timeout
/// 3. Serves the connection with the request router
/// 4. Switches to graceful shutdown when the shutdown flag flips
/// 5. Decrements the connection counter when done
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<config::AppState>,
    conn_counter: Arc<AtomicUsize>,
    mut shutdown: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let performance = &state.config.performance;
        let timeout_duration = connection_timeout(performance);

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .keep_alive(performance.keep_alive_timeout > 0)
            .header_read_timeout(Duration::from_secs(performance.read_timeout.max(1)));

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
        );
        tokio::pin!(conn);

        let served = tokio::time::timeout(timeout_duration, async {
            // Shutdown may have started between accept and subscribe
            if *shutdown.borrow_and_update() {
                conn.as_mut().graceful_shutdown();
                return conn.as_mut().await;
            }

            tokio::select! {
                res = conn.as_mut() => res,
                _ = shutdown.changed() => {
                    // Finish the in-flight request, then close
                    conn.as_mut().graceful_shutdown();
                    conn.as_mut().await
                }
            }
        })
        .await;

        match served {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_debug(&format!(
                "Connection from {peer_addr} closed after {} seconds",
                timeout_duration.as_secs()
            )),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FixtureProvider;
    use crate::server::{create_listener, SignalHandler};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn capped_state(max_connections: Option<u64>) -> Arc<config::AppState> {
        let mut cfg = config::Config::default();
        cfg.assets.root = String::new();
        cfg.logging.access_log = false;
        cfg.performance.max_connections = max_connections;
        Arc::new(config::AppState::new(cfg, Arc::new(FixtureProvider::new())))
    }

    /// Client side plus the server side of a fresh loopback connection
    async fn connect(listener: &TcpListener) -> (TcpStream, TcpStream, std::net::SocketAddr) {
        let client = TcpStream::connect(listener.local_addr().unwrap())
            .await
            .unwrap();
        let (server, peer_addr) = listener.accept().await.unwrap();
        (client, server, peer_addr)
    }

    async fn wait_until_idle(counter: &AtomicUsize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while counter.load(Ordering::SeqCst) != 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("connection counter should drop back to zero");
    }

    #[test]
    fn test_connection_timeout_covers_keep_alive() {
        let performance = config::PerformanceConfig::default();
        assert_eq!(connection_timeout(&performance), Duration::from_secs(75));

        let performance = config::PerformanceConfig {
            keep_alive_timeout: 0,
            read_timeout: 5,
            write_timeout: 20,
            ..config::PerformanceConfig::default()
        };
        assert_eq!(connection_timeout(&performance), Duration::from_secs(20));
    }

    #[tokio::test]
    async fn test_connections_over_the_cap_are_dropped() {
        let state = capped_state(Some(1));
        let counter = Arc::new(AtomicUsize::new(0));
        let signals = SignalHandler::new();
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();

        let (mut first, server_side, peer) = connect(&listener).await;
        accept_connection(server_side, peer, &state, &counter, signals.subscribe());
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        let (mut second, server_side, peer) = connect(&listener).await;
        accept_connection(server_side, peer, &state, &counter, signals.subscribe());
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        // Rejected stream is closed without a response
        let mut buf = [0_u8; 64];
        let read = tokio::time::timeout(Duration::from_secs(5), second.read(&mut buf))
            .await
            .expect("rejected connection should be closed");
        assert_eq!(read.unwrap_or(0), 0);

        first
            .write_all(b"GET /api/health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = Vec::new();
        first.read_to_end(&mut raw).await.unwrap();
        assert!(String::from_utf8_lossy(&raw).starts_with("HTTP/1.1 200 OK"));

        wait_until_idle(&counter).await;
    }

    #[tokio::test]
    async fn test_connection_accepted_during_shutdown_is_closed() {
        let state = capped_state(None);
        let counter = Arc::new(AtomicUsize::new(0));
        let signals = SignalHandler::new();
        signals.trigger("test");
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();

        let (mut client, server_side, peer) = connect(&listener).await;
        // Subscribed after the flag flipped, so no change notification arrives
        accept_connection(server_side, peer, &state, &counter, signals.subscribe());

        client
            .write_all(b"GET /api/health HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        let mut raw = Vec::new();
        // A keep-alive connection would otherwise idle until the connection timeout
        let closed = tokio::time::timeout(Duration::from_secs(5), client.read_to_end(&mut raw)).await;
        assert!(closed.is_ok(), "connection should close once shutdown is observed");

        wait_until_idle(&counter).await;
    }
}
