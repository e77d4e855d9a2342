// Server loop module
// Accepts connections until shutdown is requested, then drains

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How often the drain loop checks the connection counter
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` is notified.
///
/// After shutdown the listener is closed and in-flight connections get up to
/// `drain_timeout` to finish.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
    drain_timeout: Duration,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.notified() => break,
        }
    }

    drop(listener);
    logger::log_shutdown(active_connections.load(Ordering::SeqCst));

    let drained = tokio::time::timeout(drain_timeout, async {
        while active_connections.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    })
    .await;

    if drained.is_err() {
        logger::log_warning(&format!(
            "{} connection(s) still open after {}s, exiting anyway",
            active_connections.load(Ordering::SeqCst),
            drain_timeout.as_secs()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_reusable_listener;
    use crate::store::MemoryStore;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::load_from(dir.path().join("absent").to_str().unwrap()).unwrap();
        config.logging.access_log = false;
        let state = Arc::new(AppState::new(&config, Arc::new(MemoryStore::new())));

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let server = tokio::spawn(start_server_loop(
            listener,
            state,
            Arc::clone(&counter),
            Arc::clone(&shutdown),
            Duration::from_secs(2),
        ));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(
                b"POST /api/likes?slug=loop HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            )
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();
        assert!(raw.starts_with("HTTP/1.1 200 OK"), "{raw}");
        assert!(raw.to_ascii_lowercase().contains("access-control-allow-origin: *"));
        assert!(raw.ends_with(r#"{"likes":1}"#), "{raw}");

        shutdown.notify_one();
        server.await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
