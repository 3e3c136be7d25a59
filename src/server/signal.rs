// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use tokio::sync::watch;

use crate::logger;

/// Broadcasts the shutdown request to the accept loop and every connection
pub struct SignalHandler {
    shutdown: watch::Sender<bool>,
}

impl SignalHandler {
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self { shutdown }
    }

    /// Receiver that observes the shutdown flag
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Request shutdown; later calls are no-ops
    pub fn trigger(&self, reason: &str) {
        let first = self.shutdown.send_if_modified(|requested| {
            let changed = !*requested;
            *requested = true;
            changed
        });
        if first {
            logger::log_shutdown_requested(reason);
        }
    }

    pub fn is_shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start signal handlers (Unix)
///
/// | Signal  | Action        |
/// |---------|---------------|
/// | SIGTERM | Graceful stop |
/// | SIGINT  | Graceful stop |
#[cfg(unix)]
pub fn start_signal_handler(handler: std::sync::Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                logger::log_warning(&format!(
                    "Failed to register SIGTERM handler, only Ctrl+C will stop the server: {e}"
                ));
                wait_for_ctrl_c(&handler).await;
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => handler.trigger("SIGTERM"),
            res = tokio::signal::ctrl_c() => match res {
                Ok(()) => handler.trigger("SIGINT"),
                Err(e) => logger::log_warning(&format!("Failed to listen for SIGINT: {e}")),
            },
        }
    });
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: std::sync::Arc<SignalHandler>) {
    tokio::spawn(async move {
        wait_for_ctrl_c(&handler).await;
    });
}

async fn wait_for_ctrl_c(handler: &SignalHandler) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => handler.trigger("Ctrl+C"),
        Err(e) => logger::log_warning(&format!("Failed to listen for Ctrl+C: {e}")),
    }
}
