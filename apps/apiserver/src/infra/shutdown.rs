//! Process stop signals.

use tracing::warn;

/// Listens for SIGINT and, on Unix, SIGTERM (what the orchestrator sends
/// when it stops a pod). Handlers are registered by [`ShutdownSignal::install`],
/// so a signal arriving before [`ShutdownSignal::recv`] is not lost.
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?,
        })
    }

    /// Waits for the first stop signal and returns its name.
    #[cfg(unix)]
    pub async fn recv(mut self) -> &'static str {
        tokio::select! {
            res = tokio::signal::ctrl_c() => match res {
                Ok(()) => "SIGINT",
                Err(e) => {
                    warn!(error = %e, "cannot listen for SIGINT");
                    self.terminate.recv().await;
                    "SIGTERM"
                }
            },
            _ = self.terminate.recv() => "SIGTERM",
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(self) -> &'static str {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        "ctrl-c"
    }
}
