//! Signal handling for graceful shutdown

use std::{future::Future, io};

use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::{error, info, warn};

/// Resolve once SIGTERM or SIGINT arrives.
///
/// Falls back to Ctrl-C alone when the signal stream cannot be registered.
pub async fn shutdown_signal() {
    let mut signals = match Signals::new([SIGTERM, SIGINT]) {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Failed to register signal handler ({}), listening for Ctrl-C only", e);
            wait_for_ctrl_c(tokio::signal::ctrl_c()).await;
            return;
        }
    };

    if let Some(signal) = signals.next().await {
        let name = match signal {
            SIGTERM => "SIGTERM",
            SIGINT => "SIGINT",
            _ => "unknown",
        };
        info!("Received {}, draining connections", name);
    }
    signals.handle().close();
}

/// Resolve when `ctrl_c` does. A failed listener never resolves, so the
/// server keeps running instead of shutting down straight away.
async fn wait_for_ctrl_c<F>(ctrl_c: F)
where
    F: Future<Output = io::Result<()>>,
{
    match ctrl_c.await {
        Ok(()) => info!("Received Ctrl-C, draining connections"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C ({}), graceful shutdown unavailable", e);
            std::future::pending::<()>().await;
        }
    }
}
