use anyhow::Context;
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tokio::runtime::Builder as TokioBuilder;

/// Quit flag checked once per frame by the capture and predict loops.
#[derive(Clone, Default)]
pub struct QuitSignal {
    raised: Arc<AtomicBool>,
}

impl QuitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Raises the flag when Ctrl+C arrives. The watcher thread lives until the process exits.
    pub fn watch_ctrl_c(&self) -> anyhow::Result<()> {
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        let signal = self.clone();
        thread::spawn(move || {
            runtime.block_on(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Ctrl+C received, stopping after the current frame");
                    signal.raise();
                }
            });
        });
        Ok(())
    }
}
