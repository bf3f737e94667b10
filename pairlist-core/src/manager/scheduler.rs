//! Background auto-refresh thread.
//!
//! One refresh runs immediately, then the thread waits on a stop channel for
//! up to the configured interval. A stop request wakes it at once; an
//! in-flight refresh always runs to completion first.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error};

use super::Inner;

pub(super) struct AutoRefresh {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl AutoRefresh {
    pub(super) fn spawn(inner: Arc<Inner>) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("pairlist-refresh".into())
            .spawn(move || refresh_loop(&inner, &stop_rx))?;
        Ok(Self { stop_tx, handle })
    }

    /// Signal the loop and block until it exits.
    pub(super) fn stop(self) {
        // A send error means the loop already exited.
        let _ = self.stop_tx.send(());
        if self.handle.join().is_err() {
            error!("Auto refresh thread terminated abnormally");
        }
    }
}

fn refresh_loop(inner: &Inner, stop_rx: &Receiver<()>) {
    loop {
        match panic::catch_unwind(AssertUnwindSafe(|| inner.refresh())) {
            Ok(Ok(report)) => debug!(
                pairs = report.published,
                retained = report.retained,
                "Scheduled refresh finished"
            ),
            Ok(Err(e)) => error!(error = %e, "Error in auto refresh"),
            Err(payload) => {
                error!(panic = panic_message(&*payload), "Auto refresh cycle panicked")
            }
        }

        let secs = inner.refresh_interval_secs.load(Ordering::Relaxed).max(1);
        let interval = Duration::from_secs(secs);
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
