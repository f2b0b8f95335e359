//! Background ticker that drives an [`ArrivalGenerator`].

use crate::error::{CenterError, Result};
use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use rand::Rng;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::generator::ArrivalGenerator;
use super::NotificationSink;

/// Owns the ticker thread. Stopping (or dropping) joins the thread, so no
/// tick can fire once `stop` has returned.
pub struct FeedDriver {
    stop_tx: Option<Sender<()>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl FeedDriver {
    /// Spawn the ticker. The first tick fires one `interval` after start.
    pub fn start<R>(
        generator: ArrivalGenerator<R>,
        interval: Duration,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self>
    where
        R: Rng + Send + 'static,
    {
        if interval.is_zero() {
            return Err(CenterError::InvalidConfig(
                "tick interval must be positive".to_string(),
            ));
        }

        let (stop_tx, stop_rx) = bounded::<()>(1);

        let thread_handle = thread::Builder::new()
            .name("notification-feed".to_string())
            .spawn(move || Self::feed_loop(generator, interval, sink, stop_rx))?;

        info!(interval_ms = interval.as_millis() as u64, "notification feed started");

        Ok(Self {
            stop_tx: Some(stop_tx),
            thread_handle: Some(thread_handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Signal the thread and wait for it to exit. Safe to call repeatedly.
    pub fn stop(&mut self) {
        // Dropping the sender disconnects the stop channel, which also wakes the loop.
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.try_send(());
        }

        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                warn!("notification feed thread panicked");
            }
            info!("notification feed stopped");
        }
    }

    fn feed_loop<R: Rng>(
        mut generator: ArrivalGenerator<R>,
        interval: Duration,
        sink: Arc<dyn NotificationSink>,
        stop_rx: Receiver<()>,
    ) {
        let ticker = tick(interval);

        loop {
            // Check stop first so a pending tick cannot race past it.
            if !stop_rx.is_empty() {
                break;
            }

            select! {
                recv(stop_rx) -> _ => break,
                recv(ticker) -> _ => {
                    if !stop_rx.is_empty() {
                        break;
                    }
                    if let Err(e) = generator.tick(sink.as_ref()) {
                        debug!(error = %e, "sink rejected feed notification, stopping feed");
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for FeedDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
