//! Periodic driver for the playback engine

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use log::info;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::playback::{PlaybackEngine, TickOutcome};

/// Default time between two ticks
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(5);

/// Cancelable repeating timer ticking a [`PlaybackEngine`]
///
/// The first tick happens one period after start. Must be started from
/// within a tokio runtime.
pub struct PlaybackTimer {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackTimer {
    /// Start ticking `engine` every `period`, handing each outcome to `sink`
    pub fn start<F>(mut engine: PlaybackEngine, period: Duration, mut sink: F) -> Self
    where
        F: FnMut(TickOutcome) + Send + 'static,
    {
        let period = if period.is_zero() {
            Duration::from_millis(1)
        } else {
            period
        };

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                sink(engine.tick());
            }
        });

        info!("Playback started, ticking every {:?}", period);

        Self {
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Stop generating ticks, further calls do nothing
    pub fn stop(&self) {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(h) = handle {
            h.abort();
            info!("Playback stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for PlaybackTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
