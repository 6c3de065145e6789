//! Latest known position and connectivity status

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use log::info;
use serde::Serialize;

use crate::CanonicalPosition;

/// Connectivity of the uplink feed, for display only
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ConnectivityStatus {
    Initializing,
    Connected,
    Disconnected,
    ConnectionError,
    /// No device, positions come from the playback track
    Demo,
}

impl ConnectivityStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectivityStatus::Initializing => "Initializing...",
            ConnectivityStatus::Connected => "Connected to TTN",
            ConnectivityStatus::Disconnected => "Disconnected from TTN",
            ConnectivityStatus::ConnectionError => "Connection Error",
            ConnectivityStatus::Demo => "Demo",
        }
    }
}

impl fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Single in-memory slot for the most recent position
///
/// Writers replace the whole record, last writer wins.
pub struct PositionStore {
    latest: RwLock<Option<CanonicalPosition>>,
    status: RwLock<ConnectivityStatus>,
    live: AtomicBool,
}

impl Default for PositionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionStore {
    pub fn new() -> Self {
        Self {
            latest: RwLock::new(None),
            status: RwLock::new(ConnectivityStatus::Initializing),
            live: AtomicBool::new(false),
        }
    }

    pub fn set(&self, position: CanonicalPosition) {
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(position);
    }

    /// Store a position that came from a real device uplink
    pub fn set_live(&self, position: CanonicalPosition) {
        self.set(position);
        self.live.store(true, Ordering::Release);
    }

    pub fn get(&self) -> Option<CanonicalPosition> {
        *self.latest.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn has_data(&self) -> bool {
        self.get().is_some()
    }

    /// Whether any uplink position was ever stored
    pub fn has_live_data(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    pub fn set_status(&self, status: ConnectivityStatus) {
        let mut current = self.status.write().unwrap_or_else(PoisonError::into_inner);
        if *current != status {
            info!("Connectivity: {}", status);
        }
        *current = status;
    }

    pub fn status(&self) -> ConnectivityStatus {
        *self.status.read().unwrap_or_else(PoisonError::into_inner)
    }
}
