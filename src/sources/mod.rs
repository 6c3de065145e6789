//! Uplink sources API

use log::{error, info, warn};

use crate::{CanonicalPosition, ConnectivityStatus, PositionStore};

mod lines;
mod uplink;

pub use lines::LineSource;
pub use uplink::{normalize, Rejected};

/// Source of raw uplink messages
pub trait UplinkSource {
    /// Next raw message, `None` once the feed is over
    fn next_uplink(&mut self) -> Result<Option<Vec<u8>>, String>;
}

/// Counters of an ingestion run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub accepted: usize,
    pub rejected: usize,
}

/// Push every message of the source into the store
///
/// Rejected messages are logged and dropped. Stops at the end of the feed or
/// on the first read error.
pub fn ingest<SU>(source: &mut SU, store: &PositionStore) -> Result<IngestStats, String>
where
    SU: UplinkSource,
{
    ingest_with(source, |pos| {
        info!("Received uplink: {:?}", pos);
        store.set_live(pos);
        Ok(())
    })
}

/// Normalize every message of the source and hand the accepted ones to `sink`
///
/// A sink error stops the run like a read error does.
pub fn ingest_with<SU, F>(source: &mut SU, mut sink: F) -> Result<IngestStats, String>
where
    SU: UplinkSource,
    F: FnMut(CanonicalPosition) -> Result<(), String>,
{
    let mut stats = IngestStats::default();

    while let Some(raw) = source.next_uplink()? {
        match normalize(&raw) {
            Ok(pos) => {
                sink(pos)?;
                stats.accepted += 1;
            }
            Err(e) => {
                warn!("Dropping uplink message: {}", e);
                stats.rejected += 1;
            }
        }
    }

    Ok(stats)
}

/// Run a whole feed into the store, tracking the connectivity status
///
/// `Connected` once the feed is open, `Disconnected` when it ends and
/// `ConnectionError` when it cannot be opened or a read fails.
pub fn pump<SU, F>(open: F, store: &PositionStore) -> Result<IngestStats, String>
where
    SU: UplinkSource,
    F: FnOnce() -> Result<SU, String>,
{
    let mut source = match open() {
        Ok(source) => source,
        Err(e) => {
            error!("{}", e);
            store.set_status(ConnectivityStatus::ConnectionError);
            return Err(e);
        }
    };

    store.set_status(ConnectivityStatus::Connected);

    match ingest(&mut source, store) {
        Ok(stats) => {
            info!(
                "Uplink feed ended: {} accepted, {} rejected",
                stats.accepted, stats.rejected
            );
            store.set_status(ConnectivityStatus::Disconnected);
            Ok(stats)
        }
        Err(e) => {
            error!("{}", e);
            store.set_status(ConnectivityStatus::ConnectionError);
            Err(e)
        }
    }
}
