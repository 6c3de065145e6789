//! loratrack - vehicle position stream from LoRaWAN uplinks, with a simulated
//! track replayed while no device is reporting

pub mod config;
mod generator;
#[cfg(feature = "server")]
pub mod server;
pub mod sources;
mod store;

pub use config::{Configs, PlaybackMode};
pub use generator::bearing::{bearing, headings};
pub use generator::playback::{PlaybackCursor, PlaybackEngine, TickOutcome};
pub use generator::position::CanonicalPosition;
pub use generator::timer::{PlaybackTimer, DEFAULT_PERIOD};
pub use generator::track::{GeoTrack, TrackFeature, TrackGeometry, BUILTIN_TRACK};
pub use sources::{
    ingest, ingest_with, normalize, pump, IngestStats, LineSource, Rejected, UplinkSource,
};
pub use store::{ConnectivityStatus, PositionStore};
