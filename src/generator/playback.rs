//! Track playback engine
//!
//! Replays a [`GeoTrack`] one coordinate per tick, forever. The engine knows
//! nothing about time, something else has to call [`PlaybackEngine::tick`].

use geo::geometry::Point;
use log::{debug, warn};
use rand::Rng;

use super::position::CanonicalPosition;
use super::track::{GeoTrack, TrackGeometry};

/// Traversal cursor over the track
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackCursor {
    pub feature: usize,
    /// Only meaningful while on a line feature
    pub coordinate: usize,
}

/// Result of a single tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    Emitted(CanonicalPosition),
    /// The current line ran out of coordinates, the next tick moves on to the
    /// next feature
    LineExhausted,
    /// Nothing to replay
    EmptyTrack,
}

impl TickOutcome {
    pub fn position(&self) -> Option<CanonicalPosition> {
        match self {
            TickOutcome::Emitted(p) => Some(*p),
            _ => None,
        }
    }
}

pub struct PlaybackEngine {
    track: GeoTrack,
    cursor: PlaybackCursor,
}

impl PlaybackEngine {
    pub fn new(track: GeoTrack) -> Self {
        Self {
            track,
            cursor: PlaybackCursor::default(),
        }
    }

    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    /// Advance the cursor once
    pub fn tick(&mut self) -> TickOutcome {
        if self.track.is_empty() {
            warn!("Playback track is empty, nothing to replay");
            return TickOutcome::EmptyTrack;
        }

        if self.cursor.feature >= self.track.len() {
            debug!("Playback track finished, restarting");
            self.cursor = PlaybackCursor::default();
        }

        let Some(feature) = self.track.get(self.cursor.feature) else {
            return TickOutcome::EmptyTrack;
        };

        let outcome = match &feature.geometry {
            TrackGeometry::Point(point) => {
                self.cursor.feature += 1;
                self.cursor.coordinate = 0;

                TickOutcome::Emitted(synthetic(*point))
            }
            TrackGeometry::Line(line) => match line.0.get(self.cursor.coordinate) {
                Some(coord) => {
                    self.cursor.coordinate += 1;

                    TickOutcome::Emitted(synthetic(Point::from(*coord)))
                }
                None => {
                    self.cursor.feature += 1;
                    self.cursor.coordinate = 0;

                    TickOutcome::LineExhausted
                }
            },
        };

        debug!("Playback tick {:?} -> {:?}", self.cursor, outcome);

        outcome
    }
}

/// Position with made up battery and speed, both in `[0, 100)`
fn synthetic(point: Point) -> CanonicalPosition {
    let mut rng = rand::thread_rng();

    CanonicalPosition {
        battery: f64::from(rng.gen_range(0..100u32)),
        speed: f64::from(rng.gen_range(0..100u32)),
        ..CanonicalPosition::basic(point)
    }
}
