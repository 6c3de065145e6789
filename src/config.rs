//! Service configuration

use std::env;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::generator::timer::DEFAULT_PERIOD;
use crate::{PositionStore, TickOutcome};

/// Default config file name, looked up in the working and home directories
pub const CONFIG_FILE: &str = ".loratrack.yaml";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Configs {
    pub api: ApiOptions,
    pub playback: PlaybackOptions,
    /// Newline delimited uplink feed path, `-` for stdin
    pub uplinks: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiOptions {
    pub host: String,
    pub port: u16,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

/// When the simulated track is allowed to write positions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    /// Only until the first real uplink arrives
    #[default]
    Fallback,
    /// Always, no device needed
    Always,
    Off,
}

impl PlaybackMode {
    /// Timer sink writing emitted positions into `store` as the mode allows
    pub fn sink(self, store: Arc<PositionStore>) -> impl FnMut(TickOutcome) + Send + 'static {
        move |outcome| {
            let TickOutcome::Emitted(pos) = outcome else {
                return;
            };

            match self {
                PlaybackMode::Fallback if store.has_live_data() => {}
                PlaybackMode::Fallback | PlaybackMode::Always => store.set(pos),
                PlaybackMode::Off => {}
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaybackOptions {
    /// Seconds between ticks
    pub interval: u64,
    /// GeoJSON FeatureCollection, the built-in track when missing
    pub track: Option<String>,
    pub mode: PlaybackMode,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_PERIOD.as_secs(),
            track: None,
            mode: PlaybackMode::default(),
        }
    }
}

impl PlaybackOptions {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.interval.max(1))
    }
}

impl Configs {
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml)
            .map_err(|e| format!("Failed on parse the config: {}", e.to_string()))
    }

    /// First readable and valid file of `candidates`, defaults otherwise
    pub fn load(candidates: &[String]) -> Self {
        let mut configs = candidates
            .iter()
            .filter_map(|fi| fs::read_to_string(fi).ok())
            .find_map(|s| Self::from_yaml(&s).ok())
            .unwrap_or_default();

        configs.apply_env();

        configs
    }

    /// `API_PORT` overrides the configured port
    pub fn apply_env(&mut self) {
        if let Some(port) = env::var("API_PORT")
            .ok()
            .and_then(|p| p.trim().parse::<u16>().ok())
        {
            self.api.port = port;
        }
    }
}
