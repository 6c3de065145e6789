//! loratrack cli - vehicle position service for LoRaWAN trackers

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use argopt::{cmd_group, subcmd};
use log::{error, info};
use serde_json::json;

use loratrack::config::CONFIG_FILE;
use loratrack::server::{self, AppState};
use loratrack::{
    headings, ingest_with, pump, CanonicalPosition, Configs, ConnectivityStatus, GeoTrack,
    LineSource, PlaybackEngine, PlaybackMode, PlaybackTimer, PositionStore, TickOutcome,
};

/// CLI of loratrack - Serve the latest position of a LoRaWAN tracked vehicle
#[cmd_group(commands = [serve, normalize, replay])]
fn main() -> Result<(), String> {}

/// Run the position API, the playback timer and the uplink feed
#[subcmd]
fn serve(
    /// Service configuration. Default: .loratrack.yaml, ~/.loratrack.yaml
    #[opt(long)]
    config: Option<String>,
) -> Result<(), String> {
    init_logger();

    let conf = load_configs(config);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed on start the runtime: {}", e.to_string()))?;

    let res = runtime.block_on(run(conf));

    // a feed blocked on stdin must not hold the process
    runtime.shutdown_timeout(Duration::from_secs(1));

    res
}

/// Print the canonical position of every uplink message of a feed
#[subcmd]
fn normalize(
    /// Newline delimited uplink messages, `-` for stdin
    feed: String,
) -> Result<(), String> {
    init_logger();

    let mut source = LineSource::new(open_feed(&feed)?);

    let stats = ingest_with(&mut source, |pos| {
        let line = serde_json::to_string(&pos)
            .map_err(|e| format!("Failed on encode the position: {}", e.to_string()))?;
        println!("{}", line);
        Ok(())
    })?;

    eprintln!("{} accepted, {} rejected", stats.accepted, stats.rejected);

    Ok(())
}

/// Replay a track tick by tick, with the heading between positions
#[subcmd]
fn replay(
    /// Number of ticks
    ticks: usize,
    /// GeoJSON FeatureCollection. Default: built-in track
    #[opt(long)]
    track: Option<String>,
) -> Result<(), String> {
    init_logger();

    let track = load_track(&track)?;
    let mut engine = PlaybackEngine::new(track);

    let mut positions: Vec<(usize, CanonicalPosition)> = vec![];
    for tick in 0..ticks {
        match engine.tick() {
            TickOutcome::Emitted(pos) => positions.push((tick, pos)),
            TickOutcome::LineExhausted => {}
            TickOutcome::EmptyTrack => return Err("The track is empty".to_string()),
        }
    }

    let only: Vec<CanonicalPosition> = positions.iter().map(|(_, p)| *p).collect();
    let hs = headings(&only);

    for (idx, (tick, pos)) in positions.iter().enumerate() {
        let heading = if idx > 0 { hs.get(idx - 1).copied() } else { None };
        println!(
            "{}",
            json!({ "tick": tick, "position": pos, "heading": heading })
        );
    }

    Ok(())
}

async fn run(conf: Configs) -> Result<(), String> {
    let track = Arc::new(load_track(&conf.playback.track)?);
    let store = Arc::new(PositionStore::new());

    let timer = match conf.playback.mode {
        PlaybackMode::Off => None,
        mode => {
            if mode == PlaybackMode::Always && conf.uplinks.is_none() {
                store.set_status(ConnectivityStatus::Demo);
            }

            Some(PlaybackTimer::start(
                PlaybackEngine::new(track.as_ref().clone()),
                conf.playback.period(),
                mode.sink(store.clone()),
            ))
        }
    };

    if let Some(feed) = conf.uplinks.clone() {
        let feed_store = store.clone();
        tokio::task::spawn_blocking(move || {
            let _ = pump(|| open_feed(&feed).map(LineSource::new), &feed_store);
        });
    }

    let addr: SocketAddr = format!("{}:{}", conf.api.host, conf.api.port)
        .parse()
        .map_err(|e| format!("Failed on parse the API address: {}", e))?;

    let res = server::serve(addr, AppState { store, track }, shutdown_signal()).await;

    if let Some(t) = &timer {
        t.stop();
    }

    res
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed on listen for ctrl-c: {}", e);
        return;
    }

    info!("Shutting down");
}

fn open_feed(feed: &str) -> Result<Box<dyn BufRead + Send>, String> {
    if feed == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let file = File::open(feed)
        .map_err(|e| format!("Failed on open the uplink feed: {}", e.to_string()))?;

    Ok(Box::new(BufReader::new(file)))
}

fn load_track(path: &Option<String>) -> Result<GeoTrack, String> {
    match path {
        Some(p) => GeoTrack::load(p),
        None => GeoTrack::builtin(),
    }
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Load the current config
fn load_configs(provided: Option<String>) -> Configs {
    let mut options = vec![];

    if let Some(sprovided) = provided {
        options.push(sprovided);
    }

    options.push(CONFIG_FILE.to_string());

    if let Some(home) = dirs::home_dir() {
        if let Some(shome) = home.to_str() {
            options.push(format!("{}/{}", shome, CONFIG_FILE));
        }
    }

    Configs::load(&options)
}
