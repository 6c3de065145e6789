use std::sync::{Arc, Mutex};
use std::time::Duration;

use geo::geometry::{LineString, Point};

use super::playback::{PlaybackCursor, PlaybackEngine, TickOutcome};
use super::position::CanonicalPosition;
use super::timer::PlaybackTimer;
use super::track::{GeoTrack, TrackFeature, TrackGeometry};

fn emitted(outcome: TickOutcome) -> Result<CanonicalPosition, String> {
    outcome
        .position()
        .ok_or(format!("Expected a position, got {:?}", outcome))
}

fn assert_synthetic(pos: &CanonicalPosition) {
    assert!((0.0..100.0).contains(&pos.battery), "battery {}", pos.battery);
    assert!((0.0..100.0).contains(&pos.speed), "speed {}", pos.speed);
    assert_eq!(pos.battery, pos.battery.trunc());
    assert_eq!(pos.speed, pos.speed.trunc());
}

#[test]
fn point_feature() -> Result<(), String> {
    let track = GeoTrack::new(vec![TrackFeature::point(Point::new(110.41, -6.98))]);
    let mut engine = PlaybackEngine::new(track);

    for _ in 0..5 {
        let pos = emitted(engine.tick())?;
        assert_eq!(110.41, pos.longitude);
        assert_eq!(-6.98, pos.latitude);
        assert_synthetic(&pos);
    }

    Ok(())
}

#[test]
fn line_traversal_order() -> Result<(), String> {
    let track = GeoTrack::new(vec![
        TrackFeature::line(LineString::from(vec![(110.41, -6.98), (110.42, -6.99)])),
        TrackFeature::point(Point::new(110.43, -7.0)),
    ]);
    let mut engine = PlaybackEngine::new(track);

    let a = emitted(engine.tick())?;
    assert_eq!((110.41, -6.98), (a.longitude, a.latitude));
    assert_synthetic(&a);
    assert_eq!(PlaybackCursor { feature: 0, coordinate: 1 }, engine.cursor());

    let b = emitted(engine.tick())?;
    assert_eq!((110.42, -6.99), (b.longitude, b.latitude));

    // exhausting the line costs a tick
    assert_eq!(TickOutcome::LineExhausted, engine.tick());
    assert_eq!(PlaybackCursor { feature: 1, coordinate: 0 }, engine.cursor());

    let c = emitted(engine.tick())?;
    assert_eq!((110.43, -7.0), (c.longitude, c.latitude));
    assert_eq!(PlaybackCursor { feature: 2, coordinate: 0 }, engine.cursor());

    Ok(())
}

#[test]
fn cyclic_replay() -> Result<(), String> {
    let track = GeoTrack::new(vec![
        TrackFeature::point(Point::new(1.0, 1.0)),
        TrackFeature::line(LineString::from(vec![(2.0, 2.0), (3.0, 3.0), (4.0, 4.0)])),
        TrackFeature::point(Point::new(5.0, 5.0)),
    ]);
    let mut engine = PlaybackEngine::new(track);

    // point, 3 coordinates, the exhausted line, point
    let lap: Vec<TickOutcome> = (0..6).map(|_| engine.tick()).collect();
    let xs: Vec<Option<f64>> = lap.iter().map(|o| o.position().map(|p| p.longitude)).collect();
    assert_eq!(
        vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), None, Some(5.0)],
        xs
    );

    for _ in 0..3 {
        let first = emitted(engine.tick())?;
        assert_eq!((1.0, 1.0), (first.longitude, first.latitude));
        assert_eq!(PlaybackCursor { feature: 1, coordinate: 0 }, engine.cursor());

        for _ in 0..5 {
            engine.tick();
        }
    }

    Ok(())
}

#[test]
fn empty_line_is_skipped() -> Result<(), String> {
    let track = GeoTrack::new(vec![
        TrackFeature::line(LineString::new(vec![])),
        TrackFeature::point(Point::new(7.0, 8.0)),
    ]);
    let mut engine = PlaybackEngine::new(track);

    assert_eq!(TickOutcome::LineExhausted, engine.tick());
    let pos = emitted(engine.tick())?;
    assert_eq!((7.0, 8.0), (pos.longitude, pos.latitude));

    Ok(())
}

#[test]
fn empty_track() {
    let mut engine = PlaybackEngine::new(GeoTrack::empty());

    for _ in 0..3 {
        assert_eq!(TickOutcome::EmptyTrack, engine.tick());
        assert_eq!(PlaybackCursor::default(), engine.cursor());
    }
}

#[test]
fn geojson_track() -> Result<(), String> {
    let data = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "name": "start" },
              "geometry": { "type": "Point", "coordinates": [110.41, -6.98] } },
            { "type": "Feature", "properties": {},
              "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] } },
            { "type": "Feature", "properties": {}, "geometry": null },
            { "type": "Feature",
              "geometry": { "type": "LineString", "coordinates": [[110.42, -6.99, 12.0], [110.43, -7.0]] } },
            { "type": "Feature", "properties": {},
              "geometry": { "type": "Point", "coordinates": [110.41] } }
        ]
    }"#;

    let track = GeoTrack::from_geojson(data)?;
    assert_eq!(2, track.len());

    let first = track.get(0).ok_or("missing first feature")?;
    assert_eq!(TrackGeometry::Point(Point::new(110.41, -6.98)), first.geometry);
    assert_eq!(Some("start"), first.properties["name"].as_str());

    let second = track.get(1).ok_or("missing second feature")?;
    assert_eq!(
        TrackGeometry::Line(LineString::from(vec![(110.42, -6.99), (110.43, -7.0)])),
        second.geometry
    );

    let again = GeoTrack::from_geojson(&track.to_geojson().to_string())?;
    assert_eq!(track, again);

    assert!(GeoTrack::from_geojson("{ nope").is_err());
    assert!(GeoTrack::from_geojson(r#"{"type":"FeatureCollection"}"#).is_err());

    Ok(())
}

#[test]
fn builtin_track() -> Result<(), String> {
    let track = GeoTrack::builtin()?;
    assert!(!track.is_empty());

    let mut engine = PlaybackEngine::new(track);
    let pos = emitted(engine.tick())?;
    assert_eq!((110.41, -6.98), (pos.longitude, pos.latitude));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn timer_ticks_until_stopped() {
    let track = GeoTrack::new(vec![TrackFeature::point(Point::new(110.41, -6.98))]);
    let seen: Arc<Mutex<Vec<TickOutcome>>> = Arc::new(Mutex::new(vec![]));

    let sink = seen.clone();
    let timer = PlaybackTimer::start(
        PlaybackEngine::new(track),
        Duration::from_secs(5),
        move |outcome| sink.lock().unwrap().push(outcome),
    );
    assert!(timer.is_running());

    // nothing before the first period
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(0, seen.lock().unwrap().len());

    tokio::time::sleep(Duration::from_millis(11_500)).await;
    assert_eq!(3, seen.lock().unwrap().len());
    assert!(seen.lock().unwrap().iter().all(|o| o.position().is_some()));

    timer.stop();
    timer.stop();
    assert!(!timer.is_running());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(3, seen.lock().unwrap().len());
}

#[tokio::test(start_paused = true)]
async fn timer_on_empty_track_keeps_going() {
    let seen: Arc<Mutex<Vec<TickOutcome>>> = Arc::new(Mutex::new(vec![]));

    let sink = seen.clone();
    let timer = PlaybackTimer::start(
        PlaybackEngine::new(GeoTrack::empty()),
        Duration::from_secs(1),
        move |outcome| sink.lock().unwrap().push(outcome),
    );

    tokio::time::sleep(Duration::from_millis(3_500)).await;
    drop(timer);

    let seen = seen.lock().unwrap();
    assert_eq!(3, seen.len());
    assert!(seen.iter().all(|o| *o == TickOutcome::EmptyTrack));
}
