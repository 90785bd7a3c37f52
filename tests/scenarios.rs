use atct_map::braille::BrailleCanvas;
use atct_map::capabilities::Capabilities;
use atct_map::data::{load_airports, load_states, spawn_loaders, DataError, Datasets, LoadEvent};
use atct_map::map::{AirportLayer, Interaction, PointerEvent, StateLayer, Viewport};
use atct_map::theme::Theme;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let path = std::env::temp_dir().join(format!(
        "atct_map_{}_{}_{}.geojson",
        name,
        std::process::id(),
        nanos
    ));
    fs::write(&path, contents).unwrap();
    path
}

const AIRPORTS: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","geometry":{"type":"Point","coordinates":[-87.9048,41.9786]},
   "properties":{"AIRPT_NAME":"CHICAGO O'HARE INTL","TOT_ENP":32171831,"ELEV":668,"CNTL_TWR":"Y"}},
  {"type":"Feature","geometry":{"type":"Point","coordinates":[-99.0,38.0]},
   "properties":{"AIRPT_NAME":"DODGE CITY RGNL","TOT_ENP":2905,"ELEV":2594,"CNTL_TWR":"N"}},
  {"type":"Feature","geometry":null,"properties":{"AIRPT_NAME":"NOWHERE"}}
]}"#;

const STATES: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"name":"Kansas","count":45},"geometry":{"type":"Polygon",
   "coordinates":[[[-102.05,37.0],[-94.6,37.0],[-94.6,40.0],[-102.05,40.0],[-102.05,37.0]]]}},
  {"type":"Feature","properties":{"name":"Empty","count":0},"geometry":{"type":"Polygon",
   "coordinates":[[[-80.0,30.0],[-79.0,30.0],[-79.0,31.0],[-80.0,31.0],[-80.0,30.0]]]}}
]}"#;

#[test]
fn test_airport_with_tower() {
    let path = write_temp("airports", AIRPORTS);
    let records = load_airports(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(records.len(), 2);

    let theme = Theme::new();
    let layer = AirportLayer::new(records, &theme);
    let ohare = &layer.markers()[0];
    assert_eq!(ohare.class, 0);
    assert_eq!(ohare.color, theme.towers[0]);

    let text = ohare.popup.text();
    assert!(text.contains("CHICAGO O'HARE INTL"));
    assert!(text.contains("32171831"));
    assert!(text.contains("668"));

    let dodge = &layer.markers()[1];
    assert_eq!(dodge.class, 1);
    assert_eq!(dodge.color, theme.towers[1]);

    // Centered on O'Hare: dot (40, 40) is cell (20, 10)
    let viewport = Viewport::new(-87.9048, 41.9786, 7, 80, 80);
    let mut canvas = BrailleCanvas::new(40, 20);
    layer.render(&mut canvas, &viewport, Capabilities::FULL.marker_glyph());
    let cell = canvas.cell(20, 10).unwrap();
    assert_eq!(cell.glyph, Some('✈'));
    assert_eq!(cell.fg, Some(theme.towers[0]));
}

#[test]
fn test_state_hover_cycle() {
    let path = write_temp("states", STATES);
    let records = load_states(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let theme = Arc::new(Theme::new());
    let mut layer = StateLayer::new(records, Arc::clone(&theme), Capabilities::FULL);

    let kansas = layer.feature(0).unwrap();
    assert_eq!(kansas.style.fill_color, theme.density[4]);
    assert_eq!(kansas.style.weight, 3);
    let resting = kansas.style;

    assert_eq!(layer.dispatch(0, PointerEvent::Enter), Some(Interaction::Highlighted));
    let style = layer.feature(0).unwrap().style;
    assert_eq!(style.weight, 5);
    assert_eq!(style.color, theme.highlight);
    assert_eq!(style.dash_array, None);
    assert_eq!(layer.draw_order().last(), Some(&0));

    assert_eq!(layer.dispatch(0, PointerEvent::Exit), Some(Interaction::Normal));
    let style = layer.feature(0).unwrap().style;
    assert_eq!(style, resting);
    assert!(style.dash_array.is_some());
    assert_eq!(style.fill_color, theme.density[4]);

    for _ in 0..10 {
        layer.dispatch(0, PointerEvent::Enter);
        layer.dispatch(0, PointerEvent::Exit);
    }
    assert_eq!(layer.feature(0).unwrap().style, resting);
}

#[test]
fn test_state_without_airports() {
    let path = write_temp("states_empty", STATES);
    let records = load_states(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let theme = Arc::new(Theme::new());
    let layer = StateLayer::new(records, Arc::clone(&theme), Capabilities::FULL);
    let empty = layer.feature(1).unwrap();
    assert_eq!(empty.record.airport_count, 0);
    assert_eq!(empty.style.fill_color, theme.density[0]);
    assert!(empty.popup.text().contains("Number of Airports\n0"));
}

#[test]
fn test_missing_file() {
    let path = std::env::temp_dir().join("atct_map_does_not_exist.geojson");
    assert!(matches!(load_airports(&path), Err(DataError::Io { .. })));
}

#[test]
fn test_not_a_collection() {
    let path = write_temp(
        "single",
        r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[0,0]},"properties":{}}"#,
    );
    let result = load_states(&path);
    fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(DataError::NotFeatureCollection { .. })));
}

#[test]
fn test_invalid_json() {
    let path = write_temp("broken", "{\"type\": \"FeatureCollection\", ");
    let result = load_airports(&path);
    fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(DataError::Json { .. })));
}

#[test]
fn test_background_loads_deliver_both() {
    let airports = write_temp("bg_airports", AIRPORTS);
    let datasets = Datasets {
        airports: airports.clone(),
        states: std::env::temp_dir().join("atct_map_missing_states.geojson"),
    };
    let rx = spawn_loaders(&datasets);

    let mut got_airports = false;
    let mut got_states = false;
    for _ in 0..2 {
        match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
            LoadEvent::Airports(result) => {
                assert_eq!(result.unwrap().len(), 2);
                got_airports = true;
            }
            LoadEvent::States(result) => {
                assert!(result.is_err());
                got_states = true;
            }
        }
    }
    fs::remove_file(&airports).unwrap();
    assert!(got_airports && got_states);
}
