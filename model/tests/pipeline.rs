use std::collections::BTreeSet;

use model::{
    build_map_figure, durations, DeviationTable, GeometryError, RouteConfig, SegmentKey,
    SegmentPath,
};

const GEOMETRY: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"name": "road_path_1"},
     "geometry": {"type": "LineString", "coordinates": [[11.430, 48.770], [11.431, 48.770]]}},
    {"type": "Feature", "properties": {"name": "Uhlandstraße,1"},
     "geometry": {"type": "LineString", "coordinates": [[11.431, 48.770], [11.432, 48.770], [11.433, 48.770]]}},
    {"type": "Feature", "properties": {"name": "road_path_2"},
     "geometry": {"type": "LineString", "coordinates": [[11.433, 48.770], [11.434, 48.771]]}},
    {"type": "Feature", "properties": {"name": "stop_lines_5"},
     "geometry": {"type": "LineString", "coordinates": [[11.434, 48.771], [11.435, 48.772], [11.436, 48.773]]}},
    {"type": "Feature", "properties": {"name": "road_path_3"},
     "geometry": {"type": "LineString", "coordinates": [[11.436, 48.773], [11.437, 48.774]]}},
    {"type": "Feature", "properties": {"name": "haltestelle_feldschlosl"},
     "geometry": {"type": "LineString", "coordinates": [[11.437, 48.774]]}},
    {"type": "Feature", "properties": {"name": "road_path_4"},
     "geometry": {"type": "LineString", "coordinates": [[11.437, 48.774], [11.438, 48.775]]}}
  ]
}"#;

const DEVIATIONS: &str = "segment,deviation,r,g,b,a
road_path_1,0.111,0,128,0,1.0
haltestelle_uhlandstrase,2.345,255,165,0,1.0
road_path_2,-1.005,0,128,0,1.0
stop_lines_5,9.999,255,0,0,1.0
road_path_3,0.5,0,128,0,1.0
haltestelle_feldschlosl,3.0,255,0,0,1.0
";

#[test]
fn test_full_map() {
    let config = RouteConfig::ingolstadt_route_101().unwrap();
    let path = SegmentPath::load_geojson(GEOMETRY.as_bytes()).unwrap();
    let deviations = DeviationTable::load_csv(DEVIATIONS.as_bytes()).unwrap();
    let keep: BTreeSet<SegmentKey> = deviations.keys().cloned().collect();

    let (figure, skipped) = build_map_figure(&config, path, &deviations, Some(&keep)).unwrap();

    // The single-point stop can't be split, but is still drawn
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].key.as_str(), "haltestelle_feldschlosl");
    assert_eq!(skipped[0].error, GeometryError::TooFewPoints { points: 1 });

    let value = figure.to_plotly();
    let data = value["data"].as_array().unwrap();
    let names: Vec<&str> = data.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "road_path_1",
            "road_path_2",
            "road_path_3",
            "stop_lines_5",
            "Uhlandstraße,1",
            "text_Uhlandstraße,1",
            "Feldschlößl,1",
            "text_Feldschlößl,1",
        ]
    );
    let modes: Vec<&str> = data.iter().map(|t| t["mode"].as_str().unwrap()).collect();
    assert_eq!(
        modes,
        vec!["lines", "lines", "lines", "lines", "markers", "text", "markers", "text"]
    );

    assert_eq!(data[0]["text"], "Deviation: 0.11");
    assert_eq!(data[3]["text"], "Deviation: 10.00");
    assert_eq!(data[4]["text"], "Deviation: 2.35");
    assert_eq!(data[4]["marker"]["color"], "rgb(255, 165, 0)");

    // road_path_1 got the left half of the Uhlandstraße stop appended
    assert_eq!(data[0]["lon"].as_array().unwrap().len(), 4);
    // road_path_2 got the right half of the stop prepended, and the left half of the stop line
    // appended
    assert_eq!(data[1]["lon"].as_array().unwrap().len(), 6);
    // road_path_4 has no deviation row, so it's dropped before drawing
    assert!(!names.contains(&"road_path_4"));
}

#[test]
fn test_missing_deviation_aborts() {
    let config = RouteConfig::ingolstadt_route_101().unwrap();
    let path = SegmentPath::load_geojson(GEOMETRY.as_bytes()).unwrap();
    let deviations = DeviationTable::load_csv(DEVIATIONS.as_bytes()).unwrap();
    // Drawing everything means road_path_4 needs a row it doesn't have
    let err = build_map_figure(&config, path, &deviations, None).unwrap_err();
    assert!(err.to_string().contains("road_path_4"));
}

#[test]
fn test_duration_summaries() {
    let config = RouteConfig::ingolstadt_route_101().unwrap();
    let raw = r#"run,segment,route,duration,utc_time
7,"Uhlandstraße,1",101,40.0,2023-10-11 12:00:00
7,"Uhlandstraße,2",101,50.0,2023-10-11 12:05:00
7,road_path_1,101,12.0,2023-10-11 12:06:00
"#;
    let records = durations::load_csv(raw.as_bytes(), &config.stop_names).unwrap();
    let per_segment = durations::average_by_segment(&records);
    assert_eq!(
        per_segment,
        vec![
            (SegmentKey::new("haltestelle_uhlandstrase"), 45.0),
            (SegmentKey::new("road_path_1"), 12.0),
        ]
    );
    let chart = model::category_duration_pie(&durations::average_by_category(&per_segment));
    assert_eq!(chart["data"][0]["labels"], serde_json::json!(["bus_stop", "road_path"]));
}
