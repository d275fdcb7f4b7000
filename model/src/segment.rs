use std::fmt;

use geo::LineString;
use serde::{Deserialize, Serialize};

const BUS_STOP_PREFIX: &str = "haltestelle";
const STOP_LINE_PREFIX: &str = "stop_lines";
const ROAD_PATH_PREFIX: &str = "road_path";

/// Names one piece of the route. The prefix of the key says what kind of piece it is.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentKey(String);

impl SegmentKey {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn category(&self) -> SegmentCategory {
        SegmentCategory::from_key(&self.0)
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The declaration order is the drawing order. Road paths have to be finalized before the stops
/// on top of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SegmentCategory {
    RoadPath,
    StopLine,
    BusStop,
}

impl SegmentCategory {
    /// Anything without a bus stop or stop line prefix is a road path.
    pub fn from_key(key: &str) -> Self {
        if key.starts_with(BUS_STOP_PREFIX) {
            SegmentCategory::BusStop
        } else if key.starts_with(STOP_LINE_PREFIX) {
            SegmentCategory::StopLine
        } else {
            SegmentCategory::RoadPath
        }
    }

    /// True if the key explicitly names one of the categories. Raw stop names from the GPS data
    /// don't.
    pub fn is_tagged(key: &str) -> bool {
        [BUS_STOP_PREFIX, STOP_LINE_PREFIX, ROAD_PATH_PREFIX]
            .iter()
            .any(|prefix| key.starts_with(prefix))
    }

    pub fn describe(self) -> &'static str {
        match self {
            SegmentCategory::RoadPath => "road_path",
            SegmentCategory::StopLine => "stop_lines",
            SegmentCategory::BusStop => "bus_stop",
        }
    }

    /// Bus stops and stop lines hand half of their line to each neighbour, so the colored road
    /// paths meet up without gaps.
    pub fn lends_geometry(self) -> bool {
        matches!(self, SegmentCategory::StopLine | SegmentCategory::BusStop)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub key: SegmentKey,
    // Computed once from the key
    pub category: SegmentCategory,
    // x is longitude, y is latitude
    pub geometry: LineString<f64>,
}

impl Segment {
    pub fn new(key: SegmentKey, geometry: LineString<f64>) -> Self {
        Self {
            category: key.category(),
            key,
            geometry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_prefix() {
        assert_eq!(
            SegmentKey::new("haltestelle_geibelstrase").category(),
            SegmentCategory::BusStop
        );
        assert_eq!(
            SegmentKey::new("stop_lines_7").category(),
            SegmentCategory::StopLine
        );
        assert_eq!(
            SegmentKey::new("road_path_12").category(),
            SegmentCategory::RoadPath
        );
        // No prefix at all still draws as a road
        assert_eq!(
            SegmentKey::new("something_else").category(),
            SegmentCategory::RoadPath
        );
    }

    #[test]
    fn test_sort_keys_by_category() {
        let mut keys: Vec<SegmentKey> = ["stop_lines_2", "haltestelle_x", "road_path_1"]
            .into_iter()
            .map(SegmentKey::new)
            .collect();
        keys.sort_by_key(SegmentKey::category);
        let sorted: Vec<&str> = keys.iter().map(SegmentKey::as_str).collect();
        assert_eq!(sorted, vec!["road_path_1", "stop_lines_2", "haltestelle_x"]);
    }

    #[test]
    fn test_is_tagged() {
        assert!(SegmentCategory::is_tagged("road_path_3"));
        assert!(SegmentCategory::is_tagged("haltestelle_marienplatz"));
        assert!(!SegmentCategory::is_tagged("Geibelstraße,1"));
    }

    #[test]
    fn test_lends_geometry() {
        assert!(!SegmentCategory::RoadPath.lends_geometry());
        assert!(SegmentCategory::StopLine.lends_geometry());
        assert!(SegmentCategory::BusStop.lends_geometry());
    }
}
