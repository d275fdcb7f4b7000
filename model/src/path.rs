use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use geo::{Coord, LineString};
use geojson::{feature::Id, Feature, GeoJson};

use crate::split::lend_to_neighbours;
use crate::{Segment, SegmentKey, SkippedSegment, StopNames};

/// All segments of one route. Loaded in route order, so neighbours in the list are neighbours on
/// the street.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentPath {
    segments: Vec<Segment>,
}

impl SegmentPath {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Expects a FeatureCollection of LineStrings in lon/lat. Each feature is named by a `name`
    /// property, or failing that, by its ID.
    pub fn load_geojson<R: std::io::Read>(mut reader: R) -> Result<Self> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        let collection = match raw.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => collection,
            _ => bail!("Segment geometry must be a FeatureCollection"),
        };

        let mut segments = Vec::new();
        for feature in collection.features {
            let key = feature_name(&feature)?;
            let geometry = match feature.geometry {
                Some(geometry) => geometry,
                None => bail!("{key} has no geometry"),
            };
            let pts = match geometry.value {
                geojson::Value::LineString(pts) => pts,
                _ => bail!("{key} must be a LineString"),
            };
            let mut coords = Vec::new();
            for pt in pts {
                if pt.len() < 2 {
                    bail!("{key} has a position with {} values", pt.len());
                }
                coords.push(Coord { x: pt[0], y: pt[1] });
            }
            segments.push(Segment::new(key, LineString::new(coords)));
        }
        info!("Loaded {} segments", segments.len());
        Ok(Self::new(segments))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn keys(&self) -> Vec<SegmentKey> {
        self.segments.iter().map(|s| s.key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Replaces raw stop names with their canonical group. Two segments ending up with the same
    /// key is an error.
    pub fn rename_stops(&mut self, names: &StopNames) -> Result<()> {
        let mut seen = BTreeMap::new();
        for (idx, segment) in self.segments.iter_mut().enumerate() {
            let key = names.remap_segment(segment.key.as_str())?;
            if let Some(prev) = seen.insert(key.clone(), idx) {
                bail!("Segments #{prev} and #{idx} are both named {key}");
            }
            segment.category = key.category();
            segment.key = key;
        }
        Ok(())
    }

    /// Only keeps segments present in the current data
    pub fn retain(&mut self, keep: &BTreeSet<SegmentKey>) {
        let before = self.segments.len();
        self.segments.retain(|s| keep.contains(&s.key));
        debug!(
            "Dropped {} of {} segments with no data",
            before - self.segments.len(),
            before
        );
    }

    pub fn lend_geometry(&mut self) -> Vec<SkippedSegment> {
        lend_to_neighbours(&mut self.segments)
    }

    /// Road paths, then stop lines, then bus stops. Route order is kept within each group.
    pub fn sort_by_category(&mut self) {
        self.segments.sort_by_key(|s| s.category);
    }

    /// Everything needed before drawing: canonical names, filtering, splitting in route order, and
    /// finally sorting into drawing order.
    pub fn prepare(
        mut self,
        names: &StopNames,
        keep: Option<&BTreeSet<SegmentKey>>,
    ) -> Result<(Self, Vec<SkippedSegment>)> {
        self.rename_stops(names)?;
        if let Some(keep) = keep {
            self.retain(keep);
        }
        let skipped = self.lend_geometry();
        self.sort_by_category();
        Ok((self, skipped))
    }
}

fn feature_name(feature: &Feature) -> Result<SegmentKey> {
    if let Some(name) = feature.property("name").and_then(|x| x.as_str()) {
        return Ok(SegmentKey::new(name));
    }
    match feature.id {
        Some(Id::String(ref id)) => Ok(SegmentKey::new(id.clone())),
        Some(Id::Number(ref id)) => Ok(SegmentKey::new(id.to_string())),
        None => bail!("Feature has neither a name nor an ID"),
    }
}
