//! Turns the segments of a bus route into map traces colored by how much each segment deviates
//! from its usual timing, plus duration summaries for the dashboard's charts.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod angles;
mod config;
mod deviation;
pub mod durations;
mod error;
mod figure;
pub mod filters;
mod path;
mod segment;
mod split;
mod stop_names;
mod trace;

use std::collections::BTreeSet;

use anyhow::Result;

pub use self::angles::{
    angle_line, midpoint_by_index, rotate_vector, LabelOffsets, StopLineStyle, StopLineStyles,
};
pub use self::config::RouteConfig;
pub use self::deviation::{Deviation, DeviationTable, Rgb, Rgba};
pub use self::durations::{DurationFilter, DurationRecord};
pub use self::error::GeometryError;
pub use self::figure::{
    category_duration_chart, category_duration_pie, segment_duration_chart, MapFigure, MapLayout,
};
pub use self::path::SegmentPath;
pub use self::segment::{Segment, SegmentCategory, SegmentKey};
pub use self::split::{lend_to_neighbours, split_at_midpoint, SkippedSegment};
pub use self::stop_names::StopNames;
pub use self::trace::{Trace, TraceBuilder, TraceKind};

/// The whole map for one render. `keep` limits the map to segments with data; if it's None,
/// every segment in the path is drawn. Segments whose geometry couldn't be split are still drawn,
/// just without lending to their neighbours, and are returned so the caller can report them.
pub fn build_map_figure(
    config: &RouteConfig,
    path: SegmentPath,
    deviations: &DeviationTable,
    keep: Option<&BTreeSet<SegmentKey>>,
) -> Result<(MapFigure, Vec<SkippedSegment>)> {
    let (path, skipped) = path.prepare(&config.stop_names, keep)?;
    let traces = TraceBuilder::new(config).build(&path, deviations)?;
    Ok((MapFigure::new(traces, config.map.clone()), skipped))
}
