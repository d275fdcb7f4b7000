use anyhow::Result;
use geo::{Coord, LineString};
use serde::Serialize;

use crate::angles::angle_line;
use crate::{
    DeviationTable, LabelOffsets, Rgb, RouteConfig, SegmentCategory, SegmentPath,
    StopLineStyles, StopNames,
};

pub const MARKER_SIZE: f64 = 30.0;
pub const LABEL_FONT_SIZE: f64 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TraceKind {
    Line,
    Marker,
    Text,
}

/// One thing for the map to draw. This doesn't know anything about the plotting library.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    pub name: String,
    pub kind: TraceKind,
    // x is longitude, y is latitude
    pub points: Vec<Coord<f64>>,
    pub hover_text: Option<String>,
    /// Only text traces have a label
    pub label: Option<String>,
    pub color: Rgb,
    // Line width, marker diameter, or font size, depending on the kind
    pub size: f64,
}

/// Turns a prepared segment path into map traces, colored by deviation.
pub struct TraceBuilder<'a> {
    stop_names: &'a StopNames,
    stop_lines: &'a StopLineStyles,
    label_offsets: &'a LabelOffsets,
    line_width: f64,
}

impl<'a> TraceBuilder<'a> {
    pub fn new(config: &'a RouteConfig) -> Self {
        Self {
            stop_names: &config.stop_names,
            stop_lines: &config.stop_lines,
            label_offsets: &config.label_offsets,
            line_width: config.line_width,
        }
    }

    pub fn line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }

    /// Expects the path in drawing order. Bus stops produce a marker and a separate label; every
    /// other segment produces one line. Fails if any segment lacks a deviation row.
    pub fn build(&self, path: &SegmentPath, deviations: &DeviationTable) -> Result<Vec<Trace>> {
        let mut traces = Vec::new();
        for segment in path.segments() {
            let key = segment.key.as_str();
            let deviation = deviations.get(&segment.key)?;
            let hover_text = Some(deviation.hover_text());
            let color = deviation.color.rgb();

            match segment.category {
                SegmentCategory::RoadPath => {
                    traces.push(Trace {
                        name: key.to_string(),
                        kind: TraceKind::Line,
                        points: segment.geometry.0.clone(),
                        hover_text,
                        label: None,
                        color,
                        size: self.line_width,
                    });
                }
                SegmentCategory::StopLine => {
                    let style = self.stop_lines.lookup(key);
                    let line = angle_line(&segment.geometry, style)
                        .map_err(|err| anyhow!("Can't draw stop line {key}: {err}"))?;
                    traces.push(Trace {
                        name: key.to_string(),
                        kind: TraceKind::Line,
                        points: line.0,
                        hover_text,
                        label: None,
                        color,
                        size: self.line_width,
                    });
                }
                SegmentCategory::BusStop => {
                    let anchor = match endpoint_midpoint(&segment.geometry) {
                        Some(pt) => pt,
                        None => bail!("Bus stop {key} has no geometry"),
                    };
                    let name = self.stop_names.display_name(key);
                    traces.push(Trace {
                        name: name.to_string(),
                        kind: TraceKind::Marker,
                        points: vec![anchor],
                        hover_text,
                        label: None,
                        color,
                        size: MARKER_SIZE,
                    });
                    traces.push(Trace {
                        name: format!("text_{name}"),
                        kind: TraceKind::Text,
                        points: vec![self.label_offsets.place(key, anchor)],
                        hover_text: None,
                        // The zero-width space leaves an empty line below, nudging the name up
                        label: Some(format!("{name}\n\u{200b}")),
                        color: Rgb::BLACK,
                        size: LABEL_FONT_SIZE,
                    });
                }
            }
        }
        debug!(
            "Built {} traces from {} segments",
            traces.len(),
            path.len()
        );
        Ok(traces)
    }
}

/// Halfway between the first and last point
fn endpoint_midpoint(line: &LineString<f64>) -> Option<Coord<f64>> {
    let first = line.0.first()?;
    let last = line.0.last()?;
    Some(Coord {
        x: (first.x + last.x) / 2.0,
        y: (first.y + last.y) / 2.0,
    })
}
