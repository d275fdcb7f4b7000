use anyhow::Result;
use serde::Deserialize;

use crate::{LabelOffsets, MapLayout, StopLineStyles, StopNames};

/// All the fixed tables describing one route. Components borrow from here instead of declaring
/// their own copies.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RouteConfig {
    pub stop_names: StopNames,
    pub stop_lines: StopLineStyles,
    pub label_offsets: LabelOffsets,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default)]
    pub map: MapLayout,
}

fn default_line_width() -> f64 {
    20.0
}

impl RouteConfig {
    pub fn ingolstadt_route_101() -> Result<Self> {
        Ok(Self {
            stop_names: StopNames::ingolstadt_route_101()?,
            stop_lines: StopLineStyles::ingolstadt_route_101(),
            label_offsets: LabelOffsets::ingolstadt_route_101(),
            line_width: default_line_width(),
            map: MapLayout::default(),
        })
    }

    pub fn load_json<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}
