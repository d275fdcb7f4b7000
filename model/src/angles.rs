use std::collections::BTreeMap;

use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

use crate::GeometryError;

/// How to draw the short line marking a stop line, relative to the road it crosses
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StopLineStyle {
    pub angle_degrees: f64,
    // In the same units as the coordinates, so degrees of lon/lat
    pub length: f64,
}

impl StopLineStyle {
    pub const DEFAULT: StopLineStyle = StopLineStyle {
        angle_degrees: 90.0,
        length: 0.0005,
    };
}

impl Default for StopLineStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StopLineStyles {
    #[serde(default)]
    pub default: StopLineStyle,
    pub overrides: BTreeMap<String, StopLineStyle>,
}

impl StopLineStyles {
    /// Hand-tuned so the indicators cross Ingolstadt route 101 at a plausible angle
    pub fn ingolstadt_route_101() -> Self {
        let angles: &[(f64, &[usize])] = &[
            (80.0, &[6, 7, 9, 10]),
            (100.0, &[1, 4, 15]),
            (110.0, &[2, 3, 8]),
            (85.0, &[5]),
            (90.0, &[11, 12, 13]),
            (28.0, &[14]),
        ];
        let mut overrides = BTreeMap::new();
        for (angle_degrees, ids) in angles {
            for id in *ids {
                overrides.insert(
                    format!("stop_lines_{id}"),
                    StopLineStyle {
                        angle_degrees: *angle_degrees,
                        length: StopLineStyle::DEFAULT.length,
                    },
                );
            }
        }
        // These two sit on short stretches
        for id in [13, 14] {
            if let Some(style) = overrides.get_mut(&format!("stop_lines_{id}")) {
                style.length = 0.00015;
            }
        }

        Self {
            default: StopLineStyle::DEFAULT,
            overrides,
        }
    }

    pub fn lookup(&self, key: &str) -> StopLineStyle {
        match self.overrides.get(key) {
            Some(style) => *style,
            None => {
                debug!("No custom style for {key}, using the default");
                self.default
            }
        }
    }
}

/// Where to put the name of a bus stop, relative to its marker
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelOffsets {
    // (dx, dy)
    pub default: (f64, f64),
    pub overrides: BTreeMap<String, (f64, f64)>,
}

impl LabelOffsets {
    pub fn ingolstadt_route_101() -> Self {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "haltestelle_stadtwerk-continental".to_string(),
            (-0.0005, 0.0003),
        );
        overrides.insert("haltestelle_uhlandstrase".to_string(), (-0.0007, 0.0003));
        overrides.insert("haltestelle_kornerstrase".to_string(), (-0.0007, 0.0003));
        overrides.insert("haltestelle_gutenbergstrase".to_string(), (0.0009, 0.0));
        Self {
            // Just above the marker
            default: (0.0, 0.0003),
            overrides,
        }
    }

    pub fn place(&self, group: &str, anchor: Coord<f64>) -> Coord<f64> {
        let (dx, dy) = self.overrides.get(group).copied().unwrap_or(self.default);
        Coord {
            x: anchor.x + dx,
            y: anchor.y + dy,
        }
    }
}

/// Counter-clockwise rotation
pub fn rotate_vector(dx: f64, dy: f64, angle_degrees: f64) -> (f64, f64) {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    (dx * cos - dy * sin, dx * sin + dy * cos)
}

/// The coordinate halfway through the sequence, counting points, not distance
pub fn midpoint_by_index(line: &LineString<f64>) -> Option<Coord<f64>> {
    line.0.get(line.0.len() / 2).copied()
}

/// A short line centered on the midpoint of the input, crossing it at the style's angle.
pub fn angle_line(
    line: &LineString<f64>,
    style: StopLineStyle,
) -> Result<LineString<f64>, GeometryError> {
    let pts = &line.0;
    if pts.len() < 2 {
        return Err(GeometryError::TooFewPoints { points: pts.len() });
    }
    let idx = pts.len() / 2;
    let mid = pts[idx];

    // Forward difference at the start, backward at the end, centered in between
    let from = pts[idx.saturating_sub(1)];
    let to = pts[(idx + 1).min(pts.len() - 1)];
    let (dx, dy) = rotate_vector(to.x - from.x, to.y - from.y, style.angle_degrees);

    let magnitude = dx.hypot(dy);
    if magnitude == 0.0 || !magnitude.is_finite() {
        return Err(GeometryError::DegenerateTangent);
    }
    let scale = style.length / 2.0 / magnitude;
    let (dx, dy) = (dx * scale, dy * scale);

    Ok(LineString::new(vec![
        Coord {
            x: mid.x - dx,
            y: mid.y - dy,
        },
        Coord {
            x: mid.x + dx,
            y: mid.y + dy,
        },
    ]))
}
