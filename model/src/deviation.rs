use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::SegmentKey;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    /// Plotly's map traces ignore alpha, so it's dropped
    pub fn rgb(self) -> Rgb {
        Rgb(self.r, self.g, self.b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Deviation {
    pub value: f64,
    pub color: Rgba,
}

impl Deviation {
    pub fn hover_text(&self) -> String {
        format!("Deviation: {:.2}", self.value)
    }
}

/// How far each segment strays from normal, and the color already picked for that. Keyed by
/// canonical segment keys.
#[derive(Clone, Debug, Default)]
pub struct DeviationTable {
    rows: BTreeMap<SegmentKey, Deviation>,
}

impl DeviationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: SegmentKey, deviation: Deviation) -> Result<()> {
        if self.rows.contains_key(&key) {
            bail!("Duplicate deviation row for {key}");
        }
        self.rows.insert(key, deviation);
        Ok(())
    }

    /// Columns are segment, deviation, r, g, b, a
    pub fn load_csv<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut table = Self::new();
        for rec in csv::Reader::from_reader(reader).deserialize() {
            let rec: Record = rec?;
            table.insert(
                rec.segment,
                Deviation {
                    value: rec.deviation,
                    color: Rgba {
                        r: rec.r,
                        g: rec.g,
                        b: rec.b,
                        a: rec.a,
                    },
                },
            )?;
        }
        info!("Loaded deviations for {} segments", table.rows.len());
        Ok(table)
    }

    /// Every segment drawn must have a row. A missing one means the geometry and deviation inputs
    /// disagree.
    pub fn get(&self, key: &SegmentKey) -> Result<&Deviation> {
        match self.rows.get(key) {
            Some(deviation) => Ok(deviation),
            None => bail!("No deviation row for segment {key}"),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &SegmentKey> {
        self.rows.keys()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Deserialize)]
struct Record {
    segment: SegmentKey,
    deviation: f64,
    r: u8,
    g: u8,
    b: u8,
    a: f64,
}
