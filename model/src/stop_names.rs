use std::collections::BTreeMap;

use anyhow::Result;
use serde::Deserialize;

use crate::{SegmentCategory, SegmentKey};

/// Merges the raw stop names found in the GPS data ("Geibelstraße,1") into canonical bus stop
/// groups ("haltestelle_geibelstrase"). One group can have many raw names, but every raw name
/// belongs to exactly one group.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Vec<String>>")]
pub struct StopNames {
    groups: BTreeMap<String, Vec<String>>,
    // Derived from groups, never declared separately
    reverse: BTreeMap<String, String>,
}

impl StopNames {
    pub fn new(groups: BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut reverse = BTreeMap::new();
        for (group, variants) in &groups {
            for raw in variants {
                if let Some(existing) = reverse.insert(raw.clone(), group.clone()) {
                    if &existing != group {
                        bail!("Raw stop name {raw:?} belongs to both {existing} and {group}");
                    }
                }
            }
        }
        Ok(Self { groups, reverse })
    }

    /// The bus stops along Ingolstadt route 101
    pub fn ingolstadt_route_101() -> Result<Self> {
        let table: &[(&str, &[&str])] = &[
            (
                "haltestelle_geibelstrase",
                &["Geibelstraße,2", "Geibelstraße,1"],
            ),
            (
                "haltestelle_kurt-huber-strase",
                &[
                    "Kurt-Huber-Straße,1",
                    "Kurt-Huber-Straße,2",
                    "Kurt-Huber-Straße,4",
                ],
            ),
            (
                "haltestelle_uhlandstrase",
                &["Uhlandstraße,1", "Uhlandstraße,2"],
            ),
            (
                "haltestelle_stadtwerk-continental",
                &[
                    "Stadtwerke / Continental,1",
                    "Stadtwerke / Continental,2",
                    "Stadtwerke / Continental,3",
                    "Stadtwerke / Continental,4",
                ],
            ),
            ("haltestelle_kornerstrase", &["Körnerstraße,2"]),
            (
                "haltestelle_marienplatz-ersatz",
                &["Marienplatz,1", "Marienplatz,2"],
            ),
            ("haltestelle_feldschlosl", &["Feldschlößl,1", "Feldschlößl,2"]),
            (
                "haltestelle_theodor-heuss-brucke",
                &["Theodor-Heuss-Brücke,1", "Theodor-Heuss-Brücke,2"],
            ),
            (
                "haltestelle_theodor-heuss-strase",
                &["Theodor-Heuss-Straße,1", "Theodor-Heuss-Straße,2"],
            ),
            ("haltestelle_gutenbergstrase", &["Gutenbergstraße,99"]),
            ("haltestelle_marienplatz", &[]),
            (
                "haltestelle_schellingstrase",
                &["Schellingstraße,1", "Schellingstraße,1"],
            ),
        ];

        let mut groups = BTreeMap::new();
        for (group, variants) in table {
            groups.insert(
                group.to_string(),
                variants.iter().map(|x| x.to_string()).collect(),
            );
        }
        Self::new(groups)
    }

    /// None if the group is unknown. A known group may have no variants.
    pub fn variants(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(|x| x.as_slice())
    }

    /// The first raw name of the group, or an empty string if there's none
    pub fn display_name(&self, group: &str) -> &str {
        self.variants(group)
            .and_then(|variants| variants.first())
            .map(|x| x.as_str())
            .unwrap_or("")
    }

    pub fn canonical(&self, raw: &str) -> Result<&str> {
        match self.reverse.get(raw) {
            Some(group) => Ok(group),
            None => bail!("No bus stop group for raw stop name {raw:?}"),
        }
    }

    /// Keys that already name a category pass through. Anything else has to be a raw stop name
    /// with a known group.
    pub fn remap_segment(&self, key: &str) -> Result<SegmentKey> {
        if SegmentCategory::is_tagged(key) {
            return Ok(SegmentKey::new(key));
        }
        self.canonical(key).map(SegmentKey::new)
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for StopNames {
    type Error = anyhow::Error;

    fn try_from(groups: BTreeMap<String, Vec<String>>) -> Result<Self> {
        Self::new(groups)
    }
}
