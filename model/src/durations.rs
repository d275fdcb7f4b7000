use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::Deserialize;

use crate::{SegmentCategory, SegmentKey, StopNames};

/// How long one run of a bus spent in one segment
#[derive(Clone, Debug, PartialEq)]
pub struct DurationRecord {
    pub run: String,
    pub segment: SegmentKey,
    pub route: String,
    // Seconds
    pub duration: f64,
    pub time: NaiveDateTime,
}

/// Segments named by raw stop names are remapped to their canonical group, so all variants of a
/// stop are counted together. An unknown raw name is an error, since silently dropping its
/// durations would skew every average.
pub fn load_csv<R: std::io::Read>(reader: R, names: &StopNames) -> Result<Vec<DurationRecord>> {
    let mut records = Vec::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        records.push(DurationRecord {
            run: rec.run,
            segment: names.remap_segment(&rec.segment)?,
            route: rec.route,
            duration: rec.duration,
            time: NaiveDateTime::parse_from_str(&rec.utc_time, "%Y-%m-%d %H:%M:%S")?,
        });
    }
    info!("Loaded {} segment durations", records.len());
    Ok(records)
}

#[derive(Deserialize)]
struct Record {
    run: String,
    segment: String,
    route: String,
    duration: f64,
    utc_time: String,
}

/// Narrows down durations before they're summarized. Empty fields don't filter anything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DurationFilter {
    // Inclusive
    pub dates: Option<(NaiveDate, NaiveDate)>,
    pub weekdays: Vec<Weekday>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl DurationFilter {
    pub fn matches(&self, record: &DurationRecord) -> bool {
        let date = record.time.date();
        if let Some((start, end)) = self.dates {
            if date < start || date > end {
                return false;
            }
        }
        if !self.weekdays.is_empty() && !self.weekdays.contains(&date.weekday()) {
            return false;
        }
        let time = record.time.time();
        if self.start_time.map(|t| time < t).unwrap_or(false) {
            return false;
        }
        if self.end_time.map(|t| time > t).unwrap_or(false) {
            return false;
        }
        true
    }

    pub fn apply(&self, records: &[DurationRecord]) -> Vec<DurationRecord> {
        records
            .iter()
            .filter(|rec| self.matches(rec))
            .cloned()
            .collect()
    }
}

/// Every segment with at least one duration
pub fn segments_present(records: &[DurationRecord]) -> BTreeSet<SegmentKey> {
    records.iter().map(|rec| rec.segment.clone()).collect()
}

/// Mean duration per segment, rounded to hundredths, sorted by key
pub fn average_by_segment(records: &[DurationRecord]) -> Vec<(SegmentKey, f64)> {
    let mut sums: BTreeMap<&SegmentKey, (f64, usize)> = BTreeMap::new();
    for rec in records {
        let entry = sums.entry(&rec.segment).or_insert((0.0, 0));
        entry.0 += rec.duration;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(key, (sum, count))| (key.clone(), round2(sum / count as f64)))
        .collect()
}

/// The mean of the per-segment averages in each category, ordered by category name. Categories
/// without segments are left out.
pub fn average_by_category(per_segment: &[(SegmentKey, f64)]) -> Vec<(SegmentCategory, f64)> {
    let mut sums: BTreeMap<SegmentCategory, (f64, usize)> = BTreeMap::new();
    for (key, duration) in per_segment {
        let entry = sums.entry(key.category()).or_insert((0.0, 0));
        entry.0 += duration;
        entry.1 += 1;
    }
    let mut result: Vec<(SegmentCategory, f64)> = sums
        .into_iter()
        .map(|(category, (sum, count))| (category, round2(sum / count as f64)))
        .collect();
    result.sort_by_key(|(category, _)| category.describe());
    result
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
