#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use fs_err::File;
use structopt::StructOpt;

use model::{
    build_map_figure, durations, filters, DeviationTable, DurationFilter, RouteConfig,
    SegmentKey, SegmentPath,
};

/// Builds the figures for the bus route dashboard and writes them as plotly JSON.
#[derive(StructOpt)]
struct Args {
    /// The path to a GeoJSON file with one LineString per route segment
    #[structopt(long, parse(from_os_str))]
    geometry: PathBuf,
    /// The path to a CSV file with the deviation and color of every segment
    #[structopt(long, parse(from_os_str))]
    deviation: PathBuf,
    /// The path to a CSV file with segment durations. If given, only segments with durations
    /// are drawn, and duration charts are written too.
    #[structopt(long, parse(from_os_str))]
    durations: Option<PathBuf>,
    /// A JSON file replacing the built-in Ingolstadt route 101 tables
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,
    #[structopt(long, parse(from_os_str), default_value = ".")]
    output_dir: PathBuf,
    /// Overrides the line width from the config
    #[structopt(long)]
    line_width: Option<f64>,
    /// Only count durations on these days, by German name, like "Mittwoch"
    #[structopt(long)]
    days: Vec<String>,
    #[structopt(long)]
    start_date: Option<NaiveDate>,
    #[structopt(long)]
    end_date: Option<NaiveDate>,
    /// Like "12:00:00"
    #[structopt(long)]
    start_time: Option<NaiveTime>,
    #[structopt(long)]
    end_time: Option<NaiveTime>,
}

impl Args {
    fn load_config(&self) -> Result<RouteConfig> {
        let mut config = match self.config {
            Some(ref path) => RouteConfig::load_json(File::open(path)?)?,
            None => RouteConfig::ingolstadt_route_101()?,
        };
        if let Some(width) = self.line_width {
            config.line_width = width;
        }
        Ok(config)
    }

    fn duration_filter(&self) -> Result<DurationFilter> {
        let dates = match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                if start > end {
                    bail!("--start-date {start} is after --end-date {end}");
                }
                Some((start, end))
            }
            (None, None) => None,
            _ => bail!("--start-date and --end-date must be used together"),
        };
        Ok(DurationFilter {
            dates,
            weekdays: filters::weekdays_from_german(&self.days)?,
            start_time: self.start_time,
            end_time: self.end_time,
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();
    run(Args::from_args())
}

fn run(args: Args) -> Result<()> {
    let config = args.load_config()?;
    let path = SegmentPath::load_geojson(File::open(&args.geometry)?)?;
    if path.is_empty() {
        bail!("{} has no segments", args.geometry.display());
    }
    let deviations = DeviationTable::load_csv(File::open(&args.deviation)?)?;
    if deviations.is_empty() {
        bail!("{} has no deviation rows", args.deviation.display());
    }

    let keep: BTreeSet<SegmentKey> = match args.durations {
        Some(ref durations_path) => {
            let records = durations::load_csv(File::open(durations_path)?, &config.stop_names)?;
            let records = args.duration_filter()?.apply(&records);
            info!("{} durations match the filter", records.len());

            let per_segment = durations::average_by_segment(&records);
            let per_category = durations::average_by_category(&per_segment);
            write_json(
                &args.output_dir.join("segment_durations.json"),
                &model::segment_duration_chart(&per_segment),
            )?;
            write_json(
                &args.output_dir.join("category_durations.json"),
                &model::category_duration_chart(&per_category),
            )?;
            write_json(
                &args.output_dir.join("category_pie.json"),
                &model::category_duration_pie(&per_category),
            )?;

            durations::segments_present(&records)
        }
        None => deviations.keys().cloned().collect(),
    };

    let (figure, skipped) = build_map_figure(&config, path, &deviations, Some(&keep))?;
    for skip in &skipped {
        println!("Skipping {} due to error: {}", skip.key, skip.error);
    }
    write_json(&args.output_dir.join("map.json"), &figure.to_plotly())?;
    println!(
        "Wrote {} map traces to {}",
        figure.traces.len(),
        args.output_dir.display()
    );
    Ok(())
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    fs_err::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
