use anyhow::Result;
use chrono::Weekday;

/// The dashboard offers weekdays by their German names
pub fn weekday_from_german(label: &str) -> Result<Weekday> {
    Ok(match label {
        "Montag" => Weekday::Mon,
        "Dienstag" => Weekday::Tue,
        "Mittwoch" => Weekday::Wed,
        "Donnerstag" => Weekday::Thu,
        "Freitag" => Weekday::Fri,
        "Samstag" => Weekday::Sat,
        "Sonntag" => Weekday::Sun,
        _ => bail!("Unknown weekday {label:?}"),
    })
}

pub fn weekdays_from_german<S: AsRef<str>>(labels: &[S]) -> Result<Vec<Weekday>> {
    labels
        .iter()
        .map(|label| weekday_from_german(label.as_ref()))
        .collect()
}
