use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// `<prefix>-YYYY-MM-DD.csv`, or `<prefix>-YYYY-MM-DD-HH-MM-SS.csv` with `include_time`.
pub fn dated_filename<Tz>(prefix: &str, now: &DateTime<Tz>, include_time: bool) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let stamp = if include_time {
        now.format("%Y-%m-%d-%H-%M-%S")
    } else {
        now.format("%Y-%m-%d")
    };
    format!("{}-{}.csv", prefix, stamp)
}
