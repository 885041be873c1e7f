use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PARTIAL_DATE_REGEX: Regex = Regex::new(r"^([+-]?\d{4,6})(?:-(\d{2}))?$").unwrap();
}

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const QUARTER_LABELS: [&str; 4] = ["First", "Second", "Third", "Forth"];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parse an event date into a UTC instant
///
/// Every derivation goes through this function so the month, quarter, day
/// and year of one input always agree. Inputs without an offset are read as
/// UTC; inputs with one are converted to UTC.
///
/// # Arguments
/// * `raw` - `YYYY-MM-DD`, `YYYY-MM`, `YYYY`, or an ISO-8601 date-time
///
/// # Returns
/// * `Result<DateTime<Utc>>` - The instant, or `Error::InvalidDate`
pub fn parse_listing_date(raw: &str) -> Result<DateTime<Utc>> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    if let Some(caps) = PARTIAL_DATE_REGEX.captures(s) {
        let year = caps[1].parse::<i32>().ok();
        let month = caps.get(2).map_or(Some(1), |m| m.as_str().parse::<u32>().ok());
        if let Some(date) = year
            .zip(month)
            .and_then(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1))
        {
            return Ok(date.and_time(NaiveTime::MIN).and_utc());
        }
    }

    Err(Error::InvalidDate(raw.to_string()))
}

/// Three-letter English month name, `Jan` through `Dec`
pub fn month_abbreviation(iso_date: &str) -> Result<&'static str> {
    let date = parse_listing_date(iso_date)?;
    Ok(MONTH_ABBREVIATIONS[date.month0() as usize])
}

/// Quarter of the year the date falls in
///
/// The fourth label is spelled "Forth"; existing templates and stylesheets
/// key on that exact string.
pub fn quarter_label(iso_date: &str) -> Result<&'static str> {
    let date = parse_listing_date(iso_date)?;
    Ok(QUARTER_LABELS[(date.month0() / 3) as usize])
}

/// Calendar year modulo 100, without zero padding (2005 gives "5")
pub fn year_two_digits(iso_date: &str) -> Result<String> {
    let date = parse_listing_date(iso_date)?;
    Ok((date.year() % 100).to_string())
}

/// Day of the month in UTC, zero-padded to two digits
pub fn day_of_month(iso_date: &str) -> Result<String> {
    let date = parse_listing_date(iso_date)?;
    Ok(format!("{:02}", date.day()))
}
