//! Date helper functions

use chrono::{DateTime, FixedOffset, TimeZone};

use crate::config::SiteConfig;

/// Format a date using Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "DD MMM YYYY") // -> "15 Mar 2021"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    // Convert Moment.js format to chrono format
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Format a publication date for display, in the site timezone if one is set
pub fn display_date(config: &SiteConfig, date: &DateTime<FixedOffset>) -> String {
    match config.timezone.parse::<chrono_tz::Tz>() {
        Ok(tz) if !config.timezone.is_empty() => {
            format_date(&date.with_timezone(&tz), &config.date_format)
        }
        _ => format_date(date, &config.date_format),
    }
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest patterns first within each unit so "MMMM" is not eaten by "MM"
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
        ("SSS", "%3f"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2021-03-15T01:30:00+00:00").unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&date(), "YYYY-MM-DD"), "2021-03-15");
        assert_eq!(format_date(&date(), "DD MMM YYYY"), "15 Mar 2021");
    }

    #[test]
    fn test_display_date_without_timezone() {
        let config = SiteConfig::default();
        assert_eq!(display_date(&config, &date()), "15 Mar 2021");
    }

    #[test]
    fn test_display_date_in_site_timezone() {
        let config = SiteConfig {
            timezone: "America/Sao_Paulo".to_string(),
            ..SiteConfig::default()
        };
        // 01:30 UTC is still the previous day in Sao Paulo (UTC-3)
        assert_eq!(display_date(&config, &date()), "14 Mar 2021");
    }

    #[test]
    fn test_date_xml() {
        assert_eq!(date_xml(&date()), "2021-03-15T01:30:00.000+00:00");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
        assert_eq!(moment_to_chrono_format("DD MMM YYYY"), "%d %b %Y");
    }
}
