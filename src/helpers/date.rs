//! Date helper functions

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::config::SiteConfig;

/// Abbreviated and full month names for a display language
struct MonthNames {
    short: [&'static str; 12],
    long: [&'static str; 12],
}

const EN_MONTHS: MonthNames = MonthNames {
    short: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    long: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
};

const PT_BR_MONTHS: MonthNames = MonthNames {
    short: [
        "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
    ],
    long: [
        "janeiro",
        "fevereiro",
        "março",
        "abril",
        "maio",
        "junho",
        "julho",
        "agosto",
        "setembro",
        "outubro",
        "novembro",
        "dezembro",
    ],
};

fn month_names(language: &str) -> &'static MonthNames {
    match language.to_ascii_lowercase().as_str() {
        "pt-br" | "pt_br" | "pt" => &PT_BR_MONTHS,
        _ => &EN_MONTHS,
    }
}

/// Formats publication timestamps coming from the content API
#[derive(Debug, Clone)]
pub struct DateFormatter {
    format: String,
    language: String,
    timezone: Option<Tz>,
}

impl DateFormatter {
    /// Create a formatter from a moment.js-style format, a language and a timezone name
    pub fn new(format: &str, language: &str, timezone: &str) -> Self {
        let timezone = if timezone.trim().is_empty() {
            None
        } else {
            match timezone.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(e) => {
                    tracing::warn!("Unknown timezone {:?}, keeping source offsets: {}", timezone, e);
                    None
                }
            }
        };

        Self {
            format: format.to_string(),
            language: language.to_string(),
            timezone,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.date_format, &config.language, &config.timezone)
    }

    /// Format a raw timestamp for display.
    ///
    /// Missing, blank or unparseable input yields `None`.
    pub fn display(&self, raw: Option<&str>) -> Option<String> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;

        let Some(date) = parse_timestamp(raw) else {
            tracing::debug!("Ignoring unparseable publication date: {}", raw);
            return None;
        };

        Some(match self.timezone {
            Some(tz) => format_date(&date.with_timezone(&tz), &self.format, &self.language),
            None => format_date(&date, &self.format, &self.language),
        })
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

/// Parse the timestamp shapes the content API emits.
///
/// Accepts RFC 3339, offsets without a colon (`2021-03-15T19:25:28+0000`)
/// and bare dates, which are taken as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date);
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(date) = DateTime::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)).fixed_offset())
}

/// Format a date using a Moment.js-compatible format string and localized month names
///
/// # Examples
/// ```ignore
/// format_date(&date, "DD MMM YYYY", "pt-BR") // -> "15 mar 2021"
/// ```
pub fn format_date<Z: TimeZone>(date: &DateTime<Z>, format: &str, language: &str) -> String
where
    Z::Offset: std::fmt::Display,
{
    let names = month_names(language);
    let index = date.month0() as usize;

    // Month names are substituted before chrono sees the pattern so that
    // non-English languages do not depend on chrono's locale support.
    let chrono_format = moment_to_chrono_format(format)
        .replace("%B", &escape_literal(names.long[index]))
        .replace("%b", &escape_literal(names.short[index]));

    date.format(&chrono_format).to_string()
}

/// Make text safe to splice into a chrono pattern
fn escape_literal(text: &str) -> String {
    text.replace('%', "%%")
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    let replacements = [
        // Year
        ("YYYY", "%Y"),
        ("YY", "%y"),
        // Month
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        // Day of month
        ("DD", "%d"),
        // Hour
        ("HH", "%H"),
        ("hh", "%I"),
        // Minute
        ("mm", "%M"),
        // Second
        ("ss", "%S"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
