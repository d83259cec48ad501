//! Local date/time formatting.
//!
//! All user-facing times are rendered in one zone: the IANA zone from
//! `RUNDOWN_TIMEZONE` when set, otherwise the machine's local zone.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    #[default]
    Local,
    Named(Tz),
}

impl DisplayZone {
    /// Parse an IANA zone name; `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        name.trim().parse::<Tz>().ok().map(DisplayZone::Named)
    }

    fn format(&self, dt: DateTime<Utc>, fmt: &str) -> String {
        match self {
            DisplayZone::Local => dt.with_timezone(&Local).format(fmt).to_string(),
            DisplayZone::Named(tz) => dt.with_timezone(tz).format(fmt).to_string(),
        }
    }

    /// Today's calendar date in this zone.
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }

    pub fn date_of(&self, dt: DateTime<Utc>) -> NaiveDate {
        match self {
            DisplayZone::Local => dt.with_timezone(&Local).date_naive(),
            DisplayZone::Named(tz) => dt.with_timezone(tz).date_naive(),
        }
    }

    /// UTC offset (`"-05:00"`) in effect at noon on `date`.
    pub fn utc_offset(&self, date: NaiveDate) -> String {
        let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
        let label = match self {
            DisplayZone::Local => Local
                .from_local_datetime(&noon)
                .earliest()
                .map(|dt| dt.format("%:z").to_string()),
            DisplayZone::Named(tz) => tz
                .from_local_datetime(&noon)
                .earliest()
                .map(|dt| dt.format("%:z").to_string()),
        };
        label.unwrap_or_else(|| "+00:00".to_string())
    }

    /// `"09:30 AM"`: hour and minute, two digits each.
    pub fn time_label(&self, iso: &str) -> String {
        match parse_timestamp(iso) {
            Some(dt) => self.format(dt, "%I:%M %p"),
            None => iso.to_string(),
        }
    }

    /// `"Jan 5"`: short month and day.
    pub fn short_date_label(&self, iso: &str) -> String {
        match parse_timestamp(iso) {
            Some(dt) => self.format(dt, "%b %-d"),
            None => iso.to_string(),
        }
    }
}

/// `"Monday, January 5"`: weekday, month and day.
pub fn long_date_label(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

/// `YYYY-MM-DD`, as the events and search endpoints expect.
pub fn api_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse an RFC 3339 timestamp, or a bare date as midnight UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if s.contains('T') {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    } else {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_york() -> DisplayZone {
        DisplayZone::from_name("America/New_York").unwrap()
    }

    #[test]
    fn test_time_label_in_named_zone() {
        assert_eq!(new_york().time_label("2026-01-05T14:00:00Z"), "09:00 AM");
        assert_eq!(new_york().time_label("2026-01-05T21:45:00Z"), "04:45 PM");
    }

    #[test]
    fn test_time_label_keeps_unparsable_input() {
        assert_eq!(new_york().time_label("soon"), "soon");
    }

    #[test]
    fn test_short_date_label_crosses_midnight() {
        // 02:00 UTC on the 6th is still the 5th in New York.
        assert_eq!(new_york().short_date_label("2026-01-06T02:00:00Z"), "Jan 5");
    }

    #[test]
    fn test_long_date_label() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(long_date_label(date), "Monday, January 5");
        assert_eq!(api_date(date), "2026-01-05");
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2026-02-08T09:00:00-05:00").is_some());
        assert!(parse_timestamp("2026-02-08").is_some());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("Feb 8").is_none());
    }

    #[test]
    fn test_utc_offset_follows_dst() {
        let winter = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let summer = NaiveDate::from_ymd_opt(2026, 7, 6).unwrap();
        assert_eq!(new_york().utc_offset(winter), "-05:00");
        assert_eq!(new_york().utc_offset(summer), "-04:00");
        assert_eq!(
            new_york().time_label(&format!("2026-01-05T09:30:00{}", new_york().utc_offset(winter))),
            "09:30 AM"
        );
    }

    #[test]
    fn test_unknown_zone_name() {
        assert!(DisplayZone::from_name("Mars/Olympus").is_none());
    }
}
