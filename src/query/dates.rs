//! Calendar-date helpers shared by the query builder, scorer and scanner.

use chrono::{Local, Months, NaiveDate, TimeDelta};

use super::{DatePreset, DateRange};

/// Wire format of every date handled by the scanner.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns today's date in the local timezone.
#[must_use]
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses the date portion of a paper date string.
///
/// Accepts `YYYY-MM-DD` optionally followed by a time component
/// (`2024-03-01T12:00:00Z`). Anything else is `None`, i.e. unknown recency.
#[must_use]
pub fn parse_paper_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let head = trimmed.split_once('T').map_or(trimmed, |(date, _)| date);
    if head.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

fn days_before(today: NaiveDate, days: i64) -> NaiveDate {
    today
        .checked_sub_signed(TimeDelta::days(days))
        .unwrap_or(NaiveDate::MIN)
}

fn one_year_before(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(Months::new(12))
        .unwrap_or_else(|| days_before(today, 365))
}

impl DatePreset {
    /// Resolves the inclusive lower date bound relative to `today`.
    ///
    /// `Custom` uses the supplied start date; an unparsable start yields
    /// `None` (no lower bound). `Custom` without a range behaves like `Year`.
    #[must_use]
    pub fn lower_bound(self, today: NaiveDate, custom_range: Option<&DateRange>) -> Option<NaiveDate> {
        match self {
            Self::Week => Some(days_before(today, 7)),
            Self::Month => Some(days_before(today, 30)),
            Self::Quarter => Some(days_before(today, 90)),
            Self::Year => Some(one_year_before(today)),
            Self::Custom => match custom_range {
                Some(range) => parse_paper_date(&range.start),
                None => Some(one_year_before(today)),
            },
        }
    }

    /// Resolves the inclusive upper date bound, only set for `Custom` ranges
    /// with a parseable end.
    #[must_use]
    pub fn upper_bound(self, custom_range: Option<&DateRange>) -> Option<NaiveDate> {
        match (self, custom_range) {
            (Self::Custom, Some(range)) => parse_paper_date(&range.end),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_preset_lower_bounds() {
        let today = ymd(2024, 3, 31);
        assert_eq!(DatePreset::Week.lower_bound(today, None), Some(ymd(2024, 3, 24)));
        assert_eq!(DatePreset::Month.lower_bound(today, None), Some(ymd(2024, 3, 1)));
        assert_eq!(DatePreset::Quarter.lower_bound(today, None), Some(ymd(2024, 1, 1)));
        assert_eq!(DatePreset::Year.lower_bound(today, None), Some(ymd(2023, 3, 31)));
    }

    #[test]
    fn test_year_preset_on_leap_day_clamps_to_month_end() {
        let today = ymd(2024, 2, 29);
        assert_eq!(DatePreset::Year.lower_bound(today, None), Some(ymd(2023, 2, 28)));
    }

    #[test]
    fn test_custom_preset_uses_range_start() {
        let today = ymd(2024, 3, 31);
        let range = DateRange::new("2023-05-01", "2023-06-01");
        assert_eq!(
            DatePreset::Custom.lower_bound(today, Some(&range)),
            Some(ymd(2023, 5, 1))
        );
        assert_eq!(DatePreset::Custom.upper_bound(Some(&range)), Some(ymd(2023, 6, 1)));
    }

    #[test]
    fn test_custom_preset_with_bad_start_has_no_lower_bound() {
        let range = DateRange::new("someday", "");
        assert_eq!(DatePreset::Custom.lower_bound(ymd(2024, 1, 1), Some(&range)), None);
        assert_eq!(DatePreset::Custom.upper_bound(Some(&range)), None);
    }

    #[test]
    fn test_custom_preset_without_range_falls_back_to_year() {
        let today = ymd(2024, 3, 31);
        assert_eq!(DatePreset::Custom.lower_bound(today, None), Some(ymd(2023, 3, 31)));
    }

    #[test]
    fn test_upper_bound_only_for_custom() {
        let range = DateRange::new("2023-05-01", "2023-06-01");
        assert_eq!(DatePreset::Month.upper_bound(Some(&range)), None);
    }

    #[test]
    fn test_parse_paper_date_variants() {
        assert_eq!(parse_paper_date("2024-03-01"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_paper_date("2024-03-01T17:59:59Z"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_paper_date(" 2024-03-01 "), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_paper_date(""), None);
        assert_eq!(parse_paper_date("March 2024"), None);
        assert_eq!(parse_paper_date("2024-13-01"), None);
    }

    #[test]
    fn test_parse_paper_date_rejects_trailing_garbage() {
        assert_eq!(parse_paper_date("2024-06-10 garbage"), None);
        assert_eq!(parse_paper_date("2024-06-10x"), None);
        assert_eq!(parse_paper_date("2024-6-1"), None);
        assert_eq!(parse_paper_date("2024-06-10T"), Some(ymd(2024, 6, 10)));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(ymd(2024, 1, 5)), "2024-01-05");
    }
}
