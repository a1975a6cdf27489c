//! Date-range resolution.
//!
//! Turns the start / end date fields into a validated [`DateRange`].  Pure
//! functions only: "today" is passed in so callers (and tests) control the
//! clock.

use chrono::{Days, NaiveDate};

use crate::error::RangeError;

/// Number of days added to the start date when no end date is given.
/// The resulting window is `DEFAULT_SPAN_DAYS + 1` days inclusive.
pub const DEFAULT_SPAN_DAYS: u64 = 8;

/// ISO calendar date format used by the feed and the input fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive `[start, end]` span of calendar days with `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive day count.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Resolve the user's input into a [`DateRange`].
///
/// * no start date → [`RangeError::MissingInput`]
/// * start after `today` → [`RangeError::FutureDateRejected`]
/// * end before start → [`RangeError::InvalidRange`]
/// * no end date → `start + 8 days`
pub fn resolve(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DateRange, RangeError> {
    let start = start.ok_or(RangeError::MissingInput)?;
    if start > today {
        return Err(RangeError::FutureDateRejected { start, today });
    }

    let end = match end {
        Some(end) => end,
        None => start
            .checked_add_days(Days::new(DEFAULT_SPAN_DAYS))
            .unwrap_or(NaiveDate::MAX),
    };

    DateRange::new(start, end)
}

/// Parse one date input field.  Blank input is `None`, not an error.
pub fn parse_date_input(field: &'static str, input: &str) -> Result<Option<NaiveDate>, RangeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| RangeError::InvalidDate {
            field,
            value: trimmed.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const TODAY: (i32, u32, u32) = (2024, 6, 30);

    fn today() -> NaiveDate {
        d(TODAY.0, TODAY.1, TODAY.2)
    }

    // -- resolve -------------------------------------------------------------

    #[test]
    fn default_span_is_nine_days_inclusive() {
        for start in [d(2024, 1, 1), d(2023, 12, 28), d(2024, 2, 25), today()] {
            let range = resolve(Some(start), None, today()).unwrap();
            assert_eq!(range.start(), start);
            assert_eq!(range.days(), 9, "window starting {start}");
        }
    }

    #[test]
    fn default_span_crosses_leap_day() {
        let range = resolve(Some(d(2024, 2, 25)), None, today()).unwrap();
        assert_eq!(range.end(), d(2024, 3, 4));
    }

    #[test]
    fn missing_start_is_rejected() {
        assert_eq!(resolve(None, None, today()), Err(RangeError::MissingInput));
        assert_eq!(
            resolve(None, Some(d(2024, 1, 1)), today()),
            Err(RangeError::MissingInput)
        );
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = resolve(Some(d(2024, 3, 10)), Some(d(2024, 3, 9)), today()).unwrap_err();
        assert_eq!(
            err,
            RangeError::InvalidRange {
                start: d(2024, 3, 10),
                end: d(2024, 3, 9)
            }
        );
    }

    #[test]
    fn explicit_end_is_kept() {
        let range = resolve(Some(d(2024, 3, 1)), Some(d(2024, 3, 3)), today()).unwrap();
        assert_eq!(range.end(), d(2024, 3, 3));
        assert_eq!(range.days(), 3);
    }

    #[test]
    fn single_day_range_is_valid() {
        let range = resolve(Some(d(2024, 3, 1)), Some(d(2024, 3, 1)), today()).unwrap();
        assert_eq!(range.days(), 1);
    }

    #[test]
    fn future_start_is_rejected() {
        let err = resolve(Some(d(2024, 7, 1)), None, today()).unwrap_err();
        assert!(matches!(err, RangeError::FutureDateRejected { .. }));
    }

    #[test]
    fn start_equal_to_today_is_accepted() {
        assert!(resolve(Some(today()), None, today()).is_ok());
    }

    #[test]
    fn contains_is_inclusive() {
        let range = DateRange::new(d(2024, 1, 1), d(2024, 1, 3)).unwrap();
        assert!(range.contains(d(2024, 1, 1)));
        assert!(range.contains(d(2024, 1, 3)));
        assert!(!range.contains(d(2024, 1, 4)));
        assert!(!range.contains(d(2023, 12, 31)));
    }

    // -- parse_date_input ----------------------------------------------------

    #[test]
    fn blank_input_is_none() {
        assert_eq!(parse_date_input("start", "   "), Ok(None));
    }

    #[test]
    fn iso_input_parses() {
        assert_eq!(
            parse_date_input("start", " 2024-01-05 "),
            Ok(Some(d(2024, 1, 5)))
        );
    }

    #[test]
    fn malformed_input_names_the_field() {
        let err = parse_date_input("end", "2024-13-01").unwrap_err();
        assert_eq!(
            err,
            RangeError::InvalidDate {
                field: "end",
                value: "2024-13-01".into()
            }
        );
    }
}
