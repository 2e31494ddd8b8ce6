//! Calendar and time arithmetic behind the date/time picker.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use thiserror::Error;

/// Display format used by the picker trigger.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Number of cells in a month grid (six weeks).
pub const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Invalid picker input.
pub enum DateTimeError {
    /// Time text was not `HH:MM` or named an impossible time.
    #[error("invalid time `{0}`; expected HH:MM")]
    InvalidTime(String),
    /// Year/month/day combination does not exist.
    #[error("invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        /// Year.
        year: i32,
        /// Month (1-12).
        month: u32,
        /// Day of month.
        day: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// One month of the calendar.
pub struct CalendarMonth {
    first: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One cell of a month grid.
pub struct CalendarDay {
    /// Date shown in the cell.
    pub date: NaiveDate,
    /// `false` for leading/trailing days of adjacent months.
    pub in_month: bool,
}

impl CalendarMonth {
    /// Month `month` (1-12) of `year`.
    ///
    /// # Errors
    ///
    /// Returns [`DateTimeError::InvalidDate`] for out-of-range months or years.
    pub fn new(year: i32, month: u32) -> Result<Self, DateTimeError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or(DateTimeError::InvalidDate {
                year,
                month,
                day: 1,
            })
    }

    /// Month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Month number (1-12).
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Following month; saturates at chrono's supported range.
    pub fn next(&self) -> Self {
        Self {
            first: self
                .first
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// Preceding month; saturates at chrono's supported range.
    pub fn previous(&self) -> Self {
        Self {
            first: self
                .first
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// Number of days in the month.
    pub fn days_in_month(&self) -> u32 {
        match self.first.checked_add_months(Months::new(1)) {
            Some(next) if next != self.first => {
                next.signed_duration_since(self.first).num_days() as u32
            }
            _ => 31,
        }
    }

    /// Header label, e.g. `March 2024`.
    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    /// Six-week grid starting on `week_start`, padded with adjacent-month days.
    pub fn grid(&self, week_start: Weekday) -> Vec<CalendarDay> {
        let offset = (self.first.weekday().num_days_from_monday() + 7
            - week_start.num_days_from_monday())
            % 7;
        let Some(mut cursor) = self.first.checked_sub_days(Days::new(u64::from(offset))) else {
            return Vec::new();
        };
        let mut cells = Vec::with_capacity(GRID_CELLS);
        for _ in 0..GRID_CELLS {
            cells.push(CalendarDay {
                date: cursor,
                in_month: cursor.year() == self.year() && cursor.month() == self.month(),
            });
            match cursor.succ_opt() {
                Some(next) => cursor = next,
                None => break,
            }
        }
        cells
    }
}

/// Shifts `date` by `months`, clamping the day to the target month's length.
/// Saturates (returns `date`) outside chrono's range.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// Parses `HH:MM` (24-hour).
///
/// # Errors
///
/// Returns [`DateTimeError::InvalidTime`] for anything else.
pub fn parse_time(input: &str) -> Result<NaiveTime, DateTimeError> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map_err(|_| DateTimeError::InvalidTime(trimmed.to_string()))
}

/// Combines `date` with `hour:minute`.
///
/// # Errors
///
/// Returns [`DateTimeError::InvalidTime`] for hours above 23 or minutes above 59.
pub fn with_time(date: NaiveDate, hour: u32, minute: u32) -> Result<NaiveDateTime, DateTimeError> {
    date.and_hms_opt(hour, minute, 0)
        .ok_or_else(|| DateTimeError::InvalidTime(format!("{hour:02}:{minute:02}")))
}

/// Formats a value with [`DISPLAY_FORMAT`].
pub fn format_date_time(value: NaiveDateTime) -> String {
    value.format(DISPLAY_FORMAT).to_string()
}

/// `HH:MM` text for a time input.
pub fn format_time(value: NaiveDateTime) -> String {
    value.format("%H:%M").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Inclusive selectable range; either bound may be open.
pub struct DateRange {
    /// Earliest selectable value.
    pub min: Option<NaiveDateTime>,
    /// Latest selectable value.
    pub max: Option<NaiveDateTime>,
}

impl DateRange {
    /// Whether `value` lies inside the range.
    pub fn contains(&self, value: NaiveDateTime) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    /// Whether any moment of `date` is selectable.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.min.map_or(true, |min| date >= min.date())
            && self.max.map_or(true, |max| date <= max.date())
    }

    /// Pulls `value` into the range.
    pub fn clamp(&self, value: NaiveDateTime) -> NaiveDateTime {
        let value = match self.min {
            Some(min) if value < min => min,
            _ => value,
        };
        match self.max {
            Some(max) if value > max => max,
            _ => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn month_navigation_crosses_years() {
        let december = CalendarMonth::new(2023, 12).expect("month");
        assert_eq!(december.next(), CalendarMonth::new(2024, 1).expect("month"));
        assert_eq!(
            CalendarMonth::new(2024, 1).expect("month").previous(),
            december
        );
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert_eq!(
            CalendarMonth::new(2024, 13),
            Err(DateTimeError::InvalidDate {
                year: 2024,
                month: 13,
                day: 1
            })
        );
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(CalendarMonth::new(2024, 2).expect("month").days_in_month(), 29);
        assert_eq!(CalendarMonth::new(2023, 2).expect("month").days_in_month(), 28);
        assert_eq!(CalendarMonth::new(2023, 4).expect("month").days_in_month(), 30);
    }

    #[test]
    fn grid_pads_to_six_weeks_from_week_start() {
        // 2024-03-01 is a Friday.
        let march = CalendarMonth::new(2024, 3).expect("month");

        let sunday_grid = march.grid(Weekday::Sun);
        assert_eq!(sunday_grid.len(), GRID_CELLS);
        assert_eq!(sunday_grid[0].date, date(2024, 2, 25));
        assert!(!sunday_grid[0].in_month);
        assert_eq!(sunday_grid[5].date, date(2024, 3, 1));
        assert!(sunday_grid[5].in_month);

        let monday_grid = march.grid(Weekday::Mon);
        assert_eq!(monday_grid[0].date, date(2024, 2, 26));
        assert_eq!(
            monday_grid.iter().filter(|day| day.in_month).count(),
            31
        );
    }

    #[test]
    fn add_months_clamps_day() {
        assert_eq!(add_months(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(add_months(date(2024, 3, 31), -1), date(2024, 2, 29));
        assert_eq!(add_months(date(2024, 5, 15), 12), date(2025, 5, 15));
    }

    #[test]
    fn time_parsing_accepts_hh_mm_only() {
        assert_eq!(
            parse_time(" 09:30 "),
            Ok(NaiveTime::from_hms_opt(9, 30, 0).expect("time"))
        );
        assert_eq!(
            parse_time("25:00"),
            Err(DateTimeError::InvalidTime("25:00".to_string()))
        );
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn with_time_rejects_impossible_values() {
        let day = date(2024, 6, 1);
        assert_eq!(
            format_date_time(with_time(day, 7, 5).expect("time")),
            "2024-06-01 07:05"
        );
        assert!(with_time(day, 24, 0).is_err());
    }

    #[test]
    fn range_clamps_and_filters_days() {
        let range = DateRange {
            min: Some(with_time(date(2024, 6, 10), 9, 0).expect("min")),
            max: Some(with_time(date(2024, 6, 20), 17, 0).expect("max")),
        };
        let early = with_time(date(2024, 6, 1), 12, 0).expect("early");
        assert!(!range.contains(early));
        assert_eq!(range.clamp(early), range.min.expect("min"));
        assert!(range.contains_date(date(2024, 6, 10)));
        assert!(!range.contains_date(date(2024, 6, 21)));
        assert!(DateRange::default().contains(early));
    }
}
