use anyhow::bail;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// A `DD.MM` day-of-year birthday, no year on file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Birthday {
    pub day: u32,
    pub month: u32,
}

impl std::str::FromStr for Birthday {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::parse(s)
    }
}

impl Birthday {
    /// Parse a `DD.MM` string. Calendar-impossible combinations that
    /// pass the range check here (`31.02`) are rejected by `on_year`
    /// instead, so they never reach any view.
    pub fn parse(s: &str) -> crate::Result<Self> {
        let Some((day, month)) = s.trim().split_once('.') else {
            bail!("expected DD.MM, got {s:?}");
        };
        let (Ok(day), Ok(month)) = (day.trim().parse::<u32>(), month.trim().parse::<u32>()) else {
            bail!("expected DD.MM, got {s:?}");
        };
        if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
            bail!("day or month out of range in {s:?}");
        }
        Ok(Self { day, month })
    }

    /// The occurrence in the given year, if that year has the date.
    /// Feb 29 yields `None` in non-leap years and the record is
    /// skipped for that year.
    pub fn on_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }

    /// Days from `today` to the next occurrence, rolling into next
    /// year when this year's date has already passed
    pub fn days_until(&self, today: NaiveDate) -> Option<i64> {
        let this_year = self.on_year(today.year())?;
        if this_year < today {
            let next_year = self.on_year(today.year() + 1)?;
            Some((next_year - today).num_days())
        } else {
            Some((this_year - today).num_days())
        }
    }

    /// Table-view category of the next occurrence. The arms are
    /// checked in priority order, so a birthday lands in exactly one
    /// bucket; occurrences beyond next month fall out of the view.
    pub fn categorize(&self, today: NaiveDate) -> Option<TableCategory> {
        let days_until = self.days_until(today)?;
        if days_until == 0 {
            return Some(TableCategory::Today);
        }
        if days_until == 1 {
            return Some(TableCategory::Tomorrow);
        }
        let occurrence = today + chrono::Duration::days(days_until);
        let monday = next_monday(today);
        if occurrence >= monday && occurrence <= monday + chrono::Duration::days(6) {
            return Some(TableCategory::NextWeek);
        }
        if occurrence.month() == next_month(today) {
            return Some(TableCategory::NextMonth);
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableCategory {
    Today,
    Tomorrow,
    NextWeek,
    NextMonth,
}

impl TableCategory {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Tomorrow => "Tomorrow",
            Self::NextWeek => "Next week",
            Self::NextMonth => "Next month",
        }
    }
}

/// The Monday of next week. Never today, even when today is a Monday.
pub fn next_monday(today: NaiveDate) -> NaiveDate {
    let days_ahead = 7 - i64::from(today.weekday().num_days_from_monday());
    today + chrono::Duration::days(days_ahead)
}

/// Month number of the next calendar month, December wrapping to
/// January
pub fn next_month(today: NaiveDate) -> u32 {
    match today.month() {
        12 => 1,
        month => month + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn parses_valid_days() {
        let birthday = Birthday::parse("07.11").unwrap();
        assert_eq!(birthday, Birthday { day: 7, month: 11 });
    }

    #[test]
    fn rejects_malformed_strings() {
        for input in ["", "7", "07-11", "7.11.1990", "ab.cd", "00.05", "12.13", "32.01"] {
            assert!(Birthday::parse(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn impossible_calendar_date_never_surfaces() {
        // 31.02 passes the range check but no year has it
        let birthday = Birthday::parse("31.02").unwrap();
        assert_eq!(birthday.on_year(2023), None);
        assert_eq!(birthday.on_year(2024), None);
        assert_eq!(birthday.days_until(date(2024, 6, 7)), None);
        assert_eq!(birthday.categorize(date(2024, 6, 7)), None);
    }

    #[test]
    fn leap_day_skipped_in_non_leap_years() {
        let birthday = Birthday::parse("29.02").unwrap();
        assert_eq!(birthday.days_until(date(2023, 6, 1)), None);
        // leap year, date still ahead
        assert_eq!(birthday.days_until(date(2024, 2, 1)), Some(28));
        // leap year but the date has passed and next year has no Feb 29
        assert_eq!(birthday.days_until(date(2024, 3, 1)), None);
    }

    #[test]
    fn days_until_rolls_over_the_year() {
        let birthday = Birthday::parse("05.01").unwrap();
        assert_eq!(birthday.days_until(date(2024, 1, 5)), Some(0));
        assert_eq!(birthday.days_until(date(2024, 1, 6)), Some(365));
        assert_eq!(birthday.days_until(date(2024, 12, 31)), Some(5));
    }

    #[test]
    fn days_until_stays_within_a_year() {
        let today = date(2024, 6, 7);
        for month in 1..=12 {
            for day in 1..=31 {
                let birthday = Birthday { day, month };
                if let Some(days) = birthday.days_until(today) {
                    assert!((0..=366).contains(&days), "{day:02}.{month:02} -> {days}");
                }
            }
        }
    }

    #[test]
    fn next_monday_is_never_today() {
        // 2024-06-03 is a Monday
        assert_eq!(next_monday(date(2024, 6, 3)), date(2024, 6, 10));
        // Friday 2024-06-07 -> Monday 2024-06-10
        assert_eq!(next_monday(date(2024, 6, 7)), date(2024, 6, 10));
        // Sunday 2024-06-09 -> Monday 2024-06-10
        assert_eq!(next_monday(date(2024, 6, 9)), date(2024, 6, 10));
    }

    #[test]
    fn next_month_wraps_december() {
        assert_eq!(next_month(date(2024, 11, 15)), 12);
        assert_eq!(next_month(date(2024, 12, 15)), 1);
    }

    #[test]
    fn categorize_buckets_by_priority() {
        // Friday
        let today = date(2024, 6, 7);
        let checks = [
            ("07.06", Some(TableCategory::Today)),
            ("08.06", Some(TableCategory::Tomorrow)),
            // Sunday of this week falls before next Monday
            ("09.06", None),
            // next Monday through next Sunday
            ("10.06", Some(TableCategory::NextWeek)),
            ("16.06", Some(TableCategory::NextWeek)),
            // later in June, not next week and not next month
            ("25.06", None),
            ("01.07", Some(TableCategory::NextMonth)),
            ("31.07", Some(TableCategory::NextMonth)),
            ("01.08", None),
        ];
        for (input, expected) in checks {
            let birthday = Birthday::parse(input).unwrap();
            assert_eq!(birthday.categorize(today), expected, "{input}");
        }
    }

    #[test]
    fn categorize_next_month_across_year_boundary() {
        let today = date(2024, 12, 20);
        let birthday = Birthday::parse("15.01").unwrap();
        assert_eq!(birthday.categorize(today), Some(TableCategory::NextMonth));
    }

    #[test]
    fn categories_are_mutually_exclusive() {
        // a birthday next Monday that is also tomorrow must be Tomorrow
        let sunday = date(2024, 6, 9);
        let birthday = Birthday::parse("10.06").unwrap();
        assert_eq!(birthday.categorize(sunday), Some(TableCategory::Tomorrow));
    }
}
