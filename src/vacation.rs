use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Current,
    StartingSoon,
    Upcoming,
}

impl Phase {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Current => "On vacation",
            Self::StartingSoon => "Starting soon",
            Self::Upcoming => "Upcoming",
        }
    }
}

/// Classify a vacation relative to `today`: the phase plus days left
/// (current) or days until start (soon/upcoming). Inverted and
/// already-finished ranges and starts beyond the relevance window are
/// dropped here even though the fetch query filters them too.
pub fn phase(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    soon_days: i64,
    window_days: i64,
) -> Option<(Phase, i64)> {
    if end < start || end < today {
        return None;
    }
    if start <= today {
        return Some((Phase::Current, (end - today).num_days() + 1));
    }
    let until_start = (start - today).num_days();
    if until_start <= soon_days {
        Some((Phase::StartingSoon, until_start))
    } else if until_start <= window_days {
        Some((Phase::Upcoming, until_start))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn classify(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Option<(Phase, i64)> {
        phase(start, end, today, 3, 30)
    }

    #[test]
    fn single_day_vacation_today() {
        let today = date(2024, 6, 7);
        assert_eq!(classify(today, today, today), Some((Phase::Current, 1)));
    }

    #[test]
    fn current_counts_remaining_days_inclusive() {
        let today = date(2024, 6, 7);
        let result = classify(date(2024, 6, 3), date(2024, 6, 10), today);
        assert_eq!(result, Some((Phase::Current, 4)));
    }

    #[test]
    fn soon_and_upcoming_boundaries() {
        let today = date(2024, 6, 7);
        let end = date(2024, 8, 1);
        assert_eq!(
            classify(date(2024, 6, 8), end, today),
            Some((Phase::StartingSoon, 1))
        );
        assert_eq!(
            classify(date(2024, 6, 10), end, today),
            Some((Phase::StartingSoon, 3))
        );
        assert_eq!(
            classify(date(2024, 6, 11), end, today),
            Some((Phase::Upcoming, 4))
        );
        assert_eq!(
            classify(date(2024, 7, 7), end, today),
            Some((Phase::Upcoming, 30))
        );
        assert_eq!(classify(date(2024, 7, 8), end, today), None);
    }

    #[test]
    fn rejects_finished_and_inverted_ranges() {
        let today = date(2024, 6, 7);
        assert_eq!(classify(date(2024, 5, 1), date(2024, 5, 20), today), None);
        assert_eq!(classify(date(2024, 6, 20), date(2024, 6, 10), today), None);
    }
}
