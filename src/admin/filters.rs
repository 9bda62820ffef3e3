use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date buckets for the console's game archive filter. Buckets are evaluated
/// independently and overlap: yesterday's game is also inside the week,
/// month, and year windows. Only `Planned` looks forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateBucket {
    PastYear,
    PastMonth,
    PastWeek,
    Yesterday,
    Planned,
}

/// The date window a bucket selects, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BucketRange {
    Between(NaiveDate, NaiveDate),
    On(NaiveDate),
    From(NaiveDate),
}

impl DateBucket {
    pub const ALL: [DateBucket; 5] = [
        DateBucket::PastYear,
        DateBucket::PastMonth,
        DateBucket::PastWeek,
        DateBucket::Yesterday,
        DateBucket::Planned,
    ];

    /// An unrecognized or absent selection means no date filtering.
    pub fn parse(value: &str) -> Option<DateBucket> {
        match value {
            "year" => Some(DateBucket::PastYear),
            "month" => Some(DateBucket::PastMonth),
            "week" => Some(DateBucket::PastWeek),
            "yesterday" => Some(DateBucket::Yesterday),
            "planned" => Some(DateBucket::Planned),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            DateBucket::PastYear => "year",
            DateBucket::PastMonth => "month",
            DateBucket::PastWeek => "week",
            DateBucket::Yesterday => "yesterday",
            DateBucket::Planned => "planned",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateBucket::PastYear => "Games this year",
            DateBucket::PastMonth => "Games this month",
            DateBucket::PastWeek => "Games this week",
            DateBucket::Yesterday => "Games yesterday",
            DateBucket::Planned => "Planned",
        }
    }

    pub fn range(&self, today: NaiveDate) -> BucketRange {
        let yesterday = today - Days::new(1);
        match self {
            // 52 weeks, ending yesterday
            DateBucket::PastYear => BucketRange::Between(today - Days::new(364), yesterday),
            DateBucket::PastMonth => BucketRange::Between(today - Days::new(31), yesterday),
            DateBucket::PastWeek => BucketRange::Between(today - Days::new(7), yesterday),
            DateBucket::Yesterday => BucketRange::On(yesterday),
            DateBucket::Planned => BucketRange::From(today),
        }
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.range(today) {
            BucketRange::Between(start, end) => date >= start && date <= end,
            BucketRange::On(day) => date == day,
            BucketRange::From(start) => date >= start,
        }
    }
}

/// Display state of a scheduled game; cancellation wins over everything,
/// then past dates count as held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Canceled,
    Held,
    Planned,
}

impl GameState {
    pub fn derive(canceled: bool, date: NaiveDate, today: NaiveDate) -> GameState {
        if canceled {
            GameState::Canceled
        } else if date < today {
            GameState::Held
        } else {
            GameState::Planned
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameState::Canceled => "Canceled",
            GameState::Held => "Held",
            GameState::Planned => "Planned",
        }
    }
}

/// Master employment display state; fired outranks on-holiday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentState {
    Fired,
    OnHoliday,
    Working,
}

impl EmploymentState {
    pub fn derive(fired: bool, on_holiday: bool) -> EmploymentState {
        if fired {
            EmploymentState::Fired
        } else if on_holiday {
            EmploymentState::OnHoliday
        } else {
            EmploymentState::Working
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmploymentState::Fired => "Fired",
            EmploymentState::OnHoliday => "On holiday",
            EmploymentState::Working => "Working",
        }
    }
}

pub fn city_state_label(closed: bool) -> &'static str {
    if closed {
        "No branches"
    } else {
        "Has branches"
    }
}

pub fn venue_state_label(closed: bool) -> &'static str {
    if closed {
        "Closed"
    } else {
        "Open"
    }
}

pub fn difficulty_label(level: i16) -> &'static str {
    match level {
        1 => "Very easy",
        2 => "Easy",
        3 => "Medium",
        4 => "Hard",
        5 => "Very hard",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn unknown_bucket_means_unfiltered() {
        assert_eq!(DateBucket::parse("fortnight"), None);
        assert_eq!(DateBucket::parse(""), None);
        assert_eq!(DateBucket::parse("planned"), Some(DateBucket::Planned));
    }

    #[test]
    fn slug_round_trips() {
        for bucket in DateBucket::ALL {
            assert_eq!(DateBucket::parse(bucket.slug()), Some(bucket));
        }
    }

    #[test]
    fn yesterday_overlaps_the_backward_buckets() {
        let yesterday = today() - Days::new(1);
        for bucket in [
            DateBucket::PastYear,
            DateBucket::PastMonth,
            DateBucket::PastWeek,
            DateBucket::Yesterday,
        ] {
            assert!(
                bucket.contains(yesterday, today()),
                "{bucket:?} should contain yesterday"
            );
        }
        assert!(!DateBucket::Planned.contains(yesterday, today()));
    }

    #[test]
    fn today_and_later_are_only_planned() {
        for offset in [0u64, 1, 30, 400] {
            let date = today() + Days::new(offset);
            assert!(DateBucket::Planned.contains(date, today()));
            for bucket in [
                DateBucket::PastYear,
                DateBucket::PastMonth,
                DateBucket::PastWeek,
                DateBucket::Yesterday,
            ] {
                assert!(
                    !bucket.contains(date, today()),
                    "{bucket:?} must not contain {date}"
                );
            }
        }
    }

    #[test]
    fn backward_windows_have_the_documented_spans() {
        assert_eq!(
            DateBucket::PastYear.range(today()),
            BucketRange::Between(today() - Days::new(364), today() - Days::new(1))
        );
        assert_eq!(
            DateBucket::PastMonth.range(today()),
            BucketRange::Between(today() - Days::new(31), today() - Days::new(1))
        );
        assert_eq!(
            DateBucket::PastWeek.range(today()),
            BucketRange::Between(today() - Days::new(7), today() - Days::new(1))
        );
    }

    #[test]
    fn week_excludes_the_eighth_day_back() {
        assert!(DateBucket::PastWeek.contains(today() - Days::new(7), today()));
        assert!(!DateBucket::PastWeek.contains(today() - Days::new(8), today()));
        assert!(DateBucket::PastMonth.contains(today() - Days::new(8), today()));
    }

    #[test]
    fn game_state_precedence() {
        let past = today() - Days::new(2);
        let future = today() + Days::new(2);
        assert_eq!(GameState::derive(true, future, today()), GameState::Canceled);
        assert_eq!(GameState::derive(true, past, today()), GameState::Canceled);
        assert_eq!(GameState::derive(false, past, today()), GameState::Held);
        assert_eq!(GameState::derive(false, today(), today()), GameState::Planned);
        assert_eq!(GameState::derive(false, future, today()), GameState::Planned);
    }

    #[test]
    fn employment_precedence() {
        assert_eq!(EmploymentState::derive(true, true), EmploymentState::Fired);
        assert_eq!(
            EmploymentState::derive(false, true),
            EmploymentState::OnHoliday
        );
        assert_eq!(
            EmploymentState::derive(false, false),
            EmploymentState::Working
        );
    }

    #[test]
    fn display_labels() {
        assert_eq!(city_state_label(true), "No branches");
        assert_eq!(venue_state_label(false), "Open");
        assert_eq!(difficulty_label(1), "Very easy");
        assert_eq!(difficulty_label(5), "Very hard");
        assert_eq!(difficulty_label(9), "Unknown");
    }
}
