//! Conversions between the two textual date encodings used by records.
//!
//! Dates travel as text in one of two shapes:
//! - display form `DD/MM/YYYY`, written by the board when saving a record
//! - sortable form `YYYY-MM-DD`, where text order equals calendar order
//!
//! Anything matching neither shape is passed through untouched. Comparisons
//! (`is_overdue`, `is_due_today`) normalize first, so they always compare
//! sortable text.

use chrono::{NaiveDate, Utc};

/// Source of "today" for due date checks.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the system time, in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Rewrites `DD/MM/YYYY` into `YYYY-MM-DD`, zero-padding day and month.
///
/// Empty input, sortable input and unrecognized input come back unchanged.
pub fn to_sortable(text: &str) -> String {
    match parse_display(text) {
        Some((day, month, year)) => format!("{year}-{month:0>2}-{day:0>2}"),
        None => text.to_string(),
    }
}

/// Rewrites `YYYY-MM-DD` into `DD/MM/YYYY`.
///
/// Empty input, display input and unrecognized input come back unchanged.
pub fn to_display(text: &str) -> String {
    match parse_sortable(text) {
        Some((year, month, day)) => format!("{day}/{month}/{year}"),
        None => text.to_string(),
    }
}

/// Formats a calendar date in sortable form.
pub fn sortable(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// True when the due date falls strictly before `today`.
///
/// `today` must be in sortable form. An empty due date is never overdue.
pub fn is_overdue(due_on: &str, today: &str) -> bool {
    let due_on = to_sortable(due_on);
    !due_on.is_empty() && due_on.as_str() < today
}

/// True when the due date is `today`. `today` must be in sortable form.
pub fn is_due_today(due_on: &str, today: &str) -> bool {
    let due_on = to_sortable(due_on);
    !due_on.is_empty() && due_on == today
}

fn parse_display(text: &str) -> Option<(&str, &str, &str)> {
    let mut parts = text.split('/');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    (is_digits(day, 1..=2) && is_digits(month, 1..=2) && is_digits(year, 4..=4))
        .then_some((day, month, year))
}

fn parse_sortable(text: &str) -> Option<(&str, &str, &str)> {
    let mut parts = text.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    (is_digits(year, 4..=4) && is_digits(month, 2..=2) && is_digits(day, 2..=2))
        .then_some((year, month, day))
}

fn is_digits(part: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod to_sortable_tests {
        use super::*;

        #[test]
        fn rewrites_display_form() {
            assert_eq!(to_sortable("01/03/2024"), "2024-03-01");
        }

        #[test]
        fn pads_single_digit_day_and_month() {
            assert_eq!(to_sortable("1/3/2024"), "2024-03-01");
            assert_eq!(to_sortable("5/11/2024"), "2024-11-05");
        }

        #[test]
        fn keeps_sortable_and_empty_input() {
            assert_eq!(to_sortable("2024-03-01"), "2024-03-01");
            assert_eq!(to_sortable(""), "");
        }

        #[test]
        fn passes_unrecognized_input_through() {
            for input in ["2024/03/01", "March 1st", "01/03/24", "aa/bb/cccc", "01/03/2024/1"] {
                assert_eq!(to_sortable(input), input);
            }
        }

        #[test]
        fn is_idempotent() {
            let once = to_sortable("07/12/2023");
            assert_eq!(to_sortable(&once), once);
        }
    }

    mod to_display_tests {
        use super::*;

        #[test]
        fn rewrites_sortable_form() {
            assert_eq!(to_display("2024-03-05"), "05/03/2024");
        }

        #[test]
        fn keeps_display_and_empty_input() {
            assert_eq!(to_display("05/03/2024"), "05/03/2024");
            assert_eq!(to_display(""), "");
        }

        #[test]
        fn passes_unrecognized_input_through() {
            for input in ["2024-3-5", "20240305", "yesterday", "2024-03-05T10:00"] {
                assert_eq!(to_display(input), input);
            }
        }

        #[test]
        fn is_idempotent() {
            let once = to_display("2023-12-07");
            assert_eq!(to_display(&once), once);
        }
    }

    #[test]
    fn round_trips_between_forms() {
        assert_eq!(to_sortable(&to_display("2024-02-29")), "2024-02-29");
        assert_eq!(to_display(&to_sortable("29/02/2024")), "29/02/2024");
    }

    mod due_date_tests {
        use super::*;

        const TODAY: &str = "2024-03-10";

        #[test]
        fn past_due_date_is_overdue() {
            assert!(is_overdue("2024-03-05", TODAY));
            assert!(!is_due_today("2024-03-05", TODAY));
        }

        #[test]
        fn due_today_is_not_overdue() {
            assert!(is_due_today("2024-03-10", TODAY));
            assert!(!is_overdue("2024-03-10", TODAY));
        }

        #[test]
        fn display_form_is_normalized_before_comparing() {
            // "05/04/2024" sorts before "2024-03-10" as raw text
            assert!(!is_overdue("05/04/2024", TODAY));
            assert!(is_due_today("10/03/2024", TODAY));
        }

        #[test]
        fn empty_due_date_is_neither() {
            assert!(!is_overdue("", TODAY));
            assert!(!is_due_today("", TODAY));
        }

        #[test]
        fn unrecognized_due_date_compares_as_raw_text() {
            // "Mañana" sorts after any digit, so it never reads as overdue
            assert!(!is_overdue("Mañana", TODAY));
        }
    }

    #[test]
    fn sortable_formats_calendar_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(sortable(date), "2024-03-01");
        assert_eq!(FixedClock(date).today(), date);
    }
}
