use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::cmp::Ordering;

/// Date arithmetic used by the event rules. Rules only speak in day and week
/// offsets; everything calendar-specific stays behind this trait.
pub trait Calendar {
    fn add_days(&self, date: NaiveDate, days: i64) -> NaiveDate;

    fn add_weeks(&self, date: NaiveDate, weeks: i64) -> NaiveDate {
        self.add_days(date, weeks * 7)
    }

    fn compare(&self, a: NaiveDate, b: NaiveDate) -> Ordering {
        a.cmp(&b)
    }

    fn weekday(&self, date: NaiveDate) -> Weekday;

    /// Signed number of days from `from` to `to`.
    fn days_between(&self, from: NaiveDate, to: NaiveDate) -> i64;
}

/// Proleptic Gregorian calendar backed by chrono.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GregorianCalendar;

impl Calendar for GregorianCalendar {
    fn add_days(&self, date: NaiveDate, days: i64) -> NaiveDate {
        date + Duration::days(days)
    }

    fn weekday(&self, date: NaiveDate) -> Weekday {
        date.weekday()
    }

    fn days_between(&self, from: NaiveDate, to: NaiveDate) -> i64 {
        (to - from).num_days()
    }
}

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

const WEEKDAYS_ES: [&str; 7] = [
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
    "domingo",
];

/// Spanish abbreviated month name for a date.
pub fn month_abbrev(date: NaiveDate) -> &'static str {
    MONTHS_ES[date.month0() as usize]
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAYS_ES[weekday.num_days_from_monday() as usize]
}

/// `dd/MM/yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `dd MMM - dd MMM yyyy`, e.g. `04 sept - 10 sept 2025`.
pub fn format_week_range(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{:02} {} - {:02} {} {}",
        start.day(),
        month_abbrev(start),
        end.day(),
        month_abbrev(end),
        end.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn add_weeks_crosses_year_boundary() {
        let cal = GregorianCalendar;
        assert_eq!(cal.add_weeks(d(2025, 12, 25), 1), d(2026, 1, 1));
        assert_eq!(cal.days_between(d(2025, 9, 4), d(2026, 3, 16)), 193);
    }

    #[test]
    fn week_range_uses_spanish_months() {
        assert_eq!(
            format_week_range(d(2025, 12, 29), d(2026, 1, 4)),
            "29 dic - 04 ene 2026"
        );
        assert_eq!(format_date(d(2025, 9, 4)), "04/09/2025");
        assert_eq!(weekday_name(GregorianCalendar.weekday(d(2025, 9, 4))), "jueves");
    }
}
