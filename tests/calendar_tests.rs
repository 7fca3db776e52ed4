use chrono::{NaiveDate, Weekday};
use crop_calendar::calendar::{format_date, format_week_range, month_abbrev};
use crop_calendar::{Calendar, GregorianCalendar};
use std::cmp::Ordering;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn offsets_and_weeks() {
    let cal = GregorianCalendar;
    let start = d(2025, 9, 4);
    assert_eq!(cal.weekday(start), Weekday::Thu);
    assert_eq!(cal.add_days(start, 3), d(2025, 9, 7));
    assert_eq!(cal.add_weeks(start, 10), d(2025, 11, 13));
    assert_eq!(cal.compare(start, d(2025, 9, 5)), Ordering::Less);
    assert_eq!(cal.days_between(d(2025, 9, 5), start), -1);
}

#[test]
fn display_formats() {
    assert_eq!(format_date(d(2026, 3, 16)), "16/03/2026");
    assert_eq!(month_abbrev(d(2025, 9, 1)), "sept");
    assert_eq!(
        format_week_range(d(2025, 9, 4), d(2025, 9, 10)),
        "04 sept - 10 sept 2025"
    );
}
