//! National holiday lookup
//!
//! Only Japan is supported. Rules follow the Act on National Holidays as
//! amended through 2021, including the Olympic-year moves in 2020 and 2021
//! and the 2019 enthronement holidays. Equinox dates use the usual
//! astronomical approximation, which holds for 1980-2099.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Source of national holidays for `is_holiday` features
pub trait HolidayCalendar: Send + Sync {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

/// Calendar without any holidays
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidayCalendar for NoHolidays {
    fn is_holiday(&self, _date: NaiveDate) -> bool {
        false
    }
}

/// Japanese national holidays, including substitute and citizens' holidays
#[derive(Debug, Clone, Copy, Default)]
pub struct JapaneseHolidays;

impl HolidayCalendar for JapaneseHolidays {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        is_statutory_holiday(date) || is_substitute_holiday(date) || is_citizens_holiday(date)
    }
}

/// Resolve a calendar from an ISO country code
pub fn calendar_for_country(code: &str) -> Option<Box<dyn HolidayCalendar>> {
    match code.to_ascii_uppercase().as_str() {
        "JP" => Some(Box::new(JapaneseHolidays)),
        "NONE" | "" => Some(Box::new(NoHolidays)),
        _ => None,
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn nth_monday(year: i32, month: u32, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Mon, n)
}

fn vernal_equinox_day(year: i32) -> u32 {
    let y = (year - 1980) as f64;
    (20.8431 + 0.242194 * y - (y / 4.0).floor()).floor() as u32
}

fn autumnal_equinox_day(year: i32) -> u32 {
    let y = (year - 1980) as f64;
    (23.2488 + 0.242194 * y - (y / 4.0).floor()).floor() as u32
}

/// Holidays named directly by the statute for `year`
fn statutory_holidays(year: i32) -> Vec<NaiveDate> {
    let mut days = vec![
        ymd(year, 1, 1),
        ymd(year, 2, 11),
        ymd(year, 3, vernal_equinox_day(year)),
        ymd(year, 4, 29),
        ymd(year, 5, 3),
        ymd(year, 5, 4),
        ymd(year, 5, 5),
        ymd(year, 9, autumnal_equinox_day(year)),
        ymd(year, 11, 3),
        ymd(year, 11, 23),
        nth_monday(year, 1, 2),
        nth_monday(year, 9, 3),
    ];

    // Emperor's Birthday
    if year >= 2020 {
        days.push(ymd(year, 2, 23));
    } else if (1989..=2018).contains(&year) {
        days.push(ymd(year, 12, 23));
    }

    // Marine Day, Sports Day and Mountain Day moved for the Tokyo Olympics
    match year {
        2020 => days.extend([ymd(2020, 7, 23), ymd(2020, 7, 24), ymd(2020, 8, 10)]),
        2021 => days.extend([ymd(2021, 7, 22), ymd(2021, 7, 23), ymd(2021, 8, 8)]),
        _ => {
            days.push(nth_monday(year, 7, 3));
            days.push(nth_monday(year, 10, 2));
            if year >= 2016 {
                days.push(ymd(year, 8, 11));
            }
        }
    }

    if year == 2019 {
        days.extend([ymd(2019, 5, 1), ymd(2019, 10, 22)]);
    }

    days.into_iter().flatten().collect()
}

fn is_statutory_holiday(date: NaiveDate) -> bool {
    statutory_holidays(date.year()).contains(&date)
}

/// First non-holiday following a holiday that fell on a Sunday
fn is_substitute_holiday(date: NaiveDate) -> bool {
    if is_statutory_holiday(date) {
        return false;
    }
    let mut previous = date - Duration::days(1);
    while is_statutory_holiday(previous) {
        if previous.weekday() == Weekday::Sun {
            return true;
        }
        previous -= Duration::days(1);
    }
    false
}

/// Ordinary day sandwiched between two statutory holidays
fn is_citizens_holiday(date: NaiveDate) -> bool {
    date.weekday() != Weekday::Sun
        && !is_statutory_holiday(date)
        && is_statutory_holiday(date - Duration::days(1))
        && is_statutory_holiday(date + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_and_happy_monday_holidays() {
        let jp = JapaneseHolidays;
        assert!(jp.is_holiday(date(2024, 1, 1)));
        assert!(jp.is_holiday(date(2024, 1, 8))); // Coming of Age Day
        assert!(jp.is_holiday(date(2024, 7, 15))); // Marine Day
        assert!(jp.is_holiday(date(2024, 9, 16))); // Respect for the Aged Day
        assert!(jp.is_holiday(date(2024, 10, 14))); // Sports Day
        assert!(jp.is_holiday(date(2024, 2, 23)));
        assert!(!jp.is_holiday(date(2024, 12, 23)));
    }

    #[test]
    fn test_equinox_days() {
        let jp = JapaneseHolidays;
        assert!(jp.is_holiday(date(2024, 3, 20)));
        assert!(!jp.is_holiday(date(2024, 3, 21)));
        assert!(jp.is_holiday(date(2024, 9, 22)));
        assert!(jp.is_holiday(date(2025, 3, 20)));
        assert!(jp.is_holiday(date(2025, 9, 23)));
    }

    #[test]
    fn test_substitute_holidays() {
        let jp = JapaneseHolidays;
        // National Foundation Day 2024 fell on a Sunday
        assert!(jp.is_holiday(date(2024, 2, 12)));
        // Children's Day 2024 fell on a Sunday after a run of holidays
        assert!(jp.is_holiday(date(2024, 5, 6)));
        assert!(!jp.is_holiday(date(2024, 5, 7)));
    }

    #[test]
    fn test_citizens_holiday_between_two_holidays() {
        let jp = JapaneseHolidays;
        // Respect for the Aged Day (21st) and the autumnal equinox (23rd)
        assert!(jp.is_holiday(date(2026, 9, 22)));
    }

    #[test]
    fn test_olympic_year_moves() {
        let jp = JapaneseHolidays;
        assert!(jp.is_holiday(date(2021, 7, 22)));
        assert!(jp.is_holiday(date(2021, 7, 23)));
        assert!(!jp.is_holiday(date(2021, 7, 19)));
        assert!(jp.is_holiday(date(2021, 8, 9))); // substitute for the 8th
    }

    #[test]
    fn test_calendar_lookup() {
        assert!(calendar_for_country("jp").is_some());
        assert!(calendar_for_country("JP").unwrap().is_holiday(date(2024, 1, 1)));
        assert!(!calendar_for_country("none").unwrap().is_holiday(date(2024, 1, 1)));
        assert!(calendar_for_country("SE").is_none());
    }
}
