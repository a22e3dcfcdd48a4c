//! Weekly and monthly expiration calendar.
//!
//! Equity options list weekly contracts expiring on Fridays and monthly
//! contracts expiring on the third Friday of the month.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use super::Expiration;

/// The Friday on or after `today` (weekends roll to the next Friday).
#[must_use]
pub fn closest_friday(today: NaiveDate) -> Expiration {
    let days_until = (7 + Weekday::Fri.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64)
        % 7;
    Expiration::new(today + Duration::days(days_until))
}

/// The next monthly expiration (third Friday) on or after `today`.
#[must_use]
pub fn next_monthly_expiration(today: NaiveDate) -> Expiration {
    let this_month = third_friday(today.year(), today.month());
    if let Some(date) = this_month
        && date >= today
    {
        return Expiration::new(date);
    }

    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    // The third Friday of a valid month always exists.
    third_friday(year, month).map_or_else(|| closest_friday(today), Expiration::new)
}

fn third_friday(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Fri, 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn closest_friday_midweek() {
        // Wednesday 2025-01-15 -> Friday 2025-01-17
        assert_eq!(closest_friday(date(2025, 1, 15)).date(), date(2025, 1, 17));
    }

    #[test]
    fn closest_friday_on_friday_is_today() {
        assert_eq!(closest_friday(date(2025, 1, 17)).date(), date(2025, 1, 17));
    }

    #[test]
    fn closest_friday_weekend_rolls_forward() {
        assert_eq!(closest_friday(date(2025, 1, 18)).date(), date(2025, 1, 24));
        assert_eq!(closest_friday(date(2025, 1, 19)).date(), date(2025, 1, 24));
    }

    #[test]
    fn monthly_expiration_this_month() {
        assert_eq!(
            next_monthly_expiration(date(2025, 1, 2)).date(),
            date(2025, 1, 17)
        );
        assert_eq!(
            next_monthly_expiration(date(2025, 1, 17)).date(),
            date(2025, 1, 17)
        );
    }

    #[test]
    fn monthly_expiration_rolls_to_next_month_and_year() {
        assert_eq!(
            next_monthly_expiration(date(2025, 1, 20)).date(),
            date(2025, 2, 21)
        );
        assert_eq!(
            next_monthly_expiration(date(2025, 12, 22)).date(),
            date(2026, 1, 16)
        );
    }
}
