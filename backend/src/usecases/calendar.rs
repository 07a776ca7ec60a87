use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Utc, Weekday};

pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(first_of_next.pred_opt()?.day())
}

/// Builds a date in the given month, pulling the day back to the month's last
/// day when it does not exist (e.g. day 31 in February).
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = last_day_of_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.min(last))
}

/// Steps `months` months forward from `date`, clamping the day of month.
pub fn months_after(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = date.year() * 12 + date.month0() as i32 + months as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;

    clamped_date(year, month, date.day())
}

/// The calendar date at the school's UTC offset. An out-of-range offset
/// falls back to the UTC date.
pub fn local_today(now: DateTime<Utc>, offset_hours: i32) -> NaiveDate {
    match FixedOffset::east_opt(offset_hours * 3600) {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => now.date_naive(),
    }
}

/// First weekday of the month: the 1st pushed past any weekend.
pub fn first_business_day(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;

    match first.weekday() {
        Weekday::Sat => first.checked_add_days(Days::new(2)),
        Weekday::Sun => first.checked_add_days(Days::new(1)),
        _ => Some(first),
    }
}
