use chrono::{Datelike, NaiveDate, Weekday};

/// True for Saturday and Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every date in [a, b] inclusive, ascending, whichever order the ends come in.
pub fn dates_between(a: NaiveDate, b: NaiveDate) -> Vec<NaiveDate> {
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Splits a list of dates into (weekdays, weekend days), preserving order.
pub fn partition_weekends(dates: &[NaiveDate]) -> (Vec<NaiveDate>, Vec<NaiveDate>) {
    dates.iter().partition(|d| !is_weekend(**d))
}
