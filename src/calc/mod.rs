pub mod aggregate;
pub mod calendar;
pub mod time_convert;
pub mod workday;

pub use aggregate::{format_hours, leave_usage, tog_month_summary, LeaveUsage};
pub use calendar::{grid, MonthRef};
pub use time_convert::{from_decimal, to_decimal, HoursMinutes};
