//! Conversions between clock time (hours + minutes) and decimal hours.
//!
//! `to_decimal` rounds to hundredths of an hour, so a value can be up to
//! 0.005 h (0.3 min) away from the exact fraction. That is always less than
//! half a minute, which is why `from_decimal(to_decimal(h, m))` gives back
//! `(h, m)` for every whole-minute input.

use crate::errors::{CoreError, CoreResult, ValidationKind};
use anyhow::{bail, Context};

/// Decimal hours held as an exact number of hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DecimalHours(i64);

impl DecimalHours {
    pub fn from_hundredths(hundredths: i64) -> Self {
        DecimalHours(hundredths)
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl std::fmt::Display for DecimalHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoursMinutes {
    pub hours: u32,
    pub minutes: u32,
}

impl std::fmt::Display for HoursMinutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

impl std::str::FromStr for HoursMinutes {
    type Err = anyhow::Error;

    /// Accepts `H:MM`.
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (h, m) = s
            .trim()
            .split_once(':')
            .with_context(|| format!("expected H:MM, got '{s}'"))?;
        let hours: u32 = h.trim().parse().with_context(|| format!("bad hours in '{s}'"))?;
        let minutes: u32 = m.trim().parse().with_context(|| format!("bad minutes in '{s}'"))?;
        if minutes >= 60 {
            bail!("minutes must be below 60 in '{s}'");
        }
        Ok(HoursMinutes { hours, minutes })
    }
}

/// `hours + minutes / 60`, rounded half-up to two decimal places.
pub fn to_decimal(hours: u32, minutes: u32) -> CoreResult<DecimalHours> {
    if minutes >= 60 {
        return Err(CoreError::Validation(ValidationKind::MinutesOutOfRange));
    }
    let total_minutes = i64::from(hours) * 60 + i64::from(minutes);
    // integer half-up: floor((x * 100 + 30) / 60)
    Ok(DecimalHours((total_minutes * 100 + 30) / 60))
}

/// Whole hours plus the fraction rounded to the nearest minute; 60 carries
/// into the hours.
pub fn from_decimal(value: f64) -> CoreResult<HoursMinutes> {
    if !value.is_finite() || value > f64::from(u32::MAX) {
        return Err(CoreError::Validation(ValidationKind::NonFiniteNumber));
    }
    if value < 0.0 {
        return Err(CoreError::Validation(ValidationKind::NegativeHours));
    }
    let whole = value.floor();
    let mut hours = whole as u32;
    let mut minutes = ((value - whole) * 60.0).round() as u32;
    if minutes == 60 {
        hours += 1;
        minutes = 0;
    }
    Ok(HoursMinutes { hours, minutes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_half_hour() {
        let v = to_decimal(1, 30).unwrap();
        assert_eq!(v, DecimalHours::from_hundredths(150));
        assert_eq!(v.to_string(), "1.50");
        assert_eq!(v.as_f64(), 1.5);
    }

    #[test]
    fn test_from_decimal_half_hour() {
        assert_eq!(
            from_decimal(1.50).unwrap(),
            HoursMinutes {
                hours: 1,
                minutes: 30
            }
        );
    }

    #[test]
    fn test_to_decimal_rounds_half_up() {
        // 1 min = 0.01666.. -> 0.02
        assert_eq!(to_decimal(0, 1).unwrap(), DecimalHours::from_hundredths(2));
        // 20 min = 0.3333.. -> 0.33
        assert_eq!(to_decimal(0, 20).unwrap(), DecimalHours::from_hundredths(33));
        // 3 min = 0.05 exactly
        assert_eq!(to_decimal(0, 3).unwrap(), DecimalHours::from_hundredths(5));
        // 40 min = 0.6666.. -> 0.67
        assert_eq!(to_decimal(2, 40).unwrap().to_string(), "2.67");
    }

    #[test]
    fn test_to_decimal_rejects_minutes_out_of_range() {
        assert_eq!(
            to_decimal(1, 60),
            Err(CoreError::Validation(ValidationKind::MinutesOutOfRange))
        );
    }

    #[test]
    fn test_from_decimal_carries_sixty_minutes() {
        // 0.999 h = 59.94 min -> 60 -> carry
        assert_eq!(
            from_decimal(1.999).unwrap(),
            HoursMinutes {
                hours: 2,
                minutes: 0
            }
        );
    }

    #[test]
    fn test_from_decimal_rejects_bad_input() {
        assert_eq!(
            from_decimal(-0.5),
            Err(CoreError::Validation(ValidationKind::NegativeHours))
        );
        assert_eq!(
            from_decimal(f64::NAN),
            Err(CoreError::Validation(ValidationKind::NonFiniteNumber))
        );
    }

    #[test]
    fn test_round_trip_every_minute() {
        for hours in 0..25 {
            for minutes in 0..60 {
                let dec = to_decimal(hours, minutes).unwrap();
                let back = from_decimal(dec.as_f64()).unwrap();
                assert_eq!(back, HoursMinutes { hours, minutes }, "{hours}:{minutes:02} -> {dec}");
            }
        }
    }

    #[test]
    fn test_parse_hours_minutes() {
        let hm: HoursMinutes = "7:45".parse().unwrap();
        assert_eq!(hm, HoursMinutes { hours: 7, minutes: 45 });
        assert!("7:75".parse::<HoursMinutes>().is_err());
        assert!("7.45".parse::<HoursMinutes>().is_err());
    }

    #[test]
    fn test_hours_minutes_display() {
        assert_eq!(HoursMinutes { hours: 3, minutes: 5 }.to_string(), "3h 5m");
    }

    #[test]
    fn test_decimal_display_pads_cents() {
        assert_eq!(DecimalHours::from_hundredths(805).to_string(), "8.05");
        assert_eq!(DecimalHours::from_hundredths(0).to_string(), "0.00");
        assert_eq!(DecimalHours::from_hundredths(-5).to_string(), "-0.05");
    }
}
