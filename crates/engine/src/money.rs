use std::{fmt, str::FromStr};

use crate::EngineError;

/// An amount in minor units (hundredths), as typed by a treasurer or shown
/// back to one.
///
/// The ledgers store plain `i64` minor units; `Money` only exists at the
/// text boundary. Entered amounts carry no sign, since pledges, payments,
/// offerings and expenses are all positive. Rendered amounts may be negative
/// because a committee balance can be.
///
/// ```rust
/// use engine::Money;
///
/// let offering: Money = "1250,5".parse().unwrap();
/// assert_eq!(offering.minor(), 125_050);
/// assert_eq!(Money::new(-42_00).to_string(), "-42.00");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Money(i64);

impl Money {
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        if self.0 < 0 {
            f.write_str("-")?;
        }
        write!(f, "{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Accepts `units`, `units.d` or `units.dd`, with `,` allowed in place of
    /// `.`. Signs are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount(format!("not an amount: {s:?}"));

        let normalized = s.trim().replace(',', ".");
        let (units, cents) = match normalized.split_once('.') {
            Some((units, fraction)) => (units, fraction),
            None => (normalized.as_str(), ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if units.is_empty() || !all_digits(units) || !all_digits(cents) {
            return Err(invalid());
        }

        let cents = match cents.len() {
            0 => 0,
            1 => i64::from(cents.as_bytes()[0] - b'0') * 10,
            2 => cents.parse::<i64>().map_err(|_| invalid())?,
            _ => {
                return Err(EngineError::InvalidAmount(format!(
                    "at most two decimals allowed: {s:?}"
                )));
            }
        };
        units
            .parse::<i64>()
            .ok()
            .and_then(|units| units.checked_mul(100))
            .and_then(|minor| minor.checked_add(cents))
            .map(Money)
            .ok_or_else(|| EngineError::InvalidAmount(format!("amount too large: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_balances_with_two_decimals() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(580_000).to_string(), "5800.00");
        assert_eq!(Money::new(-150).to_string(), "-1.50");
        assert_eq!(Money::new(7).to_string(), "0.07");
    }

    #[test]
    fn parses_treasurer_input() {
        assert_eq!("1500".parse::<Money>().unwrap().minor(), 150_000);
        assert_eq!("1500.5".parse::<Money>().unwrap().minor(), 150_050);
        assert_eq!(" 20,05 ".parse::<Money>().unwrap().minor(), 2_005);
    }

    #[test]
    fn rejects_signs_and_malformed_amounts() {
        for raw in ["", "-10", "+10", "10.001", "1.2.3", ".50", "diez", "92233720368547758.08"] {
            assert!(raw.parse::<Money>().is_err(), "{raw} should not parse");
        }
    }
}
