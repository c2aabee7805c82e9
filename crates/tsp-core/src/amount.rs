use std::fmt::Display;
use std::fmt::Formatter;
use std::iter::Sum;
use std::ops::Add;

/// Money in minor units (paise).
///
/// Ledger arithmetic stays in integers so that shares, advances and
/// running totals never drift. On the wire an amount is a JSON number
/// in rupees with at most two decimals, which is what the mobile client
/// renders directly.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub const fn paise(minor: i64) -> Self {
        Self(minor)
    }
    pub const fn rupees(major: i64) -> Self {
        Self(major * 100)
    }
    pub const fn minor(&self) -> i64 {
        self.0
    }
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
    /// Equal split across `n` players, rounded half-up to the paisa.
    pub fn share(&self, n: u32) -> Self {
        let n = i128::from(n.max(1));
        Self::clamped((2 * i128::from(self.0) + n).div_euclid(2 * n))
    }
    /// `pct` percent of this amount, rounded half-up to the paisa.
    /// Saturates at the `i64` range.
    pub fn percent(&self, pct: i64) -> Self {
        Self::clamped((2 * i128::from(self.0) * i128::from(pct) + 100).div_euclid(200))
    }
    fn clamped(minor: i128) -> Self {
        Self(minor.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }
    /// Difference floored at zero.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0).max(0))
    }
    /// Major units as a float, for wire formats.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.
    }
    /// Rounds a float in major units to the nearest paisa.
    /// Rejects non-finite values and anything beyond `i64` range.
    pub fn from_f64(major: f64) -> Option<Self> {
        let minor = (major * 100.).round();
        (minor.is_finite() && minor.abs() < i64::MAX as f64).then(|| Self(minor as i64))
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}
impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl TryFrom<&str> for Amount {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.trim()
            .parse::<f64>()
            .ok()
            .and_then(Self::from_f64)
            .ok_or_else(|| format!("invalid amount: {}", s))
    }
}

impl serde::Serialize for Amount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Accepts a JSON number or a numeric string, as the booking form may send either.
impl<'de> serde::Deserialize<'de> for Amount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(f64),
            Text(String),
        }
        match Wire::deserialize(deserializer)? {
            Wire::Number(x) => Self::from_f64(x)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {}", x))),
            Wire::Text(s) => Self::try_from(s.as_str()).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn share_divides_evenly() {
        assert_eq!(Amount::rupees(1200).share(4), Amount::rupees(300));
    }
    #[test]
    fn share_rounds_half_up() {
        assert_eq!(Amount::rupees(1000).share(3), Amount::paise(33333));
        assert_eq!(Amount::paise(5).share(2), Amount::paise(3));
    }
    #[test]
    fn share_of_one_is_whole() {
        assert_eq!(Amount::paise(99999).share(1), Amount::paise(99999));
    }
    #[test]
    fn advance_is_twenty_percent() {
        assert_eq!(Amount::rupees(1200).percent(20), Amount::rupees(240));
        assert_eq!(Amount::paise(1001).percent(20), Amount::paise(200));
    }
    #[test]
    fn huge_amounts_do_not_overflow() {
        let huge = Amount::paise(i64::MAX);
        assert_eq!(huge.percent(20), Amount::paise(i64::MAX / 5));
        assert_eq!(huge.percent(200), huge);
        assert_eq!(huge.share(1), huge);
        assert_eq!(huge.share(2), Amount::paise(i64::MAX / 2 + 1));
    }
    #[test]
    fn display_has_two_decimals() {
        assert_eq!(Amount::paise(120005).to_string(), "1200.05");
        assert_eq!(Amount::paise(-250).to_string(), "-2.50");
    }
    #[test]
    fn sums_and_saturates() {
        let total: Amount = [Amount::rupees(1), Amount::paise(50)].iter().sum();
        assert_eq!(total, Amount::paise(150));
        assert_eq!(Amount::rupees(1).saturating_sub(Amount::rupees(2)), Amount::ZERO);
    }
    #[test]
    fn wire_accepts_numbers_and_strings() {
        let a: Amount = serde_json::from_str("1200.5").unwrap();
        let b: Amount = serde_json::from_str("\"333.33\"").unwrap();
        assert_eq!(a, Amount::paise(120050));
        assert_eq!(b, Amount::paise(33333));
        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
        assert_eq!(serde_json::to_string(&Amount::rupees(300)).unwrap(), "300.0");
    }
}
