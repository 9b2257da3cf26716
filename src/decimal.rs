use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// Money in Kenyan shillings, kept at full decimal precision.
///
/// Arithmetic never rounds. Rounding happens only when formatting for
/// display (`format_kes`, `format_kes_whole`). On the wire money is a
/// plain JSON number, which is what the backend sends and expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE: Money = Money(Decimal::ONE);

    /// create from decimal
    pub const fn from_decimal(d: Decimal) -> Self {
        Money(d)
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s.trim())?))
    }

    /// create from whole shillings
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from cents
    pub fn from_minor(amount: i64) -> Self {
        Money(Decimal::new(amount, 2))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to specified decimal places, half away from zero
    pub fn round_dp(&self, dp: u32) -> Self {
        Money(self.0.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// saturating subtraction floored at zero
    pub fn saturating_sub(self, other: Self) -> Self {
        (self - other).max(Money::ZERO)
    }

    /// take a percentage of this amount (e.g. 50% of basic salary)
    pub fn percentage(&self, rate: Rate) -> Self {
        Money(self.0 * rate.as_fraction())
    }

    /// `KSh 1,030.00`
    pub fn format_kes(&self) -> String {
        format_with_prefix("KSh ", self.0, 2)
    }

    /// `KSh 1,030`, the wallet balance style
    pub fn format_kes_whole(&self) -> String {
        format_with_prefix("KSh ", self.0, 0)
    }
}

fn format_with_prefix(prefix: &str, value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.*}", dp as usize, rounded.abs());
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let mut out = format!("{}{}{}", sign, prefix, group_thousands(&whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(&fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// serialize as a json number; whole values go out as integers
fn serialize_number<S: Serializer>(value: Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract().is_zero() {
        if let Some(whole) = value.to_i64() {
            return serializer.serialize_i64(whole);
        }
    }
    match value.to_f64() {
        Some(f) => serializer.serialize_f64(f),
        None => Err(serde::ser::Error::custom(format!(
            "decimal {} is not representable as a json number",
            value
        ))),
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_number(self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    // accepts json numbers and numeric strings
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl From<u32> for Money {
    fn from(i: u32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money(self.0 * other)
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money(self.0 / other)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

/// a percentage, stored the way the backend sends it (1 means 1%)
///
/// Interest rates are percent per repayment period (per month); salary
/// caps such as `maxAdvancePercentage` are percent of basic salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from a percent value (e.g. 1.5 for 1.5%)
    pub fn from_percent(p: Decimal) -> Self {
        Rate(p)
    }

    /// create from a whole percent (e.g. 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p))
    }

    /// create from a fraction (e.g. 0.05 for 5%)
    pub fn from_fraction(f: Decimal) -> Self {
        Rate(f * Decimal::ONE_HUNDRED)
    }

    /// percent value
    pub fn as_percent(&self) -> Decimal {
        self.0
    }

    /// fraction value (percent / 100)
    pub fn as_fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_number(self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Rate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Rate)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_percent(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_keeps_full_precision() {
        let m = Money::from_major(1030) / dec!(3);
        assert!(m.as_decimal() > dec!(343.3333333333));
        assert!(m.as_decimal() < dec!(343.3333333334));
    }

    #[test]
    fn test_kes_formatting() {
        assert_eq!(Money::from_major(1030).format_kes(), "KSh 1,030.00");
        assert_eq!(Money::from_major(150_000).format_kes_whole(), "KSh 150,000");
        assert_eq!(Money::from_major(999).format_kes_whole(), "KSh 999");
        assert_eq!(Money::from_major(1_234_567).format_kes(), "KSh 1,234,567.00");

        let third = Money::from_major(1030) / dec!(3);
        assert_eq!(third.format_kes(), "KSh 343.33");

        let half = Money::from_str_exact("0.125").unwrap();
        assert_eq!(half.format_kes(), "KSh 0.13");

        assert_eq!(Money::from_major(-5).format_kes(), "-KSh 5.00");
    }

    #[test]
    fn test_money_wire_format() {
        let json = serde_json::to_string(&Money::from_major(1000)).unwrap();
        assert_eq!(json, "1000");

        let json = serde_json::to_string(&Money::from_minor(150)).unwrap();
        assert_eq!(json, "1.5");

        let from_number: Money = serde_json::from_str("2500.5").unwrap();
        assert_eq!(from_number, Money::from_str_exact("2500.5").unwrap());

        let from_string: Money = serde_json::from_str("\"2500\"").unwrap();
        assert_eq!(from_string, Money::from_major(2500));
    }

    #[test]
    fn test_percentage_of_salary() {
        let salary = Money::from_major(50_000);
        let cap = salary.percentage(Rate::from_percentage(50));
        assert_eq!(cap, Money::from_major(25_000));
    }

    #[test]
    fn test_rate_conversions() {
        let rate = Rate::from_percent(dec!(1.5));
        assert_eq!(rate.as_fraction(), dec!(0.015));
        assert_eq!(Rate::from_fraction(dec!(0.015)), rate);
        assert_eq!(rate.to_string(), "1.5%");
    }

    #[test]
    fn test_saturating_sub() {
        let a = Money::from_major(100);
        let b = Money::from_major(250);
        assert_eq!(a.saturating_sub(b), Money::ZERO);
        assert_eq!(b.saturating_sub(a), Money::from_major(150));
    }
}
