//! Physical quantities with run-time dimensional analysis.
//!
//! A [`Quantity`] pairs an `f64` magnitude with a [`Unit`]. Every unit carries
//! a scale factor to SI and a [`Dimension`]: one rational exponent per base
//! dimension. Addition, subtraction, comparison and conversion require equal
//! dimensions and fail with [`UnitMismatch`] otherwise. Multiplication and
//! division always succeed and combine dimensions.
//!
//! # Simplification rules
//!
//! - A result with no remaining dimension collapses to the unit `1`
//!   (`120 W / 120 W` is `1`, not `W/W`).
//! - Multiplying or dividing by a dimensionless quantity keeps the other
//!   operand's unit (`0.5 * 26.7 N` is `13.35 N`).
//! - Anything else builds a derived unit whose symbol records the operation
//!   (`ft/s * ms` is `(ft/s)·ms`, a length).

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// An operation combined two quantities of incompatible dimensions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unit mismatch in {operation}: '{left}' [{left_dimension}] vs '{right}' [{right_dimension}]")]
pub struct UnitMismatch {
    pub operation: &'static str,
    pub left: String,
    pub left_dimension: Dimension,
    pub right: String,
    pub right_dimension: Dimension,
}

impl UnitMismatch {
    fn new(operation: &'static str, left: &Unit, right: &Unit) -> Self {
        Self {
            operation,
            left: left.symbol().to_string(),
            left_dimension: left.dimension,
            right: right.symbol().to_string(),
            right_dimension: right.dimension,
        }
    }
}

/// Errors from parsing a textual quantity such as `"0.1 m/s"`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuantityParseError {
    #[error("empty quantity")]
    Empty,
    #[error("invalid numeric value '{0}'")]
    InvalidValue(String),
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),
}

// ---------------------------------------------------------------------------
// Rational exponents
// ---------------------------------------------------------------------------

/// A reduced fraction with a positive denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    num: i32,
    den: i32,
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Rational {
    pub const ZERO: Self = Self::int(0);
    pub const ONE: Self = Self::int(1);

    /// A whole-number exponent.
    pub const fn int(n: i32) -> Self {
        Self { num: n, den: 1 }
    }

    /// The reduced fraction `num / den`, or `None` when `den` is zero.
    pub fn new(num: i32, den: i32) -> Option<Self> {
        if den == 0 {
            return None;
        }
        Some(Self::reduce(num as i64, den as i64))
    }

    fn reduce(num: i64, den: i64) -> Self {
        let g = gcd(num, den).max(1);
        let sign = if den < 0 { -1 } else { 1 };
        Self {
            num: (sign * num / g) as i32,
            den: (sign * den / g) as i32,
        }
    }

    /// Numerator; carries the sign.
    pub fn numer(self) -> i32 {
        self.num
    }

    /// Denominator, always positive.
    pub fn denom(self) -> i32 {
        self.den
    }

    pub fn is_zero(self) -> bool {
        self.num == 0
    }

    /// Nearest `f64` to the fraction.
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl Add for Rational {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::reduce(
            self.num as i64 * rhs.den as i64 + rhs.num as i64 * self.den as i64,
            self.den as i64 * rhs.den as i64,
        )
    }
}

impl Sub for Rational {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::reduce(
            self.num as i64 * rhs.num as i64,
            self.den as i64 * rhs.den as i64,
        )
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            num: -self.num,
            den: self.den,
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// Base dimensions tracked by [`Dimension`]. Plane angle is tracked as its own
/// base so that bearings cannot be mixed with plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseDimension {
    Length,
    Mass,
    Time,
    Current,
    Temperature,
    Amount,
    Luminosity,
    Angle,
}

/// Number of base dimensions.
pub const BASE_DIMENSIONS: usize = 8;

const BASE_SYMBOLS: [&str; BASE_DIMENSIONS] = ["L", "M", "T", "I", "Θ", "N", "J", "A"];

/// The exponent vector of a physical dimension, e.g. speed is `L·T^-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension([Rational; BASE_DIMENSIONS]);

impl Dimension {
    pub const DIMENSIONLESS: Self = Self::from_ints([0, 0, 0, 0, 0, 0, 0, 0]);
    pub const LENGTH: Self = Self::from_ints([1, 0, 0, 0, 0, 0, 0, 0]);
    pub const MASS: Self = Self::from_ints([0, 1, 0, 0, 0, 0, 0, 0]);
    pub const TIME: Self = Self::from_ints([0, 0, 1, 0, 0, 0, 0, 0]);
    pub const CURRENT: Self = Self::from_ints([0, 0, 0, 1, 0, 0, 0, 0]);
    pub const ANGLE: Self = Self::from_ints([0, 0, 0, 0, 0, 0, 0, 1]);
    pub const SPEED: Self = Self::from_ints([1, 0, -1, 0, 0, 0, 0, 0]);
    pub const FORCE: Self = Self::from_ints([1, 1, -2, 0, 0, 0, 0, 0]);
    pub const ENERGY: Self = Self::from_ints([2, 1, -2, 0, 0, 0, 0, 0]);
    pub const POWER: Self = Self::from_ints([2, 1, -3, 0, 0, 0, 0, 0]);
    pub const VOLTAGE: Self = Self::from_ints([2, 1, -3, -1, 0, 0, 0, 0]);

    /// Build a dimension from whole-number exponents, ordered as
    /// [`BaseDimension`].
    pub const fn from_ints(exponents: [i32; BASE_DIMENSIONS]) -> Self {
        let mut out = [Rational::ZERO; BASE_DIMENSIONS];
        let mut i = 0;
        while i < BASE_DIMENSIONS {
            out[i] = Rational::int(exponents[i]);
            i += 1;
        }
        Self(out)
    }

    /// Exponent of one base dimension.
    pub fn exponent(&self, base: BaseDimension) -> Rational {
        self.0[base as usize]
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0.iter().all(|e| e.is_zero())
    }

    fn zip(&self, other: &Self, f: impl Fn(Rational, Rational) -> Rational) -> Self {
        let mut out = self.0;
        for (slot, rhs) in out.iter_mut().zip(other.0.iter()) {
            *slot = f(*slot, *rhs);
        }
        Self(out)
    }

    /// Dimension of a product.
    pub fn mul(&self, other: &Self) -> Self {
        self.zip(other, |a, b| a + b)
    }

    /// Dimension of a quotient.
    pub fn div(&self, other: &Self) -> Self {
        self.zip(other, |a, b| a - b)
    }

    /// Dimension raised to a rational power.
    pub fn pow(&self, exponent: Rational) -> Self {
        let mut out = self.0;
        for slot in out.iter_mut() {
            *slot = *slot * exponent;
        }
        Self(out)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }
        let mut first = true;
        for (exp, symbol) in self.0.iter().zip(BASE_SYMBOLS) {
            if exp.is_zero() {
                continue;
            }
            if !first {
                write!(f, "·")?;
            }
            first = false;
            if *exp == Rational::ONE {
                write!(f, "{symbol}")?;
            } else {
                write!(f, "{symbol}^{exp}")?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// A measurement unit: a symbol, a scale factor to SI and a dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    symbol: Cow<'static, str>,
    scale: f64,
    dimension: Dimension,
}

fn grouped<'a>(symbol: &'a str, separators: &[char]) -> Cow<'a, str> {
    if symbol.contains(separators) {
        Cow::Owned(format!("({symbol})"))
    } else {
        Cow::Borrowed(symbol)
    }
}

impl Unit {
    /// A named unit with a fixed symbol.
    pub const fn new(symbol: &'static str, scale: f64, dimension: Dimension) -> Self {
        Self {
            symbol: Cow::Borrowed(symbol),
            scale,
            dimension,
        }
    }

    /// A unit with a computed symbol, used for products and quotients.
    pub fn derived(symbol: String, scale: f64, dimension: Dimension) -> Self {
        Self {
            symbol: Cow::Owned(symbol),
            scale,
            dimension,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Multiplier converting a value in this unit to SI.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// True when both units measure the same dimension.
    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    /// `self·other`, with compound operands parenthesised.
    pub fn product(&self, other: &Unit) -> Unit {
        Unit::derived(
            format!(
                "{}·{}",
                grouped(self.symbol(), &['/']),
                grouped(other.symbol(), &['/'])
            ),
            self.scale * other.scale,
            self.dimension.mul(&other.dimension),
        )
    }

    /// `self/other`, with compound operands parenthesised.
    pub fn quotient(&self, other: &Unit) -> Unit {
        Unit::derived(
            format!(
                "{}/{}",
                grouped(self.symbol(), &['/']),
                grouped(other.symbol(), &['/', '·'])
            ),
            self.scale / other.scale,
            self.dimension.div(&other.dimension),
        )
    }

    /// `self^exponent`.
    pub fn pow(&self, exponent: Rational) -> Unit {
        Unit::derived(
            format!("{}^{}", grouped(self.symbol(), &['/', '·', '^']), exponent),
            self.scale.powf(exponent.to_f64()),
            self.dimension.pow(exponent),
        )
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

/// The unit catalogue.
pub mod units {
    use super::{Dimension, Unit};
    use std::f64::consts::PI;

    pub const ONE: Unit = Unit::new("1", 1.0, Dimension::DIMENSIONLESS);

    pub const METRE: Unit = Unit::new("m", 1.0, Dimension::LENGTH);
    pub const KILOMETRE: Unit = Unit::new("km", 1000.0, Dimension::LENGTH);
    pub const FOOT: Unit = Unit::new("ft", 0.3048, Dimension::LENGTH);
    pub const NAUTICAL_MILE: Unit = Unit::new("nmi", 1852.0, Dimension::LENGTH);

    pub const SECOND: Unit = Unit::new("s", 1.0, Dimension::TIME);
    pub const MILLISECOND: Unit = Unit::new("ms", 1e-3, Dimension::TIME);
    pub const MINUTE: Unit = Unit::new("min", 60.0, Dimension::TIME);
    pub const HOUR: Unit = Unit::new("h", 3600.0, Dimension::TIME);

    pub const METRE_PER_SECOND: Unit = Unit::new("m/s", 1.0, Dimension::SPEED);
    pub const FOOT_PER_SECOND: Unit = Unit::new("ft/s", 0.3048, Dimension::SPEED);
    pub const KNOT: Unit = Unit::new("kn", 1852.0 / 3600.0, Dimension::SPEED);
    pub const KILOMETRE_PER_HOUR: Unit = Unit::new("km/h", 1000.0 / 3600.0, Dimension::SPEED);

    pub const NEWTON: Unit = Unit::new("N", 1.0, Dimension::FORCE);
    pub const POUND_FORCE: Unit = Unit::new("lbf", 4.448_221_615_260_5, Dimension::FORCE);

    pub const JOULE: Unit = Unit::new("J", 1.0, Dimension::ENERGY);
    pub const WATT_HOUR: Unit = Unit::new("Wh", 3600.0, Dimension::ENERGY);
    pub const WATT: Unit = Unit::new("W", 1.0, Dimension::POWER);
    pub const VOLT: Unit = Unit::new("V", 1.0, Dimension::VOLTAGE);

    pub const KILOGRAM: Unit = Unit::new("kg", 1.0, Dimension::MASS);
    pub const AMPERE: Unit = Unit::new("A", 1.0, Dimension::CURRENT);

    pub const RADIAN: Unit = Unit::new("rad", 1.0, Dimension::ANGLE);
    pub const DEGREE: Unit = Unit::new("deg", PI / 180.0, Dimension::ANGLE);

    /// Every named unit, searchable by symbol.
    pub const ALL: &[Unit] = &[
        ONE,
        METRE,
        KILOMETRE,
        FOOT,
        NAUTICAL_MILE,
        SECOND,
        MILLISECOND,
        MINUTE,
        HOUR,
        METRE_PER_SECOND,
        FOOT_PER_SECOND,
        KNOT,
        KILOMETRE_PER_HOUR,
        NEWTON,
        POUND_FORCE,
        JOULE,
        WATT_HOUR,
        WATT,
        VOLT,
        KILOGRAM,
        AMPERE,
        RADIAN,
        DEGREE,
    ];

    /// Find a catalogue unit by symbol. A few common spellings are accepted.
    pub fn lookup(symbol: &str) -> Option<&'static Unit> {
        let canonical = match symbol {
            "°" | "degree" | "degrees" => "deg",
            "hr" | "hour" | "hours" => "h",
            "sec" | "seconds" => "s",
            "mins" | "minutes" => "min",
            "knot" | "knots" | "kt" => "kn",
            other => other,
        };
        ALL.iter().find(|u| u.symbol() == canonical)
    }
}

// ---------------------------------------------------------------------------
// Quantity
// ---------------------------------------------------------------------------

/// An immutable scalar value paired with a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    value: f64,
    unit: Unit,
}

impl Quantity {
    /// `value` measured in `unit`.
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// A pure number in unit `1`.
    pub fn dimensionless(value: f64) -> Self {
        Self::new(value, units::ONE)
    }

    /// The value expressed in this quantity's own unit.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension
    }

    pub fn is_dimensionless(&self) -> bool {
        self.unit.dimension.is_dimensionless()
    }

    /// The value expressed in SI base units.
    pub fn si_value(&self) -> f64 {
        self.value * self.unit.scale
    }

    fn check(&self, other: &Unit, operation: &'static str) -> Result<(), UnitMismatch> {
        if self.unit.is_compatible(other) {
            Ok(())
        } else {
            Err(UnitMismatch::new(operation, &self.unit, other))
        }
    }

    /// Convert to a compatible unit.
    pub fn to(&self, unit: &Unit) -> Result<Quantity, UnitMismatch> {
        Ok(Quantity::new(self.value_in(unit)?, unit.clone()))
    }

    /// The numeric value in a compatible unit.
    pub fn value_in(&self, unit: &Unit) -> Result<f64, UnitMismatch> {
        self.check(unit, "conversion")?;
        if self.unit.scale == unit.scale {
            return Ok(self.value);
        }
        Ok(self.si_value() / unit.scale)
    }

    /// Sum, expressed in `self`'s unit.
    pub fn try_add(&self, other: &Quantity) -> Result<Quantity, UnitMismatch> {
        self.check(&other.unit, "addition")?;
        Ok(Quantity::new(
            self.value + other.value_in(&self.unit)?,
            self.unit.clone(),
        ))
    }

    /// Difference, expressed in `self`'s unit.
    pub fn try_sub(&self, other: &Quantity) -> Result<Quantity, UnitMismatch> {
        self.check(&other.unit, "subtraction")?;
        Ok(Quantity::new(
            self.value - other.value_in(&self.unit)?,
            self.unit.clone(),
        ))
    }

    /// Total ordering of two quantities of the same dimension.
    pub fn try_cmp(&self, other: &Quantity) -> Result<Ordering, UnitMismatch> {
        self.check(&other.unit, "comparison")?;
        Ok(self.si_value().total_cmp(&other.si_value()))
    }

    pub fn try_lt(&self, other: &Quantity) -> Result<bool, UnitMismatch> {
        Ok(self.try_cmp(other)? == Ordering::Less)
    }

    pub fn try_ge(&self, other: &Quantity) -> Result<bool, UnitMismatch> {
        Ok(self.try_cmp(other)? != Ordering::Less)
    }

    /// Multiply by a plain number, keeping the unit.
    pub fn scale(&self, factor: f64) -> Quantity {
        Quantity::new(self.value * factor, self.unit.clone())
    }

    /// Magnitude in the same unit.
    pub fn abs(&self) -> Quantity {
        Quantity::new(self.value.abs(), self.unit.clone())
    }

    /// Multiply, deriving the unit. A dimensionless result collapses to `1`
    /// and a dimensionless operand keeps the other operand's unit.
    pub fn product(&self, other: &Quantity) -> Quantity {
        if self.dimension().mul(&other.dimension()).is_dimensionless() {
            return Quantity::dimensionless(self.si_value() * other.si_value());
        }
        if self.is_dimensionless() {
            return Quantity::new(self.si_value() * other.value, other.unit.clone());
        }
        if other.is_dimensionless() {
            return Quantity::new(self.value * other.si_value(), self.unit.clone());
        }
        Quantity::new(self.value * other.value, self.unit.product(&other.unit))
    }

    /// Divide, deriving the unit. Ratios of like dimensions collapse to `1`.
    pub fn quotient(&self, other: &Quantity) -> Quantity {
        if self.dimension().div(&other.dimension()).is_dimensionless() {
            return Quantity::dimensionless(self.si_value() / other.si_value());
        }
        if other.is_dimensionless() {
            return Quantity::new(self.value / other.si_value(), self.unit.clone());
        }
        Quantity::new(self.value / other.value, self.unit.quotient(&other.unit))
    }

    /// Raise to a rational power, e.g. `Rational::new(1, 2)` for a square root.
    pub fn pow(&self, exponent: Rational) -> Quantity {
        if self.is_dimensionless() {
            return Quantity::dimensionless(self.si_value().powf(exponent.to_f64()));
        }
        Quantity::new(
            self.value.powf(exponent.to_f64()),
            self.unit.pow(exponent),
        )
    }
}

impl Mul for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: &Quantity) -> Quantity {
        self.product(rhs)
    }
}

impl Div for &Quantity {
    type Output = Quantity;

    fn div(self, rhs: &Quantity) -> Quantity {
        self.quotient(rhs)
    }
}

impl Mul<f64> for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        self.scale(rhs)
    }
}

impl Neg for &Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        self.scale(-1.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*}", p, self.value)?,
            None => write!(f, "{}", self.value)?,
        }
        if self.unit.symbol() != units::ONE.symbol() {
            write!(f, " {}", self.unit)?;
        }
        Ok(())
    }
}

impl FromStr for Quantity {
    type Err = QuantityParseError;

    /// Parse `"<value> <unit>"`, e.g. `"0.1 m/s"` or `"230 deg"`. A bare
    /// number is dimensionless.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(QuantityParseError::Empty);
        }
        let split = s
            .find(|c: char| c.is_whitespace())
            .unwrap_or(s.len());
        let (number, symbol) = s.split_at(split);
        let value: f64 = number
            .parse()
            .map_err(|_| QuantityParseError::InvalidValue(number.to_string()))?;
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Ok(Quantity::dimensionless(value));
        }
        let unit = units::lookup(symbol)
            .ok_or_else(|| QuantityParseError::UnknownUnit(symbol.to_string()))?;
        Ok(Quantity::new(value, unit.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::units::*;
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn rational_reduces_and_normalises_sign() {
        let r = Rational::new(2, -4).unwrap();
        assert_eq!(r.numer(), -1);
        assert_eq!(r.denom(), 2);
        assert!(Rational::new(1, 0).is_none());
        assert_eq!(Rational::new(0, 7).unwrap(), Rational::ZERO);
    }

    #[test]
    fn rational_arithmetic() {
        let half = Rational::new(1, 2).unwrap();
        let third = Rational::new(1, 3).unwrap();
        assert_eq!(half + third, Rational::new(5, 6).unwrap());
        assert_eq!(half - half, Rational::ZERO);
        assert_eq!(half * Rational::int(4), Rational::int(2));
    }

    #[test]
    fn derived_dimensions_match_named_constants() {
        assert_eq!(Dimension::FORCE.mul(&Dimension::SPEED), Dimension::POWER);
        assert_eq!(Dimension::LENGTH.div(&Dimension::TIME), Dimension::SPEED);
        assert_eq!(
            Dimension::POWER.div(&Dimension::CURRENT),
            Dimension::VOLTAGE
        );
        assert!(Dimension::POWER.div(&Dimension::POWER).is_dimensionless());
    }

    #[test]
    fn dimension_display() {
        assert_eq!(Dimension::SPEED.to_string(), "L·T^-1");
        assert_eq!(Dimension::DIMENSIONLESS.to_string(), "1");
        let root = Dimension::LENGTH.pow(Rational::new(1, 2).unwrap());
        assert_eq!(root.to_string(), "L^1/2");
    }

    #[test]
    fn conversion_between_compatible_units() {
        let speed = Quantity::new(4.5, FOOT_PER_SECOND);
        let mps = speed.to(&METRE_PER_SECOND).unwrap();
        assert!(close(mps.value(), 1.3716));
        assert_eq!(mps.unit().symbol(), "m/s");

        let knots = Quantity::new(1.0, KNOT).value_in(&KILOMETRE_PER_HOUR).unwrap();
        assert!(close(knots, 1.852));
    }

    #[test]
    fn conversion_between_incompatible_units_fails() {
        let err = Quantity::new(1.0, WATT).to(&NEWTON).unwrap_err();
        assert_eq!(err.operation, "conversion");
        assert_eq!(err.left, "W");
        assert_eq!(err.right, "N");
    }

    #[test]
    fn addition_converts_into_left_unit() {
        let a = Quantity::new(1.0, KILOMETRE);
        let b = Quantity::new(500.0, METRE);
        let sum = a.try_add(&b).unwrap();
        assert!(close(sum.value(), 1.5));
        assert_eq!(sum.unit().symbol(), "km");

        let diff = b.try_sub(&a).unwrap();
        assert!(close(diff.value(), -500.0));
    }

    #[test]
    fn adding_speed_to_force_is_a_mismatch() {
        let speed = Quantity::new(1.0, METRE_PER_SECOND);
        let force = Quantity::new(1.0, NEWTON);
        assert!(speed.try_add(&force).is_err());
        assert!(speed.try_sub(&force).is_err());
        assert!(speed.try_cmp(&force).is_err());
    }

    #[test]
    fn ratio_of_like_quantities_is_dimensionless() {
        let ratio = &Quantity::new(60.0, WATT) / &Quantity::new(120.0, WATT);
        assert!(ratio.is_dimensionless());
        assert!(close(ratio.value(), 0.5));
        assert_eq!(ratio.unit().symbol(), "1");
    }

    #[test]
    fn dimensionless_factor_keeps_other_unit() {
        let thrust = &Quantity::dimensionless(0.5) * &Quantity::new(26.7, NEWTON);
        assert_eq!(thrust.unit().symbol(), "N");
        assert!(close(thrust.value(), 13.35));
    }

    #[test]
    fn speed_times_time_is_length() {
        let speed = Quantity::new(4.5, FOOT_PER_SECOND);
        let dt = Quantity::new(3_600_000.0, MILLISECOND);
        let distance = &speed * &dt;
        assert_eq!(distance.dimension(), Dimension::LENGTH);
        assert_eq!(distance.unit().symbol(), "(ft/s)·ms");
        let metres = distance.to(&METRE).unwrap();
        assert!(close(metres.value(), 4.5 * 0.3048 * 3600.0));
    }

    #[test]
    fn quotient_builds_derived_unit() {
        let power = Quantity::new(120.0, WATT);
        let speed = Quantity::new(2.0, METRE_PER_SECOND);
        let force = &power / &speed;
        assert_eq!(force.dimension(), Dimension::FORCE);
        assert_eq!(force.unit().symbol(), "W/(m/s)");
        assert!(close(force.to(&NEWTON).unwrap().value(), 60.0));
    }

    #[test]
    fn compound_symbols_are_grouped() {
        assert_eq!(NEWTON.product(&METRE).symbol(), "N·m");
        assert_eq!(METRE_PER_SECOND.product(&SECOND).symbol(), "(m/s)·s");
        assert_eq!(WATT.quotient(&NEWTON.product(&METRE)).symbol(), "W/(N·m)");
        assert_eq!(METRE_PER_SECOND.pow(Rational::int(2)).symbol(), "(m/s)^2");
        assert_eq!(METRE.pow(Rational::int(3)).symbol(), "m^3");
    }

    #[test]
    fn square_root_uses_rational_exponent() {
        let area = &Quantity::new(3.0, METRE) * &Quantity::new(12.0, METRE);
        let side = area.pow(Rational::new(1, 2).unwrap());
        assert_eq!(side.dimension(), Dimension::LENGTH);
        assert!(close(side.to(&METRE).unwrap().value(), 6.0));
    }

    #[test]
    fn comparison_across_units() {
        let a = Quantity::new(1.0, KILOMETRE);
        let b = Quantity::new(999.0, METRE);
        assert_eq!(a.try_cmp(&b).unwrap(), Ordering::Greater);
        assert!(b.try_lt(&a).unwrap());
        assert!(a.try_ge(&b).unwrap());
    }

    #[test]
    fn parse_quantities() {
        let q: Quantity = "0.1 m/s".parse().unwrap();
        assert_eq!(q, Quantity::new(0.1, METRE_PER_SECOND));
        let deg: Quantity = "230 °".parse().unwrap();
        assert_eq!(deg.unit().symbol(), "deg");
        let bare: Quantity = "3".parse().unwrap();
        assert!(bare.is_dimensionless());
        assert_eq!(
            "1 furlong".parse::<Quantity>().unwrap_err(),
            QuantityParseError::UnknownUnit("furlong".into())
        );
        assert!(matches!(
            "abc W".parse::<Quantity>(),
            Err(QuantityParseError::InvalidValue(_))
        ));
        assert_eq!("  ".parse::<Quantity>().unwrap_err(), QuantityParseError::Empty);
    }

    #[test]
    fn display_honours_precision() {
        let q = Quantity::new(119.976_74, WATT);
        assert_eq!(format!("{q:.2}"), "119.98 W");
        assert_eq!(Quantity::dimensionless(0.5).to_string(), "0.5");
    }

    #[test]
    fn serde_round_trip_keeps_unit() {
        let q = Quantity::new(26.7, NEWTON);
        let json = serde_json::to_string(&q).unwrap();
        let back: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }
}
