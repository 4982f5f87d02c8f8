//! Cell value types.
//!
//! The rule only needs ordering, addition, subtraction and a truncating
//! division by a small share count whose remainder stays with the dividend.
//! Fixed-width integers rely on the seed limits checked at construction
//! (see [`crate::limits`]) and wrap on overflow while stepping. Cell values
//! and neighbor differences stay in range under those limits, so wrapping
//! only affects transient sums (weighted mirror shares, running totals)
//! whose final result is exact whenever it fits the type.

use std::fmt::{Debug, Display};

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

pub trait AetherValue: Clone + Ord + Debug + Display + Send + Sync + 'static {
    /// Largest representable value, `None` when unbounded.
    const MAX: Option<i128>;

    fn zero() -> Self;

    fn one() -> Self;

    fn from_i64(value: i64) -> Option<Self>;

    fn is_zero(&self) -> bool;

    fn plus(&self, rhs: &Self) -> Self;

    fn minus(&self, rhs: &Self) -> Self;

    fn negated(&self) -> Self;

    /// `self * factor` for a small non-negative factor.
    fn times(&self, factor: u64) -> Self;

    /// Truncating division: the quotient rounds toward zero and the
    /// remainder carries the sign of `self` (or is zero). Exact types return
    /// a zero remainder.
    fn div_rem_count(&self, count: u32) -> (Self, Self);

    #[inline]
    fn add_assign_ref(&mut self, rhs: &Self) {
        *self = self.plus(rhs);
    }

    /// Whether the value is strictly below zero.
    #[inline]
    fn is_negative(&self) -> bool {
        *self < Self::zero()
    }

    /// Conversion to an exact big integer when the value is integral.
    fn to_bigint(&self) -> Option<BigInt>;
}

macro_rules! fixed_width_value {
    ($($t:ty),*) => {
        $(
            impl AetherValue for $t {
                const MAX: Option<i128> = Some(<$t>::MAX as i128);

                #[inline(always)]
                fn zero() -> Self {
                    0
                }

                #[inline(always)]
                fn one() -> Self {
                    1
                }

                #[inline]
                fn from_i64(value: i64) -> Option<Self> {
                    <$t>::try_from(value).ok()
                }

                #[inline(always)]
                fn is_zero(&self) -> bool {
                    *self == 0
                }

                #[inline(always)]
                fn plus(&self, rhs: &Self) -> Self {
                    self.wrapping_add(*rhs)
                }

                #[inline(always)]
                fn minus(&self, rhs: &Self) -> Self {
                    self.wrapping_sub(*rhs)
                }

                #[inline(always)]
                fn negated(&self) -> Self {
                    self.wrapping_neg()
                }

                #[inline(always)]
                fn times(&self, factor: u64) -> Self {
                    self.wrapping_mul(factor as $t)
                }

                #[inline(always)]
                fn div_rem_count(&self, count: u32) -> (Self, Self) {
                    let count = count as $t;
                    (*self / count, *self % count)
                }

                #[inline(always)]
                fn add_assign_ref(&mut self, rhs: &Self) {
                    *self = self.wrapping_add(*rhs);
                }

                fn to_bigint(&self) -> Option<BigInt> {
                    Some(BigInt::from(*self))
                }
            }
        )*
    };
}

fixed_width_value!(i16, i32, i64);

impl AetherValue for BigInt {
    const MAX: Option<i128> = None;

    fn zero() -> Self {
        Zero::zero()
    }

    fn one() -> Self {
        One::one()
    }

    fn from_i64(value: i64) -> Option<Self> {
        Some(BigInt::from(value))
    }

    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }

    fn plus(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn minus(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn negated(&self) -> Self {
        -self
    }

    fn times(&self, factor: u64) -> Self {
        self * factor
    }

    fn div_rem_count(&self, count: u32) -> (Self, Self) {
        // `Integer::div_rem` truncates toward zero, matching primitive `/` and `%`.
        self.div_rem(&BigInt::from(count))
    }

    fn add_assign_ref(&mut self, rhs: &Self) {
        *self += rhs;
    }

    fn is_negative(&self) -> bool {
        Signed::is_negative(self)
    }

    fn to_bigint(&self) -> Option<BigInt> {
        Some(self.clone())
    }
}

impl AetherValue for BigRational {
    const MAX: Option<i128> = None;

    fn zero() -> Self {
        Zero::zero()
    }

    fn one() -> Self {
        One::one()
    }

    fn from_i64(value: i64) -> Option<Self> {
        Some(BigRational::from_integer(BigInt::from(value)))
    }

    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }

    fn plus(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn minus(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn negated(&self) -> Self {
        -self
    }

    fn times(&self, factor: u64) -> Self {
        self * BigRational::from_integer(BigInt::from(factor))
    }

    fn div_rem_count(&self, count: u32) -> (Self, Self) {
        (
            self / BigRational::from_integer(BigInt::from(count)),
            Zero::zero(),
        )
    }

    fn add_assign_ref(&mut self, rhs: &Self) {
        *self += rhs;
    }

    fn is_negative(&self) -> bool {
        Signed::is_negative(self)
    }

    fn to_bigint(&self) -> Option<BigInt> {
        self.is_integer().then(|| self.to_integer())
    }
}

/// Lossy conversion used by drivers and benches for reporting.
pub fn approximate<V: AetherValue>(value: &V) -> f64 {
    if let Some(int) = value.to_bigint() {
        return int.to_f64().unwrap_or(f64::NAN);
    }
    let text = value.to_string();
    match text.split_once('/') {
        Some((numer, denom)) => match (numer.parse::<f64>(), denom.parse::<f64>()) {
            (Ok(numer), Ok(denom)) => numer / denom,
            _ => f64::NAN,
        },
        None => text.parse().unwrap_or(f64::NAN),
    }
}
