//! Overflow preconditions for fixed-width cell values.
//!
//! A single positive source never produces a neighbor difference larger than
//! itself, but a negative source does: the first topple pulls
//! `(2 * dimension + 1)` shares out of the surrounding zeros. These helpers
//! derive the most negative seed whose worst-case difference still fits.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

use crate::error::{AetherError, Result};
use crate::number::AetherValue;

/// The largest value difference between neighboring cells over the whole
/// evolution of a single source seeded with `source`.
pub fn max_neighboring_values_difference(dimension: usize, source: &BigInt) -> BigInt {
    debug_assert!(dimension > 0);
    if Signed::is_negative(source) {
        if dimension > 1 {
            let two = BigInt::from(2);
            let halves = (-source).div_floor(&two);
            let pulled = halves * BigInt::from(dimension * 2 + 1);
            (source + pulled).abs()
        } else {
            -source
        }
    } else {
        source.clone()
    }
}

/// The most negative single source value whose neighbor differences never
/// exceed `max_allowed`.
pub fn min_allowed_single_source_value(dimension: usize, max_allowed: &BigInt) -> BigInt {
    debug_assert!(dimension > 0);
    debug_assert!(!Signed::is_negative(max_allowed));
    if Zero::is_zero(max_allowed) {
        return <BigInt as Zero>::zero();
    }
    if dimension == 1 {
        return -max_allowed;
    }
    let double_dimension_minus_one = BigInt::from(dimension * 2 - 1);
    if *max_allowed < double_dimension_minus_one {
        return BigInt::from(-1);
    }
    // Truncating division, same as the limit recurrence it approximates;
    // the estimate can be one too high.
    let estimate = (max_allowed * 2) / -&double_dimension_minus_one;
    let lower = &estimate - 1;
    if max_neighboring_values_difference(dimension, &lower) > *max_allowed {
        estimate
    } else {
        lower
    }
}

/// Rejects fixed-width single source seeds that could overflow while
/// stepping. Unbounded value types always pass.
pub fn check_single_source<V: AetherValue>(dimension: usize, value: &V) -> Result<()> {
    let Some(max) = V::MAX else {
        return Ok(());
    };
    let Some(value) = value.to_bigint() else {
        return Ok(());
    };
    let min = min_allowed_single_source_value(dimension, &BigInt::from(max));
    if value < min {
        return Err(AetherError::InitialValueTooSmall {
            min: min.to_string(),
            dimension,
        });
    }
    Ok(())
}

/// Validates a random block range: `min <= max`, and for fixed-width types
/// the worst-case pile-up of the widened range must fit the type.
pub fn check_random_range<V: AetherValue>(dimension: usize, min: i64, max: i64) -> Result<()> {
    if min > max {
        return Err(AetherError::EmptyRange { min, max });
    }
    if V::from_i64(min).is_none() {
        return Err(AetherError::ValueOutOfRange(min));
    }
    if V::from_i64(max).is_none() {
        return Err(AetherError::ValueOutOfRange(max));
    }
    let Some(type_max) = V::MAX else {
        return Ok(());
    };
    let actual_min = min.min(0) as i128;
    let actual_max = max.max(0) as i128;
    let resulting_max =
        actual_min + ((actual_max - actual_min) / 2) * (dimension as i128 * 2 + 1);
    if resulting_max > type_max {
        return Err(AetherError::RangeTooLarge {
            min: actual_min as i64,
            max: actual_max as i64,
        });
    }
    Ok(())
}
