//! Initial configurations.

use rand::{Rng, SeedableRng};

use crate::coord::Coord;
use crate::error::{AetherError, Result};
use crate::limits::{check_random_range, check_single_source};
use crate::number::AetherValue;

/// How the first generation is filled.
#[derive(Clone, Debug, PartialEq)]
pub enum Seed<V> {
    /// One cell holds `value`, every other cell is zero. `position` defaults
    /// to the origin on unbounded grids and to the centre of a fixed box.
    SingleSource { value: V, position: Option<Coord> },
    /// A hypercube of `side` cells per axis filled with uniform values in
    /// `[min, max]`, reproducible from `rng_seed`. Surrounded by zeros.
    RandomBlock {
        side: usize,
        min: i64,
        max: i64,
        rng_seed: u64,
    },
}

impl<V: AetherValue> Seed<V> {
    pub fn single(value: V) -> Self {
        Seed::SingleSource {
            value,
            position: None,
        }
    }

    pub fn single_at(value: V, position: impl Into<Coord>) -> Self {
        Seed::SingleSource {
            value,
            position: Some(position.into()),
        }
    }

    pub fn random_block(side: usize, min: i64, max: i64, rng_seed: u64) -> Self {
        Seed::RandomBlock {
            side,
            min,
            max,
            rng_seed,
        }
    }

    /// Checks value limits and coordinate arity against `dimension`.
    pub(crate) fn validate(&self, dimension: usize) -> Result<()> {
        match self {
            Seed::SingleSource { value, position } => {
                if let Some(position) = position {
                    if position.dimension() != dimension {
                        return Err(AetherError::DimensionMismatch {
                            expected: dimension,
                            got: position.dimension(),
                        });
                    }
                }
                check_single_source(dimension, value)
            }
            Seed::RandomBlock { side, min, max, .. } => {
                if *side == 0 {
                    return Err(AetherError::NonPositiveSide);
                }
                check_random_range::<V>(dimension, *min, *max)
            }
        }
    }
}

/// Draws `side^dimension` values in `[min, max]`, in row-major block order
/// (last axis fastest).
pub(crate) fn random_block_values<V: AetherValue>(
    dimension: usize,
    side: usize,
    min: i64,
    max: i64,
    rng_seed: u64,
) -> Result<Vec<V>> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(rng_seed);
    let count = side.pow(dimension as u32);
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        let raw = rng.random_range(min..=max);
        values.push(V::from_i64(raw).ok_or(AetherError::ValueOutOfRange(raw))?);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::{Seed, random_block_values};
    use crate::coord::Coord;
    use crate::error::AetherError;

    #[test]
    fn random_blocks_are_reproducible_and_in_range() {
        let a: Vec<i32> = random_block_values(2, 3, -5, 5, 42).unwrap();
        let b: Vec<i32> = random_block_values(2, 3, -5, 5, 42).unwrap();
        assert_eq!(a.len(), 9);
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (-5..=5).contains(v)));
    }

    #[test]
    fn validation_checks_arity_and_limits() {
        let seed = Seed::single_at(3i64, Coord::from([1, 1]));
        assert!(seed.validate(2).is_ok());
        assert!(matches!(
            seed.validate(3),
            Err(AetherError::DimensionMismatch {
                expected: 3,
                got: 2
            })
        ));
        assert!(matches!(
            Seed::<i16>::single(-20_000).validate(3),
            Err(AetherError::InitialValueTooSmall { .. })
        ));
        assert!(matches!(
            Seed::<i64>::random_block(0, 0, 1, 0).validate(1),
            Err(AetherError::NonPositiveSide)
        ));
        assert!(matches!(
            Seed::<i64>::random_block(2, 3, 1, 0).validate(1),
            Err(AetherError::EmptyRange { .. })
        ));
    }
}
