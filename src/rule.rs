//! The Aether redistribution rule.
//!
//! A cell shares part of its value with the von Neumann neighbors whose value
//! is strictly smaller. Neighbors are visited from the largest value down;
//! each distinct value opens a division of `value - neighbor` into one share
//! per remaining neighbor plus one kept by the cell. Every neighbor from the
//! current position to the end of the list receives that share, so smaller
//! neighbors accumulate shares from every larger group before them. The
//! truncation remainder always stays with the cell.

use crate::coord::Direction;
use crate::number::AetherValue;

/// Result of one cell's redistribution, excluding per-neighbor shares which
/// stay in the [`Redistribution`] scratch until read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome<V> {
    /// Value the cell keeps for the next generation.
    pub retained: V,
    /// Whether any division produced a nonzero share.
    pub toppled: bool,
}

/// Reusable scratch for the rule. Only ever holds up to `2 * dimension`
/// neighbors, and keeps its allocations across cells.
#[derive(Clone, Debug)]
pub struct Redistribution<V> {
    candidates: Vec<(Direction, V)>,
    shares: Vec<V>,
}

impl<V: AetherValue> Default for Redistribution<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: AetherValue> Redistribution<V> {
    pub fn new() -> Self {
        Self {
            candidates: Vec::with_capacity(crate::coord::MAX_DIMENSION * 2),
            shares: Vec::with_capacity(crate::coord::MAX_DIMENSION * 2),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.shares.clear();
    }

    /// Registers a neighbor; it only takes part when strictly smaller than
    /// the cell value.
    #[inline]
    pub fn offer(&mut self, direction: Direction, neighbor: &V, cell: &V) {
        if neighbor < cell {
            self.candidates.push((direction, neighbor.clone()));
        }
    }

    /// Number of neighbors that take part.
    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Runs the cascading division for a cell holding `value`.
    pub fn resolve(&mut self, value: V) -> Outcome<V> {
        let count = self.candidates.len();
        self.shares.clear();
        if count == 0 {
            return Outcome {
                retained: value,
                toppled: false,
            };
        }
        // Stable: ties keep direction enumeration order.
        self.candidates.sort_by(|a, b| b.1.cmp(&a.1));
        self.shares.resize(count, V::zero());

        let mut value = value;
        let mut toppled = false;
        let mut share_count = count as u32 + 1;
        let mut group_start: Option<usize> = None;
        for i in 0..count {
            let opens_group = match group_start {
                None => true,
                Some(start) => self.candidates[i].1 != self.candidates[start].1,
            };
            if opens_group {
                let neighbor = &self.candidates[i].1;
                let to_share = value.minus(neighbor);
                let (share, remainder) = to_share.div_rem_count(share_count);
                if !share.is_zero() {
                    toppled = true;
                    // value - to_share == neighbor
                    value = neighbor.plus(&remainder).plus(&share);
                    for accumulated in &mut self.shares[i..] {
                        accumulated.add_assign_ref(&share);
                    }
                }
                group_start = Some(i);
            }
            share_count -= 1;
        }
        Outcome {
            retained: value,
            toppled,
        }
    }

    /// Nonzero shares from the last `resolve`, in processing order (largest
    /// neighbor first).
    pub fn shares(&self) -> impl Iterator<Item = (Direction, &V)> + '_ {
        self.candidates
            .iter()
            .zip(&self.shares)
            .filter(|(_, share)| !share.is_zero())
            .map(|((direction, _), share)| (*direction, share))
    }
}

/// One-shot form of the rule for callers without a scratch buffer.
pub fn topple<V: AetherValue>(
    value: V,
    neighbors: impl IntoIterator<Item = (Direction, V)>,
) -> (Outcome<V>, Vec<(Direction, V)>) {
    let mut scratch = Redistribution::new();
    for (direction, neighbor) in neighbors {
        scratch.offer(direction, &neighbor, &value);
    }
    let outcome = scratch.resolve(value);
    let shares = scratch
        .shares()
        .map(|(direction, share)| (direction, share.clone()))
        .collect();
    (outcome, shares)
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;
    use num_rational::BigRational;
    use rand::{Rng, SeedableRng};

    use super::{Redistribution, topple};
    use crate::coord::Direction;
    use crate::number::AetherValue;

    fn dirs(dimension: usize) -> Vec<Direction> {
        Direction::all(dimension).collect()
    }

    fn shares_by_index<V: Clone>(shares: &[(Direction, V)]) -> Vec<(usize, V)> {
        let mut out: Vec<_> = shares.iter().map(|(d, v)| (d.index(), v.clone())).collect();
        out.sort_by_key(|(i, _)| *i);
        out
    }

    #[test]
    fn single_source_splits_three_ways_in_one_dimension() {
        let d = dirs(1);
        let (outcome, shares) = topple(9i64, [(d[0], 0), (d[1], 0)]);
        assert_eq!(outcome.retained, 3);
        assert!(outcome.toppled);
        assert_eq!(shares_by_index(&shares), vec![(0, 3), (1, 3)]);
    }

    #[test]
    fn larger_groups_feed_smaller_neighbors() {
        let d = dirs(2);
        let (outcome, shares) = topple(10i64, [(d[0], 4), (d[1], 4), (d[2], 1), (d[3], 7)]);
        assert_eq!(outcome.retained, 4);
        // The 7 gets nothing (3 / 5 truncates to zero), the tied 4s share one
        // division, the 1 collects from both divisions.
        assert_eq!(shares_by_index(&shares), vec![(0, 1), (1, 1), (2, 4)]);
    }

    #[test]
    fn equal_or_larger_neighbors_never_receive() {
        let d = dirs(1);
        let (outcome, shares) = topple(5i32, [(d[0], 5), (d[1], 9)]);
        assert_eq!(outcome.retained, 5);
        assert!(!outcome.toppled);
        assert!(shares.is_empty());
    }

    #[test]
    fn truncated_share_keeps_value() {
        let d = dirs(1);
        let (outcome, shares) = topple(5i16, [(d[0], 4), (d[1], 4)]);
        assert_eq!(outcome.retained, 5);
        assert!(!outcome.toppled);
        assert!(shares.is_empty());
    }

    #[test]
    fn negative_values_flow_toward_more_negative() {
        let d = dirs(2);
        let (outcome, shares) = topple(-6i64, [(d[0], 0), (d[1], -9), (d[2], 0), (d[3], -6)]);
        assert_eq!(outcome.retained, -7);
        assert_eq!(shares_by_index(&shares), vec![(1, 1)]);

        let (outcome, shares) = topple(0i64, [(d[0], -7), (d[1], -1)]);
        assert_eq!(outcome.retained, -3);
        assert_eq!(shares_by_index(&shares), vec![(0, 3)]);
    }

    #[test]
    fn rational_shares_are_exact() {
        let d = dirs(2);
        let third = BigRational::new(1.into(), 3.into());
        let zero = BigRational::from_i64(0).unwrap();
        let one = BigRational::from_i64(1).unwrap();
        let (outcome, shares) = topple(
            one,
            [(d[0], zero.clone()), (d[1], third), (d[2], zero)],
        );
        assert_eq!(outcome.retained, BigRational::new(1.into(), 6.into()));
        assert_eq!(
            shares_by_index(&shares),
            vec![
                (0, BigRational::new(1.into(), 3.into())),
                (1, BigRational::new(1.into(), 6.into())),
                (2, BigRational::new(1.into(), 3.into())),
            ]
        );
    }

    fn conserves_mass<V: AetherValue>(rng: &mut rand::rngs::StdRng, make: impl Fn(i64) -> V) {
        let mut scratch = Redistribution::new();
        for _ in 0..2_000 {
            let dimension = rng.random_range(1..=5usize);
            let value = make(rng.random_range(-1_000..=1_000));
            scratch.clear();
            for direction in Direction::all(dimension) {
                let neighbor = make(rng.random_range(-1_000..=1_000));
                scratch.offer(direction, &neighbor, &value);
            }
            let outcome = scratch.resolve(value.clone());
            let mut total = outcome.retained.clone();
            for (_, share) in scratch.shares() {
                total = total.plus(share);
            }
            assert_eq!(total, value);
        }
    }

    #[test]
    fn every_value_type_conserves_mass() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0xAE7E);
        conserves_mass(&mut rng, |v| v as i32);
        conserves_mass(&mut rng, |v| v);
        conserves_mass(&mut rng, BigInt::from);
        conserves_mass(&mut rng, |v| BigRational::from_i64(v).unwrap());
    }
}
