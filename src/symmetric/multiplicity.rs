//! Orbit sizes under the hyperoctahedral group (axis permutations and sign
//! flips), and the share multiplier between canonical cells.

use crate::coord::Coord;

const FACTORIALS: [u64; 6] = [1, 1, 2, 6, 24, 120];

/// Number of distinct cells `coord` maps to under every permutation and sign
/// flip: `2^(nonzero axes) * n! / prod(multiplicity of each |value|)!`.
pub fn orbit_size(coord: &Coord) -> u64 {
    let canonical = coord.canonical();
    let axes = canonical.as_slice();
    let nonzero = axes.iter().filter(|&&c| c != 0).count();
    let mut size = FACTORIALS[axes.len()] << nonzero;
    let mut run = 1;
    for pair in axes.windows(2) {
        if pair[0] == pair[1] {
            run += 1;
        } else {
            size /= FACTORIALS[run];
            run = 1;
        }
    }
    size / FACTORIALS[run]
}

/// How many images of `target` one image of `source` feeds, given that
/// `directions` of `source`'s von Neumann directions fold onto `target`.
///
/// The orbit of `source` moves `orbit(source) * directions` shares into the
/// orbit of `target`, split evenly over its `orbit(target)` cells. The
/// quotient is exact: it counts the directions of `target` that fold back
/// onto `source`.
#[inline]
pub fn mirror_multiplicity(source: &Coord, target: &Coord, directions: u64) -> u64 {
    let moved = orbit_size(source) * directions;
    let size = orbit_size(target);
    debug_assert_eq!(moved % size, 0, "{source:?} -> {target:?}");
    moved / size
}

/// Every distinct image of `coord`, sorted.
pub fn images(coord: &Coord) -> Vec<Coord> {
    let dimension = coord.dimension();
    let mut order: Vec<usize> = (0..dimension).collect();
    let mut out = Vec::with_capacity(orbit_size(coord) as usize);
    permute(&mut order, 0, &mut |order| {
        let mut permuted = *coord;
        for (axis, &from) in order.iter().enumerate() {
            permuted.set(axis, coord.get(from));
        }
        for signs in 0u32..(1 << dimension) {
            let mut image = permuted;
            for axis in 0..dimension {
                if signs & (1 << axis) != 0 {
                    image.set(axis, -image.get(axis));
                }
            }
            out.push(image);
        }
    });
    out.sort_unstable();
    out.dedup();
    out
}

fn permute(order: &mut [usize], k: usize, visit: &mut impl FnMut(&[usize])) {
    if k == order.len() {
        visit(order);
        return;
    }
    for i in k..order.len() {
        order.swap(k, i);
        permute(order, k + 1, visit);
        order.swap(k, i);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{images, mirror_multiplicity, orbit_size};
    use crate::coord::{Coord, Direction};
    use crate::grid::Layout;
    use crate::symmetric::CanonicalLayout;

    #[test]
    fn orbit_sizes() {
        assert_eq!(orbit_size(&Coord::from([0, 0, 0])), 1);
        assert_eq!(orbit_size(&Coord::from([3])), 2);
        assert_eq!(orbit_size(&Coord::from([1, 1])), 4);
        assert_eq!(orbit_size(&Coord::from([2, 1])), 8);
        assert_eq!(orbit_size(&Coord::from([2, 2, 0])), 12);
        assert_eq!(orbit_size(&Coord::from([3, 2, 1])), 48);
        assert_eq!(orbit_size(&Coord::from([1, 1, 1, 1, 1])), 32);
        assert_eq!(orbit_size(&Coord::from([5, 4, 3, 2, 1])), 3_840);
        assert_eq!(orbit_size(&Coord::from([-2, 0, 2])), 12);
    }

    #[test]
    fn orbit_size_counts_images() {
        for dimension in 1..=5 {
            let layout = CanonicalLayout::new(dimension, 3);
            for index in 0..layout.len() {
                let coord = layout.coord_of(index);
                let all = images(&coord);
                assert_eq!(all.len() as u64, orbit_size(&coord), "{coord:?}");
                assert!(all.iter().all(|image| image.canonical() == coord));
            }
        }
    }

    #[test]
    fn multiplicity_matches_reverse_direction_count() {
        for dimension in 1..=5 {
            let layout = CanonicalLayout::new(dimension, 3);
            for index in 0..layout.len() {
                let source = layout.coord_of(index);
                let mut targets: HashMap<Coord, u64> = HashMap::new();
                for direction in Direction::all(dimension) {
                    *targets.entry(source.step(direction).canonical()).or_default() += 1;
                }
                for (target, directions) in targets {
                    let back = Direction::all(dimension)
                        .filter(|&d| target.step(d).canonical() == source)
                        .count() as u64;
                    assert_eq!(
                        mirror_multiplicity(&source, &target, directions),
                        back,
                        "{source:?} -> {target:?}"
                    );
                }
            }
        }
    }
}
