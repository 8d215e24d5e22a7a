//! Index arithmetic over the stem (10) and branch (12) cycles.
//!
//! Every offset is reduced with `rem_euclid`, so negative offsets count
//! backwards from the anchor instead of failing.

use crate::domain::model::{Branch, Pillar, Stem, ALL_BRANCHES, ALL_STEMS};

pub const STEM_CYCLE: i64 = 10;
pub const BRANCH_CYCLE: i64 = 12;
/// lcm(10, 12)
pub const SEXAGENARY_CYCLE: i64 = 60;

pub fn stem_at(k: i64) -> Stem {
    ALL_STEMS[k.rem_euclid(STEM_CYCLE) as usize]
}

pub fn branch_at(k: i64) -> Branch {
    ALL_BRANCHES[k.rem_euclid(BRANCH_CYCLE) as usize]
}

/// The pillar at offset `k` of a single running counter. Always a reachable pair.
pub fn pillar_at(k: i64) -> Pillar {
    Pillar {
        stem: stem_at(k),
        branch: branch_at(k),
    }
}

/// Builds a pillar from two independently derived indices.
///
/// Returns `None` when the indices differ in parity: such a pair never occurs
/// in the 60-term cycle.
pub fn pillar_from_indices(stem_index: i64, branch_index: i64) -> Option<Pillar> {
    let s = stem_index.rem_euclid(STEM_CYCLE);
    let b = branch_index.rem_euclid(BRANCH_CYCLE);
    if s % 2 != b % 2 {
        return None;
    }
    Some(Pillar {
        stem: ALL_STEMS[s as usize],
        branch: ALL_BRANCHES[b as usize],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periodicity_holds_for_negative_offsets() {
        for k in -130..130 {
            assert_eq!(stem_at(k), stem_at(k + STEM_CYCLE));
            assert_eq!(branch_at(k), branch_at(k + BRANCH_CYCLE));
            assert_eq!(pillar_at(k), pillar_at(k + SEXAGENARY_CYCLE));
        }
    }

    #[test]
    fn minus_one_wraps_to_last() {
        assert_eq!(stem_at(-1), Stem::Gui);
        assert_eq!(stem_at(-1).index(), 9);
        assert_eq!(branch_at(-1), Branch::Hai);
    }

    #[test]
    fn counter_reaches_each_pair_once() {
        let mut seen = std::collections::HashSet::new();
        for k in 0..SEXAGENARY_CYCLE {
            let p = pillar_at(k);
            assert_eq!(p.cycle_index() as i64, k);
            assert!(seen.insert(p));
        }
        assert_eq!(seen.len(), 60);
    }

    #[test]
    fn mismatched_parity_is_unreachable() {
        assert!(pillar_from_indices(0, 1).is_none());
        assert_eq!(pillar_from_indices(2, 2), Some(pillar_at(2)));
        assert_eq!(pillar_from_indices(-1, -1), Some(pillar_at(59)));
    }
}
