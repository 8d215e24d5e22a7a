//! Five-element tally and day-master strength.
//!
//! Strength is a plain head count of the day master's element. Seasonal
//! weighting, branch combinations and clashes are intentionally not applied.

use crate::domain::model::{ElementTally, FourPillars, Stem, Strength};

pub struct ElementAnalyzer;

impl ElementAnalyzer {
    /// One occurrence per stem and per branch: always eight in total.
    pub fn tally(pillars: &FourPillars) -> ElementTally {
        let mut tally = ElementTally::default();
        for pillar in pillars.as_array() {
            tally.add(pillar.stem.element());
            tally.add(pillar.branch.element());
        }
        tally
    }

    pub fn classify_strength(tally: &ElementTally, day_stem: Stem) -> Strength {
        Self::strength_for_count(tally.count(day_stem.element()))
    }

    pub fn strength_for_count(n: u8) -> Strength {
        match n {
            0 | 1 => Strength::Weak,
            2 => Strength::Balanced,
            _ => Strength::Strong,
        }
    }
}
