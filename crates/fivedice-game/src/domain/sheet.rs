//! The 13-slot score sheet.
//!
//! Slots hold committed values; the bonus and section totals are derived and
//! recomputed on demand, never stored. Upper categories may be committed in
//! any order, so the bonus can only ever be a recomputation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::scoring::{ScoreCategory, UPPER_BONUS_SCORE, UPPER_BONUS_THRESHOLD};

/// Mapping from category to committed score. Absent = not yet scored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSheet {
    slots: BTreeMap<ScoreCategory, u32>,
}

impl ScoreSheet {
    /// Creates an empty sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the committed value for `category`, if any.
    #[must_use]
    pub fn get(&self, category: ScoreCategory) -> Option<u32> {
        self.slots.get(&category).copied()
    }

    /// Whether `category` has been committed.
    #[must_use]
    pub fn is_scored(&self, category: ScoreCategory) -> bool {
        self.slots.contains_key(&category)
    }

    /// Records a committed value. The aggregate enforces write-once; the
    /// sheet itself is a plain container.
    pub fn record(&mut self, category: ScoreCategory, points: u32) {
        self.slots.insert(category, points);
    }

    /// Number of committed categories.
    #[must_use]
    pub fn scored_count(&self) -> usize {
        self.slots.len()
    }

    /// Whether all thirteen categories are committed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.len() == ScoreCategory::ALL.len()
    }

    /// Sum of committed upper-section values, unscored treated as 0.
    #[must_use]
    pub fn upper_section_sum(&self) -> u32 {
        ScoreCategory::UPPER
            .into_iter()
            .filter_map(|category| self.get(category))
            .sum()
    }

    /// The upper-section bonus: 35 once the upper sum reaches 63, else 0.
    #[must_use]
    pub fn upper_bonus(&self) -> u32 {
        if self.upper_section_sum() >= UPPER_BONUS_THRESHOLD {
            UPPER_BONUS_SCORE
        } else {
            0
        }
    }

    /// Upper-section total including the bonus.
    #[must_use]
    pub fn upper_total(&self) -> u32 {
        self.upper_section_sum() + self.upper_bonus()
    }

    /// Sum of committed lower-section values.
    #[must_use]
    pub fn lower_total(&self) -> u32 {
        ScoreCategory::LOWER
            .into_iter()
            .filter_map(|category| self.get(category))
            .sum()
    }

    /// Grand total: upper total (with bonus) plus lower total.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.upper_total() + self.lower_total()
    }
}
