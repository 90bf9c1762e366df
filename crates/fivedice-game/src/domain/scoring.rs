//! Scoring evaluator.
//!
//! Pure dice-to-score rules: no state, no side effects, total over every
//! hand/category pair. The state machine calls [`score`] when a category is
//! committed; the possible-scores query calls it for every open category.

use serde::{Deserialize, Serialize};

use fivedice_core::error::DomainError;

use super::dice::Hand;

/// Points awarded for a full house.
pub const FULL_HOUSE_SCORE: u32 = 25;
/// Points awarded for a small straight.
pub const SMALL_STRAIGHT_SCORE: u32 = 30;
/// Points awarded for a large straight.
pub const LARGE_STRAIGHT_SCORE: u32 = 40;
/// Points awarded for a yahtzee.
pub const YAHTZEE_SCORE: u32 = 50;
/// Upper-section sum needed to earn the bonus.
pub const UPPER_BONUS_THRESHOLD: u32 = 63;
/// Points awarded once the upper-section sum reaches the threshold.
pub const UPPER_BONUS_SCORE: u32 = 35;

/// One of the thirteen scoring slots a game fills exactly once.
///
/// The serde spelling is the canonical wire tag; any divergent external
/// spellings are a transport-adapter concern, not the engine's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfAKind,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
}

impl ScoreCategory {
    /// All thirteen categories in score-sheet order.
    pub const ALL: [Self; 13] = [
        Self::Ones,
        Self::Twos,
        Self::Threes,
        Self::Fours,
        Self::Fives,
        Self::Sixes,
        Self::ThreeOfAKind,
        Self::FourOfAKind,
        Self::FullHouse,
        Self::SmallStraight,
        Self::LargeStraight,
        Self::Yahtzee,
        Self::Chance,
    ];

    /// The six upper-section number categories.
    pub const UPPER: [Self; 6] = [
        Self::Ones,
        Self::Twos,
        Self::Threes,
        Self::Fours,
        Self::Fives,
        Self::Sixes,
    ];

    /// The seven lower-section combination categories.
    pub const LOWER: [Self; 7] = [
        Self::ThreeOfAKind,
        Self::FourOfAKind,
        Self::FullHouse,
        Self::SmallStraight,
        Self::LargeStraight,
        Self::Yahtzee,
        Self::Chance,
    ];

    /// Returns the canonical wire tag for this category.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ones => "ones",
            Self::Twos => "twos",
            Self::Threes => "threes",
            Self::Fours => "fours",
            Self::Fives => "fives",
            Self::Sixes => "sixes",
            Self::ThreeOfAKind => "three_of_a_kind",
            Self::FourOfAKind => "four_of_a_kind",
            Self::FullHouse => "full_house",
            Self::SmallStraight => "small_straight",
            Self::LargeStraight => "large_straight",
            Self::Yahtzee => "yahtzee",
            Self::Chance => "chance",
        }
    }

    /// Parses a canonical wire tag.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCategory` for an unknown tag.
    pub fn parse_tag(tag: &str) -> Result<Self, DomainError> {
        Self::ALL
            .into_iter()
            .find(|category| category.tag() == tag)
            .ok_or_else(|| DomainError::InvalidCategory(tag.to_owned()))
    }

    /// Whether this category belongs to the upper section.
    #[must_use]
    pub fn is_upper(self) -> bool {
        Self::UPPER.contains(&self)
    }
}

/// Computes the score a hand earns in a category.
///
/// Pure and total: every hand scores a non-negative value in every category,
/// including the definitional zeros (a five-of-a-kind hand is not a full
/// house and not a straight — those require two and four-plus distinct
/// faces respectively).
#[must_use]
pub fn score(hand: Hand, category: ScoreCategory) -> u32 {
    let counts = hand.face_counts();
    match category {
        ScoreCategory::Ones => sum_of_face(&counts, 1),
        ScoreCategory::Twos => sum_of_face(&counts, 2),
        ScoreCategory::Threes => sum_of_face(&counts, 3),
        ScoreCategory::Fours => sum_of_face(&counts, 4),
        ScoreCategory::Fives => sum_of_face(&counts, 5),
        ScoreCategory::Sixes => sum_of_face(&counts, 6),
        ScoreCategory::ThreeOfAKind => {
            if counts.iter().any(|&c| c >= 3) {
                hand.sum()
            } else {
                0
            }
        }
        ScoreCategory::FourOfAKind => {
            if counts.iter().any(|&c| c >= 4) {
                hand.sum()
            } else {
                0
            }
        }
        ScoreCategory::FullHouse => {
            if is_full_house(&counts) {
                FULL_HOUSE_SCORE
            } else {
                0
            }
        }
        ScoreCategory::SmallStraight => {
            if longest_run(&counts) >= 4 {
                SMALL_STRAIGHT_SCORE
            } else {
                0
            }
        }
        ScoreCategory::LargeStraight => {
            if longest_run(&counts) >= 5 {
                LARGE_STRAIGHT_SCORE
            } else {
                0
            }
        }
        ScoreCategory::Yahtzee => {
            if counts.iter().any(|&c| c == 5) {
                YAHTZEE_SCORE
            } else {
                0
            }
        }
        ScoreCategory::Chance => hand.sum(),
    }
}

/// Sum of all dice showing `face`.
fn sum_of_face(counts: &[u32; 6], face: u32) -> u32 {
    counts[face as usize - 1] * face
}

/// Exactly two distinct faces with multiplicities {2, 3}.
fn is_full_house(counts: &[u32; 6]) -> bool {
    counts.contains(&3) && counts.contains(&2)
}

/// Length of the longest run of consecutive distinct faces.
fn longest_run(counts: &[u32; 6]) -> u32 {
    let mut best = 0;
    let mut current = 0;
    for &count in counts {
        if count > 0 {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(values: [u8; 5]) -> Hand {
        Hand::try_from_values(values).unwrap()
    }

    #[test]
    fn test_upper_categories_sum_matching_faces() {
        let h = hand([3, 3, 3, 4, 5]);
        assert_eq!(score(h, ScoreCategory::Threes), 9);
        assert_eq!(score(h, ScoreCategory::Fours), 4);
        assert_eq!(score(h, ScoreCategory::Ones), 0);
    }

    #[test]
    fn test_sixes_all_matching() {
        assert_eq!(score(hand([6, 6, 6, 6, 6]), ScoreCategory::Sixes), 30);
    }

    #[test]
    fn test_three_of_a_kind_sums_all_dice() {
        assert_eq!(score(hand([2, 2, 2, 5, 6]), ScoreCategory::ThreeOfAKind), 17);
        assert_eq!(score(hand([2, 2, 3, 5, 6]), ScoreCategory::ThreeOfAKind), 0);
    }

    #[test]
    fn test_three_of_a_kind_accepts_higher_multiplicity() {
        assert_eq!(score(hand([4, 4, 4, 4, 2]), ScoreCategory::ThreeOfAKind), 18);
    }

    #[test]
    fn test_four_of_a_kind_sums_all_dice() {
        assert_eq!(score(hand([5, 5, 5, 5, 2]), ScoreCategory::FourOfAKind), 22);
        assert_eq!(score(hand([5, 5, 5, 2, 2]), ScoreCategory::FourOfAKind), 0);
    }

    #[test]
    fn test_full_house_scores_25() {
        assert_eq!(score(hand([2, 2, 3, 3, 3]), ScoreCategory::FullHouse), 25);
    }

    #[test]
    fn test_four_of_a_kind_is_not_a_full_house() {
        assert_eq!(score(hand([2, 2, 2, 2, 3]), ScoreCategory::FullHouse), 0);
    }

    #[test]
    fn test_five_of_a_kind_is_not_a_full_house() {
        assert_eq!(score(hand([1, 1, 1, 1, 1]), ScoreCategory::FullHouse), 0);
    }

    #[test]
    fn test_small_straight_runs() {
        assert_eq!(score(hand([1, 2, 3, 4, 6]), ScoreCategory::SmallStraight), 30);
        assert_eq!(score(hand([2, 3, 4, 5, 5]), ScoreCategory::SmallStraight), 30);
        assert_eq!(score(hand([3, 4, 5, 6, 6]), ScoreCategory::SmallStraight), 30);
        assert_eq!(score(hand([1, 2, 3, 5, 6]), ScoreCategory::SmallStraight), 0);
    }

    #[test]
    fn test_large_straight_exact_sets() {
        assert_eq!(score(hand([1, 2, 3, 4, 5]), ScoreCategory::LargeStraight), 40);
        assert_eq!(score(hand([2, 3, 4, 5, 6]), ScoreCategory::LargeStraight), 40);
        assert_eq!(score(hand([1, 2, 3, 4, 6]), ScoreCategory::LargeStraight), 0);
    }

    #[test]
    fn test_five_of_a_kind_is_not_a_straight() {
        assert_eq!(score(hand([1, 1, 1, 1, 1]), ScoreCategory::LargeStraight), 0);
        assert_eq!(score(hand([1, 1, 1, 1, 1]), ScoreCategory::SmallStraight), 0);
    }

    #[test]
    fn test_yahtzee_scores_50() {
        assert_eq!(score(hand([1, 1, 1, 1, 1]), ScoreCategory::Yahtzee), 50);
        assert_eq!(score(hand([1, 1, 1, 1, 2]), ScoreCategory::Yahtzee), 0);
    }

    #[test]
    fn test_chance_sums_all_dice() {
        assert_eq!(score(hand([1, 2, 3, 4, 5]), ScoreCategory::Chance), 15);
    }

    #[test]
    fn test_score_is_total_and_non_negative() {
        // Exhaustive over all 6^5 hands and all categories; scores are u32 so
        // the assertion is that evaluation never panics.
        for code in 0..6u32.pow(5) {
            let mut values = [0u8; 5];
            let mut rest = code;
            for slot in &mut values {
                #[allow(clippy::cast_possible_truncation)]
                {
                    *slot = (rest % 6) as u8 + 1;
                }
                rest /= 6;
            }
            let h = hand(values);
            for category in ScoreCategory::ALL {
                let _ = score(h, category);
            }
        }
    }

    #[test]
    fn test_tag_round_trip() {
        for category in ScoreCategory::ALL {
            assert_eq!(ScoreCategory::parse_tag(category.tag()).unwrap(), category);
        }
    }

    #[test]
    fn test_parse_tag_rejects_unknown() {
        match ScoreCategory::parse_tag("threeofkind").unwrap_err() {
            fivedice_core::error::DomainError::InvalidCategory(tag) => {
                assert_eq!(tag, "threeofkind");
            }
            other => panic!("expected InvalidCategory, got {other:?}"),
        }
    }

    #[test]
    fn test_serde_uses_snake_case_tags() {
        let json = serde_json::to_string(&ScoreCategory::ThreeOfAKind).unwrap();
        assert_eq!(json, "\"three_of_a_kind\"");
        let parsed: ScoreCategory = serde_json::from_str("\"full_house\"").unwrap();
        assert_eq!(parsed, ScoreCategory::FullHouse);
    }
}
