//! Query handlers for the game context.
//!
//! Pure reads: reconstitute the aggregate from stored events and project it
//! into view DTOs. No query mutates session state, so every query is
//! idempotent for an unchanged session.

use fivedice_core::error::DomainError;
use fivedice_core::repository::EventRepository;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::aggregates::Game;
use crate::domain::dice::HAND_SIZE;
use crate::domain::scoring::{self, ScoreCategory};
use crate::domain::sheet::ScoreSheet;

/// Read-only view of a score sheet, with the derived bonus and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSheetView {
    /// Ones slot.
    pub ones: Option<u32>,
    /// Twos slot.
    pub twos: Option<u32>,
    /// Threes slot.
    pub threes: Option<u32>,
    /// Fours slot.
    pub fours: Option<u32>,
    /// Fives slot.
    pub fives: Option<u32>,
    /// Sixes slot.
    pub sixes: Option<u32>,
    /// Three-of-a-kind slot.
    pub three_of_a_kind: Option<u32>,
    /// Four-of-a-kind slot.
    pub four_of_a_kind: Option<u32>,
    /// Full-house slot.
    pub full_house: Option<u32>,
    /// Small-straight slot.
    pub small_straight: Option<u32>,
    /// Large-straight slot.
    pub large_straight: Option<u32>,
    /// Yahtzee slot.
    pub yahtzee: Option<u32>,
    /// Chance slot.
    pub chance: Option<u32>,
    /// Derived upper-section bonus (0 or 35).
    pub upper_bonus: u32,
    /// Derived upper-section total including the bonus.
    pub upper_total: u32,
    /// Derived lower-section total.
    pub lower_total: u32,
}

impl ScoreSheetView {
    fn from_sheet(sheet: &ScoreSheet) -> Self {
        Self {
            ones: sheet.get(ScoreCategory::Ones),
            twos: sheet.get(ScoreCategory::Twos),
            threes: sheet.get(ScoreCategory::Threes),
            fours: sheet.get(ScoreCategory::Fours),
            fives: sheet.get(ScoreCategory::Fives),
            sixes: sheet.get(ScoreCategory::Sixes),
            three_of_a_kind: sheet.get(ScoreCategory::ThreeOfAKind),
            four_of_a_kind: sheet.get(ScoreCategory::FourOfAKind),
            full_house: sheet.get(ScoreCategory::FullHouse),
            small_straight: sheet.get(ScoreCategory::SmallStraight),
            large_straight: sheet.get(ScoreCategory::LargeStraight),
            yahtzee: sheet.get(ScoreCategory::Yahtzee),
            chance: sheet.get(ScoreCategory::Chance),
            upper_bonus: sheet.upper_bonus(),
            upper_total: sheet.upper_total(),
            lower_total: sheet.lower_total(),
        }
    }
}

/// Read-only snapshot of a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    /// The game identifier.
    pub game_id: Uuid,
    /// Display name of the player.
    pub player_name: String,
    /// The current hand in position order.
    pub dice: [u8; HAND_SIZE],
    /// Die positions currently held out of the next reroll.
    pub kept_positions: Vec<usize>,
    /// Rolls remaining in the current round.
    pub rolls_left: u8,
    /// Current round.
    pub round: u8,
    /// The score sheet with derived bonus and totals.
    pub score_sheet: ScoreSheetView,
    /// Grand total: upper total (with bonus) plus lower total.
    pub total_score: u32,
    /// Whether all thirteen categories are committed.
    pub game_complete: bool,
    /// Current version (event count).
    pub version: i64,
}

impl GameView {
    fn from_game(game: &Game) -> Self {
        Self {
            game_id: game.id,
            player_name: game.player_name.clone(),
            dice: game.dice.values(),
            kept_positions: game.kept_positions.iter().copied().collect(),
            rolls_left: game.rolls_left,
            round: game.round,
            score_sheet: ScoreSheetView::from_sheet(&game.sheet),
            total_score: game.sheet.total(),
            game_complete: game.game_complete,
            version: game.version,
        }
    }
}

/// One entry of the possible-scores view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryScore {
    /// The category.
    pub category: ScoreCategory,
    /// The evaluator's score for the current hand, or the committed value.
    pub points: u32,
    /// Whether the category has already been committed.
    pub scored: bool,
}

/// Read-only view of what every category is worth right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PossibleScoresView {
    /// The game identifier.
    pub game_id: Uuid,
    /// One entry per category, in score-sheet order.
    pub scores: Vec<CategoryScore>,
}

async fn load_game(game_id: Uuid, repo: &dyn EventRepository) -> Result<Game, DomainError> {
    let stored_events = repo.load_events(game_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(game_id));
    }
    command_handlers::reconstitute(game_id, &stored_events)
}

/// Retrieves a full game snapshot by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
#[instrument(skip(repo))]
pub async fn get_game_by_id(
    game_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<GameView, DomainError> {
    let game = load_game(game_id, repo).await?;
    Ok(GameView::from_game(&game))
}

/// Retrieves the score every category would yield for the current hand.
/// Open categories report the evaluator's score; committed categories report
/// their committed value.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
#[instrument(skip(repo))]
pub async fn get_possible_scores(
    game_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<PossibleScoresView, DomainError> {
    let game = load_game(game_id, repo).await?;
    let scores = ScoreCategory::ALL
        .into_iter()
        .map(|category| match game.sheet.get(category) {
            Some(points) => CategoryScore {
                category,
                points,
                scored: true,
            },
            None => CategoryScore {
                category,
                points: scoring::score(game.dice, category),
                scored: false,
            },
        })
        .collect();
    Ok(PossibleScoresView { game_id, scores })
}
