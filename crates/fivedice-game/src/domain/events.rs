//! Domain events for the game context.

use fivedice_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dice::Hand;
use super::scoring::ScoreCategory;

/// Emitted when a new game is started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStarted {
    /// The game identifier.
    pub game_id: Uuid,
    /// Display name of the player.
    pub player_name: String,
    /// The initial placeholder hand.
    pub dice: Hand,
}

/// Emitted when dice are (re)rolled. Carries the resulting hand so replay
/// never has to consult the random source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiceRolled {
    /// The game identifier.
    pub game_id: Uuid,
    /// Positions that were held and not rerolled.
    pub kept_positions: Vec<usize>,
    /// The full hand after the roll.
    pub dice: Hand,
    /// Rolls remaining in the round after this roll.
    pub rolls_left: u8,
}

/// Emitted when a die position's kept flag is flipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeepToggled {
    /// The game identifier.
    pub game_id: Uuid,
    /// The die position whose membership changed.
    pub position: usize,
    /// Whether the position is kept after the toggle.
    pub kept: bool,
}

/// Emitted when a category is committed. Ends the round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScored {
    /// The game identifier.
    pub game_id: Uuid,
    /// The committed category.
    pub category: ScoreCategory,
    /// The points the evaluator awarded for the current hand.
    pub points: u32,
    /// The round in which the commit happened (1..=13).
    pub round: u8,
    /// Whether this commit completed the game.
    pub game_complete: bool,
}

/// Event type identifier for [`GameStarted`].
pub const GAME_STARTED_EVENT_TYPE: &str = "game.started";

/// Event type identifier for [`DiceRolled`].
pub const DICE_ROLLED_EVENT_TYPE: &str = "game.dice_rolled";

/// Event type identifier for [`KeepToggled`].
pub const KEEP_TOGGLED_EVENT_TYPE: &str = "game.keep_toggled";

/// Event type identifier for [`CategoryScored`].
pub const CATEGORY_SCORED_EVENT_TYPE: &str = "game.category_scored";

/// Event payload variants for the game context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEventKind {
    /// A game has started.
    GameStarted(GameStarted),
    /// Dice have been rolled.
    DiceRolled(DiceRolled),
    /// A kept flag has been flipped.
    KeepToggled(KeepToggled),
    /// A category has been committed.
    CategoryScored(CategoryScored),
}

/// Domain event envelope for the game context.
#[derive(Debug, Clone)]
pub struct GameEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GameEventKind,
}

impl DomainEvent for GameEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            GameEventKind::GameStarted(_) => GAME_STARTED_EVENT_TYPE,
            GameEventKind::DiceRolled(_) => DICE_ROLLED_EVENT_TYPE,
            GameEventKind::KeepToggled(_) => KEEP_TOGGLED_EVENT_TYPE,
            GameEventKind::CategoryScored(_) => CATEGORY_SCORED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("GameEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
