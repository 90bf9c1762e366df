//! Commands for the game context.

use std::collections::BTreeSet;

use fivedice_core::command::Command;
use uuid::Uuid;

use super::scoring::ScoreCategory;

/// Command to start a new game session.
#[derive(Debug, Clone)]
pub struct StartGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Display name of the player.
    pub player_name: String,
}

impl Command for StartGame {
    fn command_type(&self) -> &'static str {
        "game.start"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to reroll the dice not named in `keep_positions`.
#[derive(Debug, Clone)]
pub struct RerollDice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: Uuid,
    /// Die positions to hold through the roll.
    pub keep_positions: BTreeSet<usize>,
}

impl Command for RerollDice {
    fn command_type(&self) -> &'static str {
        "game.reroll_dice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to flip a die position's kept flag.
#[derive(Debug, Clone)]
pub struct ToggleKeep {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: Uuid,
    /// The die position to toggle.
    pub position: usize,
}

impl Command for ToggleKeep {
    fn command_type(&self) -> &'static str {
        "game.toggle_keep"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to commit the current hand's score into a category.
#[derive(Debug, Clone)]
pub struct CommitScore {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The game identifier.
    pub game_id: Uuid,
    /// The category to commit.
    pub category: ScoreCategory,
}

impl Command for CommitScore {
    fn command_type(&self) -> &'static str {
        "game.commit_score"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
