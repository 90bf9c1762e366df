//! Aggregate root for the game context.
//!
//! One `Game` is one complete 13-round session. Every mutation validates its
//! preconditions against current state and then emits exactly one event;
//! nothing is mutated directly, so a rejected intent leaves the aggregate
//! untouched. Replay folds events back through [`AggregateRoot::apply`] —
//! rolled faces are stored in the events, so reconstitution never touches
//! the random source.

use std::collections::BTreeSet;

use fivedice_core::aggregate::AggregateRoot;
use fivedice_core::clock::Clock;
use fivedice_core::error::DomainError;
use fivedice_core::event::{DomainEvent, EventMetadata};
use fivedice_core::rng::DiceRng;
use uuid::Uuid;

use super::dice::{Face, HAND_SIZE, Hand};
use super::events::{
    CategoryScored, DiceRolled, GameEvent, GameEventKind, GameStarted, KeepToggled,
};
use super::scoring::{self, ScoreCategory};
use super::sheet::ScoreSheet;

/// Rolls available at the start of every round.
pub const ROLLS_PER_ROUND: u8 = 3;

/// Rounds in a complete game, one per category.
#[allow(clippy::cast_possible_truncation)]
pub const ROUNDS_PER_GAME: u8 = ScoreCategory::ALL.len() as u8;

/// The turn phase, derived from `(rolls_left, round, game_complete)`.
/// Never stored; always a pure function of the aggregate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// Round underway, no roll taken yet (`rolls_left == 3`).
    AwaitingFirstRoll,
    /// One or two rolls left; the player may reroll or score.
    AwaitingRerollOrScore,
    /// No rolls left; the player must score.
    AwaitingScoreOnly,
    /// All thirteen categories committed. No further mutation.
    Complete,
}

/// The aggregate root for a game session.
#[derive(Debug)]
pub struct Game {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    /// Display name of the player.
    pub(crate) player_name: String,
    /// The current hand, positions 0..=4.
    pub(crate) dice: Hand,
    /// Die positions held out of the next reroll.
    pub(crate) kept_positions: BTreeSet<usize>,
    /// Rolls remaining in the current round, 0..=3.
    pub(crate) rolls_left: u8,
    /// Current round, 1..=13 while in play.
    pub(crate) round: u8,
    /// The 13-slot score sheet.
    pub(crate) sheet: ScoreSheet,
    /// Whether all categories have been committed.
    pub(crate) game_complete: bool,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<GameEvent>,
}

impl Game {
    /// Creates a blank game aggregate awaiting its `GameStarted` event.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            player_name: String::new(),
            dice: Hand::placeholder(),
            kept_positions: BTreeSet::new(),
            rolls_left: ROLLS_PER_ROUND,
            round: 1,
            sheet: ScoreSheet::new(),
            game_complete: false,
            uncommitted_events: Vec::new(),
        }
    }

    /// Returns the derived turn phase.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        if self.game_complete {
            TurnPhase::Complete
        } else if self.rolls_left == ROLLS_PER_ROUND {
            TurnPhase::AwaitingFirstRoll
        } else if self.rolls_left == 0 {
            TurnPhase::AwaitingScoreOnly
        } else {
            TurnPhase::AwaitingRerollOrScore
        }
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn emit(&mut self, kind: GameEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let mut event = GameEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: String::new(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                causation_id: correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        event.metadata.event_type = event.event_type().to_owned();
        self.uncommitted_events.push(event);
    }

    /// Starts the session, producing a `GameStarted` event.
    ///
    /// The initial hand is a placeholder; face values carry no meaning until
    /// the round's first roll.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the game already started.
    pub fn start(
        &mut self,
        player_name: String,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.version > 0 || !self.uncommitted_events.is_empty() {
            return Err(DomainError::InvalidTransition(
                "game already started".to_owned(),
            ));
        }

        self.emit(
            GameEventKind::GameStarted(GameStarted {
                game_id: self.id,
                player_name,
                dice: Hand::placeholder(),
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Rerolls every die position not named in `keep_positions`, producing a
    /// `DiceRolled` event that records the resulting hand.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the game is complete or no
    /// rolls remain, and `DomainError::InvalidPosition` for any keep position
    /// outside `0..=4`. On error nothing is rolled and no event is emitted.
    pub fn reroll(
        &mut self,
        keep_positions: &BTreeSet<usize>,
        correlation_id: Uuid,
        clock: &dyn Clock,
        rng: &mut dyn DiceRng,
    ) -> Result<(), DomainError> {
        if self.game_complete {
            return Err(DomainError::InvalidTransition(
                "game is complete".to_owned(),
            ));
        }
        if self.rolls_left == 0 {
            return Err(DomainError::InvalidTransition(
                "no rolls left in this round".to_owned(),
            ));
        }
        if let Some(&position) = keep_positions.iter().find(|&&p| p >= HAND_SIZE) {
            return Err(DomainError::InvalidPosition(position));
        }

        let mut dice = self.dice;
        for position in 0..HAND_SIZE {
            if !keep_positions.contains(&position) {
                dice.set(position, Face::try_from(rng.next_face())?)?;
            }
        }

        self.emit(
            GameEventKind::DiceRolled(DiceRolled {
                game_id: self.id,
                kept_positions: keep_positions.iter().copied().collect(),
                dice,
                rolls_left: self.rolls_left - 1,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Flips the kept flag of a die position, producing a `KeepToggled`
    /// event. Pure selection state; no scoring side effect.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the game is complete or
    /// the round's first roll has not happened yet, and
    /// `DomainError::InvalidPosition` for a position outside `0..=4`.
    pub fn toggle_keep(
        &mut self,
        position: usize,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.game_complete {
            return Err(DomainError::InvalidTransition(
                "game is complete".to_owned(),
            ));
        }
        if self.rolls_left == ROLLS_PER_ROUND {
            return Err(DomainError::InvalidTransition(
                "cannot keep dice before the round's first roll".to_owned(),
            ));
        }
        if position >= HAND_SIZE {
            return Err(DomainError::InvalidPosition(position));
        }

        self.emit(
            GameEventKind::KeepToggled(KeepToggled {
                game_id: self.id,
                position,
                kept: !self.kept_positions.contains(&position),
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Commits the current hand's score into `category`, producing a
    /// `CategoryScored` event. Ends the round: the budget resets to three
    /// rolls, kept positions clear, and the round advances. The thirteenth
    /// commit completes the game.
    ///
    /// Committing with all three rolls unused is legal: the original state
    /// machine allows scoring the round's opening hand as-is.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the game is complete and
    /// `DomainError::CategoryAlreadyScored` if the category holds a value.
    pub fn commit_score(
        &mut self,
        category: ScoreCategory,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.game_complete {
            return Err(DomainError::InvalidTransition(
                "game is complete".to_owned(),
            ));
        }
        if self.sheet.is_scored(category) {
            return Err(DomainError::CategoryAlreadyScored(category.tag().to_owned()));
        }

        let points = scoring::score(self.dice, category);

        self.emit(
            GameEventKind::CategoryScored(CategoryScored {
                game_id: self.id,
                category,
                points,
                round: self.round,
                game_complete: self.round >= ROUNDS_PER_GAME,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }
}

impl AggregateRoot for Game {
    type Event = GameEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            GameEventKind::GameStarted(payload) => {
                self.player_name.clone_from(&payload.player_name);
                self.dice = payload.dice;
                self.kept_positions.clear();
                self.rolls_left = ROLLS_PER_ROUND;
                self.round = 1;
                self.sheet = ScoreSheet::new();
                self.game_complete = false;
            }
            GameEventKind::DiceRolled(payload) => {
                self.dice = payload.dice;
                self.rolls_left = payload.rolls_left;
                self.kept_positions = payload.kept_positions.iter().copied().collect();
            }
            GameEventKind::KeepToggled(payload) => {
                if payload.kept {
                    self.kept_positions.insert(payload.position);
                } else {
                    self.kept_positions.remove(&payload.position);
                }
            }
            GameEventKind::CategoryScored(payload) => {
                self.sheet.record(payload.category, payload.points);
                self.rolls_left = ROLLS_PER_ROUND;
                self.kept_positions.clear();
                self.round = payload.round + 1;
                self.game_complete = payload.game_complete;
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
