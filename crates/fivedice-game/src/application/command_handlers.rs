//! Command handlers for the game context.
//!
//! Application-level orchestration: load the aggregate's events, execute the
//! command against the reconstituted state, persist the produced events.
//! Appending carries the expected version, so two racing mutations of one
//! session serialize at the store and the loser sees a concurrency conflict.

use std::collections::BTreeSet;

use fivedice_core::aggregate::AggregateRoot;
use fivedice_core::clock::Clock;
use fivedice_core::error::DomainError;
use fivedice_core::event::DomainEvent;
use fivedice_core::repository::{EventRepository, StoredEvent};
use fivedice_core::rng::DiceRng;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::query_handlers::{self, GameView};
use crate::domain::aggregates::Game;
use crate::domain::commands::{CommitScore, RerollDice, StartGame, ToggleKeep};
use crate::domain::events::{GameEvent, GameEventKind};
use crate::domain::scoring::ScoreCategory;

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct GameCommandResult {
    /// The aggregate ID affected or created by the command.
    pub aggregate_id: Uuid,
    /// The stored events produced and persisted.
    pub stored_events: Vec<StoredEvent>,
}

/// A player intent against an existing session, as delivered by the
/// transport. `CommitScore` fails to deserialize on an unknown category tag,
/// which is how `InvalidCategory` surfaces at this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameIntent {
    /// Reroll every die position not named in `keep_positions`.
    Reroll {
        /// Die positions to hold through the roll.
        keep_positions: BTreeSet<usize>,
    },
    /// Flip a die position's kept flag.
    ToggleKeep {
        /// The die position to toggle.
        position: usize,
    },
    /// Commit the current hand's score into a category.
    CommitScore {
        /// The category to commit.
        category: ScoreCategory,
    },
}

fn to_stored_event(event: &GameEvent) -> StoredEvent {
    let meta = event.metadata();
    StoredEvent {
        event_id: meta.event_id,
        aggregate_id: meta.aggregate_id,
        event_type: event.event_type().to_owned(),
        payload: event.to_payload(),
        sequence_number: meta.sequence_number,
        correlation_id: meta.correlation_id,
        causation_id: meta.causation_id,
        occurred_at: meta.occurred_at,
    }
}

/// Reconstitutes a `Game` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    game_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<Game, DomainError> {
    let mut game = Game::new(game_id);
    for stored in existing_events {
        let kind: GameEventKind = serde_json::from_value(stored.payload.clone()).map_err(|e| {
            DomainError::Infrastructure(format!("event deserialization failed: {e}"))
        })?;
        let event = GameEvent {
            metadata: fivedice_core::event::EventMetadata {
                event_id: stored.event_id,
                event_type: stored.event_type.clone(),
                aggregate_id: stored.aggregate_id,
                sequence_number: stored.sequence_number,
                correlation_id: stored.correlation_id,
                causation_id: stored.causation_id,
                occurred_at: stored.occurred_at,
            },
            kind,
        };
        game.apply(&event);
    }
    Ok(game)
}

async fn load_game(game_id: Uuid, repo: &dyn EventRepository) -> Result<Game, DomainError> {
    let existing_events = repo.load_events(game_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(game_id));
    }
    reconstitute(game_id, &existing_events)
}

async fn persist(game: &Game, repo: &dyn EventRepository) -> Result<GameCommandResult, DomainError> {
    let stored_events: Vec<StoredEvent> = game
        .uncommitted_events()
        .iter()
        .map(to_stored_event)
        .collect();

    repo.append_events(game.aggregate_id(), game.version(), &stored_events)
        .await?;

    Ok(GameCommandResult {
        aggregate_id: game.aggregate_id(),
        stored_events,
    })
}

/// Handles the `StartGame` command: creates a new aggregate, starts the
/// session, and persists the resulting events.
///
/// # Errors
///
/// Returns `DomainError` if event appending fails.
#[instrument(skip(command, clock, repo), fields(player_name = %command.player_name))]
pub async fn handle_start_game(
    command: &StartGame,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<GameCommandResult, DomainError> {
    let game_id = Uuid::new_v4();
    let mut game = Game::new(game_id);

    game.start(command.player_name.clone(), command.correlation_id, clock)?;

    info!(correlation_id = %command.correlation_id, %game_id, "starting new game");
    persist(&game, repo).await
}

/// Handles the `RerollDice` command: reconstitutes the aggregate, rerolls
/// the non-kept dice with the injected face generator, and persists the
/// resulting events.
///
/// # Errors
///
/// Returns `DomainError` if the game does not exist, the reroll is illegal
/// in the current state, or event loading/appending fails.
#[instrument(skip(command, clock, rng, repo), fields(game_id = %command.game_id))]
pub async fn handle_reroll(
    command: &RerollDice,
    clock: &dyn Clock,
    rng: &mut dyn DiceRng,
    repo: &dyn EventRepository,
) -> Result<GameCommandResult, DomainError> {
    let mut game = load_game(command.game_id, repo).await?;

    game.reroll(&command.keep_positions, command.correlation_id, clock, rng)?;

    info!(correlation_id = %command.correlation_id, "rerolled dice");
    persist(&game, repo).await
}

/// Handles the `ToggleKeep` command: reconstitutes the aggregate, flips the
/// position's kept flag, and persists the resulting events.
///
/// # Errors
///
/// Returns `DomainError` if the game does not exist, the toggle is illegal
/// in the current state, or event loading/appending fails.
#[instrument(skip(command, clock, repo), fields(game_id = %command.game_id))]
pub async fn handle_toggle_keep(
    command: &ToggleKeep,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<GameCommandResult, DomainError> {
    let mut game = load_game(command.game_id, repo).await?;

    game.toggle_keep(command.position, command.correlation_id, clock)?;

    info!(correlation_id = %command.correlation_id, position = command.position, "toggled keep");
    persist(&game, repo).await
}

/// Handles the `CommitScore` command: reconstitutes the aggregate, commits
/// the evaluator's score for the current hand, and persists the resulting
/// events.
///
/// # Errors
///
/// Returns `DomainError` if the game does not exist, the category is already
/// scored, the game is complete, or event loading/appending fails.
#[instrument(skip(command, clock, repo), fields(game_id = %command.game_id))]
pub async fn handle_commit_score(
    command: &CommitScore,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<GameCommandResult, DomainError> {
    let mut game = load_game(command.game_id, repo).await?;

    game.commit_score(command.category, command.correlation_id, clock)?;

    info!(correlation_id = %command.correlation_id, category = command.category.tag(), "committed score");
    persist(&game, repo).await
}

/// Single entry point for player intents against an existing session:
/// dispatches to the matching command handler and returns the updated
/// session snapshot.
///
/// # Errors
///
/// Returns the dispatched handler's `DomainError` unchanged; on failure the
/// session state is untouched.
pub async fn handle_apply_intent(
    game_id: Uuid,
    correlation_id: Uuid,
    intent: GameIntent,
    clock: &dyn Clock,
    rng: &mut dyn DiceRng,
    repo: &dyn EventRepository,
) -> Result<GameView, DomainError> {
    match intent {
        GameIntent::Reroll { keep_positions } => {
            let command = RerollDice {
                correlation_id,
                game_id,
                keep_positions,
            };
            handle_reroll(&command, clock, rng, repo).await?;
        }
        GameIntent::ToggleKeep { position } => {
            let command = ToggleKeep {
                correlation_id,
                game_id,
                position,
            };
            handle_toggle_keep(&command, clock, repo).await?;
        }
        GameIntent::CommitScore { category } => {
            let command = CommitScore {
                correlation_id,
                game_id,
                category,
            };
            handle_commit_score(&command, clock, repo).await?;
        }
    }
    query_handlers::get_game_by_id(game_id, repo).await
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use fivedice_core::error::DomainError;
    use fivedice_core::repository::StoredEvent;
    use uuid::Uuid;

    use super::*;
    use crate::domain::dice::Hand;
    use crate::domain::events::GameStarted;
    use fivedice_test_support::{
        FailingEventRepository, FixedClock, InMemoryEventRepository, RecordingEventRepository,
        SequenceDiceRng,
    };

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn stored_game_started(game_id: Uuid) -> StoredEvent {
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: game_id,
            event_type: "game.started".to_owned(),
            payload: serde_json::to_value(GameEventKind::GameStarted(GameStarted {
                game_id,
                player_name: "Alice".to_owned(),
                dice: Hand::placeholder(),
            }))
            .unwrap(),
            sequence_number: 1,
            correlation_id: Uuid::new_v4(),
            causation_id: Uuid::new_v4(),
            occurred_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn test_handle_start_game_persists_game_started_event() {
        // Arrange
        let correlation_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let repo = RecordingEventRepository::new(Vec::new());
        let command = StartGame {
            correlation_id,
            player_name: "Alice".to_owned(),
        };

        // Act
        let result = handle_start_game(&command, &clock, &repo).await;

        // Assert
        let cmd_result = result.unwrap();
        assert_eq!(cmd_result.stored_events.len(), 1);

        let appended = repo.appended_events();
        assert_eq!(appended.len(), 1);

        let (agg_id, expected_version, events) = &appended[0];
        assert_eq!(*agg_id, cmd_result.aggregate_id);
        assert_eq!(*expected_version, 0);
        assert_eq!(events.len(), 1);

        let stored = &events[0];
        assert_eq!(stored.event_type, "game.started");
        assert_eq!(stored.aggregate_id, cmd_result.aggregate_id);
        assert_eq!(stored.sequence_number, 1);
        assert_eq!(stored.correlation_id, correlation_id);
        assert_eq!(stored.causation_id, correlation_id);
        assert_eq!(stored.occurred_at, fixed_now());
    }

    #[tokio::test]
    async fn test_handle_reroll_persists_dice_rolled_event() {
        // Arrange
        let game_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let repo = RecordingEventRepository::new(vec![stored_game_started(game_id)]);
        let mut rng = SequenceDiceRng::new(vec![2, 3, 4, 5, 6]);
        let command = RerollDice {
            correlation_id,
            game_id,
            keep_positions: BTreeSet::new(),
        };

        // Act
        let result = handle_reroll(&command, &clock, &mut rng, &repo).await;

        // Assert
        let cmd_result = result.unwrap();
        assert_eq!(cmd_result.aggregate_id, game_id);
        assert_eq!(cmd_result.stored_events.len(), 1);

        let appended = repo.appended_events();
        let (agg_id, expected_version, events) = &appended[0];
        assert_eq!(*agg_id, game_id);
        assert_eq!(*expected_version, 1);
        assert_eq!(events[0].event_type, "game.dice_rolled");
        assert_eq!(events[0].sequence_number, 2);
    }

    #[tokio::test]
    async fn test_handle_reroll_returns_not_found_for_missing_game() {
        let game_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let repo = RecordingEventRepository::new(Vec::new());
        let mut rng = SequenceDiceRng::new(vec![1, 1, 1, 1, 1]);
        let command = RerollDice {
            correlation_id: Uuid::new_v4(),
            game_id,
            keep_positions: BTreeSet::new(),
        };

        let result = handle_reroll(&command, &clock, &mut rng, &repo).await;

        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, game_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
        assert!(repo.appended_events().is_empty());
    }

    #[tokio::test]
    async fn test_handle_toggle_keep_before_first_roll_is_rejected() {
        let game_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let repo = RecordingEventRepository::new(vec![stored_game_started(game_id)]);
        let command = ToggleKeep {
            correlation_id: Uuid::new_v4(),
            game_id,
            position: 0,
        };

        let result = handle_toggle_keep(&command, &clock, &repo).await;

        assert!(matches!(
            result.unwrap_err(),
            DomainError::InvalidTransition(_)
        ));
        assert!(repo.appended_events().is_empty());
    }

    #[tokio::test]
    async fn test_handle_commit_score_persists_category_scored_event() {
        let game_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let repo = RecordingEventRepository::new(vec![stored_game_started(game_id)]);
        let command = CommitScore {
            correlation_id,
            game_id,
            category: ScoreCategory::Chance,
        };

        let result = handle_commit_score(&command, &clock, &repo).await;

        let cmd_result = result.unwrap();
        assert_eq!(cmd_result.stored_events.len(), 1);
        let stored = &cmd_result.stored_events[0];
        assert_eq!(stored.event_type, "game.category_scored");
        assert_eq!(stored.sequence_number, 2);
    }

    #[tokio::test]
    async fn test_handle_apply_intent_returns_updated_snapshot() {
        let game_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let repo = InMemoryEventRepository::new();
        repo.append_events(game_id, 0, &[stored_game_started(game_id)])
            .await
            .unwrap();
        let mut rng = SequenceDiceRng::new(vec![]);

        let view = handle_apply_intent(
            game_id,
            Uuid::new_v4(),
            GameIntent::CommitScore {
                category: ScoreCategory::Yahtzee,
            },
            &clock,
            &mut rng,
            &repo,
        )
        .await
        .unwrap();

        // Placeholder hand is five ones, a yahtzee.
        assert_eq!(view.score_sheet.yahtzee, Some(50));
        assert_eq!(view.round, 2);
        assert_eq!(view.rolls_left, 3);
    }

    #[tokio::test]
    async fn test_handle_start_game_propagates_infrastructure_error() {
        let clock = FixedClock(fixed_now());
        let repo = FailingEventRepository;
        let command = StartGame {
            correlation_id: Uuid::new_v4(),
            player_name: "Alice".to_owned(),
        };

        let result = handle_start_game(&command, &clock, &repo).await;

        assert!(matches!(
            result.unwrap_err(),
            DomainError::Infrastructure(_)
        ));
    }

    #[test]
    fn test_game_intent_rejects_unknown_category_tag() {
        let raw = r#"{"type":"commit_score","category":"threeofkind"}"#;
        let parsed: Result<GameIntent, _> = serde_json::from_str(raw);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_game_intent_wire_shape() {
        let raw = r#"{"type":"reroll","keep_positions":[0,3]}"#;
        let parsed: GameIntent = serde_json::from_str(raw).unwrap();
        match parsed {
            GameIntent::Reroll { keep_positions } => {
                assert_eq!(keep_positions.into_iter().collect::<Vec<_>>(), vec![0, 3]);
            }
            other => panic!("expected Reroll, got {other:?}"),
        }
    }
}
