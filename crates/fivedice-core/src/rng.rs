//! Die-face generator abstraction for determinism.
//!
//! Rerolling dice is the engine's single source of observable randomness, so
//! the face generator is injected rather than pulled from an ambient global.
//! In production this wraps the thread-local RNG; tests and replays inject a
//! scripted implementation and assert exact resulting hands.

use rand::Rng;

/// Smallest legal die face.
pub const MIN_FACE: u8 = 1;
/// Largest legal die face.
pub const MAX_FACE: u8 = 6;

/// Abstraction over die-face generation.
pub trait DiceRng: Send + Sync {
    /// Draws a uniformly random face in `[1, 6]`.
    fn next_face(&mut self) -> u8;
}

/// Production generator backed by the thread-local RNG.
#[derive(Debug, Default)]
pub struct ThreadDiceRng;

impl DiceRng for ThreadDiceRng {
    fn next_face(&mut self) -> u8 {
        rand::rng().random_range(MIN_FACE..=MAX_FACE)
    }
}
