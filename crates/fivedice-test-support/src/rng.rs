//! Test RNGs — deterministic `DiceRng` implementations for tests.

use fivedice_core::rng::DiceRng;

/// A die generator that always lands on the same face. Suitable for tests
/// that do not depend on specific rolled hands.
#[derive(Debug, Clone, Copy)]
pub struct ConstantDiceRng(pub u8);

impl DiceRng for ConstantDiceRng {
    fn next_face(&mut self) -> u8 {
        self.0
    }
}

/// A die generator that returns faces from a predetermined sequence. Panics
/// if the sequence is exhausted. Used in tests that assert exact resulting
/// hands after a reroll.
#[derive(Debug)]
pub struct SequenceDiceRng {
    faces: Vec<u8>,
    index: usize,
}

impl SequenceDiceRng {
    /// Create a new `SequenceDiceRng` with the given faces.
    #[must_use]
    pub fn new(faces: Vec<u8>) -> Self {
        Self { faces, index: 0 }
    }
}

impl DiceRng for SequenceDiceRng {
    fn next_face(&mut self) -> u8 {
        let face = self.faces[self.index];
        self.index += 1;
        face
    }
}
