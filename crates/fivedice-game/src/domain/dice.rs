//! Dice value types.
//!
//! A [`Hand`] is five dice in stable positions `0..=4`. Order matters only
//! for keep selection: the client toggles individual positions as "kept",
//! so positions must survive rerolls unchanged.

use fivedice_core::error::DomainError;
use fivedice_core::rng::{MAX_FACE, MIN_FACE};
use serde::{Deserialize, Serialize};

/// Number of dice in a hand.
pub const HAND_SIZE: usize = 5;

/// A single die face, validated into `[1, 6]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Face(u8);

impl Face {
    /// Returns the numeric face value.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Face {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (MIN_FACE..=MAX_FACE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::Validation(format!(
                "die face out of range: {value}"
            )))
        }
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> Self {
        face.0
    }
}

/// An ordered hand of five dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand([Face; HAND_SIZE]);

impl Hand {
    /// Creates a hand from five faces.
    #[must_use]
    pub fn new(faces: [Face; HAND_SIZE]) -> Self {
        Self(faces)
    }

    /// Creates a hand from raw face values.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if any value is outside `[1, 6]`.
    pub fn try_from_values(values: [u8; HAND_SIZE]) -> Result<Self, DomainError> {
        let mut faces = [Face(MIN_FACE); HAND_SIZE];
        for (slot, value) in faces.iter_mut().zip(values) {
            *slot = Face::try_from(value)?;
        }
        Ok(Self(faces))
    }

    /// The placeholder hand a fresh game holds before its first roll.
    /// Face values are irrelevant until the round's first roll.
    #[must_use]
    pub fn placeholder() -> Self {
        Self([Face(MIN_FACE); HAND_SIZE])
    }

    /// Returns the face at `position`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<Face> {
        self.0.get(position).copied()
    }

    /// Replaces the face at `position`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPosition` if `position` is out of range.
    pub fn set(&mut self, position: usize, face: Face) -> Result<(), DomainError> {
        let slot = self
            .0
            .get_mut(position)
            .ok_or(DomainError::InvalidPosition(position))?;
        *slot = face;
        Ok(())
    }

    /// Returns the raw face values in position order.
    #[must_use]
    pub fn values(&self) -> [u8; HAND_SIZE] {
        self.0.map(Face::value)
    }

    /// Sum of all five faces.
    #[must_use]
    pub fn sum(&self) -> u32 {
        self.0.iter().map(|f| u32::from(f.value())).sum()
    }

    /// Histogram of face occurrences; index `i` counts face `i + 1`.
    #[must_use]
    pub fn face_counts(&self) -> [u32; 6] {
        let mut counts = [0u32; 6];
        for face in self.0 {
            counts[usize::from(face.value()) - 1] += 1;
        }
        counts
    }
}
