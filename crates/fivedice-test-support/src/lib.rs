//! Shared test mocks and utilities for the Fivedice game engine.

mod clock;
mod repository;
mod rng;

pub use clock::FixedClock;
pub use repository::{
    EmptyEventRepository, FailingEventRepository, InMemoryEventRepository,
    RecordingEventRepository,
};
pub use rng::{ConstantDiceRng, SequenceDiceRng};
