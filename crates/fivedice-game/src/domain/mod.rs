//! Domain layer: value types, scoring rules, events, commands, and the
//! game aggregate.

pub mod aggregates;
pub mod commands;
pub mod dice;
pub mod events;
pub mod scoring;
pub mod sheet;
