//! Fivedice Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types the game engine
//! depends on. It contains no game rules and no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod repository;
pub mod rng;
