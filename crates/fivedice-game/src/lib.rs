//! Fivedice — game rules and session state machine.
//!
//! Owns the authoritative state of a single-player, 13-round dice game:
//! the hand, the reroll budget, the score sheet, and completion. The
//! scoring evaluator and the turn state machine live in `domain`; the
//! boundary callable by an external transport lives in `application`.

pub mod application;
pub mod domain;
