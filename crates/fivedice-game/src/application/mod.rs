//! Application layer: command and query handlers callable by an external
//! transport or session store.

pub mod command_handlers;
pub mod query_handlers;
