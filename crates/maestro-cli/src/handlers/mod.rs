//! Command handlers.
//!
//! Each handler has the shape `execute(ctx: &CliContext, ...)` and only
//! wires runtime components together and formats output.

pub mod run;
pub mod send;
pub mod state;
