//! Terminal client for maestro.
//!
//! The binary in `main.rs` is the composition root; handlers receive a
//! [`CliContext`] and never build clients themselves.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod bootstrap;
pub mod commands;
pub mod console;
pub mod error;
pub mod handlers;
pub mod interactive;
pub mod logging;
pub mod parser;

pub use bootstrap::{CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;

// Only used by the binary target.
use anyhow as _;
use dotenvy as _;

#[cfg(test)]
use tokio_test as _;
