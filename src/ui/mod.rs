//! Terminal output for the CLI

pub mod events;
pub mod output;
