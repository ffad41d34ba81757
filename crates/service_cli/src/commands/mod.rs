//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod integrate;
pub mod points;
