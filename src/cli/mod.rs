//! Command-line interface.
//!
//! Provides:
//! - Argument parsing
//! - Interactive prompts for anything the arguments leave open

pub mod args;
pub mod prompt;

pub use args::Args;
pub use prompt::{gather_answers, resolve_assignment_choice, Answers};
