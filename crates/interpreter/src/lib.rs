//! Command script interpreter for the smart store engine.
//!
//! Scripts hold one command per line (`define-store S1 Corner "1 Main St"`).
//! Each line is tokenized, parsed into a [`Command`] and applied to a
//! [`engine::StoreService`]. Failures are collected into the
//! [`ScriptReport`] rather than aborting the script.

pub mod command;
pub mod error;
pub mod processor;
pub mod tokenizer;

pub use command::Command;
pub use error::{CommandError, ExecutionError, ScriptError, SyntaxError};
pub use processor::{CommandProcessor, CommandRecord, Outcome, ScriptReport};
