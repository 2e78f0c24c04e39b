//! Command dispatcher for the zoclaw setup scripts.
//!
//! `zoclaw <command> [options]` looks the command up in a fixed
//! [`CommandTable`], hands the matching shell script to an interpreter with
//! inherited standard streams, and relays the script's exit status.
//!
//! The pieces are kept separate so each can be exercised on its own:
//! [`parser`] turns the argument vector into an [`Invocation`] without side
//! effects, [`env`] builds the child's environment as an immutable value, and
//! [`Dispatcher`] ties them to the process launch.

pub mod command;
pub mod config;
mod dispatcher;
pub mod env;
mod external;
pub mod parser;

pub use command::{CommandTable, ExitCode, ScriptCommand};
pub use dispatcher::{Dispatcher, Resolution};
pub use external::ScriptRun;
pub use parser::Invocation;
