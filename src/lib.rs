//! pTable: look up chemical element data from the terminal.
//!
//! The crate bundles a validated table of all 118 elements and a small
//! command interpreter on top of it. Elements can be queried by atomic
//! number, by symbol (case-sensitive) or by name (case-insensitive).
//!
//! The main entry point is [`Interpreter`], which dispatches typed command
//! lines to builtins such as `display` and `compare`. The public modules
//! [`command`] and [`env`] expose the traits and state used to plug in
//! additional commands, while [`table`] and [`element`] hold the data model.

mod builtin;
pub mod command;
pub mod element;
pub mod env;
mod interpreter;
pub mod table;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;

pub use element::{Element, Group, Query};
pub use table::{LookupError, Table, TableError};
