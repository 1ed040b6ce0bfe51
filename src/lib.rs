//! cmdloop: turn a table of typed command handlers into an interactive
//! read-eval-print loop, with help text and tab completion derived from the
//! same table.
//!
//! - [`dispatch`]: tokenizer, coercion, registry, dispatcher, help, loop driver
//! - [`reader`]: line readers for the loop (plain `BufRead` and rustyline)

pub mod dispatch;
pub mod reader;

pub use dispatch::{
    Command, CommandError, CommandResult, Context, DispatchOutcome, Registry, Repl, Termination,
};
