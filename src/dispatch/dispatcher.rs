/*!
dispatcher.rs - match, coerce, invoke, classify.

  1. first descriptor with a case-insensitive name match and exact arity
  2. coerce each token in parameter order; first failure aborts the call
  3. invoke the handler synchronously
  4. turn whatever happened into a `DispatchOutcome`

Nothing a handler does escapes this boundary: every failure becomes an
outcome value the loop driver inspects.
*/

use std::io::{self, Write};

use super::coerce::{ArgumentConversionError, coerce};
use super::handler::{CommandError, Context};
use super::registry::Registry;

pub const UNKNOWN_COMMAND_MESSAGE: &str = "Unknown command or wrong parameter count";
pub const CONVERSION_MESSAGE: &str = "invalid numeric parameter given";
pub const REPORTED_PREFIX: &str = "failed to execute command: ";

/// Result of dispatching one command.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The handler ran to completion.
    Success,
    /// No descriptor with that name and argument count.
    UnknownCommand,
    /// A token did not fit its parameter type; the handler was not called.
    ArgumentConversion(ArgumentConversionError),
    /// The handler reported a user-facing failure.
    UserReported(String),
    /// The handler asked the loop to stop.
    ShutdownRequested,
    /// The handler failed in a way it did not anticipate.
    Unhandled(anyhow::Error),
}

impl DispatchOutcome {
    pub fn is_shutdown(&self) -> bool {
        matches!(self, DispatchOutcome::ShutdownRequested)
    }

    /// Whether the outcome represents any kind of failure.
    pub fn is_failure(&self) -> bool {
        !matches!(
            self,
            DispatchOutcome::Success | DispatchOutcome::ShutdownRequested
        )
    }

    /// Write the user-facing message for this outcome, if it has one.
    pub fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        match self {
            DispatchOutcome::Success | DispatchOutcome::ShutdownRequested => Ok(()),
            DispatchOutcome::UnknownCommand => writeln!(out, "{UNKNOWN_COMMAND_MESSAGE}"),
            DispatchOutcome::ArgumentConversion(_) => writeln!(out, "{CONVERSION_MESSAGE}"),
            DispatchOutcome::UserReported(message) => writeln!(out, "{REPORTED_PREFIX}{message}"),
            DispatchOutcome::Unhandled(err) => writeln!(out, "error: {err:?}"),
        }
    }
}

/// Dispatch `name` with positional `args` against `registry`.
pub fn dispatch<S>(
    registry: &Registry<S>,
    state: &mut S,
    out: &mut dyn Write,
    name: &str,
    args: &[&str],
) -> DispatchOutcome {
    let Some(descriptor) = registry.find(name, args.len()) else {
        tracing::debug!(command = name, arity = args.len(), "no matching command");
        return DispatchOutcome::UnknownCommand;
    };

    let values = match descriptor
        .params()
        .iter()
        .zip(args)
        .map(|(param, token)| coerce(token, &param.semantic_type))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(values) => values,
        Err(err) => {
            tracing::debug!(command = descriptor.name(), error = %err, "argument conversion failed");
            return DispatchOutcome::ArgumentConversion(err);
        }
    };

    tracing::debug!(command = descriptor.name(), arity = args.len(), "invoking handler");
    let mut ctx = Context::new(state, out, registry);
    match descriptor.invoke(&mut ctx, values) {
        Ok(()) if ctx.shutdown_requested() => DispatchOutcome::ShutdownRequested,
        Ok(()) => DispatchOutcome::Success,
        Err(CommandError::Reported(message)) => {
            tracing::debug!(command = descriptor.name(), %message, "command reported failure");
            DispatchOutcome::UserReported(message)
        }
        Err(CommandError::Unhandled(err)) => {
            tracing::error!(command = descriptor.name(), error = ?err, "command failed unexpectedly");
            DispatchOutcome::Unhandled(err)
        }
    }
}
