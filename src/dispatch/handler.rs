/*!
handler.rs - what a command handler sees and returns.

A handler is any `Fn(&mut Context<'_, S>, A, B, ...) -> CommandResult` whose
parameter types implement `Param` (arity 0 to 6). `IntoHandler` erases it into
a `Handler<S>` that takes the already-coerced `Vec<Value>`; the parameter
semantic types are read off the same signature, so a registered descriptor
always matches the handler it drives.
*/

use std::io::{self, Write};

use thiserror::Error;

use super::coerce::{Param, SemanticType, Value};
use super::registry::Registry;

/// Outcome of a handler body.
pub type CommandResult = Result<(), CommandError>;

/// Type-erased handler stored in a descriptor.
pub type Handler<S> = Box<dyn Fn(&mut Context<'_, S>, Vec<Value>) -> CommandResult>;

/// Failure raised by a handler.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Deliberate, user-facing failure; the loop reports it and continues.
    #[error("{0}")]
    Reported(String),

    /// Anything the handler did not anticipate.
    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

impl CommandError {
    /// Build a user-facing failure.
    pub fn reported(message: impl Into<String>) -> Self {
        CommandError::Reported(message.into())
    }
}

impl From<io::Error> for CommandError {
    fn from(err: io::Error) -> Self {
        CommandError::Unhandled(anyhow::Error::new(err).context("failed to write command output"))
    }
}

/// Per-invocation view handed to a handler.
pub struct Context<'a, S> {
    /// Handler-owned state, mutated only for the duration of one dispatch.
    pub state: &'a mut S,
    /// Output sink for everything the command prints.
    pub out: &'a mut dyn Write,
    registry: &'a Registry<S>,
    shutdown: bool,
}

impl<'a, S> Context<'a, S> {
    pub(crate) fn new(state: &'a mut S, out: &'a mut dyn Write, registry: &'a Registry<S>) -> Self {
        Self {
            state,
            out,
            registry,
            shutdown: false,
        }
    }

    /// Registry the command was dispatched from.
    pub fn registry(&self) -> &'a Registry<S> {
        self.registry
    }

    /// Ask the loop to stop once this handler returns successfully.
    pub fn request_shutdown(&mut self) {
        self.shutdown = true;
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown
    }
}

/// Conversion of a typed handler function into a `Handler<S>`.
///
/// `Args` is the tuple of the function's parameter types after the context; it
/// only exists to keep the per-arity implementations apart.
pub trait IntoHandler<S, Args> {
    /// Semantic types of the positional parameters, in order.
    fn param_types() -> Vec<SemanticType>;

    fn into_handler(self) -> Handler<S>;
}

/// Box a closure over already-coerced values.
pub(crate) fn erase<S, F>(handler: F) -> Handler<S>
where
    F: Fn(&mut Context<'_, S>, Vec<Value>) -> CommandResult + 'static,
{
    Box::new(handler)
}

fn shape_mismatch(position: usize) -> CommandError {
    CommandError::Unhandled(anyhow::anyhow!(
        "argument {position} does not match the declared parameter type"
    ))
}

macro_rules! impl_into_handler {
    ($($ty:ident),*) => {
        impl<S, F, $($ty,)*> IntoHandler<S, ($($ty,)*)> for F
        where
            S: 'static,
            F: Fn(&mut Context<'_, S>, $($ty),*) -> CommandResult + 'static,
            $($ty: Param + 'static,)*
        {
            fn param_types() -> Vec<SemanticType> {
                vec![$($ty::semantic_type()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_handler(self) -> Handler<S> {
                let handler = self;
                erase(move |ctx, values| {
                    let mut values = values.into_iter();
                    let mut position = 0usize;
                    $(
                        position += 1;
                        let $ty = values
                            .next()
                            .and_then($ty::from_value)
                            .ok_or_else(|| shape_mismatch(position))?;
                    )*
                    handler(ctx, $($ty),*)
                })
            }
        }
    };
}

impl_into_handler!();
impl_into_handler!(A);
impl_into_handler!(A, B);
impl_into_handler!(A, B, C);
impl_into_handler!(A, B, C, D);
impl_into_handler!(A, B, C, D, E);
impl_into_handler!(A, B, C, D, E, G);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Registry;

    fn sum(ctx: &mut Context<'_, i64>, a: i32, b: i32) -> CommandResult {
        *ctx.state += i64::from(a) + i64::from(b);
        writeln!(ctx.out, "sum={}", a + b)?;
        Ok(())
    }

    fn empty_registry() -> Registry<i64> {
        Registry::builder().build().unwrap()
    }

    fn types_of<H: IntoHandler<i64, Args>, Args>(_: &H) -> Vec<SemanticType> {
        H::param_types()
    }

    #[test]
    fn typed_handler_reports_param_types() {
        assert_eq!(
            types_of(&sum),
            vec![i32::semantic_type(), i32::semantic_type()]
        );
    }

    #[test]
    fn erased_handler_unpacks_values() {
        let registry = empty_registry();
        let handler = IntoHandler::<i64, (i32, i32)>::into_handler(sum);
        let mut state = 1i64;
        let mut out: Vec<u8> = Vec::new();
        let mut ctx = Context::new(&mut state, &mut out, &registry);
        handler(&mut ctx, vec![Value::I32(3), Value::I32(4)]).unwrap();
        assert_eq!(state, 8);
        assert_eq!(String::from_utf8(out).unwrap(), "sum=7\n");
    }

    #[test]
    fn erased_handler_rejects_wrong_shape() {
        let registry = empty_registry();
        let handler = IntoHandler::<i64, (i32, i32)>::into_handler(sum);
        let mut state = 0i64;
        let mut out: Vec<u8> = Vec::new();
        let mut ctx = Context::new(&mut state, &mut out, &registry);
        let err = handler(&mut ctx, vec![Value::I32(3)]).unwrap_err();
        assert!(matches!(err, CommandError::Unhandled(_)));
        assert!(err.to_string().contains("argument 2"));
    }

    #[test]
    fn shutdown_flag_starts_clear() {
        let registry = empty_registry();
        let mut state = 0i64;
        let mut out: Vec<u8> = Vec::new();
        let mut ctx = Context::new(&mut state, &mut out, &registry);
        assert!(!ctx.shutdown_requested());
        ctx.request_shutdown();
        assert!(ctx.shutdown_requested());
    }

    #[test]
    fn reported_error_displays_message() {
        let err = CommandError::reported("division by zero");
        assert_eq!(err.to_string(), "division by zero");
    }

    #[test]
    fn io_errors_become_unhandled() {
        let err = CommandError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert!(matches!(err, CommandError::Unhandled(_)));
    }
}
