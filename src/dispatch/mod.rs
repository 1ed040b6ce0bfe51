/*!
Declarative command dispatch.

Layout:
  tokenize.rs    raw line -> positional tokens
  coerce.rs      token -> typed `Value` (closed set of semantic types)
  handler.rs     handler context, handler errors, typed-handler adaptation
  registry.rs    immutable command table + builder + built-in help/quit
  help.rs        help text rendered from the same table
  dispatcher.rs  match + coerce + invoke -> `DispatchOutcome`
  repl.rs        the read/dispatch/report loop over a `LineReader`

Everything the user can type, see in `help`, or complete with tab comes
from one `Registry`.
*/

pub mod coerce;
pub mod dispatcher;
pub mod handler;
pub mod help;
pub mod registry;
pub mod repl;
pub mod tokenize;

pub use coerce::{
    ArgumentConversionError, ConversionFailure, EnumSpec, FloatWidth, IntWidth, Param,
    SemanticType, Value, coerce,
};
pub use dispatcher::{DispatchOutcome, dispatch};
pub use handler::{CommandError, CommandResult, Context, Handler, IntoHandler};
pub use registry::{
    Command, CommandDescriptor, NO_HELP, ParameterDescriptor, Registry, RegistryBuilder,
    RegistryError,
};
pub use repl::{DEFAULT_PROMPT, LineReader, Repl, Termination};
pub use tokenize::tokenize;
