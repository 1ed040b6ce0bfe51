/*!
Line readers for `Repl::run`.

  PlainReader   any `BufRead` + prompt sink; piped input, scripts, tests
  EditorReader  rustyline editor with command-name completion and history
*/

pub mod editor;
pub mod plain;

pub use editor::{CommandCompleter, EditorReader};
pub use plain::PlainReader;
