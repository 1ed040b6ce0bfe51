/*!
repl.rs - the read -> tokenize -> dispatch -> report cycle.

States: Prompting -> Dispatching -> Prompting, until `quit` (or any handler
that requests shutdown) or end-of-input moves the loop to Terminated. A
failing read counts as end-of-input.

The line editor is a collaborator behind `LineReader`; the loop only needs
a line (or end-of-input), a place to register completion candidates and a
place to append history.
*/

use std::collections::BTreeSet;
use std::io::Write;

use super::dispatcher::{DispatchOutcome, dispatch};
use super::registry::Registry;
use super::tokenize::tokenize;

/// Prompt used by `Repl::run`.
pub const DEFAULT_PROMPT: &str = "> ";

/// Source of input lines.
pub trait LineReader {
    /// Read one line after showing `prompt`; `None` means end-of-input.
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>>;

    /// Candidates offered for tab completion.
    fn register_completions(&mut self, candidates: &BTreeSet<String>);

    fn append_history(&mut self, line: &str);
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A command requested shutdown.
    Quit,
    /// The reader ran out of input (or failed).
    EndOfInput,
}

/// A command registry bound to the state its handlers operate on.
pub struct Repl<S> {
    registry: Registry<S>,
    state: S,
    completions: BTreeSet<String>,
}

impl<S> Repl<S> {
    pub fn new(registry: Registry<S>, state: S) -> Self {
        let completions = registry.names();
        Self {
            registry,
            state,
            completions,
        }
    }

    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    /// Completion candidates, captured once at construction.
    pub fn completions(&self) -> &BTreeSet<String> {
        &self.completions
    }

    /// Render `help` / `help <name>` without dispatching.
    pub fn render_help(&self, name: Option<&str>) -> String {
        self.registry.render_help(name)
    }

    /// Dispatch an already tokenized command.
    pub fn execute(&mut self, name: &str, args: &[&str], out: &mut dyn Write) -> DispatchOutcome {
        dispatch(&self.registry, &mut self.state, out, name, args)
    }

    /// Tokenize, dispatch and report one raw line.
    ///
    /// Returns `None` for a line without tokens.
    pub fn handle_line(&mut self, line: &str, out: &mut dyn Write) -> Option<DispatchOutcome> {
        let tokens = tokenize(line);
        let (name, args) = tokens.split_first()?;
        tracing::trace!(command = *name, ?args, "line tokenized");

        let outcome = self.execute(name, args, out);
        if let Err(err) = outcome.report(out) {
            tracing::warn!(error = %err, "failed to write command outcome");
        }
        Some(outcome)
    }

    /// Run the loop with the default prompt.
    pub fn run(&mut self, reader: &mut dyn LineReader, out: &mut dyn Write) -> Termination {
        self.run_with_prompt(reader, DEFAULT_PROMPT, out)
    }

    /// Run the loop until shutdown or end-of-input.
    pub fn run_with_prompt(
        &mut self,
        reader: &mut dyn LineReader,
        prompt: &str,
        out: &mut dyn Write,
    ) -> Termination {
        reader.register_completions(&self.completions);

        loop {
            let line = match reader.read_line(prompt) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    tracing::debug!("end of input");
                    return Termination::EndOfInput;
                }
                Err(err) => {
                    tracing::warn!(error = ?err, "reading input failed; stopping");
                    return Termination::EndOfInput;
                }
            };

            if !line.trim().is_empty() {
                reader.append_history(&line);
            }

            let outcome = self.handle_line(&line, out);
            if let Err(err) = out.flush() {
                tracing::warn!(error = %err, "failed to flush output");
            }
            if outcome.is_some_and(|o| o.is_shutdown()) {
                return Termination::Quit;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Command, CommandResult, Context};
    use std::collections::VecDeque;

    /// Scripted reader recording every interaction.
    #[derive(Default)]
    struct Script {
        lines: VecDeque<anyhow::Result<Option<String>>>,
        prompts: Vec<String>,
        history: Vec<String>,
        completions: Vec<String>,
    }

    impl Script {
        fn of(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|l| Ok(Some(l.to_string()))).collect(),
                ..Self::default()
            }
        }
    }

    impl LineReader for Script {
        fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
            self.prompts.push(prompt.to_string());
            self.lines.pop_front().unwrap_or(Ok(None))
        }

        fn register_completions(&mut self, candidates: &BTreeSet<String>) {
            self.completions = candidates.iter().cloned().collect();
        }

        fn append_history(&mut self, line: &str) {
            self.history.push(line.to_string());
        }
    }

    fn add(ctx: &mut Context<'_, Vec<i32>>, a: i32, b: i32) -> CommandResult {
        ctx.state.push(a + b);
        writeln!(ctx.out, "Result: {}", a + b)?;
        Ok(())
    }

    fn hello(ctx: &mut Context<'_, Vec<i32>>, name: String) -> CommandResult {
        writeln!(ctx.out, "Hello {name}")?;
        Ok(())
    }

    fn repl() -> Repl<Vec<i32>> {
        let registry = Registry::builder()
            .command(Command::new("add", "Add two numbers", add))
            .command(Command::new("hello", "Greets individually", hello))
            .build()
            .unwrap();
        Repl::new(registry, Vec::new())
    }

    #[test]
    fn quit_stops_before_next_read() {
        let mut repl = repl();
        let mut script = Script::of(&["add 3 4", "quit", "add 1 1"]);
        let mut out: Vec<u8> = Vec::new();

        let end = repl.run(&mut script, &mut out);

        assert_eq!(end, Termination::Quit);
        assert_eq!(script.prompts, vec!["> ", "> "]);
        assert_eq!(script.lines.len(), 1);
        assert_eq!(repl.state(), &vec![7]);
        assert_eq!(String::from_utf8(out).unwrap(), "Result: 7\n");
    }

    #[test]
    fn end_of_input_terminates() {
        let mut repl = repl();
        let mut script = Script::of(&["hello \"John Doe\""]);
        let mut out: Vec<u8> = Vec::new();

        let end = repl.run_with_prompt(&mut script, "cli$ ", &mut out);

        assert_eq!(end, Termination::EndOfInput);
        assert_eq!(script.prompts, vec!["cli$ ", "cli$ "]);
        assert_eq!(String::from_utf8(out).unwrap(), "Hello John Doe\n");
    }

    #[test]
    fn read_failure_counts_as_end_of_input() {
        let mut repl = repl();
        let mut script = Script::default();
        script.lines.push_back(Err(anyhow::anyhow!("terminal went away")));
        script.lines.push_back(Ok(Some("add 1 2".into())));
        let mut out: Vec<u8> = Vec::new();

        assert_eq!(repl.run(&mut script, &mut out), Termination::EndOfInput);
        assert!(out.is_empty());
    }

    #[test]
    fn errors_do_not_stop_the_loop() {
        let mut repl = repl();
        let mut script = Script::of(&["add 3", "add x 1", "add 2 2"]);
        let mut out: Vec<u8> = Vec::new();

        repl.run(&mut script, &mut out);

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Unknown command or wrong parameter count\n\
             invalid numeric parameter given\n\
             Result: 4\n"
        );
    }

    #[test]
    fn blank_lines_skip_history_and_dispatch() {
        let mut repl = repl();
        let mut script = Script::of(&["", "   ", "hello bob"]);
        let mut out: Vec<u8> = Vec::new();

        repl.run(&mut script, &mut out);

        assert_eq!(script.history, vec!["hello bob"]);
        assert_eq!(String::from_utf8(out).unwrap(), "Hello bob\n");
    }

    #[test]
    fn completions_registered_up_front() {
        let mut repl = repl();
        let mut script = Script::of(&[]);
        repl.run(&mut script, &mut Vec::<u8>::new());
        assert_eq!(script.completions, vec!["add", "hello", "help", "quit"]);
        assert_eq!(repl.completions().len(), 4);
    }

    #[test]
    fn handle_line_ignores_empty_input() {
        let mut repl = repl();
        let mut out: Vec<u8> = Vec::new();
        assert!(repl.handle_line("", &mut out).is_none());
        assert!(out.is_empty());
    }
}
