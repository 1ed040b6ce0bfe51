/*!
`run.rs`

Interactive session over the demo registry.

Reader selection:
  - `line_editor: true` (default) and stdin is a terminal: rustyline editor
    with command completion and the configured history file
  - otherwise (piped input, `--plain`, `line_editor: false`): plain line reader

History is saved on exit when a history file is configured.
*/

use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};
use clap::Args;

use cmdloop::dispatch::{Repl, Termination};
use cmdloop::reader::{EditorReader, PlainReader};

use crate::cmd::demo::{self, DemoState};
use crate::cmd::format::{StyleOptions, box_header, emoji};
use crate::config::ReplConfig;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Read plain lines even on a terminal (no completion, no history file)
    #[arg(long)]
    pub plain: bool,
}

pub fn execute_run(args: RunArgs, config: &ReplConfig) -> Result<()> {
    let registry = demo::registry().context("failed to build command registry")?;
    let mut repl = Repl::new(registry, DemoState::default());
    let mut stdout = io::stdout();

    if config.banner {
        let style = StyleOptions::detect();
        let title = format!("{} cmdloop {}", emoji("shell", &style), env!("CARGO_PKG_VERSION"));
        writeln!(
            stdout,
            "{}",
            box_header(title, Some("type help for commands, quit to leave"), &style)
        )?;
    }

    let use_editor = config.line_editor && !args.plain && io::stdin().is_terminal();
    let end = if use_editor {
        let mut reader = EditorReader::new(config.history_file.clone())?;
        let end = repl.run_with_prompt(&mut reader, &config.prompt, &mut stdout);
        if let Err(err) = reader.save_history() {
            tracing::warn!(error = ?err, "history not saved");
        }
        end
    } else {
        tracing::debug!("using plain line reader");
        let mut reader = PlainReader::stdio();
        repl.run_with_prompt(&mut reader, &config.prompt, &mut stdout)
    };

    if end == Termination::EndOfInput && use_editor {
        // Leave the shell prompt on a fresh line after Ctrl-D.
        writeln!(stdout)?;
    }
    tracing::info!(?end, "session finished");
    Ok(())
}
