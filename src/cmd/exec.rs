/*!
`exec.rs`

Non-interactive dispatch of command lines:

  cmdloop exec "add 3 4" "hello \"Jane Doe\""
  cmdloop exec --script session.txt
  cmdloop exec --keep-going "divide 1 0" "count"

Lines from arguments run first, then the script's lines. Each line is
echoed after the prompt, then its output (or error message) follows, so a
transcript reads like an interactive session.

Stops at `quit`. Without `--keep-going` the first failing line stops the
run; either way any failure makes the process exit non-zero.
*/

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use cmdloop::dispatch::Repl;

use crate::cmd::demo::{self, DemoState};
use crate::config::ReplConfig;

/* -------------------------------------------------------------------------- */
/* Argument Struct                                                            */
/* -------------------------------------------------------------------------- */

#[derive(Args, Debug, Default)]
pub struct ExecArgs {
    /// Command lines to dispatch, in order
    #[arg(value_name = "LINE", required_unless_present = "script")]
    pub lines: Vec<String>,

    /// Read further command lines from a file
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Continue after failing lines
    #[arg(long)]
    pub keep_going: bool,
}

/// What happened to a batch of lines.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExecSummary {
    pub executed: usize,
    pub failed: usize,
    pub quit: bool,
}

/* -------------------------------------------------------------------------- */
/* Public Entry Point                                                         */
/* -------------------------------------------------------------------------- */

pub fn execute_exec(args: ExecArgs, config: &ReplConfig) -> Result<()> {
    let mut lines = args.lines;
    if let Some(path) = &args.script {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script: {}", path.display()))?;
        lines.extend(raw.lines().map(str::to_string));
    }

    let registry = demo::registry().context("failed to build command registry")?;
    let mut repl = Repl::new(registry, DemoState::default());
    let mut stdout = io::stdout().lock();

    let summary = run_lines(&mut repl, &lines, &config.prompt, args.keep_going, &mut stdout)?;
    tracing::info!(
        executed = summary.executed,
        failed = summary.failed,
        quit = summary.quit,
        "exec finished"
    );

    if summary.failed > 0 {
        bail!("{} of {} line(s) failed", summary.failed, summary.executed);
    }
    Ok(())
}

/// Dispatch `lines` in order, echoing each after `prompt`.
pub fn run_lines(
    repl: &mut Repl<DemoState>,
    lines: &[String],
    prompt: &str,
    keep_going: bool,
    out: &mut dyn Write,
) -> Result<ExecSummary> {
    let mut summary = ExecSummary::default();

    for (idx, line) in lines.iter().enumerate() {
        writeln!(out, "{prompt}{line}").context("failed to echo line")?;
        let Some(outcome) = repl.handle_line(line, out) else {
            continue;
        };
        summary.executed += 1;

        if outcome.is_shutdown() {
            summary.quit = true;
            break;
        }
        if outcome.is_failure() {
            summary.failed += 1;
            tracing::debug!(line = idx + 1, ?outcome, "line failed");
            if !keep_going {
                break;
            }
        }
    }

    out.flush().context("failed to flush output")?;
    Ok(summary)
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */
