use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;
mod utils;

use cmd::{ExecArgs, ListArgs, RunArgs};
use config::ReplConfig;

/// cmdloop - a small interactive command shell built on the `cmdloop` library.
///
/// Command layout:
///   cmdloop [run] [--plain]
///   cmdloop exec <LINE>... [--script FILE] [--keep-going]
///   cmdloop list [--json]
///
/// Global flags / env:
///   -v / -vv / -vvv   Increase log verbosity (default: warnings)
///   -q / --quiet      Errors only
///   -c / --config     JSON or YAML config file (or CMDLOOP_CONFIG env)
///   -p / --prompt     Override the configured prompt
///   CMDLOOP_LOG       tracing filter directive, overrides -v / -q
///
/// Examples:
///   cmdloop
///   cmdloop exec "add 3 4" "hello \"Jane Doe\"" quit
///   cmdloop --config shell.yaml run
///   cmdloop list --json
#[derive(Parser, Debug)]
#[command(
    name = "cmdloop",
    version,
    author,
    about = "cmdloop - declarative command shell",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error log output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file (JSON, or YAML by .yaml/.yml extension)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Prompt shown before each line
    #[arg(short, long, global = true, value_name = "TEXT")]
    prompt: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive shell (default)
    Run(RunArgs),

    /// Dispatch command lines without a line editor
    Exec(ExecArgs),

    /// List registered commands
    List(ListArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    // Config precedence: --config > CMDLOOP_CONFIG > defaults; --prompt on top.
    let mut config = ReplConfig::from_env(cli.config.as_deref())?;
    if let Some(prompt) = cli.prompt {
        config.prompt = prompt;
    }
    tracing::debug!(?config, "effective configuration");

    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => cmd::execute_run(args, &config),
        Commands::Exec(args) => cmd::execute_exec(args, &config),
        Commands::List(args) => cmd::execute_list(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["cmdloop"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["cmdloop", "list", "--json", "-vv", "-p", "$ "]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.prompt.as_deref(), Some("$ "));
        assert!(matches!(cli.command, Some(Commands::List(ListArgs { json: true }))));
    }

    #[test]
    fn exec_collects_lines() {
        let cli =
            Cli::try_parse_from(["cmdloop", "exec", "add 3 4", "quit", "--keep-going"]).unwrap();
        match cli.command {
            Some(Commands::Exec(args)) => {
                assert_eq!(args.lines, vec!["add 3 4", "quit"]);
                assert!(args.keep_going);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
