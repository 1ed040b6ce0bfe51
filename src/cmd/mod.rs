/*!
Subcommands of the `cmdloop` binary.

Layout:
  src/cmd/
    mod.rs     (this file: declarations + re-exports)
    demo.rs    (DemoState + the demo command registry)
    run.rs     (RunArgs  + execute_run: interactive session)
    exec.rs    (ExecArgs + execute_exec: dispatch lines / a script)
    list.rs    (ListArgs + execute_list: command table or JSON)
    format.rs  (color / box / table helpers for human output)

Conventions:
  - Each subcommand module exposes one public `execute_*` function
    returning `anyhow::Result<()>`.
  - Argument structs derive `clap::Args` and stay minimal.
*/

pub mod demo;
pub mod exec;
pub mod format;
pub mod list;
pub mod run;

pub use exec::{ExecArgs, execute_exec};
pub use list::{ListArgs, execute_list};
pub use run::{RunArgs, execute_run};
