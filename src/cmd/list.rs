/*!
`list.rs`

Implements the `list` subcommand: every registered command (built-ins
included) in registration order.

JSON Output Shape:
{
  "status": "ok",
  "count": 14,
  "commands": [
    {
      "name": "add",
      "arity": 2,
      "help": "Add two numbers",
      "params": [ { "type": "i32", "help": "summand 1" }, ... ]
    }
  ]
}
*/

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Value, json};

use cmdloop::dispatch::Registry;

use crate::cmd::demo;
use crate::cmd::format::{Role, StyleOptions, box_header, color, emoji, table};

/// CLI arguments for `cmdloop list`
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Output JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn execute_list(args: ListArgs) -> Result<()> {
    let registry = demo::registry().context("failed to build command registry")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&commands_json(&registry))
                .context("failed to serialize command list")?
        );
        return Ok(());
    }

    let style = StyleOptions::detect();
    let header = box_header(
        format!("{} Commands ({})", emoji("list", &style), registry.len()),
        None,
        &style,
    );
    println!("{header}");
    println!(
        "{}",
        table(
            &["NAME", "ARITY", "PARAMS", "HELP"],
            &command_rows(&registry),
            &style
        )
    );
    println!(
        "\n{} {}",
        emoji("info", &style),
        color(
            Role::Dim,
            "Inside the shell, `help <command>` prints parameter help",
            &style
        )
    );
    Ok(())
}

/// Table rows: name, arity, comma-separated parameter types, help.
pub fn command_rows<S>(registry: &Registry<S>) -> Vec<Vec<String>> {
    registry
        .descriptors()
        .iter()
        .map(|d| {
            let params = d
                .params()
                .iter()
                .map(|p| p.semantic_type.label())
                .collect::<Vec<_>>();
            vec![
                d.name().to_string(),
                d.arity().to_string(),
                if params.is_empty() {
                    "-".to_string()
                } else {
                    params.join(", ")
                },
                d.help().to_string(),
            ]
        })
        .collect()
}

pub fn commands_json<S>(registry: &Registry<S>) -> Value {
    let commands: Vec<Value> = registry
        .descriptors()
        .iter()
        .map(|d| {
            let params: Vec<Value> = d
                .params()
                .iter()
                .map(|p| json!({ "type": p.semantic_type.label(), "help": p.help }))
                .collect();
            json!({
                "name": d.name(),
                "arity": d.arity(),
                "help": d.help(),
                "params": params,
            })
        })
        .collect();

    json!({
        "status": "ok",
        "count": commands.len(),
        "commands": commands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_registration_order() {
        let registry = demo::registry().unwrap();
        let rows = command_rows(&registry);
        assert_eq!(rows.len(), registry.len());
        assert_eq!(rows[0], vec!["help", "0", "-", "list all available commands"]);
        assert_eq!(rows[2], vec!["add", "2", "i32, i32", "Add two numbers"]);
        assert_eq!(rows.last().unwrap()[0], "quit");
    }

    #[test]
    fn json_lists_enum_parameter() {
        let registry = demo::registry().unwrap();
        let value = commands_json(&registry);
        assert_eq!(value["count"], json!(14));
        let paint = value["commands"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["name"] == "paint")
            .unwrap();
        assert_eq!(paint["arity"], json!(1));
        assert_eq!(paint["params"][0]["type"], json!("Color"));
        assert_eq!(paint["params"][0]["help"], json!("one of RED, GREEN, BLUE"));
    }
}
