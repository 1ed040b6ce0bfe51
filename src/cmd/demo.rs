/*!
`demo.rs`

The command table served by the `cmdloop` binary. One handler per semantic
type, overloads of `hello`, and a counter that lives in `DemoState`.

  add     i32 i32     Result: <sum>
  hello   String      Hello <name>
  hello               Hello World!
  paint   Color       RED / GREEN / BLUE
  divide  f64 f64     division by zero is reported
  repeat  String i16
  initial char
  shout   bool        upper-cases greetings while on
  count / incr i64    counter
  cat     String      file contents; I/O failures are unhandled
*/

use anyhow::Context as _;

use cmdloop::dispatch::{Command, CommandError, CommandResult, Context, Registry, RegistryError};

cmdloop::command_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Color {
        Red => "RED",
        Green => "GREEN",
        Blue => "BLUE",
    }
}

#[derive(Debug, Default)]
pub struct DemoState {
    pub counter: i64,
    pub shouting: bool,
}

impl DemoState {
    fn greet(&self, name: &str) -> String {
        let line = format!("Hello {name}");
        if self.shouting {
            line.to_uppercase()
        } else {
            line
        }
    }
}

type Ctx<'a> = Context<'a, DemoState>;

fn add(ctx: &mut Ctx<'_>, a: i32, b: i32) -> CommandResult {
    writeln!(ctx.out, "Result: {}", i64::from(a) + i64::from(b))?;
    Ok(())
}

fn hello(ctx: &mut Ctx<'_>, name: String) -> CommandResult {
    let line = ctx.state.greet(&name);
    writeln!(ctx.out, "{line}")?;
    Ok(())
}

fn hello_world(ctx: &mut Ctx<'_>) -> CommandResult {
    let line = ctx.state.greet("World!");
    writeln!(ctx.out, "{line}")?;
    Ok(())
}

fn paint(ctx: &mut Ctx<'_>, color: Color) -> CommandResult {
    let code = match color {
        Color::Red => "#ff0000",
        Color::Green => "#00ff00",
        Color::Blue => "#0000ff",
    };
    writeln!(ctx.out, "Painting in {} ({code})", color.member())?;
    Ok(())
}

fn divide(ctx: &mut Ctx<'_>, dividend: f64, divisor: f64) -> CommandResult {
    if divisor == 0.0 {
        return Err(CommandError::reported("division by zero"));
    }
    writeln!(ctx.out, "Result: {}", dividend / divisor)?;
    Ok(())
}

fn repeat(ctx: &mut Ctx<'_>, text: String, times: i16) -> CommandResult {
    if times < 0 {
        return Err(CommandError::reported(format!(
            "cannot repeat a negative number of times ({times})"
        )));
    }
    for _ in 0..times {
        writeln!(ctx.out, "{text}")?;
    }
    Ok(())
}

fn initial(ctx: &mut Ctx<'_>, letter: char) -> CommandResult {
    writeln!(ctx.out, "Initial: {}", letter.to_uppercase())?;
    Ok(())
}

fn shout(ctx: &mut Ctx<'_>, on: bool) -> CommandResult {
    ctx.state.shouting = on;
    writeln!(ctx.out, "Shouting {}", if on { "on" } else { "off" })?;
    Ok(())
}

fn count(ctx: &mut Ctx<'_>) -> CommandResult {
    writeln!(ctx.out, "Counter: {}", ctx.state.counter)?;
    Ok(())
}

fn incr(ctx: &mut Ctx<'_>, by: i64) -> CommandResult {
    let Some(next) = ctx.state.counter.checked_add(by) else {
        return Err(CommandError::reported("counter overflow"));
    };
    ctx.state.counter = next;
    writeln!(ctx.out, "Counter: {next}")?;
    Ok(())
}

fn cat(ctx: &mut Ctx<'_>, path: String) -> CommandResult {
    let contents =
        std::fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
    ctx.out.write_all(contents.as_bytes())?;
    if !contents.is_empty() && !contents.ends_with('\n') {
        writeln!(ctx.out)?;
    }
    Ok(())
}

/// Build the demo registry.
pub fn registry() -> Result<Registry<DemoState>, RegistryError> {
    Registry::builder()
        .command(
            Command::new("add", "Add two numbers", add)
                .arg("summand 1")
                .arg("summand 2"),
        )
        .command(Command::new("hello", "Greets individually", hello).arg("name to greet"))
        .command(Command::new("hello", "Greets the world", hello_world))
        .command(Command::new("paint", "Pick a color", paint).arg("one of RED, GREEN, BLUE"))
        .command(
            Command::new("divide", "Divide two numbers", divide)
                .arg("dividend")
                .arg("divisor"),
        )
        .command(
            Command::new("repeat", "Print a text several times", repeat)
                .arg("text to print")
                .arg("number of repetitions"),
        )
        .command(Command::new("initial", "Print a capital initial", initial).arg("letter"))
        .command(Command::new("shout", "Toggle upper-case greetings", shout).arg("true to enable"))
        .command(Command::new("count", "Show the counter", count))
        .command(Command::new("incr", "Add to the counter", incr).arg("increment"))
        .command(Command::new("cat", "Print a file", cat).arg("path of the file"))
        .build()
}
