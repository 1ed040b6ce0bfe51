/*!
registry.rs - the immutable command table.

Build flow:
  Registry::builder()            built-in `help` descriptors (0 and 1 parameter)
    .command(Command::new(..))   user commands, in call order
    .build()                     validation + trailing built-in `quit`

Discovery order is registration order; dispatch and help both walk it front
to back, so "first registered wins" for same-name same-arity commands.
*/

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use super::coerce::{SemanticType, Value};
use super::handler::{CommandResult, Context, Handler, IntoHandler, erase};

/// Placeholder help for parameters registered without one.
pub const NO_HELP: &str = "no help given";

pub const HELP_COMMAND: &str = "help";
pub const QUIT_COMMAND: &str = "quit";

/// One positional parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub semantic_type: SemanticType,
    pub help: String,
}

/// One invocable command.
pub struct CommandDescriptor<S> {
    name: String,
    help: String,
    params: Vec<ParameterDescriptor>,
    handler: Handler<S>,
}

impl<S> CommandDescriptor<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn params(&self) -> &[ParameterDescriptor] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Case-insensitive name comparison used by dispatch and help.
    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }

    pub(crate) fn invoke(&self, ctx: &mut Context<'_, S>, values: Vec<Value>) -> CommandResult {
        (self.handler)(ctx, values)
    }
}

impl<S> fmt::Debug for CommandDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/* ---- Registration records ---- */

/// A command waiting to be registered.
///
/// ```
/// use cmdloop::dispatch::{Command, CommandResult, Context};
///
/// fn add(ctx: &mut Context<'_, ()>, a: i32, b: i32) -> CommandResult {
///     writeln!(ctx.out, "Result: {}", a + b)?;
///     Ok(())
/// }
///
/// let add = Command::new("add", "Add two numbers", add)
///     .arg("summand 1")
///     .arg("summand 2");
/// assert_eq!(add.arity(), 2);
/// ```
pub struct Command<S> {
    name: String,
    help: String,
    types: Vec<SemanticType>,
    arg_help: Vec<String>,
    handler: Handler<S>,
}

impl<S> Command<S> {
    /// Register a typed handler; parameter types come from its signature.
    pub fn new<Args, H>(name: impl Into<String>, help: impl Into<String>, handler: H) -> Self
    where
        H: IntoHandler<S, Args>,
    {
        Self {
            name: name.into(),
            help: help.into(),
            types: H::param_types(),
            arg_help: Vec::new(),
            handler: handler.into_handler(),
        }
    }

    /// Register a handler over raw coerced values, for tables assembled at runtime.
    ///
    /// The handler receives exactly one value per entry of `types`, coerced
    /// to that type.
    pub fn dynamic<F>(
        name: impl Into<String>,
        help: impl Into<String>,
        types: Vec<SemanticType>,
        handler: F,
    ) -> Self
    where
        F: Fn(&mut Context<'_, S>, Vec<Value>) -> CommandResult + 'static,
    {
        Self {
            name: name.into(),
            help: help.into(),
            types,
            arg_help: Vec::new(),
            handler: erase(handler),
        }
    }

    /// Help text for the next positional parameter.
    pub fn arg(mut self, help: impl Into<String>) -> Self {
        self.arg_help.push(help.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.types.len()
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.name.contains([' ', '"']) {
            return Err(RegistryError::InvalidName {
                name: self.name.clone(),
            });
        }
        if self.arg_help.len() > self.arity() {
            return Err(RegistryError::TooManyArgHelps {
                name: self.name.clone(),
                arity: self.arity(),
                given: self.arg_help.len(),
            });
        }
        for (position, ty) in self.types.iter().enumerate() {
            if let SemanticType::Enumerated(spec) = ty
                && spec.members().is_empty()
            {
                return Err(RegistryError::EmptyEnumeration {
                    name: self.name.clone(),
                    position: position + 1,
                    enumeration: spec.name(),
                });
            }
        }
        Ok(())
    }

    /// Same name and arity as `help`/0, `help`/1 or `quit`/0.
    fn shadows_builtin(&self) -> bool {
        (names_match(&self.name, HELP_COMMAND) && self.arity() <= 1)
            || (names_match(&self.name, QUIT_COMMAND) && self.arity() == 0)
    }

    fn into_descriptor(self) -> CommandDescriptor<S> {
        let mut helps = self.arg_help.into_iter();
        let params = self
            .types
            .into_iter()
            .map(|semantic_type| ParameterDescriptor {
                semantic_type,
                help: helps.next().unwrap_or_else(|| NO_HELP.to_string()),
            })
            .collect();
        CommandDescriptor {
            name: self.name,
            help: self.help,
            params,
            handler: self.handler,
        }
    }
}

/// Rejected registrations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("command name must not be empty")]
    EmptyName,

    #[error("command name '{name}' cannot be typed as a single token")]
    InvalidName { name: String },

    #[error("command '{name}' has {arity} parameters but {given} parameter help texts")]
    TooManyArgHelps {
        name: String,
        arity: usize,
        given: usize,
    },

    #[error("parameter {position} of '{name}' uses enumeration {enumeration} with no members")]
    EmptyEnumeration {
        name: String,
        position: usize,
        enumeration: &'static str,
    },
}

/// Unicode case-insensitive comparison, character by character.
pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/* ---- Builder ---- */

/// Collects commands in discovery order.
pub struct RegistryBuilder<S> {
    commands: Vec<Command<S>>,
}

impl<S: 'static> RegistryBuilder<S> {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn command(mut self, command: Command<S>) -> Self {
        self.commands.push(command);
        self
    }

    /// Validate every command and freeze the table.
    pub fn build(self) -> Result<Registry<S>, RegistryError> {
        for command in &self.commands {
            command.validate()?;
        }

        let mut descriptors = builtin_help::<S>();
        for command in self.commands {
            if command.shadows_builtin() {
                tracing::warn!(
                    command = command.name(),
                    arity = command.arity(),
                    "built-in command takes precedence; registration ignored"
                );
                continue;
            }
            if let Some(shadow) = descriptors
                .iter()
                .find(|d| d.is_named(command.name()) && d.arity() == command.arity())
            {
                tracing::warn!(
                    command = command.name(),
                    arity = command.arity(),
                    shadowed_by = shadow.name(),
                    "ambiguous registration; the earlier command wins"
                );
            }
            descriptors.push(command.into_descriptor());
        }
        descriptors.push(Command::new(QUIT_COMMAND, "quits the cli", quit::<S>).into_descriptor());

        tracing::debug!(commands = descriptors.len(), "registry built");
        Ok(Registry { descriptors })
    }
}

impl<S: 'static> Default for RegistryBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_help<S: 'static>() -> Vec<CommandDescriptor<S>> {
    vec![
        Command::new(HELP_COMMAND, "list all available commands", help_list::<S>)
            .into_descriptor(),
        Command::new(
            HELP_COMMAND,
            "print detailed help of a given command",
            help_detail::<S>,
        )
        .arg("command for which help should be provided")
        .into_descriptor(),
    ]
}

fn help_list<S>(ctx: &mut Context<'_, S>) -> CommandResult {
    let text = ctx.registry().render_help(None);
    ctx.out.write_all(text.as_bytes())?;
    Ok(())
}

fn help_detail<S>(ctx: &mut Context<'_, S>, command: String) -> CommandResult {
    let text = ctx.registry().render_help(Some(&command));
    ctx.out.write_all(text.as_bytes())?;
    Ok(())
}

fn quit<S>(ctx: &mut Context<'_, S>) -> CommandResult {
    ctx.request_shutdown();
    Ok(())
}

/* ---- Registry ---- */

/// Ordered, immutable set of command descriptors.
pub struct Registry<S> {
    descriptors: Vec<CommandDescriptor<S>>,
}

impl<S: 'static> Registry<S> {
    pub fn builder() -> RegistryBuilder<S> {
        RegistryBuilder::new()
    }
}

impl<S> Registry<S> {
    /// All descriptors in discovery order.
    pub fn descriptors(&self) -> &[CommandDescriptor<S>] {
        &self.descriptors
    }

    /// First descriptor matching `name` (case-insensitive) and `arity`.
    pub fn find(&self, name: &str, arity: usize) -> Option<&CommandDescriptor<S>> {
        self.descriptors
            .iter()
            .find(|d| d.is_named(name) && d.arity() == arity)
    }

    /// Every descriptor named `name` (case-insensitive), in discovery order.
    pub fn named<'r>(&'r self, name: &'r str) -> impl Iterator<Item = &'r CommandDescriptor<S>> {
        self.descriptors.iter().filter(move |d| d.is_named(name))
    }

    /// Distinct command names, used as completion candidates.
    pub fn names(&self) -> BTreeSet<String> {
        self.descriptors.iter().map(|d| d.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl<S> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.descriptors.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{EnumSpec, Param, dispatch};

    fn noop2(_: &mut Context<'_, ()>, _: i32, _: i32) -> CommandResult {
        Ok(())
    }

    fn noop1(_: &mut Context<'_, ()>, _: String) -> CommandResult {
        Ok(())
    }

    fn noop0(_: &mut Context<'_, ()>) -> CommandResult {
        Ok(())
    }

    #[test]
    fn builtins_frame_user_commands() {
        let registry = Registry::builder()
            .command(Command::new("add", "Add two numbers", noop2))
            .build()
            .unwrap();
        let names: Vec<(&str, usize)> = registry
            .descriptors()
            .iter()
            .map(|d| (d.name(), d.arity()))
            .collect();
        assert_eq!(
            names,
            vec![("help", 0), ("help", 1), ("add", 2), ("quit", 0)]
        );
    }

    #[test]
    fn missing_arg_help_uses_placeholder() {
        let registry = Registry::builder()
            .command(Command::new("add", "Add two numbers", noop2).arg("summand 1"))
            .build()
            .unwrap();
        let add = registry.find("add", 2).unwrap();
        assert_eq!(add.params()[0].help, "summand 1");
        assert_eq!(add.params()[1].help, NO_HELP);
        assert_eq!(add.params()[1].semantic_type, i32::semantic_type());
    }

    #[test]
    fn find_is_case_insensitive_and_arity_exact() {
        let registry = Registry::builder()
            .command(Command::new("Hello", "Greets individually", noop1))
            .command(Command::new("hello", "Prints hello world", noop0))
            .build()
            .unwrap();
        assert_eq!(registry.find("HELLO", 1).unwrap().help(), "Greets individually");
        assert_eq!(registry.find("hello", 0).unwrap().help(), "Prints hello world");
        assert!(registry.find("hello", 2).is_none());
        assert_eq!(registry.named("hello").count(), 2);
    }

    #[test]
    fn first_registered_wins_for_duplicates() {
        let registry = Registry::builder()
            .command(Command::new("dup", "first", noop0))
            .command(Command::new("dup", "second", noop0))
            .build()
            .unwrap();
        assert_eq!(registry.find("dup", 0).unwrap().help(), "first");
    }

    #[test]
    fn names_include_builtins() {
        let registry = Registry::builder()
            .command(Command::new("add", "", noop2))
            .build()
            .unwrap();
        let names: Vec<String> = registry.names().into_iter().collect();
        assert_eq!(names, vec!["add", "help", "quit"]);
    }

    #[test]
    fn rejects_untypeable_names() {
        let err = Registry::builder()
            .command(Command::new("", "", noop0))
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::EmptyName);

        let err = Registry::builder()
            .command(Command::new("two words", "", noop0))
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidName { .. }));
    }

    fn leave(ctx: &mut Context<'_, ()>) -> CommandResult {
        writeln!(ctx.out, "bye")?;
        Ok(())
    }

    #[test]
    fn builtins_win_over_user_declarations() {
        let registry = Registry::builder()
            .command(Command::new("QUIT", "leave", leave))
            .command(Command::new("help", "my help", noop0))
            .command(Command::new("Help", "my detail", noop1))
            .command(Command::new("quit", "quit with a message", noop1))
            .build()
            .unwrap();
        let names: Vec<(&str, usize)> = registry
            .descriptors()
            .iter()
            .map(|d| (d.name(), d.arity()))
            .collect();
        assert_eq!(
            names,
            vec![("help", 0), ("help", 1), ("quit", 1), ("quit", 0)]
        );
        assert_eq!(
            registry.find("help", 0).unwrap().help(),
            "list all available commands"
        );

        let mut out: Vec<u8> = Vec::new();
        let outcome = dispatch(&registry, &mut (), &mut out, "quit", &[]);
        assert!(outcome.is_shutdown());
        assert!(out.is_empty());
    }

    #[test]
    fn name_matching_folds_unicode_case() {
        let registry = Registry::builder()
            .command(Command::new("Ärger", "", noop0))
            .build()
            .unwrap();
        assert!(registry.find("ärger", 0).is_some());
        assert!(registry.find("ÄRGER", 0).is_some());
        assert!(registry.find("arger", 0).is_none());
        assert!(names_match("QUIT", "quit"));
    }

    #[test]
    fn rejects_surplus_arg_help() {
        let err = Registry::builder()
            .command(Command::new("hello", "", noop0).arg("nobody"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::TooManyArgHelps {
                name: "hello".into(),
                arity: 0,
                given: 1
            }
        );
    }

    #[test]
    fn rejects_memberless_enumeration() {
        const NOTHING: EnumSpec = EnumSpec::new("Nothing", &[]);
        let err = Registry::<()>::builder()
            .command(Command::dynamic(
                "pick",
                "",
                vec![SemanticType::Text, SemanticType::Enumerated(NOTHING)],
                |_, _| Ok(()),
            ))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::EmptyEnumeration {
                name: "pick".into(),
                position: 2,
                enumeration: "Nothing"
            }
        );
    }
}
