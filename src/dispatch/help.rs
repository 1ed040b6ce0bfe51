/*!
help.rs - help text rendered from descriptor metadata.

`help`            one line per descriptor: right-aligned name, arity, help
`help <command>`  every descriptor with that name, `----` between them,
                  one `@param <type>: <help>` line per parameter
*/

use std::fmt::Write as _;

use super::registry::Registry;

const LIST_HEADER: &str = "List of possible commands:";
const LIST_FOOTER: &str = "Choose wisely. Use help <command> if unsure!";
const DIVIDER: &str = "----";

impl<S> Registry<S> {
    /// Render the command list (`None`) or the detail of one command.
    pub fn render_help(&self, name: Option<&str>) -> String {
        match name {
            None => self.render_list(),
            Some(name) => self.render_detail(name),
        }
    }

    fn render_list(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "{LIST_HEADER}");
        for d in self.descriptors() {
            let _ = writeln!(text, "{:>15} {} - {}", d.name(), d.arity(), d.help());
        }
        let _ = writeln!(text, "{LIST_FOOTER}");
        text
    }

    fn render_detail(&self, name: &str) -> String {
        let mut text = String::new();
        let mut found = false;
        for d in self.named(name) {
            if found {
                let _ = writeln!(text, "{DIVIDER}");
            }
            let _ = writeln!(
                text,
                "Command {} ({} parameters): {}",
                d.name(),
                d.arity(),
                d.help()
            );
            for p in d.params() {
                let _ = writeln!(text, "@param {}: {}", p.semantic_type.label(), p.help);
            }
            found = true;
        }
        if !found {
            let _ = writeln!(text, "Command {name} not found");
        }
        text
    }
}
