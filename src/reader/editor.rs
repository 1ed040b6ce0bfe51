//! Interactive reader backed by rustyline.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context as _, anyhow};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};

use crate::dispatch::LineReader;

/// Completes the first word of a line against the registered command names.
#[derive(Debug, Default, Clone)]
pub struct CommandCompleter {
    candidates: Vec<String>,
}

impl CommandCompleter {
    pub fn set_candidates(&mut self, candidates: &BTreeSet<String>) {
        self.candidates = candidates.iter().cloned().collect();
    }

    /// `(start, matches)` for the word under the cursor.
    ///
    /// Only the command position is completed; arguments get nothing.
    pub fn candidates_for(&self, line: &str, pos: usize) -> (usize, Vec<&str>) {
        let head = &line[..pos];
        let start = head.len() - head.trim_start().len();
        let word = &head[start..];
        if word.contains(' ') {
            return (pos, Vec::new());
        }

        let matches = self
            .candidates
            .iter()
            .filter(|name| {
                name.len() >= word.len()
                    && name.is_char_boundary(word.len())
                    && name[..word.len()].eq_ignore_ascii_case(word)
            })
            .map(String::as_str)
            .collect();
        (start, matches)
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates_for(line, pos);
        let pairs = matches
            .into_iter()
            .map(|name| Pair {
                display: name.to_string(),
                replacement: format!("{name} "),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}

/// Line-editing reader with tab completion and optional persistent history.
pub struct EditorReader {
    editor: Editor<CommandCompleter, DefaultHistory>,
    history_file: Option<PathBuf>,
}

impl EditorReader {
    pub fn new(history_file: Option<PathBuf>) -> anyhow::Result<Self> {
        let mut editor: Editor<CommandCompleter, DefaultHistory> =
            Editor::new().map_err(|e| anyhow!("failed to init line editor: {e}"))?;
        editor.set_helper(Some(CommandCompleter::default()));

        if let Some(path) = &history_file
            && path.exists()
        {
            // A corrupt history file should not keep the session from starting.
            if let Err(err) = editor.load_history(path) {
                tracing::warn!(path = %path.display(), error = %err, "failed to load history");
            } else {
                tracing::debug!(path = %path.display(), "history loaded");
            }
        }

        Ok(Self {
            editor,
            history_file,
        })
    }

    /// Persist history to the configured file, if any.
    pub fn save_history(&mut self) -> anyhow::Result<()> {
        let Some(path) = &self.history_file else {
            return Ok(());
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        self.editor
            .save_history(path)
            .with_context(|| format!("saving history to {}", path.display()))
    }
}

impl LineReader for EditorReader {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) => Ok(None),
            // Ctrl-C abandons the current line only.
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(e) => Err(anyhow!("readline error: {e}")),
        }
    }

    fn register_completions(&mut self, candidates: &BTreeSet<String>) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.set_candidates(candidates);
        }
    }

    fn append_history(&mut self, line: &str) {
        if let Err(err) = self.editor.add_history_entry(line) {
            tracing::debug!(error = %err, "history entry rejected");
        }
    }
}
