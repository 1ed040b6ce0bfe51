//! `BufRead`-backed reader without line editing.

use std::collections::BTreeSet;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

use anyhow::Context as _;

use crate::dispatch::LineReader;

/// Reads lines from `R`, writing the prompt to `W`.
pub struct PlainReader<R, W> {
    input: R,
    prompt_sink: W,
    history: Vec<String>,
    completions: usize,
}

impl PlainReader<StdinLock<'static>, Stdout> {
    /// Reader over the process's standard input and output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PlainReader<R, W> {
    pub fn new(input: R, prompt_sink: W) -> Self {
        Self {
            input,
            prompt_sink,
            history: Vec::new(),
            completions: 0,
        }
    }

    /// Lines appended so far, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn into_prompt_sink(self) -> W {
        self.prompt_sink
    }
}

impl<R: BufRead, W: Write> LineReader for PlainReader<R, W> {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        self.prompt_sink
            .write_all(prompt.as_bytes())
            .and_then(|()| self.prompt_sink.flush())
            .context("failed to write prompt")?;

        let mut buf = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut buf)
            .context("failed to read input line")?;
        if read == 0 {
            return Ok(None);
        }

        // Invalid UTF-8 becomes U+FFFD instead of ending the session.
        let line = String::from_utf8_lossy(&buf);
        let trimmed = line.strip_suffix('\n').unwrap_or(&line);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Ok(Some(trimmed.to_string()))
    }

    fn register_completions(&mut self, candidates: &BTreeSet<String>) {
        // No completion UI; keep the count for diagnostics only.
        self.completions = candidates.len();
        tracing::trace!(candidates = self.completions, "completions registered");
    }

    fn append_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_lines_and_strips_terminators() {
        let mut reader = PlainReader::new(Cursor::new("add 3 4\r\nhello\n"), Vec::new());
        assert_eq!(reader.read_line("> ").unwrap().as_deref(), Some("add 3 4"));
        assert_eq!(reader.read_line("> ").unwrap().as_deref(), Some("hello"));
        assert_eq!(reader.read_line("> ").unwrap(), None);
        assert_eq!(reader.into_prompt_sink(), b"> > > ".to_vec());
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let input: &[u8] = b"hello \xff\nhello bob\nquit\n";
        let mut reader = PlainReader::new(Cursor::new(input), io::sink());
        assert_eq!(
            reader.read_line("").unwrap().as_deref(),
            Some("hello \u{fffd}")
        );
        assert_eq!(reader.read_line("").unwrap().as_deref(), Some("hello bob"));
        assert_eq!(reader.read_line("").unwrap().as_deref(), Some("quit"));
        assert_eq!(reader.read_line("").unwrap(), None);
    }

    #[test]
    fn last_line_without_newline_is_kept() {
        let mut reader = PlainReader::new(Cursor::new("quit"), io::sink());
        assert_eq!(reader.read_line("").unwrap().as_deref(), Some("quit"));
        assert_eq!(reader.read_line("").unwrap(), None);
    }

    #[test]
    fn history_accumulates() {
        let mut reader = PlainReader::new(Cursor::new(""), io::sink());
        reader.append_history("add 1 2");
        reader.append_history("help");
        assert_eq!(reader.history(), ["add 1 2", "help"]);
    }
}
