/*!
tokenize.rs - split one input line into positional tokens.

Rules:
  - A token starting with `"` runs up to the next `"` (or end of line).
  - Any other token runs up to the next space (or end of line).
  - Empty tokens (consecutive delimiters, `""`) are dropped.
  - No escapes: a quote cannot appear inside a quoted token.

Only the space character delimits; tabs stay part of the token.
*/

const QUOTE: char = '"';
const SPACE: char = ' ';

/// Split `line` into tokens, borrowing from the input.
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = line;

    while !rest.is_empty() {
        let (token, remainder) = match rest.strip_prefix(QUOTE) {
            Some(quoted) => quoted.split_once(QUOTE).unwrap_or((quoted, "")),
            None => rest.split_once(SPACE).unwrap_or((rest, "")),
        };
        if !token.is_empty() {
            tokens.push(token);
        }
        rest = remainder;
    }

    tokens
}
