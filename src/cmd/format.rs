/*!
format.rs

Human-output formatting for the `cmdloop` binary: colored roles, a boxed
banner and a column table. Helpers return strings and never print.

  - StyleOptions::detect()  NO_COLOR / NO_EMOJI / COLUMNS, color only on a TTY
  - color(role, text, &style)
  - emoji(tag, &style)
  - box_header(title, subtitle, &style)
  - table(headers, rows, &style)

JSON output paths do not use these helpers.
*/

use std::borrow::Cow;
use std::io::{self, IsTerminal};

/* -------------------------------------------------------------------------- */
/* Style Options                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub use_emoji: bool,
    pub term_width: usize,
}

impl StyleOptions {
    pub fn detect() -> Self {
        let use_color = std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        let use_emoji = std::env::var_os("NO_EMOJI").is_none();
        let term_width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);

        Self {
            use_color,
            use_emoji,
            term_width,
        }
    }

    /// No color, no emoji; fixed width.
    #[cfg(test)]
    pub fn plain(term_width: usize) -> Self {
        Self {
            use_color: false,
            use_emoji: false,
            term_width,
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Color / Emoji                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Primary,
    Secondary,
    Accent,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Primary => "38;5;45",
        Role::Secondary => "38;5;250",
        Role::Accent => "38;5;213",
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

pub fn emoji(tag: &str, style: &StyleOptions) -> &'static str {
    if !style.use_emoji {
        return "";
    }
    match tag {
        "info" => "ℹ",
        "list" => "📜",
        "shell" => "⌨",
        _ => "",
    }
}

/* -------------------------------------------------------------------------- */
/* Box Header                                                                 */
/* -------------------------------------------------------------------------- */

/// Single-line boxed title; the subtitle follows the title inside the box.
pub fn box_header(title: impl AsRef<str>, subtitle: Option<&str>, style: &StyleOptions) -> String {
    let title = color(Role::Primary, title.as_ref().trim(), style);
    let inner = match subtitle {
        Some(sub) => format!("{title}  {}", color(Role::Secondary, sub, style)),
        None => title,
    };

    let max_inner = style.term_width.saturating_sub(4).max(10);
    let inner = if display_width(&inner) > max_inner {
        truncate_ellipsis(&strip_ansi(&inner), max_inner)
    } else {
        inner
    };
    let width = display_width(&inner) + 2;
    let rule = "─".repeat(width);

    format!("┌{rule}┐\n│ {inner} │\n└{rule}┘")
}

/* -------------------------------------------------------------------------- */
/* Table Rendering                                                            */
/* -------------------------------------------------------------------------- */

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header. The widest columns shrink first when the terminal is narrow.
pub fn table(headers: &[&str], rows: &[Vec<String>], style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let cols = headers.len();

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let total: usize = widths.iter().sum::<usize>() + (cols - 1) * 2;
    if total > style.term_width {
        let mut overflow = total - style.term_width;
        let mut order: Vec<usize> = (0..cols).collect();
        order.sort_by(|a, b| widths[*b].cmp(&widths[*a]));
        for idx in order {
            if overflow == 0 {
                break;
            }
            let shrink = widths[idx].saturating_sub(4).min(overflow);
            widths[idx] -= shrink;
            overflow -= shrink;
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);

    let header = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| color(Role::Accent, fit(h, *w), style))
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(header.trim_end().to_string());

    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(color(Role::Dim, rule, style));

    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(i, w)| fit(row.get(i).map(String::as_str).unwrap_or(""), *w))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Pad with spaces or cut with an ellipsis to exactly `width` columns.
fn fit(s: &str, width: usize) -> String {
    let len = display_width(s);
    if len <= width {
        return format!("{s}{}", " ".repeat(width - len));
    }
    truncate_ellipsis(&strip_ansi(s), width)
}

/* -------------------------------------------------------------------------- */
/* Text Helpers                                                               */
/* -------------------------------------------------------------------------- */

pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/// Remove `ESC [ ... <letter>` sequences.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut buf = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        buf.push(c);
    }
    Cow::Owned(buf)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */
