//! Line codec for Apple `.strings` resource files.
//!
//! Entries have the shape `"key" = "value";`, one per line. Parsing also
//! accepts what Xcode-maintained files usually contain: blank lines, `//` and
//! `/* */` comments (including multi-line block comments), a trailing comment
//! after the `;`, and a value literal that spans several lines.
//!
//! Maps hold plain text. [`parse`] resolves escape sequences (`\"`, `\\`,
//! `\n`, `\t`, `\uXXXX`, ...) and [`render`] writes them back, so a map
//! survives a write and a later read unchanged.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::ResourceMap;

lazy_static! {
    // "key" = "value"; with optional trailing comment
    static ref ENTRY_REGEX: Regex = Regex::new(
        r#"^"((?:[^"\\]|\\[\s\S])*)"\s*=\s*"((?:[^"\\]|\\[\s\S])*)"\s*;\s*(?://[^\n]*|/\*.*?\*/\s*)?$"#
    )
    .unwrap();
}

/// A syntax error at a 1-based line of the parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub reason: String,
}

impl SyntaxError {
    fn new(line: usize, reason: impl Into<String>) -> Self {
        SyntaxError {
            line,
            reason: reason.into(),
        }
    }
}

/// Parses `.strings` text into a map. A later duplicate key replaces an
/// earlier one.
pub fn parse(content: &str) -> Result<ResourceMap, SyntaxError> {
    let mut map = ResourceMap::new();
    // Line where the currently open block comment started.
    let mut block_comment: Option<usize> = None;
    // Entry whose value literal continues on the next line.
    let mut pending: Option<(usize, String)> = None;

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;

        if let Some((start, buffer)) = pending.as_mut() {
            buffer.push('\n');
            buffer.push_str(raw);
            if let Some((key, value)) = match_entry(buffer) {
                map.insert(key, value);
                pending = None;
            } else if !has_open_literal(buffer) {
                return Err(SyntaxError::new(*start, "expected `\"key\" = \"value\";`"));
            }
            continue;
        }

        let mut rest = raw.trim_start();
        loop {
            if let Some(opened_at) = block_comment {
                match rest.find("*/") {
                    Some(end) => {
                        rest = rest[end + 2..].trim_start();
                        block_comment = None;
                    }
                    None => {
                        block_comment = Some(opened_at);
                        rest = "";
                        break;
                    }
                }
            }
            if let Some(after) = rest.strip_prefix("/*") {
                block_comment = Some(line_no);
                rest = after;
                continue;
            }
            break;
        }

        if rest.is_empty() || rest.starts_with("//") {
            continue;
        }
        if !rest.starts_with('"') {
            return Err(SyntaxError::new(
                line_no,
                format!("unexpected `{}`", preview(rest)),
            ));
        }

        match match_entry(rest) {
            Some((key, value)) => {
                map.insert(key, value);
            }
            None if has_open_literal(rest) => pending = Some((line_no, rest.to_string())),
            None => {
                return Err(SyntaxError::new(
                    line_no,
                    "expected `\"key\" = \"value\";`",
                ));
            }
        }
    }

    if let Some((start, _)) = pending {
        return Err(SyntaxError::new(start, "unterminated entry"));
    }
    if let Some(start) = block_comment {
        return Err(SyntaxError::new(start, "unterminated block comment"));
    }

    Ok(map)
}

/// Renders a map as `.strings` text: one entry per line, sorted by key, each
/// line terminated by `\n`.
pub fn render(map: &ResourceMap) -> String {
    let mut content = String::new();
    for (key, value) in map.iter() {
        content.push('"');
        content.push_str(&escape_literal(key));
        content.push_str("\" = \"");
        content.push_str(&escape_literal(value));
        content.push_str("\";\n");
    }
    content
}

/// Escapes text for placement between the quotes of an entry.
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Resolves the escape sequences of a literal body.
///
/// Unknown sequences and a dangling trailing backslash are kept as written,
/// so any text has an interpretation.
pub fn unescape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some(next @ ('\\' | '"' | '\'')) => {
                out.push(next);
                chars.next();
            }
            Some('n') => {
                out.push('\n');
                chars.next();
            }
            Some('r') => {
                out.push('\r');
                chars.next();
            }
            Some('t') => {
                out.push('\t');
                chars.next();
            }
            Some('0') => {
                out.push('\0');
                chars.next();
            }
            Some(marker @ ('u' | 'U')) => {
                let hex: String = chars.clone().skip(1).take(4).collect();
                let decoded = (hex.len() == 4 && hex.chars().all(|h| h.is_ascii_hexdigit()))
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(decoded) => {
                        out.push(decoded);
                        chars.nth(4);
                    }
                    None => {
                        out.push('\\');
                        out.push(marker);
                        chars.next();
                    }
                }
            }
            _ => out.push('\\'),
        }
    }
    out
}

fn match_entry(text: &str) -> Option<(String, String)> {
    let caps = ENTRY_REGEX.captures(text)?;
    Some((unescape_literal(&caps[1]), unescape_literal(&caps[2])))
}

/// Whether `text` ends inside a string literal.
fn has_open_literal(text: &str) -> bool {
    let mut inside = false;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' if inside => {
                chars.next();
            }
            '"' => inside = !inside,
            _ => {}
        }
    }
    inside
}

fn preview(text: &str) -> String {
    const MAX: usize = 24;
    if text.chars().count() > MAX {
        format!("{}...", text.chars().take(MAX).collect::<String>())
    } else {
        text.to_string()
    }
}
