//! Canonical encoding of raw tree text before parsing.

use crate::tree::INDENT_WIDTH;

/// Normalize line endings, tabs, and non-breaking spaces.
///
/// `\r\n` and lone `\r` become `\n`, each tab becomes four spaces, and
/// U+00A0 (emitted by GNU `tree` between glyphs) becomes a plain space.
/// Branch glyphs pass through untouched.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\t' => out.extend(std::iter::repeat(' ').take(INDENT_WIDTH)),
            '\u{00a0}' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// Remove trailing `#` annotations from every line.
///
/// Only a `#` preceded by a space starts a comment, so names such as
/// `C#/` or `notes#1.md` survive.
pub fn strip_comments(text: &str) -> String {
    text.split('\n')
        .map(|line| match line.find(" #") {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
