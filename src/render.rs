//! Forest rendering back into ASCII tree text.

use crate::tree::{is_branch_glyph, layout, Node, TreeLine};
use crossterm::style::Stylize;
use tracing::warn;

/// Configuration for terminal rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    /// Whether to emit color styling.
    pub use_color: bool,
}

/// Sanitize control characters to avoid terminal control-sequence injection.
pub fn sanitize_terminal_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xFF {
                    out.push_str(&format!("\\x{:02X}", code));
                } else {
                    out.push_str(&format!("\\u{{{:X}}}", code));
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Whether `name` reads back unchanged after [`render`] and
/// [`parse`](crate::tree::parse).
///
/// The parser strips `" #"` comments, leading glyphs and whitespace, and
/// trailing whitespace, and normalizes tabs and line breaks, so names that
/// rely on any of those are altered.
pub fn survives_round_trip(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(" #")
        && !name.starts_with(|c: char| is_branch_glyph(c) || c.is_whitespace())
        && !name.ends_with(char::is_whitespace)
        && !name.contains(['\t', '\n', '\r', '\u{a0}'])
}

/// Render a forest in the same grammar the parser accepts.
///
/// Directories carry a trailing `/`, and a root folder, if given, is
/// printed as a bare `name/` first line. `parse(render(f))` gives back `f`
/// as long as every name passes [`survives_round_trip`]; other names are
/// rendered as is and logged.
pub fn render(forest: &[Node], root_folder: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(root) = root_folder {
        out.push_str(root);
        out.push_str("/\n");
    }
    for line in layout(forest) {
        if !survives_round_trip(&line.name) {
            warn!(name = %line.name, "name will not parse back unchanged");
        }
        out.push_str(&line.prefix);
        out.push_str(&line.name);
        if line.is_dir {
            out.push('/');
        }
        out.push('\n');
    }
    out
}

/// Render for display on a terminal: names are sanitized and, with color
/// on, directories are bold blue.
pub fn render_styled(forest: &[Node], root_folder: Option<&str>, config: &RenderConfig) -> String {
    let mut out = String::new();
    if let Some(root) = root_folder {
        out.push_str(&style_dir(&format!("{}/", sanitize_terminal_text(root)), config));
        out.push('\n');
    }
    for line in layout(forest) {
        out.push_str(&style_line(&line, config));
        out.push('\n');
    }
    out
}

fn style_line(line: &TreeLine, config: &RenderConfig) -> String {
    let safe_name = sanitize_terminal_text(&line.name);
    let name = if line.is_dir {
        style_dir(&format!("{safe_name}/"), config)
    } else {
        safe_name
    };
    format!("{}{}", line.prefix, name)
}

fn style_dir(text: &str, config: &RenderConfig) -> String {
    if config.use_color {
        text.blue().bold().to_string()
    } else {
        text.to_string()
    }
}
