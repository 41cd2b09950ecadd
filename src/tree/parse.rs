//! ASCII tree parsing: level computation and stack-based reconstruction.

use thiserror::Error;
use tracing::{debug, trace};

use super::{is_branch_glyph, Node, NodeKind, ELBOW, INDENT_WIDTH, TEE, VERTICAL};
use crate::normalize::{normalize, strip_comments};

/// Fatal problems that stop parsing before any node is produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("The ASCII tree is empty.")]
    EmptyInput,
    #[error("Path traversal attempt detected in node name: {label}")]
    Traversal { label: String },
}

/// Output of [`parse`]: the ordered forest plus the optional root folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub forest: Vec<Node>,
    /// Common ancestor detected from a leading `name/` line. Not part of the forest.
    pub root_folder: Option<String>,
}

impl ParseResult {
    /// Number of nodes in the forest, excluding the root folder.
    pub fn node_count(&self) -> usize {
        self.forest.iter().map(Node::count).sum()
    }
}

/// A directory still accepting children, with the level it was declared at.
struct OpenDir {
    node: Node,
    level: usize,
}

/// Parse an ASCII tree into a forest of nodes.
pub fn parse(text: &str) -> Result<ParseResult, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let cleaned = strip_comments(&normalize(text));
    let lines: Vec<&str> = cleaned.split('\n').map(str::trim_end).collect();
    let start = lines.iter().position(|l| !l.is_empty());
    let end = lines.iter().rposition(|l| !l.is_empty());
    let lines = match (start, end) {
        (Some(s), Some(e)) => &lines[s..=e],
        _ => return Err(ParseError::EmptyInput),
    };
    debug!(lines = lines.len(), "parsing ASCII tree");

    let mut root_folder = None;
    let mut body = lines;
    if let Some(first) = detect_root_folder(lines[0]) {
        debug!(root = first, "detected root folder");
        if !first.is_empty() {
            root_folder = Some(first.to_string());
        }
        body = &lines[1..];
    }

    let mut roots: Vec<Node> = Vec::new();
    let mut stack: Vec<OpenDir> = Vec::new();

    for (i, line) in body.iter().enumerate() {
        let Some((prefix, rest)) = split_branch(line) else {
            trace!(line = i, "no branch marker, skipped");
            continue;
        };
        let level = indent_level(prefix);
        let label = rest.trim_start_matches(|c: char| is_branch_glyph(c) || c.is_whitespace());
        if label.is_empty() {
            trace!(line = i, "branch without label, skipped");
            continue;
        }

        let (name, is_dir) = match label.strip_suffix('/') {
            Some(name) => (name, true),
            None => (label, false),
        };
        if has_traversal(name) {
            return Err(ParseError::Traversal {
                label: name.to_string(),
            });
        }
        debug!(line = i, level, name, is_dir, "parsed node");

        while stack.last().is_some_and(|top| top.level >= level) {
            close_top(&mut stack, &mut roots);
        }

        if is_dir {
            stack.push(OpenDir {
                node: Node::dir(name, Vec::new()),
                level,
            });
        } else {
            attach(&mut stack, &mut roots, Node::file(name));
        }
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    Ok(ParseResult {
        forest: roots,
        root_folder,
    })
}

/// Return the root folder name if `line` is a bare `name/` line.
fn detect_root_folder(line: &str) -> Option<&str> {
    if line.contains(TEE) || line.contains(ELBOW) {
        return None;
    }
    line.trim().strip_suffix('/')
}

/// Split a line at its first branch marker into (prefix, text after marker).
fn split_branch(line: &str) -> Option<(&str, &str)> {
    let idx = match (line.find(TEE), line.find(ELBOW)) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };
    // Both markers have the same encoded length.
    Some((&line[..idx], &line[idx + TEE.len()..]))
}

/// Compute the nesting level of a branch prefix.
///
/// Each `│` is one level and absorbs up to three padding characters after
/// it; any other whitespace counts in units of [`INDENT_WIDTH`].
pub(crate) fn indent_level(prefix: &str) -> usize {
    let mut level = 0;
    let mut spaces = 0;
    let mut chars = prefix.chars().peekable();
    while let Some(c) = chars.next() {
        if c == VERTICAL {
            level += spaces / INDENT_WIDTH + 1;
            spaces = 0;
            let mut pad = 0;
            while pad < INDENT_WIDTH - 1 && chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
                pad += 1;
            }
        } else if c.is_whitespace() {
            spaces += 1;
        }
    }
    level + spaces / INDENT_WIDTH
}

/// Whether `name` contains `..`, `./`, or a bare `.` segment.
///
/// A `.` segment (the label `./`, or `a/.`) resolves to its parent, so it
/// would alias a sibling path on disk.
pub(crate) fn has_traversal(name: &str) -> bool {
    name.contains("..") || name.contains("./") || name.split(['/', '\\']).any(|seg| seg == ".")
}

/// Append `node` to the innermost open directory, or to the roots.
fn attach(stack: &mut [OpenDir], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(OpenDir {
            node: Node {
                kind: NodeKind::Directory(children),
                ..
            },
            ..
        }) => children.push(node),
        _ => roots.push(node),
    }
}

/// Pop the innermost open directory and move it into its parent.
fn close_top(stack: &mut Vec<OpenDir>, roots: &mut Vec<Node>) {
    if let Some(done) = stack.pop() {
        attach(stack, roots, done.node);
    }
}
