//! Tree model, ASCII parsing, filesystem scanning, and layout computation.

mod layout;
pub mod parse;
pub(crate) mod walk;

pub use layout::{layout, TreeLine};
pub use parse::{parse, ParseError, ParseResult};
pub use walk::{build_ignore_set, build_ignore_set_no_defaults, scan, scan_with, ScanConfig};

/// Branch glyph drawn before a non-last sibling.
pub const TEE: &str = "\u{251c}\u{2500}\u{2500}"; // ├──
/// Branch glyph drawn before the last sibling.
pub const ELBOW: &str = "\u{2514}\u{2500}\u{2500}"; // └──
/// Continuation glyph extending an ancestor's branch line.
pub const VERTICAL: char = '\u{2502}'; // │
/// Horizontal bar used inside the branch glyphs.
pub const HORIZONTAL: char = '\u{2500}'; // ─

/// Width of one indentation unit, in columns.
pub const INDENT_WIDTH: usize = 4;

/// Whether `c` is one of the four characters used to draw branches.
pub fn is_branch_glyph(c: char) -> bool {
    matches!(c, VERTICAL | HORIZONTAL | '\u{251c}' | '\u{2514}')
}

/// A single file or directory in a parsed or scanned tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Label as written in the diagram, without a trailing separator.
    pub name: String,
    pub kind: NodeKind,
}

/// What a node is. Only directories own children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File,
    /// Children in source order.
    Directory(Vec<Node>),
}

impl Node {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File,
        }
    }

    pub fn dir(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Directory(children),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory(_))
    }

    /// Children of a directory; always empty for a file.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Directory(children) => children,
            NodeKind::File => &[],
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(Node::count).sum::<usize>()
    }
}

/// Join a parent path and a label with `/`, collapsing repeated separators.
pub fn join_path(parent: &str, name: &str) -> String {
    let joined = if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    };
    let mut out = String::with_capacity(joined.len());
    let mut prev_slash = false;
    for c in joined.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_path_without_parent_is_name() {
        assert_eq!(join_path("", "src"), "src");
    }

    #[test]
    fn join_path_collapses_repeated_separators() {
        assert_eq!(join_path("project/src/", "file.js"), "project/src/file.js");
        assert_eq!(join_path("project", "////deep//a.js"), "project/deep/a.js");
    }

    #[test]
    fn branch_glyphs() {
        for c in TEE.chars().chain(ELBOW.chars()) {
            assert!(is_branch_glyph(c));
        }
        assert!(is_branch_glyph(VERTICAL));
        assert!(!is_branch_glyph('-'));
        assert!(!is_branch_glyph('|'));
    }

    #[test]
    fn file_has_no_children() {
        let f = Node::file("a.txt");
        assert!(!f.is_dir());
        assert!(f.children().is_empty());
    }

    #[test]
    fn count_includes_descendants() {
        let tree = Node::dir(
            "src",
            vec![Node::file("a.rs"), Node::dir("util", vec![Node::file("b.rs")])],
        );
        assert_eq!(tree.count(), 4);
    }
}
