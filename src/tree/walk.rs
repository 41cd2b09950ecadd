use globset::{Glob, GlobSet, GlobSetBuilder};
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::{Node, NodeKind};

const DEFAULT_IGNORES: &[&str] = &[".git", "node_modules", "__pycache__", ".DS_Store"];

/// Options controlling how a directory is scanned into a [`Node`].
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum traversal depth (`None` for unlimited).
    pub max_depth: Option<usize>,
    /// Whether to include hidden files (dotfiles).
    pub show_hidden: bool,
    /// Glob patterns for entries to exclude, matched relative to the root.
    pub ignore_patterns: GlobSet,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            show_hidden: false,
            ignore_patterns: build_ignore_set(&[]),
        }
    }
}

/// Build a GlobSet from user patterns plus the default ignore list.
/// Invalid patterns are skipped and logged.
pub fn build_ignore_set(user_patterns: &[String]) -> GlobSet {
    let defaults: Vec<String> = DEFAULT_IGNORES.iter().map(|p| p.to_string()).collect();
    let all: Vec<String> = defaults.into_iter().chain(user_patterns.iter().cloned()).collect();
    build_ignore_set_no_defaults(&all)
}

/// Build a GlobSet from only user patterns (no defaults).
pub fn build_ignore_set_no_defaults(user_patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    let mut invalid = Vec::new();
    for pattern in user_patterns {
        match Glob::new(pattern) {
            Ok(g) => {
                builder.add(g);
            }
            Err(_) => invalid.push(pattern.clone()),
        }
    }
    if !invalid.is_empty() {
        warn!(?invalid, "invalid ignore pattern(s), skipped");
    }
    builder.build().unwrap_or_else(|e| {
        warn!("failed to build ignore set: {e}");
        GlobSet::empty()
    })
}

/// Scan `root` with the default configuration.
pub fn scan(root: &Path) -> io::Result<Node> {
    scan_with(root, &ScanConfig::default())
}

/// Walk a filesystem location into a [`Node`].
///
/// Regular files (and symlinks, which are not followed) become files;
/// directories become directories with their entries in display order.
pub fn scan_with(root: &Path, config: &ScanConfig) -> io::Result<Node> {
    let meta = std::fs::metadata(root)?;
    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.to_string_lossy().to_string());
    if !meta.is_dir() {
        return Ok(Node::file(root_name));
    }

    let mut walker = WalkDir::new(root).follow_links(false).sort_by(sort_cmp);
    if let Some(max_depth) = config.max_depth {
        walker = walker.max_depth(max_depth);
    }

    let show_hidden = config.show_hidden;
    let ignore_patterns = config.ignore_patterns.clone();
    let root_path = root.to_path_buf();
    let iter = walker.into_iter().filter_entry(move |entry| {
        if entry.depth() == 0 {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        // Pruning here also stops descent into hidden/ignored directories.
        if !show_hidden && name.starts_with('.') {
            return false;
        }
        let rel = entry
            .path()
            .strip_prefix(&root_path)
            .unwrap_or_else(|_| entry.path());
        !ignore_patterns.is_match(rel)
    });

    // Entries arrive in pre-order with depths, so the same open-directory
    // stack used by the parser rebuilds the nesting.
    let mut stack: Vec<Node> = vec![Node::dir(root_name, Vec::new())];
    for entry in iter {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = ?e.path(), "skipping unreadable entry: {e}");
                continue;
            }
        };
        let depth = entry.depth();
        if depth == 0 {
            continue;
        }
        while stack.len() > depth {
            close_top(&mut stack);
        }

        let name = entry.file_name().to_string_lossy().to_string();
        debug!(depth, name = %name, "scanned entry");
        if entry.file_type().is_dir() {
            stack.push(Node::dir(name, Vec::new()));
        } else if let Some(NodeKind::Directory(children)) = stack.last_mut().map(|n| &mut n.kind) {
            children.push(Node::file(name));
        }
    }

    while stack.len() > 1 {
        close_top(&mut stack);
    }
    stack
        .pop()
        .ok_or_else(|| io::Error::other("scan produced no root"))
}

fn close_top(stack: &mut Vec<Node>) {
    if let Some(done) = stack.pop() {
        if let Some(NodeKind::Directory(children)) = stack.last_mut().map(|n| &mut n.kind) {
            children.push(done);
        }
    }
}

/// Comparison function for walkdir sorting.
/// Directories first, then case-insensitive alpha, dotfiles last.
fn sort_cmp(a: &DirEntry, b: &DirEntry) -> std::cmp::Ordering {
    let a_is_dir = a.file_type().is_dir();
    let b_is_dir = b.file_type().is_dir();

    // Directories before files
    if a_is_dir != b_is_dir {
        return if a_is_dir {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Greater
        };
    }

    let a_name = a.file_name().to_string_lossy().to_string();
    let b_name = b.file_name().to_string_lossy().to_string();

    let a_dot = a_name.starts_with('.');
    let b_dot = b_name.starts_with('.');

    // Dotfiles last
    if a_dot != b_dot {
        return if a_dot {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Less
        };
    }

    // Case-insensitive alphabetical
    a_name.to_lowercase().cmp(&b_name.to_lowercase())
}
