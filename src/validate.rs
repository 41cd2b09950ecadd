//! Filesystem-legality checks run on a parsed forest before anything is written.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::tree::parse::has_traversal;
use crate::tree::{join_path, Node, NodeKind};

/// Device names reserved on Windows, compared case-insensitively.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "LPT1", "LPT2", "LPT3", "LPT4",
];

const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Nesting deeper than this produces a warning.
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Platform family whose filesystem rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Unix,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn host() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Unix
        }
    }

    pub fn max_path_length(self) -> usize {
        match self {
            Platform::Windows => 260,
            Platform::MacOs | Platform::Unix => 4096,
        }
    }

    /// Filesystems that preserve case but compare names case-insensitively.
    pub fn is_case_insensitive(self) -> bool {
        matches!(self, Platform::Windows | Platform::MacOs)
    }

    pub fn reserves_device_names(self) -> bool {
        self == Platform::Windows
    }

    /// Length of `path` in the unit the platform limit is expressed in.
    fn path_len(self, path: &str) -> usize {
        match self {
            Platform::Windows => path.encode_utf16().count(),
            Platform::MacOs | Platform::Unix => path.len(),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win32" => Ok(Platform::Windows),
            "macos" | "darwin" => Ok(Platform::MacOs),
            "unix" | "linux" => Ok(Platform::Unix),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
            Platform::Unix => "unix",
        };
        f.write_str(name)
    }
}

/// Rule parameters for [`validate_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    pub platform: Platform,
    pub max_path_length: usize,
    pub max_depth: usize,
}

impl ValidationConfig {
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            max_path_length: platform.max_path_length(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::for_platform(Platform::host())
    }
}

/// Verdict plus every problem found, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// True iff no errors were recorded. Warnings never affect validity.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a forest with the host platform's rules.
pub fn validate(forest: &[Node], root_folder: Option<&str>) -> ValidationResult {
    validate_with(forest, root_folder, &ValidationConfig::default())
}

/// Validate a forest with explicit rules.
pub fn validate_with(
    forest: &[Node],
    root_folder: Option<&str>,
    config: &ValidationConfig,
) -> ValidationResult {
    let mut walker = Walker {
        config,
        result: ValidationResult::default(),
        seen: HashSet::new(),
        seen_lower: HashSet::new(),
    };

    if let Some(root) = root_folder {
        if has_invalid_chars(root) {
            walker
                .result
                .errors
                .push(format!("Invalid characters in base path: {root}"));
        }
        if has_traversal(root) {
            walker
                .result
                .errors
                .push(format!("Path traversal attempt in base path: {root}"));
        }
    }

    let base = root_folder.unwrap_or("");
    for node in forest {
        walker.visit(node, base, 0);
    }
    walker.result
}

struct Walker<'a> {
    config: &'a ValidationConfig,
    result: ValidationResult,
    seen: HashSet<String>,
    seen_lower: HashSet<String>,
}

impl Walker<'_> {
    fn visit(&mut self, node: &Node, parent: &str, depth: usize) {
        let platform = self.config.platform;
        let path = join_path(parent, &node.name);
        let errors = &mut self.result.errors;
        let warnings = &mut self.result.warnings;

        let len = platform.path_len(&path);
        if len > self.config.max_path_length {
            errors.push(format!(
                "Path too long ({len} > {}): {path}",
                self.config.max_path_length
            ));
        }

        let duplicate = !self.seen.insert(path.clone());
        if duplicate {
            errors.push(format!("Duplicate path found: {path}"));
        }

        if node.name.trim().is_empty() {
            errors.push(format!("Empty node name found at path: {parent}"));
        }

        if has_invalid_chars(&node.name) {
            errors.push(format!("Invalid characters in name: {path}"));
        }

        if platform.reserves_device_names() && is_reserved(&node.name) {
            errors.push(format!("Reserved name used: {path}"));
        }

        if platform.is_case_insensitive() {
            let collides = !self.seen_lower.insert(path.to_lowercase());
            if collides && !duplicate {
                warnings.push(format!("Case sensitivity conflict: {path}"));
            }
        }

        if has_traversal(&node.name) {
            errors.push(format!("Path traversal attempt detected: {path}"));
        }

        if depth > self.config.max_depth {
            warnings.push(format!("Deep nesting detected (depth {depth}): {path}"));
        }

        if let NodeKind::Directory(children) = &node.kind {
            if children.is_empty() {
                warnings.push(format!("Empty directory: {path}"));
            }
            for child in children {
                self.visit(child, &path, depth + 1);
            }
        }
    }
}

fn has_invalid_chars(name: &str) -> bool {
    name.chars()
        .any(|c| INVALID_CHARS.contains(&c) || c.is_control())
}

fn is_reserved(name: &str) -> bool {
    let upper = name.to_uppercase();
    RESERVED_NAMES.contains(&upper.as_str())
}
