mod common;

use common::{unix_config, SCENARIO_A};
use tree2dir::tree::{parse, Node};
use tree2dir::validate::{validate, validate_with, Platform, ValidationConfig};

fn validate_text(text: &str, config: &ValidationConfig) -> tree2dir::validate::ValidationResult {
    let tree = parse(text).unwrap();
    validate_with(&tree.forest, tree.root_folder.as_deref(), config)
}

// --- Valid trees ---

#[test]
fn test_valid_tree() {
    let result = validate_text(SCENARIO_A, &unix_config());
    assert!(result.is_valid());
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_host_defaults_accept_simple_tree() {
    let tree = parse(SCENARIO_A).unwrap();
    assert!(validate(&tree.forest, tree.root_folder.as_deref()).is_valid());
}

#[test]
fn test_unicode_and_separator_names_are_valid() {
    let input = "
project/
├── src/
│   ├── 测试文件.js
│   └── windows\\style\\path.js
├── unix/style/path.js
└── 目录/
    └── 文件.js
";
    assert!(validate_text(input, &unix_config()).is_valid());
}

#[test]
fn test_moderately_long_path_is_valid_everywhere() {
    let input = format!("project/\n└── {}/\n    └── file.js\n", "a".repeat(100));
    for platform in [Platform::Windows, Platform::MacOs, Platform::Unix] {
        let result = validate_text(&input, &ValidationConfig::for_platform(platform));
        assert!(result.is_valid(), "{platform}: {:?}", result.errors);
    }
}

// --- Errors ---

#[test]
fn test_duplicate_path() {
    let input = "
project/
├── src/
│   ├── index.js
│   └── index.js
└── package.json
";
    let result = validate_text(input, &unix_config());
    assert!(!result.is_valid());
    assert_eq!(
        result.errors,
        vec!["Duplicate path found: project/src/index.js".to_string()]
    );
}

#[test]
fn test_invalid_characters() {
    let input = "
project/
├── src/
│   ├── index.js
│   └── file:name.js
└── package.json
";
    let result = validate_text(input, &unix_config());
    assert!(!result.is_valid());
    assert_eq!(
        result.errors,
        vec!["Invalid characters in name: project/src/file:name.js".to_string()]
    );
}

#[test]
fn test_each_forbidden_character() {
    for c in ['<', '>', ':', '"', '|', '?', '*', '\u{0001}', '\u{001f}'] {
        let forest = vec![Node::file(format!("a{c}b"))];
        let result = validate_with(&forest, None, &unix_config());
        assert_eq!(result.errors.len(), 1, "character {c:?}");
    }
}

#[test]
fn test_reserved_names_only_on_windows() {
    let forest = vec![Node::file("con"), Node::dir("LPT1", vec![Node::file("x")])];

    let windows = validate_with(
        &forest,
        Some("project"),
        &ValidationConfig::for_platform(Platform::Windows),
    );
    assert_eq!(
        windows.errors,
        vec![
            "Reserved name used: project/con".to_string(),
            "Reserved name used: project/LPT1".to_string(),
        ]
    );

    let unix = validate_with(&forest, Some("project"), &unix_config());
    assert!(unix.is_valid());
}

#[test]
fn test_path_too_long_on_windows() {
    let long = "a".repeat(300);
    let forest = vec![Node::dir(long.clone(), vec![Node::file("file.js")])];
    let config = ValidationConfig::for_platform(Platform::Windows);
    let result = validate_with(&forest, Some("project"), &config);

    assert_eq!(
        result.errors,
        vec![
            format!("Path too long (308 > 260): project/{long}"),
            format!("Path too long (316 > 260): project/{long}/file.js"),
        ]
    );
    assert!(validate_with(&forest, Some("project"), &unix_config()).is_valid());
}

#[test]
fn test_custom_path_limit() {
    let config = ValidationConfig {
        max_path_length: 5,
        ..unix_config()
    };
    let result = validate_with(&[Node::file("abcdef")], None, &config);
    assert_eq!(result.errors, vec!["Path too long (6 > 5): abcdef".to_string()]);
}

#[test]
fn test_traversal_in_constructed_forest() {
    let forest = vec![Node::dir("src", vec![Node::file("..")])];
    let result = validate_with(&forest, None, &unix_config());
    assert_eq!(
        result.errors,
        vec!["Path traversal attempt detected: src/..".to_string()]
    );
}

#[test]
fn test_dot_segment_aliasing_parent_is_rejected() {
    let forest = vec![
        Node::dir(".", vec![Node::file("a.txt")]),
        Node::file("a.txt"),
    ];
    let result = validate_with(&forest, Some("p"), &unix_config());
    assert_eq!(
        result.errors,
        vec!["Path traversal attempt detected: p/.".to_string()]
    );
}

#[test]
fn test_empty_name() {
    let forest = vec![Node::file(" ")];
    let result = validate_with(&forest, Some("project"), &unix_config());
    assert_eq!(
        result.errors,
        vec!["Empty node name found at path: project".to_string()]
    );
}

#[test]
fn test_root_folder_checked_first() {
    let forest = vec![Node::file("x?")];
    let result = validate_with(&forest, Some("a|b"), &unix_config());
    assert_eq!(
        result.errors,
        vec![
            "Invalid characters in base path: a|b".to_string(),
            "Invalid characters in name: a|b/x?".to_string(),
        ]
    );
}

#[test]
fn test_root_folder_traversal() {
    let forest = vec![Node::file("ok.txt")];
    let result = validate_with(&forest, Some("../up"), &unix_config());
    assert_eq!(
        result.errors,
        vec!["Path traversal attempt in base path: ../up".to_string()]
    );
}

#[test]
fn test_rules_are_cumulative() {
    let forest = vec![Node::file("a:b"), Node::file("a:b")];
    let result = validate_with(&forest, None, &ValidationConfig::for_platform(Platform::Windows));
    assert_eq!(
        result.errors,
        vec![
            "Invalid characters in name: a:b".to_string(),
            "Duplicate path found: a:b".to_string(),
            "Invalid characters in name: a:b".to_string(),
        ]
    );
}

// --- Warnings ---

#[test]
fn test_empty_directory_warning() {
    let input = "
project/
├── src/
│   └── empty/
└── package.json
";
    let result = validate_text(input, &unix_config());
    assert!(result.is_valid());
    assert_eq!(
        result.warnings,
        vec!["Empty directory: project/src/empty".to_string()]
    );
}

#[test]
fn test_case_conflict_on_case_insensitive_platforms() {
    let forest = vec![Node::file("README.md"), Node::file("readme.md")];

    for platform in [Platform::MacOs, Platform::Windows] {
        let result = validate_with(&forest, None, &ValidationConfig::for_platform(platform));
        assert!(result.is_valid());
        assert_eq!(
            result.warnings,
            vec!["Case sensitivity conflict: readme.md".to_string()]
        );
    }

    let unix = validate_with(&forest, None, &unix_config());
    assert!(unix.warnings.is_empty());
}

#[test]
fn test_exact_duplicate_is_not_also_a_case_conflict() {
    let forest = vec![Node::file("a.txt"), Node::file("a.txt")];
    let result = validate_with(&forest, None, &ValidationConfig::for_platform(Platform::MacOs));
    assert_eq!(result.errors.len(), 1);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_deep_nesting_warning() {
    // 51 nested directories put the leaf file at depth 51.
    let mut node = Node::file("f");
    for _ in 0..51 {
        node = Node::dir("d", vec![node]);
    }
    let result = validate_with(&[node], None, &unix_config());
    assert!(result.is_valid());

    let expected_path = format!("{}/f", vec!["d"; 51].join("/"));
    assert_eq!(
        result.warnings,
        vec![format!("Deep nesting detected (depth 51): {expected_path}")]
    );
}

#[test]
fn test_warnings_follow_preorder() {
    let forest = vec![
        Node::dir("a", vec![Node::dir("a1", vec![])]),
        Node::dir("b", vec![]),
    ];
    let result = validate_with(&forest, None, &unix_config());
    assert_eq!(
        result.warnings,
        vec![
            "Empty directory: a/a1".to_string(),
            "Empty directory: b".to_string(),
        ]
    );
}
