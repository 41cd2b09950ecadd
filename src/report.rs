//! Human-readable summaries printed by the CLI.

use crate::generate::GenerateSummary;
use crate::validate::ValidationResult;
use crossterm::style::Stylize;

pub const DRY_RUN_HEADER: &str = "Dry Run: The following structure would be created:";

/// Output styling options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportConfig {
    pub use_color: bool,
}

/// All validation errors under a header, one per line.
pub fn format_errors(result: &ValidationResult, config: &ReportConfig) -> String {
    let header = format!("Validation failed with {} error(s):", result.errors.len());
    let mut out = paint(&header, config, |s| s.red().bold().to_string());
    for err in &result.errors {
        out.push('\n');
        out.push_str(&paint(&format!("  - {err}"), config, |s| s.red().to_string()));
    }
    out
}

/// All validation warnings, one per line. Empty when there are none.
pub fn format_warnings(result: &ValidationResult, config: &ReportConfig) -> String {
    result
        .warnings
        .iter()
        .map(|w| paint(&format!("warning: {w}"), config, |s| s.yellow().to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_summary(summary: &GenerateSummary, output: &str, config: &ReportConfig) -> String {
    let text = format!(
        "Directory structure generated in {output}: {} director{}, {} file{} created, {} skipped",
        summary.dirs_created,
        if summary.dirs_created == 1 { "y" } else { "ies" },
        summary.files_created,
        if summary.files_created == 1 { "" } else { "s" },
        summary.skipped,
    );
    paint(&text, config, |s| s.green().to_string())
}

pub fn format_dry_run_header(config: &ReportConfig) -> String {
    paint(DRY_RUN_HEADER, config, |s| s.cyan().bold().to_string())
}

fn paint(text: &str, config: &ReportConfig, style: impl Fn(&str) -> String) -> String {
    if config.use_color {
        style(text)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: ReportConfig = ReportConfig { use_color: false };

    #[test]
    fn errors_are_listed_under_header() {
        let result = ValidationResult {
            errors: vec!["Duplicate path found: a".to_string(), "Reserved name used: CON".to_string()],
            warnings: vec![],
        };
        assert_eq!(
            format_errors(&result, &PLAIN),
            "Validation failed with 2 error(s):\n  - Duplicate path found: a\n  - Reserved name used: CON"
        );
    }

    #[test]
    fn no_warnings_formats_empty() {
        assert_eq!(format_warnings(&ValidationResult::default(), &PLAIN), "");
    }

    #[test]
    fn summary_pluralizes() {
        let summary = GenerateSummary {
            dirs_created: 1,
            files_created: 2,
            skipped: 0,
        };
        assert_eq!(
            format_summary(&summary, "out", &PLAIN),
            "Directory structure generated in out: 1 directory, 2 files created, 0 skipped"
        );
    }

    #[test]
    fn color_adds_escape_codes() {
        let text = format_dry_run_header(&ReportConfig { use_color: true });
        assert!(text.contains('\u{1b}'));
        assert!(text.contains(DRY_RUN_HEADER));
    }
}
