#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;
use tree2dir::cli::{Args, Command, GenerateArgs, VisualizeArgs};
use tree2dir::generate::{materialize, GenerateConfig, LocalBackend};
use tree2dir::render::{render_styled, RenderConfig};
use tree2dir::report::{format_dry_run_header, format_errors, format_summary, format_warnings, ReportConfig};
use tree2dir::source::TreeSource;
use tree2dir::tree::{build_ignore_set, parse, scan_with, ScanConfig};
use tree2dir::validate::{validate_with, Platform, ValidationConfig};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("tree2dir: {e:#}");
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let args = Args::parse().validated();
    init_tracing(&args);

    let use_color = !args.no_color && std::io::stdout().is_terminal();
    match &args.command {
        Command::Generate(gen) => run_generate(gen, use_color, args.quiet),
        Command::Visualize(vis) => run_visualize(vis, use_color),
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the CLI verbosity.
fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_generate(gen: &GenerateArgs, use_color: bool, quiet: bool) -> Result<()> {
    let source = match (&gen.file, &gen.gist) {
        (Some(file), _) => TreeSource::File(file.clone()),
        (None, Some(gist)) => TreeSource::Gist(gist.clone()),
        (None, None) => TreeSource::Stdin,
    };
    if source == TreeSource::Stdin && std::io::stdin().is_terminal() && !quiet {
        eprintln!("Paste or type your ASCII tree, then press Ctrl+D (Ctrl+Z, Enter on Windows):");
    }
    let text = source.read().context("failed to read ASCII tree")?;
    let tree = parse(&text)?;

    let platform = gen.platform.unwrap_or_else(Platform::host);
    let validation = ValidationConfig::for_platform(platform);
    let verdict = validate_with(&tree.forest, tree.root_folder.as_deref(), &validation);

    let report = ReportConfig { use_color };
    if !quiet && !verdict.warnings.is_empty() {
        eprintln!("{}", format_warnings(&verdict, &report));
    }
    anyhow::ensure!(verdict.is_valid(), "{}", format_errors(&verdict, &ReportConfig::default()));

    if gen.dry_run {
        println!("{}", format_dry_run_header(&report));
        print!(
            "{}",
            render_styled(&tree.forest, tree.root_folder.as_deref(), &RenderConfig { use_color })
        );
        return Ok(());
    }

    let config = GenerateConfig {
        output: gen.output.clone(),
        jobs: gen.jobs,
        skip_existing: gen.skip,
        validation,
    };
    let summary = materialize(&tree, &LocalBackend, &config)
        .with_context(|| format!("{}: failed to generate structure", gen.output.display()))?;

    if !quiet {
        println!(
            "{}",
            format_summary(&summary, &gen.output.display().to_string(), &report)
        );
    }
    Ok(())
}

fn run_visualize(vis: &VisualizeArgs, use_color: bool) -> Result<()> {
    let path = vis
        .path
        .canonicalize()
        .with_context(|| format!("{}: failed to resolve path", vis.path.display()))?;
    anyhow::ensure!(path.is_dir(), "{}: Not a directory", path.display());

    let config = ScanConfig {
        max_depth: vis.max_depth,
        show_hidden: vis.show_hidden,
        ignore_patterns: build_ignore_set(&vis.ignore),
    };
    let root = scan_with(&path, &config)
        .with_context(|| format!("{}: failed to scan", path.display()))?;

    print!(
        "{}",
        render_styled(root.children(), Some(&root.name), &RenderConfig { use_color })
    );
    Ok(())
}
