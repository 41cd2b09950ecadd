use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::generate::DEFAULT_JOBS;
use crate::validate::Platform;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (build ", env!("BUILD_NUMBER"), ")");

const AFTER_HELP: &str = "Examples:
  tree2dir generate -f mytree.txt -o ./my-project
  tree2dir generate -g https://gist.github.com/username/gistid --dry-run
  tree2dir generate -f mytree.txt -s
  cat mytree.txt | tree2dir generate
  tree2dir visualize ./my-project -I target";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tree2dir",
    version,
    long_version = LONG_VERSION,
    about = "Generate directory structures from ASCII trees",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create files and directories from an ASCII tree
    Generate(GenerateArgs),
    /// Print an existing directory as an ASCII tree
    Visualize(VisualizeArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to an ASCII tree file (default: read stdin)
    #[arg(short = 'f', long = "file", conflicts_with = "gist")]
    pub file: Option<PathBuf>,

    /// Gist id or URL containing the ASCII tree
    #[arg(short = 'g', long = "gist")]
    pub gist: Option<String>,

    /// Output directory
    #[arg(short = 'o', long = "output", default_value = ".")]
    pub output: PathBuf,

    /// Print the structure without creating anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Skip files that already exist
    #[arg(short = 's', long = "skip")]
    pub skip: bool,

    /// Maximum concurrent filesystem operations (minimum 1)
    #[arg(short = 'j', long = "jobs", default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,

    /// Filesystem rules to validate against (default: host)
    #[arg(long = "platform")]
    pub platform: Option<Platform>,

    /// Show debug information (same as -vv)
    #[arg(long = "debug")]
    pub debug: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct VisualizeArgs {
    /// Directory to print (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Max display depth
    #[arg(short = 'L', long = "level")]
    pub max_depth: Option<usize>,

    /// Glob patterns to exclude (repeatable)
    #[arg(short = 'I', long = "ignore", action = clap::ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Show hidden files (dotfiles)
    #[arg(short = 'a', long = "all")]
    pub show_hidden: bool,
}

impl Args {
    /// Enforce invariants after parsing.
    pub fn validated(mut self) -> Self {
        if let Command::Generate(gen) = &mut self.command {
            if gen.jobs == 0 {
                gen.jobs = 1;
            }
            if gen.debug {
                self.verbose = self.verbose.max(2);
            }
        }
        // Respect NO_COLOR env var
        if std::env::var("NO_COLOR").is_ok() {
            self.no_color = true;
        }
        if self.quiet {
            self.verbose = 0;
        }
        self
    }

    /// Default log filter derived from the verbosity flags.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
