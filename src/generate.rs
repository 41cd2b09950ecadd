//! Materialize a validated forest onto a storage backend with bounded parallelism.

use crossbeam_channel::{self, Receiver, Sender};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use thiserror::Error;
use tracing::{debug, info};

use crate::tree::{Node, ParseResult};
use crate::validate::{validate_with, ValidationConfig};

/// Default number of concurrent filesystem operations.
pub const DEFAULT_JOBS: usize = 8;

/// What already occupies a path on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => f.write_str("file"),
            EntryKind::Directory => f.write_str("directory"),
        }
    }
}

/// Storage the forest is written to. Implementations are shared across
/// worker threads.
pub trait Backend: Sync {
    fn kind_of(&self, path: &Path) -> Option<EntryKind>;
    fn create_dir(&self, path: &Path) -> io::Result<()>;
    /// Create an empty placeholder file.
    fn create_file(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem.
pub struct LocalBackend;

impl Backend for LocalBackend {
    fn kind_of(&self, path: &Path) -> Option<EntryKind> {
        let meta = std::fs::symlink_metadata(path).ok()?;
        Some(if meta.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        })
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn create_file(&self, path: &Path) -> io::Result<()> {
        // Labels such as `lib/mod.rs` name intermediate directories implicitly.
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map(|_| ())
    }
}

/// Parameters for [`materialize`].
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Directory the tree (and its root folder, if any) is created under.
    pub output: PathBuf,
    /// Maximum number of concurrent create operations (at least 1).
    pub jobs: usize,
    /// Leave existing files untouched instead of failing.
    pub skip_existing: bool,
    /// Rules used to re-check the tree before writing.
    pub validation: ValidationConfig,
}

impl GenerateConfig {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            jobs: DEFAULT_JOBS,
            skip_existing: false,
            validation: ValidationConfig::default(),
        }
    }
}

/// Counts of what [`materialize`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub dirs_created: usize,
    pub files_created: usize,
    /// Existing directories reused plus existing files skipped.
    pub skipped: usize,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("file already exists: {} (use --skip to keep it)", .0.display())]
    FileExists(PathBuf),
    #[error("{} already exists but is not a {expected}", path.display())]
    TypeConflict { path: PathBuf, expected: EntryKind },
    #[error("refusing to generate an invalid tree:\n{}", errors.join("\n"))]
    InvalidTree { errors: Vec<String> },
    #[error("a generation worker panicked")]
    WorkerPanicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    CreatedDir,
    CreatedFile,
    Skipped,
}

struct Job<'a> {
    node: &'a Node,
    path: PathBuf,
}

/// Create every node of `tree` under `config.output`.
///
/// Nodes are created in breadth-first waves so each directory exists
/// before its children are attempted; nodes within a wave run on at most
/// `config.jobs` threads. The first failing wave stops generation.
pub fn materialize(
    tree: &ParseResult,
    backend: &dyn Backend,
    config: &GenerateConfig,
) -> Result<GenerateSummary, GenerateError> {
    let verdict = validate_with(&tree.forest, tree.root_folder.as_deref(), &config.validation);
    if !verdict.is_valid() {
        return Err(GenerateError::InvalidTree {
            errors: verdict.errors,
        });
    }

    let mut summary = GenerateSummary::default();
    let mut base = config.output.clone();
    tally(&mut summary, ensure_dir(backend, &base)?);
    if let Some(root) = &tree.root_folder {
        base = base.join(relative(root));
        tally(&mut summary, ensure_dir(backend, &base)?);
    }
    info!(base = %base.display(), nodes = tree.node_count(), "generating structure");

    let mut wave: Vec<Job<'_>> = tree
        .forest
        .iter()
        .map(|node| Job {
            path: base.join(relative(&node.name)),
            node,
        })
        .collect();
    let jobs = config.jobs.max(1);
    let mut depth = 0;

    while !wave.is_empty() {
        debug!(depth, size = wave.len(), "starting wave");
        let outcomes = run_wave(&wave, backend, config.skip_existing, jobs)?;
        for outcome in outcomes {
            tally(&mut summary, outcome);
        }
        wave = wave
            .iter()
            .flat_map(|job| {
                job.node.children().iter().map(|child| Job {
                    path: job.path.join(relative(&child.name)),
                    node: child,
                })
            })
            .collect();
        depth += 1;
    }

    info!(
        dirs = summary.dirs_created,
        files = summary.files_created,
        skipped = summary.skipped,
        "generation finished"
    );
    Ok(summary)
}

/// Labels may contain separators; a leading one must not make the join
/// absolute. `\` only separates on Windows, where a doubled one starts a UNC path.
fn relative(name: &str) -> &str {
    name.trim_start_matches(|c: char| c == '/' || (cfg!(windows) && c == '\\'))
}

fn tally(summary: &mut GenerateSummary, outcome: Outcome) {
    match outcome {
        Outcome::CreatedDir => summary.dirs_created += 1,
        Outcome::CreatedFile => summary.files_created += 1,
        Outcome::Skipped => summary.skipped += 1,
    }
}

/// Run one wave of jobs over a bounded pool of scoped workers.
fn run_wave(
    wave: &[Job<'_>],
    backend: &dyn Backend,
    skip_existing: bool,
    jobs: usize,
) -> Result<Vec<Outcome>, GenerateError> {
    let (job_tx, job_rx): (Sender<&Job<'_>>, Receiver<&Job<'_>>) = crossbeam_channel::unbounded();
    for job in wave {
        // The receiver is alive for the whole scope, so this cannot fail.
        let _ = job_tx.send(job);
    }
    drop(job_tx);

    let workers = jobs.min(wave.len());
    let (res_tx, res_rx) = crossbeam_channel::unbounded();
    let panicked = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let job_rx = job_rx.clone();
                let res_tx = res_tx.clone();
                scope.spawn(move || {
                    for job in job_rx.iter() {
                        let _ = res_tx.send(create_node(backend, job, skip_existing));
                    }
                })
            })
            .collect();
        handles.into_iter().any(|h| h.join().is_err())
    });
    drop(res_tx);

    if panicked {
        return Err(GenerateError::WorkerPanicked);
    }
    res_rx.iter().collect()
}

fn create_node(backend: &dyn Backend, job: &Job<'_>, skip_existing: bool) -> Result<Outcome, GenerateError> {
    if job.node.is_dir() {
        debug!(path = %job.path.display(), "creating directory");
        ensure_dir(backend, &job.path)
    } else {
        match backend.kind_of(&job.path) {
            Some(EntryKind::Directory) => Err(GenerateError::TypeConflict {
                path: job.path.clone(),
                expected: EntryKind::File,
            }),
            Some(EntryKind::File) if skip_existing => {
                debug!(path = %job.path.display(), "skipping existing file");
                Ok(Outcome::Skipped)
            }
            Some(EntryKind::File) => Err(GenerateError::FileExists(job.path.clone())),
            None => {
                debug!(path = %job.path.display(), "creating file");
                backend
                    .create_file(&job.path)
                    .map(|_| Outcome::CreatedFile)
                    .map_err(|source| GenerateError::Io {
                        path: job.path.clone(),
                        source,
                    })
            }
        }
    }
}

/// Create a directory unless one is already there.
fn ensure_dir(backend: &dyn Backend, path: &Path) -> Result<Outcome, GenerateError> {
    match backend.kind_of(path) {
        Some(EntryKind::Directory) => Ok(Outcome::Skipped),
        Some(EntryKind::File) => Err(GenerateError::TypeConflict {
            path: path.to_path_buf(),
            expected: EntryKind::Directory,
        }),
        None => backend
            .create_dir(path)
            .map(|_| Outcome::CreatedDir)
            .map_err(|source| GenerateError::Io {
                path: path.to_path_buf(),
                source,
            }),
    }
}
