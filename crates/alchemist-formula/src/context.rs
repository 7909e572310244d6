//! The execution context threaded through every spell.
//!
//! An [`ExecutionContext`] is built once per formula run by the caller. The
//! public fields are set at construction time and never change. The progress
//! fields (`clone_to`, step counters) are written only by the orchestrator:
//! [`ExecutionContext::begin`] resets them at the start of a run, so a context
//! never carries progress from one formula into the next.

use std::path::{Path, PathBuf};

/// Paths, flags and progress for one formula run.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Root directory of the formula definitions.
    pub config_dir: PathBuf,

    /// Directory in which bare repositories and clones are created.
    pub repo_dir: PathBuf,

    /// The current task's subdirectory below `config_dir`. Source files of
    /// `create_file` are resolved against it.
    pub task_dir: PathBuf,

    /// Emit debug messages.
    pub verbose: bool,

    /// Only log what would be done.
    pub dry_run: bool,

    /// Execute at most this many spells. `None` or `Some(0)` runs all.
    pub max_steps: Option<usize>,

    // Set per run by the orchestrator.
    clone_to: String,
    total_spells: usize,
    current_spell: usize,
}

impl ExecutionContext {
    /// Create a context for a task located at `config_dir/task_dir`.
    pub fn new(
        config_dir: impl Into<PathBuf>,
        repo_dir: impl Into<PathBuf>,
        task_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config_dir: config_dir.into(),
            repo_dir: repo_dir.into(),
            task_dir: task_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Reset the progress fields for a new run.
    pub(crate) fn begin(&mut self, clone_to: &str, total_spells: usize) {
        self.clone_to = clone_to.to_string();
        self.total_spells = total_spells;
        self.current_spell = 0;
    }

    /// Set the 1-based index of the spell about to run.
    pub(crate) fn set_current_spell(&mut self, current: usize) {
        self.current_spell = current;
    }

    /// Remember the clone directory of the most recent `init_bare_repo`.
    pub(crate) fn set_clone_to(&mut self, clone_to: &str) {
        self.clone_to = clone_to.to_string();
    }

    /// The step limit, if a positive one is configured.
    pub fn step_limit(&self) -> Option<usize> {
        self.max_steps.filter(|limit| *limit > 0)
    }

    /// The `current/total` prefix of progress messages.
    pub fn progress(&self) -> String {
        format!("{}/{}", self.current_spell, self.total_spells)
    }

    /// The working tree of the active clone.
    pub fn clone_dir(&self) -> PathBuf {
        join_relative(&self.repo_dir, &self.clone_to)
    }

    /// The directory source files are resolved against.
    pub fn source_dir(&self) -> PathBuf {
        join_relative(&self.config_dir, &self.task_dir)
    }
}

/// Join `rel` onto `base`, leaving `base` untouched when `rel` is empty.
///
/// `Path::join("")` appends a trailing separator, which would change how the
/// copy resolver treats the result.
pub(crate) fn join_relative(base: &Path, rel: impl AsRef<Path>) -> PathBuf {
    let rel = rel.as_ref();
    if rel.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(rel)
    }
}
