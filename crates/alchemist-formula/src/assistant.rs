//! The capability a spell is executed against.
//!
//! Spells never decide themselves whether to touch the world. They ask an
//! [`Assistant`] to run git, copy files or create directories; the
//! [`LiveAssistant`](crate::live::LiveAssistant) performs the work, the
//! [`DryRunAssistant`] only describes it.

use std::path::Path;

use crate::error::Result;
use crate::logbook::Logbook;

/// Low-level operations used by spells.
pub trait Assistant {
    /// Run git with `args` in `dir`.
    fn git(&mut self, dir: &Path, args: &[String]) -> Result<()>;

    /// Copy a file or directory tree from `from` to `to`.
    fn copy(&mut self, from: &Path, to: &Path) -> Result<()>;

    /// Create `dir` and all missing parents.
    fn make_dir(&mut self, dir: &Path) -> Result<()>;

    /// Emit a debug message.
    fn debug(&self, msg: &str);

    /// Emit an info message.
    fn info(&self, msg: &str);
}

/// Describe a git call the way both assistants log it.
pub(crate) fn describe_git(dir: &Path, args: &[String]) -> String {
    format!("{dir:?}: git {args:?}")
}

pub(crate) fn describe_copy(from: &Path, to: &Path) -> String {
    format!("copy {from:?} to {to:?}")
}

pub(crate) fn describe_make_dir(dir: &Path) -> String {
    format!("makedir {dir:?}")
}

/// An assistant that only logs what it would do.
///
/// Every operation emits one debug line and succeeds. Nothing is spawned and
/// nothing on disk changes.
#[derive(Debug, Clone, Default)]
pub struct DryRunAssistant {
    log: Logbook,
}

impl DryRunAssistant {
    pub fn new(log: Logbook) -> Self {
        Self { log }
    }
}

impl Assistant for DryRunAssistant {
    fn git(&mut self, dir: &Path, args: &[String]) -> Result<()> {
        self.log.debug(&describe_git(dir, args));
        Ok(())
    }

    fn copy(&mut self, from: &Path, to: &Path) -> Result<()> {
        self.log.debug(&describe_copy(from, to));
        Ok(())
    }

    fn make_dir(&mut self, dir: &Path) -> Result<()> {
        self.log.debug(&describe_make_dir(dir));
        Ok(())
    }

    fn debug(&self, msg: &str) {
        self.log.debug(msg);
    }

    fn info(&self, msg: &str) {
        self.log.info(msg);
    }
}
