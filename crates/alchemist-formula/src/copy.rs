//! Copy resolution: decide where a copied file or directory ends up.
//!
//! [`examine`] only inspects the filesystem; it never writes. The live
//! assistant acts on the returned [`CopyPlan`].

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{AlchemyError, Result};

/// The outcome of resolving a copy from a source onto a requested target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPlan {
    /// Where the source ends up.
    pub target: PathBuf,
    /// Directory that must be created (recursively) before copying.
    pub create_dir: Option<PathBuf>,
    /// Copy a whole directory tree instead of a single file.
    pub recursive: bool,
}

/// What is found at the requested target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetState {
    /// Nothing exists there yet.
    Missing { wants_dir: bool },
    Directory,
    File,
}

/// Resolve a copy of `from` onto `to`.
///
/// - A directory source is copied recursively. It lands at `to` unless `to`
///   already exists, in which case it is nested below it under its own name.
///   The final target directory is always created.
/// - A file source copied onto an existing directory lands inside it under
///   its own name; onto an existing file it overwrites that file.
/// - A file source copied onto a missing path needs the parent directory of
///   that path, unless the path ends with a separator: then the path itself is
///   created as a directory and the file lands inside it.
///
/// # Errors
///
/// Returns an [`AlchemyError::Io`] with operation `stat` if the source does not
/// exist or the target cannot be inspected.
pub fn examine(from: &Path, to: &Path) -> Result<CopyPlan> {
    let source_is_dir = std::fs::metadata(from)
        .map_err(|e| AlchemyError::io("stat", from, e))?
        .is_dir();

    let state = examine_target(to)?;
    let target = clean(to);

    if source_is_dir {
        let target = match state {
            TargetState::Missing { .. } => target,
            TargetState::Directory | TargetState::File => join_base_name(&target, from),
        };
        return Ok(CopyPlan {
            create_dir: Some(target.clone()),
            target,
            recursive: true,
        });
    }

    let plan = match state {
        TargetState::Missing { wants_dir: true } => CopyPlan {
            create_dir: Some(target.clone()),
            target: join_base_name(&target, from),
            recursive: false,
        },
        TargetState::Missing { wants_dir: false } => CopyPlan {
            create_dir: target.parent().map(Path::to_path_buf),
            target,
            recursive: false,
        },
        TargetState::Directory => CopyPlan {
            target: join_base_name(&target, from),
            create_dir: None,
            recursive: false,
        },
        TargetState::File => CopyPlan {
            target,
            create_dir: None,
            recursive: false,
        },
    };
    Ok(plan)
}

fn examine_target(to: &Path) -> Result<TargetState> {
    match std::fs::metadata(to) {
        Ok(meta) if meta.is_dir() => Ok(TargetState::Directory),
        Ok(_) => Ok(TargetState::File),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(TargetState::Missing {
            wants_dir: has_trailing_separator(to),
        }),
        Err(e) => Err(AlchemyError::io("stat", to, e)),
    }
}

fn has_trailing_separator(path: &Path) -> bool {
    path.to_string_lossy()
        .chars()
        .last()
        .is_some_and(std::path::is_separator)
}

/// Drop trailing separators and `.` components.
fn clean(path: &Path) -> PathBuf {
    path.components().collect()
}

fn join_base_name(dir: &Path, from: &Path) -> PathBuf {
    match from.file_name() {
        Some(name) => dir.join(name),
        None => dir.to_path_buf(),
    }
}
