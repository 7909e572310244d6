//! Locate formula files below a config directory.
//!
//! Every task lives in its own subdirectory of the config directory and is
//! described by a [`FORMULA_FILE_NAME`] file inside it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{AlchemyError, Result};

/// Name of the formula file inside a task directory.
pub const FORMULA_FILE_NAME: &str = "gitalchemist.yaml";

/// The formula file of each task in `tasks`, in the given order.
///
/// # Errors
///
/// Returns an [`AlchemyError::Io`] with operation `stat` for the first task
/// whose formula file cannot be inspected.
pub fn list_pages<S: AsRef<str>>(config_dir: &Path, tasks: &[S]) -> Result<Vec<PathBuf>> {
    tasks
        .iter()
        .map(|task| {
            let page = config_dir.join(task.as_ref()).join(FORMULA_FILE_NAME);
            fs::metadata(&page).map_err(|e| AlchemyError::io("stat", &page, e))?;
            Ok(page)
        })
        .collect()
}

/// The formula files of every immediate subdirectory of `config_dir`, sorted
/// by directory name. Subdirectories without a formula file are skipped.
///
/// # Errors
///
/// Returns an [`AlchemyError::Io`] with operation `read dir` if the config
/// directory cannot be listed.
pub fn list_book_content(config_dir: &Path) -> Result<Vec<PathBuf>> {
    let read_err = |e: io::Error| AlchemyError::io("read dir", config_dir, e);

    let mut tasks = Vec::new();
    for entry in fs::read_dir(config_dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.file_type().map_err(read_err)?.is_dir() {
            tasks.push(entry.file_name());
        }
    }
    tasks.sort();

    let mut pages = Vec::new();
    for task in tasks {
        let task = task.to_string_lossy().into_owned();
        match list_pages(config_dir, &[task]) {
            Ok(found) => pages.extend(found),
            Err(AlchemyError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
    }
    Ok(pages)
}
