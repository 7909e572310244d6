//! `gitalchemist --clean` -- remove the target directory.

use std::fs;
use std::io;

use alchemist_formula::{AlchemyError, Result};

use super::report;
use crate::context::RuntimeContext;

/// Remove the target directory and everything below it. A missing directory
/// is not an error.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let dir = &ctx.settings.targetdir;
    tracing::info!("remove {}", dir.display());
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(report(AlchemyError::io("remove", dir, e))),
    }
}
