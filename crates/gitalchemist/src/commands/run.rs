//! Task mode and `gitalchemist --runall` -- read and transmute formulas.

use std::path::{Path, PathBuf};

use alchemist_formula::{Result, list_book_content, list_pages, read_formula, transmute};

use super::report;
use crate::context::RuntimeContext;

/// Run the formulas of the named tasks, in the given order.
pub fn run_tasks(ctx: &RuntimeContext, tasks: &[String]) -> Result<()> {
    let pages = list_pages(&ctx.settings.cfgdir, tasks).map_err(report)?;
    run_pages(ctx, &pages)
}

/// Run the formula of every task in the config directory.
pub fn run_all(ctx: &RuntimeContext) -> Result<()> {
    let pages = list_book_content(&ctx.settings.cfgdir).map_err(report)?;
    run_pages(ctx, &pages)
}

/// Run `pages` one after another. A failing formula is reported and the
/// batch goes on; the first failure is returned at the end.
fn run_pages(ctx: &RuntimeContext, pages: &[PathBuf]) -> Result<()> {
    let mut first_failure = None;
    for page in pages {
        tracing::debug!("formula file {}", page.display());
        if let Err(err) = run_page(ctx, page) {
            let err = report(err);
            if first_failure.is_none() {
                first_failure = Some(err);
            }
        }
    }
    match first_failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn run_page(ctx: &RuntimeContext, page: &Path) -> Result<()> {
    let formula = read_formula(page)?;
    let mut exec = ctx.execution_context(page);
    transmute(&formula, &mut exec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alchemist_config::Settings;
    use alchemist_formula::{AlchemyError, ErrorKind, FORMULA_FILE_NAME};
    use pretty_assertions::assert_eq;
    use std::fs;

    const VALID: &str = "\
title: valid
commands:
  - init_bare_repo:
      bare: remotes/valid
      clone_to: valid
";

    const INCOMPLETE: &str = "\
title: incomplete
commands:
  - init_bare_repo:
      clone_to: incomplete
";

    fn book(pages: &[(&str, &str)]) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for (task, formula) in pages {
            let dir = tmp.path().join("book").join(task);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(FORMULA_FILE_NAME), formula).unwrap();
        }
        tmp
    }

    fn ctx(tmp: &tempfile::TempDir, test: bool) -> RuntimeContext {
        RuntimeContext::new(Settings {
            targetdir: tmp.path().join("out"),
            cfgdir: tmp.path().join("book"),
            test,
            ..Settings::default()
        })
    }

    #[test]
    fn missing_task_is_a_stat_error() {
        let tmp = book(&[("valid", VALID)]);
        let err = run_tasks(&ctx(&tmp, true), &["valid".into(), "missing".into()]).unwrap_err();
        assert!(matches!(err, AlchemyError::Io { op: "stat", .. }));
    }

    #[test]
    fn dry_run_creates_nothing() {
        let tmp = book(&[("valid", VALID)]);
        run_all(&ctx(&tmp, true)).unwrap();
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn batch_continues_after_a_failure() {
        let tmp = book(&[("a_incomplete", INCOMPLETE), ("b_valid", VALID)]);
        let err = run_all(&ctx(&tmp, false)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingValue);
        assert!(
            tmp.path()
                .join("out")
                .join("remotes")
                .join("valid")
                .join("HEAD")
                .is_file()
        );
    }

    #[test]
    fn first_failure_wins() {
        let tmp = book(&[("one", INCOMPLETE), ("two", "title: [unclosed")]);
        let err = run_tasks(&ctx(&tmp, true), &["two".into(), "one".into()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
