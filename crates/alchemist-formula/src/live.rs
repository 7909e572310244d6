//! The assistant that really runs git and touches the filesystem.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use alchemist_git::git_command;
use walkdir::WalkDir;

use crate::assistant::{Assistant, describe_copy, describe_git, describe_make_dir};
use crate::copy::examine;
use crate::error::{AlchemyError, Result};
use crate::logbook::Logbook;

/// Executes every operation for real.
///
/// Each call is logged at debug level exactly like the dry-run assistant logs
/// it, followed by the non-empty output lines of git.
#[derive(Debug, Clone, Default)]
pub struct LiveAssistant {
    log: Logbook,
}

impl LiveAssistant {
    pub fn new(log: Logbook) -> Self {
        Self { log }
    }

    fn log_output(&self, output: &str) {
        for line in output.lines().filter(|line| !line.is_empty()) {
            self.log.debug(line);
        }
    }

    /// Copy every regular file below `from` to the same relative path below
    /// `to`. Directories are created as needed, never copied as entries.
    fn copy_tree(&self, from: &Path, to: &Path) -> Result<()> {
        for entry in WalkDir::new(from) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(from).to_path_buf();
                AlchemyError::io("walk dir", path, io::Error::from(e))
            })?;
            if entry.file_type().is_dir() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(from) else {
                continue;
            };
            let target = to.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| AlchemyError::io("make dir", parent, e))?;
            }
            copy_file(entry.path(), &target)?;
        }
        Ok(())
    }
}

impl Assistant for LiveAssistant {
    fn git(&mut self, dir: &Path, args: &[String]) -> Result<()> {
        self.log.debug(&describe_git(dir, args));
        match git_command(args, dir) {
            Ok(output) => {
                self.log_output(&output);
                Ok(())
            }
            Err(err) => {
                if let Some(output) = err.output() {
                    self.log_output(output);
                }
                Err(AlchemyError::git(args, err))
            }
        }
    }

    fn copy(&mut self, from: &Path, to: &Path) -> Result<()> {
        self.log.debug(&describe_copy(from, to));

        let plan = examine(from, to)?;
        if let Some(dir) = &plan.create_dir {
            self.make_dir(dir)?;
        }

        if plan.recursive {
            self.copy_tree(from, &plan.target)
        } else {
            copy_file(from, &plan.target)
        }
    }

    fn make_dir(&mut self, dir: &Path) -> Result<()> {
        self.log.debug(&describe_make_dir(dir));
        fs::create_dir_all(dir).map_err(|e| AlchemyError::io("make dir", dir, e))
    }

    fn debug(&self, msg: &str) {
        self.log.debug(msg);
    }

    fn info(&self, msg: &str) {
        self.log.info(msg);
    }
}

/// Stream the bytes of `from` into a newly created `to`.
///
/// The parent directory of `to` must exist.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    let mut source = File::open(from).map_err(|e| AlchemyError::io("open", from, e))?;
    let mut target = File::create(to).map_err(|e| AlchemyError::io("create", to, e))?;
    io::copy(&mut source, &mut target).map_err(|e| AlchemyError::copy(from, to, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::capture_log;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const CONTENT: &str = "hello 世界";

    /// A source tree with one file and one nested directory:
    ///
    /// ```text
    /// source.txt
    /// page1/gitalchemist.yaml
    /// page1/file1.txt
    /// page1/file2.txt
    /// page1/dir1/file3.txt
    /// ```
    fn fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("source.txt"), CONTENT).unwrap();
        let page = dir.path().join("page1");
        fs::create_dir_all(page.join("dir1")).unwrap();
        for file in ["gitalchemist.yaml", "file1.txt", "file2.txt"] {
            fs::write(page.join(file), file).unwrap();
        }
        fs::write(page.join("dir1").join("file3.txt"), "file3").unwrap();
        dir
    }

    fn page_files() -> Vec<PathBuf> {
        vec![
            PathBuf::from("gitalchemist.yaml"),
            PathBuf::from("file1.txt"),
            PathBuf::from("file2.txt"),
            Path::new("dir1").join("file3.txt"),
        ]
    }

    #[test]
    fn make_dir_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("dir").join("subdir");
        LiveAssistant::default().make_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn make_dir_below_a_file_fails() {
        let tmp = fixture();
        let dir = tmp.path().join("source.txt").join("subdir");
        let err = LiveAssistant::default().make_dir(&dir).unwrap_err();
        match err {
            AlchemyError::Io { op, path, .. } => {
                assert_eq!(op, "make dir");
                assert_eq!(path, dir);
            }
            other => panic!("expected Io, got: {other:?}"),
        }
    }

    #[test]
    fn copy_file_to_new_file() {
        let tmp = fixture();
        let to = tmp.path().join("target.txt");
        LiveAssistant::default()
            .copy(&tmp.path().join("source.txt"), &to)
            .unwrap();
        assert_eq!(fs::read_to_string(to).unwrap(), CONTENT);
    }

    #[test]
    fn copy_file_into_existing_dir() {
        let tmp = fixture();
        LiveAssistant::default()
            .copy(&tmp.path().join("source.txt"), &tmp.path().join("page1"))
            .unwrap();
        let copied = tmp.path().join("page1").join("source.txt");
        assert_eq!(fs::read_to_string(copied).unwrap(), CONTENT);
    }

    #[test]
    fn copy_file_into_new_dir_with_trailing_separator() {
        let tmp = fixture();
        let mut to = tmp.path().join("fresh").into_os_string();
        to.push(std::path::MAIN_SEPARATOR_STR);
        LiveAssistant::default()
            .copy(&tmp.path().join("source.txt"), Path::new(&to))
            .unwrap();
        let copied = tmp.path().join("fresh").join("source.txt");
        assert_eq!(fs::read_to_string(copied).unwrap(), CONTENT);
    }

    #[test]
    fn copy_missing_source_is_a_stat_error() {
        let tmp = fixture();
        let err = LiveAssistant::default()
            .copy(&tmp.path().join("missing.txt"), &tmp.path().join("to.txt"))
            .unwrap_err();
        assert!(matches!(err, AlchemyError::Io { op: "stat", .. }));
    }

    #[test]
    fn copy_dir_to_new_dir() {
        let tmp = fixture();
        let to = tmp.path().join("new_page");
        LiveAssistant::default()
            .copy(&tmp.path().join("page1"), &to)
            .unwrap();
        for file in page_files() {
            assert!(to.join(&file).is_file(), "missing {}", file.display());
        }
    }

    #[test]
    fn copy_dir_into_existing_dir_nests() {
        let tmp = fixture();
        let to = tmp.path().join("existing_page");
        fs::create_dir(&to).unwrap();
        LiveAssistant::default()
            .copy(&tmp.path().join("page1"), &to)
            .unwrap();
        for file in page_files() {
            let nested = to.join("page1").join(&file);
            assert!(nested.is_file(), "missing {}", nested.display());
        }
    }

    #[test]
    fn copy_file_errors_name_the_operation() {
        let tmp = fixture();

        let err = copy_file(&tmp.path().join("missing.txt"), &tmp.path().join("x")).unwrap_err();
        assert!(matches!(err, AlchemyError::Io { op: "open", .. }));

        let to = tmp.path().join("no").join("such").join("dir.txt");
        let err = copy_file(&tmp.path().join("source.txt"), &to).unwrap_err();
        assert!(matches!(err, AlchemyError::Io { op: "create", .. }));
    }

    #[cfg(unix)]
    #[test]
    fn failed_stream_names_source_and_target() {
        let tmp = fixture();
        // A directory opens fine but cannot be read as a file.
        let from = tmp.path().join("page1");
        let to = tmp.path().join("out.txt");

        let err = copy_file(&from, &to).unwrap_err();
        match &err {
            AlchemyError::Copy { from: f, to: t, .. } => {
                assert_eq!(f, &from);
                assert_eq!(t, &to);
            }
            other => panic!("expected Copy, got: {other:?}"),
        }
        assert!(
            err.to_string()
                .starts_with(&format!("copy {} - {}: ", from.display(), to.display())),
            "{err}"
        );
    }

    #[test]
    fn git_failure_is_an_execution_error() {
        let tmp = tempfile::tempdir().unwrap();
        let args = vec!["not-a-real-subcommand".to_string()];
        let err = LiveAssistant::default().git(tmp.path(), &args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Execution);
        match err {
            AlchemyError::Execution { program, args, .. } => {
                assert_eq!(program, "git");
                assert_eq!(args, vec!["not-a-real-subcommand"]);
            }
            other => panic!("expected Execution, got: {other:?}"),
        }
    }

    #[test]
    fn verbose_git_logs_call_and_output() {
        let tmp = tempfile::tempdir().unwrap();
        let args = vec!["--version".to_string()];
        let log = capture_log(|| {
            LiveAssistant::new(Logbook::new(true))
                .git(tmp.path(), &args)
                .unwrap();
        });
        let mut lines = log.lines();
        assert_eq!(
            lines.next(),
            Some(format!("[DEBUG] {:?}: git [\"--version\"]", tmp.path()).as_str())
        );
        assert!(lines.next().unwrap().starts_with("[DEBUG] git version"));
    }
}
