//! Test doubles shared by the unit tests of this crate.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use alchemist_git::GitError;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::assistant::Assistant;
use crate::error::{AlchemyError, Result};
use crate::logbook::{BracketFormat, Logbook};
use crate::types::{
    AddSpell, CommitSpell, CreateAddCommitSpell, CreateFileSpell, Formula, GitSpell,
    InitRepoSpell, MergeSpell, MoveSpell, PushSpell, RemoveAndCommitSpell, Spell,
};

/// One recorded assistant call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Git { dir: PathBuf, args: Vec<String> },
    Copy { from: PathBuf, to: PathBuf },
    MakeDir(PathBuf),
}

impl Call {
    pub fn git(dir: impl AsRef<Path>, args: &[&str]) -> Self {
        Call::Git {
            dir: dir.as_ref().to_path_buf(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    pub fn copy(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Self {
        Call::Copy {
            from: from.as_ref().to_path_buf(),
            to: to.as_ref().to_path_buf(),
        }
    }

    pub fn make_dir(dir: impl AsRef<Path>) -> Self {
        Call::MakeDir(dir.as_ref().to_path_buf())
    }
}

/// Records calls instead of executing them.
///
/// Calls are numbered from 1. The call whose number equals `error_at` fails
/// and is not recorded; `error_at == 0` never fails.
#[derive(Debug, Default)]
pub struct AssistantSpy {
    pub calls: Vec<Call>,
    pub log: Logbook,
    counter: usize,
    error_at: usize,
}

impl AssistantSpy {
    pub fn failing_at(error_at: usize) -> Self {
        Self {
            error_at,
            ..Self::default()
        }
    }

    fn next_fails(&mut self) -> bool {
        self.counter += 1;
        self.counter == self.error_at
    }

    fn io_failure(op: &'static str, path: &Path) -> AlchemyError {
        AlchemyError::io(op, path, io::Error::other("spy failure"))
    }
}

impl Assistant for AssistantSpy {
    fn git(&mut self, dir: &Path, args: &[String]) -> Result<()> {
        if self.next_fails() {
            let err = GitError::CommandFailed {
                code: Some(1),
                output: "spy failure".to_string(),
            };
            return Err(AlchemyError::git(args, err));
        }
        self.calls.push(Call::Git {
            dir: dir.to_path_buf(),
            args: args.to_vec(),
        });
        Ok(())
    }

    fn copy(&mut self, from: &Path, to: &Path) -> Result<()> {
        if self.next_fails() {
            return Err(Self::io_failure("copy", from));
        }
        self.calls.push(Call::copy(from, to));
        Ok(())
    }

    fn make_dir(&mut self, dir: &Path) -> Result<()> {
        if self.next_fails() {
            return Err(Self::io_failure("make dir", dir));
        }
        self.calls.push(Call::make_dir(dir));
        Ok(())
    }

    fn debug(&self, msg: &str) {
        self.log.debug(msg);
    }

    fn info(&self, msg: &str) {
        self.log.info(msg);
    }
}

// ---------------------------------------------------------------------------
// Formula fixture
// ---------------------------------------------------------------------------

/// A formula using every spell symbol.
pub const WORKFLOW_YAML: &str = r#"
title: test_workflow
commands:
  - init_bare_repo:
      bare: remotes/create_add_commit
      clone_to: workflow
  - create_file:
      source: files/project_plan_v1.md
      target: project_plan.md
  - add:
      files:
        - project_plan.md
  - commit:
      message: Added first file
      author: red
  - create_add_commit:
      files:
        - files/project_plan_v3.md => project_plan.md
      message: removed unnecessary parts of the project plan
      author: red
  - create_add_commit:
      files:
        - files/folder1 => folder1/
      message: added folder1
      author: red
  - git:
      command: git commit -m "my message"
  - git:
      command: push origin main
  - merge:
      source: feature/start_project
      target: main
  - merge:
      source: feature/other
      target: main
      delete_source: true
  - push:
      main: true
  - mv:
      source: main.py
      target: generator.py
  - remove_and_commit:
      files:
        - notes-timeline.txt
      message: clean up timeline notes
      author: red
  - remove_and_commit:
      files:
        - notes-timeline_nonexistent.txt
      message: clean up timeline notes that don't exist (this step should fail)
      author: red
"#;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// The formula described by [`WORKFLOW_YAML`].
pub fn complete_formula() -> Formula {
    Formula {
        title: "test_workflow".into(),
        clone_to: "workflow".into(),
        commands: vec![
            Spell::InitRepo(InitRepoSpell {
                bare: "remotes/create_add_commit".into(),
                clone_to: "workflow".into(),
            }),
            Spell::CreateFile(CreateFileSpell {
                source: "files/project_plan_v1.md".into(),
                target: "project_plan.md".into(),
            }),
            Spell::Add(AddSpell {
                files: strings(&["project_plan.md"]),
            }),
            Spell::Commit(CommitSpell {
                message: "Added first file".into(),
                author: "red".into(),
            }),
            Spell::CreateAddCommit(CreateAddCommitSpell {
                files: strings(&["files/project_plan_v3.md => project_plan.md"]),
                message: "removed unnecessary parts of the project plan".into(),
                author: "red".into(),
            }),
            Spell::CreateAddCommit(CreateAddCommitSpell {
                files: strings(&["files/folder1 => folder1/"]),
                message: "added folder1".into(),
                author: "red".into(),
            }),
            Spell::Git(GitSpell {
                command: r#"git commit -m "my message""#.into(),
            }),
            Spell::Git(GitSpell {
                command: "push origin main".into(),
            }),
            Spell::Merge(MergeSpell {
                source: "feature/start_project".into(),
                target: "main".into(),
                delete_source: false,
            }),
            Spell::Merge(MergeSpell {
                source: "feature/other".into(),
                target: "main".into(),
                delete_source: true,
            }),
            Spell::Push(PushSpell { main: true }),
            Spell::Move(MoveSpell {
                source: "main.py".into(),
                target: "generator.py".into(),
            }),
            Spell::RemoveAndCommit(RemoveAndCommitSpell {
                files: strings(&["notes-timeline.txt"]),
                message: "clean up timeline notes".into(),
                author: "red".into(),
            }),
            Spell::RemoveAndCommit(RemoveAndCommitSpell {
                files: strings(&["notes-timeline_nonexistent.txt"]),
                message: "clean up timeline notes that don't exist (this step should fail)".into(),
                author: "red".into(),
            }),
        ],
    }
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber that formats like the binary and return
/// everything it logged.
pub fn capture_log(f: impl FnOnce()) -> String {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_max_level(Level::DEBUG)
        .event_format(BracketFormat)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = capture.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}
