//! Execution of spells against an [`Assistant`].
//!
//! Composite spells (`create_add_commit`, `remove_and_commit`) expand into a
//! short sequence of primitive spells that run in order and stop at the
//! first failure.

use std::path::{Path, PathBuf};

use alchemist_git::is_git_executable;

use crate::assistant::Assistant;
use crate::authors::{DEFAULT_AUTHOR, commit_author};
use crate::context::{ExecutionContext, join_relative};
use crate::error::Result;
use crate::types::{
    AddSpell, CommitSpell, CreateAddCommitSpell, CreateFileSpell, FilePair, GitSpell,
    InitRepoSpell, MergeSpell, MoveSpell, PushSpell, RemoveAndCommitSpell, Spell,
};

/// Branch created by `init_bare_repo` and pushed by `push`.
pub const DEFAULT_BRANCH: &str = "main";

/// Commit date passed to every generated commit.
pub const COMMIT_DATE: &str = "format:relative:5.hours.ago";

/// Path that stages every change in the working tree.
const STAGE_ALL: &str = ".";

/// A git call: where to run it and with which arguments.
struct GitStep {
    dir: PathBuf,
    args: Vec<String>,
}

impl GitStep {
    fn new(dir: &Path, args: &[&str]) -> Self {
        Self {
            dir: dir.to_path_buf(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

/// Run each step after announcing it; stop at the first failure.
fn run_steps(steps: &[GitStep], a: &mut dyn Assistant, ctx: &ExecutionContext) -> Result<()> {
    for step in steps {
        a.info(&format!("{}: {}", ctx.progress(), step.args.join(" ")));
        a.git(&step.dir, &step.args)?;
    }
    Ok(())
}

impl Spell {
    /// Execute the spell. The spell must have passed [`Spell::validate`].
    pub fn cast(&self, a: &mut dyn Assistant, ctx: &ExecutionContext) -> Result<()> {
        match self {
            Spell::InitRepo(s) => s.cast(a, ctx),
            Spell::CreateFile(s) => s.cast(a, ctx),
            Spell::Add(s) => s.cast(a, ctx),
            Spell::Commit(s) => s.cast(a, ctx),
            Spell::CreateAddCommit(s) => s.cast(a, ctx),
            Spell::Git(s) => s.cast(a, ctx),
            Spell::Merge(s) => s.cast(a, ctx),
            Spell::Push(s) => s.cast(a, ctx),
            Spell::Move(s) => s.cast(a, ctx),
            Spell::RemoveAndCommit(s) => s.cast(a, ctx),
        }
    }
}

impl InitRepoSpell {
    fn cast(&self, a: &mut dyn Assistant, ctx: &ExecutionContext) -> Result<()> {
        let bare_dir = join_relative(&ctx.repo_dir, &self.bare);
        a.info(&format!("{}: make directory {}", ctx.progress(), bare_dir.display()));
        a.make_dir(&bare_dir)?;

        let clone_dir = join_relative(&ctx.repo_dir, &self.clone_to);
        let origin = Path::new("..").join(&self.bare);
        let initial_branch = format!("--initial-branch={DEFAULT_BRANCH}");
        let steps = [
            GitStep::new(&bare_dir, &["init", "--bare", &initial_branch, "."]),
            GitStep::new(&ctx.repo_dir, &["clone", &self.bare, &self.clone_to]),
            GitStep::new(
                &clone_dir,
                &["remote", "set-url", "origin", &origin.to_string_lossy()],
            ),
            GitStep::new(&clone_dir, &["config", "user.name", DEFAULT_AUTHOR.name]),
            GitStep::new(&clone_dir, &["config", "user.email", DEFAULT_AUTHOR.email]),
            GitStep::new(&clone_dir, &["config", "init.defaultBranch", DEFAULT_BRANCH]),
        ];
        run_steps(&steps, a, ctx)
    }
}

impl CreateFileSpell {
    fn cast(&self, a: &mut dyn Assistant, ctx: &ExecutionContext) -> Result<()> {
        let from = ctx.source_dir().join(&self.source);
        let to = ctx.clone_dir().join(&self.target);
        a.info(&format!(
            "{}: copy {} to {}",
            ctx.progress(),
            from.display(),
            to.display()
        ));
        a.copy(&from, &to)
    }
}

impl AddSpell {
    fn cast(&self, a: &mut dyn Assistant, ctx: &ExecutionContext) -> Result<()> {
        a.info(&format!("{}: add {} files", ctx.progress(), self.files.len()));
        let dir = ctx.clone_dir();
        for file in &self.files {
            a.git(&dir, &["add".to_string(), file.clone()])?;
        }
        Ok(())
    }
}

impl CommitSpell {
    fn args(&self) -> Vec<String> {
        vec![
            "commit".to_string(),
            format!("--date={COMMIT_DATE}"),
            "-m".to_string(),
            self.message.clone(),
            format!("--author={}", commit_author(&self.author)),
        ]
    }

    fn cast(&self, a: &mut dyn Assistant, ctx: &ExecutionContext) -> Result<()> {
        a.info(&format!("{}: commit", ctx.progress()));
        a.git(&ctx.clone_dir(), &self.args())
    }
}

impl CreateAddCommitSpell {
    /// The primitive spells this spell stands for.
    pub fn expand(&self) -> Result<Vec<Spell>> {
        let mut spells = Vec::with_capacity(self.files.len() + 2);
        for entry in &self.files {
            let pair = FilePair::parse(entry)?;
            spells.push(Spell::CreateFile(CreateFileSpell {
                source: pair.source,
                target: pair.target,
            }));
        }
        spells.push(Spell::Add(AddSpell {
            files: vec![STAGE_ALL.to_string()],
        }));
        spells.push(Spell::Commit(CommitSpell {
            message: self.message.clone(),
            author: self.author.clone(),
        }));
        Ok(spells)
    }

    fn cast(&self, a: &mut dyn Assistant, ctx: &ExecutionContext) -> Result<()> {
        for spell in self.expand()? {
            spell.cast(a, ctx)?;
        }
        Ok(())
    }
}

impl GitSpell {
    /// Split the command line into git arguments.
    ///
    /// Whitespace separates arguments except inside double quotes; the quote
    /// characters are dropped. A leading `git` (or `git.exe`) is removed. An
    /// unbalanced quote runs to the end of the line.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        let mut current = String::new();
        let mut quoted = false;

        for c in self.command.chars() {
            if c == '"' {
                quoted = !quoted;
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            } else if c.is_whitespace() && !quoted {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            } else {
                current.push(c);
            }
        }
        if !current.is_empty() {
            args.push(current);
        }

        if args.first().is_some_and(|first| is_git_executable(first)) {
            args.remove(0);
        }
        args
    }

    fn cast(&self, a: &mut dyn Assistant, ctx: &ExecutionContext) -> Result<()> {
        let args = self.args();
        a.info(&format!("{}: {}", ctx.progress(), args.join(" ")));
        a.git(&ctx.clone_dir(), &args)
    }
}

impl MergeSpell {
    fn cast(&self, a: &mut dyn Assistant, ctx: &ExecutionContext) -> Result<()> {
        a.info(&format!(
            "{}: merge {} into {} (delete: {})",
            ctx.progress(),
            self.source,
            self.target,
            self.delete_source
        ));
        let dir = ctx.clone_dir();
        let mut steps = vec![
            GitStep::new(&dir, &["checkout", &self.target]),
            GitStep::new(&dir, &["merge", &self.source]),
        ];
        if self.delete_source {
            steps.push(GitStep::new(&dir, &["branch", "-d", &self.source]));
        }
        run_steps(&steps, a, ctx)
    }
}

impl PushSpell {
    fn cast(&self, a: &mut dyn Assistant, ctx: &ExecutionContext) -> Result<()> {
        a.info(&format!("{}: push ({})", ctx.progress(), self.main));
        if !self.main {
            return Ok(());
        }
        let step = GitStep::new(&ctx.clone_dir(), &["push", "origin", DEFAULT_BRANCH]);
        a.git(&step.dir, &step.args)
    }
}

impl MoveSpell {
    fn cast(&self, a: &mut dyn Assistant, ctx: &ExecutionContext) -> Result<()> {
        a.info(&format!("{}: mv {} {}", ctx.progress(), self.source, self.target));
        let step = GitStep::new(&ctx.clone_dir(), &["mv", &self.source, &self.target]);
        a.git(&step.dir, &step.args)
    }
}

impl RemoveAndCommitSpell {
    fn cast(&self, a: &mut dyn Assistant, ctx: &ExecutionContext) -> Result<()> {
        a.info(&format!(
            "{}: remove and commit {} files",
            ctx.progress(),
            self.files.len()
        ));
        let dir = ctx.clone_dir();
        let steps: Vec<GitStep> = self
            .files
            .iter()
            .map(|file| GitStep::new(&dir, &["rm", file]))
            .collect();
        run_steps(&steps, a, ctx)?;

        let commit = CommitSpell {
            message: self.message.clone(),
            author: self.author.clone(),
        };
        commit.cast(a, ctx)
    }
}
