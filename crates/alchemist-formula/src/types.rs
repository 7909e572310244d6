//! Formula data model: the formula itself, the spell variants and their
//! validation rules.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{AlchemyError, Result};

/// An ordered script of spells, read from a `gitalchemist.yaml` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    /// Human-readable name of the formula.
    pub title: String,

    /// Spells in execution order. Every one of them passed validation.
    pub commands: Vec<Spell>,

    /// Clone directory of the first `init_bare_repo` spell. Spells that work
    /// inside the clone use it without naming it again.
    pub clone_to: String,
}

/// The command symbols a formula may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    InitBareRepo,
    CreateFile,
    Add,
    Commit,
    CreateAddCommit,
    Git,
    Merge,
    Push,
    Move,
    RemoveAndCommit,
}

impl Symbol {
    pub const ALL: [Symbol; 10] = [
        Symbol::InitBareRepo,
        Symbol::CreateFile,
        Symbol::Add,
        Symbol::Commit,
        Symbol::CreateAddCommit,
        Symbol::Git,
        Symbol::Merge,
        Symbol::Push,
        Symbol::Move,
        Symbol::RemoveAndCommit,
    ];

    /// The key used in formula files.
    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::InitBareRepo => "init_bare_repo",
            Symbol::CreateFile => "create_file",
            Symbol::Add => "add",
            Symbol::Commit => "commit",
            Symbol::CreateAddCommit => "create_add_commit",
            Symbol::Git => "git",
            Symbol::Merge => "merge",
            Symbol::Push => "push",
            Symbol::Move => "mv",
            Symbol::RemoveAndCommit => "remove_and_commit",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = AlchemyError;

    fn from_str(s: &str) -> Result<Self> {
        Symbol::ALL
            .into_iter()
            .find(|symbol| symbol.as_str() == s)
            .ok_or_else(|| AlchemyError::UnknownCommand {
                symbol: s.to_string(),
            })
    }
}

/// One command of a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spell {
    InitRepo(InitRepoSpell),
    CreateFile(CreateFileSpell),
    Add(AddSpell),
    Commit(CommitSpell),
    CreateAddCommit(CreateAddCommitSpell),
    Git(GitSpell),
    Merge(MergeSpell),
    Push(PushSpell),
    Move(MoveSpell),
    RemoveAndCommit(RemoveAndCommitSpell),
}

impl Spell {
    pub fn symbol(&self) -> Symbol {
        match self {
            Spell::InitRepo(_) => Symbol::InitBareRepo,
            Spell::CreateFile(_) => Symbol::CreateFile,
            Spell::Add(_) => Symbol::Add,
            Spell::Commit(_) => Symbol::Commit,
            Spell::CreateAddCommit(_) => Symbol::CreateAddCommit,
            Spell::Git(_) => Symbol::Git,
            Spell::Merge(_) => Symbol::Merge,
            Spell::Push(_) => Symbol::Push,
            Spell::Move(_) => Symbol::Move,
            Spell::RemoveAndCommit(_) => Symbol::RemoveAndCommit,
        }
    }

    /// Check that every required field is present and well formed.
    ///
    /// Fields are checked in declaration order; the first problem wins.
    pub fn validate(&self) -> Result<()> {
        match self {
            Spell::InitRepo(s) => {
                require("bare", &s.bare)?;
                require("clone_to", &s.clone_to)
            }
            Spell::CreateFile(s) => {
                require("source", &s.source)?;
                require("target", &s.target)
            }
            Spell::Add(s) => require_list("files", &s.files),
            Spell::Commit(s) => {
                require("message", &s.message)?;
                require("author", &s.author)
            }
            Spell::CreateAddCommit(s) => {
                require_list("files", &s.files)?;
                require("message", &s.message)?;
                require("author", &s.author)?;
                for pair in &s.files {
                    FilePair::parse(pair)?;
                }
                Ok(())
            }
            Spell::Git(s) => require("command", &s.command),
            Spell::Merge(s) => {
                require("source", &s.source)?;
                require("target", &s.target)
            }
            Spell::Push(_) => Ok(()),
            Spell::Move(s) => {
                require("source", &s.source)?;
                require("target", &s.target)
            }
            Spell::RemoveAndCommit(s) => {
                require_list("files", &s.files)?;
                require("message", &s.message)?;
                require("author", &s.author)
            }
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AlchemyError::missing(field));
    }
    Ok(())
}

fn require_list(field: &'static str, values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(AlchemyError::missing(field));
    }
    Ok(())
}

/// Serde helpers for payload fields. A scalar of any type is read as its
/// YAML text and an empty value (`message:`) reads as the field's default,
/// so empty required fields surface as validation errors.
mod scalar {
    use serde::de::{Deserialize, Deserializer, Error, Unexpected};
    use serde_yaml::Value;

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        value.map_or_else(|| Ok(String::new()), render)
    }

    pub fn list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let values = Option::<Vec<Value>>::deserialize(deserializer)?;
        values.unwrap_or_default().into_iter().map(render).collect()
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Option::<bool>::deserialize(deserializer).map(Option::unwrap_or_default)
    }

    fn render<E: Error>(value: Value) -> Result<String, E> {
        match value {
            Value::Null => Ok(String::new()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::String(s) => Ok(s),
            Value::Sequence(_) => Err(E::invalid_type(Unexpected::Seq, &"a scalar")),
            Value::Mapping(_) => Err(E::invalid_type(Unexpected::Map, &"a scalar")),
            Value::Tagged(tagged) => render(tagged.value),
        }
    }
}

// ---------------------------------------------------------------------------
// Spell payloads
// ---------------------------------------------------------------------------

/// `init_bare_repo`: create a bare repository and clone it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InitRepoSpell {
    /// Directory of the bare repository, relative to the repo root.
    #[serde(deserialize_with = "scalar::text")]
    pub bare: String,
    /// Directory of the clone, relative to the repo root.
    #[serde(deserialize_with = "scalar::text")]
    pub clone_to: String,
}

/// `create_file`: copy a file or directory from the task into the clone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateFileSpell {
    #[serde(deserialize_with = "scalar::text")]
    pub source: String,
    #[serde(deserialize_with = "scalar::text")]
    pub target: String,
}

/// `add`: stage files one by one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AddSpell {
    #[serde(deserialize_with = "scalar::list")]
    pub files: Vec<String>,
}

/// `commit`: commit the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommitSpell {
    #[serde(deserialize_with = "scalar::text")]
    pub message: String,
    /// Author key, looked up in the author registry.
    #[serde(deserialize_with = "scalar::text")]
    pub author: String,
}

/// `create_add_commit`: place several files and commit them together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateAddCommitSpell {
    /// Entries of the form `source => target`.
    #[serde(deserialize_with = "scalar::list")]
    pub files: Vec<String>,
    #[serde(deserialize_with = "scalar::text")]
    pub message: String,
    #[serde(deserialize_with = "scalar::text")]
    pub author: String,
}

/// `git`: run an arbitrary git command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GitSpell {
    #[serde(deserialize_with = "scalar::text")]
    pub command: String,
}

/// `merge`: merge `source` into `target`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MergeSpell {
    #[serde(deserialize_with = "scalar::text")]
    pub source: String,
    #[serde(deserialize_with = "scalar::text")]
    pub target: String,
    #[serde(deserialize_with = "scalar::flag")]
    pub delete_source: bool,
}

/// `push`: push `main` to `origin` when `main` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PushSpell {
    #[serde(deserialize_with = "scalar::flag")]
    pub main: bool,
}

/// `mv`: move a file inside the clone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MoveSpell {
    #[serde(deserialize_with = "scalar::text")]
    pub source: String,
    #[serde(deserialize_with = "scalar::text")]
    pub target: String,
}

/// `remove_and_commit`: remove files and commit the removal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RemoveAndCommitSpell {
    #[serde(deserialize_with = "scalar::list")]
    pub files: Vec<String>,
    #[serde(deserialize_with = "scalar::text")]
    pub message: String,
    #[serde(deserialize_with = "scalar::text")]
    pub author: String,
}

/// A `source => target` entry of `create_add_commit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    pub source: String,
    pub target: String,
}

impl FilePair {
    const SEPARATOR: &'static str = "=>";

    /// Split an entry on `=>`, trimming whitespace around the separator.
    ///
    /// Anything after a second separator is ignored.
    pub fn parse(entry: &str) -> Result<Self> {
        let mut parts = entry.split(Self::SEPARATOR).map(str::trim);
        let source = parts.next().unwrap_or_default();
        let Some(target) = parts.next() else {
            return Err(AlchemyError::invalid("files", "missing '=>'"));
        };
        if source.is_empty() {
            return Err(AlchemyError::invalid("files", "source missing"));
        }
        if target.is_empty() {
            return Err(AlchemyError::invalid("files", "target missing"));
        }
        Ok(Self {
            source: source.to_string(),
            target: target.to_string(),
        })
    }
}
