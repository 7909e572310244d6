//! Formula engine for gitalchemist.
//!
//! A formula is a YAML script of spells that, replayed in order, builds a git
//! repository with a scripted history: a bare remote, a clone, files copied in
//! from a task directory, commits by fixed authors, merges and pushes.
//!
//! Spells never touch the world directly. They run against an
//! [`Assistant`]: the [`LiveAssistant`] spawns git and copies files, the
//! [`DryRunAssistant`] only logs what would happen.

pub mod assistant;
pub mod authors;
pub mod book;
pub mod context;
pub mod copy;
pub mod engine;
pub mod error;
pub mod live;
pub mod logbook;
pub mod parser;
pub mod spell;
pub mod types;

#[cfg(test)]
mod test_support;

pub use assistant::{Assistant, DryRunAssistant};
pub use book::{FORMULA_FILE_NAME, list_book_content, list_pages};
pub use context::ExecutionContext;
pub use copy::{CopyPlan, examine};
pub use engine::{run_formula, transmute};
pub use error::{AlchemyError, ErrorKind, Result};
pub use live::LiveAssistant;
pub use logbook::{BracketFormat, Logbook};
pub use parser::{parse_formula, read_formula};
pub use types::{Formula, Spell, Symbol};
