//! Decode formula documents into validated [`Formula`] values.
//!
//! A formula document is a YAML mapping with a `title` and a `commands`
//! sequence. Every command is a single-key mapping from a spell symbol to the
//! spell's fields:
//!
//! ```yaml
//! title: example
//! commands:
//!   - init_bare_repo:
//!       bare: remotes/example
//!       clone_to: example
//!   - push:
//! ```
//!
//! Parsing is all or nothing: the first entry that fails to decode or validate
//! aborts the whole formula.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::de::{DeserializeOwned, Error as _};
use serde_yaml::{Mapping, Value};

use crate::error::{AlchemyError, Result};
use crate::types::{Formula, Spell, Symbol};

/// The raw document, before the commands are resolved to spells.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FormulaDocument {
    title: String,
    commands: Vec<Value>,
}

/// Parse a formula from YAML text.
pub fn parse_formula(text: &str) -> Result<Formula> {
    let document = serde_yaml::from_str(text).map_err(decode_error("Formula"))?;
    build(document)
}

/// Parse a formula from a reader yielding YAML.
pub fn from_reader(reader: impl Read) -> Result<Formula> {
    let document = serde_yaml::from_reader(reader).map_err(decode_error("Formula"))?;
    build(document)
}

/// Read and parse the formula file at `path`.
///
/// # Errors
///
/// Returns an [`AlchemyError::Io`] with operation `open` if the file cannot be
/// opened, or any parse error of [`parse_formula`].
pub fn read_formula(path: &Path) -> Result<Formula> {
    let file = File::open(path).map_err(|e| AlchemyError::io("open", path, e))?;
    from_reader(file)
}

fn decode_error(element: &str) -> impl FnOnce(serde_yaml::Error) -> AlchemyError + '_ {
    move |source| AlchemyError::Decode {
        element: element.to_string(),
        source,
    }
}

fn build(document: FormulaDocument) -> Result<Formula> {
    let mut commands = Vec::with_capacity(document.commands.len());
    let mut clone_to: Option<String> = None;

    for (index, entry) in document.commands.into_iter().enumerate() {
        let (symbol, payload) = split_entry(entry)?;
        let spell = decode_spell(symbol, payload)?;
        spell
            .validate()
            .map_err(|source| AlchemyError::Validate {
                symbol: symbol.as_str(),
                position: index + 1,
                source: Box::new(source),
            })?;

        if let Spell::InitRepo(init) = &spell {
            clone_to.get_or_insert_with(|| init.clone_to.clone());
        }
        commands.push(spell);
    }

    Ok(Formula {
        title: document.title,
        commands,
        clone_to: clone_to.unwrap_or_default(),
    })
}

/// Split a single-key command entry into its symbol and payload.
fn split_entry(entry: Value) -> Result<(Symbol, Value)> {
    let mapping = match entry {
        Value::Mapping(mapping) if mapping.len() == 1 => mapping,
        other => return Err(malformed_entry(&other)),
    };
    let Some((key, payload)) = mapping.into_iter().next() else {
        return Err(malformed_entry(&Value::Null));
    };
    let symbol: Symbol = match key {
        Value::String(key) => key.parse()?,
        other => return Err(malformed_entry(&other)),
    };

    // `- push:` carries no payload; treat it as an empty mapping.
    let payload = match payload {
        Value::Null => Value::Mapping(Mapping::new()),
        other => other,
    };
    Ok((symbol, payload))
}

fn malformed_entry(entry: &Value) -> AlchemyError {
    let shown = serde_yaml::to_string(entry).unwrap_or_default();
    AlchemyError::Decode {
        element: "command".to_string(),
        source: serde_yaml::Error::custom(format!(
            "expected a single-key mapping, got: {}",
            shown.trim_end()
        )),
    }
}

fn decode_spell(symbol: Symbol, payload: Value) -> Result<Spell> {
    let spell = match symbol {
        Symbol::InitBareRepo => Spell::InitRepo(decode(symbol, payload)?),
        Symbol::CreateFile => Spell::CreateFile(decode(symbol, payload)?),
        Symbol::Add => Spell::Add(decode(symbol, payload)?),
        Symbol::Commit => Spell::Commit(decode(symbol, payload)?),
        Symbol::CreateAddCommit => Spell::CreateAddCommit(decode(symbol, payload)?),
        Symbol::Git => Spell::Git(decode(symbol, payload)?),
        Symbol::Merge => Spell::Merge(decode(symbol, payload)?),
        Symbol::Push => Spell::Push(decode(symbol, payload)?),
        Symbol::Move => Spell::Move(decode(symbol, payload)?),
        Symbol::RemoveAndCommit => Spell::RemoveAndCommit(decode(symbol, payload)?),
    };
    Ok(spell)
}

fn decode<T: DeserializeOwned>(symbol: Symbol, payload: Value) -> Result<T> {
    serde_yaml::from_value(payload).map_err(|source| AlchemyError::Decode {
        element: format!("node {symbol}"),
        source,
    })
}
