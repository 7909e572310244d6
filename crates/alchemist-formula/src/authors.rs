//! The author registry: short keys used in formulas mapped to the commit
//! identities that end up in the generated history.

/// A commit identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Author {
    pub key: &'static str,
    pub name: &'static str,
    pub email: &'static str,
}

/// Known authors. Formulas refer to them by `key`.
pub const AUTHORS: &[Author] = &[
    Author {
        key: "red",
        name: "Richard Red",
        email: "richard@pw-compa.ny",
    },
    Author {
        key: "blue",
        name: "Betty Blue",
        email: "betty@pw-compa.ny",
    },
    Author {
        key: "green",
        name: "Garry Green",
        email: "garry@pw-compa.ny",
    },
    Author {
        key: "api",
        name: "Alissa Api",
        email: "api@pw-compa.ny",
    },
    Author {
        key: "blacklist",
        name: "Benjamin Blacklist",
        email: "blacklist@pw-compa.ny",
    },
    Author {
        key: "config",
        name: "Carry Config",
        email: "config@pw-compa.ny",
    },
];

/// The author configured as local git user of every fresh clone.
pub const DEFAULT_AUTHOR: Author = AUTHORS[0];

/// Look up an author by key.
pub fn lookup(key: &str) -> Option<&'static Author> {
    AUTHORS.iter().find(|author| author.key == key)
}

/// Resolve an author key to the `--author` value for `git commit`.
///
/// Known keys become `Name <email>`; anything else is passed through as is.
pub fn commit_author(key: &str) -> String {
    match lookup(key) {
        Some(author) => author.to_string(),
        None => key.to_string(),
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_author_resolves_to_name_and_email() {
        assert_eq!(commit_author("red"), "Richard Red <richard@pw-compa.ny>");
        assert_eq!(commit_author("blue"), "Betty Blue <betty@pw-compa.ny>");
    }

    #[test]
    fn unknown_author_passes_through() {
        assert_eq!(commit_author("skywalker"), "skywalker");
    }

    #[test]
    fn default_author_is_red() {
        assert_eq!(DEFAULT_AUTHOR.key, "red");
        assert_eq!(lookup("red"), Some(&DEFAULT_AUTHOR));
    }
}
