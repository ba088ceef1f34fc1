//! Instance lifecycle scopes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle policy of a binding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Scope {
    /// One shared instance per class name.
    Singleton,
    /// A fresh instance per resolution.
    #[default]
    Prototype,
    /// Any other configured value; rejected at resolution time.
    Unsupported(String),
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "singleton" => Scope::Singleton,
            "prototype" => Scope::Prototype,
            _ => Scope::Unsupported(value.to_string()),
        }
    }
}

impl From<String> for Scope {
    fn from(value: String) -> Self {
        Scope::from(value.as_str())
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.to_string()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Singleton => write!(f, "singleton"),
            Scope::Prototype => write!(f, "prototype"),
            Scope::Unsupported(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scope() {
        assert_eq!(Scope::from("SINGLETON"), Scope::Singleton);
        assert_eq!(Scope::from("prototype"), Scope::Prototype);
        assert_eq!(Scope::from("BOGUS"), Scope::Unsupported("BOGUS".into()));
        assert_eq!(Scope::default(), Scope::Prototype);
    }

    #[test]
    fn test_scope_from_toml() {
        #[derive(Deserialize)]
        struct Entry {
            scope: Scope,
        }
        let entry: Entry = toml::from_str("scope = \"singleton\"").unwrap();
        assert_eq!(entry.scope, Scope::Singleton);
    }
}
