// Copyright 2021-2025 Martin Pool

//! Configuration for the tailored identifier/literal substitution operator.
//!
//! The catalog of substitution pairs lives outside the core: a caller loads
//! it (for example from a tree's config file) and passes it to the
//! discoverer at construction time. This module only defines the shape of
//! that catalog and how to load it from TOML, following the same
//! `#[serde(default, deny_unknown_fields)]` shape used elsewhere in this
//! crate's configuration.

use std::fs::read_to_string;

use camino::Utf8Path;
use serde::Deserialize;

use crate::error::Error;
use crate::Result;

/// One identifier-to-identifier or literal-to-literal substitution pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TailoredSubstitution {
    pub from: String,
    pub to: String,
}

/// The catalog of user-supplied substitutions for the tailored operator.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TailoredOperatorConfig {
    pub identifiers: Vec<TailoredSubstitution>,
    pub literals: Vec<TailoredSubstitution>,
}

impl TailoredOperatorConfig {
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        toml::de::from_str(toml).map_err(|err| Error::InvalidSourceFile {
            reason: format!("invalid tailored operator config: {err}"),
        })
    }

    /// Read a tailored-operator config file if it exists, or an empty
    /// (no-op) config if it does not.
    pub fn read_file(path: &Utf8Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let toml = read_to_string(path).map_err(|source| Error::Io { path: path.to_owned(), source })?;
        Self::from_toml_str(&toml)
    }

    /// The replacement identifier for `name`, if the catalog names one.
    pub fn identifier_replacement(&self, name: &str) -> Option<&str> {
        self.identifiers
            .iter()
            .find(|s| s.from == name)
            .map(|s| s.to.as_str())
    }

    /// The replacement literal for `text`, if the catalog names one.
    pub fn literal_replacement(&self, text: &str) -> Option<&str> {
        self.literals
            .iter()
            .find(|s| s.from == text)
            .map(|s| s.to.as_str())
    }
}

#[cfg(test)]
mod test {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_identifiers_and_literals() {
        let config = TailoredOperatorConfig::from_toml_str(indoc! {r#"
            [[identifiers]]
            from = "ACTIVE"
            to = "INACTIVE"

            [[literals]]
            from = "42"
            to = "0"
        "#})
        .unwrap();
        assert_eq!(config.identifier_replacement("ACTIVE"), Some("INACTIVE"));
        assert_eq!(config.literal_replacement("42"), Some("0"));
        assert_eq!(config.identifier_replacement("nope"), None);
    }

    #[test]
    fn empty_config_by_default() {
        let config = TailoredOperatorConfig::default();
        assert_eq!(config.identifier_replacement("anything"), None);
    }
}
