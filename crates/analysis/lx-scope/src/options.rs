//! Analysis options
//!
//! Options are fixed when a [`ScopeManager`](crate::ScopeManager) is built. They can be
//! written by hand or loaded from TOML or JSON using the same camelCase keys ESLint-style
//! parser configurations use (`globalReturn`, `sourceType`, `impliedStrict`, `ecmaVersion`).

use crate::error::OptionsError;
use crate::namespace::Namespaces;
use serde::{Deserialize, Serialize};

/// Whether the analyzed program is a classic script or an ES module
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Classic script
    #[default]
    Script,
    /// ES module
    Module,
}

/// Which namespace an ambient global lives in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbientKind {
    /// A runtime value such as `globalThis`
    #[default]
    Value,
    /// A type-only name such as `PropertyKey`
    Type,
    /// A name usable as both, such as `Promise`
    Both,
}

impl AmbientKind {
    /// Namespace membership of a variable declared for this global
    pub fn namespaces(self) -> Namespaces {
        match self {
            Self::Value => Namespaces::VALUE,
            Self::Type => Namespaces::TYPE,
            Self::Both => Namespaces::VALUE | Namespaces::TYPE,
        }
    }
}

/// A host-provided global pre-declared in the global scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbientGlobal {
    /// Global name
    pub name: String,
    /// Namespace the name lives in
    #[serde(default)]
    pub kind: AmbientKind,
}

impl AmbientGlobal {
    /// Declare a value global
    pub fn value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AmbientKind::Value,
        }
    }

    /// Declare a global with an explicit namespace
    pub fn with_kind(name: impl Into<String>, kind: AmbientKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Immutable configuration for one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeOptions {
    /// Allow top-level `return`; the binder wraps the program in a function scope
    pub global_return: bool,
    /// Script or module
    pub source_type: SourceType,
    /// Treat the whole program as strict code
    pub implied_strict: bool,
    /// ECMAScript edition; `None` means "unknown, assume the oldest"
    pub ecma_version: Option<u32>,
    /// Ambient globals declared in the global scope before binding starts
    pub lib: Vec<AmbientGlobal>,
}

impl AnalyzeOptions {
    /// Parse options from a TOML document
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::Toml` for malformed documents and
    /// `OptionsError::InvalidEcmaVersion` for unknown editions.
    pub fn from_toml_str(source: &str) -> Result<Self, OptionsError> {
        let options: Self = toml::from_str(source)?;
        options.validated()
    }

    /// Parse options from a JSON document
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::Json` for malformed documents and
    /// `OptionsError::InvalidEcmaVersion` for unknown editions.
    pub fn from_json_str(source: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(source)?;
        options.validated()
    }

    /// Check `ecma_version` and normalize year editions (`2015`) to edition numbers (`6`)
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::InvalidEcmaVersion` if the version is neither form.
    pub fn validated(mut self) -> Result<Self, OptionsError> {
        if let Some(version) = self.ecma_version {
            self.ecma_version = Some(normalize_ecma_version(version)?);
        }
        Ok(self)
    }

    /// Top-level `return` is legal
    pub fn is_global_return(&self) -> bool {
        self.global_return
    }

    /// The program is an ES module
    pub fn is_module(&self) -> bool {
        self.source_type == SourceType::Module
    }

    /// Strict mode is implied for the whole program
    ///
    /// Requires ES5 or later; an unknown edition never implies strictness.
    pub fn is_strict(&self) -> bool {
        self.implied_strict && self.ecma_version.is_some_and(|version| version >= 5)
    }

    /// ES2015 scoping rules (block scopes, lexical declarations) apply
    pub fn is_es6(&self) -> bool {
        self.ecma_version.is_some_and(|version| version >= 6)
    }
}

fn normalize_ecma_version(version: u32) -> Result<u32, OptionsError> {
    match version {
        3 | 5 | 6..=17 => Ok(version),
        2015..=2026 => Ok(version - 2009),
        other => Err(OptionsError::InvalidEcmaVersion(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(implied_strict: bool, ecma_version: Option<u32>) -> AnalyzeOptions {
        AnalyzeOptions {
            implied_strict,
            ecma_version,
            ..AnalyzeOptions::default()
        }
    }

    #[test]
    fn test_is_strict_requires_es5() {
        assert!(options(true, Some(5)).is_strict());
        assert!(options(true, Some(2020)).is_strict());
        assert!(!options(true, Some(3)).is_strict());
        assert!(!options(true, None).is_strict());
        assert!(!options(false, Some(6)).is_strict());
        assert!(!options(false, None).is_strict());
    }

    #[test]
    fn test_is_es6() {
        assert!(options(false, Some(6)).is_es6());
        assert!(!options(false, Some(5)).is_es6());
        assert!(!options(false, None).is_es6());
    }

    #[test]
    fn test_defaults() {
        let defaults = AnalyzeOptions::default();
        assert!(!defaults.is_global_return());
        assert!(!defaults.is_module());
        assert!(!defaults.is_strict());
        assert!(defaults.lib.is_empty());
    }

    #[test]
    fn test_from_toml() {
        let options = AnalyzeOptions::from_toml_str(
            r#"
            globalReturn = true
            sourceType = "module"
            impliedStrict = true
            ecmaVersion = 2015

            [[lib]]
            name = "Promise"
            kind = "both"

            [[lib]]
            name = "globalThis"
            "#,
        )
        .unwrap();

        assert!(options.is_global_return());
        assert!(options.is_module());
        assert_eq!(options.ecma_version, Some(6));
        assert!(options.is_strict());
        assert_eq!(
            options.lib,
            vec![
                AmbientGlobal::with_kind("Promise", AmbientKind::Both),
                AmbientGlobal::value("globalThis"),
            ]
        );
    }

    #[test]
    fn test_from_json() {
        let options =
            AnalyzeOptions::from_json_str(r#"{ "sourceType": "script", "ecmaVersion": 5 }"#)
                .unwrap();
        assert!(!options.is_module());
        assert_eq!(options.ecma_version, Some(5));
        assert!(!options.is_es6());
    }

    #[test]
    fn test_rejects_unknown_edition() {
        let err = AnalyzeOptions::from_json_str(r#"{ "ecmaVersion": 4 }"#).unwrap_err();
        assert!(matches!(err, OptionsError::InvalidEcmaVersion(4)));
    }

    #[test]
    fn test_rejects_unknown_source_type() {
        let err = AnalyzeOptions::from_toml_str(r#"sourceType = "commonjs""#).unwrap_err();
        assert!(matches!(err, OptionsError::Toml(_)));
    }
}
