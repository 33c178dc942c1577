//! Error types for scope analysis

use crate::scope::ScopeKind;

/// Binder call sequences that break the nesting protocol
///
/// These are never returned. The manager asserts with them as the message, because a
/// binder that violates stack discipline has already corrupted the tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// `nest_global_scope` was called after a global scope already exists
    #[error("the global scope has already been created")]
    DuplicateGlobalScope,

    /// A non-global scope was nested with nothing open to hold it
    #[error("cannot nest a {kind} scope: no scope is open")]
    NoOpenScope {
        /// Kind of the scope that could not be nested
        kind: ScopeKind,
    },

    /// `close` was called on something other than the innermost open scope
    #[error("cannot close scope #{scope}: the innermost open scope is {current}")]
    CloseOutOfOrder {
        /// Scope the binder tried to close
        scope: u32,
        /// Innermost open scope, rendered for the message
        current: String,
    },

    /// A declaration, reference or directive targeted a scope that is not open
    #[error("cannot {operation} in scope #{scope}: the scope is not open")]
    ScopeNotOpen {
        /// Scope named by the call
        scope: u32,
        /// What the binder tried to do
        operation: &'static str,
    },

    /// The binder returned while scopes were still open
    #[error("binding finished with {open} scope(s) still open")]
    UnclosedScopes {
        /// How many scopes were left on the stack
        open: usize,
    },

    /// The binder returned without ever nesting a global scope
    #[error("binding finished without creating a global scope")]
    MissingGlobalScope,
}

/// Errors loading analysis options from a configuration file
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// The TOML document could not be parsed into options
    #[error("invalid options file: {0}")]
    Toml(#[from] toml::de::Error),

    /// The JSON document could not be parsed into options
    #[error("invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// `ecmaVersion` is neither an edition number nor a year
    #[error("unsupported ecmaVersion {0}")]
    InvalidEcmaVersion(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_messages() {
        assert_eq!(
            ProtocolError::NoOpenScope {
                kind: ScopeKind::Block
            }
            .to_string(),
            "cannot nest a block scope: no scope is open"
        );
        assert_eq!(
            ProtocolError::ScopeNotOpen {
                scope: 3,
                operation: "declare"
            }
            .to_string(),
            "cannot declare in scope #3: the scope is not open"
        );
    }
}
