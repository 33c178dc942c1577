//! Value and type namespaces
//!
//! TypeScript keeps two name spaces in one scope tree: `type Foo = ...` and `const Foo = ...`
//! can live side by side. References are tagged with the namespace they are looked up in,
//! and variables record every namespace one of their definitions contributes to.

use std::fmt;

/// Namespace a reference is resolved in, and the namespace a scope belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Runtime values
    Value,
    /// Types
    Type,
}

impl Namespace {
    /// The single-namespace flag for this namespace
    pub fn flag(self) -> Namespaces {
        match self {
            Self::Value => Namespaces::VALUE,
            Self::Type => Namespaces::TYPE,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => f.write_str("value"),
            Self::Type => f.write_str("type"),
        }
    }
}

bitflags::bitflags! {
    /// Set of namespaces a definition or variable occupies
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Namespaces: u8 {
        /// Usable as a runtime value
        const VALUE = 1;
        /// Usable as a type
        const TYPE = 1 << 1;
    }
}

impl Namespaces {
    /// Whether a reference in `namespace` may bind to something with this membership
    pub fn admits(self, namespace: Namespace) -> bool {
        self.contains(namespace.flag())
    }
}
