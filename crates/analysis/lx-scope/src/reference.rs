//! Identifier references

use crate::namespace::Namespace;
use crate::scope::ScopeId;
use crate::variable::VariableId;
use la_arena::Idx;
use lx_syntax::{Identifier, NodeId};

/// Unique identifier for a reference
pub type ReferenceId = Idx<Reference>;

/// How a reference uses its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceFlag {
    /// `x`
    Read,
    /// `x = 1`
    Write,
    /// `x += 1`, `x++`
    ReadWrite,
}

impl ReferenceFlag {
    /// Flag includes a read
    pub fn is_read(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    /// Flag includes a write
    pub fn is_write(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }

    /// Compact form used in dumps
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "R",
            Self::Write => "W",
            Self::ReadWrite => "RW",
        }
    }
}

/// Everything the binder knows about a use site when it registers it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceSite {
    /// The identifier being used
    pub identifier: Identifier,
    /// Read/write flag
    pub flag: ReferenceFlag,
    /// Namespace to resolve in
    pub namespace: Namespace,
    /// Expression whose value is written, if known
    pub write_expr: Option<NodeId>,
    /// The write is a declaration initializer
    pub init: bool,
}

impl ReferenceSite {
    /// A value read
    pub fn read(identifier: Identifier) -> Self {
        Self {
            identifier,
            flag: ReferenceFlag::Read,
            namespace: Namespace::Value,
            write_expr: None,
            init: false,
        }
    }

    /// A value write of `write_expr`
    pub fn write(identifier: Identifier, write_expr: Option<NodeId>) -> Self {
        Self {
            flag: ReferenceFlag::Write,
            write_expr,
            ..Self::read(identifier)
        }
    }

    /// A compound assignment or update
    pub fn read_write(identifier: Identifier, write_expr: Option<NodeId>) -> Self {
        Self {
            flag: ReferenceFlag::ReadWrite,
            write_expr,
            ..Self::read(identifier)
        }
    }

    /// A use in type position
    pub fn type_reference(identifier: Identifier) -> Self {
        Self {
            namespace: Namespace::Type,
            ..Self::read(identifier)
        }
    }

    /// Mark a write as a declaration initializer (`let x = 1`)
    #[must_use]
    pub fn initializer(mut self) -> Self {
        self.init = true;
        self
    }
}

/// One syntactic use of an identifier
#[derive(Debug, Clone)]
pub struct Reference {
    /// The identifier being used
    pub identifier: Identifier,
    /// Scope that was open when the reference was created
    pub from: ScopeId,
    /// Variable the reference binds to, once its scope chain has closed
    pub resolved: Option<VariableId>,
    /// Read/write flag
    pub flag: ReferenceFlag,
    /// Namespace the reference resolves in
    pub namespace: Namespace,
    /// Expression whose value is written, if known
    pub write_expr: Option<NodeId>,
    /// The write is a declaration initializer
    pub init: bool,
    /// A sloppy-mode value write that creates a global if nothing declares the name
    pub maybe_implicit_global: bool,
    /// Passed through a `with` scope on the way to its binding
    pub tainted: bool,
}

impl Reference {
    pub(crate) fn new(site: ReferenceSite, from: ScopeId, from_strict: bool) -> Self {
        Self {
            identifier: site.identifier,
            from,
            resolved: None,
            flag: site.flag,
            namespace: site.namespace,
            write_expr: site.write_expr,
            init: site.init,
            maybe_implicit_global: site.flag.is_write()
                && site.namespace == Namespace::Value
                && !from_strict,
            tainted: false,
        }
    }

    /// Reads the bound value
    pub fn is_read(&self) -> bool {
        self.flag.is_read()
    }

    /// Assigns the bound value
    pub fn is_write(&self) -> bool {
        self.flag.is_write()
    }

    /// Reads without writing
    pub fn is_read_only(&self) -> bool {
        self.flag == ReferenceFlag::Read
    }

    /// Writes without reading
    pub fn is_write_only(&self) -> bool {
        self.flag == ReferenceFlag::Write
    }

    /// Both reads and writes (`x += 1`, `x++`)
    pub fn is_read_write(&self) -> bool {
        self.flag == ReferenceFlag::ReadWrite
    }

    /// Occurs in expression position
    pub fn is_value_reference(&self) -> bool {
        self.namespace == Namespace::Value
    }

    /// Occurs in type position
    pub fn is_type_reference(&self) -> bool {
        self.namespace == Namespace::Type
    }

    /// Resolved to a declaration in some enclosing scope
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// The binding is only a static guess: a `with` object may shadow it at runtime
    pub fn is_maybe_bound(&self) -> bool {
        self.tainted
    }
}
