//! Syntax node identity
//!
//! Analysis never looks inside AST nodes. A binder assigns every node it walks a stable
//! [`NodeId`], and all node-keyed tables (node to scopes, node to declared variables) use
//! that id, so their lifetime is bounded by the tables themselves rather than the tree.

use derive_more::{Display, From};
use lx_intern::Symbol;
use serde::{Deserialize, Serialize};

/// Stable identifier for one AST node
#[derive(Copy, Clone, Debug, Display, From, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[display("n{_0}")]
pub struct NodeId(pub u32);

impl NodeId {
    /// Wrap a raw id
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw id as a table index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An identifier occurrence: the node it lives at and the name it spells
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct Identifier {
    /// Node the identifier occurs at
    pub node: NodeId,
    /// Interned spelling
    pub name: Symbol,
}

impl Identifier {
    /// Identifier `name` at `node`
    pub fn new(node: NodeId, name: Symbol) -> Self {
        Self { node, name }
    }
}

/// Hands out node ids in walk order
#[derive(Debug, Default)]
pub struct NodeIdAllocator {
    next: u32,
}

impl NodeIdAllocator {
    /// Create an allocator starting at `n0`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id
    pub fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    #[must_use]
    pub fn allocated(&self) -> u32 {
        self.next
    }
}
