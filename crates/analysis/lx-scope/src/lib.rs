//! Scope analysis for JavaScript and TypeScript
//!
//! This crate builds the scope tree of a program and resolves every identifier reference
//! to the variable it binds to. It is driven by a binder that walks an already-parsed
//! syntax tree; the crate itself knows nothing about syntax beyond [`NodeId`]s.
//!
//! # Architecture
//!
//! - **Scope manager**: owns the arenas of scopes, variables and references and the stack
//!   of open scopes
//! - **Resolution**: runs when a scope closes, binding pending references or passing them
//!   to the enclosing scope
//! - **Namespaces**: values and types resolve separately; a `type Foo` never answers a
//!   value reference to `Foo`
//! - **Dump**: indented text rendering of the finished tree
//!
//! # Usage
//!
//! ```rust,ignore
//! use lx_scope::{AnalyzeOptions, Bind, ScopeManager, analyze};
//!
//! let manager = analyze(&program, AnalyzeOptions::default());
//! for reference in &manager.scope(global).through {
//!     // unresolved names
//! }
//! ```

pub mod dump;
pub mod error;
pub mod manager;
pub mod namespace;
pub mod options;
pub mod reference;
mod resolve;
pub mod scope;
pub mod variable;

pub use dump::Dump;
pub use error::{OptionsError, ProtocolError};
pub use manager::ScopeManager;
pub use namespace::{Namespace, Namespaces};
pub use options::{AmbientGlobal, AmbientKind, AnalyzeOptions, SourceType};
pub use reference::{Reference, ReferenceFlag, ReferenceId, ReferenceSite};
pub use scope::{Scope, ScopeId, ScopeKind};
pub use variable::{Definition, DefinitionKind, Variable, VariableId, VariableKind};

pub use lx_intern::{Interner, Symbol};
pub use lx_syntax::{Identifier, NodeId};

/// A syntax tree that can drive a [`ScopeManager`]
///
/// Implementations walk the tree depth-first, nesting a global scope first and closing
/// every scope they open before returning.
pub trait Bind {
    /// Walk the program, reporting scopes, declarations and references to `manager`
    fn bind(&self, manager: &mut ScopeManager);

    /// Interner the program's identifiers were interned with
    ///
    /// Binders that intern names up front return their interner here so the manager
    /// shares it. The default gives the manager a fresh one.
    fn interner(&self) -> Option<Interner> {
        None
    }
}

/// Run a binder over `program` and return the finished scope tree
///
/// # Panics
///
/// Panics if the binder never nests a global scope or leaves scopes open.
pub fn analyze(program: &impl Bind, options: AnalyzeOptions) -> ScopeManager {
    let mut manager = match program.interner() {
        Some(interner) => ScopeManager::with_interner(options, interner),
        None => ScopeManager::new(options),
    };
    program.bind(&mut manager);

    assert!(
        manager.global_scope().is_some(),
        "{}",
        ProtocolError::MissingGlobalScope
    );
    let open = manager.open_scope_count();
    assert!(open == 0, "{}", ProtocolError::UnclosedScopes { open });

    tracing::debug!(
        scopes = manager.scope_count(),
        variables = manager.variables().len(),
        "scope analysis finished"
    );
    manager
}
