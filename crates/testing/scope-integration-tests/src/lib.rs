//! Test support for scope analysis integration tests
//!
//! Provides a miniature syntax tree, a binder for it, and helpers for inspecting the
//! resulting scope tree by name.

pub mod ast;
mod binder;

use lx_scope::{AnalyzeOptions, ReferenceId, ScopeId, ScopeManager, VariableId, analyze};
use tracing_subscriber::EnvFilter;

pub use ast::{AstBuilder, Program};

/// Install a test-friendly subscriber honoring `RUST_LOG`; safe to call from every test
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .unwrap_or(());
}

/// Options for an ES2015 script
pub fn es6() -> AnalyzeOptions {
    AnalyzeOptions {
        ecma_version: Some(6),
        ..AnalyzeOptions::default()
    }
}

/// Bind `program` with `options`
pub fn bind(program: &Program, options: AnalyzeOptions) -> ScopeManager {
    init_tracing();
    analyze(program, options)
}

/// Names of a scope's variables in declaration order
pub fn variable_names(manager: &ScopeManager, scope: ScopeId) -> Vec<&str> {
    manager
        .scope(scope)
        .variables
        .values()
        .map(|id| manager.variable_name(*id))
        .collect()
}

/// Names of the identifiers of a list of references
pub fn reference_names<'a>(manager: &'a ScopeManager, references: &[ReferenceId]) -> Vec<&'a str> {
    references
        .iter()
        .map(|id| manager.name(manager.reference(*id).identifier.name))
        .collect()
}

/// The variable named `name` declared directly in `scope`
pub fn variable(manager: &ScopeManager, scope: ScopeId, name: &str) -> Option<VariableId> {
    let symbol = manager.interner().get(name)?;
    manager.scope(scope).variable(symbol)
}
