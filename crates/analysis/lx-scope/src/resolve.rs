//! Reference resolution
//!
//! Resolution is lazy: a reference waits in its scope until that scope closes. On close
//! each pending reference either binds to a variable declared directly in the closing
//! scope, or passes through to the parent's pending list. The global scope is last to
//! close; whatever is still pending there stays unresolved.

use crate::manager::{ScopeManager, raw};
use crate::reference::ReferenceId;
use crate::scope::{ScopeId, ScopeKind};
use crate::variable::{Definition, DefinitionKind};
use std::mem;
use tracing::{debug, trace};

/// Resolve the pending references of `scope`, which is being closed
pub(crate) fn close_scope(manager: &mut ScopeManager, scope: ScopeId) {
    let pending = mem::take(&mut manager.scopes[scope].left_to_resolve);
    let kind = manager.scopes[scope].kind;
    let upper = manager.scopes[scope].upper;

    if upper.is_none() {
        materialize_implicit_globals(manager, scope, &pending);
    }

    for reference in pending {
        if kind == ScopeKind::With {
            manager.references[reference].tainted = true;
        }
        if resolve_in(manager, scope, reference) {
            continue;
        }

        manager.scopes[scope].through.push(reference);
        match upper {
            Some(upper) => {
                manager.scopes[upper].left_to_resolve.push(reference);
                trace!(
                    name = manager.name(manager.references[reference].identifier.name),
                    from = raw(scope),
                    to = raw(upper),
                    "propagated reference"
                );
            }
            None => trace!(
                name = manager.name(manager.references[reference].identifier.name),
                "unresolved reference"
            ),
        }
    }

    manager.scopes[scope].closed = true;
}

/// Bind `reference` to a variable declared directly in `scope`, if one admits it
fn resolve_in(manager: &mut ScopeManager, scope: ScopeId, reference: ReferenceId) -> bool {
    let data = &manager.references[reference];
    let (name, namespace, tainted) = (data.identifier.name, data.namespace, data.tainted);

    let Some(variable) = manager.scopes[scope].variable(name) else {
        return false;
    };
    let target = &mut manager.variables[variable];
    if !target.admits(namespace) {
        return false;
    }

    target.references.push(reference);
    if tainted {
        target.tainted = true;
    }
    manager.references[reference].resolved = Some(variable);

    trace!(
        name = manager.name(name),
        scope = raw(scope),
        variable = raw(variable),
        "resolved reference"
    );
    true
}

/// Turn sloppy writes to undeclared names into global variables
///
/// Runs before the global scope resolves its pending list, so the writes, and any read of
/// the same name, bind to the new variable.
fn materialize_implicit_globals(
    manager: &mut ScopeManager,
    global: ScopeId,
    pending: &[ReferenceId],
) {
    for &reference in pending {
        let data = &manager.references[reference];
        if !data.maybe_implicit_global {
            continue;
        }
        let identifier = data.identifier;
        let node = data.write_expr.unwrap_or(identifier.node);

        let declared = manager.scopes[global]
            .variable(identifier.name)
            .is_some_and(|variable| manager.variables[variable].is_value_variable());
        if declared {
            continue;
        }

        let variable = manager.define(
            global,
            Definition::new(DefinitionKind::ImplicitGlobal, identifier, node),
        );
        let implicit = &mut manager.scopes[global].implicit;
        if !implicit.contains(&variable) {
            implicit.push(variable);
        }
        debug!(
            name = manager.name(identifier.name),
            variable = raw(variable),
            "implicit global"
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::manager::ScopeManager;
    use crate::namespace::Namespace;
    use crate::options::AnalyzeOptions;
    use crate::reference::ReferenceSite;
    use crate::variable::{Definition, DefinitionKind, VariableKind};
    use lx_syntax::NodeIdAllocator;

    fn sloppy() -> AnalyzeOptions {
        AnalyzeOptions {
            ecma_version: Some(6),
            ..AnalyzeOptions::default()
        }
    }

    #[test]
    fn test_resolves_to_nearest_declaration() {
        let mut nodes = NodeIdAllocator::new();
        let mut manager = ScopeManager::new(sloppy());
        let global = manager.nest_global_scope(nodes.alloc());
        let ident = manager.identifier(nodes.alloc(), "x");
        let outer = manager.declare(
            global,
            Definition::new(DefinitionKind::Variable(VariableKind::Let), ident, nodes.alloc()),
        );
        let block = manager.nest_block_scope(nodes.alloc());
        let ident = manager.identifier(nodes.alloc(), "x");
        let inner = manager.declare(
            block,
            Definition::new(DefinitionKind::Variable(VariableKind::Let), ident, nodes.alloc()),
        );
        let ident = manager.identifier(nodes.alloc(), "x");
        let read = manager.create_reference(block, ReferenceSite::read(ident));
        manager.close(block);
        manager.close(global);

        assert_eq!(manager.reference(read).resolved, Some(inner));
        assert!(manager.variable(outer).references.is_empty());
        assert!(manager.scope(block).through.is_empty());
    }

    #[test]
    fn test_unresolved_reads_pass_through_every_scope() {
        let mut nodes = NodeIdAllocator::new();
        let mut manager = ScopeManager::new(sloppy());
        let global = manager.nest_global_scope(nodes.alloc());
        let function = manager.nest_function_scope(nodes.alloc(), false);
        let ident = manager.identifier(nodes.alloc(), "missing");
        let read = manager.create_reference(function, ReferenceSite::read(ident));
        manager.close(function);
        manager.close(global);

        assert_eq!(manager.reference(read).resolved, None);
        assert_eq!(manager.scope(function).through, vec![read]);
        assert_eq!(manager.scope(global).through, vec![read]);
        assert!(manager.scope(global).implicit.is_empty());
    }

    #[test]
    fn test_type_reference_skips_value_binding() {
        let mut nodes = NodeIdAllocator::new();
        let mut manager = ScopeManager::new(sloppy());
        let global = manager.nest_global_scope(nodes.alloc());
        let ident = manager.identifier(nodes.alloc(), "T");
        let type_alias = manager.declare(
            global,
            Definition::new(DefinitionKind::Type, ident, nodes.alloc()),
        );
        let function = manager.nest_function_scope(nodes.alloc(), false);
        let ident = manager.identifier(nodes.alloc(), "T");
        manager.declare(
            function,
            Definition::new(DefinitionKind::Parameter, ident, nodes.alloc()),
        );
        let ident = manager.identifier(nodes.alloc(), "T");
        let type_ref = manager.create_reference(function, ReferenceSite::type_reference(ident));
        manager.close(function);
        manager.close(global);

        assert_eq!(manager.reference(type_ref).resolved, Some(type_alias));
        assert_eq!(manager.scope(function).through, vec![type_ref]);
        assert_eq!(
            manager.lookup(global, "T", Namespace::Type),
            Some(type_alias)
        );
    }

    #[test]
    fn test_sloppy_write_creates_one_implicit_global() {
        let mut nodes = NodeIdAllocator::new();
        let mut manager = ScopeManager::new(sloppy());
        let global = manager.nest_global_scope(nodes.alloc());
        let function = manager.nest_function_scope(nodes.alloc(), false);
        let ident = manager.identifier(nodes.alloc(), "leak");
        let first = manager.create_reference(function, ReferenceSite::write(ident, None));
        let ident = manager.identifier(nodes.alloc(), "leak");
        let second = manager.create_reference(function, ReferenceSite::write(ident, None));
        let ident = manager.identifier(nodes.alloc(), "leak");
        let read = manager.create_reference(global, ReferenceSite::read(ident));
        manager.close(function);
        manager.close(global);

        let implicit = manager.scope(global).implicit.clone();
        assert_eq!(implicit.len(), 1);
        let leak = implicit[0];
        assert_eq!(manager.variable(leak).defs.len(), 1);
        assert_eq!(
            manager.variable(leak).defs[0].kind,
            DefinitionKind::ImplicitGlobal
        );
        for reference in [first, second, read] {
            assert_eq!(manager.reference(reference).resolved, Some(leak));
        }
        assert!(manager.scope(global).through.is_empty());
    }

    #[test]
    fn test_strict_write_stays_unresolved() {
        let mut nodes = NodeIdAllocator::new();
        let mut manager = ScopeManager::new(sloppy());
        let global = manager.nest_global_scope(nodes.alloc());
        let function = manager.nest_function_scope(nodes.alloc(), false);
        manager.mark_strict(function);
        let ident = manager.identifier(nodes.alloc(), "leak");
        let write = manager.create_reference(function, ReferenceSite::write(ident, None));
        manager.close(function);
        manager.close(global);

        assert_eq!(manager.reference(write).resolved, None);
        assert!(manager.scope(global).implicit.is_empty());
        assert_eq!(manager.scope(global).through, vec![write]);
    }

    #[test]
    fn test_with_taints_passing_references() {
        let mut nodes = NodeIdAllocator::new();
        let mut manager = ScopeManager::new(sloppy());
        let global = manager.nest_global_scope(nodes.alloc());
        let ident = manager.identifier(nodes.alloc(), "x");
        let x = manager.declare(
            global,
            Definition::new(DefinitionKind::Variable(VariableKind::Var), ident, nodes.alloc()),
        );
        let with = manager.nest_with_scope(nodes.alloc());
        let block = manager.nest_block_scope(nodes.alloc());
        let ident = manager.identifier(nodes.alloc(), "x");
        let inside = manager.create_reference(block, ReferenceSite::read(ident));
        manager.close(block);
        manager.close(with);
        let ident = manager.identifier(nodes.alloc(), "x");
        let outside = manager.create_reference(global, ReferenceSite::read(ident));
        manager.close(global);

        assert!(manager.reference(inside).is_maybe_bound());
        assert!(!manager.reference(outside).is_maybe_bound());
        assert_eq!(manager.reference(inside).resolved, Some(x));
        assert!(manager.variable(x).tainted);
        assert!(manager.scope(with).is_closed());
    }
}
