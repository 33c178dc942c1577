//! Scopes created by `for` and `for-in` loops with lexical heads

use lx_scope::{DefinitionKind, ReferenceFlag, Scope, ScopeKind, ScopeManager, VariableKind};
use scope_integration_tests::ast::Stmt;
use scope_integration_tests::{AstBuilder, bind, es6, reference_names, variable, variable_names};

fn scopes(manager: &ScopeManager) -> Vec<&Scope> {
    manager.scopes().collect()
}

/// `(function () { let i = 20; for (let i in i) { console.log(i); } }());`
#[test]
fn test_for_in_let_creates_iteration_scope() {
    let b = AstBuilder::new();
    let outer = b.stmt_decl(VariableKind::Let, "i", Some(b.number()));
    let body = b.block(vec![Stmt::Expr(b.log(vec![b.ident("i")]))]);
    let for_in = b.for_in(b.decl(VariableKind::Let, "i", None), b.ident("i"), body);
    let function = b.function(None, &[], vec![outer, for_in]);
    let function_node = function.node;
    let call = b.call(b.function_expr(function), Vec::new());
    let program = b.program(vec![Stmt::Expr(call)]);

    let manager = bind(&program, es6());
    let all = scopes(&manager);
    assert_eq!(all.len(), 4);

    let global = all[0];
    assert_eq!(global.kind, ScopeKind::Global);
    assert!(global.variables.is_empty());
    assert!(global.references.is_empty());
    assert_eq!(reference_names(&manager, global.through()), vec!["console"]);

    let function_scope = all[1];
    assert_eq!(function_scope.kind, ScopeKind::Function);
    assert_eq!(manager.acquire(function_node, false), Some(function_scope.id));
    assert_eq!(variable_names(&manager, function_scope.id), vec!["arguments", "i"]);
    let outer_i = variable(&manager, function_scope.id, "i").unwrap();
    assert_eq!(function_scope.references.len(), 1);
    let init = manager.reference(function_scope.references[0]);
    assert_eq!(manager.name(init.identifier.name), "i");
    assert_eq!(init.resolved, Some(outer_i));
    assert!(init.is_write_only());
    assert!(init.init);

    let iteration = all[2];
    assert_eq!(iteration.kind, ScopeKind::For);
    assert_eq!(variable_names(&manager, iteration.id), vec!["i"]);
    let loop_i = variable(&manager, iteration.id, "i").unwrap();
    assert_eq!(iteration.references.len(), 2);
    let flags: Vec<ReferenceFlag> = iteration
        .references
        .iter()
        .map(|id| manager.reference(*id).flag)
        .collect();
    assert_eq!(flags, vec![ReferenceFlag::Write, ReferenceFlag::Read]);
    for id in &iteration.references {
        assert_eq!(manager.name(manager.reference(*id).identifier.name), "i");
        assert_eq!(manager.reference(*id).resolved, Some(loop_i));
    }

    let block = all[3];
    assert_eq!(block.kind, ScopeKind::Block);
    assert!(block.variables.is_empty());
    assert_eq!(reference_names(&manager, &block.references), vec!["console", "i"]);
    assert_eq!(manager.reference(block.references[0]).resolved, None);
    assert_eq!(manager.reference(block.references[1]).resolved, Some(loop_i));
}

/// `(function () { let i = 20; for (let { i, j, k } in i) { console.log(i); } }());`
#[test]
fn test_for_in_destructuring_declares_every_name() {
    let b = AstBuilder::new();
    let outer = b.stmt_decl(VariableKind::Let, "i", Some(b.number()));
    let pattern = b.object_pattern(&["i", "j", "k"]);
    let left = b.declaration(VariableKind::Let, vec![b.declarator(pattern, None)]);
    let body = b.block(vec![Stmt::Expr(b.log(vec![b.ident("i")]))]);
    let for_in = b.for_in(left, b.ident("i"), body);
    let function = b.function(None, &[], vec![outer, for_in]);
    let call = b.call(b.function_expr(function), Vec::new());
    let program = b.program(vec![Stmt::Expr(call)]);

    let manager = bind(&program, es6());
    let all = scopes(&manager);
    assert_eq!(all.len(), 4);

    let function_scope = all[1];
    assert_eq!(variable_names(&manager, function_scope.id), vec!["arguments", "i"]);
    assert_eq!(reference_names(&manager, &function_scope.references), vec!["i"]);

    let iteration = all[2];
    assert_eq!(iteration.kind, ScopeKind::For);
    assert_eq!(variable_names(&manager, iteration.id), vec!["i", "j", "k"]);
    assert_eq!(
        reference_names(&manager, &iteration.references),
        vec!["i", "j", "k", "i"]
    );
    let expected = ["i", "j", "k", "i"].map(|name| variable(&manager, iteration.id, name));
    let resolved: Vec<_> = iteration
        .references
        .iter()
        .map(|id| manager.reference(*id).resolved)
        .collect();
    assert_eq!(resolved, expected);

    let block = all[3];
    assert!(block.variables.is_empty());
    assert_eq!(reference_names(&manager, &block.references), vec!["console", "i"]);
    assert_eq!(manager.reference(block.references[0]).resolved, None);
    assert_eq!(
        manager.reference(block.references[1]).resolved,
        variable(&manager, iteration.id, "i")
    );
}

/// ```js
/// (function () {
///   let i = 20;
///   let obj = {};
///   for (let { i, j, k } = obj; i < okok; ++i) {
///     console.log(i, j, k);
///   }
/// }());
/// ```
#[test]
fn test_for_let_initializer_resolves_outside_names() {
    let b = AstBuilder::new();
    let first = b.stmt_decl(VariableKind::Let, "i", Some(b.number()));
    let second = b.stmt_decl(VariableKind::Let, "obj", Some(b.object()));
    let pattern = b.object_pattern(&["i", "j", "k"]);
    let head = b.declaration(
        VariableKind::Let,
        vec![b.declarator(pattern, Some(b.ident("obj")))],
    );
    let test = b.binary(b.ident("i"), b.ident("okok"));
    let update = b.update("i");
    let body = b.block(vec![Stmt::Expr(
        b.log(vec![b.ident("i"), b.ident("j"), b.ident("k")]),
    )]);
    let for_loop = b.for_loop(Some(head), Some(test), Some(update), body);
    let function = b.function(None, &[], vec![first, second, for_loop]);
    let call = b.call(b.function_expr(function), Vec::new());
    let program = b.program(vec![Stmt::Expr(call)]);

    let manager = bind(&program, es6());
    let all = scopes(&manager);
    assert_eq!(all.len(), 4);

    let global = all[0];
    assert!(global.variables.is_empty());
    assert_eq!(
        reference_names(&manager, global.through()),
        vec!["okok", "console"]
    );

    let function_scope = all[1];
    assert_eq!(
        variable_names(&manager, function_scope.id),
        vec!["arguments", "i", "obj"]
    );
    let obj = variable(&manager, function_scope.id, "obj").unwrap();
    assert_eq!(
        reference_names(&manager, &function_scope.references),
        vec!["i", "obj"]
    );
    for id in &function_scope.references {
        assert!(manager.reference(*id).is_write_only());
    }

    let iteration = all[2];
    assert_eq!(iteration.kind, ScopeKind::For);
    assert_eq!(variable_names(&manager, iteration.id), vec!["i", "j", "k"]);
    let [i, j, k] = ["i", "j", "k"].map(|name| variable(&manager, iteration.id, name).unwrap());
    for name in ["i", "j", "k"] {
        let id = variable(&manager, iteration.id, name).unwrap();
        let kinds: Vec<_> = manager.variable(id).defs.iter().map(|def| def.kind).collect();
        assert_eq!(kinds, vec![DefinitionKind::Variable(VariableKind::Let)]);
    }

    let references: Vec<_> = iteration
        .references
        .iter()
        .map(|id| manager.reference(*id))
        .collect();
    assert_eq!(references.len(), 7);
    assert_eq!(
        reference_names(&manager, &iteration.references),
        vec!["i", "j", "k", "obj", "i", "okok", "i"]
    );
    let resolved: Vec<_> = references.iter().map(|reference| reference.resolved).collect();
    assert_eq!(
        resolved,
        vec![Some(i), Some(j), Some(k), Some(obj), Some(i), None, Some(i)]
    );
    assert!(references[..3].iter().all(|reference| reference.is_write_only()));
    assert!(references[3].is_read_only());
    assert!(references[4].is_read_only());
    assert!(references[6].is_read_write());

    let block = all[3];
    assert!(block.variables.is_empty());
    assert_eq!(
        reference_names(&manager, &block.references),
        vec!["console", "i", "j", "k"]
    );
    let resolved: Vec<_> = block
        .references
        .iter()
        .map(|id| manager.reference(*id).resolved)
        .collect();
    assert_eq!(resolved, vec![None, Some(i), Some(j), Some(k)]);
}

/// `for (var i in obj) {}` keeps the loop variable in the function
#[test]
fn test_for_in_var_has_no_iteration_scope() {
    let b = AstBuilder::new();
    let for_in = b.for_in(
        b.decl(VariableKind::Var, "key", None),
        b.ident("source"),
        b.block(Vec::new()),
    );
    let function = b.function(Some("copy"), &["source"], vec![for_in]);
    let program = b.program(vec![Stmt::Function(function)]);

    let manager = bind(&program, es6());
    let kinds: Vec<_> = manager.scopes().map(|scope| scope.kind).collect();
    assert_eq!(
        kinds,
        vec![ScopeKind::Global, ScopeKind::Function, ScopeKind::Block]
    );
    let function_scope = manager.scopes().nth(1).unwrap().id;
    assert_eq!(
        variable_names(&manager, function_scope),
        vec!["arguments", "source", "key"]
    );
}
