//! Binder for the test syntax tree
//!
//! Walks a [`Program`] depth-first and reports to a [`ScopeManager`] in the order a
//! JavaScript referencer does: a declarator defines its names, then writes them from its
//! initializer, then visits the initializer.

use crate::ast::{Declaration, Expr, Function, Name, Program, Stmt, TypeExpr};
use lx_scope::{
    Bind, Definition, DefinitionKind, ReferenceSite, ScopeId, ScopeManager, VariableKind,
};
use lx_syntax::{Identifier, NodeId};

impl Bind for Program {
    fn bind(&self, manager: &mut ScopeManager) {
        Binder { manager }.program(self);
    }
}

struct Binder<'m> {
    manager: &'m mut ScopeManager,
}

impl Binder<'_> {
    fn ident(&self, name: &Name) -> Identifier {
        self.manager.identifier(name.node, &name.text)
    }

    fn define(&mut self, scope: ScopeId, kind: DefinitionKind, name: &Name, node: NodeId) {
        let definition = Definition::new(kind, self.ident(name), node);
        self.manager.declare(scope, definition);
    }

    fn program(&mut self, program: &Program) {
        let global = self.manager.nest_global_scope(program.node);
        let mut scopes = vec![global];

        if self.manager.is_global_return() {
            let wrapper = self.manager.nest_function_scope(program.node, false);
            if self.manager.is_strict() {
                self.manager.mark_strict(wrapper);
            }
            scopes.push(wrapper);
        }
        if self.manager.is_module() {
            scopes.push(self.manager.nest_module_scope(program.node));
        }

        let body_scope = scopes[scopes.len() - 1];
        self.directives(body_scope, &program.body);
        self.statements(body_scope, &program.body);

        for scope in scopes.into_iter().rev() {
            self.manager.close(scope);
        }
    }

    fn directives(&mut self, scope: ScopeId, body: &[Stmt]) {
        if matches!(body.first(), Some(Stmt::UseStrict(_))) {
            self.manager.mark_strict(scope);
        }
    }

    fn statements(&mut self, scope: ScopeId, body: &[Stmt]) {
        for stmt in body {
            self.statement(scope, stmt);
        }
    }

    /// Statements of a `{ }` body; ES5 has no block scopes
    fn block(&mut self, scope: ScopeId, node: NodeId, body: &[Stmt]) {
        if self.manager.is_es6() {
            let block = self.manager.nest_block_scope(node);
            self.statements(block, body);
            self.manager.close(block);
        } else {
            self.statements(scope, body);
        }
    }

    fn statement(&mut self, scope: ScopeId, stmt: &Stmt) {
        match stmt {
            Stmt::Declaration(declaration) => self.declaration(scope, declaration),
            Stmt::Expr(expr) => self.expr(scope, expr),
            Stmt::Block { node, body } => self.block(scope, *node, body),
            Stmt::Function(function) => {
                if let Some(name) = &function.name {
                    let ident = self.ident(name);
                    let mut definition =
                        Definition::new(DefinitionKind::FunctionName, ident, function.node);
                    if !self.manager.is_es6() {
                        definition = definition.hoist();
                    }
                    self.manager.declare(scope, definition);
                }
                self.function(function);
            }
            Stmt::Class {
                node,
                name,
                methods,
            } => {
                self.define(scope, DefinitionKind::ClassName, name, *node);
                let class = self.manager.nest_class_scope(*node);
                self.define(class, DefinitionKind::ClassName, name, *node);
                for method in methods {
                    self.function(method);
                }
                self.manager.close(class);
            }
            Stmt::With { node, object, body } => {
                self.expr(scope, object);
                let with = self.manager.nest_with_scope(*node);
                self.statement(with, body);
                self.manager.close(with);
            }
            Stmt::Try {
                block_node,
                block,
                handler,
                ..
            } => {
                self.block(scope, *block_node, block);
                if let Some(handler) = handler {
                    let catch = self.manager.nest_catch_scope(handler.node);
                    self.define(catch, DefinitionKind::CatchClause, &handler.param, handler.node);
                    self.block(catch, handler.body_node, &handler.body);
                    self.manager.close(catch);
                }
            }
            Stmt::ForIn {
                node,
                left,
                right,
                body,
            } => {
                let for_scope = self.lexical_head(scope, *node, left.kind);
                self.declaration(for_scope, left);
                for declarator in &left.declarators {
                    for name in declarator.target.names() {
                        let site = ReferenceSite::write(self.ident(name), Some(right.node()));
                        self.manager.create_reference(for_scope, site);
                    }
                }
                self.expr(for_scope, right);
                self.statement(for_scope, body);
                if for_scope != scope {
                    self.manager.close(for_scope);
                }
            }
            Stmt::For {
                node,
                init,
                test,
                update,
                body,
            } => {
                let for_scope = match init {
                    Some(init) => self.lexical_head(scope, *node, init.kind),
                    None => scope,
                };
                if let Some(init) = init {
                    self.declaration(for_scope, init);
                }
                for expr in test.iter().chain(update) {
                    self.expr(for_scope, expr);
                }
                self.statement(for_scope, body);
                if for_scope != scope {
                    self.manager.close(for_scope);
                }
            }
            Stmt::TypeAlias {
                node,
                name,
                params,
                ty,
            } => {
                self.define(scope, DefinitionKind::Type, name, *node);
                if params.is_empty() {
                    self.type_expr(scope, ty);
                } else {
                    let generic = self.manager.nest_type_scope(*node);
                    for param in params {
                        self.define(generic, DefinitionKind::TypeParameter, param, *node);
                    }
                    self.type_expr(generic, ty);
                    self.manager.close(generic);
                }
            }
            Stmt::Enum {
                node,
                name,
                members,
            } => {
                self.define(scope, DefinitionKind::TsEnumName, name, *node);
                let body = self.manager.nest_ts_enum_scope(*node);
                for member in members {
                    self.define(body, DefinitionKind::TsEnumMember, member, member.node);
                }
                self.manager.close(body);
            }
            Stmt::Namespace { node, name, body } => {
                self.define(scope, DefinitionKind::TsModuleName, name, *node);
                let module = self.manager.nest_ts_module_scope(*node);
                self.statements(module, body);
                self.manager.close(module);
            }
            Stmt::Import {
                node,
                names,
                type_only,
            } => {
                for name in names {
                    let mut definition =
                        Definition::new(DefinitionKind::ImportBinding, self.ident(name), *node);
                    if *type_only {
                        definition = definition.type_only();
                    }
                    self.manager.declare(scope, definition);
                }
            }
            Stmt::UseStrict(_) => {}
        }
    }

    /// Open a for scope for `let`/`const` loop heads
    fn lexical_head(&mut self, scope: ScopeId, node: NodeId, kind: VariableKind) -> ScopeId {
        if kind == VariableKind::Var || !self.manager.is_es6() {
            scope
        } else {
            self.manager.nest_for_scope(node)
        }
    }

    fn declaration(&mut self, scope: ScopeId, declaration: &Declaration) {
        let kind = DefinitionKind::Variable(declaration.kind);
        for declarator in &declaration.declarators {
            let names = declarator.target.names();
            for name in &names {
                let definition = Definition::new(kind, self.ident(name), declarator.node)
                    .with_parent(declaration.node);
                self.manager.declare(scope, definition);
            }
            if let Some(annotation) = &declarator.annotation {
                self.type_expr(scope, annotation);
            }
            if let Some(init) = &declarator.init {
                for name in &names {
                    let site =
                        ReferenceSite::write(self.ident(name), Some(init.node())).initializer();
                    self.manager.create_reference(scope, site);
                }
                self.expr(scope, init);
            }
        }
    }

    fn function(&mut self, function: &Function) {
        let scope = if function.is_arrow {
            self.manager.nest_arrow_function_scope(function.node)
        } else {
            self.manager.nest_function_scope(function.node, function.is_method)
        };
        self.directives(scope, &function.body);
        for param in &function.params {
            self.define(scope, DefinitionKind::Parameter, param, function.node);
        }
        self.statements(scope, &function.body);
        self.manager.close(scope);
    }

    fn expr(&mut self, scope: ScopeId, expr: &Expr) {
        match expr {
            Expr::Name(name) => {
                let site = ReferenceSite::read(self.ident(name));
                self.manager.create_reference(scope, site);
            }
            Expr::Number(_) | Expr::Object(_) => {}
            Expr::Assign {
                target,
                value,
                compound,
                ..
            } => {
                let ident = self.ident(target);
                let site = if *compound {
                    ReferenceSite::read_write(ident, Some(value.node()))
                } else {
                    ReferenceSite::write(ident, Some(value.node()))
                };
                self.manager.create_reference(scope, site);
                self.expr(scope, value);
            }
            Expr::Update { target, .. } => {
                let site = ReferenceSite::read_write(self.ident(target), None);
                self.manager.create_reference(scope, site);
            }
            Expr::Member { object, .. } => self.expr(scope, object),
            Expr::Call { callee, args, .. } => {
                self.expr(scope, callee);
                for arg in args {
                    self.expr(scope, arg);
                }
            }
            Expr::Binary { left, right, .. } => {
                self.expr(scope, left);
                self.expr(scope, right);
            }
            Expr::Function(function) => match &function.name {
                Some(name) => {
                    let name_scope = self.manager.nest_function_expression_name_scope(function.node);
                    self.define(name_scope, DefinitionKind::FunctionName, name, function.node);
                    self.function(function);
                    self.manager.close(name_scope);
                }
                None => self.function(function),
            },
        }
    }

    fn type_expr(&mut self, scope: ScopeId, ty: &TypeExpr) {
        match ty {
            TypeExpr::Ref(name) => {
                let site = ReferenceSite::type_reference(self.ident(name));
                self.manager.create_reference(scope, site);
            }
            TypeExpr::Keyword(_) => {}
        }
    }
}
