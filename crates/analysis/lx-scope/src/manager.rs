//! The scope manager
//!
//! A binder walks the syntax tree depth-first and drives the manager:
//! - `nest_*_scope` when it enters a scope-creating node
//! - `declare` and `create_reference` while a scope is open
//! - `close` when it leaves the node, which resolves what it can and hands the rest upward
//!
//! Once the walk is over the manager is a read-only snapshot.

use crate::dump::Dump;
use crate::error::ProtocolError;
use crate::namespace::{Namespace, Namespaces};
use crate::options::AnalyzeOptions;
use crate::reference::{Reference, ReferenceId, ReferenceSite};
use crate::resolve;
use crate::scope::{Scope, ScopeId, ScopeKind};
use crate::variable::{Definition, Variable, VariableId};
use la_arena::{Arena, Idx, RawIdx};
use lx_intern::{Interner, Symbol};
use lx_syntax::{Identifier, NodeId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::iter;
use tracing::{debug, trace};

const ARGUMENTS: &str = "arguments";

/// Raw index of an arena id, for messages and dumps
pub(crate) fn raw<T>(id: Idx<T>) -> u32 {
    u32::from(id.into_raw())
}

/// Builds and owns the scope tree for one program
#[derive(Debug)]
pub struct ScopeManager {
    pub(crate) scopes: Arena<Scope>,
    pub(crate) variables: Arena<Variable>,
    pub(crate) references: Arena<Reference>,
    global_scope: Option<ScopeId>,
    /// Most nodes anchor one scope; named function expressions anchor two
    node_to_scope: FxHashMap<NodeId, SmallVec<[ScopeId; 2]>>,
    declared_variables: FxHashMap<NodeId, Vec<VariableId>>,
    /// Open scopes, innermost last
    scope_stack: Vec<ScopeId>,
    options: AnalyzeOptions,
    interner: Interner,
}

impl ScopeManager {
    /// Create an empty manager with its own interner
    #[must_use]
    pub fn new(options: AnalyzeOptions) -> Self {
        Self::with_interner(options, Interner::new())
    }

    /// Create an empty manager sharing the binder's interner
    #[must_use]
    pub fn with_interner(options: AnalyzeOptions, interner: Interner) -> Self {
        Self {
            scopes: Arena::new(),
            variables: Arena::new(),
            references: Arena::new(),
            global_scope: None,
            node_to_scope: FxHashMap::default(),
            declared_variables: FxHashMap::default(),
            scope_stack: Vec::new(),
            options,
            interner,
        }
    }

    // ----- options -----

    /// Options the manager was created with
    pub fn options(&self) -> &AnalyzeOptions {
        &self.options
    }

    /// The program body runs inside a function (CommonJS wrapper)
    pub fn is_global_return(&self) -> bool {
        self.options.is_global_return()
    }

    /// The program is an ES module
    pub fn is_module(&self) -> bool {
        self.options.is_module()
    }

    /// Implied strict mode is on and the ECMAScript version supports it
    pub fn is_strict(&self) -> bool {
        self.options.is_strict()
    }

    /// ECMAScript 2015 or later
    pub fn is_es6(&self) -> bool {
        self.options.is_es6()
    }

    // ----- names -----

    /// Interner shared by every name in the tree
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Intern `name`
    pub fn intern(&self, name: &str) -> Symbol {
        self.interner.intern(name)
    }

    /// Text of an interned name
    pub fn name(&self, name: Symbol) -> &str {
        self.interner.resolve(&name)
    }

    /// Build an identifier for `node`, interning `name`
    pub fn identifier(&self, node: NodeId, name: &str) -> Identifier {
        Identifier::new(node, self.intern(name))
    }

    // ----- nesting -----

    /// Innermost open scope
    pub fn current_scope(&self) -> Option<ScopeId> {
        self.scope_stack.last().copied()
    }

    /// Open the global scope; must be the first scope and is created once
    pub fn nest_global_scope(&mut self, block: NodeId) -> ScopeId {
        assert!(
            self.global_scope.is_none(),
            "{}",
            ProtocolError::DuplicateGlobalScope
        );
        let global = self.nest(ScopeKind::Global, block, false);
        self.global_scope = Some(global);

        let ambient: Vec<(Symbol, Namespaces)> = self
            .options
            .lib
            .iter()
            .map(|lib| (self.interner.intern(&lib.name), lib.kind.namespaces()))
            .collect();
        for (name, namespaces) in ambient {
            self.define_implicit(global, name, namespaces);
        }
        global
    }

    /// Open the module scope below the global scope
    pub fn nest_module_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::Module, block, false)
    }

    /// Open a non-arrow function scope, which declares `arguments`
    pub fn nest_function_scope(&mut self, block: NodeId, is_method_definition: bool) -> ScopeId {
        let scope = self.open(ScopeKind::Function, block, is_method_definition);
        let arguments = self.interner.intern(ARGUMENTS);
        self.define_implicit(scope, arguments, Namespaces::VALUE);
        scope
    }

    /// Open an arrow function scope; arrows see the enclosing `arguments`
    pub fn nest_arrow_function_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::Function, block, false)
    }

    /// Open the scope holding a named function expression's own name
    pub fn nest_function_expression_name_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::FunctionExpressionName, block, false)
    }

    /// Open a `{ }` block scope
    pub fn nest_block_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::Block, block, false)
    }

    /// Open the scope of a `for` head declaring `let`/`const`
    pub fn nest_for_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::For, block, false)
    }

    /// Open a `catch` clause scope
    pub fn nest_catch_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::Catch, block, false)
    }

    /// Open a `switch` body scope
    pub fn nest_switch_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::Switch, block, false)
    }

    /// Open a class scope; always strict
    pub fn nest_class_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::Class, block, false)
    }

    /// Open a `with` body scope; references through it may bind to object properties
    pub fn nest_with_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::With, block, false)
    }

    /// Open the type parameter scope of a generic declaration
    pub fn nest_type_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::Type, block, false)
    }

    /// Open the scope of a conditional type, which holds its `infer` parameters
    pub fn nest_conditional_type_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::ConditionalType, block, false)
    }

    /// Open the scope of a mapped type, which holds its key parameter
    pub fn nest_mapped_type_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::MappedType, block, false)
    }

    /// Open the scope of a function or constructor type signature
    pub fn nest_function_type_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::FunctionType, block, false)
    }

    /// Open an `enum` body scope
    pub fn nest_ts_enum_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::TsEnum, block, false)
    }

    /// Open a `namespace`/`module` body scope
    pub fn nest_ts_module_scope(&mut self, block: NodeId) -> ScopeId {
        self.open(ScopeKind::TsModule, block, false)
    }

    /// Record a `"use strict"` directive for an open scope
    ///
    /// Call before registering the scope's references: strictness decides whether
    /// an undeclared write may create an implicit global.
    pub fn mark_strict(&mut self, scope: ScopeId) {
        self.assert_open(scope, "mark strict mode");
        self.scopes[scope].is_strict = true;
    }

    /// Close the innermost open scope, resolving its pending references
    ///
    /// Returns the scope that becomes current.
    pub fn close(&mut self, scope: ScopeId) -> Option<ScopeId> {
        let current = self.current_scope();
        assert!(
            current == Some(scope),
            "{}",
            ProtocolError::CloseOutOfOrder {
                scope: raw(scope),
                current: current.map_or_else(|| "none".to_owned(), |id| format!("#{}", raw(id))),
            }
        );

        resolve::close_scope(self, scope);
        self.scope_stack.pop();

        let data = &self.scopes[scope];
        debug!(
            scope = raw(scope),
            kind = %data.kind,
            through = data.through.len(),
            "closed scope"
        );
        data.upper
    }

    /// Whether the walk has finished: a global scope exists and nothing is open
    pub fn is_finished(&self) -> bool {
        self.global_scope.is_some() && self.scope_stack.is_empty()
    }

    /// Number of scopes currently open
    pub fn open_scope_count(&self) -> usize {
        self.scope_stack.len()
    }

    fn open(&mut self, kind: ScopeKind, block: NodeId, is_method_definition: bool) -> ScopeId {
        assert!(
            !self.scope_stack.is_empty(),
            "{}",
            ProtocolError::NoOpenScope { kind }
        );
        self.nest(kind, block, is_method_definition)
    }

    fn nest(&mut self, kind: ScopeKind, block: NodeId, is_method_definition: bool) -> ScopeId {
        let upper = self.current_scope();
        let id = Idx::from_raw(RawIdx::from(self.scopes.len() as u32));

        let (is_strict, variable_scope) = match upper {
            None => (self.is_strict() && !self.is_global_return(), id),
            Some(upper) => {
                let parent = &self.scopes[upper];
                let is_strict =
                    parent.is_strict || is_method_definition || kind.is_strict_by_default();
                let variable_scope = if kind.is_variable_scope() {
                    id
                } else {
                    parent.variable_scope
                };
                (is_strict, variable_scope)
            }
        };

        let scope = self.scopes.alloc(Scope::new(
            id,
            kind,
            block,
            upper,
            is_strict,
            variable_scope,
        ));
        if let Some(upper) = upper {
            self.scopes[upper].child_scopes.push(scope);
        }
        self.node_to_scope.entry(block).or_default().push(scope);
        self.scope_stack.push(scope);

        debug!(scope = raw(scope), %kind, %block, is_strict, "nested scope");
        scope
    }

    // ----- declarations and references -----

    /// Declare a binding
    ///
    /// Hoisted definitions land in the nearest variable scope of `scope`; everything else
    /// lands in `scope` itself. A name already declared in the target scope gains another
    /// definition instead of a second variable.
    pub fn declare(&mut self, scope: ScopeId, definition: Definition) -> VariableId {
        self.assert_open(scope, "declare");
        let target = if definition.hoisted {
            self.scopes[scope].variable_scope
        } else {
            scope
        };
        let node = definition.node;
        let parent = definition.parent;

        let variable = self.define(target, definition);
        self.index_declared(node, variable);
        if let Some(parent) = parent {
            self.index_declared(parent, variable);
        }

        trace!(
            scope = raw(target),
            name = self.name(self.variables[variable].name),
            variable = raw(variable),
            "declared"
        );
        variable
    }

    /// Register an identifier use in an open scope
    pub fn create_reference(&mut self, scope: ScopeId, site: ReferenceSite) -> ReferenceId {
        self.assert_open(scope, "create a reference");
        let is_strict = self.scopes[scope].is_strict;
        let reference = self.references.alloc(Reference::new(site, scope, is_strict));

        let data = &mut self.scopes[scope];
        data.references.push(reference);
        data.left_to_resolve.push(reference);
        reference
    }

    /// Add a definition to the variable named by it in `scope`, creating the variable if needed
    pub(crate) fn define(&mut self, scope: ScopeId, definition: Definition) -> VariableId {
        let name = definition.name.name;
        let variable = match self.scopes[scope].variable(name) {
            Some(existing) => existing,
            None => self.alloc_variable(scope, name, Namespaces::empty()),
        };
        self.variables[variable].push_definition(definition);
        variable
    }

    /// Declare a variable with no definition site (`arguments`, ambient globals)
    fn define_implicit(&mut self, scope: ScopeId, name: Symbol, namespaces: Namespaces) -> VariableId {
        match self.scopes[scope].variable(name) {
            Some(existing) => {
                self.variables[existing].namespaces |= namespaces;
                existing
            }
            None => self.alloc_variable(scope, name, namespaces),
        }
    }

    fn alloc_variable(&mut self, scope: ScopeId, name: Symbol, namespaces: Namespaces) -> VariableId {
        let id = Idx::from_raw(RawIdx::from(self.variables.len() as u32));
        let variable = self.variables.alloc(Variable::new(id, name, scope, namespaces));
        self.scopes[scope].variables.insert(name, variable);
        variable
    }

    fn index_declared(&mut self, node: NodeId, variable: VariableId) {
        let declared = self.declared_variables.entry(node).or_default();
        if !declared.contains(&variable) {
            declared.push(variable);
        }
    }

    fn assert_open(&self, scope: ScopeId, operation: &'static str) {
        assert!(
            self.scope_stack.contains(&scope),
            "{}",
            ProtocolError::ScopeNotOpen {
                scope: raw(scope),
                operation,
            }
        );
    }

    // ----- queries -----

    /// The global scope, once nested
    pub fn global_scope(&self) -> Option<ScopeId> {
        self.global_scope
    }

    /// All scopes in creation order; the first is the global scope
    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter().map(|(_, scope)| scope)
    }

    /// Number of scopes created so far
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Scope by id
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    /// Variable by id
    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id]
    }

    /// Reference by id
    pub fn reference(&self, id: ReferenceId) -> &Reference {
        &self.references[id]
    }

    /// Text of a variable's name
    pub fn variable_name(&self, id: VariableId) -> &str {
        self.name(self.variables[id].name)
    }

    /// The scope to present for `node`
    ///
    /// When a node anchors several scopes, function-expression-name scopes are skipped and
    /// the outermost remaining scope is returned, or the innermost one if `inner` is set.
    pub fn acquire(&self, node: NodeId, inner: bool) -> Option<ScopeId> {
        let scopes = self.acquire_all(node);
        if let [only] = scopes {
            return Some(*only);
        }

        let visible = |id: &&ScopeId| !self.scopes[**id].is_function_expression_scope();
        if inner {
            scopes.iter().rev().find(visible).copied()
        } else {
            scopes.iter().find(visible).copied()
        }
    }

    /// Every scope anchored at `node`, outermost first
    pub fn acquire_all(&self, node: NodeId) -> &[ScopeId] {
        match self.node_to_scope.get(&node) {
            Some(scopes) => scopes.as_slice(),
            None => &[],
        }
    }

    /// Variables whose definitions anchor at `node` (as declaring or parent node)
    pub fn declared_variables(&self, node: NodeId) -> &[VariableId] {
        match self.declared_variables.get(&node) {
            Some(variables) => variables.as_slice(),
            None => &[],
        }
    }

    /// Every variable in the tree, ordered by creation
    pub fn variables(&self) -> Vec<VariableId> {
        let mut all: Vec<VariableId> = self
            .scopes
            .iter()
            .flat_map(|(_, scope)| scope.variables.values().copied())
            .collect();
        all.sort_unstable_by_key(|id| raw(*id));
        all.dedup();
        all
    }

    /// `scope` followed by each of its ancestors up to the global scope
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        iter::successors(Some(scope), move |id| self.scopes[*id].upper)
    }

    /// Static lookup of `name` from `scope` outward, as a refactoring tool would do it
    pub fn lookup(&self, scope: ScopeId, name: &str, namespace: Namespace) -> Option<VariableId> {
        let name = self.interner.get(name)?;
        self.ancestors(scope).find_map(|id| {
            self.scopes[id]
                .variable(name)
                .filter(|variable| self.variables[*variable].admits(namespace))
        })
    }

    /// Displayable rendering of the whole tree
    pub fn display(&self) -> Dump<'_> {
        Dump::new(self)
    }

    /// Render the whole tree as text
    pub fn dump(&self) -> String {
        self.display().to_string()
    }
}
