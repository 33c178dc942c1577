//! Scope tree nodes

use crate::namespace::Namespace;
use crate::reference::ReferenceId;
use crate::variable::VariableId;
use indexmap::IndexMap;
use la_arena::Idx;
use lx_intern::Symbol;
use lx_syntax::NodeId;
use rustc_hash::FxBuildHasher;
use std::fmt;

/// Unique identifier for a scope; allocation order is scope-open order
pub type ScopeId = Idx<Scope>;

/// Name-indexed variable table preserving declaration order
pub type VariableMap = IndexMap<Symbol, VariableId, FxBuildHasher>;

/// Kind of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The program (exactly one per analysis)
    Global,
    /// ES module body
    Module,
    /// Function or arrow function body and parameters
    Function,
    /// Holds the name of a named function expression
    FunctionExpressionName,
    /// `{ }` block with lexical declarations
    Block,
    /// `for`/`for-in`/`for-of` head with lexical declarations
    For,
    /// `catch` clause
    Catch,
    /// `switch` body
    Switch,
    /// Class body and heritage
    Class,
    /// `with` statement body
    With,
    /// Generic declaration (`type T<U> = ...`, `interface I<U>`)
    Type,
    /// `A extends B ? C : D`, scoping `infer` declarations
    ConditionalType,
    /// `{ [K in Keys]: ... }`
    MappedType,
    /// Function and constructor type signatures
    FunctionType,
    /// `enum` body
    TsEnum,
    /// `namespace`/`module` body
    TsModule,
}

impl ScopeKind {
    /// Can host function-scoped (`var`) declarations
    ///
    /// A namespace body runs as its own function, so its `var`s stay inside it.
    pub fn is_variable_scope(self) -> bool {
        matches!(
            self,
            Self::Global | Self::Module | Self::Function | Self::TsModule
        )
    }

    /// Strict regardless of directives or enclosing code
    pub fn is_strict_by_default(self) -> bool {
        matches!(self, Self::Class | Self::Module)
    }

    /// Bindings may appear at runtime that no declaration accounts for
    pub fn is_dynamic(self) -> bool {
        matches!(self, Self::Global | Self::With)
    }

    /// Namespace of the syntax this scope encloses
    pub fn namespace(self) -> Namespace {
        match self {
            Self::Type
            | Self::ConditionalType
            | Self::MappedType
            | Self::FunctionType
            | Self::TsEnum
            | Self::TsModule => Namespace::Type,
            Self::Global
            | Self::Module
            | Self::Function
            | Self::FunctionExpressionName
            | Self::Block
            | Self::For
            | Self::Catch
            | Self::Switch
            | Self::Class
            | Self::With => Namespace::Value,
        }
    }

    /// Short name used in dumps and logs
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Module => "module",
            Self::Function => "function",
            Self::FunctionExpressionName => "function-expression-name",
            Self::Block => "block",
            Self::For => "for",
            Self::Catch => "catch",
            Self::Switch => "switch",
            Self::Class => "class",
            Self::With => "with",
            Self::Type => "type",
            Self::ConditionalType => "conditional-type",
            Self::MappedType => "mapped-type",
            Self::FunctionType => "function-type",
            Self::TsEnum => "ts-enum",
            Self::TsModule => "ts-module",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single scope in the scope tree
#[derive(Debug, Clone)]
pub struct Scope {
    /// This scope's id
    pub id: ScopeId,
    /// Kind of scope
    pub kind: ScopeKind,
    /// AST node the scope is anchored at
    pub block: NodeId,
    /// Parent scope (None for the global scope)
    pub upper: Option<ScopeId>,
    /// Child scopes in nesting order
    pub child_scopes: Vec<ScopeId>,
    /// Variables declared here, in declaration order
    pub variables: VariableMap,
    /// References created while this scope was innermost, in traversal order
    pub references: Vec<ReferenceId>,
    /// References that left this scope unresolved
    pub through: Vec<ReferenceId>,
    /// Implicit globals materialized when the global scope closed
    pub implicit: Vec<VariableId>,
    /// Strict mode code
    pub is_strict: bool,
    /// Nearest scope, this one included, that hosts hoisted declarations
    pub variable_scope: ScopeId,
    /// References waiting for this scope to close
    pub(crate) left_to_resolve: Vec<ReferenceId>,
    pub(crate) closed: bool,
}

impl Scope {
    pub(crate) fn new(
        id: ScopeId,
        kind: ScopeKind,
        block: NodeId,
        upper: Option<ScopeId>,
        is_strict: bool,
        variable_scope: ScopeId,
    ) -> Self {
        Self {
            id,
            kind,
            block,
            upper,
            child_scopes: Vec::new(),
            variables: VariableMap::default(),
            references: Vec::new(),
            through: Vec::new(),
            implicit: Vec::new(),
            is_strict,
            variable_scope,
            left_to_resolve: Vec::new(),
            closed: false,
        }
    }

    /// Look up a variable declared directly in this scope
    pub fn variable(&self, name: Symbol) -> Option<VariableId> {
        self.variables.get(&name).copied()
    }

    /// Namespace of the syntax this scope encloses
    pub fn namespace(&self) -> Namespace {
        self.kind.namespace()
    }

    /// Hosts hoisted declarations
    pub fn is_variable_scope(&self) -> bool {
        self.kind.is_variable_scope()
    }

    /// Bindings may appear at runtime that no declaration accounts for
    pub fn is_dynamic(&self) -> bool {
        self.kind.is_dynamic()
    }

    /// References that left this scope unresolved
    pub fn through(&self) -> &[ReferenceId] {
        &self.through
    }

    /// Implicit globals; only the global scope has any
    pub fn implicit(&self) -> &[VariableId] {
        &self.implicit
    }

    /// Nearest scope, this one included, that hosts hoisted declarations
    pub fn variable_scope(&self) -> ScopeId {
        self.variable_scope
    }

    /// Name-binding scope of a named function expression
    pub fn is_function_expression_scope(&self) -> bool {
        self.kind == ScopeKind::FunctionExpressionName
    }

    /// Resolution has run; the scope accepts no further declarations
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_scopes() {
        assert!(ScopeKind::Global.is_variable_scope());
        assert!(ScopeKind::Module.is_variable_scope());
        assert!(ScopeKind::Function.is_variable_scope());
        assert!(ScopeKind::TsModule.is_variable_scope());
        for kind in [
            ScopeKind::Block,
            ScopeKind::For,
            ScopeKind::Catch,
            ScopeKind::Switch,
            ScopeKind::With,
            ScopeKind::Class,
            ScopeKind::FunctionExpressionName,
            ScopeKind::Type,
            ScopeKind::TsEnum,
        ] {
            assert!(!kind.is_variable_scope(), "{kind} should not host var");
        }
    }

    #[test]
    fn test_type_scopes_use_type_namespace() {
        assert_eq!(ScopeKind::MappedType.namespace(), Namespace::Type);
        assert_eq!(ScopeKind::TsEnum.namespace(), Namespace::Type);
        assert_eq!(ScopeKind::Catch.namespace(), Namespace::Value);
    }

    #[test]
    fn test_dynamic_scopes() {
        assert!(ScopeKind::Global.is_dynamic());
        assert!(ScopeKind::With.is_dynamic());
        assert!(!ScopeKind::Module.is_dynamic());
    }

    #[test]
    fn test_strict_by_default() {
        assert!(ScopeKind::Class.is_strict_by_default());
        assert!(ScopeKind::Module.is_strict_by_default());
        assert!(!ScopeKind::Function.is_strict_by_default());
        assert!(!ScopeKind::Global.is_strict_by_default());
    }
}
