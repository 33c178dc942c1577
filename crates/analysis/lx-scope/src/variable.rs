//! Variables and the definitions that declare them

use crate::namespace::{Namespace, Namespaces};
use crate::reference::ReferenceId;
use crate::scope::ScopeId;
use la_arena::Idx;
use lx_intern::Symbol;
use lx_syntax::{Identifier, NodeId};
use std::fmt;

/// Unique identifier for a variable; allocation order is creation order
pub type VariableId = Idx<Variable>;

/// Declaration keyword of a variable definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// `var`, hoisted to the nearest function, module or global scope
    Var,
    /// `let`
    Let,
    /// `const`
    Const,
}

/// What kind of syntax a definition comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    /// `catch (e)` parameter
    CatchClause,
    /// Class declaration or named class expression
    ClassName,
    /// Function declaration or named function expression
    FunctionName,
    /// Assignment to an undeclared name in sloppy code
    ImplicitGlobal,
    /// Import specifier
    ImportBinding,
    /// Function parameter
    Parameter,
    /// `enum` member
    TsEnumMember,
    /// `enum` declaration
    TsEnumName,
    /// `namespace`/`module` declaration
    TsModuleName,
    /// Interface or type alias
    Type,
    /// Generic type parameter, including `infer` and mapped-type keys
    TypeParameter,
    /// `var`, `let` or `const` declarator
    Variable(VariableKind),
}

impl DefinitionKind {
    /// Namespaces a definition of this kind occupies unless overridden
    pub fn namespaces(self) -> Namespaces {
        match self {
            Self::CatchClause
            | Self::FunctionName
            | Self::ImplicitGlobal
            | Self::Parameter
            | Self::Variable(_) => Namespaces::VALUE,
            Self::Type | Self::TypeParameter => Namespaces::TYPE,
            Self::ClassName
            | Self::ImportBinding
            | Self::TsEnumMember
            | Self::TsEnumName
            | Self::TsModuleName => Namespaces::VALUE | Namespaces::TYPE,
        }
    }

    /// Short name used in dumps and diagnostics
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CatchClause => "catch-clause",
            Self::ClassName => "class-name",
            Self::FunctionName => "function-name",
            Self::ImplicitGlobal => "implicit-global",
            Self::ImportBinding => "import-binding",
            Self::Parameter => "parameter",
            Self::TsEnumMember => "enum-member",
            Self::TsEnumName => "enum-name",
            Self::TsModuleName => "module-name",
            Self::Type => "type",
            Self::TypeParameter => "type-parameter",
            Self::Variable(VariableKind::Var) => "var",
            Self::Variable(VariableKind::Let) => "let",
            Self::Variable(VariableKind::Const) => "const",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declaration site contributing to a variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Kind of declaration
    pub kind: DefinitionKind,
    /// The declared identifier
    pub name: Identifier,
    /// Node that declares the name (declarator, function, class, parameter owner...)
    pub node: NodeId,
    /// Enclosing declaration node, e.g. the `VariableDeclaration` around a declarator
    pub parent: Option<NodeId>,
    /// Binds at the nearest variable scope rather than the scope it is declared in
    pub hoisted: bool,
    /// Namespaces this definition makes the variable usable in
    pub namespaces: Namespaces,
}

impl Definition {
    /// Create a definition with the default hoisting and namespaces of `kind`
    ///
    /// Only `var` declarators hoist by default; see [`Definition::hoist`] for legacy
    /// function declarations.
    pub fn new(kind: DefinitionKind, name: Identifier, node: NodeId) -> Self {
        Self {
            kind,
            name,
            node,
            parent: None,
            hoisted: kind == DefinitionKind::Variable(VariableKind::Var),
            namespaces: kind.namespaces(),
        }
    }

    /// Attach the enclosing declaration node
    #[must_use]
    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Force function-scoped binding (pre-ES2015 function declarations in blocks)
    #[must_use]
    pub fn hoist(mut self) -> Self {
        self.hoisted = true;
        self
    }

    /// Restrict the definition to the type namespace (`import type`, type-only exports)
    #[must_use]
    pub fn type_only(mut self) -> Self {
        self.namespaces = Namespaces::TYPE;
        self
    }
}

/// A named binding owned by exactly one scope
#[derive(Debug, Clone)]
pub struct Variable {
    /// Creation-order id
    pub id: VariableId,
    /// Variable name
    pub name: Symbol,
    /// Scope that owns the variable
    pub scope: ScopeId,
    /// Declaration sites in declaration order
    pub defs: Vec<Definition>,
    /// Declaring identifier nodes, parallel to `defs`
    pub identifiers: Vec<NodeId>,
    /// Resolved references in resolution order
    pub references: Vec<ReferenceId>,
    /// Union of the namespaces of every definition
    pub namespaces: Namespaces,
    /// Resolved by at least one reference that passed through a `with` scope
    pub tainted: bool,
}

impl Variable {
    pub(crate) fn new(id: VariableId, name: Symbol, scope: ScopeId, namespaces: Namespaces) -> Self {
        Self {
            id,
            name,
            scope,
            defs: Vec::new(),
            identifiers: Vec::new(),
            references: Vec::new(),
            namespaces,
            tainted: false,
        }
    }

    /// Usable as a runtime value
    pub fn is_value_variable(&self) -> bool {
        self.namespaces.contains(Namespaces::VALUE)
    }

    /// Usable as a type
    pub fn is_type_variable(&self) -> bool {
        self.namespaces.contains(Namespaces::TYPE)
    }

    /// Whether a reference in `namespace` may resolve to this variable
    pub fn admits(&self, namespace: Namespace) -> bool {
        self.namespaces.admits(namespace)
    }

    /// Has at least one declaration site (false for `arguments` and ambient globals)
    pub fn is_declared(&self) -> bool {
        !self.defs.is_empty()
    }

    pub(crate) fn push_definition(&mut self, definition: Definition) {
        self.identifiers.push(definition.name.node);
        self.namespaces |= definition.namespaces;
        self.defs.push(definition);
    }
}
