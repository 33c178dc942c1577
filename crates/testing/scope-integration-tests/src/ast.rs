//! A small JavaScript/TypeScript-shaped syntax tree
//!
//! Only the constructs that create scopes, declarations or references are modeled.
//! Every node is stamped with a fresh [`NodeId`] by [`AstBuilder`], so tests can keep the
//! id of a node they build and ask the manager about it afterwards.

use lx_scope::VariableKind;
use lx_syntax::NodeId;
use std::cell::Cell;

/// An identifier occurrence
#[derive(Debug, Clone)]
pub struct Name {
    /// Node of the identifier itself
    pub node: NodeId,
    /// Source text
    pub text: String,
}

/// Binding target of a declarator
#[derive(Debug, Clone)]
pub enum Pattern {
    /// A single identifier
    Name(Name),
    /// `{ a, b }` shorthand destructuring
    Object {
        /// Node of the pattern
        node: NodeId,
        /// Shorthand properties, left to right
        properties: Vec<Name>,
    },
}

impl Pattern {
    /// Names bound by the pattern, left to right
    pub fn names(&self) -> Vec<&Name> {
        match self {
            Self::Name(name) => vec![name],
            Self::Object { properties, .. } => properties.iter().collect(),
        }
    }
}

/// One `target: annotation = init` entry of a declaration
#[derive(Debug, Clone)]
pub struct Declarator {
    /// Node of the declarator
    pub node: NodeId,
    /// Names being bound
    pub target: Pattern,
    /// Type annotation on the target
    pub annotation: Option<TypeExpr>,
    /// Initializer
    pub init: Option<Expr>,
}

/// `var`/`let`/`const` with one or more declarators
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Node of the whole declaration
    pub node: NodeId,
    /// `var`, `let` or `const`
    pub kind: VariableKind,
    /// Declarators in source order
    pub declarators: Vec<Declarator>,
}

/// Function declaration, expression, arrow or method
#[derive(Debug, Clone)]
pub struct Function {
    /// Node of the function; its scopes anchor here
    pub node: NodeId,
    /// Declared name, if any
    pub name: Option<Name>,
    /// Simple parameters
    pub params: Vec<Name>,
    /// Body statements
    pub body: Vec<Stmt>,
    /// `=>` function without its own `arguments`
    pub is_arrow: bool,
    /// Class method body
    pub is_method: bool,
}

/// `catch (param) { body }`
#[derive(Debug, Clone)]
pub struct Catch {
    /// Node of the clause; the catch scope anchors here
    pub node: NodeId,
    /// Caught value binding
    pub param: Name,
    /// Node of the `{ }` body
    pub body_node: NodeId,
    /// Body statements
    pub body: Vec<Stmt>,
}

/// Expressions
#[derive(Debug, Clone)]
pub enum Expr {
    /// Identifier read
    Name(Name),
    /// Numeric literal
    Number(NodeId),
    /// `{}`
    Object(NodeId),
    /// `target = value` or `target op= value`
    Assign {
        /// Node of the assignment
        node: NodeId,
        /// Assigned identifier
        target: Name,
        /// Right-hand side
        value: Box<Expr>,
        /// Compound operator, which also reads the target
        compound: bool,
    },
    /// `++target`
    Update {
        /// Node of the update
        node: NodeId,
        /// Updated identifier
        target: Name,
    },
    /// `object.property`
    Member {
        /// Node of the member access
        node: NodeId,
        /// Accessed object
        object: Box<Expr>,
        /// Property name, never a reference
        property: String,
    },
    /// `callee(args...)`
    Call {
        /// Node of the call
        node: NodeId,
        /// Called expression
        callee: Box<Expr>,
        /// Arguments
        args: Vec<Expr>,
    },
    /// `left op right`
    Binary {
        /// Node of the operation
        node: NodeId,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// Function or arrow expression
    Function(Box<Function>),
}

impl Expr {
    /// Node of the expression
    pub fn node(&self) -> NodeId {
        match self {
            Self::Name(name) => name.node,
            Self::Number(node) | Self::Object(node) => *node,
            Self::Assign { node, .. }
            | Self::Update { node, .. }
            | Self::Member { node, .. }
            | Self::Call { node, .. }
            | Self::Binary { node, .. } => *node,
            Self::Function(function) => function.node,
        }
    }
}

/// Types in annotation position
#[derive(Debug, Clone)]
pub enum TypeExpr {
    /// Named type, a type-namespace reference
    Ref(Name),
    /// `number`, `string` and friends
    Keyword(NodeId),
}

/// Statements
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `var`/`let`/`const`
    Declaration(Declaration),
    /// Expression statement
    Expr(Expr),
    /// `{ body }`
    Block {
        /// Node of the block
        node: NodeId,
        /// Statements
        body: Vec<Stmt>,
    },
    /// Function declaration
    Function(Function),
    /// `class Name { methods }`
    Class {
        /// Node of the class
        node: NodeId,
        /// Class name
        name: Name,
        /// Method bodies
        methods: Vec<Function>,
    },
    /// `with (object) body`
    With {
        /// Node of the statement
        node: NodeId,
        /// Object expression, evaluated outside the with scope
        object: Expr,
        /// Body
        body: Box<Stmt>,
    },
    /// `try { block } catch (param) { handler }`
    Try {
        /// Node of the statement
        node: NodeId,
        /// Node of the `try { }` block
        block_node: NodeId,
        /// Protected statements
        block: Vec<Stmt>,
        /// Catch clause
        handler: Option<Catch>,
    },
    /// `for (left in right) body`
    ForIn {
        /// Node of the loop
        node: NodeId,
        /// Loop binding
        left: Declaration,
        /// Iterated object
        right: Expr,
        /// Body
        body: Box<Stmt>,
    },
    /// `for (init; test; update) body`
    For {
        /// Node of the loop
        node: NodeId,
        /// Head declaration
        init: Option<Declaration>,
        /// Condition
        test: Option<Expr>,
        /// Step expression
        update: Option<Expr>,
        /// Body
        body: Box<Stmt>,
    },
    /// `type Name<params> = ty`
    TypeAlias {
        /// Node of the alias
        node: NodeId,
        /// Alias name
        name: Name,
        /// Type parameters
        params: Vec<Name>,
        /// Aliased type
        ty: TypeExpr,
    },
    /// `enum Name { members }`
    Enum {
        /// Node of the enum
        node: NodeId,
        /// Enum name
        name: Name,
        /// Members
        members: Vec<Name>,
    },
    /// `namespace Name { body }`
    Namespace {
        /// Node of the namespace
        node: NodeId,
        /// Namespace name
        name: Name,
        /// Body statements
        body: Vec<Stmt>,
    },
    /// `import { names } from "..."`, optionally `import type`
    Import {
        /// Node of the import declaration
        node: NodeId,
        /// Imported bindings
        names: Vec<Name>,
        /// `import type`
        type_only: bool,
    },
    /// `"use strict"` directive
    UseStrict(NodeId),
}

/// A whole script or module
#[derive(Debug, Clone)]
pub struct Program {
    /// Node of the program; the global scope anchors here
    pub node: NodeId,
    /// Top-level statements
    pub body: Vec<Stmt>,
}

/// Stamps nodes with ids in construction order
#[derive(Debug, Default)]
pub struct AstBuilder {
    next: Cell<u32>,
}

impl AstBuilder {
    /// Builder starting at node 0
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh node id
    pub fn node(&self) -> NodeId {
        let id = self.next.get();
        self.next.set(id + 1);
        NodeId(id)
    }

    /// Identifier
    pub fn name(&self, text: &str) -> Name {
        Name {
            node: self.node(),
            text: text.to_owned(),
        }
    }

    // ----- expressions -----

    /// Identifier read
    pub fn ident(&self, text: &str) -> Expr {
        Expr::Name(self.name(text))
    }

    /// Numeric literal
    pub fn number(&self) -> Expr {
        Expr::Number(self.node())
    }

    /// `{}`
    pub fn object(&self) -> Expr {
        Expr::Object(self.node())
    }

    /// `target = value`
    pub fn assign(&self, target: &str, value: Expr) -> Expr {
        Expr::Assign {
            node: self.node(),
            target: self.name(target),
            value: Box::new(value),
            compound: false,
        }
    }

    /// `target += value`
    pub fn compound_assign(&self, target: &str, value: Expr) -> Expr {
        Expr::Assign {
            node: self.node(),
            target: self.name(target),
            value: Box::new(value),
            compound: true,
        }
    }

    /// `++target`
    pub fn update(&self, target: &str) -> Expr {
        Expr::Update {
            node: self.node(),
            target: self.name(target),
        }
    }

    /// `object.property`
    pub fn member(&self, object: Expr, property: &str) -> Expr {
        Expr::Member {
            node: self.node(),
            object: Box::new(object),
            property: property.to_owned(),
        }
    }

    /// `callee(args...)`
    pub fn call(&self, callee: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call {
            node: self.node(),
            callee: Box::new(callee),
            args,
        }
    }

    /// `left < right`
    pub fn binary(&self, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            node: self.node(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `console.log(args...)`
    pub fn log(&self, args: Vec<Expr>) -> Expr {
        let console = self.ident("console");
        let callee = self.member(console, "log");
        self.call(callee, args)
    }

    // ----- functions -----

    /// `function name(params) { body }`
    pub fn function(&self, name: Option<&str>, params: &[&str], body: Vec<Stmt>) -> Function {
        Function {
            node: self.node(),
            name: name.map(|text| self.name(text)),
            params: params.iter().map(|param| self.name(param)).collect(),
            body,
            is_arrow: false,
            is_method: false,
        }
    }

    /// `(params) => { body }`
    pub fn arrow(&self, params: &[&str], body: Vec<Stmt>) -> Function {
        Function {
            is_arrow: true,
            ..self.function(None, params, body)
        }
    }

    /// Class method
    pub fn method(&self, params: &[&str], body: Vec<Stmt>) -> Function {
        Function {
            is_method: true,
            ..self.function(None, params, body)
        }
    }

    /// Function used as an expression
    pub fn function_expr(&self, function: Function) -> Expr {
        Expr::Function(Box::new(function))
    }

    // ----- declarations -----

    /// One declarator
    pub fn declarator(&self, target: Pattern, init: Option<Expr>) -> Declarator {
        Declarator {
            node: self.node(),
            target,
            annotation: None,
            init,
        }
    }

    /// Declaration of several declarators
    pub fn declaration(&self, kind: VariableKind, declarators: Vec<Declarator>) -> Declaration {
        Declaration {
            node: self.node(),
            kind,
            declarators,
        }
    }

    /// `{ a, b, c }`
    pub fn object_pattern(&self, names: &[&str]) -> Pattern {
        Pattern::Object {
            node: self.node(),
            properties: names.iter().map(|name| self.name(name)).collect(),
        }
    }

    /// Single-name pattern
    pub fn binding(&self, name: &str) -> Pattern {
        Pattern::Name(self.name(name))
    }

    /// `kind name = init`
    pub fn decl(&self, kind: VariableKind, name: &str, init: Option<Expr>) -> Declaration {
        let declarator = self.declarator(self.binding(name), init);
        self.declaration(kind, vec![declarator])
    }

    /// `let name: ty`
    pub fn annotated(&self, kind: VariableKind, name: &str, ty: TypeExpr) -> Declaration {
        let mut declarator = self.declarator(self.binding(name), None);
        declarator.annotation = Some(ty);
        self.declaration(kind, vec![declarator])
    }

    /// Named type reference
    pub fn type_ref(&self, name: &str) -> TypeExpr {
        TypeExpr::Ref(self.name(name))
    }

    /// Keyword type
    pub fn keyword_type(&self) -> TypeExpr {
        TypeExpr::Keyword(self.node())
    }

    // ----- statements -----

    /// Single-declarator declaration statement
    pub fn stmt_decl(&self, kind: VariableKind, name: &str, init: Option<Expr>) -> Stmt {
        Stmt::Declaration(self.decl(kind, name, init))
    }

    /// `{ body }`
    pub fn block(&self, body: Vec<Stmt>) -> Stmt {
        Stmt::Block {
            node: self.node(),
            body,
        }
    }

    /// `class name { methods }`
    pub fn class(&self, name: &str, methods: Vec<Function>) -> Stmt {
        Stmt::Class {
            node: self.node(),
            name: self.name(name),
            methods,
        }
    }

    /// `with (object) body`
    pub fn with(&self, object: Expr, body: Stmt) -> Stmt {
        Stmt::With {
            node: self.node(),
            object,
            body: Box::new(body),
        }
    }

    /// `try { block } catch (param) { handler }`
    pub fn try_catch(&self, block: Vec<Stmt>, param: &str, handler: Vec<Stmt>) -> Stmt {
        Stmt::Try {
            node: self.node(),
            block_node: self.node(),
            block,
            handler: Some(Catch {
                node: self.node(),
                param: self.name(param),
                body_node: self.node(),
                body: handler,
            }),
        }
    }

    /// `for (left in right) body`
    pub fn for_in(&self, left: Declaration, right: Expr, body: Stmt) -> Stmt {
        Stmt::ForIn {
            node: self.node(),
            left,
            right,
            body: Box::new(body),
        }
    }

    /// `for (init; test; update) body`
    pub fn for_loop(
        &self,
        init: Option<Declaration>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Stmt,
    ) -> Stmt {
        Stmt::For {
            node: self.node(),
            init,
            test,
            update,
            body: Box::new(body),
        }
    }

    /// `type name<params> = ty`
    pub fn type_alias(&self, name: &str, params: &[&str], ty: TypeExpr) -> Stmt {
        Stmt::TypeAlias {
            node: self.node(),
            name: self.name(name),
            params: params.iter().map(|param| self.name(param)).collect(),
            ty,
        }
    }

    /// `enum name { members }`
    pub fn enum_decl(&self, name: &str, members: &[&str]) -> Stmt {
        Stmt::Enum {
            node: self.node(),
            name: self.name(name),
            members: members.iter().map(|member| self.name(member)).collect(),
        }
    }

    /// `namespace name { body }`
    pub fn namespace(&self, name: &str, body: Vec<Stmt>) -> Stmt {
        Stmt::Namespace {
            node: self.node(),
            name: self.name(name),
            body,
        }
    }

    /// `import { names }`, or `import type` when `type_only`
    pub fn import(&self, names: &[&str], type_only: bool) -> Stmt {
        Stmt::Import {
            node: self.node(),
            names: names.iter().map(|name| self.name(name)).collect(),
            type_only,
        }
    }

    /// `"use strict"`
    pub fn use_strict(&self) -> Stmt {
        Stmt::UseStrict(self.node())
    }

    /// Program node
    pub fn program(&self, body: Vec<Stmt>) -> Program {
        Program {
            node: self.node(),
            body,
        }
    }
}
