//! Scope-aware lint rules
//!
//! Rules run over a finished [`ScopeManager`] and report diagnostics anchored at syntax
//! nodes. Nothing here walks syntax: every rule reads the scope tree only.

use lx_scope::{
    DefinitionKind, Namespace, Namespaces, ScopeKind, ScopeManager, Variable, VariableKind,
};
use lx_syntax::NodeId;
use serde::{Deserialize, Serialize};

/// Lint severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LintLevel {
    /// Informational message
    Info,
    /// Warning that should be addressed
    Warning,
    /// Error that must be fixed
    Error,
}

/// A lint diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Lint rule that triggered this diagnostic
    pub rule: String,
    /// Severity level
    pub level: LintLevel,
    /// Human-readable message
    pub message: String,
    /// Node the diagnostic points at
    pub node: NodeId,
    /// Optional suggestion for fixing
    pub suggestion: Option<String>,
}

/// Lint context for running rules
pub struct LintContext<'a> {
    /// Scope tree being linted
    pub manager: &'a ScopeManager,
    /// Collected diagnostics
    diagnostics: Vec<Diagnostic>,
}

impl<'a> LintContext<'a> {
    /// Create a new lint context
    #[must_use]
    pub fn new(manager: &'a ScopeManager) -> Self {
        Self {
            manager,
            diagnostics: Vec::new(),
        }
    }

    /// Report a diagnostic
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Get all diagnostics
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Take all diagnostics
    #[must_use]
    pub fn take_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Trait for lint rules
pub trait LintRule {
    /// Rule name
    fn name(&self) -> &str;

    /// Check the whole scope tree
    fn check_program(&self, ctx: &mut LintContext);
}

/// Rule: declared variables that are never read
pub struct UnusedVariableRule;

impl LintRule for UnusedVariableRule {
    fn name(&self) -> &str {
        "unused-variable"
    }

    fn check_program(&self, ctx: &mut LintContext) {
        let manager = ctx.manager;
        for id in manager.variables() {
            let variable = manager.variable(id);
            if !variable.is_declared() || is_exempt_from_unused(manager, variable) {
                continue;
            }
            let name = manager.name(variable.name);
            if name.starts_with('_') {
                continue;
            }

            let read = variable
                .references
                .iter()
                .any(|reference| manager.reference(*reference).is_read());
            if !read {
                ctx.report(Diagnostic {
                    rule: self.name().to_string(),
                    level: LintLevel::Warning,
                    message: format!("'{name}' is declared but never read"),
                    node: variable.defs[0].name.node,
                    suggestion: Some("Remove the unused variable or prefix with '_'".to_string()),
                });
            }
        }
    }
}

fn is_exempt_from_unused(manager: &ScopeManager, variable: &Variable) -> bool {
    // Enum members are read through property access, which never creates a reference
    variable.defs.iter().any(|def| {
        matches!(
            def.kind,
            DefinitionKind::ImplicitGlobal | DefinitionKind::TsEnumMember
        )
    }) || manager.scope(variable.scope).kind == ScopeKind::FunctionExpressionName
}

/// Rule: declarations that hide a declaration of an enclosing scope
pub struct ShadowingRule;

impl LintRule for ShadowingRule {
    fn name(&self) -> &str {
        "shadowing"
    }

    fn check_program(&self, ctx: &mut LintContext) {
        let manager = ctx.manager;
        for id in manager.variables() {
            let variable = manager.variable(id);
            if !variable.is_declared() {
                continue;
            }
            let scope = manager.scope(variable.scope);
            if scope.is_function_expression_scope() {
                continue;
            }
            let Some(upper) = scope.upper else {
                continue;
            };

            let name = manager.name(variable.name);
            let shadowed = [Namespace::Value, Namespace::Type]
                .into_iter()
                .filter(|namespace| variable.admits(*namespace))
                .find_map(|namespace| manager.lookup(upper, name, namespace))
                .filter(|outer| manager.variable(*outer).is_declared());

            if shadowed.is_some() {
                ctx.report(Diagnostic {
                    rule: self.name().to_string(),
                    level: LintLevel::Warning,
                    message: format!("'{name}' shadows a declaration in an enclosing scope"),
                    node: variable.defs[0].name.node,
                    suggestion: Some("Rename one of the declarations".to_string()),
                });
            }
        }
    }
}

/// Rule: references that resolve to nothing
pub struct UndefinedReferenceRule;

impl LintRule for UndefinedReferenceRule {
    fn name(&self) -> &str {
        "undefined-reference"
    }

    fn check_program(&self, ctx: &mut LintContext) {
        let manager = ctx.manager;
        let Some(global) = manager.global_scope() else {
            return;
        };
        for &id in manager.scope(global).through() {
            let reference = manager.reference(id);
            let name = manager.name(reference.identifier.name);
            let message = if reference.is_type_reference() {
                format!("cannot find type '{name}'")
            } else {
                format!("'{name}' is not defined")
            };
            ctx.report(Diagnostic {
                rule: self.name().to_string(),
                level: LintLevel::Error,
                message,
                node: reference.identifier.node,
                suggestion: None,
            });
        }
    }
}

/// Rule: sloppy-mode assignments that create globals
pub struct ImplicitGlobalRule;

impl LintRule for ImplicitGlobalRule {
    fn name(&self) -> &str {
        "implicit-global"
    }

    fn check_program(&self, ctx: &mut LintContext) {
        let manager = ctx.manager;
        let Some(global) = manager.global_scope() else {
            return;
        };
        for &id in manager.scope(global).implicit() {
            let variable = manager.variable(id);
            let Some(def) = variable
                .defs
                .iter()
                .find(|def| def.kind == DefinitionKind::ImplicitGlobal)
            else {
                continue;
            };
            ctx.report(Diagnostic {
                rule: self.name().to_string(),
                level: LintLevel::Warning,
                message: format!(
                    "assignment to undeclared '{}' creates a global variable",
                    manager.name(variable.name)
                ),
                node: def.node,
                suggestion: Some("Declare it with let, const or var".to_string()),
            });
        }
    }
}

/// Rule: definitions of one name that may not coexist in a scope
pub struct RedeclarationRule;

impl LintRule for RedeclarationRule {
    fn name(&self) -> &str {
        "redeclaration"
    }

    fn check_program(&self, ctx: &mut LintContext) {
        let manager = ctx.manager;
        for id in manager.variables() {
            let variable = manager.variable(id);
            for (index, later) in variable.defs.iter().enumerate().skip(1) {
                let conflict = variable.defs[..index].iter().any(|earlier| {
                    !can_coexist(earlier.kind, earlier.namespaces, later.kind, later.namespaces)
                });
                if conflict {
                    ctx.report(Diagnostic {
                        rule: self.name().to_string(),
                        level: LintLevel::Error,
                        message: format!(
                            "'{}' is already declared in this scope",
                            manager.name(variable.name)
                        ),
                        node: later.name.node,
                        suggestion: None,
                    });
                }
            }
        }
    }
}

/// Whether two definitions of the same name in the same scope are legal together
fn can_coexist(a: DefinitionKind, a_ns: Namespaces, b: DefinitionKind, b_ns: Namespaces) -> bool {
    if !a_ns.intersects(b_ns) {
        return true;
    }
    if merges(a, b) || merges(b, a) {
        return true;
    }
    !is_lexical(a) && !is_lexical(b)
}

/// Declaration merging pairs
fn merges(a: DefinitionKind, b: DefinitionKind) -> bool {
    use DefinitionKind as D;
    matches!(
        (a, b),
        (D::Type, D::Type)
            | (D::TsModuleName, D::TsModuleName)
            | (D::TsEnumName, D::TsEnumName)
            | (D::ClassName | D::FunctionName | D::TsEnumName, D::TsModuleName)
            | (D::ClassName, D::Type)
    )
}

fn is_lexical(kind: DefinitionKind) -> bool {
    matches!(
        kind,
        DefinitionKind::Variable(VariableKind::Let | VariableKind::Const)
            | DefinitionKind::ClassName
            | DefinitionKind::ImportBinding
            | DefinitionKind::TsEnumName
            | DefinitionKind::TsModuleName
            | DefinitionKind::Type
            | DefinitionKind::TypeParameter
    )
}

/// Linter with a collection of rules
pub struct Linter {
    rules: Vec<Box<dyn LintRule>>,
}

impl Linter {
    /// Create a new linter with default rules
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(vec![
            Box::new(UnusedVariableRule),
            Box::new(ShadowingRule),
            Box::new(UndefinedReferenceRule),
            Box::new(ImplicitGlobalRule),
            Box::new(RedeclarationRule),
        ])
    }

    /// Create a linter with specific rules
    #[must_use]
    pub fn with_rules(rules: Vec<Box<dyn LintRule>>) -> Self {
        Self { rules }
    }

    /// Lint a finished scope tree
    pub fn lint(&self, manager: &ScopeManager) -> Vec<Diagnostic> {
        let mut ctx = LintContext::new(manager);

        for rule in &self.rules {
            rule.check_program(&mut ctx);
        }

        let diagnostics = ctx.take_diagnostics();
        tracing::debug!(
            rules = self.rules.len(),
            diagnostics = diagnostics.len(),
            "lint finished"
        );
        diagnostics
    }

    /// Add a rule
    pub fn add_rule(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}
