//! Text rendering of a scope tree, used by snapshot tests and debugging

use crate::manager::{ScopeManager, raw};
use crate::scope::ScopeId;
use std::fmt;

/// Indented tree of scopes with their variables and references
///
/// ```text
/// global scope#0
///   var x#0 (let)
///   ref x W -> x#0
///   block scope#1
///     ref y R -> unresolved
/// ```
pub struct Dump<'a> {
    manager: &'a ScopeManager,
}

impl<'a> Dump<'a> {
    /// Render the tree owned by `manager`
    pub fn new(manager: &'a ScopeManager) -> Self {
        Self { manager }
    }

    fn write_scope(&self, f: &mut fmt::Formatter<'_>, id: ScopeId, depth: usize) -> fmt::Result {
        let manager = self.manager;
        let scope = manager.scope(id);
        let indent = "  ".repeat(depth);

        write!(f, "{indent}{} scope#{}", scope.kind, raw(id))?;
        if scope.is_strict {
            f.write_str(" strict")?;
        }
        writeln!(f)?;

        for &variable in scope.variables.values() {
            let data = manager.variable(variable);
            write!(f, "{indent}  var {}#{}", manager.name(data.name), raw(variable))?;
            if data.is_declared() {
                let kinds: Vec<&str> = data.defs.iter().map(|def| def.kind.as_str()).collect();
                write!(f, " ({})", kinds.join(", "))?;
            }
            if data.tainted {
                f.write_str(" tainted")?;
            }
            writeln!(f)?;
        }

        for &reference in &scope.references {
            let data = manager.reference(reference);
            write!(
                f,
                "{indent}  ref {} {}",
                manager.name(data.identifier.name),
                data.flag.as_str()
            )?;
            if data.is_type_reference() {
                f.write_str(" type")?;
            }
            match data.resolved {
                Some(variable) => write!(
                    f,
                    " -> {}#{}",
                    manager.variable_name(variable),
                    raw(variable)
                )?,
                None => f.write_str(" -> unresolved")?,
            }
            if data.tainted {
                f.write_str(" (maybe)")?;
            }
            writeln!(f)?;
        }

        for &child in &scope.child_scopes {
            self.write_scope(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.manager.global_scope() {
            Some(global) => self.write_scope(f, global, 0),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::manager::ScopeManager;
    use crate::options::AnalyzeOptions;
    use crate::reference::ReferenceSite;
    use crate::variable::{Definition, DefinitionKind, VariableKind};
    use expect_test::expect;
    use lx_syntax::NodeIdAllocator;

    #[test]
    fn test_dump_switch_and_conditional_type() {
        let mut nodes = NodeIdAllocator::new();
        let mut manager = ScopeManager::new(AnalyzeOptions {
            ecma_version: Some(6),
            ..AnalyzeOptions::default()
        });
        let lexical = DefinitionKind::Variable(VariableKind::Let);

        let global = manager.nest_global_scope(nodes.alloc());
        let outer = manager.identifier(nodes.alloc(), "T");
        manager.declare(global, Definition::new(lexical, outer, nodes.alloc()));

        let switch = manager.nest_switch_scope(nodes.alloc());
        let case = manager.identifier(nodes.alloc(), "x");
        manager.declare(switch, Definition::new(lexical, case, nodes.alloc()));
        let read = ReferenceSite::read(manager.identifier(nodes.alloc(), "x"));
        manager.create_reference(switch, read);
        manager.close(switch);

        let conditional = manager.nest_conditional_type_scope(nodes.alloc());
        let infer = manager.identifier(nodes.alloc(), "U");
        let parameter = Definition::new(DefinitionKind::TypeParameter, infer, nodes.alloc());
        manager.declare(conditional, parameter);
        for name in ["U", "T"] {
            let site = ReferenceSite::type_reference(manager.identifier(nodes.alloc(), name));
            manager.create_reference(conditional, site);
        }
        manager.close(conditional);
        manager.close(global);

        expect![[r#"
            global scope#0
              var T#0 (let)
              switch scope#1
                var x#1 (let)
                ref x R -> x#1
              conditional-type scope#2
                var U#2 (type-parameter)
                ref U R type -> U#2
                ref T R type -> unresolved
        "#]]
        .assert_eq(&manager.dump());
    }

    #[test]
    fn test_dump_without_global_scope_is_empty() {
        let manager = ScopeManager::new(AnalyzeOptions::default());
        assert_eq!(manager.dump(), "");
    }
}
