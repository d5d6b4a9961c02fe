//! Lexical scope frames.
//!
//! Frames are created once while the syntax index is built and never
//! change afterwards. Every frame keeps a back-reference to its enclosing
//! frame, so resolution is a bounded walk towards the program scope.

use std::collections::HashMap;

use crate::tree::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        ScopeId(index as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableId(u32);

impl VariableId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    /// Function declarations, function expressions and arrows.
    Function,
    Class,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Variable,
    FunctionName,
    ClassName,
    Parameter,
    ImportBinding,
    CatchClause,
}

/// Where a binding was introduced.
///
/// `node` is the declarator for `Variable`, the function or class node for
/// names, the owning function for parameters and the import declaration for
/// imported bindings.
#[derive(Debug, Clone, Copy)]
pub struct Definition {
    pub kind: DefinitionKind,
    pub node: NodeId,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub scope: ScopeId,
    pub definition: Definition,
    /// Identifier nodes that resolve to this variable, in source order.
    pub references: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    /// The node that opened this frame.
    pub block: NodeId,
    pub parent: Option<ScopeId>,
    bindings: HashMap<String, VariableId>,
}

impl Scope {
    pub fn declares(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }
}

#[derive(Debug, Default, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    variables: Vec<Variable>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    /// The frame itself followed by every enclosing frame.
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(id), move |current| self.scopes[current.index()].parent)
    }

    /// Resolve `name` from `scope` outwards, innermost binding first.
    pub fn find_binding(&self, scope: ScopeId, name: &str) -> Option<VariableId> {
        self.ancestors(scope)
            .find_map(|id| self.scopes[id.index()].bindings.get(name).copied())
    }

    pub(crate) fn add_scope(
        &mut self,
        kind: ScopeKind,
        block: NodeId,
        parent: Option<ScopeId>,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            block,
            parent,
            bindings: HashMap::new(),
        });
        id
    }

    /// Redeclarations keep the first definition, like `var a; var a;`.
    pub(crate) fn declare(&mut self, scope: ScopeId, name: &str, definition: Definition) {
        if self.scopes[scope.index()].bindings.contains_key(name) {
            return;
        }
        let id = VariableId(self.variables.len() as u32);
        self.variables.push(Variable {
            name: name.to_string(),
            scope,
            definition,
            references: Vec::new(),
        });
        self.scopes[scope.index()]
            .bindings
            .insert(name.to_string(), id);
    }

    pub(crate) fn add_reference(&mut self, variable: VariableId, node: NodeId) {
        self.variables[variable.index()].references.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeId;

    fn def(node: u32) -> Definition {
        Definition {
            kind: DefinitionKind::Variable,
            node: NodeId::from_index(node as usize),
        }
    }

    #[test]
    fn test_inner_binding_shadows_outer() {
        let mut tree = ScopeTree::new();
        let program = tree.add_scope(ScopeKind::Program, NodeId::from_index(0), None);
        let inner = tree.add_scope(ScopeKind::Function, NodeId::from_index(1), Some(program));
        tree.declare(program, "a", def(2));
        tree.declare(inner, "a", def(3));

        let outer_a = tree.find_binding(program, "a").unwrap();
        let inner_a = tree.find_binding(inner, "a").unwrap();
        assert_ne!(outer_a, inner_a);
        assert_eq!(tree.variable(inner_a).scope, inner);
        assert!(tree.find_binding(inner, "missing").is_none());
    }

    #[test]
    fn test_redeclaration_keeps_first_definition() {
        let mut tree = ScopeTree::new();
        let program = tree.add_scope(ScopeKind::Program, NodeId::from_index(0), None);
        tree.declare(program, "a", def(2));
        tree.declare(program, "a", def(9));
        let a = tree.find_binding(program, "a").unwrap();
        assert_eq!(tree.variable(a).definition.node, NodeId::from_index(2));
    }

    #[test]
    fn test_ancestors_end_at_program() {
        let mut tree = ScopeTree::new();
        let program = tree.add_scope(ScopeKind::Program, NodeId::from_index(0), None);
        let class = tree.add_scope(ScopeKind::Class, NodeId::from_index(1), Some(program));
        let method = tree.add_scope(ScopeKind::Function, NodeId::from_index(2), Some(class));
        let chain: Vec<_> = tree.ancestors(method).collect();
        assert_eq!(chain, vec![method, class, program]);
    }
}
