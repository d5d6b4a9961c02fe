//! Syntax index over an oxc program.
//!
//! `SyntaxTree::build` walks the program once in pre-order. Every visited
//! node gets a dense [`NodeId`], a parent link, its children and the
//! innermost lexical scope it sits in. Ids grow in visiting order, so
//! iterating `0..len` replays the walk.
//!
//! The walk is driven by [`oxc_ast_visit::Visit`]: every `AstKind` the
//! visitor enters becomes a node, except for a few wrappers that stay
//! transparent so parent links follow the ESTree shape. `FunctionBody`,
//! `ClassBody` and parenthesized expressions get no node, and the
//! expression body of an arrow is a direct child of the arrow.

use oxc_ast::ast::*;
use oxc_ast::AstKind;
use oxc_ast_visit::Visit;
use oxc_span::{GetSpan, Span};

use crate::scope::{Definition, DefinitionKind, ScopeId, ScopeKind, ScopeTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(index as u32)
    }
}

/// Node categories the detector and rules care about. Everything else is
/// `Other` but still takes part in the parent chain.
#[derive(Debug, Clone, Copy)]
pub enum NodeKind<'a> {
    Program,
    Class(&'a Class<'a>),
    Function(&'a Function<'a>),
    ArrowFunction(&'a ArrowFunctionExpression<'a>),
    MethodDefinition(&'a MethodDefinition<'a>),
    PropertyDefinition(&'a PropertyDefinition<'a>),
    ObjectExpression(&'a ObjectExpression<'a>),
    ObjectProperty(&'a ObjectProperty<'a>),
    CallExpression(&'a CallExpression<'a>),
    StaticMember(&'a StaticMemberExpression<'a>),
    ComputedMember(&'a ComputedMemberExpression<'a>),
    PrivateField(&'a PrivateFieldExpression<'a>),
    Assignment(&'a AssignmentExpression<'a>),
    VariableDeclaration,
    VariableDeclarator(&'a VariableDeclarator<'a>),
    ReturnStatement(&'a ReturnStatement<'a>),
    This,
    JsxElement(&'a JSXElement<'a>),
    JsxAttribute(&'a JSXAttribute<'a>),
    JsxExpressionContainer,
    Decorator,
    Export,
    /// A read or assignment-target identifier.
    Identifier(&'a IdentifierReference<'a>),
    /// Any declared name. Only the name of an initialised `const a = ...`
    /// style declarator is recorded as a reference.
    BindingIdentifier(&'a BindingIdentifier<'a>),
    Other,
}

impl NodeKind<'_> {
    pub fn is_function(&self) -> bool {
        matches!(self, NodeKind::Function(_) | NodeKind::ArrowFunction(_))
    }

    /// `a.b`, `a[b]` or `a.#b`.
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            NodeKind::StaticMember(_) | NodeKind::ComputedMember(_) | NodeKind::PrivateField(_)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::Class(_) => "Class",
            NodeKind::Function(_) => "Function",
            NodeKind::ArrowFunction(_) => "ArrowFunctionExpression",
            NodeKind::MethodDefinition(_) => "MethodDefinition",
            NodeKind::PropertyDefinition(_) => "PropertyDefinition",
            NodeKind::ObjectExpression(_) => "ObjectExpression",
            NodeKind::ObjectProperty(_) => "ObjectProperty",
            NodeKind::CallExpression(_) => "CallExpression",
            NodeKind::StaticMember(_) => "StaticMemberExpression",
            NodeKind::ComputedMember(_) => "ComputedMemberExpression",
            NodeKind::PrivateField(_) => "PrivateFieldExpression",
            NodeKind::Assignment(_) => "AssignmentExpression",
            NodeKind::VariableDeclaration => "VariableDeclaration",
            NodeKind::VariableDeclarator(_) => "VariableDeclarator",
            NodeKind::ReturnStatement(_) => "ReturnStatement",
            NodeKind::This => "ThisExpression",
            NodeKind::JsxElement(_) => "JSXElement",
            NodeKind::JsxAttribute(_) => "JSXAttribute",
            NodeKind::JsxExpressionContainer => "JSXExpressionContainer",
            NodeKind::Decorator => "Decorator",
            NodeKind::Export => "ExportDeclaration",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::BindingIdentifier(_) => "BindingIdentifier",
            NodeKind::Other => "Other",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxNode<'a> {
    pub kind: NodeKind<'a>,
    pub span: Span,
    pub parent: Option<NodeId>,
    /// Innermost scope; a node that opens a scope belongs to its own frame.
    pub scope: ScopeId,
    pub children: Vec<NodeId>,
}

pub struct SyntaxTree<'a> {
    source: &'a str,
    nodes: Vec<SyntaxNode<'a>>,
    scopes: ScopeTree,
}

impl<'a> SyntaxTree<'a> {
    pub fn build(source: &'a str, program: &'a Program<'a>) -> Self {
        let mut builder = TreeBuilder {
            nodes: Vec::new(),
            scopes: ScopeTree::new(),
            node_stack: Vec::new(),
            scope_stack: Vec::new(),
            pending: Vec::new(),
            frames: Vec::new(),
        };
        builder.visit_program(program);
        builder.resolve_references();

        tracing::trace!(
            nodes = builder.nodes.len(),
            scopes = builder.scopes.len(),
            "built syntax index"
        );

        SyntaxTree {
            source,
            nodes: builder.nodes,
            scopes: builder.scopes,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in pre-order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::from_index)
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode<'a> {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind<'a> {
        self.nodes[id.index()].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.index()).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    pub fn scope(&self, id: NodeId) -> ScopeId {
        self.nodes[id.index()].scope
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    pub fn text(&self, id: NodeId) -> &'a str {
        self.span_text(self.span(id))
    }

    pub fn span_text(&self, span: Span) -> &'a str {
        self.source
            .get(span.start as usize..span.end as usize)
            .unwrap_or("")
    }

    /// The nearest enclosing function scope, or the program scope.
    pub fn function_scope(&self, scope: ScopeId) -> ScopeId {
        self.scopes
            .ancestors(scope)
            .find(|id| {
                matches!(
                    self.scopes.get(*id).kind,
                    ScopeKind::Function | ScopeKind::Program
                )
            })
            .unwrap_or(scope)
    }

    /// 1-based line and column of a byte offset.
    pub fn line_column(&self, offset: u32) -> (u32, u32) {
        let offset = (offset as usize).min(self.source.len());
        let before = &self.source[..offset];
        let line = before.matches('\n').count() as u32 + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() as u32 + 1;
        (line, column)
    }
}

struct PendingReference<'a> {
    node: NodeId,
    scope: ScopeId,
    name: &'a str,
}

/// One per `AstKind` the visitor entered, so `leave_node` knows what to undo.
#[derive(Clone, Copy)]
struct Frame {
    node: bool,
    scope: bool,
}

struct TreeBuilder<'a> {
    nodes: Vec<SyntaxNode<'a>>,
    scopes: ScopeTree,
    node_stack: Vec<NodeId>,
    scope_stack: Vec<ScopeId>,
    pending: Vec<PendingReference<'a>>,
    frames: Vec<Frame>,
}

impl<'a> Visit<'a> for TreeBuilder<'a> {
    fn enter_node(&mut self, kind: AstKind<'a>) {
        if self.is_transparent(kind) {
            let scope = self.enter_class_body(kind);
            self.frames.push(Frame { node: false, scope });
            return;
        }
        let id = self.enter(node_kind(kind), kind.span());
        self.declare_outside(kind, id);
        let scope = self.open_scope_for(kind, id);
        self.declare_inside(kind, id);
        self.frames.push(Frame { node: true, scope });
    }

    fn leave_node(&mut self, _kind: AstKind<'a>) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        if frame.scope {
            self.close_scope();
        }
        if frame.node {
            self.node_stack.pop();
        }
    }
}

fn node_kind<'a>(kind: AstKind<'a>) -> NodeKind<'a> {
    match kind {
        AstKind::Program(_) => NodeKind::Program,
        AstKind::Class(class) => NodeKind::Class(class),
        AstKind::Function(func) => NodeKind::Function(func),
        AstKind::ArrowFunctionExpression(arrow) => NodeKind::ArrowFunction(arrow),
        AstKind::MethodDefinition(method) => NodeKind::MethodDefinition(method),
        AstKind::PropertyDefinition(property) => NodeKind::PropertyDefinition(property),
        AstKind::ObjectExpression(object) => NodeKind::ObjectExpression(object),
        AstKind::ObjectProperty(property) => NodeKind::ObjectProperty(property),
        AstKind::CallExpression(call) => NodeKind::CallExpression(call),
        AstKind::StaticMemberExpression(member) => NodeKind::StaticMember(member),
        AstKind::ComputedMemberExpression(member) => NodeKind::ComputedMember(member),
        AstKind::PrivateFieldExpression(member) => NodeKind::PrivateField(member),
        AstKind::AssignmentExpression(assign) => NodeKind::Assignment(assign),
        AstKind::VariableDeclaration(_) => NodeKind::VariableDeclaration,
        AstKind::VariableDeclarator(declarator) => NodeKind::VariableDeclarator(declarator),
        AstKind::ReturnStatement(ret) => NodeKind::ReturnStatement(ret),
        AstKind::ThisExpression(_) => NodeKind::This,
        AstKind::JSXElement(element) => NodeKind::JsxElement(element),
        AstKind::JSXAttribute(attribute) => NodeKind::JsxAttribute(attribute),
        AstKind::JSXExpressionContainer(_) => NodeKind::JsxExpressionContainer,
        AstKind::Decorator(_) => NodeKind::Decorator,
        AstKind::ExportNamedDeclaration(_) | AstKind::ExportDefaultDeclaration(_) => {
            NodeKind::Export
        }
        AstKind::IdentifierReference(ident) => NodeKind::Identifier(ident),
        AstKind::BindingIdentifier(ident) => NodeKind::BindingIdentifier(ident),
        _ => NodeKind::Other,
    }
}

impl<'a> TreeBuilder<'a> {
    // ─── bookkeeping ────────────────────────────────────────────────────────

    fn current_scope(&self) -> ScopeId {
        self.scope_stack
            .last()
            .copied()
            .unwrap_or(ScopeId::from_index(0))
    }

    fn current_node(&self) -> Option<NodeId> {
        self.node_stack.last().copied()
    }

    /// Scope receiving `var` declarations.
    fn hoisting_scope(&self) -> ScopeId {
        self.scope_stack
            .iter()
            .rev()
            .copied()
            .find(|id| {
                matches!(
                    self.scopes.get(*id).kind,
                    ScopeKind::Function | ScopeKind::Program
                )
            })
            .unwrap_or_else(|| self.current_scope())
    }

    fn enter(&mut self, kind: NodeKind<'a>, span: Span) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        let parent = self.current_node();
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        self.nodes.push(SyntaxNode {
            kind,
            span,
            parent,
            scope: self.current_scope(),
            children: Vec::new(),
        });
        self.node_stack.push(id);
        id
    }

    fn open_scope(&mut self, kind: ScopeKind, block: NodeId) -> ScopeId {
        let parent = self.scope_stack.last().copied();
        let id = self.scopes.add_scope(kind, block, parent);
        self.nodes[block.index()].scope = id;
        self.scope_stack.push(id);
        id
    }

    fn close_scope(&mut self) {
        self.scope_stack.pop();
    }

    fn declare(&mut self, scope: ScopeId, name: &str, kind: DefinitionKind, node: NodeId) {
        self.scopes.declare(scope, name, Definition { kind, node });
    }

    fn reference(&mut self, node: NodeId, name: &'a str) {
        self.pending.push(PendingReference {
            node,
            scope: self.current_scope(),
            name,
        });
    }

    /// Declarations may follow their uses (hoisting), so references are
    /// bound only after the whole program has been declared.
    fn resolve_references(&mut self) {
        for pending in std::mem::take(&mut self.pending) {
            if let Some(variable) = self.scopes.find_binding(pending.scope, pending.name) {
                self.scopes.add_reference(variable, pending.node);
            }
        }
    }

    // ─── shape ──────────────────────────────────────────────────────────────

    fn is_transparent(&self, kind: AstKind<'a>) -> bool {
        match kind {
            AstKind::FunctionBody(_)
            | AstKind::ClassBody(_)
            | AstKind::ParenthesizedExpression(_) => true,
            // The statement oxc wraps around an arrow's expression body.
            AstKind::ExpressionStatement(_) => self.current_node().is_some_and(|node| {
                matches!(
                    self.nodes[node.index()].kind,
                    NodeKind::ArrowFunction(arrow) if arrow.expression
                )
            }),
            _ => false,
        }
    }

    /// The class scope belongs to the `Class` node but only starts at its
    /// body, so decorators and the superclass resolve outside of it.
    fn enter_class_body(&mut self, kind: AstKind<'a>) -> bool {
        let (AstKind::ClassBody(_), Some(owner)) = (kind, self.current_node()) else {
            return false;
        };
        let scope = self.open_scope(ScopeKind::Class, owner);
        if let NodeKind::Class(class) = self.nodes[owner.index()].kind {
            if let (ClassType::ClassExpression, Some(name)) = (class.r#type, &class.id) {
                self.declare(scope, name.name.as_str(), DefinitionKind::ClassName, owner);
            }
        }
        true
    }

    fn open_scope_for(&mut self, kind: AstKind<'a>, id: NodeId) -> bool {
        let scope_kind = match kind {
            AstKind::Program(_) => ScopeKind::Program,
            AstKind::Function(_) | AstKind::ArrowFunctionExpression(_) => ScopeKind::Function,
            AstKind::BlockStatement(_)
            | AstKind::ForStatement(_)
            | AstKind::ForInStatement(_)
            | AstKind::ForOfStatement(_)
            | AstKind::SwitchStatement(_)
            | AstKind::CatchClause(_)
            | AstKind::StaticBlock(_)
            | AstKind::TSModuleBlock(_) => ScopeKind::Block,
            _ => return false,
        };
        self.open_scope(scope_kind, id);
        true
    }

    // ─── declarations and references ────────────────────────────────────────

    /// Names that belong to the scope enclosing `id`, plus references.
    fn declare_outside(&mut self, kind: AstKind<'a>, id: NodeId) {
        let scope = self.current_scope();
        match kind {
            AstKind::Function(func) => {
                if let (FunctionType::FunctionDeclaration, Some(name)) = (func.r#type, &func.id) {
                    self.declare(scope, name.name.as_str(), DefinitionKind::FunctionName, id);
                }
            }
            AstKind::Class(class) => {
                if let (ClassType::ClassDeclaration, Some(name)) = (class.r#type, &class.id) {
                    self.declare(scope, name.name.as_str(), DefinitionKind::ClassName, id);
                }
            }
            AstKind::VariableDeclarator(declarator) => {
                let scope = if declarator.kind == VariableDeclarationKind::Var {
                    self.hoisting_scope()
                } else {
                    scope
                };
                self.binding_pattern(&declarator.id, DefinitionKind::Variable, id, scope);
            }
            AstKind::ImportDeclaration(decl) => {
                for specifier in decl.specifiers.iter().flatten() {
                    let local = match specifier {
                        ImportDeclarationSpecifier::ImportSpecifier(s) => &s.local,
                        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => &s.local,
                        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => &s.local,
                    };
                    self.declare(scope, local.name.as_str(), DefinitionKind::ImportBinding, id);
                }
            }
            AstKind::IdentifierReference(ident) => self.reference(id, ident.name.as_str()),
            AstKind::BindingIdentifier(ident) if self.is_initialised_declarator_name(id, ident) => {
                self.reference(id, ident.name.as_str());
            }
            _ => {}
        }
    }

    /// Names that live in the scope `id` just opened.
    fn declare_inside(&mut self, kind: AstKind<'a>, id: NodeId) {
        let scope = self.current_scope();
        match kind {
            AstKind::Function(func) => {
                if let (FunctionType::FunctionExpression, Some(name)) = (func.r#type, &func.id) {
                    self.declare(scope, name.name.as_str(), DefinitionKind::FunctionName, id);
                }
                self.params(&func.params, id, scope);
            }
            AstKind::ArrowFunctionExpression(arrow) => self.params(&arrow.params, id, scope),
            AstKind::CatchClause(clause) => {
                if let Some(param) = &clause.param {
                    self.binding_pattern(&param.pattern, DefinitionKind::CatchClause, id, scope);
                }
            }
            _ => {}
        }
    }

    fn is_initialised_declarator_name(&self, id: NodeId, ident: &BindingIdentifier<'a>) -> bool {
        let Some(parent) = self.nodes[id.index()].parent else {
            return false;
        };
        let NodeKind::VariableDeclarator(declarator) = self.nodes[parent.index()].kind else {
            return false;
        };
        declarator.init.is_some()
            && matches!(
                &declarator.id,
                BindingPattern::BindingIdentifier(name) if name.span == ident.span
            )
    }

    fn binding_pattern(
        &mut self,
        pattern: &'a BindingPattern<'a>,
        kind: DefinitionKind,
        owner: NodeId,
        scope: ScopeId,
    ) {
        match pattern {
            BindingPattern::BindingIdentifier(ident) => {
                self.declare(scope, ident.name.as_str(), kind, owner);
            }
            BindingPattern::ObjectPattern(object) => {
                for property in &object.properties {
                    self.binding_pattern(&property.value, kind, owner, scope);
                }
                if let Some(rest) = &object.rest {
                    self.binding_pattern(&rest.argument, kind, owner, scope);
                }
            }
            BindingPattern::ArrayPattern(array) => {
                for element in array.elements.iter().flatten() {
                    self.binding_pattern(element, kind, owner, scope);
                }
                if let Some(rest) = &array.rest {
                    self.binding_pattern(&rest.argument, kind, owner, scope);
                }
            }
            BindingPattern::AssignmentPattern(assign) => {
                self.binding_pattern(&assign.left, kind, owner, scope);
            }
        }
    }

    fn params(&mut self, params: &'a FormalParameters<'a>, owner: NodeId, scope: ScopeId) {
        for param in &params.items {
            self.binding_pattern(&param.pattern, DefinitionKind::Parameter, owner, scope);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::parse_program;
    use oxc_allocator::Allocator;

    fn with_tree(source: &str, file: &str, check: impl FnOnce(&SyntaxTree<'_>)) {
        let allocator = Allocator::default();
        let program = parse_program(&allocator, source, file).unwrap();
        check(&SyntaxTree::build(source, program));
    }

    fn find_all(tree: &SyntaxTree<'_>, pred: impl Fn(&NodeKind<'_>) -> bool) -> Vec<NodeId> {
        tree.ids().filter(|id| pred(&tree.kind(*id))).collect()
    }

    #[test]
    fn test_update_expression_target_is_indexed() {
        with_tree("function Foo() { this.count++; }", "test.js", |tree| {
            let this = find_all(tree, |k| matches!(k, NodeKind::This));
            assert_eq!(this.len(), 1);
            let parent = tree.parent(this[0]).unwrap();
            assert!(matches!(tree.kind(parent), NodeKind::StaticMember(_)));
            assert!(tree
                .ancestors(this[0])
                .any(|id| matches!(tree.kind(id), NodeKind::Function(_))));
        });
    }

    #[test]
    fn test_namespace_body_is_indexed() {
        let source = "namespace UI { export class A {} }\nclass B {}";
        with_tree(source, "test.tsx", |tree| {
            let classes = find_all(tree, |k| matches!(k, NodeKind::Class(_)));
            assert_eq!(classes.len(), 2);
            let export = tree.parent(classes[0]).unwrap();
            assert!(matches!(tree.kind(export), NodeKind::Export));
            // The namespace block scopes its declarations.
            let scopes = tree.scopes();
            let program = tree.scope(NodeId::from_index(0));
            assert!(scopes.find_binding(program, "A").is_none());
            assert!(scopes.find_binding(program, "B").is_some());
        });
    }

    #[test]
    fn test_member_kinds() {
        let source = "class A { #x = 1; m(k) { this[k]; this.#x; this.y; } }";
        with_tree(source, "test.js", |tree| {
            let parents: Vec<_> = find_all(tree, |k| matches!(k, NodeKind::This))
                .into_iter()
                .map(|id| tree.kind(tree.parent(id).unwrap()))
                .collect();
            assert!(matches!(parents[0], NodeKind::ComputedMember(_)));
            assert!(matches!(parents[1], NodeKind::PrivateField(_)));
            assert!(matches!(parents[2], NodeKind::StaticMember(_)));
            assert!(parents.iter().all(|kind| kind.is_member()));
        });
    }

    #[test]
    fn test_arrow_expression_body_is_a_direct_child() {
        with_tree("const f = (a) => (g(a));", "test.js", |tree| {
            let call = find_all(tree, |k| matches!(k, NodeKind::CallExpression(_)))[0];
            let arrow = tree.parent(call).unwrap();
            assert!(matches!(tree.kind(arrow), NodeKind::ArrowFunction(_)));
            let declarator = tree.parent(arrow).unwrap();
            assert!(matches!(tree.kind(declarator), NodeKind::VariableDeclarator(_)));
        });
    }

    #[test]
    fn test_declarator_name_and_initializer() {
        with_tree("const a = init(); a; let b;", "test.js", |tree| {
            let declarators = find_all(tree, |k| matches!(k, NodeKind::VariableDeclarator(_)));
            let first = tree.children(declarators[0]);
            assert!(matches!(tree.kind(first[0]), NodeKind::BindingIdentifier(_)));
            let init = tree.last_child(declarators[0]).unwrap();
            assert!(matches!(tree.kind(init), NodeKind::CallExpression(_)));

            let scopes = tree.scopes();
            let program = tree.scope(NodeId::from_index(0));
            let a = scopes.variable(scopes.find_binding(program, "a").unwrap());
            assert_eq!(a.references.len(), 2);
            let b = scopes.variable(scopes.find_binding(program, "b").unwrap());
            assert!(b.references.is_empty());
        });
    }

    #[test]
    fn test_hoisting_and_class_scopes() {
        let source = "use(f);\n\
                      function f(p) { { var v; let w; } }\n\
                      const C = class Named extends Base { m() {} };";
        with_tree(source, "test.js", |tree| {
            let scopes = tree.scopes();
            let program = tree.scope(NodeId::from_index(0));
            let f = scopes.find_binding(program, "f").unwrap();
            assert_eq!(scopes.variable(f).references.len(), 1);
            assert!(scopes.find_binding(program, "Named").is_none());

            let function = find_all(tree, |k| matches!(k, NodeKind::Function(_)))[0];
            let function_scope = tree.scope(function);
            assert!(scopes.get(function_scope).declares("v"));
            assert!(scopes.get(function_scope).declares("p"));
            assert!(!scopes.get(function_scope).declares("w"));

            let class = find_all(tree, |k| matches!(k, NodeKind::Class(_)))[0];
            assert_eq!(scopes.get(tree.scope(class)).kind, ScopeKind::Class);
            assert!(scopes.get(tree.scope(class)).declares("Named"));
            // The superclass is read from outside the class scope.
            let base = find_all(tree, |k| {
                matches!(k, NodeKind::Identifier(i) if i.name.as_str() == "Base")
            })[0];
            assert_eq!(tree.scope(base), program);
        });
    }
}
