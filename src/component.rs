//! Component classifiers and the scope resolver.
//!
//! [`ComponentUtils`] answers the questions the detection instructions and
//! the rules ask about a node: which component variant it is, which
//! component encloses it, and which declaration a dotted member path
//! denotes. Textual checks go through the compiled [`Patterns`] only.

use oxc_ast::ast::{
    BindingPattern, Class, ClassType, Expression, ObjectPropertyKind, PropertyKey,
    StaticMemberExpression,
};
use oxc_span::GetSpan;

use crate::components::{Components, Confidence};
use crate::config::Patterns;
use crate::doc_comment::{leading_doc_comment, parse_tags};
use crate::scope::{DefinitionKind, ScopeKind};
use crate::tree::{NodeId, NodeKind, SyntaxTree};

#[derive(Clone, Copy)]
pub struct ComponentUtils<'t, 'a> {
    pub(crate) tree: &'t SyntaxTree<'a>,
    pub(crate) patterns: &'t Patterns,
}

impl<'t, 'a> ComponentUtils<'t, 'a> {
    pub fn new(tree: &'t SyntaxTree<'a>, patterns: &'t Patterns) -> Self {
        Self { tree, patterns }
    }

    pub fn patterns(&self) -> &'t Patterns {
        self.patterns
    }

    // ═══════════════════════════════════════════════════════════════════════
    // VARIANT CLASSIFIERS
    // ═══════════════════════════════════════════════════════════════════════

    /// An object literal passed to `<pragma>.createClass(...)`.
    pub fn is_es5_component(&self, node: NodeId) -> bool {
        let Some(parent) = self.tree.parent(node) else {
            return false;
        };
        match self.tree.kind(parent) {
            NodeKind::CallExpression(call) => self
                .patterns
                .factory_callee
                .is_match(self.tree.span_text(call.callee.span())),
            _ => false,
        }
    }

    pub fn is_es6_component(&self, node: NodeId) -> bool {
        let NodeKind::Class(class) = self.tree.kind(node) else {
            return false;
        };
        if self.is_explicit_component(node) {
            return true;
        }
        self.superclass_text(class)
            .is_some_and(|text| self.patterns.component_superclass.is_match(text))
    }

    pub fn is_pure_component(&self, node: NodeId) -> bool {
        let NodeKind::Class(class) = self.tree.kind(node) else {
            return false;
        };
        self.superclass_text(class)
            .is_some_and(|text| self.patterns.pure_superclass.is_match(text))
    }

    /// A class documented with `@extends <pragma>.Component` or
    /// `@augments <pragma>.Component`.
    pub fn is_explicit_component(&self, node: NodeId) -> bool {
        let Some(comment) = self.doc_comment_for(node) else {
            return false;
        };
        let expected = self.patterns.component_tag_name();
        parse_tags(comment).iter().any(|tag| {
            matches!(tag.title.as_str(), "extends" | "augments")
                && tag.name.as_deref() == Some(expected.as_str())
        })
    }

    fn superclass_text(&self, class: &Class<'a>) -> Option<&'a str> {
        class
            .super_class
            .as_ref()
            .map(|superclass| self.tree.span_text(superclass.span()))
    }

    fn doc_comment_for(&self, node: NodeId) -> Option<&'a str> {
        let source = self.tree.source();
        let is_declaration = matches!(
            self.tree.kind(node),
            NodeKind::Class(class) if class.r#type == ClassType::ClassDeclaration
        );

        if is_declaration {
            let anchor = match self.tree.parent(node) {
                Some(parent) if matches!(self.tree.kind(parent), NodeKind::Export) => parent,
                _ => node,
            };
            return leading_doc_comment(source, self.tree.span(anchor).start);
        }

        // Expressions borrow the comment of the statement that holds them.
        std::iter::once(node)
            .chain(self.tree.ancestors(node))
            .take_while(|id| {
                !matches!(
                    self.tree.kind(*id),
                    NodeKind::Program
                        | NodeKind::Function(_)
                        | NodeKind::ArrowFunction(_)
                        | NodeKind::MethodDefinition(_)
                        | NodeKind::ObjectProperty(_)
                        | NodeKind::CallExpression(_)
                )
            })
            .find_map(|id| leading_doc_comment(source, self.tree.span(id).start))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // SCOPE RESOLVER
    // ═══════════════════════════════════════════════════════════════════════

    /// The component enclosing `node`, tried as class, factory object and
    /// plain function in that order.
    pub fn get_parent_component(&self, node: NodeId) -> Option<NodeId> {
        self.get_parent_es6_component(node)
            .or_else(|| self.get_parent_es5_component(node))
            .or_else(|| self.get_parent_stateless_component(node))
    }

    pub fn get_parent_es6_component(&self, node: NodeId) -> Option<NodeId> {
        let scopes = self.tree.scopes();
        let class_scope = scopes
            .ancestors(self.tree.scope(node))
            .find(|id| scopes.get(*id).kind == ScopeKind::Class)?;
        let class = scopes.get(class_scope).block;
        self.is_es6_component(class).then_some(class)
    }

    pub fn get_parent_es5_component(&self, node: NodeId) -> Option<NodeId> {
        let scopes = self.tree.scopes();
        scopes.ancestors(self.tree.scope(node)).find_map(|id| {
            let block = scopes.get(id).block;
            let property = self.tree.parent(block)?;
            let object = self.tree.parent(property)?;
            let is_object = matches!(self.tree.kind(object), NodeKind::ObjectExpression(_));
            (is_object && self.is_es5_component(object)).then_some(object)
        })
    }

    /// Callbacks handed to another call and anything inside a class never
    /// resolve to a function component. Every class is a boundary, class
    /// declarations included, so `this` in a helper class declared inside a
    /// function component does not ban that component.
    pub fn get_parent_stateless_component(&self, node: NodeId) -> Option<NodeId> {
        let scopes = self.tree.scopes();
        for id in scopes.ancestors(self.tree.scope(node)) {
            let block = scopes.get(id).block;
            let kind = self.tree.kind(block);
            let parent_kind = self.tree.parent(block).map(|parent| self.tree.kind(parent));

            let is_class = matches!(kind, NodeKind::Class(_));
            let is_argument = matches!(parent_kind, Some(NodeKind::CallExpression(_)));
            if is_class || is_argument {
                tracing::trace!(block = block.index(), "stateless lookup stopped");
                return None;
            }

            let is_method = matches!(parent_kind, Some(NodeKind::MethodDefinition(_)));
            let is_jsx_value = matches!(parent_kind, Some(NodeKind::JsxExpressionContainer));
            if kind.is_function() && !is_method && !is_jsx_value {
                return Some(block);
            }
        }
        None
    }

    // ═══════════════════════════════════════════════════════════════════════
    // CROSS-REFERENCE RESOLVER
    // ═══════════════════════════════════════════════════════════════════════

    /// Resolve the object of a member chain such as `Hello.propTypes` or
    /// `Lib.Hello.propTypes` to the node that defines the component, and
    /// register it as a possible component.
    pub fn get_related_component(
        &self,
        components: &mut Components,
        member: NodeId,
    ) -> Option<NodeId> {
        let NodeKind::StaticMember(expr) = self.tree.kind(member) else {
            return None;
        };
        let path = static_member_path(expr)?;
        let (root, rest) = path.split_first()?;
        let owner_path = &path[..path.len() - 1];

        let scopes = self.tree.scopes();
        let variable_id = scopes.find_binding(self.tree.scope(member), root)?;
        let variable = scopes.variable(variable_id);

        let found = variable
            .references
            .iter()
            .find_map(|reference| {
                let target = match self.tree.parent(*reference) {
                    Some(parent) if matches!(self.tree.kind(parent), NodeKind::StaticMember(_)) => {
                        parent
                    }
                    _ => *reference,
                };
                if self.node_path(target)? != owner_path {
                    return None;
                }
                self.assigned_value(target)
            });

        let node = match found {
            Some(node) => node,
            None => self.walk_definition(variable.definition.kind, variable.definition.node, rest)?,
        };

        tracing::trace!(member = member.index(), related = node.index(), "related component");
        components.add(node, Confidence::Maybe);
        Some(node)
    }

    /// Value written through `target`, either `target = value` or
    /// `const target = value`.
    fn assigned_value(&self, target: NodeId) -> Option<NodeId> {
        let parent = self.tree.parent(target)?;
        match (self.tree.kind(target), self.tree.kind(parent)) {
            (NodeKind::StaticMember(_) | NodeKind::Identifier(_), NodeKind::Assignment(_))
                if self.tree.children(parent).first() == Some(&target) =>
            {
                self.tree.last_child(parent)
            }
            (NodeKind::BindingIdentifier(_), NodeKind::VariableDeclarator(declarator))
                if declarator.init.is_some() =>
            {
                self.tree.last_child(parent)
            }
            _ => None,
        }
    }

    /// Follow the segments between the root and the last one through nested
    /// object literals, starting from the variable's declaration.
    fn walk_definition(
        &self,
        kind: DefinitionKind,
        definition: NodeId,
        rest: &[&'a str],
    ) -> Option<NodeId> {
        if !matches!(
            kind,
            DefinitionKind::ClassName | DefinitionKind::FunctionName | DefinitionKind::Variable
        ) {
            return None;
        }
        let mut node = match self.tree.kind(definition) {
            NodeKind::VariableDeclarator(declarator) if declarator.init.is_some() => {
                self.tree.last_child(definition)?
            }
            _ => definition,
        };

        let owner_segments = rest.len().saturating_sub(1);
        for segment in &rest[..owner_segments] {
            let NodeKind::ObjectExpression(object) = self.tree.kind(node) else {
                continue;
            };
            let index = object.properties.iter().position(|property| {
                matches!(
                    property,
                    ObjectPropertyKind::ObjectProperty(prop)
                        if property_key_name(&prop.key) == Some(*segment)
                )
            })?;
            let property = *self.tree.children(node).get(index)?;
            node = self.tree.last_child(property)?;
        }
        Some(node)
    }

    /// Dotted path of an identifier or static member node.
    fn node_path(&self, node: NodeId) -> Option<Vec<&'a str>> {
        match self.tree.kind(node) {
            NodeKind::Identifier(ident) => Some(vec![ident.name.as_str()]),
            NodeKind::BindingIdentifier(ident) => Some(vec![ident.name.as_str()]),
            NodeKind::StaticMember(expr) => static_member_path(expr),
            _ => None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // SHARED HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// First parameter of `function`, when it is a plain identifier.
    pub fn first_param_name(&self, function: NodeId) -> Option<&'a str> {
        let params = match self.tree.kind(function) {
            NodeKind::Function(func) => &func.params,
            NodeKind::ArrowFunction(arrow) => &arrow.params,
            _ => return None,
        };
        match &params.items.first()?.pattern {
            BindingPattern::BindingIdentifier(ident) => Some(ident.name.as_str()),
            _ => None,
        }
    }

    pub fn is_class_method(&self, function: NodeId) -> bool {
        self.tree
            .parent(function)
            .is_some_and(|parent| matches!(self.tree.kind(parent), NodeKind::MethodDefinition(_)))
    }
}

/// `A.B.C` as `["A", "B", "C"]`. Chains not rooted at an identifier have
/// no path.
pub fn static_member_path<'a>(expr: &StaticMemberExpression<'a>) -> Option<Vec<&'a str>> {
    let mut path = expression_path(&expr.object)?;
    path.push(expr.property.name.as_str());
    Some(path)
}

fn expression_path<'a>(expr: &Expression<'a>) -> Option<Vec<&'a str>> {
    match expr.without_parentheses() {
        Expression::Identifier(ident) => Some(vec![ident.name.as_str()]),
        Expression::StaticMemberExpression(member) => static_member_path(member),
        _ => None,
    }
}

pub fn property_key_name<'a>(key: &PropertyKey<'a>) -> Option<&'a str> {
    match key {
        PropertyKey::StaticIdentifier(ident) => Some(ident.name.as_str()),
        PropertyKey::StringLiteral(literal) => Some(literal.value.as_str()),
        _ => None,
    }
}
