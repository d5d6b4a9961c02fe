//! Detection-wrapped replay of the syntax index.
//!
//! [`walk`] visits every node once in pre-order. For each node the detection
//! instruction feeds the component registry first, then every enabled
//! [`Rule`] hook for that node kind runs against the same [`RuleContext`].

use oxc_ast::ast::{
    AssignmentExpression, CallExpression, JSXAttribute, JSXElement, ObjectProperty,
    PropertyDefinition, StaticMemberExpression, VariableDeclarator,
};
use oxc_span::Span;

use crate::component::ComponentUtils;
use crate::components::{Components, Confidence};
use crate::diagnostic::Diagnostic;
use crate::tree::{NodeId, NodeKind, SyntaxTree};

/// Shared state of one lint run.
///
/// Every handler, detection or rule, receives the same context, so the
/// registry reflects everything seen so far in the walk.
pub struct RuleContext<'t, 'a> {
    pub tree: &'t SyntaxTree<'a>,
    pub utils: ComponentUtils<'t, 'a>,
    pub components: Components,
    file: &'t str,
    diagnostics: Vec<Diagnostic>,
}

impl<'t, 'a> RuleContext<'t, 'a> {
    pub fn new(utils: ComponentUtils<'t, 'a>, file: &'t str) -> Self {
        Self {
            tree: utils.tree,
            utils,
            components: Components::new(),
            file,
            diagnostics: Vec::new(),
        }
    }

    pub fn report(&mut self, rule: &str, span: Span, message: &str) {
        tracing::trace!(rule, offset = span.start, message, "report");
        self.diagnostics
            .push(Diagnostic::at_span(self.tree, rule, message, self.file, span));
    }

    pub fn into_parts(self) -> (Components, Vec<Diagnostic>) {
        (self.components, self.diagnostics)
    }
}

/// A lint rule driven by the detection-wrapped walk.
///
/// Rules:
/// 1. Nodes are visited once, in pre-order.
/// 2. The detection instruction for a node always runs before any rule hook
///    for that node.
/// 3. Implementers override only the hooks they need; every hook defaults to
///    doing nothing.
pub trait Rule<'a> {
    /// Id the rule reports diagnostics under.
    fn name(&self) -> &'static str;

    fn call_expression(
        &mut self,
        _ctx: &mut RuleContext<'_, 'a>,
        _node: NodeId,
        _call: &'a CallExpression<'a>,
    ) {
    }

    fn static_member(
        &mut self,
        _ctx: &mut RuleContext<'_, 'a>,
        _node: NodeId,
        _member: &'a StaticMemberExpression<'a>,
    ) {
    }

    fn assignment(
        &mut self,
        _ctx: &mut RuleContext<'_, 'a>,
        _node: NodeId,
        _assign: &'a AssignmentExpression<'a>,
    ) {
    }

    fn variable_declarator(
        &mut self,
        _ctx: &mut RuleContext<'_, 'a>,
        _node: NodeId,
        _declarator: &'a VariableDeclarator<'a>,
    ) {
    }

    /// Function declarations, function expressions and arrows.
    fn function(&mut self, _ctx: &mut RuleContext<'_, 'a>, _node: NodeId) {}

    fn property_definition(
        &mut self,
        _ctx: &mut RuleContext<'_, 'a>,
        _node: NodeId,
        _property: &'a PropertyDefinition<'a>,
    ) {
    }

    fn object_property(
        &mut self,
        _ctx: &mut RuleContext<'_, 'a>,
        _node: NodeId,
        _property: &'a ObjectProperty<'a>,
    ) {
    }

    fn jsx_element(
        &mut self,
        _ctx: &mut RuleContext<'_, 'a>,
        _node: NodeId,
        _element: &'a JSXElement<'a>,
    ) {
    }

    fn jsx_attribute(
        &mut self,
        _ctx: &mut RuleContext<'_, 'a>,
        _node: NodeId,
        _attribute: &'a JSXAttribute<'a>,
    ) {
    }
}

/// Replay the tree through the detection instructions and `rules`.
pub fn walk<'a>(ctx: &mut RuleContext<'_, 'a>, rules: &mut [Box<dyn Rule<'a>>]) {
    let tree = ctx.tree;
    tracing::debug!(
        file = ctx.file,
        rules = ?rules.iter().map(|rule| rule.name()).collect::<Vec<_>>(),
        nodes = tree.len(),
        "walking"
    );
    for node in tree.ids() {
        detect(ctx, node);
        for rule in rules.iter_mut() {
            dispatch(rule.as_mut(), ctx, node);
        }
    }
}

fn dispatch<'a>(rule: &mut dyn Rule<'a>, ctx: &mut RuleContext<'_, 'a>, node: NodeId) {
    match ctx.tree.kind(node) {
        NodeKind::CallExpression(call) => rule.call_expression(ctx, node, call),
        NodeKind::StaticMember(member) => rule.static_member(ctx, node, member),
        NodeKind::Assignment(assign) => rule.assignment(ctx, node, assign),
        NodeKind::VariableDeclarator(declarator) => rule.variable_declarator(ctx, node, declarator),
        NodeKind::Function(_) | NodeKind::ArrowFunction(_) => rule.function(ctx, node),
        NodeKind::PropertyDefinition(property) => rule.property_definition(ctx, node, property),
        NodeKind::ObjectProperty(property) => rule.object_property(ctx, node, property),
        NodeKind::JsxElement(element) => rule.jsx_element(ctx, node, element),
        NodeKind::JsxAttribute(attribute) => rule.jsx_attribute(ctx, node, attribute),
        _ => {}
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DETECTION INSTRUCTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Feed the evidence `node` carries into the registry.
pub fn detect(ctx: &mut RuleContext<'_, '_>, node: NodeId) {
    let utils = ctx.utils;
    let tree = ctx.tree;

    match tree.kind(node) {
        NodeKind::Class(_) => {
            if utils.is_es6_component(node) {
                ctx.components.add(node, Confidence::Confirmed);
            }
        }
        NodeKind::PropertyDefinition(_) => {
            if let Some(component) = utils.get_parent_component(node) {
                ctx.components.add(component, Confidence::Confirmed);
            }
        }
        NodeKind::ObjectExpression(_) => {
            if utils.is_es5_component(node) {
                ctx.components.add(node, Confidence::Confirmed);
            }
        }
        NodeKind::Function(func) => detect_function(ctx, node, func.r#async, false),
        NodeKind::ArrowFunction(arrow) => detect_function(ctx, node, arrow.r#async, true),
        NodeKind::This => {
            let is_property_access = tree
                .parent(node)
                .is_some_and(|parent| tree.kind(parent).is_member());
            let Some(component) = utils.get_parent_component(node) else {
                return;
            };
            if is_property_access && tree.kind(component).is_function() {
                ctx.components.add(component, Confidence::Banned);
            }
        }
        NodeKind::ReturnStatement(_) => {
            if !utils.is_returning_jsx(node, false) {
                return;
            }
            match utils.get_parent_component(node) {
                Some(component) => {
                    ctx.components.add(component, Confidence::Confirmed);
                }
                None => {
                    let scopes = tree.scopes();
                    let block = scopes.get(tree.function_scope(tree.scope(node))).block;
                    ctx.components.add(block, Confidence::Maybe);
                }
            }
        }
        _ => {}
    }
}

fn detect_function(ctx: &mut RuleContext<'_, '_>, node: NodeId, is_async: bool, is_arrow: bool) {
    if is_async {
        ctx.components.add(node, Confidence::Banned);
        return;
    }
    let utils = ctx.utils;
    let tree = ctx.tree;

    let component = utils.get_parent_component(node);
    let inside_jsx = component
        .and_then(|component| tree.parent(component))
        .is_some_and(|parent| matches!(tree.kind(parent), NodeKind::JsxExpressionContainer));
    let Some(component) = component.filter(|_| !inside_jsx) else {
        ctx.components.add(node, Confidence::Banned);
        return;
    };

    let returns_jsx_directly = is_arrow
        && matches!(tree.kind(component), NodeKind::ArrowFunction(arrow) if arrow.expression)
        && utils.is_returning_jsx(component, false);
    let confidence = if returns_jsx_directly {
        Confidence::Confirmed
    } else {
        Confidence::Maybe
    };
    ctx.components.add(component, confidence);
}
