//! Prop usage and prop declaration tracking.
//!
//! Runs as an always-on rule that never reports. Reads of the component's
//! props are recorded as used prop types on the nearest registered record;
//! `propTypes` objects attached to a component are recorded as declared.

use oxc_ast::ast::{
    AssignmentExpression, BindingPattern, Expression, ObjectExpression, ObjectProperty,
    ObjectPropertyKind, PropertyDefinition, StaticMemberExpression, VariableDeclarator,
};

use crate::component::property_key_name;
use crate::components::{ComponentPatch, Confidence, UsageKind, UsedPropType};
use crate::scope::DefinitionKind;
use crate::tree::{NodeId, NodeKind};
use crate::visitor::{Rule, RuleContext};

const PROP_TYPES: &str = "propTypes";

#[derive(Debug, Default)]
pub struct PropUsage;

impl PropUsage {
    pub fn new() -> Self {
        Self
    }
}

fn is_this_props(expr: &Expression<'_>) -> bool {
    matches!(
        expr.without_parentheses(),
        Expression::StaticMemberExpression(member)
            if member.property.name.as_str() == "props"
                && matches!(member.object.without_parentheses(), Expression::ThisExpression(_))
    )
}

/// Whether `expr` names the props parameter of the component it is read in:
/// the first, plain identifier parameter of that component's function.
/// Parameters of callbacks and of banned functions are not props.
fn is_props_param(ctx: &RuleContext<'_, '_>, at: NodeId, expr: &Expression<'_>) -> bool {
    let Expression::Identifier(ident) = expr.without_parentheses() else {
        return false;
    };
    let scopes = ctx.tree.scopes();
    let Some(variable) = scopes.find_binding(ctx.tree.scope(at), ident.name.as_str()) else {
        return false;
    };
    let definition = scopes.variable(variable).definition;
    if definition.kind != DefinitionKind::Parameter
        || ctx.utils.get_parent_component(at) != Some(definition.node)
    {
        return false;
    }
    let banned = ctx
        .components
        .get(definition.node)
        .is_some_and(|record| record.confidence == Confidence::Banned);
    !banned
        && !ctx.utils.is_class_method(definition.node)
        && ctx.utils.first_param_name(definition.node) == Some(ident.name.as_str())
}

fn object_keys(object: &ObjectExpression<'_>) -> Vec<String> {
    object
        .properties
        .iter()
        .filter_map(|property| match property {
            ObjectPropertyKind::ObjectProperty(prop) => property_key_name(&prop.key),
            ObjectPropertyKind::SpreadProperty(_) => None,
        })
        .map(str::to_string)
        .collect()
}

fn pattern_keys(pattern: &BindingPattern<'_>) -> Vec<String> {
    let BindingPattern::ObjectPattern(object) = pattern else {
        return Vec::new();
    };
    object
        .properties
        .iter()
        .filter_map(|property| property_key_name(&property.key))
        .map(str::to_string)
        .collect()
}

fn destructured(names: Vec<String>, node: NodeId) -> Vec<UsedPropType> {
    names
        .into_iter()
        .map(|name| UsedPropType {
            name,
            all_names: None,
            node,
            kind: UsageKind::Destructured,
        })
        .collect()
}

fn record_used(ctx: &mut RuleContext<'_, '_>, node: NodeId, used: Vec<UsedPropType>) {
    if used.is_empty() {
        return;
    }
    let tree = ctx.tree;
    ctx.components.set(
        tree,
        node,
        ComponentPatch {
            used_prop_types: Some(used),
            ..Default::default()
        },
    );
}

fn record_declared(ctx: &mut RuleContext<'_, '_>, component: NodeId, names: Vec<String>) {
    let tree = ctx.tree;
    ctx.components.set(
        tree,
        component,
        ComponentPatch {
            declared_prop_types: Some(names),
            ..Default::default()
        },
    );
}

impl<'a> Rule<'a> for PropUsage {
    fn name(&self) -> &'static str {
        "prop-usage"
    }

    /// `this.props.a.b` and `props.a`.
    fn static_member(
        &mut self,
        ctx: &mut RuleContext<'_, 'a>,
        node: NodeId,
        member: &'a StaticMemberExpression<'a>,
    ) {
        if !is_this_props(&member.object) && !is_props_param(ctx, node, &member.object) {
            return;
        }

        let tree = ctx.tree;
        let mut names = vec![member.property.name.as_str()];
        let mut current = node;
        while let Some(parent) = tree.parent(current) {
            let NodeKind::StaticMember(outer) = tree.kind(parent) else {
                break;
            };
            let is_object = tree.children(parent).first() == Some(&current);
            let is_called = tree.parent(parent).is_some_and(|grand| {
                matches!(tree.kind(grand), NodeKind::CallExpression(_))
                    && tree.children(grand).first() == Some(&parent)
            });
            if !is_object || is_called {
                break;
            }
            names.push(outer.property.name.as_str());
            current = parent;
        }

        let all_names =
            (names.len() > 1).then(|| names.iter().map(|name| name.to_string()).collect());
        let used = UsedPropType {
            name: names.join("."),
            all_names,
            node,
            kind: UsageKind::MemberAccess,
        };
        record_used(ctx, node, vec![used]);
    }

    /// `const { a, b } = this.props` and `const { a } = props`.
    fn variable_declarator(
        &mut self,
        ctx: &mut RuleContext<'_, 'a>,
        node: NodeId,
        declarator: &'a VariableDeclarator<'a>,
    ) {
        let Some(init) = &declarator.init else {
            return;
        };
        if !is_this_props(init) && !is_props_param(ctx, node, init) {
            return;
        }
        let names = pattern_keys(&declarator.id);
        record_used(ctx, node, destructured(names, node));
    }

    /// `function Foo({ a, b })`
    fn function(&mut self, ctx: &mut RuleContext<'_, 'a>, node: NodeId) {
        if ctx.utils.is_class_method(node) {
            return;
        }
        let params = match ctx.tree.kind(node) {
            NodeKind::Function(func) => &func.params,
            NodeKind::ArrowFunction(arrow) => &arrow.params,
            _ => return,
        };
        let Some(first) = params.items.first() else {
            return;
        };
        let names = pattern_keys(&first.pattern);
        record_used(ctx, node, destructured(names, node));
    }

    /// `Hello.propTypes = { ... }`
    fn assignment(
        &mut self,
        ctx: &mut RuleContext<'_, 'a>,
        node: NodeId,
        assign: &'a AssignmentExpression<'a>,
    ) {
        let Expression::ObjectExpression(object) = assign.right.without_parentheses() else {
            return;
        };
        let Some(&left) = ctx.tree.children(node).first() else {
            return;
        };
        let NodeKind::StaticMember(member) = ctx.tree.kind(left) else {
            return;
        };
        if member.property.name.as_str() != PROP_TYPES {
            return;
        }
        let utils = ctx.utils;
        if let Some(component) = utils.get_related_component(&mut ctx.components, left) {
            record_declared(ctx, component, object_keys(object));
        }
    }

    /// `static propTypes = { ... }`
    fn property_definition(
        &mut self,
        ctx: &mut RuleContext<'_, 'a>,
        node: NodeId,
        property: &'a PropertyDefinition<'a>,
    ) {
        if !property.r#static || property_key_name(&property.key) != Some(PROP_TYPES) {
            return;
        }
        let Some(Expression::ObjectExpression(object)) =
            property.value.as_ref().map(|value| value.without_parentheses())
        else {
            return;
        };
        if let Some(component) = ctx.utils.get_parent_component(node) {
            record_declared(ctx, component, object_keys(object));
        }
    }

    /// `createClass({ propTypes: { ... } })`
    fn object_property(
        &mut self,
        ctx: &mut RuleContext<'_, 'a>,
        node: NodeId,
        property: &'a ObjectProperty<'a>,
    ) {
        if property_key_name(&property.key) != Some(PROP_TYPES) {
            return;
        }
        let Expression::ObjectExpression(object) = property.value.without_parentheses() else {
            return;
        };
        let Some(owner) = ctx.tree.parent(node) else {
            return;
        };
        if ctx.utils.is_es5_component(owner) {
            record_declared(ctx, owner, object_keys(object));
        }
    }
}
