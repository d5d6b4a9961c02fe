use std::collections::HashSet;

use lazy_static::lazy_static;
use oxc_ast::ast::{
    Argument, CallExpression, JSXAttributeItem, JSXAttributeName, JSXElement,
    JSXElementName, ObjectPropertyKind,
};

use crate::component::property_key_name;
use crate::rules::VOID_DOM_ELEMENTS_NO_CHILDREN;
use crate::tree::NodeId;
use crate::visitor::{Rule, RuleContext};

lazy_static! {
    static ref VOID_DOM_ELEMENTS: HashSet<&'static str> = [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link",
        "menuitem", "meta", "param", "source", "track", "wbr",
    ]
    .into_iter()
    .collect();
}

const CHILDREN_PROPS: &[&str] = &["children", "dangerouslySetInnerHTML"];

pub fn is_void_dom_element(name: &str) -> bool {
    VOID_DOM_ELEMENTS.contains(&name)
}

fn message(name: &str) -> String {
    format!("Void DOM element <{name} /> cannot receive children.")
}

/// Flags void DOM elements given children, either as JSX or through the
/// element factory.
#[derive(Debug, Default)]
pub struct VoidDomElementsNoChildren;

impl<'a> Rule<'a> for VoidDomElementsNoChildren {
    fn name(&self) -> &'static str {
        VOID_DOM_ELEMENTS_NO_CHILDREN
    }

    fn jsx_element(
        &mut self,
        ctx: &mut RuleContext<'_, 'a>,
        _node: NodeId,
        element: &'a JSXElement<'a>,
    ) {
        let JSXElementName::Identifier(ident) = &element.opening_element.name else {
            return;
        };
        let name = ident.name.as_str();
        if !is_void_dom_element(name) {
            return;
        }

        if !element.children.is_empty() {
            ctx.report(self.name(), element.span, &message(name));
        }

        let has_children_prop = element.opening_element.attributes.iter().any(|item| {
            matches!(
                item,
                JSXAttributeItem::Attribute(attribute)
                    if matches!(
                        &attribute.name,
                        JSXAttributeName::Identifier(attr) if CHILDREN_PROPS.contains(&attr.name.as_str())
                    )
            )
        });
        if has_children_prop {
            ctx.report(self.name(), element.span, &message(name));
        }
    }

    fn call_expression(
        &mut self,
        ctx: &mut RuleContext<'_, 'a>,
        node: NodeId,
        call: &'a CallExpression<'a>,
    ) {
        if !ctx.utils.is_create_element_call(call, ctx.tree.scope(node)) {
            return;
        }
        let Some(Argument::StringLiteral(tag)) = call.arguments.first() else {
            return;
        };
        let name = tag.value.as_str();
        if !is_void_dom_element(name) {
            return;
        }
        let Some(Argument::ObjectExpression(props)) = call.arguments.get(1) else {
            return;
        };

        if call.arguments.len() > 2 {
            ctx.report(self.name(), call.span, &message(name));
        }

        let has_children_prop = props.properties.iter().any(|property| {
            matches!(
                property,
                ObjectPropertyKind::ObjectProperty(prop)
                    if property_key_name(&prop.key).is_some_and(|key| CHILDREN_PROPS.contains(&key))
            )
        });
        if has_children_prop {
            ctx.report(self.name(), call.span, &message(name));
        }
    }
}
