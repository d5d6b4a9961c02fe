use oxc_ast::ast::{CallExpression, Expression, JSXAttribute, JSXAttributeName, JSXAttributeValue};
use oxc_span::GetSpan;

use crate::component::property_key_name;
use crate::config::JsxNoBindOptions;
use crate::rules::JSX_NO_BIND;
use crate::tree::{NodeId, NodeKind};
use crate::visitor::{Rule, RuleContext};

const BIND_MESSAGE: &str = "JSX props should not use .bind()";
const ARROW_MESSAGE: &str = "JSX props should not use arrow functions";

/// Flags `.bind()` calls inside a `render` that returns JSX, and `.bind()`
/// calls or arrow functions passed directly as JSX props.
#[derive(Debug, Default)]
pub struct JsxNoBind {
    options: JsxNoBindOptions,
}

impl JsxNoBind {
    pub fn new(options: JsxNoBindOptions) -> Self {
        Self { options }
    }
}

fn is_bind_call(expr: &Expression<'_>) -> bool {
    let Expression::CallExpression(call) = expr.without_parentheses() else {
        return false;
    };
    is_bind_callee(&call.callee)
}

fn is_bind_callee(callee: &Expression<'_>) -> bool {
    matches!(
        callee.without_parentheses(),
        Expression::StaticMemberExpression(member) if member.property.name.as_str() == "bind"
    )
}

fn attribute_name<'a>(attribute: &JSXAttribute<'a>) -> &'a str {
    match &attribute.name {
        JSXAttributeName::Identifier(ident) => ident.name.as_str(),
        JSXAttributeName::NamespacedName(name) => name.name.name.as_str(),
    }
}

impl<'a> Rule<'a> for JsxNoBind {
    fn name(&self) -> &'static str {
        JSX_NO_BIND
    }

    fn call_expression(
        &mut self,
        ctx: &mut RuleContext<'_, 'a>,
        node: NodeId,
        call: &'a CallExpression<'a>,
    ) {
        if self.options.allow_bind || !is_bind_callee(&call.callee) {
            return;
        }
        let tree = ctx.tree;
        let render = tree.ancestors(node).find(|ancestor| {
            let key = match tree.kind(*ancestor) {
                NodeKind::MethodDefinition(method) => &method.key,
                NodeKind::ObjectProperty(property) => &property.key,
                _ => return false,
            };
            property_key_name(key) == Some("render")
        });
        if let Some(render) = render {
            if ctx.utils.is_returning_jsx(render, false) {
                ctx.report(self.name(), call.callee.span(), BIND_MESSAGE);
            }
        }
    }

    fn jsx_attribute(
        &mut self,
        ctx: &mut RuleContext<'_, 'a>,
        _node: NodeId,
        attribute: &'a JSXAttribute<'a>,
    ) {
        if self.options.ignore_refs && attribute_name(attribute) == "ref" {
            return;
        }
        let Some(JSXAttributeValue::ExpressionContainer(container)) = &attribute.value else {
            return;
        };
        let Some(value) = container.expression.as_expression() else {
            return;
        };

        if !self.options.allow_bind && is_bind_call(value) {
            ctx.report(self.name(), attribute.span, BIND_MESSAGE);
        } else if !self.options.allow_arrow_functions
            && matches!(value.without_parentheses(), Expression::ArrowFunctionExpression(_))
        {
            ctx.report(self.name(), attribute.span, ARROW_MESSAGE);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{JsxNoBindOptions, LintConfig, RuleSetting};
    use crate::linter::lint_source;

    fn messages(source: &str, options: JsxNoBindOptions) -> Vec<String> {
        let mut config = LintConfig::default();
        config.rules.jsx_no_bind = RuleSetting::Options(options);
        lint_source(source, "test.jsx", &config)
            .unwrap()
            .diagnostics
            .into_iter()
            .filter(|d| d.rule == "jsx-no-bind")
            .map(|d| d.message)
            .collect()
    }

    #[test]
    fn test_bind_and_arrow_props_are_reported() {
        let options = JsxNoBindOptions::default();
        assert_eq!(
            messages("<div onClick={this.handle.bind(this)} />;", options),
            vec!["JSX props should not use .bind()"]
        );
        assert_eq!(
            messages("<div onClick={() => go()} />;", options),
            vec!["JSX props should not use arrow functions"]
        );
        assert!(messages("<div onClick={this.handle} />;", options).is_empty());
        assert!(messages("<div onClick={function () {}} />;", options).is_empty());
    }

    #[test]
    fn test_bind_inside_render_returning_jsx() {
        let source = "class Hello extends Component {\n\
                        render() {\n\
                          const click = this.handle.bind(this);\n\
                          return <div onClick={click} />;\n\
                        }\n\
                      }";
        assert_eq!(
            messages(source, JsxNoBindOptions::default()),
            vec!["JSX props should not use .bind()"]
        );

        let not_jsx = "class Hello {\n\
                         render() { const click = this.handle.bind(this); return null; }\n\
                       }";
        assert!(messages(not_jsx, JsxNoBindOptions::default()).is_empty());

        let other_method = "class Hello extends Component {\n\
                              componentDidMount() { this.handle.bind(this); }\n\
                              render() { return <div />; }\n\
                            }";
        assert!(messages(other_method, JsxNoBindOptions::default()).is_empty());
    }

    #[test]
    fn test_options_allow_and_ignore() {
        let allow = JsxNoBindOptions {
            allow_arrow_functions: true,
            allow_bind: true,
            ignore_refs: false,
        };
        assert!(messages("<div onClick={() => go()} />;", allow).is_empty());
        assert!(messages("<div onClick={this.go.bind(this)} />;", allow).is_empty());

        let refs = JsxNoBindOptions {
            ignore_refs: true,
            ..JsxNoBindOptions::default()
        };
        assert!(messages("<div ref={(el) => (this.el = el)} />;", refs).is_empty());
        assert_eq!(
            messages("<div ref={(el) => (this.el = el)} />;", JsxNoBindOptions::default()),
            vec!["JSX props should not use arrow functions"]
        );
    }
}
