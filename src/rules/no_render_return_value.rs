use oxc_ast::ast::{CallExpression, Expression};
use oxc_span::GetSpan;

use crate::rules::NO_RENDER_RETURN_VALUE;
use crate::tree::{NodeId, NodeKind};
use crate::visitor::{Rule, RuleContext};

/// Flags `<pragma>.render(...)` calls whose result is stored or returned.
#[derive(Debug, Default)]
pub struct NoRenderReturnValue;

impl<'a> Rule<'a> for NoRenderReturnValue {
    fn name(&self) -> &'static str {
        NO_RENDER_RETURN_VALUE
    }

    fn call_expression(
        &mut self,
        ctx: &mut RuleContext<'_, 'a>,
        node: NodeId,
        call: &'a CallExpression<'a>,
    ) {
        let Expression::StaticMemberExpression(callee) = call.callee.without_parentheses() else {
            return;
        };
        let pragma = &ctx.utils.patterns().pragma;
        let on_pragma = matches!(
            callee.object.without_parentheses(),
            Expression::Identifier(object) if object.name.as_str() == pragma
        );
        if !on_pragma || callee.property.name.as_str() != "render" {
            return;
        }

        let tree = ctx.tree;
        let Some(parent) = tree.parent(node) else {
            return;
        };
        let uses_value = matches!(
            tree.kind(parent),
            NodeKind::VariableDeclarator(_)
                | NodeKind::ObjectProperty(_)
                | NodeKind::ReturnStatement(_)
                | NodeKind::ArrowFunction(_)
        );
        if uses_value {
            let message = format!("Do not depend on the return value from {pragma}.render");
            ctx.report(self.name(), call.callee.span(), &message);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::LintConfig;
    use crate::linter::lint_source;

    fn count(source: &str, config: &LintConfig) -> usize {
        lint_source(source, "test.jsx", config)
            .unwrap()
            .diagnostics
            .iter()
            .filter(|d| d.rule == "no-render-return-value")
            .count()
    }

    #[test]
    fn test_used_return_values_are_reported() {
        let config = LintConfig::default();
        for source in [
            "var inst = Inferno.render(<div />, document.body);",
            "var obj = { inst: Inferno.render(<div />, document.body) };",
            "function render() { return Inferno.render(<div />, document.body); }",
            "var render = (a, b) => Inferno.render(a, b);",
        ] {
            assert_eq!(count(source, &config), 1, "{source}");
        }
    }

    #[test]
    fn test_discarded_return_values_pass() {
        let config = LintConfig::default();
        for source in [
            "Inferno.render(<div />, document.body);",
            "var render = (a, b) => { Inferno.render(a, b); };",
            "var inst = ReactDOM.render(<div />, document.body);",
            "var inst = Inferno.mount(<div />, document.body);",
        ] {
            assert_eq!(count(source, &config), 0, "{source}");
        }
    }

    #[test]
    fn test_message_uses_the_configured_pragma() {
        let config = LintConfig::from_json(r#"{ "settings": { "pragma": "Preact" } }"#).unwrap();
        let output = lint_source("var inst = Preact.render(<div />, root);", "test.jsx", &config).unwrap();
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(
            output.diagnostics[0].message,
            "Do not depend on the return value from Preact.render"
        );
        assert_eq!((output.diagnostics[0].line, output.diagnostics[0].column), (1, 12));
        assert_eq!(count("var inst = Inferno.render(<div />, root);", &config), 0);
    }
}
