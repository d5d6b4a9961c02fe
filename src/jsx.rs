//! JSX-shape detection.
//!
//! A value is JSX-shaped when it is literal markup or a call to the
//! framework's element factory. Conditionals count when one branch (or,
//! in strict mode, both) is literal markup.

use oxc_ast::ast::{CallExpression, Expression, FunctionBody, Statement};

use crate::component::ComponentUtils;
use crate::scope::ScopeId;
use crate::tree::{NodeId, NodeKind};

const CREATE_ELEMENT: &str = "createElement";

fn is_markup(expr: &Expression<'_>) -> bool {
    matches!(
        expr.without_parentheses(),
        Expression::JSXElement(_) | Expression::JSXFragment(_)
    )
}

fn last_return_argument<'a>(body: &'a FunctionBody<'a>) -> Option<&'a Expression<'a>> {
    body.statements.iter().rev().find_map(|stmt| match stmt {
        Statement::ReturnStatement(ret) => Some(ret.argument.as_ref()),
        _ => None,
    })?
}

fn function_value_body<'a>(value: &'a Expression<'a>) -> Option<&'a FunctionBody<'a>> {
    match value.without_parentheses() {
        Expression::FunctionExpression(func) => func.body.as_deref(),
        Expression::ArrowFunctionExpression(arrow) if !arrow.expression => Some(&*arrow.body),
        _ => None,
    }
}

impl<'t, 'a> ComponentUtils<'t, 'a> {
    /// Whether `node` produces markup.
    ///
    /// Return statements are judged by their argument and expression-bodied
    /// arrows by their body. Anything else with a function body (functions,
    /// block arrows, methods, object properties and class fields holding a
    /// function) is judged by the last `return` of that body.
    pub fn is_returning_jsx(&self, node: NodeId, strict: bool) -> bool {
        let Some(value) = self.returned_value(node) else {
            return false;
        };
        let value = value.without_parentheses();

        let conditional = match value {
            Expression::ConditionalExpression(cond) => {
                let consequent = is_markup(&cond.consequent);
                let alternate = is_markup(&cond.alternate);
                if strict {
                    consequent && alternate
                } else {
                    consequent || alternate
                }
            }
            _ => false,
        };

        let created = match value {
            Expression::CallExpression(call) => {
                self.is_create_element_call(call, self.tree.scope(node))
            }
            _ => false,
        };

        conditional || is_markup(value) || created
    }

    fn returned_value(&self, node: NodeId) -> Option<&'a Expression<'a>> {
        match self.tree.kind(node) {
            NodeKind::ReturnStatement(ret) => ret.argument.as_ref(),
            NodeKind::ArrowFunction(arrow) if arrow.expression => arrow.get_expression(),
            NodeKind::ArrowFunction(arrow) => last_return_argument(&arrow.body),
            NodeKind::Function(func) => last_return_argument(func.body.as_deref()?),
            NodeKind::MethodDefinition(method) => last_return_argument(method.value.body.as_deref()?),
            NodeKind::ObjectProperty(prop) => last_return_argument(function_value_body(&prop.value)?),
            NodeKind::PropertyDefinition(prop) => {
                last_return_argument(function_value_body(prop.value.as_ref()?)?)
            }
            _ => None,
        }
    }

    /// `<pragma>.createElement(...)`, or a bare `createElement(...)` when
    /// the local `createElement` lives in a scope that also binds the
    /// pragma, as in `const { createElement } = Inferno`.
    pub fn is_create_element_call(&self, call: &CallExpression<'a>, scope: ScopeId) -> bool {
        let callee = call.callee.without_parentheses();
        let called_on_pragma = match callee {
            Expression::StaticMemberExpression(member) => {
                member.property.name.as_str() == CREATE_ELEMENT
                    && matches!(
                        member.object.without_parentheses(),
                        Expression::Identifier(object)
                            if object.name.as_str() == self.patterns.pragma
                    )
            }
            _ => false,
        };
        let called_directly = matches!(
            callee,
            Expression::Identifier(ident) if ident.name.as_str() == CREATE_ELEMENT
        );

        if called_directly && self.has_destructured_create_element(scope) {
            return true;
        }
        called_on_pragma
    }

    fn has_destructured_create_element(&self, scope: ScopeId) -> bool {
        let scopes = self.tree.scopes();
        scopes
            .find_binding(scope, CREATE_ELEMENT)
            .map(|variable| scopes.variable(variable).scope)
            .is_some_and(|declared_in| scopes.get(declared_in).declares(&self.patterns.pragma))
    }
}

#[cfg(test)]
mod tests {
    use crate::component::ComponentUtils;
    use crate::config::{Patterns, Settings};
    use crate::linter::parse_program;
    use crate::tree::{NodeKind, SyntaxTree};
    use oxc_allocator::Allocator;

    /// `is_returning_jsx` for every return statement, in source order.
    fn returns(source: &str, strict: bool) -> Vec<bool> {
        let allocator = Allocator::default();
        let program = parse_program(&allocator, source, "test.jsx").unwrap();
        let tree = SyntaxTree::build(source, program);
        let patterns = Patterns::compile(&Settings::default()).unwrap();
        let utils = ComponentUtils::new(&tree, &patterns);
        tree.ids()
            .filter(|id| matches!(tree.kind(*id), NodeKind::ReturnStatement(_)))
            .map(|id| utils.is_returning_jsx(id, strict))
            .collect()
    }

    #[test]
    fn test_literal_markup_and_fragments() {
        let source = "function a() { return <div />; }\n\
                      function b() { return (<><span /></>); }\n\
                      function c() { return 'div'; }\n\
                      function d() { return; }";
        assert_eq!(returns(source, false), vec![true, true, false, false]);
    }

    #[test]
    fn test_conditionals_follow_strictness() {
        let source = "function a(x) { return x ? <div /> : null; }\n\
                      function b(x) { return x ? null : <div />; }\n\
                      function c(x) { return x ? <div /> : <span />; }";
        assert_eq!(returns(source, false), vec![true, true, true]);
        assert_eq!(returns(source, true), vec![false, false, true]);
    }

    #[test]
    fn test_factory_calls() {
        let source = "function a() { return Inferno.createElement('div'); }\n\
                      function b() { return document.createElement('div'); }\n\
                      function c() { return createElement('div'); }";
        assert_eq!(returns(source, false), vec![true, false, false]);
    }

    #[test]
    fn test_create_element_bound_next_to_the_pragma() {
        let source = "import Inferno from 'inferno';\n\
                      const { createElement } = Inferno;\n\
                      function a() { return createElement('div'); }";
        assert_eq!(returns(source, false), vec![true]);

        let unrelated = "import Inferno from 'inferno';\n\
                         function a() {\n\
                           const createElement = make();\n\
                           return createElement('div');\n\
                         }";
        assert_eq!(returns(unrelated, false), vec![false]);
    }

    #[test]
    fn test_function_shaped_nodes_use_last_return() {
        let source = "const a = () => <div />;\n\
                      const b = () => { if (x) { return null; } return <div />; };\n\
                      class C { render() { return <div />; } }\n\
                      const d = { render: function () { return <p />; } };";
        let allocator = Allocator::default();
        let program = parse_program(&allocator, source, "test.jsx").unwrap();
        let tree = SyntaxTree::build(source, program);
        let patterns = Patterns::compile(&Settings::default()).unwrap();
        let utils = ComponentUtils::new(&tree, &patterns);

        let arrows: Vec<_> = tree
            .ids()
            .filter(|id| matches!(tree.kind(*id), NodeKind::ArrowFunction(_)))
            .collect();
        assert!(utils.is_returning_jsx(arrows[0], false));
        assert!(utils.is_returning_jsx(arrows[1], false));

        let method = tree
            .ids()
            .find(|id| matches!(tree.kind(*id), NodeKind::MethodDefinition(_)))
            .unwrap();
        assert!(utils.is_returning_jsx(method, false));

        let property = tree
            .ids()
            .find(|id| matches!(tree.kind(*id), NodeKind::ObjectProperty(_)))
            .unwrap();
        assert!(utils.is_returning_jsx(property, false));

        let program_node = tree.ids().next().unwrap();
        assert!(!utils.is_returning_jsx(program_node, false));
    }
}
