//! Single-file entry point: parse, build the tree, run the detection-wrapped
//! walk and harvest the results.

use oxc_allocator::Allocator;
use oxc_ast::ast::{BindingPattern, Program};
use oxc_parser::{ParseOptions, Parser};
use oxc_span::{GetSpan, SourceType};
use serde::{Deserialize, Serialize};

use crate::component::{property_key_name, ComponentUtils};
use crate::components::Component;
use crate::config::{LintConfig, Patterns};
use crate::diagnostic::Diagnostic;
use crate::error::{LintError, LintResult};
use crate::props::PropUsage;
use crate::rules::enabled_rules;
use crate::tree::{NodeId, NodeKind, SyntaxTree};
use crate::visitor::{self, Rule, RuleContext};

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentKind {
    Class,
    CreateClass,
    Function,
    Arrow,
    Other,
}

/// A confirmed component as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentReport {
    pub kind: ComponentKind,
    pub name: Option<String>,
    pub line: u32,
    pub column: u32,
    pub used_props: Vec<String>,
    pub declared_props: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintOutput {
    pub file: String,
    pub diagnostics: Vec<Diagnostic>,
    pub components: Vec<ComponentReport>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSING
// ═══════════════════════════════════════════════════════════════════════════════

fn source_type_for(file_path: &str) -> SourceType {
    let module = SourceType::default().with_module(true);
    if file_path.ends_with(".tsx") {
        module.with_typescript(true).with_jsx(true)
    } else if file_path.ends_with(".ts") || file_path.ends_with(".mts") || file_path.ends_with(".cts") {
        module.with_typescript(true)
    } else {
        module.with_jsx(true)
    }
}

/// Parse `source` as a module. Unrecoverable syntax errors fail the file;
/// recoverable ones are logged and the partial program is kept.
pub(crate) fn parse_program<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    file_path: &str,
) -> LintResult<&'a Program<'a>> {
    let options = ParseOptions {
        preserve_parens: false,
        ..ParseOptions::default()
    };
    let ret = Parser::new(allocator, source, source_type_for(file_path))
        .with_options(options)
        .parse();

    if ret.panicked {
        let message = ret
            .errors
            .first()
            .map(|error| error.to_string())
            .unwrap_or_else(|| "unrecoverable syntax error".to_string());
        return Err(LintError::Parse {
            file: file_path.to_string(),
            message,
        });
    }
    if !ret.errors.is_empty() {
        tracing::warn!(
            file = file_path,
            errors = ret.errors.len(),
            "recovered from syntax errors"
        );
    }

    Ok(allocator.alloc(ret.program))
}

// ═══════════════════════════════════════════════════════════════════════════════
// LINTING
// ═══════════════════════════════════════════════════════════════════════════════

/// Lint one file with a fresh component registry.
pub fn lint_source(source: &str, file_path: &str, config: &LintConfig) -> LintResult<LintOutput> {
    let patterns = Patterns::compile(&config.settings)?;
    let allocator = Allocator::default();
    let program = parse_program(&allocator, source, file_path)?;
    let tree = SyntaxTree::build(source, program);

    let mut rules: Vec<Box<dyn Rule<'_>>> = vec![Box::new(PropUsage::new())];
    rules.extend(enabled_rules(&config.rules));

    let mut ctx = RuleContext::new(ComponentUtils::new(&tree, &patterns), file_path);
    visitor::walk(&mut ctx, &mut rules);
    let (components, mut diagnostics) = ctx.into_parts();

    diagnostics.sort_by_key(|diagnostic| (diagnostic.line, diagnostic.column));
    let components: Vec<ComponentReport> = components
        .list(&tree)
        .iter()
        .map(|component| report(&tree, component))
        .collect();

    tracing::debug!(
        file = file_path,
        nodes = tree.len(),
        components = components.len(),
        diagnostics = diagnostics.len(),
        "linted"
    );

    Ok(LintOutput {
        file: file_path.to_string(),
        diagnostics,
        components,
    })
}

fn report(tree: &SyntaxTree<'_>, component: &Component) -> ComponentReport {
    let node = component.node;
    let kind = match tree.kind(node) {
        NodeKind::Class(_) => ComponentKind::Class,
        NodeKind::ObjectExpression(_) => ComponentKind::CreateClass,
        NodeKind::Function(_) => ComponentKind::Function,
        NodeKind::ArrowFunction(_) => ComponentKind::Arrow,
        _ => ComponentKind::Other,
    };
    let (line, column) = tree.line_column(tree.span(node).start);
    ComponentReport {
        kind,
        name: component_name(tree, node),
        line,
        column,
        used_props: component
            .used_prop_types
            .iter()
            .map(|prop| prop.name.clone())
            .collect(),
        declared_props: component.declared_prop_types.clone(),
    }
}

/// Own identifier if any, otherwise the name of whatever the component is
/// bound to.
fn component_name(tree: &SyntaxTree<'_>, node: NodeId) -> Option<String> {
    let own = match tree.kind(node) {
        NodeKind::Class(class) => class.id.as_ref(),
        NodeKind::Function(func) => func.id.as_ref(),
        _ => None,
    };
    if let Some(id) = own {
        return Some(id.name.to_string());
    }

    let mut holder = tree.parent(node)?;
    // createClass({ ... }) is named after the call's binding.
    if matches!(tree.kind(node), NodeKind::ObjectExpression(_))
        && matches!(tree.kind(holder), NodeKind::CallExpression(_))
    {
        holder = tree.parent(holder)?;
    }

    match tree.kind(holder) {
        NodeKind::VariableDeclarator(declarator) => match &declarator.id {
            BindingPattern::BindingIdentifier(id) => Some(id.name.to_string()),
            _ => None,
        },
        NodeKind::Assignment(assign) => Some(tree.span_text(assign.left.span()).to_string()),
        NodeKind::ObjectProperty(property) => property_key_name(&property.key).map(str::to_string),
        NodeKind::PropertyDefinition(property) => {
            property_key_name(&property.key).map(str::to_string)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_follows_extension() {
        assert!(source_type_for("a.jsx").is_jsx());
        assert!(source_type_for("a.js").is_jsx());
        assert!(source_type_for("a.tsx").is_typescript());
        assert!(source_type_for("a.tsx").is_jsx());
        assert!(source_type_for("a.ts").is_typescript());
        assert!(!source_type_for("a.ts").is_jsx());
    }

    #[test]
    fn test_unrecoverable_syntax_error_fails_the_file() {
        let result = lint_source("class {", "broken.js", &LintConfig::default());
        assert!(matches!(result, Err(LintError::Parse { ref file, .. }) if file == "broken.js"));
    }

    #[test]
    fn test_component_names_and_kinds() {
        let source = "class A extends Inferno.Component { render() { return <div />; } }\n\
                      function B() { return <div />; }\n\
                      const C = () => <div />;\n\
                      const D = createClass({ render() { return <div />; } });\n\
                      Widgets.E = () => <div />;";
        let output = lint_source(source, "test.jsx", &LintConfig::default()).unwrap();
        let seen: Vec<_> = output
            .components
            .iter()
            .map(|component| (component.kind, component.name.clone().unwrap_or_default()))
            .collect();
        assert_eq!(
            seen,
            vec![
                (ComponentKind::Class, "A".to_string()),
                (ComponentKind::Function, "B".to_string()),
                (ComponentKind::Arrow, "C".to_string()),
                (ComponentKind::CreateClass, "D".to_string()),
                (ComponentKind::Arrow, "Widgets.E".to_string()),
            ]
        );
        assert_eq!((output.components[0].line, output.components[0].column), (1, 1));
        assert_eq!(output.components[1].line, 2);
    }

    #[test]
    fn test_output_serializes_in_camel_case() {
        let output = lint_source(
            "const A = (props) => <div>{props.a}</div>;",
            "test.jsx",
            &LintConfig::default(),
        )
        .unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["components"][0]["usedProps"][0], "a");
        assert_eq!(json["components"][0]["kind"], "arrow");
        assert!(json["diagnostics"].as_array().unwrap().is_empty());
    }
}
