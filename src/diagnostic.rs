#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_span::Span;
use serde::{Deserialize, Serialize};

use crate::tree::SyntaxTree;

/// A single rule violation, positioned at the start of the offending node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub rule: String,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl Diagnostic {
    pub fn new(rule: &str, message: &str, file: &str, line: u32, column: u32) -> Self {
        Diagnostic {
            rule: rule.to_string(),
            message: message.to_string(),
            file: file.to_string(),
            line,
            column,
        }
    }

    pub fn at_span(tree: &SyntaxTree<'_>, rule: &str, message: &str, file: &str, span: Span) -> Self {
        let (line, column) = tree.line_column(span.start);
        Self::new(rule, message, file, line, column)
    }
}
