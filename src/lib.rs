//! # Inferno Component Detection
//!
//! Static analysis that decides which definitions in a JavaScript/JSX module
//! are Inferno components, plus a few lint rules built on that decision.
//!
//! ## Detection Model
//!
//! 1. **Registry**: every candidate definition is keyed by its syntax node and
//!    carries a confidence of `Banned`, `Maybe` or `Confirmed`. `Banned` is
//!    absorbing; otherwise the strongest evidence wins.
//!
//! 2. **Instructions**: a fixed table of per-node-kind detection handlers runs
//!    before any rule sees the same node, so rules always query an up to date
//!    registry.
//!
//! 3. **Classifiers**: class components (`extends Component`, `@extends` doc
//!    tag), factory objects (`createClass({...})`) and functions returning
//!    markup.
//!
//! 4. **Harvest**: after the walk only `Confirmed` records are reported. Props
//!    read inside unconfirmed nested functions are handed up to the nearest
//!    registered ancestor.
//!
//! ## Entry Points
//!
//! - [`lint_source`] for one file.
//! - [`lint_directory`] for a tree of files, in parallel.
//! - [`ResultCache`] to skip files whose source and configuration are
//!   unchanged.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod cache;
mod component;
mod components;
mod config;
mod diagnostic;
mod discovery;
mod doc_comment;
mod error;
mod jsx;
mod linter;
mod props;
mod rules;
mod scope;
mod tree;
mod visitor;


pub use cache::ResultCache;
pub use component::ComponentUtils;
pub use components::{Component, Components, Confidence, UsageKind, UsedPropType};
pub use config::{JsxNoBindOptions, LintConfig, Patterns, RuleSetting, RulesConfig, Settings};
pub use diagnostic::Diagnostic;
pub use discovery::{find_script_files, lint_directory, lint_file, DirectoryReport, LintFailure};
pub use doc_comment::DocTag;
pub use error::{LintError, LintResult};
pub use linter::{lint_source, ComponentKind, ComponentReport, LintOutput};
pub use rules::{JSX_NO_BIND, NO_RENDER_RETURN_VALUE, VOID_DOM_ELEMENTS_NO_CHILDREN};
pub use scope::{ScopeId, ScopeKind};
pub use tree::{NodeId, NodeKind, SyntaxTree};

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI BRIDGE
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
fn parse_config(config_json: Option<String>) -> napi::Result<LintConfig> {
    match config_json {
        Some(json) => {
            LintConfig::from_json(&json).map_err(|e| napi::Error::from_reason(e.to_string()))
        }
        None => Ok(LintConfig::default()),
    }
}

#[cfg(feature = "napi")]
#[napi]
pub fn lint_source_native(
    source: String,
    file_path: String,
    config_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let config = parse_config(config_json)?;
    let output =
        lint_source(&source, &file_path, &config).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    serde_json::to_value(output).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[cfg(feature = "napi")]
#[napi]
pub fn lint_directory_native(
    dir: String,
    config_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let config = parse_config(config_json)?;
    let report = lint_directory(std::path::Path::new(&dir), &config)
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    serde_json::to_value(report).map_err(|e| napi::Error::from_reason(e.to_string()))
}
