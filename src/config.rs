//! Lint configuration.
//!
//! The JSON shape mirrors an ESLint config fragment:
//!
//! ```json
//! {
//!   "settings": { "pragma": "Inferno", "createClass": "createClass" },
//!   "rules": {
//!     "jsx-no-bind": { "allowArrowFunctions": true },
//!     "no-render-return-value": true,
//!     "void-dom-elements-no-children": false
//!   }
//! }
//! ```
//!
//! Every field is optional.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::LintResult;

pub const DEFAULT_PRAGMA: &str = "Inferno";
pub const DEFAULT_CREATE_CLASS: &str = "createClass";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub pragma: String,
    pub create_class: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pragma: DEFAULT_PRAGMA.to_string(),
            create_class: DEFAULT_CREATE_CLASS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct JsxNoBindOptions {
    pub allow_arrow_functions: bool,
    pub allow_bind: bool,
    pub ignore_refs: bool,
}

/// `false` disables a rule, `true` enables it with default options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RuleSetting<T> {
    Enabled(bool),
    Options(T),
}

impl<T: Default + Clone> RuleSetting<T> {
    pub fn options(&self) -> Option<T> {
        match self {
            RuleSetting::Enabled(true) => Some(T::default()),
            RuleSetting::Enabled(false) => None,
            RuleSetting::Options(options) => Some(options.clone()),
        }
    }
}

impl<T> Default for RuleSetting<T> {
    fn default() -> Self {
        RuleSetting::Enabled(true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RulesConfig {
    #[serde(rename = "jsx-no-bind")]
    pub jsx_no_bind: RuleSetting<JsxNoBindOptions>,
    #[serde(rename = "no-render-return-value")]
    pub no_render_return_value: bool,
    #[serde(rename = "void-dom-elements-no-children")]
    pub void_dom_elements_no_children: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            jsx_no_bind: RuleSetting::default(),
            no_render_return_value: true,
            void_dom_elements_no_children: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LintConfig {
    pub settings: Settings,
    pub rules: RulesConfig,
}

impl LintConfig {
    pub fn from_json(json: &str) -> LintResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Textual classifier patterns compiled once per run.
#[derive(Debug, Clone)]
pub struct Patterns {
    pub pragma: String,
    pub create_class: String,
    /// `(<pragma>.)?<createClass>`
    pub factory_callee: Regex,
    /// `(<pragma>.)?(Pure)?Component`
    pub component_superclass: Regex,
    /// `(<pragma>.)?PureComponent`
    pub pure_superclass: Regex,
}

impl Patterns {
    pub fn compile(settings: &Settings) -> LintResult<Self> {
        let pragma = regex::escape(&settings.pragma);
        let create_class = regex::escape(&settings.create_class);
        Ok(Self {
            pragma: settings.pragma.clone(),
            create_class: settings.create_class.clone(),
            factory_callee: Regex::new(&format!(r"^({pragma}\.)?{create_class}$"))?,
            component_superclass: Regex::new(&format!(r"^({pragma}\.)?(Pure)?Component$"))?,
            pure_superclass: Regex::new(&format!(r"^({pragma}\.)?PureComponent$"))?,
        })
    }

    /// Name an explicit `@extends` / `@augments` tag must carry.
    pub fn component_tag_name(&self) -> String {
        format!("{}.Component", self.pragma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_every_rule() {
        let config = LintConfig::from_json("{}").unwrap();
        assert_eq!(config.settings.pragma, "Inferno");
        assert_eq!(config.settings.create_class, "createClass");
        assert_eq!(
            config.rules.jsx_no_bind.options(),
            Some(JsxNoBindOptions::default())
        );
        assert!(config.rules.no_render_return_value);
        assert!(config.rules.void_dom_elements_no_children);
    }

    #[test]
    fn test_rule_settings_accept_bool_or_options() {
        let config = LintConfig::from_json(
            r#"{
                "settings": { "pragma": "Preact" },
                "rules": {
                    "jsx-no-bind": { "allowArrowFunctions": true, "ignoreRefs": true },
                    "void-dom-elements-no-children": false
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.settings.pragma, "Preact");
        assert_eq!(config.settings.create_class, "createClass");
        let options = config.rules.jsx_no_bind.options().unwrap();
        assert!(options.allow_arrow_functions);
        assert!(options.ignore_refs);
        assert!(!options.allow_bind);
        assert!(!config.rules.void_dom_elements_no_children);

        let disabled = LintConfig::from_json(r#"{ "rules": { "jsx-no-bind": false } }"#).unwrap();
        assert_eq!(disabled.rules.jsx_no_bind.options(), None);
    }

    #[test]
    fn test_invalid_json_is_a_config_error() {
        let err = LintConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, crate::error::LintError::Config(_)));
    }

    #[test]
    fn test_patterns_escape_the_pragma() {
        let patterns = Patterns::compile(&Settings {
            pragma: "h.x".to_string(),
            create_class: "createClass".to_string(),
        })
        .unwrap();
        assert!(patterns.factory_callee.is_match("h.x.createClass"));
        assert!(patterns.factory_callee.is_match("createClass"));
        assert!(!patterns.factory_callee.is_match("hax.createClass"));
        assert!(patterns.component_superclass.is_match("h.x.PureComponent"));
        assert!(patterns.component_superclass.is_match("Component"));
        assert!(!patterns.pure_superclass.is_match("h.x.Component"));
        assert_eq!(patterns.component_tag_name(), "h.x.Component");
    }
}
