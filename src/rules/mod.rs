//! Rules built on the component detector.
//!
//! Each rule is a thin consumer: it asks the detector whether a node is, or
//! sits inside, a component and reports what it finds.

mod jsx_no_bind;
mod no_render_return_value;
mod void_dom_elements_no_children;

pub use jsx_no_bind::JsxNoBind;
pub use no_render_return_value::NoRenderReturnValue;
pub use void_dom_elements_no_children::VoidDomElementsNoChildren;

use crate::config::RulesConfig;
use crate::visitor::Rule;

pub const JSX_NO_BIND: &str = "jsx-no-bind";
pub const NO_RENDER_RETURN_VALUE: &str = "no-render-return-value";
pub const VOID_DOM_ELEMENTS_NO_CHILDREN: &str = "void-dom-elements-no-children";

/// Instantiate every rule `config` enables, in a fixed order.
pub fn enabled_rules<'a>(config: &RulesConfig) -> Vec<Box<dyn Rule<'a>>> {
    let mut rules: Vec<Box<dyn Rule<'a>>> = Vec::new();
    if let Some(options) = config.jsx_no_bind.options() {
        rules.push(Box::new(JsxNoBind::new(options)));
    }
    if config.no_render_return_value {
        rules.push(Box::new(NoRenderReturnValue));
    }
    if config.void_dom_elements_no_children {
        rules.push(Box::new(VoidDomElementsNoChildren));
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSetting;

    fn names(config: &RulesConfig) -> Vec<&'static str> {
        enabled_rules(config).iter().map(|rule| rule.name()).collect()
    }

    #[test]
    fn test_enabled_rules_in_order() {
        assert_eq!(
            names(&RulesConfig::default()),
            vec![JSX_NO_BIND, NO_RENDER_RETURN_VALUE, VOID_DOM_ELEMENTS_NO_CHILDREN]
        );

        let config = RulesConfig {
            jsx_no_bind: RuleSetting::Enabled(false),
            no_render_return_value: true,
            void_dom_elements_no_children: false,
        };
        assert_eq!(names(&config), vec![NO_RENDER_RETURN_VALUE]);
    }
}
