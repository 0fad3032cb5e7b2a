//! Naming conventions applied to generated component, directory, unit and file names.

pub mod style;

pub use style::Style;

use indexmap::IndexMap;
use log::{debug, error};
use serde_json::Value;

use crate::config::{is_truthy, ConfigStore};
use crate::constants::{keys, WILDCARD};

/// Turns a configured name into the name written to disk.
///
/// `system` is one of `component`, `directories`, `units` or `templates`;
/// `key` identifies the item inside that system (a unit name, a template
/// name); `value` is the text to style.
pub trait NamingConvention {
    fn apply(&self, system: &str, key: &str, value: &str) -> String;
}

/// Leaves every name untouched. Used when naming conventions are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct Verbatim;

impl NamingConvention for Verbatim {
    fn apply(&self, _system: &str, _key: &str, value: &str) -> String {
        value.to_string()
    }
}

/// A style bound to a `system:item` (or `system:*`) key.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub style: String,
    pub enabled: bool,
}

/// Rule table built from the `naming_conventions` section.
#[derive(Debug, Default, Clone)]
pub struct NamingRules {
    rules: IndexMap<String, Rule>,
}

impl NamingRules {
    pub fn from_config(store: &ConfigStore) -> Self {
        store.get(keys::NAMING_CONVENTIONS).map(Self::from_value).unwrap_or_default()
    }

    /// Builds rules from `{style: {system: {defaults: bool, overrides: [item]}}}`.
    ///
    /// With `defaults: true` the style covers every item of the system except
    /// the listed overrides; with `defaults: false` it covers only the
    /// overrides. A key keeps the first enabled rule it receives.
    pub fn from_value(section: &Value) -> Self {
        let mut rules = NamingRules::default();
        let Value::Object(styles) = section else {
            return rules;
        };

        for (style, systems) in styles {
            let Value::Object(systems) = systems else { continue };
            for (system, block) in systems {
                let Value::Object(block) = block else { continue };
                let defaults = block.get("defaults").map(is_truthy).unwrap_or(false);
                rules.set_if_not_enabled(format!("{system}:{WILDCARD}"), style, defaults);

                let overrides = block.get(keys::OVERRIDES).and_then(Value::as_array);
                for item in overrides.into_iter().flatten() {
                    let Some(item) = item.as_str() else { continue };
                    rules.set_if_not_enabled(format!("{system}:{item}"), style, !defaults);
                }
            }
        }
        rules
    }

    fn set_if_not_enabled(&mut self, key: String, style: &str, enabled: bool) {
        if self.rules.get(&key).is_some_and(|existing| existing.enabled) {
            return;
        }
        self.rules.insert(key, Rule { style: style.to_string(), enabled });
    }

    pub fn rule(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Style chosen for an item: its own rule when present, else the system wildcard.
    fn style_for(&self, system: &str, key: &str) -> Option<&str> {
        let rule = match self.rules.get(&format!("{system}:{key}")) {
            Some(rule) => rule,
            None => self.rules.get(&format!("{system}:{WILDCARD}"))?,
        };
        rule.enabled.then_some(rule.style.as_str())
    }
}

impl NamingConvention for NamingRules {
    fn apply(&self, system: &str, key: &str, value: &str) -> String {
        let Some(style_name) = self.style_for(system, key) else {
            return value.to_string();
        };
        let style = match style_name.parse::<Style>() {
            Ok(style) => style,
            Err(err) => {
                error!("{err}; leaving '{value}' unchanged");
                return value.to_string();
            }
        };

        let styled =
            value.split('/').map(|segment| style.apply(segment)).collect::<Vec<_>>().join("/");
        debug!("Applied '{style}' to {system} '{key}': '{value}' -> '{styled}'");
        styled
    }
}
