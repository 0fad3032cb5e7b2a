//! `--custom flag=value` overrides of a mode file

use indexmap::{IndexMap, IndexSet};
use log::{info, warn};
use serde_json::Value;

use crate::config::store::scalar_to_string;
use crate::config::ConfigStore;
use crate::constants::keys;
use crate::error::Result;

/// Splits raw `--custom` arguments into unique, non-empty `flag=value` entries.
pub fn parse_provided_flags<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let unique: IndexSet<String> = raw
        .iter()
        .flat_map(|item| item.as_ref().split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    unique.into_iter().collect()
}

/// The `cli_flags` section: flag name mapped to the default value it replaces.
pub fn defined_flags(store: &ConfigStore) -> IndexMap<String, String> {
    let Some(Value::Object(map)) = store.get(keys::CLI_FLAGS) else {
        return IndexMap::new();
    };
    map.iter()
        .filter_map(|(flag, default)| scalar_to_string(default).map(|d| (flag.clone(), d)))
        .collect()
}

/// Applies provided flags to the store, returning the rebuilt store.
///
/// Each flag's default value is replaced everywhere it appears in the
/// serialized mode document, which is then parsed again.
pub fn apply_cli_flags(store: ConfigStore, provided: &[String]) -> Result<ConfigStore> {
    let defined = defined_flags(&store);
    if defined.is_empty() {
        info!("No cli flags were defined");
    }
    if provided.is_empty() {
        info!("No cli flags were provided");
        return Ok(store);
    }

    let (value, base_dir) = store.into_parts();
    let mut serialized = serde_yaml::to_string(&value)?;

    for flag in provided {
        let Some((key, provided_value)) = flag.split_once('=') else {
            warn!("Ignoring cli flag '{flag}': expected 'flag=value'");
            continue;
        };
        let Some(default_value) = defined.get(key) else {
            warn!("Ignoring cli flag '{key}': it is not defined in 'cli_flags'");
            continue;
        };
        if default_value.is_empty() {
            warn!("Ignoring cli flag '{key}': its default value is empty");
            continue;
        }
        info!(
            "'{key}' cli flag overrode the default value: '{default_value}' with the provided value: '{provided_value}'"
        );
        serialized = serialized.replace(default_value.as_str(), provided_value);
    }

    ConfigStore::from_yaml_str(&serialized, base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MODE: &str = r#"
component_name: Billing
component_path: src/Domains
cli_flags:
  component_name: Billing
  component_path: src/Domains
"#;

    #[test]
    fn provided_flags_are_split_and_deduplicated() {
        let raw = vec!["a=1,b=2", "", "a=1", "c=3"];
        assert_eq!(parse_provided_flags(&raw), vec!["a=1", "b=2", "c=3"]);
    }

    #[test]
    fn flag_replaces_every_occurrence_of_its_default() {
        let store = ConfigStore::from_yaml_str(MODE, "/modes").unwrap();
        let store = apply_cli_flags(store, &["component_name=Orders".to_string()]).unwrap();
        assert_eq!(store.get("component_name"), Some(&json!("Orders")));
        assert_eq!(store.get("cli_flags.component_name"), Some(&json!("Orders")));
        assert_eq!(store.get("component_path"), Some(&json!("src/Domains")));
        assert_eq!(store.base_dir(), std::path::Path::new("/modes"));
    }

    #[test]
    fn undefined_and_malformed_flags_are_ignored() {
        let store = ConfigStore::from_yaml_str(MODE, ".").unwrap();
        let provided = vec!["unknown=1".to_string(), "component_path".to_string()];
        let store = apply_cli_flags(store, &provided).unwrap();
        assert_eq!(store.get("component_name"), Some(&json!("Billing")));
        assert_eq!(store.get("component_path"), Some(&json!("src/Domains")));
    }
}
