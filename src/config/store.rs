//! Read-only access to the parsed mode configuration

use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::toggles::System;
use crate::error::{Error, Result};

/// Immutable view over a mode configuration document.
///
/// Values are addressed with dot paths (`units_map.units.overrides`); numeric
/// segments index into sequences. The store has no setters: every override
/// is applied while it is being built, before it is handed to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    root: Value,
    base_dir: PathBuf,
}

impl ConfigStore {
    /// Wraps a parsed document. `base_dir` anchors relative paths found in it.
    pub fn new<P: Into<PathBuf>>(root: Value, base_dir: P) -> Self {
        Self { root, base_dir: base_dir.into() }
    }

    /// Parses a YAML document into a store.
    pub fn from_yaml_str<P: Into<PathBuf>>(content: &str, base_dir: P) -> Result<Self> {
        let root: Value = serde_yaml::from_str(content)?;
        let root = if root.is_null() { Value::Object(Default::default()) } else { root };
        Ok(Self::new(root, base_dir))
    }

    /// Looks up a value by dot path. Explicit `null` values count as missing.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for segment in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        (!current.is_null()).then_some(current)
    }

    /// Deserializes the value at `path`, falling back to `default` when it is
    /// missing or has an unexpected shape.
    pub fn get_or<T: DeserializeOwned>(&self, path: &str, default: T) -> T {
        match self.get(path) {
            Some(value) => match serde_json::from_value(value.clone()) {
                Ok(parsed) => parsed,
                Err(err) => {
                    debug!("Config key '{path}' has an unexpected shape ({err}); using default");
                    default
                }
            },
            None => default,
        }
    }

    /// Deserializes the value at `path`; a missing key is a fatal wiring error.
    pub fn get_required<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value =
            self.get(path).ok_or_else(|| Error::MissingConfig { key: path.to_string() })?;
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Whether the system's `*_enabled` switch is on. Systems default to enabled.
    pub fn is_enabled(&self, system: System) -> bool {
        self.get(system.config_key()).map(is_truthy).unwrap_or(true)
    }

    /// Directory that relative paths inside the document are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The whole document.
    pub fn value(&self) -> &Value {
        &self.root
    }

    pub(crate) fn into_parts(self) -> (Value, PathBuf) {
        (self.root, self.base_dir)
    }
}

/// Loose truthiness for configuration flags: `null`, `false`, `0`, `""`, `"0"`,
/// `"false"` and empty collections are false; everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false")),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Renders a scalar for logs and file names; `None` for containers and null.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
