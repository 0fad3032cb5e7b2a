//! Mode inspection and creation: `dump-mode`, `dump-modes` and `create-mode`.

use std::fmt::{Display, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::info;
use serde_json::Value;

use crate::config::{list_modes, read_yaml, scalar_to_string};
use crate::constants::{keys, MODE_TEMPLATES_DIR};
use crate::error::{Error, Result};
use crate::ioutils::{create_dir_all, write_file};

/// Skeleton used by `create-mode`, from the most to the least annotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ModeType {
    /// Every section, with every option spelled out.
    Full,
    /// Every section with common options.
    Extended,
    /// Directories, units and templates only.
    Moderate,
    /// The keys a run cannot do without.
    Minimum,
}

impl ModeType {
    pub fn skeleton(self) -> &'static str {
        match self {
            ModeType::Full => include_str!("skeletons/full.yaml"),
            ModeType::Extended => include_str!("skeletons/extended.yaml"),
            ModeType::Moderate => include_str!("skeletons/moderate.yaml"),
            ModeType::Minimum => include_str!("skeletons/minimum.yaml"),
        }
    }
}

impl Display for ModeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ModeType::Full => "full",
            ModeType::Extended => "extended",
            ModeType::Moderate => "moderate",
            ModeType::Minimum => "minimum",
        };
        write!(f, "{s}")
    }
}

/// The mode document as a `├─`/`└─` tree; scalars print as `key → value`.
pub fn render_mode_tree(mode_name: &str, value: &Value) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "===== {mode_name} Value =====");
    match value {
        Value::Object(_) | Value::Array(_) => print_children(value, "", &mut out),
        scalar => {
            let _ = writeln!(out, "{}", display_scalar(scalar));
        }
    }
    let _ = writeln!(out, "==========");
    out
}

/// The mode document as YAML.
pub fn render_mode_yaml(mode_name: &str, value: &Value) -> Result<String> {
    let yaml = serde_yaml::to_string(value)?;
    Ok(format!("===== {mode_name} Value =====\n{yaml}==========\n"))
}

fn print_children(value: &Value, prefix: &str, out: &mut String) {
    let entries: Vec<(Option<&str>, &Value)> = match value {
        Value::Object(map) => map.iter().map(|(k, v)| (Some(k.as_str()), v)).collect(),
        Value::Array(items) => items.iter().map(|v| (None, v)).collect(),
        _ => return,
    };

    let count = entries.len();
    for (idx, (key, child)) in entries.into_iter().enumerate() {
        let last = idx + 1 == count;
        let connector = if last { "└─ " } else { "├─ " };
        let child_prefix = format!("{prefix}{}", if last { "   " } else { "│  " });

        match (key, child) {
            (Some(key), Value::Object(_) | Value::Array(_)) => {
                let _ = writeln!(out, "{prefix}{connector}{key}");
                print_children(child, &child_prefix, out);
            }
            (None, Value::Object(_) | Value::Array(_)) => {
                let _ = writeln!(out, "{prefix}{connector}[list]");
                print_children(child, &child_prefix, out);
            }
            (Some(key), scalar) => {
                let _ = writeln!(out, "{prefix}{connector}{key} → {}", display_scalar(scalar));
            }
            (None, scalar) => {
                let _ = writeln!(out, "{prefix}{connector}{}", display_scalar(scalar));
            }
        }
    }
}

fn display_scalar(value: &Value) -> String {
    scalar_to_string(value).unwrap_or_else(|| "null".to_string())
}

/// Every mode below `modes_path` with its `mode_metadata`.
pub fn render_modes(modes_path: &Path) -> Result<String> {
    let mut out = String::new();
    for (name, path) in list_modes(modes_path)? {
        let _ = writeln!(out, "{name}");
        let value = read_yaml(&path)?;
        let metadata = value.get(keys::MODE_METADATA).and_then(Value::as_object);

        match metadata {
            Some(metadata) if !metadata.is_empty() => {
                let count = metadata.len();
                for (idx, (key, value)) in metadata.iter().enumerate() {
                    let connector = if idx + 1 == count { "└─" } else { "├─" };
                    let text = scalar_to_string(value).unwrap_or_else(|| value.to_string());
                    let mut lines = text.trim().lines();
                    let _ = writeln!(out, "{connector} {key}: {}", lines.next().unwrap_or_default());
                    for line in lines {
                        let _ = writeln!(out, "   │  {line}");
                    }
                }
            }
            _ => {
                let _ = writeln!(out, "└─  <no metadata>");
            }
        }
        let _ = writeln!(out);
    }
    Ok(out)
}

/// Creates `{modes_path}/{name}/{name}.yaml` from a skeleton, plus an empty
/// templates directory. Returns the mode file path.
pub fn create_mode(modes_path: &Path, name: &str, mode_type: ModeType) -> Result<PathBuf> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidMode("No mode name given".to_string()));
    }
    if name.contains(['/', '\\']) {
        return Err(Error::InvalidMode(format!("'{name}' must not contain path separators")));
    }

    let mode_dir = modes_path.join(name);
    if mode_dir.exists() {
        return Err(Error::ModeExists {
            mode: name.to_string(),
            path: mode_dir.display().to_string(),
        });
    }

    info!("Mode type selected: '{mode_type}'");
    create_dir_all(mode_dir.join(MODE_TEMPLATES_DIR))?;
    let mode_file = mode_dir.join(format!("{name}.yaml"));
    write_file(mode_type.skeleton(), &mode_file)?;
    info!("Created mode '{name}' at path '{}'", mode_dir.display());
    Ok(mode_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn renders_nested_values_as_tree() {
        let value = json!({
            "component_name": "Billing",
            "directories": ["Models", {"name": "Http"}],
            "units_map": {"mode": "units"}
        });
        assert_eq!(
            render_mode_tree("laravel", &value),
            "===== laravel Value =====\n\
             ├─ component_name → Billing\n\
             ├─ directories\n\
             │  ├─ Models\n\
             │  └─ [list]\n\
             │     └─ name → Http\n\
             └─ units_map\n   \
             └─ mode → units\n\
             ==========\n"
        );
    }

    #[test]
    fn renders_raw_yaml() {
        let yaml = render_mode_yaml("laravel", &json!({"mode": "units"})).unwrap();
        assert_eq!(yaml, "===== laravel Value =====\nmode: units\n==========\n");
    }

    /// Modes/
    /// ├── Laravel/laravel.yaml (with metadata)
    /// └── Plain/plain.yml
    #[test]
    fn lists_modes_with_metadata() {
        let tmp = TempDir::new().unwrap();
        write_file(
            "mode_metadata:\n  author: Ann\n  description: |\n    First line\n    Second line\n",
            tmp.path().join("Laravel/laravel.yaml"),
        )
        .unwrap();
        write_file("component_name: X\n", tmp.path().join("Plain/plain.yml")).unwrap();

        assert_eq!(
            render_modes(tmp.path()).unwrap(),
            "laravel\n\
             ├─ author: Ann\n\
             └─ description: First line\n   \
             │  Second line\n\
             \n\
             plain\n\
             └─  <no metadata>\n\
             \n"
        );
    }

    #[test]
    fn creates_mode_from_skeleton() {
        let tmp = TempDir::new().unwrap();
        let path = create_mode(tmp.path(), "Api", ModeType::Minimum).unwrap();

        assert_eq!(path, tmp.path().join("Api/Api.yaml"));
        assert!(tmp.path().join("Api/Templates").is_dir());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), ModeType::Minimum.skeleton());

        let err = create_mode(tmp.path(), "Api", ModeType::Full).unwrap_err();
        assert!(matches!(err, Error::ModeExists { .. }));
        assert!(matches!(create_mode(tmp.path(), " ", ModeType::Full), Err(Error::InvalidMode(_))));
    }

    #[test]
    fn every_skeleton_is_a_valid_mode() {
        for mode_type in [ModeType::Full, ModeType::Extended, ModeType::Moderate, ModeType::Minimum] {
            let store = ConfigStore::from_yaml_str(mode_type.skeleton(), ".").unwrap();
            assert!(store.get(keys::COMPONENT_NAME).is_some(), "{mode_type}");
            assert!(store.get(keys::TEMPLATES_PATH).is_some(), "{mode_type}");
            assert!(store.value().is_object());
        }
    }
}
