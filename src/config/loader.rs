//! Main config and mode file loading

use crate::constants::{keys, CONFIG_EXTENSIONS};
use crate::error::{Error, Result};
use crate::ext::PathExt;
use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// The main configuration file: which mode to run and where modes live.
#[derive(Debug, Default, Deserialize)]
pub struct MainConfig {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub modes_path: Option<PathBuf>,
}

/// Where to look for the main configuration file.
#[derive(Debug, Clone)]
pub struct ConfigLocation {
    pub config_name: String,
    pub config_path: PathBuf,
}

impl MainConfig {
    /// Loads `{config_path}/{config_name}.yaml` (or `.yml`).
    ///
    /// Returns the parsed config together with the directory it was found in,
    /// which anchors a relative `modes_path`.
    pub fn load(location: &ConfigLocation, cwd: &Path) -> Result<(Self, PathBuf)> {
        let config_dir = location.config_path.absolutize_from(cwd);
        let mut tried = Vec::new();

        for extension in CONFIG_EXTENSIONS {
            let candidate = config_dir.join(format!("{}.{extension}", location.config_name));
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)?;
                let config: MainConfig = if content.trim().is_empty() {
                    MainConfig::default()
                } else {
                    serde_yaml::from_str(&content)?
                };
                info!("Loaded main config file: '{}'", candidate.display());
                return Ok((config, config_dir));
            }
            tried.push(candidate.display().to_string());
        }

        Err(Error::MainConfigNotFound { tried: tried.join(", ") })
    }
}

/// Mode selection as given on the command line, before the main config fills the gaps.
#[derive(Debug, Clone)]
pub struct ModeSelection {
    pub location: ConfigLocation,
    pub mode: Option<String>,
    pub modes_path: Option<PathBuf>,
}

/// The modes directory and (optionally) the selected mode name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSelection {
    pub modes_path: PathBuf,
    pub mode: Option<String>,
}

impl ModeSelection {
    /// Fills missing values from the main config.
    ///
    /// The main config is only required when the command line leaves either the
    /// mode or the modes path unspecified.
    pub fn resolve(&self, cwd: &Path) -> Result<ResolvedSelection> {
        if let (Some(mode), Some(modes_path)) = (&self.mode, &self.modes_path) {
            debug!("Mode and modes path given on the command line; skipping main config");
            return Ok(ResolvedSelection {
                modes_path: modes_path.absolutize_from(cwd),
                mode: Some(mode.clone()),
            });
        }

        let (main, main_dir) = MainConfig::load(&self.location, cwd)?;

        let modes_path = match (&self.modes_path, &main.modes_path) {
            (Some(path), _) => path.absolutize_from(cwd),
            (None, Some(path)) => path.absolutize_from(&main_dir),
            (None, None) => {
                return Err(Error::MissingConfig { key: keys::MAIN_MODES_PATH.to_string() })
            }
        };
        info!("Modes path: '{}'", modes_path.display());

        let mode = self.mode.clone().or(main.mode);
        if let Some(mode) = &mode {
            info!("Loaded mode name: '{mode}'");
        }
        Ok(ResolvedSelection { modes_path, mode })
    }
}

/// A mode file read from disk.
#[derive(Debug, Clone)]
pub struct LoadedMode {
    pub name: String,
    pub path: PathBuf,
    pub value: Value,
}

impl LoadedMode {
    /// Directory holding the mode file.
    pub fn dir(&self) -> PathBuf {
        self.path.parent().map(Path::to_path_buf).unwrap_or_default()
    }
}

/// Finds `{mode}.yaml` or `{mode}.yml` in the first sub-directory of `modes_path` that has one.
pub fn find_mode(modes_path: &Path, mode: &str) -> Result<PathBuf> {
    for sub_dir in sorted_sub_dirs(modes_path)? {
        for extension in CONFIG_EXTENSIONS {
            let candidate = sub_dir.join(format!("{mode}.{extension}"));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }

    Err(Error::ModeNotFound {
        mode: mode.to_string(),
        modes_path: modes_path.display().to_string(),
    })
}

/// Lists every mode file found one level below `modes_path`, keyed by mode name.
pub fn list_modes(modes_path: &Path) -> Result<IndexMap<String, PathBuf>> {
    let mut modes = IndexMap::new();
    for sub_dir in sorted_sub_dirs(modes_path)? {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&sub_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_yaml(path))
            .collect();
        files.sort();

        for file in files {
            if let Some(name) = file.file_stem().and_then(|s| s.to_str()) {
                modes.insert(name.to_string(), file.clone());
            }
        }
    }
    Ok(modes)
}

/// Reads a YAML file into a JSON value; an empty file is an empty mapping.
pub fn read_yaml(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_yaml::from_str(&content)?;
    Ok(if value.is_null() { Value::Object(Default::default()) } else { value })
}

/// Resolves the selection and reads the chosen mode file.
pub fn load_mode(selection: &ModeSelection, cwd: &Path) -> Result<LoadedMode> {
    let resolved = selection.resolve(cwd)?;
    let name =
        resolved.mode.ok_or_else(|| Error::MissingConfig { key: keys::MAIN_MODE.to_string() })?;
    let path = find_mode(&resolved.modes_path, &name)?;
    let value = read_yaml(&path)?;
    if !value.is_object() {
        warn!("Mode file '{}' is not a mapping", path.display());
        return Err(Error::InvalidMode(format!("'{}' is not a mapping", path.display())));
    }
    info!("Mode '{name}' loaded from '{}'", path.display());
    Ok(LoadedMode { name, path, value })
}

fn sorted_sub_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| CONFIG_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}
