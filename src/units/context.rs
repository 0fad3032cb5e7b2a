use std::fmt::Display;
use std::str::FromStr;

use indexmap::IndexMap;
use log::{debug, info, warn};
use serde_json::Value;

use crate::config::{is_truthy, scalar_to_string, ConfigStore};
use crate::constants::keys;
use crate::error::{Error, Result};

/// How the keys of `units_map.{mode}.overrides` are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitsMapMode {
    /// Keys are unit names, values are the directories that receive the unit.
    Units,
    /// Keys are directories, values are the units they receive.
    Directories,
}

impl FromStr for UnitsMapMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "units" => Ok(UnitsMapMode::Units),
            "directories" => Ok(UnitsMapMode::Directories),
            other => Err(Error::InvalidUnitsMapMode(other.to_string())),
        }
    }
}

impl Display for UnitsMapMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UnitsMapMode::Units => "units",
            UnitsMapMode::Directories => "directories",
        };
        write!(f, "{s}")
    }
}

/// The units section of a mode.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitContext {
    pub units: Vec<String>,
    pub mode: UnitsMapMode,
    /// `units_created_by_default`
    pub defaults: bool,
    pub overrides: IndexMap<String, Vec<String>>,
}

impl UnitContext {
    /// Reads the units section.
    ///
    /// Returns `Ok(None)` when no `units_map.mode` is configured; an
    /// unrecognised mode is an error.
    pub fn resolve(store: &ConfigStore) -> Result<Option<Self>> {
        let units: Vec<String> = store.get_or(keys::UNITS, Vec::new());
        if units.is_empty() {
            info!("No units provided");
        } else {
            info!("Provided units: '[{}]'", units.join(", "));
        }

        let Some(mode) = store.get(keys::UNITS_MAP_MODE).and_then(scalar_to_string) else {
            warn!("No '{}' configured; skipping units", keys::UNITS_MAP_MODE);
            return Ok(None);
        };
        let mode: UnitsMapMode = mode.parse()?;
        debug!("Units map mode: '{mode}'");

        let section = format!("{}.{mode}", keys::UNITS_MAP);
        let defaults = store
            .get(&format!("{section}.{}", keys::UNITS_CREATED_BY_DEFAULT))
            .map(is_truthy)
            .unwrap_or(false);
        if defaults {
            info!("Units will be created by default.");
        } else {
            warn!("Units map defaults not provided or disabled; units will not be created by default");
        }

        let overrides = store
            .get(&format!("{section}.{}", keys::OVERRIDES))
            .map(parse_overrides)
            .unwrap_or_default();
        for (key, targets) in &overrides {
            let (key_label, target_label) = match mode {
                UnitsMapMode::Units => ("Unit", "Directories"),
                UnitsMapMode::Directories => ("Directory", "Units"),
            };
            debug!("{key_label} '{key}' override -> {target_label}: [{}]", targets.join(", "));
        }

        Ok(Some(Self { units, mode, defaults, overrides }))
    }
}

/// `{key: [target...]}`; a null entry is an empty list and a lone scalar a
/// one-element list.
fn parse_overrides(value: &Value) -> IndexMap<String, Vec<String>> {
    let Value::Object(entries) = value else {
        warn!("Units map overrides must be a mapping; ignoring them");
        return IndexMap::new();
    };
    entries
        .iter()
        .map(|(key, targets)| {
            let targets = match targets {
                Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
                Value::Null => Vec::new(),
                other => scalar_to_string(other).into_iter().collect(),
            };
            (key.clone(), targets)
        })
        .collect()
}
