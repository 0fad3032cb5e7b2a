use indexmap::IndexMap;
use log::{debug, info};

use crate::constants::WILDCARD;
use crate::units::context::UnitsMapMode;

/// Directories a unit is materialised into.
///
/// In `units` mode the unit's own override lists its directories, and `["*"]`
/// returns every directory at once. In `directories` mode every overridden
/// directory is checked: `["*"]` accepts all units, an empty list none, any
/// other list only the units it names.
///
/// With `defaults`, every directory that is not an override key is appended
/// afterwards, for every unit, including units matched by an override.
pub fn resolve_directories(
    unit: &str,
    mode: UnitsMapMode,
    overrides: &IndexMap<String, Vec<String>>,
    defaults: bool,
    all_directories: &[String],
) -> Vec<String> {
    let mut directories = match mode {
        UnitsMapMode::Units => match overrides.get(unit) {
            Some(targets) if is_wildcard(targets) => {
                debug!("'{unit}' accepts all directories");
                return all_directories.to_vec();
            }
            Some(targets) => targets.clone(),
            None => Vec::new(),
        },
        UnitsMapMode::Directories => overrides
            .iter()
            .filter(|(dir, units)| {
                if units.is_empty() {
                    debug!("Directory '{dir}' has no units; skipping");
                    false
                } else if is_wildcard(units) {
                    debug!("Directory '{dir}' applies to all units");
                    true
                } else {
                    units.iter().any(|u| u == unit)
                }
            })
            .map(|(dir, _)| dir.clone())
            .collect(),
    };

    if defaults {
        directories.extend(
            all_directories.iter().filter(|dir| !overrides.contains_key(dir.as_str())).cloned(),
        );
        debug!("Default unit creation enabled; adding '{unit}' to all non-overridden directories");
    }

    if directories.is_empty() {
        info!("No directories for unit '{unit}'");
    } else {
        info!("Directories for unit '{unit}': [{}]", directories.join(", "));
    }
    directories
}

fn is_wildcard(targets: &[String]) -> bool {
    matches!(targets, [only] if only == WILDCARD)
}
