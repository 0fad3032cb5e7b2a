//! On/off switches for the pipeline systems

use std::fmt::Display;

use log::warn;

use crate::config::ConfigStore;

/// A pipeline system that can be switched off from the mode file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum System {
    Directories,
    Units,
    Templates,
    CliFlags,
    NamingConventions,
    Commands,
}

impl System {
    /// Key of the `*_enabled` switch in the mode file.
    pub fn config_key(self) -> &'static str {
        match self {
            System::Directories => "directories_enabled",
            System::Units => "units_enabled",
            System::Templates => "templates_enabled",
            System::CliFlags => "cli_flags_enabled",
            System::NamingConventions => "naming_conventions_enabled",
            System::Commands => "commands_enabled",
        }
    }
}

impl Display for System {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            System::Directories => "Directories",
            System::Units => "Units",
            System::Templates => "Templates",
            System::CliFlags => "Cli Flags",
            System::NamingConventions => "Naming Conventions",
            System::Commands => "Commands",
        };
        write!(f, "{s}")
    }
}

/// Returns whether `system` may run, warning when it is switched off.
pub fn assert_enabled(store: &ConfigStore, system: System) -> bool {
    if store.is_enabled(system) {
        return true;
    }
    warn!("{system} system is disabled");
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_system_is_reported() {
        let store =
            ConfigStore::from_yaml_str("commands_enabled: false\nunits_enabled: 1", ".").unwrap();
        assert!(!assert_enabled(&store, System::Commands));
        assert!(assert_enabled(&store, System::Units));
    }

    #[test]
    fn display_names() {
        assert_eq!(System::NamingConventions.to_string(), "Naming Conventions");
        assert_eq!(System::CliFlags.config_key(), "cli_flags_enabled");
    }
}
