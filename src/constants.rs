//! Constants used throughout the Foundry application

/// Default main configuration file name (without extension)
pub const DEFAULT_CONFIG_NAME: &str = "foundry";

/// Default directory searched for the main configuration file
pub const DEFAULT_CONFIG_PATH: &str = ".";

/// Extensions accepted for main and mode configuration files, in order of preference
pub const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Marker file written into every generated component root and unit folder
pub const MARKER_FILE: &str = ".gitkeep";

/// Target list meaning "all" in units map overrides
pub const WILDCARD: &str = "*";

/// Directory created next to a new mode file to hold its templates
pub const MODE_TEMPLATES_DIR: &str = "Templates";

/// Prefix for temporary component roots created by dry runs
pub const DRY_RUN_PREFIX: &str = "foundry_dry_run_";

/// Prefix for log messages describing dry-run operations
pub const DRY_RUN_MESSAGE_PREFIX: &str = "[DRY RUN] ";

/// Engine id used when a template name carries no engine suffix
pub const UNKNOWN_ENGINE: &str = "unknown";

/// Template file extensions accepted when `template_engine_extensions` is not configured
pub const DEFAULT_TEMPLATE_EXTENSIONS: &[&str] = &["mustache", "twig", "php"];

/// Engine ids registered by default
pub mod engines {
    pub const MUSTACHE: &str = "mustache";
    pub const TWIG: &str = "twig";
    pub const BLADE: &str = "blade.php";
}

/// Dot-paths into the mode configuration
pub mod keys {
    pub const COMPONENT_NAME: &str = "component_name";
    pub const COMPONENT_PATH: &str = "component_path";
    pub const DIRECTORIES: &str = "directories";
    pub const UNITS: &str = "units";
    pub const UNITS_MAP_MODE: &str = "units_map.mode";
    pub const UNITS_CREATED_BY_DEFAULT: &str = "units_created_by_default";
    pub const UNITS_MAP: &str = "units_map";
    pub const OVERRIDES: &str = "overrides";
    pub const TEMPLATES_PATH: &str = "templates_path";
    pub const TEMPLATE_ENGINE_EXTENSIONS: &str = "template_engine_extensions";
    pub const TEMPLATES_DEFAULTS: &str = "templates.defaults";
    pub const TEMPLATES_OVERRIDES: &str = "templates.overrides";
    pub const TEMPLATES_REQUIRE_EXISTING_DIRS: &str = "templates_require_existing_dirs";
    pub const NAMING_CONVENTIONS: &str = "naming_conventions";
    pub const COMMANDS_BEFORE: &str = "commands.before";
    pub const COMMANDS_AFTER: &str = "commands.after";
    pub const CLI_FLAGS: &str = "cli_flags";
    pub const MODE_METADATA: &str = "mode_metadata";
    pub const MAIN_MODE: &str = "mode";
    pub const MAIN_MODES_PATH: &str = "modes_path";
}

/// Field names inside template metadata, overrides and defaults
pub mod fields {
    pub const FILE_NAME: &str = "file_name";
    pub const FILE_PATHS: &str = "file_paths";
    pub const FILE_EXTENSION: &str = "file_extension";
    pub const FILE_DISABLED: &str = "file_disabled";
    pub const PLACEHOLDERS: &str = "placeholders";
    pub const ENGINE: &str = "engine";
}

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
