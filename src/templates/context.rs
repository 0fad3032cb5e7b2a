use std::path::PathBuf;

use log::debug;
use serde_json::{Map, Value};

use crate::config::{is_truthy, ConfigStore};
use crate::constants::{keys, DEFAULT_TEMPLATE_EXTENSIONS};
use crate::error::Result;
use crate::ext::PathExt;

/// Everything the templates stage reads from the mode configuration.
#[derive(Debug, Clone)]
pub struct TemplatesContext {
    /// Absolute directory scanned for templates.
    pub templates_path: PathBuf,
    /// Final file extensions accepted by the catalog.
    pub extensions: Vec<String>,
    /// `templates.defaults`: the lowest precedence layer.
    pub defaults: Map<String, Value>,
    /// `templates.overrides`, keyed by template name.
    pub overrides: Map<String, Value>,
    /// Whether missing target directories are skipped instead of created.
    pub require_existing_dirs: bool,
}

impl TemplatesContext {
    /// Reads the templates section. A missing `templates_path` is fatal.
    pub fn resolve(store: &ConfigStore) -> Result<Self> {
        let templates_path: PathBuf = store.get_required(keys::TEMPLATES_PATH)?;
        let templates_path = templates_path.absolutize_from(store.base_dir());

        let extensions = store.get_or(
            keys::TEMPLATE_ENGINE_EXTENSIONS,
            DEFAULT_TEMPLATE_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        );
        let defaults = store.get_or(keys::TEMPLATES_DEFAULTS, Map::new());
        let overrides = store.get_or(keys::TEMPLATES_OVERRIDES, Map::new());
        let require_existing_dirs =
            store.get(keys::TEMPLATES_REQUIRE_EXISTING_DIRS).map(is_truthy).unwrap_or(true);

        debug!(
            "Templates context: path '{}', extensions {extensions:?}, require existing dirs: {require_existing_dirs}",
            templates_path.display()
        );

        Ok(Self { templates_path, extensions, defaults, overrides, require_existing_dirs })
    }
}
