//! The component root every other stage writes into.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::{scalar_to_string, ConfigStore};
use crate::constants::{keys, DEFAULT_CONFIG_PATH};
use crate::error::{Error, Result};
use crate::ext::PathExt;
use crate::ioutils::create_marked_dir;
use crate::naming::NamingConvention;

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentContext {
    /// Styled component name.
    pub name: String,
    /// Absolute component root: `{component_path}/{name}`.
    pub path: PathBuf,
}

impl ComponentContext {
    /// Resolves the component root. `component_path` is taken relative to `base`.
    pub fn resolve(store: &ConfigStore, naming: &dyn NamingConvention, base: &Path) -> Result<Self> {
        let raw_name = store
            .get(keys::COMPONENT_NAME)
            .and_then(scalar_to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| Error::MissingConfig { key: keys::COMPONENT_NAME.to_string() })?;
        let name = naming.apply("component", &raw_name, &raw_name);

        let component_path: PathBuf =
            store.get_or(keys::COMPONENT_PATH, PathBuf::from(DEFAULT_CONFIG_PATH));
        let path = component_path.join(&name).absolutize_from(base);
        debug!("Component '{name}' resolves to '{}'", path.display());

        Ok(Self { name, path })
    }

    /// Creates the component root with its marker file. An existing root aborts the run.
    pub fn generate(&self) -> Result<()> {
        if self.path.exists() {
            return Err(Error::ComponentExists { path: self.path.display().to_string() });
        }
        info!("Creating component '{}' at '{}'", self.name, self.path.display());
        create_marked_dir(&self.path)
    }

    /// Places the component under a different base directory.
    pub fn rebased(&self, base: &Path) -> Self {
        Self { name: self.name.clone(), path: base.join(&self.name) }
    }
}
