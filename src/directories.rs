//! The component's top-level directories.

use std::path::Path;

use log::{debug, info};

use crate::config::ConfigStore;
use crate::constants::keys;
use crate::error::Result;
use crate::ioutils::create_dir_all;
use crate::naming::NamingConvention;
use crate::report::{EntryKind, Report};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryContext {
    /// Directory names as configured, before styling.
    pub directories: Vec<String>,
}

impl DirectoryContext {
    pub fn resolve(store: &ConfigStore) -> Self {
        let directories: Vec<String> = store.get_or(keys::DIRECTORIES, Vec::new());
        debug!("Provided directories: [{}]", directories.join(", "));
        Self { directories }
    }

    /// Creates every styled directory that does not exist yet.
    pub fn generate(
        &self,
        component_root: &Path,
        naming: &dyn NamingConvention,
        report: &mut Report,
    ) -> Result<()> {
        for dir in &self.directories {
            let styled = naming.apply("directories", dir, dir);
            let path = component_root.join(&styled);
            if path.exists() {
                debug!("Directory '{}' already exists", path.display());
                report.skipped(EntryKind::Directories, styled, Some("already exists".to_string()));
                continue;
            }
            info!("Creating Directory: '{}'", path.display());
            create_dir_all(&path)?;
            report.created(EntryKind::Directories, path);
        }
        Ok(())
    }
}
