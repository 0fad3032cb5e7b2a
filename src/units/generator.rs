use std::path::Path;

use log::info;

use crate::error::Result;
use crate::ioutils::create_marked_dir;
use crate::naming::NamingConvention;
use crate::report::{EntryKind, Report};
use crate::units::context::UnitContext;
use crate::units::resolver::resolve_directories;

/// Creates one marker folder per unit in each of its directories.
pub struct UnitsGenerator<'a> {
    context: &'a UnitContext,
    naming: &'a dyn NamingConvention,
}

impl<'a> UnitsGenerator<'a> {
    pub fn new(context: &'a UnitContext, naming: &'a dyn NamingConvention) -> Self {
        Self { context, naming }
    }

    /// `all_directories` is the configured `directories` list, unstyled.
    pub fn generate(
        &self,
        component_root: &Path,
        all_directories: &[String],
        report: &mut Report,
    ) -> Result<()> {
        if self.context.units.is_empty() {
            info!("No units specified, skipping unit generation");
            return Ok(());
        }

        for unit in &self.context.units {
            info!("Generating unit: '{unit}'");
            let directories = resolve_directories(
                unit,
                self.context.mode,
                &self.context.overrides,
                self.context.defaults,
                all_directories,
            );
            let styled = self.naming.apply("units", unit, unit);

            for directory in &directories {
                let path = component_root.join(directory).join(&styled);
                let label = format!("{directory}/{styled}");
                if path.exists() {
                    info!("Unit already exists at '{}', skipping creation", path.display());
                    report.skipped(EntryKind::Units, label, Some("already exists".to_string()));
                    continue;
                }
                info!("Creating unit at path: '{}'", path.display());
                create_marked_dir(&path)?;
                report.created(EntryKind::Units, path);
            }
        }
        Ok(())
    }
}
