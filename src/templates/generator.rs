use std::path::Path;

use log::{error, info, warn};

use crate::error::Result;
use crate::naming::NamingConvention;
use crate::renderer::TemplateEngine;
use crate::report::{EntryKind, Report};
use crate::templates::catalog::discover;
use crate::templates::context::TemplatesContext;
use crate::templates::data::TemplateDataResolver;
use crate::templates::spec::FileSpecResolver;
use crate::templates::writer::FileWriter;

/// Runs every template of the catalog, in order, into the component root.
pub struct TemplatesGenerator<'a> {
    engine: &'a TemplateEngine,
    context: &'a TemplatesContext,
    naming: &'a dyn NamingConvention,
    dry_run: bool,
}

impl<'a> TemplatesGenerator<'a> {
    pub fn new(
        engine: &'a TemplateEngine,
        context: &'a TemplatesContext,
        naming: &'a dyn NamingConvention,
        dry_run: bool,
    ) -> Self {
        Self { engine, context, naming, dry_run }
    }

    /// Generates all templates. A template that fails with a skippable error
    /// is reported and the run moves on; any other error aborts.
    pub fn generate(&self, component_root: &Path, report: &mut Report) -> Result<()> {
        let catalog = discover(&self.context.templates_path, &self.context.extensions)?;
        info!("Generating {} templates", catalog.len());

        let data_resolver = TemplateDataResolver::new()?;
        let spec_resolver = FileSpecResolver::new(self.engine, &self.context.defaults);
        let writer = FileWriter::new(
            component_root,
            self.naming,
            self.context.require_existing_dirs,
            self.dry_run,
        );

        for (name, path) in &catalog {
            let outcome = self.generate_one(name, path, &data_resolver, &spec_resolver, &writer, report);
            match outcome {
                Ok(()) => {}
                Err(err) if err.is_skippable() => {
                    error!("Skipping template '{name}': {err}");
                    report.error(EntryKind::Templates, name.as_str(), &err);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    fn generate_one(
        &self,
        name: &str,
        path: &Path,
        data_resolver: &TemplateDataResolver,
        spec_resolver: &FileSpecResolver,
        writer: &FileWriter,
        report: &mut Report,
    ) -> Result<()> {
        let data = data_resolver.resolve(path, name, &self.context.overrides)?;
        let spec = spec_resolver.resolve(&data)?;

        if spec.disabled {
            warn!("Skipping disabled template: '{name}'");
            report.skipped(EntryKind::Templates, name, Some("disabled".to_string()));
            return Ok(());
        }

        let content =
            self.engine.render(spec.placeholders.as_ref(), &data.body, &spec.engine, Some(name))?;
        let operations = writer.plan(name, &spec, &content)?;
        writer.apply(name, &operations, report)
    }
}
