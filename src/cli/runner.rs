use crate::{
    cli::{Commands, ConfigArgs, CreateModeArgs, DumpModeArgs, ScaffoldArgs},
    commands::{CommandsContext, Phase},
    component::ComponentContext,
    config::{assert_enabled, build_store, load_mode, ConfigStore, ModeSelection, System},
    constants::{keys, DRY_RUN_MESSAGE_PREFIX, DRY_RUN_PREFIX},
    directories::DirectoryContext,
    error::{Error, Result},
    ext::PathExt,
    modes::{create_mode, render_mode_tree, render_mode_yaml, render_modes},
    naming::{NamingConvention, NamingRules, Verbatim},
    renderer::TemplateEngine,
    report::Report,
    templates::{TemplatesContext, TemplatesGenerator},
    tree::render_tree,
    units::{UnitContext, UnitsGenerator},
};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// What the stages of one run share.
///
/// Stages read their inputs from here; a stage that depends on a context no
/// earlier stage produced fails with [`Error::ContextNotFound`].
pub struct Pipeline {
    pub store: ConfigStore,
    pub naming: Box<dyn NamingConvention>,
    pub component: Option<ComponentContext>,
    pub report: Report,
    pub dry_run: bool,
}

impl Pipeline {
    pub fn new(store: ConfigStore, dry_run: bool) -> Self {
        Self {
            store,
            naming: Box::new(Verbatim),
            component: None,
            report: Report::new(),
            dry_run,
        }
    }

    pub fn component(&self) -> Result<&ComponentContext> {
        self.component.as_ref().ok_or(Error::ContextNotFound("component"))
    }

    /// Replaces the identity naming with the configured rules.
    pub fn naming_stage(&mut self) {
        if !assert_enabled(&self.store, System::NamingConventions) {
            return;
        }
        let rules = NamingRules::from_config(&self.store);
        if rules.is_empty() {
            info!("No naming conventions configured");
        }
        self.naming = Box::new(rules);
    }

    /// Resolves and creates the component root. `scratch` relocates it for dry runs.
    pub fn component_stage(&mut self, cwd: &Path, scratch: Option<&Path>) -> Result<()> {
        let mut component = ComponentContext::resolve(&self.store, self.naming.as_ref(), cwd)?;
        if let Some(base) = scratch {
            debug!("{DRY_RUN_MESSAGE_PREFIX}Component relocated under '{}'", base.display());
            component = component.rebased(base);
        }
        component.generate()?;
        self.component = Some(component);
        Ok(())
    }

    pub fn directories_stage(&mut self) -> Result<()> {
        if !assert_enabled(&self.store, System::Directories) {
            return Ok(());
        }
        let root = self.component()?.path.clone();
        DirectoryContext::resolve(&self.store).generate(&root, self.naming.as_ref(), &mut self.report)
    }

    pub fn units_stage(&mut self) -> Result<()> {
        if !assert_enabled(&self.store, System::Units) {
            return Ok(());
        }
        if !self.store.is_enabled(System::Directories) {
            warn!("Units require the directories system; skipping units");
            return Ok(());
        }
        let root = self.component()?.path.clone();
        let Some(context) = UnitContext::resolve(&self.store)? else {
            return Ok(());
        };
        let directories: Vec<String> = self.store.get_or(keys::DIRECTORIES, Vec::new());
        UnitsGenerator::new(&context, self.naming.as_ref()).generate(
            &root,
            &directories,
            &mut self.report,
        )
    }

    pub fn templates_stage(&mut self, engine: &TemplateEngine) -> Result<()> {
        if !assert_enabled(&self.store, System::Templates) {
            return Ok(());
        }
        let root = self.component()?.path.clone();
        let context = TemplatesContext::resolve(&self.store)?;
        TemplatesGenerator::new(engine, &context, self.naming.as_ref(), self.dry_run)
            .generate(&root, &mut self.report)
    }

    /// Runs the shell commands of `phase`. Dry runs never execute commands.
    pub fn commands_stage(&mut self, phase: Phase, cwd: &Path) {
        if !assert_enabled(&self.store, System::Commands) {
            return;
        }
        let context = CommandsContext::resolve(&self.store);
        if self.dry_run {
            for command in context.commands(phase) {
                info!("{DRY_RUN_MESSAGE_PREFIX}Would execute {phase} command: '{command}'");
            }
            return;
        }
        context.execute(phase, cwd, &mut self.report);
    }
}

/// Orchestrates a `scaffold` or `dry-run` invocation.
pub struct Runner {
    args: ScaffoldArgs,
    cwd: PathBuf,
    dry_run: bool,
}

impl Runner {
    pub fn new(args: ScaffoldArgs, cwd: PathBuf, dry_run: bool) -> Self {
        Self { args, cwd, dry_run }
    }

    /// Executes every stage in order, prints the summary and returns it.
    pub fn run(self) -> Result<Report> {
        let mode = load_mode(&self.args.mode.selection(), &self.cwd)?;
        let store = build_store(&mode, &self.args.mode.custom)?;
        let engine = TemplateEngine::with_defaults();
        let mut pipeline = Pipeline::new(store, self.dry_run);

        pipeline.commands_stage(Phase::Before, &self.cwd);
        pipeline.naming_stage();

        let scratch = if self.dry_run {
            Some(tempfile::Builder::new().prefix(DRY_RUN_PREFIX).tempdir()?)
        } else {
            None
        };
        pipeline.component_stage(&self.cwd, scratch.as_ref().map(|dir| dir.path()))?;
        pipeline.directories_stage()?;
        pipeline.units_stage()?;
        pipeline.templates_stage(&engine)?;
        pipeline.commands_stage(Phase::After, &self.cwd);

        let component = pipeline.component()?;
        pipeline.report.print(&component.name, &component.path);
        if self.args.tree_view || self.dry_run {
            println!();
            print!("{}", render_tree(&component.name, &component.path)?);
        }
        if let Some(dir) = scratch {
            debug!("{DRY_RUN_MESSAGE_PREFIX}Removing '{}'", dir.path().display());
            dir.close()?;
        }
        Ok(pipeline.report)
    }
}

fn modes_path(config: &ConfigArgs, cwd: &Path) -> Result<PathBuf> {
    if let Some(path) = &config.modes_path {
        return Ok(path.absolutize_from(cwd));
    }
    let selection = ModeSelection {
        location: config.location(),
        mode: None,
        modes_path: None,
    };
    Ok(selection.resolve(cwd)?.modes_path)
}

/// The resolved mode, as a tree or as YAML.
pub fn dump_mode(args: &DumpModeArgs, cwd: &Path) -> Result<String> {
    let mode = load_mode(&args.mode.selection(), cwd)?;
    let store = build_store(&mode, &args.mode.custom)?;
    if args.raw_yaml {
        render_mode_yaml(&mode.name, store.value())
    } else {
        Ok(render_mode_tree(&mode.name, store.value()))
    }
}

pub fn dump_modes(args: &ConfigArgs, cwd: &Path) -> Result<String> {
    render_modes(&modes_path(args, cwd)?)
}

pub fn new_mode(args: &CreateModeArgs, cwd: &Path) -> Result<PathBuf> {
    create_mode(&modes_path(&args.config, cwd)?, &args.mode_name, args.mode_type)
}

/// Main entry point for CLI execution
pub fn run(command: Commands) -> Result<()> {
    let cwd = std::env::current_dir()?;
    match command {
        Commands::Scaffold(args) => Runner::new(args, cwd, false).run().map(|_| ()),
        Commands::DryRun(args) => Runner::new(args, cwd, true).run().map(|_| ()),
        Commands::DumpMode(args) => {
            print!("{}", dump_mode(&args, &cwd)?);
            Ok(())
        }
        Commands::DumpModes(args) => {
            print!("{}", dump_modes(&args, &cwd)?);
            Ok(())
        }
        Commands::CreateMode(args) => {
            let path = new_mode(&args, &cwd)?;
            println!("Mode '{}' created at '{}'", args.mode_name.trim(), path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pipeline(yaml: &str) -> Pipeline {
        Pipeline::new(ConfigStore::from_yaml_str(yaml, "/modes").unwrap(), false)
    }

    #[test]
    fn stages_without_component_fail() {
        let mut pipeline = pipeline("directories: [Models]\ntemplates_path: ./Templates");
        assert!(matches!(pipeline.directories_stage(), Err(Error::ContextNotFound("component"))));
        assert!(matches!(
            pipeline.templates_stage(&TemplateEngine::with_defaults()),
            Err(Error::ContextNotFound("component"))
        ));
    }

    #[test]
    fn disabled_systems_do_not_need_component() {
        let mut pipeline = pipeline("directories_enabled: false\ntemplates_enabled: false");
        pipeline.directories_stage().unwrap();
        pipeline.units_stage().unwrap();
        pipeline.templates_stage(&TemplateEngine::with_defaults()).unwrap();
    }

    /// work/
    /// └── Billing/
    ///     ├── Models/User/.gitkeep
    ///     └── Http/
    #[test]
    fn units_follow_directories() {
        let tmp = TempDir::new().unwrap();
        let mut pipeline = pipeline(
            r#"
component_name: Billing
directories: [Models, Http]
units: [User]
units_map:
  mode: units
  units:
    overrides:
      User: [Models]
"#,
        );
        pipeline.component_stage(tmp.path(), None).unwrap();
        pipeline.directories_stage().unwrap();
        pipeline.units_stage().unwrap();

        let root = tmp.path().join("Billing");
        assert!(root.join("Models/User/.gitkeep").is_file());
        assert!(root.join("Http").is_dir());
        assert!(!root.join("Http/User").exists());
    }

    #[test]
    fn units_are_skipped_when_directories_are_disabled() {
        let tmp = TempDir::new().unwrap();
        let mut pipeline = pipeline(
            "component_name: Billing\ndirectories_enabled: false\nunits: [User]\nunits_map: {mode: units, units: {units_created_by_default: true}}\ndirectories: [Models]",
        );
        pipeline.component_stage(tmp.path(), None).unwrap();
        pipeline.units_stage().unwrap();
        assert!(!tmp.path().join("Billing/Models").exists());
    }

    #[test]
    fn naming_stage_respects_toggle() {
        let yaml = "naming_conventions:\n  snake_case:\n    component: {defaults: true}";
        let mut enabled = pipeline(yaml);
        enabled.naming_stage();
        assert_eq!(enabled.naming.apply("component", "BillingCore", "BillingCore"), "billing_core");

        let mut disabled = pipeline(&format!("naming_conventions_enabled: false\n{yaml}"));
        disabled.naming_stage();
        assert_eq!(disabled.naming.apply("component", "BillingCore", "BillingCore"), "BillingCore");
    }

    #[cfg(unix)]
    #[test]
    fn dry_run_does_not_execute_commands() {
        let tmp = TempDir::new().unwrap();
        let mut pipeline = Pipeline::new(
            ConfigStore::from_yaml_str("commands:\n  before: [\"touch ran.txt\"]", "/modes").unwrap(),
            true,
        );
        pipeline.commands_stage(Phase::Before, tmp.path());
        assert!(!tmp.path().join("ran.txt").exists());
    }

    #[test]
    fn modes_path_from_command_line_skips_main_config() {
        let args = ConfigArgs {
            config_name: "missing".into(),
            config_path: PathBuf::from("nowhere"),
            modes_path: Some(PathBuf::from("modes")),
        };
        assert_eq!(modes_path(&args, Path::new("/work")).unwrap(), Path::new("/work/modes"));
    }
}
