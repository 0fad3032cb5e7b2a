use crate::config::{ConfigLocation, ModeSelection};
use crate::constants::{exit_codes, verbosity, DEFAULT_CONFIG_NAME, DEFAULT_CONFIG_PATH};
use crate::modes::ModeType;
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// Declarative component scaffolding from mode files and templates.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write log records to this file instead of stderr.
    #[arg(long = "log-file", global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a component from the selected mode.
    Scaffold(ScaffoldArgs),
    /// Generate into a temporary directory, print the tree and remove it.
    DryRun(ScaffoldArgs),
    /// Print the resolved configuration of a mode.
    DumpMode(DumpModeArgs),
    /// List every available mode with its metadata.
    DumpModes(ConfigArgs),
    /// Create a new mode from a built-in skeleton.
    CreateMode(CreateModeArgs),
}

/// Where the main configuration file and the modes live.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Main configuration file name, without extension.
    #[arg(long = "config-name", default_value = DEFAULT_CONFIG_NAME)]
    pub config_name: String,

    /// Directory holding the main configuration file.
    #[arg(long = "config-path", default_value = DEFAULT_CONFIG_PATH)]
    pub config_path: PathBuf,

    /// Directory holding one sub-directory per mode. Overrides `modes_path`
    /// from the main configuration.
    #[arg(long = "modes-path")]
    pub modes_path: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn location(&self) -> ConfigLocation {
        ConfigLocation {
            config_name: self.config_name.clone(),
            config_path: self.config_path.clone(),
        }
    }
}

/// Mode selection plus `--custom` overrides.
#[derive(Args, Debug, Clone)]
pub struct ModeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Mode to run. Overrides `mode` from the main configuration.
    #[arg(long)]
    pub mode: Option<String>,

    /// Override a flag declared in the mode's `cli_flags`, as `flag=value`.
    ///
    /// Repeatable; a single value may also hold comma-separated entries.
    #[arg(long, value_name = "FLAG=VALUE")]
    pub custom: Vec<String>,
}

impl ModeArgs {
    pub fn selection(&self) -> ModeSelection {
        ModeSelection {
            location: self.config.location(),
            mode: self.mode.clone(),
            modes_path: self.config.modes_path.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ScaffoldArgs {
    #[command(flatten)]
    pub mode: ModeArgs,

    /// Print the generated component as a tree.
    #[arg(long = "tree-view")]
    pub tree_view: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DumpModeArgs {
    #[command(flatten)]
    pub mode: ModeArgs,

    /// Print the configuration as YAML instead of a tree.
    #[arg(long = "raw-yaml")]
    pub raw_yaml: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CreateModeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Name of the new mode.
    #[arg(long = "mode-name")]
    pub mode_name: String,

    /// Skeleton the mode file starts from.
    #[arg(long = "mode-type", value_enum)]
    pub mode_type: ModeType,
}

/// Parse command line arguments, printing help when a required input is missing.
pub fn parse_cli() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        if matches!(
            e.kind(),
            ErrorKind::MissingRequiredArgument
                | ErrorKind::MissingSubcommand
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        ) {
            let mut command = Cli::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            } else {
                println!();
            }
            std::process::exit(exit_codes::FAILURE);
        } else {
            e.exit();
        }
    })
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Error,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}
