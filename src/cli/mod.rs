pub mod args;
pub mod runner;

pub use args::{
    get_log_level_from_verbose, parse_cli, Cli, Commands, ConfigArgs, CreateModeArgs,
    DumpModeArgs, ModeArgs, ScaffoldArgs,
};
pub use runner::{run, Pipeline, Runner};
