use std::process::ExitStatus;
use thiserror::Error;

use crate::constants::exit_codes;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML. Original error: {0}")]
    YamlParseError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON. Original error: {0}")]
    JSONParseError(#[from] serde_json::Error),

    #[error("Invalid regular expression. Original error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Failed to render. Original error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Failed to render. Original error: {0}")]
    HandlebarsError(#[from] handlebars::RenderError),

    /// The template name maps to an engine id that no renderer is registered for.
    #[error("Unsupported template engine '{engine}'.")]
    UnsupportedEngine { engine: String },

    /// A required file field stayed empty after merging overrides, metadata and defaults.
    #[error("Template '{template}' has no resolvable '{field}'.")]
    UnresolvedTemplateField { template: String, field: &'static str },

    #[error("Template '{template}' could not be read: {source}.")]
    TemplateUnreadable { template: String, source: std::io::Error },

    #[error("Template '{template}' has no valid paths.")]
    NoWritablePaths { template: String },

    #[error("Templates path '{path}' does not exist or is not a directory.")]
    TemplatesPathNotFound { path: String },

    #[error("Component: '{path}' already exists.")]
    ComponentExists { path: String },

    /// A configuration key that the pipeline cannot run without.
    #[error("Missing required configuration key '{key}'.")]
    MissingConfig { key: String },

    /// A pipeline stage asked for a context that no earlier stage produced.
    #[error("Context '{0}' was not found.")]
    ContextNotFound(&'static str),

    #[error("No main config file found. Tried: {tried}.")]
    MainConfigNotFound { tried: String },

    #[error("No mode config file found for '{mode}' in any subfolder of '{modes_path}'.")]
    ModeNotFound { mode: String, modes_path: String },

    #[error("Mode '{mode}' already exists at '{path}'.")]
    ModeExists { mode: String, path: String },

    #[error("Invalid mode: {0}.")]
    InvalidMode(String),

    #[error("Unknown naming style '{0}'.")]
    UnknownStyle(String),

    #[error("Unknown units map mode '{0}'. Expected 'units' or 'directories'.")]
    InvalidUnitsMapMode(String),

    #[error("Command '{command}' failed with status: {status}")]
    CommandExecutionError { command: String, status: ExitStatus },
}

impl Error {
    /// Whether the error only invalidates the current template or path.
    ///
    /// Callers recover skippable errors locally and keep the run going; every
    /// other error aborts the run.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedEngine { .. }
                | Error::UnresolvedTemplateField { .. }
                | Error::TemplateUnreadable { .. }
                | Error::NoWritablePaths { .. }
                | Error::MinijinjaError(_)
                | Error::HandlebarsError(_)
                | Error::YamlParseError(_)
        )
    }
}

/// Convenience type alias for Results with Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("Error: {err}");
    std::process::exit(exit_codes::FAILURE);
}
