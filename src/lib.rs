/// Handles argument parsing and runs the commands.
pub mod cli;

/// Shell commands run before and after scaffolding.
pub mod commands;

/// The component root.
pub mod component;

/// Main config, mode files and the configuration store.
pub mod config;

pub mod constants;

/// Top-level component directories.
pub mod directories;

/// Defines custom error types.
pub mod error;

pub mod ext;

/// A set of helpers for working with the file system.
pub mod ioutils;

/// Mode inspection and creation.
pub mod modes;

/// Naming conventions for generated names.
pub mod naming;

/// Template parsing and rendering functionality.
pub mod renderer;

/// Run summary.
pub mod report;

/// Template discovery, resolution and writing.
pub mod templates;

/// Tree view of a generated component.
pub mod tree;

/// Unit folders fanned out across directories.
pub mod units;
