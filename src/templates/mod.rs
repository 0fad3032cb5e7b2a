//! Template processing for Foundry
//!
//! This module contains the template pipeline, leaves first:
//! - `catalog`: discovers template files by extension
//! - `data`: splits a template into front matter and body
//! - `spec`: merges overrides, front matter and defaults into a file spec
//! - `operation` and `writer`: plan and perform the filesystem writes
//! - `generator`: runs the pipeline for every template

pub mod catalog;
pub mod context;
pub mod data;
pub mod generator;
pub mod operation;
pub mod spec;
pub mod writer;

pub use catalog::{discover, TemplateCatalog};
pub use context::TemplatesContext;
pub use data::{TemplateData, TemplateDataResolver};
pub use generator::TemplatesGenerator;
pub use operation::FileOperation;
pub use spec::{FileSpec, FileSpecResolver};
pub use writer::FileWriter;
