use std::path::Path;

use log::{debug, error, info};

use crate::error::{Error, Result};
use crate::ioutils::{create_dir_all, write_file};
use crate::naming::NamingConvention;
use crate::report::{EntryKind, Report};
use crate::templates::operation::FileOperation;
use crate::templates::spec::FileSpec;

/// Turns a resolved file spec and its rendered content into files under the
/// component root.
pub struct FileWriter<'a> {
    component_root: &'a Path,
    naming: &'a dyn NamingConvention,
    require_existing_dirs: bool,
    dry_run: bool,
}

impl<'a> FileWriter<'a> {
    pub fn new(
        component_root: &'a Path,
        naming: &'a dyn NamingConvention,
        require_existing_dirs: bool,
        dry_run: bool,
    ) -> Self {
        Self { component_root, naming, require_existing_dirs, dry_run }
    }

    /// File name on disk: the styled `file_name` plus `.{file_extension}`.
    pub fn file_name(&self, template_name: &str, spec: &FileSpec) -> String {
        let name = self.naming.apply("templates", template_name, &spec.file_name);
        format!("{name}.{}", spec.file_extension)
    }

    /// Plans the operations for every entry of `file_paths`.
    ///
    /// A missing directory is created, or skipped when templates require
    /// existing directories. The template fails only when no path is left.
    pub fn plan(&self, template_name: &str, spec: &FileSpec, content: &str) -> Result<Vec<FileOperation>> {
        let file_name = self.file_name(template_name, spec);
        let mut operations = Vec::new();
        let mut writable = 0;

        for entry in &spec.file_paths {
            let dir = self.component_root.join(entry.trim_matches(['/', '\\']));
            if !dir.is_dir() {
                if self.require_existing_dirs {
                    operations
                        .push(FileOperation::SkipDirectory { target: dir, file_name: file_name.clone() });
                    continue;
                }
                operations.push(FileOperation::CreateDirectory { target: dir.clone() });
            }

            let target = dir.join(&file_name);
            let target_exists = target.exists();
            operations.push(FileOperation::Write { target, content: content.to_string(), target_exists });
            writable += 1;
        }

        if writable == 0 {
            return Err(Error::NoWritablePaths { template: template_name.to_string() });
        }
        debug!("Planned {} operations for template '{template_name}'", operations.len());
        Ok(operations)
    }

    /// Executes planned operations, recording them in the report.
    pub fn apply(&self, template_name: &str, operations: &[FileOperation], report: &mut Report) -> Result<()> {
        for operation in operations {
            let message = operation.get_message(self.dry_run);
            match operation {
                FileOperation::SkipDirectory { target, .. } => {
                    error!("{message}");
                    report.skipped(
                        EntryKind::Files,
                        format!("{template_name} -> {}", target.display()),
                        Some("directory does not exist".to_string()),
                    );
                }
                FileOperation::CreateDirectory { target } => {
                    info!("{message}");
                    create_dir_all(target).inspect_err(|err| {
                        error!("Failed to {}: {err}", operation.error_context())
                    })?;
                }
                FileOperation::Write { target, content, .. } => {
                    write_file(content, target).inspect_err(|err| {
                        error!("Failed to {}: {err}", operation.error_context())
                    })?;
                    info!("{message} from template '{template_name}'");
                    report.created(EntryKind::Files, target);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ioutils::read_file;
    use crate::naming::{NamingRules, Verbatim};
    use serde_json::json;
    use tempfile::TempDir;

    fn spec(paths: &[&str]) -> FileSpec {
        FileSpec {
            file_name: "UserDto".into(),
            file_paths: paths.iter().map(|p| p.to_string()).collect(),
            file_extension: "php".into(),
            disabled: false,
            engine: "mustache".into(),
            placeholders: None,
        }
    }

    /// Billing/
    /// ├── Dtos/UserDto.php
    /// └── Http/Dtos/UserDto.php
    #[test]
    fn writes_the_same_content_to_every_path() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("Dtos")).unwrap();
        std::fs::create_dir_all(root.join("Http/Dtos")).unwrap();

        let writer = FileWriter::new(root, &Verbatim, true, false);
        let spec = spec(&["Dtos", "Http/Dtos"]);
        let ops = writer.plan("dto.mustache", &spec, "<?php").unwrap();
        let mut report = Report::new();
        writer.apply("dto.mustache", &ops, &mut report).unwrap();

        assert_eq!(read_file(root.join("Dtos/UserDto.php")).unwrap(), "<?php");
        assert_eq!(read_file(root.join("Http/Dtos/UserDto.php")).unwrap(), "<?php");
        assert_eq!(report.created_entries(EntryKind::Files).len(), 2);
    }

    #[test]
    fn missing_directory_is_skipped_when_required() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("Dtos")).unwrap();

        let writer = FileWriter::new(root, &Verbatim, true, false);
        let ops = writer.plan("dto.mustache", &spec(&["Missing", "Dtos"]), "x").unwrap();
        let mut report = Report::new();
        writer.apply("dto.mustache", &ops, &mut report).unwrap();

        assert!(!root.join("Missing").exists());
        assert!(root.join("Dtos/UserDto.php").is_file());
        assert_eq!(report.skipped_entries().len(), 1);
    }

    #[test]
    fn no_writable_path_fails_the_template() {
        let tmp = TempDir::new().unwrap();
        let writer = FileWriter::new(tmp.path(), &Verbatim, true, false);
        let err = writer.plan("dto.mustache", &spec(&["Missing"]), "x").unwrap_err();
        assert!(matches!(err, Error::NoWritablePaths { ref template } if template == "dto.mustache"));
        assert!(err.is_skippable());
    }

    #[test]
    fn missing_directory_is_created_when_allowed() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        let writer = FileWriter::new(root, &Verbatim, false, false);
        let ops = writer.plan("dto.mustache", &spec(&["Data/Dtos"]), "x").unwrap();
        assert_eq!(ops[0], FileOperation::CreateDirectory { target: root.join("Data/Dtos") });

        writer.apply("dto.mustache", &ops, &mut Report::new()).unwrap();
        assert!(root.join("Data/Dtos/UserDto.php").is_file());
    }

    #[test]
    fn file_name_is_styled_for_the_template() {
        let tmp = TempDir::new().unwrap();
        let rules = NamingRules::from_value(&json!({
            "snake_case": {"templates": {"defaults": false, "overrides": ["dto.mustache"]}}
        }));
        let writer = FileWriter::new(tmp.path(), &rules, false, false);
        assert_eq!(writer.file_name("dto.mustache", &spec(&["Dtos"])), "user_dto.php");
        assert_eq!(writer.file_name("other.mustache", &spec(&["Dtos"])), "UserDto.php");
    }
}
