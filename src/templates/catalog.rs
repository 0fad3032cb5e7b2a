use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Template name (file name) mapped to its absolute path, in discovery order.
pub type TemplateCatalog = IndexMap<String, PathBuf>;

/// Scans `templates_path` recursively and keeps files whose final extension is
/// in `allowed_extensions`.
///
/// Entries are visited in file-name order so runs are reproducible. Two files
/// with the same name in different sub-directories share one catalog slot;
/// the later one wins.
pub fn discover<P: AsRef<Path>>(
    templates_path: P,
    allowed_extensions: &[String],
) -> Result<TemplateCatalog> {
    let templates_path = templates_path.as_ref();
    if !templates_path.is_dir() {
        return Err(Error::TemplatesPathNotFound {
            path: templates_path.display().to_string(),
        });
    }

    let mut catalog = TemplateCatalog::new();
    for entry in WalkDir::new(templates_path).sort_by_file_name() {
        let entry = entry.map_err(|err| Error::IoError(err.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        let extension =
            path.extension().map(|ext| ext.to_string_lossy().to_string()).unwrap_or_default();

        if !allowed_extensions.iter().any(|allowed| *allowed == extension) {
            info!("Skipping '{name}': extension '{extension}' is not a template engine extension");
            continue;
        }

        if let Some(previous) = catalog.insert(name.clone(), path.to_path_buf()) {
            warn!(
                "Template '{name}' found twice; '{}' replaces '{}'",
                path.display(),
                previous.display()
            );
        }
        debug!("Discovered template '{name}' at '{}'", path.display());
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ioutils::write_file;
    use tempfile::TempDir;

    fn allowed() -> Vec<String> {
        vec!["mustache".into(), "twig".into(), "php".into()]
    }

    /// Templates/
    /// ├── dto.mustache
    /// ├── README.md
    /// └── Http/
    ///     ├── controller.twig
    ///     └── view.blade.php
    #[test]
    fn keeps_only_accepted_extensions_in_name_order() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_file("dto", root.join("dto.mustache")).unwrap();
        write_file("docs", root.join("README.md")).unwrap();
        write_file("ctrl", root.join("Http/controller.twig")).unwrap();
        write_file("view", root.join("Http/view.blade.php")).unwrap();

        let catalog = discover(root, &allowed()).unwrap();
        let names: Vec<_> = catalog.keys().cloned().collect();
        assert_eq!(names, vec!["controller.twig", "view.blade.php", "dto.mustache"]);
        assert_eq!(catalog["dto.mustache"], root.join("dto.mustache"));
    }

    #[test]
    fn files_without_extension_are_dropped() {
        let tmp = TempDir::new().unwrap();
        write_file("x", tmp.path().join("Makefile")).unwrap();
        assert!(discover(tmp.path(), &allowed()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = discover(tmp.path().join("nope"), &allowed()).unwrap_err();
        assert!(matches!(err, Error::TemplatesPathNotFound { .. }));
    }
}
