use std::path::{Path, PathBuf};

use log::{debug, warn};
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::ioutils::read_file;

/// One template file split into its front matter and body.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateData {
    pub name: String,
    pub path: PathBuf,
    pub body: String,
    /// Front matter text between the `---` fences, unparsed.
    pub raw_metadata: String,
    /// `templates.overrides.{name}`, or empty.
    pub overrides: Map<String, Value>,
}

/// Reads template files and attaches their overrides.
pub struct TemplateDataResolver {
    front_matter: Regex,
}

impl TemplateDataResolver {
    pub fn new() -> Result<Self> {
        Ok(Self { front_matter: Regex::new(r"(?s)^---\s*(.*?)\s*---\s*(.*)$")? })
    }

    /// Reads and splits one template. A file that cannot be read or is not
    /// UTF-8 fails with [`Error::TemplateUnreadable`], which only skips it.
    pub fn resolve<P: AsRef<Path>>(
        &self,
        path: P,
        name: &str,
        overrides_by_name: &Map<String, Value>,
    ) -> Result<TemplateData> {
        let path = path.as_ref();
        let content = read_file(path).map_err(|err| match err {
            Error::IoError(source) => Error::TemplateUnreadable { template: name.to_string(), source },
            other => other,
        })?;
        let (raw_metadata, body) = self.split(&content);

        let overrides = match overrides_by_name.get(name) {
            Some(Value::Object(overrides)) => overrides.clone(),
            Some(Value::Null) | None => Map::new(),
            Some(other) => {
                warn!("Overrides for template '{name}' must be a mapping, got {other}; ignoring them");
                Map::new()
            }
        };
        debug!("Resolved template data for '{name}' ({} override keys)", overrides.len());

        Ok(TemplateData {
            name: name.to_string(),
            path: path.to_path_buf(),
            body: body.to_string(),
            raw_metadata: raw_metadata.to_string(),
            overrides,
        })
    }

    /// Returns `(metadata, body)`. Without a front matter fence the metadata is
    /// empty and the body is the whole content.
    pub fn split<'a>(&self, content: &'a str) -> (&'a str, &'a str) {
        match self.front_matter.captures(content) {
            Some(caps) => {
                let metadata = caps.get(1).map_or("", |m| m.as_str());
                let body = caps.get(2).map_or("", |m| m.as_str());
                (metadata, body)
            }
            None => ("", content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ioutils::write_file;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn splits_front_matter_from_body() {
        let resolver = TemplateDataResolver::new().unwrap();
        let (metadata, body) =
            resolver.split("---\nfile_name: \"{{entity}}Dto\"\n---\n<?php\nclass X {}\n");
        assert_eq!(metadata, "file_name: \"{{entity}}Dto\"");
        assert_eq!(body, "<?php\nclass X {}\n");
    }

    #[test]
    fn content_without_fence_is_all_body() {
        let resolver = TemplateDataResolver::new().unwrap();
        assert_eq!(resolver.split("plain\n---\ntext"), ("", "plain\n---\ntext"));
    }

    #[test]
    fn attaches_overrides_by_exact_name() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dto.mustache");
        write_file("---\nfile_extension: php\n---\nbody", &path).unwrap();
        let overrides = json!({"dto.mustache": {"placeholders": {"entity": "User"}}, "dto": {"x": 1}});
        let overrides = overrides.as_object().unwrap();

        let resolver = TemplateDataResolver::new().unwrap();
        let data = resolver.resolve(&path, "dto.mustache", overrides).unwrap();
        assert_eq!(data.body, "body");
        assert_eq!(data.raw_metadata, "file_extension: php");
        assert_eq!(data.overrides.get("placeholders"), Some(&json!({"entity": "User"})));

        let data = resolver.resolve(&path, "other.mustache", overrides).unwrap();
        assert!(data.overrides.is_empty());
    }

    #[test]
    fn non_utf8_template_is_skippable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("latin1.mustache");
        std::fs::write(&path, b"caf\xe9").unwrap();

        let resolver = TemplateDataResolver::new().unwrap();
        let err = resolver.resolve(&path, "latin1.mustache", &Map::new()).unwrap_err();
        assert!(matches!(&err, Error::TemplateUnreadable { template, .. } if template == "latin1.mustache"));
        assert!(err.is_skippable());
    }
}
