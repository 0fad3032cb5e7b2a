use log::{debug, warn};
use serde_json::{Map, Value};

use crate::config::{is_truthy, scalar_to_string};
use crate::constants::{engines, fields};
use crate::error::{Error, Result};
use crate::renderer::TemplateEngine;
use crate::templates::data::TemplateData;

/// Concrete description of the file a template produces.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSpec {
    pub file_name: String,
    pub file_paths: Vec<String>,
    pub file_extension: String,
    pub disabled: bool,
    pub engine: String,
    /// `None` means the body is written verbatim.
    pub placeholders: Option<Map<String, Value>>,
}

/// Merges a template's overrides, front matter and the global defaults.
pub struct FileSpecResolver<'a> {
    engine: &'a TemplateEngine,
    defaults: &'a Map<String, Value>,
}

impl<'a> FileSpecResolver<'a> {
    pub fn new(engine: &'a TemplateEngine, defaults: &'a Map<String, Value>) -> Self {
        Self { engine, defaults }
    }

    /// Resolves the file spec for one template.
    ///
    /// Steps, in order:
    /// 1. the engine id is detected from the template name;
    /// 2. placeholders are the first-wins union of the override placeholders,
    ///    the parsed front matter and the default placeholders;
    /// 3. the front matter is rendered with those placeholders through the
    ///    Mustache engine and parsed again;
    /// 4. name, paths and extension take the first non-null value of
    ///    override, rendered front matter and defaults;
    /// 5. `file_disabled` is true when any of the three layers says so.
    ///
    /// A required field that is still empty makes the template unresolvable,
    /// which callers treat as a skip.
    pub fn resolve(&self, data: &TemplateData) -> Result<FileSpec> {
        let engine = self.engine.detect(&data.name);
        let metadata = self.parse_raw_metadata(data);

        let placeholders = merge_first_wins([
            data.overrides.get(fields::PLACEHOLDERS).and_then(Value::as_object),
            Some(&metadata),
            self.defaults.get(fields::PLACEHOLDERS).and_then(Value::as_object),
        ]);
        let placeholders = (!placeholders.is_empty()).then_some(placeholders);

        let updated = self.render_metadata(data, placeholders.as_ref())?;
        let layers = [&data.overrides, &updated, self.defaults];

        let file_name = first_non_null(&layers, fields::FILE_NAME).and_then(scalar_to_string);
        let file_paths = first_non_null(&layers, fields::FILE_PATHS).map(string_list);
        let file_extension =
            first_non_null(&layers, fields::FILE_EXTENSION).and_then(scalar_to_string);
        let disabled = layers
            .iter()
            .any(|layer| layer.get(fields::FILE_DISABLED).is_some_and(is_truthy));

        let spec = FileSpec {
            file_name: required(data, fields::FILE_NAME, file_name)?,
            file_paths: required(data, fields::FILE_PATHS, file_paths)?,
            file_extension: required(data, fields::FILE_EXTENSION, file_extension)?,
            disabled,
            engine: required(data, fields::ENGINE, Some(engine))?,
            placeholders,
        };
        debug!("Resolved file spec for '{}': {spec:?}", data.name);
        Ok(spec)
    }

    /// The front matter as written, for the placeholder merge. Broken YAML is
    /// reported and treated as empty here; the rendered pass decides whether
    /// the template survives.
    fn parse_raw_metadata(&self, data: &TemplateData) -> Map<String, Value> {
        if data.raw_metadata.trim().is_empty() {
            return Map::new();
        }
        match serde_yaml::from_str::<Value>(&data.raw_metadata) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => Map::new(),
            Ok(other) => {
                warn!("Front matter of '{}' is not a mapping ({other}); ignoring it", data.name);
                Map::new()
            }
            Err(err) => {
                warn!("Front matter of '{}' is not valid YAML before rendering: {err}", data.name);
                Map::new()
            }
        }
    }

    /// Renders the front matter with the merged placeholders and parses it.
    fn render_metadata(
        &self,
        data: &TemplateData,
        placeholders: Option<&Map<String, Value>>,
    ) -> Result<Map<String, Value>> {
        if data.raw_metadata.trim().is_empty() {
            return Ok(Map::new());
        }

        let context = Value::Object(placeholders.cloned().unwrap_or_default());
        let rendered = self
            .engine
            .renderer(engines::MUSTACHE)?
            .render(&data.raw_metadata, &context, Some(&data.name))?;

        match serde_yaml::from_str::<Value>(&rendered)? {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => {
                warn!("Rendered front matter of '{}' is not a mapping ({other}); ignoring it", data.name);
                Ok(Map::new())
            }
        }
    }
}

/// Union of the given maps where a key keeps the value of the first map that has it.
pub fn merge_first_wins<'m, I>(sources: I) -> Map<String, Value>
where
    I: IntoIterator<Item = Option<&'m Map<String, Value>>>,
{
    let mut merged = Map::new();
    for source in sources.into_iter().flatten() {
        for (key, value) in source {
            if !merged.contains_key(key) {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

fn first_non_null<'v>(layers: &[&'v Map<String, Value>], key: &str) -> Option<&'v Value> {
    layers.iter().find_map(|layer| layer.get(key).filter(|value| !value.is_null()))
}

/// A list of scalars; a lone scalar counts as a one-element list.
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    }
}

fn required<T: IsEmpty>(data: &TemplateData, field: &'static str, value: Option<T>) -> Result<T> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::UnresolvedTemplateField { template: data.name.clone(), field }),
    }
}

trait IsEmpty {
    fn is_empty(&self) -> bool;
}

impl IsEmpty for String {
    fn is_empty(&self) -> bool {
        str::is_empty(self)
    }
}

impl IsEmpty for Vec<String> {
    fn is_empty(&self) -> bool {
        <[String]>::is_empty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn data(name: &str, raw_metadata: &str, overrides: Value) -> TemplateData {
        TemplateData {
            name: name.into(),
            path: PathBuf::from(format!("/templates/{name}")),
            body: String::new(),
            raw_metadata: raw_metadata.into(),
            overrides: object(overrides),
        }
    }

    fn resolve(data: &TemplateData, defaults: Value) -> Result<FileSpec> {
        let engine = TemplateEngine::with_defaults();
        let defaults = object(defaults);
        FileSpecResolver::new(&engine, &defaults).resolve(data)
    }

    #[test]
    fn dto_scenario() {
        let data = data(
            "dto.mustache",
            r#"file_name: "{{entity}}Dto""#,
            json!({"placeholders": {"entity": "User"}}),
        );
        let spec =
            resolve(&data, json!({"file_extension": "php", "file_paths": ["Dtos"]})).unwrap();

        assert_eq!(spec.file_name, "UserDto");
        assert_eq!(spec.file_extension, "php");
        assert_eq!(spec.file_paths, vec!["Dtos"]);
        assert!(!spec.disabled);
        assert_eq!(spec.engine, "mustache");
    }

    #[test]
    fn front_matter_sections_expand() {
        let data = data(
            "model.mustache",
            "file_name: Model\nfile_paths:\n{{#dirs}}\n  - {{.}}\n{{/dirs}}",
            json!({"placeholders": {"dirs": ["Models", "Http"]}}),
        );
        let spec = resolve(&data, json!({"file_extension": "php"})).unwrap();
        assert_eq!(spec.file_paths, vec!["Models", "Http"]);
    }

    #[test]
    fn fields_follow_override_then_metadata_then_defaults() {
        let defaults = json!({"file_name": "Z", "file_paths": ["Z"], "file_extension": "z"});
        let metadata = "file_name: Y\nfile_paths: [Y]\nfile_extension: ~";
        let overrides = json!({"file_name": "X"});

        let spec = resolve(&data("t.twig", metadata, overrides), defaults).unwrap();
        assert_eq!(spec.file_name, "X");
        assert_eq!(spec.file_paths, vec!["Y"]);
        assert_eq!(spec.file_extension, "z");
    }

    #[test]
    fn disabled_is_true_when_any_layer_disables() {
        let defaults = json!({"file_name": "A", "file_paths": ["A"], "file_extension": "php"});
        let cases = [
            (json!({"file_disabled": true}), "", json!({})),
            (json!({}), "file_disabled: true", json!({})),
            (json!({"file_disabled": false}), "file_disabled: false", json!({"file_disabled": true})),
        ];
        for (overrides, metadata, extra_defaults) in cases {
            let mut defaults = object(defaults.clone());
            defaults.extend(object(extra_defaults));
            let spec =
                resolve(&data("a.twig", metadata, overrides), Value::Object(defaults)).unwrap();
            assert!(spec.disabled);
        }

        let spec = resolve(&data("a.twig", "", json!({})), defaults).unwrap();
        assert!(!spec.disabled);
    }

    #[test]
    fn placeholders_merge_first_writer_wins() {
        let data = data(
            "a.mustache",
            "file_name: A\nentity: Meta\ntable: meta_table",
            json!({"placeholders": {"entity": "Override"}}),
        );
        let defaults = json!({
            "file_paths": ["A"], "file_extension": "php",
            "placeholders": {"entity": "Default", "table": "default_table", "module": "Core"}
        });
        let spec = resolve(&data, defaults.clone()).unwrap();
        let placeholders = spec.placeholders.unwrap();
        assert_eq!(placeholders["entity"], json!("Override"));
        assert_eq!(placeholders["table"], json!("meta_table"));
        assert_eq!(placeholders["module"], json!("Core"));

        let again = resolve(&data, defaults).unwrap().placeholders.unwrap();
        assert_eq!(placeholders, again);
    }

    #[test]
    fn no_placeholders_anywhere_is_none() {
        let defaults = json!({"file_name": "A", "file_paths": ["A"], "file_extension": "php"});
        let spec = resolve(&data("a.mustache", "", json!({})), defaults).unwrap();
        assert_eq!(spec.placeholders, None);
    }

    #[test]
    fn missing_required_field_is_a_skippable_error() {
        let err = resolve(&data("a.mustache", "file_name: A", json!({})), json!({"file_paths": ["A"]}))
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedTemplateField { field: "file_extension", .. }));
        assert!(err.is_skippable());

        let err = resolve(
            &data("a.mustache", "file_name: A\nfile_paths: []", json!({})),
            json!({"file_extension": "php", "file_paths": ["ignored"]}),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnresolvedTemplateField { field: "file_paths", .. }));
    }

    #[test]
    fn template_without_dot_has_no_usable_engine() {
        let defaults = json!({"file_name": "A", "file_paths": ["A"], "file_extension": "php"});
        let spec = resolve(&data("noext", "", json!({})), defaults).unwrap();
        assert_eq!(spec.engine, "unknown");
    }

    #[test]
    fn broken_rendered_front_matter_is_skippable() {
        let err = resolve(&data("a.mustache", "file_name: [unclosed", json!({})), json!({}))
            .unwrap_err();
        assert!(err.is_skippable());
    }

    #[test]
    fn merge_handles_missing_sources() {
        let first = object(json!({"a": 1}));
        let merged = merge_first_wins([None, Some(&first), None]);
        assert_eq!(merged, first);
    }
}
