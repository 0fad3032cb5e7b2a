//! Template rendering engines
//!
//! Every engine implements [`TemplateRenderer`]; [`TemplateEngine`] maps engine
//! ids (the part of a template name after its first dot) to renderers.

mod blade;
mod filters;
mod handlebars;
mod interface;
mod minijinja;

pub use blade::BladeRenderer;
pub use filters::escape_markup;
pub use self::handlebars::HandlebarsRenderer;
pub use interface::TemplateRenderer;
pub use self::minijinja::MiniJinjaRenderer;

use indexmap::IndexMap;
use log::{debug, error};
use serde_json::{Map, Value};

use crate::constants::{engines, UNKNOWN_ENGINE};
use crate::error::{Error, Result};

/// Registry of renderers keyed by engine id.
pub struct TemplateEngine {
    renderers: IndexMap<String, Box<dyn TemplateRenderer>>,
}

impl TemplateEngine {
    /// An empty registry.
    pub fn new() -> Self {
        Self { renderers: IndexMap::new() }
    }

    /// Registry with the `mustache`, `twig` and `blade.php` engines.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.register(engines::MUSTACHE, HandlebarsRenderer::new());
        engine.register(engines::TWIG, MiniJinjaRenderer::new());
        engine.register(engines::BLADE, BladeRenderer::new());
        engine
    }

    /// Adds (or replaces) the renderer used for `id`.
    pub fn register<R: TemplateRenderer + 'static>(&mut self, id: &str, renderer: R) {
        self.renderers.insert(id.to_string(), Box::new(renderer));
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.renderers.contains_key(id)
    }

    /// Engine id for a template name.
    ///
    /// The id is the text after the first dot. When that is not a registered
    /// engine, the longest registered engine the name ends with (after a dot)
    /// is used instead, so `a.b.mustache` resolves to `mustache`. A name
    /// without a dot yields `unknown`.
    pub fn detect(&self, template_name: &str) -> String {
        let Some((_, after_first_dot)) = template_name.split_once('.') else {
            return UNKNOWN_ENGINE.to_string();
        };
        if self.is_registered(after_first_dot) {
            return after_first_dot.to_string();
        }

        self.renderers
            .keys()
            .filter(|id| {
                template_name
                    .strip_suffix(id.as_str())
                    .is_some_and(|stem| stem.ends_with('.'))
            })
            .max_by_key(|id| id.len())
            .cloned()
            .unwrap_or_else(|| after_first_dot.to_string())
    }

    /// The renderer registered for `engine`.
    pub fn renderer(&self, engine: &str) -> Result<&dyn TemplateRenderer> {
        self.renderers
            .get(engine)
            .map(|renderer| renderer.as_ref())
            .ok_or_else(|| Error::UnsupportedEngine { engine: engine.to_string() })
    }

    /// Renders `body` with `engine`.
    ///
    /// Without placeholders the body is returned as is, whatever the engine.
    pub fn render(
        &self,
        placeholders: Option<&Map<String, Value>>,
        body: &str,
        engine: &str,
        template_name: Option<&str>,
    ) -> Result<String> {
        let Some(placeholders) = placeholders else {
            debug!("No placeholders for {template_name:?}; writing the body verbatim");
            return Ok(body.to_string());
        };

        let renderer = self.renderer(engine).inspect_err(|err| error!("{err}"))?;
        renderer.render(body, &Value::Object(placeholders.clone()), template_name)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
