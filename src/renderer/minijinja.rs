use super::filters::*;
use crate::{error::Result, renderer::interface::TemplateRenderer};
use minijinja::{value::ValueKind, AutoEscape, Environment, ErrorKind, Output, State, Value};

/// MiniJinja-based template rendering engine, configured with Twig semantics.
///
/// Output is HTML auto-escaped the way Twig escapes it (`/` is left alone).
/// `none`, undefined and `false` print as nothing, `true` prints as `1`, and
/// the trailing newline of a template is kept.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a new MiniJinjaRenderer instance with default environment.
    pub fn new() -> Self {
        let mut env = Environment::new();

        // Add all the custom filters
        env.add_filter("camel_case", to_camel_case);
        env.add_filter("kebab_case", to_kebab_case);
        env.add_filter("pascal_case", to_pascal_case);
        env.add_filter("screaming_snake_case", to_screaming_snake_case);
        env.add_filter("snake_case", to_snake_case);
        env.add_filter("table_case", to_table_case);
        env.add_filter("train_case", to_train_case);
        env.add_filter("plural", to_plural);
        env.add_filter("singular", to_singular);
        env.add_filter("foreign_key", to_foreign_key);
        env.add_filter("regex", regex_filter);

        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_formatter(twig_formatter);

        Self { env }
    }

    /// Strips the first newline after a block tag, as PHP does after a closing tag.
    pub fn with_trim_blocks(mut self, trim_blocks: bool) -> Self {
        self.env.set_trim_blocks(trim_blocks);
        self
    }

    /// Internal helper to render templates
    fn render_internal(
        &self,
        template: &str,
        context: &serde_json::Value,
        template_name: Option<&str>,
    ) -> Result<String> {
        let mut env = self.env.clone();
        let name = template_name.unwrap_or("temp");
        env.add_template(name, template)?;

        let tmpl = env.get_template(name)?;
        Ok(tmpl.render(context)?)
    }
}

fn twig_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> std::result::Result<(), minijinja::Error> {
    if value.is_undefined() || value.is_none() {
        return Ok(());
    }
    let write_failure =
        |_: std::fmt::Error| minijinja::Error::new(ErrorKind::WriteFailure, "failed to write output");
    if value.kind() == ValueKind::Bool {
        return if value.is_true() { out.write_str("1").map_err(write_failure) } else { Ok(()) };
    }
    match value.as_str() {
        Some(s) if !value.is_safe() && matches!(state.auto_escape(), AutoEscape::Html) => {
            out.write_str(&escape_markup(s, true)).map_err(write_failure)
        }
        _ => minijinja::escape_formatter(out, state, value),
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(
        &self,
        template: &str,
        context: &serde_json::Value,
        template_name: Option<&str>,
    ) -> Result<String> {
        self.render_internal(template, context, template_name)
    }
}
