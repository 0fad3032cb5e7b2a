use crate::error::Result;

/// A template engine that turns a template body and its placeholders into file content.
pub trait TemplateRenderer {
    /// Renders `template` with `placeholders` as the context.
    ///
    /// `template_name` identifies the template in engine error messages; the
    /// MiniJinja-based renderers also register the template under that name.
    fn render(
        &self,
        template: &str,
        placeholders: &serde_json::Value,
        template_name: Option<&str>,
    ) -> Result<String>;
}
