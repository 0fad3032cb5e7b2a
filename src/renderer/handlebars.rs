//! Mustache templates rendered through Handlebars.
//!
//! Handlebars reads most of Mustache as is. Sections do not: `{{#name}}` and
//! `{{^name}}` are rewritten into calls to [`SECTION_HELPER`] and `unless`
//! before rendering, so lists iterate, objects push a scope and inverted
//! sections render on falsy values.

use super::filters::*;
use crate::{error::Result, renderer::interface::TemplateRenderer};
use handlebars::{
    handlebars_helper, BlockContext, Context, Handlebars, Helper, HelperDef, HelperResult,
    JsonTruthy, Output, RenderContext, Renderable, Template,
};
use log::trace;
use serde_json::Value;

handlebars_helper!(camel_case: |s: str| to_camel_case(s));
handlebars_helper!(kebab_case: |s: str| to_kebab_case(s));
handlebars_helper!(pascal_case: |s: str| to_pascal_case(s));
handlebars_helper!(screaming_snake_case: |s: str| to_screaming_snake_case(s));
handlebars_helper!(snake_case: |s: str| to_snake_case(s));
handlebars_helper!(plural: |s: str| to_plural(s));
handlebars_helper!(singular: |s: str| to_singular(s));

/// Block helper standing in for a Mustache section.
pub const SECTION_HELPER: &str = "mustache_section";

/// Handlebars block keywords; a `{{#keyword ...}}` block is kept as written.
const BLOCK_KEYWORDS: &[&str] = &["each", "if", "unless", "with", "lookup"];

/// Logic-less rendering for `.mustache` templates.
///
/// Missing variables render as empty strings and `{{ }}` output is escaped
/// the way Mustache escapes it (`& < > "`); `{{{ }}}` and `{{& }}` stay raw.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_escape_fn(|value| escape_markup(value, false));

        registry.register_helper(SECTION_HELPER, Box::new(Section));
        registry.register_helper("camel_case", Box::new(camel_case));
        registry.register_helper("kebab_case", Box::new(kebab_case));
        registry.register_helper("pascal_case", Box::new(pascal_case));
        registry.register_helper("screaming_snake_case", Box::new(screaming_snake_case));
        registry.register_helper("snake_case", Box::new(snake_case));
        registry.register_helper("plural", Box::new(plural));
        registry.register_helper("singular", Box::new(singular));

        Self { registry }
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(
        &self,
        template: &str,
        placeholders: &serde_json::Value,
        template_name: Option<&str>,
    ) -> Result<String> {
        let translated = translate_sections(template);
        if translated != template {
            trace!("Translated mustache template {template_name:?}:\n{translated}");
        }
        Ok(self.registry.render_template(&translated, placeholders)?)
    }
}

/// `{{#mustache_section value this}}`: iterates lists, renders objects with
/// their keys layered over the enclosing scope, renders once for any other
/// truthy value and falls through to the inverse otherwise.
struct Section;

impl Section {
    fn render_scoped<'reg: 'rc, 'rc>(
        template: &'rc Template,
        scope: Value,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let mut block = BlockContext::new();
        block.set_base_value(scope);
        rc.push_block(block);
        let result = template.render(r, ctx, rc, out);
        rc.pop_block();
        result
    }
}

/// Keys of `item` over those of `enclosing`, so names missing from a section
/// item still resolve from the outer scope.
fn layered(enclosing: &Value, item: &Value) -> Value {
    match (enclosing, item) {
        (Value::Object(outer), Value::Object(inner)) => {
            let mut merged = outer.clone();
            merged.extend(inner.iter().map(|(k, v)| (k.clone(), v.clone())));
            Value::Object(merged)
        }
        _ => item.clone(),
    }
}

impl HelperDef for Section {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let value = h.param(0).map_or(Value::Null, |p| p.value().clone());
        let enclosing = h.param(1).map_or(Value::Null, |p| p.value().clone());
        let Some(template) = h.template() else {
            return Ok(());
        };

        match &value {
            Value::Array(items) if !items.is_empty() => {
                for item in items {
                    Self::render_scoped(template, layered(&enclosing, item), r, ctx, rc, out)?;
                }
                Ok(())
            }
            Value::Object(_) => {
                Self::render_scoped(template, layered(&enclosing, &value), r, ctx, rc, out)
            }
            other if other.is_truthy(false) => template.render(r, ctx, rc, out),
            _ => match h.inverse() {
                Some(inverse) => inverse.render(r, ctx, rc, out),
                None => Ok(()),
            },
        }
    }
}

/// Rewrites Mustache sections, inverted sections, `{{& name}}` and `{{.}}`
/// into Handlebars. Handlebars blocks (`{{#each items}}`, `{{#if x}}`...) and
/// every other tag pass through unchanged.
pub fn translate_sections(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    // Open blocks: the name their closing tag carries and its replacement.
    let mut open: Vec<(String, Option<&'static str>)> = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tag = &rest[start..];

        if tag.starts_with("{{{") {
            let end = tag.find("}}}").map_or(tag.len(), |end| end + 3);
            out.push_str(&tag[..end]);
            rest = &tag[end..];
            continue;
        }
        let Some(end) = tag.find("}}") else {
            out.push_str(tag);
            return out;
        };
        let inner = tag[2..end].trim();
        rest = &tag[end + 2..];

        if let Some(name) = inner.strip_prefix('#').map(str::trim) {
            if is_section_name(name) {
                out.push_str(&format!("{{{{#{SECTION_HELPER} {name} this}}}}"));
                open.push((name.to_string(), Some(SECTION_HELPER)));
            } else {
                let keyword = name.split_whitespace().next().unwrap_or_default();
                open.push((keyword.to_string(), None));
                out.push_str(&tag[..end + 2]);
            }
        } else if let Some(name) = inner.strip_prefix('^').map(str::trim).filter(|n| !n.is_empty()) {
            out.push_str(&format!("{{{{#unless {name}}}}}"));
            open.push((name.to_string(), Some("unless")));
        } else if let Some(name) = inner.strip_prefix('/').map(str::trim) {
            let replacement = if open.last().is_some_and(|(opened, _)| opened == name) {
                open.pop().and_then(|(_, replacement)| replacement)
            } else {
                None
            };
            match replacement {
                Some(helper) => out.push_str(&format!("{{{{/{helper}}}}}")),
                None => out.push_str(&tag[..end + 2]),
            }
        } else if let Some(name) = inner.strip_prefix('&') {
            out.push_str(&format!("{{{{{{{}}}}}}}", name.trim()));
        } else if inner == "." {
            out.push_str("{{this}}");
        } else {
            out.push_str(&tag[..end + 2]);
        }
    }
    out.push_str(rest);
    out
}

fn is_section_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(char::is_whitespace)
        && !name.starts_with(['>', '*'])
        && !BLOCK_KEYWORDS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, context: serde_json::Value) -> String {
        HandlebarsRenderer::new().render(template, &context, None).unwrap()
    }

    #[test]
    fn substitutes_placeholders() {
        assert_eq!(render("class {{entity}}Dto", json!({"entity": "User"})), "class UserDto");
    }

    #[test]
    fn missing_values_render_empty() {
        assert_eq!(render("[{{missing}}]", json!({})), "[]");
    }

    #[test]
    fn escapes_like_mustache() {
        let context = json!({"ns": "App\\Models", "generic": "List<User>", "quote": "it's"});
        assert_eq!(render("{{ns}} {{generic}} {{quote}}", context.clone()), "App\\Models List&lt;User&gt; it's");
        assert_eq!(render("{{{generic}}}", context.clone()), "List<User>");
        assert_eq!(render("{{& generic}}", context), "List<User>");
    }

    #[test]
    fn list_sections_iterate() {
        let context = json!({"items": [{"name": "id"}, {"name": "email"}]});
        assert_eq!(render("{{#items}}{{name}},{{/items}}", context), "id,email,");
        assert_eq!(render("{{#fields}}{{.}};{{/fields}}", json!({"fields": ["a", "b"]})), "a;b;");
    }

    #[test]
    fn object_sections_push_a_scope() {
        let context = json!({"ns": "App", "model": {"name": "User"}});
        assert_eq!(render("{{#model}}{{ns}}\\{{name}}{{/model}}", context), "App\\User");
    }

    #[test]
    fn inverted_sections_render_on_falsy() {
        assert_eq!(render("{{^none}}empty{{/none}}", json!({})), "empty");
        assert_eq!(render("{{^items}}empty{{/items}}", json!({"items": []})), "empty");
        assert_eq!(render("{{^items}}empty{{/items}}", json!({"items": [1]})), "");
    }

    #[test]
    fn truthy_and_falsy_sections() {
        let context = json!({"soft_deletes": true, "timestamps": false, "items": []});
        let template = "{{#soft_deletes}}sd{{/soft_deletes}}{{#timestamps}}ts{{/timestamps}}{{#items}}x{{/items}}";
        assert_eq!(render(template, context), "sd");
    }

    #[test]
    fn nested_sections() {
        let context = json!({"groups": [{"title": "A", "rows": [1, 2]}, {"title": "B", "rows": []}]});
        let template = "{{#groups}}{{title}}:{{#rows}}{{.}}{{/rows}}{{^rows}}-{{/rows}} {{/groups}}";
        assert_eq!(render(template, context), "A:12 B:- ");
    }

    #[test]
    fn handlebars_blocks_still_work() {
        let context = json!({"fields": ["id", "name"], "soft_deletes": false});
        let template = "{{#each fields}}{{this}},{{/each}}{{#if soft_deletes}}sd{{/if}}";
        assert_eq!(render(template, context), "id,name,");
    }

    #[test]
    fn translation_leaves_other_tags_alone() {
        assert_eq!(
            translate_sections("{{#each xs}}{{this}}{{/each}}{{! note }}{{{raw}}}"),
            "{{#each xs}}{{this}}{{/each}}{{! note }}{{{raw}}}"
        );
        assert_eq!(
            translate_sections("{{#items}}{{name}}{{/items}}{{^items}}none{{/items}}"),
            "{{#mustache_section items this}}{{name}}{{/mustache_section}}{{#unless items}}none{{/unless}}"
        );
    }

    #[test]
    fn case_helpers_are_available() {
        assert_eq!(render("{{snake_case entity}}", json!({"entity": "OrderItem"})), "order_item");
        assert_eq!(render("{{plural entity}}", json!({"entity": "invoice"})), "invoices");
    }
}
