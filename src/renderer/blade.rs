//! Blade templates rendered through MiniJinja.
//!
//! Blade syntax is translated into MiniJinja syntax before rendering. Only the
//! directives scaffolding templates use are understood; any other `@word` is
//! left in the output untouched.

use log::trace;

use crate::{
    error::Result,
    renderer::{interface::TemplateRenderer, minijinja::MiniJinjaRenderer},
};

/// Directives that take a parenthesised argument.
const DIRECTIVES_WITH_ARGS: &[&str] = &["if", "elseif", "unless", "isset", "foreach"];

pub struct BladeRenderer {
    inner: MiniJinjaRenderer,
}

impl BladeRenderer {
    pub fn new() -> Self {
        // A compiled directive swallows the newline that follows it.
        Self { inner: MiniJinjaRenderer::new().with_trim_blocks(true) }
    }
}

impl Default for BladeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for BladeRenderer {
    fn render(
        &self,
        template: &str,
        context: &serde_json::Value,
        template_name: Option<&str>,
    ) -> Result<String> {
        let translated = translate(template);
        trace!("Translated blade template {template_name:?}:\n{translated}");
        self.inner.render(&translated, context, template_name)
    }
}

/// Rewrites a Blade template as a MiniJinja template.
pub fn translate(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(ch) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("{{--") {
            rest = after.find("--}}").map_or("", |end| &after[end + 4..]);
        } else if let Some(after) = rest.strip_prefix("@{{") {
            out.push_str("{{ '{{' }}");
            rest = after;
        } else if let Some((expr, after)) = enclosed(rest, "{!!", "!!}") {
            out.push_str(&format!("{{{{ ({})|safe }}}}", translate_expression(expr)));
            rest = after;
        } else if let Some((expr, after)) = enclosed(rest, "{{", "}}") {
            out.push_str(&format!("{{{{ {} }}}}", translate_expression(expr)));
            rest = after;
        } else if rest.starts_with("{{") || rest.starts_with("{%") || rest.starts_with("{#") {
            out.push_str(&format!("{{{{ '{}' }}}}", &rest[..2]));
            rest = &rest[2..];
        } else if let Some(after) = rest.strip_prefix("@@") {
            out.push('@');
            rest = after;
        } else if ch == '@' && !out.ends_with(|c: char| c.is_alphanumeric() || c == '_') {
            match directive(rest) {
                Some((tag, consumed)) => {
                    out.push_str(&tag);
                    rest = &rest[consumed..];
                }
                None => {
                    out.push('@');
                    rest = &rest[1..];
                }
            }
        } else {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    out
}

/// Splits `input` into the text between `open` and `close` and what follows.
fn enclosed<'a>(input: &'a str, open: &str, close: &str) -> Option<(&'a str, &'a str)> {
    let after = input.strip_prefix(open)?;
    let end = after.find(close)?;
    Some((&after[..end], &after[end + close.len()..]))
}

/// Translates the directive at the start of `input` (which begins with `@`).
///
/// Returns the MiniJinja tag and the number of bytes consumed, or `None` when
/// the directive is unknown or malformed.
fn directive(input: &str) -> Option<(String, usize)> {
    let name_len =
        input[1..].find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(input.len() - 1);
    let name = &input[1..1 + name_len];
    let mut consumed = 1 + name_len;

    let args = if DIRECTIVES_WITH_ARGS.contains(&name) {
        let after = &input[consumed..];
        let trimmed = after.trim_start_matches([' ', '\t']);
        let (args, len) = parenthesised(trimmed)?;
        consumed += after.len() - trimmed.len() + len;
        Some(args)
    } else {
        None
    };

    let tag = match (name, args) {
        ("if", Some(cond)) => format!("{{% if {} %}}", translate_expression(cond)),
        ("elseif", Some(cond)) => format!("{{% elif {} %}}", translate_expression(cond)),
        ("unless", Some(cond)) => format!("{{% if not ({}) %}}", translate_expression(cond)),
        ("isset", Some(expr)) => {
            let expr = translate_expression(expr);
            format!("{{% if {expr} is defined and {expr} is not none %}}")
        }
        ("foreach", Some(args)) => foreach(args)?,
        ("else", _) => "{% else %}".to_string(),
        ("endif" | "endunless" | "endisset", _) => "{% endif %}".to_string(),
        ("endforeach", _) => "{% endfor %}".to_string(),
        _ => return None,
    };
    Some((tag, consumed))
}

/// Reads a balanced `( ... )` group, honouring quoted strings.
fn parenthesised(input: &str) -> Option<(&str, usize)> {
    if !input.starts_with('(') {
        return None;
    }
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in input.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&input[1..idx], idx + 1));
                }
            }
            _ => {}
        }
    }
    None
}

/// `$items as $item` and `$map as $key => $value` loops.
fn foreach(args: &str) -> Option<String> {
    let (source, binding) = args.split_once(" as ")?;
    let source = translate_expression(source);
    match binding.split_once("=>") {
        Some((key, value)) => Some(format!(
            "{{% for {}, {} in {source}|items %}}",
            translate_expression(key),
            translate_expression(value)
        )),
        None => Some(format!("{{% for {} in {source} %}}", translate_expression(binding))),
    }
}

/// Rewrites a PHP expression into MiniJinja syntax outside of string literals:
/// `$` sigils are dropped, `->` becomes `.`, `&&`/`||`/`!` become
/// `and`/`or`/`not`, strict comparisons become loose ones and `null` becomes
/// `none`.
fn translate_expression(expr: &str) -> String {
    let chars: Vec<char> = expr.chars().collect();
    let mut out = String::with_capacity(expr.len());
    let mut quote: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let rest = &chars[i..];

        if let Some(q) = quote {
            out.push(c);
            if c == '\\' && i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                out.push(c);
                i += 1;
            }
            '$' => i += 1,
            '-' if rest.starts_with(&['-', '>']) => {
                out.push('.');
                i += 2;
            }
            '&' if rest.starts_with(&['&', '&']) => {
                out.push_str(" and ");
                i += 2;
            }
            '|' if rest.starts_with(&['|', '|']) => {
                out.push_str(" or ");
                i += 2;
            }
            '=' if rest.starts_with(&['=', '=', '=']) => {
                out.push_str("==");
                i += 3;
            }
            '!' if rest.starts_with(&['!', '=', '=']) => {
                out.push_str("!=");
                i += 3;
            }
            '!' if rest.starts_with(&['!', '=']) => {
                out.push_str("!=");
                i += 2;
            }
            '!' => {
                out.push_str("not ");
                i += 1;
            }
            c if c.is_alphabetic() || c == '_' => {
                let len = rest.iter().take_while(|c| c.is_alphanumeric() || **c == '_').count();
                let word: String = rest[..len].iter().collect();
                let after_dot = out.ends_with('.');
                if word == "null" && !after_dot {
                    out.push_str("none");
                } else {
                    out.push_str(&word);
                }
                i += len;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out.trim().to_string()
}
