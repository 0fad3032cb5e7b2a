use std::fmt::Display;
use std::str::FromStr;

use cruet::case::{
    camel::to_camel_case, kebab::to_kebab_case, pascal::to_pascal_case,
    screaming_snake::to_screaming_snake_case, sentence::to_sentence_case, snake::to_snake_case,
    title::to_title_case, train::to_train_case,
};

use crate::error::Error;

/// A case style that can be applied to generated names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    CamelCase,
    PascalCase,
    SnakeCase,
    KebabCase,
    UpperSnakeCase,
    DotCase,
    StudlyCase,
    TitleCase,
    SentenceCase,
    ScreamingKebabCase,
    SlashCase,
    BackslashCase,
    DotKebabCase,
    FlatCase,
    TrainCase,
}

impl Style {
    pub const ALL: [Style; 15] = [
        Style::CamelCase,
        Style::PascalCase,
        Style::SnakeCase,
        Style::KebabCase,
        Style::UpperSnakeCase,
        Style::DotCase,
        Style::StudlyCase,
        Style::TitleCase,
        Style::SentenceCase,
        Style::ScreamingKebabCase,
        Style::SlashCase,
        Style::BackslashCase,
        Style::DotKebabCase,
        Style::FlatCase,
        Style::TrainCase,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Style::CamelCase => "camel_case",
            Style::PascalCase => "pascal_case",
            Style::SnakeCase => "snake_case",
            Style::KebabCase => "kebab_case",
            Style::UpperSnakeCase => "upper_snake_case",
            Style::DotCase => "dot_case",
            Style::StudlyCase => "studly_case",
            Style::TitleCase => "title_case",
            Style::SentenceCase => "sentence_case",
            Style::ScreamingKebabCase => "screaming_kebab_case",
            Style::SlashCase => "slash_case",
            Style::BackslashCase => "backslash_case",
            Style::DotKebabCase => "dot_kebab_case",
            Style::FlatCase => "flat_case",
            Style::TrainCase => "train_case",
        }
    }

    /// Applies the style to a single name segment.
    ///
    /// The value is normalized first: trimmed, `-` and `_` turned into spaces,
    /// and runs of whitespace collapsed.
    pub fn apply(self, value: &str) -> String {
        let value = normalize(value);
        match self {
            Style::CamelCase => to_camel_case(&value),
            Style::PascalCase | Style::StudlyCase => to_pascal_case(&value),
            Style::SnakeCase => to_snake_case(&value),
            Style::KebabCase => to_kebab_case(&value),
            Style::UpperSnakeCase => to_screaming_snake_case(&value),
            Style::DotCase => to_snake_case(&value).replace('_', "."),
            Style::TitleCase => to_title_case(&value),
            Style::SentenceCase => to_sentence_case(&value),
            Style::ScreamingKebabCase => to_kebab_case(&value).to_uppercase(),
            Style::SlashCase => slash_case(&value),
            Style::BackslashCase => slash_case(&value).replace('/', "\\"),
            Style::DotKebabCase => slash_case(&value).replace('/', "."),
            Style::FlatCase => value.to_lowercase().replace(['_', '-', ' '], ""),
            Style::TrainCase => to_train_case(&value),
        }
    }
}

impl FromStr for Style {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Style::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| Error::UnknownStyle(s.to_string()))
    }
}

impl Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn normalize(value: &str) -> String {
    value.trim().replace(['-', '_'], " ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn slash_case(value: &str) -> String {
    to_kebab_case(value).replace(['_', '-'], "/")
}
