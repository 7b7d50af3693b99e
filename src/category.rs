// src/category.rs
use serde::Serialize;

/// Presentation category for an analysis parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Subject,
    Style,
    Composition,
    Setting,
    Color,
    Action,
    Detail,
    Default,
}

/// Keys tested in order against the lower-cased parameter name.
const CATEGORY_TABLE: [(&str, Category); 7] = [
    ("subject", Category::Subject),
    ("style", Category::Style),
    ("composition", Category::Composition),
    ("setting", Category::Setting),
    ("color", Category::Color),
    ("action", Category::Action),
    ("detail", Category::Detail),
];

impl Category {
    pub fn key(&self) -> &'static str {
        match self {
            Category::Subject => "subject",
            Category::Style => "style",
            Category::Composition => "composition",
            Category::Setting => "setting",
            Category::Color => "color",
            Category::Action => "action",
            Category::Detail => "detail",
            Category::Default => "default",
        }
    }

    /// Colour name used by clients when tinting a highlighted phrase.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Subject => "blue",
            Category::Style => "purple",
            Category::Composition => "green",
            Category::Setting => "yellow",
            Category::Color => "red",
            Category::Action => "indigo",
            Category::Detail => "pink",
            Category::Default => "gray",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Maps a free-form parameter name such as "Color/Palette" to its category.
/// The first table key contained in the lower-cased name wins.
pub fn resolve_category(parameter: &str) -> Category {
    let lower = parameter.to_lowercase();
    CATEGORY_TABLE
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Default)
}
