// src/highlight.rs
//
// Colourises a JSON-like string for display. Input is escaped first and then
// scanned once from left to right; text inside a matched string literal is
// never looked at again, so `"true"` stays a string.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?P<string>"(?:\\u[a-zA-Z0-9]{4}|\\[^u]|[^\\"])*"(?P<colon>\s*:)?)"#,
        r"|(?P<boolean>\b(?:true|false)\b)",
        r"|(?P<null>\bnull\b)",
        r"|(?P<number>-?\b(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][+-]?\d+)?\b)",
    ))
    .expect("token pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Key,
    String,
    Boolean,
    Null,
    Number,
}

impl TokenKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            TokenKind::Key => "json-key",
            TokenKind::String => "json-string",
            TokenKind::Boolean => "json-boolean",
            TokenKind::Null => "json-null",
            TokenKind::Number => "json-number",
        }
    }
}

/// A run of escaped text, classified when `kind` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: Option<TokenKind>,
    pub text: String,
}

/// Escapes the characters that could open or close markup.
pub fn escape_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn tokenize(raw: &str) -> Vec<Token> {
    let escaped = escape_markup(raw);
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in TOKEN_RE.captures_iter(&escaped) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            tokens.push(Token {
                kind: None,
                text: escaped[last..whole.start()].to_string(),
            });
        }

        let kind = if caps.name("string").is_some() {
            if caps.name("colon").is_some() {
                TokenKind::Key
            } else {
                TokenKind::String
            }
        } else if caps.name("boolean").is_some() {
            TokenKind::Boolean
        } else if caps.name("null").is_some() {
            TokenKind::Null
        } else {
            TokenKind::Number
        };

        tokens.push(Token {
            kind: Some(kind),
            text: whole.as_str().to_string(),
        });
        last = whole.end();
    }

    if last < escaped.len() {
        tokens.push(Token {
            kind: None,
            text: escaped[last..].to_string(),
        });
    }

    tokens
}

/// Escaped markup with every classified token wrapped in a `<span>`.
pub fn highlight(raw: &str) -> String {
    tokenize(raw)
        .into_iter()
        .map(|token| match token.kind {
            Some(kind) => format!("<span class=\"{}\">{}</span>", kind.css_class(), token.text),
            None => token.text,
        })
        .collect()
}

/// `highlight` inside a `<pre><code>` block; nothing for empty input.
pub fn render_block(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    Some(format!("<pre><code>{}</code></pre>", highlight(raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(raw: &str) -> Vec<(TokenKind, String)> {
        tokenize(raw)
            .into_iter()
            .filter_map(|t| t.kind.map(|k| (k, t.text)))
            .collect()
    }

    #[test]
    fn test_classifies_json_tokens() {
        let found = kinds(r#"{"name": "fox", "age": 3, "wild": true, "owner": null, "ratio": -1.5e3}"#);
        assert_eq!(
            found,
            vec![
                (TokenKind::Key, r#""name":"#.to_string()),
                (TokenKind::String, r#""fox""#.to_string()),
                (TokenKind::Key, r#""age":"#.to_string()),
                (TokenKind::Number, "3".to_string()),
                (TokenKind::Key, r#""wild":"#.to_string()),
                (TokenKind::Boolean, "true".to_string()),
                (TokenKind::Key, r#""owner":"#.to_string()),
                (TokenKind::Null, "null".to_string()),
                (TokenKind::Key, r#""ratio":"#.to_string()),
                (TokenKind::Number, "-1.5e3".to_string()),
            ]
        );
    }

    #[test]
    fn test_literals_inside_strings_stay_strings() {
        let found = kinds(r#"["true null 42", false]"#);
        assert_eq!(
            found,
            vec![
                (TokenKind::String, r#""true null 42""#.to_string()),
                (TokenKind::Boolean, "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_escaped_quotes_inside_strings() {
        let found = kinds(r#"{"quote": "say \"hi\""}"#);
        assert_eq!(found[1], (TokenKind::String, r#""say \"hi\"""#.to_string()));
    }

    #[test]
    fn test_numbers_need_word_boundaries() {
        assert!(kinds("abc123 truefalse nullish").is_empty());
        assert_eq!(kinds("x 0.25"), vec![(TokenKind::Number, "0.25".to_string())]);
    }

    #[test]
    fn test_render_block() {
        assert_eq!(render_block(""), None);
        assert_eq!(
            render_block("1").as_deref(),
            Some("<pre><code><span class=\"json-number\">1</span></code></pre>")
        );
    }
}
