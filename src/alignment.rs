// src/alignment.rs
//
// Places analysis phrases onto a source text as a lossless, non-overlapping
// sequence of plain and annotated segments.

use serde::{Deserialize, Serialize};

use crate::category::{resolve_category, Category};
use crate::evaluation::AnnotationItem;

/// Which text of the comparison a phrase is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Reference,
    User,
}

impl Side {
    fn phrase<'a>(&self, item: &'a AnnotationItem) -> &'a str {
        match self {
            Side::Reference => &item.target_phrase,
            Side::User => &item.user_phrase,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextSegment {
    Plain {
        text: String,
    },
    Annotated {
        text: String,
        category: Category,
        parameter: String,
        feedback: String,
    },
}

impl TextSegment {
    pub fn text(&self) -> &str {
        match self {
            TextSegment::Plain { text } | TextSegment::Annotated { text, .. } => text,
        }
    }

    pub fn is_annotated(&self) -> bool {
        matches!(self, TextSegment::Annotated { .. })
    }
}

/// Splits `source` into segments, annotating the phrases `items` name for `side`.
///
/// Candidates are ordered by the first occurrence of their phrase in the source
/// (stable, so equal positions keep input order) and then placed left to right,
/// each searched from the end of the previous match. A phrase with no
/// occurrence at or after that point is dropped.
pub fn align(source: &str, items: &[AnnotationItem], side: Side) -> Vec<TextSegment> {
    let mut candidates: Vec<(usize, &str, &AnnotationItem)> = items
        .iter()
        .filter_map(|item| {
            let phrase = side.phrase(item);
            if phrase.is_empty() {
                return None;
            }
            source.find(phrase).map(|first| (first, phrase, item))
        })
        .collect();
    candidates.sort_by_key(|(first, _, _)| *first);

    let mut segments = Vec::new();
    let mut cursor = 0;

    for (_, phrase, item) in candidates {
        let Some(offset) = source[cursor..].find(phrase) else {
            continue;
        };
        let start = cursor + offset;
        let end = start + phrase.len();

        if start > cursor {
            segments.push(TextSegment::Plain {
                text: source[cursor..start].to_string(),
            });
        }
        segments.push(TextSegment::Annotated {
            text: source[start..end].to_string(),
            category: resolve_category(&item.parameter),
            parameter: item.parameter.clone(),
            feedback: item.feedback.clone(),
        });
        cursor = end;
    }

    if cursor < source.len() {
        segments.push(TextSegment::Plain {
            text: source[cursor..].to_string(),
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(parameter: &str, target: &str, user: &str) -> AnnotationItem {
        AnnotationItem::new(parameter, target, user, &format!("{} feedback", parameter))
    }

    fn joined(segments: &[TextSegment]) -> String {
        segments.iter().map(TextSegment::text).collect()
    }

    #[test]
    fn test_orders_by_first_occurrence() {
        let source = "a cat and a dog";
        let items = vec![item("Y", "dog", ""), item("X", "cat", "")];
        let segments = align(source, &items, Side::Reference);

        let texts: Vec<&str> = segments.iter().map(TextSegment::text).collect();
        assert_eq!(texts, vec!["a ", "cat", " and a ", "dog"]);
        assert!(matches!(&segments[1], TextSegment::Annotated { parameter, .. } if parameter == "X"));
        assert!(matches!(&segments[3], TextSegment::Annotated { parameter, .. } if parameter == "Y"));
    }

    #[test]
    fn test_side_selects_phrase() {
        let source = "blue sky";
        let items = vec![item("Color", "red", "blue")];

        assert_eq!(align(source, &items, Side::Reference), vec![TextSegment::Plain { text: "blue sky".into() }]);
        let user = align(source, &items, Side::User);
        assert_eq!(user.len(), 2);
        assert!(matches!(&user[0], TextSegment::Annotated { category: Category::Color, .. }));
    }

    #[test]
    fn test_overlap_keeps_earliest_phrase() {
        // "red fox" starts first, so the later "fox" item finds nothing after it
        let source = "a red fox";
        let items = vec![item("Subject", "fox", ""), item("Color", "red fox", "")];
        let segments = align(source, &items, Side::Reference);

        assert_eq!(joined(&segments), source);
        assert_eq!(segments.iter().filter(|s| s.is_annotated()).count(), 1);
        assert!(matches!(&segments[1], TextSegment::Annotated { text, category: Category::Color, .. } if text == "red fox"));
    }

    #[test]
    fn test_multibyte_text_is_split_on_char_boundaries() {
        let source = "café au lait — crème";
        let items = vec![item("Detail", "crème", ""), item("Subject", "café", "")];
        let segments = align(source, &items, Side::Reference);
        assert_eq!(joined(&segments), source);
        assert_eq!(segments.last().map(TextSegment::text), Some("crème"));
    }

    #[test]
    fn test_empty_source() {
        assert!(align("", &[item("Subject", "cat", "")], Side::Reference).is_empty());
    }
}
