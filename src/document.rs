use serde::{Deserialize, Serialize};

/// The fixed header markers recognized at the top of a news article.
const MARKERS: &[(&str, Field)] = &[
    ("SOURCE:", Field::Source),
    ("TITLE:", Field::Title),
    ("PUBLISHED:", Field::Published),
    ("LOCATION:", Field::Location),
    ("AUTHOR:", Field::Author),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Source,
    Title,
    Published,
    Location,
    Author,
}

/// Metadata extracted from a document's header lines.
///
/// Every field defaults to the empty string when its marker is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMeta {
    pub source: String,
    pub title: String,
    pub published: String,
    pub location: String,
    pub author: String,
}

/// A document split into header metadata and body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub meta: ArticleMeta,
    pub body: String,
}

/// Parse a raw document into metadata and body.
///
/// Each marker's value is the text following it up to the next line break,
/// trimmed. The body is everything after the last recognized header line;
/// a document with no markers is all body.
pub fn parse(raw: &str) -> Article {
    let mut meta = ArticleMeta::default();
    let mut body_start = 0usize;

    for (marker, field) in MARKERS {
        let Some(pos) = raw.find(marker) else {
            continue;
        };
        let value_start = pos + marker.len();
        let line_end = raw[value_start..]
            .find('\n')
            .map(|i| value_start + i)
            .unwrap_or(raw.len());

        let value = raw[value_start..line_end].trim().to_string();
        match field {
            Field::Source => meta.source = value,
            Field::Title => meta.title = value,
            Field::Published => meta.published = value,
            Field::Location => meta.location = value,
            Field::Author => meta.author = value,
        }

        // The body begins after the last recognized header line.
        let after_line = (line_end + 1).min(raw.len());
        body_start = body_start.max(after_line);
    }

    Article {
        meta,
        body: raw[body_start..].trim_start().to_string(),
    }
}
