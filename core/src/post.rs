//! Post records as served by the blog's JSON feed.

use crate::index::Document;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A post exactly as it arrives from the data source.
///
/// `categories` is still the raw comma separated string here; it is what the
/// index sees.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawPost {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "categories_from_string_or_list")]
    pub categories: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A post after ingest, with categories split into tokens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub categories: Vec<String>,
    pub excerpt: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<RawPost> for Post {
    fn from(raw: RawPost) -> Self {
        Post {
            categories: normalize_categories(&raw.categories),
            id: raw.id,
            title: raw.title,
            excerpt: raw.excerpt,
            extra: raw.extra,
        }
    }
}

impl Document for RawPost {
    fn doc_ref(&self) -> &str { &self.id }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "categories" => Some(&self.categories),
            "excerpt" => Some(&self.excerpt),
            other => self.extra.get(other).and_then(Value::as_str),
        }
    }
}

/// Split `"a, b,c"` into `["a", "b", "c"]`. Empty pieces are dropped.
pub fn normalize_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn id_from_string_or_number<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    match Value::deserialize(de)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("post id must be a string or number, got {other}"))),
    }
}

// Some feeds already emit a list; fold it back so the index sees one string.
fn categories_from_string_or_list<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    match Value::deserialize(de)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Array(items) => Ok(items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(",")),
        other => Err(serde::de::Error::custom(format!("categories must be a string or list, got {other}"))),
    }
}
