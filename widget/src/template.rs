//! Result templates in the underscore style: `<%= field %>` inserts raw,
//! `<%- field %>` inserts HTML-escaped. Slots are parsed once into typed
//! fields so rendering is a plain walk over segments.

use crate::error::TemplateError;
use blogsearch_core::Post;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::str::FromStr;

lazy_static! {
    static ref FIELD_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostField {
    Id,
    Title,
    Categories,
    Excerpt,
    /// Any other attribute carried by the post record, e.g. `url` or `date`.
    Extra(String),
}

impl PostField {
    fn from_name(name: &str) -> Self {
        match name {
            "id" => PostField::Id,
            "title" => PostField::Title,
            "categories" => PostField::Categories,
            "excerpt" => PostField::Excerpt,
            other => PostField::Extra(other.to_string()),
        }
    }

    pub fn value<'a>(&self, post: &'a Post) -> Cow<'a, str> {
        match self {
            PostField::Id => Cow::Borrowed(&post.id),
            PostField::Title => Cow::Borrowed(&post.title),
            PostField::Categories => Cow::Owned(post.categories.join(", ")),
            PostField::Excerpt => Cow::Borrowed(&post.excerpt),
            PostField::Extra(name) => match post.extra.get(name) {
                None | Some(Value::Null) => Cow::Borrowed(""),
                Some(Value::String(s)) => Cow::Borrowed(s),
                Some(other) => Cow::Owned(other.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Slot { field: PostField, escape: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultTemplate {
    segments: Vec<Segment>,
}

impl ResultTemplate {
    pub fn parse(src: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = src;
        let mut offset = 0usize;

        while let Some(open) = rest.find("<%") {
            if open > 0 {
                segments.push(Segment::Text(rest[..open].to_string()));
            }
            let tag_start = offset + open;
            let after = &rest[open + 2..];
            let escape = match after.chars().next() {
                Some('=') => false,
                Some('-') => true,
                Some(_) => return Err(TemplateError::UnsupportedTag(tag_start)),
                None => return Err(TemplateError::Unterminated(tag_start)),
            };
            let body = &after[1..];
            let close = body.find("%>").ok_or(TemplateError::Unterminated(tag_start))?;
            let name = body[..close].trim();
            if name.is_empty() {
                return Err(TemplateError::EmptyTag(tag_start));
            }
            if !FIELD_NAME.is_match(name) {
                return Err(TemplateError::InvalidField(name.to_string()));
            }
            segments.push(Segment::Slot { field: PostField::from_name(name), escape });

            let consumed = open + 3 + close + 2;
            rest = &rest[consumed..];
            offset += consumed;
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }
        Ok(Self { segments })
    }

    /// Fields referenced by the template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = &PostField> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot { field, .. } => Some(field),
            Segment::Text(_) => None,
        })
    }

    pub fn render(&self, post: &Post) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Slot { field, escape: true } => out.push_str(&escape_html(&field.value(post))),
                Segment::Slot { field, escape: false } => out.push_str(&field.value(post)),
            }
        }
        out
    }
}

impl FromStr for ResultTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '`' => out.push_str("&#x60;"),
            _ => out.push(c),
        }
    }
    out
}
