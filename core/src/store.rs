use crate::index::{FieldIndex, FieldSpec, SearchIndex};
use crate::post::{Post, RawPost};
use crate::source::PostSource;
use anyhow::Result;
use std::collections::HashMap;

/// Field weights used for blog posts.
pub fn post_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("title", 10.0),
        FieldSpec::new("categories", 5.0),
        FieldSpec::new("excerpt", 1.0),
    ]
}

/// Fetched posts together with the index built over them.
///
/// Posts and index are only ever built together, so every post has an index
/// entry and every hit resolves to a post.
#[derive(Debug)]
pub struct PostStore<I = FieldIndex> {
    posts: Vec<Post>,
    by_id: HashMap<String, usize>,
    index: I,
}

impl Default for PostStore {
    fn default() -> Self { Self::empty() }
}

impl PostStore {
    pub fn empty() -> Self {
        Self::with_index(FieldIndex::new(post_fields()), Vec::new())
    }

    pub fn from_records(records: Vec<RawPost>) -> Self {
        Self::with_index(FieldIndex::new(post_fields()), records)
    }

    /// Load every record from `source` and index it.
    pub async fn fetch<S: PostSource>(source: &S) -> Result<Self> {
        let records = source.load().await?;
        Ok(Self::from_records(records))
    }
}

impl<I: SearchIndex> PostStore<I> {
    /// Build a store over an arbitrary (empty) index.
    pub fn with_index(mut index: I, records: Vec<RawPost>) -> Self {
        let mut posts = Vec::with_capacity(records.len());
        let mut by_id = HashMap::with_capacity(records.len());
        for raw in records {
            // index sees the raw category string, the store keeps the tokens
            if !index.add(&raw) {
                tracing::warn!(id = %raw.id, "duplicate post id, keeping the first");
                continue;
            }
            by_id.insert(raw.id.clone(), posts.len());
            posts.push(Post::from(raw));
        }
        tracing::info!(num_posts = posts.len(), "indexed posts");
        Self { posts, by_id, index }
    }

    /// Posts matching `term`, most relevant first. Never fails.
    pub fn filter(&self, term: &str) -> Vec<&Post> {
        self.scored(term).into_iter().map(|(post, _)| post).collect()
    }

    /// Like [`filter`](Self::filter) but keeps the relevance score.
    pub fn scored(&self, term: &str) -> Vec<(&Post, f32)> {
        self.index
            .search(term)
            .into_iter()
            .filter_map(|hit| self.get(&hit.doc_ref).map(|p| (p, hit.score)))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.by_id.get(id).map(|&i| &self.posts[i])
    }

    pub fn posts(&self) -> &[Post] { &self.posts }

    pub fn index(&self) -> &I { &self.index }

    pub fn len(&self) -> usize { self.posts.len() }

    pub fn is_empty(&self) -> bool { self.posts.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, title: &str, categories: &str, excerpt: &str) -> RawPost {
        serde_json::from_value(serde_json::json!({
            "id": id, "title": title, "categories": categories, "excerpt": excerpt
        }))
        .unwrap()
    }

    #[test]
    fn every_post_is_indexed() {
        let store = PostStore::from_records(vec![
            raw("/a", "Alpha", "x", "first"),
            raw("/b", "Beta", "y", "second"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.index().len(), 2);
        for p in store.posts() {
            assert!(store.index().contains(&p.id));
        }
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let store = PostStore::from_records(vec![
            raw("/a", "Alpha", "", ""),
            raw("/a", "Gamma", "", ""),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("/a").unwrap().title, "Alpha");
        assert!(store.filter("gamma").is_empty());
    }

    #[test]
    fn empty_store_filters_to_nothing() {
        let store = PostStore::empty();
        assert!(store.is_empty());
        assert!(store.filter("anything").is_empty());
        assert!(store.filter("").is_empty());
    }
}
