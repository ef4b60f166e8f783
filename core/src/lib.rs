pub mod index;
pub mod post;
pub mod source;
pub mod store;
pub mod tokenizer;

pub use index::{Document, FieldIndex, FieldSpec, SearchHit, SearchIndex};
pub use post::{normalize_categories, Post, RawPost};
pub use source::{parse_posts, FileSource, HttpSource, PostSource, POSTS_PATH};
pub use store::PostStore;

pub type TermId = u32;
pub type DocId = u32;

#[derive(Debug, Clone)]
pub struct DocMeta {
    /// The ref handed back to callers, i.e. the post id.
    pub external_id: String,
    /// Every term this document has a posting for, ascending.
    pub terms: Vec<TermId>,
}

#[derive(Debug, Clone, Copy)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f32, // boosted, length-normalized term frequency
}
