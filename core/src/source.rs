//! Where post records come from.

use crate::post::RawPost;
use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Url};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fixed resource path of the post list, relative to the site root.
pub const POSTS_PATH: &str = "/json/posts.json";

/// Read-only access to the full post collection.
pub trait PostSource {
    fn load(&self) -> impl Future<Output = Result<Vec<RawPost>>> + Send;
}

/// Parse a posts document: a JSON array of post objects.
pub fn parse_posts(bytes: &[u8]) -> Result<Vec<RawPost>> {
    let json: serde_json::Value = serde_json::from_slice(bytes).context("posts are not valid JSON")?;
    match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .enumerate()
            .map(|(i, v)| serde_json::from_value(v).with_context(|| format!("post #{i} is malformed")))
            .collect(),
        _ => Err(anyhow!("posts document must be a JSON array")),
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: Url,
}

impl HttpSource {
    /// `base` is the site root, e.g. `https://blog.example.com/`.
    pub fn new(base: &str) -> Result<Self> {
        Self::with_path(base, POSTS_PATH)
    }

    pub fn with_path(base: &str, path: &str) -> Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid base url {base}"))?;
        let url = base.join(path)?;
        let client = Client::builder()
            .user_agent(concat!("blogsearch/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(12))
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url { &self.url }
}

impl PostSource for HttpSource {
    async fn load(&self) -> Result<Vec<RawPost>> {
        let resp = self.client.get(self.url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("GET {} returned {status}", self.url));
        }
        let bytes = resp.bytes().await?;
        tracing::debug!(url = %self.url, bytes = bytes.len(), "fetched posts");
        parse_posts(&bytes)
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl PostSource for FileSource {
    async fn load(&self) -> Result<Vec<RawPost>> {
        let bytes = std::fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        parse_posts(&bytes)
    }
}
