use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use blogsearch_core::{parse_posts, PostStore, POSTS_PATH};
use blogsearch_widget::{PageLayout, ResultRenderer, ResultTemplate, Selectors, DEFAULT_PAGE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub title: String,
    /// The post rendered through the page's result template.
    pub html: String,
}

#[derive(Clone)]
pub struct AppState {
    /// Raw posts document, served as-is at the fixed JSON path.
    pub posts_json: Arc<Vec<u8>>,
    pub store: Arc<PostStore>,
    pub renderer: Arc<ResultRenderer>,
}

impl AppState {
    /// Load and validate the posts file; `page_html` supplies the result template.
    pub fn load(posts_path: &Path, page_html: Option<&str>) -> Result<Self> {
        let posts_json = std::fs::read(posts_path).with_context(|| format!("reading {}", posts_path.display()))?;
        let store = PostStore::from_records(parse_posts(&posts_json)?);
        let layout = PageLayout::parse(page_html.unwrap_or(DEFAULT_PAGE), &Selectors::default())?;
        let renderer = ResultRenderer::new(ResultTemplate::parse(&layout.template)?);
        Ok(Self { posts_json: Arc::new(posts_json), store: Arc::new(store), renderer: Arc::new(renderer) })
    }
}

pub fn build_app(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(POSTS_PATH, get(posts_handler))
        .route("/search", get(search_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn posts_handler(State(state): State<AppState>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], state.posts_json.as_ref().clone())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let term = params.q.trim();
    let hits = state.store.scored(term);
    let total_hits = hits.len();
    let k = params.k.clamp(1, 100);

    let results = hits
        .into_iter()
        .take(k)
        .map(|(post, score)| SearchHit {
            id: post.id.clone(),
            score,
            title: post.title.clone(),
            html: state.renderer.render(post).to_html(),
        })
        .collect();

    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results })
}
