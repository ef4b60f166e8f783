use crate::debounce::Debouncer;
use crate::page::SearchPage;
use crate::render::ResultRenderer;
use blogsearch_core::PostStore;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Idle,
    /// A debounce timer is outstanding.
    Pending,
}

/// Turns keystrokes on the search field into at most one query per quiet period.
pub struct InputController {
    debouncer: Debouncer,
    page: Arc<RwLock<SearchPage>>,
    store: Arc<RwLock<PostStore>>,
    renderer: Arc<ResultRenderer>,
    queries: Arc<AtomicU64>,
}

impl InputController {
    pub fn new(
        delay: Duration,
        page: Arc<RwLock<SearchPage>>,
        store: Arc<RwLock<PostStore>>,
        renderer: Arc<ResultRenderer>,
    ) -> Self {
        Self { debouncer: Debouncer::new(delay), page, store, renderer, queries: Arc::new(AtomicU64::new(0)) }
    }

    /// Keyup or change on the field. Must run inside a tokio runtime.
    pub fn on_input(&self) {
        let page = Arc::clone(&self.page);
        let store = Arc::clone(&self.store);
        let renderer = Arc::clone(&self.renderer);
        let queries = Arc::clone(&self.queries);
        self.debouncer.call(move || {
            queries.fetch_add(1, Ordering::SeqCst);
            run_query(&page, &store, &renderer);
        });
    }

    pub fn state(&self) -> InputState {
        if self.debouncer.is_pending() { InputState::Pending } else { InputState::Idle }
    }

    /// Number of debounced queries that have run.
    pub fn queries_run(&self) -> u64 { self.queries.load(Ordering::SeqCst) }
}

/// Read the field as it is now, query, and redraw the results container.
fn run_query(page: &RwLock<SearchPage>, store: &RwLock<PostStore>, renderer: &ResultRenderer) {
    let term = page.read().input_value().trim().to_string();
    let nodes = {
        let store = store.read();
        let posts = store.filter(&term);
        tracing::debug!(term = %term, hits = posts.len(), "search");
        renderer.render_results(&posts)
    };
    page.write().replace_results(nodes);
}
