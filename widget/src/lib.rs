//! Client-side blog search box: panel, debounced input, and result rendering
//! over a [`PostStore`] fetched once at startup.

pub mod config;
pub mod debounce;
pub mod emoji;
pub mod error;
pub mod input;
pub mod page;
pub mod panel;
pub mod render;
pub mod template;

use blogsearch_core::{PostSource, PostStore};
use parking_lot::RwLock;
use std::sync::Arc;

pub use config::{Selectors, WidgetConfig};
pub use emoji::Emojifier;
pub use error::{TemplateError, WidgetError};
pub use input::{InputController, InputState};
pub use page::{PageLayout, SearchPage, DEFAULT_PAGE};
pub use panel::{ClickEvent, PanelConfig, PanelController, SlidePanel};
pub use render::{ResultNode, ResultRenderer};
pub use template::ResultTemplate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Key released in the search field; carries the field's new value.
    KeyUp(String),
    /// Field value committed (paste, autocomplete, blur).
    Change(String),
    ShowClick,
    CloseClick,
    /// Key pressed anywhere on the page.
    KeyDown(String),
}

/// A search box mounted on a page.
pub struct SearchBox {
    config: WidgetConfig,
    page: Arc<RwLock<SearchPage>>,
    store: Arc<RwLock<PostStore>>,
    renderer: Arc<ResultRenderer>,
    input: InputController,
    panel: PanelController,
}

impl SearchBox {
    /// Bind to `page_html`. Fails if a required element or the template is invalid.
    pub fn mount(config: WidgetConfig, page_html: &str) -> Result<Self, WidgetError> {
        let layout = PageLayout::parse(page_html, &config.selectors)?;
        let template = ResultTemplate::parse(&layout.template)?;
        let renderer = Arc::new(ResultRenderer::new(template).with_no_results_text(config.no_results_text.clone()));

        let emoji = Emojifier::new(config.emoji_img_dir.clone());
        let page = Arc::new(RwLock::new(SearchPage::new(emoji.run(page_html))));
        let store = Arc::new(RwLock::new(PostStore::empty()));

        let input = InputController::new(config.debounce(), Arc::clone(&page), Arc::clone(&store), Arc::clone(&renderer));
        let panel = PanelController::new(SlidePanel::new(config.panel.clone()), Arc::clone(&page));

        tracing::info!(debounce_ms = config.debounce_ms, img_dir = emoji.img_dir(), "search box mounted");
        Ok(Self { config, page, store, renderer, input, panel })
    }

    /// Fetch posts into the store. A failed fetch leaves the store empty, so
    /// every query shows the no-results notice. Returns the number of posts.
    pub async fn load<S: PostSource>(&self, source: &S) -> usize {
        match PostStore::fetch(source).await {
            Ok(store) => {
                let n = store.len();
                *self.store.write() = store;
                n
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch posts");
                0
            }
        }
    }

    /// Feed one UI event. Input events must be dispatched inside a tokio runtime.
    /// Returns true when the event's default action was suppressed.
    pub fn dispatch(&self, event: UiEvent) -> bool {
        match event {
            UiEvent::KeyUp(value) | UiEvent::Change(value) => {
                self.page.write().set_input(value);
                self.input.on_input();
                false
            }
            UiEvent::ShowClick => {
                let mut ev = ClickEvent::new();
                self.panel.show(&mut ev);
                ev.is_default_prevented()
            }
            UiEvent::CloseClick => {
                let mut ev = ClickEvent::new();
                self.panel.close(&mut ev);
                ev.is_default_prevented()
            }
            UiEvent::KeyDown(key) => {
                self.panel.key_down(&key);
                false
            }
        }
    }

    pub fn config(&self) -> &WidgetConfig { &self.config }

    pub fn page(&self) -> Arc<RwLock<SearchPage>> { Arc::clone(&self.page) }

    pub fn store(&self) -> Arc<RwLock<PostStore>> { Arc::clone(&self.store) }

    pub fn renderer(&self) -> &ResultRenderer { &self.renderer }

    pub fn input_value(&self) -> String { self.page.read().input_value().to_string() }

    pub fn results(&self) -> Vec<ResultNode> { self.page.read().results().to_vec() }

    pub fn results_html(&self) -> String { self.page.read().results_html() }

    pub fn input_state(&self) -> InputState { self.input.state() }

    pub fn queries_run(&self) -> u64 { self.input.queries_run() }

    pub fn panel_open(&self) -> bool { self.panel.is_open() }
}
