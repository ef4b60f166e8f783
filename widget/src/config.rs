use crate::panel::PanelConfig;
use anyhow::Result;
use blogsearch_core::POSTS_PATH;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const NO_RESULTS_TEXT: &str = "No results found...";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub posts_path: String,
    pub debounce_ms: u64,
    pub emoji_img_dir: String,
    pub no_results_text: String,
    pub selectors: Selectors,
    pub panel: PanelConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            posts_path: POSTS_PATH.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            emoji_img_dir: "/img/emoji/".to_string(),
            no_results_text: NO_RESULTS_TEXT.to_string(),
            selectors: Selectors::default(),
            panel: PanelConfig::default(),
        }
    }
}

impl WidgetConfig {
    /// Missing keys fall back to their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn debounce(&self) -> Duration { Duration::from_millis(self.debounce_ms) }
}

/// CSS selectors for the elements the widget binds to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub input: String,
    pub results: String,
    pub show: String,
    pub close: String,
    pub panel: String,
    pub template: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            input: ".site-search".into(),
            results: ".results".into(),
            show: ".show-search".into(),
            close: ".close-search".into(),
            panel: "#search-container".into(),
            template: "#search-result".into(),
        }
    }
}

impl Selectors {
    /// (name, selector) pairs for every element that must exist on the page.
    pub fn required(&self) -> [(&'static str, &str); 6] {
        [
            ("input", self.input.as_str()),
            ("results", self.results.as_str()),
            ("show", self.show.as_str()),
            ("close", self.close.as_str()),
            ("panel", self.panel.as_str()),
            ("template", self.template.as_str()),
        ]
    }
}
