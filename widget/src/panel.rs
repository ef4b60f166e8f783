use crate::page::SearchPage;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub container_selector: String,
    pub direction: Direction,
    pub duration_ms: u64,
    pub transition: String,
    pub distance_x: String,
    pub enable_escape_key: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            container_selector: "body".into(),
            direction: Direction::Right,
            duration_ms: 300,
            transition: "ease".into(),
            distance_x: "300px".into(),
            enable_escape_key: true,
        }
    }
}

/// Slide-out panel holding the search UI. Only visibility is tracked.
#[derive(Debug, Clone, Default)]
pub struct SlidePanel {
    config: PanelConfig,
    open: bool,
}

impl SlidePanel {
    pub fn new(config: PanelConfig) -> Self {
        Self { config, open: false }
    }

    pub fn config(&self) -> &PanelConfig { &self.config }

    pub fn is_open(&self) -> bool { self.open }

    pub fn open(&mut self) { self.open = true; }

    pub fn close(&mut self) { self.open = false; }

    pub fn toggle(&mut self) { self.open = !self.open; }
}

/// Click on a trigger element.
#[derive(Debug, Clone, Default)]
pub struct ClickEvent {
    default_prevented: bool,
}

impl ClickEvent {
    pub fn new() -> Self { Self::default() }

    pub fn prevent_default(&mut self) { self.default_prevented = true; }

    pub fn is_default_prevented(&self) -> bool { self.default_prevented }
}

pub struct PanelController {
    panel: Mutex<SlidePanel>,
    page: Arc<RwLock<SearchPage>>,
}

impl PanelController {
    pub fn new(panel: SlidePanel, page: Arc<RwLock<SearchPage>>) -> Self {
        Self { panel: Mutex::new(panel), page }
    }

    pub fn show(&self, ev: &mut ClickEvent) {
        ev.prevent_default();
        self.page.write().clear_input();
        self.panel.lock().open();
    }

    pub fn close(&self, ev: &mut ClickEvent) {
        ev.prevent_default();
        self.page.write().clear_input();
        self.panel.lock().close();
    }

    /// Escape closes the panel when enabled. Returns whether the key was handled.
    pub fn key_down(&self, key: &str) -> bool {
        let mut panel = self.panel.lock();
        if key == "Escape" && panel.config().enable_escape_key && panel.is_open() {
            panel.close();
            return true;
        }
        false
    }

    pub fn is_open(&self) -> bool { self.panel.lock().is_open() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> (PanelController, Arc<RwLock<SearchPage>>) {
        let page = Arc::new(RwLock::new(SearchPage::default()));
        (PanelController::new(SlidePanel::new(PanelConfig::default()), Arc::clone(&page)), page)
    }

    #[test]
    fn show_then_close_clears_input_each_time() {
        let (ctl, page) = controller();

        page.write().set_input("left over");
        let mut ev = ClickEvent::new();
        ctl.show(&mut ev);
        assert!(ev.is_default_prevented());
        assert!(ctl.is_open());
        assert_eq!(page.read().input_value(), "");

        page.write().set_input("typed");
        let mut ev = ClickEvent::new();
        ctl.close(&mut ev);
        assert!(ev.is_default_prevented());
        assert!(!ctl.is_open());
        assert_eq!(page.read().input_value(), "");
    }

    #[test]
    fn escape_closes_without_clearing() {
        let (ctl, page) = controller();
        ctl.show(&mut ClickEvent::new());
        page.write().set_input("keep");

        assert!(!ctl.key_down("Enter"));
        assert!(ctl.key_down("Escape"));
        assert!(!ctl.is_open());
        assert_eq!(page.read().input_value(), "keep");
        // already closed
        assert!(!ctl.key_down("Escape"));
    }

    #[test]
    fn escape_can_be_disabled() {
        let page = Arc::new(RwLock::new(SearchPage::default()));
        let config = PanelConfig { enable_escape_key: false, ..PanelConfig::default() };
        let ctl = PanelController::new(SlidePanel::new(config), page);
        ctl.show(&mut ClickEvent::new());
        assert!(!ctl.key_down("Escape"));
        assert!(ctl.is_open());
    }

    #[test]
    fn toggle_flips() {
        let mut panel = SlidePanel::new(PanelConfig::default());
        panel.toggle();
        assert!(panel.is_open());
        panel.toggle();
        assert!(!panel.is_open());
    }

    #[test]
    fn config_from_json() {
        let cfg: PanelConfig = serde_json::from_str(r#"{"direction": "left"}"#).unwrap();
        assert_eq!(cfg.direction, Direction::Left);
        assert_eq!(cfg.distance_x, "300px");
    }
}
