use std::cell::RefCell;

use super::surface::{Display, PreviewSurface};

pub const DEFAULT_BUTTON_LABEL: &str = "Generate Card";
pub const PLACEHOLDER_BORDER: &str = "2px dashed #ccc";

/// Everything a [`MemorySurface`] currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    pub button_label: String,
    pub button_disabled: bool,
    pub preview_source: Option<String>,
    pub preview_display: Display,
    pub placeholder_display: Display,
    pub container_border: String,
    pub download_target: Option<String>,
    pub download_display: Display,
    pub alerts: Vec<String>,
}

impl SurfaceSnapshot {
    pub fn placeholder_visible(&self) -> bool {
        self.placeholder_display != Display::None
    }
}

/// Headless stand-in for the host page, starting in its pristine state.
#[derive(Debug)]
pub struct MemorySurface {
    state: RefCell<SurfaceSnapshot>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new(DEFAULT_BUTTON_LABEL)
    }
}

impl MemorySurface {
    pub fn new(button_label: impl Into<String>) -> Self {
        Self {
            state: RefCell::new(SurfaceSnapshot {
                button_label: button_label.into(),
                button_disabled: false,
                preview_source: None,
                preview_display: Display::None,
                placeholder_display: Display::Block,
                container_border: PLACEHOLDER_BORDER.to_string(),
                download_target: None,
                download_display: Display::None,
                alerts: Vec::new(),
            }),
        }
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.state.borrow().clone()
    }

    pub fn last_alert(&self) -> Option<String> {
        self.state.borrow().alerts.last().cloned()
    }
}

impl PreviewSurface for MemorySurface {
    fn button_label(&self) -> String {
        self.state.borrow().button_label.clone()
    }

    fn set_button_label(&self, label: &str) {
        self.state.borrow_mut().button_label = label.to_string();
    }

    fn is_button_disabled(&self) -> bool {
        self.state.borrow().button_disabled
    }

    fn set_button_disabled(&self, disabled: bool) {
        self.state.borrow_mut().button_disabled = disabled;
    }

    fn set_preview_source(&self, url: &str) {
        self.state.borrow_mut().preview_source = Some(url.to_string());
    }

    fn set_preview_display(&self, display: Display) {
        self.state.borrow_mut().preview_display = display;
    }

    fn set_placeholder_display(&self, display: Display) {
        self.state.borrow_mut().placeholder_display = display;
    }

    fn set_container_border(&self, border: &str) {
        self.state.borrow_mut().container_border = border.to_string();
    }

    fn set_download_target(&self, url: &str) {
        self.state.borrow_mut().download_target = Some(url.to_string());
    }

    fn set_download_display(&self, display: Display) {
        self.state.borrow_mut().download_display = display;
    }

    fn alert(&self, message: &str) {
        log::warn!("alert: {}", message);
        self.state.borrow_mut().alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pristine_state() {
        let surface = MemorySurface::default();
        let snapshot = surface.snapshot();
        assert_eq!(snapshot.button_label, DEFAULT_BUTTON_LABEL);
        assert!(!snapshot.button_disabled);
        assert!(snapshot.placeholder_visible());
        assert_eq!(snapshot.preview_display, Display::None);
        assert_eq!(snapshot.download_display, Display::None);
        assert_eq!(snapshot.container_border, PLACEHOLDER_BORDER);
        assert!(surface.last_alert().is_none());
    }

    #[test]
    fn test_alerts_accumulate() {
        let surface = MemorySurface::default();
        surface.alert("one");
        surface.alert("two");
        assert_eq!(surface.snapshot().alerts, vec!["one", "two"]);
        assert_eq!(surface.last_alert().as_deref(), Some("two"));
    }
}
