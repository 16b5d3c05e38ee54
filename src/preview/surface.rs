/// CSS `display` values the handler toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    None,
    Block,
    InlineBlock,
}

impl Display {
    pub fn as_css(&self) -> &'static str {
        match self {
            Display::None => "none",
            Display::Block => "block",
            Display::InlineBlock => "inline-block",
        }
    }
}

/// The page elements the submission handler reads and writes.
///
/// Methods take `&self`: implementations sit on the single UI thread and
/// use interior mutability, the way DOM handles do.
pub trait PreviewSurface {
    fn button_label(&self) -> String;
    fn set_button_label(&self, label: &str);
    fn is_button_disabled(&self) -> bool;
    fn set_button_disabled(&self, disabled: bool);

    fn set_preview_source(&self, url: &str);
    fn set_preview_display(&self, display: Display);
    fn set_placeholder_display(&self, display: Display);
    fn set_container_border(&self, border: &str);

    fn set_download_target(&self, url: &str);
    fn set_download_display(&self, display: Display);

    /// Blocking user notification.
    fn alert(&self, message: &str);
}
