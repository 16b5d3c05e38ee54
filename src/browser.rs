//! Browser binding: the submission handler wired to the host page's DOM.
//!
//! Build with `wasm-pack build --target web -- --no-default-features --features browser`
//! and point the server's `PKG_DIR` at the output.

use std::rc::Rc;

use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
use web_sys::{
    Blob, Document, Event, FormData, HtmlAnchorElement, HtmlButtonElement, HtmlElement,
    HtmlFormElement, HtmlImageElement, HtmlTextAreaElement, Url, Window,
};

use crate::{
    config::ClientConfig,
    error::{CustomizerError, Result},
    models::FormSubmission,
    preview::{Display, PreviewSurface, ResourceStore, SubmissionHandler, SubmitOutcome},
    share::{ShareLinks, DOWNLOAD_FILENAME},
    transport::{fetch::js_message, FetchTransport},
};

pub const FORM_ID: &str = "customizer-form";
pub const BUTTON_ID: &str = "generate-btn";
pub const PREVIEW_IMAGE_ID: &str = "preview-image";
pub const PLACEHOLDER_ID: &str = "placeholder-text";
pub const DOWNLOAD_LINK_ID: &str = "download-link";
pub const CONTAINER_ID: &str = "preview-container";
pub const SHARE_SECTION_ID: &str = "share-section";
pub const SHARE_TEXT_ID: &str = "share-text";
pub const SHARE_X_ID: &str = "share-x";
pub const SHARE_LINKEDIN_ID: &str = "share-linkedin";

fn element<T: JsCast>(document: &Document, id: &str) -> Result<T> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| CustomizerError::ConfigError(format!("missing element #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| CustomizerError::ConfigError(format!("#{} has the wrong element type", id)))
}

fn set_display(element: &HtmlElement, display: Display) {
    let _ = element.style().set_property("display", display.as_css());
}

/// Element handles of the host page.
pub struct DomSurface {
    window: Window,
    button: HtmlButtonElement,
    image: HtmlImageElement,
    placeholder: HtmlElement,
    download: HtmlAnchorElement,
    container: HtmlElement,
}

impl DomSurface {
    pub fn from_document(window: Window, document: &Document) -> Result<Self> {
        Ok(Self {
            button: element(document, BUTTON_ID)?,
            image: element(document, PREVIEW_IMAGE_ID)?,
            placeholder: element(document, PLACEHOLDER_ID)?,
            download: element(document, DOWNLOAD_LINK_ID)?,
            container: element(document, CONTAINER_ID)?,
            window,
        })
    }
}

impl PreviewSurface for DomSurface {
    fn button_label(&self) -> String {
        self.button.inner_text()
    }

    fn set_button_label(&self, label: &str) {
        self.button.set_inner_text(label);
    }

    fn is_button_disabled(&self) -> bool {
        self.button.disabled()
    }

    fn set_button_disabled(&self, disabled: bool) {
        self.button.set_disabled(disabled);
    }

    fn set_preview_source(&self, url: &str) {
        self.image.set_src(url);
    }

    fn set_preview_display(&self, display: Display) {
        set_display(&self.image, display);
    }

    fn set_placeholder_display(&self, display: Display) {
        set_display(&self.placeholder, display);
    }

    fn set_container_border(&self, border: &str) {
        let _ = self.container.style().set_property("border", border);
    }

    fn set_download_target(&self, url: &str) {
        self.download.set_href(url);
    }

    fn set_download_display(&self, display: Display) {
        set_display(&self.download, display);
    }

    fn alert(&self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }
}

/// `URL.createObjectURL`; URLs live as long as the page.
pub struct ObjectUrls;

impl ResourceStore<Blob> for ObjectUrls {
    fn create_url(&self, image: &Blob) -> Result<String> {
        Url::create_object_url_with_blob(image)
            .map_err(|e| CustomizerError::ResourceError(js_message(&e)))
    }
}

pub type BrowserHandler = SubmissionHandler<DomSurface, FetchTransport, ObjectUrls>;

fn set_tweet_link(anchor: &HtmlAnchorElement, text: &str) {
    match ShareLinks::new(text).tweet_url() {
        Ok(url) => anchor.set_href(&url),
        Err(e) => log::warn!("Share link not updated: {}", e),
    }
}

/// Fills the share block and keeps the X link in step with the post text.
fn bind_share(document: &Document) -> Result<HtmlElement> {
    let section: HtmlElement = element(document, SHARE_SECTION_ID)?;
    let text: HtmlTextAreaElement = element(document, SHARE_TEXT_ID)?;
    let tweet: HtmlAnchorElement = element(document, SHARE_X_ID)?;
    let linkedin: HtmlAnchorElement = element(document, SHARE_LINKEDIN_ID)?;

    let links = ShareLinks::default();
    if text.value().trim().is_empty() {
        text.set_value(&links.text);
    }
    linkedin.set_href(links.linkedin_url());
    set_tweet_link(&tweet, &text.value());

    let source = text.clone();
    let on_input = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        set_tweet_link(&tweet, &source.value());
    });
    text.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())
        .map_err(|e| CustomizerError::ConfigError(js_message(&e)))?;
    on_input.forget();

    set_display(&section, Display::None);
    Ok(section)
}

/// Binds the submission handler to the page's form.
#[wasm_bindgen]
pub fn attach_customizer() -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // A second attach keeps the logger already installed.
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let config = ClientConfig::default();

    let form: HtmlFormElement =
        element(&document, FORM_ID).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let surface = DomSurface::from_document(window.clone(), &document)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    surface.download.set_download(DOWNLOAD_FILENAME);
    let share = bind_share(&document).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let transport = FetchTransport::new(window, config.generate_path.clone());
    let handler: Rc<BrowserHandler> =
        Rc::new(SubmissionHandler::new(surface, transport, ObjectUrls, config));

    let submit_form = form.clone();
    let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        // Must happen before the listener returns; the handler runs later.
        event.prevent_default();
        let form_data = match FormData::new_with_form(&submit_form) {
            Ok(data) => data,
            Err(e) => {
                log::error!("Could not read form: {}", js_message(&e));
                return;
            }
        };
        let handler = Rc::clone(&handler);
        let share = share.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let submission = FormSubmission::new(form_data);
            if let SubmitOutcome::Generated(_) = handler.on_submit(&submission).await {
                set_display(&share, Display::Block);
            }
        });
    });

    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();
    Ok(())
}
