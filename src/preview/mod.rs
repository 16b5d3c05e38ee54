pub mod memory;
pub mod resource;
pub mod surface;

use crate::{config::ClientConfig, error::Result, models::FormSubmission, transport::GenerateTransport};

pub use memory::{MemorySurface, SurfaceSnapshot};
pub use resource::{ResourceStore, ResourceUrls};
pub use surface::{Display, PreviewSurface};

/// What one call to [`SubmissionHandler::on_submit`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The trigger was already disabled; nothing was sent.
    Ignored,
    /// The preview and download link now point at this URL.
    Generated(String),
    /// The user was shown this message.
    Failed(String),
}

/// Restores the trigger control when dropped, whichever way the request ends.
struct BusyGuard<'a, S: PreviewSurface> {
    surface: &'a S,
    original_label: String,
}

impl<'a, S: PreviewSurface> BusyGuard<'a, S> {
    fn engage(surface: &'a S, working_label: &str) -> Self {
        let original_label = surface.button_label();
        surface.set_button_label(working_label);
        surface.set_button_disabled(true);
        Self {
            surface,
            original_label,
        }
    }
}

impl<S: PreviewSurface> Drop for BusyGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.set_button_label(&self.original_label);
        self.surface.set_button_disabled(false);
    }
}

/// Runs one generate request per form submission and swaps the preview.
pub struct SubmissionHandler<S, T, R> {
    surface: S,
    transport: T,
    resources: R,
    config: ClientConfig,
}

impl<S, T, R> SubmissionHandler<S, T, R>
where
    S: PreviewSurface,
    T: GenerateTransport,
    R: ResourceStore<T::Image>,
{
    pub fn new(surface: S, transport: T, resources: R, config: ClientConfig) -> Self {
        Self {
            surface,
            transport,
            resources,
            config,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn resources(&self) -> &R {
        &self.resources
    }

    /// Handles a submit event.
    ///
    /// The only suspension point is the transport call. Failures never
    /// escape: they are logged and shown through [`PreviewSurface::alert`],
    /// and the trigger control is re-enabled in every case.
    pub async fn on_submit(&self, submission: &FormSubmission<T::Payload>) -> SubmitOutcome {
        submission.prevent_default();

        if self.surface.is_button_disabled() {
            log::debug!("Submit ignored, a generation is already in flight");
            return SubmitOutcome::Ignored;
        }

        let _busy = BusyGuard::engage(&self.surface, &self.config.working_label);

        match self.generate(submission.payload()).await {
            Ok(url) => SubmitOutcome::Generated(url),
            Err(e) => {
                log::error!("Error: {}", e);
                let message = format!("{}{}", self.config.failure_prefix, e);
                self.surface.alert(&message);
                SubmitOutcome::Failed(message)
            }
        }
    }

    async fn generate(&self, payload: &T::Payload) -> Result<String> {
        let image = self.transport.generate(payload).await?;
        let url = self.resources.create_url(&image)?;

        self.surface.set_preview_source(&url);
        self.surface.set_preview_display(Display::Block);
        self.surface.set_placeholder_display(Display::None);
        self.surface.set_container_border("none");

        self.surface.set_download_target(&url);
        self.surface.set_download_display(Display::InlineBlock);

        log::info!("Preview updated: {}", url);
        Ok(url)
    }
}
