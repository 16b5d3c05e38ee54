//! Behaviour of the submission handler against a scripted endpoint.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use card_customizer::{
    ClientConfig, CustomizerError, Display, FormData, FormSubmission, GenerateTransport,
    GeneratedImage, MemorySurface, PreviewSurface, ResourceUrls, Result, SubmissionHandler,
    SubmitOutcome,
};
use futures::channel::oneshot;

struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<GeneratedImage>>>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
    seen: RefCell<Vec<FormData>>,
    calls: Cell<usize>,
}

impl ScriptedTransport {
    fn new(replies: Vec<Result<GeneratedImage>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            gate: RefCell::new(None),
            seen: RefCell::new(Vec::new()),
            calls: Cell::new(0),
        }
    }

    /// Holds the first request open until the sender fires.
    fn gated(self, gate: oneshot::Receiver<()>) -> Self {
        *self.gate.borrow_mut() = Some(gate);
        self
    }
}

#[async_trait(?Send)]
impl GenerateTransport for ScriptedTransport {
    type Payload = FormData;
    type Image = GeneratedImage;

    async fn generate(&self, payload: &FormData) -> Result<GeneratedImage> {
        self.calls.set(self.calls.get() + 1);
        self.seen.borrow_mut().push(payload.clone());

        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(CustomizerError::TransportError("no scripted reply".into())))
    }
}

type Handler = SubmissionHandler<MemorySurface, ScriptedTransport, ResourceUrls>;

fn handler(transport: ScriptedTransport) -> Handler {
    SubmissionHandler::new(
        MemorySurface::new("Generate Card"),
        transport,
        ResourceUrls::new("http://localhost:5005"),
        ClientConfig::default(),
    )
}

fn card_form() -> FormData {
    FormData::new()
        .file("photo", "me.png", vec![1, 2, 3, 4])
        .text("text", "See you at the matchup")
}

fn image(bytes: &[u8]) -> Result<GeneratedImage> {
    Ok(GeneratedImage::new(bytes.to_vec()).with_content_type("image/png"))
}

fn status(message: &str) -> Result<GeneratedImage> {
    Err(CustomizerError::StatusError {
        status: 400,
        message: message.into(),
    })
}

#[tokio::test]
async fn test_success_points_preview_and_download_at_payload() {
    let payload = b"\x89PNG\r\n\x1a\nfake card".to_vec();
    let handler = handler(ScriptedTransport::new(vec![image(&payload)]));
    let submission = FormSubmission::new(card_form());

    let outcome = handler.on_submit(&submission).await;

    let snapshot = handler.surface().snapshot();
    let source = snapshot.preview_source.clone().expect("preview source set");
    let target = snapshot.download_target.clone().expect("download target set");
    assert_eq!(outcome, SubmitOutcome::Generated(source.clone()));
    assert_eq!(handler.resources().resolve(&source).unwrap().bytes, payload);
    assert_eq!(handler.resources().resolve(&target).unwrap().bytes, payload);
    assert_eq!(snapshot.preview_display, Display::Block);
    assert_eq!(snapshot.download_display, Display::InlineBlock);
    assert_eq!(snapshot.container_border, "none");
    assert!(snapshot.alerts.is_empty());
    assert!(submission.is_default_prevented());
}

#[tokio::test]
async fn test_form_fields_reach_transport_unchanged() {
    let handler = handler(ScriptedTransport::new(vec![image(b"png")]));

    handler.on_submit(&FormSubmission::new(card_form())).await;

    assert_eq!(*handler.transport().seen.borrow(), vec![card_form()]);
}

#[tokio::test]
async fn test_status_error_body_is_shown_verbatim() {
    let handler = handler(ScriptedTransport::new(vec![status("Invalid size")]));

    let outcome = handler.on_submit(&FormSubmission::new(card_form())).await;

    assert_eq!(
        handler.surface().last_alert().as_deref(),
        Some("Failed to generate image: Invalid size")
    );
    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Failed to generate image: Invalid size".into())
    );
}

#[tokio::test]
async fn test_network_error_alerts_and_reenables() {
    let handler = handler(ScriptedTransport::new(vec![Err(
        CustomizerError::TransportError("NetworkError".into()),
    )]));

    handler.on_submit(&FormSubmission::new(card_form())).await;

    let snapshot = handler.surface().snapshot();
    assert_eq!(snapshot.alerts, vec!["Failed to generate image: NetworkError"]);
    assert!(!snapshot.button_disabled);
    assert_eq!(snapshot.button_label, "Generate Card");
    assert!(snapshot.preview_source.is_none());
    assert_eq!(snapshot.download_display, Display::None);
}

#[tokio::test]
async fn test_body_read_error_is_reported_like_transport_error() {
    let handler = handler(ScriptedTransport::new(vec![Err(CustomizerError::BodyError(
        "connection closed mid-body".into(),
    ))]));

    handler.on_submit(&FormSubmission::new(card_form())).await;

    assert_eq!(
        handler.surface().last_alert().as_deref(),
        Some("Failed to generate image: connection closed mid-body")
    );
}

#[tokio::test]
async fn test_enabled_state_survives_every_outcome() {
    let handler = handler(ScriptedTransport::new(vec![
        image(b"one"),
        status("Invalid size"),
        Err(CustomizerError::TransportError("NetworkError".into())),
        image(b"two"),
    ]));

    for _ in 0..4 {
        let before = handler.surface().is_button_disabled();
        handler.on_submit(&FormSubmission::new(card_form())).await;
        assert_eq!(handler.surface().is_button_disabled(), before);
        assert_eq!(handler.surface().button_label(), "Generate Card");
    }
    assert_eq!(handler.transport().calls.get(), 4);
}

#[tokio::test]
async fn test_placeholder_hidden_only_after_first_success() {
    let handler = handler(ScriptedTransport::new(vec![
        status("Invalid size"),
        image(b"card"),
        status("Invalid size"),
    ]));

    handler.on_submit(&FormSubmission::new(card_form())).await;
    assert!(handler.surface().snapshot().placeholder_visible());

    handler.on_submit(&FormSubmission::new(card_form())).await;
    assert!(!handler.surface().snapshot().placeholder_visible());

    handler.on_submit(&FormSubmission::new(card_form())).await;
    let snapshot = handler.surface().snapshot();
    assert!(!snapshot.placeholder_visible());
    assert!(snapshot.preview_source.is_some());
}

#[tokio::test]
async fn test_second_submit_while_generating_is_not_dispatched() {
    let (release, gate) = oneshot::channel();
    let handler = handler(ScriptedTransport::new(vec![image(b"card")]).gated(gate));
    let first = FormSubmission::new(card_form());
    let second = FormSubmission::new(card_form());

    let handler_ref = &handler;
    let second_ref = &second;
    let (first_outcome, second_outcome) = futures::join!(handler.on_submit(&first), async move {
        let snapshot = handler_ref.surface().snapshot();
        assert!(snapshot.button_disabled);
        assert_eq!(snapshot.button_label, "Generating...");

        let outcome = handler_ref.on_submit(second_ref).await;
        release.send(()).expect("first request still waiting");
        outcome
    });

    assert!(matches!(first_outcome, SubmitOutcome::Generated(_)));
    assert_eq!(second_outcome, SubmitOutcome::Ignored);
    assert!(second.is_default_prevented());
    assert_eq!(handler.transport().calls.get(), 1);
    assert!(!handler.surface().is_button_disabled());
    assert_eq!(handler.surface().button_label(), "Generate Card");
}

#[tokio::test]
async fn test_working_label_is_configurable() {
    let (release, gate) = oneshot::channel();
    let handler = SubmissionHandler::new(
        MemorySurface::new("Make it"),
        ScriptedTransport::new(vec![image(b"card")]).gated(gate),
        ResourceUrls::default(),
        ClientConfig::new().with_working_label("Baking..."),
    );
    let submission = FormSubmission::new(card_form());

    let handler_ref = &handler;
    let (_, label_while_busy) = futures::join!(handler.on_submit(&submission), async move {
        let label = handler_ref.surface().button_label();
        release.send(()).expect("request still waiting");
        label
    });

    assert_eq!(label_while_busy, "Baking...");
    assert_eq!(handler.surface().button_label(), "Make it");
}
