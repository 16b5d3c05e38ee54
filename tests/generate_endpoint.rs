//! The handler talking to a real `/generate` server over HTTP.

#![cfg(feature = "server")]

use std::net::TcpListener;
use std::path::{Path, PathBuf};

use actix_web::{web, App, HttpResponse, HttpServer};
use card_customizer::{
    card::encode_png,
    preview::SurfaceSnapshot,
    server::{AppState, CardServer},
    CardConfig, ClientConfig, FormData, FormSubmission, HttpTransport, MemorySurface,
    ResourceUrls, ServerConfig, SubmissionHandler, SubmitOutcome,
};
use image::{Rgba, RgbaImage};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

fn write_base(dir: &Path) -> PathBuf {
    let path = dir.join("card.png");
    RgbaImage::from_pixel(616, 618, WHITE).save(&path).unwrap();
    path
}

fn photo(width: u32, height: u32) -> Vec<u8> {
    encode_png(&RgbaImage::from_pixel(width, height, BLUE)).unwrap()
}

fn start(config: ServerConfig) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = CardServer::from_state(AppState::without_font(config))
        .listen(listener)
        .unwrap();
    actix_web::rt::spawn(server);
    format!("http://127.0.0.1:{}", port)
}

async fn submit(base_url: &str, form: FormData) -> (SubmitOutcome, ResourceUrls, SurfaceSnapshot) {
    let config = ClientConfig::new().with_base_url(base_url);
    let resources = ResourceUrls::new(config.origin());
    let transport = HttpTransport::new(&config).unwrap();
    let handler =
        SubmissionHandler::new(MemorySurface::default(), transport, resources.clone(), config);

    let outcome = handler.on_submit(&FormSubmission::new(form)).await;
    (outcome, resources, handler.surface().snapshot())
}

#[actix_web::test]
async fn test_photo_card_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig::new().with_card(CardConfig::new().with_base_image(write_base(dir.path())));
    let base_url = start(config);

    let form = FormData::new()
        .file("photo", "square.png", photo(64, 64))
        .text("text", "");
    let (outcome, resources, snapshot) = submit(&base_url, form).await;

    let SubmitOutcome::Generated(url) = outcome else {
        panic!("expected a generated card");
    };
    let generated = resources.resolve(&url).unwrap();
    assert_eq!(generated.content_type.as_deref(), Some("image/png"));

    let card = image::load_from_memory(&generated.bytes).unwrap().to_rgba8();
    assert_eq!(card.dimensions(), (616, 618));
    assert_eq!(*card.get_pixel(5, 617), BLUE);
    assert_eq!(*card.get_pixel(600, 5), WHITE);
    assert!(snapshot.alerts.is_empty());
    assert!(!snapshot.button_disabled);
}

#[actix_web::test]
async fn test_non_square_photo_surfaces_server_message() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig::new().with_card(CardConfig::new().with_base_image(write_base(dir.path())));
    let base_url = start(config);

    let form = FormData::new().file("photo", "wide.png", photo(80, 40));
    let (outcome, _, snapshot) = submit(&base_url, form).await;

    let expected =
        "Failed to generate image: Uploaded image must be square (width equals height).";
    assert_eq!(outcome, SubmitOutcome::Failed(expected.into()));
    assert_eq!(snapshot.alerts.last().map(String::as_str), Some(expected));
}

#[actix_web::test]
async fn test_missing_base_image_surfaces_server_message() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig::new()
        .with_card(CardConfig::new().with_base_image(dir.path().join("absent.png")));
    let base_url = start(config);

    let (outcome, _, _) = submit(&base_url, FormData::new().text("text", "")).await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Failed to generate image: Base image not found on server.".into())
    );
}

#[actix_web::test]
async fn test_oversize_upload_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServerConfig::new()
        .with_max_upload_bytes(32)
        .with_card(CardConfig::new().with_base_image(write_base(dir.path())));
    let base_url = start(config);

    let form = FormData::new().file("photo", "big.png", photo(16, 16));
    let (outcome, _, _) = submit(&base_url, form).await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Failed to generate image: Uploaded image is too large.".into())
    );
}

#[actix_web::test]
async fn test_plain_text_error_body_passed_through() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = HttpServer::new(|| {
        App::new().route(
            "/generate",
            web::post().to(|| async { HttpResponse::BadRequest().body("Invalid size") }),
        )
    })
    .listen(listener)
    .unwrap()
    .run();
    actix_web::rt::spawn(server);

    let (outcome, _, snapshot) = submit(
        &format!("http://127.0.0.1:{}", port),
        FormData::new().text("text", "hello"),
    )
    .await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed("Failed to generate image: Invalid size".into())
    );
    assert_eq!(
        snapshot.alerts.last().map(String::as_str),
        Some("Failed to generate image: Invalid size")
    );
    assert!(!snapshot.button_disabled);
}
