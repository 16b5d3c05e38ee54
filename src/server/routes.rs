use std::io::ErrorKind;
use std::path::Path;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::{
    error::CustomizerError,
    logger,
    models::HealthResponse,
    server::{upload, AppState},
};

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/generate", web::post().to(generate))
        .route("/health", web::get().to(health))
        .route("/pkg/{file:.*}", web::get().to(pkg_asset));
}

async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::ok())
}

async fn generate(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, CustomizerError> {
    let request_id = Uuid::new_v4();
    log::info!("[req:{}] POST /generate", request_id);

    let request = upload::read_card_request(payload, state.config.max_upload_bytes)
        .await
        .map_err(|e| {
            log::warn!("[req:{}] rejected form: {}", request_id, e);
            e
        })?;
    log::debug!(
        "[req:{}] photo: {}, text: {} chars",
        request_id,
        request.photo.as_ref().map_or("none", |p| p.filename.as_str()),
        request.text.as_deref().map_or(0, |t| t.chars().count())
    );

    let job_state = state.clone();
    let label = format!("[req:{}] card render", request_id);
    let rendered = web::block(move || {
        let _timer = logger::timer(&label);
        job_state.composer.render_png(&request)
    })
    .await
    .map_err(|e| CustomizerError::InternalError(e.to_string()))?;

    match rendered {
        Ok(png) => {
            log::info!("[req:{}] sent {} byte card", request_id, png.len());
            Ok(HttpResponse::Ok().content_type("image/png").body(png))
        }
        Err(e) => {
            log::warn!("[req:{}] {} ({})", request_id, e, e.http_status());
            Err(e)
        }
    }
}

async fn pkg_asset(
    state: web::Data<AppState>,
    file: web::Path<String>,
) -> Result<HttpResponse, CustomizerError> {
    let Some(dir) = &state.config.pkg_dir else {
        return Ok(HttpResponse::NotFound().finish());
    };
    let file = file.into_inner();
    if file
        .split('/')
        .any(|part| part.is_empty() || part == "." || part == "..")
    {
        return Ok(HttpResponse::NotFound().finish());
    }

    match tokio::fs::read(dir.join(&file)).await {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .content_type(content_type_for(&file))
            .body(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(HttpResponse::NotFound().finish()),
        Err(e) => Err(e.into()),
    }
}

fn content_type_for(file: &str) -> &'static str {
    match Path::new(file).extension().and_then(|ext| ext.to_str()) {
        Some("js") => "text/javascript; charset=utf-8",
        Some("wasm") => "application/wasm",
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("ts") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
