pub mod routes;
pub mod upload;

use std::net::TcpListener;

use actix_web::{dev::Server, http::StatusCode, web, App, HttpResponse, HttpServer, ResponseError};

use crate::{card::CardComposer, config::ServerConfig, error::CustomizerError};

/// Shared, read-only per-process state handed to every request.
pub struct AppState {
    pub config: ServerConfig,
    pub composer: CardComposer,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let composer = CardComposer::new(config.card.clone());
        Self { config, composer }
    }

    /// State whose composer refuses captions; for text-free deployments and tests.
    pub fn without_font(config: ServerConfig) -> Self {
        let composer = CardComposer::with_font(config.card.clone(), None);
        Self { config, composer }
    }
}

impl ResponseError for CustomizerError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(ResponseError::status_code(self))
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

/// The `/generate` HTTP service.
pub struct CardServer {
    state: web::Data<AppState>,
}

impl CardServer {
    pub fn new(config: ServerConfig) -> Self {
        Self::from_state(AppState::new(config))
    }

    pub fn from_state(state: AppState) -> Self {
        Self {
            state: web::Data::new(state),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    /// Binds the configured address and serves until shutdown.
    pub async fn run(self) -> std::io::Result<()> {
        let address = self.state.config.bind_address();
        self.build(HttpServerBind::Address(address))?.await
    }

    /// Serves on an already bound listener; returns the running server handle.
    pub fn listen(self, listener: TcpListener) -> std::io::Result<Server> {
        self.build(HttpServerBind::Listener(listener))
    }

    fn build(self, bind: HttpServerBind) -> std::io::Result<Server> {
        let state = self.state;
        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .configure(routes::configure)
        });

        let server = match bind {
            HttpServerBind::Address(address) => server.bind(address)?,
            HttpServerBind::Listener(listener) => server.listen(listener)?,
        };
        Ok(server.run())
    }
}

enum HttpServerBind {
    Address(String),
    Listener(TcpListener),
}
