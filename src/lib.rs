//! Personalised event cards.
//!
//! Two halves talk over one endpoint, `POST /generate`:
//!
//! - [`preview::SubmissionHandler`] intercepts the customizer form, posts its
//!   fields as multipart data, and swaps the preview image and download link
//!   for the PNG that comes back. It runs natively against
//!   [`preview::MemorySurface`] and [`transport::HttpTransport`], or in the
//!   browser (`browser` feature on `wasm32`) against the real DOM.
//! - [`server::CardServer`] (`server` feature) answers that endpoint by
//!   compositing the uploaded photo and caption onto the base card.

#[cfg(all(target_arch = "wasm32", feature = "browser"))]
pub mod browser;
pub mod card;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod preview;
#[cfg(all(not(target_arch = "wasm32"), feature = "server"))]
pub mod server;
pub mod share;
pub mod transport;

pub use card::CardComposer;
pub use config::{CardConfig, CardLayout, ClientConfig, ServerConfig};
pub use error::{CustomizerError, Result};
pub use models::{CardRequest, FormData, FormSubmission, FormValue, GeneratedImage};
pub use preview::{
    Display, MemorySurface, PreviewSurface, ResourceStore, ResourceUrls, SubmissionHandler,
    SubmitOutcome,
};
#[cfg(all(not(target_arch = "wasm32"), feature = "server"))]
pub use server::CardServer;
pub use share::ShareLinks;
#[cfg(not(target_arch = "wasm32"))]
pub use transport::HttpTransport;
pub use transport::GenerateTransport;
