#[cfg(all(target_arch = "wasm32", feature = "browser"))]
pub mod fetch;
#[cfg(not(target_arch = "wasm32"))]
pub mod http;
pub mod traits;

#[cfg(all(target_arch = "wasm32", feature = "browser"))]
pub use fetch::FetchTransport;
#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpTransport;
pub use traits::GenerateTransport;
