use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GENERATOR_URL: &str = "http://127.0.0.1:5005";
pub const GENERATE_PATH: &str = "/generate";
pub const WORKING_LABEL: &str = "Generating...";
pub const FAILURE_PREFIX: &str = "Failed to generate image: ";

/// Geometry and typography of the personalised card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    /// Edge length the uploaded photo is resized to before pasting bottom-left.
    pub photo_size: u32,
    pub max_text_chars: usize,
    pub font_size: f32,
    /// Inset of the text area inside the bottom-right quadrant.
    pub text_padding: u32,
    pub line_spacing: u32,
    pub text_color: [u8; 4],
}

impl Default for CardLayout {
    fn default() -> Self {
        CardLayout {
            photo_size: 308,
            max_text_chars: 50,
            font_size: 24.0,
            text_padding: 20,
            line_spacing: 5,
            text_color: [0, 0, 0, 255],
        }
    }
}

impl CardLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_photo_size(mut self, size: u32) -> Self {
        self.photo_size = size;
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_max_text_chars(mut self, max: usize) -> Self {
        self.max_text_chars = max;
        self
    }
}

#[derive(Debug, Clone)]
pub struct CardConfig {
    pub base_image_path: PathBuf,
    /// Explicit font; when unset the usual system locations are searched.
    pub font_path: Option<PathBuf>,
    pub layout: CardLayout,
}

impl Default for CardConfig {
    fn default() -> Self {
        CardConfig {
            base_image_path: PathBuf::from("card.png"),
            font_path: None,
            layout: CardLayout::default(),
        }
    }
}

impl CardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_image_path = env::var("BASE_IMAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.base_image_path);
        let font_path = env::var("FONT_PATH").ok().map(PathBuf::from);
        let mut layout = CardLayout::default();
        if let Some(size) = env::var("CARD_FONT_SIZE").ok().and_then(|s| s.parse().ok()) {
            layout.font_size = size;
        }
        if let Some(size) = env::var("CARD_PHOTO_SIZE").ok().and_then(|s| s.parse().ok()) {
            layout.photo_size = size;
        }

        CardConfig {
            base_image_path,
            font_path,
            layout,
        }
    }

    pub fn with_base_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_image_path = path.into();
        self
    }

    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    pub fn with_layout(mut self, layout: CardLayout) -> Self {
        self.layout = layout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the wasm-bindgen output served under `/pkg/`.
    pub pkg_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub card: CardConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5005,
            pkg_dir: None,
            max_upload_bytes: 10 * 1024 * 1024,
            card: CardConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(defaults.port);
        let pkg_dir = env::var("PKG_DIR").ok().map(PathBuf::from);
        let max_upload_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|val| val.parse().ok())
            .unwrap_or(defaults.max_upload_bytes);

        ServerConfig {
            host,
            port,
            pkg_dir,
            max_upload_bytes,
            card: CardConfig::from_env(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_pkg_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.pkg_dir = Some(dir.into());
        self
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    pub fn with_card(mut self, card: CardConfig) -> Self {
        self.card = card;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for the submission handler and its HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub generate_path: String,
    pub working_label: String,
    pub failure_prefix: String,
    /// `None` waits for the server indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_GENERATOR_URL.to_string(),
            generate_path: GENERATE_PATH.to_string(),
            working_label: WORKING_LABEL.to_string(),
            failure_prefix: FAILURE_PREFIX.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let base_url = env::var("GENERATOR_URL").unwrap_or_else(|_| DEFAULT_GENERATOR_URL.into());
        let timeout = env::var("GENERATOR_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs);

        ClientConfig {
            base_url,
            timeout,
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_working_label(mut self, label: impl Into<String>) -> Self {
        self.working_label = label.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.generate_path.trim_start_matches('/')
        )
    }

    /// Origin used when minting `blob:` URLs for generated images.
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_endpoint_joins_path() {
        let config = ClientConfig::new().with_base_url("http://localhost:8080/");
        assert_eq!(config.endpoint(), "http://localhost:8080/generate");
        assert_eq!(config.origin(), "http://localhost:8080");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_default_layout_matches_card_geometry() {
        let layout = CardLayout::default();
        assert_eq!(layout.photo_size, 308);
        assert_eq!(layout.max_text_chars, 50);
        assert_eq!(layout.line_spacing, 5);
    }

    #[test]
    fn test_server_builder() {
        let config = ServerConfig::new().with_host("0.0.0.0").with_port(9000);
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }
}
