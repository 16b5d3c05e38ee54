use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::{
    error::{CustomizerError, Result},
    models::GeneratedImage,
};

/// Mints locally addressable URLs for generated images.
pub trait ResourceStore<I> {
    fn create_url(&self, image: &I) -> Result<String>;
}

/// In-process `blob:` URL registry.
///
/// URLs stay valid for the registry's lifetime; nothing is revoked.
#[derive(Debug, Clone)]
pub struct ResourceUrls {
    origin: String,
    entries: Arc<Mutex<HashMap<String, Arc<GeneratedImage>>>>,
}

impl ResourceUrls {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn resolve(&self, url: &str) -> Option<Arc<GeneratedImage>> {
        self.entries.lock().ok()?.get(url).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResourceUrls {
    fn default() -> Self {
        Self::new("null")
    }
}

impl ResourceStore<GeneratedImage> for ResourceUrls {
    fn create_url(&self, image: &GeneratedImage) -> Result<String> {
        let url = format!("blob:{}/{}", self.origin, Uuid::new_v4());
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CustomizerError::ResourceError(e.to_string()))?;
        entries.insert(url.clone(), Arc::new(image.clone()));
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_resolves_to_same_bytes() {
        let urls = ResourceUrls::new("http://127.0.0.1:5005");
        let image = GeneratedImage::new(vec![0x89, b'P', b'N', b'G']).with_content_type("image/png");

        let url = urls.create_url(&image).unwrap();

        assert!(url.starts_with("blob:http://127.0.0.1:5005/"));
        assert_eq!(urls.resolve(&url).unwrap().as_ref(), &image);
        assert!(urls.resolve("blob:http://127.0.0.1:5005/other").is_none());
    }

    #[test]
    fn test_each_image_gets_fresh_url() {
        let urls = ResourceUrls::default();
        let image = GeneratedImage::new(vec![1]);
        let first = urls.create_url(&image).unwrap();
        let second = urls.create_url(&image).unwrap();
        assert_ne!(first, second);
        assert_eq!(urls.len(), 2);
        assert!(first.starts_with("blob:null/"));
    }
}
