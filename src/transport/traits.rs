use crate::error::Result;
use async_trait::async_trait;

/// Carries one form payload to the generate endpoint and hands back the image.
///
/// Futures are not `Send`: a transport is driven from the single UI thread
/// that owns the preview surface.
#[async_trait(?Send)]
pub trait GenerateTransport {
    type Payload;
    type Image;

    async fn generate(&self, payload: &Self::Payload) -> Result<Self::Image>;
}
