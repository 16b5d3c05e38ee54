use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;

use crate::{
    error::{CustomizerError, Result},
    models::CardRequest,
};

pub const PHOTO_FIELD: &str = "photo";
pub const TEXT_FIELD: &str = "text";

/// Collects the `photo` and `text` fields of a `/generate` submission.
/// Unknown fields are drained and ignored.
pub async fn read_card_request(mut payload: Multipart, limit: usize) -> Result<CardRequest> {
    let mut request = CardRequest::new();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| CustomizerError::FormError(e.to_string()))?
    {
        let name = field.name().to_string();
        let filename = field
            .content_disposition()
            .get_filename()
            .map(String::from);
        let bytes = read_field(&mut field, limit).await?;

        match name.as_str() {
            PHOTO_FIELD => {
                request = request.with_photo(filename.unwrap_or_default(), bytes);
            }
            TEXT_FIELD => {
                let text = String::from_utf8(bytes)
                    .map_err(|_| CustomizerError::FormError("text must be UTF-8".into()))?;
                request = request.with_text(text);
            }
            other => log::debug!("Ignoring form field '{}'", other),
        }
    }

    Ok(request)
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| CustomizerError::FormError(e.to_string()))?
    {
        if bytes.len() + chunk.len() > limit {
            return Err(CustomizerError::UploadTooLarge { limit });
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
