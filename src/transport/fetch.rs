use crate::{
    error::{CustomizerError, Result},
    transport::traits::GenerateTransport,
};
use async_trait::async_trait;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, FormData, Request, RequestInit, Response, Window};

/// `window.fetch` with the form's own `FormData` as the body.
pub struct FetchTransport {
    window: Window,
    path: String,
}

impl FetchTransport {
    pub fn new(window: Window, path: impl Into<String>) -> Self {
        Self {
            window,
            path: path.into(),
        }
    }
}

/// Best-effort message text out of a rejected promise.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

#[async_trait(?Send)]
impl GenerateTransport for FetchTransport {
    type Payload = FormData;
    type Image = Blob;

    async fn generate(&self, payload: &FormData) -> Result<Blob> {
        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(payload.as_ref());

        let request = Request::new_with_str_and_init(&self.path, &init)
            .map_err(|e| CustomizerError::TransportError(js_message(&e)))?;

        let response: Response = JsFuture::from(self.window.fetch_with_request(&request))
            .await
            .map_err(|e| CustomizerError::TransportError(js_message(&e)))?
            .dyn_into()
            .map_err(|e| CustomizerError::TransportError(js_message(&e)))?;

        if !response.ok() {
            let text = response
                .text()
                .map_err(|e| CustomizerError::BodyError(js_message(&e)))?;
            let message = JsFuture::from(text)
                .await
                .map_err(|e| CustomizerError::BodyError(js_message(&e)))?
                .as_string()
                .unwrap_or_default();
            return Err(CustomizerError::StatusError {
                status: response.status(),
                message,
            });
        }

        let blob = response
            .blob()
            .map_err(|e| CustomizerError::BodyError(js_message(&e)))?;
        JsFuture::from(blob)
            .await
            .map_err(|e| CustomizerError::BodyError(js_message(&e)))?
            .dyn_into::<Blob>()
            .map_err(|e| CustomizerError::BodyError(js_message(&e)))
    }
}
