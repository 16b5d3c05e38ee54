use crate::{
    config::ClientConfig,
    error::{CustomizerError, Result},
    models::{FormData, FormValue, GeneratedImage},
    transport::traits::GenerateTransport,
};
use async_trait::async_trait;
use reqwest::{
    header::CONTENT_TYPE,
    multipart::{Form, Part},
    Client,
};

/// Posts the form as `multipart/form-data` with reqwest.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CustomizerError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn multipart(form: &FormData) -> Result<Form> {
        let mut multipart = Form::new();
        for (name, value) in form.fields() {
            let part = match value {
                FormValue::Text(text) => Part::text(text.clone()),
                FormValue::File {
                    filename,
                    content_type,
                    bytes,
                } => {
                    let part = Part::bytes(bytes.clone()).file_name(filename.clone());
                    match content_type {
                        Some(mime) => part
                            .mime_str(mime)
                            .map_err(|e| CustomizerError::TransportError(e.to_string()))?,
                        None => part,
                    }
                }
            };
            multipart = multipart.part(name.clone(), part);
        }
        Ok(multipart)
    }
}

#[async_trait(?Send)]
impl GenerateTransport for HttpTransport {
    type Payload = FormData;
    type Image = GeneratedImage;

    async fn generate(&self, payload: &FormData) -> Result<GeneratedImage> {
        let form = Self::multipart(payload)?;

        log::info!(
            "Posting {} form field(s) to {}",
            payload.len(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CustomizerError::TransportError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .map_err(|e| CustomizerError::BodyError(e.to_string()))?;
            log::warn!("Generate endpoint answered {}: {}", status, message);
            return Err(CustomizerError::StatusError {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CustomizerError::BodyError(e.to_string()))?;

        log::debug!("Received {} byte image", bytes.len());

        Ok(GeneratedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_config() {
        let transport =
            HttpTransport::new(&ClientConfig::new().with_base_url("http://example.test")).unwrap();
        assert_eq!(transport.endpoint(), "http://example.test/generate");
    }

    #[test]
    fn test_bad_mime_is_rejected() {
        let mut form = FormData::new();
        form.append_file("photo", "a.png", Some("not a mime".into()), vec![0]);
        assert!(HttpTransport::multipart(&form).is_err());
    }

    #[tokio::test]
    async fn test_refused_connection_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = ClientConfig::new().with_base_url(format!("http://127.0.0.1:{}", port));
        let transport = HttpTransport::new(&config).unwrap();
        let err = transport
            .generate(&FormData::new().text("text", "hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, CustomizerError::TransportError(_)));
    }
}
