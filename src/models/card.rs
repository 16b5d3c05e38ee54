/// A photo as it arrived in the `photo` multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// What the card compositor needs from one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardRequest {
    pub photo: Option<PhotoUpload>,
    pub text: Option<String>,
}

impl CardRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// A photo field with an empty filename means the user picked nothing.
    pub fn with_photo(mut self, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        self.photo = if filename.is_empty() {
            None
        } else {
            Some(PhotoUpload { filename, bytes })
        };
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}
