pub mod text;

use std::io::{Cursor, ErrorKind};

use ab_glyph::FontVec;
use image::{imageops, imageops::FilterType, ImageError, ImageFormat, RgbaImage};

use crate::{
    config::{CardConfig, CardLayout},
    error::{CustomizerError, Result},
    models::{CardRequest, PhotoUpload},
};
use text::TextPainter;

/// Builds personalised cards: photo bottom-left, caption bottom-right.
///
/// The base image is re-read for every card so it can be swapped on disk
/// without a restart. The font is loaded once.
pub struct CardComposer {
    config: CardConfig,
    font: Option<FontVec>,
}

impl CardComposer {
    /// Loads the configured (or first available system) font. A missing font
    /// only matters once a card with a caption is requested.
    pub fn new(config: CardConfig) -> Self {
        let font = match text::load_font(config.font_path.as_deref()) {
            Ok((path, font)) => {
                log::info!("Card font: {}", path.display());
                Some(font)
            }
            Err(e) => {
                log::warn!("Captions disabled: {}", e);
                None
            }
        };
        Self { config, font }
    }

    pub fn with_font(config: CardConfig, font: Option<FontVec>) -> Self {
        Self { config, font }
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn load_base(&self) -> Result<RgbaImage> {
        let path = &self.config.base_image_path;
        match image::open(path) {
            Ok(image) => Ok(image.to_rgba8()),
            Err(ImageError::IoError(e)) if e.kind() == ErrorKind::NotFound => {
                log::error!("Base image missing at {}", path.display());
                Err(CustomizerError::BaseImageMissing(path.clone()))
            }
            Err(e) => Err(CustomizerError::ImageError(e.to_string())),
        }
    }

    pub fn compose(&self, request: &CardRequest) -> Result<RgbaImage> {
        let base = self.load_base()?;
        self.compose_onto(base, request)
    }

    pub fn compose_onto(&self, mut card: RgbaImage, request: &CardRequest) -> Result<RgbaImage> {
        let layout = &self.config.layout;

        if let Some(photo) = &request.photo {
            paste_photo(&mut card, photo, layout.photo_size)?;
        }

        let caption = request
            .text
            .as_deref()
            .map(|text| text::truncate_chars(text, layout.max_text_chars))
            .unwrap_or_default();
        if !caption.trim().is_empty() {
            let font = self.font.as_ref().ok_or_else(|| {
                CustomizerError::FontError("no font loaded; set FONT_PATH".into())
            })?;
            draw_caption(&mut card, caption, font, layout);
        }

        Ok(card)
    }

    pub fn render_png(&self, request: &CardRequest) -> Result<Vec<u8>> {
        let card = self.compose(request)?;
        encode_png(&card)
    }
}

fn paste_photo(card: &mut RgbaImage, photo: &PhotoUpload, size: u32) -> Result<()> {
    let decoded = image::load_from_memory(&photo.bytes).map_err(|e| {
        log::warn!("Could not decode {}: {}", photo.filename, e);
        CustomizerError::PhotoError(e.to_string())
    })?;

    if decoded.width() != decoded.height() {
        return Err(CustomizerError::PhotoNotSquare {
            width: decoded.width(),
            height: decoded.height(),
        });
    }

    let resized = decoded
        .resize_exact(size, size, FilterType::Lanczos3)
        .to_rgba8();
    let top = card.height() as i64 - size as i64;
    imageops::overlay(card, &resized, 0, top);
    Ok(())
}

fn draw_caption(card: &mut RgbaImage, caption: &str, font: &FontVec, layout: &CardLayout) {
    let (width, height) = card.dimensions();
    let (half_w, half_h) = (width / 2, height / 2);
    let (quad_w, quad_h) = (width - half_w, height - half_h);
    let area_width = quad_w.saturating_sub(2 * layout.text_padding) as f32;

    let painter = TextPainter::new(font, layout.font_size);
    let lines = text::wrap_words(caption, area_width, |line| painter.line_width(line));
    let line_height = painter.line_height();
    let block_height = line_height * lines.len() as f32;

    let mut top = half_h as f32 + ((quad_h as f32 - block_height) / 2.0).floor();
    for line in &lines {
        let line_width = painter.line_width(line);
        let left = half_w as f32 + ((quad_w as f32 - line_width) / 2.0).floor();
        painter.draw_line(card, left, top, line, layout.text_color);
        top += line_height + layout.line_spacing as f32;
    }
}

pub fn encode_png(card: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    card.write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| CustomizerError::ImageError(e.to_string()))?;
    Ok(buffer.into_inner())
}
