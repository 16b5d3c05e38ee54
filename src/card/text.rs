use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};

use crate::error::{CustomizerError, Result};

/// Checked in order when no font is configured.
pub const FONT_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub fn load_font_file(path: &Path) -> Result<FontVec> {
    let data = fs::read(path)?;
    // Index 0 also picks the first face out of a .ttc collection.
    FontVec::try_from_vec_and_index(data, 0)
        .map_err(|e| CustomizerError::FontError(format!("{}: {}", path.display(), e)))
}

/// Loads `explicit` if given, otherwise the first readable system font.
pub fn load_font(explicit: Option<&Path>) -> Result<(PathBuf, FontVec)> {
    if let Some(path) = explicit {
        return load_font_file(path).map(|font| (path.to_path_buf(), font));
    }

    for candidate in FONT_SEARCH_PATHS.iter().map(Path::new) {
        if !candidate.exists() {
            continue;
        }
        match load_font_file(candidate) {
            Ok(font) => return Ok((candidate.to_path_buf(), font)),
            Err(e) => log::debug!("Skipping font {}: {}", candidate.display(), e),
        }
    }

    Err(CustomizerError::FontError(
        "none of the known system fonts could be loaded; set FONT_PATH".into(),
    ))
}

/// The first `max` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Greedy word wrap. A word wider than `max_width` gets a line of its own;
/// empty lines are never produced.
pub fn wrap_words<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Measures and rasterises single lines of text at a fixed pixel size.
pub struct TextPainter<'f> {
    font: &'f FontVec,
    scale: PxScale,
}

impl<'f> TextPainter<'f> {
    pub fn new(font: &'f FontVec, size: f32) -> Self {
        Self {
            font,
            scale: PxScale::from(size),
        }
    }

    pub fn line_height(&self) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        (scaled.ascent() - scaled.descent()).ceil()
    }

    pub fn line_width(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }

    /// Draws `text` with its line box starting at (`x`, `top`).
    pub fn draw_line(&self, canvas: &mut RgbaImage, x: f32, top: f32, text: &str, color: [u8; 4]) {
        let scaled = self.font.as_scaled(self.scale);
        let baseline = top + scaled.ascent();
        let (width, height) = canvas.dimensions();
        let mut caret = x;
        let mut previous: Option<GlyphId> = None;

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(self.scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + gx as i64;
                let py = bounds.min.y as i64 + gy as i64;
                if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
                    return;
                }
                blend(canvas.get_pixel_mut(px as u32, py as u32), color, coverage);
            });
        }
    }
}

fn blend(pixel: &mut Rgba<u8>, color: [u8; 4], coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0) * color[3] as f32 / 255.0;
    for channel in 0..3 {
        let mixed = pixel[channel] as f32 * (1.0 - alpha) + color[channel] as f32 * alpha;
        pixel[channel] = mixed.round() as u8;
    }
    let covered = pixel[3] as f32 + (255.0 - pixel[3] as f32) * alpha;
    pixel[3] = covered.round() as u8;
}
