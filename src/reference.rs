//! Reference image overlay
//!
//! A background image the user traces over. It can be moved and scaled with
//! the Transform Reference tool; while a drag is in progress only the rendered
//! offset/scale changes, the stored transform is updated on release.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;

use crate::error::ImageError;
use crate::render::Surface;
use crate::types::{Point, Rect, Tool};

/// Side of the square scale markers drawn at two corners of the image.
pub const MARKER_SIZE: f64 = 32.0;
/// Smallest scale the image can be given.
pub const MIN_SCALE: f64 = 0.1;
/// Scale change per pixel of vertical pointer motion.
pub const SCALE_PER_PIXEL: f64 = 0.01;
/// Encoded payloads of this many bytes or more are left out of snapshots.
pub const MAX_PERSISTED_IMAGE_BYTES: usize = 4_000_000;

pub const DEFAULT_OPACITY: f64 = 0.5;
pub const DEFAULT_OUTLINE_COLOR: &str = "#00ff00";

/// Decoded pixels, shared cheaply with draw lists.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: Arc<RgbaImage>,
    /// Bumped on every successful decode so hosts can cache textures.
    pub generation: u64,
}

impl DecodedImage {
    pub fn width(&self) -> f64 {
        self.pixels.width() as f64
    }

    pub fn height(&self) -> f64 {
        self.pixels.height() as f64
    }
}

#[derive(Debug, Clone, Default)]
pub enum DecodeState {
    #[default]
    Unset,
    /// Data set, waiting for the host to run the decode.
    Pending,
    Ready(DecodedImage),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDragMode {
    Moving,
    Scaling,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ImageDrag {
    mode: ImageDragMode,
    anchor: Point,
}

#[derive(Debug, Clone)]
pub struct ReferenceImage {
    data: String,
    decode: DecodeState,
    generation: u64,
    offset: Point,
    scale: f64,
    opacity: f64,
    color: String,
    drag: Option<ImageDrag>,
}

impl Default for ReferenceImage {
    fn default() -> Self {
        Self {
            data: String::new(),
            decode: DecodeState::Unset,
            generation: 0,
            offset: Point::ZERO,
            scale: 1.0,
            opacity: DEFAULT_OPACITY,
            color: DEFAULT_OUTLINE_COLOR.to_string(),
            drag: None,
        }
    }
}

impl ReferenceImage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    /// Set the encoded payload (a base64 data URL). An empty string clears
    /// the image. Decoding happens later in [`ReferenceImage::complete_decode`].
    pub fn set_data(&mut self, data: impl Into<String>) {
        let data = data.into();
        if data.is_empty() {
            self.clear();
            return;
        }
        self.data = data;
        self.decode = DecodeState::Pending;
        self.drag = None;
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.decode = DecodeState::Unset;
        self.drag = None;
    }

    pub fn decode_state(&self) -> &DecodeState {
        &self.decode
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.decode, DecodeState::Pending)
    }

    /// Run a pending decode. Returns true if the state changed.
    pub fn complete_decode(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        match decode_data_url(&self.data) {
            Ok(pixels) => {
                self.generation += 1;
                tracing::debug!(
                    "Reference image decoded: {}x{}",
                    pixels.width(),
                    pixels.height()
                );
                self.decode = DecodeState::Ready(DecodedImage {
                    pixels: Arc::new(pixels),
                    generation: self.generation,
                });
            }
            Err(e) => {
                tracing::warn!("Reference image could not be decoded: {}", e);
                self.decode = DecodeState::Failed;
            }
        }
        true
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.decode, DecodeState::Ready(_))
    }

    pub fn image(&self) -> Option<&DecodedImage> {
        match &self.decode {
            DecodeState::Ready(image) => Some(image),
            _ => None,
        }
    }

    /// Payload to store in a snapshot, or an empty string when it is too
    /// large for the store.
    pub fn persistable_data(&self) -> &str {
        if self.data.len() < MAX_PERSISTED_IMAGE_BYTES {
            &self.data
        } else {
            tracing::warn!(
                "Reference image is {} bytes, omitting it from the snapshot",
                self.data.len()
            );
            ""
        }
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.max(MIN_SCALE);
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn reset_transforms(&mut self) {
        self.offset = Point::ZERO;
        self.scale = 1.0;
    }

    pub fn drag_mode(&self) -> Option<ImageDragMode> {
        self.drag.map(|d| d.mode)
    }

    /// Bounding box of the image at the given transform.
    fn bounds_at(&self, offset: Point, scale: f64) -> Option<Rect> {
        self.image()
            .map(|img| Rect::new(offset.x, offset.y, img.width() * scale, img.height() * scale))
    }

    /// Bounding box at the committed transform; `None` until decoded.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds_at(self.offset, self.scale)
    }

    /// The two scale markers: top-left and bottom-right corners of `bounds`.
    fn markers(bounds: &Rect) -> [Rect; 2] {
        let max = bounds.max();
        [
            Rect::new(bounds.x, bounds.y, MARKER_SIZE, MARKER_SIZE),
            Rect::new(max.x - MARKER_SIZE, max.y - MARKER_SIZE, MARKER_SIZE, MARKER_SIZE),
        ]
    }

    /// Start a move or scale drag if `pos` lies on the image.
    pub fn pointer_down(&mut self, pos: Point) {
        let Some(bounds) = self.bounds() else {
            return;
        };
        if !bounds.contains(&pos) {
            return;
        }
        let mode = if Self::markers(&bounds).iter().any(|m| m.contains(&pos)) {
            ImageDragMode::Scaling
        } else {
            ImageDragMode::Moving
        };
        tracing::debug!("Reference drag started: {:?}", mode);
        self.drag = Some(ImageDrag { mode, anchor: pos });
    }

    /// Offset to draw at, including an in-progress move.
    pub fn preview_offset(&self, pointer: Point) -> Point {
        match self.drag {
            Some(ImageDrag {
                mode: ImageDragMode::Moving,
                anchor,
            }) => self.offset + (pointer - anchor),
            _ => self.offset,
        }
    }

    /// Scale to draw at, including an in-progress scale drag. Dragging up
    /// grows the image.
    pub fn preview_scale(&self, pointer: Point) -> f64 {
        match self.drag {
            Some(ImageDrag {
                mode: ImageDragMode::Scaling,
                anchor,
            }) => scaled(self.scale, pointer.y - anchor.y),
            _ => self.scale,
        }
    }

    /// Commit an in-progress drag. Returns true if one was active.
    pub fn pointer_up(&mut self, pointer: Point) -> bool {
        if self.drag.is_none() {
            return false;
        }
        self.offset = self.preview_offset(pointer);
        self.scale = self.preview_scale(pointer);
        self.drag = None;
        true
    }

    pub fn render(&self, surface: &mut dyn Surface, tool: Tool, pointer: Point) {
        let Some(image) = self.image() else {
            return;
        };
        let offset = self.preview_offset(pointer);
        let scale = self.preview_scale(pointer);
        let Some(bounds) = self.bounds_at(offset, scale) else {
            return;
        };

        surface.set_global_alpha(self.opacity);
        surface.draw_image(image, bounds);
        surface.set_global_alpha(1.0);

        if tool == Tool::TransformReference {
            surface.set_stroke_color(&self.color);
            surface.set_fill_color(&self.color);
            surface.set_line_width(1.0);
            surface.stroke_rect(bounds);
            for marker in Self::markers(&bounds) {
                surface.fill_rect(marker);
            }
        }
    }
}

/// Scale after a vertical drag of `delta_y` pixels.
pub fn scaled(scale: f64, delta_y: f64) -> f64 {
    (scale - delta_y * SCALE_PER_PIXEL).max(MIN_SCALE)
}

/// Decode a `data:<mime>;base64,<payload>` URL into RGBA pixels.
pub fn decode_data_url(data: &str) -> Result<RgbaImage, ImageError> {
    let rest = data.strip_prefix("data:").ok_or(ImageError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(ImageError::NotDataUrl)?;
    if !header.ends_with(";base64") {
        return Err(ImageError::NotDataUrl);
    }
    let bytes = STANDARD.decode(payload.trim())?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

/// Encode raw image file bytes as a data URL, guessing the MIME type from the
/// file contents.
pub fn encode_data_url(bytes: &[u8]) -> String {
    let mime = match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => "image/jpeg",
        _ => "image/png",
    };
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_drag_is_inverted_and_clamped() {
        assert!((scaled(1.0, 50.0) - 0.5).abs() < 1e-12);
        assert_eq!(scaled(1.0, 1000.0), MIN_SCALE);
        assert!((scaled(1.0, -100.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn data_url_without_base64_marker_is_rejected() {
        assert!(matches!(
            decode_data_url("data:image/png,abcd"),
            Err(ImageError::NotDataUrl)
        ));
        assert!(matches!(decode_data_url("hello"), Err(ImageError::NotDataUrl)));
    }
}
