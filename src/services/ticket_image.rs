//! Ticket image export.
//!
//! The ticket is laid out as SVG, rasterized with `resvg`, and the uploaded
//! avatar is composited into its frame before PNG encoding.

use image::{imageops, DynamicImage, ImageFormat, RgbaImage};
use std::fmt::Write as _;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::ticket_card::{TicketCard, BARCODE_BARS};
use crate::avatars::Avatar;
use crate::config::RenderConfig;
use crate::views::escape;

pub const TICKET_FILE_NAME: &str = "my_ticket.png";

const WIDTH: f32 = 400.0;
const HEIGHT: f32 = 640.0;
// inner square of the avatar frame
const AVATAR_X: f32 = 124.0;
const AVATAR_Y: f32 = 124.0;
const AVATAR_SIZE: f32 = 152.0;
const MAX_DIM: u32 = 8192;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("ticket svg is invalid: {0}")]
    Svg(#[from] usvg::Error),
    #[error("failed to allocate a {0}x{1} pixmap")]
    Pixmap(u32, u32),
    #[error("failed to encode png: {0}")]
    Encode(#[from] image::ImageError),
    #[error("render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Clone)]
pub struct TicketRenderer {
    fontdb: Arc<usvg::fontdb::Database>,
    scale: f32,
}

impl TicketRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        let mut db = usvg::fontdb::Database::new();
        if config.load_system_fonts {
            db.load_system_fonts();
        }
        if let Some(dir) = config.fonts_dir.as_deref() {
            db.load_fonts_dir(Path::new(dir));
        }
        info!("Ticket renderer ready with {} font faces", db.len());

        let scale = if config.scale.is_finite() && config.scale > 0.0 { config.scale } else { 1.0 };
        Self { fontdb: Arc::new(db), scale }
    }

    /// Renders `card` to PNG bytes off the async executor.
    pub async fn render_png(&self, card: &TicketCard, avatar: Option<Avatar>) -> Result<Vec<u8>, RenderError> {
        let svg = compose_svg(card);
        let fontdb = self.fontdb.clone();
        let scale = self.scale;
        tokio::task::spawn_blocking(move || rasterize(&svg, fontdb, scale, avatar.as_ref())).await?
    }
}

/// Lays out the ticket as an SVG document.
pub fn compose_svg(card: &TicketCard) -> String {
    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"##
    );
    svg.push_str(r##"<rect width="400" height="640" rx="24" fill="#0E464F"/>"##);
    let _ = write!(
        svg,
        r##"<text x="200" y="52" text-anchor="middle" font-size="22" font-weight="bold" fill="#FFFFFF">{}</text>"##,
        escape(&card.title)
    );
    let _ = write!(
        svg,
        r##"<text x="200" y="80" text-anchor="middle" font-size="12" fill="#D1D5DB">{}</text>"##,
        escape(&card.venue)
    );
    let _ = write!(
        svg,
        r##"<text x="200" y="98" text-anchor="middle" font-size="12" fill="#D1D5DB">{}</text>"##,
        escape(&card.when)
    );

    // avatar frame; the photo itself is composited after rasterizing
    svg.push_str(r##"<rect x="120" y="120" width="160" height="160" rx="8" fill="#08252B" stroke="#197686" stroke-width="8"/>"##);

    svg.push_str(r##"<rect x="24" y="304" width="352" height="216" rx="12" fill="#133D44" stroke="#6B7280"/>"##);
    svg.push_str(r##"<line x1="36" y1="364" x2="364" y2="364" stroke="#6B7280"/>"##);
    svg.push_str(r##"<line x1="36" y1="424" x2="364" y2="424" stroke="#6B7280"/>"##);
    field(&mut svg, 40.0, 330.0, "Enter your name", &card.full_name);
    field(&mut svg, 208.0, 330.0, "Enter your email *", &card.email);
    field(&mut svg, 40.0, 390.0, "Ticket Type:", &card.ticket_type);
    field(&mut svg, 208.0, 390.0, "Ticket for:", &card.num_tickets.to_string());

    let _ = write!(
        svg,
        r##"<text x="40" y="448" font-size="10" fill="#9CA3AF">Special request?</text>"##
    );
    for (i, line) in card.about_lines().iter().enumerate() {
        let _ = write!(
            svg,
            r##"<text x="40" y="{}" font-size="12" font-weight="bold" fill="#FFFFFF">{}</text>"##,
            468 + i * 18,
            escape(line)
        );
    }

    svg.push_str(r##"<rect x="24" y="544" width="352" height="48" rx="4" fill="#FFFFFF"/>"##);
    let pitch = 280.0 / BARCODE_BARS as f32;
    for (i, opacity) in card.barcode.iter().enumerate() {
        let _ = write!(
            svg,
            r##"<rect x="{:.2}" y="552" width="4" height="32" fill="#000000" fill-opacity="{:.3}"/>"##,
            60.0 + i as f32 * pitch,
            opacity
        );
    }

    svg.push_str("</svg>");
    svg
}

fn field(svg: &mut String, x: f32, y: f32, label: &str, value: &str) {
    let _ = write!(
        svg,
        r##"<text x="{x}" y="{y}" font-size="10" fill="#9CA3AF">{}</text><text x="{x}" y="{}" font-size="13" font-weight="bold" fill="#FFFFFF">{}</text>"##,
        escape(label),
        y + 20.0,
        escape(value)
    );
}

fn rasterize(
    svg: &str,
    fontdb: Arc<usvg::fontdb::Database>,
    scale: f32,
    avatar: Option<&Avatar>,
) -> Result<Vec<u8>, RenderError> {
    let options = usvg::Options {
        fontdb,
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg, &options)?;

    let size = tree.size();
    let width = ((size.width() * scale).ceil() as u32).clamp(1, MAX_DIM);
    let height = ((size.height() * scale).ceil() as u32).clamp(1, MAX_DIM);
    let mut pixmap =
        resvg::tiny_skia::Pixmap::new(width, height).ok_or(RenderError::Pixmap(width, height))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    let mut rgba = pixmap.take();
    unpremultiply_rgba8_in_place(&mut rgba);
    let mut canvas =
        RgbaImage::from_raw(width, height, rgba).ok_or(RenderError::Pixmap(width, height))?;

    if let Some(avatar) = avatar {
        composite_avatar(&mut canvas, avatar, scale);
    }

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    debug!("Rendered ticket {}x{} ({} bytes)", width, height, png.len());
    Ok(png)
}

// An undecodable photo leaves the frame empty rather than failing the export
fn composite_avatar(canvas: &mut RgbaImage, avatar: &Avatar, scale: f32) {
    let photo = match image::load_from_memory(&avatar.bytes) {
        Ok(photo) => photo,
        Err(e) => {
            warn!("Skipping avatar ({}): {e}", avatar.content_type);
            return;
        }
    };
    let side = ((AVATAR_SIZE * scale).round() as u32).max(1);
    let fitted = photo.resize_to_fill(side, side, imageops::FilterType::Triangle).to_rgba8();
    imageops::overlay(
        canvas,
        &fitted,
        (AVATAR_X * scale).round() as i64,
        (AVATAR_Y * scale).round() as i64,
    );
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingRecord, Event};
    use axum::body::Bytes;

    fn renderer() -> TicketRenderer {
        TicketRenderer::new(&RenderConfig {
            scale: 1.0,
            fonts_dir: None,
            load_system_fonts: false,
        })
    }

    fn card(record: &BookingRecord) -> TicketCard {
        TicketCard::new(record, &Event::techember())
    }

    fn png_of(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba(color));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn svg_escapes_user_text() {
        let record = BookingRecord {
            full_name: "<script>alert(1)</script>".into(),
            about: "Fish & chips".into(),
            ..Default::default()
        };
        let svg = compose_svg(&card(&record));
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;"));
        assert!(svg.contains("Fish &amp; chips"));
    }

    #[test]
    fn svg_shows_placeholders() {
        let svg = compose_svg(&card(&BookingRecord::default()));
        assert!(svg.contains(">N/A<"));
        assert!(svg.contains(">VIP<"));
        assert!(svg.contains("Techember Fest &#39;25"));
    }

    #[test]
    fn svg_parses() {
        let svg = compose_svg(&card(&BookingRecord::default()));
        assert!(usvg::Tree::from_str(&svg, &usvg::Options::default()).is_ok());
    }

    #[tokio::test]
    async fn renders_a_png_of_the_ticket_size() {
        let png = renderer().render_png(&card(&BookingRecord::default()), None).await.unwrap();
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (400, 640));
    }

    #[tokio::test]
    async fn avatar_is_composited_into_the_frame() {
        let avatar = Avatar {
            content_type: "image/png".into(),
            bytes: Bytes::from(png_of(8, 8, [255, 0, 0, 255])),
        };
        let png = renderer()
            .render_png(&card(&BookingRecord::default()), Some(avatar))
            .await
            .unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(200, 200).0, [255, 0, 0, 255]);
    }

    #[tokio::test]
    async fn broken_avatar_does_not_fail_the_export() {
        let avatar = Avatar {
            content_type: "image/jpeg".into(),
            bytes: Bytes::from_static(b"definitely not a jpeg"),
        };
        let result = renderer().render_png(&card(&BookingRecord::default()), Some(avatar)).await;
        assert!(result.is_ok());
    }

    #[test]
    fn unpremultiply_restores_straight_alpha() {
        let mut px = [64u8, 32, 0, 128];
        unpremultiply_rgba8_in_place(&mut px);
        assert_eq!(px, [128, 64, 0, 128]);
    }
}
