//! Map text drawn with `rusttype` from the embedded DejaVu Sans faces.
//!
//! Glyphs are rasterized into a coverage mask first, so a halo is the same
//! mask composited at every offset within its radius before the text itself.

use std::sync::OnceLock;

use rusttype::{point, Font, PositionedGlyph, Scale};
use tiny_skia::{Paint, Pixmap, PremultipliedColorU8};
use tracing::warn;
use wx_common::Rgba;

/// Embedded font data - DejaVu Sans, regular and bold
const REGULAR_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const BOLD_FONT: &[u8] = include_bytes!("../assets/DejaVuSans-Bold.ttf");

/// Cap height over rusttype's pixel scale, used when the `H` glyph is absent.
const FALLBACK_CAP_RATIO: f32 = 0.63;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    /// `y` is the baseline.
    Baseline,
    /// `y` is the middle of the cap height.
    Middle,
    /// `y` is the cap line.
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Cap height in pixels.
    pub size: f32,
    pub color: Rgba,
    pub bold: bool,
    /// Outline color and radius in pixels.
    pub halo: Option<(Rgba, f32)>,
    pub align: Align,
    pub valign: VAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 12.0,
            color: [0, 0, 0, 255],
            bold: false,
            halo: None,
            align: Align::Left,
            valign: VAlign::Baseline,
        }
    }
}

impl TextStyle {
    pub fn sized(size: f32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn halo(mut self, color: Rgba, width: f32) -> Self {
        self.halo = Some((color, width));
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn valign(mut self, valign: VAlign) -> Self {
        self.valign = valign;
        self
    }
}

fn font(bold: bool) -> Option<&'static Font<'static>> {
    static REGULAR: OnceLock<Option<Font<'static>>> = OnceLock::new();
    static BOLD: OnceLock<Option<Font<'static>>> = OnceLock::new();

    let (cell, data) = if bold { (&BOLD, BOLD_FONT) } else { (&REGULAR, REGULAR_FONT) };
    cell.get_or_init(|| {
        let font = Font::try_from_bytes(data);
        if font.is_none() {
            warn!(bold, "Failed to load embedded font, text will be skipped");
        }
        font
    })
    .as_ref()
}

/// rusttype scale giving a cap height of `size` pixels.
fn scale_for(font: &Font<'_>, size: f32) -> Scale {
    let ratio = font
        .glyph('H')
        .scaled(Scale::uniform(1.0))
        .exact_bounding_box()
        .map(|bb| bb.max.y - bb.min.y)
        .filter(|h| *h > 0.0)
        .unwrap_or(FALLBACK_CAP_RATIO);
    Scale::uniform(size / ratio)
}

fn advance(glyphs: &[PositionedGlyph<'_>], origin: f32) -> f32 {
    glyphs
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width - origin)
        .unwrap_or(0.0)
}

/// Advance width of `text` in pixels.
pub fn text_width(text: &str, style: &TextStyle) -> f32 {
    let Some(font) = font(style.bold) else {
        return 0.0;
    };
    let glyphs: Vec<_> = font.layout(text, scale_for(font, style.size), point(0.0, 0.0)).collect();
    advance(&glyphs, 0.0)
}

/// Anti-aliased glyph coverage over a pixel rectangle.
struct Coverage {
    left: i32,
    top: i32,
    width: usize,
    height: usize,
    data: Vec<f32>,
}

fn rasterize(glyphs: &[PositionedGlyph<'_>]) -> Option<Coverage> {
    let boxes: Vec<_> = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).collect();
    let left = boxes.iter().map(|b| b.min.x).min()?;
    let top = boxes.iter().map(|b| b.min.y).min()?;
    let right = boxes.iter().map(|b| b.max.x).max()?;
    let bottom = boxes.iter().map(|b| b.max.y).max()?;

    let width = (right - left) as usize;
    let height = (bottom - top) as usize;
    let mut data = vec![0.0f32; width * height];
    for glyph in glyphs {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, v| {
            let x = (bb.min.x - left) as usize + gx as usize;
            let y = (bb.min.y - top) as usize + gy as usize;
            if x < width && y < height {
                let cell = &mut data[y * width + x];
                *cell = (*cell + v).min(1.0);
            }
        });
    }

    Some(Coverage {
        left,
        top,
        width,
        height,
        data,
    })
}

/// Source-over blend of `color` at `coverage` onto a premultiplied pixel.
fn blend(pixel: &mut PremultipliedColorU8, color: Rgba, coverage: f32) {
    let a = color[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    let inv = 1.0 - a;
    let out_a = (a * 255.0 + pixel.alpha() as f32 * inv).round().min(255.0) as u8;
    let mix = |src: u8, dst: u8| ((src as f32 * a + dst as f32 * inv).round() as u8).min(out_a);
    if let Some(out) = PremultipliedColorU8::from_rgba(
        mix(color[0], pixel.red()),
        mix(color[1], pixel.green()),
        mix(color[2], pixel.blue()),
        out_a,
    ) {
        *pixel = out;
    }
}

fn composite(pixmap: &mut Pixmap, mask: &Coverage, dx: i32, dy: i32, color: Rgba) {
    let (pw, ph) = (pixmap.width() as i32, pixmap.height() as i32);
    let pixels = pixmap.pixels_mut();
    for my in 0..mask.height {
        let y = mask.top + my as i32 + dy;
        if y < 0 || y >= ph {
            continue;
        }
        for mx in 0..mask.width {
            let v = mask.data[my * mask.width + mx];
            let x = mask.left + mx as i32 + dx;
            if v <= 0.0 || x < 0 || x >= pw {
                continue;
            }
            blend(&mut pixels[(y * pw + x) as usize], color, v);
        }
    }
}

/// Draw `text` anchored at `(x, y)`.
pub fn draw_text(pixmap: &mut Pixmap, text: &str, x: f32, y: f32, style: &TextStyle) {
    let Some(font) = font(style.bold) else {
        return;
    };
    let scale = scale_for(font, style.size);

    let baseline = match style.valign {
        VAlign::Baseline => y,
        VAlign::Middle => y + style.size / 2.0,
        VAlign::Top => y + style.size,
    };
    let unaligned: Vec<_> = font.layout(text, scale, point(0.0, 0.0)).collect();
    let width = advance(&unaligned, 0.0);
    let left = match style.align {
        Align::Left => x,
        Align::Center => x - width / 2.0,
        Align::Right => x - width,
    };

    let glyphs: Vec<_> = font.layout(text, scale, point(left, baseline)).collect();
    let Some(mask) = rasterize(&glyphs) else {
        return;
    };

    if let Some((halo, radius)) = style.halo {
        let r = radius.ceil() as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                if (dx * dx + dy * dy) as f32 <= radius * radius && (dx, dy) != (0, 0) {
                    composite(pixmap, &mask, dx, dy, halo);
                }
            }
        }
    }
    composite(pixmap, &mask, 0, 0, style.color);
}

pub(crate) fn solid(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;
    paint
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painted(pixmap: &Pixmap) -> usize {
        pixmap.pixels().iter().filter(|p| p.alpha() > 0).count()
    }

    #[test]
    fn test_embedded_fonts_load() {
        assert!(font(false).is_some());
        assert!(font(true).is_some());
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let w12 = text_width("1013", &TextStyle::sized(12.0));
        let w24 = text_width("1013", &TextStyle::sized(24.0));
        assert!(w12 > 0.0);
        assert!((w24 - 2.0 * w12).abs() < 1.0);
        assert_eq!(text_width("", &TextStyle::sized(12.0)), 0.0);
    }

    #[test]
    fn test_bold_is_wider() {
        let regular = text_width("Total Snowfall", &TextStyle::sized(12.0));
        let bold = text_width("Total Snowfall", &TextStyle::sized(12.0).bold());
        assert!(bold > regular);
    }

    #[test]
    fn test_draw_text_marks_pixels() {
        let mut pixmap = Pixmap::new(60, 30).unwrap();
        draw_text(&mut pixmap, "T", 5.0, 25.0, &TextStyle::sized(18.0));
        assert!(painted(&pixmap) > 0);
    }

    #[test]
    fn test_cap_height_matches_size() {
        let mut pixmap = Pixmap::new(80, 60).unwrap();
        draw_text(&mut pixmap, "H", 10.0, 40.0, &TextStyle::sized(20.0));
        let rows: Vec<u32> = (0..60)
            .filter(|y| (0..80).any(|x| pixmap.pixel(x, *y).map_or(false, |p| p.alpha() > 128)))
            .collect();
        let height = rows.last().unwrap() - rows.first().unwrap() + 1;
        assert!((18..=22).contains(&height), "cap height {}", height);
        assert!(*rows.last().unwrap() <= 40);
    }

    #[test]
    fn test_halo_surrounds_text() {
        let style = TextStyle::sized(12.0).color([255, 255, 255, 255]);
        let mut plain = Pixmap::new(80, 30).unwrap();
        draw_text(&mut plain, "12", 40.0, 15.0, &style.align(Align::Center).valign(VAlign::Middle));
        let mut haloed = Pixmap::new(80, 30).unwrap();
        draw_text(
            &mut haloed,
            "12",
            40.0,
            15.0,
            &style.halo([0, 0, 0, 255], 2.0).align(Align::Center).valign(VAlign::Middle),
        );
        assert!(painted(&haloed) > painted(&plain));
    }

    #[test]
    fn test_right_align_ends_at_anchor() {
        let mut pixmap = Pixmap::new(100, 30).unwrap();
        draw_text(&mut pixmap, "57", 60.0, 20.0, &TextStyle::sized(12.0).align(Align::Right));
        let rightmost = (0..100u32)
            .rev()
            .find(|x| (0..30).any(|y| pixmap.pixel(*x, y).map_or(false, |p| p.alpha() > 0)))
            .unwrap();
        assert!(rightmost <= 61 && rightmost >= 50, "rightmost {}", rightmost);
    }
}
