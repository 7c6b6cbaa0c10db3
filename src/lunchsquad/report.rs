//! Grouped order reports, as plain text or as a raster image.
//!
//! Both renderings share one [`Report`] structure: a section per restaurant
//! (in kind order, only restaurants with orders), each entry a headline and
//! optional indented detail lines.

use crate::catalog::Catalog;
use crate::model::{Kind, Meal, Order};
use crate::presenter::{self, kebab_parts};
use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use chrono::{DateTime, Local};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgb, RgbImage};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const TITLE: &str = "LunchSquad - Team Lunch Orders";
pub const FOOTER: &str = "Enjoy your meal! | LunchSquad - Team Lunch Organizer";
pub const EMPTY_REPORT: &str = "No orders available.";
const GENERATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub line: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: Kind,
    pub heading: String,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub generated: String,
    pub sections: Vec<Section>,
}

fn entry(order: &Order, catalog: &Catalog) -> Entry {
    let (summary, detail) = presenter::describe(&order.meal, catalog);
    match &order.meal {
        Meal::Kebab(meal) => {
            let parts = kebab_parts(meal, catalog);
            Entry {
                line: format!("- {}: {}", order.submitter, summary),
                details: vec![
                    format!("Sauces: {}", parts.sauces),
                    format!("Extras: {}", parts.extras),
                    format!("Spice: {}", parts.spice),
                ],
            }
        }
        _ if detail.is_empty() => Entry {
            line: format!("- {}: {}", order.submitter, summary),
            details: Vec::new(),
        },
        _ => Entry {
            line: format!("- {}: {} - {}", order.submitter, summary, detail),
            details: Vec::new(),
        },
    }
}

/// Group orders by restaurant. `None` when there is nothing to report.
pub fn build(orders: &[Order], catalog: &Catalog, generated_at: DateTime<Local>) -> Option<Report> {
    if orders.is_empty() {
        return None;
    }
    let sections = Kind::ALL
        .iter()
        .filter_map(|&kind| {
            let entries: Vec<Entry> = orders
                .iter()
                .filter(|o| o.kind() == kind)
                .map(|o| entry(o, catalog))
                .collect();
            (!entries.is_empty()).then(|| Section {
                kind,
                heading: format!("{} Orders:", catalog.restaurant_label(kind)),
                entries,
            })
        })
        .collect();
    Some(Report {
        generated: format!("Report generated: {}", generated_at.format(GENERATED_FORMAT)),
        sections,
    })
}

impl Report {
    pub fn to_text(&self) -> String {
        let mut out = Vec::new();
        out.push(TITLE.to_string());
        out.push("=".repeat(40));
        out.push(String::new());
        out.push(self.generated.clone());
        out.push(String::new());
        for section in &self.sections {
            out.push(section.heading.clone());
            out.push("-".repeat(20));
            for e in &section.entries {
                out.push(e.line.clone());
                out.extend(e.details.iter().map(|d| format!("  {}", d)));
            }
            out.push(String::new());
        }
        out.push("=".repeat(40));
        out.push(FOOTER.to_string());
        out.join("\n")
    }
}

pub fn text_report(orders: &[Order], catalog: &Catalog, generated_at: DateTime<Local>) -> String {
    build(orders, catalog, generated_at)
        .map(|r| r.to_text())
        .unwrap_or_else(|| EMPTY_REPORT.to_string())
}

/// Glyph source for the image report.
pub enum ReportFont {
    TrueType(Box<FontVec>),
    /// Built-in 8x8 glyphs covering Basic Latin and Latin-1.
    Bitmap,
}

impl ReportFont {
    /// First loadable TrueType font from `paths`, else the bitmap glyphs.
    pub fn load(paths: &[PathBuf]) -> Self {
        for path in paths {
            let Ok(bytes) = fs::read(path) else {
                continue;
            };
            match FontVec::try_from_vec(bytes) {
                Ok(font) => {
                    debug!(path = %path.display(), "loaded report font");
                    return ReportFont::TrueType(Box::new(font));
                }
                Err(e) => warn!(path = %path.display(), error = %e, "not a usable font"),
            }
        }
        debug!("no TrueType font found, using bitmap glyphs");
        ReportFont::Bitmap
    }

    pub fn is_bitmap(&self) -> bool {
        matches!(self, ReportFont::Bitmap)
    }
}

pub const IMAGE_WIDTH: u32 = 1000;
const MIN_IMAGE_HEIGHT: u32 = 600;
const CONTENT_TOP: u32 = 140;
const HEADING_STEP: u32 = 30;
const LINE_STEP: u32 = 25;
const SECTION_GAP: u32 = 20;
/// Room below the content for the footer rule (60 px from the bottom) and text.
const FOOTER_SPACE: u32 = 80;

const BACKGROUND: Rgb<u8> = Rgb([40, 40, 40]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const MUTED: Rgb<u8> = Rgb([180, 180, 180]);
const DETAIL: Rgb<u8> = Rgb([200, 200, 200]);
const HEADING: Rgb<u8> = Rgb([255, 220, 100]);
const RULE: Rgb<u8> = Rgb([100, 100, 100]);

struct Canvas<'a> {
    img: RgbImage,
    font: &'a ReportFont,
}

impl Canvas<'_> {
    fn blend(&mut self, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
        if x < 0 || y < 0 || x as u32 >= self.img.width() || y as u32 >= self.img.height() {
            return;
        }
        let a = coverage.clamp(0.0, 1.0);
        let px = self.img.get_pixel_mut(x as u32, y as u32);
        for (dst, src) in px.0.iter_mut().zip(color.0) {
            *dst = (f32::from(*dst) * (1.0 - a) + f32::from(src) * a).round() as u8;
        }
    }

    fn rule(&mut self, y: u32) {
        let width = self.img.width();
        for yy in y..y + 2 {
            for x in 50..width.saturating_sub(50) {
                self.blend(x as i32, yy as i32, RULE, 1.0);
            }
        }
    }

    /// Draw `text` with its top-left corner at (x, y).
    fn text(&mut self, x: u32, y: u32, px: f32, color: Rgb<u8>, text: &str) {
        let font = self.font;
        match font {
            ReportFont::TrueType(ttf) => self.text_ttf(ttf, x as f32, y as f32, px, color, text),
            ReportFont::Bitmap => self.text_bitmap(x, y, px, color, text),
        }
    }

    fn text_ttf(&mut self, font: &FontVec, x: f32, y: f32, px: f32, color: Rgb<u8>, text: &str) {
        let scale = PxScale::from(px);
        let scaled = font.as_scaled(scale);
        let mut caret = point(x, y + scaled.ascent());
        let mut previous: Option<GlyphId> = None;

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret.x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, caret);
            caret.x += scaled.h_advance(id);
            previous = Some(id);

            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    self.blend(
                        bounds.min.x as i32 + gx as i32,
                        bounds.min.y as i32 + gy as i32,
                        color,
                        coverage,
                    );
                });
            }
        }
    }

    fn text_bitmap(&mut self, x: u32, y: u32, px: f32, color: Rgb<u8>, text: &str) {
        let cell = ((px / 8.0).round() as u32).max(1);
        let mut left = x as i32;
        for ch in text.chars() {
            let rows = BASIC_FONTS
                .get(ch)
                .or_else(|| LATIN_FONTS.get(ch))
                .or_else(|| BASIC_FONTS.get('?'))
                .unwrap_or([0; 8]);
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..8 {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    for dy in 0..cell {
                        for dx in 0..cell {
                            self.blend(
                                left + (col * cell + dx) as i32,
                                (y + row as u32 * cell + dy) as i32,
                                color,
                                1.0,
                            );
                        }
                    }
                }
            }
            left += (8 * cell) as i32;
        }
    }
}

/// One line of report content at its place on the canvas.
struct Placed<'a> {
    x: u32,
    y: u32,
    px: f32,
    color: Rgb<u8>,
    text: &'a str,
}

impl Report {
    /// Section lines with their positions, and the y just below the last section.
    fn layout(&self) -> (Vec<Placed<'_>>, u32) {
        let mut lines = Vec::new();
        let mut y = CONTENT_TOP;
        for section in &self.sections {
            lines.push(Placed { x: 50, y, px: 20.0, color: HEADING, text: &section.heading });
            y += HEADING_STEP;
            for e in &section.entries {
                lines.push(Placed { x: 70, y, px: 16.0, color: WHITE, text: &e.line });
                y += LINE_STEP;
                for d in &e.details {
                    lines.push(Placed { x: 90, y, px: 16.0, color: DETAIL, text: d });
                    y += LINE_STEP;
                }
            }
            y += SECTION_GAP;
        }
        (lines, y)
    }

    /// Canvas height that fits every line above the footer. Grows linearly
    /// with the number of orders, never below 600 px.
    pub fn image_height(&self) -> u32 {
        let (_, bottom) = self.layout();
        MIN_IMAGE_HEIGHT.max(bottom.saturating_add(FOOTER_SPACE))
    }
}

/// Render the report as an image. `None` when there are no orders.
pub fn image_report(
    orders: &[Order],
    catalog: &Catalog,
    font: &ReportFont,
    generated_at: DateTime<Local>,
) -> Option<RgbImage> {
    let report = build(orders, catalog, generated_at)?;
    let height = report.image_height();
    let mut canvas = Canvas {
        img: RgbImage::from_pixel(IMAGE_WIDTH, height, BACKGROUND),
        font,
    };

    canvas.text(50, 40, 28.0, WHITE, TITLE);
    canvas.text(50, 80, 16.0, MUTED, &report.generated);
    canvas.rule(120);

    let (lines, _) = report.layout();
    for line in &lines {
        canvas.text(line.x, line.y, line.px, line.color, line.text);
    }

    canvas.rule(height - 60);
    canvas.text(50, height - 40, 16.0, MUTED, FOOTER);
    Some(canvas.img)
}
