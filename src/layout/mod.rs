//! # Layout Engine
//!
//! Converts a slide's ordered element list into absolute page positions.
//! The page is fixed-size (16:9, 792 × 445.5 pt — the same sheet a
//! 1920×1080 deck scales down to) and layout is a single top-down pass:
//! a cursor starts at the top margin, each in-flow element consumes its
//! measured height plus a fixed gap, and anchored wrappers (center,
//! bottom, title) are positioned independently of the cursor.
//!
//! Everything here is measurement and coordinate math; actual drawing
//! lives in [`crate::render`]. Keeping measurement pure makes the anchor
//! placements cheap to verify.

use std::ops::Range;

use crate::error::{DeckError, Result};
use crate::model::{Element, Theme};
use crate::text::metrics::FontFamily;
use crate::text::{self, max_line_width};

/// Page size in points: 16:9, 11 × 6.1875 inches.
pub const PAGE_WIDTH: f64 = 792.0;
pub const PAGE_HEIGHT: f64 = 445.5;

pub const MARGIN_LEFT: f64 = 50.0;
pub const MARGIN_RIGHT: f64 = 50.0;
pub const MARGIN_TOP: f64 = 50.0;
pub const MARGIN_BOTTOM: f64 = 50.0;

/// Vertical gap inserted between stacked elements.
pub const ELEMENT_GAP: f64 = 10.0;

/// Padding inside a code block's background rectangle.
pub const CODE_PADDING: f64 = 10.0;
/// Code renders at this fraction of the theme body size, in Courier.
pub const CODE_FONT_SCALE: f64 = 0.8;
pub const CODE_LINE_GAP: f64 = 2.0;
pub const CODE_TRAILING_GAP: f64 = 10.0;

pub const BODY_LINE_GAP: f64 = 2.0;
pub const BODY_TRAILING_GAP: f64 = 3.0;

/// Images scale down to fit this box, never up.
pub const IMAGE_MAX_WIDTH: f64 = 400.0;
pub const IMAGE_MAX_HEIGHT: f64 = 300.0;
/// Height consumed by an image caption line.
pub const CAPTION_HEIGHT: f64 = 30.0;
/// Distance from the image's lower edge to the caption baseline.
pub const CAPTION_OFFSET: f64 = 25.0;

/// Usable width between the side margins.
pub fn content_width() -> f64 {
    PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

/// Usable height between the vertical margins.
pub fn content_height() -> f64 {
    PAGE_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

/// A measured bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };
}

/// Measurement context: the resolved theme plus whether we are inside a
/// title wrapper (which promotes body text to the header size).
#[derive(Debug, Clone, Copy)]
pub struct MeasureCtx<'a> {
    pub theme: &'a Theme,
    pub family: FontFamily,
    pub title_mode: bool,
}

impl<'a> MeasureCtx<'a> {
    pub fn new(theme: &'a Theme, family: FontFamily) -> Self {
        Self {
            theme,
            family,
            title_mode: false,
        }
    }

    pub fn titled(self) -> Self {
        Self {
            title_mode: true,
            ..self
        }
    }

    /// Effective body font size (header size inside a title wrapper).
    pub fn body_size(&self) -> f64 {
        if self.title_mode {
            self.theme.header_font_size
        } else {
            self.theme.font_size
        }
    }
}

/// Height of a wrapped text block: one slot per line plus a matching
/// trailing gap.
pub fn text_block_height(line_count: usize, font_size: f64, line_gap: f64) -> f64 {
    line_count as f64 * (font_size + line_gap) + line_gap
}

/// Required width/height of an element at the given maximum width.
///
/// Image measurement reads the file header for intrinsic dimensions, so a
/// missing or corrupt image surfaces here as an [`DeckError::Asset`] before
/// anything is drawn.
pub fn measure(element: &Element, ctx: MeasureCtx<'_>, max_width: f64) -> Result<Size> {
    match element {
        Element::Header { level, text, .. } => {
            let size = ctx.theme.header_font_size * level.scale();
            let lines = text::wrap_text(text, ctx.family, true, size, max_width);
            Ok(Size {
                width: max_line_width(&lines),
                height: text_block_height(lines.len(), size, level.line_gap()),
            })
        }

        Element::Body { spans } => {
            let size = ctx.body_size();
            let lines = text::wrap_spans(spans, ctx.family, size, max_width);
            Ok(Size {
                width: max_line_width(&lines),
                height: lines.len() as f64 * (size + BODY_LINE_GAP) + BODY_TRAILING_GAP,
            })
        }

        Element::Bold { text, .. } => {
            let size = ctx.body_size();
            let lines = text::wrap_text(text, ctx.family, true, size, max_width);
            Ok(Size {
                width: max_line_width(&lines),
                height: lines.len() as f64 * (size + BODY_LINE_GAP) + BODY_TRAILING_GAP,
            })
        }

        Element::Code { source, .. } => {
            let size = ctx.theme.font_size * CODE_FONT_SCALE;
            let text_width = max_width - 2.0 * CODE_PADDING;
            let lines = text::layout_code(source, size, text_width);
            let widest = lines
                .iter()
                .map(|l| text::metrics::COURIER.measure(l, size))
                .fold(0.0, f64::max);
            Ok(Size {
                width: widest + 2.0 * CODE_PADDING,
                height: code_rect_height(lines.len(), size) + CODE_TRAILING_GAP,
            })
        }

        Element::Image { path, caption } => {
            let (w, h) = image::image_dimensions(path)
                .map_err(|e| DeckError::asset(path.clone(), e))?;
            let (sw, sh) = fit_image(w as f64, h as f64);
            let caption_height = if caption.is_some() { CAPTION_HEIGHT } else { 0.0 };
            Ok(Size {
                width: sw,
                height: sh + caption_height,
            })
        }

        Element::Grid { children, columns } => {
            if *columns == 0 {
                return Err(DeckError::render(
                    "?",
                    "grid requires at least one column",
                ));
            }
            let band = max_width / *columns as f64;
            let mut tallest: f64 = 0.0;
            for range in partition_columns(children.len(), *columns) {
                let mut column_height = 0.0;
                for (i, child) in children[range.clone()].iter().enumerate() {
                    if i > 0 {
                        column_height += ELEMENT_GAP;
                    }
                    column_height += measure(child, ctx, band)?.height;
                }
                tallest = tallest.max(column_height);
            }
            Ok(Size {
                width: max_width,
                height: tallest,
            })
        }

        Element::Center { child } | Element::Bottom { child } => measure(child, ctx, max_width),
        Element::Title { child } => measure(child, ctx.titled(), max_width),

        Element::Background { .. } => Ok(Size::ZERO),
    }
}

/// Height of a code block's background rectangle.
pub fn code_rect_height(line_count: usize, font_size: f64) -> f64 {
    line_count as f64 * (font_size + CODE_LINE_GAP) + 2.0 * CODE_PADDING
}

/// Scale image dimensions to fit the image box, preserving aspect ratio
/// and never upscaling.
pub fn fit_image(width: f64, height: f64) -> (f64, f64) {
    let scale = (IMAGE_MAX_WIDTH / width)
        .min(IMAGE_MAX_HEIGHT / height)
        .min(1.0);
    (width * scale, height * scale)
}

/// Contiguous column assignment: the first ⌈n/columns⌉ children fill
/// column 1, the next chunk column 2, and so on. Trailing columns may be
/// shorter or empty. Deterministic — the same input always partitions the
/// same way.
pub fn partition_columns(n: usize, columns: usize) -> Vec<Range<usize>> {
    debug_assert!(columns >= 1);
    let per_column = n.div_ceil(columns);
    (0..columns)
        .map(|c| {
            let start = (c * per_column).min(n);
            let end = ((c + 1) * per_column).min(n);
            start..end
        })
        .collect()
}

/// Top-left origin that centers a box of `size` on the full page. The
/// box's center lands exactly on the page center.
pub fn center_origin(size: Size) -> (f64, f64) {
    let x = (PAGE_WIDTH - size.width) / 2.0;
    let y_top = (PAGE_HEIGHT + size.height) / 2.0;
    (x, y_top)
}

/// Top-left origin that rests a box of `size` on the bottom content
/// margin, at the content's left edge.
pub fn bottom_origin(size: Size) -> (f64, f64) {
    (MARGIN_LEFT, MARGIN_BOTTOM + size.height)
}

/// Split a slide's elements into the background image (painted first,
/// wherever it appears in the list) and the in-order foreground.
pub fn split_background(elements: &[Element]) -> (Option<&str>, Vec<&Element>) {
    let mut background = None;
    let mut foreground = Vec::new();
    for el in elements {
        match el {
            Element::Background { path } => {
                // Last one wins if a slide declares several.
                background = Some(path.as_str());
            }
            other => foreground.push(other),
        }
    }
    (background, foreground)
}
