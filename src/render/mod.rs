//! # Rendering Backend & Document Assembly
//!
//! Translates positioned elements into printpdf drawing primitives and
//! assembles the output document: one page per slide, background first,
//! then foreground elements in order, one `save` at the end.
//!
//! The adapter never relies on ambient drawing state: fill color and font
//! are set explicitly before every primitive, so one element's style can
//! never leak into the next. All coordinates are in PDF points with the
//! origin at the page's bottom-left; the layout code hands us top-edge
//! positions and we subtract our way down to baselines.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, ImageTransform, ImageXObject, IndirectFontRef, Mm,
    PdfDocument, PdfLayerReference, Point, Polygon, Px, Rgb,
};

use crate::error::{DeckError, Result};
use crate::highlight::Highlighter;
use crate::layout::{self, MeasureCtx};
use crate::model::{Color, Element, Presentation, Span, Theme};
use crate::text::metrics::{FontFamily, COURIER};
use crate::text::{self, Line};

const PT_TO_MM: f32 = 0.352_777_78;

/// Default background for code blocks without an explicit one.
const CODE_BACKGROUND: Color = Color {
    r: 0.961,
    g: 0.961,
    b: 0.961,
}; // #F5F5F5

fn mm(pt: f64) -> Mm {
    Mm(pt as f32 * PT_TO_MM)
}

fn pdf_color(c: Color) -> printpdf::Color {
    printpdf::Color::Rgb(Rgb::new(c.r as f32, c.g as f32, c.b as f32, None))
}

/// The three font handles a presentation needs: the theme family in
/// regular and bold, plus Courier for code.
struct FontSet {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

impl FontSet {
    fn pick(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }
}

fn builtin_fonts(family: FontFamily) -> (BuiltinFont, BuiltinFont) {
    match family {
        FontFamily::Helvetica => (BuiltinFont::Helvetica, BuiltinFont::HelveticaBold),
        FontFamily::Courier => (BuiltinFont::Courier, BuiltinFont::CourierBold),
    }
}

/// One page's drawing surface.
struct Surface<'a> {
    layer: PdfLayerReference,
    fonts: &'a FontSet,
}

impl Surface<'_> {
    /// Draw one text run with an explicit font, size, and color.
    fn text_run(
        &self,
        text: &str,
        font: &IndirectFontRef,
        size: f64,
        color: Color,
        x: f64,
        baseline_y: f64,
    ) {
        self.layer.set_fill_color(pdf_color(color));
        self.layer
            .use_text(text, size as f32, mm(x), mm(baseline_y), font);
    }

    /// Fill an axis-aligned rectangle given its bottom-left corner.
    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.layer.set_fill_color(pdf_color(color));
        let ring = vec![
            (Point::new(mm(x), mm(y)), false),
            (Point::new(mm(x + width), mm(y)), false),
            (Point::new(mm(x + width), mm(y + height)), false),
            (Point::new(mm(x), mm(y + height)), false),
        ];
        self.layer.add_polygon(Polygon {
            rings: vec![ring],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    /// Decode and embed a raster image with its bottom-left corner at
    /// (x, y), scaled to `target_w` × `target_h` points.
    fn draw_image(
        &self,
        path: &str,
        x: f64,
        y: f64,
        target_w: f64,
        target_h: f64,
    ) -> Result<()> {
        let decoded = image::open(path).map_err(|e| DeckError::asset(path, e))?;
        let (px_w, px_h) = (decoded.width(), decoded.height());
        let rgb = decoded.to_rgb8().into_raw();

        let xobject = ImageXObject {
            width: Px(px_w as usize),
            height: Px(px_h as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: rgb,
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        };

        // 72 dpi makes one pixel one point, so the scale factors below map
        // pixels directly onto the requested box.
        printpdf::Image::from(xobject).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(mm(x)),
                translate_y: Some(mm(y)),
                scale_x: Some((target_w / px_w as f64) as f32),
                scale_y: Some((target_h / px_h as f64) as f32),
                dpi: Some(72.0),
                ..Default::default()
            },
        );
        Ok(())
    }
}

/// Per-document rendering state: resolved theme fonts, metrics family,
/// and the shared highlighter.
struct Renderer<'a> {
    theme: &'a Theme,
    family: FontFamily,
    highlighter: Highlighter,
}

impl<'a> Renderer<'a> {
    fn ctx(&self) -> MeasureCtx<'a> {
        MeasureCtx::new(self.theme, self.family)
    }

    /// Render one slide's elements onto its page.
    fn render_slide(&self, surface: &Surface<'_>, elements: &[Element], name: &str) -> Result<()> {
        let (background, foreground) = layout::split_background(elements);

        // Background paints beneath everything, regardless of list position.
        if let Some(path) = background {
            surface.draw_image(path, 0.0, 0.0, layout::PAGE_WIDTH, layout::PAGE_HEIGHT)?;
        }

        let mut cursor = layout::PAGE_HEIGHT - layout::MARGIN_TOP;
        let mut overflowed = false;

        for element in foreground {
            let consumed = self.render_element(
                surface,
                element,
                layout::MARGIN_LEFT,
                cursor,
                layout::content_width(),
                self.ctx(),
            )?;
            cursor -= consumed;
            if consumed > 0.0 {
                cursor -= layout::ELEMENT_GAP;
            }
            if cursor < layout::MARGIN_BOTTOM && !overflowed {
                overflowed = true;
                log::warn!(
                    "slide {name}: content extends {:.0}pt past the bottom margin; rendering anyway",
                    layout::MARGIN_BOTTOM - cursor
                );
            }
        }
        Ok(())
    }

    /// Render one element with its top edge at `y_top` and return the
    /// vertical extent it consumed in the stacking flow. Anchored wrappers
    /// (center, bottom, title) place themselves and consume nothing.
    fn render_element(
        &self,
        surface: &Surface<'_>,
        element: &Element,
        x: f64,
        y_top: f64,
        max_width: f64,
        ctx: MeasureCtx<'a>,
    ) -> Result<f64> {
        match element {
            Element::Header { level, text, color } => {
                let size = self.theme.header_font_size * level.scale();
                let lines = text::wrap_text(text, self.family, true, size, max_width);
                let color = color.unwrap_or(self.theme.header_color);
                self.draw_lines_colored(surface, &lines, x, y_top, size, level.line_gap(), color);
                Ok(layout::text_block_height(lines.len(), size, level.line_gap()))
            }

            Element::Body { spans } => {
                let size = ctx.body_size();
                let lines = text::wrap_spans(spans, self.family, size, max_width);
                self.draw_lines(surface, &lines, x, y_top, size, layout::BODY_LINE_GAP);
                Ok(lines.len() as f64 * (size + layout::BODY_LINE_GAP)
                    + layout::BODY_TRAILING_GAP)
            }

            Element::Bold { text, color } => {
                let size = ctx.body_size();
                let span = Span {
                    text: text.clone(),
                    color: Some(color.unwrap_or(self.theme.font_color)),
                    bold: true,
                };
                let lines =
                    text::wrap_spans(std::slice::from_ref(&span), self.family, size, max_width);
                self.draw_lines(surface, &lines, x, y_top, size, layout::BODY_LINE_GAP);
                Ok(lines.len() as f64 * (size + layout::BODY_LINE_GAP)
                    + layout::BODY_TRAILING_GAP)
            }

            Element::Code {
                source,
                language,
                background,
            } => self.render_code(
                surface,
                source,
                language.as_deref(),
                background.unwrap_or(CODE_BACKGROUND),
                x,
                y_top,
                max_width,
            ),

            Element::Image { path, caption } => {
                self.render_image(surface, path, caption.as_deref(), x, y_top)
            }

            Element::Center { child } => {
                let size = layout::measure(child, ctx, max_width)?;
                let (cx, cy) = layout::center_origin(size);
                self.render_element(surface, child, cx, cy, max_width, ctx)?;
                Ok(0.0)
            }

            Element::Bottom { child } => {
                let size = layout::measure(child, ctx, max_width)?;
                let (bx, by) = layout::bottom_origin(size);
                self.render_element(surface, child, bx, by, max_width, ctx)?;
                Ok(0.0)
            }

            Element::Title { child } => {
                let ctx = ctx.titled();
                let size = layout::measure(child, ctx, max_width)?;
                let (cx, cy) = layout::center_origin(size);
                self.render_element(surface, child, cx, cy, max_width, ctx)?;
                Ok(0.0)
            }

            Element::Grid { children, columns } => {
                if *columns == 0 {
                    return Err(DeckError::render("?", "grid requires at least one column"));
                }
                let band = max_width / *columns as f64;
                let mut tallest: f64 = 0.0;
                for (col, range) in layout::partition_columns(children.len(), *columns)
                    .into_iter()
                    .enumerate()
                {
                    let column_x = x + col as f64 * band;
                    let mut column_y = y_top;
                    for child in &children[range] {
                        let consumed =
                            self.render_element(surface, child, column_x, column_y, band, ctx)?;
                        column_y -= consumed + layout::ELEMENT_GAP;
                    }
                    tallest = tallest.max(y_top - column_y - layout::ELEMENT_GAP);
                }
                Ok(tallest)
            }

            // Handled before the stacking pass; nothing to do here.
            Element::Background { .. } => Ok(0.0),
        }
    }

    /// Draw wrapped lines, each fragment in its own style. The first
    /// baseline sits one font-size below the block's top edge.
    fn draw_lines(
        &self,
        surface: &Surface<'_>,
        lines: &[Line],
        x: f64,
        y_top: f64,
        font_size: f64,
        line_gap: f64,
    ) {
        for (i, line) in lines.iter().enumerate() {
            let baseline = y_top - font_size - i as f64 * (font_size + line_gap);
            let mut cursor_x = x;
            for frag in &line.fragments {
                let metrics = self.family.metrics(frag.bold);
                surface.text_run(
                    &frag.text,
                    surface.fonts.pick(frag.bold),
                    font_size,
                    frag.color.unwrap_or(self.theme.font_color),
                    cursor_x,
                    baseline,
                );
                cursor_x += metrics.measure(&frag.text, font_size);
            }
        }
    }

    /// Like [`draw_lines`] but with one forced color for every fragment —
    /// headers ignore per-span colors.
    fn draw_lines_colored(
        &self,
        surface: &Surface<'_>,
        lines: &[Line],
        x: f64,
        y_top: f64,
        font_size: f64,
        line_gap: f64,
        color: Color,
    ) {
        for (i, line) in lines.iter().enumerate() {
            let baseline = y_top - font_size - i as f64 * (font_size + line_gap);
            let mut cursor_x = x;
            for frag in &line.fragments {
                surface.text_run(
                    &frag.text,
                    surface.fonts.pick(frag.bold),
                    font_size,
                    color,
                    cursor_x,
                    baseline,
                );
                cursor_x += self.family.metrics(frag.bold).measure(&frag.text, font_size);
            }
        }
    }

    fn render_code(
        &self,
        surface: &Surface<'_>,
        source: &str,
        language: Option<&str>,
        background: Color,
        x: f64,
        y_top: f64,
        max_width: f64,
    ) -> Result<f64> {
        let size = self.theme.font_size * layout::CODE_FONT_SCALE;
        let text_width = max_width - 2.0 * layout::CODE_PADDING;
        let lines = text::layout_code(source, size, text_width);

        let rect_height = layout::code_rect_height(lines.len(), size);
        surface.fill_rect(x, y_top - rect_height, max_width, rect_height, background);

        // Highlight the displayed lines so token runs align with wrapping.
        let highlighted =
            self.highlighter
                .highlight(&lines.join("\n"), language, self.theme.font_color)?;

        let text_x = x + layout::CODE_PADDING;
        for (i, runs) in highlighted.iter().enumerate() {
            let baseline =
                y_top - layout::CODE_PADDING - size - i as f64 * (size + layout::CODE_LINE_GAP);
            let mut cursor_x = text_x;
            for run in runs {
                surface.text_run(
                    &run.text,
                    &surface.fonts.mono,
                    size,
                    run.color,
                    cursor_x,
                    baseline,
                );
                cursor_x += COURIER.measure(&run.text, size);
            }
        }

        Ok(rect_height + layout::CODE_TRAILING_GAP)
    }

    fn render_image(
        &self,
        surface: &Surface<'_>,
        path: &str,
        caption: Option<&str>,
        x: f64,
        y_top: f64,
    ) -> Result<f64> {
        let (w, h) = image::image_dimensions(path).map_err(|e| DeckError::asset(path, e))?;
        let (sw, sh) = layout::fit_image(w as f64, h as f64);
        surface.draw_image(path, x, y_top - sh, sw, sh)?;

        if let Some(caption) = caption {
            surface.text_run(
                caption,
                &surface.fonts.regular,
                self.theme.font_size,
                self.theme.font_color,
                x,
                y_top - sh - layout::CAPTION_OFFSET,
            );
            return Ok(sh + layout::CAPTION_HEIGHT);
        }
        Ok(sh)
    }
}

/// Render a presentation to a PDF file: one page per slide, in order.
///
/// Fails before the document exists for an empty presentation or an
/// unsupported theme font; per-slide failures abort the run and name the
/// offending slide. The output file is written once, at the end.
pub fn render(presentation: &Presentation, theme: &Theme, output_path: &Path) -> Result<()> {
    if presentation.slides.is_empty() {
        return Err(DeckError::Config(
            "presentation has no slides; nothing to generate".to_string(),
        ));
    }

    let family = FontFamily::parse(&theme.font).map_err(|e| DeckError::render("theme", e))?;

    let title = output_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("presentation");
    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        mm(layout::PAGE_WIDTH),
        mm(layout::PAGE_HEIGHT),
        "content",
    );

    let (regular, bold) = builtin_fonts(family);
    let fonts = FontSet {
        regular: doc
            .add_builtin_font(regular)
            .map_err(|e| DeckError::render("theme", e))?,
        bold: doc
            .add_builtin_font(bold)
            .map_err(|e| DeckError::render("theme", e))?,
        mono: doc
            .add_builtin_font(BuiltinFont::Courier)
            .map_err(|e| DeckError::render("theme", e))?,
    };

    let renderer = Renderer {
        theme,
        family,
        highlighter: Highlighter::new(),
    };

    for (index, slide) in presentation.slides.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) =
                doc.add_page(mm(layout::PAGE_WIDTH), mm(layout::PAGE_HEIGHT), "content");
            doc.get_page(page).get_layer(layer)
        };
        let surface = Surface {
            layer,
            fonts: &fonts,
        };

        // Theme background color always paints first; a background image
        // (if any) covers it.
        surface.fill_rect(
            0.0,
            0.0,
            layout::PAGE_WIDTH,
            layout::PAGE_HEIGHT,
            theme.background_color,
        );

        let name = slide.describe(index);
        renderer
            .render_slide(&surface, &slide.elements, &name)
            .map_err(|e| e.on_slide(&name))?;
        log::debug!("rendered slide {name}");
    }

    let path_str = output_path.display().to_string();
    let file = File::create(output_path).map_err(|e| DeckError::output(&path_str, e))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| DeckError::output(&path_str, e))?;
    log::info!(
        "wrote {} ({} slides)",
        path_str,
        presentation.slides.len()
    );
    Ok(())
}
