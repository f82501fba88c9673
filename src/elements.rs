//! Element implementations built on top of `genpdf` primitives.
//!
//! This module turns the content model into renderable elements, adds the decorations `genpdf`
//! does not ship with (underline and strikethrough strokes, per-side borders, horizontal rules)
//! and wraps image decoding with descriptive errors.
//!
//! `genpdf` strokes every line with the default PDF line width and offers no thickness setting.
//! Wider strokes are drawn as parallel hairlines [`HAIRLINE_SPACING_MM`] apart.

use std::collections::VecDeque;
use std::ops::Range;
use std::path::Path;

use image::GenericImageView;

use genpdf::elements::{Image, LinearLayout, Paragraph, TableLayout};
use genpdf::error::{Context as _, Error};
use genpdf::fonts::FontCache;
use genpdf::style::{Color, Style};
use genpdf::{render, Alignment, Element, Margins, Mm, Position, RenderResult, Scale, Size};

use crate::border::{BorderLine, Borders, DEFAULT_BORDER_WIDTH_MM};
use crate::model::{ImageContent, Padding, RichParagraph};
use crate::richtext::{spans_to_styled_strings, StyledSpan};
use crate::style::StyleFlags;
use crate::table::{Cell, CellContent, Grid};

/// Distance between the hairlines that make up a wide stroke, in millimetres.
pub const HAIRLINE_SPACING_MM: f64 = 0.1;

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;
const DEFAULT_UNDERLINE_OFFSET_MM: f64 = 0.4;
const STRIKETHROUGH_RATIO: f64 = 0.6;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

pub(crate) fn margins_from_padding(padding: Padding) -> Margins {
    Margins::trbl(
        mm_from_f64(padding.top),
        mm_from_f64(padding.right),
        mm_from_f64(padding.bottom),
        mm_from_f64(padding.left),
    )
}

fn position(x: f64, y: f64) -> Position {
    Position::new(mm_from_f64(x), mm_from_f64(y))
}

fn estimated_image_size(image: &image::DynamicImage, dpi: f64) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * (px_width as f64) / dpi;
    let height_mm = MM_PER_INCH * (px_height as f64) / dpi;
    Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm))
}

/// Loads an image from in-memory bytes using the [`image`] crate with descriptive errors.
pub fn decode_image_from_bytes(bytes: impl AsRef<[u8]>) -> Result<image::DynamicImage, Error> {
    image::load_from_memory(bytes.as_ref()).context("Failed to decode image from provided bytes")
}

/// Loads an image from the given path using the [`image`] crate with descriptive errors.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))
}

/// Converts image content into a `genpdf` image with alignment and scaling applied.
pub fn image_element(content: &ImageContent) -> Result<Image, Error> {
    let natural = estimated_image_size(content.image(), DEFAULT_IMAGE_DPI);
    let mut image = Image::from_dynamic_image(content.image().clone())?;
    image.set_alignment(Alignment::from(content.alignment()));

    if let Some((x, y)) = content.scale() {
        image.set_scale(Scale::new(x, y));
    } else if let Some(width) = content.width_mm() {
        let natural_width = mm_to_f64(natural.width);
        if natural_width > f64::EPSILON {
            let scale = width / natural_width;
            image.set_scale(Scale::new(scale, scale));
        }
    }

    Ok(image)
}

/// Converts a paragraph into the element that renders it.
///
/// Paragraphs without stroke decorations become plain `genpdf` paragraphs.  Decorated
/// paragraphs render through [`DecoratedText`].
pub fn paragraph_element(paragraph: &RichParagraph) -> ContentElement {
    let spans = spans_to_styled_strings(paragraph.spans(), paragraph.style());
    let alignment = Alignment::from(paragraph.alignment());

    if paragraph.has_stroke_decorations() {
        return ContentElement::Decorated(DecoratedText::new(spans).with_alignment(alignment));
    }

    let mut element = Paragraph::default();
    element.set_alignment(alignment);
    for span in spans {
        element.push(span.string);
    }
    ContentElement::Text(element)
}

/// One renderable item of a cell or document.
pub enum ContentElement {
    /// Plain wrapped text.
    Text(Paragraph),
    /// Wrapped text with underline or strikethrough strokes.
    Decorated(DecoratedText),
    /// A raster image.
    Image(Image),
}

impl ContentElement {
    /// Converts a cell content item.
    pub fn from_content(content: &CellContent) -> Result<Self, Error> {
        match content {
            CellContent::Text(paragraph) => Ok(paragraph_element(paragraph)),
            CellContent::Image(image) => image_element(image).map(ContentElement::Image),
        }
    }
}

impl Element for ContentElement {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        match self {
            ContentElement::Text(element) => element.render(context, area, style),
            ContentElement::Decorated(element) => element.render(context, area, style),
            ContentElement::Image(element) => element.render(context, area, style),
        }
    }
}

/// Perpendicular offsets of the hairlines that together draw a stroke `width` millimetres wide.
///
/// The offsets are centred on zero.  A non-positive width yields no hairline at all.
pub(crate) fn hairline_offsets(width: f64) -> Vec<f64> {
    if width <= 0.0 {
        return Vec::new();
    }
    let count = ((width / HAIRLINE_SPACING_MM).round() as usize).max(1);
    let spread = (count - 1) as f64 * HAIRLINE_SPACING_MM;
    (0..count)
        .map(|index| index as f64 * HAIRLINE_SPACING_MM - spread / 2.0)
        .collect()
}

/// Strokes the axis-aligned segment `from`-`to`, given in millimetres relative to `area`.
fn stroke(area: &render::Area<'_>, from: (f64, f64), to: (f64, f64), line: &BorderLine) {
    let style = Style::new().with_color(line.color);
    let horizontal = (to.1 - from.1).abs() <= (to.0 - from.0).abs();
    for offset in hairline_offsets(line.width) {
        let (dx, dy) = if horizontal { (0.0, offset) } else { (offset, 0.0) };
        area.draw_line(
            vec![
                position(from.0 + dx, from.1 + dy),
                position(to.0 + dx, to.1 + dy),
            ],
            style,
        );
    }
}

/// Strokes the visible sides of `borders` around a box of `size` at the origin of `area`.
fn draw_borders(area: &render::Area<'_>, size: Size, borders: &Borders) {
    let width = mm_to_f64(size.width);
    let height = mm_to_f64(size.height);

    let sides = [
        (&borders.top, (0.0, 0.0), (width, 0.0)),
        (&borders.right, (width, 0.0), (width, height)),
        (&borders.bottom, (0.0, height), (width, height)),
        (&borders.left, (0.0, 0.0), (0.0, height)),
    ];

    for (line, from, to) in sides {
        if line.is_visible() {
            stroke(area, from, to, line);
        }
    }
}

/// Renders a table cell: its content stacked vertically inside padding and borders.
pub struct CellElement {
    content: LinearLayout,
    padding: Padding,
    borders: Borders,
}

impl CellElement {
    /// Converts a built cell. Fails only when an image cannot be prepared.
    pub fn from_cell(cell: &Cell) -> Result<Self, Error> {
        let mut content = LinearLayout::vertical();
        for item in cell.contents() {
            let element = match (item, cell.alignment()) {
                (CellContent::Text(paragraph), Some(alignment)) => {
                    paragraph_element(&paragraph.clone().with_alignment(alignment))
                }
                (CellContent::Image(image), Some(alignment)) => {
                    let mut image = image_element(image)?;
                    image.set_alignment(Alignment::from(alignment));
                    ContentElement::Image(image)
                }
                (item, None) => ContentElement::from_content(item)?,
            };
            content.push(element);
        }

        Ok(Self {
            content,
            padding: cell.padding(),
            borders: *cell.borders(),
        })
    }
}

impl Element for CellElement {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut inner = area.clone();
        inner.add_margins(margins_from_padding(self.padding));

        let mut result = self.content.render(context, inner, style)?;
        let size = Size::new(
            area.size().width,
            result.size.height + mm_from_f64(self.padding.top + self.padding.bottom),
        );
        draw_borders(&area, size, &self.borders);
        result.size = size;
        Ok(result)
    }
}

/// Converts a finished grid into a `genpdf` table layout.
///
/// The grid is rectangular, so pushing a row never fails on a column mismatch.
pub fn table_element(grid: &Grid) -> Result<TableLayout, Error> {
    let weights = grid
        .style()
        .column_weights()
        .map(|weights| weights.to_vec())
        .unwrap_or_else(|| vec![1; grid.column_count()]);

    let mut layout = TableLayout::new(weights);
    for row in grid.rows() {
        let mut table_row = layout.row();
        for cell in row.cells() {
            table_row.push_element(CellElement::from_cell(cell)?);
        }
        table_row.push()?;
    }
    Ok(layout)
}

/// A box of fixed size outlined by per-side borders.
pub struct RectangleElement {
    size: Size,
    borders: Borders,
}

impl RectangleElement {
    /// Creates a rectangle of `width` x `height` millimetres.
    pub fn new(width: f64, height: f64, borders: Borders) -> Self {
        Self {
            size: Size::new(mm_from_f64(width), mm_from_f64(height)),
            borders,
        }
    }
}

impl Element for RectangleElement {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        if self.size.height > area.size().height {
            result.has_more = true;
            return Ok(result);
        }

        draw_borders(&area, self.size, &self.borders);
        result.size = self.size;
        Ok(result)
    }
}

/// A horizontal rule spanning a percentage of the available width, centered.
pub struct HorizontalRule {
    percentage: f64,
    thickness: f64,
    color: Color,
}

impl HorizontalRule {
    /// Creates a rule; `thickness` is in millimetres and `percentage` is clamped to 0..=100.
    pub fn new(percentage: f64, thickness: f64, color: Color) -> Self {
        Self {
            percentage: percentage.clamp(0.0, 100.0),
            thickness,
            color,
        }
    }
}

impl Element for HorizontalRule {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let height = mm_from_f64(self.thickness);
        if height > area.size().height {
            result.has_more = true;
            return Ok(result);
        }

        let available = mm_to_f64(area.size().width);
        let width = available * (self.percentage / 100.0);
        let x_offset = (available - width) / 2.0;
        let y = self.thickness / 2.0;
        stroke(
            &area,
            (x_offset, y),
            (x_offset + width, y),
            &BorderLine::new(self.color, self.thickness),
        );

        result.size = Size::new(area.size().width, height);
        Ok(result)
    }
}

/// Splits `text` into words that keep their trailing whitespace.
fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut in_space = false;
    for (index, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_space = true;
        } else if in_space {
            words.push(&text[start..index]);
            start = index;
            in_space = false;
        }
    }
    if start < text.len() {
        words.push(&text[start..]);
    }
    words
}

/// Groups words into lines no wider than `available`.
///
/// Each word is given as its full width and its width without trailing whitespace; only the
/// latter has to fit at the end of a line.  A word wider than `available` gets a line of its
/// own.
fn break_lines(widths: &[(f64, f64)], available: f64) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut used = 0.0;
    for (index, (full, trimmed)) in widths.iter().enumerate() {
        if index > start && used + trimmed > available {
            lines.push(start..index);
            start = index;
            used = 0.0;
        }
        used += full;
    }
    if start < widths.len() {
        lines.push(start..widths.len());
    }
    lines
}

struct DecoratedWord {
    text: String,
    style: Style,
    flags: StyleFlags,
    width: Mm,
}

struct DecoratedLine {
    words: Vec<DecoratedWord>,
    width: Mm,
    height: Mm,
    glyph_height: Mm,
    metrics: Style,
}

impl DecoratedLine {
    fn new(mut words: Vec<DecoratedWord>, font_cache: &FontCache, fallback: Style) -> Self {
        if let Some(last) = words.last_mut() {
            let trimmed = last.text.trim_end().len();
            last.text.truncate(trimmed);
            last.width = last.style.str_width(font_cache, &last.text);
        }

        let mut metrics = fallback;
        let mut height = Mm::default();
        for word in &words {
            let line_height = word.style.line_height(font_cache);
            if line_height > height {
                height = line_height;
                metrics = word.style;
            }
        }
        if words.is_empty() {
            height = fallback.line_height(font_cache);
        }

        Self {
            width: words.iter().map(|word| word.width).sum(),
            glyph_height: metrics.font(font_cache).glyph_height(metrics.font_size()),
            words,
            height,
            metrics,
        }
    }
}

fn layout_lines(
    spans: &[StyledSpan],
    font_cache: &FontCache,
    style: Style,
    available: Mm,
) -> VecDeque<DecoratedLine> {
    let mut words = Vec::new();
    for span in spans {
        let word_style = style.and(span.string.style);
        for text in split_words(&span.string.s) {
            words.push(DecoratedWord {
                text: text.to_owned(),
                style: word_style,
                flags: span.flags,
                width: word_style.str_width(font_cache, text),
            });
        }
    }

    let widths: Vec<(f64, f64)> = words
        .iter()
        .map(|word| {
            let trimmed = word.style.str_width(font_cache, word.text.trim_end());
            (mm_to_f64(word.width), mm_to_f64(trimmed))
        })
        .collect();

    let mut words = words.into_iter();
    break_lines(&widths, mm_to_f64(available))
        .into_iter()
        .map(|range| {
            let line_words = words.by_ref().take(range.len()).collect();
            DecoratedLine::new(line_words, font_cache, style)
        })
        .collect()
}

/// Styled text that wraps like a paragraph and draws underline and strikethrough strokes.
///
/// Lines are laid out on the first call to `render`.  Lines that were printed are consumed, so
/// a paragraph split across pages continues where the previous page stopped.  A word wider
/// than the available width is placed on its own line and may overflow it.
pub struct DecoratedText {
    spans: Vec<StyledSpan>,
    alignment: Alignment,
    underline_offset: Mm,
    lines: Option<VecDeque<DecoratedLine>>,
}

impl DecoratedText {
    /// Creates a new decorated text element from the provided spans.
    pub fn new(spans: Vec<StyledSpan>) -> Self {
        Self {
            spans,
            alignment: Alignment::Left,
            underline_offset: mm_from_f64(DEFAULT_UNDERLINE_OFFSET_MM),
            lines: None,
        }
    }

    /// Sets the alignment for the rendered lines.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    /// Sets the alignment and returns the updated element.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.set_alignment(alignment);
        self
    }
}

fn draw_strokes(area: &render::Area<'_>, line: &DecoratedLine, x_offset: Mm, underline_offset: Mm) {
    let underline_y = mm_to_f64(line.glyph_height + underline_offset);
    let strike_y = mm_to_f64(line.glyph_height) * STRIKETHROUGH_RATIO;
    let mut cursor = mm_to_f64(x_offset);

    for word in &line.words {
        let width = mm_to_f64(word.width);
        let stroke_line = BorderLine::new(
            word.style.color().unwrap_or(Color::Rgb(0, 0, 0)),
            DEFAULT_BORDER_WIDTH_MM,
        );
        if word.flags.contains(StyleFlags::UNDERLINE) {
            stroke(area, (cursor, underline_y), (cursor + width, underline_y), &stroke_line);
        }
        if word.flags.contains(StyleFlags::STRIKETHROUGH) {
            stroke(area, (cursor, strike_y), (cursor + width, strike_y), &stroke_line);
        }
        cursor += width;
    }
}

impl Element for DecoratedText {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let available = area.size().width;
        let spans = &self.spans;
        let lines = self
            .lines
            .get_or_insert_with(|| layout_lines(spans, &context.font_cache, style, available));

        let mut result = RenderResult::default();
        while let Some(line) = lines.front() {
            let x_offset = match self.alignment {
                Alignment::Left => Mm::default(),
                Alignment::Center => (available - line.width) / 2.0,
                Alignment::Right => available - line.width,
            };

            {
                let Some(mut section) =
                    area.text_section(&context.font_cache, Position::new(x_offset, 0), line.metrics)
                else {
                    result.has_more = true;
                    break;
                };
                for word in &line.words {
                    section.print_str(&word.text, word.style)?;
                }
            }
            draw_strokes(&area, line, x_offset, self.underline_offset);

            result.size = result.size.stack_vertical(Size::new(line.width, line.height));
            area.add_offset(Position::new(0, line.height));
            lines.pop_front();
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentDefaults;
    use crate::table::TableBuilder;

    #[test]
    fn mm_conversion_round_trips() {
        assert!((mm_to_f64(mm_from_f64(12.5)) - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn padded_grid_converts_to_layout() {
        let defaults = ContentDefaults::default();
        let mut table = TableBuilder::new(&defaults, 3).expect("three columns");
        table.add_row(|row| {
            row.add_text("a", None, |_, _| {});
        });
        table.add_row(|row| {
            for text in ["a", "b", "c", "d"] {
                row.add_text(text, None, |_, _| {});
            }
        });

        assert!(table_element(&table.build()).is_ok());
    }

    #[test]
    fn image_width_is_turned_into_scale() {
        let content =
            ImageContent::new(image::DynamicImage::new_rgb8(300, 150)).with_width_mm(50.8);
        assert!(image_element(&content).is_ok());
    }

    #[test]
    fn zero_width_stroke_draws_nothing() {
        assert!(hairline_offsets(0.0).is_empty());
        assert!(hairline_offsets(-1.0).is_empty());
    }

    #[test]
    fn thin_stroke_is_a_single_hairline() {
        assert_eq!(hairline_offsets(0.04), vec![0.0]);
    }

    #[test]
    fn wide_stroke_spreads_hairlines_around_the_centre() {
        let offsets = hairline_offsets(0.5);
        assert_eq!(offsets.len(), 5);
        assert!((offsets[0] + 0.2).abs() < 1e-9);
        assert!((offsets[4] - 0.2).abs() < 1e-9);
        let sum: f64 = offsets.iter().sum();
        assert!(sum.abs() < 1e-9);
    }

    #[test]
    fn words_keep_trailing_whitespace() {
        assert_eq!(split_words("one two  three"), vec!["one ", "two  ", "three"]);
        assert_eq!(split_words("  lead"), vec!["  ", "lead"]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn lines_break_before_the_word_that_overflows() {
        let widths = [(4.0, 3.0), (4.0, 3.0), (4.0, 3.0)];
        assert_eq!(break_lines(&widths, 10.0), vec![0..2, 2..3]);
    }

    #[test]
    fn trailing_whitespace_does_not_force_a_break() {
        let widths = [(5.0, 4.0), (6.0, 5.0)];
        assert_eq!(break_lines(&widths, 9.0), vec![0..2]);
    }

    #[test]
    fn oversized_word_gets_its_own_line() {
        let widths = [(2.0, 1.0), (20.0, 20.0), (2.0, 1.0)];
        assert_eq!(break_lines(&widths, 10.0), vec![0..1, 1..2, 2..3]);
    }
}
