//! Content value types shared by the document facade and the table builders.
//!
//! These types describe *what* goes into a cell or onto a page without touching the font cache,
//! so they can be assembled and inspected before a document is rendered.  Conversion into
//! [`genpdf::elements`] happens in [`crate::elements`].

use std::io::Read;
use std::path::Path;

use genpdf::Alignment;

use crate::elements;
use crate::error::PdfError;
use crate::richtext::Span;
use crate::style::{StyleFlags, TextStyle};

/// Horizontal alignment of paragraphs, images and cell content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
}

impl From<HorizontalAlignment> for Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => Alignment::Left,
            HorizontalAlignment::Center => Alignment::Center,
            HorizontalAlignment::Right => Alignment::Right,
        }
    }
}

/// Spacing between a region's border and its content, in millimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    /// Same padding on every side.
    pub fn all(value: f64) -> Self {
        Self::trbl(value, value, value, value)
    }

    /// Padding given as top, right, bottom, left.
    pub fn trbl(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Vertical and horizontal padding.
    pub fn vh(vertical: f64, horizontal: f64) -> Self {
        Self::trbl(vertical, horizontal, vertical, horizontal)
    }
}

/// A paragraph made of styled spans.
///
/// Every span is resolved against the paragraph's base [`TextStyle`], so a paragraph created with
/// the document defaults only needs per-span overrides where the text differs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RichParagraph {
    spans: Vec<Span>,
    style: TextStyle,
    alignment: HorizontalAlignment,
}

impl RichParagraph {
    /// Creates an empty paragraph using `style` for unstyled spans.
    pub fn new(style: TextStyle) -> Self {
        Self {
            spans: Vec::new(),
            style,
            alignment: HorizontalAlignment::Left,
        }
    }

    /// Creates a paragraph holding a single unstyled span.
    pub fn with_text(text: impl Into<String>, style: TextStyle) -> Self {
        let mut paragraph = Self::new(style);
        paragraph.push(Span::new(text));
        paragraph
    }

    /// Returns the spans that make up the paragraph.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Returns the concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }

    /// Base style applied to the spans.
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Mutable access to the base style, e.g. to switch the whole paragraph to bold.
    pub fn style_mut(&mut self) -> &mut TextStyle {
        &mut self.style
    }

    /// Returns the configured alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: HorizontalAlignment) {
        self.alignment = alignment;
    }

    /// Sets the alignment and returns the updated paragraph.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Appends a span.
    pub fn push(&mut self, span: impl Into<Span>) -> &mut Self {
        self.spans.push(span.into());
        self
    }

    /// Returns whether the paragraph contains no spans.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Returns whether any span needs underline or strikethrough strokes.
    pub fn has_stroke_decorations(&self) -> bool {
        let base = self.style.flags();
        self.spans.iter().any(|span| {
            let flags = base | span.font_style().flags();
            flags.intersects(StyleFlags::UNDERLINE | StyleFlags::STRIKETHROUGH)
        })
    }
}

/// A decoded image plus placement settings.
#[derive(Clone, Debug)]
pub struct ImageContent {
    image: image::DynamicImage,
    alignment: HorizontalAlignment,
    scale: Option<(f64, f64)>,
    width_mm: Option<f64>,
}

impl ImageContent {
    /// Wraps an already decoded image.
    pub fn new(image: image::DynamicImage) -> Self {
        Self {
            image,
            alignment: HorizontalAlignment::Left,
            scale: None,
            width_mm: None,
        }
    }

    /// Decodes the image stored at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PdfError> {
        elements::decode_image_from_path(path)
            .map(Self::new)
            .map_err(PdfError::Image)
    }

    /// Decodes an image held in memory.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self, PdfError> {
        elements::decode_image_from_bytes(bytes)
            .map(Self::new)
            .map_err(PdfError::Image)
    }

    /// Reads `reader` to the end and decodes the result.
    ///
    /// The reader is consumed but not closed; callers that own a file handle keep it.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, PdfError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(bytes)
    }

    /// Returns the decoded image.
    pub fn image(&self) -> &image::DynamicImage {
        &self.image
    }

    /// Returns the configured alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Explicit scale factors, if set.
    pub fn scale(&self) -> Option<(f64, f64)> {
        self.scale
    }

    /// Requested rendered width in millimetres, if any.
    pub fn width_mm(&self) -> Option<f64> {
        self.width_mm
    }

    pub fn set_alignment(&mut self, alignment: HorizontalAlignment) {
        self.alignment = alignment;
    }

    /// Scales the image by the given factors. Overrides any requested width.
    pub fn set_scale(&mut self, x: f64, y: f64) {
        self.scale = Some((x, y));
        self.width_mm = None;
    }

    /// Scales the image to `width_mm` keeping the aspect ratio. Overrides any explicit scale.
    pub fn set_width_mm(&mut self, width_mm: f64) {
        self.width_mm = Some(width_mm);
        self.scale = None;
    }

    /// Sets the alignment and returns the updated image.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Constrains the rendered width and returns the updated image.
    pub fn with_width_mm(mut self, width_mm: f64) -> Self {
        self.set_width_mm(width_mm);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    #[test]
    fn paragraph_text_concatenates_spans() {
        let mut paragraph = RichParagraph::new(TextStyle::default());
        paragraph.push("Hello, ").push(Span::new("world").bold());
        assert_eq!(paragraph.text(), "Hello, world");
        assert_eq!(paragraph.spans().len(), 2);
    }

    #[test]
    fn stroke_decorations_consider_base_style() {
        let mut paragraph = RichParagraph::with_text("plain", TextStyle::default());
        assert!(!paragraph.has_stroke_decorations());

        paragraph.style_mut().set_underline();
        assert!(paragraph.has_stroke_decorations());

        let mut struck = RichParagraph::new(TextStyle::default());
        struck.push(Span::new("gone").with_flags(StyleFlags::STRIKETHROUGH));
        assert!(struck.has_stroke_decorations());
    }

    #[test]
    fn invalid_image_bytes_are_reported() {
        let err = ImageContent::from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PdfError::Image(_)));
    }

    #[test]
    fn missing_image_file_is_reported() {
        let err = ImageContent::from_path("/__pdf_dsl_missing__/image.png").unwrap_err();
        assert!(matches!(err, PdfError::Image(_)));
    }

    #[test]
    fn reader_source_decodes_like_bytes() {
        let image = image::DynamicImage::new_rgb8(4, 2);
        let mut encoded = Vec::new();
        image
            .write_to(&mut encoded, image::ImageOutputFormat::Png)
            .expect("encode png");

        let content = ImageContent::from_reader(std::io::Cursor::new(encoded)).expect("decode");
        assert_eq!(content.image().width(), 4);
        assert_eq!(content.image().height(), 2);
    }

    #[test]
    fn width_and_scale_are_exclusive() {
        let mut content = ImageContent::new(image::DynamicImage::new_rgb8(1, 1));
        content.set_scale(2.0, 2.0);
        content.set_width_mm(30.0);
        assert_eq!(content.scale(), None);
        assert_eq!(content.width_mm(), Some(30.0));
    }
}
