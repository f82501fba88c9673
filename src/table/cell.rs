//! Table cells and the builder used to compose their content.

use std::io::Read;
use std::path::Path;

use crate::border::Borders;
use crate::config::ContentDefaults;
use crate::error::PdfError;
use crate::model::{HorizontalAlignment, ImageContent, Padding, RichParagraph};

/// Default cell padding in millimetres.
pub const DEFAULT_CELL_PADDING_MM: f64 = 1.0;

/// One content item of a cell.
#[derive(Clone, Debug)]
pub enum CellContent {
    /// A text paragraph.
    Text(RichParagraph),
    /// A decoded image.
    Image(ImageContent),
}

/// The smallest addressable unit of a table row.
///
/// Several content items stack vertically inside the cell's padding and borders.
#[derive(Clone, Debug)]
pub struct Cell {
    contents: Vec<CellContent>,
    padding: Padding,
    alignment: Option<HorizontalAlignment>,
    borders: Borders,
}

impl Cell {
    /// Creates an empty cell with default padding and borders.
    pub fn new() -> Self {
        Self {
            contents: Vec::new(),
            padding: Padding::all(DEFAULT_CELL_PADDING_MM),
            alignment: None,
            borders: Borders::default(),
        }
    }

    /// Appends a content item.
    pub fn push(&mut self, content: CellContent) {
        self.contents.push(content);
    }

    /// Content items in insertion order.
    pub fn contents(&self) -> &[CellContent] {
        &self.contents
    }

    /// Returns whether the cell has no content items.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Concatenated text of all paragraphs, one line per paragraph.
    pub fn text(&self) -> String {
        self.contents
            .iter()
            .filter_map(|content| match content {
                CellContent::Text(paragraph) => Some(paragraph.text()),
                CellContent::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
    }

    /// Alignment override applied to every content item, if set.
    pub fn alignment(&self) -> Option<HorizontalAlignment> {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: HorizontalAlignment) {
        self.alignment = Some(alignment);
    }

    pub fn borders(&self) -> &Borders {
        &self.borders
    }

    /// Mutable borders, usually driven through [`crate::border::BorderSide`].
    pub fn borders_mut(&mut self) -> &mut Borders {
        &mut self.borders
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

/// Composes the content of a single cell before it is appended to a row.
///
/// The cell default configuration of the table runs once, on construction, before any content
/// is added.
pub struct CellBuilder<'a> {
    cell: Cell,
    defaults: &'a ContentDefaults,
}

impl<'a> CellBuilder<'a> {
    pub(crate) fn new(defaults: &'a ContentDefaults, cell_config: &dyn Fn(&mut Cell)) -> Self {
        let mut cell = Cell::new();
        cell_config(&mut cell);
        Self { cell, defaults }
    }

    /// Adds a paragraph of `value` using the default font, or `size` when given.
    pub fn text<F>(&mut self, value: impl Into<String>, size: Option<u8>, configure: F) -> &mut Self
    where
        F: FnOnce(&mut Cell, &mut RichParagraph),
    {
        let mut paragraph = RichParagraph::with_text(value, self.defaults.text_style_sized(size));
        configure(&mut self.cell, &mut paragraph);
        self.cell.push(CellContent::Text(paragraph));
        self
    }

    /// Adds an empty paragraph that `configure` fills itself.
    pub fn paragraph<F>(&mut self, configure: F) -> &mut Self
    where
        F: FnOnce(&mut Cell, &mut RichParagraph),
    {
        let mut paragraph = RichParagraph::new(self.defaults.text_style());
        configure(&mut self.cell, &mut paragraph);
        self.cell.push(CellContent::Text(paragraph));
        self
    }

    /// Adds an already decoded image.
    pub fn image<F>(&mut self, image: ImageContent, configure: F) -> &mut Self
    where
        F: FnOnce(&mut Cell, &mut ImageContent),
    {
        let mut image = image;
        configure(&mut self.cell, &mut image);
        self.cell.push(CellContent::Image(image));
        self
    }

    /// Decodes the image at `path` and adds it.
    pub fn image_path<F>(
        &mut self,
        path: impl AsRef<Path>,
        configure: F,
    ) -> Result<&mut Self, PdfError>
    where
        F: FnOnce(&mut Cell, &mut ImageContent),
    {
        let image = ImageContent::from_path(path)?;
        Ok(self.image(image, configure))
    }

    /// Decodes `bytes` and adds the resulting image.
    pub fn image_bytes<F>(
        &mut self,
        bytes: impl AsRef<[u8]>,
        configure: F,
    ) -> Result<&mut Self, PdfError>
    where
        F: FnOnce(&mut Cell, &mut ImageContent),
    {
        let image = ImageContent::from_bytes(bytes)?;
        Ok(self.image(image, configure))
    }

    /// Reads `reader` to the end, decodes it and adds the resulting image.
    pub fn image_reader<R, F>(&mut self, reader: R, configure: F) -> Result<&mut Self, PdfError>
    where
        R: Read,
        F: FnOnce(&mut Cell, &mut ImageContent),
    {
        let image = ImageContent::from_reader(reader)?;
        Ok(self.image(image, configure))
    }

    /// Gives direct access to the cell under construction.
    pub fn config<F>(&mut self, configure: F) -> &mut Self
    where
        F: FnOnce(&mut Cell),
    {
        configure(&mut self.cell);
        self
    }

    /// Returns the finished cell.
    pub fn build(self) -> Cell {
        self.cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::BorderSide;
    use genpdf::style::Color;

    #[test]
    fn cell_defaults_run_before_content() {
        let defaults = ContentDefaults::default();
        let config = |cell: &mut Cell| {
            assert!(cell.is_empty(), "defaults must see an empty cell");
            cell.set_padding(Padding::all(4.0));
        };

        let mut builder = CellBuilder::new(&defaults, &config);
        builder.text("hello", None, |_, _| {});
        let cell = builder.build();

        assert_eq!(cell.padding(), Padding::all(4.0));
        assert_eq!(cell.text(), "hello");
    }

    #[test]
    fn text_uses_default_size_unless_overridden() {
        let mut defaults = ContentDefaults::default();
        defaults.set_font_size(9);
        let mut builder = CellBuilder::new(&defaults, &|_: &mut Cell| {});
        builder
            .text("default", None, |_, _| {})
            .text("large", Some(18), |_, paragraph| {
                paragraph.style_mut().set_bold();
            });
        let cell = builder.build();

        let sizes: Vec<u8> = cell
            .contents()
            .iter()
            .map(|content| match content {
                CellContent::Text(paragraph) => paragraph.style().size(),
                CellContent::Image(_) => 0,
            })
            .collect();
        assert_eq!(sizes, vec![9, 18]);
    }

    #[test]
    fn paragraph_callback_fills_content() {
        let defaults = ContentDefaults::default();
        let mut builder = CellBuilder::new(&defaults, &|_: &mut Cell| {});
        builder.paragraph(|cell, paragraph| {
            paragraph.push("first ").push("second");
            BorderSide::Top.apply(cell.borders_mut(), Some(Color::Rgb(255, 0, 0)), None);
        });
        let cell = builder.build();

        assert_eq!(cell.text(), "first second");
        assert_eq!(cell.borders().top.color, Color::Rgb(255, 0, 0));
    }

    #[test]
    fn unreadable_image_propagates_error() {
        let defaults = ContentDefaults::default();
        let mut builder = CellBuilder::new(&defaults, &|_: &mut Cell| {});
        let result = builder.image_bytes(b"not an image", |_, _| {});
        assert!(matches!(result, Err(PdfError::Image(_))));
    }

    #[test]
    fn failing_reader_propagates_io_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "broken"))
            }
        }

        let defaults = ContentDefaults::default();
        let mut builder = CellBuilder::new(&defaults, &|_: &mut Cell| {});
        let result = builder.image_reader(Broken, |_, _| {});
        assert!(matches!(result, Err(PdfError::Io(_))));
    }

    #[test]
    fn image_configuration_is_applied() {
        let defaults = ContentDefaults::default();
        let mut builder = CellBuilder::new(&defaults, &|_: &mut Cell| {});
        builder.image(
            ImageContent::new(image::DynamicImage::new_rgb8(2, 2)),
            |cell, image| {
                image.set_alignment(HorizontalAlignment::Center);
                cell.set_alignment(HorizontalAlignment::Right);
            },
        );
        let cell = builder.build();

        assert_eq!(cell.alignment(), Some(HorizontalAlignment::Right));
        match &cell.contents()[0] {
            CellContent::Image(image) => assert_eq!(image.alignment(), HorizontalAlignment::Center),
            CellContent::Text(_) => panic!("expected image content"),
        }
    }
}
