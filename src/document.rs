//! The document facade: lifecycle, page settings and the "add X" helpers.
//!
//! A [`Pdf`] is created with fonts loaded, accepts content between [`Pdf::open`] and
//! [`Pdf::close`], and holds the rendered bytes afterwards.  A failed render leaves it in
//! [`DocumentState::Failed`], where every output operation reports an error.
//! `genpdf` renders a document in one pass, so the page decorator carrying the margins is
//! only installed when the document is closed; margins may therefore change at any time
//! before that.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use genpdf::elements::{Break, PageBreak};
use genpdf::error::Error;
use genpdf::style::{Color, Style};
use genpdf::{render, Element, Margins, PageDecorator, Size};
use log::Level;

use crate::border::{BorderLine, Borders};
use crate::config::{ContentDefaults, PdfConfig};
use crate::elements::{self, HorizontalRule, RectangleElement};
use crate::error::PdfError;
use crate::fonts;
use crate::model::{ImageContent, Padding, RichParagraph};
use crate::style::{StyleFlags, TextStyle};
use crate::table::{Grid, TableBuilder};

/// Default line spacing factor.
pub const DEFAULT_LINE_SPACING: f64 = 1.0;

/// Lifecycle state of a [`Pdf`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentState {
    /// Created, not opened yet.
    Created,
    /// Accepting content.
    Open,
    /// Rendered; the bytes are available.
    Closed,
    /// Rendering failed; there is no output and no content can be added.
    Failed,
}

/// Page-level settings adjustable through [`Pdf::open`] and [`Pdf::set_margins`].
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentSettings {
    /// Page margins in millimetres.
    pub margins: Padding,
    /// Title stored in the document metadata.
    pub title: Option<String>,
    /// Line spacing factor applied to every text line.
    pub line_spacing: f64,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            margins: Padding::all(crate::config::DEFAULT_MARGIN_MM),
            title: None,
            line_spacing: DEFAULT_LINE_SPACING,
        }
    }
}

/// Applies the page margins to every page.
struct MarginDecorator {
    margins: Margins,
}

impl MarginDecorator {
    fn new(margins: Padding) -> Self {
        Self {
            margins: elements::margins_from_padding(margins),
        }
    }
}

impl PageDecorator for MarginDecorator {
    fn decorate_page<'a>(
        &mut self,
        _context: &genpdf::Context,
        mut area: render::Area<'a>,
        _style: Style,
    ) -> Result<render::Area<'a>, Error> {
        area.add_margins(self.margins);
        Ok(area)
    }
}

/// A PDF document under construction.
///
/// ```no_run
/// use pdf_dsl::{Pdf, PdfConfig};
///
/// # fn main() -> Result<(), pdf_dsl::PdfError> {
/// let mut pdf = Pdf::new(PdfConfig::new())?;
/// pdf.open(|_| {})?;
/// pdf.text("Quarterly report", Some(18), |p| p.style_mut().set_bold())?;
/// pdf.table(2, |table| {
///     table.add_row(|row| {
///         row.add_text("Revenue", None, |_, _| {});
///         row.add_text("1200", None, |_, _| {});
///     });
/// })?;
/// pdf.save_to("target/report.pdf")?;
/// # Ok(())
/// # }
/// ```
pub struct Pdf {
    document: Option<genpdf::Document>,
    state: DocumentState,
    settings: DocumentSettings,
    paper_size: Size,
    defaults: ContentDefaults,
    output: Vec<u8>,
}

impl Pdf {
    /// Loads the fonts and prepares an empty document. The document still needs to be opened.
    pub fn new(config: PdfConfig) -> Result<Self, PdfError> {
        let PdfConfig {
            paper_size,
            margins,
            title,
            font_family,
            defaults,
            #[cfg(feature = "hyphenation")]
            hyphenator,
        } = config;

        let font_family = match font_family {
            Some(family) => family,
            None => fonts::default_font_family().map_err(PdfError::FontLoad)?,
        };

        let mut document = genpdf::Document::new(font_family);
        document.set_paper_size(paper_size);
        document.set_font_size(defaults.font_size());
        #[cfg(feature = "hyphenation")]
        if let Some(hyphenator) = hyphenator {
            document.set_hyphenator(hyphenator);
        }

        Ok(Self {
            document: Some(document),
            state: DocumentState::Created,
            settings: DocumentSettings {
                margins,
                title,
                ..DocumentSettings::default()
            },
            paper_size,
            defaults,
            output: Vec::new(),
        })
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DocumentState::Open
    }

    pub fn settings(&self) -> &DocumentSettings {
        &self.settings
    }

    /// Defaults used by the text helpers and by every table created from this document.
    pub fn defaults(&self) -> &ContentDefaults {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut ContentDefaults {
        &mut self.defaults
    }

    /// Opens the document after letting `configure` adjust the page settings.
    pub fn open<F>(&mut self, configure: F) -> Result<&mut Self, PdfError>
    where
        F: FnOnce(&mut DocumentSettings),
    {
        match self.state {
            DocumentState::Open => return Err(PdfError::AlreadyOpen),
            DocumentState::Closed | DocumentState::Failed => return Err(PdfError::Closed),
            DocumentState::Created => {}
        }

        configure(&mut self.settings);
        self.state = DocumentState::Open;
        self.log(Level::Debug, format_args!("Document opened"));
        Ok(self)
    }

    /// Renders the document into the internal buffer. Closing twice is a no-op.
    ///
    /// When rendering fails the first call returns the render error and every later call
    /// returns [`PdfError::RenderFailed`].
    pub fn close(&mut self) -> Result<(), PdfError> {
        match self.state {
            DocumentState::Open => {}
            DocumentState::Failed => return Err(PdfError::RenderFailed),
            DocumentState::Created | DocumentState::Closed => return Ok(()),
        }

        let Some(mut document) = self.document.take() else {
            self.state = DocumentState::Failed;
            return Err(PdfError::RenderFailed);
        };
        // genpdf consumes the document, so a failed render cannot be retried.
        self.state = DocumentState::Failed;
        if let Some(title) = &self.settings.title {
            document.set_title(title.clone());
        }
        document.set_line_spacing(self.settings.line_spacing);
        document.set_page_decorator(MarginDecorator::new(self.settings.margins));

        let mut output = Vec::new();
        if let Err(err) = document.render(&mut output) {
            self.log(Level::Warn, format_args!("Document failed to render: {err}"));
            return Err(PdfError::Render(err));
        }
        self.state = DocumentState::Closed;
        self.log(
            Level::Debug,
            format_args!("Document closed, rendered {} bytes", output.len()),
        );
        self.output = output;
        Ok(())
    }

    /// Starts a new page.
    pub fn new_page(&mut self) -> Result<&mut Self, PdfError> {
        self.add(PageBreak::new())
    }

    /// Updates the page margins in millimetres; `None` keeps the current value of that side.
    pub fn set_margins(
        &mut self,
        left: Option<f64>,
        right: Option<f64>,
        top: Option<f64>,
        bottom: Option<f64>,
    ) -> &mut Self {
        let margins = &mut self.settings.margins;
        margins.left = left.unwrap_or(margins.left);
        margins.right = right.unwrap_or(margins.right);
        margins.top = top.unwrap_or(margins.top);
        margins.bottom = bottom.unwrap_or(margins.bottom);
        self
    }

    /// Returns the rendered document, closing it first when it is still open.
    ///
    /// A document that was never opened yields an empty buffer.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, PdfError> {
        self.close()?;
        Ok(self.output.clone())
    }

    /// Writes the rendered document to `path`, creating missing parent directories.
    ///
    /// The document is rendered before anything is created on disk.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<(), PdfError> {
        self.close()?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.save_to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the rendered document to `writer`.
    pub fn save_to_writer<W: Write>(&mut self, mut writer: W) -> Result<(), PdfError> {
        self.close()?;
        writer.write_all(&self.output)?;
        Ok(())
    }

    /// Pushes any `genpdf` element onto the open document.
    pub fn add<E>(&mut self, element: E) -> Result<&mut Self, PdfError>
    where
        E: Element + 'static,
    {
        self.open_document()?.push(element);
        Ok(self)
    }

    /// Adds a paragraph of `text` in the default font, or `size` when given.
    pub fn text<F>(
        &mut self,
        text: impl Into<String>,
        size: Option<u8>,
        configure: F,
    ) -> Result<&mut Self, PdfError>
    where
        F: FnOnce(&mut RichParagraph),
    {
        let text: String = text.into();
        let style = self.defaults.text_style_sized(size);
        self.add_paragraph(style, |paragraph| {
            paragraph.push(text);
            configure(paragraph);
        })
    }

    /// Alias of [`Self::text`].
    pub fn paragraph<F>(
        &mut self,
        text: impl Into<String>,
        size: Option<u8>,
        configure: F,
    ) -> Result<&mut Self, PdfError>
    where
        F: FnOnce(&mut RichParagraph),
    {
        self.text(text, size, configure)
    }

    /// Adds a single run of text with the given style flags.
    pub fn text_chunk(
        &mut self,
        text: impl Into<String>,
        size: Option<u8>,
        flags: StyleFlags,
    ) -> Result<&mut Self, PdfError> {
        let text: String = text.into();
        let style = self.defaults.text_style_sized(size).with_flags(flags);
        self.add_paragraph(style, |paragraph| {
            paragraph.push(text);
        })
    }

    /// Adds an empty paragraph in `style` that `configure` fills.
    pub fn add_paragraph<F>(
        &mut self,
        style: TextStyle,
        configure: F,
    ) -> Result<&mut Self, PdfError>
    where
        F: FnOnce(&mut RichParagraph),
    {
        self.open_document()?;
        let mut paragraph = RichParagraph::new(style);
        configure(&mut paragraph);
        self.add(elements::paragraph_element(&paragraph))
    }

    /// Adds a decoded image.
    pub fn image<F>(&mut self, image: ImageContent, configure: F) -> Result<&mut Self, PdfError>
    where
        F: FnOnce(&mut ImageContent),
    {
        self.open_document()?;
        let mut image = image;
        configure(&mut image);
        let element = elements::image_element(&image).map_err(PdfError::Image)?;
        self.add(element)
    }

    /// Decodes the image at `path` and adds it.
    pub fn image_path<F>(
        &mut self,
        path: impl AsRef<Path>,
        configure: F,
    ) -> Result<&mut Self, PdfError>
    where
        F: FnOnce(&mut ImageContent),
    {
        self.open_document()?;
        self.image(ImageContent::from_path(path)?, configure)
    }

    /// Decodes `bytes` and adds the resulting image.
    pub fn image_bytes<F>(
        &mut self,
        bytes: impl AsRef<[u8]>,
        configure: F,
    ) -> Result<&mut Self, PdfError>
    where
        F: FnOnce(&mut ImageContent),
    {
        self.open_document()?;
        self.image(ImageContent::from_bytes(bytes)?, configure)
    }

    /// Reads `reader` to the end and adds the decoded image. The caller keeps ownership of
    /// whatever the reader wraps.
    pub fn image_reader<R, F>(&mut self, reader: R, configure: F) -> Result<&mut Self, PdfError>
    where
        R: Read,
        F: FnOnce(&mut ImageContent),
    {
        self.open_document()?;
        self.image(ImageContent::from_reader(reader)?, configure)
    }

    /// Draws a centered horizontal rule.
    ///
    /// `width_percent` is relative to the text area, `thickness` is in millimetres and the
    /// default color is used unless `color` is given.
    pub fn line(
        &mut self,
        width_percent: f64,
        thickness: f64,
        color: Option<Color>,
    ) -> Result<&mut Self, PdfError> {
        let color = color.unwrap_or_else(|| self.defaults.color());
        self.add(HorizontalRule::new(width_percent, thickness, color))
    }

    /// Draws a `width` x `height` millimetre rectangle outlined in `color` (the default color
    /// when `None`). `configure` may adjust the individual sides.
    pub fn rectangle<F>(
        &mut self,
        width: f64,
        height: f64,
        color: Option<Color>,
        configure: F,
    ) -> Result<&mut Self, PdfError>
    where
        F: FnOnce(&mut Borders),
    {
        self.open_document()?;
        let color = color.unwrap_or_else(|| self.defaults.color());
        let mut borders = Borders::uniform(BorderLine::new(
            color,
            crate::border::DEFAULT_BORDER_WIDTH_MM,
        ));
        configure(&mut borders);
        self.add(RectangleElement::new(width, height, borders))
    }

    /// Adds `lines` empty lines.
    pub fn space(&mut self, lines: f64) -> Result<&mut Self, PdfError> {
        self.add(Break::new(lines))
    }

    /// Adds a single empty line.
    pub fn new_line(&mut self) -> Result<&mut Self, PdfError> {
        self.space(1.0)
    }

    /// Builds a table of `column_count` columns with `build` and adds it.
    pub fn table<F>(&mut self, column_count: usize, build: F) -> Result<&mut Self, PdfError>
    where
        F: FnOnce(&mut TableBuilder<'_>),
    {
        self.open_document()?;
        let grid = {
            let mut table = TableBuilder::new(&self.defaults, column_count)?;
            build(&mut table);
            table.build()
        };
        self.add_table(&grid)
    }

    /// Like [`Self::table`] for tables whose construction may fail, e.g. when loading images.
    pub fn try_table<F>(&mut self, column_count: usize, build: F) -> Result<&mut Self, PdfError>
    where
        F: FnOnce(&mut TableBuilder<'_>) -> Result<(), PdfError>,
    {
        self.open_document()?;
        let grid = {
            let mut table = TableBuilder::new(&self.defaults, column_count)?;
            build(&mut table)?;
            table.build()
        };
        self.add_table(&grid)
    }

    /// Adds an already built grid with the spacing of its table style.
    pub fn add_table(&mut self, grid: &Grid) -> Result<&mut Self, PdfError> {
        self.open_document()?;
        let layout = elements::table_element(grid).map_err(PdfError::Render)?;

        let style = grid.style();
        if style.spacing_before() > 0.0 {
            self.space(style.spacing_before())?;
        }
        self.add(layout)?;
        if style.spacing_after() > 0.0 {
            self.space(style.spacing_after())?;
        }
        Ok(self)
    }

    /// The default text style resized to `size`.
    pub fn font(&self, size: u8) -> TextStyle {
        self.defaults.text_style_sized(Some(size))
    }

    /// Paper width in millimetres.
    pub fn width(&self) -> f64 {
        elements::mm_to_f64(self.paper_size.width)
    }

    /// Paper height in millimetres.
    pub fn height(&self) -> f64 {
        elements::mm_to_f64(self.paper_size.height)
    }

    fn open_document(&mut self) -> Result<&mut genpdf::Document, PdfError> {
        if self.state != DocumentState::Open {
            return Err(PdfError::NotOpen);
        }
        self.document.as_mut().ok_or(PdfError::NotOpen)
    }

    fn log(&self, level: Level, args: std::fmt::Arguments<'_>) {
        self.defaults.emit(level, module_path!(), args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_to_ten_millimetre_margins() {
        let settings = DocumentSettings::default();
        assert_eq!(settings.margins, Padding::all(10.0));
        assert_eq!(settings.title, None);
        assert_eq!(settings.line_spacing, DEFAULT_LINE_SPACING);
    }
}
