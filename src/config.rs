//! Configuration for documents and the defaults handed down to tables, rows and cells.

use std::fmt;
use std::rc::Rc;

use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::Color;
use genpdf::{PaperSize, Size};
use log::{Level, Log, Record};

use crate::model::Padding;
use crate::style::TextStyle;
use crate::table::{Cell, TableStyle};

#[cfg(feature = "hyphenation")]
use genpdf::hyphenation;

/// Default font size in points.
pub const DEFAULT_FONT_SIZE: u8 = 12;

/// Default page margin in millimetres.
pub const DEFAULT_MARGIN_MM: f64 = 10.0;

type CellConfig = Rc<dyn Fn(&mut Cell)>;
type TableConfig = Rc<dyn Fn(&mut TableStyle)>;

/// Defaults shared by every table, row and cell created from a document.
///
/// Holds `Rc` callbacks, so it is neither `Send` nor `Sync`; builders are meant to be driven
/// from a single call chain.
#[derive(Clone)]
pub struct ContentDefaults {
    font_size: u8,
    color: Color,
    table_config: TableConfig,
    cell_config: CellConfig,
    logger: Option<Rc<dyn Log>>,
}

impl ContentDefaults {
    /// Font size used when a text helper is not given one.
    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    /// Color used for text, lines and rectangles unless overridden.
    pub fn color(&self) -> Color {
        self.color
    }

    /// The text style built from the default size and color.
    pub fn text_style(&self) -> TextStyle {
        TextStyle::new(self.font_size, self.color)
    }

    /// Same as [`Self::text_style`] with an optional size override.
    pub fn text_style_sized(&self, size: Option<u8>) -> TextStyle {
        TextStyle::new(size.unwrap_or(self.font_size), self.color)
    }

    pub fn set_font_size(&mut self, size: u8) {
        self.font_size = size;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Sets the callback applied to the style of every new table.
    pub fn set_table_config<F>(&mut self, config: F)
    where
        F: Fn(&mut TableStyle) + 'static,
    {
        self.table_config = Rc::new(config);
    }

    /// Sets the callback applied to every new cell before content is added.
    pub fn set_cell_config<F>(&mut self, config: F)
    where
        F: Fn(&mut Cell) + 'static,
    {
        self.cell_config = Rc::new(config);
    }

    /// Routes warnings and debug records to `logger` instead of the global logger.
    pub fn set_logger(&mut self, logger: Rc<dyn Log>) {
        self.logger = Some(logger);
    }

    pub(crate) fn table_config(&self) -> &TableConfig {
        &self.table_config
    }

    pub(crate) fn cell_config(&self) -> &CellConfig {
        &self.cell_config
    }

    /// Emits a record through the injected logger, or the `log` facade when none is set.
    pub(crate) fn emit(&self, level: Level, target: &str, args: fmt::Arguments<'_>) {
        match &self.logger {
            Some(logger) => {
                let record = Record::builder()
                    .args(args)
                    .level(level)
                    .target(target)
                    .build();
                if logger.enabled(record.metadata()) {
                    logger.log(&record);
                }
            }
            None => log::log!(target: target, level, "{}", args),
        }
    }
}

impl Default for ContentDefaults {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            color: Color::Rgb(0, 0, 0),
            table_config: Rc::new(|_| {}),
            cell_config: Rc::new(|_| {}),
            logger: None,
        }
    }
}

impl fmt::Debug for ContentDefaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentDefaults")
            .field("font_size", &self.font_size)
            .field("color", &self.color)
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

/// Settings used to create a [`crate::document::Pdf`].
///
/// | field | default |
/// |-------|---------|
/// | paper size | A4 |
/// | margins | 10 mm on every side |
/// | font size | 12 pt |
/// | color | black |
/// | table / cell callbacks | no-op |
/// | font family | [`crate::fonts::default_font_family`] |
pub struct PdfConfig {
    pub(crate) paper_size: Size,
    pub(crate) margins: Padding,
    pub(crate) title: Option<String>,
    pub(crate) font_family: Option<FontFamily<FontData>>,
    pub(crate) defaults: ContentDefaults,
    #[cfg(feature = "hyphenation")]
    pub(crate) hyphenator: Option<hyphenation::Standard>,
}

impl PdfConfig {
    /// Creates a configuration with the documented defaults.
    pub fn new() -> Self {
        Self {
            paper_size: PaperSize::A4.into(),
            margins: Padding::all(DEFAULT_MARGIN_MM),
            title: None,
            font_family: None,
            defaults: ContentDefaults::default(),
            #[cfg(feature = "hyphenation")]
            hyphenator: None,
        }
    }

    /// Sets the paper size used for every page.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = paper_size.into();
        self
    }

    /// Sets the initial page margins in millimetres.
    pub fn with_margins(mut self, margins: Padding) -> Self {
        self.margins = margins;
        self
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Uses an already loaded font family instead of searching for the bundled fonts.
    pub fn with_font_family(mut self, family: FontFamily<FontData>) -> Self {
        self.font_family = Some(family);
        self
    }

    /// Sets the default font size.
    pub fn with_font_size(mut self, size: u8) -> Self {
        self.defaults.set_font_size(size);
        self
    }

    /// Sets the default color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.defaults.set_color(color);
        self
    }

    /// Sets the callback applied to every new table.
    pub fn with_table_defaults<F>(mut self, config: F) -> Self
    where
        F: Fn(&mut TableStyle) + 'static,
    {
        self.defaults.set_table_config(config);
        self
    }

    /// Sets the callback applied to every new cell.
    pub fn with_cell_defaults<F>(mut self, config: F) -> Self
    where
        F: Fn(&mut Cell) + 'static,
    {
        self.defaults.set_cell_config(config);
        self
    }

    /// Routes diagnostics to `logger` instead of the global `log` facade.
    pub fn with_logger(mut self, logger: Rc<dyn Log>) -> Self {
        self.defaults.set_logger(logger);
        self
    }

    /// Enables hyphenation using the provided hyphenation dictionary.
    #[cfg(feature = "hyphenation")]
    pub fn with_hyphenator(mut self, hyphenator: hyphenation::Standard) -> Self {
        self.hyphenator = Some(hyphenator);
        self
    }

    /// Defaults handed to tables and text helpers.
    pub fn defaults(&self) -> &ContentDefaults {
        &self.defaults
    }
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self::new()
    }
}
