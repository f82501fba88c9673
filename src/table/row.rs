//! Row accumulation.

use log::Level;

use super::cell::{Cell, CellBuilder};
use crate::config::ContentDefaults;
use crate::error::PdfError;
use crate::model::{ImageContent, RichParagraph};

/// The cells of one table row, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub(crate) fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Accumulates the cells of one row of a [`super::TableBuilder`].
///
/// Adding a cell once the row already holds `column_count` cells logs a warning but still
/// appends it.  The table drops the excess when it is built.
pub struct RowBuilder<'t> {
    cells: Vec<Cell>,
    column_count: usize,
    defaults: &'t ContentDefaults,
    cell_config: &'t dyn Fn(&mut Cell),
}

impl<'t> RowBuilder<'t> {
    pub(crate) fn new(
        column_count: usize,
        defaults: &'t ContentDefaults,
        cell_config: &'t dyn Fn(&mut Cell),
    ) -> Self {
        Self {
            cells: Vec::new(),
            column_count,
            defaults,
            cell_config,
        }
    }

    /// Column count of the owning table.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Appends a prepared cell after running `configure` on it.
    pub fn add_cell<F>(&mut self, cell: Cell, configure: F) -> &mut Self
    where
        F: FnOnce(&mut Cell),
    {
        if self.cells.len() >= self.column_count {
            self.defaults.emit(
                Level::Warn,
                module_path!(),
                format_args!(
                    "Current row already has {} of {} columns; \
                     the extra cell will be dropped when the table is built.",
                    self.cells.len(),
                    self.column_count
                ),
            );
        }

        let mut cell = cell;
        configure(&mut cell);
        self.cells.push(cell);
        self
    }

    /// Appends a text cell using the default font, or `size` when given.
    pub fn add_text<F>(
        &mut self,
        text: impl Into<String>,
        size: Option<u8>,
        configure: F,
    ) -> &mut Self
    where
        F: FnOnce(&mut Cell, &mut RichParagraph),
    {
        let mut paragraph = RichParagraph::with_text(text, self.defaults.text_style_sized(size));
        let mut cell = Cell::new();
        (self.cell_config)(&mut cell);
        configure(&mut cell, &mut paragraph);
        cell.push(super::CellContent::Text(paragraph));
        self.add_cell(cell, |_| {})
    }

    /// Appends an image cell. Skips the column-count warning.
    pub fn add_image<F>(&mut self, image: ImageContent, configure: F) -> &mut Self
    where
        F: FnOnce(&mut Cell, &mut ImageContent),
    {
        let mut image = image;
        let mut cell = Cell::new();
        (self.cell_config)(&mut cell);
        configure(&mut cell, &mut image);
        cell.push(super::CellContent::Image(image));
        self.cells.push(cell);
        self
    }

    /// Composes a cell with a [`CellBuilder`] and appends it.
    pub fn cell<F>(&mut self, compose: F) -> &mut Self
    where
        F: FnOnce(&mut CellBuilder<'t>),
    {
        let mut builder = CellBuilder::new(self.defaults, self.cell_config);
        compose(&mut builder);
        self.add_cell(builder.build(), |_| {})
    }

    /// Like [`Self::cell`] for compositions that load images and may fail.
    pub fn try_cell<F>(&mut self, compose: F) -> Result<&mut Self, PdfError>
    where
        F: FnOnce(&mut CellBuilder<'t>) -> Result<(), PdfError>,
    {
        let mut builder = CellBuilder::new(self.defaults, self.cell_config);
        compose(&mut builder)?;
        Ok(self.add_cell(builder.build(), |_| {}))
    }

    /// The cells accumulated so far.
    pub fn build(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn into_row(self) -> Row {
        Row::new(self.cells)
    }
}
