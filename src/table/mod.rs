//! Table assembly.
//!
//! A [`TableBuilder`] collects rows through [`RowBuilder`] callbacks and turns them into a
//! rectangular [`Grid`] on [`TableBuilder::build`]:
//!
//! - cells beyond the column count are dropped,
//! - short rows are padded with empty placeholder cells.
//!
//! Nothing is allocated for the grid before `build` is called, and `build` can be repeated.

mod cell;
mod row;

use std::rc::Rc;

use log::Level;

pub use cell::{Cell, CellBuilder, CellContent, DEFAULT_CELL_PADDING_MM};
pub use row::{Row, RowBuilder};

use crate::config::ContentDefaults;
use crate::error::PdfError;
use crate::model::RichParagraph;

/// Table-level settings, the target of the table default configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableStyle {
    column_weights: Option<Vec<usize>>,
    spacing_before: f64,
    spacing_after: f64,
}

impl TableStyle {
    /// Relative column widths, if set.
    pub fn column_weights(&self) -> Option<&[usize]> {
        self.column_weights.as_deref()
    }

    /// Sets relative column widths. Ignored at build time unless one weight per column is given.
    pub fn set_column_weights(&mut self, weights: Vec<usize>) {
        self.column_weights = Some(weights);
    }

    /// Blank lines inserted before the table.
    pub fn spacing_before(&self) -> f64 {
        self.spacing_before
    }

    /// Blank lines inserted after the table.
    pub fn spacing_after(&self) -> f64 {
        self.spacing_after
    }

    pub fn set_spacing_before(&mut self, lines: f64) {
        self.spacing_before = lines;
    }

    pub fn set_spacing_after(&mut self, lines: f64) {
        self.spacing_after = lines;
    }
}

/// A finished, rectangular table.
#[derive(Clone, Debug)]
pub struct Grid {
    column_count: usize,
    rows: Vec<Row>,
    style: TableStyle,
}

impl Grid {
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Rows in insertion order; each holds exactly `column_count` cells.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn style(&self) -> &TableStyle {
        &self.style
    }
}

/// Collects rows for a table with a fixed number of columns.
pub struct TableBuilder<'a> {
    defaults: &'a ContentDefaults,
    column_count: usize,
    rows: Vec<Row>,
    style: TableStyle,
    cell_config: Rc<dyn Fn(&mut Cell)>,
}

impl<'a> TableBuilder<'a> {
    /// Creates a builder; the table default configuration runs on the new [`TableStyle`].
    pub fn new(defaults: &'a ContentDefaults, column_count: usize) -> Result<Self, PdfError> {
        if column_count == 0 {
            return Err(PdfError::InvalidColumnCount(column_count));
        }

        let mut style = TableStyle::default();
        (defaults.table_config())(&mut style);

        Ok(Self {
            defaults,
            column_count,
            rows: Vec::new(),
            style,
            cell_config: Rc::clone(defaults.cell_config()),
        })
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Rows added so far.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Replaces the cell default configuration for this table only.
    pub fn set_cell_config<F>(&mut self, config: F)
    where
        F: Fn(&mut Cell) + 'static,
    {
        self.cell_config = Rc::new(config);
    }

    /// Adjusts the table style.
    pub fn configure<F>(&mut self, configure: F) -> &mut Self
    where
        F: FnOnce(&mut TableStyle),
    {
        configure(&mut self.style);
        self
    }

    /// Builds a row with `build_row` and stores it.
    pub fn add_row<F>(&mut self, build_row: F) -> &mut Self
    where
        F: FnOnce(&mut RowBuilder<'_>),
    {
        let row = {
            let mut row = RowBuilder::new(self.column_count, self.defaults, &*self.cell_config);
            build_row(&mut row);
            row.into_row()
        };
        self.rows.push(row);
        self
    }

    /// Alias of [`Self::add_row`].
    pub fn row<F>(&mut self, build_row: F) -> &mut Self
    where
        F: FnOnce(&mut RowBuilder<'_>),
    {
        self.add_row(build_row)
    }

    /// Like [`Self::add_row`] for rows whose construction may fail, e.g. when loading images.
    ///
    /// Nothing is stored when `build_row` fails.
    pub fn try_add_row<F>(&mut self, build_row: F) -> Result<&mut Self, PdfError>
    where
        F: FnOnce(&mut RowBuilder<'_>) -> Result<(), PdfError>,
    {
        let row = {
            let mut row = RowBuilder::new(self.column_count, self.defaults, &*self.cell_config);
            build_row(&mut row)?;
            row.into_row()
        };
        self.rows.push(row);
        Ok(self)
    }

    fn placeholder_cell(&self) -> Cell {
        let mut cell = Cell::new();
        (self.cell_config)(&mut cell);
        cell.push(CellContent::Text(RichParagraph::with_text(
            "",
            self.defaults.text_style(),
        )));
        cell
    }

    /// Lays the stored rows out into a grid of exactly `column_count` cells per row.
    pub fn build(&self) -> Grid {
        let mut rows = Vec::with_capacity(self.rows.len());

        for (index, row) in self.rows.iter().enumerate() {
            let cells = row.cells();
            let mut placed: Vec<Cell> = Vec::with_capacity(self.column_count);
            for (column, cell) in cells.iter().enumerate() {
                if column < self.column_count {
                    placed.push(cell.clone());
                }
            }

            if cells.len() > self.column_count {
                self.defaults.emit(
                    Level::Debug,
                    module_path!(),
                    format_args!(
                        "Row {} has {} cells; dropping {} beyond column {}.",
                        index,
                        cells.len(),
                        cells.len() - self.column_count,
                        self.column_count
                    ),
                );
            }

            let contributed = placed.len();
            for _ in contributed..self.column_count {
                placed.push(self.placeholder_cell());
            }

            rows.push(Row::new(placed));
        }

        let mut style = self.style.clone();
        let mismatched = style
            .column_weights()
            .map(<[usize]>::len)
            .filter(|len| *len != self.column_count);
        if let Some(len) = mismatched {
            self.defaults.emit(
                Level::Warn,
                module_path!(),
                format_args!(
                    "Ignoring {} column weights for a table with {} columns.",
                    len, self.column_count
                ),
            );
            style.column_weights = None;
        }

        Grid {
            column_count: self.column_count,
            rows,
            style,
        }
    }
}
