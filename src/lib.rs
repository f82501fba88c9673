//! Builder-style helpers for composing PDF documents on top of `genpdf`.
//!
//! The entry points are [`Pdf`] and the closure helpers [`pdf`] and [`use_pdf`].  Tables are
//! assembled through [`table::TableBuilder`], which lays rows of varying length out into a
//! rectangular grid before they reach the page.

pub mod border;
pub mod config;
pub mod demos;
pub mod document;
pub mod dsl;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod model;
pub mod richtext;
pub mod style;
pub mod table;

pub use border::{BorderLine, BorderSide, Borders};
pub use config::{ContentDefaults, PdfConfig};
pub use document::{DocumentSettings, DocumentState, Pdf};
pub use dsl::{pdf, use_pdf};
pub use error::PdfError;
pub use model::{HorizontalAlignment, ImageContent, Padding, RichParagraph};
pub use richtext::Span;
pub use style::{FontStyle, StyleFlags, TextStyle};
pub use table::{Cell, CellBuilder, Grid, Row, RowBuilder, TableBuilder, TableStyle};

pub use genpdf::style::Color;
