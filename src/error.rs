//! Error type shared by the document facade and the table builders.

use std::fmt;

/// Errors surfaced by the helpers in this crate.
#[derive(Debug)]
pub enum PdfError {
    /// The font family required by the document could not be loaded.
    FontLoad(genpdf::error::Error),
    /// `genpdf` rejected an element or failed while rendering the document.
    Render(genpdf::error::Error),
    /// An image source could not be read or decoded.
    Image(genpdf::error::Error),
    /// Reading a source or writing the output failed.
    Io(std::io::Error),
    /// A table was requested with zero columns.
    InvalidColumnCount(usize),
    /// Content was added while the document was not open.
    NotOpen,
    /// `open` was called on a document that is already open.
    AlreadyOpen,
    /// `open` was called after the document was rendered.
    Closed,
    /// Rendering failed earlier, so the document has no output.
    RenderFailed,
}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontLoad(err) => write!(f, "Failed to load fonts: {err}"),
            Self::Render(err) => write!(f, "Failed to render document: {err}"),
            Self::Image(err) => write!(f, "Failed to load image: {err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::InvalidColumnCount(count) => {
                write!(f, "Tables need at least one column, got {count}")
            }
            Self::NotOpen => write!(f, "The document is not open"),
            Self::AlreadyOpen => write!(f, "The document is already open"),
            Self::Closed => write!(f, "The document has already been closed"),
            Self::RenderFailed => {
                write!(f, "The document failed to render and has no output")
            }
        }
    }
}

impl std::error::Error for PdfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FontLoad(err) | Self::Render(err) | Self::Image(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::InvalidColumnCount(_)
            | Self::NotOpen
            | Self::AlreadyOpen
            | Self::Closed
            | Self::RenderFailed => None,
        }
    }
}
