//! Closure-based entry points.

use crate::config::PdfConfig;
use crate::document::Pdf;
use crate::error::PdfError;

/// Creates a document and hands it to `build` without opening it.
///
/// `build` decides when to call [`Pdf::open`] and [`Pdf::close`].
pub fn pdf<F>(config: PdfConfig, build: F) -> Result<Pdf, PdfError>
where
    F: FnOnce(&mut Pdf) -> Result<(), PdfError>,
{
    let mut pdf = Pdf::new(config)?;
    build(&mut pdf)?;
    Ok(pdf)
}

/// Creates a document, opens it, runs `build` and closes it again.
///
/// The returned document is rendered; [`Pdf::to_bytes`] and [`Pdf::save_to`] are ready to use.
pub fn use_pdf<F>(config: PdfConfig, build: F) -> Result<Pdf, PdfError>
where
    F: FnOnce(&mut Pdf) -> Result<(), PdfError>,
{
    let mut pdf = Pdf::new(config)?;
    pdf.open(|_| {})?;
    build(&mut pdf)?;
    pdf.close()?;
    Ok(pdf)
}
