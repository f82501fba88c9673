use std::error::Error;

use super::shared;
use crate::dsl::use_pdf;

/// Renders the sample report to `report.pdf`.
///
/// The document needs the font family described in [`crate::fonts`].
pub fn run() -> Result<(), Box<dyn Error>> {
    let mut pdf = use_pdf(shared::demo_config("Quarterly Report"), shared::write_sample_report)?;
    let bytes = pdf.to_bytes()?;
    std::fs::write("report.pdf", &bytes)?;
    println!("Generated report.pdf ({} bytes)", bytes.len());
    Ok(())
}
