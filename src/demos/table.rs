use std::error::Error;

use super::shared;
use crate::dsl::use_pdf;

/// Renders the uneven table demo to `table.pdf`.
pub fn run() -> Result<(), Box<dyn Error>> {
    let mut pdf = use_pdf(shared::demo_config("Uneven rows"), shared::write_uneven_table)?;
    let bytes = pdf.to_bytes()?;
    std::fs::write("table.pdf", &bytes)?;
    println!("Generated table.pdf ({} bytes)", bytes.len());
    Ok(())
}
