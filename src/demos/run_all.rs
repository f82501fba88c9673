use std::error::Error;
use std::path::Path;

use super::shared;
use crate::document::Pdf;
use crate::dsl::use_pdf;
use crate::error::PdfError;

const OUTPUT_DIR: &str = "target/run_all_demos";

/// Renders every demo into the `target/run_all_demos` directory.
pub fn run() -> Result<(), Box<dyn Error>> {
    let output_dir = Path::new(OUTPUT_DIR);

    render(
        output_dir,
        "sample_report.pdf",
        "Quarterly Report",
        shared::write_sample_report,
    )?;
    render(
        output_dir,
        "uneven_table.pdf",
        "Uneven rows",
        shared::write_uneven_table,
    )?;

    println!("All renders completed successfully.");
    Ok(())
}

fn render(
    output_dir: &Path,
    file_name: &str,
    title: &str,
    write: fn(&mut Pdf) -> Result<(), PdfError>,
) -> Result<(), Box<dyn Error>> {
    let mut pdf = use_pdf(shared::demo_config(title), write)?;
    let output_path = output_dir.join(file_name);
    pdf.save_to(&output_path)?;
    println!(
        "Generated {} ({} bytes)",
        output_path.display(),
        pdf.to_bytes()?.len()
    );
    Ok(())
}
