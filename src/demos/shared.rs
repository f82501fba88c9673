//! Content shared by the demo runners.

use genpdf::style::Color;

use crate::border::BorderSide;
use crate::config::PdfConfig;
use crate::document::Pdf;
use crate::error::PdfError;
use crate::model::{HorizontalAlignment, Padding};
use crate::richtext::Span;
use crate::style::StyleFlags;
use crate::table::Cell;

const ACCENT: Color = Color::Rgb(0x1f, 0x4e, 0x79);
const MUTED: Color = Color::Rgb(0x80, 0x80, 0x80);

/// Configuration used by every demo: light grey cell borders and a little spacing around tables.
pub fn demo_config(title: &str) -> PdfConfig {
    PdfConfig::new()
        .with_title(title)
        .with_font_size(11)
        .with_table_defaults(|style| {
            style.set_spacing_before(0.5);
            style.set_spacing_after(1.0);
        })
        .with_cell_defaults(|cell: &mut Cell| {
            cell.set_padding(Padding::vh(1.5, 2.0));
            cell.borders_mut()
                .set_all(Some(0.1), Some(MUTED), &BorderSide::ALL);
        })
}

/// Writes the sample report into an open document.
pub fn write_sample_report(pdf: &mut Pdf) -> Result<(), PdfError> {
    pdf.text("Quarterly Report", Some(20), |paragraph| {
        paragraph.style_mut().set_bold();
        paragraph.style_mut().set_color(ACCENT);
        paragraph.set_alignment(HorizontalAlignment::Center);
    })?;
    pdf.line(100.0, 0.4, Some(ACCENT))?;
    pdf.new_line()?;

    pdf.add_paragraph(pdf.font(11), |paragraph| {
        paragraph
            .push("Revenue grew in every region. ")
            .push(Span::new("Europe").bold())
            .push(" led the quarter while ")
            .push(Span::new("Asia").italic().colored(ACCENT))
            .push(" recovered from a slow start.");
    })?;
    pdf.text_chunk("Figures are unaudited.", Some(9), StyleFlags::ITALIC | StyleFlags::UNDERLINE)?;
    pdf.space(1.0)?;

    pdf.table(3, |table| {
        table.configure(|style| style.set_column_weights(vec![2, 1, 1]));
        table.add_row(|row| {
            for header in ["Region", "Q1", "Q2"] {
                row.add_text(header, None, |cell, paragraph| {
                    paragraph.style_mut().set_bold();
                    cell.set_alignment(HorizontalAlignment::Center);
                    BorderSide::Bottom.apply(cell.borders_mut(), Some(ACCENT), Some(0.4));
                });
            }
        });
        for (region, q1, q2) in [("Europe", "1 200", "1 450"), ("Asia", "980", "1 105")] {
            table.add_row(|row| {
                row.add_text(region, None, |_, _| {});
                row.add_text(q1, None, |cell, _| cell.set_alignment(HorizontalAlignment::Right));
                row.add_text(q2, None, |cell, _| cell.set_alignment(HorizontalAlignment::Right));
            });
        }
        table.add_row(|row| {
            row.cell(|cell| {
                cell.text("Americas", None, |_, _| {})
                    .text("pending", Some(8), |_, paragraph| {
                        paragraph.style_mut().set_color(MUTED);
                        paragraph.style_mut().set_strikethrough();
                    });
            });
        });
    })?;

    pdf.rectangle(60.0, 15.0, Some(ACCENT), |borders| {
        borders.set_left(Some(1.0), None);
    })?;
    Ok(())
}

/// Writes a table whose rows are deliberately uneven, then a second page.
pub fn write_uneven_table(pdf: &mut Pdf) -> Result<(), PdfError> {
    pdf.text("Uneven rows", Some(16), |paragraph| paragraph.style_mut().set_bold())?;
    pdf.text(
        "Short rows are padded with empty cells and long rows are cut to the column count.",
        None,
        |_| {},
    )?;

    pdf.table(3, |table| {
        table.add_row(|row| {
            row.add_text("one", None, |_, _| {});
            row.add_text("two", None, |_, _| {});
        });
        table.add_row(|row| {
            for text in ["one", "two", "three", "four"] {
                row.add_text(text, None, |_, _| {});
            }
        });
        table.add_row(|row| {
            row.add_text("one", None, |_, _| {});
        });
    })?;

    pdf.new_page()?;
    pdf.text("Second page", Some(16), |paragraph| paragraph.style_mut().set_bold())?;
    Ok(())
}
