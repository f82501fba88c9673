use std::rc::Rc;
use std::sync::Mutex;

use genpdf::error::{Error, ErrorKind};
use genpdf::{render, Element, RenderResult};
use log::{Level, Log, Metadata, Record};
use pdf_dsl::{
    fonts, pdf, use_pdf, BorderSide, Color, DocumentState, ImageContent, Pdf, PdfConfig, PdfError,
    StyleFlags,
};
use sha2::{Digest, Sha256};

const SKIP_HINT: &str =
    "default fonts missing. Set PDF_DSL_FONTS_DIR or copy assets/fonts next to the binary.";

fn fonts_or_skip(test: &str) -> bool {
    if fonts::default_fonts_available() {
        true
    } else {
        eprintln!("Skipping {test}: {SKIP_HINT}");
        false
    }
}

fn render_sample_pdf() -> Vec<u8> {
    let mut pdf = use_pdf(PdfConfig::new().with_title("Sample"), |pdf| {
        pdf.text("Hello, PDF!", Some(16), |paragraph| {
            paragraph.style_mut().set_bold();
        })?;
        pdf.table(2, |table| {
            table.add_row(|row| {
                row.add_text("left", None, |_, _| {});
                row.add_text("right", None, |_, _| {});
            });
        })?;
        Ok(())
    })
    .expect("render sample pdf");
    pdf.to_bytes().expect("sample bytes")
}

/// Replaces the bytes between `start` and `end` that vary from run to run.
fn scrub_between(data: &mut [u8], start: &[u8], end: &[u8]) {
    let mut offset = 0;
    while let Some(found) = find(&data[offset..], start) {
        let from = offset + found + start.len();
        let Some(length) = find(&data[from..], end) else {
            break;
        };
        for byte in &mut data[from..from + length] {
            if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                *byte = b'0';
            }
        }
        offset = from + length + end.len();
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

const VOLATILE_SEGMENTS: &[(&str, &str)] = &[
    ("/CreationDate(", ")"),
    ("/ModDate(", ")"),
    ("/ID[", "]"),
    ("/Producer(", ")"),
    ("<xmp:CreateDate>", "</xmp:CreateDate>"),
    ("<xmp:ModifyDate>", "</xmp:ModifyDate>"),
    ("<xmp:MetadataDate>", "</xmp:MetadataDate>"),
    ("<xmpMM:DocumentID>", "</xmpMM:DocumentID>"),
    ("<xmpMM:InstanceID>", "</xmpMM:InstanceID>"),
    ("<xmpMM:VersionID>", "</xmpMM:VersionID>"),
];

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let mut normalized = bytes.to_vec();
    for (start, end) in VOLATILE_SEGMENTS {
        scrub_between(&mut normalized, start.as_bytes(), end.as_bytes());
    }
    Sha256::digest(&normalized).into()
}

fn page_count(bytes: &[u8]) -> usize {
    lopdf::Document::load_mem(bytes)
        .expect("parse rendered pdf")
        .get_pages()
        .len()
}

#[derive(Default)]
struct Capture(Mutex<Vec<(Level, String)>>);

impl Capture {
    fn warnings(&self) -> Vec<String> {
        self.0
            .lock()
            .expect("capture lock")
            .iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.0
            .lock()
            .expect("capture lock")
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

#[test]
fn renders_non_empty_output() {
    if !fonts_or_skip("renders_non_empty_output") {
        return;
    }
    let bytes = render_sample_pdf();
    assert!(bytes.starts_with(b"%PDF"), "rendered PDF should start with a header");
}

#[test]
fn rendering_is_deterministic() {
    if !fonts_or_skip("rendering_is_deterministic") {
        return;
    }
    let bytes_a = render_sample_pdf();
    let bytes_b = render_sample_pdf();

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&bytes_a),
        normalized_hash(&bytes_b),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn new_page_starts_a_second_page() {
    if !fonts_or_skip("new_page_starts_a_second_page") {
        return;
    }
    let mut pdf = use_pdf(PdfConfig::new(), |pdf| {
        pdf.text("first", None, |_| {})?;
        pdf.new_page()?;
        pdf.text("second", None, |_| {})?;
        Ok(())
    })
    .expect("render two pages");

    assert_eq!(page_count(&pdf.to_bytes().expect("bytes")), 2);
}

#[test]
fn save_creates_missing_parent_directories() {
    if !fonts_or_skip("save_creates_missing_parent_directories") {
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested/deeper/out.pdf");

    let mut pdf = use_pdf(PdfConfig::new(), |pdf| {
        pdf.text("saved", None, |_| {})?;
        Ok(())
    })
    .expect("render");
    pdf.save_to(&path).expect("save into missing directories");

    let written = std::fs::read(&path).expect("read saved file");
    assert_eq!(written, pdf.to_bytes().expect("bytes"));
}

#[test]
fn lifecycle_errors_are_reported() {
    if !fonts_or_skip("lifecycle_errors_are_reported") {
        return;
    }
    let mut pdf = Pdf::new(PdfConfig::new()).expect("create document");
    assert_eq!(pdf.state(), DocumentState::Created);
    assert!(matches!(pdf.text("early", None, |_| {}), Err(PdfError::NotOpen)));
    assert!(pdf.to_bytes().expect("never opened").is_empty());

    pdf.open(|settings| settings.title = Some("Lifecycle".into()))
        .expect("first open");
    assert!(matches!(pdf.open(|_| {}), Err(PdfError::AlreadyOpen)));
    assert!(matches!(pdf.table(0, |_| {}), Err(PdfError::InvalidColumnCount(0))));

    pdf.text("body", None, |_| {}).expect("add while open");
    pdf.close().expect("close");
    pdf.close().expect("closing twice is a no-op");
    assert_eq!(pdf.state(), DocumentState::Closed);
    assert!(matches!(pdf.new_line(), Err(PdfError::NotOpen)));
    assert!(matches!(pdf.open(|_| {}), Err(PdfError::Closed)));
}

#[test]
fn to_bytes_closes_an_open_document() {
    if !fonts_or_skip("to_bytes_closes_an_open_document") {
        return;
    }
    let mut pdf = pdf(PdfConfig::new(), |pdf| {
        pdf.open(|_| {})?;
        pdf.set_margins(Some(25.0), None, Some(5.0), None);
        pdf.line(50.0, 0.5, None)?;
        pdf.rectangle(40.0, 20.0, None, |_| {})?;
        Ok(())
    })
    .expect("build document");

    assert!(pdf.is_open());
    assert_eq!(pdf.settings().margins.left, 25.0);
    assert_eq!(pdf.settings().margins.right, 10.0);
    let bytes = pdf.to_bytes().expect("bytes");
    assert_eq!(pdf.state(), DocumentState::Closed);
    assert_eq!(page_count(&bytes), 1);
}

#[test]
fn overflowing_row_warns_and_still_renders() {
    if !fonts_or_skip("overflowing_row_warns_and_still_renders") {
        return;
    }
    let capture = Rc::new(Capture::default());
    let config = PdfConfig::new().with_logger(capture.clone());

    let mut pdf = use_pdf(config, |pdf| {
        pdf.table(2, |table| {
            table.add_row(|row| {
                row.add_text("a", None, |_, _| {});
                row.add_text("b", None, |_, _| {});
                row.add_text("c", None, |_, _| {});
            });
        })?;
        Ok(())
    })
    .expect("render overflowing table");

    assert_eq!(capture.warnings().len(), 1);
    assert!(!pdf.to_bytes().expect("bytes").is_empty());
}

#[test]
fn images_from_bytes_are_embedded() {
    if !fonts_or_skip("images_from_bytes_are_embedded") {
        return;
    }
    let mut png = Vec::new();
    image::DynamicImage::new_rgb8(8, 8)
        .write_to(&mut png, image::ImageOutputFormat::Png)
        .expect("encode png");

    let mut pdf = use_pdf(PdfConfig::new(), |pdf| {
        pdf.image_bytes(&png, |image| image.set_width_mm(20.0))?;
        pdf.try_table(1, |table| {
            table.try_add_row(|row| {
                row.try_cell(|cell| {
                    cell.image_bytes(&png, |_, _| {})?;
                    Ok(())
                })?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })
    .expect("render images");

    assert!(!pdf.to_bytes().expect("bytes").is_empty());
}

#[test]
fn undecodable_image_is_an_image_error() {
    if !fonts_or_skip("undecodable_image_is_an_image_error") {
        return;
    }
    let mut pdf = Pdf::new(PdfConfig::new()).expect("create document");
    pdf.open(|_| {}).expect("open");
    let result = pdf.image_bytes(b"definitely not a png", |_| {});
    assert!(matches!(result, Err(PdfError::Image(_))));
    let decoded = ImageContent::from_bytes(b"nope");
    assert!(matches!(decoded, Err(PdfError::Image(_))));
}

struct FailingElement;

impl Element for FailingElement {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        _area: render::Area<'_>,
        _style: genpdf::style::Style,
    ) -> Result<RenderResult, Error> {
        Err(Error::new("element refused to render", ErrorKind::Internal))
    }
}

#[test]
fn failed_render_never_yields_empty_output() {
    if !fonts_or_skip("failed_render_never_yields_empty_output") {
        return;
    }
    let mut pdf = Pdf::new(PdfConfig::new()).expect("create document");
    pdf.open(|_| {}).expect("open");
    pdf.text("before", None, |_| {}).expect("add text");
    pdf.add(FailingElement).expect("add failing element");

    assert!(matches!(pdf.close(), Err(PdfError::Render(_))));
    assert_eq!(pdf.state(), DocumentState::Failed);
    assert!(matches!(pdf.close(), Err(PdfError::RenderFailed)));
    assert!(matches!(pdf.to_bytes(), Err(PdfError::RenderFailed)));

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("failed.pdf");
    assert!(matches!(pdf.save_to(&path), Err(PdfError::RenderFailed)));
    assert!(!path.exists(), "no file is written for a failed render");

    let mut sink = Vec::new();
    assert!(matches!(pdf.save_to_writer(&mut sink), Err(PdfError::RenderFailed)));
    assert!(sink.is_empty());
    assert!(matches!(pdf.open(|_| {}), Err(PdfError::Closed)));
}

#[test]
fn save_below_a_regular_file_is_an_io_error() {
    if !fonts_or_skip("save_below_a_regular_file_is_an_io_error") {
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let blocker = dir.path().join("file.txt");
    std::fs::write(&blocker, b"not a directory").expect("write blocker file");

    let mut pdf = use_pdf(PdfConfig::new(), |pdf| {
        pdf.text("unsaved", None, |_| {})?;
        Ok(())
    })
    .expect("render");

    let result = pdf.save_to(blocker.join("out.pdf"));
    assert!(matches!(result, Err(PdfError::Io(_))), "got {result:?}");
}

#[test]
fn bordered_table_and_rules_render() {
    if !fonts_or_skip("bordered_table_and_rules_render") {
        return;
    }
    let red = Color::Rgb(200, 0, 0);
    let mut pdf = use_pdf(PdfConfig::new(), |pdf| {
        pdf.line(80.0, 1.0, Some(red))?;
        pdf.line(100.0, 0.0, None)?;
        pdf.table(3, |table| {
            table.set_cell_config(|cell| {
                cell.borders_mut().set_all(Some(0.5), None, &BorderSide::ALL);
            });
            table.add_row(|row| {
                row.add_text("bordered", None, |cell, _| {
                    cell.borders_mut().set_left(Some(1.2), Some(red));
                    cell.borders_mut().set_right(Some(0.0), None);
                });
                row.add_text("cells", None, |_, _| {});
            });
        })?;
        pdf.rectangle(60.0, 30.0, Some(red), |borders| {
            borders.set_bottom(Some(0.0), None);
            borders.set_top(Some(2.0), None);
        })?;
        Ok(())
    })
    .expect("render bordered content");

    let bytes = pdf.to_bytes().expect("bytes");
    assert_eq!(page_count(&bytes), 1);
}

#[test]
fn decorated_paragraph_continues_across_pages() {
    if !fonts_or_skip("decorated_paragraph_continues_across_pages") {
        return;
    }
    let text = vec!["word"; 2500].join(" ");

    let mut plain = use_pdf(PdfConfig::new(), |pdf| {
        pdf.text(text.as_str(), None, |_| {})?;
        Ok(())
    })
    .expect("render plain paragraph");
    let mut underlined = use_pdf(PdfConfig::new(), |pdf| {
        pdf.text_chunk(text.as_str(), None, StyleFlags::UNDERLINE | StyleFlags::STRIKETHROUGH)?;
        Ok(())
    })
    .expect("render decorated paragraph");

    let plain_pages = page_count(&plain.to_bytes().expect("plain bytes"));
    let underlined_pages = page_count(&underlined.to_bytes().expect("decorated bytes"));
    assert!(underlined_pages > 1, "the paragraph should need several pages");
    assert_eq!(underlined_pages, plain_pages);
}
