//! Font family lookup for new documents.
//!
//! `genpdf` embeds TrueType fonts, so every document needs a regular, bold, italic and
//! bold-italic face.  The directories below are searched in order for the
//! [`DEFAULT_FONT_FAMILY_NAME`] family:
//!
//! 1. `PDF_DSL_FONTS_DIR`
//! 2. `assets/fonts` next to the running executable
//! 3. `assets/fonts` in the crate sources
//! 4. the usual Linux system locations of the Liberation fonts
//!
//! When none of them is complete, the Windows Arial family is tried as a last resort.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Name of the font family looked up by default.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "LiberationSans";

/// Environment variable overriding the first font directory searched.
pub const FONTS_DIR_ENV: &str = "PDF_DSL_FONTS_DIR";

/// Environment variable overriding the Windows fallback font directory.
pub const WINDOWS_FONTS_DIR_ENV: &str = "PDF_DSL_WINDOWS_FONTS_DIR";

const FACE_SUFFIXES: &[&str] = &["Regular", "Bold", "Italic", "BoldItalic"];

const SYSTEM_FONT_DIRECTORIES: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation",
];

const WINDOWS_FALLBACK_FAMILY_NAME: &str = "Arial";

/// File names of the four Windows Arial faces: regular, bold, italic, bold italic.
const WINDOWS_FONT_FILES: [&str; 4] = ["arial.ttf", "arialbd.ttf", "ariali.ttf", "arialbi.ttf"];

/// Directory holding the fonts shipped with the crate sources.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    let mut push = |candidate: PathBuf| {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    };

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push(bin_dir.join("assets/fonts"));
        }
    }

    push(bundled_fonts_source_dir());

    for directory in SYSTEM_FONT_DIRECTORIES {
        push(PathBuf::from(directory));
    }

    candidates
}

fn missing_faces(directory: &Path, family: &str) -> Vec<String> {
    FACE_SUFFIXES
        .iter()
        .map(|suffix| format!("{family}-{suffix}.ttf"))
        .filter(|name| !directory.join(name).is_file())
        .collect()
}

/// Returns the first candidate directory that holds all four faces of `family`.
fn resolve_font_directory(family: &str) -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        if !candidate.is_dir() {
            attempts.push(format!("{} (directory missing)", candidate.display()));
            continue;
        }

        let missing = missing_faces(&candidate, family);
        if missing.is_empty() {
            return Ok(candidate);
        }
        attempts.push(format!(
            "{} (missing files [{}])",
            candidate.display(),
            missing.join(", ")
        ));
    }

    Err(Error::new(
        format!(
            "Unable to locate the '{}' font family. Checked: {}. \
             See assets/fonts/README.md or set {}.",
            family,
            attempts.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

/// Loads the four faces of `family` from `directory`.
pub fn load_font_family(directory: &Path, family: &str) -> Result<FontFamily<FontData>, Error> {
    fonts::from_files(directory, family, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                family,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn windows_font_directory() -> Option<PathBuf> {
    if let Some(path) = env_path(WINDOWS_FONTS_DIR_ENV) {
        return Some(path);
    }

    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env_path(var) {
                let candidate = root.join("Fonts");
                if candidate.is_dir() {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn load_windows_face(directory: &Path, file: &str) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        let io_kind = if path.is_file() {
            io::ErrorKind::Other
        } else {
            io::ErrorKind::NotFound
        };
        Error::new(
            format!("Failed to load fallback font {}: {}", path.display(), err),
            io::Error::new(io_kind, err.to_string()),
        )
    })
}

fn windows_fallback_font_family() -> Result<FontFamily<FontData>, Error> {
    let directory = windows_font_directory().ok_or_else(|| {
        Error::new(
            "Windows font directory not found for fallback",
            io::Error::new(io::ErrorKind::NotFound, "windows fonts directory not found"),
        )
    })?;

    let [regular, bold, italic, bold_italic] = WINDOWS_FONT_FILES;
    Ok(FontFamily {
        regular: load_windows_face(&directory, regular)?,
        bold: load_windows_face(&directory, bold)?,
        italic: load_windows_face(&directory, italic)?,
        bold_italic: load_windows_face(&directory, bold_italic)?,
    })
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Loads the default font family, falling back to Windows Arial when it cannot be found.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    let primary = resolve_font_directory(DEFAULT_FONT_FAMILY_NAME).and_then(|directory| {
        debug!("Loading '{}' fonts from {}", DEFAULT_FONT_FAMILY_NAME, directory.display());
        load_font_family(&directory, DEFAULT_FONT_FAMILY_NAME)
    });

    match primary {
        Ok(family) => Ok(family),
        Err(err) if fonts_missing(&err) => match windows_fallback_font_family() {
            Ok(fallback) => {
                warn!(
                    "Default fonts unavailable ({}); falling back to Windows '{}' family.",
                    err, WINDOWS_FALLBACK_FAMILY_NAME
                );
                Ok(fallback)
            }
            Err(fallback_err) => Err(Error::new(
                format!(
                    "{}; Windows fallback failed: {}",
                    err, fallback_err
                ),
                io::Error::new(io::ErrorKind::NotFound, "default fonts are not available"),
            )),
        },
        Err(err) => Err(err),
    }
}

/// Indicates whether the default font family can be found without the Windows fallback.
pub fn default_fonts_available() -> bool {
    resolve_font_directory(DEFAULT_FONT_FAMILY_NAME).is_ok()
}
