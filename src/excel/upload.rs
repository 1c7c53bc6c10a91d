//! Upload pre-filter: cheap byte-level checks run before any spreadsheet parsing
//!
//! Rejects mislabeled uploads (HTML login pages saved as .xlsx, text files,
//! truncated downloads) without touching the workbook decoder. Files that
//! pass are only *plausibly* workbooks; the decoder has the final word.

use crate::error::{ImportError, ImportResult};

/// Default upload bound: 10 MiB
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// How many leading bytes are scanned for HTML markers
const HTML_SNIFF_LEN: usize = 100;

const HTML_MARKERS: [&[u8]; 3] = [b"<!doctype html", b"<html", b"<head>"];

/// ZIP local-file, end-of-central-directory and data-descriptor signatures
const ZIP_SIGNATURES: [&[u8]; 3] = [b"PK\x03\x04", b"PK\x05\x06", b"PK\x07\x08"];

/// OLE2 compound document header and BIFF2-BIFF8 stream headers
const XLS_SIGNATURES: [&[u8]; 7] = [
    b"\xd0\xcf\x11\xe0",
    b"\x09\x08",
    b"\x09\x00",
    b"\x09\x02",
    b"\x09\x04",
    b"\x08\x05",
    b"\x08\x08",
];

/// Legacy files without a known header smaller than this are rejected outright
const MIN_UNSIGNED_XLS_LEN: usize = 512;

/// How many leading bytes are tried as UTF-8 to spot text files
const TEXT_SNIFF_LEN: usize = 1024;

/// Container format, chosen by the declared file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    Xlsx,
    Xls,
}

impl WorkbookFormat {
    /// Detect the format from a file name's extension (case-insensitive)
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".xlsx") {
            Some(WorkbookFormat::Xlsx)
        } else if lower.ends_with(".xls") {
            Some(WorkbookFormat::Xls)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            WorkbookFormat::Xlsx => "xlsx",
            WorkbookFormat::Xls => "xls",
        }
    }
}

/// An uploaded file: its declared name and raw content
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub filename: &'a str,
    pub content: &'a [u8],
}

impl<'a> Upload<'a> {
    pub fn new(filename: &'a str, content: &'a [u8]) -> Self {
        Self { filename, content }
    }
}

/// Validate an upload and return its container format.
///
/// Checks run in a fixed order: file name, extension, emptiness, size bound,
/// HTML markers, then the container signature for the declared format.
pub fn validate_upload(upload: &Upload<'_>, max_bytes: usize) -> ImportResult<WorkbookFormat> {
    if upload.filename.trim().is_empty() {
        return Err(ImportError::MissingFileName);
    }

    let format = WorkbookFormat::from_filename(upload.filename)
        .ok_or_else(|| ImportError::UnsupportedExtension(upload.filename.to_string()))?;

    let content = upload.content;
    if content.is_empty() {
        return Err(ImportError::EmptyFile);
    }
    if content.len() > max_bytes {
        return Err(ImportError::FileTooLarge {
            size: content.len(),
            limit: max_bytes,
        });
    }

    if looks_like_html(content) {
        return Err(ImportError::HtmlDocument);
    }

    match format {
        WorkbookFormat::Xlsx => check_xlsx_signature(content)?,
        WorkbookFormat::Xls => check_xls_signature(content)?,
    }

    Ok(format)
}

fn looks_like_html(content: &[u8]) -> bool {
    let head = &content[..content.len().min(HTML_SNIFF_LEN)];
    let lower = head.to_ascii_lowercase();
    HTML_MARKERS
        .iter()
        .any(|marker| lower.windows(marker.len()).any(|w| w == *marker))
}

fn check_xlsx_signature(content: &[u8]) -> ImportResult<()> {
    if ZIP_SIGNATURES.iter().any(|sig| content.starts_with(sig)) {
        return Ok(());
    }
    // Any other PK prefix is accepted; the decoder decides.
    if content.starts_with(b"PK") {
        return Ok(());
    }
    Err(ImportError::InvalidXlsx)
}

fn check_xls_signature(content: &[u8]) -> ImportResult<()> {
    if XLS_SIGNATURES.iter().any(|sig| content.starts_with(sig)) {
        return Ok(());
    }
    if content.len() < MIN_UNSIGNED_XLS_LEN {
        return Err(ImportError::XlsTooSmall);
    }
    let head = &content[..content.len().min(TEXT_SNIFF_LEN)];
    if std::str::from_utf8(head).is_ok() {
        return Err(ImportError::TextFile);
    }
    // Unknown binary content: accepted tentatively.
    Ok(())
}
