//! Upload pre-filter tests
//!
//! The pre-filter only looks at the file name and raw bytes; nothing here
//! needs a decoder or a database.

use attendance_import::error::{ErrorKind, ImportError};
use attendance_import::excel::{validate_upload, Upload, WorkbookFormat, MAX_UPLOAD_BYTES};

const XLSX_HEAD: &[u8] = b"PK\x03\x04\x14\x00\x06\x00";
const OLE2_HEAD: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

fn check(filename: &str, content: &[u8]) -> Result<WorkbookFormat, ImportError> {
    validate_upload(&Upload::new(filename, content), MAX_UPLOAD_BYTES)
}

fn padded(head: &[u8], len: usize) -> Vec<u8> {
    let mut content = head.to_vec();
    content.resize(len, 0);
    content
}

// ═══════════════════════════════════════════════════════════════════════════
// ACCEPTED UPLOADS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_xlsx_and_xls_signatures_accepted() {
    assert_eq!(check("a.xlsx", XLSX_HEAD).unwrap(), WorkbookFormat::Xlsx);
    assert_eq!(check("a.xls", OLE2_HEAD).unwrap(), WorkbookFormat::Xls);
}

#[test]
fn test_extension_is_case_insensitive() {
    assert_eq!(check("SCHEDULE.XLSX", XLSX_HEAD).unwrap(), WorkbookFormat::Xlsx);
    assert_eq!(check("Schedule.Xls", OLE2_HEAD).unwrap(), WorkbookFormat::Xls);
}

#[test]
fn test_unsigned_binary_xls_is_left_to_decoder() {
    let content: Vec<u8> = (0..1024u32).map(|i| (i % 7) as u8 | 0x80).collect();
    assert_eq!(check("legacy.xls", &content).unwrap(), WorkbookFormat::Xls);
}

#[test]
fn test_size_boundary() {
    let at_limit = padded(XLSX_HEAD, MAX_UPLOAD_BYTES);
    assert!(check("big.xlsx", &at_limit).is_ok());

    let over_limit = padded(XLSX_HEAD, MAX_UPLOAD_BYTES + 1);
    let err = check("big.xlsx", &over_limit).unwrap_err();
    assert!(matches!(
        err,
        ImportError::FileTooLarge { size, limit } if size == MAX_UPLOAD_BYTES + 1 && limit == MAX_UPLOAD_BYTES
    ));
}

// ═══════════════════════════════════════════════════════════════════════════
// REJECTED UPLOADS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_missing_name_and_extension() {
    assert!(matches!(
        check("", XLSX_HEAD).unwrap_err(),
        ImportError::MissingFileName
    ));
    assert!(matches!(
        check("schedule.csv", b"a,b").unwrap_err(),
        ImportError::UnsupportedExtension(name) if name == "schedule.csv"
    ));
    assert!(matches!(
        check("schedule", XLSX_HEAD).unwrap_err(),
        ImportError::UnsupportedExtension(_)
    ));
}

#[test]
fn test_empty_file() {
    assert!(matches!(
        check("a.xlsx", b"").unwrap_err(),
        ImportError::EmptyFile
    ));
}

#[test]
fn test_html_payloads() {
    for page in [
        &b"<!DOCTYPE html><html><body>Sign in</body></html>"[..],
        &b"\n\n  <HTML><HEAD></HEAD></HTML>"[..],
        &b"<head><meta charset=utf-8></head>"[..],
    ] {
        assert!(matches!(
            check("report.xlsx", page).unwrap_err(),
            ImportError::HtmlDocument
        ));
        assert!(matches!(
            check("report.xls", page).unwrap_err(),
            ImportError::HtmlDocument
        ));
    }
}

#[test]
fn test_html_marker_past_sniff_window_is_not_html() {
    let mut content = XLSX_HEAD.to_vec();
    content.resize(200, b' ');
    content.extend_from_slice(b"<html>");
    assert!(check("a.xlsx", &content).is_ok());
}

#[test]
fn test_xlsx_without_zip_signature() {
    let err = check("a.xlsx", b"\x00\x01\x02\x03 not a zip").unwrap_err();
    assert!(matches!(err, ImportError::InvalidXlsx));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_small_xls_without_signature() {
    let err = check("a.xls", &[0x01u8; 100]).unwrap_err();
    assert!(matches!(err, ImportError::XlsTooSmall));
}

#[test]
fn test_text_renamed_to_xls() {
    let content = "Date,Hours\n04/08,1.5\n".repeat(60);
    assert!(content.len() >= 512);
    let err = check("schedule.xls", content.as_bytes()).unwrap_err();
    assert!(matches!(err, ImportError::TextFile));
}

#[test]
fn test_every_rejection_is_a_client_error() {
    let rejections = [
        check("", XLSX_HEAD),
        check("a.txt", XLSX_HEAD),
        check("a.xlsx", b""),
        check("a.xlsx", b"<html>"),
        check("a.xlsx", b"plain"),
        check("a.xls", b"tiny"),
    ];
    for result in rejections {
        assert!(result.unwrap_err().is_client_error());
    }
}
