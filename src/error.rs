use thiserror::Error;

pub type ImportResult<T> = Result<T, ImportError>;

/// Broad category of an import failure, used to pick a response status
/// and to tell format problems apart from layout and I/O problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The upload is not an Excel workbook (or not one we can read)
    Format,
    /// The workbook is readable but Sheet1 does not match the expected layout
    Layout,
    /// The upload or a local file could not be read
    Io,
    /// The backing store failed
    Storage,
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("No file name was supplied with the upload")]
    MissingFileName,

    #[error("No file was uploaded (expected a multipart field named 'file')")]
    MissingFile,

    #[error("Unsupported file type '{0}': choose an Excel workbook (.xlsx, .xls)")]
    UnsupportedExtension(String),

    #[error("The uploaded file is empty")]
    EmptyFile,

    #[error("File is too large ({size} bytes); the limit is {limit} bytes")]
    FileTooLarge { size: usize, limit: usize },

    #[error("An HTML document was uploaded; choose an Excel workbook (.xlsx, .xls)")]
    HtmlDocument,

    #[error("This .xlsx file is not a valid workbook; re-save it from Excel and try again")]
    InvalidXlsx,

    #[error("The file is too small to be an Excel workbook")]
    XlsTooSmall,

    #[error("A text file was uploaded; choose an Excel workbook (.xlsx, .xls)")]
    TextFile,

    #[error("The workbook could not be read (corrupt or unsupported format): {0}")]
    Unreadable(String),

    #[error("No sheets found in the workbook")]
    NoSheets,

    #[error(
        "Sheet1 layout invalid: cells A1:D3 must be present (found {rows} rows x {cols} columns)"
    )]
    Sheet1Layout { rows: usize, cols: usize },

    #[error("Could not determine the subject name from Sheet1 (cell B3)")]
    MissingSubjectName,

    #[error("Failed to read upload: {0}")]
    Upload(String),

    #[error("Template export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to serialize workbook contents: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ImportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ImportError::MissingFileName
            | ImportError::MissingFile
            | ImportError::UnsupportedExtension(_)
            | ImportError::EmptyFile
            | ImportError::FileTooLarge { .. }
            | ImportError::HtmlDocument
            | ImportError::InvalidXlsx
            | ImportError::XlsTooSmall
            | ImportError::TextFile
            | ImportError::Unreadable(_)
            | ImportError::NoSheets => ErrorKind::Format,
            ImportError::Sheet1Layout { .. } | ImportError::MissingSubjectName => {
                ErrorKind::Layout
            }
            ImportError::Upload(_) | ImportError::Io(_) | ImportError::Export(_) => ErrorKind::Io,
            ImportError::Database(_) | ImportError::Migrate(_) | ImportError::Serialize(_) => {
                ErrorKind::Storage
            }
        }
    }

    /// True for failures caused by what the user uploaded rather than by the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Format | ErrorKind::Layout
        ) || matches!(self, ImportError::Upload(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_errors_are_client_errors() {
        assert_eq!(ImportError::HtmlDocument.kind(), ErrorKind::Format);
        assert!(ImportError::HtmlDocument.is_client_error());
        assert!(ImportError::EmptyFile.is_client_error());
    }

    #[test]
    fn test_layout_errors() {
        let err = ImportError::Sheet1Layout { rows: 2, cols: 4 };
        assert_eq!(err.kind(), ErrorKind::Layout);
        assert!(err.to_string().contains("2 rows x 4 columns"));
        assert_eq!(ImportError::MissingSubjectName.kind(), ErrorKind::Layout);
    }

    #[test]
    fn test_storage_errors_are_server_errors() {
        let err = ImportError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_file_too_large_message() {
        let err = ImportError::FileTooLarge {
            size: 11,
            limit: 10,
        };
        assert_eq!(
            err.to_string(),
            "File is too large (11 bytes); the limit is 10 bytes"
        );
    }
}
