use thiserror::Error;

/// Main error type for the Rusty Mailer crate.
/// Aggregates errors from the standard library, the archive and XML dependencies and internal modules.
#[derive(Error, Debug)]
pub enum MailerError {
    #[error("{0}")]
    WithContextError(String),

    #[error("{0}")]
    AnyhowError(#[from] anyhow::Error),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    // Recipient module errors
    #[error("{0}")]
    ImportError(#[from] crate::recipients::ImportError),

    // Dispatch module errors
    #[error("{0}")]
    DispatchError(#[from] crate::dispatch::DispatchError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, MailerError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| MailerError::WithContextError(format!("{}: {}", message, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_prefix_wraps_message() {
        let result: Result<(), MailerError> = Err(MailerError::WithContextError("boom".to_owned()));
        let error = result.with_prefix("xl/workbook.xml").unwrap_err();
        assert_eq!(error.to_string(), "xl/workbook.xml: boom");
    }

    #[test]
    fn with_prefix_keeps_ok() {
        let result: Result<usize, MailerError> = Ok(3);
        assert_eq!(result.with_prefix("ignored").unwrap(), 3);
    }
}
