//! # Spreadsheet Decoding Module
//!
//! Turns an uploaded recipient file into a grid of text rows. Two formats are
//! understood: comma-delimited text (`.csv`) and Office Open XML workbooks
//! (`.xlsx`). Both are decoded fully in memory; only the first sheet of a
//! workbook is read.
pub(crate) mod cell;
pub(crate) mod delimited;
pub(crate) mod excel;
pub(crate) mod sheet;
pub(crate) mod xlsx;

use crate::error::MailerError;
use crate::spreadsheet::delimited::DelimitedText;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

/// Errors raised while decoding a spreadsheet file.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Unsupported file type '{0}'")]
    UnsupportedFormat(String),

    #[error("Missing part '{0}' in workbook package")]
    FileError(String),

    #[error("Workbook contains no sheets")]
    SpreadsheetEmptyError,

    #[error("Invalid cell reference '{0}'")]
    CellReferenceError(String),

    #[error("Shared string {0} referenced at {1} does not exist")]
    SharedStringError(usize, String),
}

/// The two upload formats the importer accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    /// Comma-separated text, one row per line
    DelimitedText,
    /// Excel 2007+ workbook package
    Workbook,
}

impl SpreadsheetFormat {
    /// Returns the canonical file extension of the format.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DelimitedText => "csv",
            Self::Workbook => "xlsx",
        }
    }

    /// Maps a file extension (without the dot, case-insensitive) to a format.
    pub fn from_extension(extension: &str) -> Result<Self, SpreadsheetError> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::DelimitedText),
            "xlsx" => Ok(Self::Workbook),
            _ => Err(SpreadsheetError::UnsupportedFormat(extension.to_owned())),
        }
    }

    /// Maps a file name to a format through its extension.
    ///
    /// A name without an extension is unsupported and reported by its full name.
    pub fn from_file_name(file_name: &str) -> Result<Self, SpreadsheetError> {
        match Path::new(file_name).extension().and_then(|extension| extension.to_str()) {
            Some(extension) => Self::from_extension(extension),
            None => Err(SpreadsheetError::UnsupportedFormat(file_name.to_owned())),
        }
    }
}

impl Display for SpreadsheetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified access to the first sheet of any supported format.
pub(crate) trait Spreadsheet {
    /// Returns the name of the sheet being read.
    fn name(&self) -> String;

    /// Reads every row of the first sheet as raw (untrimmed) cell text.
    ///
    /// Rows keep their document order. Short rows are not padded.
    fn read_rows(&mut self) -> Result<Vec<Vec<String>>, MailerError>;
}

/// Opens an in-memory upload with the reader matching `format`.
pub(crate) fn open<'a>(
    bytes: &'a [u8],
    format: SpreadsheetFormat,
) -> Result<Box<dyn Spreadsheet + 'a>, MailerError> {
    match format {
        SpreadsheetFormat::DelimitedText => Ok(Box::new(DelimitedText::open(bytes))),
        SpreadsheetFormat::Workbook => Ok(Box::new(XlsxSpreadsheet::open(bytes)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(SpreadsheetFormat::from_extension("CSV").unwrap(), SpreadsheetFormat::DelimitedText);
        assert_eq!(SpreadsheetFormat::from_extension("Xlsx").unwrap(), SpreadsheetFormat::Workbook);
    }

    #[test]
    fn other_extensions_are_rejected() {
        for extension in ["txt", "xls", "ods", "json", ""] {
            assert!(matches!(
                SpreadsheetFormat::from_extension(extension),
                Err(SpreadsheetError::UnsupportedFormat(_))
            ));
        }
    }

    #[test]
    fn format_from_file_name() {
        assert_eq!(SpreadsheetFormat::from_file_name("list.final.csv").unwrap(), SpreadsheetFormat::DelimitedText);
        assert_eq!(SpreadsheetFormat::from_file_name("/tmp/Recipients.XLSX").unwrap(), SpreadsheetFormat::Workbook);
        match SpreadsheetFormat::from_file_name("recipients") {
            Err(SpreadsheetError::UnsupportedFormat(name)) => assert_eq!(name, "recipients"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn open_delimited_reads_rows() {
        let mut spreadsheet = open(b"a,b\nc", SpreadsheetFormat::DelimitedText).unwrap();
        assert_eq!(spreadsheet.read_rows().unwrap(), vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn open_workbook_rejects_non_zip() {
        assert!(open(b"firstName,lastName", SpreadsheetFormat::Workbook).is_err());
    }
}
