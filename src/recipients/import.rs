//! Turns an uploaded file into a fresh sequence of recipient records.

use crate::recipients::ImportError;
use crate::recipients::RecipientRecord;
use crate::recipients::Schema;
use crate::spreadsheet;
use crate::spreadsheet::SpreadsheetFormat;
use tracing::debug;

/// Imports a recipient file whose format is taken from its extension.
///
/// Anything other than `.csv` or `.xlsx` is rejected before the bytes are
/// looked at.
pub fn import_file(
    file_name: &str,
    bytes: &[u8],
    schema: &Schema,
) -> Result<Vec<RecipientRecord>, ImportError> {
    let format = SpreadsheetFormat::from_file_name(file_name)
        .map_err(|_| ImportError::UnsupportedFormat(file_name.to_owned()))?;
    import(bytes, format, schema)
}

/// Decodes `bytes` and maps every data row onto `schema`.
///
/// The header is the first row holding a non-blank cell; fully blank rows are
/// skipped everywhere. Cells a short row does not reach read as empty. Ids are
/// the 1-based ordinals of the returned records.
pub fn import(
    bytes: &[u8],
    format: SpreadsheetFormat,
    schema: &Schema,
) -> Result<Vec<RecipientRecord>, ImportError> {
    let rows = spreadsheet::open(bytes, format)
        .and_then(|mut sheet| {
            let rows = sheet.read_rows()?;
            debug!(sheet = %sheet.name(), rows = rows.len(), "Decoded recipient file");
            Ok(rows)
        })
        .map_err(|e| ImportError::MalformedWorkbook(e.to_string()))?;

    let mut rows = rows
        .into_iter()
        .map(|row| row.iter().map(|cell| cell.trim().to_owned()).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.is_empty()));

    let header = rows.next().unwrap_or_default();
    let indexes = schema.resolve(&header)?;

    let records: Vec<RecipientRecord> = rows
        .enumerate()
        .map(|(index, row)| {
            let mut record = RecipientRecord::blank((index + 1).to_string(), schema);
            for column in schema.columns() {
                let value = indexes
                    .get(&column.label)
                    .and_then(|position| row.get(*position))
                    .map(String::as_str)
                    .unwrap_or_default();
                record.set_field(column.field, value);
            }
            record
        })
        .collect();

    debug!(format = %format, columns = header.len(), records = records.len(), "Imported recipient file");
    Ok(records)
}
