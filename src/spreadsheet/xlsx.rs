use crate::error::MailerError;
use crate::error::ResultMessage;
use crate::helpers::xml::XmlAttributeHelper;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::index_to_reference;
use crate::spreadsheet::cell::reference_to_index;
use crate::spreadsheet::cell::row_to_index;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::cell::MAX_COL_INDEX;
use crate::spreadsheet::cell::MAX_ROW_INDEX;
use crate::spreadsheet::excel;
use crate::spreadsheet::excel::load_relationships;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::borrow::Cow;
use std::io::BufRead;
use std::io::Cursor;
use zip::ZipArchive;

// XML tag names for parsing Excel XLSX format
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic text for Asian languages
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_SHEET: QName = QName(b"sheet");             // Worksheet definition
const TAG_ROW: QName = QName(b"row");                 // Row in worksheet
const TAG_CELL: QName = QName(b"c");                  // Cell in worksheet
const TAG_INLINE_STRING: QName = QName(b"is");        // Inline string value
const TAG_VALUE: QName = QName(b"v");                 // Cell value content

/// Represents an Excel XLSX workbook held in memory
pub(crate) struct XlsxSpreadsheet<'a> {
    /// ZIP archive containing the XLSX package parts
    zip: ZipArchive<Cursor<&'a [u8]>>,
    /// List of worksheets with (name, zip_path) pairs, in workbook order
    sheets: Vec<(String, String)>,
}

impl<'a> XlsxSpreadsheet<'a> {
    /// Opens an XLSX package from its bytes and reads the sheet list
    pub(crate) fn open(bytes: &'a [u8]) -> Result<XlsxSpreadsheet<'a>, MailerError> {
        let (zip, sheets) = excel::open(Cursor::new(bytes), load_workbook)?;
        Ok(XlsxSpreadsheet { zip, sheets })
    }

    /// Loads the whole shared string table; a package without one has none
    fn load_shared_strings(&mut self) -> Result<Vec<String>, MailerError> {
        let mut shared_strings = Vec::<String>::new();
        let mut reader = match self.zip.xml_reader("xl/sharedStrings.xml")? {
            Some(reader) => reader,
            None => return Ok(shared_strings),
        };

        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
                let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                shared_strings.push(string);
            }
        });
        Ok(shared_strings)
    }

    /// Reads the cells of one worksheet part
    fn read_sheet(&mut self, sheet_name: &str, zip_path: &str) -> Result<Sheet, MailerError> {
        let mut sheet = Sheet::new(sheet_name);
        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        let mut reader = self.zip.xml_reader(zip_path)?
            .ok_or_else(|| SpreadsheetError::FileError(zip_path.to_owned()))?;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_ROW => {
                if let Some(index) = event.get_attribute_value("r")?.and_then(|number| row_to_index(&number)) {
                    row_count = index;
                }
                col_count = 0;
            }
            Event::End(event) if event.name() == TAG_ROW => {
                row_count += 1;
                col_count = 0;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                (row, col) = match event.get_attribute_value("r")? {
                    Some(reference) => reference_to_index(&reference)
                        .ok_or_else(|| SpreadsheetError::CellReferenceError(reference.to_string()))?,
                    None if row_count <= MAX_ROW_INDEX && col_count <= MAX_COL_INDEX => (row_count, col_count),
                    None => Err(SpreadsheetError::CellReferenceError(index_to_reference(row_count, col_count)))?,
                };
                col_count = col + 1;
                kind = CellType::parse(event.get_attribute_value("t")?.as_deref());
                value.clear();
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if event.name() == TAG_CELL => {
                if kind != CellType::Empty && !value.is_empty() {
                    sheet.push(Cell {
                        row,
                        col,
                        kind,
                        value: std::mem::take(&mut value),
                    });
                }
                kind = CellType::default();
            },
        });
        Ok(sheet)
    }
}

impl Spreadsheet for XlsxSpreadsheet<'_> {
    fn name(&self) -> String {
        self.sheets
            .first()
            .map(|(name, _)| name.to_owned())
            .unwrap_or_default()
    }

    /// Reads the first worksheet; later sheets are never opened
    fn read_rows(&mut self) -> Result<Vec<Vec<String>>, MailerError> {
        let (sheet_name, zip_path) = self.sheets
            .first()
            .cloned()
            .ok_or(SpreadsheetError::SpreadsheetEmptyError)?;
        let shared_strings = self.load_shared_strings()
            .with_prefix("xl/sharedStrings.xml")?;
        let sheet = self.read_sheet(&sheet_name, &zip_path)
            .with_prefix(&zip_path)?;
        tracing::debug!(
            sheet = %sheet.name,
            cells = sheet.cells.len(),
            empty = sheet.is_empty(),
            last_row = ?sheet.row_upper_bound,
            first_row = ?sheet.row_lower_bound,
            shared_strings = shared_strings.len(),
            "read first worksheet"
        );
        sheet.rows(&shared_strings)
    }
}

/// Loads the worksheet list from xl/workbook.xml
///
/// # Returns
/// Worksheets as (name, zip_path) pairs, in the order the workbook lists them
fn load_workbook(zip: &mut ZipArchive<Cursor<&[u8]>>) -> Result<Vec<(String, String)>, MailerError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip.xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::FileError("xl/workbook.xml".to_string()))?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.get_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.get_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(&id.to_string()) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
    });
    Ok(sheets)
}

/// Reads a string value, skipping phonetic runs and joining rich text runs
///
/// # Arguments
/// * `reader` - XML reader positioned just after the opening tag
/// * `end_tag` - XML tag that marks the end of the string content
/// * `is_text_content` - Whether text counts before any `<t>` element is seen
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: QName,
    is_text_content: bool,
) -> Result<String, MailerError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}
