use crate::error::MailerError;
use crate::spreadsheet::SpreadsheetError;

/// Types of cell data in a workbook sheet, from the `t` attribute of `<c>`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as `0`/`1`
    Boolean,
    /// Numeric values (also dates, which stay as their serial number)
    Number,
    /// Inline string values and formula string results
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error literals such as `#N/A`
    Error,
}

impl CellType {
    /// Parses the `t` attribute of a cell; a missing attribute means a number.
    pub(crate) fn parse(kind: Option<&str>) -> Self {
        match kind {
            Some("inlineStr") | Some("str") | Some("d") => Self::InlineString,
            Some("s") => Self::SharedString,
            Some("b") => Self::Boolean,
            Some("e") => Self::Error,
            _ => Self::Number,
        }
    }
}

/// Represents a single cell in a sheet with position, type, and raw value.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Cell data type
    pub(crate) kind: CellType,
    /// Raw cell value; a shared string index for `SharedString`
    pub(crate) value: String,
}

impl Cell {
    /// Returns the Excel-style cell reference (e.g., "A1", "B2").
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Resolves the displayed text of the cell.
    pub(crate) fn text(&self, shared_strings: &[String]) -> Result<String, MailerError> {
        match self.kind {
            CellType::SharedString => {
                let index = self.value.trim().parse::<usize>()?;
                let text = shared_strings
                    .get(index)
                    .ok_or_else(|| SpreadsheetError::SharedStringError(index, self.reference()))?;
                Ok(text.to_owned())
            }
            CellType::Boolean => Ok(if self.value == "1" { "TRUE" } else { "FALSE" }.to_owned()),
            _ => Ok(self.value.to_owned()),
        }
    }
}

/// Index of the last column a worksheet may hold (`XFD`).
pub(crate) const MAX_COL_INDEX: usize = 16_383;

/// Index of the last row a worksheet may hold (row 1048576).
pub(crate) const MAX_ROW_INDEX: usize = 1_048_575;

/// Converts column letters to a 0-based column index ("A" = 0, "AA" = 26).
///
/// Columns past `XFD` are rejected.
pub(crate) fn col_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() || !letters.chars().all(|letter| letter.is_ascii_alphabetic()) {
        return None;
    }
    letters
        .to_ascii_uppercase()
        .chars()
        .map(|letter| letter as usize - 'A' as usize + 1)
        .try_fold(0usize, |index, digit| {
            index
                .checked_mul(26)
                .and_then(|index| index.checked_add(digit))
                .filter(|col| *col <= MAX_COL_INDEX + 1)
        })
        .map(|col| col - 1)
}

/// Converts a 1-based row number to a 0-based row index.
///
/// Rows past 1048576 are rejected.
pub(crate) fn row_to_index(number: &str) -> Option<usize> {
    number
        .parse::<usize>()
        .ok()
        .filter(|row| (1..=MAX_ROW_INDEX + 1).contains(row))
        .map(|row| row - 1)
}

/// Parses an Excel-style reference such as "B7" into 0-based (row, col).
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let col = col_to_index(&reference[..split])?;
    let row = row_to_index(&reference[split..])?;
    Some((row, col))
}

/// Converts 0-based (row, col) to an Excel-style reference.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    let mut column = col + 1;
    let mut letters = Vec::new();
    while column > 0 {
        column -= 1;
        letters.push((b'A' + (column % 26) as u8) as char);
        column /= 26;
    }
    letters.iter().rev().collect::<String>() + &(row + 1).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_round_trip_edges() {
        assert_eq!(reference_to_index("A1"), Some((0, 0)));
        assert_eq!(reference_to_index("b7"), Some((6, 1)));
        assert_eq!(reference_to_index("AA10"), Some((9, 26)));
        assert_eq!(index_to_reference(9, 26), "AA10");
        assert_eq!(index_to_reference(0, 701), "ZZ1");
    }

    #[test]
    fn invalid_references() {
        assert_eq!(reference_to_index("7"), None);
        assert_eq!(reference_to_index("A0"), None);
        assert_eq!(reference_to_index("A"), None);
        assert_eq!(reference_to_index("Ä1"), None);
    }

    #[test]
    fn references_past_sheet_limits() {
        assert_eq!(col_to_index("XFD"), Some(MAX_COL_INDEX));
        assert_eq!(col_to_index("XFE"), None);
        assert_eq!(col_to_index("ZZZZZZZ"), None);
        assert_eq!(col_to_index("ZZZZZZZZZZZZZZZ"), None);
        assert_eq!(row_to_index("1048576"), Some(MAX_ROW_INDEX));
        assert_eq!(row_to_index("1048577"), None);
        assert_eq!(row_to_index("99999999999999999999999"), None);
        assert_eq!(reference_to_index("XFD1048576"), Some((MAX_ROW_INDEX, MAX_COL_INDEX)));
        assert_eq!(reference_to_index("ZZZZZZZ1"), None);
    }

    #[test]
    fn cell_type_from_attribute() {
        assert_eq!(CellType::parse(Some("s")), CellType::SharedString);
        assert_eq!(CellType::parse(Some("inlineStr")), CellType::InlineString);
        assert_eq!(CellType::parse(Some("b")), CellType::Boolean);
        assert_eq!(CellType::parse(Some("e")), CellType::Error);
        assert_eq!(CellType::parse(None), CellType::Number);
    }

    #[test]
    fn shared_string_text() {
        let shared = vec!["Surname".to_owned(), "Smith".to_owned()];
        let cell = Cell { row: 1, col: 0, kind: CellType::SharedString, value: "1".to_owned() };
        assert_eq!(cell.text(&shared).unwrap(), "Smith");

        let dangling = Cell { row: 1, col: 0, kind: CellType::SharedString, value: "5".to_owned() };
        let error = dangling.text(&shared).unwrap_err();
        assert_eq!(error.to_string(), "Shared string 5 referenced at A2 does not exist");
    }

    #[test]
    fn boolean_and_number_text() {
        let yes = Cell { row: 0, col: 0, kind: CellType::Boolean, value: "1".to_owned() };
        let number = Cell { row: 0, col: 1, kind: CellType::Number, value: "42.5".to_owned() };
        assert_eq!(yes.text(&[]).unwrap(), "TRUE");
        assert_eq!(number.text(&[]).unwrap(), "42.5");
    }
}
