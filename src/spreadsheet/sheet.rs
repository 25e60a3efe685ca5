use crate::error::MailerError;
use crate::spreadsheet::cell::Cell;

/// Represents a sheet read from a workbook, holding its non-empty cells and used range.
pub(crate) struct Sheet {
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet
    pub(crate) cells: Vec<Cell>,
    /// Actual data range (determined from cell data)
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(super) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cells: Vec::new(),
            row_lower_bound: None,
            row_upper_bound: None,
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    /// Returns true if the sheet contains no cells.
    pub(super) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Adds a cell to the sheet, widening the used range.
    pub(super) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_lower_bound.map(|row_lower_bound| row < row_lower_bound).unwrap_or(true) {
            self.row_lower_bound = Some(row);
        }
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_lower_bound.map(|col_lower_bound| col < col_lower_bound).unwrap_or(true) {
            self.col_lower_bound = Some(col);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Lays the cells out as rows spanning the used column range.
    ///
    /// Rows without any cell are left out; missing cells inside a row are
    /// empty strings. Rows come back in sheet order even if the cells were
    /// pushed out of order.
    pub(crate) fn rows(&self, shared_strings: &[String]) -> Result<Vec<Vec<String>>, MailerError> {
        let (Some(col_lower), Some(col_upper)) = (self.col_lower_bound, self.col_upper_bound) else {
            return Ok(Vec::new());
        };
        let width = col_upper - col_lower + 1;

        let mut order: Vec<&Cell> = self.cells.iter().collect();
        order.sort_by_key(|cell| (cell.row, cell.col));

        let mut rows = Vec::<Vec<String>>::new();
        let mut current_row = None::<usize>;
        for cell in order {
            if current_row != Some(cell.row) {
                current_row = Some(cell.row);
                rows.push(vec![String::new(); width]);
            }
            if let Some(record) = rows.last_mut() {
                record[cell.col - col_lower] = cell.text(shared_strings)?;
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::cell::CellType;

    fn push(sheet: &mut Sheet, row: usize, col: usize, value: &str) {
        sheet.push(Cell {
            row,
            col,
            kind: CellType::InlineString,
            value: value.to_owned(),
        });
    }

    #[test]
    fn sheet_initial() {
        let sheet = Sheet::new("Sheet1");

        assert!(sheet.is_empty());
        assert_eq!(sheet.row_lower_bound, None);
        assert_eq!(sheet.row_upper_bound, None);
        assert_eq!(sheet.col_lower_bound, None);
        assert_eq!(sheet.col_upper_bound, None);
        assert!(sheet.rows(&[]).unwrap().is_empty());
    }

    #[test]
    fn sheet_update() {
        let mut sheet = Sheet::new("Sheet1");
        push(&mut sheet, 1, 1, "a");
        push(&mut sheet, 1, 3, "b");
        push(&mut sheet, 3, 1, "c");
        push(&mut sheet, 3, 3, "d");

        assert_eq!(sheet.cells.len(), 4);
        assert_eq!(sheet.row_lower_bound, Some(1));
        assert_eq!(sheet.row_upper_bound, Some(3));
        assert_eq!(sheet.col_lower_bound, Some(1));
        assert_eq!(sheet.col_upper_bound, Some(3));
    }

    #[test]
    fn rows_are_dense_over_used_columns() {
        let mut sheet = Sheet::new("Sheet1");
        push(&mut sheet, 1, 1, "a");
        push(&mut sheet, 1, 3, "b");
        push(&mut sheet, 3, 2, "c");

        let rows = sheet.rows(&[]).unwrap();
        assert_eq!(rows, vec![vec!["a", "", "b"], vec!["", "c", ""]]);
    }

    #[test]
    fn rows_follow_sheet_order() {
        let mut sheet = Sheet::new("Sheet1");
        push(&mut sheet, 2, 0, "later");
        push(&mut sheet, 0, 0, "first");

        let rows = sheet.rows(&[]).unwrap();
        assert_eq!(rows, vec![vec!["first"], vec!["later"]]);
    }
}
