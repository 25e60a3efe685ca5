use crate::error::MailerError;
use crate::helpers::text::decode_text;
use crate::spreadsheet::Spreadsheet;

/// Field separator of delimited uploads. Quoting is not supported.
const SEPARATOR: char = ',';

/// Row separator of delimited uploads.
const LINE_BREAK: char = '\n';

/// Comma-delimited text held in memory, read as a single sheet.
pub(crate) struct DelimitedText {
    text: String,
}

impl DelimitedText {
    pub(crate) fn open(bytes: &[u8]) -> DelimitedText {
        DelimitedText {
            text: decode_text(bytes).into_owned(),
        }
    }
}

impl Spreadsheet for DelimitedText {
    fn name(&self) -> String {
        "csv".to_owned()
    }

    /// Splits on line breaks, then on commas; cells keep their whitespace (and any `\r`)
    fn read_rows(&mut self) -> Result<Vec<Vec<String>>, MailerError> {
        Ok(self
            .text
            .split(LINE_BREAK)
            .map(|line| line.split(SEPARATOR).map(str::to_owned).collect())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_lines_and_cells() {
        let mut text = DelimitedText::open(b"firstName,lastName,email\nJohn,Doe,john@x.com");
        assert_eq!(text.read_rows().unwrap(), vec![
            vec!["firstName", "lastName", "email"],
            vec!["John", "Doe", "john@x.com"],
        ]);
    }

    #[test]
    fn keeps_blank_lines_and_carriage_returns() {
        let mut text = DelimitedText::open(b"a,b\r\n\r\n");
        assert_eq!(text.read_rows().unwrap(), vec![vec!["a", "b\r"], vec!["\r"], vec![""]]);
    }

    #[test]
    fn quotes_are_not_special() {
        let mut text = DelimitedText::open(b"\"Smith, John\",x");
        assert_eq!(text.read_rows().unwrap(), vec![vec!["\"Smith", " John\"", "x"]]);
    }
}
