//! Header schemas and column resolution.

use crate::recipients::ImportError;
use crate::recipients::RecipientField;
use std::collections::HashMap;

/// A logical column: the header label to look for and the field it fills.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaColumn {
    pub label: String,
    pub field: RecipientField,
}

impl SchemaColumn {
    pub fn new(label: impl Into<String>, field: RecipientField) -> Self {
        Self {
            label: label.into(),
            field,
        }
    }
}

/// The ordered set of columns an import mode requires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<SchemaColumn>,
}

impl Schema {
    /// Builds a custom schema.
    ///
    /// Exactly one column must fill the email address and at most two may
    /// fill name fields. Labels must be non-blank and fields and labels
    /// (case-insensitively) unique.
    pub fn new(columns: Vec<SchemaColumn>) -> Result<Self, ImportError> {
        let emails = columns
            .iter()
            .filter(|column| column.field == RecipientField::EmailAddress)
            .count();
        if emails != 1 {
            return Err(ImportError::InvalidSchema(format!(
                "expected exactly one email column, found {emails}"
            )));
        }
        let names = columns.len() - emails;
        if names > 2 {
            return Err(ImportError::InvalidSchema(format!(
                "expected at most two name columns, found {names}"
            )));
        }
        for (index, column) in columns.iter().enumerate() {
            if column.label.trim().is_empty() {
                return Err(ImportError::InvalidSchema(format!(
                    "column {} has a blank label",
                    index + 1
                )));
            }
            let duplicate = columns[..index].iter().any(|earlier| {
                earlier.field == column.field
                    || earlier.label.to_lowercase() == column.label.to_lowercase()
            });
            if duplicate {
                return Err(ImportError::InvalidSchema(format!(
                    "column '{}' ({}) is declared twice",
                    column.label, column.field
                )));
            }
        }
        Ok(Self { columns })
    }

    /// `firstName`, `lastName`, `email`
    pub fn first_last_email() -> Self {
        Self {
            columns: vec![
                SchemaColumn::new("firstName", RecipientField::FirstName),
                SchemaColumn::new("lastName", RecipientField::LastName),
                SchemaColumn::new("email", RecipientField::EmailAddress),
            ],
        }
    }

    /// `Surname`, `Other Names`, `E-mail address`
    pub fn surname_other_names() -> Self {
        Self {
            columns: vec![
                SchemaColumn::new("Surname", RecipientField::Surname),
                SchemaColumn::new("Other Names", RecipientField::OtherNames),
                SchemaColumn::new("E-mail address", RecipientField::EmailAddress),
            ],
        }
    }

    /// Selects a preset by name (case-insensitive):
    /// - first/last: "first-last", "first_last", "firstname", "first-last-email"
    /// - surname: "surname", "surname-other-names", "other-names"
    pub fn parse(name: &str) -> Result<Self, ImportError> {
        match name.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "FIRST-LAST" | "FIRSTNAME" | "FIRST-LAST-EMAIL" => Ok(Self::first_last_email()),
            "SURNAME" | "SURNAME-OTHER-NAMES" | "OTHER-NAMES" => Ok(Self::surname_other_names()),
            _ => Err(ImportError::UnknownSchema(name.to_owned())),
        }
    }

    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    /// Required header labels, in schema order.
    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.label.as_str()).collect()
    }

    /// Name fields carried by records of this schema, in schema order.
    pub fn name_fields(&self) -> Vec<RecipientField> {
        self.columns
            .iter()
            .map(|column| column.field)
            .filter(RecipientField::is_name)
            .collect()
    }

    pub fn has_field(&self, field: RecipientField) -> bool {
        self.columns.iter().any(|column| column.field == field)
    }

    /// Locates every schema column in `header`, keyed by label.
    pub fn resolve<S: AsRef<str>>(&self, header: &[S]) -> Result<HashMap<String, usize>, ImportError> {
        resolve(header, &self.labels())
    }
}

/// Maps each required label to its position in `header`.
///
/// Header cells are trimmed and compared case-insensitively to the labels by
/// exact string; the first matching cell wins. When any label is absent the
/// error lists all of them, not only the first.
pub fn resolve<S, L>(header: &[S], required: &[L]) -> Result<HashMap<String, usize>, ImportError>
where
    S: AsRef<str>,
    L: AsRef<str>,
{
    let header: Vec<String> = header
        .iter()
        .map(|cell| cell.as_ref().trim().to_lowercase())
        .collect();

    let mut indexes = HashMap::<String, usize>::new();
    let mut missing = Vec::<String>::new();
    for label in required {
        let label = label.as_ref();
        let wanted = label.to_lowercase();
        match header.iter().position(|cell| *cell == wanted) {
            Some(index) => {
                indexes.insert(label.to_owned(), index);
            }
            None => missing.push(label.to_owned()),
        }
    }

    if missing.is_empty() {
        Ok(indexes)
    } else {
        Err(ImportError::SchemaMismatch {
            missing,
            required: required.iter().map(|label| label.as_ref().to_owned()).collect(),
        })
    }
}
