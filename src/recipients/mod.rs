//! # Recipient Engine
//!
//! Imports recipient lists from uploaded files, validates their header row
//! against a configurable [`Schema`], normalizes names, and keeps the
//! editable in-memory [`RecipientTable`] that feeds the send action.
pub mod import;
pub mod normalize;
pub mod schema;
pub mod table;

pub use import::import;
pub use import::import_file;
pub use normalize::normalize_name;
pub use schema::resolve;
pub use schema::Schema;
pub use schema::SchemaColumn;
pub use table::RecipientTable;
pub use table::TableSubscriber;

use std::fmt::Display;
use thiserror::Error;

/// Failures reported by the import boundary and by schema configuration.
///
/// An import yields either a full record sequence or exactly one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// File extension or type other than csv/xlsx
    #[error("Invalid file type '{0}': please upload a CSV or XLSX file")]
    UnsupportedFormat(String),

    /// Header row lacks one or more required columns
    #[error(
        "Missing required fields: {}. Please ensure your file includes: {}",
        .missing.join(", "),
        .required.join(", ")
    )]
    SchemaMismatch {
        /// Every required label absent from the header, in schema order
        missing: Vec<String>,
        /// The full required label list
        required: Vec<String>,
    },

    /// Workbook bytes could not be decoded
    #[error("Invalid workbook: {0}")]
    MalformedWorkbook(String),

    #[error("Unknown schema '{0}'")]
    UnknownSchema(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}

/// The fields a recipient record can carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecipientField {
    FirstName,
    LastName,
    Surname,
    OtherNames,
    EmailAddress,
}

impl RecipientField {
    /// Returns the field key used by the editing surface.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Surname => "surname",
            Self::OtherNames => "otherNames",
            Self::EmailAddress => "email",
        }
    }

    /// Name fields go through name normalization on every write.
    pub const fn is_name(&self) -> bool {
        !matches!(self, Self::EmailAddress)
    }

    /// Parses a field key (case-insensitive), accepting a few aliases.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "FIRSTNAME" | "FIRST_NAME" => Some(Self::FirstName),
            "LASTNAME" | "LAST_NAME" => Some(Self::LastName),
            "SURNAME" => Some(Self::Surname),
            "OTHERNAMES" | "OTHER_NAMES" => Some(Self::OtherNames),
            "EMAIL" | "EMAILADDRESS" | "EMAIL_ADDRESS" => Some(Self::EmailAddress),
            _ => None,
        }
    }
}

impl Display for RecipientField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the recipient table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientRecord {
    /// Unique within the table; the decimal ordinal assigned at creation
    pub id: String,
    /// Send target; may be empty while being edited
    pub email_address: String,
    /// Name fields in schema order
    names: Vec<(RecipientField, String)>,
}

impl RecipientRecord {
    /// Creates a record with an empty email and one empty value per name field of `schema`.
    pub fn blank(id: impl Into<String>, schema: &Schema) -> Self {
        Self {
            id: id.into(),
            email_address: String::new(),
            names: schema
                .name_fields()
                .into_iter()
                .map(|field| (field, String::new()))
                .collect(),
        }
    }

    /// Builder form of [`RecipientRecord::set_field`].
    pub fn with(mut self, field: RecipientField, value: &str) -> Self {
        self.set_field(field, value);
        self
    }

    /// Returns the value of a name field, `None` if the record does not carry it.
    pub fn name(&self, field: RecipientField) -> Option<&str> {
        self.names
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates the name fields in schema order.
    pub fn names(&self) -> impl Iterator<Item = (RecipientField, &str)> {
        self.names.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Returns any field's value, `None` if the record does not carry it.
    pub fn field(&self, field: RecipientField) -> Option<&str> {
        match field {
            RecipientField::EmailAddress => Some(self.email_address.as_str()),
            _ => self.name(field),
        }
    }

    /// Stores a field value; name fields are normalized first.
    ///
    /// Returns false, leaving the record untouched, when the record does not
    /// carry `field` (for example `Surname` on a first/last-name record).
    pub fn set_field(&mut self, field: RecipientField, value: &str) -> bool {
        if field == RecipientField::EmailAddress {
            self.email_address = value.to_owned();
            return true;
        }
        match self.names.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => {
                *slot = normalize_name(value);
                true
            }
            None => false,
        }
    }

    /// Non-empty name values joined by a space, in schema order.
    pub fn display_name(&self) -> String {
        self.names
            .iter()
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// True when the email and every name are empty.
    pub fn is_blank(&self) -> bool {
        self.email_address.is_empty() && self.names.iter().all(|(_, value)| value.is_empty())
    }
}
