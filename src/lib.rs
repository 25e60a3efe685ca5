//! # Rusty Mailer
//!
//! The recipient engine of a bulk-email sender. It turns an uploaded recipient
//! list into an editable table and hands that table to a send action.
//!
//! ## Features
//!
//! - **Two upload formats**: comma-delimited text (`.csv`) and Excel workbooks (`.xlsx`),
//!   both decoded fully in memory
//! - **Configurable header schema**: required columns are located by label in any order
//!   and any case; every missing column is reported at once
//! - **Name normalization**: name fields are stored in canonical capitalization
//! - **Recipient table**: add, edit, remove and reset rows, with a synchronous change
//!   subscriber
//! - **Send action**: validation, personalization and sequential delivery through a
//!   pluggable transport, reported into a shared log feed
//!
//! ## Example
//!
//! ```
//! use rusty_mailer::recipients::{RecipientTable, Schema};
//!
//! let mut table = RecipientTable::new(Schema::first_last_email());
//! table.subscribe(|records: &[rusty_mailer::recipients::RecipientRecord]| {
//!     println!("{} recipient(s)", records.len());
//! });
//! let count = table
//!     .load("people.csv", b"firstName,lastName,email\nJOHN,doe,john@x.com")
//!     .unwrap();
//! assert_eq!(count, 1);
//! assert_eq!(table.records()[0].display_name(), "John Doe");
//! ```
mod error;
mod helpers;

pub mod dispatch;
pub mod recipients;
pub mod spreadsheet;

pub use error::MailerError;
pub use recipients::ImportError;
pub use recipients::RecipientField;
pub use recipients::RecipientRecord;
pub use spreadsheet::SpreadsheetFormat;
