//! The editable recipient table behind the send action.

use crate::recipients::import_file;
use crate::recipients::ImportError;
use crate::recipients::RecipientField;
use crate::recipients::RecipientRecord;
use crate::recipients::Schema;
use tracing::debug;

/// Receives the full record sequence after every table mutation.
pub trait TableSubscriber {
    fn table_changed(&mut self, records: &[RecipientRecord]);
}

impl<F> TableSubscriber for F
where
    F: FnMut(&[RecipientRecord]),
{
    fn table_changed(&mut self, records: &[RecipientRecord]) {
        self(records)
    }
}

/// Ordered, mutable recipient records with a single change subscriber.
///
/// Every mutation that changes the table notifies the subscriber
/// synchronously, once, with the new contents. Nothing is batched.
pub struct RecipientTable {
    schema: Schema,
    records: Vec<RecipientRecord>,
    loaded_file: Option<String>,
    subscriber: Option<Box<dyn TableSubscriber>>,
}

impl RecipientTable {
    /// Creates a table holding a single blank row.
    pub fn new(schema: Schema) -> Self {
        let records = vec![RecipientRecord::blank("1", &schema)];
        Self {
            schema,
            records,
            loaded_file: None,
            subscriber: None,
        }
    }

    /// Registers the subscriber, replacing any previous one.
    pub fn subscribe(&mut self, subscriber: impl TableSubscriber + 'static) {
        self.subscriber = Some(Box::new(subscriber));
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[RecipientRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&RecipientRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Name of the file whose import produced the current contents.
    pub fn loaded_file(&self) -> Option<&str> {
        self.loaded_file.as_deref()
    }

    /// Installs `records` verbatim in place of the current contents.
    pub fn replace_all(&mut self, records: Vec<RecipientRecord>) {
        self.records = records;
        self.notify();
    }

    /// Imports `bytes` with the table's schema and replaces the contents.
    ///
    /// On failure the table, its loaded marker included, is left exactly as
    /// it was and the subscriber is not called.
    pub fn load(&mut self, file_name: &str, bytes: &[u8]) -> Result<usize, ImportError> {
        let records = import_file(file_name, bytes, &self.schema)?;
        let count = records.len();
        self.loaded_file = Some(file_name.to_owned());
        self.replace_all(records);
        Ok(count)
    }

    /// Appends a blank row and returns its id.
    ///
    /// The id is one more than the greatest numeric id in the table. When
    /// that id does not fit, the first free number from `len() + 1` up is
    /// taken instead. Either way it never collides with an existing row.
    pub fn add_blank_row(&mut self) -> String {
        let numbers: Vec<u64> = self
            .records
            .iter()
            .filter_map(|record| record.id.parse::<u64>().ok())
            .collect();
        let next = match numbers.iter().max() {
            None => 1,
            Some(max) => max.checked_add(1).unwrap_or_else(|| {
                (self.records.len() as u64 + 1..)
                    .find(|candidate| !numbers.contains(candidate))
                    .unwrap_or_default()
            }),
        };
        let id = next.to_string();
        self.records.push(RecipientRecord::blank(id.as_str(), &self.schema));
        self.notify();
        id
    }

    /// Sets one field of the row `id`; name values are normalized.
    ///
    /// Returns false without notifying when no row has that id or the schema
    /// does not carry `field`.
    pub fn edit_field(&mut self, id: &str, field: RecipientField, value: &str) -> bool {
        let Some(record) = self.records.iter_mut().find(|record| record.id == id) else {
            debug!(id, field = %field, "Edit of unknown recipient row ignored");
            return false;
        };
        if !record.set_field(field, value) {
            debug!(id, field = %field, "Edit of field outside the schema ignored");
            return false;
        }
        self.notify();
        true
    }

    /// Removes the row `id`. Removing the last row leaves the table empty.
    pub fn remove_row(&mut self, id: &str) -> bool {
        let Some(position) = self.records.iter().position(|record| record.id == id) else {
            debug!(id, "Removal of unknown recipient row ignored");
            return false;
        };
        self.records.remove(position);
        self.notify();
        true
    }

    /// Back to a single blank row with no file loaded.
    pub fn reset(&mut self) {
        self.records = vec![RecipientRecord::blank("1", &self.schema)];
        self.loaded_file = None;
        self.notify();
    }

    fn notify(&mut self) {
        debug!(records = self.records.len(), "Recipient table changed");
        if let Some(subscriber) = self.subscriber.as_mut() {
            subscriber.table_changed(&self.records);
        }
    }
}
