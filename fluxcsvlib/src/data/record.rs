//! Decoded data rows.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

use super::schema::TableSchema;
use super::value::Value;

/// One data row bound to the table shape it was decoded with.
///
/// Values are stored in the schema's column order; the `result` and `table`
/// pseudo-columns are exposed as [`Record::result`] and
/// [`Record::table_id`] instead of values.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Rc<TableSchema>,
    result: String,
    table_id: i64,
    values: Vec<Value>,
}

impl Record {
    /// Build a record. `values` must line up with `schema.columns()`.
    pub fn new(schema: Rc<TableSchema>, result: String, table_id: i64, values: Vec<Value>) -> Self {
        debug_assert_eq!(schema.columns().len(), values.len());
        Self {
            schema,
            result,
            table_id,
            values,
        }
    }

    pub fn schema(&self) -> &Rc<TableSchema> {
        &self.schema
    }

    /// Name of the result this row belongs to.
    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn table_id(&self) -> i64 {
        self.table_id
    }

    /// Value of the named column, if the schema has it.
    pub fn value_by_key(&self, name: &str) -> Option<&Value> {
        self.schema.index_of(name).map(|i| &self.values[i])
    }

    /// Value at the given column position.
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// `(name, value)` pairs in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .columns()
            .iter()
            .map(|c| c.name.as_str())
            .zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The `_time` column.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.value_by_key("_time").and_then(Value::as_time)
    }

    /// The `_start` column.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.value_by_key("_start").and_then(Value::as_time)
    }

    /// The `_stop` column.
    pub fn stop(&self) -> Option<DateTime<Utc>> {
        self.value_by_key("_stop").and_then(Value::as_time)
    }

    /// The `_value` column.
    pub fn value(&self) -> Option<&Value> {
        self.value_by_key("_value")
    }

    /// The `_field` column.
    pub fn field(&self) -> Option<&str> {
        self.value_by_key("_field").and_then(Value::as_str)
    }

    /// The `_measurement` column.
    pub fn measurement(&self) -> Option<&str> {
        self.value_by_key("_measurement").and_then(Value::as_str)
    }
}

/// Serializes the values as a map in declaration order.
struct ValuesMap<'a>(&'a Record);

impl Serialize for ValuesMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0.values() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Record", 3)?;
        state.serialize_field("result", &self.result)?;
        state.serialize_field("table", &self.table_id)?;
        state.serialize_field("values", &ValuesMap(self))?;
        state.end()
    }
}
