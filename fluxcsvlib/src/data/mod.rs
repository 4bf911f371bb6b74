//! Data model: columns, typed values, table shapes and records.
//!
//! This module holds the plain data the decoder produces. It provides:
//!
//! - **Columns**: `DataType` and `Column`, the per-column annotations
//! - **Values**: `Value`, the typed cell sum type, and its coercion rules
//! - **Schemas**: `TableSchema`, the frozen shape shared by a table's records
//! - **Records**: `Record`, one decoded data row
//!
//! Nothing here performs I/O.
//!
//! ## Example
//!
//! ```rust
//! use fluxcsvlib::data::{Column, DataType, Value};
//!
//! let column = Column::named("_value", DataType::Double);
//! assert_eq!(Value::coerce("1.5", &column).unwrap(), Value::Double(1.5));
//! ```

pub mod column;
pub mod duration;
pub mod record;
pub mod schema;
pub mod value;

pub use column::{Column, DataType, RESULT_COLUMN, TABLE_COLUMN};
pub use duration::{parse_duration, DurationError};
pub use record::Record;
pub use schema::TableSchema;
pub use value::{parse_bool, Value};
