//! # fluxcsvlib
//!
//! A streaming decoder and fixed-width renderer for annotated CSV, the
//! response format of time-series query engines.
//!
//! ## Overview
//!
//! An annotated CSV response is self-describing: `#datatype`, `#group` and
//! `#default` rows declare the columns of the tables that follow, and may be
//! repeated mid-stream to change the table shape. A response carries zero or
//! more results, each with zero or more tables, and can report a server-side
//! failure inline through an `error` pseudo-table.
//!
//! The pipeline has three stages:
//!
//! - **Source**: a readable, closable byte stream (`source`)
//! - **Decode**: rows to typed records plus change signals (`decode`)
//! - **Output**: records to aligned text tables (`output`)
//!
//! The records themselves (`data`) are plain values with no I/O.
//!
//! ## Features
//!
//! - **Streaming**: one row in memory at a time; tables of any size
//! - **Typed values**: strings, floats, booleans, signed and unsigned
//!   integers, durations, binary and timestamps
//! - **Strict**: structural problems and unparsable cells stop the stream
//!   with a descriptive error
//! - **Shape tracking**: records report result, table and annotation changes
//!
//! ## Example
//!
//! ```rust
//! use fluxcsvlib::{Decoder, FormatOptions, TableFormatter, Value};
//!
//! let csv = "\
//! #datatype,string,long,string,double
//! #group,false,false,true,false
//! #default,_result,,,
//! ,result,table,_field,_value
//! ,,0,temp,21.5
//! ,,0,temp,22
//! ";
//!
//! // Decode records one at a time
//! let mut decoder = Decoder::new(csv.as_bytes());
//! assert!(decoder.advance());
//! let record = decoder.current_record().unwrap();
//! assert_eq!(record.result(), "_result");
//! assert_eq!(record.value(), Some(&Value::Double(21.5)));
//!
//! // Or render the whole stream as text
//! let mut decoder = Decoder::new(csv.as_bytes());
//! let mut formatter = TableFormatter::with_options(Vec::new(), FormatOptions::new());
//! formatter.write(&mut decoder).unwrap();
//! let text = String::from_utf8(formatter.into_inner()).unwrap();
//! assert!(text.starts_with("Result: _result\nTable: keys: [_field]\n"));
//! ```

pub mod data;
pub mod decode;
pub mod error;
pub mod options;
pub mod output;
pub mod source;

pub use data::{Column, DataType, Record, TableSchema, Value};
pub use decode::Decoder;
pub use error::FluxCsvError;
pub use options::{FormatOptions, MinWidths};
pub use output::{ErrorWriter, TableFormatter};
pub use source::{CloseWith, Source};

/// Result type for fluxcsvlib operations
pub type Result<T> = std::result::Result<T, FluxCsvError>;
