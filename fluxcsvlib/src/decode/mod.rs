//! Decoding: turn annotated CSV rows into typed records.
//!
//! This module handles the second stage of the pipeline - classifying raw
//! rows, tracking table shapes as annotation blocks come and go, and
//! coercing data cells to their declared types. It provides:
//!
//! - **Decoder**: pull-based state machine over a [`Source`](crate::source::Source)
//!
//! ## Example
//!
//! ```rust
//! use fluxcsvlib::decode::Decoder;
//!
//! let csv = "#datatype,string,long,double\n,result,table,_value\n,_result,0,1.5\n";
//! let mut decoder = Decoder::new(csv.as_bytes());
//! while decoder.advance() {
//!     let record = decoder.current_record().unwrap();
//!     assert_eq!(record.result(), "_result");
//! }
//! assert!(decoder.last_error().is_none());
//! ```

pub mod decoder;

pub use decoder::Decoder;
