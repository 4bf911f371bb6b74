//! Output formatting: present decoded tables as aligned text.
//!
//! This module handles the third and final stage of the pipeline -
//! rendering records for display. It provides:
//!
//! - **TableFormatter**: drains a decoder and writes fixed-width tables
//! - **ErrorWriter**: sink wrapper that keeps the first write error
//!
//! ## Example
//!
//! ```rust
//! use fluxcsvlib::decode::Decoder;
//! use fluxcsvlib::output::TableFormatter;
//! use fluxcsvlib::FormatOptions;
//!
//! let csv = "#datatype,string,long,double\n,result,table,_value\n,_result,0,1.5\n";
//! let mut decoder = Decoder::new(csv.as_bytes());
//! let mut formatter =
//!     TableFormatter::with_options(Vec::new(), FormatOptions::new().without_min_widths());
//! formatter.write(&mut decoder).unwrap();
//!
//! let text = String::from_utf8(formatter.into_inner()).unwrap();
//! assert_eq!(
//!     text,
//!     "Result: _result\nTable: keys: []\n_value:float\n------------\n         1.5\n"
//! );
//! ```

pub mod formatter;
pub mod writer;

pub use formatter::{display_type_name, fit, render_value, TableFormatter};
pub use writer::ErrorWriter;
