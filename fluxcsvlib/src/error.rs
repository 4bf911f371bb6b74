//! Error types for fluxcsvlib

use thiserror::Error;

use crate::data::column::DataType;

/// Errors that can occur while decoding or rendering an annotated CSV stream.
///
/// Every decode-time error is fatal: the decoder stops at the first one and
/// never skips a bad row.
#[derive(Error, Debug)]
pub enum FluxCsvError {
    /// A data row arrived before any annotation block
    #[error("parsing error: annotations not found")]
    AnnotationsNotFound,

    /// An annotation block reached its name row without a `#datatype` row
    #[error("parsing error: datatype annotation not found")]
    DatatypeNotFound,

    /// A `#datatype` row named a type outside the known vocabulary
    #[error("parsing error: unknown data type {0}")]
    UnknownDataType(String),

    /// A row's cell count does not match the active column count
    #[error("parsing error: row has {found} columns, expected {expected} ({expected} vs {found})")]
    ColumnCount { found: usize, expected: usize },

    /// The `table` pseudo-column (or its default) is not an integer
    #[error("parsing error: invalid table id '{0}'")]
    InvalidTableId(String),

    /// A row whose first cell is neither empty nor an annotation
    #[error("parsing error: unexpected row marker '{0}'")]
    UnexpectedRowMarker(String),

    /// A cell could not be coerced to its column's declared type
    #[error("cannot convert '{text}' to {data_type} in column '{column}': {message}")]
    ValueCoercion {
        column: String,
        data_type: DataType,
        text: String,
        message: String,
    },

    /// The server reported a query failure through the `error` pseudo-table
    #[error("{0}")]
    QueryRuntime(String),

    /// Malformed CSV framing or non UTF-8 text in the stream
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Reading from or closing the byte-stream source failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing rendered output failed
    #[error("write error: {0}")]
    Sink(std::io::Error),

    /// The formatter has no display name for a column type
    #[error("unsupported column type for display: {0}")]
    UnsupportedDisplayType(DataType),

    /// Closing the source failed while a decode error was already pending
    #[error("{close},{decode}")]
    Combined {
        close: Box<FluxCsvError>,
        decode: Box<FluxCsvError>,
    },
}

impl FluxCsvError {
    /// Build the error reported by an `error` pseudo-table row.
    ///
    /// An empty message falls back to `unknown query error`; a non-empty
    /// reference is appended after a comma.
    pub fn query_runtime(message: &str, reference: Option<&str>) -> Self {
        let message = if message.is_empty() {
            "unknown query error"
        } else {
            message
        };
        match reference.filter(|r| !r.is_empty()) {
            Some(reference) => FluxCsvError::QueryRuntime(format!("{message},{reference}")),
            None => FluxCsvError::QueryRuntime(message.to_string()),
        }
    }

    /// Whether this is a structural error in the annotated CSV layout.
    pub fn is_parsing(&self) -> bool {
        matches!(
            self,
            FluxCsvError::AnnotationsNotFound
                | FluxCsvError::DatatypeNotFound
                | FluxCsvError::UnknownDataType(_)
                | FluxCsvError::ColumnCount { .. }
                | FluxCsvError::InvalidTableId(_)
                | FluxCsvError::UnexpectedRowMarker(_)
        )
    }
}
