//! Column metadata declared by annotation rows.
//!
//! A column is assembled piecewise while an annotation block is read:
//! `#datatype` sets the type, `#group` the group flag, `#default` the
//! default text, and the name row finally names it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FluxCsvError;

/// Name of the pseudo-column carrying the result name.
pub const RESULT_COLUMN: &str = "result";

/// Name of the pseudo-column carrying the numeric table id.
pub const TABLE_COLUMN: &str = "table";

/// Declared type of a column, as named in a `#datatype` row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    #[default]
    #[serde(rename = "string")]
    String,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "boolean")]
    Bool,
    #[serde(rename = "long")]
    Long,
    #[serde(rename = "unsignedLong")]
    ULong,
    #[serde(rename = "duration")]
    Duration,
    #[serde(rename = "base64Binary")]
    Base64Binary,
    #[serde(rename = "dateTime:RFC3339")]
    TimeRFC3339,
    #[serde(rename = "dateTime:RFC3339Nano")]
    TimeRFC3339Nano,
}

impl DataType {
    /// The token used for this type in a `#datatype` row.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Double => "double",
            DataType::Bool => "boolean",
            DataType::Long => "long",
            DataType::ULong => "unsignedLong",
            DataType::Duration => "duration",
            DataType::Base64Binary => "base64Binary",
            DataType::TimeRFC3339 => "dateTime:RFC3339",
            DataType::TimeRFC3339Nano => "dateTime:RFC3339Nano",
        }
    }

    /// Whether values of this type are timestamps.
    pub fn is_time(&self) -> bool {
        matches!(self, DataType::TimeRFC3339 | DataType::TimeRFC3339Nano)
    }
}

impl FromStr for DataType {
    type Err = FluxCsvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(DataType::String),
            "double" => Ok(DataType::Double),
            "boolean" => Ok(DataType::Bool),
            "long" => Ok(DataType::Long),
            "unsignedLong" => Ok(DataType::ULong),
            "duration" => Ok(DataType::Duration),
            "base64Binary" => Ok(DataType::Base64Binary),
            "dateTime:RFC3339" => Ok(DataType::TimeRFC3339),
            "dateTime:RFC3339Nano" => Ok(DataType::TimeRFC3339Nano),
            other => Err(FluxCsvError::UnknownDataType(other.to_string())),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of a table shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name from the name row (empty until the name row is read)
    pub name: String,
    /// Declared type; `String` until a `#datatype` row says otherwise
    pub data_type: DataType,
    /// Whether the column is part of the table's group key
    pub is_group: bool,
    /// Text substituted for empty cells before coercion
    pub default_value: String,
}

impl Column {
    /// Create a blank column awaiting its annotations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a named column of the given type.
    pub fn named(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            ..Self::default()
        }
    }

    /// Mark the column as part of the group key.
    pub fn group(mut self, is_group: bool) -> Self {
        self.is_group = is_group;
        self
    }

    /// Set the default text for empty cells.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Whether this is the `result` or `table` pseudo-column.
    pub fn is_pseudo(&self) -> bool {
        self.name == RESULT_COLUMN || self.name == TABLE_COLUMN
    }
}
