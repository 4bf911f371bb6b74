//! Rendering options.
//!
//! This module contains the configuration types that control how the table
//! formatter lays out columns.

use serde::{Deserialize, Serialize};

use crate::data::column::DataType;

/// Fixed-width time pattern (`2006-01-02T15:04:05.000000000Z`) length.
pub const TIME_WIDTH: usize = 30;

/// Per-type minimum column widths.
///
/// A column is never narrower than its `name:type` label; these floors keep
/// short-named numeric and time columns from collapsing to a few
/// characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinWidths {
    pub bool: usize,
    pub long: usize,
    pub ulong: usize,
    pub double: usize,
    pub string: usize,
    pub time: usize,
}

impl Default for MinWidths {
    fn default() -> Self {
        Self {
            bool: 12,
            long: 26,
            ulong: 27,
            double: 28,
            string: 22,
            time: TIME_WIDTH,
        }
    }
}

impl MinWidths {
    /// Create the default floors.
    pub fn new() -> Self {
        Self::default()
    }

    /// No floors: columns are sized by label and first value only.
    pub fn none() -> Self {
        Self {
            bool: 0,
            long: 0,
            ulong: 0,
            double: 0,
            string: 0,
            time: 0,
        }
    }

    /// Floor for a column of the given type (0 for types without one).
    pub fn for_type(&self, data_type: DataType) -> usize {
        match data_type {
            DataType::Bool => self.bool,
            DataType::Long => self.long,
            DataType::ULong => self.ulong,
            DataType::Double => self.double,
            DataType::String => self.string,
            DataType::TimeRFC3339 | DataType::TimeRFC3339Nano => self.time,
            DataType::Duration | DataType::Base64Binary => 0,
        }
    }

    /// Set the floor for string columns.
    pub fn with_string(mut self, width: usize) -> Self {
        self.string = width;
        self
    }

    /// Set the floor for float columns.
    pub fn with_double(mut self, width: usize) -> Self {
        self.double = width;
        self
    }

    /// Set the floor for integer columns.
    pub fn with_long(mut self, width: usize) -> Self {
        self.long = width;
        self
    }

    /// Set the floor for boolean columns.
    pub fn with_bool(mut self, width: usize) -> Self {
        self.bool = width;
        self
    }

    /// Set the floor for time columns.
    pub fn with_time(mut self, width: usize) -> Self {
        self.time = width;
        self
    }
}

/// Options for the table formatter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Per-type minimum column widths
    pub min_widths: MinWidths,
}

impl FormatOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-type minimum widths.
    pub fn min_widths(mut self, min_widths: MinWidths) -> Self {
        self.min_widths = min_widths;
        self
    }

    /// Size columns by label and first value only.
    pub fn without_min_widths(self) -> Self {
        self.min_widths(MinWidths::none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_floors() {
        let floors = MinWidths::default();
        assert_eq!(floors.for_type(DataType::Bool), 12);
        assert_eq!(floors.for_type(DataType::Long), 26);
        assert_eq!(floors.for_type(DataType::ULong), 27);
        assert_eq!(floors.for_type(DataType::Double), 28);
        assert_eq!(floors.for_type(DataType::String), 22);
        assert_eq!(floors.for_type(DataType::TimeRFC3339), 30);
        assert_eq!(floors.for_type(DataType::TimeRFC3339Nano), 30);
        assert_eq!(floors.for_type(DataType::Base64Binary), 0);
    }

    #[test]
    fn time_width_matches_pattern() {
        assert_eq!(TIME_WIDTH, "2006-01-02T15:04:05.000000000Z".len());
    }

    #[test]
    fn builder_chain() {
        let options = FormatOptions::new().min_widths(MinWidths::none().with_string(5));
        assert_eq!(options.min_widths.for_type(DataType::String), 5);
        assert_eq!(options.min_widths.for_type(DataType::Double), 0);
        assert_eq!(
            FormatOptions::new().without_min_widths().min_widths,
            MinWidths::none()
        );
    }

    #[test]
    fn options_round_trip_through_json() {
        let options = FormatOptions::new().min_widths(MinWidths::new().with_double(10));
        let json = serde_json::to_string(&options).unwrap();
        let back: FormatOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }
}
