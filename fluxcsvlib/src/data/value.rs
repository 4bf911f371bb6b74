//! Typed cell values and per-type coercion.
//!
//! Each data cell is coerced according to its column's declared
//! [`DataType`]. Coercion is strict: a cell that does not parse is an error
//! for the whole stream, never a silently skipped value.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::ser::{Serialize, Serializer};

use crate::error::FluxCsvError;
use crate::Result;

use super::column::{Column, DataType};
use super::duration::parse_duration;

/// A decoded cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Empty cell with an empty default
    Null,
    String(String),
    Double(f64),
    Bool(bool),
    Long(i64),
    ULong(u64),
    Duration(TimeDelta),
    Bytes(Vec<u8>),
    Time(DateTime<Utc>),
}

impl Value {
    /// Coerce cell text to the column's declared type.
    ///
    /// The caller is expected to have substituted the column default for an
    /// empty cell already; text that is still empty becomes [`Value::Null`].
    pub fn coerce(text: &str, column: &Column) -> Result<Value> {
        if text.is_empty() {
            return Ok(Value::Null);
        }
        let failed = |message: String| FluxCsvError::ValueCoercion {
            column: column.name.clone(),
            data_type: column.data_type,
            text: text.to_string(),
            message,
        };

        let value = match column.data_type {
            DataType::String => Value::String(text.to_string()),
            DataType::Double => Value::Double(text.parse().map_err(|e| failed(format!("{e}")))?),
            DataType::Bool => Value::Bool(parse_bool(text)),
            DataType::Long => Value::Long(text.parse().map_err(|e| failed(format!("{e}")))?),
            DataType::ULong => Value::ULong(text.parse().map_err(|e| failed(format!("{e}")))?),
            DataType::Duration => {
                Value::Duration(parse_duration(text).map_err(|e| failed(e.to_string()))?)
            }
            DataType::Base64Binary => {
                Value::Bytes(STANDARD.decode(text).map_err(|e| failed(e.to_string()))?)
            }
            DataType::TimeRFC3339 | DataType::TimeRFC3339Nano => Value::Time(
                DateTime::parse_from_rfc3339(text)
                    .map_err(|e| failed(e.to_string()))?
                    .with_timezone(&Utc),
            ),
        };
        Ok(value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::ULong(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<TimeDelta> {
        match self {
            Value::Duration(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Time(v) => Some(*v),
            _ => None,
        }
    }
}

/// Boolean cells are false only for a case-insensitive `false`; any other
/// non-empty text is true.
pub fn parse_bool(text: &str) -> bool {
    !text.eq_ignore_ascii_case("false")
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::String(s) => serializer.serialize_str(s),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Long(v) => serializer.serialize_i64(*v),
            Value::ULong(v) => serializer.serialize_u64(*v),
            Value::Duration(v) => match v.num_nanoseconds() {
                Some(nanos) => serializer.serialize_i64(nanos),
                None => serializer.serialize_none(),
            },
            Value::Bytes(v) => serializer.serialize_str(&STANDARD.encode(v)),
            Value::Time(v) => {
                serializer.serialize_str(&v.to_rfc3339_opts(SecondsFormat::Nanos, true))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn coerce(text: &str, data_type: DataType) -> Result<Value> {
        Value::coerce(text, &Column::named("_value", data_type))
    }

    #[test]
    fn empty_text_is_null() {
        for data_type in [DataType::String, DataType::Double, DataType::Long] {
            assert_eq!(coerce("", data_type).unwrap(), Value::Null);
        }
    }

    #[test]
    fn bool_is_false_only_for_false() {
        assert_eq!(coerce("False", DataType::Bool).unwrap(), Value::Bool(false));
        assert_eq!(coerce("FALSE", DataType::Bool).unwrap(), Value::Bool(false));
        assert_eq!(coerce("true", DataType::Bool).unwrap(), Value::Bool(true));
        assert_eq!(coerce("yes", DataType::Bool).unwrap(), Value::Bool(true));
        assert_eq!(coerce("1", DataType::Bool).unwrap(), Value::Bool(true));
        assert_eq!(coerce("0", DataType::Bool).unwrap(), Value::Bool(true));
    }

    #[test]
    fn numeric_types() {
        assert_eq!(coerce("1.5", DataType::Double).unwrap(), Value::Double(1.5));
        assert_eq!(coerce("-7", DataType::Long).unwrap(), Value::Long(-7));
        assert_eq!(
            coerce("18446744073709551615", DataType::ULong).unwrap(),
            Value::ULong(u64::MAX)
        );
        assert!(coerce("+Inf", DataType::Double)
            .unwrap()
            .as_f64()
            .unwrap()
            .is_infinite());
        assert!(coerce("NaN", DataType::Double).unwrap().as_f64().unwrap().is_nan());
    }

    #[test]
    fn numeric_failures_name_the_column() {
        let err = coerce("abc", DataType::Long).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'abc'"));
        assert!(message.contains("long"));
        assert!(message.contains("_value"));
        assert!(coerce("-1", DataType::ULong).is_err());
        assert!(coerce("1.2.3", DataType::Double).is_err());
    }

    #[test]
    fn timestamps() {
        let expected = Utc.with_ymd_and_hms(2020, 2, 17, 22, 19, 49).unwrap()
            + TimeDelta::nanoseconds(747_562_847);
        assert_eq!(
            coerce("2020-02-17T22:19:49.747562847Z", DataType::TimeRFC3339Nano).unwrap(),
            Value::Time(expected)
        );
        let offset = coerce("2020-02-18T00:19:49+02:00", DataType::TimeRFC3339).unwrap();
        assert_eq!(
            offset,
            Value::Time(Utc.with_ymd_and_hms(2020, 2, 17, 22, 19, 49).unwrap())
        );
        assert!(coerce("2020-02-17", DataType::TimeRFC3339).is_err());
    }

    #[test]
    fn duration_and_binary() {
        assert_eq!(
            coerce("1h20m30.13245s", DataType::Duration).unwrap(),
            Value::Duration(TimeDelta::nanoseconds(4_830_132_450_000))
        );
        assert_eq!(
            coerce("aGVsbG8=", DataType::Base64Binary).unwrap(),
            Value::Bytes(b"hello".to_vec())
        );
        assert!(coerce("not base64!", DataType::Base64Binary).is_err());
        assert!(coerce("1x", DataType::Duration).is_err());
    }

    #[test]
    fn serializes_to_json() {
        let time = Utc.with_ymd_and_hms(2020, 2, 17, 22, 19, 49).unwrap();
        let values = vec![
            Value::Null,
            Value::Long(3),
            Value::Bytes(b"hello".to_vec()),
            Value::Duration(TimeDelta::seconds(2)),
            Value::Time(time),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(
            json,
            r#"[null,3,"aGVsbG8=",2000000000,"2020-02-17T22:19:49.000000000Z"]"#
        );
    }
}
