//! Fixed-width table rendering of decoded records.
//!
//! The output for one table looks like:
//!
//! ```text
//! Result: _result
//! Table: keys: [_field]
//!          _field:string                  _value:float
//! ----------------------  ----------------------------
//!                      f                           1.4
//! ```
//!
//! Column widths are decided from the header label and the first row of
//! each table, then frozen: later rows that do not fit are truncated with
//! `...` rather than re-flowing rows already written.

use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::data::column::DataType;
use crate::data::record::Record;
use crate::data::schema::TableSchema;
use crate::data::value::Value;
use crate::decode::Decoder;
use crate::error::FluxCsvError;
use crate::options::FormatOptions;
use crate::source::Source;
use crate::Result;

use super::writer::ErrorWriter;

const GUTTER: &str = "  ";
const ELLIPSIS: &str = "...";
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9fZ";

/// Name shown after the colon in a column header.
pub fn display_type_name(data_type: DataType) -> Result<&'static str> {
    match data_type {
        DataType::String => Ok("string"),
        DataType::Double => Ok("float"),
        DataType::Bool => Ok("boolean"),
        DataType::Long => Ok("int"),
        DataType::Base64Binary => Ok("base64Binary"),
        DataType::TimeRFC3339 | DataType::TimeRFC3339Nano => Ok("time"),
        DataType::Duration | DataType::ULong => {
            Err(FluxCsvError::UnsupportedDisplayType(data_type))
        }
    }
}

/// Render a value as it appears in a table cell (before alignment).
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Double(v) => render_float(*v),
        Value::Bool(v) => v.to_string(),
        Value::Long(v) => v.to_string(),
        Value::ULong(v) => v.to_string(),
        Value::Duration(v) => v.to_string(),
        Value::Bytes(v) => STANDARD.encode(v),
        Value::Time(v) => v.format(TIME_FORMAT).to_string(),
    }
}

/// Shortest decimal that round-trips, never in exponent form.
fn render_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        let sign = if v > 0.0 { '+' } else { '-' };
        format!("{sign}Inf")
    } else {
        v.to_string()
    }
}

/// Fit a rendered value into `width` characters, right-aligned.
///
/// Values wider than the column keep their first `width - 3` characters
/// followed by `...`.
pub fn fit(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(ELLIPSIS.len())).collect();
        format!("{kept}{ELLIPSIS}")
    } else {
        format!("{text:>width$}")
    }
}

/// A column as printed: where its value lives and how wide it is.
#[derive(Debug, Clone)]
struct PrintColumn {
    index: usize,
    label: String,
    width: usize,
}

/// Writes decoded tables as aligned text.
pub struct TableFormatter<W: Write> {
    out: ErrorWriter<W>,
    options: FormatOptions,
    columns: Vec<PrintColumn>,
    rows_in_table: usize,
}

impl<W: Write> TableFormatter<W> {
    /// Create a formatter with default options.
    pub fn new(sink: W) -> Self {
        Self::with_options(sink, FormatOptions::default())
    }

    pub fn with_options(sink: W, options: FormatOptions) -> Self {
        Self {
            out: ErrorWriter::new(sink),
            options,
            columns: Vec::new(),
            rows_in_table: 0,
        }
    }

    /// Consume the decoder and write every table it yields.
    ///
    /// A failed write does not stop decoding; later writes are skipped and
    /// the first write error is returned once the stream is drained. A
    /// decode error is returned after everything before it was written.
    /// A column type with no display name stops at once, without draining
    /// the decoder, unless a write error is already pending: the write error
    /// always wins.
    pub fn write<S: Source>(&mut self, decoder: &mut Decoder<S>) -> Result<()> {
        while decoder.advance() {
            let Some(record) = decoder.current_record() else {
                continue;
            };
            let annotations_changed = decoder.current_annotations_changed();

            if annotations_changed {
                if let Err(err) = self.select_columns(record.schema()) {
                    if let Err(close) = decoder.close() {
                        debug!(error = %close, "closing decoder failed");
                    }
                    if let Some(sink) = self.out.take_error() {
                        return Err(FluxCsvError::Sink(sink));
                    }
                    return Err(err);
                }
            }
            if decoder.current_result_changed() {
                writeln!(self.out, "Result: {}", record.result());
            }
            if decoder.current_table_changed() || annotations_changed {
                writeln!(
                    self.out,
                    "Table: keys: [{}]",
                    record.schema().group_key_names().join(", ")
                );
                self.rows_in_table = 0;
            }

            self.write_row(record);
        }

        self.out.flush();
        if let Some(err) = self.out.take_error() {
            return Err(FluxCsvError::Sink(err));
        }
        match decoder.take_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn get_ref(&self) -> &W {
        self.out.get_ref()
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    /// Group columns first (in group key order), then the rest in
    /// declaration order.
    fn select_columns(&mut self, schema: &TableSchema) -> Result<()> {
        let group = schema
            .group_key_names()
            .iter()
            .filter_map(|name| schema.index_of(name));
        let rest = schema
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_group)
            .map(|(i, _)| i);

        let mut columns = Vec::with_capacity(schema.columns().len());
        for index in group.chain(rest) {
            let column = &schema.columns()[index];
            let label = format!("{}:{}", column.name, display_type_name(column.data_type)?);
            let floor = self.options.min_widths.for_type(column.data_type);
            let width = label.chars().count().max(floor);
            columns.push(PrintColumn {
                index,
                label,
                width,
            });
        }
        self.columns = columns;
        Ok(())
    }

    fn write_row(&mut self, record: &Record) {
        let cells: Vec<String> = self
            .columns
            .iter()
            .map(|c| record.value_at(c.index).map(render_value).unwrap_or_default())
            .collect();

        if self.rows_in_table == 0 {
            for (column, cell) in self.columns.iter_mut().zip(&cells) {
                column.width = column.width.max(cell.chars().count());
            }
            self.write_header();
        }

        let line = self
            .columns
            .iter()
            .zip(&cells)
            .map(|(column, cell)| fit(cell, column.width))
            .collect::<Vec<_>>()
            .join(GUTTER);
        writeln!(self.out, "{line}");
        self.rows_in_table += 1;
    }

    fn write_header(&mut self) {
        let labels = self
            .columns
            .iter()
            .map(|c| format!("{:>width$}", c.label, width = c.width))
            .collect::<Vec<_>>()
            .join(GUTTER);
        let dashes = self
            .columns
            .iter()
            .map(|c| "-".repeat(c.width))
            .collect::<Vec<_>>()
            .join(GUTTER);
        writeln!(self.out, "{labels}");
        writeln!(self.out, "{dashes}");
    }
}
