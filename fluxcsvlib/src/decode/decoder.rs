//! Streaming decoder for annotated CSV.
//!
//! The stream interleaves annotation blocks and data rows:
//!
//! ```text
//! #datatype,string,long,dateTime:RFC3339,double,string
//! #group,false,false,false,false,true
//! #default,_result,,,,
//! ,result,table,_time,_value,_field
//! ,,0,2020-02-17T22:19:49.747562847Z,10,f
//! ,,1,2020-02-18T22:19:49.747562847Z,20,g
//! ```
//!
//! Each row's first cell classifies it. `#`-prefixed rows annotate the
//! columns of the table that follows; an empty first cell marks either the
//! name row closing an annotation block, a data row, or the payload of an
//! `error` pseudo-table. A new annotation block may start after any data row
//! and replaces the table shape wholesale.
//!
//! [`Decoder::advance`] pulls rows until it can yield one [`Record`], and
//! reports whether the result, the table, or the annotations changed with it.

use std::mem;
use std::rc::Rc;

use csv::StringRecord;
use tracing::{debug, trace};

use crate::data::column::{Column, DataType};
use crate::data::record::Record;
use crate::data::schema::{CellSlot, TableSchema};
use crate::data::value::Value;
use crate::error::FluxCsvError;
use crate::source::Source;
use crate::Result;

/// What the next row with an empty first cell means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Between tables; rows are data rows
    Normal,
    /// Inside an annotation block
    Annotation,
    /// Expecting the name row
    Name,
    /// The name row announced an `error` pseudo-table
    Error,
}

/// Pull-based decoder over a [`Source`].
///
/// The decoder owns its source and closes it exactly once: at end of
/// stream, on the first error, on [`Decoder::close`], or when dropped.
///
/// Records share their [`TableSchema`] through `Rc`, so the decoder is not
/// `Send`; callers needing cross-thread access must decode on one thread.
pub struct Decoder<S: Source> {
    reader: csv::Reader<S>,
    state: ParseState,
    pending: Vec<Column>,
    schema: Option<Rc<TableSchema>>,
    record: Option<Record>,
    last_result: Option<String>,
    last_table: Option<i64>,
    result_changed: bool,
    table_changed: bool,
    annotations_changed: bool,
    error: Option<FluxCsvError>,
    closed: bool,
}

impl<S: Source> Decoder<S> {
    /// Create a decoder reading from `source`.
    pub fn new(source: S) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(source);

        Self {
            reader,
            state: ParseState::Normal,
            pending: Vec::new(),
            schema: None,
            record: None,
            last_result: None,
            last_table: None,
            result_changed: false,
            table_changed: false,
            annotations_changed: false,
            error: None,
            closed: false,
        }
    }

    /// Decode the next record.
    ///
    /// Returns `false` at end of stream or on the first error; the error is
    /// then available from [`Decoder::last_error`]. Once `false` has been
    /// returned, every later call returns `false` without reading.
    pub fn advance(&mut self) -> bool {
        self.record = None;
        self.result_changed = false;
        self.table_changed = false;
        self.annotations_changed = false;

        if self.closed || self.error.is_some() {
            return false;
        }

        match self.next_record() {
            Ok(Some(record)) => {
                self.result_changed = self.last_result.as_deref() != Some(record.result());
                self.table_changed = self.last_table != Some(record.table_id());
                if self.result_changed {
                    self.last_result = Some(record.result().to_string());
                }
                self.last_table = Some(record.table_id());
                self.record = Some(record);
                true
            }
            Ok(None) => {
                trace!("end of stream");
                self.shutdown(None);
                false
            }
            Err(err) => {
                debug!(error = %err, "decoding failed");
                self.shutdown(Some(err));
                false
            }
        }
    }

    /// The record produced by the last successful [`Decoder::advance`].
    pub fn current_record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    /// Take ownership of the current record.
    pub fn take_record(&mut self) -> Option<Record> {
        self.record.take()
    }

    /// Whether the current record's result name differs from the previous
    /// record's (always true for the first record).
    pub fn current_result_changed(&self) -> bool {
        self.result_changed
    }

    /// Whether the current record's table id differs from the previous
    /// record's (always true for the first record).
    pub fn current_table_changed(&self) -> bool {
        self.table_changed
    }

    /// Whether a new annotation block was read before the current record.
    pub fn current_annotations_changed(&self) -> bool {
        self.annotations_changed
    }

    /// The table shape of the most recent completed annotation block.
    pub fn schema(&self) -> Option<&Rc<TableSchema>> {
        self.schema.as_ref()
    }

    /// The error that stopped decoding, if any.
    pub fn last_error(&self) -> Option<&FluxCsvError> {
        self.error.as_ref()
    }

    /// Take the error that stopped decoding.
    ///
    /// The decoder stays stopped afterwards.
    pub fn take_error(&mut self) -> Option<FluxCsvError> {
        let err = self.error.take();
        if err.is_some() {
            self.closed = true;
        }
        err
    }

    /// Close the source. Later calls to [`Decoder::advance`] return `false`.
    ///
    /// Closing twice is a no-op.
    pub fn close(&mut self) -> Result<()> {
        self.record = None;
        self.close_source()
    }

    fn close_source(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.reader.get_mut().close()?;
        Ok(())
    }

    fn shutdown(&mut self, pending: Option<FluxCsvError>) {
        self.record = None;
        self.error = match (self.close_source(), pending) {
            (Err(close), Some(decode)) => Some(FluxCsvError::Combined {
                close: Box::new(close),
                decode: Box::new(decode),
            }),
            (Err(close), None) => Some(close),
            (Ok(()), pending) => pending,
        };
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        let mut row = StringRecord::new();
        let mut datatype_seen = false;

        loop {
            if !self.reader.read_record(&mut row)? {
                return Ok(None);
            }
            if row.len() <= 1 {
                continue;
            }

            let marker = &row[0];
            if marker.starts_with('#') && self.state == ParseState::Normal {
                self.begin_annotations(row.len() - 1);
            }
            self.check_width(&row)?;

            match marker {
                "#datatype" => {
                    for (column, token) in self.pending.iter_mut().zip(row.iter().skip(1)) {
                        column.data_type = token.parse::<DataType>()?;
                    }
                    datatype_seen = true;
                }
                "#group" => {
                    for (column, flag) in self.pending.iter_mut().zip(row.iter().skip(1)) {
                        column.is_group = flag == "true";
                    }
                }
                "#default" => {
                    for (column, value) in self.pending.iter_mut().zip(row.iter().skip(1)) {
                        column.default_value = value.to_string();
                    }
                }
                // Unknown annotations are counted but otherwise ignored so
                // newer servers can add their own.
                m if m.starts_with('#') => trace!(annotation = m, "ignoring annotation"),
                "" => match self.state {
                    ParseState::Annotation => {
                        if !datatype_seen {
                            return Err(FluxCsvError::DatatypeNotFound);
                        }
                        self.state = ParseState::Name;
                        self.read_name_row(&row);
                    }
                    ParseState::Name => self.read_name_row(&row),
                    ParseState::Error => {
                        return Err(FluxCsvError::query_runtime(
                            row.get(1).unwrap_or(""),
                            row.get(2),
                        ));
                    }
                    ParseState::Normal => return self.build_record(&row).map(Some),
                },
                other => return Err(FluxCsvError::UnexpectedRowMarker(other.to_string())),
            }
        }
    }

    fn begin_annotations(&mut self, width: usize) {
        debug!(columns = width, "annotation block started");
        self.pending = vec![Column::new(); width];
        self.state = ParseState::Annotation;
        self.annotations_changed = true;
    }

    /// Number of cells (after the marker) every row must carry right now.
    fn column_count(&self) -> usize {
        match self.state {
            ParseState::Normal => self.schema.as_ref().map_or(0, |s| s.width()),
            _ => self.pending.len(),
        }
    }

    fn check_width(&self, row: &StringRecord) -> Result<()> {
        let expected = self.column_count();
        if expected == 0 {
            return Err(FluxCsvError::AnnotationsNotFound);
        }
        let found = row.len() - 1;
        if found != expected {
            return Err(FluxCsvError::ColumnCount { found, expected });
        }
        Ok(())
    }

    fn read_name_row(&mut self, row: &StringRecord) {
        if row.get(1) == Some("error") {
            debug!("error table announced");
            self.state = ParseState::Error;
            return;
        }

        let mut columns = mem::take(&mut self.pending);
        for (column, name) in columns.iter_mut().zip(row.iter().skip(1)) {
            column.name = name.to_string();
        }
        let schema = TableSchema::from_columns(columns);
        debug!(
            columns = schema.columns().len(),
            group_keys = ?schema.group_key_names(),
            "table schema finalized"
        );
        self.schema = Some(Rc::new(schema));
        self.state = ParseState::Normal;
    }

    fn build_record(&self, row: &StringRecord) -> Result<Record> {
        let schema = self
            .schema
            .as_ref()
            .ok_or(FluxCsvError::AnnotationsNotFound)?;

        let mut values = vec![Value::Null; schema.columns().len()];
        let mut result_cell = "";
        let mut table_cell = "";
        for (slot, cell) in schema.slots().iter().zip(row.iter().skip(1)) {
            match *slot {
                CellSlot::Result => result_cell = cell,
                CellSlot::Table => table_cell = cell,
                CellSlot::Column(index) => {
                    let column = &schema.columns()[index];
                    let text = if cell.is_empty() {
                        column.default_value.as_str()
                    } else {
                        cell
                    };
                    values[index] = Value::coerce(text, column)?;
                }
            }
        }

        let result = if result_cell.is_empty() {
            schema
                .result_column()
                .map(|c| c.default_value.clone())
                .unwrap_or_default()
        } else {
            result_cell.to_string()
        };
        let table_id = resolve_table_id(schema, table_cell)?;

        trace!(result = %result, table = table_id, "record decoded");
        Ok(Record::new(Rc::clone(schema), result, table_id, values))
    }
}

/// The row's table id, falling back to the `table` column default.
fn resolve_table_id(schema: &TableSchema, cell: &str) -> Result<i64> {
    let text = if cell.is_empty() {
        schema
            .table_column()
            .map(|c| c.default_value.as_str())
            .unwrap_or("")
    } else {
        cell
    };
    if text.is_empty() {
        return Ok(0);
    }
    text.parse()
        .map_err(|_| FluxCsvError::InvalidTableId(text.to_string()))
}

impl<S: Source> Iterator for Decoder<S> {
    type Item = Result<Record>;

    /// Yields records until end of stream; a decode error is yielded once,
    /// after which the iterator is exhausted.
    fn next(&mut self) -> Option<Self::Item> {
        if self.advance() {
            return self.take_record().map(Ok);
        }
        self.take_error().map(Err)
    }
}

impl<S: Source> Drop for Decoder<S> {
    fn drop(&mut self) {
        if let Err(err) = self.close_source() {
            debug!(error = %err, "closing source on drop failed");
        }
    }
}
