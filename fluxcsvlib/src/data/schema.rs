//! Frozen table shapes.
//!
//! A [`TableSchema`] is built once per annotation block, when the name row
//! arrives, and is never changed afterwards. The decoder shares it between
//! all records of the same shape and replaces it wholesale when a new
//! annotation block starts.

use serde::Serialize;

use super::column::{Column, RESULT_COLUMN, TABLE_COLUMN};

/// Where one raw cell of a data row goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellSlot {
    Result,
    Table,
    Column(usize),
}

/// Column layout shared by every record of one table shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    columns: Vec<Column>,
    group_key_names: Vec<String>,
    result_column: Option<Column>,
    table_column: Option<Column>,
    #[serde(skip)]
    slots: Vec<CellSlot>,
}

impl TableSchema {
    /// Freeze a fully annotated and named column set.
    ///
    /// The `result` and `table` pseudo-columns are split out of the regular
    /// columns. If either name repeats, the last occurrence defines it.
    pub fn from_columns(all: Vec<Column>) -> Self {
        let mut columns = Vec::with_capacity(all.len());
        let mut result_column = None;
        let mut table_column = None;
        let mut slots = Vec::with_capacity(all.len());

        for column in all {
            match column.name.as_str() {
                RESULT_COLUMN => {
                    slots.push(CellSlot::Result);
                    result_column = Some(column);
                }
                TABLE_COLUMN => {
                    slots.push(CellSlot::Table);
                    table_column = Some(column);
                }
                _ => {
                    slots.push(CellSlot::Column(columns.len()));
                    columns.push(column);
                }
            }
        }

        let group_key_names = columns
            .iter()
            .filter(|c| c.is_group)
            .map(|c| c.name.clone())
            .collect();

        Self {
            columns,
            group_key_names,
            result_column,
            table_column,
            slots,
        }
    }

    /// Regular columns in declaration order, pseudo-columns excluded.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a regular column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Position of a regular column by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Names of the group key columns, in declaration order.
    pub fn group_key_names(&self) -> &[String] {
        &self.group_key_names
    }

    pub fn result_column(&self) -> Option<&Column> {
        self.result_column.as_ref()
    }

    pub fn table_column(&self) -> Option<&Column> {
        self.table_column.as_ref()
    }

    /// Number of raw cells (after the leading marker cell) a row must carry.
    pub fn width(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn slots(&self) -> &[CellSlot] {
        &self.slots
    }
}
