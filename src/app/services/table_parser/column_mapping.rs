//! Column resolution and row projection
//!
//! This module turns the resolved column set and an optional selection into
//! the output column list plus the row positions feeding each output column.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::{Error, Result};

/// Mapping from the file's columns to the output columns
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Full column set, from the header row or supplied explicitly
    pub columns: Vec<String>,

    /// Output column names, shared by every record of the parse
    pub output: Arc<[String]>,

    /// Row position of each output column; `None` keeps whole rows
    pub positions: Option<Vec<usize>>,
}

impl ColumnMapping {
    /// Resolve a selection against the column set
    ///
    /// Fails on duplicate column names and on selected names that are not in
    /// the column set.
    pub fn resolve(columns: Vec<String>, select: &[String], path: &Path) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(Error::duplicate_column(column.clone(), path));
            }
        }

        if select.is_empty() {
            return Ok(Self {
                output: columns.iter().cloned().collect(),
                columns,
                positions: None,
            });
        }

        let positions = select
            .iter()
            .map(|name| {
                columns
                    .iter()
                    .position(|column| column == name)
                    .ok_or_else(|| Error::column_not_found(name.clone(), path, &columns))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            output: select.iter().cloned().collect(),
            columns,
            positions: Some(positions),
        })
    }

    /// Records are named when there is at least one output column
    pub fn is_named(&self) -> bool {
        !self.output.is_empty()
    }

    /// Project a row onto the output columns
    ///
    /// A selected position beyond the end of a short row is reported as
    /// `(column, position)`.
    pub fn project(&self, fields: &[String]) -> std::result::Result<Vec<String>, (String, usize)> {
        match &self.positions {
            None => Ok(fields.to_vec()),
            Some(positions) => positions
                .iter()
                .zip(self.output.iter())
                .map(|(&position, column)| {
                    fields
                        .get(position)
                        .cloned()
                        .ok_or_else(|| (column.clone(), position))
                })
                .collect(),
        }
    }

    /// Get the output column name at a position
    pub fn output_column(&self, position: usize) -> Option<&str> {
        self.output.get(position).map(String::as_str)
    }

    /// (total columns, output columns)
    pub fn stats(&self) -> (usize, usize) {
        (self.columns.len(), self.output.len())
    }
}
