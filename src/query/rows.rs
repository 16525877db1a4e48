//! In-memory rows of a metadata result set.

use super::{write_row, RowWrite};
use crate::app::ColumnBindingMap;
use crate::error::StatementError;
use serde_json::Value;

#[derive(Debug, Default)]
pub(crate) struct RowSet {
    rows: Vec<Vec<Value>>,
    position: usize,
    executed: bool,
}

impl RowSet {
    pub(crate) fn load(&mut self, rows: Vec<Vec<Value>>) {
        self.rows = rows;
        self.position = 0;
        self.executed = true;
    }

    pub(crate) fn is_executed(&self) -> bool {
        self.executed
    }

    pub(crate) fn fetch_into(
        &mut self,
        columns: &ColumnBindingMap,
    ) -> Result<Option<RowWrite>, StatementError> {
        if !self.executed {
            return Err(StatementError::invalid_cursor("Query was not executed."));
        }

        let Some(row) = self.rows.get(self.position) else {
            return Ok(None);
        };

        let outcome = write_row(row, columns)?;
        self.position += 1;
        Ok(Some(outcome))
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
        self.position = 0;
        self.executed = false;
    }

    pub(crate) fn data_available(&self) -> bool {
        self.executed && self.position < self.rows.len()
    }
}
