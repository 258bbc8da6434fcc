//! Row-oriented in-memory table used by the grouped response estimator.
//!
//! Each row maps column names to cells. Tables deserialize from JSON records
//! (`[{"r": -2, "s": 0, "date": "2024-01-02"}, ...]`) so callers can hand over
//! whatever their loader produced without a bespoke schema.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PropagatorError, Result};

/// Default name of the column that keys groups (one group per trading day).
pub const DEFAULT_GROUP_COLUMN: &str = "date";

/// A single table cell.
///
/// Untagged so JSON numbers become `Number`, ISO dates become `Date` and any
/// other string becomes `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// Ordered key identifying a group of rows.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GroupKey {
    Int(i64),
    Date(NaiveDate),
    Text(String),
}

impl GroupKey {
    fn from_cell(cell: &Cell, column: &str, row: usize) -> Result<Self> {
        match cell {
            Cell::Number(v) if v.is_finite() && v.fract() == 0.0 => Ok(GroupKey::Int(*v as i64)),
            Cell::Number(v) => Err(PropagatorError::InvalidCell {
                column: column.to_string(),
                row,
                reason: format!("group keys must be integers, dates or labels, got {v}"),
            }),
            Cell::Date(d) => Ok(GroupKey::Date(*d)),
            Cell::Text(s) => Ok(GroupKey::Text(s.clone())),
        }
    }
}

pub type Row = BTreeMap<String, Cell>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from named columns of equal length.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Cell>)>,
        S: Into<String>,
    {
        let columns: Vec<(String, Vec<Cell>)> =
            columns.into_iter().map(|(name, cells)| (name.into(), cells)).collect();
        let n = columns.first().map(|(_, cells)| cells.len()).unwrap_or(0);
        for (_, cells) in &columns {
            crate::error::ensure_len("table column", n, cells.len())?;
        }

        let mut rows = vec![Row::new(); n];
        for (name, cells) in columns {
            for (row, cell) in rows.iter_mut().zip(cells) {
                row.insert(name.clone(), cell);
            }
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn cell(&self, row: usize, column: &str) -> Result<&Cell> {
        self.rows[row]
            .get(column)
            .ok_or_else(|| PropagatorError::MissingColumn(format!("{column} (row {row})")))
    }

    /// Read one column as floats, in row order.
    pub fn numeric_column(&self, column: &str) -> Result<Vec<f64>> {
        (0..self.rows.len())
            .map(|row| match self.cell(row, column)? {
                Cell::Number(v) => Ok(*v),
                other => Err(PropagatorError::InvalidCell {
                    column: column.to_string(),
                    row,
                    reason: format!("expected a number, got {other:?}"),
                }),
            })
            .collect()
    }

    /// Row indices per group, groups ordered by key, rows in table order.
    pub fn group_rows(&self, group_col: &str) -> Result<BTreeMap<GroupKey, Vec<usize>>> {
        let mut groups: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
        for row in 0..self.rows.len() {
            let key = GroupKey::from_cell(self.cell(row, group_col)?, group_col, row)?;
            groups.entry(key).or_default().push(row);
        }
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_day_table() -> Table {
        Table::from_columns([
            ("r", vec![Cell::from(1.0), Cell::from(2.0), Cell::from(3.0)]),
            ("date", vec![Cell::from(1i64), Cell::from(0i64), Cell::from(1i64)]),
        ])
        .unwrap()
    }

    #[test]
    fn groups_are_ordered_by_key_and_keep_row_order() {
        let groups = two_day_table().group_rows("date").unwrap();
        let keys: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(keys, vec![GroupKey::Int(0), GroupKey::Int(1)]);
        assert_eq!(groups[&GroupKey::Int(1)], vec![0, 2]);
    }

    #[test]
    fn missing_and_non_numeric_columns_are_reported() {
        let table = two_day_table();
        assert!(matches!(
            table.numeric_column("s"),
            Err(PropagatorError::MissingColumn(_))
        ));

        let labels = Table::from_columns([("r", vec![Cell::from("x")])]).unwrap();
        assert!(matches!(
            labels.numeric_column("r"),
            Err(PropagatorError::InvalidCell { row: 0, .. })
        ));
    }

    #[test]
    fn fractional_group_keys_are_rejected() {
        let table = Table::from_columns([("date", vec![Cell::from(0.5)])]).unwrap();
        assert!(matches!(
            table.group_rows("date"),
            Err(PropagatorError::InvalidCell { .. })
        ));
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = Table::from_columns([
            ("r", vec![Cell::from(1.0)]),
            ("s", vec![Cell::from(1.0), Cell::from(0.0)]),
        ])
        .unwrap_err();
        assert!(matches!(err, PropagatorError::ShapeMismatch { .. }));
    }
}
