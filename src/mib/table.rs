//! Dynamic managed tables: a column access schema plus ordered rows of
//! string cells.
//!
//! A table is a plain value rebuilt from the owning aggregate's entities on
//! each registration, never a shared mutable builder.

use super::oid::Oid;
use super::scalar::Access;

/// A dynamic managed table.
///
/// Row order is insertion order; it matters for presentation but not for
/// correctness.
#[derive(Debug, Clone)]
pub struct MoTable {
    base: Oid,
    columns: Vec<Access>,
    rows: Vec<Vec<String>>,
}

impl MoTable {
    /// Creates an empty table under `base` with the given per-column access
    /// modes (column indices start at 1 on the wire).
    pub fn new(base: Oid, columns: Vec<Access>) -> Self {
        Self {
            base,
            columns,
            rows: Vec::new(),
        }
    }

    /// Returns the table's base identifier.
    pub fn base(&self) -> &Oid {
        &self.base
    }

    /// Returns the number of columns in the schema.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the access mode of the 1-based column `index`, if present.
    pub fn column_access(&self, index: usize) -> Option<Access> {
        index
            .checked_sub(1)
            .and_then(|i| self.columns.get(i))
            .copied()
    }

    /// Appends one row of cells in fixed column order.
    ///
    /// # Panics
    ///
    /// Panics if the cell count does not match the column schema.
    pub fn push_row(&mut self, cells: Vec<String>) {
        assert_eq!(
            cells.len(),
            self.columns.len(),
            "row arity must match the column schema of {}",
            self.base
        );
        self.rows.push(cells);
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the rows in insertion order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mib::oid;

    fn flat_schema() -> MoTable {
        MoTable::new(
            Oid::new(oid::FLAT_TABLE_BASE),
            vec![
                Access::ReadOnly,
                Access::ReadWrite,
                Access::ReadWrite,
                Access::ReadWrite,
                Access::ReadWrite,
            ],
        )
    }

    #[test]
    fn rows_keep_insertion_order() {
        let mut table = flat_schema();
        table.push_row(vec!["FlatNo_1".into(), "30".into(), "15".into(), "5".into(), "10".into()]);
        table.push_row(vec!["FlatNo_2".into(), "28".into(), "14".into(), "4".into(), "10".into()]);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0][0], "FlatNo_1");
        assert_eq!(table.rows()[1][0], "FlatNo_2");
    }

    #[test]
    fn column_access_is_one_based() {
        let table = flat_schema();
        assert_eq!(table.column_access(1), Some(Access::ReadOnly));
        assert_eq!(table.column_access(5), Some(Access::ReadWrite));
        assert_eq!(table.column_access(0), None);
        assert_eq!(table.column_access(6), None);
    }

    #[test]
    #[should_panic(expected = "row arity")]
    fn short_row_is_rejected() {
        let mut table = flat_schema();
        table.push_row(vec!["FlatNo_1".into(), "30".into()]);
    }
}
