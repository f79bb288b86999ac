//! An in-memory table of optional text cells with the column-wise
//! primitives the pipeline chains together: drop, filter, rename, map,
//! derive, full outer join and partition.
//!
//! Every operation borrows its input and returns a fresh table. A column
//! lookup that fails is reported as [`PipelineError::MissingColumn`] so that
//! upstream schema changes abort the run instead of producing wrong output.

use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::io::Read;

use crate::error::{PipelineError, Result};

/// A single cell. `None` marks an absent value and is written as an empty field.
pub type Cell = Option<String>;

const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        if let Some(pos) = rows.iter().position(|r| r.len() != columns.len()) {
            return Err(PipelineError::Parse(format!(
                "row {} has {} cells, expected {}",
                pos,
                rows[pos].len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Read a headed CSV document. Empty fields become absent cells.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let columns: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches(BYTE_ORDER_MARK).to_string())
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|field| (!field.is_empty()).then(|| field.to_string()))
                    .collect(),
            );
        }
        Self::new(columns, rows)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r[idx].as_deref()).collect())
    }

    /// Remove the listed columns. Consumes the table so cells are moved,
    /// not copied.
    pub fn drop_columns(self, names: &[&str]) -> Result<Table> {
        let mut dropped = HashSet::new();
        for name in names {
            dropped.insert(self.column_index(name)?);
        }
        let kept = |i: &usize| !dropped.contains(i);

        let columns = self
            .columns
            .into_iter()
            .enumerate()
            .filter(|(i, _)| kept(i))
            .map(|(_, c)| c)
            .collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .enumerate()
                    .filter(|(i, _)| kept(i))
                    .map(|(_, c)| c)
                    .collect()
            })
            .collect();
        Ok(Table { columns, rows })
    }

    /// Remove every row whose `column` equals `value`.
    pub fn drop_rows_where(self, column: &str, value: &str) -> Result<Table> {
        let idx = self.column_index(column)?;
        let mut rows = self.rows;
        rows.retain(|row| row[idx].as_deref() != Some(value));
        Ok(Table {
            columns: self.columns,
            rows,
        })
    }

    /// Keep rows matching every `(column, value)` predicate exactly.
    pub fn filter_eq(&self, predicates: &[(&str, &str)]) -> Result<Table> {
        let mut resolved = Vec::with_capacity(predicates.len());
        for (col, val) in predicates {
            resolved.push((self.column_index(col)?, *val));
        }
        Ok(self.retain(|row| {
            resolved
                .iter()
                .all(|(idx, val)| row[*idx].as_deref() == Some(*val))
        }))
    }

    pub fn rename_columns(mut self, renames: &[(&str, &str)]) -> Result<Table> {
        for (from, to) in renames {
            let idx = self.column_index(from)?;
            self.columns[idx] = to.to_string();
        }
        Ok(self)
    }

    /// Rewrite every cell of `name` through `f`.
    pub fn map_column<F>(&self, name: &str, f: F) -> Result<Table>
    where
        F: Fn(Option<&str>) -> Cell,
    {
        let idx = self.column_index(name)?;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row[idx] = f(row[idx].as_deref());
                row
            })
            .collect();
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Set column `name` from the value of `source` in the same row. The
    /// column is appended, or overwritten in place if it already exists.
    pub fn with_derived_column<F>(&self, name: &str, source: &str, f: F) -> Result<Table>
    where
        F: Fn(Option<&str>) -> Result<Cell>,
    {
        let src = self.column_index(source)?;
        let existing = self.columns.iter().position(|c| c == name);

        let mut columns = self.columns.clone();
        if existing.is_none() {
            columns.push(name.to_string());
        }

        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let derived = f(row[src].as_deref())?;
            let mut row = row.clone();
            match existing {
                Some(idx) => row[idx] = derived,
                None => row.push(derived),
            }
            rows.push(row);
        }
        Ok(Table { columns, rows })
    }

    /// Full outer join on `keys`.
    ///
    /// Output columns are the left columns in their original order followed
    /// by the right non-key columns. Non-key columns present on both sides
    /// are disambiguated with `suffixes`. Left rows come first (each paired
    /// with every matching right row), then right rows with no match.
    pub fn outer_join(&self, right: &Table, keys: &[&str], suffixes: (&str, &str)) -> Result<Table> {
        let left_keys = keys
            .iter()
            .map(|k| self.column_index(k))
            .collect::<Result<Vec<_>>>()?;
        let right_keys = keys
            .iter()
            .map(|k| right.column_index(k))
            .collect::<Result<Vec<_>>>()?;

        let left_rest: Vec<usize> = (0..self.columns.len())
            .filter(|i| !left_keys.contains(i))
            .collect();
        let right_rest: Vec<usize> = (0..right.columns.len())
            .filter(|i| !right_keys.contains(i))
            .collect();

        let left_names: HashSet<&str> = left_rest.iter().map(|&i| self.columns[i].as_str()).collect();
        let right_names: HashSet<&str> = right_rest.iter().map(|&i| right.columns[i].as_str()).collect();

        let mut columns: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if !left_keys.contains(&i) && right_names.contains(c.as_str()) {
                    format!("{}{}", c, suffixes.0)
                } else {
                    c.clone()
                }
            })
            .collect();
        columns.extend(right_rest.iter().map(|&i| {
            let c = &right.columns[i];
            if left_names.contains(c.as_str()) {
                format!("{}{}", c, suffixes.1)
            } else {
                c.clone()
            }
        }));

        let key_of = |row: &[Cell], idxs: &[usize]| -> Vec<Cell> {
            idxs.iter().map(|&i| row[i].clone()).collect()
        };

        let mut right_index: HashMap<Vec<Cell>, Vec<usize>> = HashMap::new();
        for (pos, row) in right.rows.iter().enumerate() {
            right_index
                .entry(key_of(row, &right_keys))
                .or_default()
                .push(pos);
        }

        let mut matched_right = vec![false; right.rows.len()];
        let mut rows = Vec::new();

        for left_row in &self.rows {
            let key = key_of(left_row, &left_keys);
            match right_index.get(&key) {
                Some(positions) => {
                    for &pos in positions {
                        matched_right[pos] = true;
                        let mut row = left_row.clone();
                        row.extend(right_rest.iter().map(|&i| right.rows[pos][i].clone()));
                        rows.push(row);
                    }
                }
                None => {
                    let mut row = left_row.clone();
                    row.extend(std::iter::repeat(None).take(right_rest.len()));
                    rows.push(row);
                }
            }
        }

        for (pos, right_row) in right.rows.iter().enumerate() {
            if matched_right[pos] {
                continue;
            }
            let mut row: Vec<Cell> = vec![None; self.columns.len()];
            for (k, &li) in left_keys.iter().enumerate() {
                row[li] = right_row[right_keys[k]].clone();
            }
            row.extend(right_rest.iter().map(|&i| right_row[i].clone()));
            rows.push(row);
        }

        Table::new(columns, rows)
    }

    /// Distinct values of `column` in first-seen order.
    pub fn distinct(&self, column: &str) -> Result<Vec<Cell>> {
        let idx = self.column_index(column)?;
        let mut seen = HashSet::new();
        Ok(self
            .rows
            .iter()
            .filter(|row| seen.insert(row[idx].clone()))
            .map(|row| row[idx].clone())
            .collect())
    }

    /// One sub-table per distinct value of `column`, in first-seen order.
    pub fn partition_by(&self, column: &str) -> Result<Vec<(Cell, Table)>> {
        let idx = self.column_index(column)?;
        Ok(self
            .distinct(column)?
            .into_iter()
            .map(|value| {
                let part = self.retain(|row| row[idx] == value);
                (value, part)
            })
            .collect())
    }

    /// Deserialize every row into `T`, matching fields by column name.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let headers = csv::StringRecord::from(self.columns.clone());
        self.rows
            .iter()
            .map(|row| {
                let record: csv::StringRecord =
                    row.iter().map(|c| c.as_deref().unwrap_or("")).collect();
                Ok(record.deserialize(Some(&headers))?)
            })
            .collect()
    }

    fn retain<F>(&self, keep: F) -> Table
    where
        F: Fn(&[Cell]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r.as_slice())).cloned().collect(),
        }
    }
}

#[cfg(test)]
pub(crate) fn table_of(columns: &[&str], rows: &[&[&str]]) -> Table {
    Table::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|r| {
                r.iter()
                    .map(|v| (!v.is_empty()).then(|| v.to_string()))
                    .collect()
            })
            .collect(),
    )
    .unwrap()
}
