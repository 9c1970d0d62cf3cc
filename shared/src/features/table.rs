//! Column-oriented table of daily features

use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::ops::Range;

use crate::error::FeatureError;
use crate::models::DailyFeatureRecord;

/// Named column of nullable values
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Date-ordered table with one row per target date.
///
/// Nulls are explicit (`None`). Filling happens in separate passes:
/// [`FeatureTable::forward_fill`], [`FeatureTable::backward_fill`] and finally
/// zero-filling on the selected [`FeatureMatrix`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureTable {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl FeatureTable {
    /// Assemble a table from records already in date order
    pub fn from_records(records: &[DailyFeatureRecord]) -> Self {
        let dates = records.iter().map(|r| r.date).collect();
        let rows: Vec<Vec<Option<f64>>> = records.iter().map(|r| r.values()).collect();

        let columns = DailyFeatureRecord::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, name)| Column {
                name: (*name).to_string(),
                values: rows.iter().map(|row| row[i]).collect(),
            })
            .collect();

        Self { dates, columns }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        self.column(name).and_then(|values| values.get(row).copied().flatten())
    }

    /// Append a derived column; names are unique
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), FeatureError> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(FeatureError::DuplicateColumn(name));
        }
        if values.len() != self.len() {
            return Err(FeatureError::LengthMismatch {
                column: name,
                expected: self.len(),
                found: values.len(),
            });
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Replace the values of an existing column
    pub fn replace_column(
        &mut self,
        name: &str,
        values: Vec<Option<f64>>,
    ) -> Result<(), FeatureError> {
        let expected = self.len();
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| FeatureError::MissingColumn(name.to_string()))?;
        if values.len() != expected {
            return Err(FeatureError::LengthMismatch {
                column: name.to_string(),
                expected,
                found: values.len(),
            });
        }
        column.values = values;
        Ok(())
    }

    /// Values of `name` moved down by `periods` rows, leading rows null
    pub fn shifted(&self, name: &str, periods: usize) -> Result<Vec<Option<f64>>, FeatureError> {
        let values = self
            .column(name)
            .ok_or_else(|| FeatureError::MissingColumn(name.to_string()))?;
        Ok((0..values.len())
            .map(|row| row.checked_sub(periods).and_then(|src| values[src]))
            .collect())
    }

    /// Copy the last non-null value downwards in every column
    pub fn forward_fill(&mut self) {
        for column in &mut self.columns {
            let mut last = None;
            for value in &mut column.values {
                if value.is_some() {
                    last = *value;
                } else {
                    *value = last;
                }
            }
        }
    }

    /// Copy the next non-null value upwards in every column
    pub fn backward_fill(&mut self) {
        for column in &mut self.columns {
            let mut next = None;
            for value in column.values.iter_mut().rev() {
                if value.is_some() {
                    next = *value;
                } else {
                    *value = next;
                }
            }
        }
    }

    /// Forward fill, then backward fill: earlier rows only borrow from later
    /// rows when nothing earlier exists.
    pub fn fill_gaps(&mut self) {
        self.forward_fill();
        self.backward_fill();
    }

    /// Copy of the rows in `range`
    pub fn slice_rows(&self, range: Range<usize>) -> FeatureTable {
        let end = range.end.min(self.len());
        let range = range.start.min(end)..end;
        FeatureTable {
            dates: self.dates[range.clone()].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: c.values[range.clone()].to_vec(),
                })
                .collect(),
        }
    }

    /// Project the table onto `names`, in that order
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<FeatureMatrix, FeatureError> {
        let columns = names
            .iter()
            .map(|name| {
                self.column(name.as_ref())
                    .ok_or_else(|| FeatureError::MissingColumn(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rows = (0..self.len())
            .map(|row| columns.iter().map(|values| values[row]).collect())
            .collect();

        Ok(FeatureMatrix {
            dates: self.dates.clone(),
            columns: names.iter().map(|n| n.as_ref().to_string()).collect(),
            rows,
        })
    }
}

/// Row-major model input taken from a [`FeatureTable`]
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<f64>>>,
}

impl FeatureMatrix {
    /// Dense rows with remaining nulls replaced by zero
    pub fn zero_filled(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|v| v.unwrap_or(0.0)).collect())
            .collect()
    }

    /// One JSON object per row keyed by column name, for logging
    pub fn to_json_records(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .zip(&self.dates)
                .map(|(row, date)| {
                    let mut record = Map::new();
                    record.insert("date".to_string(), Value::String(date.to_string()));
                    for (name, value) in self.columns.iter().zip(row) {
                        record.insert(name.clone(), value.map(Value::from).unwrap_or(Value::Null));
                    }
                    Value::Object(record)
                })
                .collect(),
        )
    }
}
