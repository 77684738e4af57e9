//! Loading a return or price column from a delimited file.

use chrono::NaiveDate;
use hindcast::data::{MissingPolicy, ReturnKind, ReturnSeries, RiskError, SeriesIndex};
use hindcast::data::{log_returns, simple_returns};
use log::debug;
use std::io;
use std::path::Path;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while reading input.
#[derive(Debug, Error)]
pub(crate) enum InputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column `{0}` not found in header")]
    MissingColumn(String),

    #[error("row {row}: `{value}` is not a number")]
    BadNumber { row: usize, value: String },

    #[error("row {row}: `{value}` is not a YYYY-MM-DD date")]
    BadDate { row: usize, value: String },

    #[error("no data rows")]
    Empty,

    #[error(transparent)]
    Risk(#[from] RiskError),
}

/// One numeric column and its index, as read from the file.
#[derive(Debug)]
pub(crate) struct Column {
    pub(crate) index: SeriesIndex,
    pub(crate) values: Vec<f64>,
}

impl Column {
    /// Read `column` (and optionally `date_column`) from a CSV file with a header row.
    pub(crate) fn from_path(
        path: &Path,
        column: &str,
        date_column: Option<&str>,
    ) -> Result<Self, InputError> {
        let reader = csv::Reader::from_path(path)?;
        Self::read(reader, column, date_column)
    }

    fn read<R: io::Read>(
        mut reader: csv::Reader<R>,
        column: &str,
        date_column: Option<&str>,
    ) -> Result<Self, InputError> {
        let headers = reader.headers()?.clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| InputError::MissingColumn(name.to_string()))
        };
        let value_at = find(column)?;
        let date_at = date_column.map(find).transpose()?;

        let mut values = Vec::new();
        let mut dates = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            // Header is line 1
            let row = i + 2;

            let cell = record.get(value_at).unwrap_or("").trim();
            let value = if cell.is_empty() {
                f64::NAN
            } else {
                cell.parse::<f64>().map_err(|_| InputError::BadNumber {
                    row,
                    value: cell.to_string(),
                })?
            };
            values.push(value);

            if let Some(at) = date_at {
                let cell = record.get(at).unwrap_or("").trim();
                let date = NaiveDate::parse_from_str(cell, DATE_FORMAT).map_err(|_| {
                    InputError::BadDate {
                        row,
                        value: cell.to_string(),
                    }
                })?;
                dates.push(date);
            }
        }

        if values.is_empty() {
            return Err(InputError::Empty);
        }
        debug!("read {} rows of `{column}`", values.len());

        let index = if date_at.is_some() {
            SeriesIndex::Dates(dates)
        } else {
            SeriesIndex::periods(values.len())
        };
        Ok(Self { index, values })
    }

    /// Treat the column as periodic returns; empty cells are missing.
    pub(crate) fn into_returns(self) -> Result<ReturnSeries, InputError> {
        Ok(ReturnSeries::with_policy(
            self.index,
            self.values,
            MissingPolicy::Exclude,
        )?)
    }

    /// Treat the column as prices and convert to returns of `kind`.
    pub(crate) fn into_returns_from_prices(
        self,
        kind: ReturnKind,
    ) -> Result<ReturnSeries, InputError> {
        let series = match kind {
            ReturnKind::Simple => simple_returns(&self.index, &self.values)?,
            ReturnKind::Log => log_returns(&self.index, &self.values)?,
        };
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(data: &str, column: &str, date_column: Option<&str>) -> Result<Column, InputError> {
        Column::read(csv::Reader::from_reader(data.as_bytes()), column, date_column)
    }

    #[test]
    fn test_dated_column() {
        let data = "date,ret\n2024-01-02,0.01\n2024-01-03,\n2024-01-04,-0.02\n";
        let column = read(data, "ret", Some("date")).unwrap();
        assert_eq!(column.index.len(), 3);
        assert!(matches!(column.index, SeriesIndex::Dates(_)));
        assert!(column.values[1].is_nan());

        let series = column.into_returns().unwrap();
        assert_eq!(series.missing_count(), 1);
        assert_eq!(series.get(2), Some(-0.02));
    }

    #[test]
    fn test_period_index_without_dates() {
        let column = read("price\n100\n101\n99\n", "price", None).unwrap();
        assert_eq!(column.index, SeriesIndex::periods(3));

        let series = column.into_returns_from_prices(ReturnKind::Log).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.kind(), ReturnKind::Log);
    }

    #[test]
    fn test_missing_column() {
        assert!(matches!(
            read("a,b\n1,2\n", "c", None),
            Err(InputError::MissingColumn(name)) if name == "c"
        ));
    }

    #[test]
    fn test_bad_cells() {
        assert!(matches!(
            read("ret\n0.01\nabc\n", "ret", None),
            Err(InputError::BadNumber { row: 3, .. })
        ));
        assert!(matches!(
            read("d,ret\n01/02/2024,0.01\n", "ret", Some("d")),
            Err(InputError::BadDate { row: 2, .. })
        ));
    }

    #[test]
    fn test_unordered_dates_rejected() {
        let data = "date,ret\n2024-01-03,0.01\n2024-01-02,0.02\n";
        let column = read(data, "ret", Some("date")).unwrap();
        assert!(matches!(
            column.into_returns(),
            Err(InputError::Risk(RiskError::Validation(_)))
        ));
    }
}
