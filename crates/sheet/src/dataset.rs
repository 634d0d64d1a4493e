use crate::cell::CellValue;
use crate::normalize::{conform_record, is_blank_row, normalize_row};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// One row, keyed by header name in header order
pub type Record = IndexMap<String, CellValue>;

/// The in-memory table loaded from a workbook.
///
/// Every record carries exactly the `headers` key set, in header order. A
/// dataset is only ever built whole; there is no row-level mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "DatasetParts")]
pub struct Dataset {
    file_name: String,
    headers: Vec<String>,
    records: Vec<Record>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetParts {
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    headers: Option<Vec<String>>,
    #[serde(default)]
    records: Vec<Record>,
}

impl From<DatasetParts> for Dataset {
    fn from(parts: DatasetParts) -> Self {
        match parts.headers {
            Some(headers) => Dataset::new(parts.file_name, headers, parts.records),
            None => Dataset::from_records(parts.file_name, parts.records),
        }
    }
}

impl Dataset {
    /// Build a dataset from explicit headers, conforming every record to them
    pub fn new<S: Into<String>>(file_name: S, headers: Vec<String>, records: Vec<Record>) -> Self {
        let headers = unique_headers(headers);
        let records = records
            .iter()
            .map(|r| conform_record(r, &headers))
            .collect();
        Dataset {
            file_name: file_name.into(),
            headers,
            records,
        }
    }

    /// Build a dataset whose headers come from the keys of the first record
    pub fn from_records<S: Into<String>>(file_name: S, records: Vec<Record>) -> Self {
        let headers = records
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default();
        Dataset::new(file_name, headers, records)
    }

    /// Build a dataset from a header row and positional data rows.
    ///
    /// All-blank rows are dropped.
    pub fn from_rows<S, I>(file_name: S, header_row: Vec<String>, rows: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = Vec<CellValue>>,
    {
        let records = rows
            .into_iter()
            .filter(|row| !is_blank_row(row))
            .map(|row| normalize_row(&row, &header_row))
            .collect();

        Dataset {
            file_name: file_name.into(),
            headers: unique_headers(header_row),
            records,
        }
    }

    /// Display name of the uploaded file
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Column names in source order
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of data rows (the header row is not counted)
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a cell by row index and header name
    #[must_use]
    pub fn get(&self, row: usize, header: &str) -> Option<&CellValue> {
        self.records.get(row).and_then(|r| r.get(header))
    }
}

fn unique_headers(headers: Vec<String>) -> Vec<String> {
    headers.into_iter().collect::<IndexSet<_>>().into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::from(*c)).collect()
    }

    #[test]
    fn test_from_rows_drops_blank_rows() {
        let dataset = Dataset::from_rows(
            "people.xlsx",
            vec!["Name".to_string(), "Sexe".to_string()],
            vec![row(&["A", "F"]), row(&["", ""]), row(&["B", ""])],
        );

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.file_name(), "people.xlsx");
        assert_eq!(dataset.get(1, "Name"), Some(&CellValue::from("B")));
        assert_eq!(dataset.get(1, "Sexe"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_duplicate_headers_are_collapsed() {
        let dataset = Dataset::from_rows(
            "dup.xlsx",
            vec!["A".to_string(), "A".to_string()],
            vec![row(&["x", "y"])],
        );

        assert_eq!(dataset.headers(), &["A".to_string()]);
        assert_eq!(dataset.get(0, "A"), Some(&CellValue::from("y")));
    }

    #[test]
    fn test_from_records_uses_first_record_keys() {
        let mut first = Record::new();
        first.insert("Name".to_string(), CellValue::from("A"));
        first.insert("Age".to_string(), CellValue::Int(3));
        let mut second = Record::new();
        second.insert("Name".to_string(), CellValue::from("B"));

        let dataset = Dataset::from_records("", vec![first, second]);

        assert_eq!(dataset.headers(), &["Name".to_string(), "Age".to_string()]);
        assert_eq!(dataset.get(1, "Age"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_serde_shape() {
        let dataset = Dataset::from_rows(
            "f.xlsx",
            vec!["Name".to_string()],
            vec![row(&["A"])],
        );

        let json = serde_json::to_value(&dataset).unwrap();
        assert_eq!(json["fileName"], "f.xlsx");
        assert_eq!(json["records"][0]["Name"], "A");

        let back: Dataset = serde_json::from_value(json).unwrap();
        assert_eq!(back, dataset);
    }
}
