use crate::cell::CellValue;
use crate::dataset::Dataset;
use crate::error::{DecodeError, EncodeError};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Sheet name used for exported workbooks
pub const DEFAULT_SHEET_NAME: &str = "Inspecteurs";

/// File name offered for exported workbooks
pub const DEFAULT_EXPORT_FILE_NAME: &str = "Inspecteurs_Styled.xlsx";

/// Column width hint, in characters, applied to every exported column
pub const DEFAULT_COLUMN_WIDTH: f64 = 20.0;

// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Options for writing a dataset back out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    /// Name of the single output sheet
    pub sheet_name: String,
    /// File name suggested to the caller for the download
    pub file_name: String,
    /// Width hint applied to each column
    pub column_width: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

impl ExportOptions {
    /// Set the output sheet name
    #[must_use]
    pub fn with_sheet_name(mut self, name: &str) -> Self {
        self.sheet_name = name.to_string();
        self
    }
}

/// Whole-valued floats inside the exact-integer range decode as `Int`, so
/// numbers written by `encode` come back with the type they left with.
#[allow(clippy::float_cmp)]
fn number_cell(f: f64) -> CellValue {
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        CellValue::Int(f as i64)
    } else {
        CellValue::Float(f)
    }
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => number_cell(*f),
        Data::String(s) => CellValue::from(s.as_str()),
        // Excel stores dates as days since 1899-12-30
        Data::DateTime(dt) => number_cell(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from(s.as_str()),
        // Keep the error text Excel shows, e.g. `#DIV/0!`
        Data::Error(e) => CellValue::String(e.to_string()),
    }
}

/// Decode the first sheet of a workbook buffer into a dataset.
///
/// Accepts any container calamine recognizes (xlsx, xlsm, xlsb, xls, ods).
/// The first row is the header row; every later non-blank row becomes a
/// record.
pub fn decode(bytes: &[u8], file_name: &str) -> crate::Result<Dataset> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(DecodeError::NoSheets)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DecodeError::NoSheets)??;

    let mut rows = range.rows();
    let header_row: Vec<String> = rows
        .next()
        .ok_or_else(|| DecodeError::EmptySheet {
            sheet: sheet.clone(),
        })?
        .iter()
        .map(|cell| data_to_cell_value(cell).to_string())
        .collect();

    let dataset = Dataset::from_rows(
        file_name,
        header_row,
        rows.map(|row| row.iter().map(data_to_cell_value).collect::<Vec<_>>()),
    );

    if dataset.is_empty() {
        return Err(DecodeError::NoRows { sheet });
    }

    tracing::debug!(
        file = file_name,
        sheet = %sheet,
        columns = dataset.headers().len(),
        rows = dataset.len(),
        "decoded workbook"
    );

    Ok(dataset)
}

/// Encode a dataset as an xlsx buffer using the default export options
pub fn encode(dataset: &Dataset) -> Result<Vec<u8>, EncodeError> {
    encode_with_options(dataset, &ExportOptions::default())
}

/// Encode a dataset as an xlsx buffer.
///
/// The header row is taken from the keys of the first record, so an empty
/// dataset produces a workbook holding one empty sheet.
pub fn encode_with_options(dataset: &Dataset, options: &ExportOptions) -> Result<Vec<u8>, EncodeError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(options.sheet_name.as_str())?;

    write_dataset(worksheet, dataset, options.column_width)?;

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(rows = dataset.len(), bytes = bytes.len(), "encoded workbook");
    Ok(bytes)
}

fn write_dataset(worksheet: &mut Worksheet, dataset: &Dataset, column_width: f64) -> Result<(), EncodeError> {
    let headers: Vec<&String> = dataset
        .records()
        .first()
        .map(|r| r.keys().collect())
        .unwrap_or_default();

    for (col_idx, header) in headers.iter().enumerate() {
        let col_num = u16::try_from(col_idx).map_err(|_| EncodeError::ColumnOverflow(col_idx))?;
        worksheet.set_column_width(col_num, column_width)?;
        worksheet.write_string(0, col_num, header.as_str())?;
    }

    for (idx, record) in dataset.records().iter().enumerate() {
        let row_num = u32::try_from(idx + 1).map_err(|_| EncodeError::RowOverflow(idx + 1))?;
        for (col_idx, header) in headers.iter().enumerate() {
            let col_num = u16::try_from(col_idx).map_err(|_| EncodeError::ColumnOverflow(col_idx))?;
            match record.get(header.as_str()).unwrap_or(&CellValue::Empty) {
                CellValue::Empty => {} // Leave empty
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row_num, col_num, *b)?;
                }
                CellValue::Int(i) => {
                    // Excel stores all numbers as f64
                    worksheet.write_number(row_num, col_num, *i as f64)?;
                }
                CellValue::Float(f) => {
                    worksheet.write_number(row_num, col_num, *f)?;
                }
                CellValue::String(s) => {
                    worksheet.write_string(row_num, col_num, s.as_str())?;
                }
            }
        }
    }

    Ok(())
}

impl Dataset {
    /// Encode as an xlsx buffer
    pub fn to_xlsx_bytes(&self, options: &ExportOptions) -> Result<Vec<u8>, EncodeError> {
        encode_with_options(self, options)
    }

    /// Save the dataset to an xlsx file.
    ///
    /// The workbook is written to a temporary file next to `path` and renamed
    /// into place, so a failed export never leaves a truncated file behind.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_as_xlsx<P: AsRef<std::path::Path>>(
        &self,
        path: P,
        options: &ExportOptions,
    ) -> Result<(), EncodeError> {
        use std::io::Write;

        let path = path.as_ref();
        let bytes = encode_with_options(self, options)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => std::path::Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| EncodeError::Io(e.error))?;

        tracing::info!(path = %path.display(), rows = self.len(), "saved workbook");
        Ok(())
    }
}
