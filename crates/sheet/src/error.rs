use thiserror::Error;

/// Errors raised while reading an uploaded workbook
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unreadable workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Workbook contains no sheets")]
    NoSheets,

    #[error("Sheet '{sheet}' is empty")]
    EmptySheet { sheet: String },

    #[error("Sheet '{sheet}' has no data rows after the header")]
    NoRows { sheet: String },
}

/// Errors raised while writing a dataset back out as a workbook
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Workbook write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Row index overflow: {0}")]
    RowOverflow(usize),

    #[error("Column index overflow: {0}")]
    ColumnOverflow(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
