use crate::cell::CellValue;
use crate::dataset::Record;

/// Build a record from a positional row, keyed by `headers`.
///
/// `raw[i]` pairs with `headers[i]`. Missing and blank cells become
/// `CellValue::Empty`; other values keep their type. When a header name
/// repeats, the right-most column wins but the key keeps its first position.
pub fn normalize_row(raw: &[CellValue], headers: &[String]) -> Record {
    let mut record = Record::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        let value = raw.get(i).cloned().unwrap_or_default().normalized();
        record.insert(header.clone(), value);
    }
    record
}

/// True when every cell in the row is blank (or the row has no cells)
pub fn is_blank_row(raw: &[CellValue]) -> bool {
    raw.iter().all(CellValue::is_blank)
}

/// Re-key an existing record to exactly `headers`, in header order.
///
/// Keys absent from the record read as `Empty`; keys not in `headers` are
/// dropped.
pub fn conform_record(record: &Record, headers: &[String]) -> Record {
    headers
        .iter()
        .map(|h| {
            let value = record.get(h).cloned().unwrap_or_default().normalized();
            (h.clone(), value)
        })
        .collect()
}
