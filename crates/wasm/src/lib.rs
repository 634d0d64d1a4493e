//! Browser bindings for sheetlens.
//!
//! The free functions are stateless wrappers over the pipeline. [`Viewer`]
//! wraps a [`Session`] for callers that want the crate to own the dataset
//! and view state between events.
//!
//! Every exported function has a `*_json` twin that takes and returns JSON
//! text, so the same code paths can be exercised without a JS host.

use serde::Serialize;
use sheetlens_sheet::{decode, encode_with_options, CellValue, Dataset, ExportOptions};
use sheetlens_view::{
    compute_stats, filter_sort_paginate as run_view, CategoryRule, Session, UploadOutcome,
    UploadTicket, ViewQuery, ViewerConfig,
};
use wasm_bindgen::prelude::*;

pub mod display;
pub mod logging;

pub use display::format_display_cell;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init();
    console_log!("sheetlens WASM initialized");
}

fn js_error<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Serialize to plain JS objects (not `Map`s), numbers as numbers
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

fn from_js<T: serde::de::DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(js_error)
}

// ===== Stateless API =====

/// Decode the first sheet of a workbook into `{fileName, headers, records}`
#[wasm_bindgen(js_name = decodeWorkbook)]
pub fn decode_workbook(bytes: &[u8], file_name: &str) -> Result<JsValue, JsValue> {
    let dataset = decode(bytes, file_name).map_err(js_error)?;
    to_js(&dataset)
}

/// Encode a dataset object as an xlsx buffer
#[wasm_bindgen(js_name = encodeWorkbook)]
pub fn encode_workbook(dataset: JsValue, options: JsValue) -> Result<Vec<u8>, JsValue> {
    let dataset: Dataset = from_js(dataset)?;
    let options: ExportOptions = from_js(options)?;
    encode_with_options(&dataset, &options).map_err(js_error)
}

/// One page of the filtered, sorted dataset
#[wasm_bindgen(js_name = filterSortPaginate)]
pub fn filter_sort_paginate(dataset: JsValue, query: JsValue, page_size: Option<usize>) -> Result<JsValue, JsValue> {
    let dataset: Dataset = from_js(dataset)?;
    let query: ViewQuery = from_js(query)?;
    let page_size = page_size.unwrap_or(sheetlens_view::DEFAULT_PAGE_SIZE);
    to_js(&run_view(&dataset, &query, page_size))
}

/// Category counts for a dataset; `rule` defaults to F/M in the Sexe column
#[wasm_bindgen(js_name = computeStats)]
pub fn compute_stats_js(dataset: JsValue, rule: JsValue) -> Result<JsValue, JsValue> {
    let dataset: Dataset = from_js(dataset)?;
    let rule: CategoryRule = from_js(rule)?;
    to_js(&compute_stats(&dataset, &rule))
}

/// Display text for one cell, turning serial dates in date columns into
/// `DD/MM/YYYY`
#[wasm_bindgen(js_name = formatCell)]
pub fn format_cell(header: &str, value: JsValue) -> Result<String, JsValue> {
    let value: CellValue = from_js(value)?;
    Ok(format_display_cell(header, &value))
}

// ===== JSON twins =====

pub fn decode_workbook_json(bytes: &[u8], file_name: &str) -> Result<String, String> {
    let dataset = decode(bytes, file_name).map_err(|e| e.to_string())?;
    serde_json::to_string(&dataset).map_err(|e| format!("JSON serialize error: {}", e))
}

pub fn encode_workbook_json(dataset_json: &str) -> Result<Vec<u8>, String> {
    let dataset: Dataset =
        serde_json::from_str(dataset_json).map_err(|e| format!("JSON parse error: {}", e))?;
    encode_with_options(&dataset, &ExportOptions::default()).map_err(|e| e.to_string())
}

pub fn filter_sort_paginate_json(dataset_json: &str, query_json: &str, page_size: usize) -> Result<String, String> {
    let dataset: Dataset =
        serde_json::from_str(dataset_json).map_err(|e| format!("JSON parse error: {}", e))?;
    let query: ViewQuery =
        serde_json::from_str(query_json).map_err(|e| format!("JSON parse error: {}", e))?;
    serde_json::to_string(&run_view(&dataset, &query, page_size))
        .map_err(|e| format!("JSON serialize error: {}", e))
}

pub fn compute_stats_json(dataset_json: &str) -> Result<String, String> {
    let dataset: Dataset =
        serde_json::from_str(dataset_json).map_err(|e| format!("JSON parse error: {}", e))?;
    serde_json::to_string(&compute_stats(&dataset, &CategoryRule::default()))
        .map_err(|e| format!("JSON serialize error: {}", e))
}

// ===== Stateful viewer =====

/// Ticket for an upload started with [`Viewer::begin_upload`]
#[wasm_bindgen]
pub struct UploadHandle {
    ticket: UploadTicket,
}

#[wasm_bindgen]
impl UploadHandle {
    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> String {
        self.ticket.file_name().to_string()
    }
}

/// A viewer session owned on the Rust side
#[wasm_bindgen]
pub struct Viewer {
    session: Session,
}

#[wasm_bindgen]
impl Viewer {
    /// Create a viewer; `config` may be omitted for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Viewer, JsValue> {
        let config: ViewerConfig = from_js(config)?;
        config.validate().map_err(js_error)?;
        Ok(Viewer::with_config(config))
    }

    /// Call when the user picks a file, before its bytes are read
    #[wasm_bindgen(js_name = beginUpload)]
    pub fn begin_upload(&mut self, file_name: &str) -> UploadHandle {
        UploadHandle {
            ticket: self.session.begin_upload(file_name),
        }
    }

    /// Call with the file's bytes. Returns `false` when a newer upload
    /// superseded this one; throws when the file cannot be decoded.
    #[wasm_bindgen(js_name = finishUpload)]
    pub fn finish_upload(&mut self, handle: &UploadHandle, bytes: &[u8]) -> Result<bool, JsValue> {
        let outcome = self
            .session
            .finish_upload(&handle.ticket, bytes)
            .map_err(js_error)?;
        Ok(outcome == UploadOutcome::Loaded)
    }

    /// Begin and finish an upload in one call
    pub fn load(&mut self, file_name: &str, bytes: &[u8]) -> Result<bool, JsValue> {
        let handle = self.begin_upload(file_name);
        self.finish_upload(&handle, bytes)
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    #[wasm_bindgen(getter, js_name = isLoaded)]
    pub fn is_loaded(&self) -> bool {
        self.session.is_loaded()
    }

    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> Option<String> {
        self.session.dataset().map(|d| d.file_name().to_string())
    }

    #[wasm_bindgen(js_name = setFilter)]
    pub fn set_filter(&mut self, text: &str) {
        self.session.update_query(|q| q.set_filter(text));
    }

    #[wasm_bindgen(js_name = toggleSort)]
    pub fn toggle_sort(&mut self, key: &str) {
        self.session.update_query(|q| q.toggle_sort(key));
    }

    #[wasm_bindgen(js_name = setPage)]
    pub fn set_page(&mut self, page: usize) {
        self.session.update_query(|q| q.set_page(page));
    }

    #[wasm_bindgen(js_name = nextPage)]
    pub fn next_page(&mut self) {
        self.session.next_page();
    }

    #[wasm_bindgen(js_name = prevPage)]
    pub fn prev_page(&mut self) {
        self.session.update_query(ViewQuery::prev_page);
    }

    #[wasm_bindgen(js_name = clearFilters)]
    pub fn clear_filters(&mut self) {
        self.session.update_query(ViewQuery::clear);
    }

    #[wasm_bindgen(js_name = activeFilterCount)]
    pub fn active_filter_count(&self) -> usize {
        self.session
            .loaded()
            .map_or(0, |sheet| sheet.query().active_filter_count())
    }

    /// Column names of the loaded dataset
    pub fn headers(&self) -> Result<JsValue, JsValue> {
        let headers: &[String] = self.session.dataset().map(Dataset::headers).unwrap_or_default();
        to_js(&headers)
    }

    /// `{rows, totalCount, totalPages, page}` for the current view state
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.view())
    }

    /// Category counts over the whole dataset, or `null` when empty
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.stats())
    }

    /// The loaded dataset as an xlsx buffer, or `undefined` when empty
    pub fn export(&self) -> Result<Option<Vec<u8>>, JsValue> {
        self.session.export().map_err(js_error)
    }

    #[wasm_bindgen(getter, js_name = exportFileName)]
    pub fn export_file_name(&self) -> String {
        self.session.config().export.file_name.clone()
    }
}

impl Viewer {
    /// Build a viewer from an already-parsed configuration
    #[must_use]
    pub fn with_config(config: ViewerConfig) -> Self {
        Viewer {
            session: Session::new(config),
        }
    }

    /// The wrapped session
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }
}
