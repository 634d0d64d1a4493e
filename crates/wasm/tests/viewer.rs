use sheetlens_sheet::{encode, CellValue, Dataset};
use sheetlens_view::ViewerConfig;
use sheetlens_wasm::{
    compute_stats_json, decode_workbook_json, encode_workbook_json, filter_sort_paginate_json,
    Viewer,
};

/// Builds the three-person fixture workbook.
fn people_bytes() -> Vec<u8> {
    let dataset = Dataset::from_rows(
        "people.xlsx",
        vec!["Name".to_string(), "Sexe".to_string(), "Date naissance".to_string()],
        vec![
            vec![CellValue::from("A"), CellValue::from("F"), CellValue::Int(25569)],
            vec![CellValue::from("B"), CellValue::from("M"), CellValue::Empty],
            vec![CellValue::from("C"), CellValue::from("F"), CellValue::Int(45292)],
        ],
    );
    encode(&dataset).expect("encode fixture")
}

/// Decodes a JSON response payload.
fn parse_json(text: &str) -> serde_json::Value {
    serde_json::from_str(text).expect("json decode")
}

#[test]
fn test_decode_json_shape() {
    let json = parse_json(&decode_workbook_json(&people_bytes(), "people.xlsx").unwrap());

    assert_eq!(json["fileName"], "people.xlsx");
    assert_eq!(json["headers"], serde_json::json!(["Name", "Sexe", "Date naissance"]));
    assert_eq!(json["records"][1]["Sexe"], "");
    assert_eq!(json["records"][2]["Date naissance"], 45292);
}

#[test]
fn test_decode_json_error_message() {
    let err = decode_workbook_json(b"nope", "nope.xlsx").unwrap_err();
    assert!(err.starts_with("Unreadable workbook"), "{err}");
}

#[test]
fn test_view_json_round() {
    let dataset = decode_workbook_json(&people_bytes(), "people.xlsx").unwrap();

    let view = parse_json(
        &filter_sort_paginate_json(&dataset, r#"{"sort": {"key": "Name", "direction": "desc"}}"#, 10).unwrap(),
    );
    let names: Vec<&str> = view["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["Name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["C", "B", "A"]);
    assert_eq!(view["totalCount"], 3);
    assert_eq!(view["totalPages"], 1);
    assert_eq!(view["page"], 1);

    let view = parse_json(&filter_sort_paginate_json(&dataset, r#"{"filter": "b"}"#, 10).unwrap());
    assert_eq!(view["rows"].as_array().unwrap().len(), 1);
}

#[test]
fn test_stats_json() {
    let dataset = decode_workbook_json(&people_bytes(), "people.xlsx").unwrap();
    let stats = parse_json(&compute_stats_json(&dataset).unwrap());

    assert_eq!(stats["buckets"]["female"], 2);
    assert_eq!(stats["buckets"]["male"], 1);
    assert_eq!(stats["total"], 3);
}

#[test]
fn test_encode_json_from_plain_records() {
    let bytes = encode_workbook_json(r#"{"records": [{"Name": "Z", "Score": 1.5}, {"Name": "Y"}]}"#).unwrap();
    let json = parse_json(&decode_workbook_json(&bytes, "out.xlsx").unwrap());

    assert_eq!(json["headers"], serde_json::json!(["Name", "Score"]));
    assert_eq!(json["records"][0]["Score"], 1.5);
    assert_eq!(json["records"][1]["Score"], "");
}

#[test]
fn test_viewer_state_transitions() {
    let mut viewer = Viewer::with_config(ViewerConfig::default());
    assert!(!viewer.is_loaded());
    assert_eq!(viewer.active_filter_count(), 0);

    let stale = viewer.begin_upload("first.xlsx");
    let current = viewer.begin_upload("second.xlsx");
    assert!(viewer.finish_upload(&current, &people_bytes()).unwrap_or(false));
    assert!(!viewer.finish_upload(&stale, &people_bytes()).unwrap_or(true));
    assert_eq!(viewer.file_name().as_deref(), Some("second.xlsx"));

    viewer.toggle_sort("Name");
    viewer.set_filter("f");
    viewer.set_page(2);
    assert_eq!(viewer.active_filter_count(), 3);

    viewer.clear_filters();
    viewer.clear_filters();
    assert_eq!(viewer.active_filter_count(), 0);

    let exported = viewer.export().unwrap_or(None).expect("dataset loaded");
    assert!(!exported.is_empty());
    assert_eq!(viewer.export_file_name(), "Inspecteurs_Styled.xlsx");

    viewer.reset();
    assert!(!viewer.is_loaded());
    assert!(viewer.file_name().is_none());
}

#[test]
fn test_viewer_page_navigation() {
    let config = ViewerConfig::from_json_str(r#"{"pageSize": 1}"#).unwrap();
    let mut viewer = Viewer::with_config(config);
    let handle = viewer.begin_upload("people.xlsx");
    assert!(viewer.finish_upload(&handle, &people_bytes()).unwrap_or(false));

    viewer.next_page();
    viewer.next_page();
    viewer.next_page();
    assert_eq!(viewer.session().view().page, 3);

    viewer.prev_page();
    assert_eq!(viewer.session().view().page, 2);
}
