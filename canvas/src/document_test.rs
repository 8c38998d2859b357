use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::element::{ElementDraft, Shape};

fn circle() -> Element {
    ElementDraft::new(Shape::circle(50.0, 50.0, 30.0)).into_element(Uuid::new_v4(), 5)
}

// =============================================================
// Blob codec
// =============================================================

#[test]
fn encode_then_decode_preserves_order() {
    let a = circle();
    let b = circle();
    let blob = encode_elements(&[a.clone(), b.clone()]).unwrap();
    assert_eq!(decode_elements(&blob).unwrap(), vec![a, b]);
}

#[test]
fn blank_blob_is_empty_board() {
    assert!(decode_elements("").unwrap().is_empty());
    assert!(decode_elements("  ").unwrap().is_empty());
    assert!(decode_elements("[]").unwrap().is_empty());
}

#[test]
fn corrupt_blob_is_parse_error() {
    let err = decode_elements("[{\"type\": \"circle\"").unwrap_err();
    assert_eq!(err.error_code(), "E_PARSE");
    let err = decode_elements("{\"not\": \"an array\"}").unwrap_err();
    assert_eq!(err.error_code(), "E_PARSE");
}

#[test]
fn duplicate_ids_are_rejected() {
    let a = circle();
    let blob = serde_json::to_string(&[a.clone(), a]).unwrap();
    let err = decode_elements(&blob).unwrap_err();
    assert_eq!(err.error_code(), "E_VALIDATION");
}

#[test]
fn decodes_boards_saved_with_iso_timestamps() {
    let blob = json!([
        {
            "id": "6f1c2a8e-3b1d-4c55-9a3e-1f2d3c4b5a60",
            "type": "rect",
            "x": 10, "y": 20, "width": 100, "height": 60,
            "stroke": "#000000", "strokeWidth": 3,
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:01.500Z"
        },
        {
            "id": "0b7e4d2c-9f8a-4e1b-8c3d-2a1b0c9d8e7f",
            "type": "sticky",
            "x": 100, "y": 100, "width": 200, "height": 150,
            "color": "#f44336", "textColor": "#fff",
            "text": "Launch",
            "createdAt": "2024-01-01T01:00:00+01:00"
        }
    ])
    .to_string();

    let elements = decode_elements(&blob).unwrap();
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].created_at, 1_704_067_200_000);
    assert_eq!(elements[0].updated_at, 1_704_067_201_500);
    assert_eq!(elements[1].created_at, 1_704_067_200_000);
    assert_eq!(elements[1].updated_at, 0);
    assert_eq!(elements[1].fill.as_deref(), Some("#f44336"));
    match &elements[1].shape {
        Shape::StickyNote { text, text_color, .. } => {
            assert_eq!(text, "Launch");
            assert_eq!(text_color, "#fff");
        }
        other => panic!("expected sticky note, got {other:?}"),
    }

    // Re-encoding writes numbers and `fill`.
    let v: serde_json::Value = serde_json::from_str(&encode_elements(&elements).unwrap()).unwrap();
    assert_eq!(v[0]["createdAt"], 1_704_067_200_000_i64);
    assert_eq!(v[1]["fill"], "#f44336");
    assert!(v[1].get("color").is_none());
}

#[test]
fn malformed_timestamp_is_parse_error() {
    let blob = json!([{"type": "circle", "x": 0, "y": 0, "createdAt": "yesterday"}]).to_string();
    assert_eq!(decode_elements(&blob).unwrap_err().error_code(), "E_PARSE");
}

// =============================================================
// Document record
// =============================================================

#[test]
fn numeric_id_becomes_string() {
    let doc: Document = serde_json::from_value(json!({
        "id": 42,
        "name": "Board",
        "data": "[]",
        "created_at": "2024-01-01T00:00:00Z"
    }))
    .unwrap();
    assert_eq!(doc.id, "42");
    assert_eq!(doc.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
    assert!(doc.elements().unwrap().is_empty());
}

#[test]
fn missing_data_defaults_to_empty_array() {
    let doc: Document = serde_json::from_value(json!({"id": "abc", "name": "x"})).unwrap();
    assert_eq!(doc.data, "[]");
}

#[test]
fn save_payload_carries_blob() {
    let a = circle();
    let payload = SavePayload::new("Board", std::slice::from_ref(&a)).unwrap();
    assert_eq!(payload.name, "Board");
    assert_eq!(decode_elements(&payload.data).unwrap(), vec![a]);
    assert_eq!(SavePayload::empty("New").data, "[]");
}
