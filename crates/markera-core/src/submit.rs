//! Submission pipeline: project the store into the wire payload, dispatch
//! it to the parsing service, and resolve the response shape.

use crate::error::MarkeraError;
use crate::geometry::PageView;
use crate::model::Region;
use crate::store::RegionStore;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Wire projection of a sub region: its rectangle in native document
/// pixels and its own zero-based page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubRegionPayload {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub id: String,
    pub box_index: u32,
    pub page_number: u32,
}

/// Wire projection of a main region with its embedded subs. The field
/// names are the backend contract and must not change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MainRegionPayload {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub id: String,
    pub box_index: u32,
    pub page_number: u32,
    pub sub_boxes: Vec<SubRegionPayload>,
}

/// Flatten the store into the submission tree: main regions by ascending
/// index, each carrying its subs (matched by parent across all pages) by
/// ascending index, every rectangle mapped to native space through the
/// most recently captured page view.
pub fn build_submission(store: &RegionStore, view: &PageView) -> Vec<MainRegionPayload> {
    let mut mains: Vec<(u32, &Region)> = store.iter().filter(|(_, r)| r.is_main()).collect();
    mains.sort_by_key(|(_, r)| r.index);

    mains
        .into_iter()
        .map(|(page, main)| {
            let mut subs: Vec<(u32, &Region)> = store
                .iter()
                .filter(|(_, r)| r.parent_id() == Some(main.id))
                .collect();
            subs.sort_by_key(|(_, r)| r.index);

            let native = view.to_native(&main.rect);
            MainRegionPayload {
                x: native.x,
                y: native.y,
                width: native.width,
                height: native.height,
                id: main.id.to_string(),
                box_index: main.index,
                page_number: page - 1,
                sub_boxes: subs
                    .into_iter()
                    .map(|(sub_page, sub)| {
                        let native = view.to_native(&sub.rect);
                        SubRegionPayload {
                            x: native.x,
                            y: native.y,
                            width: native.width,
                            height: native.height,
                            id: sub.id.to_string(),
                            box_index: sub.index,
                            page_number: sub_page - 1,
                        }
                    })
                    .collect(),
            }
        })
        .collect()
}

/// The two response shapes the parsing service may answer with, resolved
/// once at this boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResponse {
    /// Flat list of texts, positionally aligned to the depth-first
    /// flattening (main, its subs, next main, ...) of the submission.
    Ordered(Vec<String>),
    /// Texts keyed by region id, possibly nested under a `results` key.
    Keyed(HashMap<String, String>),
}

impl ParseResponse {
    /// Resolve raw response JSON into one of the supported shapes.
    ///
    /// For object responses, top-level string entries win; string entries
    /// under `results` fill in ids not present at the top level.
    pub fn from_json(value: Value) -> Result<Self, MarkeraError> {
        match value {
            Value::Array(items) => {
                let texts = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s),
                        other => Err(MarkeraError::ResponseShape(format!(
                            "expected a string element, got {other}"
                        ))),
                    })
                    .collect::<Result<Vec<String>, MarkeraError>>()?;
                Ok(ParseResponse::Ordered(texts))
            }
            Value::Object(map) => {
                let mut texts: HashMap<String, String> = map
                    .iter()
                    .filter_map(|(k, v)| match v {
                        Value::String(s) => Some((k.clone(), s.clone())),
                        _ => None,
                    })
                    .collect();
                if let Some(Value::Object(nested)) = map.get("results") {
                    for (k, v) in nested {
                        if let Value::String(s) = v {
                            texts.entry(k.clone()).or_insert_with(|| s.clone());
                        }
                    }
                }
                Ok(ParseResponse::Keyed(texts))
            }
            other => Err(MarkeraError::ResponseShape(format!(
                "expected an array or object, got {other}"
            ))),
        }
    }
}

/// Trait for parse submission backends, so the pipeline can be exercised
/// without a network.
pub trait ParseBackend {
    /// Send the document and the JSON-encoded region payload, returning
    /// the resolved response.
    fn parse(
        &self,
        file_name: &str,
        file_bytes: &[u8],
        boxes_json: &str,
    ) -> Result<ParseResponse, MarkeraError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Backend speaking the real protocol: one multipart POST with a `file`
/// part and a `boxes` JSON text field. No retry, no timeout beyond the
/// client default, one request per user action.
pub struct HttpBackend {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    /// `base_url` and `path` are the two opaque configuration inputs
    /// selecting the service; they are concatenated as-is.
    pub fn new(base_url: &str, path: &str) -> Self {
        HttpBackend {
            endpoint: format!("{base_url}{path}"),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ParseBackend for HttpBackend {
    fn parse(
        &self,
        file_name: &str,
        file_bytes: &[u8],
        boxes_json: &str,
    ) -> Result<ParseResponse, MarkeraError> {
        let file_part = reqwest::blocking::multipart::Part::bytes(file_bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::blocking::multipart::Form::new()
            .part("file", file_part)
            .text("boxes", boxes_json.to_string());

        let response = self.client.post(&self.endpoint).multipart(form).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(MarkeraError::BackendStatus {
                status: status.as_u16(),
            });
        }

        let value: Value = response.json()?;
        ParseResponse::from_json(value)
    }

    fn backend_name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Size};
    use serde_json::json;

    fn view() -> PageView {
        // scale factor 2.0 keeps the expected numbers readable
        PageView {
            native: Size {
                width: 1000.0,
                height: 1400.0,
            },
            rendered: Size {
                width: 500.0,
                height: 700.0,
            },
        }
    }

    #[test]
    fn submission_orders_mains_and_subs_by_index() {
        let mut store = RegionStore::new();
        let m1 = store.add_main(2);
        let m2 = store.add_main(1);
        store.add_sub(m2, 3).unwrap();
        store.add_sub(m1, 1).unwrap();

        let payload = build_submission(&store, &view());

        assert_eq!(payload.len(), 2);
        assert_eq!(payload[0].box_index, 1);
        assert_eq!(payload[0].page_number, 1); // page 2, zero-based
        assert_eq!(payload[1].box_index, 2);
        assert_eq!(payload[1].page_number, 0);
        // Each main carries exactly its own sub, tagged with the sub's page.
        assert_eq!(payload[0].sub_boxes.len(), 1);
        assert_eq!(payload[0].sub_boxes[0].page_number, 0);
        assert_eq!(payload[1].sub_boxes.len(), 1);
        assert_eq!(payload[1].sub_boxes[0].page_number, 2);
    }

    #[test]
    fn submission_maps_rectangles_to_native_space() {
        let mut store = RegionStore::new();
        let m = store.add_main(1);
        store
            .update_rect(m, Rect::new(10.0, 20.0, 100.0, 50.0))
            .unwrap();

        let payload = build_submission(&store, &view());
        assert_eq!(payload[0].x, 20);
        assert_eq!(payload[0].y, 40);
        assert_eq!(payload[0].width, 200);
        assert_eq!(payload[0].height, 100);
    }

    #[test]
    fn payload_serializes_with_contract_field_names() {
        let mut store = RegionStore::new();
        let m = store.add_main(1);
        store.add_sub(m, 1).unwrap();

        let payload = build_submission(&store, &view());
        let json = serde_json::to_value(&payload).unwrap();
        let main = &json[0];
        for field in ["x", "y", "width", "height", "id", "boxIndex", "pageNumber", "subBoxes"] {
            assert!(main.get(field).is_some(), "missing field {field}");
        }
        assert!(main["id"].is_string());
        assert!(main["subBoxes"][0].get("boxIndex").is_some());
    }

    #[test]
    fn array_response_resolves_to_ordered() {
        let resp = ParseResponse::from_json(json!(["A", "B"])).unwrap();
        assert_eq!(
            resp,
            ParseResponse::Ordered(vec!["A".to_string(), "B".to_string()])
        );
    }

    #[test]
    fn object_response_resolves_to_keyed_with_results_fallback() {
        let resp = ParseResponse::from_json(json!({
            "1": "top",
            "results": { "1": "shadowed", "2": "nested" }
        }))
        .unwrap();
        let ParseResponse::Keyed(map) = resp else {
            panic!("expected keyed response");
        };
        assert_eq!(map.get("1").map(String::as_str), Some("top"));
        assert_eq!(map.get("2").map(String::as_str), Some("nested"));
    }

    #[test]
    fn malformed_bodies_are_rejected() {
        assert!(ParseResponse::from_json(json!("just a string")).is_err());
        assert!(ParseResponse::from_json(json!([1, 2, 3])).is_err());
    }
}
