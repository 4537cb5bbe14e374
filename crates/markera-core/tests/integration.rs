//! End-to-end tests for the session submission pipeline.
//!
//! Uses a RecordingBackend instead of the HTTP backend, so these tests
//! run without a network or a parsing service.

use lopdf::{dictionary, Document, Object};
use markera_core::error::MarkeraError;
use markera_core::format::PARSE_FAILURE_MESSAGE;
use markera_core::submit::{ParseBackend, ParseResponse};
use markera_core::Session;
use std::cell::{Cell, RefCell};
use std::io::Write;

struct RecordingBackend {
    response: Result<ParseResponse, String>,
    calls: Cell<u32>,
    last_boxes_json: RefCell<Option<String>>,
}

impl RecordingBackend {
    fn returning(response: ParseResponse) -> Self {
        RecordingBackend {
            response: Ok(response),
            calls: Cell::new(0),
            last_boxes_json: RefCell::new(None),
        }
    }

    fn failing(message: &str) -> Self {
        RecordingBackend {
            response: Err(message.to_string()),
            calls: Cell::new(0),
            last_boxes_json: RefCell::new(None),
        }
    }
}

impl ParseBackend for RecordingBackend {
    fn parse(
        &self,
        _file_name: &str,
        _file_bytes: &[u8],
        boxes_json: &str,
    ) -> Result<ParseResponse, MarkeraError> {
        self.calls.set(self.calls.get() + 1);
        *self.last_boxes_json.borrow_mut() = Some(boxes_json.to_string());
        match &self.response {
            Ok(response) => Ok(response.clone()),
            Err(message) => Err(MarkeraError::ResponseShape(message.clone())),
        }
    }

    fn backend_name(&self) -> &str {
        "recording"
    }
}

/// A two-page document with US Letter pages, written through lopdf.
fn two_page_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..2 {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(kids),
            "Count" => 2,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn loaded_session() -> Session {
    let mut session = Session::new();
    session
        .load_document("report.pdf".to_string(), two_page_pdf())
        .unwrap();
    session
}

#[test]
fn select_file_reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&two_page_pdf()).unwrap();

    let mut session = Session::new();
    session.select_file(file.path()).unwrap();
    assert_eq!(session.page_count(), 2);
    assert_eq!(session.page(), 1);
    assert!(session.view().is_some());
}

#[test]
fn ordered_response_formats_depth_first() {
    let mut session = loaded_session();
    let m1 = session.add_main().unwrap();
    session.add_sub(m1).unwrap();
    session.add_main().unwrap();

    let backend = RecordingBackend::returning(ParseResponse::Ordered(vec![
        "A".to_string(),
        "B".to_string(),
        "C".to_string(),
    ]));
    assert!(session.submit(&backend));
    assert_eq!(backend.calls.get(), 1);
    assert_eq!(
        session.result_text(),
        "main box 1 (page 1):\nA\n\nsub box 1-1 (page 1):\nB\n\nmain box 2 (page 1):\nC"
    );
}

#[test]
fn keyed_response_produces_the_same_text_as_ordered() {
    let mut session = loaded_session();
    let m1 = session.add_main().unwrap();
    let s1 = session.add_sub(m1).unwrap();
    let m2 = session.add_main().unwrap();

    let ordered = RecordingBackend::returning(ParseResponse::Ordered(vec![
        "A".to_string(),
        "B".to_string(),
        "C".to_string(),
    ]));
    assert!(session.submit(&ordered));
    let ordered_text = session.result_text().to_string();

    let keyed = RecordingBackend::returning(ParseResponse::Keyed(
        [
            (m1.to_string(), "A".to_string()),
            (s1.to_string(), "B".to_string()),
            (m2.to_string(), "C".to_string()),
        ]
        .into_iter()
        .collect(),
    ));
    assert!(session.submit(&keyed));
    assert_eq!(session.result_text(), ordered_text);
}

#[test]
fn submitting_without_regions_is_a_silent_no_op() {
    let mut session = loaded_session();
    let backend =
        RecordingBackend::returning(ParseResponse::Ordered(vec!["unused".to_string()]));

    assert!(!session.submit(&backend));
    assert_eq!(backend.calls.get(), 0);
    assert_eq!(session.result_text(), "");
}

#[test]
fn submitting_without_a_document_is_a_silent_no_op() {
    let mut session = Session::new();
    let backend =
        RecordingBackend::returning(ParseResponse::Ordered(vec!["unused".to_string()]));
    assert!(!session.submit(&backend));
    assert_eq!(backend.calls.get(), 0);
}

#[test]
fn backend_failure_replaces_previous_results_with_the_fixed_message() {
    let mut session = loaded_session();
    session.add_main().unwrap();

    let ok = RecordingBackend::returning(ParseResponse::Ordered(vec!["A".to_string()]));
    assert!(session.submit(&ok));
    assert!(session.result_text().contains('A'));

    let failing = RecordingBackend::failing("connection refused");
    assert!(session.submit(&failing));
    assert_eq!(session.result_text(), PARSE_FAILURE_MESSAGE);
}

#[test]
fn payload_carries_native_coordinates_and_zero_based_pages() {
    let mut session = loaded_session();
    let m = session.add_main().unwrap();
    // Page is 612pt wide rendered at 500px, so the scale factor is 1.224.
    session.drag(m, 100.0, 50.0).unwrap();
    session.goto_page(2).unwrap();
    session.add_sub(m).unwrap();

    let backend = RecordingBackend::returning(ParseResponse::Ordered(vec![]));
    assert!(session.submit(&backend));

    let json = backend.last_boxes_json.borrow().clone().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["pageNumber"], 0);
    assert_eq!(value[0]["x"], 122); // round(100 * 1.224)
    assert_eq!(value[0]["y"], 61); // round(50 * 1.224)
    assert_eq!(value[0]["subBoxes"][0]["pageNumber"], 1);
}

#[test]
fn removing_a_main_region_never_leaves_orphan_subs() {
    let mut session = loaded_session();
    let m1 = session.add_main().unwrap();
    session.add_sub(m1).unwrap();
    session.goto_page(2).unwrap();
    session.add_sub(m1).unwrap();
    let m2 = session.add_main().unwrap();
    session.add_sub(m2).unwrap();

    session.remove(m1).unwrap();

    assert!(session
        .store()
        .iter()
        .all(|(_, r)| r.parent_id() != Some(m1)));
    assert_eq!(session.store().main_count(), 1);
    assert_eq!(session.store().get(m2).unwrap().index, 1);
}

#[test]
fn selecting_a_new_file_clears_the_store() {
    let mut session = loaded_session();
    session.add_main().unwrap();
    session.goto_page(2).unwrap();

    session
        .load_document("other.pdf".to_string(), two_page_pdf())
        .unwrap();

    assert!(session.store().is_empty());
    assert_eq!(session.page(), 1);
}

#[test]
fn zoom_does_not_change_the_captured_view() {
    let mut session = loaded_session();
    let before = session.view().unwrap();
    session.zoom(0.3);
    session.zoom(-2.0); // floor at the minimum scale
    assert!(session.scale() >= 0.2);
    assert_eq!(session.view().unwrap(), before);
}
