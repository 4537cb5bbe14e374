//! Reconciliation of a parse response against the submitted tree, and the
//! display text built from it.

use crate::submit::{MainRegionPayload, ParseResponse, SubRegionPayload};

/// Shown in place of results when anything about a submission fails.
/// Partial results are never displayed.
pub const PARSE_FAILURE_MESSAGE: &str = "An error occurred while parsing the PDF.";

/// Build the display text for a response, matched against the submitted
/// payload.
///
/// Ordered responses are zipped against the depth-first flattening of the
/// submission; if the counts differ the shorter side decides. Keyed
/// responses emit a header for every submitted region and fill in the
/// text where the id is present.
pub fn format_results(payload: &[MainRegionPayload], response: &ParseResponse) -> String {
    let mut out = String::new();
    match response {
        ParseResponse::Ordered(texts) => {
            let mut texts = texts.iter();
            'outer: for main in payload {
                let Some(text) = texts.next() else {
                    break;
                };
                push_entry(&mut out, &main_header(main), text);
                for sub in &main.sub_boxes {
                    let Some(text) = texts.next() else {
                        break 'outer;
                    };
                    push_entry(&mut out, &sub_header(main, sub), text);
                }
            }
        }
        ParseResponse::Keyed(map) => {
            for main in payload {
                push_entry(
                    &mut out,
                    &main_header(main),
                    map.get(&main.id).map(String::as_str).unwrap_or(""),
                );
                for sub in &main.sub_boxes {
                    push_entry(
                        &mut out,
                        &sub_header(main, sub),
                        map.get(&sub.id).map(String::as_str).unwrap_or(""),
                    );
                }
            }
        }
    }
    out.trim_end().to_string()
}

fn main_header(main: &MainRegionPayload) -> String {
    format!(
        "main box {} (page {}):",
        main.box_index,
        main.page_number + 1
    )
}

fn sub_header(main: &MainRegionPayload, sub: &SubRegionPayload) -> String {
    format!(
        "sub box {}-{} (page {}):",
        main.box_index,
        sub.box_index,
        sub.page_number + 1
    )
}

fn push_entry(out: &mut String, header: &str, text: &str) {
    out.push_str(header);
    out.push('\n');
    if !text.is_empty() {
        out.push_str(text);
        out.push('\n');
    }
    out.push('\n');
}
