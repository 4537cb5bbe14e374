use crate::model::RegionId;

#[derive(Debug, thiserror::Error)]
pub enum MarkeraError {
    #[error("failed to load PDF document: {0}")]
    DocumentLoad(String),

    #[error("no document loaded")]
    NoDocument,

    #[error("page {page} does not exist (document has {page_count} page(s))")]
    PageOutOfRange { page: u32, page_count: u32 },

    #[error("no region with id {0}")]
    UnknownRegion(RegionId),

    #[error("region {0} is not a main region and cannot own sub regions")]
    NotAMainRegion(RegionId),

    #[error("parsing service returned status {status}")]
    BackendStatus { status: u16 },

    #[error("could not interpret parsing service response: {0}")]
    ResponseShape(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
