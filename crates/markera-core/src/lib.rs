//! Region selection over rendered PDF pages, and submission of the
//! selected regions to a remote parsing service.
//!
//! The crate owns the bookkeeping side of that workflow: the
//! page-partitioned region store with its main/sub hierarchy, the
//! display-to-native coordinate mapping, the clamped drag/resize commit
//! path, the multipart submission and the reconciliation of either
//! response shape back onto the submitted tree. Rendering and the actual
//! text extraction are delegated to collaborators.

pub mod error;
pub mod format;
pub mod geometry;
pub mod model;
pub mod pdf;
pub mod session;
pub mod store;
pub mod submit;
pub mod surface;

pub use error::MarkeraError;
pub use session::Session;
pub use submit::{HttpBackend, ParseBackend, ParseResponse};
