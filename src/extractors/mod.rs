//! Field extraction modules
//!
//! Label and section resolution feed the extractor that builds the Field
//! Manifest.

mod field_extractor;
mod label_resolver;
mod section_resolver;

pub use field_extractor::*;
pub use label_resolver::resolve_label;
pub use section_resolver::*;
