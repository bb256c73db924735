//! Form autofill over unknown HTML documents
//!
//! Two stateless passes over a live document:
//! - extraction: infer label, section, type and choices of every data-bearing
//!   control and emit a Field Manifest
//! - filling: re-locate controls from a Value Manifest, coerce each value to
//!   the control's modality, write it through native storage and raise the
//!   focus / input / change / blur sequence
//!
//! Both are reachable from Rust through [`channel`] and from C/C++ through
//! [`ffi`].

pub mod channel;
pub mod config;
pub mod dom;
pub mod error;
pub mod extractors;
pub mod ffi;
pub mod fillers;
pub mod model;

pub use channel::*;
pub use config::AutofillConfig;
pub use dom::Document;
pub use error::{AutofillError, Result};
pub use extractors::*;
pub use ffi::*;
pub use fillers::*;
pub use model::*;
