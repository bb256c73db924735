//! Filling modules
//!
//! The value filler locates each target with the element locator and picks
//! select options with the select matcher.

mod element_locator;
mod select_matcher;
mod value_filler;

pub use element_locator::locate_element;
pub use select_matcher::match_option;
pub use value_filler::*;
