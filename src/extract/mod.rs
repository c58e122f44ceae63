//! Content derived from a fetched response
//!
//! - `parse_document` - parsed DOM with helpers for structural checks
//! - `extract_readable_text` - main-content extraction in the spirit of
//!   Firefox Reader View
//!
//! Every extractor is pure and never fails: malformed or empty HTML
//! degrades to an empty tree or `None`.

mod document;
mod readability;

pub use document::{absolutize_url, parse_document, resolve_url, DocumentTree};
pub use readability::extract_readable_text;
