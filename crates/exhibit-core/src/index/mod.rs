//! Cross-reference index of extracted examples.
//!
//! Every extracted example gets an [`IndexEntry`], whether or not it
//! compiled. [`IndexBuilder`] renders the entries as one HTML page,
//! grouped by source document in append order.

mod builder;
mod html;

pub use builder::{IndexBuilder, IndexEntry};
pub use html::{DEFAULT_FOOTER, DEFAULT_HEADER, IndexTemplate};
