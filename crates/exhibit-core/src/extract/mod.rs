//! Example extraction from annotated documentation sources.
//!
//! Documentation embeds complete example programs as indented blocks
//! introduced by an `Example:` header line:
//!
//! ```text
//! Example: ** Lighting a Match - a short demo
//!
//! 	*: "Lighting a Match"
//!
//! 	The kitchen is a room.
//!
//! 	Test me with "light match".
//! ```
//!
//! [`ExampleExtractor`] turns a [`SourceDocument`] into an ordered
//! sequence of [`ExampleBlock`]s.

mod documents;
mod parser;
mod types;

pub use documents::discover_documents;
pub use parser::{ExampleExtractor, Examples};
pub use types::{ExampleBlock, SourceDocument};
