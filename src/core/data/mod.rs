//! Core data types shared by the parser, resolver and dictionary store.
//!
//! ## Module Structure
//!
//! - `message`: Flattened locale data (`FlatMessages`)
//! - `source`: Source positions, spans and file kinds

pub mod message;
pub mod source;

pub use message::{FlatMessages, compose_key};
pub use source::{FileKind, SourcePosition, SourceSpan};
