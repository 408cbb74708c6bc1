//! Locale-key resolution core.
//!
//! The pipeline for one document is pure and re-entrant:
//!
//! 1. `parsers`: source text into a [`parsers::SyntaxTree`]
//! 2. `extract`: namespace-hook bindings and the accessor calls they own
//! 3. `resolve`: composed keys classified against a flattened dictionary
//!
//! `completion` builds editor-facing lookups on top of the same data.

pub mod completion;
pub mod data;
pub mod extract;
pub mod parsers;
pub mod resolve;

pub use data::*;
pub use resolve::{FileResolution, MissingEntry, ResolutionResult, ResolutionStatus, ResolvedEntry};
