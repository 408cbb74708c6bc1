//! Parsers for source code and locale files.
//!
//! - `jsx`: JS/TS/JSX source parser (swc), lowered into a [`tree::SyntaxTree`]
//! - `tree`: the compact syntax tree the binding resolver walks
//! - `locale`: locale-file loading, flattening and path templates

pub mod jsx;
pub mod locale;
pub mod tree;

pub use jsx::parse_source;
pub use locale::{JsonLocaleLoader, LocaleLoader, flatten_value, load_flattened, locale_files};
pub use tree::{Node, NodeId, NodeKind, PatternProp, ScopeKind, SyntaxTree};
