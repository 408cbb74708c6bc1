//! Binding extraction over a parsed [`SyntaxTree`](crate::core::parsers::SyntaxTree).
//!
//! - `binding`: finds namespace-hook declarations
//! - `scope`: attributes accessor calls to those declarations

pub mod binding;
pub mod scope;

pub use binding::{NamespaceBinding, find_bindings, is_hook_declaration};
pub use scope::{KeyUse, collect_key_uses};
