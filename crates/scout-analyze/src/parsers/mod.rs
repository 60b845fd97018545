//! Built-in language parsers.
//!
//! Two families: a syntax-tree parser for Rust (precise), and
//! pattern-matching parsers for Python and JavaScript/TypeScript
//! (best effort). All three produce the same [`FileDependencies`]
//! shape, so consumers never care which family ran.
//!
//! [`FileDependencies`]: crate::types::FileDependencies

mod js;
mod python;
mod rust;

pub use js::JsParser;
pub use python::PythonParser;
pub use rust::RustParser;
