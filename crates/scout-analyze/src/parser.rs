//! Parser trait and per-extension dispatch.

use std::path::Path;

use thiserror::Error;

use crate::types::FileDependencies;

/// A source file the parser could not make sense of.
///
/// Always recovered by the mapper (the file is treated as having no
/// dependencies); carried as an error so parsers can use `?`.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Extracts imports and exports from one language family.
///
/// Implementations register with a [`ParserRegistry`]; adding a language
/// never touches the mapper core.
pub trait SourceParser: Send + Sync {
    /// Lowercase file extension this parser claims, e.g. `py`.
    fn can_handle(&self, extension: &str) -> bool;

    /// Parse `content` into the common dependency shape. Targets are the
    /// parser's best guess; the mapper resolves them against the scanned
    /// file set afterwards.
    fn parse(&self, path: &Path, content: &str) -> Result<FileDependencies, ParseError>;
}

/// Extension-dispatched parser table.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn SourceParser>>,
}

impl ParserRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Registry with the built-in parsers: Rust (syntax tree), Python and
    /// JavaScript/TypeScript (pattern matching).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(crate::parsers::RustParser::new()));
        registry.register(Box::new(crate::parsers::PythonParser::new()));
        registry.register(Box::new(crate::parsers::JsParser::new()));
        registry
    }

    pub fn register(&mut self, parser: Box<dyn SourceParser>) {
        self.parsers.push(parser);
    }

    /// First registered parser claiming `extension`, if any.
    pub fn parser_for(&self, extension: &str) -> Option<&dyn SourceParser> {
        let extension = extension.to_ascii_lowercase();
        self.parsers
            .iter()
            .find(|p| p.can_handle(&extension))
            .map(Box::as_ref)
    }

    /// Whether any registered parser claims the extension of `path`.
    pub fn supports(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.parser_for(ext).is_some())
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
