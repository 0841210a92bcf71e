//! Error types for WSDL/XSD ingestion

use std::io;
use thiserror::Error;

use crate::qname::QName;

/// Result type for ingestion operations
pub type Result<T> = std::result::Result<T, Error>;

/// What kind of reference failed to resolve (see [`Error::UnresolvedReference`])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Type,
    Element,
    Attribute,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReferenceKind::Type => "type",
            ReferenceKind::Element => "element",
            ReferenceKind::Attribute => "attribute",
        };
        f.write_str(s)
    }
}

/// Errors that can occur while loading, parsing or resolving a WSDL service
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed XML surfaced by the streaming reader
    #[error("XML syntax error at line {line}, column {col}: {msg}")]
    XmlSyntax { line: usize, col: usize, msg: String },

    /// A document could not be loaded from its URI
    #[error("failed to load '{uri}': {cause}")]
    LoadFailed { uri: String, cause: String },

    /// A `type=`/`ref=`/`base=` qname was never bound after the resolve pass
    #[error("unresolved {kind} reference: {qname}")]
    UnresolvedReference { qname: QName, kind: ReferenceKind },

    /// Structural violation not covered by the more specific variants
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Several unresolved references collected during the resolver pass
    #[error("{} unresolved reference(s) after resolution", .0.len())]
    UnresolvedReferences(Vec<Error>),

    /// I/O failure while reading a local file
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Other errors, for ad-hoc context in tests/examples
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlSyntax {
            line: 0,
            col: 0,
            msg: err.to_string(),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::InvalidSchema(err.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::XmlSyntax {
            line: 0,
            col: 0,
            msg: format!("UTF-8 decoding error: {err}"),
        }
    }
}
