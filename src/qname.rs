//! Qualified names: the identity space for every entity in the IR.
//!
//! A [`QName`] is `(namespace_uri, local_name)`. The prefix used in the
//! source document is cosmetic and per-document; it never enters equality
//! or hashing. Resolving a prefixed wire name (`tns:Foo`) into a `QName`
//! requires the set of namespace declarations in scope at that point in
//! the document, which is exactly what [`resolve`](QName::resolve) takes.

use std::collections::HashMap;
use std::fmt;

/// The well-known XML Schema namespace.
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
/// Legacy alias some older WSDL documents still declare.
pub const XSD_NS_2000: &str = "http://www.w3.org/2000/10/XMLSchema";
/// The `xml:` namespace, implicitly in scope everywhere.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
/// SOAP 1.2 envelope namespace; arms the soap-envelope-fault flag (see resolver).
pub const SOAP_ENVELOPE_NS: &str = "http://www.w3.org/2003/05/soap-envelope";

/// A namespace-qualified name. Equality and hashing consider only
/// `namespace_uri` and `local_name` — never the prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    pub namespace_uri: String,
    pub local_name: String,
}

impl QName {
    pub fn new(namespace_uri: impl Into<String>, local_name: impl Into<String>) -> Self {
        QName {
            namespace_uri: namespace_uri.into(),
            local_name: local_name.into(),
        }
    }

    /// A qname in no namespace at all (rare; used for unqualified locals).
    pub fn unqualified(local_name: impl Into<String>) -> Self {
        QName {
            namespace_uri: String::new(),
            local_name: local_name.into(),
        }
    }

    pub fn is_xsd(&self) -> bool {
        self.namespace_uri == XSD_NS || self.namespace_uri == XSD_NS_2000
    }

    /// Resolve a wire-format name (`"tns:Foo"` or `"Foo"`) against a
    /// prefix -> namespace-uri map of declarations in scope.
    ///
    /// An unprefixed name resolves against the empty-prefix ("") entry if
    /// present, else is left unqualified.
    pub fn resolve(raw: &str, namespaces: &HashMap<String, String>) -> QName {
        match raw.split_once(':') {
            Some((prefix, local)) => {
                let uri = namespaces.get(prefix).cloned().unwrap_or_default();
                QName::new(uri, local)
            }
            None => {
                let uri = namespaces.get("").cloned().unwrap_or_default();
                QName::new(uri, raw)
            }
        }
    }

    /// The prefix portion of a wire-format name, if any (`"tns:Foo"` -> `Some("tns")`).
    pub fn prefix_of(raw: &str) -> Option<&str> {
        raw.split_once(':').map(|(prefix, _)| prefix)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_uri.is_empty() {
            write!(f, "{}", self.local_name)
        } else {
            write!(f, "{{{}}}{}", self.namespace_uri, self.local_name)
        }
    }
}
