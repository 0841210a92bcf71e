//! Event-driven walker over WSDL and XSD vocabulary (§4.3).
//!
//! One [`Parser`] handles *both* vocabularies off a single
//! [`quick_xml::Reader`] cursor: `wsdl:types` simply contains a nested
//! `xsd:schema`, and since the reader is a plain forward-only token
//! stream there is no need to buffer the embedded schema back out to a
//! string and re-parse it the way a DOM-oriented approach might —
//! parsing just continues across the element boundary. The parser is a
//! stack machine (§4.3): a target-namespace frame per `definitions`/
//! `schema`, and a current-type frame per `simpleType`/`complexType`.

mod wsdl;
mod xsd;

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::error::{Error, Result};
use crate::ir::{SymbolTables, TypeId};
use crate::loader::Loader;
use crate::qname::QName;

/// One frame of the target-namespace stack (§4.6): the namespace new
/// entities are qualified with, plus the prefix -> URI declarations in
/// scope at this point, recomputed on every push by merging the parent
/// frame's declarations with this element's own `xmlns:*` attributes.
struct NamespaceFrame {
    target_namespace: String,
    prefixes: HashMap<String, String>,
}

/// One frame of the current-type stack (§4.6): only the top is mutated
/// by particles and facets. Only `complexType` pushes a frame —
/// `simpleType` facets are accumulated locally by the caller instead,
/// since nothing else ever needs to reach into an in-progress
/// `simpleType` the way a nested `element`/`attribute` reaches into an
/// in-progress `complexType`.
#[derive(Clone, Copy)]
enum TypeFrame {
    Complex(TypeId),
}

pub struct Parser<'a, B: BufRead> {
    reader: Reader<B>,
    tables: &'a mut SymbolTables,
    loader: &'a mut Loader,
    namespace_stack: Vec<NamespaceFrame>,
    type_stack: Vec<TypeFrame>,
    /// One-shot flag armed on entering a schema whose target namespace is
    /// the SOAP 1.2 envelope namespace; consumed by the next `Fault`
    /// complexType (§4.6).
    soap_fault_armed: bool,
    pub(crate) service_name: Option<String>,
    pub(crate) service_target_namespace: Option<String>,
    pub(crate) endpoints: Vec<crate::ir::Endpoint>,
    strict: bool,
}

impl<'a, B: BufRead> Parser<'a, B> {
    pub fn new(reader: Reader<B>, tables: &'a mut SymbolTables, loader: &'a mut Loader, strict: bool) -> Self {
        Parser {
            reader,
            tables,
            loader,
            namespace_stack: Vec::new(),
            type_stack: Vec::new(),
            soap_fault_armed: false,
            service_name: None,
            service_target_namespace: None,
            endpoints: Vec::new(),
            strict,
        }
    }

    /// Entry point: read events until the document-level `definitions`
    /// or a bare top-level `schema` is found and parsed.
    pub fn parse_document(&mut self) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.local_name().as_ref() == b"definitions" => {
                    self.parse_definitions(&e)?;
                    break;
                }
                Event::Start(e) if e.local_name().as_ref() == b"schema" => {
                    self.push_schema_frame(&e)?;
                    self.parse_schema_content()?;
                    self.pop_namespace_frame();
                    break;
                }
                Event::Eof => {
                    return Err(Error::InvalidSchema(
                        "document has no wsdl:definitions or xsd:schema root".to_string(),
                    ))
                }
                _ => {}
            }
            buf.clear();
        }
        debug_assert!(self.namespace_stack.is_empty(), "namespace stack discipline");
        Ok(())
    }

    // -- namespace stack ---------------------------------------------------

    fn push_schema_frame(&mut self, e: &BytesStart) -> Result<()> {
        let target_namespace = get_attr(e, "targetNamespace")?.unwrap_or_default();
        self.push_namespace_frame(e, target_namespace.clone())?;
        if target_namespace == crate::qname::SOAP_ENVELOPE_NS {
            self.soap_fault_armed = true;
        }
        Ok(())
    }

    fn push_namespace_frame(&mut self, e: &BytesStart, target_namespace: String) -> Result<()> {
        let mut prefixes = self
            .namespace_stack
            .last()
            .map(|f| f.prefixes.clone())
            .unwrap_or_default();
        for (prefix, uri) in scan_namespace_decls(e)? {
            prefixes.insert(prefix, uri);
        }
        self.namespace_stack.push(NamespaceFrame { target_namespace, prefixes });
        Ok(())
    }

    fn pop_namespace_frame(&mut self) {
        self.namespace_stack.pop();
    }

    fn current_target_namespace(&self) -> String {
        self.namespace_stack
            .last()
            .map(|f| f.target_namespace.clone())
            .unwrap_or_default()
    }

    fn current_prefixes(&self) -> &HashMap<String, String> {
        static EMPTY: std::sync::OnceLock<HashMap<String, String>> = std::sync::OnceLock::new();
        self.namespace_stack
            .last()
            .map(|f| &f.prefixes)
            .unwrap_or_else(|| EMPTY.get_or_init(HashMap::new))
    }

    fn resolve_qname(&self, raw: &str) -> QName {
        QName::resolve(raw, self.current_prefixes())
    }

    // -- type stack ----------------------------------------------------

    fn push_complex_frame(&mut self, id: TypeId) {
        self.type_stack.push(TypeFrame::Complex(id));
    }

    fn pop_type_frame(&mut self) {
        self.type_stack.pop();
    }

    fn current_complex_type(&self) -> Option<TypeId> {
        match self.type_stack.last() {
            Some(TypeFrame::Complex(id)) => Some(*id),
        }
    }

    /// Consume the rest of the current element's subtree, ignoring it.
    fn skip_element(&mut self) -> Result<()> {
        let mut buf = Vec::new();
        let mut depth = 1;
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }
}

pub(crate) fn is_named(e: &BytesStart, name: &[u8]) -> bool {
    e.local_name().as_ref() == name
}

pub(crate) fn get_attr(e: &BytesStart, name: &str) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

pub(crate) fn scan_namespace_decls(e: &BytesStart) -> Result<Vec<(String, String)>> {
    let mut decls = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = attr.key.as_ref();
        if key == b"xmlns" {
            decls.push((String::new(), attr.unescape_value()?.into_owned()));
        } else if let Some(rest) = key.strip_prefix(b"xmlns:") {
            let prefix = String::from_utf8_lossy(rest).into_owned();
            decls.push((prefix, attr.unescape_value()?.into_owned()));
        }
    }
    Ok(decls)
}

/// Parse a WSDL document from a byte slice, running the full pipeline:
/// document parse (recursing into every `import`/`include`) followed by
/// the end-of-document resolver (§4.5). `strict` selects strict vs lax
/// unresolved-reference handling (§7).
pub fn parse_wsdl(bytes: &[u8], loader: &mut Loader, strict: bool) -> Result<(crate::ir::Service, SymbolTables)> {
    let mut tables = SymbolTables::with_builtins();
    let reader = Reader::from_reader(bytes);
    let mut parser = Parser::new(reader, &mut tables, loader, strict);
    parser.parse_document()?;

    let name = parser.service_name.take().unwrap_or_default();
    let target_namespace_uri = parser.service_target_namespace.take();
    let endpoints = std::mem::take(&mut parser.endpoints);
    let operation_count = parser.tables.operations.len();
    drop(parser);

    let service = crate::ir::Service {
        name,
        target_namespace_uri,
        operations: (0..operation_count).map(crate::ir::OperationId).collect(),
        endpoints,
    };

    #[cfg(feature = "tracing")]
    debug!(service = %service.name, operations = service.operations.len(), "parsed wsdl document");

    crate::resolver::resolve(&mut tables, strict)?;
    Ok((service, tables))
}
