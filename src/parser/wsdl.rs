//! WSDL-vocabulary production handlers (§4.2): `definitions`, `types`,
//! `message`, `portType`, `binding`, `service`.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};

#[cfg(feature = "tracing")]
use tracing::warn;

use super::{get_attr, is_named, Parser};
use crate::error::Result;
use crate::ir::{Endpoint, Message, Operation};
use crate::qname::QName;

const SOAP_11_BINDING_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap/";
const SOAP_12_BINDING_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap12/";

impl<'a, B: BufRead> Parser<'a, B> {
    pub(super) fn parse_definitions(&mut self, e: &BytesStart) -> Result<()> {
        let target_namespace = get_attr(e, "targetNamespace")?.unwrap_or_default();
        self.service_target_namespace = if target_namespace.is_empty() { None } else { Some(target_namespace.clone()) };
        self.push_namespace_frame(e, target_namespace)?;

        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if is_named(&e, b"types") => self.parse_types()?,
                Event::Start(e) if is_named(&e, b"message") => self.parse_message(&e)?,
                Event::Start(e) if is_named(&e, b"portType") => self.parse_port_type(&e)?,
                Event::Start(e) if is_named(&e, b"binding") => self.parse_binding(&e)?,
                Event::Start(e) if is_named(&e, b"service") => self.parse_service(&e)?,
                Event::End(e) if e.local_name().as_ref() == b"definitions" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        self.pop_namespace_frame();
        Ok(())
    }

    /// `types`: just a container whose nested `schema` elements are
    /// parsed in place, off the same reader cursor (§4.1).
    fn parse_types(&mut self) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if is_named(&e, b"schema") => {
                    self.push_schema_frame(&e)?;
                    self.parse_schema_content()?;
                    self.pop_namespace_frame();
                }
                Event::End(e) if e.local_name().as_ref() == b"types" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }

    /// Only `part[@name="parameters"]` survives (§4.2); everything else
    /// about the message is dropped.
    fn parse_message(&mut self, e: &BytesStart) -> Result<()> {
        let Some(name) = get_attr(e, "name")? else {
            self.skip_element()?;
            return Ok(());
        };
        let qname = QName::new(self.current_target_namespace(), name);

        let mut parameter = None;
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e) if is_named(&e, b"part") => {
                    let part_name = get_attr(&e, "name")?;
                    let element = get_attr(&e, "element")?;
                    if part_name.as_deref() == Some("parameters") {
                        if let Some(raw) = element {
                            let element_qname = self.resolve_qname(&raw);
                            parameter = self.tables.find_rre(&element_qname);
                        }
                    }
                }
                Event::End(e) if e.local_name().as_ref() == b"message" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        self.tables.insert_message(Message { qname, parameter });
        Ok(())
    }

    /// `portType/operation`: create the `Operation` (lazily, so a later
    /// `binding/operation` of the same name can attach `soap_action`).
    fn parse_port_type(&mut self, _e: &BytesStart) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if is_named(&e, b"operation") => self.parse_port_type_operation(&e)?,
                Event::End(e) if e.local_name().as_ref() == b"portType" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }

    fn parse_port_type_operation(&mut self, e: &BytesStart) -> Result<()> {
        let Some(name) = get_attr(e, "name")? else {
            self.skip_element()?;
            return Ok(());
        };
        let mut operation = Operation::new(name.clone());

        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if is_named(&e, b"documentation") => {
                    operation.documentation = Some(self.read_text_content(b"documentation")?);
                }
                Event::Start(e) | Event::Empty(e) if is_named(&e, b"input") => {
                    if let Some(raw) = get_attr(&e, "message")? {
                        let qname = self.resolve_qname(&raw);
                        operation.input = self.tables.find_message(&qname);
                    }
                }
                Event::Start(e) | Event::Empty(e) if is_named(&e, b"output") => {
                    if let Some(raw) = get_attr(&e, "message")? {
                        let qname = self.resolve_qname(&raw);
                        operation.output = self.tables.find_message(&qname);
                    }
                }
                Event::End(e) if e.local_name().as_ref() == b"operation" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        self.tables.insert_operation(operation);
        Ok(())
    }

    fn read_text_content(&mut self, closing: &[u8]) -> Result<String> {
        let mut text = String::new();
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Text(e) => text.push_str(e.unescape()?.trim()),
                Event::End(e) if e.local_name().as_ref() == closing => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(text)
    }

    /// `binding/operation`: attaches `soapAction` onto the operation of
    /// the same name created by `portType` (§4.2). A binding for an
    /// unknown operation name is silently skipped.
    fn parse_binding(&mut self, _e: &BytesStart) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if is_named(&e, b"operation") => self.parse_binding_operation(&e)?,
                Event::End(e) if e.local_name().as_ref() == b"binding" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }

    fn parse_binding_operation(&mut self, e: &BytesStart) -> Result<()> {
        let Some(name) = get_attr(e, "name")? else {
            self.skip_element()?;
            return Ok(());
        };
        let mut soap_action = None;

        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e)
                    if e.local_name().as_ref().ends_with(b"operation") && matches!(self.namespace_uri_of(&e), Some(ns) if ns == SOAP_11_BINDING_NS || ns == SOAP_12_BINDING_NS) =>
                {
                    soap_action = get_attr(&e, "soapAction")?;
                }
                Event::End(e) if e.local_name().as_ref() == b"operation" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        match self.tables.find_operation_by_name(&name) {
            Some(id) => {
                self.tables.operations.get_mut(id.0).soap_action = soap_action;
            }
            None => {
                #[cfg(feature = "tracing")]
                warn!(operation = %name, "binding references unknown portType operation, skipping");
            }
        }
        Ok(())
    }

    /// Resolve the namespace URI of a prefixed element/attribute name
    /// against the current frame's prefix declarations.
    fn namespace_uri_of(&self, e: &BytesStart) -> Option<String> {
        let raw = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        QName::prefix_of(&raw)
            .and_then(|prefix| self.current_prefixes().get(prefix).cloned())
            .or_else(|| self.current_prefixes().get("").cloned())
    }

    /// `service/port`: each SOAP port becomes an `Endpoint` (§2).
    fn parse_service(&mut self, e: &BytesStart) -> Result<()> {
        if let Some(name) = get_attr(e, "name")? {
            self.service_name = Some(name);
        }

        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if is_named(&e, b"port") => self.parse_port(&e)?,
                Event::End(e) if e.local_name().as_ref() == b"service" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }

    fn parse_port(&mut self, e: &BytesStart) -> Result<()> {
        let Some(port_name) = get_attr(e, "name")? else {
            self.skip_element()?;
            return Ok(());
        };
        let binding = get_attr(e, "binding")?.map(|raw| self.resolve_qname(&raw)).unwrap_or_else(|| QName::unqualified(""));

        let mut address = None;
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e)
                    if is_named(&e, b"address")
                        && matches!(self.namespace_uri_of(&e), Some(ns) if ns == SOAP_11_BINDING_NS || ns == SOAP_12_BINDING_NS) =>
                {
                    address = get_attr(&e, "location")?;
                }
                Event::End(e) if e.local_name().as_ref() == b"port" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if address.is_none() {
            #[cfg(feature = "tracing")]
            warn!(port = %port_name, "port missing soap:address location");
        }

        self.endpoints.push(Endpoint { name: port_name, binding, address });
        Ok(())
    }
}
