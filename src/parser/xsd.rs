//! XSD-vocabulary production handlers (§4.3): `schema`, `include`/
//! `import`, `simpleType`, `complexType`, `element`, `attribute`,
//! `sequence`. `choice`/`all`/`group`/`attributeGroup` are consumed but
//! not materialized — only their element children would matter for a
//! downstream code generator, and the core leaves that synthesis to it.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[cfg(feature = "tracing")]
use tracing::warn;

use super::{get_attr, is_named, Parser};
use crate::error::Result;
use crate::ir::{Attribute, ComplexType, Element, Facets, MaxOccurs, SimpleType, TypeId, TypeKind};
use crate::loader::Loaded;
use crate::qname::{QName, XSD_NS};

impl<'a, B: BufRead> Parser<'a, B> {
    pub(super) fn parse_schema_content(&mut self) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if is_named(&e, b"include") || is_named(&e, b"import") => {
                    self.parse_include_import(&e)?;
                    self.skip_element()?;
                }
                Event::Empty(e) if is_named(&e, b"include") || is_named(&e, b"import") => {
                    self.parse_include_import(&e)?;
                }
                Event::Start(e) if is_named(&e, b"element") => self.parse_element(&e, None, true)?,
                Event::Empty(e) if is_named(&e, b"element") => self.parse_element(&e, None, false)?,
                Event::Start(e) if is_named(&e, b"complexType") => {
                    self.parse_complex_type(&e, None)?;
                }
                Event::Empty(e) if is_named(&e, b"complexType") => {
                    self.define_named_complex_type(&e, ComplexType::default())?;
                }
                Event::Start(e) if is_named(&e, b"simpleType") => self.parse_simple_type(&e)?,
                Event::Start(e) if is_named(&e, b"attribute") => {
                    self.parse_attribute(&e, None, true)?;
                }
                Event::Empty(e) if is_named(&e, b"attribute") => {
                    self.parse_attribute(&e, None, false)?;
                }
                Event::End(e) if e.local_name().as_ref() == b"schema" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }

    /// `xsd:include`/`xsd:import` (§4.4): load the referenced document
    /// (skip entirely if its canonical URI was already loaded), parse it
    /// with a child `Parser` sharing this loader's loaded-URI set, then
    /// merge its symbol tables into ours.
    fn parse_include_import(&mut self, e: &BytesStart) -> Result<()> {
        let Some(location) = get_attr(e, "schemaLocation")? else {
            return Ok(());
        };
        let namespace_hint = self.current_target_namespace();
        let namespace_hint = if namespace_hint.is_empty() { None } else { Some(namespace_hint.as_str()) };

        let loaded = self.loader.load(&location, namespace_hint)?;
        let bytes = match loaded {
            Loaded::AlreadyLoaded { .. } => return Ok(()),
            Loaded::Fresh { bytes, .. } => bytes,
        };

        let mut child_tables = crate::ir::SymbolTables::default();
        let reader = Reader::from_reader(bytes.as_slice());
        {
            let mut child = Parser::new(reader, &mut child_tables, &mut *self.loader, self.strict);
            child.parse_document()?;
        }

        self.tables.merge_from(&child_tables);
        Ok(())
    }

    // -- simpleType ------------------------------------------------------

    fn parse_simple_type(&mut self, e: &BytesStart) -> Result<()> {
        let name = get_attr(e, "name")?;
        let qname = name.map(|n| QName::new(self.current_target_namespace(), n));
        let body = self.read_simple_type_body()?;

        if let Some(qname) = qname {
            match body {
                // A named simpleType containing <list> is elevated to a
                // ComplexType per §4.3: a synthesized list wrapper, not a
                // SimpleType::List entry.
                SimpleTypeBody::List { item_type } => {
                    let item_id = self.tables.get_or_create_unknown_type(item_type);
                    self.tables.define_type(
                        qname,
                        TypeKind::Complex(ComplexType {
                            extension_base: Some(item_id),
                            extension_is_list: true,
                            ..Default::default()
                        }),
                    );
                }
                SimpleTypeBody::Restriction { base, facets } => {
                    self.tables.define_type(qname, TypeKind::Simple(SimpleType::Restriction { base, facets }));
                }
                SimpleTypeBody::Union { member } => {
                    self.tables.define_type(qname, TypeKind::Simple(SimpleType::Union { member }));
                }
                SimpleTypeBody::None => {
                    self.tables.define_type(qname, TypeKind::Unknown);
                }
            }
        }
        Ok(())
    }

    /// Parse the body of a `simpleType`, returning an anonymous
    /// representation the caller attaches wherever the grammar requires
    /// (a named type entry, or directly onto an owning attribute).
    fn read_simple_type_body(&mut self) -> Result<SimpleTypeBody> {
        let mut buf = Vec::new();
        let mut body = SimpleTypeBody::None;
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if is_named(&e, b"restriction") => {
                    body = self.parse_restriction(&e, true)?;
                }
                Event::Empty(e) if is_named(&e, b"restriction") => {
                    body = self.parse_restriction(&e, false)?;
                }
                Event::Start(e) if is_named(&e, b"list") => {
                    let item_type = get_attr(&e, "itemType")?
                        .map(|raw| self.resolve_qname(&raw))
                        .unwrap_or_else(|| QName::new(XSD_NS, "string"));
                    body = SimpleTypeBody::List { item_type };
                    self.skip_element()?;
                }
                Event::Empty(e) if is_named(&e, b"list") => {
                    let item_type = get_attr(&e, "itemType")?
                        .map(|raw| self.resolve_qname(&raw))
                        .unwrap_or_else(|| QName::new(XSD_NS, "string"));
                    body = SimpleTypeBody::List { item_type };
                }
                Event::Start(e) if is_named(&e, b"union") => {
                    body = SimpleTypeBody::Union { member: self.first_union_member(&e)? };
                    self.skip_element()?;
                }
                Event::Empty(e) if is_named(&e, b"union") => {
                    body = SimpleTypeBody::Union { member: self.first_union_member(&e)? };
                }
                Event::End(e) if e.local_name().as_ref() == b"simpleType" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(body)
    }

    /// Only the first XSD-primitive member of `memberTypes` is kept (see
    /// DESIGN.md's Open Question decision on `xsd:union`).
    fn first_union_member(&self, e: &BytesStart) -> Result<QName> {
        let raw = get_attr(e, "memberTypes")?.unwrap_or_default();
        let member = raw
            .split_whitespace()
            .map(|s| self.resolve_qname(s))
            .find(|q| q.is_xsd())
            .unwrap_or_else(|| QName::new(XSD_NS, "string"));
        Ok(member)
    }

    fn parse_restriction(&mut self, e: &BytesStart, has_body: bool) -> Result<SimpleTypeBody> {
        let base = get_attr(e, "base")?
            .map(|raw| self.resolve_qname(&raw))
            .unwrap_or_else(|| QName::new(XSD_NS, "string"));
        let mut facets = Facets::default();
        if has_body {
            let mut buf = Vec::new();
            loop {
                match self.reader.read_event_into(&mut buf)? {
                    Event::Empty(e) if is_named(&e, b"enumeration") => {
                        if let Some(v) = get_attr(&e, "value")? {
                            facets.push_enumeration(v);
                        }
                    }
                    Event::Empty(e) if is_named(&e, b"minLength") => {
                        if let Some(v) = get_attr(&e, "value")?.and_then(|s| s.parse().ok()) {
                            facets.min_length = Some(v);
                        }
                    }
                    Event::Empty(e) if is_named(&e, b"maxLength") => {
                        if let Some(v) = get_attr(&e, "value")?.and_then(|s| s.parse().ok()) {
                            facets.max_length = Some(v);
                        }
                    }
                    Event::End(e) if e.local_name().as_ref() == b"restriction" => break,
                    Event::Eof => break,
                    _ => {}
                }
                buf.clear();
            }
        }
        Ok(SimpleTypeBody::Restriction { base, facets })
    }

    // -- complexType -------------------------------------------------------

    /// Parse a `complexType` body. `name_override` supplies a synthesized
    /// qname for an anonymous type nested directly inside an `element`
    /// (§4.3.1); a `name=` attribute on `e` itself always wins.
    pub(super) fn parse_complex_type(&mut self, e: &BytesStart, name_override: Option<&str>) -> Result<TypeId> {
        let explicit_name = get_attr(e, "name")?;
        let local = explicit_name.or_else(|| name_override.map(str::to_string));
        let qname = local.map(|n| QName::new(self.current_target_namespace(), n));

        // Seeded as `Complex` (not `Unknown`) right away: `attach_element`/
        // `attach_attribute`/`record_extension_base` all reach this id
        // through `current_complex_type()` while the body is still being
        // read, and need a real `ComplexType` to push into, not a
        // placeholder. `define_type` still upgrades a pre-existing
        // forward-reference placeholder for this qname in place.
        let id = match &qname {
            Some(q) => self.tables.define_type(q.clone(), TypeKind::Complex(ComplexType::default())),
            None => self.tables.insert_type(QName::unqualified(""), TypeKind::Complex(ComplexType::default())),
        };

        let is_fault = qname.as_ref().map(|q| q.local_name == "Fault").unwrap_or(false) && self.soap_fault_armed;
        if is_fault {
            self.soap_fault_armed = false;
        }

        self.push_complex_frame(id);
        self.read_complex_type_body()?;
        self.pop_type_frame();

        if is_fault {
            if let TypeKind::Complex(ct) = &mut self.tables.types.get_mut(id.0).kind {
                ct.is_soap_envelope_fault = true;
            }
        }
        Ok(id)
    }

    fn define_named_complex_type(&mut self, e: &BytesStart, ct: ComplexType) -> Result<Option<TypeId>> {
        let Some(name) = get_attr(e, "name")? else { return Ok(None) };
        let qname = QName::new(self.current_target_namespace(), name);
        Ok(Some(self.tables.define_type(qname, TypeKind::Complex(ct))))
    }

    fn read_complex_type_body(&mut self) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if is_named(&e, b"sequence") => self.parse_sequence()?,
                Event::Empty(e) if is_named(&e, b"sequence") => {}
                Event::Start(e) if is_named(&e, b"complexContent") || is_named(&e, b"simpleContent") => {
                    self.parse_content_wrapper()?;
                }
                Event::Start(e) if is_named(&e, b"attribute") => {
                    let owner = self.current_complex_type();
                    self.parse_attribute(&e, owner, true)?;
                }
                Event::Empty(e) if is_named(&e, b"attribute") => {
                    let owner = self.current_complex_type();
                    self.parse_attribute(&e, owner, false)?;
                }
                Event::Start(e)
                    if is_named(&e, b"choice")
                        || is_named(&e, b"all")
                        || is_named(&e, b"group")
                        || is_named(&e, b"attributeGroup") =>
                {
                    #[cfg(feature = "tracing")]
                    warn!(particle = %String::from_utf8_lossy(e.local_name().as_ref()), "particle not materialized, skipping");
                    self.skip_element()?;
                }
                Event::Empty(_) => {}
                Event::End(e) if e.local_name().as_ref() == b"complexType" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }

    /// `complexContent`/`simpleContent`: look for a nested
    /// `restriction`/`extension` and record its `base` as the current
    /// complex type's extension base (§4.3).
    fn parse_content_wrapper(&mut self) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                // `extension` carries its own nested particles (additional
                // fields on top of the base), so its body attaches onto the
                // enclosing complex type the same way a plain `complexType`
                // body would. `restriction` here only narrows facets on a
                // simpleContent base, nothing to attach, so it is skipped.
                Event::Start(e) if is_named(&e, b"extension") => {
                    self.record_extension_base(&e)?;
                    self.read_extension_body()?;
                }
                Event::Start(e) if is_named(&e, b"restriction") => {
                    self.record_extension_base(&e)?;
                    self.skip_element()?;
                }
                Event::Empty(e) if is_named(&e, b"extension") || is_named(&e, b"restriction") => {
                    self.record_extension_base(&e)?;
                }
                Event::End(e) if e.local_name().as_ref() == b"complexContent" || e.local_name().as_ref() == b"simpleContent" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }

    /// Nested `sequence`/`attribute` particles inside an `extension` body
    /// (§4.3): attach directly onto the enclosing complex type, same as
    /// `read_complex_type_body`'s own particle handling.
    fn read_extension_body(&mut self) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if is_named(&e, b"sequence") => self.parse_sequence()?,
                Event::Empty(e) if is_named(&e, b"sequence") => {}
                Event::Start(e) if is_named(&e, b"attribute") => {
                    let owner = self.current_complex_type();
                    self.parse_attribute(&e, owner, true)?;
                }
                Event::Empty(e) if is_named(&e, b"attribute") => {
                    let owner = self.current_complex_type();
                    self.parse_attribute(&e, owner, false)?;
                }
                Event::Start(e)
                    if is_named(&e, b"choice")
                        || is_named(&e, b"all")
                        || is_named(&e, b"group")
                        || is_named(&e, b"attributeGroup") =>
                {
                    #[cfg(feature = "tracing")]
                    warn!(particle = %String::from_utf8_lossy(e.local_name().as_ref()), "particle not materialized, skipping");
                    self.skip_element()?;
                }
                Event::Empty(_) => {}
                Event::End(e) if e.local_name().as_ref() == b"extension" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }

    fn record_extension_base(&mut self, e: &BytesStart) -> Result<()> {
        let Some(base_raw) = get_attr(e, "base")? else { return Ok(()) };
        let base_qname = self.resolve_qname(&base_raw);
        let base_id = self.tables.get_or_create_unknown_type(base_qname);
        if let Some(owner) = self.current_complex_type() {
            if let TypeKind::Complex(ct) = &mut self.tables.types.get_mut(owner.0).kind {
                ct.extension_base = Some(base_id);
            }
        }
        Ok(())
    }

    // -- sequence ------------------------------------------------------

    fn parse_sequence(&mut self) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if is_named(&e, b"element") => {
                    let owner = self.current_complex_type();
                    self.parse_element(&e, owner, true)?;
                }
                Event::Empty(e) if is_named(&e, b"element") => {
                    let owner = self.current_complex_type();
                    self.parse_element(&e, owner, false)?;
                }
                Event::Start(e) if is_named(&e, b"choice") || is_named(&e, b"any") || is_named(&e, b"group") => {
                    #[cfg(feature = "tracing")]
                    warn!("nested particle inside sequence not materialized, skipping");
                    self.skip_element()?;
                }
                Event::End(e) if e.local_name().as_ref() == b"sequence" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }

    // -- element -------------------------------------------------------

    /// `owner = None` means a top-level schema element (also creates a
    /// matching `RequestResponseElement`, §4.3.1); `owner = Some(id)`
    /// means nested inside that complex type's sequence.
    fn parse_element(&mut self, e: &BytesStart, owner: Option<TypeId>, has_body: bool) -> Result<()> {
        let min_occurs: u32 = get_attr(e, "minOccurs")?.and_then(|s| s.parse().ok()).unwrap_or(1);
        let max_occurs = get_attr(e, "maxOccurs")?.map(|s| MaxOccurs::parse(&s)).unwrap_or(MaxOccurs::Bounded(1));

        if let Some(ref_raw) = get_attr(e, "ref")? {
            let ref_qname = self.resolve_qname(&ref_raw);
            let mut element = match self.tables.find_element(&ref_qname) {
                Some(target) => {
                    let (qname, type_) = {
                        let t = self.tables.elements.get(target.0);
                        (t.qname.clone(), t.type_)
                    };
                    Element {
                        qname,
                        type_,
                        pending_ref: None,
                        ref_target: Some(target),
                        min_occurs,
                        max_occurs,
                        is_nested: false,
                        is_indirect: false,
                    }
                }
                None => {
                    let mut el = Element::deferred(ref_qname);
                    el.min_occurs = min_occurs;
                    el.max_occurs = max_occurs;
                    el
                }
            };
            element.min_occurs = min_occurs;
            element.max_occurs = max_occurs;
            let id = self.tables.insert_element(element);
            if let Some(owner_id) = owner {
                self.attach_element(owner_id, id);
            }
            if has_body {
                self.skip_element()?;
            }
            return Ok(());
        }

        let Some(name) = get_attr(e, "name")? else {
            if has_body {
                self.skip_element()?;
            }
            return Ok(());
        };
        let target_ns = self.current_target_namespace();
        let qname = QName::new(target_ns, name.clone());
        let type_attr = get_attr(e, "type")?;

        // Direct self-reference: `@type` names the enclosing complexType (§4.3.1).
        let is_nested = match (owner, &type_attr) {
            (Some(o), Some(raw)) => self.tables.type_qname(o) == &self.resolve_qname(raw),
            _ => false,
        };

        let (type_id, consumed_body) = if has_body {
            self.read_element_body(&qname, type_attr.as_deref())?
        } else {
            (
                type_attr
                    .map(|raw| self.resolve_qname(&raw))
                    .map(|q| self.tables.get_or_create_unknown_type(q))
                    .unwrap_or_else(|| self.tables.get_or_create_unknown_type(QName::new(XSD_NS, "anyType"))),
                true,
            )
        };
        let _ = consumed_body;

        let element = Element {
            qname: Some(qname.clone()),
            type_: Some(type_id),
            pending_ref: None,
            ref_target: None,
            min_occurs,
            max_occurs,
            is_nested,
            is_indirect: false,
        };
        let id = self.tables.insert_element(element);

        match owner {
            Some(owner_id) => self.attach_element(owner_id, id),
            None => {
                self.tables.insert_rre(crate::ir::RequestResponseElement { qname, type_: type_id });
            }
        }
        Ok(())
    }

    /// Read an `element`'s body (only relevant when it has one): look for
    /// an inline anonymous `complexType`/`simpleType` child. Returns the
    /// resolved type id and whether the closing tag has already been
    /// consumed (always true here; the caller need not skip further).
    fn read_element_body(&mut self, element_qname: &QName, type_attr: Option<&str>) -> Result<(TypeId, bool)> {
        if let Some(raw) = type_attr {
            let qname = self.resolve_qname(raw);
            self.skip_element()?;
            return Ok((self.tables.get_or_create_unknown_type(qname), true));
        }

        let mut buf = Vec::new();
        let mut result = None;
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if is_named(&e, b"complexType") => {
                    let id = self.parse_complex_type(&e, Some(&element_qname.local_name))?;
                    result = Some(id);
                }
                Event::Empty(e) if is_named(&e, b"complexType") => {
                    let id = self.define_named_complex_type(&e, ComplexType::default())?.unwrap_or_else(|| {
                        self.tables.insert_type(
                            QName::new(self.current_target_namespace(), element_qname.local_name.clone()),
                            TypeKind::Complex(ComplexType::default()),
                        )
                    });
                    result = Some(id);
                }
                Event::Start(e) if is_named(&e, b"simpleType") => {
                    let body = self.read_simple_type_body()?;
                    let anon_qname = QName::new(self.current_target_namespace(), element_qname.local_name.clone());
                    let kind = match body {
                        SimpleTypeBody::Restriction { base, facets } => TypeKind::Simple(SimpleType::Restriction { base, facets }),
                        SimpleTypeBody::List { item_type } => TypeKind::Simple(SimpleType::List { item_type }),
                        SimpleTypeBody::Union { member } => TypeKind::Simple(SimpleType::Union { member }),
                        SimpleTypeBody::None => TypeKind::Unknown,
                    };
                    result = Some(self.tables.insert_type(anon_qname, kind));
                }
                Event::End(e) if e.local_name().as_ref() == b"element" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        let id = result.unwrap_or_else(|| self.tables.get_or_create_unknown_type(QName::new(XSD_NS, "anyType")));
        Ok((id, true))
    }

    fn attach_element(&mut self, owner: TypeId, element: crate::ir::ElementId) {
        if let TypeKind::Complex(ct) = &mut self.tables.types.get_mut(owner.0).kind {
            ct.elements.push(element);
        }
    }

    // -- attribute -------------------------------------------------------

    fn parse_attribute(&mut self, e: &BytesStart, owner: Option<TypeId>, has_body: bool) -> Result<()> {
        let required = get_attr(e, "use")?.map(|u| u == "required").unwrap_or(false);

        if let Some(ref_raw) = get_attr(e, "ref")? {
            let ref_qname = self.resolve_qname(&ref_raw);
            let mut attr = match self.tables.find_attribute(&ref_qname) {
                Some(target) => {
                    let (qname, type_) = {
                        let t = self.tables.attributes.get(target.0);
                        (t.qname.clone(), t.type_)
                    };
                    Attribute { qname, type_, pending_ref: None, ref_target: Some(target), required, is_list: false }
                }
                None => {
                    let mut a = Attribute::deferred(ref_qname);
                    a.required = required;
                    a
                }
            };
            attr.required = required;
            let id = self.tables.insert_attribute(attr);
            if let Some(owner_id) = owner {
                self.attach_attribute(owner_id, id);
            }
            if has_body {
                self.skip_element()?;
            }
            return Ok(());
        }

        let Some(name) = get_attr(e, "name")? else {
            if has_body {
                self.skip_element()?;
            }
            return Ok(());
        };
        let qname = QName::new(self.current_target_namespace(), name);
        let type_attr = get_attr(e, "type")?;

        let (type_id, is_list) = if has_body && type_attr.is_none() {
            self.read_attribute_inline_simple_type()?
        } else if let Some(raw) = &type_attr {
            if has_body {
                self.skip_element()?;
            }
            let qname = self.resolve_qname(raw);
            (self.tables.get_or_create_unknown_type(qname), false)
        } else {
            if has_body {
                self.skip_element()?;
            }
            (self.tables.get_or_create_unknown_type(QName::new(XSD_NS, "string")), false)
        };

        let attr = Attribute { qname: Some(qname), type_: Some(type_id), pending_ref: None, ref_target: None, required, is_list };
        let id = self.tables.insert_attribute(attr);
        if let Some(owner_id) = owner {
            self.attach_attribute(owner_id, id);
        }
        Ok(())
    }

    /// `attribute` whose body directly contains an anonymous
    /// `simpleType`/`list`: sets `is_list` on the `Attribute` directly
    /// rather than going through the named-type list elevation (§4.3.2).
    fn read_attribute_inline_simple_type(&mut self) -> Result<(TypeId, bool)> {
        let mut buf = Vec::new();
        let mut result = None;
        let mut is_list = false;
        loop {
            match self.reader.read_event_into(&mut buf)? {
                Event::Start(e) if is_named(&e, b"simpleType") => {
                    let body = self.read_simple_type_body()?;
                    match body {
                        SimpleTypeBody::List { item_type } => {
                            is_list = true;
                            let kind = TypeKind::Simple(SimpleType::List { item_type });
                            result = Some(self.tables.insert_type(QName::unqualified(""), kind));
                        }
                        SimpleTypeBody::Restriction { base, facets } => {
                            let kind = TypeKind::Simple(SimpleType::Restriction { base, facets });
                            result = Some(self.tables.insert_type(QName::unqualified(""), kind));
                        }
                        SimpleTypeBody::Union { member } => {
                            let kind = TypeKind::Simple(SimpleType::Union { member });
                            result = Some(self.tables.insert_type(QName::unqualified(""), kind));
                        }
                        SimpleTypeBody::None => {}
                    }
                }
                Event::End(e) if e.local_name().as_ref() == b"attribute" => break,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        let id = result.unwrap_or_else(|| self.tables.get_or_create_unknown_type(QName::new(XSD_NS, "string")));
        Ok((id, is_list))
    }

    fn attach_attribute(&mut self, owner: TypeId, attribute: crate::ir::AttributeId) {
        if let TypeKind::Complex(ct) = &mut self.tables.types.get_mut(owner.0).kind {
            ct.attributes.push(attribute);
        }
    }
}

enum SimpleTypeBody {
    None,
    Restriction { base: QName, facets: Facets },
    List { item_type: QName },
    Union { member: QName },
}
