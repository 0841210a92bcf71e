//! The service intermediate representation: symbol tables plus the
//! entity types they own. Every cross-entity reference is a non-owning
//! id/qname lookup into one of these tables — never an owned pointer.

use std::collections::HashMap;

use crate::qname::{QName, XML_NS, XSD_NS};

macro_rules! arena_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);
    };
}

arena_id!(TypeId);
arena_id!(ElementId);
arena_id!(AttributeId);
arena_id!(MessageId);
arena_id!(RequestResponseElementId);
arena_id!(OperationId);

/// A simple growable arena. Ids are stable for the arena's lifetime;
/// nothing is ever removed, only its slot contents replaced (see
/// [`SymbolTables::define_type`]), which keeps every previously issued
/// id valid across an in-place Unknown -> real upgrade.
#[derive(Debug, Default)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Arena<T> {
    pub fn push(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub fn get(&self, idx: usize) -> &T {
        &self.items[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut T {
        &mut self.items[idx]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }
}

/// The three built-in XSD primitives families plus a catch-all for the
/// handful the core doesn't special-case. This is not the full XSD
/// primitive hierarchy, just enough to name every entry in the built-in
/// table described in the ambient-stack section of the spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Boolean,
    Decimal,
    Float,
    Double,
    Duration,
    DateTime,
    Time,
    Date,
    GYearMonth,
    GYear,
    GMonthDay,
    GDay,
    GMonth,
    HexBinary,
    Base64Binary,
    AnyUri,
    QNameType,
    Notation,
    Integer,
    Long,
    Int,
    Short,
    Byte,
    NonNegativeInteger,
    PositiveInteger,
    NonPositiveInteger,
    NegativeInteger,
    UnsignedLong,
    UnsignedInt,
    UnsignedShort,
    UnsignedByte,
    AnyType,
    AnySimpleType,
    Language,
}

impl Primitive {
    pub fn local_name(self) -> &'static str {
        use Primitive::*;
        match self {
            String => "string",
            Boolean => "boolean",
            Decimal => "decimal",
            Float => "float",
            Double => "double",
            Duration => "duration",
            DateTime => "dateTime",
            Time => "time",
            Date => "date",
            GYearMonth => "gYearMonth",
            GYear => "gYear",
            GMonthDay => "gMonthDay",
            GDay => "gDay",
            GMonth => "gMonth",
            HexBinary => "hexBinary",
            Base64Binary => "base64Binary",
            AnyUri => "anyURI",
            QNameType => "QName",
            Notation => "NOTATION",
            Integer => "integer",
            Long => "long",
            Int => "int",
            Short => "short",
            Byte => "byte",
            NonNegativeInteger => "nonNegativeInteger",
            PositiveInteger => "positiveInteger",
            NonPositiveInteger => "nonPositiveInteger",
            NegativeInteger => "negativeInteger",
            UnsignedLong => "unsignedLong",
            UnsignedInt => "unsignedInt",
            UnsignedShort => "unsignedShort",
            UnsignedByte => "unsignedByte",
            AnyType => "anyType",
            AnySimpleType => "anySimpleType",
            Language => "language",
        }
    }

    pub const ALL: &'static [Primitive] = &[
        Primitive::String,
        Primitive::Boolean,
        Primitive::Decimal,
        Primitive::Float,
        Primitive::Double,
        Primitive::Duration,
        Primitive::DateTime,
        Primitive::Time,
        Primitive::Date,
        Primitive::GYearMonth,
        Primitive::GYear,
        Primitive::GMonthDay,
        Primitive::GDay,
        Primitive::GMonth,
        Primitive::HexBinary,
        Primitive::Base64Binary,
        Primitive::AnyUri,
        Primitive::QNameType,
        Primitive::Notation,
        Primitive::Integer,
        Primitive::Long,
        Primitive::Int,
        Primitive::Short,
        Primitive::Byte,
        Primitive::NonNegativeInteger,
        Primitive::PositiveInteger,
        Primitive::NonPositiveInteger,
        Primitive::NegativeInteger,
        Primitive::UnsignedLong,
        Primitive::UnsignedInt,
        Primitive::UnsignedShort,
        Primitive::UnsignedByte,
        Primitive::AnyType,
        Primitive::AnySimpleType,
        Primitive::Language,
    ];
}

/// A restriction's recorded facets. Only the three facets the spec puts
/// in scope (`enumeration`, `minLength`, `maxLength`) are tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    /// Ordered, unique by value.
    pub enumeration: Vec<String>,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
}

impl Facets {
    pub fn push_enumeration(&mut self, value: String) {
        if !self.enumeration.contains(&value) {
            self.enumeration.push(value);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleType {
    /// One of the built-in XSD primitives (the table is seeded at session
    /// start; this variant is also how a custom simpleType describes its
    /// ultimate grounding primitive isn't tracked further than `base`).
    Primitive(Primitive),
    Restriction { base: QName, facets: Facets },
    /// `<list itemType="...">`: the value is a whitespace-separated
    /// sequence of the base primitive. Only reachable for an anonymous
    /// simpleType nested directly in an attribute (§4.3.2); a *named*
    /// simpleType containing `list` is elevated to a ComplexType instead
    /// (§4.3) and never stored as this variant.
    List { item_type: QName },
    /// `<union memberTypes="...">`: only the first XSD-primitive member
    /// is retained (see DESIGN.md Open Question decision).
    Union { member: QName },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Unknown,
    Simple(SimpleType),
    Complex(ComplexType),
}

#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub qname: QName,
    pub kind: TypeKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplexType {
    /// Ordered element children (document order preserved).
    pub elements: Vec<ElementId>,
    /// Attribute children; order is not semantically meaningful.
    pub attributes: Vec<AttributeId>,
    pub extension_base: Option<TypeId>,
    pub extension_is_list: bool,
    pub is_soap_envelope_fault: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    Bounded(u32),
    Unbounded,
}

impl MaxOccurs {
    pub fn parse(raw: &str) -> MaxOccurs {
        if raw == "unbounded" {
            MaxOccurs::Unbounded
        } else {
            raw.parse().map(MaxOccurs::Bounded).unwrap_or(MaxOccurs::Bounded(1))
        }
    }

    pub fn is_collection(self) -> bool {
        matches!(self, MaxOccurs::Unbounded) || matches!(self, MaxOccurs::Bounded(n) if n > 1)
    }
}

/// Either a fully named element, or one deferring to `@ref` (whose
/// name/type are inherited from the referent once resolved).
#[derive(Debug, Clone)]
pub struct Element {
    pub qname: Option<QName>,
    pub type_: Option<TypeId>,
    /// `ref` target qname (already resolved against the namespace
    /// declarations in scope where `ref` was written), pending lookup.
    pub pending_ref: Option<QName>,
    pub ref_target: Option<ElementId>,
    pub min_occurs: u32,
    pub max_occurs: MaxOccurs,
    pub is_nested: bool,
    pub is_indirect: bool,
}

impl Element {
    pub fn named(qname: QName, type_: TypeId) -> Self {
        Element {
            qname: Some(qname),
            type_: Some(type_),
            pending_ref: None,
            ref_target: None,
            min_occurs: 1,
            max_occurs: MaxOccurs::Bounded(1),
            is_nested: false,
            is_indirect: false,
        }
    }

    pub fn deferred(ref_qname: QName) -> Self {
        Element {
            qname: None,
            type_: None,
            pending_ref: Some(ref_qname),
            ref_target: None,
            min_occurs: 1,
            max_occurs: MaxOccurs::Bounded(1),
            is_nested: false,
            is_indirect: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub qname: Option<QName>,
    pub type_: Option<TypeId>,
    /// `ref` target qname, already resolved against declarations in
    /// scope at the point `ref` was written, pending lookup.
    pub pending_ref: Option<QName>,
    pub ref_target: Option<AttributeId>,
    pub required: bool,
    pub is_list: bool,
}

impl Attribute {
    pub fn named(qname: QName, type_: TypeId) -> Self {
        Attribute {
            qname: Some(qname),
            type_: Some(type_),
            pending_ref: None,
            ref_target: None,
            required: false,
            is_list: false,
        }
    }

    pub fn deferred(ref_qname: QName) -> Self {
        Attribute {
            qname: None,
            type_: None,
            pending_ref: Some(ref_qname),
            ref_target: None,
            required: false,
            is_list: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub qname: QName,
    pub parameter: Option<RequestResponseElementId>,
}

#[derive(Debug, Clone)]
pub struct RequestResponseElement {
    pub qname: QName,
    pub type_: TypeId,
}

#[derive(Debug, Clone)]
pub struct Operation {
    pub name: String,
    pub soap_action: Option<String>,
    pub input: Option<MessageId>,
    pub output: Option<MessageId>,
    pub fault_type: Option<TypeId>,
    pub documentation: Option<String>,
}

impl Operation {
    pub fn new(name: String) -> Self {
        Operation {
            name,
            soap_action: None,
            input: None,
            output: None,
            fault_type: None,
            documentation: None,
        }
    }
}

/// A `wsdl:service/port` endpoint. Not named in the core data model
/// table but mentioned in the system overview ("Service ... endpoints");
/// carried through since the teacher's model already has the fields and
/// a downstream code generator needs an address to dial.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub name: String,
    pub binding: QName,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Service {
    pub name: String,
    pub target_namespace_uri: Option<String>,
    pub operations: Vec<OperationId>,
    pub endpoints: Vec<Endpoint>,
}

/// Every entity created while ingesting a WSDL document set, owned
/// exclusively by this table and looked up everywhere else by id/qname.
#[derive(Debug, Default)]
pub struct SymbolTables {
    pub types: Arena<TypeEntry>,
    types_by_qname: HashMap<QName, Vec<TypeId>>,

    pub elements: Arena<Element>,
    elements_by_qname: HashMap<QName, Vec<ElementId>>,

    pub attributes: Arena<Attribute>,
    attributes_by_qname: HashMap<QName, Vec<AttributeId>>,

    pub messages: Arena<Message>,
    messages_by_qname: HashMap<QName, MessageId>,

    pub request_response_elements: Arena<RequestResponseElement>,
    rre_by_qname: HashMap<QName, Vec<RequestResponseElementId>>,

    pub operations: Arena<Operation>,
}

impl SymbolTables {
    /// A fresh table pre-seeded with the built-in XSD primitive types and
    /// the `xml:lang` attribute (see SPEC_FULL §3).
    pub fn with_builtins() -> Self {
        let mut tables = SymbolTables::default();
        for &prim in Primitive::ALL {
            tables.define_type(QName::new(XSD_NS, prim.local_name()), TypeKind::Simple(SimpleType::Primitive(prim)));
        }
        let lang_type = tables
            .find_type(&QName::new(XSD_NS, "language"), &Default::default())
            .expect("language primitive just seeded");
        let attr = Attribute::named(QName::new(XML_NS, "lang"), lang_type);
        tables.insert_attribute(attr);
        tables
    }

    // -- types ---------------------------------------------------------

    fn push_type_index(&mut self, qname: QName, id: TypeId) {
        self.types_by_qname.entry(qname).or_default().push(id);
    }

    /// Register a fresh type entry unconditionally.
    pub fn insert_type(&mut self, qname: QName, kind: TypeKind) -> TypeId {
        let id = TypeId(self.types.push(TypeEntry { qname: qname.clone(), kind }));
        self.push_type_index(qname, id);
        id
    }

    /// Define (or redefine) the type at `qname`. If an existing entry for
    /// this qname is still `Unknown`, it is upgraded in place so that ids
    /// issued to earlier forward references keep pointing at real data.
    /// Otherwise a fresh entry is appended (a legitimate second definition
    /// under one qname, e.g. merged from two documents, is tolerated here
    /// and disambiguated later by the resolver's ignore-set lookup).
    pub fn define_type(&mut self, qname: QName, kind: TypeKind) -> TypeId {
        if let Some(ids) = self.types_by_qname.get(&qname) {
            if let Some(&id) = ids.first() {
                if matches!(self.types.get(id.0).kind, TypeKind::Unknown) {
                    self.types.get_mut(id.0).kind = kind;
                    return id;
                }
            }
        }
        self.insert_type(qname, kind)
    }

    /// Look up (or allocate as `Unknown`) the type for a forward reference.
    pub fn get_or_create_unknown_type(&mut self, qname: QName) -> TypeId {
        if let Some(ids) = self.types_by_qname.get(&qname) {
            if let Some(&id) = ids.first() {
                return id;
            }
        }
        self.insert_type(qname, TypeKind::Unknown)
    }

    /// Find the first entry for `qname` not present in `ignore`.
    pub fn find_type(&self, qname: &QName, ignore: &std::collections::HashSet<TypeId>) -> Option<TypeId> {
        self.types_by_qname
            .get(qname)?
            .iter()
            .copied()
            .find(|id| !ignore.contains(id))
    }

    pub fn type_kind(&self, id: TypeId) -> &TypeKind {
        &self.types.get(id.0).kind
    }

    pub fn type_qname(&self, id: TypeId) -> &QName {
        &self.types.get(id.0).qname
    }

    pub fn is_unknown(&self, id: TypeId) -> bool {
        matches!(self.type_kind(id), TypeKind::Unknown)
    }

    /// Remove every type id in `ids` from the qname index (used by the
    /// resolver to drop placeholders that never resolved).
    pub fn remove_types(&mut self, ids: &std::collections::HashSet<TypeId>) {
        self.types_by_qname
            .values_mut()
            .for_each(|v| v.retain(|id| !ids.contains(id)));
    }

    // -- elements --------------------------------------------------------

    pub fn insert_element(&mut self, element: Element) -> ElementId {
        let qname = element.qname.clone();
        let id = ElementId(self.elements.push(element));
        if let Some(qname) = qname {
            self.elements_by_qname.entry(qname).or_default().push(id);
        }
        id
    }

    pub fn find_element(&self, qname: &QName) -> Option<ElementId> {
        self.elements_by_qname.get(qname)?.first().copied()
    }

    pub fn index_element_qname(&mut self, qname: QName, id: ElementId) {
        self.elements_by_qname.entry(qname).or_default().push(id);
    }

    // -- attributes --------------------------------------------------------

    pub fn insert_attribute(&mut self, attribute: Attribute) -> AttributeId {
        let qname = attribute.qname.clone();
        let id = AttributeId(self.attributes.push(attribute));
        if let Some(qname) = qname {
            self.attributes_by_qname.entry(qname).or_default().push(id);
        }
        id
    }

    pub fn find_attribute(&self, qname: &QName) -> Option<AttributeId> {
        self.attributes_by_qname.get(qname)?.first().copied()
    }

    // -- merge (import/include, §4.4) -------------------------------------

    /// Merge a nested document's whole symbol table into this (parent)
    /// one. Every id a child entity carries (`type_`, `ref_target`,
    /// `extension_base`, the element/attribute lists of a `ComplexType`)
    /// is an index into the *child's* arenas, so a plain field-by-field
    /// copy would silently alias unrelated parent entries once merged.
    /// Elements and attributes are copied first (building child -> parent
    /// id maps), then types are copied with their `ComplexType.elements`/
    /// `.attributes` rewritten through those maps and deduplicated by
    /// qname per rule 1 (keep the parent's resolved entry, otherwise take
    /// the child's) — anonymous types (empty qname) are never deduped,
    /// since an empty qname is shared by every anonymous type and isn't
    /// an identity. Finally every copied type's `extension_base` and every
    /// copied element's/attribute's `type_` is rewritten through the now-
    /// complete type id map, and request/response elements are copied last
    /// for the same reason.
    pub fn merge_from(&mut self, child: &SymbolTables) {
        let mut element_map = HashMap::new();
        for idx in 0..child.elements.len() {
            let parent_id = self.insert_element(child.elements.get(idx).clone());
            element_map.insert(ElementId(idx), parent_id);
        }

        let mut attribute_map = HashMap::new();
        for idx in 0..child.attributes.len() {
            let parent_id = self.insert_attribute(child.attributes.get(idx).clone());
            attribute_map.insert(AttributeId(idx), parent_id);
        }

        let mut type_map = HashMap::new();
        let mut written: Vec<TypeId> = Vec::new();
        for idx in 0..child.types.len() {
            let child_id = TypeId(idx);
            let entry = child.types.get(idx).clone();
            let parent_resolved = !entry.qname.local_name.is_empty()
                && self
                    .types_by_qname
                    .get(&entry.qname)
                    .is_some_and(|ids| ids.iter().any(|id| !self.is_unknown(*id)));

            let target = if parent_resolved {
                self.find_type(&entry.qname, &Default::default()).expect("just checked present")
            } else {
                let mut kind = entry.kind;
                if let TypeKind::Complex(ct) = &mut kind {
                    ct.elements = ct.elements.iter().map(|id| *element_map.get(id).unwrap_or(id)).collect();
                    ct.attributes = ct.attributes.iter().map(|id| *attribute_map.get(id).unwrap_or(id)).collect();
                }
                let id = self.define_type(entry.qname, kind);
                written.push(id);
                id
            };
            type_map.insert(child_id, target);
        }

        for &id in &written {
            if let TypeKind::Complex(ct) = &mut self.types.get_mut(id.0).kind {
                if let Some(base) = ct.extension_base {
                    ct.extension_base = Some(*type_map.get(&base).unwrap_or(&base));
                }
            }
        }

        for &parent_id in element_map.values() {
            let el = self.elements.get_mut(parent_id.0);
            if let Some(t) = el.type_ {
                el.type_ = Some(*type_map.get(&t).unwrap_or(&t));
            }
        }
        for &parent_id in attribute_map.values() {
            let attr = self.attributes.get_mut(parent_id.0);
            if let Some(t) = attr.type_ {
                attr.type_ = Some(*type_map.get(&t).unwrap_or(&t));
            }
        }

        for rre in child.request_response_elements.iter() {
            let mut rre = rre.clone();
            rre.type_ = *type_map.get(&rre.type_).unwrap_or(&rre.type_);
            self.insert_rre(rre);
        }
    }

    // -- messages --------------------------------------------------------

    pub fn insert_message(&mut self, message: Message) -> MessageId {
        let qname = message.qname.clone();
        let id = MessageId(self.messages.push(message));
        self.messages_by_qname.insert(qname, id);
        id
    }

    pub fn find_message(&self, qname: &QName) -> Option<MessageId> {
        self.messages_by_qname.get(qname).copied()
    }

    // -- request/response elements ---------------------------------------

    pub fn insert_rre(&mut self, rre: RequestResponseElement) -> RequestResponseElementId {
        let qname = rre.qname.clone();
        let id = RequestResponseElementId(self.request_response_elements.push(rre));
        self.rre_by_qname.entry(qname).or_default().push(id);
        id
    }

    pub fn find_rre(&self, qname: &QName) -> Option<RequestResponseElementId> {
        self.rre_by_qname.get(qname)?.first().copied()
    }

    // -- operations --------------------------------------------------------

    pub fn insert_operation(&mut self, operation: Operation) -> OperationId {
        OperationId(self.operations.push(operation))
    }

    pub fn find_operation_by_name(&self, name: &str) -> Option<OperationId> {
        self.operations
            .iter()
            .enumerate()
            .find(|(_, op)| op.name == name)
            .map(|(idx, _)| OperationId(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_seed_xsd_string_and_xml_lang() {
        let tables = SymbolTables::with_builtins();
        let string_id = tables
            .find_type(&QName::new(XSD_NS, "string"), &Default::default())
            .expect("xs:string seeded");
        assert!(matches!(
            tables.type_kind(string_id),
            TypeKind::Simple(SimpleType::Primitive(Primitive::String))
        ));
        let lang = tables
            .find_attribute(&QName::new(XML_NS, "lang"))
            .expect("xml:lang seeded");
        assert!(tables.attributes.get(lang.0).qname.is_some());
    }

    #[test]
    fn forward_reference_placeholder_is_upgraded_in_place() {
        let mut tables = SymbolTables::with_builtins();
        let qname = QName::new("http://tempuri.org/", "Widget");
        let placeholder = tables.get_or_create_unknown_type(qname.clone());
        assert!(tables.is_unknown(placeholder));

        let upgraded = tables.define_type(qname.clone(), TypeKind::Complex(ComplexType::default()));
        assert_eq!(placeholder, upgraded);
        assert!(!tables.is_unknown(placeholder));
    }

    #[test]
    fn merge_prefers_parent_resolved_type() {
        let mut parent = SymbolTables::with_builtins();
        let qname = QName::new("http://tempuri.org/", "Widget");
        parent.define_type(qname.clone(), TypeKind::Complex(ComplexType::default()));

        let mut child = SymbolTables::default();
        child.get_or_create_unknown_type(qname.clone());

        parent.merge_from(&child);
        let id = parent.find_type(&qname, &Default::default()).unwrap();
        assert!(!parent.is_unknown(id));
    }

    #[test]
    fn merge_adds_type_parent_does_not_have() {
        let mut parent = SymbolTables::with_builtins();
        let mut child = SymbolTables::default();
        let qname = QName::new("http://tempuri.org/", "OnlyInChild");
        child.define_type(qname.clone(), TypeKind::Complex(ComplexType::default()));

        parent.merge_from(&child);
        let id = parent.find_type(&qname, &Default::default()).unwrap();
        assert!(!parent.is_unknown(id));
    }

    #[test]
    fn merge_remaps_child_local_type_ids_on_elements() {
        // The child's own type-id numbering for "Child" happens to collide
        // with an unrelated parent-local type id; merging must not alias
        // the element onto that unrelated parent type.
        let mut parent = SymbolTables::with_builtins();
        let decoy_qname = QName::new("http://tempuri.org/", "Decoy");
        parent.define_type(decoy_qname, TypeKind::Complex(ComplexType::default()));

        let mut child = SymbolTables::default();
        let child_qname = QName::new("http://tempuri.org/", "Child");
        let child_type = child.define_type(child_qname.clone(), TypeKind::Complex(ComplexType::default()));
        let el = child.insert_element(Element::named(QName::new("http://tempuri.org/", "e"), child_type));
        child.define_type(
            QName::new("http://tempuri.org/", "Owner"),
            TypeKind::Complex(ComplexType { elements: vec![el], ..Default::default() }),
        );

        parent.merge_from(&child);

        let owner_id = parent.find_type(&QName::new("http://tempuri.org/", "Owner"), &Default::default()).unwrap();
        let TypeKind::Complex(owner_ct) = parent.type_kind(owner_id) else { panic!("expected complex") };
        let merged_element_id = owner_ct.elements[0];
        let element_type_id = parent.elements.get(merged_element_id.0).type_.unwrap();
        assert_eq!(parent.type_qname(element_type_id), &child_qname);
    }
}
