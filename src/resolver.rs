//! End-of-document resolver (§4.5): six sub-passes that replace
//! placeholder references with real entities and mark cyclic edges.
//!
//! Runs once, after the outermost parse (including every nested
//! import/include) has completed.

use std::collections::HashSet;

#[cfg(feature = "tracing")]
use tracing::warn;

use crate::error::{Error, ReferenceKind, Result};
use crate::ir::{ElementId, MaxOccurs, SymbolTables, TypeId, TypeKind};

/// Run all six sub-passes. In strict mode, any reference still pointing
/// at `Unknown` after resolution is collected into a single
/// [`Error::UnresolvedReferences`]; in lax mode the same list is only
/// logged as warnings.
pub fn resolve(tables: &mut SymbolTables, strict: bool) -> Result<()> {
    resolve_refs(tables);
    resolve_type_upgrades(tables);
    resolve_rre_upgrades(tables);
    wire_soap_faults(tables);
    mark_cycles(tables);
    final_check(tables, strict)
}

/// Pass 1: element and attribute `ref` fix-up.
fn resolve_refs(tables: &mut SymbolTables) {
    let element_ids: Vec<ElementId> = (0..tables.elements.len()).map(ElementId).collect();
    for id in element_ids {
        let pending = tables.elements.get(id.0).pending_ref.clone();
        let Some(qname) = pending else { continue };
        if let Some(target) = tables.find_element(&qname) {
            let (target_qname, target_type) = {
                let t = tables.elements.get(target.0);
                (t.qname.clone(), t.type_)
            };
            let el = tables.elements.get_mut(id.0);
            el.ref_target = Some(target);
            el.qname = target_qname;
            el.type_ = target_type;
            el.pending_ref = None;
        } else {
            #[cfg(feature = "tracing")]
            warn!(qname = %qname, "element ref did not resolve");
        }
    }

    let attribute_ids: Vec<crate::ir::AttributeId> =
        (0..tables.attributes.len()).map(crate::ir::AttributeId).collect();
    for id in attribute_ids {
        let pending = tables.attributes.get(id.0).pending_ref.clone();
        let Some(qname) = pending else { continue };
        if let Some(target) = tables.find_attribute(&qname) {
            let (target_qname, target_type) = {
                let t = tables.attributes.get(target.0);
                (t.qname.clone(), t.type_)
            };
            let attr = tables.attributes.get_mut(id.0);
            attr.ref_target = Some(target);
            attr.qname = target_qname;
            attr.type_ = target_type;
            attr.pending_ref = None;
        } else {
            #[cfg(feature = "tracing")]
            warn!(qname = %qname, "attribute ref did not resolve");
        }
    }
}

/// Upgrade a single `Unknown` type reference, skipping over stand-ins
/// that are themselves still `Unknown` until a real definition is found
/// or the candidates are exhausted. Converges because every iteration
/// either succeeds or removes one candidate from the search space.
/// Candidates visited but not kept are deleted from the table.
fn upgrade_type_ref(tables: &mut SymbolTables, type_id: TypeId) -> TypeId {
    if !tables.is_unknown(type_id) {
        return type_id;
    }
    let qname = tables.type_qname(type_id).clone();
    let mut ignore: HashSet<TypeId> = HashSet::new();
    loop {
        match tables.find_type(&qname, &ignore) {
            Some(candidate) if !tables.is_unknown(candidate) => {
                tables.remove_types(&ignore);
                return candidate;
            }
            Some(candidate) => {
                ignore.insert(candidate);
            }
            None => {
                tables.remove_types(&ignore);
                return type_id;
            }
        }
    }
}

/// Pass 2: type upgrade for complex type extension bases and the types
/// of their child elements/attributes.
fn resolve_type_upgrades(tables: &mut SymbolTables) {
    let complex_ids: Vec<TypeId> = (0..tables.types.len())
        .map(TypeId)
        .filter(|id| matches!(tables.type_kind(*id), TypeKind::Complex(_)))
        .collect();

    for id in complex_ids {
        let extension_base = match tables.type_kind(id) {
            TypeKind::Complex(ct) => ct.extension_base,
            _ => None,
        };
        if let Some(base_id) = extension_base {
            let upgraded = upgrade_type_ref(tables, base_id);
            if let TypeKind::Complex(ct) = &mut tables.types.get_mut(id.0).kind {
                ct.extension_base = Some(upgraded);
            }
        }

        let element_ids = match tables.type_kind(id) {
            TypeKind::Complex(ct) => ct.elements.clone(),
            _ => Vec::new(),
        };
        for element_id in element_ids {
            if let Some(current) = tables.elements.get(element_id.0).type_ {
                let upgraded = upgrade_type_ref(tables, current);
                tables.elements.get_mut(element_id.0).type_ = Some(upgraded);
            }
        }

        let attribute_ids = match tables.type_kind(id) {
            TypeKind::Complex(ct) => ct.attributes.clone(),
            _ => Vec::new(),
        };
        for attribute_id in attribute_ids {
            if let Some(current) = tables.attributes.get(attribute_id.0).type_ {
                let upgraded = upgrade_type_ref(tables, current);
                tables.attributes.get_mut(attribute_id.0).type_ = Some(upgraded);
            }
        }
    }
}

/// Pass 3: request/response element type upgrade.
fn resolve_rre_upgrades(tables: &mut SymbolTables) {
    for idx in 0..tables.request_response_elements.len() {
        let current = tables.request_response_elements.get(idx).type_;
        let upgraded = upgrade_type_ref(tables, current);
        tables.request_response_elements.get_mut(idx).type_ = upgraded;
    }
}

/// Pass 4: wire the SOAP-envelope `Fault` complex type (if any) onto
/// every operation's `fault_type`.
fn wire_soap_faults(tables: &mut SymbolTables) {
    let fault_type = (0..tables.types.len()).map(TypeId).find(|id| {
        matches!(tables.type_kind(*id), TypeKind::Complex(ct) if ct.is_soap_envelope_fault)
    });
    if let Some(fault_id) = fault_type {
        for operation in tables.operations.iter_mut() {
            operation.fault_type = Some(fault_id);
        }
    }
}

/// Pass 5: mark the cyclic edge of every A -> B -> A complex-type
/// reference pair (single-cardinality, non-nested) as `is_indirect`.
fn mark_cycles(tables: &mut SymbolTables) {
    struct Edge {
        owner: TypeId,
        element: ElementId,
        target: TypeId,
    }

    let mut edges = Vec::new();
    for idx in 0..tables.types.len() {
        let owner = TypeId(idx);
        if let TypeKind::Complex(ct) = tables.type_kind(owner) {
            for &element_id in &ct.elements {
                if let Some(target) = tables.elements.get(element_id.0).type_ {
                    if matches!(tables.type_kind(target), TypeKind::Complex(_)) {
                        edges.push(Edge { owner, element: element_id, target });
                    }
                }
            }
        }
    }

    // Direct self-loop (A -> A through one element): the edge pairs with
    // itself, so the i != j mutual-recursion search below would never see
    // it. Mark it on its own whenever its single element qualifies.
    for edge in &edges {
        if edge.owner == edge.target {
            let element = tables.elements.get(edge.element.0);
            if element.max_occurs == MaxOccurs::Bounded(1) && !element.is_nested {
                tables.elements.get_mut(edge.element.0).is_indirect = true;
            }
        }
    }

    for i in 0..edges.len() {
        for j in 0..edges.len() {
            if i == j {
                continue;
            }
            let (out, back) = (&edges[i], &edges[j]);
            if out.target != back.owner || back.target != out.owner {
                continue;
            }
            let back_element = tables.elements.get(back.element.0);
            let qualifies =
                back_element.max_occurs == MaxOccurs::Bounded(1) && !back_element.is_nested;
            if qualifies {
                tables.elements.get_mut(out.element.0).is_indirect = true;
                tables.elements.get_mut(back.element.0).is_indirect = true;
            }
        }
    }
}

/// Pass 6: any remaining `Unknown` type still referenced by a live
/// entity is collected as an error (strict) or a logged warning (lax).
fn final_check(tables: &SymbolTables, strict: bool) -> Result<()> {
    let mut unresolved = Vec::new();

    for type_entry_idx in 0..tables.types.len() {
        let id = TypeId(type_entry_idx);
        if let TypeKind::Complex(ct) = tables.type_kind(id) {
            if let Some(base) = ct.extension_base {
                if tables.is_unknown(base) {
                    unresolved.push(unresolved_type(tables, base));
                }
            }
        }
    }
    for element in tables.elements.iter() {
        if let Some(t) = element.type_ {
            if tables.is_unknown(t) {
                unresolved.push(unresolved_type(tables, t));
            }
        }
    }
    for attribute in tables.attributes.iter() {
        if let Some(t) = attribute.type_ {
            if tables.is_unknown(t) {
                unresolved.push(unresolved_type(tables, t));
            }
        }
    }
    for rre in tables.request_response_elements.iter() {
        if tables.is_unknown(rre.type_) {
            unresolved.push(unresolved_type(tables, rre.type_));
        }
    }

    if unresolved.is_empty() {
        return Ok(());
    }

    if strict {
        Err(Error::UnresolvedReferences(unresolved))
    } else {
        #[cfg(feature = "tracing")]
        for err in &unresolved {
            warn!(%err, "unresolved reference left in place (lax mode)");
        }
        #[cfg(not(feature = "tracing"))]
        let _ = &unresolved;
        Ok(())
    }
}

fn unresolved_type(tables: &SymbolTables, id: TypeId) -> Error {
    Error::UnresolvedReference {
        qname: tables.type_qname(id).clone(),
        kind: ReferenceKind::Type,
    }
}
