//! Per-element neighbor enumeration.
//!
//! `connected` reports the elements one step away from a given element so an
//! external traversal can expand a frontier; the engine itself implements no
//! graph search.

use crate::{ExtensionTarget, Model};
use forma_core::{ElementId, ModelResult};

impl Model {
    /// The locally-connected neighbors of an element: superclasses and
    /// subclasses, association partners, link partners, extending
    /// stereotypes and the metaclass/class relation.
    pub fn connected(&self, element: ElementId) -> ModelResult<Vec<ElementId>> {
        let mut result: Vec<ElementId> = Vec::new();
        let push = |e: ElementId, result: &mut Vec<ElementId>| {
            if !result.contains(&e) {
                result.push(e);
            }
        };

        match element {
            ElementId::Classifier(id) => {
                let c = self.classifier(id)?;
                for &clf in c.superclasses.iter().chain(&c.subclasses) {
                    push(clf.into(), &mut result);
                }
                for &assoc in &c.associations {
                    if let Some(a) = self.associations.get(&assoc) {
                        let partner = if a.source == id { a.target } else { a.source };
                        push(partner.into(), &mut result);
                    }
                }
                for &st in &c.extended_by {
                    push(st.into(), &mut result);
                }
                if let Some(metaclass) = c.metaclass {
                    push(metaclass.into(), &mut result);
                }
                for &class in &c.classes {
                    push(class.into(), &mut result);
                }
                for target in &c.extended {
                    match target {
                        ExtensionTarget::Metaclass(mc) => push((*mc).into(), &mut result),
                        ExtensionTarget::Association(a) => push((*a).into(), &mut result),
                    }
                }
            }
            ElementId::Object(id) => {
                for partner in self.linked_objects(id)? {
                    push(partner.into(), &mut result);
                }
            }
            ElementId::Association(id) => {
                let a = self.association(id)?;
                push(a.source.into(), &mut result);
                push(a.target.into(), &mut result);
                for &st in &a.extended_by {
                    push(st.into(), &mut result);
                }
            }
            ElementId::Link(id) => {
                let l = self.link(id)?;
                push(l.source.into(), &mut result);
                push(l.target.into(), &mut result);
                push(l.association.into(), &mut result);
            }
            ElementId::Enumeration(id) => {
                self.enumeration(id)?;
            }
        }
        Ok(result)
    }
}
