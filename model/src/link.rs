//! Links: instances of associations.

use crate::{Model, ValueStore};
use forma_core::{AssociationId, ClassifierId, LinkId, ModelError, ModelResult, ObjectId};

/// An instance of exactly one association connecting two instances.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: LinkId,
    pub label: Option<String>,
    pub deleted: bool,
    pub association: AssociationId,
    pub source: ObjectId,
    pub target: ObjectId,
    /// Stereotype instances applied to this link.
    pub stereotype_instances: Vec<ClassifierId>,
    /// Tagged values keyed by the defining stereotype.
    pub(crate) tagged_values: ValueStore,
}

impl Model {
    /// Get a live link by ID.
    pub fn link(&self, id: LinkId) -> ModelResult<&Link> {
        let l = self.links.get(&id).ok_or(ModelError::LinkNotFound(id))?;
        if l.deleted {
            return Err(ModelError::deleted("link", id.to_string()));
        }
        Ok(l)
    }

    /// Live links touching an object.
    pub fn links_of(&self, object: ObjectId) -> ModelResult<Vec<LinkId>> {
        Ok(self.object(object)?.links.clone())
    }

    /// Live links of one association touching an object.
    pub fn links_for_association(
        &self,
        object: ObjectId,
        association: AssociationId,
    ) -> ModelResult<Vec<LinkId>> {
        self.association(association)?;
        Ok(self
            .object(object)?
            .links
            .iter()
            .copied()
            .filter(|&l| {
                self.links
                    .get(&l)
                    .map(|link| link.association == association)
                    .unwrap_or(false)
            })
            .collect())
    }

    /// Opposite endpoints of all links touching an object.
    pub fn linked_objects(&self, object: ObjectId) -> ModelResult<Vec<ObjectId>> {
        let o = self.object(object)?;
        let mut result = Vec::new();
        for &link_id in &o.links {
            if let Some(link) = self.links.get(&link_id) {
                let opposite = if link.source == object {
                    link.target
                } else {
                    link.source
                };
                result.push(opposite);
            }
        }
        Ok(result)
    }

    /// Delete a single link without multiplicity re-validation (the
    /// validated path is `delete_links`). Deleting twice is a no-op.
    pub fn delete_link(&mut self, id: LinkId) -> ModelResult<()> {
        let l = self.links.get(&id).ok_or(ModelError::LinkNotFound(id))?;
        if l.deleted {
            return Ok(());
        }
        self.delete_link_raw(id);
        Ok(())
    }

    pub(crate) fn delete_link_raw(&mut self, id: LinkId) {
        let Some(l) = self.links.get(&id) else {
            return;
        };
        if l.deleted {
            return;
        }
        let association = l.association;
        let source = l.source;
        let target = l.target;

        if let Some(a) = self.associations.get_mut(&association) {
            a.links.retain(|&x| x != id);
        }
        for endpoint in [source, target] {
            if let Some(o) = self.objects.get_mut(&endpoint) {
                o.links.retain(|&x| x != id);
            }
        }

        if let Some(l) = self.links.get_mut(&id) {
            l.stereotype_instances.clear();
            l.tagged_values.clear();
            l.label = None;
            l.deleted = true;
        }
    }
}
