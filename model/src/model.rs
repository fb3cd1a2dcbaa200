//! The model: arena storage for every element kind.
//!
//! Elements are addressed by ID handles. Deleted elements stay in the
//! arenas as cleared tombstones so stale handles are reported as deleted
//! rather than unknown, and deletion stays idempotent.

use crate::{Association, Classifier, Enumeration, Link, Object};
use forma_core::{
    AssociationId, ClassifierId, EnumId, LinkId, ModelError, ModelResult, ObjectId,
};
use std::collections::HashMap;

#[derive(Debug)]
struct IdAllocator {
    next_classifier_id: u32,
    next_enum_id: u32,
    next_association_id: u32,
    next_object_id: u64,
    next_link_id: u64,
}

impl IdAllocator {
    fn new() -> Self {
        Self {
            next_classifier_id: 1,
            next_enum_id: 1,
            next_association_id: 1,
            next_object_id: 1,
            next_link_id: 1,
        }
    }
}

/// An in-memory model holding classifiers, enumerations, associations,
/// objects and links.
#[derive(Debug)]
pub struct Model {
    pub(crate) classifiers: HashMap<ClassifierId, Classifier>,
    pub(crate) enums: HashMap<EnumId, Enumeration>,
    pub(crate) associations: HashMap<AssociationId, Association>,
    pub(crate) objects: HashMap<ObjectId, Object>,
    pub(crate) links: HashMap<LinkId, Link>,
    id_alloc: IdAllocator,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self {
            classifiers: HashMap::new(),
            enums: HashMap::new(),
            associations: HashMap::new(),
            objects: HashMap::new(),
            links: HashMap::new(),
            id_alloc: IdAllocator::new(),
        }
    }

    // ==================== ID Allocation ====================

    pub(crate) fn alloc_classifier_id(&mut self) -> ClassifierId {
        let id = ClassifierId::new(self.id_alloc.next_classifier_id);
        self.id_alloc.next_classifier_id += 1;
        id
    }

    pub(crate) fn alloc_enum_id(&mut self) -> EnumId {
        let id = EnumId::new(self.id_alloc.next_enum_id);
        self.id_alloc.next_enum_id += 1;
        id
    }

    pub(crate) fn alloc_association_id(&mut self) -> AssociationId {
        let id = AssociationId::new(self.id_alloc.next_association_id);
        self.id_alloc.next_association_id += 1;
        id
    }

    pub(crate) fn alloc_object_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.id_alloc.next_object_id);
        self.id_alloc.next_object_id += 1;
        id
    }

    pub(crate) fn alloc_link_id(&mut self) -> LinkId {
        let id = LinkId::new(self.id_alloc.next_link_id);
        self.id_alloc.next_link_id += 1;
        id
    }

    // ==================== Lookup ====================

    /// Get a live classifier by ID.
    pub fn classifier(&self, id: ClassifierId) -> ModelResult<&Classifier> {
        let c = self
            .classifiers
            .get(&id)
            .ok_or(ModelError::ClassifierNotFound(id))?;
        if c.deleted {
            return Err(ModelError::deleted("classifier", id.to_string()));
        }
        Ok(c)
    }

    /// Mutable access without the liveness check; callers validate first.
    pub(crate) fn classifier_mut(&mut self, id: ClassifierId) -> ModelResult<&mut Classifier> {
        self.classifiers
            .get_mut(&id)
            .ok_or(ModelError::ClassifierNotFound(id))
    }

    pub(crate) fn object_mut(&mut self, id: ObjectId) -> ModelResult<&mut Object> {
        self.objects.get_mut(&id).ok_or(ModelError::ObjectNotFound(id))
    }

    // ==================== Display Names ====================

    pub(crate) fn classifier_display_name(&self, id: ClassifierId) -> String {
        self.classifiers
            .get(&id)
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub(crate) fn enum_display_name(&self, id: EnumId) -> String {
        self.enums
            .get(&id)
            .and_then(|e| e.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub(crate) fn association_display_name(&self, id: AssociationId) -> String {
        self.associations
            .get(&id)
            .and_then(|a| a.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub(crate) fn object_display_name(&self, id: ObjectId) -> String {
        self.objects
            .get(&id)
            .and_then(|o| o.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}
