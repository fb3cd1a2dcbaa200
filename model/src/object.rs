//! Objects: instances of classes and the reflective class-objects.
//!
//! A class-object stands in for a class wherever an instance of the class's
//! metaclass is expected: metaclass-level links, metaclass attribute values,
//! stereotype instances and tagged values all live on it.

use crate::{ClassifierKind, Model, ValueStore};
use forma_core::{ClassifierId, LinkId, ModelError, ModelResult, ObjectId};

/// Whether an object is a plain instance or a class standing in as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectRole {
    /// A plain instance of a class.
    Instance,
    /// The reflective object of the given class; its classifier is the
    /// class's metaclass.
    ClassObject(ClassifierId),
}

/// An instance in the model.
#[derive(Debug, Clone)]
pub struct Object {
    pub id: ObjectId,
    pub name: Option<String>,
    pub deleted: bool,
    /// The classifier this object is an instance of (for class-objects,
    /// the class's metaclass).
    pub classifier: ClassifierId,
    pub role: ObjectRole,
    /// Attribute values keyed by the defining classifier in the class path,
    /// so a value set for a superclass never collides with a same-named
    /// attribute defined lower.
    pub(crate) values: ValueStore,
    /// Tagged values keyed by the defining stereotype.
    pub(crate) tagged_values: ValueStore,
    /// Stereotype instances applied to this element (class-objects only).
    pub stereotype_instances: Vec<ClassifierId>,
    /// Links touching this object.
    pub links: Vec<LinkId>,
}

impl Object {
    pub(crate) fn new(
        id: ObjectId,
        name: impl Into<String>,
        classifier: ClassifierId,
        role: ObjectRole,
    ) -> Self {
        Self {
            id,
            name: Some(name.into()),
            deleted: false,
            classifier,
            role,
            values: ValueStore::new(),
            tagged_values: ValueStore::new(),
            stereotype_instances: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Returns true if this is a reflective class-object.
    pub fn is_class_object(&self) -> bool {
        matches!(self.role, ObjectRole::ClassObject(_))
    }
}

impl Model {
    // ==================== Creation ====================

    /// Create an object as an instance of a class, seeding attribute
    /// defaults along the class path.
    pub fn create_object(
        &mut self,
        class: ClassifierId,
        name: impl Into<String>,
    ) -> ModelResult<ObjectId> {
        let c = self.classifier(class)?;
        if c.kind != ClassifierKind::Class {
            return Err(ModelError::kind_mismatch("class", c.kind.as_str()));
        }

        let id = self.alloc_object_id();
        let mut object = Object::new(id, name, class, ObjectRole::Instance);
        self.seed_default_values(class, &mut object.values)?;
        self.objects.insert(id, object);
        self.classifier_mut(class)?.instances.push(id);
        Ok(id)
    }

    // ==================== Lookup ====================

    /// Get a live object by ID.
    pub fn object(&self, id: ObjectId) -> ModelResult<&Object> {
        let o = self.objects.get(&id).ok_or(ModelError::ObjectNotFound(id))?;
        if o.deleted {
            return Err(ModelError::deleted("object", id.to_string()));
        }
        Ok(o)
    }

    /// The reflective class-object of a class.
    pub fn class_object(&self, class: ClassifierId) -> ModelResult<ObjectId> {
        let c = self.classifier(class)?;
        c.class_object.ok_or_else(|| {
            ModelError::kind_mismatch("class", c.kind.as_str())
        })
    }

    /// Direct instances of a class.
    pub fn instances(&self, class: ClassifierId) -> ModelResult<Vec<ObjectId>> {
        Ok(self.classifier(class)?.instances.clone())
    }

    /// Instances of a class and of all its subclasses.
    pub fn all_instances(&self, class: ClassifierId) -> ModelResult<Vec<ObjectId>> {
        let mut result = self.instances(class)?;
        for sub in self.all_subclasses(class)? {
            if let Some(c) = self.classifiers.get(&sub) {
                result.extend(c.instances.iter().copied());
            }
        }
        Ok(result)
    }

    // ==================== Deletion ====================

    /// Delete an object and all links touching it. Deleting twice is a
    /// no-op. Class-objects cannot be deleted directly; delete the class.
    pub fn delete_object(&mut self, id: ObjectId) -> ModelResult<()> {
        let o = self.objects.get(&id).ok_or(ModelError::ObjectNotFound(id))?;
        if o.deleted {
            return Ok(());
        }
        if o.is_class_object() {
            return Err(ModelError::invalid_operation(
                "a class-object is deleted through its class",
            ));
        }
        self.delete_object_raw(id);
        Ok(())
    }

    pub(crate) fn delete_object_raw(&mut self, id: ObjectId) {
        let Some(o) = self.objects.get(&id) else {
            return;
        };
        if o.deleted {
            return;
        }
        let classifier = o.classifier;
        let role = o.role;
        let links = o.links.clone();

        for link in links {
            self.delete_link_raw(link);
        }
        // Plain instances are tracked on their class; class-objects on the
        // class's `class_object` field, cleared by the class deletion.
        if role == ObjectRole::Instance {
            if let Some(c) = self.classifiers.get_mut(&classifier) {
                c.instances.retain(|&x| x != id);
            }
        }

        if let Some(o) = self.objects.get_mut(&id) {
            o.values.clear();
            o.tagged_values.clear();
            o.stereotype_instances.clear();
            o.links.clear();
            o.name = None;
            o.deleted = true;
        }
    }
}
