//! Classifiers: metaclasses, classes and stereotypes.
//!
//! A classifier is a type-like entity that owns attributes, participates in
//! single or multiple inheritance, and can be an association endpoint. The
//! three kinds are a closed set: a metaclass's instances are classes, a
//! class's instances are objects, and a stereotype annotates the elements
//! of the metaclass level it extends.

use crate::{Attribute, ObjectRole, ValueStore};
use crate::{Model, Object};
use forma_core::{AssociationId, ClassifierId, ModelError, ModelResult, ObjectId};

/// The closed set of classifier kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierKind {
    Metaclass,
    Class,
    Stereotype,
}

impl ClassifierKind {
    /// Lowercase kind name for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierKind::Metaclass => "metaclass",
            ClassifierKind::Class => "class",
            ClassifierKind::Stereotype => "stereotype",
        }
    }
}

/// What a stereotype extends: metaclasses or metaclass-level associations,
/// never a mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionTarget {
    Metaclass(ClassifierId),
    Association(AssociationId),
}

/// A classifier in the model.
///
/// Cross-references (superclasses, subclasses, associations, instances) are
/// stored as ID vectors; both directions of each relation are maintained by
/// the model operations.
#[derive(Debug, Clone)]
pub struct Classifier {
    pub id: ClassifierId,
    pub kind: ClassifierKind,
    pub name: Option<String>,
    pub deleted: bool,
    /// Direct superclasses, in declaration order.
    pub superclasses: Vec<ClassifierId>,
    /// Direct subclasses (derived, maintained by `set_superclasses`).
    pub subclasses: Vec<ClassifierId>,
    /// Own attribute table, unique names, declaration order.
    pub attributes: Vec<Attribute>,
    /// Associations with this classifier as source or target.
    pub associations: Vec<AssociationId>,
    /// Class only: the metaclass this class is an instance of.
    pub metaclass: Option<ClassifierId>,
    /// Class only: the reflective class-object standing in for this class.
    pub class_object: Option<ObjectId>,
    /// Class only: direct instances.
    pub instances: Vec<ObjectId>,
    /// Metaclass only: classes typed by this metaclass.
    pub classes: Vec<ClassifierId>,
    /// Metaclass only: stereotypes extending this metaclass.
    pub extended_by: Vec<ClassifierId>,
    /// Stereotype only: the extended metaclasses or associations.
    pub extended: Vec<ExtensionTarget>,
    /// Stereotype only: default values for extended-metaclass attributes,
    /// keyed by the defining classifier.
    pub(crate) default_values: ValueStore,
}

impl Classifier {
    pub(crate) fn new(id: ClassifierId, kind: ClassifierKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: Some(name.into()),
            deleted: false,
            superclasses: Vec::new(),
            subclasses: Vec::new(),
            attributes: Vec::new(),
            associations: Vec::new(),
            metaclass: None,
            class_object: None,
            instances: Vec::new(),
            classes: Vec::new(),
            extended_by: Vec::new(),
            extended: Vec::new(),
            default_values: ValueStore::new(),
        }
    }

    /// Get an own attribute by name (inherited attributes are resolved
    /// through the class path, not here).
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check if this classifier's own table defines an attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Own attribute names, in declaration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }
}

impl Model {
    // ==================== Creation ====================

    /// Create a new metaclass.
    pub fn create_metaclass(&mut self, name: impl Into<String>) -> ClassifierId {
        let id = self.alloc_classifier_id();
        self.classifiers
            .insert(id, Classifier::new(id, ClassifierKind::Metaclass, name));
        id
    }

    /// Create a new class as an instance of a metaclass. The reflective
    /// class-object is created alongside and seeded with the metaclass's
    /// attribute defaults.
    pub fn create_class(
        &mut self,
        metaclass: ClassifierId,
        name: impl Into<String>,
    ) -> ModelResult<ClassifierId> {
        let mc = self.classifier(metaclass)?;
        if mc.kind != ClassifierKind::Metaclass {
            return Err(ModelError::kind_mismatch("metaclass", mc.kind.as_str()));
        }

        let id = self.alloc_classifier_id();
        let name = name.into();
        let mut class = Classifier::new(id, ClassifierKind::Class, name.clone());
        class.metaclass = Some(metaclass);

        let object_id = self.alloc_object_id();
        let mut class_object = Object::new(object_id, name, metaclass, ObjectRole::ClassObject(id));
        self.seed_default_values(metaclass, &mut class_object.values)?;
        class.class_object = Some(object_id);

        self.objects.insert(object_id, class_object);
        self.classifiers.insert(id, class);
        self.classifier_mut(metaclass)?.classes.push(id);
        Ok(id)
    }

    /// Create a new stereotype.
    pub fn create_stereotype(&mut self, name: impl Into<String>) -> ClassifierId {
        let id = self.alloc_classifier_id();
        self.classifiers
            .insert(id, Classifier::new(id, ClassifierKind::Stereotype, name));
        id
    }

    // ==================== Hierarchy ====================

    /// Replace the full superclass set of a classifier, maintaining both
    /// directions of the relation.
    pub fn set_superclasses(
        &mut self,
        classifier: ClassifierId,
        superclasses: Vec<ClassifierId>,
    ) -> ModelResult<()> {
        let name = self.classifier_display_name(classifier);
        let kind = self.classifier(classifier)?.kind;

        for (i, &sup) in superclasses.iter().enumerate() {
            if sup == classifier {
                return Err(ModelError::invalid_superclass(
                    &name,
                    "a classifier cannot be its own superclass",
                ));
            }
            if superclasses[..i].contains(&sup) {
                return Err(ModelError::invalid_superclass(
                    &name,
                    format!(
                        "duplicate superclass '{}'",
                        self.classifier_display_name(sup)
                    ),
                ));
            }
            let sup_clf = self.classifier(sup)?;
            if sup_clf.kind != kind {
                return Err(ModelError::invalid_superclass(
                    &name,
                    format!(
                        "'{}' is a {}, not a {}",
                        self.classifier_display_name(sup),
                        sup_clf.kind.as_str(),
                        kind.as_str()
                    ),
                ));
            }
        }

        let old = self.classifier(classifier)?.superclasses.clone();
        for sup in old {
            self.classifier_mut(sup)?
                .subclasses
                .retain(|&s| s != classifier);
        }
        for &sup in &superclasses {
            self.classifier_mut(sup)?.subclasses.push(classifier);
        }
        self.classifier_mut(classifier)?.superclasses = superclasses;
        Ok(())
    }

    /// Direct superclasses.
    pub fn superclasses(&self, classifier: ClassifierId) -> ModelResult<Vec<ClassifierId>> {
        Ok(self.classifier(classifier)?.superclasses.clone())
    }

    /// Direct subclasses.
    pub fn subclasses(&self, classifier: ClassifierId) -> ModelResult<Vec<ClassifierId>> {
        Ok(self.classifier(classifier)?.subclasses.clone())
    }

    /// Transitive superclasses, not including the classifier itself.
    /// Cycle-safe: a visited set guards the traversal.
    pub fn all_superclasses(&self, classifier: ClassifierId) -> ModelResult<Vec<ClassifierId>> {
        self.classifier(classifier)?;
        Ok(self.transitive(classifier, |c| &c.superclasses))
    }

    /// Transitive subclasses, not including the classifier itself.
    pub fn all_subclasses(&self, classifier: ClassifierId) -> ModelResult<Vec<ClassifierId>> {
        self.classifier(classifier)?;
        Ok(self.transitive(classifier, |c| &c.subclasses))
    }

    /// The class path: the classifier itself, then its superclasses
    /// depth-first in declaration order, duplicates removed. This is the
    /// precedence order for attribute and value resolution (most specific
    /// first).
    pub fn class_path(&self, classifier: ClassifierId) -> ModelResult<Vec<ClassifierId>> {
        self.classifier(classifier)?;
        let mut path = Vec::new();
        self.extend_class_path(classifier, &mut path);
        Ok(path)
    }

    fn extend_class_path(&self, classifier: ClassifierId, path: &mut Vec<ClassifierId>) {
        if path.contains(&classifier) {
            return;
        }
        path.push(classifier);
        let Some(c) = self.classifiers.get(&classifier) else {
            return;
        };
        for sup in c.superclasses.clone() {
            self.extend_class_path(sup, path);
        }
    }

    fn transitive(
        &self,
        start: ClassifierId,
        step: impl Fn(&Classifier) -> &Vec<ClassifierId>,
    ) -> Vec<ClassifierId> {
        let mut visited = Vec::new();
        let mut frontier = vec![start];
        while let Some(id) = frontier.pop() {
            let Some(c) = self.classifiers.get(&id) else {
                continue;
            };
            for &next in step(c) {
                if next != start && !visited.contains(&next) {
                    visited.push(next);
                    frontier.push(next);
                }
            }
        }
        visited
    }

    /// Reflexive-transitive type conformance: a classifier conforms to
    /// itself and to every classifier it transitively specializes.
    /// Implemented by walking the other side's subclass closure.
    pub fn conforms_to_type(
        &self,
        classifier: ClassifierId,
        other: ClassifierId,
    ) -> ModelResult<bool> {
        self.classifier(classifier)?;
        self.classifier(other)?;
        if classifier == other {
            return Ok(true);
        }
        Ok(self.transitive(other, |c| &c.subclasses).contains(&classifier))
    }

    // ==================== Deletion ====================

    /// Delete a classifier, cascading to its associations and instances and
    /// detaching it from the hierarchy. Deleting twice is a no-op.
    pub fn delete_classifier(&mut self, classifier: ClassifierId) -> ModelResult<()> {
        let c = self
            .classifiers
            .get(&classifier)
            .ok_or(ModelError::ClassifierNotFound(classifier))?;
        if c.deleted {
            return Ok(());
        }
        let kind = c.kind;

        // Values stored under this classifier's attributes survive on
        // subclass instances otherwise; strip them first.
        for attr_name in self
            .classifier(classifier)?
            .attribute_names()
            .map(str::to_string)
            .collect::<Vec<_>>()
        {
            self.strip_holder_values(classifier, &attr_name);
        }

        // Detach both directions of the hierarchy.
        let c = self.classifier_mut(classifier)?;
        let superclasses = std::mem::take(&mut c.superclasses);
        let subclasses = std::mem::take(&mut c.subclasses);
        for sup in superclasses {
            self.classifier_mut(sup)?
                .subclasses
                .retain(|&s| s != classifier);
        }
        for sub in subclasses {
            self.classifier_mut(sub)?
                .superclasses
                .retain(|&s| s != classifier);
        }

        // Associations in both directions.
        for assoc in self.classifier(classifier)?.associations.clone() {
            self.delete_association_raw(assoc);
        }

        match kind {
            ClassifierKind::Metaclass => {
                for class in self.classifier(classifier)?.classes.clone() {
                    self.delete_classifier(class)?;
                }
                for st in self.classifier(classifier)?.extended_by.clone() {
                    self.classifier_mut(st)?
                        .extended
                        .retain(|t| *t != ExtensionTarget::Metaclass(classifier));
                }
            }
            ClassifierKind::Class => {
                for instance in self.classifier(classifier)?.instances.clone() {
                    self.delete_object_raw(instance);
                }
                if let Some(class_object) = self.classifier(classifier)?.class_object {
                    self.delete_object_raw(class_object);
                }
                if let Some(metaclass) = self.classifier(classifier)?.metaclass {
                    if let Some(mc) = self.classifiers.get_mut(&metaclass) {
                        mc.classes.retain(|&cl| cl != classifier);
                    }
                }
            }
            ClassifierKind::Stereotype => {
                self.detach_stereotype(classifier);
            }
        }

        let c = self.classifier_mut(classifier)?;
        c.attributes.clear();
        c.associations.clear();
        c.instances.clear();
        c.classes.clear();
        c.extended.clear();
        c.extended_by.clear();
        c.default_values.clear();
        c.metaclass = None;
        c.class_object = None;
        c.name = None;
        c.deleted = true;
        Ok(())
    }
}
