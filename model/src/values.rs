//! The value resolution engine.
//!
//! Attribute values, tagged values and stereotype default values all share
//! one mechanism: a store keyed `defining classifier -> (attribute name ->
//! value)`, resolved along a class path in precedence order (most specific
//! first). An attribute defined lower in the path shadows a same-named
//! attribute defined higher; the stored value always lives under the
//! *defining* classifier, so shadowed layers keep their own values.
//!
//! "Unset" is not an error (it reads as `None`); an attribute name unknown
//! along the whole path is.

use crate::{Attribute, Model};
use forma_core::{ClassifierId, LinkId, ModelError, ModelResult, ObjectId, Value};
use std::collections::HashMap;

/// Storage for resolved values, keyed by the defining classifier.
pub(crate) type ValueStore = HashMap<ClassifierId, HashMap<String, Value>>;

/// A store owned by some instance, addressed indirectly so strip/back-fill
/// passes can touch attribute values and tagged values alike.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Holder {
    ObjectValues(ObjectId),
    ObjectTagged(ObjectId),
    LinkTagged(LinkId),
}

impl Model {
    // ==================== Resolution ====================

    /// Resolve an attribute name along a class path: the first classifier
    /// (most specific first) defining the name wins, unless an explicit
    /// classifier is supplied, which must lie on the path and define the
    /// attribute itself. The attribute's declared type must still be
    /// usable (not a deleted enumeration/classifier).
    pub(crate) fn resolve_attribute(
        &self,
        path: &[ClassifierId],
        what: &str,
        owner: &str,
        name: &str,
        explicit: Option<ClassifierId>,
    ) -> ModelResult<(ClassifierId, Attribute)> {
        let defining = match explicit {
            Some(clf) => {
                if !path.contains(&clf) {
                    return Err(ModelError::invalid_operation(format!(
                        "classifier '{}' is not in the resolution path of '{}'",
                        self.classifier_display_name(clf),
                        owner
                    )));
                }
                clf
            }
            None => path
                .iter()
                .copied()
                .find(|clf| {
                    self.classifiers
                        .get(clf)
                        .map(|c| c.has_attribute(name))
                        .unwrap_or(false)
                })
                .ok_or_else(|| ModelError::unknown_attribute(what, owner, name))?,
        };
        let attr = self
            .classifiers
            .get(&defining)
            .and_then(|c| c.attribute(name))
            .cloned()
            .ok_or_else(|| ModelError::unknown_attribute(what, owner, name))?;
        self.ensure_usable_attr_type(&attr)?;
        Ok((defining, attr))
    }

    pub(crate) fn store_get(
        store: &ValueStore,
        defining: ClassifierId,
        name: &str,
    ) -> Option<Value> {
        store.get(&defining).and_then(|m| m.get(name)).cloned()
    }

    pub(crate) fn store_set(
        store: &mut ValueStore,
        defining: ClassifierId,
        name: &str,
        value: Value,
    ) {
        store.entry(defining).or_default().insert(name.to_string(), value);
    }

    pub(crate) fn store_unset(store: &mut ValueStore, defining: ClassifierId, name: &str) {
        if let Some(m) = store.get_mut(&defining) {
            m.remove(name);
            if m.is_empty() {
                store.remove(&defining);
            }
        }
    }

    // ==================== Object Attribute Values ====================

    /// Read an attribute value, resolving the name along the object's class
    /// path. Returns `None` when the attribute exists but is unset.
    pub fn attr_value(&self, object: ObjectId, name: &str) -> ModelResult<Option<Value>> {
        self.attr_value_impl(object, name, None)
    }

    /// Read an attribute value defined by a specific classifier on the
    /// object's class path (bypasses shadowing).
    pub fn attr_value_for(
        &self,
        object: ObjectId,
        name: &str,
        classifier: ClassifierId,
    ) -> ModelResult<Option<Value>> {
        self.attr_value_impl(object, name, Some(classifier))
    }

    fn attr_value_impl(
        &self,
        object: ObjectId,
        name: &str,
        explicit: Option<ClassifierId>,
    ) -> ModelResult<Option<Value>> {
        let o = self.object(object)?;
        let path = self.class_path(o.classifier)?;
        let owner = self.object_display_name(object);
        let (defining, _) = self.resolve_attribute(&path, "attribute", &owner, name, explicit)?;
        Ok(Self::store_get(&o.values, defining, name))
    }

    /// Set an attribute value after type-checking it against the resolved
    /// attribute's declared type.
    pub fn set_attr_value(
        &mut self,
        object: ObjectId,
        name: &str,
        value: impl Into<Value>,
    ) -> ModelResult<()> {
        self.set_attr_value_impl(object, name, value.into(), None)
    }

    /// Set an attribute value for a specific defining classifier.
    pub fn set_attr_value_for(
        &mut self,
        object: ObjectId,
        name: &str,
        value: impl Into<Value>,
        classifier: ClassifierId,
    ) -> ModelResult<()> {
        self.set_attr_value_impl(object, name, value.into(), Some(classifier))
    }

    fn set_attr_value_impl(
        &mut self,
        object: ObjectId,
        name: &str,
        value: Value,
        explicit: Option<ClassifierId>,
    ) -> ModelResult<()> {
        let o = self.object(object)?;
        let path = self.class_path(o.classifier)?;
        let owner = self.object_display_name(object);
        let (defining, attr) = self.resolve_attribute(&path, "attribute", &owner, name, explicit)?;
        self.check_attribute_value("attribute value", &attr, &value)?;
        let o = self.object_mut(object)?;
        Self::store_set(&mut o.values, defining, name, value);
        Ok(())
    }

    /// Remove a stored attribute value. Idempotent: removing an unset value
    /// is a no-op, but an unknown attribute name is still an error.
    pub fn remove_attr_value(&mut self, object: ObjectId, name: &str) -> ModelResult<()> {
        self.remove_attr_value_impl(object, name, None)
    }

    /// Remove a stored attribute value for a specific defining classifier.
    pub fn remove_attr_value_for(
        &mut self,
        object: ObjectId,
        name: &str,
        classifier: ClassifierId,
    ) -> ModelResult<()> {
        self.remove_attr_value_impl(object, name, Some(classifier))
    }

    fn remove_attr_value_impl(
        &mut self,
        object: ObjectId,
        name: &str,
        explicit: Option<ClassifierId>,
    ) -> ModelResult<()> {
        let o = self.object(object)?;
        let path = self.class_path(o.classifier)?;
        let owner = self.object_display_name(object);
        let (defining, _) = self.resolve_attribute(&path, "attribute", &owner, name, explicit)?;
        let o = self.object_mut(object)?;
        Self::store_unset(&mut o.values, defining, name);
        Ok(())
    }

    // ==================== Defaults, Strip and Back-fill ====================

    /// Seed a fresh store with the attribute defaults found along a class
    /// path, keyed by the defining classifier.
    pub(crate) fn seed_default_values(
        &self,
        classifier: ClassifierId,
        store: &mut ValueStore,
    ) -> ModelResult<()> {
        for clf in self.class_path(classifier)? {
            let Some(c) = self.classifiers.get(&clf) else {
                continue;
            };
            for attr in &c.attributes {
                if let Some(default) = &attr.default {
                    if Self::store_get(store, clf, &attr.name).is_none() {
                        Self::store_set(store, clf, &attr.name, default.clone());
                    }
                }
            }
        }
        Ok(())
    }

    /// All stores that can hold values keyed by this classifier: instances
    /// of a class, class-objects of a metaclass's classes, or tagged stores
    /// of elements carrying a stereotype. Each includes subclasses.
    pub(crate) fn value_holders(&self, classifier: ClassifierId) -> Vec<Holder> {
        let Some(c) = self.classifiers.get(&classifier) else {
            return Vec::new();
        };
        let mut family = vec![classifier];
        family.extend(self.all_subclasses(classifier).unwrap_or_default());

        let mut holders = Vec::new();
        match c.kind {
            crate::ClassifierKind::Class => {
                for clf in family {
                    if let Some(c) = self.classifiers.get(&clf) {
                        holders.extend(c.instances.iter().map(|&o| Holder::ObjectValues(o)));
                    }
                }
            }
            crate::ClassifierKind::Metaclass => {
                for clf in family {
                    if let Some(c) = self.classifiers.get(&clf) {
                        for &class in &c.classes {
                            if let Some(co) =
                                self.classifiers.get(&class).and_then(|cl| cl.class_object)
                            {
                                holders.push(Holder::ObjectValues(co));
                            }
                        }
                    }
                }
            }
            crate::ClassifierKind::Stereotype => {
                for (id, o) in &self.objects {
                    if !o.deleted && o.stereotype_instances.iter().any(|s| family.contains(s)) {
                        holders.push(Holder::ObjectTagged(*id));
                    }
                }
                for (id, l) in &self.links {
                    if !l.deleted && l.stereotype_instances.iter().any(|s| family.contains(s)) {
                        holders.push(Holder::LinkTagged(*id));
                    }
                }
            }
        }
        holders
    }

    /// Remove every stored value for `(classifier, name)` from all holders.
    pub(crate) fn strip_holder_values(&mut self, classifier: ClassifierId, name: &str) {
        for holder in self.value_holders(classifier) {
            match holder {
                Holder::ObjectValues(o) => {
                    if let Some(o) = self.objects.get_mut(&o) {
                        Self::store_unset(&mut o.values, classifier, name);
                    }
                }
                Holder::ObjectTagged(o) => {
                    if let Some(o) = self.objects.get_mut(&o) {
                        Self::store_unset(&mut o.tagged_values, classifier, name);
                    }
                }
                Holder::LinkTagged(l) => {
                    if let Some(l) = self.links.get_mut(&l) {
                        Self::store_unset(&mut l.tagged_values, classifier, name);
                    }
                }
            }
        }
    }

    /// Back-fill a default onto every holder lacking an explicit value.
    pub(crate) fn backfill_default(&mut self, classifier: ClassifierId, name: &str, value: &Value) {
        for holder in self.value_holders(classifier) {
            match holder {
                Holder::ObjectValues(o) => {
                    if let Some(o) = self.objects.get_mut(&o) {
                        if Self::store_get(&o.values, classifier, name).is_none() {
                            Self::store_set(&mut o.values, classifier, name, value.clone());
                        }
                    }
                }
                Holder::ObjectTagged(o) => {
                    if let Some(o) = self.objects.get_mut(&o) {
                        if Self::store_get(&o.tagged_values, classifier, name).is_none() {
                            Self::store_set(&mut o.tagged_values, classifier, name, value.clone());
                        }
                    }
                }
                Holder::LinkTagged(l) => {
                    if let Some(l) = self.links.get_mut(&l) {
                        if Self::store_get(&l.tagged_values, classifier, name).is_none() {
                            Self::store_set(&mut l.tagged_values, classifier, name, value.clone());
                        }
                    }
                }
            }
        }
    }
}
