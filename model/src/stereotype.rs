//! Stereotypes: extension of the metaclass level and tagged values.
//!
//! A stereotype extends metaclasses or metaclass-level associations and is
//! then applied as a stereotype instance to the elements of that level:
//! classes (through their class-objects) and links. Tagged values live on
//! the carrying element, keyed by the defining stereotype, and resolve like
//! any other value.

use crate::{ClassifierKind, ExtensionTarget, Model};
use forma_core::{ClassifierId, LinkId, ModelError, ModelResult, Value};

/// An element a stereotype instance can be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stereotyped {
    Class(ClassifierId),
    Link(LinkId),
}

impl Model {
    // ==================== Extension ====================

    /// Extend a stereotype by further targets. Targets must be uniformly
    /// metaclasses or uniformly metaclass-level associations, across the
    /// whole extended set; duplicates are rejected.
    pub fn extend_stereotype(
        &mut self,
        stereotype: ClassifierId,
        targets: Vec<ExtensionTarget>,
    ) -> ModelResult<()> {
        let st = self.classifier(stereotype)?;
        if st.kind != ClassifierKind::Stereotype {
            return Err(ModelError::kind_mismatch("stereotype", st.kind.as_str()));
        }

        let mut extended = st.extended.clone();
        for &target in &targets {
            let uniform = match (extended.first(), target) {
                (None, _) => true,
                (Some(ExtensionTarget::Metaclass(_)), ExtensionTarget::Metaclass(_)) => true,
                (Some(ExtensionTarget::Association(_)), ExtensionTarget::Association(_)) => true,
                _ => false,
            };
            if !uniform {
                return Err(ModelError::MixedExtensionTargets);
            }
            if extended.contains(&target) {
                return Err(ModelError::duplicate_extension(
                    self.classifier_display_name(stereotype),
                    self.extension_target_display_name(target),
                ));
            }
            match target {
                ExtensionTarget::Metaclass(mc) => {
                    let c = self.classifier(mc)?;
                    if c.kind != ClassifierKind::Metaclass {
                        return Err(ModelError::kind_mismatch("metaclass", c.kind.as_str()));
                    }
                }
                ExtensionTarget::Association(a) => {
                    let assoc = self.association(a)?;
                    if assoc.kind != ClassifierKind::Metaclass {
                        return Err(ModelError::kind_mismatch(
                            "metaclass association",
                            assoc.kind.as_str(),
                        ));
                    }
                }
            }
            extended.push(target);
        }

        for &target in &targets {
            match target {
                ExtensionTarget::Metaclass(mc) => {
                    self.classifier_mut(mc)?.extended_by.push(stereotype);
                }
                ExtensionTarget::Association(a) => {
                    if let Some(assoc) = self.associations.get_mut(&a) {
                        assoc.extended_by.push(stereotype);
                    }
                }
            }
        }
        self.classifier_mut(stereotype)?.extended = extended;
        Ok(())
    }

    /// What a stereotype extends (its own targets only, not inherited ones).
    pub fn extended(&self, stereotype: ClassifierId) -> ModelResult<Vec<ExtensionTarget>> {
        Ok(self.classifier(stereotype)?.extended.clone())
    }

    /// Whether a stereotype may be applied to an element: some stereotype
    /// on the stereotype's class path must extend the element's defining
    /// metaclass (or an ancestor of it) or the link's association.
    pub fn is_element_extended_by(
        &self,
        stereotype: ClassifierId,
        element: Stereotyped,
    ) -> ModelResult<bool> {
        let st_path = self.class_path(stereotype)?;
        match element {
            Stereotyped::Class(class) => {
                let c = self.classifier(class)?;
                let Some(metaclass) = c.metaclass else {
                    return Ok(false);
                };
                let mc_path = self.class_path(metaclass)?;
                for &st in &st_path {
                    let Some(s) = self.classifiers.get(&st) else {
                        continue;
                    };
                    for &mc in &mc_path {
                        if s.extended.contains(&ExtensionTarget::Metaclass(mc)) {
                            return Ok(true);
                        }
                    }
                }
                Ok(false)
            }
            Stereotyped::Link(link) => {
                let association = self.link(link)?.association;
                for &st in &st_path {
                    let Some(s) = self.classifiers.get(&st) else {
                        continue;
                    };
                    if s.extended.contains(&ExtensionTarget::Association(association)) {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    // ==================== Stereotype Instances ====================

    /// Apply a stereotype instance to a class or link. Seeds default tagged
    /// values along the stereotype's class path (most specific first, never
    /// overwriting) and, on classes, applies the stereotype's default
    /// attribute values to the class-object.
    pub fn add_stereotype_instance(
        &mut self,
        element: Stereotyped,
        stereotype: ClassifierId,
    ) -> ModelResult<()> {
        let st = self.classifier(stereotype)?;
        if st.kind != ClassifierKind::Stereotype {
            return Err(ModelError::kind_mismatch("stereotype", st.kind.as_str()));
        }
        if !self.is_element_extended_by(stereotype, element)? {
            return Err(ModelError::not_extended(
                self.classifier_display_name(stereotype),
                self.stereotyped_display_name(element),
            ));
        }
        if self.stereotype_instances(element)?.contains(&stereotype) {
            return Err(ModelError::duplicate_stereotype_instance(
                self.classifier_display_name(stereotype),
                self.stereotyped_display_name(element),
            ));
        }

        let st_path = self.class_path(stereotype)?;

        // Seed tagged-value defaults, most specific stereotype first.
        let mut seeds = Vec::new();
        for &st in &st_path {
            if let Some(s) = self.classifiers.get(&st) {
                for attr in &s.attributes {
                    if let Some(default) = &attr.default {
                        seeds.push((st, attr.name.clone(), default.clone()));
                    }
                }
            }
        }

        // On classes, apply the stereotype's default attribute values,
        // keyed by classifiers on the extended metaclass's class path.
        let mut attr_defaults = Vec::new();
        if let Stereotyped::Class(class) = element {
            let metaclass = self.classifier(class)?.metaclass;
            if let Some(metaclass) = metaclass {
                let mc_path = self.class_path(metaclass)?;
                for &st in &st_path {
                    if let Some(s) = self.classifiers.get(&st) {
                        for (&defining, values) in &s.default_values {
                            if !mc_path.contains(&defining) {
                                continue;
                            }
                            for (name, value) in values {
                                attr_defaults.push((defining, name.clone(), value.clone()));
                            }
                        }
                    }
                }
            }
        }

        match element {
            Stereotyped::Class(class) => {
                let class_object = self.class_object(class)?;
                let o = self.object_mut(class_object)?;
                o.stereotype_instances.push(stereotype);
                for (defining, name, value) in seeds {
                    if Self::store_get(&o.tagged_values, defining, &name).is_none() {
                        Self::store_set(&mut o.tagged_values, defining, &name, value);
                    }
                }
                for (defining, name, value) in attr_defaults {
                    if Self::store_get(&o.values, defining, &name).is_none() {
                        Self::store_set(&mut o.values, defining, &name, value);
                    }
                }
            }
            Stereotyped::Link(link) => {
                self.link(link)?;
                if let Some(l) = self.links.get_mut(&link) {
                    l.stereotype_instances.push(stereotype);
                    for (defining, name, value) in seeds {
                        if Self::store_get(&l.tagged_values, defining, &name).is_none() {
                            Self::store_set(&mut l.tagged_values, defining, &name, value);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Detach a stereotype instance from an element, dropping the tagged
    /// values only it keyed (values defined by stereotypes still carried
    /// through another instance survive).
    pub fn remove_stereotype_instance(
        &mut self,
        element: Stereotyped,
        stereotype: ClassifierId,
    ) -> ModelResult<()> {
        let instances = self.stereotype_instances(element)?;
        if !instances.contains(&stereotype) {
            return Err(ModelError::invalid_operation(format!(
                "stereotype '{}' is not applied to '{}'",
                self.classifier_display_name(stereotype),
                self.stereotyped_display_name(element)
            )));
        }

        let mut dropped = self.class_path(stereotype)?;
        for &other in instances.iter().filter(|&&s| s != stereotype) {
            let kept = self.class_path(other)?;
            dropped.retain(|clf| !kept.contains(clf));
        }

        match element {
            Stereotyped::Class(class) => {
                let class_object = self.class_object(class)?;
                let o = self.object_mut(class_object)?;
                o.stereotype_instances.retain(|&s| s != stereotype);
                for clf in dropped {
                    o.tagged_values.remove(&clf);
                }
            }
            Stereotyped::Link(link) => {
                if let Some(l) = self.links.get_mut(&link) {
                    l.stereotype_instances.retain(|&s| s != stereotype);
                    for clf in dropped {
                        l.tagged_values.remove(&clf);
                    }
                }
            }
        }
        Ok(())
    }

    /// The stereotype instances an element carries, in application order.
    pub fn stereotype_instances(&self, element: Stereotyped) -> ModelResult<Vec<ClassifierId>> {
        match element {
            Stereotyped::Class(class) => {
                let class_object = self.class_object(class)?;
                Ok(self.object(class_object)?.stereotype_instances.clone())
            }
            Stereotyped::Link(link) => Ok(self.link(link)?.stereotype_instances.clone()),
        }
    }

    /// All live elements carrying a stereotype (or one of its subclasses).
    pub fn extended_instances(&self, stereotype: ClassifierId) -> ModelResult<Vec<Stereotyped>> {
        self.classifier(stereotype)?;
        let mut family = vec![stereotype];
        family.extend(self.all_subclasses(stereotype)?);

        let mut result = Vec::new();
        for o in self.objects.values() {
            if !o.deleted && o.stereotype_instances.iter().any(|s| family.contains(s)) {
                if let crate::ObjectRole::ClassObject(class) = o.role {
                    result.push(Stereotyped::Class(class));
                }
            }
        }
        for (id, l) in &self.links {
            if !l.deleted && l.stereotype_instances.iter().any(|s| family.contains(s)) {
                result.push(Stereotyped::Link(*id));
            }
        }
        Ok(result)
    }

    // ==================== Tagged Values ====================

    /// Read a tagged value, resolved along the class paths of the element's
    /// stereotype instances in application order.
    pub fn tagged_value(&self, element: Stereotyped, name: &str) -> ModelResult<Option<Value>> {
        self.tagged_value_impl(element, name, None)
    }

    /// Read a tagged value defined by a specific stereotype.
    pub fn tagged_value_for(
        &self,
        element: Stereotyped,
        name: &str,
        stereotype: ClassifierId,
    ) -> ModelResult<Option<Value>> {
        self.tagged_value_impl(element, name, Some(stereotype))
    }

    fn tagged_value_impl(
        &self,
        element: Stereotyped,
        name: &str,
        explicit: Option<ClassifierId>,
    ) -> ModelResult<Option<Value>> {
        let path = self.tagged_path(element)?;
        let owner = self.stereotyped_display_name(element);
        let (defining, _) = self.resolve_attribute(&path, "tagged value", &owner, name, explicit)?;
        let store = match element {
            Stereotyped::Class(class) => {
                let class_object = self.class_object(class)?;
                &self.object(class_object)?.tagged_values
            }
            Stereotyped::Link(link) => &self.link(link)?.tagged_values,
        };
        Ok(Self::store_get(store, defining, name))
    }

    /// Set a tagged value after type-checking against the defining
    /// stereotype's attribute.
    pub fn set_tagged_value(
        &mut self,
        element: Stereotyped,
        name: &str,
        value: impl Into<Value>,
    ) -> ModelResult<()> {
        self.set_tagged_value_impl(element, name, value.into(), None)
    }

    /// Set a tagged value for a specific defining stereotype.
    pub fn set_tagged_value_for(
        &mut self,
        element: Stereotyped,
        name: &str,
        value: impl Into<Value>,
        stereotype: ClassifierId,
    ) -> ModelResult<()> {
        self.set_tagged_value_impl(element, name, value.into(), Some(stereotype))
    }

    fn set_tagged_value_impl(
        &mut self,
        element: Stereotyped,
        name: &str,
        value: Value,
        explicit: Option<ClassifierId>,
    ) -> ModelResult<()> {
        let path = self.tagged_path(element)?;
        let owner = self.stereotyped_display_name(element);
        let (defining, attr) =
            self.resolve_attribute(&path, "tagged value", &owner, name, explicit)?;
        self.check_attribute_value("tagged value", &attr, &value)?;
        match element {
            Stereotyped::Class(class) => {
                let class_object = self.class_object(class)?;
                let o = self.object_mut(class_object)?;
                Self::store_set(&mut o.tagged_values, defining, name, value);
            }
            Stereotyped::Link(link) => {
                if let Some(l) = self.links.get_mut(&link) {
                    Self::store_set(&mut l.tagged_values, defining, name, value);
                }
            }
        }
        Ok(())
    }

    /// Remove a stored tagged value; idempotent for unset values.
    pub fn remove_tagged_value(&mut self, element: Stereotyped, name: &str) -> ModelResult<()> {
        self.remove_tagged_value_impl(element, name, None)
    }

    /// Remove a stored tagged value for a specific defining stereotype.
    pub fn remove_tagged_value_for(
        &mut self,
        element: Stereotyped,
        name: &str,
        stereotype: ClassifierId,
    ) -> ModelResult<()> {
        self.remove_tagged_value_impl(element, name, Some(stereotype))
    }

    fn remove_tagged_value_impl(
        &mut self,
        element: Stereotyped,
        name: &str,
        explicit: Option<ClassifierId>,
    ) -> ModelResult<()> {
        let path = self.tagged_path(element)?;
        let owner = self.stereotyped_display_name(element);
        let (defining, _) = self.resolve_attribute(&path, "tagged value", &owner, name, explicit)?;
        match element {
            Stereotyped::Class(class) => {
                let class_object = self.class_object(class)?;
                let o = self.object_mut(class_object)?;
                Self::store_unset(&mut o.tagged_values, defining, name);
            }
            Stereotyped::Link(link) => {
                if let Some(l) = self.links.get_mut(&link) {
                    Self::store_unset(&mut l.tagged_values, defining, name);
                }
            }
        }
        Ok(())
    }

    /// Tagged-value resolution path: the class paths of the element's
    /// stereotype instances, concatenated in application order.
    fn tagged_path(&self, element: Stereotyped) -> ModelResult<Vec<ClassifierId>> {
        let mut path = Vec::new();
        for st in self.stereotype_instances(element)? {
            for clf in self.class_path(st)? {
                if !path.contains(&clf) {
                    path.push(clf);
                }
            }
        }
        Ok(path)
    }

    // ==================== Stereotype Default Values ====================

    /// Read a stereotype default value, resolved along the class paths of
    /// the extended metaclasses (own and inherited extensions).
    pub fn stereotype_default_value(
        &self,
        stereotype: ClassifierId,
        name: &str,
    ) -> ModelResult<Option<Value>> {
        self.stereotype_default_value_impl(stereotype, name, None)
    }

    /// Read a stereotype default value for a specific defining classifier.
    pub fn stereotype_default_value_for(
        &self,
        stereotype: ClassifierId,
        name: &str,
        classifier: ClassifierId,
    ) -> ModelResult<Option<Value>> {
        self.stereotype_default_value_impl(stereotype, name, Some(classifier))
    }

    fn stereotype_default_value_impl(
        &self,
        stereotype: ClassifierId,
        name: &str,
        explicit: Option<ClassifierId>,
    ) -> ModelResult<Option<Value>> {
        let path = self.extended_metaclass_path(stereotype)?;
        let owner = self.classifier_display_name(stereotype);
        let (defining, _) =
            self.resolve_attribute(&path, "default value", &owner, name, explicit)?;
        Ok(Self::store_get(
            &self.classifier(stereotype)?.default_values,
            defining,
            name,
        ))
    }

    /// Set a default value a stereotype will apply to extended classes.
    pub fn set_stereotype_default_value(
        &mut self,
        stereotype: ClassifierId,
        name: &str,
        value: impl Into<Value>,
    ) -> ModelResult<()> {
        self.set_stereotype_default_value_impl(stereotype, name, value.into(), None)
    }

    /// Set a stereotype default value for a specific defining classifier.
    pub fn set_stereotype_default_value_for(
        &mut self,
        stereotype: ClassifierId,
        name: &str,
        value: impl Into<Value>,
        classifier: ClassifierId,
    ) -> ModelResult<()> {
        self.set_stereotype_default_value_impl(stereotype, name, value.into(), Some(classifier))
    }

    fn set_stereotype_default_value_impl(
        &mut self,
        stereotype: ClassifierId,
        name: &str,
        value: Value,
        explicit: Option<ClassifierId>,
    ) -> ModelResult<()> {
        let path = self.extended_metaclass_path(stereotype)?;
        let owner = self.classifier_display_name(stereotype);
        let (defining, attr) =
            self.resolve_attribute(&path, "default value", &owner, name, explicit)?;
        self.check_attribute_value("default value", &attr, &value)?;
        let st = self.classifier_mut(stereotype)?;
        Self::store_set(&mut st.default_values, defining, name, value);
        Ok(())
    }

    /// Remove a stereotype default value; idempotent for unset values.
    pub fn remove_stereotype_default_value(
        &mut self,
        stereotype: ClassifierId,
        name: &str,
    ) -> ModelResult<()> {
        let path = self.extended_metaclass_path(stereotype)?;
        let owner = self.classifier_display_name(stereotype);
        let (defining, _) = self.resolve_attribute(&path, "default value", &owner, name, None)?;
        let st = self.classifier_mut(stereotype)?;
        Self::store_unset(&mut st.default_values, defining, name);
        Ok(())
    }

    /// Default-value resolution path: the class paths of every metaclass
    /// extended by the stereotype or its superclasses.
    fn extended_metaclass_path(&self, stereotype: ClassifierId) -> ModelResult<Vec<ClassifierId>> {
        let mut path = Vec::new();
        for st in self.class_path(stereotype)? {
            let Some(s) = self.classifiers.get(&st) else {
                continue;
            };
            for target in &s.extended {
                if let ExtensionTarget::Metaclass(mc) = target {
                    for clf in self.class_path(*mc)? {
                        if !path.contains(&clf) {
                            path.push(clf);
                        }
                    }
                }
            }
        }
        Ok(path)
    }

    // ==================== Detachment ====================

    /// Remove a stereotype from everything referencing it: extension
    /// back-references, carried instances and the tagged values only it
    /// keyed. Used by classifier deletion.
    pub(crate) fn detach_stereotype(&mut self, stereotype: ClassifierId) {
        let extended = self
            .classifiers
            .get(&stereotype)
            .map(|s| s.extended.clone())
            .unwrap_or_default();
        for target in extended {
            match target {
                ExtensionTarget::Metaclass(mc) => {
                    if let Some(c) = self.classifiers.get_mut(&mc) {
                        c.extended_by.retain(|&s| s != stereotype);
                    }
                }
                ExtensionTarget::Association(a) => {
                    if let Some(assoc) = self.associations.get_mut(&a) {
                        assoc.extended_by.retain(|&s| s != stereotype);
                    }
                }
            }
        }
        for o in self.objects.values_mut() {
            if o.stereotype_instances.contains(&stereotype) {
                o.stereotype_instances.retain(|&s| s != stereotype);
                o.tagged_values.remove(&stereotype);
            }
        }
        for l in self.links.values_mut() {
            if l.stereotype_instances.contains(&stereotype) {
                l.stereotype_instances.retain(|&s| s != stereotype);
                l.tagged_values.remove(&stereotype);
            }
        }
    }

    fn stereotyped_display_name(&self, element: Stereotyped) -> String {
        match element {
            Stereotyped::Class(class) => self.classifier_display_name(class),
            Stereotyped::Link(link) => self
                .links
                .get(&link)
                .and_then(|l| l.label.clone())
                .unwrap_or_else(|| link.to_string()),
        }
    }

    fn extension_target_display_name(&self, target: ExtensionTarget) -> String {
        match target {
            ExtensionTarget::Metaclass(mc) => self.classifier_display_name(mc),
            ExtensionTarget::Association(a) => self.association_display_name(a),
        }
    }
}
