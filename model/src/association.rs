//! Associations between classifiers.
//!
//! An association is a typed, directed relationship definition between two
//! classifiers of the same kind. Both endpoints keep a reference to it, and
//! its instances are links.

use crate::descriptor::parse_descriptor;
use crate::{ClassifierKind, ExtensionTarget, Model, Multiplicity};
use forma_core::{AssociationId, ClassifierId, ModelError, ModelResult};

/// An association definition in the model.
#[derive(Debug, Clone)]
pub struct Association {
    pub id: AssociationId,
    pub name: Option<String>,
    pub deleted: bool,
    /// Kind of both endpoints (metaclass associations connect classes via
    /// links, class associations connect objects).
    pub kind: ClassifierKind,
    pub source: ClassifierId,
    pub target: ClassifierId,
    pub source_role_name: Option<String>,
    pub role_name: Option<String>,
    pub source_multiplicity: Multiplicity,
    pub multiplicity: Multiplicity,
    pub aggregation: bool,
    pub composition: bool,
    /// Live links instantiating this association.
    pub links: Vec<forma_core::LinkId>,
    /// Stereotypes extending this association.
    pub extended_by: Vec<ClassifierId>,
}

/// Options for creating an association. The descriptor grammar is a
/// shorthand producing the same fields.
#[derive(Debug, Clone)]
pub struct AssociationDef {
    pub name: Option<String>,
    pub source_role_name: Option<String>,
    pub role_name: Option<String>,
    pub source_multiplicity: Multiplicity,
    pub multiplicity: Multiplicity,
    pub aggregation: bool,
    pub composition: bool,
}

impl Default for AssociationDef {
    fn default() -> Self {
        Self::new()
    }
}

impl AssociationDef {
    pub fn new() -> Self {
        Self {
            name: None,
            source_role_name: None,
            role_name: None,
            source_multiplicity: Multiplicity::one(),
            multiplicity: Multiplicity::many(),
            aggregation: false,
            composition: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn source_role(mut self, role: impl Into<String>) -> Self {
        self.source_role_name = Some(role.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role_name = Some(role.into());
        self
    }

    pub fn source_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
        self.source_multiplicity = multiplicity;
        self
    }

    pub fn multiplicity(mut self, multiplicity: Multiplicity) -> Self {
        self.multiplicity = multiplicity;
        self
    }

    pub fn aggregation(mut self) -> Self {
        self.aggregation = true;
        self
    }

    pub fn composition(mut self) -> Self {
        self.composition = true;
        self
    }
}

impl Model {
    // ==================== Creation ====================

    /// Create an association between two same-kind classifiers.
    pub fn add_association(
        &mut self,
        source: ClassifierId,
        target: ClassifierId,
        def: AssociationDef,
    ) -> ModelResult<AssociationId> {
        let source_kind = self.classifier(source)?.kind;
        let target_kind = self.classifier(target)?.kind;
        if source_kind != target_kind {
            return Err(ModelError::association_kind_mismatch(
                source_kind.as_str(),
                target_kind.as_str(),
            ));
        }
        if def.aggregation && def.composition {
            return Err(ModelError::invalid_operation(
                "an association cannot be both an aggregation and a composition",
            ));
        }

        let id = self.alloc_association_id();
        let association = Association {
            id,
            name: def.name,
            deleted: false,
            kind: source_kind,
            source,
            target,
            source_role_name: def.source_role_name,
            role_name: def.role_name,
            source_multiplicity: def.source_multiplicity,
            multiplicity: def.multiplicity,
            aggregation: def.aggregation,
            composition: def.composition,
            links: Vec::new(),
            extended_by: Vec::new(),
        };
        self.associations.insert(id, association);

        self.classifier_mut(source)?.associations.push(id);
        if target != source {
            self.classifier_mut(target)?.associations.push(id);
        }
        Ok(id)
    }

    /// Create an association from its compact textual descriptor, e.g.
    /// `"drives: [driver] 1 -> [car] *"`.
    pub fn add_association_by_descriptor(
        &mut self,
        source: ClassifierId,
        target: ClassifierId,
        descriptor: &str,
    ) -> ModelResult<AssociationId> {
        let d = parse_descriptor(descriptor)?;
        self.add_association(
            source,
            target,
            AssociationDef {
                name: d.name,
                source_role_name: d.source_role_name,
                role_name: d.role_name,
                source_multiplicity: d.source_multiplicity,
                multiplicity: d.multiplicity,
                aggregation: d.aggregation,
                composition: d.composition,
            },
        )
    }

    // ==================== Lookup ====================

    /// Get a live association by ID.
    pub fn association(&self, id: AssociationId) -> ModelResult<&Association> {
        let a = self
            .associations
            .get(&id)
            .ok_or(ModelError::AssociationNotFound(id))?;
        if a.deleted {
            return Err(ModelError::deleted("association", id.to_string()));
        }
        Ok(a)
    }

    /// Associations attached directly to a classifier.
    pub fn classifier_associations(
        &self,
        classifier: ClassifierId,
    ) -> ModelResult<Vec<AssociationId>> {
        Ok(self.classifier(classifier)?.associations.clone())
    }

    /// Associations attached to a classifier or inherited through its class
    /// path, duplicates removed.
    pub fn all_associations(&self, classifier: ClassifierId) -> ModelResult<Vec<AssociationId>> {
        let mut result = Vec::new();
        for clf in self.class_path(classifier)? {
            if let Some(c) = self.classifiers.get(&clf) {
                for &a in &c.associations {
                    if !result.contains(&a) {
                        result.push(a);
                    }
                }
            }
        }
        Ok(result)
    }

    // ==================== Matching ====================

    /// Check whether an association's source end matches a classifier
    /// and/or role name. With both absent there is nothing to match on.
    pub fn association_matches_source(
        &self,
        association: AssociationId,
        classifier: Option<ClassifierId>,
        role_name: Option<&str>,
    ) -> ModelResult<bool> {
        let a = self.association(association)?;
        self.matches_end(a.source, a.source_role_name.as_deref(), classifier, role_name)
    }

    /// Check whether an association's target end matches a classifier
    /// and/or role name.
    pub fn association_matches_target(
        &self,
        association: AssociationId,
        classifier: Option<ClassifierId>,
        role_name: Option<&str>,
    ) -> ModelResult<bool> {
        let a = self.association(association)?;
        self.matches_end(a.target, a.role_name.as_deref(), classifier, role_name)
    }

    fn matches_end(
        &self,
        end_classifier: ClassifierId,
        end_role: Option<&str>,
        classifier: Option<ClassifierId>,
        role_name: Option<&str>,
    ) -> ModelResult<bool> {
        if classifier.is_none() && role_name.is_none() {
            return Ok(false);
        }
        if let Some(role) = role_name {
            if end_role != Some(role) {
                return Ok(false);
            }
        }
        if let Some(clf) = classifier {
            if !self.conforms_to_type(clf, end_classifier)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    // ==================== Multiplicity ====================

    /// Check one side's bounds for an object's link count.
    ///
    /// `target_side` selects which multiplicity applies: the target-side
    /// multiplicity constrains how many targets a source holds, the
    /// source-side one how many sources a target holds. A count outside the
    /// bounds is tolerated while the opposite side has zero links and a
    /// zero lower bound, so half-wired structures under construction do not
    /// fail early.
    pub fn check_multiplicity(
        &self,
        association: AssociationId,
        count: usize,
        opposite_count: usize,
        target_side: bool,
    ) -> ModelResult<()> {
        let a = self.association(association)?;
        let (multiplicity, role, opposite) = if target_side {
            (a.multiplicity, a.role_name.clone(), a.source_multiplicity)
        } else {
            (a.source_multiplicity, a.source_role_name.clone(), a.multiplicity)
        };
        if multiplicity.contains(count) {
            return Ok(());
        }
        if opposite_count == 0 && opposite.lower == 0 {
            return Ok(());
        }
        Err(ModelError::multiplicity_violation(
            self.association_display_name(association),
            role.unwrap_or_else(|| if target_side { "target" } else { "source" }.to_string()),
            count,
            multiplicity.to_string(),
        ))
    }

    // ==================== Deletion ====================

    /// Delete an association, cascading to its links and detaching it from
    /// both endpoint classifiers and from extending stereotypes. Deleting
    /// twice is a no-op.
    pub fn delete_association(&mut self, id: AssociationId) -> ModelResult<()> {
        let a = self
            .associations
            .get(&id)
            .ok_or(ModelError::AssociationNotFound(id))?;
        if a.deleted {
            return Ok(());
        }
        self.delete_association_raw(id);
        Ok(())
    }

    pub(crate) fn delete_association_raw(&mut self, id: AssociationId) {
        let Some(a) = self.associations.get(&id) else {
            return;
        };
        if a.deleted {
            return;
        }
        let source = a.source;
        let target = a.target;
        let links = a.links.clone();
        let extended_by = a.extended_by.clone();

        for link in links {
            self.delete_link_raw(link);
        }
        for clf in [source, target] {
            if let Some(c) = self.classifiers.get_mut(&clf) {
                c.associations.retain(|&x| x != id);
            }
        }
        for st in extended_by {
            if let Some(s) = self.classifiers.get_mut(&st) {
                s.extended
                    .retain(|t| *t != ExtensionTarget::Association(id));
            }
        }

        if let Some(a) = self.associations.get_mut(&id) {
            a.links.clear();
            a.extended_by.clear();
            a.name = None;
            a.deleted = true;
        }
    }
}
