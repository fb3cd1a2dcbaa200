//! Batch link operations and the association resolution protocol.
//!
//! `add_links` / `set_links` / `delete_links` take (source, target) endpoint
//! pairs and resolve which association each pair instantiates: endpoints are
//! normalized (a class stands in as its class-object), a common target
//! classifier is inferred per source, and the source's transitive
//! association set is searched in forward and reverse orientation. Exactly
//! one match may survive. Every call is all-or-nothing: a failure anywhere
//! deletes the links the call created before the error propagates.

use crate::{Link, Model, Stereotyped, ValueStore};
use forma_core::{AssociationId, ClassifierId, LinkId, ModelError, ModelResult, ObjectId, Value};

/// One end of a link as named by the caller. Classes are accepted directly
/// and normalized to their reflective class-objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Object(ObjectId),
    Class(ClassifierId),
}

impl From<ObjectId> for Endpoint {
    fn from(id: ObjectId) -> Self {
        Endpoint::Object(id)
    }
}

impl From<ClassifierId> for Endpoint {
    fn from(id: ClassifierId) -> Self {
        Endpoint::Class(id)
    }
}

/// Options for a batch link operation.
#[derive(Debug, Clone, Default)]
pub struct LinkOpts {
    /// Skip association inference and use this one.
    pub association: Option<AssociationId>,
    /// Role name the targets play, used to narrow the association search.
    pub role_name: Option<String>,
    pub label: Option<String>,
    /// Stereotypes to apply to every created link.
    pub stereotype_instances: Vec<ClassifierId>,
    /// Tagged values to stamp onto every created link.
    pub tagged_values: Vec<(String, Value)>,
}

impl LinkOpts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn association(mut self, association: AssociationId) -> Self {
        self.association = Some(association);
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role_name = Some(role.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn stereotype(mut self, stereotype: ClassifierId) -> Self {
        self.stereotype_instances.push(stereotype);
        self
    }

    pub fn tagged(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.tagged_values.push((name.into(), value.into()));
        self
    }
}

/// A (source, target) pair normalized to objects, with the resolved
/// association and its orientation relative to the call.
struct ResolvedPair {
    association: AssociationId,
    source: ObjectId,
    target: ObjectId,
}

impl Model {
    // ==================== Batch Creation ====================

    /// Create links for every (source, target) pair, keeping existing links.
    pub fn add_links(
        &mut self,
        pairs: Vec<(Endpoint, Endpoint)>,
        opts: LinkOpts,
    ) -> ModelResult<Vec<LinkId>> {
        self.run_link_op(pairs, opts, false)
    }

    /// Replace the links of every source endpoint for the resolved
    /// association, then create the given pairs.
    pub fn set_links(
        &mut self,
        pairs: Vec<(Endpoint, Endpoint)>,
        opts: LinkOpts,
    ) -> ModelResult<Vec<LinkId>> {
        self.run_link_op(pairs, opts, true)
    }

    fn run_link_op(
        &mut self,
        pairs: Vec<(Endpoint, Endpoint)>,
        opts: LinkOpts,
        replace: bool,
    ) -> ModelResult<Vec<LinkId>> {
        let mut created = Vec::new();
        match self.link_batch(&pairs, &opts, replace, &mut created) {
            Ok(()) => Ok(created),
            Err(e) => {
                for link in created {
                    self.delete_link_raw(link);
                }
                Err(e)
            }
        }
    }

    fn link_batch(
        &mut self,
        pairs: &[(Endpoint, Endpoint)],
        opts: &LinkOpts,
        replace: bool,
        created: &mut Vec<LinkId>,
    ) -> ModelResult<()> {
        // Step 1: normalize endpoints and group targets per source,
        // preserving call order.
        let mut groups: Vec<(ObjectId, Vec<ObjectId>)> = Vec::new();
        for &(source, target) in pairs {
            let source = self.normalize_endpoint(source)?;
            let target = self.normalize_endpoint(target)?;
            if self.object(source)?.is_class_object() != self.object(target)?.is_class_object() {
                return Err(ModelError::MixedLinkEndpoints);
            }
            match groups.iter_mut().find(|(s, _)| *s == source) {
                Some((_, targets)) => targets.push(target),
                None => groups.push((source, vec![target])),
            }
        }

        let mut resolved = Vec::new();
        let mut touched: Vec<(ObjectId, AssociationId)> = Vec::new();
        for (source, targets) in &groups {
            // Step 2: the nearest classifier every target conforms to.
            let common_target = self.common_classifier(targets)?;
            // Step 3: exactly one association, in exactly one orientation.
            let (association, forward) =
                self.resolve_association(*source, *targets.first().unwrap_or(source), common_target, opts)?;

            // Step 4: in replace mode, clear the source endpoint's existing
            // links of the resolved association first.
            if replace {
                for link in self.links_for_association(*source, association)? {
                    self.delete_link_raw(link);
                }
            }

            let opposite_end = {
                let a = self.association(association)?;
                if forward {
                    a.target
                } else {
                    a.source
                }
            };
            for &target in targets {
                if !self.conforms_to_type(self.object(target)?.classifier, opposite_end)? {
                    return Err(ModelError::no_matching_association(
                        self.object_display_name(*source),
                        self.object_display_name(target),
                    ));
                }
                // Orientation: a reverse match makes the call's source the
                // association's semantic target.
                let (link_source, link_target) = if forward {
                    (*source, target)
                } else {
                    (target, *source)
                };
                resolved.push(ResolvedPair {
                    association,
                    source: link_source,
                    target: link_target,
                });
                for endpoint in [link_source, link_target] {
                    if !touched.contains(&(endpoint, association)) {
                        touched.push((endpoint, association));
                    }
                }
            }
        }

        // Step 5: create, refusing duplicates, stamping link metadata.
        for pair in &resolved {
            if self
                .find_exact_link(pair.association, pair.source, pair.target)?
                .is_some()
            {
                return Err(ModelError::duplicate_link(
                    self.object_display_name(pair.source),
                    self.object_display_name(pair.target),
                ));
            }
            let id = self.create_link_raw(pair.association, pair.source, pair.target, opts)?;
            created.push(id);
        }

        // Step 6: both-sides multiplicity over every touched endpoint,
        // against the final counts.
        for (endpoint, association) in touched {
            self.validate_endpoint_multiplicity(endpoint, association, &[])?;
        }
        Ok(())
    }

    // ==================== Batch Deletion ====================

    /// Delete the link of each (source, target) pair, matched in either
    /// direction and optionally narrowed by association or role name. Each
    /// pair must resolve to exactly one link, and the deletion must leave
    /// multiplicities valid. The batch is all-or-nothing: every pair is
    /// resolved and validated before the first link is deleted.
    pub fn delete_links(
        &mut self,
        pairs: Vec<(Endpoint, Endpoint)>,
        opts: LinkOpts,
    ) -> ModelResult<()> {
        let mut doomed: Vec<(ObjectId, ObjectId, LinkId)> = Vec::new();
        for (source, target) in pairs {
            let source = self.normalize_endpoint(source)?;
            let target = self.normalize_endpoint(target)?;

            let mut matches = Vec::new();
            for &link_id in &self.object(source)?.links {
                // A link claimed by an earlier pair counts as already gone.
                if doomed.iter().any(|&(_, _, claimed)| claimed == link_id) {
                    continue;
                }
                let Some(link) = self.links.get(&link_id) else {
                    continue;
                };
                let pair_match = (link.source == source && link.target == target)
                    || (link.source == target && link.target == source);
                if !pair_match {
                    continue;
                }
                if let Some(assoc) = opts.association {
                    if link.association != assoc {
                        continue;
                    }
                }
                if let Some(role) = opts.role_name.as_deref() {
                    let a = self.association(link.association)?;
                    let target_role = if link.source == source {
                        a.role_name.as_deref()
                    } else {
                        a.source_role_name.as_deref()
                    };
                    if target_role != Some(role) {
                        continue;
                    }
                }
                matches.push(link_id);
            }

            let link_id = match matches.as_slice() {
                [] => {
                    return Err(ModelError::no_such_link(
                        self.object_display_name(source),
                        self.object_display_name(target),
                    ))
                }
                [one] => *one,
                _ => {
                    return Err(ModelError::ambiguous_link(
                        self.object_display_name(source),
                        self.object_display_name(target),
                    ))
                }
            };
            doomed.push((source, target, link_id));
        }

        // Validate as if every resolved link were already gone.
        let doomed_ids: Vec<LinkId> = doomed.iter().map(|&(_, _, id)| id).collect();
        for &(source, target, link_id) in &doomed {
            let association = self.link(link_id)?.association;
            for endpoint in [source, target] {
                self.validate_endpoint_multiplicity(endpoint, association, &doomed_ids)?;
            }
        }
        for &(_, _, link_id) in &doomed {
            self.delete_link_raw(link_id);
        }
        Ok(())
    }

    // ==================== Resolution ====================

    /// A class endpoint stands in as its reflective class-object.
    pub(crate) fn normalize_endpoint(&self, endpoint: Endpoint) -> ModelResult<ObjectId> {
        match endpoint {
            Endpoint::Object(id) => {
                self.object(id)?;
                Ok(id)
            }
            Endpoint::Class(id) => self.class_object(id),
        }
    }

    /// The first classifier on the first target's class path that every
    /// target conforms to, or `None` when the targets share no ancestor.
    fn common_classifier(&self, targets: &[ObjectId]) -> ModelResult<Option<ClassifierId>> {
        let Some(&first) = targets.first() else {
            return Ok(None);
        };
        'candidates: for candidate in self.class_path(self.object(first)?.classifier)? {
            for &target in targets {
                if !self.conforms_to_type(self.object(target)?.classifier, candidate)? {
                    continue 'candidates;
                }
            }
            return Ok(Some(candidate));
        }
        Ok(None)
    }

    /// Resolve the association a source links through, searching its
    /// transitive association set (or just the explicit one) in forward and
    /// reverse orientation. Returns the association and whether the call's
    /// source is the association's semantic source.
    fn resolve_association(
        &self,
        source: ObjectId,
        target: ObjectId,
        common_target: Option<ClassifierId>,
        opts: &LinkOpts,
    ) -> ModelResult<(AssociationId, bool)> {
        let source_clf = self.object(source)?.classifier;
        let role = opts.role_name.as_deref();
        let candidates = match opts.association {
            Some(a) => {
                self.association(a)?;
                vec![a]
            }
            None => self.all_associations(source_clf)?,
        };

        let mut matches = Vec::new();
        for a in candidates.iter().copied() {
            let def = self.association(a)?;
            if self.conforms_to_type(source_clf, def.source)?
                && self.association_matches_target(a, common_target, role)?
            {
                matches.push((a, true));
            }
            if self.conforms_to_type(source_clf, def.target)?
                && self.association_matches_source(a, common_target, role)?
            {
                matches.push((a, false));
            }
        }

        // An explicit association with neither a common target classifier
        // nor a role gives the matcher nothing to match on; fall back to
        // orienting by source conformance alone.
        if matches.is_empty() && opts.association.is_some() && common_target.is_none() && role.is_none()
        {
            let a = candidates[0];
            let def = self.association(a)?;
            if self.conforms_to_type(source_clf, def.source)? {
                matches.push((a, true));
            } else if self.conforms_to_type(source_clf, def.target)? {
                matches.push((a, false));
            }
        }

        match matches.as_slice() {
            [] => Err(ModelError::no_matching_association(
                self.object_display_name(source),
                self.object_display_name(target),
            )),
            [one] => Ok(*one),
            _ => Err(ModelError::ambiguous_association(
                self.object_display_name(source),
                self.object_display_name(target),
            )),
        }
    }

    fn find_exact_link(
        &self,
        association: AssociationId,
        source: ObjectId,
        target: ObjectId,
    ) -> ModelResult<Option<LinkId>> {
        Ok(self
            .association(association)?
            .links
            .iter()
            .copied()
            .find(|id| {
                self.links
                    .get(id)
                    .map(|l| l.source == source && l.target == target)
                    .unwrap_or(false)
            }))
    }

    fn create_link_raw(
        &mut self,
        association: AssociationId,
        source: ObjectId,
        target: ObjectId,
        opts: &LinkOpts,
    ) -> ModelResult<LinkId> {
        let id = self.alloc_link_id();
        let link = Link {
            id,
            label: opts.label.clone(),
            deleted: false,
            association,
            source,
            target,
            stereotype_instances: Vec::new(),
            tagged_values: ValueStore::new(),
        };
        self.links.insert(id, link);
        if let Some(a) = self.associations.get_mut(&association) {
            a.links.push(id);
        }
        self.object_mut(source)?.links.push(id);
        if target != source {
            self.object_mut(target)?.links.push(id);
        }

        if let Err(e) = self.stamp_link(id, opts) {
            self.delete_link_raw(id);
            return Err(e);
        }
        Ok(id)
    }

    fn stamp_link(&mut self, id: LinkId, opts: &LinkOpts) -> ModelResult<()> {
        for &stereotype in &opts.stereotype_instances {
            self.add_stereotype_instance(Stereotyped::Link(id), stereotype)?;
        }
        for (name, value) in &opts.tagged_values {
            self.set_tagged_value(Stereotyped::Link(id), name, value.clone())?;
        }
        Ok(())
    }

    // ==================== Multiplicity ====================

    /// Validate both sides' bounds for one endpoint of an association, based
    /// on its current link counts (discounting links about to be removed).
    /// Each side only applies if the endpoint conforms to that side's
    /// classifier.
    pub(crate) fn validate_endpoint_multiplicity(
        &self,
        object: ObjectId,
        association: AssociationId,
        exclude: &[LinkId],
    ) -> ModelResult<()> {
        let a = self.association(association)?;
        let (a_source, a_target) = (a.source, a.target);
        let mut outgoing = 0usize;
        let mut incoming = 0usize;
        for &link_id in &self.object(object)?.links {
            if exclude.contains(&link_id) {
                continue;
            }
            let Some(link) = self.links.get(&link_id) else {
                continue;
            };
            if link.association != association {
                continue;
            }
            if link.source == object {
                outgoing += 1;
            }
            if link.target == object {
                incoming += 1;
            }
        }

        let classifier = self.object(object)?.classifier;
        if self.conforms_to_type(classifier, a_source)? {
            self.check_multiplicity(association, outgoing, incoming, true)?;
        }
        if self.conforms_to_type(classifier, a_target)? {
            self.check_multiplicity(association, incoming, outgoing, false)?;
        }
        Ok(())
    }
}
