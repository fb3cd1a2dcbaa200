//! The model error type.
//!
//! Every violation the engine can detect surfaces as a [`ModelError`]. All
//! operations are synchronous and local, so there is no retryable/fatal
//! split: an error always means the triggering call was rejected and any
//! partial mutation it performed has been rolled back.

use crate::{AssociationId, ClassifierId, EnumId, LinkId, ObjectId};
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur during model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Classifier not found: {0}")]
    ClassifierNotFound(ClassifierId),

    #[error("Enumeration not found: {0}")]
    EnumNotFound(EnumId),

    #[error("Association not found: {0}")]
    AssociationNotFound(AssociationId),

    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("Link not found: {0}")]
    LinkNotFound(LinkId),

    #[error("Cannot access deleted {kind} '{name}'")]
    Deleted { kind: String, name: String },

    #[error("Wrong element kind: expected {expected}, got {actual}")]
    KindMismatch { expected: String, actual: String },

    #[error("Cannot add superclass to '{classifier}': {reason}")]
    InvalidSuperclass { classifier: String, reason: String },

    #[error("Duplicate attribute '{attr}' on classifier '{classifier}'")]
    DuplicateAttribute { classifier: String, attr: String },

    #[error("Unknown {what} '{attr}' on '{owner}'")]
    UnknownAttribute {
        what: String,
        owner: String,
        attr: String,
    },

    #[error("Value type mismatch for {what} '{attr}': expected {expected}, got {actual}")]
    ValueTypeMismatch {
        what: String,
        attr: String,
        expected: String,
        actual: String,
    },

    #[error("Attribute '{attr}' has an unusable type: {reason}")]
    UnusableAttributeType { attr: String, reason: String },

    #[error("Value '{value}' is not a legal value of enumeration '{enumeration}'")]
    IllegalEnumValue { enumeration: String, value: String },

    #[error("Malformed multiplicity '{text}': {reason}")]
    MalformedMultiplicity { text: String, reason: String },

    #[error("Malformed association descriptor '{text}': {reason}")]
    MalformedDescriptor { text: String, reason: String },

    // Fields are named `from`/`to` because thiserror reserves `source` for
    // the error cause.
    #[error("Association endpoints must be the same classifier kind: {from} vs {to}")]
    AssociationKindMismatch { from: String, to: String },

    #[error("Multiplicity violation on association '{association}' role '{role}': {count} link(s) not in {bounds}")]
    MultiplicityViolation {
        association: String,
        role: String,
        count: usize,
        bounds: String,
    },

    #[error("No matching association found for link from '{from}' to '{to}'")]
    NoMatchingAssociation { from: String, to: String },

    #[error("Ambiguous association for link from '{from}' to '{to}'")]
    AmbiguousAssociation { from: String, to: String },

    #[error("Link between '{from}' and '{to}' already exists")]
    DuplicateLink { from: String, to: String },

    #[error("No link found between '{from}' and '{to}'")]
    NoSuchLink { from: String, to: String },

    #[error("Ambiguous link between '{from}' and '{to}': specify an association or role name")]
    AmbiguousLink { from: String, to: String },

    #[error("Link endpoints must both be objects or both be classes")]
    MixedLinkEndpoints,

    #[error("Stereotype '{stereotype}' does not extend '{element}'")]
    NotExtended { stereotype: String, element: String },

    #[error("Stereotype '{stereotype}' already applied to '{element}'")]
    DuplicateStereotypeInstance { stereotype: String, element: String },

    #[error("Stereotype '{stereotype}' already extends '{element}'")]
    DuplicateExtension { stereotype: String, element: String },

    #[error("Stereotype extension targets must be uniformly metaclasses or uniformly metaclass associations")]
    MixedExtensionTargets,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl ModelError {
    pub fn deleted(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Deleted {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn kind_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::KindMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_superclass(classifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSuperclass {
            classifier: classifier.into(),
            reason: reason.into(),
        }
    }

    pub fn duplicate_attribute(classifier: impl Into<String>, attr: impl Into<String>) -> Self {
        Self::DuplicateAttribute {
            classifier: classifier.into(),
            attr: attr.into(),
        }
    }

    pub fn unknown_attribute(
        what: impl Into<String>,
        owner: impl Into<String>,
        attr: impl Into<String>,
    ) -> Self {
        Self::UnknownAttribute {
            what: what.into(),
            owner: owner.into(),
            attr: attr.into(),
        }
    }

    pub fn value_type_mismatch(
        what: impl Into<String>,
        attr: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ValueTypeMismatch {
            what: what.into(),
            attr: attr.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn unusable_attribute_type(attr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnusableAttributeType {
            attr: attr.into(),
            reason: reason.into(),
        }
    }

    pub fn illegal_enum_value(enumeration: impl Into<String>, value: impl Into<String>) -> Self {
        Self::IllegalEnumValue {
            enumeration: enumeration.into(),
            value: value.into(),
        }
    }

    pub fn malformed_multiplicity(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedMultiplicity {
            text: text.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed_descriptor(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            text: text.into(),
            reason: reason.into(),
        }
    }

    pub fn association_kind_mismatch(
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::AssociationKindMismatch {
            from: source.into(),
            to: target.into(),
        }
    }

    pub fn multiplicity_violation(
        association: impl Into<String>,
        role: impl Into<String>,
        count: usize,
        bounds: impl Into<String>,
    ) -> Self {
        Self::MultiplicityViolation {
            association: association.into(),
            role: role.into(),
            count,
            bounds: bounds.into(),
        }
    }

    pub fn no_matching_association(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::NoMatchingAssociation {
            from: source.into(),
            to: target.into(),
        }
    }

    pub fn ambiguous_association(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::AmbiguousAssociation {
            from: source.into(),
            to: target.into(),
        }
    }

    pub fn duplicate_link(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::DuplicateLink {
            from: source.into(),
            to: target.into(),
        }
    }

    pub fn no_such_link(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::NoSuchLink {
            from: source.into(),
            to: target.into(),
        }
    }

    pub fn ambiguous_link(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::AmbiguousLink {
            from: source.into(),
            to: target.into(),
        }
    }

    pub fn not_extended(stereotype: impl Into<String>, element: impl Into<String>) -> Self {
        Self::NotExtended {
            stereotype: stereotype.into(),
            element: element.into(),
        }
    }

    pub fn duplicate_stereotype_instance(
        stereotype: impl Into<String>,
        element: impl Into<String>,
    ) -> Self {
        Self::DuplicateStereotypeInstance {
            stereotype: stereotype.into(),
            element: element.into(),
        }
    }

    pub fn duplicate_extension(stereotype: impl Into<String>, element: impl Into<String>) -> Self {
        Self::DuplicateExtension {
            stereotype: stereotype.into(),
            element: element.into(),
        }
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }
}
