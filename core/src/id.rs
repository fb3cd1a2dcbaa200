//! Identity types for forma entities.
//!
//! All identifiers are integer values that are:
//! - Unique within their namespace for the lifetime of a model
//! - Immutable once assigned
//! - Opaque to external users
//!
//! Entities are stored in arenas inside the model and refer to each other
//! through these handles, never through direct references.

use std::fmt;

/// Unique identifier for a classifier (metaclass, class, or stereotype).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassifierId(pub u32);

impl ClassifierId {
    /// Create a new ClassifierId from a raw value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ClassifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Unique identifier for an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumId(pub u32);

impl EnumId {
    /// Create a new EnumId from a raw value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EnumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "en{}", self.0)
    }
}

/// Unique identifier for an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssociationId(pub u32);

impl AssociationId {
    /// Create a new AssociationId from a raw value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AssociationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// Unique identifier for an object (including reflective class-objects).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl ObjectId {
    /// Create a new ObjectId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "o{}", self.0)
    }
}

/// Unique identifier for a link (association instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u64);

impl LinkId {
    /// Create a new LinkId from a raw value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}", self.0)
    }
}

/// Unified identifier that can refer to any model element.
///
/// Used by the connected-elements hook, which enumerates the neighbors of an
/// element regardless of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    Classifier(ClassifierId),
    Enumeration(EnumId),
    Association(AssociationId),
    Object(ObjectId),
    Link(LinkId),
}

impl ElementId {
    /// Returns true if this refers to a classifier.
    pub fn is_classifier(&self) -> bool {
        matches!(self, ElementId::Classifier(_))
    }

    /// Returns true if this refers to an object.
    pub fn is_object(&self) -> bool {
        matches!(self, ElementId::Object(_))
    }

    /// Get as a ClassifierId if this refers to a classifier.
    pub fn as_classifier(&self) -> Option<ClassifierId> {
        match self {
            ElementId::Classifier(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as an AssociationId if this refers to an association.
    pub fn as_association(&self) -> Option<AssociationId> {
        match self {
            ElementId::Association(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as an ObjectId if this refers to an object.
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            ElementId::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as a LinkId if this refers to a link.
    pub fn as_link(&self) -> Option<LinkId> {
        match self {
            ElementId::Link(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<ClassifierId> for ElementId {
    fn from(id: ClassifierId) -> Self {
        ElementId::Classifier(id)
    }
}

impl From<EnumId> for ElementId {
    fn from(id: EnumId) -> Self {
        ElementId::Enumeration(id)
    }
}

impl From<AssociationId> for ElementId {
    fn from(id: AssociationId) -> Self {
        ElementId::Association(id)
    }
}

impl From<ObjectId> for ElementId {
    fn from(id: ObjectId) -> Self {
        ElementId::Object(id)
    }
}

impl From<LinkId> for ElementId {
    fn from(id: LinkId) -> Self {
        ElementId::Link(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementId::Classifier(id) => write!(f, "{}", id),
            ElementId::Enumeration(id) => write!(f, "{}", id),
            ElementId::Association(id) => write!(f, "{}", id),
            ElementId::Object(id) => write!(f, "{}", id),
            ElementId::Link(id) => write!(f, "{}", id),
        }
    }
}
