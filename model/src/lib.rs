//! Forma Model
//!
//! This crate provides the modeling engine:
//! - Classifiers: metaclasses, classes and stereotypes, with multiple
//!   inheritance and class paths
//! - Attributes: typed slots with defaults, back-filled and stripped as
//!   tables change
//! - Associations: typed relationships with role names and multiplicities,
//!   parseable from a compact descriptor
//! - Objects and links: instances of classes and associations, with
//!   batch link operations resolving the association per pair
//! - Stereotypes: extension of the metaclass level, tagged values and
//!   default values
//! - Value resolution: one engine shared by attribute, tagged and default
//!   values

mod association;
mod attribute;
mod classifier;
mod connect;
mod descriptor;
mod enumeration;
mod link;
mod links;
mod model;
mod multiplicity;
mod object;
mod stereotype;
mod values;

pub use association::{Association, AssociationDef};
pub use attribute::{AttrType, Attribute};
pub use classifier::{Classifier, ClassifierKind, ExtensionTarget};
pub use descriptor::{parse_descriptor, Descriptor};
pub use enumeration::Enumeration;
pub use link::Link;
pub use links::{Endpoint, LinkOpts};
pub use model::Model;
pub use multiplicity::Multiplicity;
pub use object::{Object, ObjectRole};
pub use stereotype::Stereotyped;

pub(crate) use values::ValueStore;
