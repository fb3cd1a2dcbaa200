//! Integration test support for forma.
//!
//! Scenarios build models through the public API only. The prelude
//! re-exports everything a scenario needs.

pub mod prelude {
    pub use forma_core::{
        attrs, AssociationId, ClassifierId, ElementId, EnumId, LinkId, ModelError, ModelResult,
        ObjectId, Value,
    };
    pub use forma_model::{
        parse_descriptor, AssociationDef, AttrType, Attribute, Classifier, ClassifierKind,
        Descriptor, Endpoint, ExtensionTarget, Link, LinkOpts, Model, Multiplicity, Object,
        ObjectRole, Stereotyped,
    };
}
