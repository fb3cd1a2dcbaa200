//! Forma Core Types
//!
//! This crate provides the foundational types used throughout the forma
//! meta-modeling engine:
//! - Identity types (ClassifierId, EnumId, AssociationId, ObjectId, LinkId,
//!   and the unified ElementId)
//! - Value types (the Value enum with all scalar, list and reference types)
//! - The common error type (ModelError)

mod error;
mod id;
mod value;

pub use error::*;
pub use id::*;
pub use value::*;
