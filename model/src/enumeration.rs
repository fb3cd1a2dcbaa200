//! Enumerations.
//!
//! An enumeration is a named element carrying the list of values that are
//! legal for attributes typed by it.

use crate::Model;
use forma_core::{EnumId, ModelError, ModelResult, Value};

/// A named set of legal attribute values.
#[derive(Debug, Clone)]
pub struct Enumeration {
    pub id: EnumId,
    pub name: Option<String>,
    pub deleted: bool,
    /// Legal values, in declaration order.
    pub values: Vec<Value>,
}

impl Enumeration {
    /// Check whether a value is one of the declared enumerants.
    pub fn is_legal_value(&self, value: &Value) -> bool {
        self.values.contains(value)
    }
}

impl Model {
    /// Create a new enumeration with the given legal values.
    pub fn create_enumeration(
        &mut self,
        name: impl Into<String>,
        values: Vec<Value>,
    ) -> EnumId {
        let id = self.alloc_enum_id();
        self.enums.insert(
            id,
            Enumeration {
                id,
                name: Some(name.into()),
                deleted: false,
                values,
            },
        );
        id
    }

    /// Get a live enumeration by ID.
    pub fn enumeration(&self, id: EnumId) -> ModelResult<&Enumeration> {
        let e = self.enums.get(&id).ok_or(ModelError::EnumNotFound(id))?;
        if e.deleted {
            return Err(ModelError::deleted("enumeration", id.to_string()));
        }
        Ok(e)
    }

    /// Delete an enumeration. Attributes typed by it become unusable.
    /// Deleting twice is a no-op.
    pub fn delete_enumeration(&mut self, id: EnumId) -> ModelResult<()> {
        let e = self
            .enums
            .get_mut(&id)
            .ok_or(ModelError::EnumNotFound(id))?;
        if e.deleted {
            return Ok(());
        }
        e.name = None;
        e.values.clear();
        e.deleted = true;
        Ok(())
    }
}
