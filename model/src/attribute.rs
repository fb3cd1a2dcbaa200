//! Attribute definitions and value type checking.
//!
//! An attribute is a typed slot on a classifier. Its declared type is a
//! primitive, a list, an enumeration, or a classifier (meaning the value
//! must be an instance of that classifier or a subclass). A default value,
//! when present, must be compatible with the declared type and is eagerly
//! propagated to existing instances that have no explicit value.

use crate::Model;
use forma_core::{ClassifierId, EnumId, ModelError, ModelResult, Value};

/// Declared type of an attribute slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    String,
    Bool,
    Int,
    Float,
    List,
    /// Value must be a legal value of this enumeration.
    Enumeration(EnumId),
    /// Value must be an instance of this classifier or a subclass.
    Classifier(ClassifierId),
}

/// A typed attribute slot on a classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute name, unique within the owning classifier's own table.
    pub name: String,
    /// Declared type.
    pub attr_type: AttrType,
    /// Default value, propagated to instances lacking an explicit value.
    pub default: Option<Value>,
}

impl Attribute {
    /// Create an attribute with the given name and declared type.
    pub fn new(name: impl Into<String>, attr_type: AttrType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            default: None,
        }
    }

    /// Attach a default value (type-checked when the attribute is added to
    /// a classifier).
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

impl Model {
    // ==================== Attribute Tables ====================

    /// Get the attribute table of a classifier (own attributes only;
    /// inherited attributes are resolved through the class path).
    pub fn attributes(&self, classifier: ClassifierId) -> ModelResult<&[Attribute]> {
        Ok(&self.classifier(classifier)?.attributes)
    }

    /// Replace the attribute table of a classifier.
    ///
    /// Values stored under removed names are stripped from every current
    /// instance; defaults of the new table are back-filled onto instances
    /// that have no explicit value yet.
    pub fn set_attributes(
        &mut self,
        classifier: ClassifierId,
        attributes: Vec<Attribute>,
    ) -> ModelResult<()> {
        let owner = self.classifier_display_name(classifier);
        self.classifier(classifier)?;

        for (i, attr) in attributes.iter().enumerate() {
            if attributes[..i].iter().any(|a| a.name == attr.name) {
                return Err(ModelError::duplicate_attribute(&owner, &attr.name));
            }
            if let Some(default) = &attr.default {
                self.check_attribute_value("default value", attr, default)?;
            }
        }

        let old_names: Vec<String> = self
            .classifier(classifier)?
            .attributes
            .iter()
            .map(|a| a.name.clone())
            .collect();
        let removed: Vec<String> = old_names
            .into_iter()
            .filter(|name| !attributes.iter().any(|a| &a.name == name))
            .collect();
        let defaults: Vec<(String, Value)> = attributes
            .iter()
            .filter_map(|a| a.default.clone().map(|d| (a.name.clone(), d)))
            .collect();

        for name in &removed {
            self.strip_holder_values(classifier, name);
        }
        for (name, value) in &defaults {
            self.backfill_default(classifier, name, value);
        }

        self.classifier_mut(classifier)?.attributes = attributes;
        Ok(())
    }

    /// Add a single attribute to a classifier, keeping the existing table.
    pub fn add_attribute(
        &mut self,
        classifier: ClassifierId,
        attribute: Attribute,
    ) -> ModelResult<()> {
        let owner = self.classifier_display_name(classifier);
        if self.classifier(classifier)?.attribute(&attribute.name).is_some() {
            return Err(ModelError::duplicate_attribute(&owner, &attribute.name));
        }
        if let Some(default) = &attribute.default {
            self.check_attribute_value("default value", &attribute, default)?;
        }
        if let Some(default) = attribute.default.clone() {
            self.backfill_default(classifier, &attribute.name, &default);
        }
        self.classifier_mut(classifier)?
            .attributes
            .push(attribute);
        Ok(())
    }

    // ==================== Type Checking ====================

    /// Check that a value is compatible with an attribute's declared type.
    /// `what` names the value kind for error messages ("attribute value",
    /// "tagged value", "default value").
    pub(crate) fn check_attribute_value(
        &self,
        what: &str,
        attr: &Attribute,
        value: &Value,
    ) -> ModelResult<()> {
        self.ensure_usable_attr_type(attr)?;
        let compatible = match &attr.attr_type {
            AttrType::String => value.is_string(),
            AttrType::Bool => value.is_bool(),
            AttrType::Int => value.is_int(),
            // A float slot accepts an integer value.
            AttrType::Float => value.is_float() || value.is_int(),
            AttrType::List => value.is_list(),
            AttrType::Enumeration(id) => {
                let e = self.enumeration(*id)?;
                if !e.is_legal_value(value) {
                    return Err(ModelError::illegal_enum_value(
                        self.enum_display_name(*id),
                        value.to_string(),
                    ));
                }
                true
            }
            AttrType::Classifier(id) => match value.as_object() {
                Some(object) => {
                    let instance_of = self.object(object)?.classifier;
                    self.conforms_to_type(instance_of, *id)?
                }
                None => false,
            },
        };
        if compatible {
            Ok(())
        } else {
            Err(ModelError::value_type_mismatch(
                what,
                &attr.name,
                self.attr_type_display(&attr.attr_type),
                value.type_name(),
            ))
        }
    }

    /// Fail if the attribute's declared type refers to a deleted
    /// enumeration or classifier.
    pub(crate) fn ensure_usable_attr_type(&self, attr: &Attribute) -> ModelResult<()> {
        match &attr.attr_type {
            AttrType::Enumeration(id) => {
                if self.enumeration(*id).is_err() {
                    return Err(ModelError::unusable_attribute_type(
                        &attr.name,
                        "refers to a deleted enumeration",
                    ));
                }
            }
            AttrType::Classifier(id) => {
                if self.classifier(*id).is_err() {
                    return Err(ModelError::unusable_attribute_type(
                        &attr.name,
                        "refers to a deleted classifier",
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Human-readable name of a declared attribute type.
    pub(crate) fn attr_type_display(&self, attr_type: &AttrType) -> String {
        match attr_type {
            AttrType::String => "String".to_string(),
            AttrType::Bool => "Bool".to_string(),
            AttrType::Int => "Int".to_string(),
            AttrType::Float => "Float".to_string(),
            AttrType::List => "List".to_string(),
            AttrType::Enumeration(id) => format!("enumeration '{}'", self.enum_display_name(*id)),
            AttrType::Classifier(id) => {
                format!("classifier '{}'", self.classifier_display_name(*id))
            }
        }
    }
}
