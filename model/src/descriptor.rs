//! Compact association descriptors.
//!
//! An association can be declared with a short textual form:
//!
//! ```text
//! [name:] [sourceRole] sourceMult (-> | <>- | <*>-) [targetRole] targetMult
//! ```
//!
//! `->` declares a plain directed association, `<>-` an aggregation and
//! `<*>-` a composition. Each side carries an optional bracketed role name
//! and an optional multiplicity (`N`, `N..M`, `N..*`, `*`). An omitted
//! source multiplicity defaults to `1`, an omitted target multiplicity to
//! `*`. Parsing is a plain token scan.

use crate::Multiplicity;
use forma_core::{ModelError, ModelResult};

/// Parsed form of an association descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub name: Option<String>,
    pub source_role_name: Option<String>,
    pub role_name: Option<String>,
    pub source_multiplicity: Multiplicity,
    pub multiplicity: Multiplicity,
    pub aggregation: bool,
    pub composition: bool,
}

/// One half of a descriptor: an optional role and an optional multiplicity.
struct EndSpec {
    role_name: Option<String>,
    multiplicity: Option<Multiplicity>,
}

/// Parse a descriptor string.
pub fn parse_descriptor(text: &str) -> ModelResult<Descriptor> {
    // Locate the relation marker. `<*>-` must be probed before `<>-`, and
    // both before `->`, so that the longer markers win.
    let ((left, right), aggregation, composition) = if let Some(halves) = text.split_once("<*>-") {
        (halves, false, true)
    } else if let Some(halves) = text.split_once("<>-") {
        (halves, true, false)
    } else if let Some(halves) = text.split_once("->") {
        (halves, false, false)
    } else {
        return Err(ModelError::malformed_descriptor(
            text,
            "missing relation marker '->', '<>-' or '<*>-'",
        ));
    };

    // An optional "name:" prefix belongs to the left half.
    let (name, source_spec) = match left.split_once(':') {
        Some((name, rest)) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(ModelError::malformed_descriptor(
                    text,
                    "empty association name before ':'",
                ));
            }
            (Some(name.to_string()), rest)
        }
        None => (None, left),
    };

    let source = parse_end(text, source_spec)?;
    let target = parse_end(text, right)?;

    Ok(Descriptor {
        name,
        source_role_name: source.role_name,
        role_name: target.role_name,
        source_multiplicity: source.multiplicity.unwrap_or(Multiplicity::one()),
        multiplicity: target.multiplicity.unwrap_or(Multiplicity::many()),
        aggregation,
        composition,
    })
}

fn parse_end(whole: &str, spec: &str) -> ModelResult<EndSpec> {
    let mut rest = spec.trim();
    let mut role_name = None;

    if let Some(after) = rest.strip_prefix('[') {
        let (role, tail) = after.split_once(']').ok_or_else(|| {
            ModelError::malformed_descriptor(whole, "unterminated '[' in role name")
        })?;
        let role = role.trim();
        if role.is_empty() {
            return Err(ModelError::malformed_descriptor(whole, "empty role name"));
        }
        role_name = Some(role.to_string());
        rest = tail.trim();
    }

    let multiplicity = if rest.is_empty() {
        None
    } else {
        Some(Multiplicity::parse(rest)?)
    };

    Ok(EndSpec {
        role_name,
        multiplicity,
    })
}
