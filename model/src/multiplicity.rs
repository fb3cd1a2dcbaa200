//! Association multiplicities.
//!
//! A multiplicity is a `(lower, upper)` bound pair where the upper bound may
//! be unbounded. The textual forms are `N`, `N..M`, `N..*` and `*`.

use forma_core::{ModelError, ModelResult};
use std::fmt;

/// Lower/upper bounds for one association end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplicity {
    /// Minimum number of links required at this end.
    pub lower: u32,
    /// Maximum number of links allowed at this end; `None` means unbounded.
    pub upper: Option<u32>,
}

impl Multiplicity {
    /// Create a multiplicity from explicit bounds.
    pub const fn new(lower: u32, upper: Option<u32>) -> Self {
        Self { lower, upper }
    }

    /// Exactly one (`1`).
    pub const fn one() -> Self {
        Self::new(1, Some(1))
    }

    /// Zero or more (`*`).
    pub const fn many() -> Self {
        Self::new(0, None)
    }

    /// Parse a multiplicity from its textual form.
    pub fn parse(text: &str) -> ModelResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ModelError::malformed_multiplicity(
                text,
                "empty multiplicity",
            ));
        }
        if text == "*" {
            return Ok(Self::many());
        }
        if let Some((low, high)) = text.split_once("..") {
            let lower = parse_bound(text, low)?;
            if high.trim() == "*" {
                return Ok(Self::new(lower, None));
            }
            let upper = parse_bound(text, high)?;
            if upper < lower {
                return Err(ModelError::malformed_multiplicity(
                    text,
                    "upper bound is smaller than lower bound",
                ));
            }
            return Ok(Self::new(lower, Some(upper)));
        }
        let exact = parse_bound(text, text)?;
        Ok(Self::new(exact, Some(exact)))
    }

    /// Check whether a link count lies within the bounds.
    pub fn contains(&self, count: usize) -> bool {
        if (count as u64) < self.lower as u64 {
            return false;
        }
        match self.upper {
            Some(upper) => count as u64 <= upper as u64,
            None => true,
        }
    }
}

fn parse_bound(whole: &str, part: &str) -> ModelResult<u32> {
    let part = part.trim();
    part.parse::<u32>().map_err(|_| {
        ModelError::malformed_multiplicity(
            whole,
            format!("'{}' is not a non-negative integer", part),
        )
    })
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (0, None) => write!(f, "*"),
            (lower, None) => write!(f, "{}..*", lower),
            (lower, Some(upper)) if lower == upper => write!(f, "{}", lower),
            (lower, Some(upper)) => write!(f, "{}..{}", lower, upper),
        }
    }
}
