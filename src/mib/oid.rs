//! Hierarchical object identifiers and the fixed agent address space.
//!
//! Identifiers are part of the wire contract with the remote manager: the
//! constants below must stay stable across releases and process restarts.

use std::fmt;
use std::str::FromStr;

/// Apartment device id scalar (read-only).
pub const APT_DEVICE_ID: &[u32] = &[1, 3, 6, 1, 2, 1, 2, 1, 1];
/// Apartment total energy consumption scalar.
pub const APT_CONSUMPTION: &[u32] = &[1, 3, 6, 1, 2, 1, 2, 2, 1];
/// Apartment total energy generation scalar (derived).
pub const APT_GENERATION: &[u32] = &[1, 3, 6, 1, 2, 1, 2, 3, 1];
/// Apartment energy storage scalar.
pub const APT_STORAGE: &[u32] = &[1, 3, 6, 1, 2, 1, 2, 4, 1];
/// Apartment solar generation scalar; writes to it trigger rebalancing.
pub const APT_GENERATION_BY_SOLAR: &[u32] = &[1, 3, 6, 1, 2, 1, 2, 5, 1];
/// Apartment hydro generation scalar; server-mutated by rebalancing.
pub const APT_GENERATION_BY_HYDRO: &[u32] = &[1, 3, 6, 1, 2, 1, 2, 6, 1];

/// Base identifier of the flat telemetry table; columns hang off `.1`..`.5`.
pub const FLAT_TABLE_BASE: &[u32] = &[1, 3, 6, 1, 2, 1, 3, 1, 1];

/// An immutable hierarchical object identifier (a dotted path of small
/// non-negative integers).
///
/// Sibling identifiers share a common prefix denoting the owning entity.
/// Renders and parses in the conventional leading-dot form, e.g.
/// `.1.3.6.1.2.1.2.5.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid(Vec<u32>);

impl Oid {
    /// Creates an identifier from its path components.
    pub fn new(parts: &[u32]) -> Self {
        Self(parts.to_vec())
    }

    /// Returns the path components.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Derives a child identifier by appending one component, e.g. a table
    /// column index under a table base identifier.
    pub fn child(&self, sub: u32) -> Self {
        let mut parts = self.0.clone();
        parts.push(sub);
        Self(parts)
    }

    /// Returns `true` when `prefix` is a (non-strict) prefix of this
    /// identifier.
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl From<&[u32]> for Oid {
    fn from(parts: &[u32]) -> Self {
        Self::new(parts)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.0 {
            write!(f, ".{part}")?;
        }
        Ok(())
    }
}

/// Error parsing a dotted identifier string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier \"{input}\": {reason}")]
pub struct ParseOidError {
    /// The offending input string.
    pub input: String,
    /// Human-readable description of what failed.
    pub reason: String,
}

impl FromStr for Oid {
    type Err = ParseOidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix('.').unwrap_or(s);
        if trimmed.is_empty() {
            return Err(ParseOidError {
                input: s.to_string(),
                reason: "empty path".to_string(),
            });
        }
        let mut parts = Vec::new();
        for component in trimmed.split('.') {
            let n = component.parse::<u32>().map_err(|_| ParseOidError {
                input: s.to_string(),
                reason: format!("component \"{component}\" is not an unsigned integer"),
            })?;
            parts.push(n);
        }
        Ok(Self(parts))
    }
}
