//! Single-valued managed attributes.

use super::oid::Oid;

/// Manager-side access mode of a managed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Readable by the manager, never writable over the wire.
    ReadOnly,
    /// Readable and writable by the manager.
    ReadWrite,
}

/// A scalar managed attribute: one identifier, one access mode, one
/// optional string-encoded value.
///
/// The value is `None` only between construction and first initialisation;
/// once set it never reverts to `None`.
#[derive(Debug, Clone)]
pub struct MoScalar {
    oid: Oid,
    access: Access,
    value: Option<String>,
}

impl MoScalar {
    /// Creates an uninitialised scalar at the given address.
    pub fn new(oid: Oid, access: Access) -> Self {
        Self {
            oid,
            access,
            value: None,
        }
    }

    /// Returns the scalar's identifier.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Returns the scalar's access mode.
    pub fn access(&self) -> Access {
        self.access
    }

    /// Returns the current value, or `None` before first initialisation.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns `true` once the scalar has been initialised.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Stores a new value. Values are string-encoded at this boundary; no
    /// numeric validation happens here.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mib::oid;

    #[test]
    fn starts_unset_then_stays_set() {
        let mut scalar = MoScalar::new(Oid::new(oid::APT_STORAGE), Access::ReadWrite);
        assert!(!scalar.is_set());
        assert_eq!(scalar.value(), None);

        scalar.set("10");
        assert_eq!(scalar.value(), Some("10"));

        scalar.set("0");
        assert!(scalar.is_set());
        assert_eq!(scalar.value(), Some("0"));
    }

    #[test]
    fn keeps_address_and_access() {
        let scalar = MoScalar::new(Oid::new(oid::APT_DEVICE_ID), Access::ReadOnly);
        assert_eq!(scalar.oid(), &Oid::new(oid::APT_DEVICE_ID));
        assert_eq!(scalar.access(), Access::ReadOnly);
    }
}
