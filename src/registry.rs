//! Registration capability consumed by the apartment aggregate, plus an
//! in-memory registry standing in for the external agent runtime.
//!
//! The aggregate only ever sees the narrow [`MoRegistry`] trait; the live
//! transport binds its own implementation, tests and the demo binary use
//! [`MemoryRegistry`].

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::mib::{Access, MoScalar, MoTable, Oid};

/// The atomic bundle of scalars and table exposed to the registry as one
/// transactional replace.
#[derive(Debug, Clone)]
pub struct RegistrationUnit {
    /// The apartment scalars, fully initialised.
    pub scalars: Vec<MoScalar>,
    /// The flat telemetry table.
    pub table: MoTable,
}

/// Error from the external registry surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The identifier addresses nothing currently registered.
    #[error("no managed object registered at {0}")]
    NotRegistered(Oid),

    /// A manager-side write hit a read-only managed object.
    #[error("managed object at {0} is read-only")]
    NotWritable(Oid),
}

/// Narrow registration capability injected into the apartment aggregate.
///
/// Both operations must be idempotent: registering an already-present unit
/// replaces it, unregistering an absent one is not an error.
pub trait MoRegistry {
    /// Registers (or replaces) every scalar and the table of `unit`.
    fn register_unit(&mut self, unit: &RegistrationUnit) -> Result<(), RegistryError>;

    /// Removes every scalar and the table of `unit`; absence is ignored.
    fn unregister_unit(&mut self, unit: &RegistrationUnit) -> Result<(), RegistryError>;
}

#[derive(Debug, Clone)]
struct ScalarSlot {
    access: Access,
    value: String,
}

/// In-memory managed-object registry.
///
/// Holds the manager-visible projection of the last registration. The
/// read/write methods model the get/set/table-scan surface the wire
/// transport would serve; access modes are enforced here, on the
/// transport side, not inside the aggregate.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    scalars: BTreeMap<Oid, ScalarSlot>,
    tables: BTreeMap<Oid, MoTable>,
}

impl MemoryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value registered at `oid`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] when nothing lives at `oid`.
    pub fn get(&self, oid: &Oid) -> Result<&str, RegistryError> {
        self.scalars
            .get(oid)
            .map(|slot| slot.value.as_str())
            .ok_or_else(|| RegistryError::NotRegistered(oid.clone()))
    }

    /// Overwrites the value registered at `oid`, enforcing the access mode.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] for unknown identifiers and
    /// [`RegistryError::NotWritable`] for read-only ones.
    pub fn set(&mut self, oid: &Oid, value: impl Into<String>) -> Result<(), RegistryError> {
        let slot = self
            .scalars
            .get_mut(oid)
            .ok_or_else(|| RegistryError::NotRegistered(oid.clone()))?;
        if slot.access == Access::ReadOnly {
            return Err(RegistryError::NotWritable(oid.clone()));
        }
        slot.value = value.into();
        Ok(())
    }

    /// Returns the rows of the table registered under `base`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] when no table lives there.
    pub fn scan_table(&self, base: &Oid) -> Result<Vec<Vec<String>>, RegistryError> {
        self.tables
            .get(base)
            .map(|table| table.rows().to_vec())
            .ok_or_else(|| RegistryError::NotRegistered(base.clone()))
    }

    /// Total number of registered objects (scalars plus tables).
    pub fn registered_len(&self) -> usize {
        self.scalars.len() + self.tables.len()
    }

    /// Returns `true` when a scalar is registered at `oid`.
    pub fn contains_scalar(&self, oid: &Oid) -> bool {
        self.scalars.contains_key(oid)
    }
}

impl MoRegistry for MemoryRegistry {
    fn register_unit(&mut self, unit: &RegistrationUnit) -> Result<(), RegistryError> {
        for scalar in &unit.scalars {
            // Registration requires initialised scalars; the aggregate
            // checks completeness before handing the unit over.
            let value = scalar.value().unwrap_or_default().to_string();
            self.scalars.insert(
                scalar.oid().clone(),
                ScalarSlot {
                    access: scalar.access(),
                    value,
                },
            );
        }
        self.tables
            .insert(unit.table.base().clone(), unit.table.clone());
        debug!(
            scalars = unit.scalars.len(),
            rows = unit.table.row_count(),
            "registered managed-object unit"
        );
        Ok(())
    }

    fn unregister_unit(&mut self, unit: &RegistrationUnit) -> Result<(), RegistryError> {
        for scalar in &unit.scalars {
            self.scalars.remove(scalar.oid());
        }
        self.tables.remove(unit.table.base());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mib::oid;

    fn sample_unit() -> RegistrationUnit {
        let mut device = MoScalar::new(Oid::new(oid::APT_DEVICE_ID), Access::ReadOnly);
        device.set("62TerenureEast");
        let mut storage = MoScalar::new(Oid::new(oid::APT_STORAGE), Access::ReadWrite);
        storage.set("10");

        let mut table = MoTable::new(
            Oid::new(oid::FLAT_TABLE_BASE),
            vec![Access::ReadOnly, Access::ReadWrite],
        );
        table.push_row(vec!["FlatNo_1".into(), "30".into()]);

        RegistrationUnit {
            scalars: vec![device, storage],
            table,
        }
    }

    #[test]
    fn register_then_read_back() {
        let mut registry = MemoryRegistry::new();
        registry.register_unit(&sample_unit()).expect("register");

        assert_eq!(registry.registered_len(), 3);
        assert_eq!(
            registry.get(&Oid::new(oid::APT_DEVICE_ID)).expect("get"),
            "62TerenureEast"
        );
        let rows = registry
            .scan_table(&Oid::new(oid::FLAT_TABLE_BASE))
            .expect("scan");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "FlatNo_1");
    }

    #[test]
    fn unregister_is_idempotent_on_absence() {
        let mut registry = MemoryRegistry::new();
        let unit = sample_unit();
        registry.unregister_unit(&unit).expect("first unregister");
        registry.register_unit(&unit).expect("register");
        registry.unregister_unit(&unit).expect("unregister");
        registry.unregister_unit(&unit).expect("second unregister");
        assert_eq!(registry.registered_len(), 0);
    }

    #[test]
    fn write_respects_access_mode() {
        let mut registry = MemoryRegistry::new();
        registry.register_unit(&sample_unit()).expect("register");

        registry
            .set(&Oid::new(oid::APT_STORAGE), "0")
            .expect("read-write scalar accepts writes");
        assert_eq!(registry.get(&Oid::new(oid::APT_STORAGE)).expect("get"), "0");

        let err = registry
            .set(&Oid::new(oid::APT_DEVICE_ID), "intruder")
            .expect_err("read-only scalar rejects writes");
        assert_eq!(err, RegistryError::NotWritable(Oid::new(oid::APT_DEVICE_ID)));
    }

    #[test]
    fn unknown_identifier_reports_not_registered() {
        let registry = MemoryRegistry::new();
        let err = registry
            .get(&Oid::new(oid::APT_GENERATION))
            .expect_err("must fail");
        assert_eq!(err, RegistryError::NotRegistered(Oid::new(oid::APT_GENERATION)));
    }
}
