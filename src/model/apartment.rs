//! The apartment aggregate: six managed scalars plus the flat table,
//! registered against the external registry as one unit.

use tracing::{info, warn};

use crate::error::ModelError;
use crate::mib::{Access, MoScalar, MoTable, Oid, oid};
use crate::registry::{MoRegistry, RegistrationUnit};

use super::flat::Flat;

/// Parses a string-encoded scalar as an integer, logging and substituting
/// zero when the value is missing or malformed. Recoverable by policy: the
/// computation continues, nothing is persisted back.
pub(crate) fn parse_or_zero(name: &str, value: Option<&str>) -> i64 {
    match value {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(scalar = name, value = raw, "scalar is not an integer, using 0");
            0
        }),
        None => {
            warn!(scalar = name, "scalar is unset, using 0");
            0
        }
    }
}

/// A managed apartment aggregating several flats.
///
/// Owns exactly six scalar attributes (device id read-only, the rest
/// read-write) and the ordered flat collection. Nothing else holds a
/// mutable reference to them; collaborators go through the setters and
/// accessors here, under the [`SharedApartment`](super::SharedApartment)
/// lock.
#[derive(Debug, Clone)]
pub struct Apartment {
    device_id: MoScalar,
    consumption: MoScalar,
    storage: MoScalar,
    generation: MoScalar,
    generation_by_solar: MoScalar,
    generation_by_hydro: MoScalar,
    flats: Vec<Flat>,
}

impl Default for Apartment {
    fn default() -> Self {
        Self::new()
    }
}

impl Apartment {
    /// Creates an apartment with all scalars uninitialised.
    pub fn new() -> Self {
        Self {
            device_id: MoScalar::new(Oid::new(oid::APT_DEVICE_ID), Access::ReadOnly),
            consumption: MoScalar::new(Oid::new(oid::APT_CONSUMPTION), Access::ReadWrite),
            storage: MoScalar::new(Oid::new(oid::APT_STORAGE), Access::ReadWrite),
            generation: MoScalar::new(Oid::new(oid::APT_GENERATION), Access::ReadWrite),
            generation_by_solar: MoScalar::new(
                Oid::new(oid::APT_GENERATION_BY_SOLAR),
                Access::ReadWrite,
            ),
            generation_by_hydro: MoScalar::new(
                Oid::new(oid::APT_GENERATION_BY_HYDRO),
                Access::ReadWrite,
            ),
            flats: Vec::new(),
        }
    }

    /// Sets the apartment device id.
    pub fn set_device_id(&mut self, value: impl Into<String>) {
        self.device_id.set(value);
    }

    /// Sets total energy consumption (demand).
    pub fn set_consumption(&mut self, value: impl Into<String>) {
        self.consumption.set(value);
    }

    /// Sets current energy storage usage.
    pub fn set_storage(&mut self, value: impl Into<String>) {
        self.storage.set(value);
    }

    /// Sets total energy generation. Normally derived; see
    /// [`Apartment::recompute_total_generation`].
    pub fn set_generation(&mut self, value: impl Into<String>) {
        self.generation.set(value);
    }

    /// Sets energy generation by solar.
    pub fn set_generation_by_solar(&mut self, value: impl Into<String>) {
        self.generation_by_solar.set(value);
    }

    /// Sets energy generation by hydro.
    pub fn set_generation_by_hydro(&mut self, value: impl Into<String>) {
        self.generation_by_hydro.set(value);
    }

    /// Returns the apartment device id, if initialised.
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.value()
    }

    /// Returns total energy consumption, if initialised.
    pub fn consumption(&self) -> Option<&str> {
        self.consumption.value()
    }

    /// Returns current energy storage usage, if initialised.
    pub fn storage(&self) -> Option<&str> {
        self.storage.value()
    }

    /// Returns total energy generation as of the last recompute.
    pub fn generation(&self) -> Option<&str> {
        self.generation.value()
    }

    /// Returns energy generation by solar, if initialised.
    pub fn generation_by_solar(&self) -> Option<&str> {
        self.generation_by_solar.value()
    }

    /// Returns energy generation by hydro, if initialised.
    pub fn generation_by_hydro(&self) -> Option<&str> {
        self.generation_by_hydro.value()
    }

    fn named_scalars(&self) -> [(&'static str, &MoScalar); 6] {
        [
            ("device_id", &self.device_id),
            ("consumption", &self.consumption),
            ("storage", &self.storage),
            ("generation", &self.generation),
            ("generation_by_solar", &self.generation_by_solar),
            ("generation_by_hydro", &self.generation_by_hydro),
        ]
    }

    fn scalar(&self, oid: &Oid) -> Option<(&'static str, &MoScalar)> {
        self.named_scalars()
            .into_iter()
            .find(|(_, scalar)| scalar.oid() == oid)
    }

    fn scalar_mut(&mut self, oid: &Oid) -> Option<&mut MoScalar> {
        [
            &mut self.device_id,
            &mut self.consumption,
            &mut self.storage,
            &mut self.generation,
            &mut self.generation_by_solar,
            &mut self.generation_by_hydro,
        ]
        .into_iter()
        .find(|scalar| scalar.oid() == oid)
    }

    /// Identifier-addressed read, the surface served to the wire transport.
    ///
    /// # Errors
    ///
    /// Fails with [`ModelError::UnknownOid`] for identifiers outside the
    /// apartment scalar set and [`ModelError::UnsetScalar`] before first
    /// initialisation.
    pub fn scalar_value(&self, oid: &Oid) -> Result<&str, ModelError> {
        let (name, scalar) = self
            .scalar(oid)
            .ok_or_else(|| ModelError::UnknownOid(oid.clone()))?;
        scalar.value().ok_or(ModelError::UnsetScalar(name))
    }

    /// Identifier-addressed write.
    ///
    /// Access modes are enforced by the transport layer, not re-checked
    /// here.
    ///
    /// # Errors
    ///
    /// Fails with [`ModelError::UnknownOid`] for identifiers outside the
    /// apartment scalar set.
    pub fn write_scalar(&mut self, oid: &Oid, value: impl Into<String>) -> Result<(), ModelError> {
        let scalar = self
            .scalar_mut(oid)
            .ok_or_else(|| ModelError::UnknownOid(oid.clone()))?;
        scalar.set(value);
        Ok(())
    }

    /// Admits a flat into the apartment.
    ///
    /// Duplicate device ids are a logged no-op: the flat list and table row
    /// count stay unchanged and the call still succeeds.
    ///
    /// # Errors
    ///
    /// Fails with [`ModelError::IncompleteFlat`] when any of the five
    /// readings is unset.
    pub fn add_flat(&mut self, flat: Flat) -> Result<(), ModelError> {
        if !flat.is_valid() {
            return Err(ModelError::IncompleteFlat);
        }
        let device_id = flat.device_id().unwrap_or_default();
        if self
            .flats
            .iter()
            .any(|existing| existing.device_id() == flat.device_id())
        {
            info!(
                flat = device_id,
                apartment = self.device_id().unwrap_or("<unset>"),
                "flat already added, skipping"
            );
            return Ok(());
        }
        self.flats.push(flat);
        Ok(())
    }

    /// Returns the flats in insertion order.
    pub fn flats(&self) -> &[Flat] {
        &self.flats
    }

    /// Returns the flat table contents as ordered rows of string cells.
    pub fn flat_rows(&self) -> Vec<Vec<String>> {
        self.flats.iter().map(Flat::row).collect()
    }

    /// Builds the five-column flat table value from the current flats.
    pub fn flats_table(&self) -> MoTable {
        let mut table = MoTable::new(
            Oid::new(oid::FLAT_TABLE_BASE),
            vec![
                Access::ReadOnly,  // flat device id
                Access::ReadWrite, // consumption
                Access::ReadWrite, // consumption by heating and cooling
                Access::ReadWrite, // consumption by lighting
                Access::ReadWrite, // consumption by misc
            ],
        );
        for flat in &self.flats {
            table.push_row(flat.row());
        }
        table
    }

    /// Recomputes total generation as solar + hydro + storage.
    ///
    /// Pure function of the current scalar state; called from
    /// [`Apartment::register`] rather than on every write, so the total can
    /// be transiently stale between a source write and the next
    /// registration.
    pub fn recompute_total_generation(&mut self) {
        let solar = parse_or_zero("generation_by_solar", self.generation_by_solar.value());
        let hydro = parse_or_zero("generation_by_hydro", self.generation_by_hydro.value());
        let storage = parse_or_zero("storage", self.storage.value());
        self.generation.set((solar + hydro + storage).to_string());
    }

    /// Builds the registration unit snapshot for the external registry.
    ///
    /// # Errors
    ///
    /// Fails with [`ModelError::UnsetScalar`] naming the first scalar that
    /// is still uninitialised.
    pub fn registration_unit(&self) -> Result<RegistrationUnit, ModelError> {
        let scalars = self.named_scalars();
        for (name, scalar) in scalars {
            if !scalar.is_set() {
                return Err(ModelError::UnsetScalar(name));
            }
        }
        Ok(RegistrationUnit {
            scalars: scalars.map(|(_, scalar)| scalar.clone()).to_vec(),
            table: self.flats_table(),
        })
    }

    /// Exposes the apartment to the external registry as one unit.
    ///
    /// Recomputes total generation, validates completeness, then performs
    /// an unregister-all/register-all replace. The replace is atomic from
    /// the caller's perspective but not across a crash between the two
    /// steps; registration happens once at startup, which makes that
    /// acceptable.
    ///
    /// # Errors
    ///
    /// Fails with [`ModelError::UnsetScalar`] when the apartment is not
    /// fully initialised, or propagates the registry's own error.
    pub fn register(&mut self, registry: &mut impl MoRegistry) -> Result<(), ModelError> {
        self.recompute_total_generation();
        let unit = self.registration_unit()?;
        registry.unregister_unit(&unit)?;
        registry.register_unit(&unit)?;
        info!(
            apartment = self.device_id().unwrap_or("<unset>"),
            flats = self.flats.len(),
            "registered apartment managed objects"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MemoryRegistry;

    fn complete_flat(id: &str) -> Flat {
        let mut flat = Flat::new();
        flat.set_device_id(id);
        flat.set_consumption("30");
        flat.set_consumption_heating_cooling("15");
        flat.set_consumption_lighting("5");
        flat.set_consumption_misc("10");
        flat
    }

    fn bootstrapped_apartment() -> Apartment {
        let mut apartment = Apartment::new();
        apartment.set_device_id("62TerenureEast");
        apartment.set_consumption("150");
        apartment.set_storage("10");
        apartment.set_generation_by_hydro("120");
        apartment.set_generation_by_solar("20");
        apartment
    }

    #[test]
    fn rejects_incomplete_flat() {
        let mut apartment = bootstrapped_apartment();
        let mut flat = Flat::new();
        flat.set_device_id("FlatNo_1");

        assert!(matches!(
            apartment.add_flat(flat),
            Err(ModelError::IncompleteFlat)
        ));
        assert!(apartment.flats().is_empty());
        assert_eq!(apartment.flats_table().row_count(), 0);
    }

    #[test]
    fn duplicate_flat_is_a_no_op() {
        let mut apartment = bootstrapped_apartment();
        apartment.add_flat(complete_flat("FlatNo_1")).expect("first add");
        apartment
            .add_flat(complete_flat("FlatNo_1"))
            .expect("duplicate add succeeds without effect");

        assert_eq!(apartment.flats().len(), 1);
        assert_eq!(apartment.flats_table().row_count(), 1);
    }

    #[test]
    fn recompute_sums_sources_and_storage() {
        let mut apartment = bootstrapped_apartment();
        apartment.recompute_total_generation();
        assert_eq!(apartment.generation(), Some("150"));
    }

    #[test]
    fn recompute_substitutes_zero_for_bad_values() {
        let mut apartment = bootstrapped_apartment();
        apartment.set_generation_by_hydro("not-a-number");
        apartment.recompute_total_generation();
        // solar 20 + hydro 0 + storage 10
        assert_eq!(apartment.generation(), Some("30"));
    }

    #[test]
    fn register_fails_before_full_initialisation() {
        let mut apartment = Apartment::new();
        apartment.set_device_id("62TerenureEast");
        let mut registry = MemoryRegistry::new();

        let err = apartment.register(&mut registry).expect_err("must fail");
        assert!(matches!(err, ModelError::UnsetScalar(_)));
        assert_eq!(registry.registered_len(), 0);
    }

    #[test]
    fn register_exposes_scalars_and_table() {
        let mut apartment = bootstrapped_apartment();
        apartment.add_flat(complete_flat("FlatNo_1")).expect("add");
        apartment.add_flat(complete_flat("FlatNo_2")).expect("add");

        let mut registry = MemoryRegistry::new();
        apartment.register(&mut registry).expect("register");

        // six scalars plus the table
        assert_eq!(registry.registered_len(), 7);
        assert_eq!(
            registry.get(&Oid::new(oid::APT_GENERATION)).expect("get"),
            "150"
        );
        let rows = registry
            .scan_table(&Oid::new(oid::FLAT_TABLE_BASE))
            .expect("scan");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn addressed_write_reaches_the_scalar() {
        let mut apartment = bootstrapped_apartment();
        apartment
            .write_scalar(&Oid::new(oid::APT_GENERATION_BY_SOLAR), "40")
            .expect("write");
        assert_eq!(apartment.generation_by_solar(), Some("40"));

        let unknown = Oid::new(&[1, 3, 6, 1, 2, 1, 9, 9, 9]);
        assert!(matches!(
            apartment.write_scalar(&unknown, "1"),
            Err(ModelError::UnknownOid(_))
        ));
    }

    #[test]
    fn addressed_read_fails_when_unset() {
        let apartment = Apartment::new();
        assert!(matches!(
            apartment.scalar_value(&Oid::new(oid::APT_STORAGE)),
            Err(ModelError::UnsetScalar(_))
        ));
    }
}
