//! Shared builders for integration tests.

use std::sync::Arc;

use parking_lot::Mutex;

use ems_agent::config::AgentConfig;
use ems_agent::model::{Apartment, Flat, SharedApartment};

/// Builds the baseline-bootstrapped apartment used across integration
/// tests: 62TerenureEast with five identical flats.
pub fn baseline_apartment() -> Apartment {
    AgentConfig::baseline()
        .build_apartment()
        .expect("baseline config must build")
}

/// Wraps an apartment in the shared lock handle.
#[allow(dead_code)]
pub fn shared(apartment: Apartment) -> SharedApartment {
    Arc::new(Mutex::new(apartment))
}

/// Builds a complete flat with the given device id and readings.
#[allow(dead_code)]
pub fn flat(device_id: &str, consumption: i64, heating: i64, lighting: i64, misc: i64) -> Flat {
    let mut flat = Flat::new();
    flat.set_device_id(device_id);
    flat.set_consumption(consumption.to_string());
    flat.set_consumption_heating_cooling(heating.to_string());
    flat.set_consumption_lighting(lighting.to_string());
    flat.set_consumption_misc(misc.to_string());
    flat
}
