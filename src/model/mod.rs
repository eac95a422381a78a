//! Domain model: the apartment aggregate and its flat telemetry rows.

/// The apartment aggregate owning all scalars and flat rows.
pub mod apartment;
/// One dwelling unit's telemetry record.
pub mod flat;

use std::sync::Arc;

use parking_lot::Mutex;

pub use apartment::Apartment;
pub use flat::Flat;

/// Shared handle to one apartment instance.
///
/// Every read-modify-write sequence (a registration cycle, a rebalancing
/// invocation, one external write) must hold the lock for the whole
/// operation; partial interleavings would corrupt the generation balance.
pub type SharedApartment = Arc<Mutex<Apartment>>;
