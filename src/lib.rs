//! Energy-management agent core for a managed apartment building.
//!
//! Models one apartment aggregating several flats as a hierarchy of
//! managed objects, registers them as one unit against an injected
//! registry, and rebalances hydro generation and storage whenever an
//! external notification reports a solar-generation change. The wire
//! protocol itself is an external collaborator; this crate exposes the
//! get/set/table-scan surface it calls.

/// TOML agent configuration and presets.
pub mod config;
pub mod error;
/// Managed-object information base: identifiers, scalars, tables.
pub mod mib;
/// The apartment aggregate and its flat telemetry rows.
pub mod model;
/// Notification bridge from attribute-change events to rebalancing.
pub mod notify;
pub mod rebalance;
/// Registration capability and the in-memory registry.
pub mod registry;
pub mod report;
pub mod telemetry;
