//! Managed-object information base: identifiers, scalar attributes, and
//! dynamic tables exposed to the remote manager.

/// Hierarchical object identifiers and the fixed agent address space.
pub mod oid;
/// Single-valued managed attributes with access modes.
pub mod scalar;
/// Column schema and row storage for dynamic managed tables.
pub mod table;

// Re-export the main types for convenience
pub use oid::Oid;
pub use scalar::Access;
pub use scalar::MoScalar;
pub use table::MoTable;
