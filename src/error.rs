//! Core error taxonomy.
//!
//! Only completeness violations and registry failures surface as errors.
//! Numeric parse failures and duplicate flat insertions are recoverable by
//! policy: they are logged and the operation continues.

use thiserror::Error;

use crate::mib::Oid;
use crate::registry::RegistryError;

/// Errors raised by the apartment model and its registration path.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A flat failed its completeness check before table admission.
    #[error("flat is missing one or more required readings and cannot be added")]
    IncompleteFlat,

    /// A scalar was still uninitialised when registration was attempted.
    #[error("scalar \"{0}\" has no value; apartment is not fully initialised")]
    UnsetScalar(&'static str),

    /// An identifier-addressed operation named no scalar of this apartment.
    #[error("identifier {0} does not address an apartment scalar")]
    UnknownOid(Oid),

    /// The external registry rejected an (un)registration. Fatal at startup.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}
