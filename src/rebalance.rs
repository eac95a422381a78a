//! Rebalancing of hydro generation and storage after a solar change.
//!
//! Triggered exactly once per observed external write to the
//! solar-generation scalar. The decision is driven by the sign of the
//! surplus of all sources over the *previously computed* total generation;
//! the total is deliberately not recomputed from the new solar value first,
//! so one invocation balances against the prior balance point. Preserved
//! for behavioural compatibility with the deployed manager.

use tracing::{debug, info};

use crate::model::Apartment;
use crate::model::apartment::parse_or_zero;

/// Fixed storage usage re-established when generation runs short.
pub const STORAGE_BASELINE: i64 = 10;

/// Outcome of one rebalancing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebalanceAction {
    /// Balance is already exact, or the surplus falls inside the
    /// unhandled band (see [`decide`]); nothing is written.
    NoChange,
    /// Generation exceeds demand beyond what storage covers: storage is
    /// drained to zero and hydro reduced to the given value.
    DrainStorage {
        /// New hydro generation value.
        hydro: i64,
    },
    /// Generation falls short: storage is reset to
    /// [`STORAGE_BASELINE`] and hydro forced to make up the shortfall.
    TopUpFromBaseline {
        /// New hydro generation value.
        hydro: i64,
    },
}

/// Decides how to redistribute hydro and storage after a solar change.
///
/// `total` is the total generation from the last registration. Let
/// `surplus = (solar + hydro + storage) - total`:
///
/// - `surplus > 0` with `surplus - storage > 0` drains storage to zero and
///   takes the remainder out of hydro;
/// - `surplus > 0` with `surplus - storage <= 0` applies no change. This
///   band is a known gap in the deployed policy, kept as-is pending
///   product review;
/// - `surplus < 0` resets storage to the baseline and recomputes hydro as
///   `total - (baseline + solar)`;
/// - `surplus == 0` applies no change.
pub fn decide(solar: i64, hydro: i64, storage: i64, total: i64) -> RebalanceAction {
    let surplus = (solar + hydro + storage) - total;
    if surplus > 0 {
        let after_storage = surplus - storage;
        if after_storage > 0 {
            RebalanceAction::DrainStorage {
                hydro: hydro - after_storage,
            }
        } else {
            RebalanceAction::NoChange
        }
    } else if surplus < 0 {
        RebalanceAction::TopUpFromBaseline {
            hydro: total - (STORAGE_BASELINE + solar),
        }
    } else {
        RebalanceAction::NoChange
    }
}

/// Runs one rebalancing invocation against the apartment.
///
/// Reads solar, hydro, storage, and the previously computed total fresh
/// from the apartment, substituting zero for unparseable values for this
/// invocation only, then performs zero/one/two writes through the ordinary
/// scalar setters. Callers must hold the apartment lock for the whole
/// invocation.
pub fn apply(apartment: &mut Apartment) {
    let solar = parse_or_zero("generation_by_solar", apartment.generation_by_solar());
    let hydro = parse_or_zero("generation_by_hydro", apartment.generation_by_hydro());
    let storage = parse_or_zero("storage", apartment.storage());
    let total = parse_or_zero("generation", apartment.generation());

    match decide(solar, hydro, storage, total) {
        RebalanceAction::DrainStorage { hydro: new_hydro } => {
            info!(
                solar,
                hydro, storage, total, new_hydro, "surplus generation, draining storage"
            );
            apartment.set_storage("0");
            apartment.set_generation_by_hydro(new_hydro.to_string());
        }
        RebalanceAction::TopUpFromBaseline { hydro: new_hydro } => {
            info!(
                solar,
                hydro,
                storage,
                total,
                new_hydro,
                new_storage = STORAGE_BASELINE,
                "generation shortfall, topping up from baseline storage"
            );
            apartment.set_storage(STORAGE_BASELINE.to_string());
            apartment.set_generation_by_hydro(new_hydro.to_string());
        }
        RebalanceAction::NoChange => {
            debug!(solar, hydro, storage, total, "generation already in balance");
        }
    }
}
