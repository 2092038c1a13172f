//! Reference lap selection and delta computation.
//!
//! [`RivalSelector`] picks up to four reference laps, [`DeltaEngine`]
//! compares the local driver against each and produces a [`DeltaSnapshot`].

mod delta;
mod selector;
mod snapshot;

pub use delta::{DeltaEngine, sector_diffs, signed_diff};
pub use selector::{DeltaTarget, RivalSelector};
pub use snapshot::{
    DeltaSnapshot, FuelStatus, NeighbourLap, SessionConditions, TargetDelta, TargetKind,
    TyreStatus,
};
