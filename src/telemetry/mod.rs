//! Lap telemetry storage and elapsed-time prediction.
//!
//! - [`LapSamples`] holds the distance → elapsed-time samples of one lap
//! - [`predict`] estimates the elapsed time of a lap at any distance
//! - [`DriverState`] owns a car's lap records and answers best/previous lap
//! - [`DriverArena`] is the fixed grid of car slots for a session

mod arena;
mod archive;
mod interpolate;
mod samples;

pub use arena::{DriverArena, MAX_CARS};
pub use archive::{DriverState, FittedTyres, LapRecord};
pub use interpolate::predict;
pub use samples::{Distance, LapSamples, Sample};
