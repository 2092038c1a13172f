//! Driver slots for one session

use super::archive::{DriverState, LapRecord};
use super::samples::LapSamples;

/// Grid size of the current game's packets
pub const MAX_CARS: usize = 22;

/// Fixed set of car slots, indexed by the game's car index
#[derive(Debug, Clone)]
pub struct DriverArena {
    slots: Vec<DriverState>,
}

impl Default for DriverArena {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverArena {
    pub fn new() -> Self {
        Self::with_capacity(MAX_CARS)
    }

    pub fn with_capacity(cars: usize) -> Self {
        Self { slots: (0..cars).map(DriverState::new).collect() }
    }

    /// Add empty slots until the grid holds at least `cars`
    pub fn grow_to(&mut self, cars: usize) {
        let start = self.slots.len();
        if cars > start {
            self.slots.extend((start..cars).map(DriverState::new));
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DriverState> {
        self.slots.get(index)
    }

    /// Slot for `index`; `None` beyond the grid
    pub fn get_mut(&mut self, index: usize) -> Option<&mut DriverState> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DriverState> {
        self.slots.iter()
    }

    /// Record a sample for `lap` of car `index`.
    ///
    /// Returns whether the sample was stored.
    pub fn record(&mut self, index: usize, lap: u8, distance: f32, elapsed_ms: u32) -> bool {
        self.slots
            .get_mut(index)
            .is_some_and(|driver| driver.record_sample(lap, distance, elapsed_ms))
    }

    /// Samples for `lap` of car `index`, if any were recorded
    pub fn samples_for(&self, index: usize, lap: u8) -> Option<&LapSamples> {
        self.get(index).and_then(|driver| driver.lap(lap)).map(|record| &record.samples)
    }

    /// Fastest best lap across the grid; the lower car index wins a tie
    pub fn overall_best_lap(&self) -> Option<(usize, &LapRecord)> {
        self.slots
            .iter()
            .filter_map(|driver| driver.best_lap().map(|lap| (driver.index, lap)))
            .min_by_key(|(index, lap)| (lap.total_ms, *index))
    }

    /// Car currently classified at `position`
    pub fn at_position(&self, position: u8) -> Option<&DriverState> {
        if position == 0 {
            return None;
        }
        self.slots.iter().find(|driver| driver.car_position == position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_best(arena: &mut DriverArena, index: usize, total_ms: u32) {
        let driver = arena.get_mut(index).unwrap();
        driver.current_lap_number = 3;
        driver.laps.insert(2, LapRecord { total_ms, ..LapRecord::new(2) });
    }

    #[test]
    fn record_and_read_back() {
        let mut arena = DriverArena::new();
        assert!(arena.record(3, 1, 100.0, 10_000));
        assert!(arena.record(3, 1, 50.0, 5_000));
        assert!(!arena.record(3, 1, 75.0, 0));
        assert!(!arena.record(MAX_CARS, 1, 75.0, 100));

        let samples = arena.samples_for(3, 1).unwrap();
        let distances: Vec<f32> = samples.iter().map(|s| s.distance).collect();
        assert_eq!(distances, vec![50.0, 100.0]);
        assert!(arena.samples_for(3, 2).is_none());
        assert!(arena.samples_for(4, 1).is_none());
    }

    #[test]
    fn overall_best_picks_fastest() {
        let mut arena = DriverArena::new();
        with_best(&mut arena, 5, 91_000);
        with_best(&mut arena, 2, 92_000);
        with_best(&mut arena, 9, 90_500);

        let (index, lap) = arena.overall_best_lap().unwrap();
        assert_eq!(index, 9);
        assert_eq!(lap.total_ms, 90_500);
    }

    #[test]
    fn overall_best_tie_goes_to_lower_index() {
        let mut arena = DriverArena::new();
        with_best(&mut arena, 7, 90_000);
        with_best(&mut arena, 4, 90_000);
        assert_eq!(arena.overall_best_lap().map(|(i, _)| i), Some(4));
    }

    #[test]
    fn empty_grid_has_no_best() {
        assert!(DriverArena::new().overall_best_lap().is_none());
    }

    #[test]
    fn growing_keeps_existing_slots() {
        let mut arena = DriverArena::new();
        assert!(arena.record(1, 1, 10.0, 100));
        arena.grow_to(24);
        assert_eq!(arena.len(), 24);
        assert_eq!(arena.get(23).map(|d| d.index), Some(23));
        assert!(arena.samples_for(1, 1).is_some());

        arena.grow_to(4);
        assert_eq!(arena.len(), 24);
    }

    #[test]
    fn position_lookup() {
        let mut arena = DriverArena::new();
        arena.get_mut(6).unwrap().car_position = 1;
        arena.get_mut(2).unwrap().car_position = 2;
        assert_eq!(arena.at_position(2).map(|d| d.index), Some(2));
        assert!(arena.at_position(0).is_none());
        assert!(arena.at_position(3).is_none());
    }
}
