//! Choosing the reference laps to compare the local driver against

use super::snapshot::TargetKind;
use crate::telemetry::{DriverArena, DriverState, LapRecord};

/// A reference lap chosen for comparison
#[derive(Debug, Clone, Copy)]
pub struct DeltaTarget<'a> {
    pub kind: TargetKind,
    pub car_index: usize,
    pub source_lap: &'a LapRecord,
}

/// Picks reference laps from the session's drivers
pub struct RivalSelector<'a> {
    drivers: &'a DriverArena,
}

impl<'a> RivalSelector<'a> {
    pub fn new(drivers: &'a DriverArena) -> Self {
        Self { drivers }
    }

    /// Every available target, in [`TargetKind::ALL`] order.
    ///
    /// A target whose lap has no samples yet is left out.
    pub fn targets(&self, local: &'a DriverState) -> Vec<DeltaTarget<'a>> {
        TargetKind::ALL
            .into_iter()
            .filter_map(|kind| self.select(kind, local))
            .filter(|target| target.source_lap.has_samples())
            .collect()
    }

    fn select(&self, kind: TargetKind, local: &'a DriverState) -> Option<DeltaTarget<'a>> {
        let (car_index, source_lap) = match kind {
            TargetKind::PreviousLap => {
                (local.index, local.previous_lap(local.current_lap_number)?)
            }
            TargetKind::PersonalBest => (local.index, local.best_lap()?),
            TargetKind::OverallBest => self.drivers.overall_best_lap()?,
            TargetKind::NearestTyre => {
                let rival = self.nearest_tyre(local)?;
                (rival.index, rival.best_lap()?)
            }
        };
        Some(DeltaTarget { kind, car_index, source_lap })
    }

    /// Another driver on the local driver's compound with the closest wear.
    /// The lower car index wins a tie.
    pub fn nearest_tyre(&self, local: &DriverState) -> Option<&'a DriverState> {
        let local_tyres = local.tyres?;

        self.drivers
            .iter()
            .filter(|driver| driver.index != local.index)
            .filter_map(|driver| {
                let tyres = driver.tyres?;
                (tyres.compound == local_tyres.compound)
                    .then(|| ((tyres.wear_pct - local_tyres.wear_pct).abs(), driver))
            })
            .min_by(|(a, a_driver), (b, b_driver)| {
                a.total_cmp(b).then(a_driver.index.cmp(&b_driver.index))
            })
            .map(|(_, driver)| driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::FittedTyres;

    const SOFT: u8 = 16;
    const MEDIUM: u8 = 17;

    fn fit(arena: &mut DriverArena, index: usize, compound: u8, wear_pct: f32) {
        arena.get_mut(index).unwrap().tyres = Some(FittedTyres { compound, wear_pct, life_span: 20 });
    }

    fn completed_lap(arena: &mut DriverArena, index: usize, lap: u8, total_ms: u32) {
        let driver = arena.get_mut(index).unwrap();
        driver.current_lap_number = driver.current_lap_number.max(lap + 1);
        let mut record = LapRecord { total_ms, ..LapRecord::new(lap) };
        record.samples.record(100.0, 10_000);
        driver.laps.insert(lap, record);
    }

    #[test]
    fn nearest_tyre_prefers_same_compound_closest_wear() {
        let mut arena = DriverArena::new();
        fit(&mut arena, 0, SOFT, 40.0);
        fit(&mut arena, 1, SOFT, 42.0);
        fit(&mut arena, 2, MEDIUM, 60.0);
        fit(&mut arena, 3, SOFT, 55.0);

        let selector = RivalSelector::new(&arena);
        let local = arena.get(0).unwrap();
        assert_eq!(selector.nearest_tyre(local).map(|d| d.index), Some(1));
    }

    #[test]
    fn nearest_tyre_tie_goes_to_lower_index() {
        let mut arena = DriverArena::new();
        fit(&mut arena, 5, SOFT, 30.0);
        fit(&mut arena, 8, SOFT, 32.0);
        fit(&mut arena, 3, SOFT, 28.0);

        let selector = RivalSelector::new(&arena);
        assert_eq!(selector.nearest_tyre(arena.get(5).unwrap()).map(|d| d.index), Some(3));
    }

    #[test]
    fn nearest_tyre_absent_without_shared_compound() {
        let mut arena = DriverArena::new();
        fit(&mut arena, 0, SOFT, 10.0);
        fit(&mut arena, 1, MEDIUM, 10.0);

        let selector = RivalSelector::new(&arena);
        assert!(selector.nearest_tyre(arena.get(0).unwrap()).is_none());
        // Local tyres unknown
        assert!(selector.nearest_tyre(arena.get(2).unwrap()).is_none());
    }

    #[test]
    fn all_four_targets_when_data_exists() {
        let mut arena = DriverArena::new();
        completed_lap(&mut arena, 0, 1, 92_000);
        completed_lap(&mut arena, 0, 2, 93_000);
        completed_lap(&mut arena, 1, 1, 90_000);
        completed_lap(&mut arena, 1, 2, 91_500);
        fit(&mut arena, 0, SOFT, 20.0);
        fit(&mut arena, 1, SOFT, 22.0);

        let selector = RivalSelector::new(&arena);
        let targets = selector.targets(arena.get(0).unwrap());
        let summary: Vec<(TargetKind, usize, u8)> =
            targets.iter().map(|t| (t.kind, t.car_index, t.source_lap.lap_number)).collect();

        assert_eq!(
            summary,
            vec![
                (TargetKind::PreviousLap, 0, 2),
                (TargetKind::PersonalBest, 0, 1),
                (TargetKind::OverallBest, 1, 1),
                (TargetKind::NearestTyre, 1, 1),
            ]
        );
    }

    #[test]
    fn laps_without_samples_are_not_targets() {
        let mut arena = DriverArena::new();
        completed_lap(&mut arena, 0, 1, 92_000);
        arena.get_mut(0).unwrap().laps.get_mut(&1).unwrap().samples.clear();

        let selector = RivalSelector::new(&arena);
        assert!(selector.targets(arena.get(0).unwrap()).is_empty());
    }

    #[test]
    fn first_lap_has_nothing_to_compare() {
        let mut arena = DriverArena::new();
        let driver = arena.get_mut(0).unwrap();
        driver.current_lap_number = 1;
        driver.laps.insert(1, LapRecord::new(1));

        let selector = RivalSelector::new(&arena);
        assert!(selector.targets(arena.get(0).unwrap()).is_empty());
    }
}
