//! Distance to elapsed-time samples for a single lap

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Lap distance in meters, totally ordered so it can key a map
#[derive(Debug, Clone, Copy)]
pub struct Distance(f32);

impl Distance {
    /// Accept finite, non-negative distances only
    pub fn new(meters: f32) -> Option<Self> {
        // `+ 0.0` folds -0.0 into 0.0 so both key the same sample
        (meters.is_finite() && meters >= 0.0).then_some(Distance(meters + 0.0))
    }

    pub fn meters(self) -> f32 {
        self.0
    }
}

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Distance {}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A single observation: at `distance` meters into the lap, `elapsed_ms` had passed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub distance: f32,
    pub elapsed_ms: u32,
}

/// Ordered samples for one lap, unique per distance
#[derive(Debug, Clone, Default)]
pub struct LapSamples {
    points: BTreeMap<Distance, u32>,
}

impl LapSamples {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the sample at `distance`.
    ///
    /// Returns `false` when the sample was dropped: the lap timer had not
    /// started (`elapsed_ms == 0`) or the distance is negative or not finite.
    pub fn record(&mut self, distance: f32, elapsed_ms: u32) -> bool {
        if elapsed_ms == 0 {
            return false;
        }
        match Distance::new(distance) {
            Some(key) => {
                self.points.insert(key, elapsed_ms);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Samples in ascending distance
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Sample> + '_ {
        self.points.iter().map(|(d, &ms)| Sample { distance: d.meters(), elapsed_ms: ms })
    }

    pub fn first(&self) -> Option<Sample> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<Sample> {
        self.iter().next_back()
    }

    /// Sample with the greatest distance not beyond `distance`
    pub fn at_or_before(&self, distance: Distance) -> Option<Sample> {
        self.points
            .range(..=distance)
            .next_back()
            .map(|(d, &ms)| Sample { distance: d.meters(), elapsed_ms: ms })
    }

    /// First sample strictly beyond `distance`
    pub fn after(&self, distance: Distance) -> Option<Sample> {
        self.points
            .range((Bound::Excluded(distance), Bound::Unbounded))
            .next()
            .map(|(d, &ms)| Sample { distance: d.meters(), elapsed_ms: ms })
    }
}

impl FromIterator<(f32, u32)> for LapSamples {
    fn from_iter<I: IntoIterator<Item = (f32, u32)>>(iter: I) -> Self {
        let mut samples = LapSamples::new();
        for (distance, elapsed_ms) in iter {
            samples.record(distance, elapsed_ms);
        }
        samples
    }
}
