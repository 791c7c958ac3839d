use crate::Vector;
use crate::discretization::observation::{Observation, ObservationSet};

/// Result of discretizing one observation set.
///
/// `intervals` are ordered along the value axis; adjacent intervals share a
/// boundary, and the outermost `min`/`max` are left unset.
#[derive(Clone, Debug)]
pub struct Discretization {
    pub intervals: Vec<ObservationSet>,
    /// Final cluster means, in interval order.
    pub centroids: Vector,
    pub n_iter: usize,
    /// Within-interval sum of squared deviations from the interval means.
    pub inertia: f64,
}

impl Discretization {
    pub fn n_intervals(&self) -> usize {
        self.intervals.len()
    }

    /// The `k - 1` internal cut points, ascending.
    pub fn boundaries(&self) -> Vector {
        self.intervals.iter().filter_map(|s| s.max()).collect()
    }

    /// Index of the interval whose `[min, max)` holds `value`. A value equal
    /// to a boundary belongs to the interval on its right. `None` for NaN.
    pub fn interval_of(&self, value: f64) -> Option<usize> {
        self.intervals.iter().position(|s| s.contains(value))
    }

    /// All discretized observations, in interval order, each relabeled with
    /// the name of the interval holding it.
    pub fn relabel(&self) -> Vec<Observation> {
        self.intervals
            .iter()
            .flat_map(|interval| {
                interval
                    .observations()
                    .iter()
                    .map(move |o| Observation::new(o.value, interval.name()))
            })
            .collect()
    }

    pub fn into_intervals(self) -> Vec<ObservationSet> {
        self.intervals
    }
}
