use crate::discretization::intervals::Discretization;
use crate::discretization::observation::ObservationSet;
use crate::error::DiscretizeError;
use crate::{Vector, metrics};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One-dimensional k-means discretizer.
///
/// Holds configuration only; every call to [`discretize`](Self::discretize)
/// is independent.
#[derive(Clone, Debug)]
pub struct KMeansDiscretizer {
    n_intervals: usize,
    max_iter: usize,
    tolerance: f64,
    random_state: Option<u64>,
}

impl KMeansDiscretizer {
    pub fn new(n_intervals: usize) -> Self {
        Self {
            n_intervals,
            max_iter: 300,
            tolerance: 0.0,
            random_state: None,
        }
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        if max_iter == 0 {
            panic!("max_iter must be > 0, got {}", max_iter);
        }
        self.max_iter = max_iter;
        self
    }

    /// Largest centroid movement still treated as converged. The default
    /// `0.0` demands bit-identical centroids between iterations; the value is
    /// absolute, so scale it to the data when loosening it.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        if !(tolerance >= 0.0) {
            panic!("tolerance must be non-negative, got {}", tolerance);
        }
        self.tolerance = tolerance;
        self
    }

    pub fn random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    pub fn n_intervals(&self) -> usize {
        self.n_intervals
    }

    /// Discretizes `set`, drawing initial centroids from the configured
    /// random state or from OS entropy. `set` is left sorted by value.
    pub fn discretize(&self, set: &mut ObservationSet) -> Result<Discretization, DiscretizeError> {
        let mut rng = match self.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.discretize_with_rng(set, &mut rng)
    }

    pub fn discretize_with_rng<R: Rng + ?Sized>(
        &self,
        set: &mut ObservationSet,
        rng: &mut R,
    ) -> Result<Discretization, DiscretizeError> {
        set.sort();
        let values = set.values();
        self.validate(&values)?;

        let mut centroids = self.initialize_centroids(&values, rng);
        let mut clusters: Vec<Vec<usize>> = Vec::new();
        let mut n_iter = None;

        for iteration in 0..self.max_iter {
            clusters = assign_to_clusters(&values, &centroids);
            repair_empty_clusters(&mut clusters, &centroids)?;

            let new_centroids = update_centroids(&values, &mut clusters, &centroids);
            let shift = max_centroid_shift(&centroids, &new_centroids);
            centroids = new_centroids;

            debug!(
                "iteration {}: max centroid shift {:.6e}",
                iteration + 1,
                shift
            );

            if shift <= self.tolerance {
                n_iter = Some(iteration + 1);
                break;
            }
        }

        let n_iter = n_iter.ok_or(DiscretizeError::FailedToConverge {
            max_iter: self.max_iter,
        })?;

        info!(
            "'{}': {} observations into {} intervals after {} iterations",
            set.name(),
            values.len(),
            self.n_intervals,
            n_iter
        );

        Ok(build_intervals(set, &values, &clusters, &centroids, n_iter))
    }

    fn validate(&self, values: &Vector) -> Result<(), DiscretizeError> {
        if values.is_empty() {
            return Err(DiscretizeError::InsufficientData);
        }

        if self.n_intervals == 0 || self.n_intervals > values.len() {
            return Err(DiscretizeError::InvalidIntervalCount {
                requested: self.n_intervals,
                available: values.len(),
            });
        }

        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(DiscretizeError::NonFiniteValue { index, value });
        }

        Ok(())
    }

    // Uniform draw with replacement; duplicate centroids are left for the
    // empty-cluster repair to sort out.
    fn initialize_centroids<R: Rng + ?Sized>(&self, values: &Vector, rng: &mut R) -> Vector {
        (0..self.n_intervals)
            .map(|_| values[rng.gen_range(0..values.len())])
            .collect()
    }
}

/// Half of `|a - b|`. Orders pairs exactly like the full difference but
/// stays finite for any two finite values.
fn distance(a: f64, b: f64) -> f64 {
    (a / 2.0 - b / 2.0).abs()
}

/// Nearest-centroid assignment. Ties go to the lowest centroid index.
fn assign_to_clusters(values: &Vector, centroids: &Vector) -> Vec<Vec<usize>> {
    let mut clusters = vec![Vec::new(); centroids.len()];

    for (i, &value) in values.iter().enumerate() {
        let mut min_distance = distance(value, centroids[0]);
        let mut closest_cluster = 0;

        for (k, &centroid) in centroids.iter().enumerate().skip(1) {
            let d = distance(value, centroid);
            if d < min_distance {
                min_distance = d;
                closest_cluster = k;
            }
        }

        clusters[closest_cluster].push(i);
    }

    clusters
}

/// Gives every empty cluster the smallest member of the nearest cluster (by
/// centroid) that can spare one. Donors keep at least one member, so with
/// `k <= n` a donor always exists and no cluster stays empty.
fn repair_empty_clusters(
    clusters: &mut [Vec<usize>],
    centroids: &Vector,
) -> Result<(), DiscretizeError> {
    for empty in 0..clusters.len() {
        if !clusters[empty].is_empty() {
            continue;
        }

        let mut min_distance = f64::INFINITY;
        let mut donor = None;

        for (j, members) in clusters.iter().enumerate() {
            if members.len() < 2 {
                continue;
            }
            let d = distance(centroids[empty], centroids[j]);
            if d < min_distance {
                min_distance = d;
                donor = Some(j);
            }
        }

        let donor = donor.ok_or(DiscretizeError::NoDonor { cluster: empty })?;
        let moved = clusters[donor].remove(0);
        clusters[empty].push(moved);
    }

    Ok(())
}

/// Sorts each cluster and returns the member means. Indices address a
/// value-sorted array, so index order is value order. A cluster left empty
/// keeps its previous centroid.
fn update_centroids(values: &Vector, clusters: &mut [Vec<usize>], previous: &Vector) -> Vector {
    clusters
        .iter_mut()
        .zip(previous.iter())
        .map(|(members, &old)| {
            if members.is_empty() {
                return old;
            }
            members.sort_unstable();
            mean(values, members)
        })
        .collect()
}

/// Falls back to summing pre-divided values when the plain sum overflows.
fn mean(values: &Vector, members: &[usize]) -> f64 {
    let n = members.len() as f64;
    let sum: f64 = members.iter().map(|&i| values[i]).sum();
    if sum.is_finite() {
        sum / n
    } else {
        members.iter().map(|&i| values[i] / n).sum()
    }
}

/// Halves before adding so values near `f64::MAX` cannot overflow.
fn midpoint(low: f64, high: f64) -> f64 {
    low / 2.0 + high / 2.0
}

fn max_centroid_shift(old_centroids: &Vector, new_centroids: &Vector) -> f64 {
    old_centroids
        .iter()
        .zip(new_centroids.iter())
        .map(|(&a, &b)| (a - b).abs())
        .fold(0.0, |max, d| if d.is_nan() || d > max { d } else { max })
}

/// Orders clusters by their smallest member and sets adjacent boundaries to
/// the midpoint between neighbouring extremes. Members index the sorted
/// values, so comparing first indices compares minima with ties resolved by
/// position.
fn build_intervals(
    source: &ObservationSet,
    values: &Vector,
    clusters: &[Vec<usize>],
    centroids: &Vector,
    n_iter: usize,
) -> Discretization {
    let mut order: Vec<usize> = (0..clusters.len()).collect();
    order.sort_by_key(|&c| clusters[c][0]);

    let mut intervals: Vec<ObservationSet> = order
        .iter()
        .enumerate()
        .map(|(position, &c)| {
            let observations = clusters[c]
                .iter()
                .map(|&i| source.observations()[i].clone())
                .collect();
            ObservationSet::with_observations(
                format!("{}[{}]", source.name(), position),
                observations,
            )
        })
        .collect();

    for i in 0..order.len().saturating_sub(1) {
        let left = &clusters[order[i]];
        let right = &clusters[order[i + 1]];
        let boundary = midpoint(values[left[left.len() - 1]], values[right[0]]);
        intervals[i].set_max(boundary);
        intervals[i + 1].set_min(boundary);
    }

    let centroids: Vector = order.iter().map(|&c| centroids[c]).collect();
    let inertia = metrics::inertia(&intervals);

    Discretization {
        intervals,
        centroids,
        n_iter,
        inertia,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discretization::observation::Observation;
    use ndarray::array;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn sorted_pairs(observations: &[Observation]) -> Vec<(f64, String)> {
        let mut pairs: Vec<(f64, String)> = observations
            .iter()
            .map(|o| (o.value, o.label.clone()))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        pairs
    }

    #[test]
    fn test_two_separated_groups() {
        for seed in 0..32 {
            let mut set = ObservationSet::from_values("x", &[10.0, 1.0, 12.0, 3.0, 11.0, 2.0]);
            let result = KMeansDiscretizer::new(2)
                .discretize_with_rng(&mut set, &mut seeded(seed))
                .unwrap();

            assert_eq!(result.intervals.len(), 2);
            assert_eq!(result.intervals[0].values(), array![1.0, 2.0, 3.0]);
            assert_eq!(result.intervals[1].values(), array![10.0, 11.0, 12.0]);
            assert_eq!(result.intervals[0].max(), Some(6.5));
            assert_eq!(result.intervals[1].min(), Some(6.5));
            assert_eq!(result.centroids, array![2.0, 11.0]);
        }
    }

    #[test]
    fn test_identical_values_are_split_by_repair() {
        let mut set = ObservationSet::from_values("x", &[5.0, 5.0, 5.0, 5.0]);
        let result = KMeansDiscretizer::new(2)
            .tolerance(0.0)
            .discretize_with_rng(&mut set, &mut seeded(7))
            .unwrap();

        assert_eq!(result.intervals.len(), 2);
        assert!(result.intervals.iter().all(|s| !s.is_empty()));
        assert_eq!(result.intervals[0].len() + result.intervals[1].len(), 4);
        assert_eq!(result.intervals[0].max(), Some(5.0));
        assert_eq!(result.intervals[1].min(), Some(5.0));
        assert_eq!(result.inertia, 0.0);
    }

    #[test]
    fn test_single_interval_has_open_bounds() {
        let mut set = ObservationSet::from_values("x", &[3.0, 1.0, 2.0]);
        let result = KMeansDiscretizer::new(1)
            .random_state(1)
            .discretize(&mut set)
            .unwrap();

        assert_eq!(result.intervals.len(), 1);
        assert_eq!(result.intervals[0].values(), array![1.0, 2.0, 3.0]);
        assert!(result.intervals[0].min().is_none());
        assert!(result.intervals[0].max().is_none());
        assert!(result.boundaries().is_empty());
    }

    #[test]
    fn test_invalid_interval_counts() {
        let mut set = ObservationSet::from_values("x", &[1.0, 2.0, 3.0]);

        let zero = KMeansDiscretizer::new(0).discretize(&mut set);
        assert_eq!(
            zero.unwrap_err(),
            DiscretizeError::InvalidIntervalCount {
                requested: 0,
                available: 3
            }
        );

        let too_many = KMeansDiscretizer::new(4).discretize(&mut set);
        assert!(matches!(
            too_many,
            Err(DiscretizeError::InvalidIntervalCount { requested: 4, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let mut set = ObservationSet::new("x");
        let result = KMeansDiscretizer::new(2).discretize(&mut set);
        assert_eq!(result.unwrap_err(), DiscretizeError::InsufficientData);
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let mut set = ObservationSet::from_values("x", &[1.0, f64::NAN, 2.0]);
        let result = KMeansDiscretizer::new(2).discretize(&mut set);
        assert!(matches!(result, Err(DiscretizeError::NonFiniteValue { .. })));
    }

    #[test]
    fn test_iteration_cap_reports_failure() {
        // The first update always moves at least one centroid here.
        let mut set = ObservationSet::from_values("x", &[0.0, 1.0, 2.0, 100.0, 101.0]);
        let result = KMeansDiscretizer::new(2)
            .max_iter(1)
            .tolerance(0.0)
            .discretize_with_rng(&mut set, &mut seeded(3));
        assert_eq!(
            result.unwrap_err(),
            DiscretizeError::FailedToConverge { max_iter: 1 }
        );
    }

    fn labeled(values: &[f64]) -> ObservationSet {
        let observations = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Observation::new(v, format!("row{}", i)))
            .collect();
        ObservationSet::with_observations("x", observations)
    }

    fn assert_valid_partition(original: &ObservationSet, result: &Discretization, k: usize) {
        assert_eq!(result.intervals.len(), k);
        assert!(result.intervals.iter().all(|s| !s.is_empty()));

        let merged: Vec<Observation> = result
            .intervals
            .iter()
            .flat_map(|s| s.observations().iter().cloned())
            .collect();
        assert_eq!(sorted_pairs(&merged), sorted_pairs(original.observations()));

        for pair in result.intervals.windows(2) {
            let (left, right) = (&pair[0], &pair[1]);
            let high = left.last().unwrap().value;
            let low = right.first().unwrap().value;
            let boundary = left.max().unwrap();
            assert_eq!(left.max(), right.min());
            assert_eq!(boundary, high / 2.0 + low / 2.0);
            assert!(boundary.is_finite());
            assert!(high <= boundary && boundary <= low);
        }

        for (i, interval) in result.intervals.iter().enumerate() {
            for o in interval.observations() {
                // A zero-width boundary sends its own value to the right.
                if interval.max() != Some(o.value) {
                    assert_eq!(result.interval_of(o.value), Some(i));
                }
            }
        }
    }

    #[test]
    fn test_partition_is_complete_and_ordered() {
        let original = labeled(&[
            4.2, 0.3, 7.7, 7.1, 0.9, 3.8, 4.0, 9.9, 0.1, 8.4, 4.4, 2.5, 6.0, 5.5,
        ]);

        for k in 1..=original.len() {
            for seed in 0..8 {
                let mut set = original.clone();
                let result = KMeansDiscretizer::new(k)
                    .discretize_with_rng(&mut set, &mut seeded(seed))
                    .unwrap();
                assert_valid_partition(&original, &result, k);
            }
        }
    }

    #[test]
    fn test_near_duplicate_values_stay_ordered() {
        let original = labeled(&[5.0, 5.0, 5.00005]);
        for seed in 0..64 {
            let mut set = original.clone();
            let result = KMeansDiscretizer::new(2)
                .discretize_with_rng(&mut set, &mut seeded(seed))
                .unwrap();
            assert_valid_partition(&original, &result, 2);
            assert_eq!(result.interval_of(5.00005), Some(1));
        }

        let original = labeled(&[
            1.0, 1.0, 1.0 + 1e-12, 1.0 + 2e-12, 2.0, 2.0, 2.0 + 1e-9, 3.0, 3.0,
        ]);
        for k in 1..=original.len() {
            for seed in 0..16 {
                let mut set = original.clone();
                let result = KMeansDiscretizer::new(k)
                    .discretize_with_rng(&mut set, &mut seeded(seed))
                    .unwrap();
                assert_valid_partition(&original, &result, k);
            }
        }
    }

    #[test]
    fn test_small_scale_groups_converge_fully() {
        let scale = 1e-6;
        let scaled: Vec<f64> = [1.0, 2.0, 3.0, 10.0, 11.0, 12.0]
            .iter()
            .map(|v| v * scale)
            .collect();
        let original = labeled(&scaled);

        for seed in 0..64 {
            let mut set = original.clone();
            let result = KMeansDiscretizer::new(2)
                .discretize_with_rng(&mut set, &mut seeded(seed))
                .unwrap();
            assert_valid_partition(&original, &result, 2);
            assert_eq!(result.intervals[0].values().to_vec(), scaled[..3].to_vec());
            assert_eq!(result.intervals[1].values().to_vec(), scaled[3..].to_vec());
        }

        let spread: Vec<f64> = [4.2, 0.3, 7.7, 7.1, 0.9, 3.8, 4.0, 9.9, 0.1, 8.4]
            .iter()
            .map(|v| v * scale)
            .collect();
        let original = labeled(&spread);
        for k in 1..=original.len() {
            let mut set = original.clone();
            let result = KMeansDiscretizer::new(k)
                .discretize_with_rng(&mut set, &mut seeded(k as u64))
                .unwrap();
            assert_valid_partition(&original, &result, k);
        }
    }

    #[test]
    fn test_values_near_float_limits() {
        let original = labeled(&[1.7e308, 1.79e308]);
        for seed in 0..16 {
            let mut set = original.clone();
            let result = KMeansDiscretizer::new(2)
                .discretize_with_rng(&mut set, &mut seeded(seed))
                .unwrap();
            assert_valid_partition(&original, &result, 2);
            assert!(result.centroids.iter().all(|c| c.is_finite()));
        }

        let original = labeled(&[-1.7e308, -1e308, 0.0, 1e308, 1.7e308]);
        for k in 1..=original.len() {
            for seed in 0..8 {
                let mut set = original.clone();
                let result = KMeansDiscretizer::new(k)
                    .discretize_with_rng(&mut set, &mut seeded(seed))
                    .unwrap();
                assert_valid_partition(&original, &result, k);
            }
        }
    }

    #[test]
    fn test_midpoint_and_mean_do_not_overflow() {
        assert_eq!(midpoint(1.0, 2.0), 1.5);
        assert_eq!(midpoint(-f64::MAX, f64::MAX), 0.0);
        assert!(midpoint(f64::MAX, f64::MAX).is_finite());

        let values = array![1.0, 2.0, 3.0, f64::MAX, f64::MAX];
        assert_eq!(mean(&values, &[0, 1, 2]), 2.0);
        assert_eq!(mean(&values, &[3, 4]), f64::MAX);
    }

    #[test]
    fn test_assignment_across_full_float_range() {
        let half = f64::MAX / 2.0;
        let values = array![-f64::MAX, -half, half, f64::MAX];
        let clusters = assign_to_clusters(&values, &array![-f64::MAX, f64::MAX]);
        assert_eq!(clusters, vec![vec![0, 1], vec![2, 3]]);

        let mut clusters = vec![vec![], vec![0, 1]];
        let centroids = array![-f64::MAX, f64::MAX];
        repair_empty_clusters(&mut clusters, &centroids).unwrap();
        assert_eq!(clusters, vec![vec![0], vec![1]]);
    }

    #[test]
    fn test_shift_propagates_nan() {
        let old = array![1.0, f64::INFINITY];
        let new = array![1.0, f64::INFINITY];
        assert!(max_centroid_shift(&old, &new).is_nan());
        assert_eq!(max_centroid_shift(&array![1.0, 2.0], &array![1.5, 2.0]), 0.5);
    }

    #[test]
    fn test_same_seed_same_result() {
        let values = [1.0, 1.5, 2.0, 6.0, 6.5, 7.0, 20.0, 21.0, 22.5, 40.0];
        let run = |seed| {
            let mut set = ObservationSet::from_values("x", &values);
            KMeansDiscretizer::new(3)
                .random_state(seed)
                .discretize(&mut set)
                .unwrap()
        };

        let a = run(11);
        let b = run(11);
        assert_eq!(a.intervals, b.intervals);
        assert_eq!(a.centroids, b.centroids);
        assert_eq!(a.n_iter, b.n_iter);
    }

    #[test]
    fn test_input_is_left_sorted() {
        let mut set = ObservationSet::from_values("x", &[3.0, 1.0, 2.0]);
        KMeansDiscretizer::new(2)
            .random_state(0)
            .discretize(&mut set)
            .unwrap();
        assert_eq!(set.values(), array![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_assignment_breaks_ties_to_lowest_index() {
        let values = array![1.0, 2.0, 3.0];
        let clusters = assign_to_clusters(&values, &array![2.0, 2.0]);
        assert_eq!(clusters, vec![vec![0, 1, 2], vec![]]);
    }

    #[test]
    fn test_repair_moves_smallest_member_of_nearest_cluster() {
        let mut clusters = vec![vec![0, 1], vec![], vec![2, 3, 4]];
        let centroids = array![1.0, 8.0, 9.0];
        repair_empty_clusters(&mut clusters, &centroids).unwrap();
        assert_eq!(clusters, vec![vec![0, 1], vec![2], vec![3, 4]]);
    }

    #[test]
    fn test_repair_skips_single_member_donors() {
        let mut clusters = vec![vec![0], vec![], vec![1, 2, 3]];
        let centroids = array![5.0, 5.0, 9.0];
        repair_empty_clusters(&mut clusters, &centroids).unwrap();
        assert_eq!(clusters, vec![vec![0], vec![1], vec![2, 3]]);
    }

    #[test]
    #[should_panic(expected = "tolerance must be non-negative")]
    fn test_negative_tolerance_panics() {
        KMeansDiscretizer::new(2).tolerance(-1.0);
    }
}
