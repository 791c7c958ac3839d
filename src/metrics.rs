use crate::ObservationSet;

/// Sum of squared deviations of every interval's values from that interval's
/// mean. Empty intervals contribute nothing.
pub fn inertia(intervals: &[ObservationSet]) -> f64 {
    intervals
        .iter()
        .filter_map(|interval| {
            let values = interval.values();
            let mean = values.mean()?;
            Some(values.mapv(|x| (x - mean) * (x - mean)).sum())
        })
        .sum()
}

/// Mean absolute distance between each value and its interval's mean.
pub fn mean_absolute_deviation(intervals: &[ObservationSet]) -> Result<f64, String> {
    let total: usize = intervals.iter().map(ObservationSet::len).sum();
    if total == 0 {
        return Err("intervals must contain at least one observation".to_string());
    }

    let sum: f64 = intervals
        .iter()
        .filter_map(|interval| {
            let values = interval.values();
            let mean = values.mean()?;
            Some(values.mapv(|x| (x - mean).abs()).sum())
        })
        .sum();

    Ok(sum / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inertia() {
        let intervals = vec![
            ObservationSet::from_values("a", &[1.0, 2.0, 3.0]),
            ObservationSet::from_values("b", &[10.0, 10.0]),
            ObservationSet::new("empty"),
        ];

        let inertia = inertia(&intervals);
        assert!((inertia - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_mean_absolute_deviation() {
        let intervals = vec![
            ObservationSet::from_values("a", &[1.0, 3.0]),
            ObservationSet::from_values("b", &[5.0, 5.0]),
        ];

        let mad = mean_absolute_deviation(&intervals).unwrap();
        assert!((mad - 0.5).abs() < 1e-10);
        assert!(mean_absolute_deviation(&[]).is_err());
    }
}
