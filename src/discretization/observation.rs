use crate::Vector;

/// A single scalar data point. The label travels with the value and is never
/// inspected by the discretizer.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub value: f64,
    pub label: String,
}

impl Observation {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }

    pub fn unlabeled(value: f64) -> Self {
        Self::new(value, String::new())
    }
}

/// Named, sortable collection of observations with `[min, max)` boundary
/// metadata.
///
/// `min` and `max` are set by discretization; they are not kept in sync with
/// the contents, and `None` means the side is open.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObservationSet {
    min: Option<f64>,
    max: Option<f64>,
    name: String,
    observations: Vec<Observation>,
}

impl ObservationSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_observations(name: impl Into<String>, observations: Vec<Observation>) -> Self {
        Self {
            name: name.into(),
            observations,
            ..Self::default()
        }
    }

    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        let observations = values.iter().map(|&v| Observation::unlabeled(v)).collect();
        Self::with_observations(name, observations)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn set_min(&mut self, min: f64) {
        self.min = Some(min);
    }

    pub fn set_max(&mut self, max: f64) {
        self.max = Some(max);
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Replaces the contents wholesale. Boundaries are left untouched.
    pub fn set_observations(&mut self, observations: Vec<Observation>) {
        self.observations = observations;
    }

    pub fn push(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Observation count as a float, for use as a divisor.
    pub fn size(&self) -> f64 {
        self.observations.len() as f64
    }

    /// Stable ascending sort by value.
    pub fn sort(&mut self) {
        self.observations
            .sort_by(|a, b| a.value.total_cmp(&b.value));
    }

    pub fn values(&self) -> Vector {
        self.observations.iter().map(|o| o.value).collect()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Whether `value` falls in `[min, max)`, an unset side being unbounded.
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value < max)
    }
}
