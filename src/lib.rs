pub use ndarray::Array1;

pub mod dataset;
pub mod discretization;
pub mod error;
pub mod metrics;

pub use dataset::{Dataset, DatasetReader};
pub use discretization::{Discretization, KMeansDiscretizer, Observation, ObservationSet};
pub use error::{DiscretizeError, LoadError};

pub type Vector = Array1<f64>;
