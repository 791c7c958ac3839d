//! Error types for discretization and dataset loading.

use std::fmt;
use std::io;

/// Reasons a single discretization call can fail.
///
/// No partial result is ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscretizeError {
    /// The observation set holds no observations.
    InsufficientData,
    /// Interval count is zero or exceeds the number of observations.
    InvalidIntervalCount {
        requested: usize,
        available: usize,
    },
    /// An observation is NaN or infinite. `index` is its position after sorting.
    NonFiniteValue { index: usize, value: f64 },
    /// Centroids kept moving for `max_iter` iterations.
    FailedToConverge { max_iter: usize },
    /// An empty cluster could not borrow an observation from any other cluster.
    NoDonor { cluster: usize },
}

impl fmt::Display for DiscretizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData => {
                write!(f, "insufficient data: observation set is empty")
            }
            Self::InvalidIntervalCount {
                requested,
                available,
            } => write!(
                f,
                "invalid interval count: requested {} intervals from {} observations",
                requested, available
            ),
            Self::NonFiniteValue { index, value } => {
                write!(f, "observation {} has non-finite value {}", index, value)
            }
            Self::FailedToConverge { max_iter } => {
                write!(f, "failed to converge within {} iterations", max_iter)
            }
            Self::NoDonor { cluster } => write!(
                f,
                "cluster {} is empty and no non-empty cluster can donate an observation",
                cluster
            ),
        }
    }
}

impl std::error::Error for DiscretizeError {}

/// Reasons reading a delimited dataset can fail.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    /// Input had no header line.
    MissingHeader,
    /// The configured label column is not in the header.
    UnknownLabelColumn(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read dataset: {}", e),
            Self::MissingHeader => write!(f, "dataset has no header row"),
            Self::UnknownLabelColumn(name) => {
                write!(f, "label column '{}' not found in header", name)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
