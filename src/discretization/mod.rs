//! Unsupervised discretization of a numeric attribute.
//!
//! This module provides:
//! - `ObservationSet`: a named, sortable collection of values with `[min, max)` bounds
//! - `KMeansDiscretizer`: one-dimensional k-means that splits a set into contiguous intervals
//! - `Discretization`: the ordered intervals plus centroids and fit statistics
//!
//! # Examples
//!
//! ## Splitting two groups
//! ```rust
//! use kmeans_discretization::{KMeansDiscretizer, ObservationSet};
//!
//! let mut set = ObservationSet::from_values("sepal", &[1.0, 2.0, 3.0, 10.0, 11.0, 12.0]);
//!
//! let discretizer = KMeansDiscretizer::new(2).random_state(42);
//! let result = discretizer.discretize(&mut set).unwrap();
//!
//! assert_eq!(result.intervals.len(), 2);
//! assert_eq!(result.intervals[0].max(), Some(6.5));
//! assert_eq!(result.intervals[1].min(), Some(6.5));
//!
//! // Outer bounds stay open
//! assert!(result.intervals[0].min().is_none());
//! assert!(result.intervals[1].max().is_none());
//! ```
//!
//! ## Bringing your own random source
//! ```rust
//! use kmeans_discretization::{KMeansDiscretizer, ObservationSet};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut set = ObservationSet::from_values("x", &[0.5, 0.7, 4.0, 4.2, 9.0, 9.1]);
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let result = KMeansDiscretizer::new(3)
//!     .tolerance(0.0)
//!     .discretize_with_rng(&mut set, &mut rng)
//!     .unwrap();
//!
//! println!("Boundaries: {:?}", result.boundaries());
//! println!("Iterations: {}", result.n_iter);
//! assert_eq!(result.n_intervals(), 3);
//! assert_eq!(result.boundaries().len(), 2);
//! ```

mod intervals;
mod kmeans;
mod observation;

pub use intervals::Discretization;
pub use kmeans::KMeansDiscretizer;
pub use observation::{Observation, ObservationSet};
