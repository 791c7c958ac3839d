use kmeans_discretization::metrics::mean_absolute_deviation;
use kmeans_discretization::{Discretization, KMeansDiscretizer, Observation, ObservationSet};
use ndarray::concatenate;
use ndarray::{Array1, Axis};
use ndarray_rand::RandomExt;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand_distr::Normal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== K-Means Discretization ===\n");

    // Three modes around 2, 8 and 20
    let mut rng = StdRng::seed_from_u64(42);
    let low = Array1::random_using(30, Normal::new(2.0, 0.5)?, &mut rng);
    let mid = Array1::random_using(30, Normal::new(8.0, 1.0)?, &mut rng);
    let high = Array1::random_using(20, Normal::new(20.0, 1.5)?, &mut rng);
    let values = concatenate(Axis(0), &[low.view(), mid.view(), high.view()])?;

    let observations: Vec<Observation> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| Observation::new(v, format!("sample{}", i)))
        .collect();
    let sample = ObservationSet::with_observations("reading", observations);

    println!("Dataset: {} values", sample.len());
    println!("Expected: 3 natural groups\n");

    for &k in &[2, 3, 4, 5] {
        let mut set = sample.clone();
        match KMeansDiscretizer::new(k).random_state(7).discretize(&mut set) {
            Ok(result) => print_summary(k, &result)?,
            Err(e) => println!("k={} failed: {}", k, e),
        }
    }

    println!("\n=== Relabeling ===");
    let mut set = sample.clone();
    let result = KMeansDiscretizer::new(3).random_state(7).discretize(&mut set)?;
    for observation in result.relabel().iter().step_by(10) {
        println!("  {:>8.3} -> {}", observation.value, observation.label);
    }

    println!("\n=== Assigning new values ===");
    for value in [0.0, 5.0, 12.5, 30.0] {
        match result.interval_of(value) {
            Some(i) => println!("  {:>6.2} falls in {}", value, result.intervals[i].name()),
            None => println!("  {:>6.2} falls in no interval", value),
        }
    }

    Ok(())
}

fn print_summary(k: usize, result: &Discretization) -> Result<(), String> {
    println!(
        "k={}: {} iterations, inertia {:.4}, mean abs deviation {:.4}",
        k,
        result.n_iter,
        result.inertia,
        mean_absolute_deviation(&result.intervals)?
    );

    for interval in &result.intervals {
        println!(
            "  {:<10} [{}, {}) {} values",
            interval.name(),
            format_bound(interval.min(), "-inf"),
            format_bound(interval.max(), "+inf"),
            interval.len()
        );
    }

    Ok(())
}

fn format_bound(bound: Option<f64>, open: &str) -> String {
    bound.map_or_else(|| open.to_string(), |b| format!("{:.3}", b))
}
