use kmeans_discretization::{DatasetReader, KMeansDiscretizer};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: {} <path> [intervals] [delimiter]", args[0]);
        std::process::exit(2);
    }

    let path = &args[1];
    let k: usize = match args.get(2) {
        Some(k) => k.parse()?,
        None => 3,
    };
    let delimiter = args
        .get(3)
        .and_then(|d| d.chars().next())
        .unwrap_or(';');

    let mut dataset = DatasetReader::new().delimiter(delimiter).open(path)?;
    println!("Loaded {} numeric columns from {}", dataset.n_columns(), path);

    for column in dataset.columns() {
        println!("\n--- {} ---", column.name());
        for observation in column.observations() {
            println!("Value: {}, Label: {}", observation.value, observation.label);
        }
    }

    let results = dataset.discretize(&KMeansDiscretizer::new(k))?;

    println!("\n=== Intervals (k={}) ===", k);
    for result in &results {
        for interval in &result.intervals {
            println!(
                "{:<24} min={:?} max={:?} n={}",
                interval.name(),
                interval.min(),
                interval.max(),
                interval.len()
            );
        }
    }

    Ok(())
}
