//! Demo of live cost weight updates from a watched file.
//!
//! This demo shows how to:
//! - Load starting weights from a YAML file
//! - Follow the same file for runtime reconfiguration
//! - Keep costing while the weights change underneath
//!
//! Run with: cargo run --example hot_reload
//!
//! Set RUST_LOG=costmap_weights=debug to see every reload.

use costmap_weights::prelude::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Hot Reload Demo ===\n");

    let temp_dir = std::env::temp_dir().join("costmap-weights-demo");
    std::fs::create_dir_all(&temp_dir)?;
    let weights_path = temp_dir.join("weights.yaml");
    std::fs::write(&weights_path, "obstacle_weight: 1.0\ninflation_weight: 1.0\n")?;
    println!("Wrote {}", weights_path.display());

    let costmap = Costmap::builder()
        .with_file(&weights_path)
        .with_channel(FileChannel::new(&weights_path).with_debounce(Duration::from_millis(200)))
        .build()?;

    println!("Starting weights: {}", costmap.weights());
    println!("Cost of (100, 50): {}\n", costmap.cost(100.0, 50.0));

    // An operator retunes the planner while it runs
    let path = weights_path.clone();
    let operator = tokio::spawn(async move {
        for (obstacle, inflation) in [(2.0, 1.0), (4.0, 0.5), (1.5, 3.0)] {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let contents = format!(
                "obstacle_weight: {:?}\ninflation_weight: {:?}\n",
                obstacle, inflation
            );
            if let Err(e) = std::fs::write(&path, contents) {
                eprintln!("Failed to rewrite {}: {}", path.display(), e);
            }
        }
    });

    for tick in 0..8 {
        tokio::time::sleep(Duration::from_millis(500)).await;
        let weights = costmap.weights();
        println!(
            "[tick {}] {} -> cost(100, 50) = {}",
            tick,
            weights,
            weights.weighted_cost(100.0, 50.0)
        );
    }

    if let Err(e) = operator.await {
        eprintln!("Operator task failed: {}", e);
    }

    println!("\nFinal weights: {}", costmap.weights());
    Ok(())
}
