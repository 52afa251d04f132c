//! Concurrency guarantees of the weight cell.

use costmap_weights::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

fn assert_bit_identical(actual: &WeightSet, expected: &WeightSet) {
    assert_eq!(actual.obstacle_weight.to_bits(), expected.obstacle_weight.to_bits());
    assert_eq!(actual.inflation_weight.to_bits(), expected.inflation_weight.to_bits());
}

#[test]
fn test_first_read_returns_default() {
    let cell = ConfigCell::new(WeightSet::new(1.0, 1.0));
    assert_bit_identical(&cell.read(), &WeightSet::new(1.0, 1.0));
}

#[test]
fn test_write_then_read_is_bit_identical() {
    let cell = ConfigCell::new(WeightSet::new(1.0, 1.0));
    cell.write(WeightSet::new(2.0, 1.0));

    assert_bit_identical(&cell.read(), &WeightSet::new(2.0, 1.0));
    assert_bit_identical(&cell.read_copy(), &WeightSet::new(2.0, 1.0));
}

#[test]
fn test_last_write_visible_to_all_threads() {
    let cell = ConfigCell::new(WeightSet::default());
    cell.write(WeightSet::new(3.0, 3.0));
    cell.write(WeightSet::new(4.0, 0.25));

    thread::scope(|scope| {
        for _ in 0..4 {
            let cell = cell.clone();
            scope.spawn(move || {
                for _ in 0..100 {
                    assert_eq!(*cell.read(), WeightSet::new(4.0, 0.25));
                }
            });
        }
    });
}

#[test]
fn test_eight_writers_never_produce_hybrids() {
    let cell = ConfigCell::new(WeightSet::new(1.0, 1.0));

    let observed: Vec<Vec<Arc<WeightSet>>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cell = cell.clone();
                scope.spawn(move || {
                    let value = i as f64;
                    cell.write(WeightSet::new(value, value));
                    (0..1000).map(|_| cell.read()).collect::<Vec<_>>()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for weights in observed.iter().flatten() {
        let allowed = (0..8).any(|i| **weights == WeightSet::new(i as f64, i as f64))
            || **weights == WeightSet::new(1.0, 1.0);
        assert!(allowed, "observed hybrid weights: {}", weights);
    }
}

#[test]
fn test_readers_do_not_starve_writer() {
    let cell = ConfigCell::new(WeightSet::default());
    let stop = Arc::new(AtomicBool::new(false));

    thread::scope(|scope| {
        for _ in 0..8 {
            let cell = cell.clone();
            let stop = Arc::clone(&stop);
            scope.spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let weights = cell.read();
                    assert_eq!(weights.obstacle_weight, weights.inflation_weight);
                }
            });
        }

        let started = Instant::now();
        for i in 0..10_000 {
            let value = i as f64;
            cell.write(WeightSet::new(value, value));
        }
        let elapsed = started.elapsed();
        stop.store(true, Ordering::Relaxed);

        assert!(
            elapsed < Duration::from_secs(5),
            "10k writes took {:?} under read load",
            elapsed
        );
    });

    assert_eq!(*cell.read(), WeightSet::new(9999.0, 9999.0));
}

#[test]
fn test_held_snapshot_is_unaffected_by_writes() {
    let costmap = Costmap::new(WeightSet::new(1.0, 2.0));
    let snapshot = costmap.weights();

    thread::scope(|scope| {
        scope.spawn(|| costmap.update_weights(&[7.0, 8.0]).unwrap());
    });

    assert_eq!(*snapshot, WeightSet::new(1.0, 2.0));
    assert_eq!(*costmap.weights(), WeightSet::new(7.0, 8.0));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_reads_only_see_whole_writes(
        writes in prop::collection::vec((-1.0e6f64..1.0e6, -1.0e6f64..1.0e6), 1..16),
        readers in 1usize..6,
    ) {
        let initial = WeightSet::new(f64::MAX, f64::MAX);
        let published: Vec<WeightSet> = writes
            .iter()
            .map(|&(obstacle, inflation)| WeightSet::new(obstacle, inflation))
            .collect();
        let cell = ConfigCell::new(initial);

        let observed: Vec<WeightSet> = thread::scope(|scope| {
            let reader_handles: Vec<_> = (0..readers)
                .map(|_| {
                    let cell = cell.clone();
                    scope.spawn(move || (0..500).map(|_| cell.read_copy()).collect::<Vec<_>>())
                })
                .collect();

            for chunk in published.chunks(4) {
                let cell = cell.clone();
                let chunk = chunk.to_vec();
                scope.spawn(move || {
                    for weights in chunk {
                        cell.write(weights);
                    }
                });
            }

            reader_handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        for weights in &observed {
            prop_assert!(
                *weights == initial || published.contains(weights),
                "observed weights never written: {}",
                weights
            );
        }

        let last = cell.read_copy();
        prop_assert!(published.contains(&last));
    }
}
