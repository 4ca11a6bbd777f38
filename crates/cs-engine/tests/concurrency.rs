mod common;

use common::*;
use cs_engine::{Depot, EngineError, calculate};
use cs_store::FileStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn file_depot(dir: &std::path::Path) -> Depot {
    Depot::new(Arc::new(FileStore::new(dir.to_path_buf()).unwrap()))
}

#[test]
fn concurrent_mutations_keep_positions_contiguous() {
    let depot = depot();
    let (train, _) = train_with(&depot, 5);
    let (other, _) = train_with(&depot, 5);
    let done = AtomicBool::new(false);

    std::thread::scope(|s| {
        let mut writers = Vec::new();
        for worker in 0..4 {
            let depot = &depot;
            writers.push(s.spawn(move || {
                for round in 0..40 {
                    let wagons = depot.wagons().list_wagons(train).unwrap();
                    match (worker + round) % 4 {
                        0 => {
                            depot
                                .wagons()
                                .create_wagon(train, at(1, spec(10.0, 10.0, 0.0, 8.0)))
                                .unwrap();
                        }
                        1 => {
                            if let Some(w) = wagons.last() {
                                // May already be gone; only the outcome shape matters.
                                let _ = depot.wagons().clone_wagon(train, w.id, 2);
                            }
                        }
                        2 => {
                            if let Some(w) = wagons.get(wagons.len() / 2) {
                                let _ = depot.wagons().delete_wagon(train, w.id);
                            }
                        }
                        _ => {
                            let mut ids = order(&wagons);
                            ids.reverse();
                            // Stale lists are rejected as a whole.
                            let _ = depot.wagons().reorder_wagons(train, &ids);
                        }
                    }
                }
            }));
        }

        // Independent train progresses alongside.
        let depot_ref = &depot;
        writers.push(s.spawn(move || {
            for _ in 0..40 {
                depot_ref
                    .wagons()
                    .create_wagon(other, append(spec(5.0, 1.0, 1.0, 1.0)))
                    .unwrap();
            }
        }));

        let depot_ref = &depot;
        let done_ref = &done;
        s.spawn(move || {
            while !done_ref.load(Ordering::SeqCst) {
                let wagons = depot_ref.wagons().list_wagons(train).unwrap();
                assert_contiguous(&wagons);
                let calc = depot_ref.wagons().calculate(train).unwrap();
                assert!(calc.train_length_m >= 0.0);
                std::thread::yield_now();
            }
        });

        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::SeqCst);
    });

    let wagons = depot.wagons().list_wagons(train).unwrap();
    assert_contiguous(&wagons);
    assert_eq!(depot.wagons().calculate(train).unwrap(), calculate(&wagons));
    assert_eq!(depot.wagons().list_wagons(other).unwrap().len(), 45);
}

#[test]
fn train_reads_race_deletes_on_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let depot = file_depot(dir.path());
    let trains: Vec<_> = (0..30).map(|_| train_with(&depot, 2).0).collect();

    std::thread::scope(|s| {
        let deleter = s.spawn(|| {
            for train in &trains {
                depot.registry().delete_train(*train).unwrap();
            }
        });

        loop {
            let finished = deleter.is_finished();
            for train in depot.registry().list_trains().unwrap() {
                match depot.registry().get_train(train.id) {
                    Ok(found) => assert_eq!(found.id, train.id),
                    Err(err) => assert!(matches!(err, EngineError::TrainNotFound(_))),
                }
                match depot.wagons().list_wagons(train.id) {
                    Ok(wagons) => assert_contiguous(&wagons),
                    Err(err) => assert!(matches!(err, EngineError::TrainNotFound(_))),
                }
            }
            if finished {
                break;
            }
        }
    });

    assert!(depot.registry().list_trains().unwrap().is_empty());
}

#[test]
fn listing_never_sees_a_half_imported_store() {
    let small = depot();
    for _ in 0..3 {
        train_with(&small, 2);
    }
    let large = depot();
    for _ in 0..7 {
        train_with(&large, 2);
    }
    let snapshots = [small.export().unwrap(), large.export().unwrap()];

    let dir = tempfile::tempdir().unwrap();
    let depot = file_depot(dir.path());
    depot.import(&snapshots[0]).unwrap();

    std::thread::scope(|s| {
        let importer = s.spawn(|| {
            for round in 0..20 {
                depot.import(&snapshots[round % 2]).unwrap();
            }
        });

        while !importer.is_finished() {
            let count = depot.registry().list_trains().unwrap().len();
            assert!(count == 3 || count == 7, "saw {count} trains");
            let snapshot = depot.export().unwrap();
            let shape = (snapshot.trains.len(), snapshot.wagons.len());
            assert!(shape == (3, 6) || shape == (7, 14), "saw {shape:?}");
        }
    });
}
