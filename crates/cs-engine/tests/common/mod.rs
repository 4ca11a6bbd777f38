#![allow(dead_code)]

use cs_core::{TrainId, WagonId};
use cs_engine::Depot;
use cs_model::{BrakeType, NewTrain, NewWagon, Wagon, WagonSpec, WagonType};
use cs_store::MemoryStore;
use std::sync::Arc;

pub fn depot() -> Depot {
    Depot::new(Arc::new(MemoryStore::new()))
}

pub fn spec(length: f64, tare: f64, load: f64, braked: f64) -> WagonSpec {
    WagonSpec {
        identifier: None,
        length_m: length,
        tare_weight_t: tare,
        load_weight_t: load,
        braked_weight_t: braked,
        brake_type: BrakeType::P,
        axle_count: Some(4),
        wagon_type: WagonType::Passenger,
    }
}

pub fn append(spec: WagonSpec) -> NewWagon {
    NewWagon {
        position: None,
        spec,
    }
}

pub fn at(position: u32, spec: WagonSpec) -> NewWagon {
    NewWagon {
        position: Some(position),
        spec,
    }
}

pub fn new_train(depot: &Depot, name: &str) -> TrainId {
    depot
        .registry()
        .create_train(NewTrain {
            name: name.to_string(),
            description: None,
        })
        .unwrap()
        .id
}

/// Train with `n` default wagons appended in order.
pub fn train_with(depot: &Depot, n: usize) -> (TrainId, Vec<WagonId>) {
    let train = new_train(depot, "test");
    let ids = (0..n)
        .map(|i| {
            depot
                .wagons()
                .create_wagon(train, append(spec(10.0 + i as f64, 20.0, 5.0, 18.0)))
                .unwrap()
                .id
        })
        .collect();
    (train, ids)
}

pub fn order(wagons: &[Wagon]) -> Vec<WagonId> {
    wagons.iter().map(|w| w.id).collect()
}

pub fn positions(wagons: &[Wagon]) -> Vec<u32> {
    wagons.iter().map(|w| w.position).collect()
}

pub fn assert_contiguous(wagons: &[Wagon]) {
    let expected: Vec<u32> = (1..=wagons.len() as u32).collect();
    assert_eq!(positions(wagons), expected);
}
