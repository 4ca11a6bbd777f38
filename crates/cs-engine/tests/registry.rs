mod common;

use common::*;
use cs_engine::EngineError;
use cs_model::{NewTrain, TrainPatch};

#[test]
fn create_get_list() {
    let depot = depot();
    let first = depot
        .registry()
        .create_train(NewTrain {
            name: "RE 7".to_string(),
            description: Some("Morning service".to_string()),
        })
        .unwrap();
    let second = depot
        .registry()
        .create_train(NewTrain {
            name: "RB 12".to_string(),
            description: Some(String::new()),
        })
        .unwrap();

    assert_eq!(depot.registry().get_train(first.id).unwrap(), first);
    assert_eq!(second.description, None);

    let listed = depot.registry().list_trains().unwrap();
    let ids: Vec<_> = listed.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn empty_name_is_rejected() {
    let depot = depot();
    let err = depot
        .registry()
        .create_train(NewTrain {
            name: "  ".to_string(),
            description: None,
        })
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(depot.registry().list_trains().unwrap().is_empty());
}

#[test]
fn update_train_partially() {
    let depot = depot();
    let id = new_train(&depot, "old");
    let created = depot.registry().get_train(id).unwrap();

    let updated = depot
        .registry()
        .update_train(
            id,
            TrainPatch {
                name: None,
                description: Some("now with a description".to_string()),
            },
        )
        .unwrap();
    assert_eq!(updated.name, "old");
    assert_eq!(updated.description.as_deref(), Some("now with a description"));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let err = depot
        .registry()
        .update_train(
            id,
            TrainPatch {
                name: Some(String::new()),
                description: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[test]
fn delete_cascades_to_wagons() {
    let depot = depot();
    let (train, _) = train_with(&depot, 3);
    let (other, _) = train_with(&depot, 2);

    depot.registry().delete_train(train).unwrap();

    assert!(matches!(
        depot.registry().get_train(train),
        Err(EngineError::TrainNotFound(_))
    ));
    assert!(matches!(
        depot.wagons().list_wagons(train),
        Err(EngineError::TrainNotFound(_))
    ));
    assert!(matches!(
        depot.wagons().calculate(train),
        Err(EngineError::TrainNotFound(_))
    ));
    assert!(matches!(
        depot.registry().delete_train(train),
        Err(EngineError::TrainNotFound(_))
    ));
    assert_eq!(depot.wagons().list_wagons(other).unwrap().len(), 2);

    let snapshot = depot.export().unwrap();
    assert!(snapshot.wagons.iter().all(|w| w.train_id == other));
}

#[test]
fn export_then_import_restores_state() {
    let source = depot();
    let (train, ids) = train_with(&source, 3);
    source.wagons().clone_wagon(train, ids[0], 2).unwrap();
    let snapshot = source.export().unwrap();

    let target = depot();
    target.import(&snapshot).unwrap();
    assert_eq!(
        target.wagons().list_wagons(train).unwrap(),
        source.wagons().list_wagons(train).unwrap()
    );

    // New records continue after the imported keys.
    let fresh = target
        .wagons()
        .create_wagon(train, append(spec(9.0, 1.0, 1.0, 1.0)))
        .unwrap();
    assert!(snapshot.wagons.iter().all(|w| w.id < fresh.id));
}

#[test]
fn unknown_ids_leave_no_lock_entries() {
    let depot = depot();
    let (train, _) = train_with(&depot, 2);
    let tracked = depot.locks().tracked();

    for raw in 1_000..1_500 {
        let unknown = cs_core::TrainId::new(raw).unwrap();
        assert!(depot.wagons().list_wagons(unknown).is_err());
        assert!(depot.wagons().calculate(unknown).is_err());
        assert!(depot.wagons().reorder_wagons(unknown, &[]).is_err());
        assert!(depot.registry().delete_train(unknown).is_err());
    }
    assert_eq!(depot.locks().tracked(), tracked);

    depot.registry().delete_train(train).unwrap();
    assert_eq!(depot.locks().tracked(), tracked - 1);
}

#[test]
fn import_drops_lock_entries_of_replaced_trains() {
    let depot = depot();
    for _ in 0..5 {
        train_with(&depot, 1);
    }
    assert!(depot.locks().tracked() > 0);

    depot.import(&cs_model::Snapshot::empty()).unwrap();
    assert_eq!(depot.locks().tracked(), 0);
    assert!(depot.registry().list_trains().unwrap().is_empty());
}
