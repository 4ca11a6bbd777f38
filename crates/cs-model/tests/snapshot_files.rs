use chrono::{TimeZone, Utc};
use cs_core::{TrainId, WagonId};
use cs_model::{
    BrakeType, LATEST_VERSION, ModelError, Snapshot, SnapshotFormat, Train, ValidationError,
    Wagon, WagonSpec, WagonType, load_snapshot, save_snapshot,
};
use std::path::Path;

fn sample() -> Snapshot {
    let at = Utc.with_ymd_and_hms(2024, 10, 1, 8, 0, 0).unwrap();
    let train_id = TrainId::first();
    let wagon = |id: u64, position: u32, wagon_type: WagonType| Wagon {
        id: WagonId::new(id).unwrap(),
        train_id,
        position,
        spec: WagonSpec {
            identifier: Some(format!("31 80 665 {id:04}-1")),
            length_m: 16.5,
            tare_weight_t: 24.0,
            load_weight_t: 40.0,
            braked_weight_t: 58.0,
            brake_type: BrakeType::G,
            axle_count: Some(4),
            wagon_type,
        },
    };
    Snapshot {
        version: LATEST_VERSION,
        trains: vec![Train {
            id: train_id,
            name: "Gueterzug 4711".to_string(),
            description: Some("Rostock - Wien".to_string()),
            created_at: at,
            updated_at: at,
        }],
        wagons: vec![
            wagon(1, 1, WagonType::Locomotive),
            wagon(2, 2, WagonType::Freight),
        ],
    }
}

#[test]
fn format_follows_extension() {
    assert_eq!(SnapshotFormat::from_path(Path::new("a.yaml")), SnapshotFormat::Yaml);
    assert_eq!(SnapshotFormat::from_path(Path::new("a.YML")), SnapshotFormat::Yaml);
    assert_eq!(SnapshotFormat::from_path(Path::new("a.json")), SnapshotFormat::Json);
    assert_eq!(SnapshotFormat::from_path(Path::new("a")), SnapshotFormat::Json);
}

#[test]
fn saved_snapshot_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = sample();
    for name in ["consist.json", "consist.yaml"] {
        let path = dir.path().join(name);
        save_snapshot(&path, &snapshot).unwrap();
        assert_eq!(load_snapshot(&path).unwrap(), snapshot);
    }
}

#[test]
fn version_one_file_is_migrated_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    std::fs::write(
        &path,
        r#"{
  "version": 1,
  "trains": [{"id": 3, "name": "Alt", "created_at": "2023-01-01T00:00:00Z",
              "updated_at": "2023-01-01T00:00:00Z"}],
  "wagons": [{"id": 9, "train_id": 3, "position": 1, "length_m": 14.0,
              "tare_weight_t": 20.0, "load_weight_t": 0.0, "braked_weight_t": 16.0}]
}"#,
    )
    .unwrap();

    let snapshot = load_snapshot(&path).unwrap();
    assert_eq!(snapshot.version, LATEST_VERSION);
    assert_eq!(snapshot.wagons[0].spec.wagon_type, WagonType::Freight);
    assert_eq!(snapshot.wagons[0].spec.brake_type, BrakeType::P);
}

#[test]
fn gap_in_positions_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gap.yaml");
    let mut snapshot = sample();
    snapshot.wagons[1].position = 3;
    assert!(save_snapshot(&path, &snapshot).is_err());
    std::fs::write(&path, serde_yaml::to_string(&snapshot).unwrap()).unwrap();

    let err = load_snapshot(&path).unwrap_err();
    assert!(matches!(
        err,
        ModelError::Validation(ValidationError::Positions { .. })
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_snapshot(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ModelError::Io(_)));
}
