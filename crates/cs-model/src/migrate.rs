//! Snapshot migration framework.

use crate::ModelError;
use crate::schema::{Snapshot, WagonType};

/// Version 2 introduced `wagon_type`.
pub const LATEST_VERSION: u32 = 2;

pub fn migrate_to_latest(mut snapshot: Snapshot) -> Result<Snapshot, ModelError> {
    while snapshot.version < LATEST_VERSION {
        snapshot = migrate_one_version(snapshot)?;
    }
    Ok(snapshot)
}

fn migrate_one_version(snapshot: Snapshot) -> Result<Snapshot, ModelError> {
    match snapshot.version {
        1 => migrate_v1_to_v2(snapshot),
        v => Err(ModelError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

// v1 wagons carried no type; everything stored before was rolling freight stock.
fn migrate_v1_to_v2(mut snapshot: Snapshot) -> Result<Snapshot, ModelError> {
    for wagon in &mut snapshot.wagons {
        wagon.spec.wagon_type = WagonType::Freight;
    }
    snapshot.version = 2;
    Ok(snapshot)
}
