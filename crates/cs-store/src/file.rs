//! JSON-file record store.
//!
//! Layout under the root directory:
//! - `sequence.json`: next free train and wagon keys
//! - `trains/<train_id>.json`: one train record
//! - `wagons/<train_id>/<wagon_id>.json`: one wagon record, grouped by owner

use crate::store::{RecordStore, WagonBatch};
use crate::{StoreError, StoreResult};
use cs_core::{TrainId, WagonId};
use cs_model::{LATEST_VERSION, Snapshot, Train, Wagon};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Sequence {
    next_train: TrainId,
    next_wagon: WagonId,
}

impl Default for Sequence {
    fn default() -> Self {
        Self {
            next_train: TrainId::first(),
            next_wagon: WagonId::first(),
        }
    }
}

/// Records stored as individual JSON files.
///
/// Single-process: the store serializes its own key allocation, and callers
/// serialize writes per train.
#[derive(Debug)]
pub struct FileStore {
    root_dir: PathBuf,
    sequence: Mutex<()>,
}

impl FileStore {
    pub fn new(root_dir: PathBuf) -> StoreResult<Self> {
        fs::create_dir_all(root_dir.join("trains"))?;
        fs::create_dir_all(root_dir.join("wagons"))?;
        Ok(Self {
            root_dir,
            sequence: Mutex::new(()),
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn sequence_path(&self) -> PathBuf {
        self.root_dir.join("sequence.json")
    }

    fn train_path(&self, id: TrainId) -> PathBuf {
        self.root_dir.join("trains").join(format!("{id}.json"))
    }

    fn wagon_dir(&self, train_id: TrainId) -> PathBuf {
        self.root_dir.join("wagons").join(train_id.to_string())
    }

    fn wagon_path(&self, train_id: TrainId, wagon_id: WagonId) -> PathBuf {
        self.wagon_dir(train_id).join(format!("{wagon_id}.json"))
    }

    fn load_sequence(&self) -> StoreResult<Sequence> {
        let path = self.sequence_path();
        if !path.exists() {
            return Ok(Sequence::default());
        }
        read_record(&path)
    }

    fn with_sequence<T>(&self, f: impl FnOnce(&mut Sequence) -> T) -> StoreResult<T> {
        let _guard = self.sequence.lock();
        let mut sequence = self.load_sequence()?;
        let out = f(&mut sequence);
        write_record(&self.sequence_path(), &sequence)?;
        Ok(out)
    }

    /// Owner of a stored wagon, found by scanning the per-train directories.
    fn wagon_owner(&self, wagon_id: WagonId) -> StoreResult<Option<TrainId>> {
        let file_name = format!("{wagon_id}.json");
        for entry in fs::read_dir(self.root_dir.join("wagons"))? {
            let entry = entry?;
            if entry.path().join(&file_name).exists() {
                let owner = entry.file_name().to_string_lossy().parse::<TrainId>();
                return match owner {
                    Ok(id) => Ok(Some(id)),
                    Err(err) => Err(StoreError::Corrupt {
                        path: entry.path(),
                        reason: err.to_string(),
                    }),
                };
            }
        }
        Ok(None)
    }
}

fn read_record<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|err| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// `None` when the file is gone, including when it vanished mid-read.
fn read_optional<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    match read_record(path) {
        Ok(record) => Ok(Some(record)),
        Err(StoreError::Io(err)) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

// Temp file + rename: readers see the old record or the new one.
fn write_record<T: Serialize>(path: &Path, record: &T) -> StoreResult<()> {
    let tmp = stage_record(path, record)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn stage_record<T: Serialize>(path: &Path, record: &T) -> StoreResult<PathBuf> {
    let json = serde_json::to_string_pretty(record)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    Ok(tmp)
}

/// Every record in `dir`. Records deleted while listing are skipped.
fn read_dir_records<T: DeserializeOwned>(dir: &Path) -> StoreResult<Vec<T>> {
    let mut records = Vec::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(records),
        Err(err) => return Err(err.into()),
    };
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json")
            && let Some(record) = read_optional(&path)?
        {
            records.push(record);
        }
    }
    Ok(records)
}

fn replace_dir(from: &Path, to: &Path) -> StoreResult<()> {
    if to.exists() {
        fs::remove_dir_all(to)?;
    }
    fs::rename(from, to)?;
    Ok(())
}

impl RecordStore for FileStore {
    fn allocate_train_id(&self) -> StoreResult<TrainId> {
        self.with_sequence(|seq| {
            let id = seq.next_train;
            seq.next_train = id.next();
            id
        })
    }

    fn allocate_wagon_ids(&self, count: usize) -> StoreResult<Vec<WagonId>> {
        self.with_sequence(|seq| {
            (0..count)
                .map(|_| {
                    let id = seq.next_wagon;
                    seq.next_wagon = id.next();
                    id
                })
                .collect()
        })
    }

    fn put_train(&self, train: &Train) -> StoreResult<()> {
        fs::create_dir_all(self.wagon_dir(train.id))?;
        write_record(&self.train_path(train.id), train)
    }

    fn get_train(&self, id: TrainId) -> StoreResult<Option<Train>> {
        read_optional(&self.train_path(id))
    }

    fn list_trains(&self) -> StoreResult<Vec<Train>> {
        read_dir_records(&self.root_dir.join("trains"))
    }

    fn delete_train(&self, id: TrainId) -> StoreResult<bool> {
        let path = self.train_path(id);
        if !path.exists() {
            return Ok(false);
        }
        // Wagons first, train record last.
        let wagons = self.wagon_dir(id);
        if wagons.exists() {
            fs::remove_dir_all(wagons)?;
        }
        fs::remove_file(path)?;
        debug!(train_id = %id, "deleted train files");
        Ok(true)
    }

    fn train_wagons(&self, train_id: TrainId) -> StoreResult<Vec<Wagon>> {
        read_dir_records(&self.wagon_dir(train_id))
    }

    fn commit_wagons(&self, train_id: TrainId, batch: &WagonBatch) -> StoreResult<()> {
        if !self.train_path(train_id).exists() {
            return Err(StoreError::UnknownTrain(train_id));
        }
        for wagon in &batch.upserts {
            let owner = if self.wagon_path(train_id, wagon.id).exists() {
                train_id
            } else {
                self.wagon_owner(wagon.id)?.unwrap_or(wagon.train_id)
            };
            if owner != train_id || wagon.train_id != train_id {
                return Err(StoreError::Reparent {
                    wagon_id: wagon.id,
                    owner,
                    requested: train_id,
                });
            }
        }

        fs::create_dir_all(self.wagon_dir(train_id))?;

        // Stage every upsert first; a failed write leaves the stored records untouched.
        let mut staged = Vec::with_capacity(batch.upserts.len());
        for wagon in &batch.upserts {
            let path = self.wagon_path(train_id, wagon.id);
            match stage_record(&path, wagon) {
                Ok(tmp) => staged.push((tmp, path)),
                Err(err) => {
                    for (tmp, _) in &staged {
                        let _ = fs::remove_file(tmp);
                    }
                    let _ = fs::remove_file(path.with_extension("json.tmp"));
                    return Err(err);
                }
            }
        }
        for (tmp, path) in &staged {
            fs::rename(tmp, path)?;
        }
        for wagon_id in &batch.removals {
            let path = self.wagon_path(train_id, *wagon_id);
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        debug!(
            train_id = %train_id,
            upserts = batch.upserts.len(),
            removals = batch.removals.len(),
            "committed wagon batch"
        );
        Ok(())
    }

    fn dump(&self) -> StoreResult<Snapshot> {
        let trains = self.list_trains()?;
        let mut wagons = Vec::new();
        for train in &trains {
            wagons.extend(self.train_wagons(train.id)?);
        }
        Ok(Snapshot {
            version: LATEST_VERSION,
            trains,
            wagons,
        })
    }

    fn restore(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let known: std::collections::HashSet<TrainId> =
            snapshot.trains.iter().map(|t| t.id).collect();
        if let Some(orphan) = snapshot.wagons.iter().find(|w| !known.contains(&w.train_id)) {
            return Err(StoreError::UnknownTrain(orphan.train_id));
        }

        let _guard = self.sequence.lock();

        // Build the new content beside the live one, then swap directories.
        let staging = self.root_dir.join("restore.staging");
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(staging.join("trains"))?;
        fs::create_dir_all(staging.join("wagons"))?;

        let mut sequence = Sequence::default();
        for train in &snapshot.trains {
            fs::create_dir_all(staging.join("wagons").join(train.id.to_string()))?;
            write_record(
                &staging.join("trains").join(format!("{}.json", train.id)),
                train,
            )?;
            if train.id >= sequence.next_train {
                sequence.next_train = train.id.next();
            }
        }
        for wagon in &snapshot.wagons {
            let path = staging
                .join("wagons")
                .join(wagon.train_id.to_string())
                .join(format!("{}.json", wagon.id));
            write_record(&path, wagon)?;
            if wagon.id >= sequence.next_wagon {
                sequence.next_wagon = wagon.id.next();
            }
        }

        let retired = self.root_dir.join("restore.retired");
        if retired.exists() {
            fs::remove_dir_all(&retired)?;
        }
        fs::create_dir_all(&retired)?;
        for dir in ["trains", "wagons"] {
            let live = self.root_dir.join(dir);
            if live.exists() {
                fs::rename(&live, retired.join(dir))?;
            }
            replace_dir(&staging.join(dir), &live)?;
        }
        fs::remove_dir_all(&retired)?;
        fs::remove_dir_all(&staging)?;
        debug!(
            trains = snapshot.trains.len(),
            wagons = snapshot.wagons.len(),
            "restored store"
        );
        write_record(&self.sequence_path(), &sequence)?;
        Ok(())
    }
}
