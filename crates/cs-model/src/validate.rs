//! Payload and snapshot validation logic.

use crate::schema::{NewTrain, Snapshot, TrainPatch, WagonSpec};
use cs_core::{CoreResult, Real, TrainId, ensure_non_negative, ensure_positive};
use std::collections::{BTreeMap, HashSet};

pub const MAX_TRAIN_NAME_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_IDENTIFIER_LEN: usize = 100;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Positions of train {train_id} are not contiguous: {positions:?}")]
    Positions {
        train_id: TrainId,
        positions: Vec<u32>,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: impl ToString) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn numeric(field: &str, value: Real, checked: CoreResult<Real>) -> Result<(), ValidationError> {
    checked.map(|_| ()).map_err(|err| invalid(field, value, err))
}

fn bounded_text(field: &str, value: &str, max_len: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(invalid(
            field,
            format!("<{len} chars>"),
            format!("longer than {max_len} characters"),
        ));
    }
    Ok(())
}

pub fn validate_train_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(invalid("name", "\"\"", "must not be empty"));
    }
    bounded_text("name", name, MAX_TRAIN_NAME_LEN)
}

pub fn validate_new_train(payload: &NewTrain) -> Result<(), ValidationError> {
    validate_train_name(&payload.name)?;
    if let Some(description) = &payload.description {
        bounded_text("description", description, MAX_DESCRIPTION_LEN)?;
    }
    Ok(())
}

pub fn validate_train_patch(patch: &TrainPatch) -> Result<(), ValidationError> {
    if let Some(name) = &patch.name {
        validate_train_name(name)?;
    }
    if let Some(description) = &patch.description {
        bounded_text("description", description, MAX_DESCRIPTION_LEN)?;
    }
    Ok(())
}

/// `length_m > 0`, all weights `>= 0`, every float finite.
pub fn validate_wagon_spec(spec: &WagonSpec) -> Result<(), ValidationError> {
    numeric(
        "length_m",
        spec.length_m,
        ensure_positive(spec.length_m, "length_m"),
    )?;
    numeric(
        "tare_weight_t",
        spec.tare_weight_t,
        ensure_non_negative(spec.tare_weight_t, "tare_weight_t"),
    )?;
    numeric(
        "load_weight_t",
        spec.load_weight_t,
        ensure_non_negative(spec.load_weight_t, "load_weight_t"),
    )?;
    numeric(
        "braked_weight_t",
        spec.braked_weight_t,
        ensure_non_negative(spec.braked_weight_t, "braked_weight_t"),
    )?;
    if let Some(identifier) = &spec.identifier {
        bounded_text("identifier", identifier, MAX_IDENTIFIER_LEN)?;
    }
    Ok(())
}

pub fn validate_snapshot(snapshot: &Snapshot) -> Result<(), ValidationError> {
    if snapshot.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: snapshot.version,
        });
    }

    let mut train_ids = HashSet::new();
    for train in &snapshot.trains {
        if !train_ids.insert(train.id) {
            return Err(ValidationError::DuplicateId {
                id: train.id.to_string(),
                context: "trains".to_string(),
            });
        }
        validate_train_name(&train.name)?;
    }

    let mut wagon_ids = HashSet::new();
    let mut positions: BTreeMap<TrainId, Vec<u32>> = BTreeMap::new();
    for wagon in &snapshot.wagons {
        if !wagon_ids.insert(wagon.id) {
            return Err(ValidationError::DuplicateId {
                id: wagon.id.to_string(),
                context: "wagons".to_string(),
            });
        }
        if !train_ids.contains(&wagon.train_id) {
            return Err(ValidationError::MissingReference {
                id: wagon.train_id.to_string(),
                context: format!("wagon {} train_id", wagon.id),
            });
        }
        validate_wagon_spec(&wagon.spec)?;
        positions
            .entry(wagon.train_id)
            .or_default()
            .push(wagon.position);
    }

    for (train_id, mut seen) in positions {
        seen.sort_unstable();
        let contiguous = seen.iter().zip(1u32..).all(|(p, expected)| *p == expected);
        if !contiguous {
            return Err(ValidationError::Positions {
                train_id,
                positions: seen,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BrakeType, WagonType};

    fn spec() -> WagonSpec {
        WagonSpec {
            identifier: None,
            length_m: 15.0,
            tare_weight_t: 18.0,
            load_weight_t: 10.0,
            braked_weight_t: 15.0,
            brake_type: BrakeType::G,
            axle_count: None,
            wagon_type: WagonType::Freight,
        }
    }

    #[test]
    fn accepts_valid_spec() {
        validate_wagon_spec(&spec()).unwrap();
    }

    #[test]
    fn zero_weights_are_fine() {
        let s = WagonSpec {
            tare_weight_t: 0.0,
            load_weight_t: 0.0,
            braked_weight_t: 0.0,
            ..spec()
        };
        validate_wagon_spec(&s).unwrap();
    }

    #[test]
    fn rejects_non_positive_length() {
        for bad in [0.0, -1.0, f64::NAN] {
            let s = WagonSpec {
                length_m: bad,
                ..spec()
            };
            let err = validate_wagon_spec(&s).unwrap_err();
            assert!(
                matches!(&err, ValidationError::InvalidValue { field, .. } if field == "length_m")
            );
        }
    }

    #[test]
    fn rejects_negative_weights() {
        let s = WagonSpec {
            braked_weight_t: -0.1,
            ..spec()
        };
        let err = validate_wagon_spec(&s).unwrap_err();
        assert!(err.to_string().contains("braked_weight_t"));
    }

    #[test]
    fn rejects_blank_train_name() {
        assert!(validate_train_name("").is_err());
        assert!(validate_train_name("   ").is_err());
        assert!(validate_train_name("IC 2013").is_ok());
        assert!(validate_train_name(&"x".repeat(MAX_TRAIN_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn patch_name_is_checked_only_when_present() {
        assert!(validate_train_patch(&TrainPatch::default()).is_ok());
        let patch = TrainPatch {
            name: Some(String::new()),
            description: None,
        };
        assert!(validate_train_patch(&patch).is_err());
    }
}
