//! Record and payload definitions.

use chrono::{DateTime, Utc};
use cs_core::{TrainId, WagonId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Train {
    pub id: TrainId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a train.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewTrain {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update of a train. An empty `description` clears it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TrainPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TrainPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum BrakeType {
    /// Goods train regime.
    G,
    /// Passenger train regime.
    #[default]
    P,
    /// Rapid regime.
    R,
}

impl BrakeType {
    pub const ALL: [BrakeType; 3] = [BrakeType::G, BrakeType::P, BrakeType::R];

    pub fn as_str(self) -> &'static str {
        match self {
            BrakeType::G => "G",
            BrakeType::P => "P",
            BrakeType::R => "R",
        }
    }
}

impl fmt::Display for BrakeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrakeType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "G" => Ok(BrakeType::G),
            "P" => Ok(BrakeType::P),
            "R" => Ok(BrakeType::R),
            other => Err(UnknownVariant {
                kind: "brake type",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum WagonType {
    Locomotive,
    ControlCar,
    #[default]
    Passenger,
    Freight,
}

impl WagonType {
    pub const ALL: [WagonType; 4] = [
        WagonType::Locomotive,
        WagonType::ControlCar,
        WagonType::Passenger,
        WagonType::Freight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WagonType::Locomotive => "locomotive",
            WagonType::ControlCar => "control_car",
            WagonType::Passenger => "passenger",
            WagonType::Freight => "freight",
        }
    }
}

impl fmt::Display for WagonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WagonType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('-', "_");
        WagonType::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or(UnknownVariant {
                kind: "wagon type",
                value: s.to_string(),
            })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Every wagon attribute that is not identity or placement.
///
/// Cloning a wagon copies exactly this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WagonSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub length_m: f64,
    pub tare_weight_t: f64,
    pub load_weight_t: f64,
    pub braked_weight_t: f64,
    #[serde(default)]
    pub brake_type: BrakeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axle_count: Option<u32>,
    #[serde(default)]
    pub wagon_type: WagonType,
}

impl WagonSpec {
    pub fn total_weight_t(&self) -> f64 {
        self.tare_weight_t + self.load_weight_t
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wagon {
    pub id: WagonId,
    pub train_id: TrainId,
    /// 1-based, contiguous within the train.
    pub position: u32,
    #[serde(flatten)]
    pub spec: WagonSpec,
}

impl Wagon {
    pub fn total_weight_t(&self) -> f64 {
        self.spec.total_weight_t()
    }
}

/// Payload for creating a wagon. Without a position the wagon is appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewWagon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(flatten)]
    pub spec: WagonSpec,
}

/// Partial update of a wagon. A new `position` moves the wagon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WagonPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tare_weight_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_weight_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub braked_weight_t: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brake_type: Option<BrakeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axle_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wagon_type: Option<WagonType>,
}

impl WagonPatch {
    /// Spec with the patched fields applied. An empty identifier clears it.
    pub fn applied_to(&self, spec: &WagonSpec) -> WagonSpec {
        let mut next = spec.clone();
        if let Some(identifier) = &self.identifier {
            next.identifier = if identifier.is_empty() {
                None
            } else {
                Some(identifier.clone())
            };
        }
        if let Some(v) = self.length_m {
            next.length_m = v;
        }
        if let Some(v) = self.tare_weight_t {
            next.tare_weight_t = v;
        }
        if let Some(v) = self.load_weight_t {
            next.load_weight_t = v;
        }
        if let Some(v) = self.braked_weight_t {
            next.braked_weight_t = v;
        }
        if let Some(v) = self.brake_type {
            next.brake_type = v;
        }
        if let Some(v) = self.axle_count {
            next.axle_count = Some(v);
        }
        if let Some(v) = self.wagon_type {
            next.wagon_type = v;
        }
        next
    }
}

/// Full dump of the record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub version: u32,
    #[serde(default)]
    pub trains: Vec<Train>,
    #[serde(default)]
    pub wagons: Vec<Wagon>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            trains: Vec::new(),
            wagons: Vec::new(),
        }
    }
}
