//! Shared application service layer for consist.
//!
//! Front ends go through [`ConsistService`] for every train and wagon
//! operation, read [`AppConfig`] for store and logging settings, and map
//! [`AppError::kind`] to their own status codes.

pub mod config;
pub mod error;
pub mod service;

pub use config::{AppConfig, StoreBackend, StoreConfig};
pub use error::{AppError, AppResult, ErrorKind};
pub use cs_engine::TrainCalculation;
pub use service::{ConsistService, TrainSummary};
