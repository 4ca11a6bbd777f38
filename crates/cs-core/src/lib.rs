//! cs-core: stable foundation for consist.
//!
//! Contains:
//! - ids (compact non-zero record identifiers for trains and wagons)
//! - numeric (Real + sign checks + rounding)
//! - units (uom SI types + constructors for lengths and masses)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
