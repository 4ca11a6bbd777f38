//! Train aggregates derived from the current wagon list.

use cs_core::{Length, Mass, Ratio, in_m, in_t, m, round_to, t, unitless};
use cs_model::Wagon;
use serde::{Deserialize, Serialize};

/// Decimal places of every reported aggregate.
pub const REPORT_DECIMALS: u32 = 2;

/// Length, weight and braking percentage of a train.
///
/// `braking_percentage` is braked weight over train weight times 100
/// (a percentage, not per mille).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TrainCalculation {
    pub train_length_m: f64,
    pub train_weight_t: f64,
    pub braking_percentage: f64,
}

impl TrainCalculation {
    pub fn length(&self) -> Length {
        m(self.train_length_m)
    }

    pub fn weight(&self) -> Mass {
        t(self.train_weight_t)
    }

    /// Braked weight over train weight as a plain ratio.
    pub fn braking_ratio(&self) -> Ratio {
        unitless(self.braking_percentage / 100.0)
    }
}

/// Sum the wagons of one train. Pure; recompute after every mutation.
pub fn calculate<'a, I>(wagons: I) -> TrainCalculation
where
    I: IntoIterator<Item = &'a Wagon>,
{
    let mut length: Length = m(0.0);
    let mut weight: Mass = t(0.0);
    let mut braked_weight: Mass = t(0.0);

    for wagon in wagons {
        length += m(wagon.spec.length_m);
        weight += t(wagon.total_weight_t());
        braked_weight += t(wagon.spec.braked_weight_t);
    }

    let (length, weight, braked_weight) = (in_m(length), in_t(weight), in_t(braked_weight));
    let braking_percentage = if weight > 0.0 {
        braked_weight / weight * 100.0
    } else {
        0.0
    };

    TrainCalculation {
        train_length_m: round_to(length, REPORT_DECIMALS),
        train_weight_t: round_to(weight, REPORT_DECIMALS),
        braking_percentage: round_to(braking_percentage, REPORT_DECIMALS),
    }
}
