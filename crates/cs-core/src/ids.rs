use core::fmt;
use core::num::NonZeroU64;
use core::str::FromStr;

use crate::CoreError;

/// Declares a compact, stable record identifier.
///
/// - `u64` matches the integer keys handed out by the record store
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        pub struct $name(NonZeroU64);

        impl $name {
            /// Wrap a raw key. Zero is never a valid key.
            pub fn new(raw: u64) -> Option<Self> {
                NonZeroU64::new(raw).map(Self)
            }

            /// The first key a fresh store hands out.
            pub fn first() -> Self {
                Self(NonZeroU64::MIN)
            }

            pub fn get(self) -> u64 {
                self.0.get()
            }

            /// The key following this one.
            pub fn next(self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.get())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.get())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u64>()
                    .ok()
                    .and_then(Self::new)
                    .ok_or(CoreError::InvalidArg {
                        what: concat!($label, " must be a positive integer"),
                    })
            }
        }
    };
}

record_id!(
    /// Identity of a train record.
    TrainId,
    "TrainId"
);

record_id!(
    /// Identity of a wagon record. Never reused, never re-parented.
    WagonId,
    "WagonId"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_an_id() {
        assert!(TrainId::new(0).is_none());
        assert!(WagonId::new(0).is_none());
        assert_eq!(WagonId::first().get(), 1);
    }

    #[test]
    fn next_is_monotonic() {
        let id = TrainId::first();
        assert_eq!(id.next().get(), 2);
        assert!(id.next() > id);
    }

    #[test]
    fn parse_from_str() {
        assert_eq!("42".parse::<WagonId>().unwrap().get(), 42);
        assert_eq!(" 7 ".parse::<TrainId>().unwrap().get(), 7);
        assert!("0".parse::<WagonId>().is_err());
        assert!("-3".parse::<WagonId>().is_err());
        assert!("abc".parse::<TrainId>().is_err());
    }

    #[test]
    fn option_id_is_small() {
        // This is a classic reason for NonZero: Option<Id> can be same size as Id.
        assert_eq!(
            core::mem::size_of::<WagonId>(),
            core::mem::size_of::<Option<WagonId>>()
        );
    }
}
