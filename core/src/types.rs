//! Shared primitive types used across the entire pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based position of a record in a generation run.
pub type RideIndex = u64;

/// Hour of day, 0..=23.
pub type Hour = u32;

/// The six service zones. Declaration order is alphabetical, which is
/// also the order every zone-keyed table is sorted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    Gldani,
    Nadzaladevi,
    #[serde(rename = "Old Town")]
    OldTown,
    Saburtalo,
    Shardeni,
    Vake,
}

impl Zone {
    pub const ALL: [Zone; 6] = [
        Zone::Gldani,
        Zone::Nadzaladevi,
        Zone::OldTown,
        Zone::Saburtalo,
        Zone::Shardeni,
        Zone::Vake,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gldani      => "Gldani",
            Self::Nadzaladevi => "Nadzaladevi",
            Self::OldTown     => "Old Town",
            Self::Saburtalo   => "Saburtalo",
            Self::Shardeni    => "Shardeni",
            Self::Vake        => "Vake",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VehicleType {
    Economy,
    Comfort,
    XL,
}

impl VehicleType {
    pub const ALL: [VehicleType; 3] = [VehicleType::Economy, VehicleType::Comfort, VehicleType::XL];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Comfort => "Comfort",
            Self::XL      => "XL",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
