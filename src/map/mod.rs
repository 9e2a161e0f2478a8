//! Map model: coordinates, footprints, rumor spot identifiers, and the
//! default layout the game ships with.

pub mod geometry;
pub mod layout;

use serde::{Deserialize, Serialize};

pub use geometry::{Footprint, MapBounds, Position};
pub use layout::{default_market_position, default_start_positions, DEFAULT_RUMOR_SPOTS};

/// Identifier of a rumor spot on the map.
///
/// Spots are numbered in the order the board was assembled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationId(pub u16);

impl LocationId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Spot {}", self.0)
    }
}
