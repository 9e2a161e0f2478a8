//! The rumor board: every rumor spot on the map and the signal it carries.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::provider::{RumorProvider, SpotContext};
use super::signal::{RumorSignal, SignalTally};
use crate::core::ConfigError;
use crate::map::{Footprint, LocationId, Position};

/// A spot where an informant waits with one rumor.
#[derive(Clone, Debug)]
pub struct RumorSpot {
    pub id: LocationId,
    pub footprint: Footprint,
    pub signal: Arc<RumorSignal>,
}

/// All rumor spots of a session.
///
/// Signals are shared with the players who collect them; the board keeps
/// ownership of the originals and tracks which spots are used up.
#[derive(Clone, Debug)]
pub struct RumorBoard {
    spots: Vec<RumorSpot>,
    consumed: FxHashSet<LocationId>,
}

impl RumorBoard {
    /// Build a board from already classified signals.
    ///
    /// Spot ids follow the order given. More spots than a [`LocationId`]
    /// can number are rejected.
    pub fn from_signals(
        spot_size: i32,
        signals: impl IntoIterator<Item = (Position, RumorSignal)>,
    ) -> Result<Self, ConfigError> {
        let spots = signals
            .into_iter()
            .enumerate()
            .map(|(i, (position, signal))| {
                Ok(RumorSpot {
                    id: spot_id(i)?,
                    footprint: Footprint::new(position, spot_size),
                    signal: Arc::new(signal),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            spots,
            consumed: FxHashSet::default(),
        })
    }

    /// Ask `provider` for one rumor per position.
    ///
    /// A failed request never aborts assembly: the spot gets a neutral
    /// fallback signal instead.
    pub fn assemble(
        provider: &mut dyn RumorProvider,
        positions: &[Position],
        spot_size: i32,
    ) -> Result<Self, ConfigError> {
        tracing::debug!(spots = positions.len(), "assembling rumor board");
        if let Some(last) = positions.len().checked_sub(1) {
            spot_id(last)?;
        }

        let mut signals = Vec::with_capacity(positions.len());
        for (i, &position) in positions.iter().enumerate() {
            let context = SpotContext::new(spot_id(i)?, position);
            let signal = match provider.rumor_for(&context) {
                Ok(draft) => draft.into_signal(),
                Err(err) => {
                    tracing::warn!(location = %context.location, error = %err, "rumor provider failed, using fallback");
                    RumorSignal::fallback()
                }
            };
            signals.push((position, signal));
        }

        let board = Self::from_signals(spot_size, signals)?;
        let tally = board.tally();
        tracing::info!(
            up = tally.up,
            down = tally.down,
            neutral = tally.neutral,
            "rumor board ready"
        );
        Ok(board)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    #[must_use]
    pub fn spots(&self) -> &[RumorSpot] {
        &self.spots
    }

    #[must_use]
    pub fn spot(&self, id: LocationId) -> Option<&RumorSpot> {
        self.spots.get(id.index())
    }

    /// Spots overlapping `footprint`, in board order.
    #[must_use]
    pub fn overlapping(&self, footprint: &Footprint) -> SmallVec<[LocationId; 4]> {
        self.spots
            .iter()
            .filter(|spot| spot.footprint.overlaps(footprint))
            .map(|spot| spot.id)
            .collect()
    }

    #[must_use]
    pub fn is_consumed(&self, id: LocationId) -> bool {
        self.consumed.contains(&id)
    }

    pub(crate) fn consume(&mut self, id: LocationId) {
        self.consumed.insert(id);
    }

    /// Direction counts over the whole board.
    #[must_use]
    pub fn tally(&self) -> SignalTally {
        SignalTally::from_signals(self.spots.iter().map(|spot| spot.signal.as_ref()))
    }
}

fn spot_id(index: usize) -> Result<LocationId, ConfigError> {
    u16::try_from(index)
        .map(LocationId::new)
        .map_err(|_| ConfigError::TooManySpots(index + 1))
}
