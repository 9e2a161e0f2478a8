//! Rumors: classified signals, the provider seam that writes them, and the
//! board that places them on the map.

pub mod board;
pub mod provider;
pub mod signal;

pub use board::{RumorBoard, RumorSpot};
pub use provider::{
    parse_rumor_response, ProviderError, Region, RumorDraft, RumorProvider, ScriptedProvider,
    SpotContext,
};
pub use signal::{RumorSignal, SignalDirection, SignalTally, FALLBACK_RUMOR_TEXT};
