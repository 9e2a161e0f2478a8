//! Classified rumor signals and their aggregate tally.

use serde::{Deserialize, Serialize};

/// Text shown for a rumor whose generation failed.
pub const FALLBACK_RUMOR_TEXT: &str = "Connection lost: nobody knows where rice prices are headed.";

/// Which way a rumor pushes the price.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalDirection {
    Increase,
    Decrease,
    #[default]
    Neutral,
}

impl SignalDirection {
    /// Read a provider influence label.
    ///
    /// `UP` and `DOWN` are matched case-insensitively; every other label,
    /// including an empty one, is neutral.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "UP" => SignalDirection::Increase,
            "DOWN" => SignalDirection::Decrease,
            _ => SignalDirection::Neutral,
        }
    }
}

impl std::fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalDirection::Increase => write!(f, "UP"),
            SignalDirection::Decrease => write!(f, "DOWN"),
            SignalDirection::Neutral => write!(f, "NONE"),
        }
    }
}

/// An immutable, classified piece of market gossip.
///
/// The text is opaque to the engine; only `direction` takes part in
/// settlement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RumorSignal {
    direction: SignalDirection,
    text: String,
}

impl RumorSignal {
    #[must_use]
    pub fn new(direction: SignalDirection, text: impl Into<String>) -> Self {
        Self {
            direction,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn increase(text: impl Into<String>) -> Self {
        Self::new(SignalDirection::Increase, text)
    }

    #[must_use]
    pub fn decrease(text: impl Into<String>) -> Self {
        Self::new(SignalDirection::Decrease, text)
    }

    #[must_use]
    pub fn neutral(text: impl Into<String>) -> Self {
        Self::new(SignalDirection::Neutral, text)
    }

    /// The signal substituted when the provider could not produce one.
    #[must_use]
    pub fn fallback() -> Self {
        Self::neutral(FALLBACK_RUMOR_TEXT)
    }

    #[must_use]
    pub fn direction(&self) -> SignalDirection {
        self.direction
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Count of signals by direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalTally {
    pub up: u32,
    pub down: u32,
    pub neutral: u32,
}

impl SignalTally {
    /// Tally every signal yielded, duplicates included.
    pub fn from_signals<'a>(signals: impl IntoIterator<Item = &'a RumorSignal>) -> Self {
        let mut tally = Self::default();
        for signal in signals {
            tally.record(signal.direction());
        }
        tally
    }

    pub fn record(&mut self, direction: SignalDirection) {
        match direction {
            SignalDirection::Increase => self.up += 1,
            SignalDirection::Decrease => self.down += 1,
            SignalDirection::Neutral => self.neutral += 1,
        }
    }

    /// Price multiplier: `1 + weight * up - weight * down`.
    ///
    /// Evaluated term by term in that order; the settled price truncates
    /// this value, so the rounding of each step is part of the result.
    /// Unbounded; a large enough surplus of decrease signals makes it
    /// negative.
    #[must_use]
    pub fn signal_factor(&self, weight: f64) -> f64 {
        1.0 + weight * f64::from(self.up) - weight * f64::from(self.down)
    }
}
