//! The seam to whatever writes the rumors.
//!
//! Rumor text is produced outside the engine, typically by a text-generation
//! service asked to answer with a JSON object:
//!
//! ```json
//! {"dialogue": "The northern dam has cracked!", "influence": "UP"}
//! ```
//!
//! A provider is an explicit collaborator handed to
//! [`RumorBoard::assemble`](super::RumorBoard::assemble); the engine never
//! owns a client of its own.

use std::collections::VecDeque;

use serde::Deserialize;
use thiserror::Error;

use super::signal::{RumorSignal, SignalDirection};
use crate::map::{LocationId, Position};

/// Longest dialogue kept from a provider, in characters.
pub const MAX_DIALOGUE_CHARS: usize = 30;

/// Dialogue used when a response carries none.
pub const MISSING_DIALOGUE_TEXT: &str = "No news worth sharing.";

/// Errors a provider can report. All of them are absorbed by the board
/// assembler into a neutral fallback signal.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("rumor provider unavailable: {0}")]
    Unavailable(String),

    #[error("malformed rumor response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Area of the village a spot belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    SouthFields,
    NorthPass,
    WestWell,
    EastMarket,
}

impl Region {
    /// Classify a spot by its position. South wins over north, north over
    /// west.
    #[must_use]
    pub fn of(position: Position) -> Self {
        if position.y > 600 {
            Region::SouthFields
        } else if position.y < 300 {
            Region::NorthPass
        } else if position.x < 300 {
            Region::WestWell
        } else {
            Region::EastMarket
        }
    }

    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            Region::SouthFields => "by the paddy fields south of the village",
            Region::NorthPass => "at the mountain path north of the village",
            Region::WestWell => "at the well on the west side of the village",
            Region::EastMarket => "at the market gate on the east side of the village",
        }
    }

    /// Who might be standing here.
    #[must_use]
    pub fn roles(self) -> &'static [&'static str] {
        match self {
            Region::SouthFields => &["farmer", "village head"],
            Region::NorthPass => &["wandering trader", "patrol officer"],
            Region::WestWell => &["villager", "peddler"],
            Region::EastMarket => &["rice dealer", "army quartermaster"],
        }
    }
}

/// What a provider knows about the spot it is writing for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpotContext {
    pub location: LocationId,
    pub position: Position,
    pub region: Region,
}

impl SpotContext {
    #[must_use]
    pub fn new(location: LocationId, position: Position) -> Self {
        Self {
            location,
            position,
            region: Region::of(position),
        }
    }
}

/// A provider's answer before it becomes an immutable signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RumorDraft {
    pub text: String,
    pub direction: SignalDirection,
}

impl RumorDraft {
    #[must_use]
    pub fn new(text: impl Into<String>, direction: SignalDirection) -> Self {
        Self {
            text: text.into(),
            direction,
        }
    }

    #[must_use]
    pub fn into_signal(self) -> RumorSignal {
        RumorSignal::new(self.direction, self.text)
    }
}

/// Source of rumors, one per spot.
pub trait RumorProvider {
    /// Produce the rumor told at `spot`.
    fn rumor_for(&mut self, spot: &SpotContext) -> Result<RumorDraft, ProviderError>;
}

#[derive(Deserialize)]
struct RawRumor {
    dialogue: Option<String>,
    influence: Option<String>,
}

/// Parse a provider's JSON answer into a draft.
///
/// Quotes are stripped from the dialogue and anything past
/// [`MAX_DIALOGUE_CHARS`] is cut and marked with `...`. A missing influence
/// is neutral.
pub fn parse_rumor_response(raw: &str) -> Result<RumorDraft, ProviderError> {
    let parsed: RawRumor = serde_json::from_str(raw)?;

    let dialogue = parsed
        .dialogue
        .unwrap_or_else(|| MISSING_DIALOGUE_TEXT.to_string());
    let direction = parsed
        .influence
        .as_deref()
        .map_or(SignalDirection::Neutral, SignalDirection::from_label);

    Ok(RumorDraft::new(clean_dialogue(&dialogue), direction))
}

fn clean_dialogue(dialogue: &str) -> String {
    let stripped: String = dialogue
        .trim()
        .chars()
        .filter(|c| *c != '"' && *c != '\'')
        .collect();

    if stripped.chars().count() > MAX_DIALOGUE_CHARS {
        let cut: String = stripped.chars().take(MAX_DIALOGUE_CHARS).collect();
        format!("{}...", cut.trim())
    } else {
        stripped
    }
}

/// Replays a fixed list of answers in order.
///
/// Once the script runs out every further request reports the provider as
/// unavailable.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: VecDeque<Result<RumorDraft, ProviderError>>,
}

impl ScriptedProvider {
    #[must_use]
    pub fn new(drafts: impl IntoIterator<Item = RumorDraft>) -> Self {
        Self {
            script: drafts.into_iter().map(Ok).collect(),
        }
    }

    /// Queue a failure as the next answer.
    #[must_use]
    pub fn then_fail(mut self, reason: impl Into<String>) -> Self {
        self.script
            .push_back(Err(ProviderError::Unavailable(reason.into())));
        self
    }

    /// Queue a successful answer.
    #[must_use]
    pub fn then(mut self, draft: RumorDraft) -> Self {
        self.script.push_back(Ok(draft));
        self
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RumorProvider for ScriptedProvider {
    fn rumor_for(&mut self, _spot: &SpotContext) -> Result<RumorDraft, ProviderError> {
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Unavailable("script exhausted".to_string())))
    }
}
