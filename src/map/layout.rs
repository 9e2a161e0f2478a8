//! Default map layout: rumor spots, starting squares and the market.

use super::geometry::{MapBounds, Position};

/// Where the informants stand on the default map.
pub const DEFAULT_RUMOR_SPOTS: [Position; 21] = [
    Position::new(50, 650),
    Position::new(150, 700),
    Position::new(250, 700),
    Position::new(50, 500),
    Position::new(150, 550),
    Position::new(250, 600),
    Position::new(350, 650),
    Position::new(700, 650),
    Position::new(600, 700),
    Position::new(500, 700),
    Position::new(750, 500),
    Position::new(650, 550),
    Position::new(550, 600),
    Position::new(450, 650),
    Position::new(200, 200),
    Position::new(350, 150),
    Position::new(450, 200),
    Position::new(600, 250),
    Position::new(100, 300),
    Position::new(500, 350),
    Position::new(700, 300),
];

/// Starting squares for the three default merchants: bottom-left,
/// bottom-right and top-centre.
#[must_use]
pub fn default_start_positions(bounds: MapBounds, token_size: i32) -> [Position; 3] {
    let bottom = bounds.height - token_size - 50;
    [
        Position::new(50, bottom),
        Position::new(bounds.width - token_size - 50, bottom),
        Position::new(bounds.width / 2 - token_size / 8, 110),
    ]
}

/// Top-left corner of the market, just below the map centre.
#[must_use]
pub fn default_market_position(bounds: MapBounds, step: i32) -> Position {
    Position::new(bounds.width / 2 - step + 10, bounds.height / 2 + 20)
}
