//! Named ball colors
//!
//! The setup screen picks unique colors from this palette; the stats screen
//! labels balls by the closest palette name.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::settings::Color;

#[derive(Debug, Clone, Copy)]
pub struct NamedColor {
    pub name: &'static str,
    pub color: Color,
}

pub const PALETTE: [NamedColor; 12] = [
    NamedColor { name: "Red", color: Color::new(231, 76, 60) },
    NamedColor { name: "Forest Green", color: Color::new(34, 139, 34) },
    NamedColor { name: "Blue", color: Color::new(52, 152, 219) },
    NamedColor { name: "Yellow", color: Color::new(241, 196, 15) },
    NamedColor { name: "Magenta", color: Color::new(255, 20, 147) },
    NamedColor { name: "Turquoise", color: Color::new(64, 224, 208) },
    NamedColor { name: "Orange", color: Color::new(255, 140, 0) },
    NamedColor { name: "Purple", color: Color::new(138, 43, 226) },
    NamedColor { name: "Gold", color: Color::new(255, 215, 0) },
    NamedColor { name: "Hot Pink", color: Color::new(255, 105, 180) },
    NamedColor { name: "Navy Blue", color: Color::new(25, 25, 112) },
    NamedColor { name: "Dark Magenta", color: Color::new(128, 0, 128) },
];

/// Name of the palette entry closest to `color`
pub fn color_name(color: Color) -> &'static str {
    PALETTE
        .iter()
        .min_by_key(|named| named.color.distance_sq(&color))
        .map(|named| named.name)
        .unwrap_or("Unknown")
}

/// Pick `count` distinct palette colors in random order.
///
/// Returns fewer than `count` if the palette runs out.
pub fn random_unique_colors<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Color> {
    let mut colors: Vec<Color> = PALETTE.iter().map(|named| named.color).collect();
    colors.shuffle(rng);
    colors.truncate(count);
    colors
}
