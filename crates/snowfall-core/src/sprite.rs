//! Built-in snowflake shapes.

use serde::{Deserialize, Serialize};

use crate::{ImageBuffer, Rgba, SnowfallError};

/// Six-armed flake (7x7).
#[rustfmt::skip]
const FLAKE: [&str; 7] = [
    "#..#..#",
    ".#.#.#.",
    "..###..",
    "#######",
    "..###..",
    ".#.#.#.",
    "#..#..#",
];

/// Four-pointed star (5x5).
#[rustfmt::skip]
const STAR: [&str; 5] = [
    "..#..",
    "..#..",
    "#####",
    "..#..",
    "..#..",
];

/// Hollow crystal (5x5).
#[rustfmt::skip]
const CRYSTAL: [&str; 5] = [
    ".###.",
    "#.#.#",
    "#####",
    "#.#.#",
    ".###.",
];

/// Soft round dot (4x4).
#[rustfmt::skip]
const DOT: [&str; 4] = [
    ".##.",
    "####",
    "####",
    ".##.",
];

/// Built-in snowflake sprite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sprite {
    #[default]
    Flake,
    Star,
    Crystal,
    Dot,
}

impl Sprite {
    /// Every sprite, in cycling order.
    pub const ALL: [Sprite; 4] = [Sprite::Flake, Sprite::Star, Sprite::Crystal, Sprite::Dot];

    /// Cycle to the next sprite.
    pub fn next(self) -> Self {
        match self {
            Sprite::Flake => Sprite::Star,
            Sprite::Star => Sprite::Crystal,
            Sprite::Crystal => Sprite::Dot,
            Sprite::Dot => Sprite::Flake,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Sprite::Flake => "flake",
            Sprite::Star => "star",
            Sprite::Crystal => "crystal",
            Sprite::Dot => "dot",
        }
    }

    fn mask(self) -> &'static [&'static str] {
        match self {
            Sprite::Flake => &FLAKE,
            Sprite::Star => &STAR,
            Sprite::Crystal => &CRYSTAL,
            Sprite::Dot => &DOT,
        }
    }

    /// Render the sprite into an image tinted with `color`.
    pub fn image(self, color: Rgba) -> Result<ImageBuffer, SnowfallError> {
        ImageBuffer::from_mask(self.mask(), color)
    }
}
