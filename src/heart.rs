// Copyright (c) 2026 mara_velin

use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::style::Color;
use rand::Rng;

use crate::runtime::{HeartStyle, SizeClass, TwinklePhase};
use crate::sprite::Sprite;

/// Seconds between twinkle re-rolls once a heart is falling.
pub const TWINKLE_MIN_S: f32 = 0.15;
pub const TWINKLE_MAX_S: f32 = 0.6;

/// Inclusive axis-aligned bounds. `right`/`bottom` are one past the
/// glyph extent and the overlap test is inclusive on all four sides,
/// which widens every box by one cell of breathing room.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BBox {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl BBox {
    pub fn intersects(&self, other: &BBox) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.bottom < other.top
            || self.top > other.bottom)
    }
}

/// One falling heart. Mutated in place every tick; the sprite handle
/// and speed are fixed for its whole life.
#[derive(Clone, Debug)]
pub struct Heart {
    pub col: u16,
    pub y: f32,
    pub speed: f32,
    #[allow(dead_code)]
    pub size: SizeClass,
    #[allow(dead_code)]
    pub style: HeartStyle,
    pub fg: Option<Color>,
    pub sprite: Rc<Sprite>,
    pub twinkle: TwinklePhase,
    pub twinkle_next: Instant,
}

impl Heart {
    pub fn top(&self) -> i32 {
        self.y as i32
    }

    /// Leftmost screen column; sprites are centered on `col`.
    pub fn left(&self) -> i32 {
        self.col as i32 - self.sprite.width() as i32 / 2
    }

    pub fn bbox(&self) -> BBox {
        let left = self.left();
        let top = self.top();
        BBox {
            left,
            right: left + self.sprite.width() as i32,
            top,
            bottom: top + self.sprite.height() as i32,
        }
    }

    pub fn overlaps(&self, other: &Heart) -> bool {
        self.bbox().intersects(&other.bbox())
    }

    /// One tick: fall by `speed`, and re-roll the twinkle phase when
    /// its timer is due. A re-roll always reschedules the next check.
    pub fn advance(&mut self, now: Instant, rng: &mut impl Rng) {
        self.y += self.speed;
        if now >= self.twinkle_next {
            self.twinkle = match rng.random_range(0..3u8) {
                0 => TwinklePhase::Normal,
                1 => TwinklePhase::Bright,
                _ => TwinklePhase::Faint,
            };
            self.twinkle_next =
                now + Duration::from_secs_f32(rng.random_range(TWINKLE_MIN_S..TWINKLE_MAX_S));
        }
    }
}
