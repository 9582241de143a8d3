// Copyright (c) 2026 mara_velin

use std::collections::HashMap;
use std::rc::Rc;

use crate::runtime::{HeartStyle, SizeClass};

pub const TRANSPARENT: char = ' ';

/// Dainty hearts, picked for small outline spawns.
pub const HEARTS_DAINTY: &[char] = &['♡', '❥', 'ღ'];
/// Solid hearts, the default pool for everything else.
pub const HEARTS_FILLED: &[char] = &['♥'];
/// Reserved: the spawn weights never select Large.
#[allow(dead_code)]
pub const HEARTS_EMOJI: &[char] = &['💖', '💗', '💕', '💞', '💓', '💝', '💟'];

/// Characters the rasterizer draws with. The ASCII set exists for
/// locales where the dotted glyphs would render as mojibake.
#[derive(Clone, Copy, Debug)]
pub struct FillChars {
    pub dense: char,
    pub sparse: char,
    pub outline: char,
}

impl FillChars {
    pub const UNICODE: FillChars = FillChars {
        dense: '•',
        sparse: '·',
        outline: '·',
    };
    pub const ASCII: FillChars = FillChars {
        dense: '*',
        sparse: '.',
        outline: '.',
    };
}

/// A rectangular glyph grid with `TRANSPARENT` marking holes. Every
/// row has exactly `width` chars. Sprites are immutable once built;
/// hearts share them by `Rc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    rows: Vec<Vec<char>>,
    width: u16,
    height: u16,
}

impl Sprite {
    /// 1x1 sprite holding a literal glyph, the spawn pools' path.
    pub fn from_glyph(ch: char) -> Self {
        Self {
            rows: vec![vec![ch]],
            width: 1,
            height: 1,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }
}

pub fn target_dims(size: SizeClass) -> (usize, usize) {
    match size {
        SizeClass::Small => (9, 8),
        SizeClass::Medium => (13, 11),
        SizeClass::Large => (17, 15),
    }
}

/// Supersampled coverage (0..1 per cell) of the heart curve
/// `(x² + y² − 1)³ − x²y³ <= ε` over a width x height cell grid.
/// The curve is evaluated in a [-1,1]² frame with an aspect scale on
/// x and an inward shrink so the lobes are not clipped at the edges.
pub fn heart_coverage(width: usize, height: usize) -> Vec<Vec<f64>> {
    let x_scale = if width <= 9 { 1.18 } else { 1.12 };
    let shrink = if width <= 7 { 0.90 } else { 0.95 };
    // tiny grids need a relaxed inside test or the waist vanishes
    let threshold = if width <= 7 { 0.01 } else { 0.0 };
    let ss = if width <= 9 { 4usize } else { 3usize };
    let inv = 1.0 / ss as f64;

    let h_span = (height as f64 - 1.0).max(1.0);
    let w_span = (width as f64 - 1.0).max(1.0);

    let mut grid = Vec::with_capacity(height);
    for row in 0..height {
        let mut line = Vec::with_capacity(width);
        for col in 0..width {
            let mut inside_count = 0u32;
            for sr in 0..ss {
                for sc in 0..ss {
                    let fr = (row as f64 + (sr as f64 + 0.5) * inv) / h_span;
                    let fc = (col as f64 + (sc as f64 + 0.5) * inv) / w_span;
                    let y = (1.0 - 2.0 * fr) * shrink;
                    let x = (-1.0 + 2.0 * fc) * x_scale * shrink;
                    let v = x * x + y * y - 1.0;
                    if v * v * v - x * x * (y * y * y) <= threshold {
                        inside_count += 1;
                    }
                }
            }
            line.push(inside_count as f64 / (ss * ss) as f64);
        }
        grid.push(line);
    }
    grid
}

fn char_from_coverage(cov: f64, style: HeartStyle, chars: FillChars) -> char {
    match style {
        HeartStyle::Outline => {
            if (0.25..=0.75).contains(&cov) {
                chars.outline
            } else {
                TRANSPARENT
            }
        }
        HeartStyle::Filled => {
            if cov >= 0.66 {
                chars.dense
            } else if cov >= 0.3 {
                chars.sparse
            } else {
                TRANSPARENT
            }
        }
    }
}

/// Convert a coverage grid into a sprite: map coverage to glyphs,
/// drop blank leading/trailing rows, then pad every remaining row to
/// the widest row. Degenerate input yields an empty sprite.
pub fn coverage_to_sprite(coverage: &[Vec<f64>], style: HeartStyle, chars: FillChars) -> Sprite {
    let mut rows: Vec<Vec<char>> = coverage
        .iter()
        .map(|line| {
            let mut out: Vec<char> = line
                .iter()
                .map(|&cov| char_from_coverage(cov, style, chars))
                .collect();
            while out.last() == Some(&TRANSPARENT) {
                out.pop();
            }
            out
        })
        .collect();

    while rows.first().is_some_and(|r| r.is_empty()) {
        rows.remove(0);
    }
    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }

    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    for r in &mut rows {
        r.resize(width, TRANSPARENT);
    }

    let height = rows.len();
    Sprite {
        rows,
        width: width as u16,
        height: height as u16,
    }
}

pub fn rasterize(size: SizeClass, style: HeartStyle, chars: FillChars) -> Sprite {
    let (w, h) = target_dims(size);
    coverage_to_sprite(&heart_coverage(w, h), style, chars)
}

/// Rasterized sprites for every (size, style) pair, built once at
/// startup. Hearts hold `Rc` handles into it, never copies.
pub struct SpriteCache {
    sprites: HashMap<(SizeClass, HeartStyle), Rc<Sprite>>,
}

impl SpriteCache {
    pub fn new(chars: FillChars) -> Self {
        let mut sprites = HashMap::new();
        for size in [SizeClass::Small, SizeClass::Medium, SizeClass::Large] {
            for style in [HeartStyle::Filled, HeartStyle::Outline] {
                sprites.insert((size, style), Rc::new(rasterize(size, style, chars)));
            }
        }
        Self { sprites }
    }

    pub fn get(&self, size: SizeClass, style: HeartStyle) -> Rc<Sprite> {
        Rc::clone(&self.sprites[&(size, style)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_pairs() -> Vec<(SizeClass, HeartStyle)> {
        let mut v = Vec::new();
        for size in [SizeClass::Small, SizeClass::Medium, SizeClass::Large] {
            for style in [HeartStyle::Filled, HeartStyle::Outline] {
                v.push((size, style));
            }
        }
        v
    }

    #[test]
    fn sprites_have_uniform_rows_and_no_blank_edges() {
        for (size, style) in all_pairs() {
            let s = rasterize(size, style, FillChars::UNICODE);
            assert!(s.height() > 0, "{:?}/{:?} came out empty", size, style);
            for row in s.rows() {
                assert_eq!(row.len(), s.width() as usize);
            }
            let first = &s.rows()[0];
            let last = &s.rows()[s.height() as usize - 1];
            assert!(first.iter().any(|&c| c != TRANSPARENT));
            assert!(last.iter().any(|&c| c != TRANSPARENT));
        }
    }

    #[test]
    fn center_cell_is_covered_for_non_degenerate_sizes() {
        for (w, h) in [(5, 5), (7, 6), (9, 8), (13, 11), (17, 15)] {
            let cov = heart_coverage(w, h);
            assert!(
                cov[h / 2][w / 2] > 0.0,
                "no center coverage at {}x{}",
                w,
                h
            );
        }
    }

    #[test]
    fn degenerate_size_yields_empty_sprite_without_panic() {
        let s = coverage_to_sprite(&heart_coverage(0, 0), HeartStyle::Filled, FillChars::UNICODE);
        assert_eq!(s.width() as usize * s.height() as usize, 0);
        // a single outline cell has coverage outside the mid-band
        let o = coverage_to_sprite(&heart_coverage(1, 1), HeartStyle::Outline, FillChars::UNICODE);
        assert_eq!(o.height(), 0);
    }

    #[test]
    fn outline_sprites_only_use_the_outline_char() {
        let s = rasterize(SizeClass::Medium, HeartStyle::Outline, FillChars::UNICODE);
        for row in s.rows() {
            for &c in row {
                assert!(c == TRANSPARENT || c == FillChars::UNICODE.outline);
            }
        }
    }

    #[test]
    fn filled_sprites_contain_dense_fill() {
        let s = rasterize(SizeClass::Small, HeartStyle::Filled, FillChars::UNICODE);
        assert!(s
            .rows()
            .iter()
            .any(|r| r.contains(&FillChars::UNICODE.dense)));
    }

    #[test]
    fn glyph_sprite_is_one_by_one() {
        let s = Sprite::from_glyph('♥');
        assert_eq!((s.width(), s.height()), (1, 1));
        assert_eq!(s.rows()[0][0], '♥');
    }

    #[test]
    fn cache_hands_out_shared_sprites() {
        let cache = SpriteCache::new(FillChars::UNICODE);
        let a = cache.get(SizeClass::Small, HeartStyle::Filled);
        let b = cache.get(SizeClass::Small, HeartStyle::Filled);
        assert!(Rc::ptr_eq(&a, &b));
    }
}
