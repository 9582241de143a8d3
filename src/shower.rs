// Copyright (c) 2026 mara_velin

use std::rc::Rc;
use std::time::{Duration, Instant};

use rand::distr::weighted::WeightedIndex;
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::Rng;

use crate::cell::Cell;
use crate::frame::Frame;
use crate::heart::Heart;
use crate::messages::{self, MESSAGES, STATUS_GAP_MAX_S, STATUS_GAP_MIN_S, STATUS_HOLD_S};
use crate::palette::Palette;
use crate::runtime::{HeartStyle, SizeClass, TwinklePhase};
use crate::sprite::{FillChars, Sprite, SpriteCache, HEARTS_DAINTY, HEARTS_FILLED, TRANSPARENT};

/// Rows reserved for the title and status lines; hearts clip here.
pub const HUD_ROWS: u16 = 2;

const TITLE: &str = "Heartfall: Rain of Hearts";
const EXIT_HINT: &str = "Press Ctrl+C to exit";

// Spawn tables. Weights bias small hearts to keep the screen airy;
// Large is deliberately absent from the population.
const SIZE_POPULATION: [SizeClass; 2] = [SizeClass::Small, SizeClass::Medium];
const SIZE_WEIGHTS: [u32; 2] = [6, 4];
const STYLE_POPULATION: [HeartStyle; 2] = [HeartStyle::Filled, HeartStyle::Outline];
const STYLE_WEIGHTS: [u32; 2] = [6, 4];

pub struct ShowerConfig {
    /// Per-column spawn probability per tick once the ramp tops out.
    pub target_chance: f32,
    /// Warm-up window over which the chance climbs from zero.
    pub ramp: Duration,
    /// Messages-only phase before the first heart may spawn.
    pub intro: Duration,
    /// Rasterized cache sprites instead of single-glyph hearts.
    pub procedural: bool,
    /// Pin the status line instead of rotating it.
    pub fixed_status: Option<String>,
    pub fill_chars: FillChars,
}

fn ramped_chance(target: f32, elapsed: Duration, ramp: Duration) -> f32 {
    if ramp.is_zero() {
        return target;
    }
    let frac = (elapsed.as_secs_f32() / ramp.as_secs_f32()).min(1.0);
    target * frac
}

/// The whole animation state: live hearts, RNG, timers, and the
/// compositor. Owned by the main loop; nothing else aliases it.
pub struct Shower {
    pub cols: u16,
    pub lines: u16,
    pub raining: bool,

    cfg: ShowerConfig,
    palette: Palette,
    cache: SpriteCache,
    hearts: Vec<Heart>,

    mt: StdRng,
    rand_chance: Uniform<f32>,
    rand_speed_small: Uniform<f32>,
    rand_speed_medium: Uniform<f32>,
    rand_speed_large: Uniform<f32>,
    size_weights: WeightedIndex<u32>,
    style_weights: WeightedIndex<u32>,

    intro_start: Instant,
    rain_start: Instant,
    status: Option<String>,
    next_status: Instant,
}

impl Shower {
    pub fn new(cfg: ShowerConfig, palette: Palette, mt: StdRng, now: Instant) -> Self {
        let cache = SpriteCache::new(cfg.fill_chars);
        let rain_start = now + cfg.intro;
        Self {
            cols: 80,
            lines: 24,
            raining: true,
            cfg,
            palette,
            cache,
            hearts: Vec::new(),
            mt,
            rand_chance: Uniform::new(0.0f32, 1.0).expect("valid range"),
            rand_speed_small: Uniform::new_inclusive(0.06f32, 0.14).expect("valid range"),
            rand_speed_medium: Uniform::new_inclusive(0.12f32, 0.28).expect("valid range"),
            rand_speed_large: Uniform::new_inclusive(0.18f32, 0.40).expect("valid range"),
            size_weights: WeightedIndex::new(SIZE_WEIGHTS).expect("valid weights"),
            style_weights: WeightedIndex::new(STYLE_WEIGHTS).expect("valid weights"),
            intro_start: now,
            rain_start,
            status: None,
            next_status: rain_start,
        }
    }

    pub fn reset(&mut self, cols: u16, lines: u16) {
        self.cols = cols;
        self.lines = lines;
        let lines = lines as i32;
        self.hearts
            .retain(|h| h.col < cols && h.top() < lines);
    }

    pub fn stop(&mut self) {
        self.raining = false;
    }

    /// Current per-column spawn probability: zero through the intro,
    /// then a linear climb capped exactly at the target.
    pub fn spawn_chance(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.rain_start);
        ramped_chance(self.cfg.target_chance, elapsed, self.cfg.ramp)
    }

    /// One simulation step: status line, then spawn -> advance -> cull.
    pub fn tick(&mut self, now: Instant) {
        self.update_status(now);
        if now < self.rain_start {
            return;
        }

        let chance = self.spawn_chance(now);
        self.spawn_hearts(now, chance);

        let Self { hearts, mt, .. } = self;
        for h in hearts.iter_mut() {
            h.advance(now, mt);
        }

        let lines = self.lines as i32;
        self.hearts.retain(|h| h.top() < lines);
    }

    fn update_status(&mut self, now: Instant) {
        if self.cfg.fixed_status.is_some() {
            if self.status.is_none() {
                self.status = self.cfg.fixed_status.clone();
            }
            return;
        }
        if now < self.rain_start {
            let elapsed = now.saturating_duration_since(self.intro_start);
            self.status = Some(messages::intro_status(elapsed));
            return;
        }
        if now >= self.next_status {
            let idx = self.mt.random_range(0..MESSAGES.len());
            self.status = Some(MESSAGES[idx].to_string());
            let gap = self.mt.random_range(STATUS_GAP_MIN_S..STATUS_GAP_MAX_S);
            self.next_status = now + Duration::from_secs_f32(STATUS_HOLD_S + gap);
        }
    }

    /// One planning pass: a Bernoulli trial per column, candidates
    /// rejected outright on any bounding-box contact with the live
    /// set, including hearts admitted earlier in this same pass.
    fn spawn_hearts(&mut self, now: Instant, chance: f32) {
        if chance <= 0.0 {
            return;
        }
        for col in 0..self.cols {
            if self.rand_chance.sample(&mut self.mt) >= chance {
                continue;
            }
            let candidate = self.make_heart(col, now);
            if self.hearts.iter().any(|h| h.overlaps(&candidate)) {
                continue;
            }
            self.hearts.push(candidate);
        }
    }

    fn make_heart(&mut self, col: u16, now: Instant) -> Heart {
        let size = SIZE_POPULATION[self.size_weights.sample(&mut self.mt)];
        let style = STYLE_POPULATION[self.style_weights.sample(&mut self.mt)];

        let sprite = if self.cfg.procedural {
            self.cache.get(size, style)
        } else {
            let pool = if size == SizeClass::Small && style == HeartStyle::Outline {
                HEARTS_DAINTY
            } else {
                HEARTS_FILLED
            };
            let glyph = pool[self.mt.random_range(0..pool.len())];
            Rc::new(Sprite::from_glyph(glyph))
        };

        let speed = match size {
            SizeClass::Small => self.rand_speed_small.sample(&mut self.mt),
            SizeClass::Medium => self.rand_speed_medium.sample(&mut self.mt),
            SizeClass::Large => self.rand_speed_large.sample(&mut self.mt),
        };

        let fg = if self.palette.hearts.is_empty() {
            None
        } else {
            let idx = self.mt.random_range(0..self.palette.hearts.len());
            Some(self.palette.hearts[idx])
        };

        let twinkle = match self.mt.random_range(0..3u8) {
            0 => TwinklePhase::Normal,
            1 => TwinklePhase::Bright,
            _ => TwinklePhase::Faint,
        };
        let twinkle_next = now + Duration::from_secs_f32(self.mt.random_range(0.1f32..0.7));

        Heart {
            col,
            y: HUD_ROWS as f32,
            speed,
            size,
            style,
            fg,
            sprite,
            twinkle,
            twinkle_next,
        }
    }

    /// Composite everything into the frame: blank slate, hearts
    /// (last writer wins), then the two HUD rows on top.
    pub fn render(&self, frame: &mut Frame) {
        frame.clear();
        for h in &self.hearts {
            self.draw_heart(h, frame);
        }
        self.draw_hud(frame);
        self.draw_status(frame);
    }

    fn draw_heart(&self, h: &Heart, frame: &mut Frame) {
        let top = h.top();
        if top >= self.lines as i32 {
            return;
        }
        let left = h.left();
        let (bold, dim) = match h.twinkle {
            TwinklePhase::Normal => (false, false),
            TwinklePhase::Bright => (true, false),
            TwinklePhase::Faint => (false, true),
        };

        for (r, row) in h.sprite.rows().iter().enumerate() {
            let sy = top + r as i32;
            if sy < HUD_ROWS as i32 {
                continue;
            }
            if sy >= self.lines as i32 {
                break;
            }
            for (c, &ch) in row.iter().enumerate() {
                if ch == TRANSPARENT {
                    continue;
                }
                let sx = left + c as i32;
                if sx < 0 || sx >= self.cols as i32 {
                    continue;
                }
                frame.set(
                    sx as u16,
                    sy as u16,
                    Cell {
                        ch,
                        fg: h.fg,
                        bold,
                        dim,
                    },
                );
            }
        }
    }

    fn draw_hud(&self, frame: &mut Frame) {
        let width = self.cols as usize;
        let full = format!("{}  |  {}", TITLE, EXIT_HINT);
        let (text, title_len) = if full.chars().count() <= width {
            (full, TITLE.chars().count())
        } else {
            (EXIT_HINT.to_string(), 0)
        };
        for (i, ch) in text.chars().take(width).enumerate() {
            let titled = i < title_len;
            frame.set(
                i as u16,
                0,
                Cell {
                    ch,
                    fg: if titled { self.palette.title } else { None },
                    bold: titled,
                    dim: false,
                },
            );
        }
    }

    fn draw_status(&self, frame: &mut Frame) {
        let Some(msg) = &self.status else {
            return;
        };
        let width = self.cols as usize;
        let chars: Vec<char> = msg.chars().collect();
        let shown = chars.len().min(width);
        let start = (width - shown) / 2;
        for (i, &ch) in chars[..shown].iter().enumerate() {
            frame.set(
                (start + i) as u16,
                1,
                Cell {
                    ch,
                    fg: self.palette.status,
                    bold: false,
                    dim: false,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::palette::build_palette;
    use crate::runtime::{ColorMode, ColorScheme};

    fn make_shower(
        cols: u16,
        lines: u16,
        target_chance: f32,
        ramp_s: f64,
        intro_s: f64,
        now: Instant,
    ) -> Shower {
        let cfg = ShowerConfig {
            target_chance,
            ramp: Duration::from_secs_f64(ramp_s),
            intro: Duration::from_secs_f64(intro_s),
            procedural: false,
            fixed_status: None,
            fill_chars: FillChars::UNICODE,
        };
        let palette = build_palette(ColorScheme::Pink, ColorMode::Color256);
        let mut s = Shower::new(cfg, palette, StdRng::seed_from_u64(42), now);
        s.reset(cols, lines);
        s
    }

    fn plain_heart(s: &mut Shower, col: u16, y: f32, speed: f32) -> Heart {
        let now = Instant::now();
        let mut h = s.make_heart(col, now);
        h.y = y;
        h.speed = speed;
        h.twinkle_next = now + Duration::from_secs(3600);
        h
    }

    #[test]
    fn spawn_chance_ramps_and_clamps_exactly() {
        let now = Instant::now();
        let s = make_shower(40, 20, 0.03, 10.0, 0.0, now);

        assert_eq!(s.spawn_chance(now), 0.0);
        let mid = s.spawn_chance(now + Duration::from_secs(5));
        assert!((mid - 0.015).abs() < 1e-6);
        assert_eq!(s.spawn_chance(now + Duration::from_secs(10)), 0.03);
        assert_eq!(s.spawn_chance(now + Duration::from_secs(600)), 0.03);
        for i in 0..100 {
            let t = now + Duration::from_millis(i * 500);
            assert!(s.spawn_chance(t) <= 0.03);
        }
    }

    #[test]
    fn no_spawn_at_time_zero_regardless_of_rng() {
        let now = Instant::now();
        let mut s = make_shower(10, 10, 1.0, 10.0, 0.0, now);
        for _ in 0..50 {
            s.tick(now);
        }
        assert!(s.hearts.is_empty());
    }

    #[test]
    fn planning_pass_never_admits_overlapping_hearts() {
        let now = Instant::now();
        let mut s = make_shower(80, 24, 1.0, 0.0, 0.0, now);
        s.spawn_hearts(now, 1.0);
        assert!(!s.hearts.is_empty());
        for (i, a) in s.hearts.iter().enumerate() {
            for b in &s.hearts[i + 1..] {
                assert!(!a.overlaps(b), "hearts at cols {} and {}", a.col, b.col);
            }
        }
    }

    #[test]
    fn hearts_below_the_grid_are_culled() {
        let now = Instant::now();
        let mut s = make_shower(40, 20, 0.0, 0.0, 0.0, now);
        let live = plain_heart(&mut s, 5, 18.5, 0.2);
        let dying = plain_heart(&mut s, 25, 19.5, 1.0);
        s.hearts.push(live);
        s.hearts.push(dying);

        s.tick(now + Duration::from_millis(10));

        assert_eq!(s.hearts.len(), 1);
        assert_eq!(s.hearts[0].col, 5);
        assert!(s.hearts[0].top() < 20);
    }

    #[test]
    fn single_heart_falls_to_row_four_after_ten_ticks() {
        let now = Instant::now();
        let mut s = make_shower(40, 20, 0.0, 0.0, 0.0, now);
        let h = plain_heart(&mut s, 10, 2.0, 0.2);
        s.hearts.push(h);

        for i in 1..=10u64 {
            s.tick(now + Duration::from_millis(i * 70));
        }

        assert_eq!(s.hearts.len(), 1);
        assert!((s.hearts[0].y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn intro_phase_rotates_messages_but_spawns_nothing() {
        let now = Instant::now();
        let mut s = make_shower(40, 20, 1.0, 0.0, 5.0, now);
        s.tick(now + Duration::from_secs(1));
        assert!(s.hearts.is_empty());
        let status = s.status.clone().expect("intro sets a status line");
        assert!(MESSAGES.iter().any(|m| status.starts_with(m)));
    }

    #[test]
    fn fixed_status_overrides_rotation() {
        let now = Instant::now();
        let cfg = ShowerConfig {
            target_chance: 0.0,
            ramp: Duration::ZERO,
            intro: Duration::ZERO,
            procedural: false,
            fixed_status: Some("for you".to_string()),
            fill_chars: FillChars::UNICODE,
        };
        let palette = build_palette(ColorScheme::Pink, ColorMode::Color256);
        let mut s = Shower::new(cfg, palette, StdRng::seed_from_u64(1), now);
        s.reset(40, 20);
        s.tick(now + Duration::from_secs(30));
        assert_eq!(s.status.as_deref(), Some("for you"));
    }

    #[test]
    fn render_keeps_hearts_out_of_the_hud_rows() {
        let now = Instant::now();
        let mut s = make_shower(40, 20, 0.0, 0.0, 0.0, now);
        let mut above = plain_heart(&mut s, 30, 0.0, 0.1);
        above.sprite = Rc::new(Sprite::from_glyph('♥'));
        let mut below = plain_heart(&mut s, 10, 5.0, 0.1);
        below.sprite = Rc::new(Sprite::from_glyph('♥'));
        s.hearts.push(above);
        s.hearts.push(below);

        let mut frame = Frame::new(40, 20);
        s.render(&mut frame);

        // width 40 forces the abbreviated HUD, so column 30 of row 0
        // is outside the hint text and must stay blank
        assert_eq!(frame.get(30, 0).unwrap().ch, ' ');
        assert_eq!(frame.get(10, 5).unwrap().ch, '♥');
    }

    #[test]
    fn render_centers_the_status_row() {
        let now = Instant::now();
        let cfg = ShowerConfig {
            target_chance: 0.0,
            ramp: Duration::ZERO,
            intro: Duration::ZERO,
            procedural: false,
            fixed_status: Some("hi".to_string()),
            fill_chars: FillChars::UNICODE,
        };
        let palette = build_palette(ColorScheme::Pink, ColorMode::Color256);
        let mut s = Shower::new(cfg, palette, StdRng::seed_from_u64(1), now);
        s.reset(20, 10);
        s.tick(now);

        let mut frame = Frame::new(20, 10);
        s.render(&mut frame);
        assert_eq!(frame.get(9, 1).unwrap().ch, 'h');
        assert_eq!(frame.get(10, 1).unwrap().ch, 'i');
    }

    #[test]
    fn procedural_mode_spawns_multi_row_cache_sprites() {
        let now = Instant::now();
        let cfg = ShowerConfig {
            target_chance: 1.0,
            ramp: Duration::ZERO,
            intro: Duration::ZERO,
            procedural: true,
            fixed_status: None,
            fill_chars: FillChars::UNICODE,
        };
        let palette = build_palette(ColorScheme::Pink, ColorMode::Color256);
        let mut s = Shower::new(cfg, palette, StdRng::seed_from_u64(9), now);
        s.reset(120, 40);
        s.spawn_hearts(now, 1.0);
        assert!(!s.hearts.is_empty());
        assert!(s.hearts.iter().all(|h| h.sprite.height() > 1));
    }

    #[test]
    fn stop_is_idempotent() {
        let now = Instant::now();
        let mut s = make_shower(40, 20, 0.0, 0.0, 0.0, now);
        assert!(s.raining);
        s.stop();
        s.stop();
        assert!(!s.raining);
    }
}
