// Copyright (c) 2026 mara_velin

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color256,
    TrueColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorScheme {
    Pink,
    Rose,
    Gold,
    Violet,
    Aqua,
    Snow,
}

/// Heart size buckets. `Large` is defined end to end (rasterizer,
/// cache, emoji pool) but the spawn weights never select it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeartStyle {
    Filled,
    Outline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TwinklePhase {
    Normal,
    Bright,
    Faint,
}
