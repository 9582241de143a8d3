// Copyright (c) 2026 mara_velin

use crossterm::style::Color;

use crate::runtime::{ColorMode, ColorScheme};

/// Colors for one theme under one color mode. `hearts` is empty in
/// mono mode, which renders everything in the terminal's default
/// foreground; the HUD accents disappear with it.
#[derive(Clone, Debug)]
pub struct Palette {
    pub hearts: Vec<Color>,
    pub title: Option<Color>,
    pub status: Option<Color>,
}

fn from_ansi_list(list: &[u8]) -> Vec<Color> {
    list.iter().map(|&v| Color::AnsiValue(v)).collect()
}

fn from_rgb_list(list: &[(u8, u8, u8)]) -> Vec<Color> {
    list.iter()
        .map(|&(r, g, b)| Color::Rgb { r, g, b })
        .collect()
}

struct SchemeColors {
    ansi: &'static [u8],
    rgb: &'static [(u8, u8, u8)],
}

fn scheme_colors(scheme: ColorScheme) -> SchemeColors {
    match scheme {
        ColorScheme::Pink => SchemeColors {
            ansi: &[198, 199, 200, 205, 206, 213, 219],
            rgb: &[
                (255, 0, 135),
                (255, 0, 175),
                (255, 0, 215),
                (255, 95, 175),
                (255, 95, 215),
                (255, 135, 255),
                (255, 175, 255),
            ],
        },
        ColorScheme::Rose => SchemeColors {
            ansi: &[160, 196, 197, 203, 210, 217],
            rgb: &[
                (215, 0, 0),
                (255, 0, 0),
                (255, 0, 95),
                (255, 95, 95),
                (255, 135, 135),
                (255, 175, 175),
            ],
        },
        ColorScheme::Gold => SchemeColors {
            ansi: &[178, 214, 220, 221, 222, 230],
            rgb: &[
                (215, 175, 0),
                (255, 175, 0),
                (255, 215, 0),
                (255, 215, 95),
                (255, 215, 135),
                (255, 255, 215),
            ],
        },
        ColorScheme::Violet => SchemeColors {
            ansi: &[93, 129, 135, 141, 177, 183],
            rgb: &[
                (135, 0, 255),
                (175, 0, 255),
                (175, 95, 255),
                (175, 135, 255),
                (215, 135, 255),
                (215, 175, 255),
            ],
        },
        ColorScheme::Aqua => SchemeColors {
            ansi: &[37, 44, 51, 87, 123, 159],
            rgb: &[
                (0, 175, 175),
                (0, 215, 215),
                (0, 255, 255),
                (95, 255, 255),
                (135, 255, 255),
                (175, 255, 255),
            ],
        },
        ColorScheme::Snow => SchemeColors {
            ansi: &[252, 253, 254, 255, 231],
            rgb: &[
                (208, 208, 208),
                (218, 218, 218),
                (228, 228, 228),
                (238, 238, 238),
                (255, 255, 255),
            ],
        },
    }
}

pub fn build_palette(scheme: ColorScheme, mode: ColorMode) -> Palette {
    let sc = scheme_colors(scheme);
    let hearts = match mode {
        ColorMode::Mono => Vec::new(),
        ColorMode::Color256 => from_ansi_list(sc.ansi),
        ColorMode::TrueColor => from_rgb_list(sc.rgb),
    };
    let (title, status) = match mode {
        ColorMode::Mono => (None, None),
        _ => (Some(Color::Cyan), Some(Color::Magenta)),
    };
    Palette {
        hearts,
        title,
        status,
    }
}
