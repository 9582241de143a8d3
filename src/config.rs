// Copyright (c) 2026 mara_velin

use std::io::IsTerminal;

use clap::Parser;

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "heartfall",
    version,
    about = "A gentle rain of twinkling hearts for the terminal"
)]
pub struct Args {
    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 14.0,
        help_heading = "PERFORMANCE",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        short = 'c',
        long = "color",
        default_value = "pink",
        help_heading = "APPEARANCE",
        help = "Color theme (see --list-colors)"
    )]
    pub color: String,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,8,24). Default: 24-bit if COLORTERM says so, else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "procedural",
        help_heading = "APPEARANCE",
        help = "Rasterize multi-row hearts instead of using glyph hearts (auto when LANG is not UTF)"
    )]
    pub procedural: bool,

    #[arg(
        long = "chance",
        default_value_t = 3.0,
        help_heading = "RAIN",
        help = "Target spawn chance per column per frame, percent (min 0 max 100)"
    )]
    pub chance: f32,

    #[arg(
        long = "ramp",
        default_value_t = 10.0,
        help_heading = "RAIN",
        help = "Seconds to ramp spawn chance from zero to target (min 0 max 600; 0 = no ramp)"
    )]
    pub ramp: f64,

    #[arg(
        long = "intro",
        default_value_t = 7.0,
        help_heading = "RAIN",
        help = "Seconds of status messages before the rain starts (min 0 max 120; 0 = skip)"
    )]
    pub intro: f64,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 'm',
        long = "message",
        help_heading = "GENERAL",
        help = "Pin the status line to a fixed message"
    )]
    pub message: Option<String>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the RNG for a reproducible shower"
    )]
    pub seed: Option<u64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on any keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List available color themes and exit"
    )]
    pub list_colors: bool,
}

pub fn print_list_colors() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE COLOR THEMES:\x1b[0m");
        println!("\x1b[2mNOTE: Use only the VALUE (left side) with --color.\x1b[0m");
    } else {
        println!("AVAILABLE COLOR THEMES:");
        println!("NOTE: Use only the VALUE (left side) with --color.");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    println!("pink         Soft pinks and magentas (default)");
    println!("rose         Deep reds (alias: red)");
    println!("gold         Warm golds (alias: amber)");
    println!("violet       Purples (alias: purple)");
    println!("aqua         Teals and cyans (alias: cyan)");
    println!("snow         Grays into white (alias: white)");
}
