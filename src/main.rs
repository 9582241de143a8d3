// Copyright (c) 2026 mara_velin

mod cell;
mod config;
mod frame;
mod heart;
mod messages;
mod palette;
mod runtime;
mod shower;
mod sprite;
mod terminal;

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};

use crate::config::{color_enabled_stdout, print_list_colors, Args};
use crate::frame::Frame;
use crate::palette::build_palette;
use crate::runtime::{ColorMode, ColorScheme};
use crate::shower::{Shower, ShowerConfig};
use crate::sprite::FillChars;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const FAREWELL: &str = "Exiting love loop... see you next heartbeat!";

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn require_f32_range(name: &str, v: f32, min: f32, max: f32) -> f32 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn default_to_ascii() -> bool {
    let lang = env::var("LANG").unwrap_or_default();
    !lang.to_ascii_uppercase().contains("UTF")
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }

    ColorMode::Color256
}

fn detect_color_mode(args: &Args) -> ColorMode {
    if let Some(m) = args.colormode {
        return match m {
            0 => ColorMode::Mono,
            8 => ColorMode::Color256,
            24 => ColorMode::TrueColor,
            _ => {
                eprintln!("invalid --colormode: {} (allowed: 0,8,24)", m);
                std::process::exit(1);
            }
        };
    }

    detect_color_mode_auto()
}

fn parse_color_scheme(s: &str) -> Result<ColorScheme, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "pink" => Ok(ColorScheme::Pink),
        "rose" | "red" => Ok(ColorScheme::Rose),
        "gold" | "amber" => Ok(ColorScheme::Gold),
        "violet" | "purple" => Ok(ColorScheme::Violet),
        "aqua" | "cyan" => Ok(ColorScheme::Aqua),
        "snow" | "white" => Ok(ColorScheme::Snow),
        _ => Err(format!("invalid color: {} (see --list-colors)", s)),
    }
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    let cancel = Arc::new(AtomicBool::new(false));

    #[cfg(unix)]
    for sig in [SIGINT, SIGTERM, SIGHUP] {
        if let Err(e) = signal_hook::flag::register(sig, Arc::clone(&cancel)) {
            eprintln!("failed to install signal handler: {}", e);
        }
    }

    #[cfg(windows)]
    {
        let flag = Arc::clone(&cancel);
        if let Err(e) = ctrlc::set_handler(move || {
            flag.store(true, Ordering::Relaxed);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let args = Args::parse();

    if args.list_colors {
        print_list_colors();
        return Ok(());
    }

    let target_fps = require_f64_range("--fps", args.fps, 1.0, 240.0);
    let chance_pct = require_f32_range("--chance", args.chance, 0.0, 100.0);
    let ramp_s = require_f64_range("--ramp", args.ramp, 0.0, 600.0);
    let intro_s = require_f64_range("--intro", args.intro, 0.0, 120.0);
    let duration_s = args
        .duration
        .map(|s| require_f64_range("--duration", s, 0.1, 86400.0));

    let scheme = match parse_color_scheme(&args.color) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let color_mode = detect_color_mode(&args);

    let ascii_locale = default_to_ascii();
    let cfg = ShowerConfig {
        target_chance: chance_pct / 100.0,
        ramp: Duration::from_secs_f64(ramp_s),
        intro: Duration::from_secs_f64(intro_s),
        procedural: args.procedural || ascii_locale,
        fixed_status: args.message.clone(),
        fill_chars: if ascii_locale {
            FillChars::ASCII
        } else {
            FillChars::UNICODE
        },
    };

    let mt = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut term = Terminal::new()?;
    let (w, h) = Terminal::size();

    let start_time = Instant::now();
    let mut shower = Shower::new(cfg, build_palette(scheme, color_mode), mt, start_time);
    shower.reset(w, h);
    let mut frame = Frame::new(w, h);

    let end_time = duration_s.map(|s| start_time + Duration::from_secs_f64(s));
    let target_period = Duration::from_secs_f64(1.0 / target_fps);
    let mut next_frame = Instant::now();

    while shower.raining {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            shower.stop();
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        // Drain input and wait out the rest of the frame budget; the
        // poll timeout doubles as the pacing sleep.
        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => {
                        pending_resize = Some((nw, nh));
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if args.screensaver {
                            shower.stop();
                            break;
                        }
                        match (k.code, k.modifiers) {
                            (KeyCode::Char('c'), KeyModifiers::CONTROL) => shower.stop(),
                            (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => shower.stop(),
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }

            if cancel.load(Ordering::Relaxed) {
                shower.stop();
            }
            if !shower.raining || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !shower.raining {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            let (nw, nh) = Terminal::clamp_size(nw, nh);
            shower.reset(nw, nh);
            frame = Frame::new(nw, nh);
        }

        shower.tick(Instant::now());
        shower.render(&mut frame);
        term.draw(&frame)?;

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    // Terminal teardown must finish before the farewell can land on
    // the primary screen.
    drop(term);

    if color_enabled_stdout() {
        println!("\x1b[92m{}\x1b[0m", FAREWELL);
    } else {
        println!("{}", FAREWELL);
    }

    Ok(())
}
