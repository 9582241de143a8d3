// Copyright (c) 2026 mara_velin

use std::time::Duration;

pub const MESSAGES: &[&str] = &[
    "Compiling feelings...",
    "Deploying emotions...",
    "FlirtingAPI initializing...",
    "Authenticating chemistry...",
    "Encrypting heartbeats...",
    "Loading love language pack...",
    "Spinning up butterflies...",
    "Warming up smile engine...",
    "Negotiating date protocol...",
];

/// How long a rotated status message holds before re-rolling.
pub const STATUS_HOLD_S: f32 = 2.4;
/// Random extra gap added on top of the hold.
pub const STATUS_GAP_MIN_S: f32 = 0.8;
pub const STATUS_GAP_MAX_S: f32 = 2.2;

/// Seconds between intro message changes.
const INTRO_STEP_S: f64 = 0.6;

fn loader_dots(elapsed: Duration) -> &'static str {
    match (elapsed.as_secs_f64() * 3.0) as u64 % 4 {
        0 => "",
        1 => ".",
        2 => "..",
        _ => "...",
    }
}

/// Intro-phase status line: messages cycle on a fixed cadence with a
/// trailing dot loader ticking underneath.
pub fn intro_status(elapsed: Duration) -> String {
    let idx = (elapsed.as_secs_f64() / INTRO_STEP_S) as usize % MESSAGES.len();
    format!("{}{}", MESSAGES[idx], loader_dots(elapsed))
}
