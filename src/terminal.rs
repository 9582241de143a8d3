// Copyright (c) 2026 mara_velin

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor, event,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;

const FALLBACK_COLS: u16 = 80;
const FALLBACK_ROWS: u16 = 24;
const MIN_COLS: u16 = 20;
const MIN_ROWS: u16 = 10;

struct LastFrame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl LastFrame {
    fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; len],
        }
    }
}

pub struct Terminal {
    stdout: Stdout,
    last: Option<LastFrame>,
    run_buf: String,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            let _ = out.execute(SetAttribute(Attribute::Reset));
            let _ = out.execute(ResetColor);
            let _ = out.execute(cursor::Show);
            let _ = out.execute(terminal::EnableLineWrap);
            let _ = out.execute(terminal::LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
            let _ = out.flush();
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last: None,
            run_buf: String::with_capacity(64),
        })
    }

    /// Current terminal size, recovered locally on failure and clamped
    /// so the HUD rows and a couple of sprites always fit.
    pub fn size() -> (u16, u16) {
        let (w, h) = terminal::size().unwrap_or((FALLBACK_COLS, FALLBACK_ROWS));
        Self::clamp_size(w, h)
    }

    pub fn clamp_size(w: u16, h: u16) -> (u16, u16) {
        (w.max(MIN_COLS), h.max(MIN_ROWS))
    }

    pub fn poll_event(timeout: std::time::Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    /// Flush one frame as a single write. Only cells that differ from
    /// the previously flushed frame are rewritten; adjacent changed
    /// cells sharing a style go out as one Print run.
    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        let full_redraw = self
            .last
            .as_ref()
            .map(|l| l.width != frame.width || l.height != frame.height)
            .unwrap_or(true);

        if full_redraw {
            self.stdout.queue(cursor::MoveTo(0, 0))?;
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.last = Some(LastFrame::new(frame.width, frame.height));
        }
        let last = self.last.as_mut().expect("set above");

        let mut cur_fg: Option<Color> = None;
        let mut cur_bold = false;
        let mut cur_dim = false;
        let mut cur_pos: Option<(u16, u16)> = None;
        let width = frame.width as usize;

        for y in 0..frame.height {
            let mut x: u16 = 0;
            while x < frame.width {
                let idx = y as usize * width + x as usize;
                let cell = frame.cell_at_index(idx);
                if !full_redraw && last.cells[idx] == cell {
                    x += 1;
                    continue;
                }

                let (fg0, bold0, dim0) = (cell.fg, cell.bold, cell.dim);
                let x0 = x;
                self.run_buf.clear();

                while x < frame.width {
                    let i = y as usize * width + x as usize;
                    let c = frame.cell_at_index(i);
                    if !full_redraw && last.cells[i] == c {
                        break;
                    }
                    if c.fg != fg0 || c.bold != bold0 || c.dim != dim0 {
                        break;
                    }
                    self.run_buf.push(c.ch);
                    last.cells[i] = c;
                    x += 1;
                }

                if cur_pos != Some((x0, y)) {
                    self.stdout.queue(cursor::MoveTo(x0, y))?;
                }
                if fg0 != cur_fg {
                    self.stdout
                        .queue(SetForegroundColor(fg0.unwrap_or(Color::Reset)))?;
                    cur_fg = fg0;
                }
                if bold0 != cur_bold || dim0 != cur_dim {
                    self.stdout
                        .queue(SetAttribute(Attribute::NormalIntensity))?;
                    if bold0 {
                        self.stdout.queue(SetAttribute(Attribute::Bold))?;
                    }
                    if dim0 {
                        self.stdout.queue(SetAttribute(Attribute::Dim))?;
                    }
                    cur_bold = bold0;
                    cur_dim = dim0;
                }
                self.stdout.queue(Print(self.run_buf.as_str()))?;

                cur_pos = if x < frame.width { Some((x, y)) } else { None };
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.stdout.execute(SetAttribute(Attribute::Reset));
        let _ = self.stdout.execute(ResetColor);
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::EnableLineWrap);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }
}

/// Last-resort restore for panic and signal paths. Safe to run more
/// than once; every command is independent and ignored on failure.
pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
