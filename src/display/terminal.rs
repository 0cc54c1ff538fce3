//! Terminal surface.
//!
//! Draw calls land in an off-screen cell grid scaled from world units to the
//! terminal size; `present` writes the whole grid with crossterm and flushes.

use std::io::Write;
use std::ops::Range;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};

use super::{Canvas, Sprite};
use crate::entities::Rect;

const C_BIRD: Color = Color::Yellow;
const C_BEAK: Color = Color::DarkYellow;
const C_PIPE: Color = Color::DarkGreen;
const C_PIPE_CAP: Color = Color::Green;
const C_GRASS: Color = Color::Green;
const C_DIRT: Color = Color::DarkYellow;

/// Width in world units of one floor stripe.
const FLOOR_STRIPE: f32 = 20.0;

/// Beak glyph for a given tilt.
fn beak_glyph(tilt: f32) -> char {
    if tilt > 10.0 {
        '/'
    } else if tilt < -10.0 {
        '\\'
    } else {
        '>'
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

pub struct TerminalCanvas<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    world_width: f32,
    world_height: f32,
    background: Color,
    cells: Vec<Cell>,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W, cols: u16, rows: u16, world_width: f32, world_height: f32) -> Self {
        let background = super::C_BACKGROUND;
        Self {
            out,
            cols,
            rows,
            world_width,
            world_height,
            background,
            cells: vec![blank(background); cols as usize * rows as usize],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![blank(self.background); cols as usize * rows as usize];
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells
            .get(row as usize * self.cols as usize + col as usize)
            .copied()
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    // ── World → grid mapping ─────────────────────────────────────────────────

    fn col_of(&self, x: f32) -> i32 {
        (x * self.cols as f32 / self.world_width).floor() as i32
    }

    fn row_of(&self, y: f32) -> i32 {
        (y * self.rows as f32 / self.world_height).floor() as i32
    }

    /// Columns covered by `[left, right)`, never empty for a non-empty span.
    fn cols_of(&self, left: f32, right: f32) -> Range<i32> {
        let start = self.col_of(left);
        let end = (right * self.cols as f32 / self.world_width).ceil() as i32;
        start..end.max(start + 1)
    }

    fn rows_of(&self, top: f32, bottom: f32) -> Range<i32> {
        let start = self.row_of(top);
        let end = (bottom * self.rows as f32 / self.world_height).ceil() as i32;
        start..end.max(start + 1)
    }

    /// World x of the left edge of grid column `col`.
    fn world_x(&self, col: i32) -> f32 {
        col as f32 * self.world_width / self.cols as f32
    }

    fn put(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        if let Some(cell) = self.cells.get_mut(idx) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    // ── Sprites ──────────────────────────────────────────────────────────────

    fn draw_bird(&mut self, rect: Rect, tilt: f32) {
        let cols = self.cols_of(rect.left(), rect.right());
        let rows = self.rows_of(rect.top(), rect.bottom());
        for row in rows.clone() {
            for col in cols.clone() {
                self.put(col, row, '█', C_BIRD);
            }
        }
        let (_, cy) = rect.center();
        self.put(cols.end, self.row_of(cy), beak_glyph(tilt), C_BEAK);
    }

    fn draw_pipe(&mut self, rect: Rect, flipped: bool) {
        let cols = self.cols_of(rect.left(), rect.right());
        let rows = self.rows_of(rect.top(), rect.bottom());
        let cap_row = if flipped { rows.end - 1 } else { rows.start };
        for row in rows {
            if row == cap_row {
                for col in (cols.start - 1)..(cols.end + 1) {
                    self.put(col, row, '█', C_PIPE_CAP);
                }
            } else {
                for col in cols.clone() {
                    self.put(col, row, '█', C_PIPE);
                }
            }
        }
    }

    fn draw_floor(&mut self, rect: Rect) {
        let cols = self.cols_of(rect.left(), rect.right());
        let rows = self.rows_of(rect.top(), rect.bottom());
        let grass_row = rows.start;
        for row in rows {
            for col in cols.clone() {
                if row == grass_row {
                    self.put(col, row, '▀', C_GRASS);
                    continue;
                }
                let stripe = ((self.world_x(col) - rect.left()) / FLOOR_STRIPE) as i32;
                let ch = if stripe % 2 == 0 { '▓' } else { '▒' };
                self.put(col, row, ch, C_DIRT);
            }
        }
    }
}

// ── Screen setup ──────────────────────────────────────────────────────────────

/// Switch `out` to the alternate screen and hide the cursor.
pub fn enter_screen<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    Ok(())
}

/// Undo `enter_screen`. Every step is attempted; the first error is returned.
pub fn leave_screen<W: Write>(out: &mut W) -> std::io::Result<()> {
    let shown = out.execute(cursor::Show).map(|_| ());
    let left = out.execute(terminal::LeaveAlternateScreen).map(|_| ());
    let flushed = out.flush();
    shown.and(left).and(flushed)
}

fn blank(bg: Color) -> Cell {
    Cell {
        ch: ' ',
        fg: Color::White,
        bg,
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    fn clear(&mut self, color: Color) {
        self.background = color;
        self.cells.fill(blank(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        for row in self.rows_of(rect.top(), rect.bottom()) {
            for col in self.cols_of(rect.left(), rect.right()) {
                self.put(col, row, '█', color);
            }
        }
    }

    fn blit(&mut self, sprite: Sprite, rect: Rect) {
        match sprite {
            Sprite::Bird { tilt } => self.draw_bird(rect, tilt),
            Sprite::Pipe { flipped } => self.draw_pipe(rect, flipped),
            Sprite::Floor => self.draw_floor(rect),
        }
    }

    fn text(&mut self, cx: f32, cy: f32, text: &str, color: Color) {
        let row = self.row_of(cy);
        let start = self.col_of(cx) - text.chars().count() as i32 / 2;
        for (i, ch) in text.chars().enumerate() {
            self.put(start + i as i32, row, ch, color);
        }
    }

    fn ring(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        const STEPS: usize = 48;
        for i in 0..STEPS {
            let angle = i as f32 / STEPS as f32 * std::f32::consts::TAU;
            let col = self.col_of(cx + radius * angle.cos());
            let row = self.row_of(cy + radius * angle.sin());
            self.put(col, row, 'o', color);
        }
    }

    fn present(&mut self) -> std::io::Result<()> {
        let mut prev: Option<(Color, Color)> = None;
        for row in 0..self.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            for cell in &self.cells[start..start + self.cols as usize] {
                if prev != Some((cell.fg, cell.bg)) {
                    self.out.queue(style::SetForegroundColor(cell.fg))?;
                    self.out.queue(style::SetBackgroundColor(cell.bg))?;
                    prev = Some((cell.fg, cell.bg));
                }
                self.out.queue(Print(cell.ch))?;
            }
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}
