//! Rendering layer.
//!
//! `render` receives a drawing surface and an immutable view of the game
//! state. No game logic is performed; this module only translates state into
//! draw calls on a `Canvas`.

pub mod terminal;

use crossterm::style::Color;

use crate::compute::power_up_remaining_ms;
use crate::config::GameConfig;
use crate::entities::{GameState, Phase, Rect};

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_BACKGROUND: Color = Color::Black;
pub const C_SCORE: Color = Color::White;
pub const C_HIGH_SCORE: Color = Color::Yellow;
pub const C_POWER_UP: Color = Color::Yellow;
pub const C_TITLE: Color = Color::Cyan;
pub const C_HINT: Color = Color::DarkGrey;

// ── Surface ───────────────────────────────────────────────────────────────────

/// Pre-made images the surface knows how to draw into a rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sprite {
    /// Rotated by `tilt` degrees, positive = nose up.
    Bird { tilt: f32 },
    /// Top segments are drawn flipped, cap facing down.
    Pipe { flipped: bool },
    Floor,
}

/// A fixed-size 2D drawing surface in world coordinates.
pub trait Canvas {
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn blit(&mut self, sprite: Sprite, rect: Rect);

    /// Draw `text` centred on `(cx, cy)`.
    fn text(&mut self, cx: f32, cy: f32, text: &str, color: Color);

    /// Circle outline centred on `(cx, cy)`.
    fn ring(&mut self, cx: f32, cy: f32, radius: f32, color: Color);

    /// Show everything drawn since the last `clear`. Called once per frame.
    fn present(&mut self) -> std::io::Result<()>;
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<C: Canvas>(
    canvas: &mut C,
    state: &GameState,
    config: &GameConfig,
    now_ms: u64,
) -> std::io::Result<()> {
    canvas.clear(C_BACKGROUND);

    match state.phase {
        Phase::Playing => draw_playing(canvas, state, config, now_ms),
        Phase::GameOver => draw_game_over(canvas, state, config),
        Phase::Ready => draw_ready(canvas, state, config),
    }

    draw_floor(canvas, state, config);
    canvas.present()
}

// ── Phases ────────────────────────────────────────────────────────────────────

fn draw_playing<C: Canvas>(canvas: &mut C, state: &GameState, config: &GameConfig, now_ms: u64) {
    for pipe in &state.pipes {
        canvas.blit(Sprite::Pipe { flipped: true }, pipe.top);
        canvas.blit(Sprite::Pipe { flipped: false }, pipe.bottom);
    }

    canvas.blit(
        Sprite::Bird {
            tilt: state.bird.tilt_degrees(),
        },
        state.bird.rect(),
    );

    let cx = config.world_width / 2.0;
    canvas.text(cx, 50.0, &state.display_score().to_string(), C_SCORE);

    if let Some(left) = power_up_remaining_ms(&state.power_up, config, now_ms) {
        let (bx, by) = state.bird.rect().center();
        canvas.ring(bx, by, config.power_up_radius, C_POWER_UP);
        let tag = format!("POWER {}s", left.div_ceil(1000));
        canvas.text(cx, 90.0, &tag, C_POWER_UP);
    }
}

fn draw_game_over<C: Canvas>(canvas: &mut C, state: &GameState, config: &GameConfig) {
    let cx = config.world_width / 2.0;
    canvas.text(cx, 50.0, &format!("Score: {}", state.display_score()), C_SCORE);
    if state.new_best {
        canvas.text(cx, 90.0, "NEW BEST", C_HIGH_SCORE);
    }
    canvas.text(cx, 300.0, "SPACE - Play Again  Q - Quit", C_HINT);
    canvas.text(
        cx,
        500.0,
        &format!("High Score: {}", state.high_score),
        C_HIGH_SCORE,
    );
}

fn draw_ready<C: Canvas>(canvas: &mut C, state: &GameState, config: &GameConfig) {
    let cx = config.world_width / 2.0;
    canvas.text(cx, 150.0, "FLAPPY", C_TITLE);
    canvas.fill_rect(Rect::new(cx - 60.0, 175.0, 120.0, 5.0), C_TITLE);
    canvas.text(cx, 300.0, "SPACE / UP : Flap   Q : Quit", C_HINT);
    if state.high_score > 0 {
        canvas.text(
            cx,
            500.0,
            &format!("High Score: {}", state.high_score),
            C_HIGH_SCORE,
        );
    }
}

// ── Floor ─────────────────────────────────────────────────────────────────────

/// Two tiles side by side so the scroll wraps without a seam.
fn draw_floor<C: Canvas>(canvas: &mut C, state: &GameState, config: &GameConfig) {
    let h = config.world_height - config.floor_y;
    for x in [state.floor_x, state.floor_x + config.world_width] {
        canvas.blit(Sprite::Floor, Rect::new(x, config.floor_y, config.world_width, h));
    }
}
