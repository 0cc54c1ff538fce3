//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (plus the config, the current time in milliseconds, and where
//! needed an RNG handle) and returns a brand-new value. Side effects are
//! limited to the injected RNG.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::entities::{Bird, GameState, Phase, PipePair, PowerUp, Rect};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Initial state shown before the first session.
pub fn init_state(config: &GameConfig, high_score: u32) -> GameState {
    GameState {
        bird: fresh_bird(config),
        pipes: Vec::new(),
        phase: Phase::Ready,
        score: 0.0,
        high_score,
        new_best: false,
        power_up: PowerUp::default(),
        next_spawn_ms: config.spawn_interval_ms,
        floor_x: 0.0,
        frame: 0,
    }
}

fn fresh_bird(config: &GameConfig) -> Bird {
    Bird {
        x: config.bird_x,
        y: config.bird_start_y,
        velocity: 0.0,
        width: config.bird_width,
        height: config.bird_height,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Handle a flap key press.
///
/// While playing this sets the bird's velocity to the flap impulse. While
/// inactive it starts a new session, which also applies the impulse.
pub fn flap(state: &GameState, config: &GameConfig, now_ms: u64) -> GameState {
    let state = if state.phase.is_active() {
        state.clone()
    } else {
        start_session(state, config, now_ms)
    };
    GameState {
        bird: Bird {
            velocity: config.flap_impulse,
            ..state.bird
        },
        ..state
    }
}

/// Reset the per-session state and enter `Playing`. The high score,
/// power-up and floor scroll carry over.
pub fn start_session(state: &GameState, config: &GameConfig, now_ms: u64) -> GameState {
    info!(high_score = state.high_score, "session started");
    GameState {
        bird: fresh_bird(config),
        pipes: Vec::new(),
        phase: Phase::Playing,
        score: 0.0,
        new_best: false,
        next_spawn_ms: now_ms + config.spawn_interval_ms,
        ..state.clone()
    }
}

// ── Physics ──────────────────────────────────────────────────────────────────

pub fn apply_gravity(bird: &Bird, gravity: f32) -> Bird {
    let velocity = bird.velocity + gravity;
    Bird {
        velocity,
        y: bird.y + velocity,
        ..bird.clone()
    }
}

/// Shift every pipe left by `speed` and drop the ones whose right edge has
/// passed the left boundary (x = 0).
pub fn move_pipes(pipes: &[PipePair], speed: f32) -> Vec<PipePair> {
    pipes
        .iter()
        .map(|p| PipePair {
            top: p.top.shifted_x(-speed),
            bottom: p.bottom.shifted_x(-speed),
        })
        .filter(|p| p.right() >= 0.0)
        .collect()
}

// ── Spawner ──────────────────────────────────────────────────────────────────

/// Build one pipe pair just beyond the right edge, at a random offset.
pub fn create_pipe(config: &GameConfig, rng: &mut impl Rng) -> PipePair {
    let offset = config
        .pipe_offsets
        .choose(rng)
        .copied()
        .unwrap_or(config.bird_start_y);
    let cx = config.world_width + config.spawn_x_offset;
    PipePair {
        top: Rect::from_midbottom(
            cx,
            offset - config.pipe_gap,
            config.pipe_width,
            config.pipe_height,
        ),
        bottom: Rect::from_midtop(cx, offset, config.pipe_width, config.pipe_height),
    }
}

/// Fire the spawn timer if it is due. Returns the new pipe list and the
/// next firing time. At most one pair spawns per call.
pub fn service_spawn_timer(
    state: &GameState,
    config: &GameConfig,
    now_ms: u64,
    rng: &mut impl Rng,
) -> (Vec<PipePair>, u64) {
    let mut pipes = state.pipes.clone();
    if now_ms < state.next_spawn_ms {
        return (pipes, state.next_spawn_ms);
    }
    let pair = create_pipe(config, rng);
    trace!(gap_top = pair.top.bottom(), "pipe spawned");
    pipes.push(pair);
    (pipes, state.next_spawn_ms + config.spawn_interval_ms)
}

// ── Collision ────────────────────────────────────────────────────────────────

/// `true` while the bird is clear of every pipe and inside the vertical
/// bounds; `false` means the session must end.
pub fn check_collision(bird: &Bird, pipes: &[PipePair], config: &GameConfig) -> bool {
    let rect = bird.rect();
    let hit_pipe = pipes
        .iter()
        .any(|p| rect.overlaps(&p.top) || rect.overlaps(&p.bottom));
    if hit_pipe {
        return false;
    }
    !(rect.top() <= config.ceiling_y || rect.bottom() >= config.floor_y)
}

// ── Power-up ─────────────────────────────────────────────────────────────────

/// Expire the power-up once its duration has elapsed, then roll for a new
/// activation if it is not engaged.
pub fn update_power_up(
    power_up: &PowerUp,
    config: &GameConfig,
    now_ms: u64,
    rng: &mut impl Rng,
) -> PowerUp {
    let mut next = power_up.clone();
    if next.active && now_ms.saturating_sub(next.activated_at_ms) >= config.power_up_duration_ms {
        debug!("power-up expired");
        next.active = false;
    }
    if !next.active && rng.gen_ratio(1, config.power_up_chance) {
        debug!(now_ms, "power-up activated");
        next = PowerUp {
            active: true,
            activated_at_ms: now_ms,
        };
    }
    next
}

/// Milliseconds left on an engaged power-up, `None` when inactive or expired.
pub fn power_up_remaining_ms(power_up: &PowerUp, config: &GameConfig, now_ms: u64) -> Option<u64> {
    if !power_up.active {
        return None;
    }
    let elapsed = now_ms.saturating_sub(power_up.activated_at_ms);
    config
        .power_up_duration_ms
        .checked_sub(elapsed)
        .filter(|&left| left > 0)
}

// ── Floor ────────────────────────────────────────────────────────────────────

/// Scroll one unit left, looping back to 0 at `-world_width`.
pub fn scroll_floor(floor_x: f32, config: &GameConfig) -> f32 {
    let next = floor_x - 1.0;
    if next <= -config.world_width {
        0.0
    } else {
        next
    }
}

// ── Per-frame tick (nearly pure; RNG is injected) ──────────────────────────

/// Advance the simulation by one frame. All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
pub fn tick(state: &GameState, config: &GameConfig, now_ms: u64, rng: &mut impl Rng) -> GameState {
    let frame = state.frame + 1;
    let floor_x = scroll_floor(state.floor_x, config);

    if !state.phase.is_active() {
        return GameState {
            floor_x,
            frame,
            ..state.clone()
        };
    }

    // ── 1. Spawn timer ───────────────────────────────────────────────────────
    let (pipes, next_spawn_ms) = service_spawn_timer(state, config, now_ms, rng);

    // ── 2. Bird & pipes ──────────────────────────────────────────────────────
    let bird = apply_gravity(&state.bird, config.gravity);
    let pipes = move_pipes(&pipes, config.pipe_speed);

    // ── 3. Collision ─────────────────────────────────────────────────────────
    let phase = if check_collision(&bird, &pipes, config) {
        Phase::Playing
    } else {
        Phase::GameOver
    };

    // ── 4. Score & power-up ──────────────────────────────────────────────────
    let score = state.score + config.score_per_frame;
    let power_up = update_power_up(&state.power_up, config, now_ms, rng);

    GameState {
        bird,
        pipes,
        phase,
        score,
        power_up,
        next_spawn_ms,
        floor_x,
        frame,
        ..state.clone()
    }
}

/// `true` when the step from `before` to `after` ended a session.
pub fn session_ended(before: &GameState, after: &GameState) -> bool {
    before.phase.is_active() && !after.phase.is_active()
}
