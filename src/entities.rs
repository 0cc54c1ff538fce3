//! All game entity types. Plain data plus a little rectangle geometry.

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in world units. `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    /// Rectangle whose top edge is centred on `(cx, top)`.
    pub fn from_midtop(cx: f32, top: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w / 2.0, top, w, h)
    }

    /// Rectangle whose bottom edge is centred on `(cx, bottom)`.
    pub fn from_midbottom(cx: f32, bottom: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w / 2.0, bottom - h, w, h)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn shifted_x(&self, dx: f32) -> Rect {
        Rect { x: self.x + dx, ..*self }
    }
}

// ── Bird ──────────────────────────────────────────────────────────────────────

/// The player. `x` is fixed for the lifetime of the game; only `y` and
/// `velocity` change.
#[derive(Clone, Debug, PartialEq)]
pub struct Bird {
    /// Horizontal centre.
    pub x: f32,
    /// Vertical centre.
    pub y: f32,
    /// Vertical velocity in units per frame (negative = upward).
    pub velocity: f32,
    pub width: f32,
    pub height: f32,
}

impl Bird {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.x, self.y, self.width, self.height)
    }

    /// Sprite rotation in degrees, counter-clockwise positive.
    pub fn tilt_degrees(&self) -> f32 {
        -self.velocity * 3.0
    }
}

// ── Pipes ─────────────────────────────────────────────────────────────────────

/// One obstacle: a top and a bottom segment separated by a fixed gap.
#[derive(Clone, Debug, PartialEq)]
pub struct PipePair {
    pub top: Rect,
    pub bottom: Rect,
}

impl PipePair {
    /// Both segments share the same x, so either one gives the right edge.
    pub fn right(&self) -> f32 {
        self.bottom.right()
    }

    pub fn left(&self) -> f32 {
        self.bottom.left()
    }

    pub fn gap(&self) -> f32 {
        self.bottom.top() - self.top.bottom()
    }
}

// ── Power-up ──────────────────────────────────────────────────────────────────

/// Cosmetic timed effect. `activated_at_ms` is meaningful only while active.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PowerUp {
    pub active: bool,
    pub activated_at_ms: u64,
}

// ── Session phase ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Before the first session of this run.
    Ready,
    Playing,
    GameOver,
}

impl Phase {
    pub fn is_active(self) -> bool {
        self == Phase::Playing
    }
}

// ── Persistence ───────────────────────────────────────────────────────────────

/// One row of the high score table.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HighScoreRecord {
    pub id: u64,
    pub score: u32,
    /// UTC, `YYYY-MM-DD HH:MM:SS`.
    pub date: String,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state. Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub bird: Bird,
    pub pipes: Vec<PipePair>,
    pub phase: Phase,
    /// Fractional; shown and persisted as its integer part.
    pub score: f64,
    pub high_score: u32,
    /// Set when the session that just ended beat the previous high score.
    pub new_best: bool,
    pub power_up: PowerUp,
    /// Next time (ms since start) the spawn timer fires.
    pub next_spawn_ms: u64,
    /// Floor scroll offset, in `(-world_width, 0]`.
    pub floor_x: f32,
    /// Frames ticked since launch, logged when a session settles.
    pub frame: u64,
}

impl GameState {
    pub fn display_score(&self) -> u32 {
        self.score.max(0.0) as u32
    }
}
