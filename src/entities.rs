//! All game entity types — plain data plus a few geometric helpers.
//!
//! Coordinates are logical play-field units (`i32`), y grows downward.

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned box used by every entity for position and collision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Rect { left, top, width, height }
    }

    /// Build a rect of the given size whose centre lands on `(cx, cy)`.
    pub fn from_center(cx: i32, cy: i32, width: i32, height: i32) -> Self {
        Rect {
            left: cx - width / 2,
            top: cy - height / 2,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    pub fn center(&self) -> (i32, i32) {
        (self.left + self.width / 2, self.top + self.height / 2)
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }

    /// Strict overlap test.  Rects that only share an edge do not intersect,
    /// and an empty rect never intersects anything.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.width <= 0 || self.height <= 0 || other.width <= 0 || other.height <= 0 {
            return false;
        }
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

// ── Facing direction ──────────────────────────────────────────────────────────

/// The eight movement buckets, listed counter-clockwise starting from right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    UpRight,
    Up,
    UpLeft,
    Left,
    DownLeft,
    Down,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Right,
        Direction::UpRight,
        Direction::Up,
        Direction::UpLeft,
        Direction::Left,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
    ];

    /// Position in `ALL`; used to index per-direction lookup tables.
    pub fn index(self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::UpRight => 1,
            Direction::Up => 2,
            Direction::UpLeft => 3,
            Direction::Left => 4,
            Direction::DownLeft => 5,
            Direction::Down => 6,
            Direction::DownRight => 7,
        }
    }

    /// Unit signs `(sx, sy)` for this bucket.
    pub fn signs(self) -> (i32, i32) {
        match self {
            Direction::Right => (1, 0),
            Direction::UpRight => (1, -1),
            Direction::Up => (0, -1),
            Direction::UpLeft => (-1, -1),
            Direction::Left => (-1, 0),
            Direction::DownLeft => (-1, 1),
            Direction::Down => (0, 1),
            Direction::DownRight => (1, 1),
        }
    }

    /// Velocity vector with per-axis magnitude `step`.
    pub fn vector(self, step: i32) -> (i32, i32) {
        let (sx, sy) = self.signs();
        (sx * step, sy * step)
    }

    /// Classify a displacement by the sign of each axis.  `None` for (0, 0).
    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        match (dx.signum(), dy.signum()) {
            (1, 0) => Some(Direction::Right),
            (1, -1) => Some(Direction::UpRight),
            (0, -1) => Some(Direction::Up),
            (-1, -1) => Some(Direction::UpLeft),
            (-1, 0) => Some(Direction::Left),
            (-1, 1) => Some(Direction::DownLeft),
            (0, 1) => Some(Direction::Down),
            (1, 1) => Some(Direction::DownRight),
            _ => None,
        }
    }

    /// Angle in degrees, counter-clockwise from the +x axis as seen on screen.
    pub fn angle_degrees(self) -> f64 {
        self.index() as f64 * 45.0
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerVariant {
    /// Normal sprite, oriented along the facing direction.
    Facing(Direction),
    /// Shown on the frame an obstacle is shot down.
    Hit,
    /// Shown once an obstacle reaches the player.
    Defeated,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    pub facing: Direction,
    pub variant: PlayerVariant,
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

/// 24-bit colour; converted to a terminal colour only at render time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Palette obstacles pick their colour from.
pub const OBSTACLE_PALETTE: [Rgb; 6] = [
    Rgb(255, 0, 0),
    Rgb(0, 255, 0),
    Rgb(0, 0, 255),
    Rgb(255, 255, 0),
    Rgb(255, 0, 255),
    Rgb(0, 255, 255),
];

/// A bouncing circle.  `rect` is the circle's `2r × 2r` bounding box.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
    pub vx: i32,
    pub vy: i32,
    pub radius: i32,
    pub color: Rgb,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub rect: Rect,
    pub vx: i32,
    pub vy: i32,
    /// Facing of the player when fired; fixes the sprite orientation.
    pub direction: Direction,
}

// ── Explosions ────────────────────────────────────────────────────────────────

/// Visual marker left where an obstacle was shot down.
#[derive(Clone, Debug, PartialEq)]
pub struct ExplosionEffect {
    pub rect: Rect,
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl ExplosionEffect {
    pub fn is_active(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) < self.duration_ms
    }
}

// ── Score ─────────────────────────────────────────────────────────────────────

/// Destroyed-obstacle counter derived from how many obstacles remain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreTracker {
    pub initial: usize,
    pub destroyed: usize,
}

impl ScoreTracker {
    pub fn new(initial: usize) -> Self {
        ScoreTracker { initial, destroyed: 0 }
    }

    pub fn update(&mut self, live_obstacles: usize) {
        self.destroyed = self.initial.saturating_sub(live_obstacles);
    }
}

// ── Session status ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    CloseRequested,
    Defeated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    /// The defeat frame is on screen; the session ends at `until_ms`.
    Ending { until_ms: u64 },
    Ended(EndReason),
}

// ── Per-tick input ────────────────────────────────────────────────────────────

/// Directional keys currently held down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PressedKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Everything the loop collected from the input source since the last tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInput {
    pub close_requested: bool,
    /// Number of fire presses; each one launches a projectile.
    pub fire_presses: usize,
    pub keys: PressedKeys,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub projectiles: Vec<Projectile>,
    pub explosions: Vec<ExplosionEffect>,
    pub score: ScoreTracker,
    pub status: GameStatus,
    pub frame: u64,
    pub width: i32,
    pub height: i32,
}

impl GameState {
    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Ended(_))
    }
}
