//! Pure game-logic functions.
//!
//! Every public function takes immutable references (and, where needed, an
//! RNG handle) and returns brand-new values.  Side effects are limited to the
//! injected RNG and log output.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    Direction, EndReason, ExplosionEffect, GameState, GameStatus, Obstacle, PlayerVariant,
    Player, PressedKeys, Projectile, Rect, ScoreTracker, TickInput, OBSTACLE_PALETTE,
};

// ── Bounds checker ────────────────────────────────────────────────────────────

/// `(horizontally_in_bounds, vertically_in_bounds)` against a `width × height`
/// play field.  Edges are inclusive.
pub fn check_bound(rect: &Rect, width: i32, height: i32) -> (bool, bool) {
    let horizontal = rect.left >= 0 && rect.right() <= width;
    let vertical = rect.top >= 0 && rect.bottom() <= height;
    (horizontal, vertical)
}

// ── Constructors ──────────────────────────────────────────────────────────────

pub fn spawn_player(config: &GameConfig) -> Player {
    let (cx, cy) = config.player_start;
    let (w, h) = config.player_size;
    Player {
        rect: Rect::from_center(cx, cy, w, h),
        facing: Direction::Right,
        variant: PlayerVariant::Facing(Direction::Right),
    }
}

/// A circle of random radius and colour, centred anywhere on the field,
/// heading down-right.
pub fn spawn_obstacle(rng: &mut impl Rng, config: &GameConfig) -> Obstacle {
    let radius = rng.gen_range(config.obstacle_radius_min..=config.obstacle_radius_max);
    let color = *OBSTACLE_PALETTE
        .choose(rng)
        .unwrap_or(&OBSTACLE_PALETTE[0]);
    let cx = rng.gen_range(0..=config.field_width);
    let cy = rng.gen_range(0..=config.field_height);
    Obstacle {
        rect: Rect::from_center(cx, cy, 2 * radius, 2 * radius),
        vx: config.obstacle_speed,
        vy: config.obstacle_speed,
        radius,
        color,
    }
}

/// Axis-aligned extent of a `w × h` box rotated to face `direction`.
pub fn rotated_extent(w: i32, h: i32, direction: Direction) -> (i32, i32) {
    let theta = direction.angle_degrees().to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let (w, h) = (f64::from(w), f64::from(h));
    (
        (w * cos + h * sin).round() as i32,
        (w * sin + h * cos).round() as i32,
    )
}

/// Launch a projectile one player-extent ahead of the player, moving along
/// the player's current facing.
pub fn spawn_projectile(player: &Player, config: &GameConfig) -> Projectile {
    let direction = player.facing;
    let (vx, vy) = direction.vector(config.player_step);
    let (sx, sy) = direction.signs();
    let (pw, ph) = config.projectile_size;
    let (w, h) = rotated_extent(pw, ph, direction);
    let (cx, cy) = player.rect.center();
    Projectile {
        rect: Rect::from_center(
            cx + player.rect.width * sx,
            cy + player.rect.height * sy,
            w,
            h,
        ),
        vx,
        vy,
        direction,
    }
}

pub fn spawn_explosion(obstacle: &Obstacle, config: &GameConfig, now_ms: u64) -> ExplosionEffect {
    let (cx, cy) = obstacle.rect.center();
    let (w, h) = config.explosion_size;
    ExplosionEffect {
        rect: Rect::from_center(cx, cy, w, h),
        start_ms: now_ms,
        duration_ms: config.explosion_duration_ms,
    }
}

/// Build the initial game state: a fresh player and `obstacle_count`
/// randomly placed obstacles.
pub fn init_state(config: &GameConfig, rng: &mut impl Rng) -> GameState {
    let obstacles: Vec<Obstacle> = (0..config.obstacle_count)
        .map(|_| spawn_obstacle(&mut *rng, config))
        .collect();
    GameState {
        player: spawn_player(config),
        obstacles,
        projectiles: Vec::new(),
        explosions: Vec::new(),
        score: ScoreTracker::new(config.obstacle_count),
        status: GameStatus::Running,
        frame: 0,
        width: config.field_width,
        height: config.field_height,
    }
}

// ── Per-entity updates ────────────────────────────────────────────────────────

/// Apply the held keys to the player.  A move that leaves the field on
/// either axis is undone entirely.  Any non-zero displacement re-orients
/// the player, even when the move itself was undone.
pub fn move_player(
    player: &Player,
    keys: &PressedKeys,
    width: i32,
    height: i32,
    step: i32,
) -> Player {
    let mut dx = 0;
    let mut dy = 0;
    if keys.up {
        dy -= step;
    }
    if keys.down {
        dy += step;
    }
    if keys.left {
        dx -= step;
    }
    if keys.right {
        dx += step;
    }

    let moved = player.rect.translated(dx, dy);
    let rect = if check_bound(&moved, width, height) == (true, true) {
        moved
    } else {
        player.rect
    };

    match Direction::from_delta(dx, dy) {
        Some(facing) => Player {
            rect,
            facing,
            variant: PlayerVariant::Facing(facing),
        },
        None => Player { rect, ..player.clone() },
    }
}

/// Bounce off the field edges, then move.  The edge test uses the position
/// before this move, so an obstacle may sit past the edge for one tick.
pub fn advance_obstacle(obstacle: &Obstacle, width: i32, height: i32) -> Obstacle {
    let (horizontal, vertical) = check_bound(&obstacle.rect, width, height);
    let vx = if horizontal { obstacle.vx } else { -obstacle.vx };
    let vy = if vertical { obstacle.vy } else { -obstacle.vy };
    Obstacle {
        rect: obstacle.rect.translated(vx, vy),
        vx,
        vy,
        ..obstacle.clone()
    }
}

/// Projectiles fly in a straight line forever; they are only removed by
/// hitting an obstacle.
pub fn advance_projectile(projectile: &Projectile) -> Projectile {
    Projectile {
        rect: projectile.rect.translated(projectile.vx, projectile.vy),
        ..projectile.clone()
    }
}

pub fn player_collides(player: &Player, obstacles: &[Obstacle]) -> bool {
    obstacles.iter().any(|o| player.rect.intersects(&o.rect))
}

// ── Collision & destruction ───────────────────────────────────────────────────

/// Survivors of one projectile-vs-obstacle pass.
#[derive(Clone, Debug)]
pub struct HitOutcome {
    pub obstacles: Vec<Obstacle>,
    pub projectiles: Vec<Projectile>,
    /// One new effect per destroyed obstacle, in obstacle order.
    pub explosions: Vec<ExplosionEffect>,
}

impl HitOutcome {
    pub fn destroyed(&self) -> usize {
        self.explosions.len()
    }
}

/// Each obstacle, in order, is destroyed if any unspent projectile overlaps
/// it, and every unspent projectile overlapping it is spent with it.  A
/// projectile is spent by at most one obstacle, and each destroyed obstacle
/// leaves exactly one explosion.
pub fn resolve_hits(
    obstacles: &[Obstacle],
    projectiles: &[Projectile],
    config: &GameConfig,
    now_ms: u64,
) -> HitOutcome {
    let mut spent = vec![false; projectiles.len()];
    let mut destroyed = vec![false; obstacles.len()];
    let mut explosions = Vec::new();

    for (oi, obstacle) in obstacles.iter().enumerate() {
        let hits: Vec<usize> = projectiles
            .iter()
            .enumerate()
            .filter(|(pi, p)| !spent[*pi] && p.rect.intersects(&obstacle.rect))
            .map(|(pi, _)| pi)
            .collect();
        if hits.is_empty() {
            continue;
        }
        for &pi in &hits {
            spent[pi] = true;
        }
        destroyed[oi] = true;
        explosions.push(spawn_explosion(obstacle, config, now_ms));
        log::debug!(
            "obstacle r={} at {:?} destroyed by projectiles {:?}",
            obstacle.radius,
            obstacle.rect.center(),
            hits
        );
    }

    let obstacles: Vec<Obstacle> = obstacles
        .iter()
        .zip(&destroyed)
        .filter(|(_, gone)| !**gone)
        .map(|(o, _)| o.clone())
        .collect();

    let projectiles: Vec<Projectile> = projectiles
        .iter()
        .zip(&spent)
        .filter(|(_, gone)| !**gone)
        .map(|(p, _)| p.clone())
        .collect();

    HitOutcome {
        obstacles,
        projectiles,
        explosions,
    }
}

// ── Per-frame tick ────────────────────────────────────────────────────────────

/// Advance the session by one tick.  `now_ms` is the session clock; it only
/// drives explosion lifetimes and the defeat pause.
pub fn tick(state: &GameState, input: &TickInput, config: &GameConfig, now_ms: u64) -> GameState {
    match state.status {
        GameStatus::Ended(_) => return state.clone(),
        GameStatus::Ending { until_ms } => {
            let status = if input.close_requested {
                GameStatus::Ended(EndReason::CloseRequested)
            } else if now_ms >= until_ms {
                GameStatus::Ended(EndReason::Defeated)
            } else {
                return state.clone();
            };
            return GameState {
                status,
                ..state.clone()
            };
        }
        GameStatus::Running => {}
    }

    // ── 1. Input events ──────────────────────────────────────────────────────
    if input.close_requested {
        log::info!("close requested at frame {}", state.frame);
        return GameState {
            status: GameStatus::Ended(EndReason::CloseRequested),
            ..state.clone()
        };
    }

    let mut projectiles = state.projectiles.clone();
    for _ in 0..input.fire_presses {
        projectiles.push(spawn_projectile(&state.player, config));
    }

    // ── 2. Player vs obstacles (terminal) ────────────────────────────────────
    if player_collides(&state.player, &state.obstacles) {
        log::info!(
            "player defeated at frame {} with score {}, holding for {} ms",
            state.frame,
            state.score.destroyed,
            config.defeat_pause_ms
        );
        return GameState {
            player: Player {
                variant: PlayerVariant::Defeated,
                ..state.player.clone()
            },
            projectiles,
            status: GameStatus::Ending {
                until_ms: now_ms.saturating_add(config.defeat_pause_ms),
            },
            frame: state.frame + 1,
            ..state.clone()
        };
    }

    // ── 3. Projectiles vs obstacles ──────────────────────────────────────────
    let outcome = resolve_hits(&state.obstacles, &projectiles, config, now_ms);

    // ── 4. Move everything ───────────────────────────────────────────────────
    let settled = Player {
        variant: PlayerVariant::Facing(state.player.facing),
        ..state.player.clone()
    };
    let mut player = move_player(
        &settled,
        &input.keys,
        state.width,
        state.height,
        config.player_step,
    );
    if outcome.destroyed() > 0 {
        player.variant = PlayerVariant::Hit;
    }

    let obstacles: Vec<Obstacle> = outcome
        .obstacles
        .iter()
        .map(|o| advance_obstacle(o, state.width, state.height))
        .collect();

    let projectiles: Vec<Projectile> = outcome
        .projectiles
        .iter()
        .map(advance_projectile)
        .collect();

    // ── 5. Score ─────────────────────────────────────────────────────────────
    let mut score = state.score;
    score.update(obstacles.len());

    // ── 6. Explosions ────────────────────────────────────────────────────────
    let mut explosions = state.explosions.clone();
    explosions.extend(outcome.explosions);
    explosions.retain(|e| e.is_active(now_ms));

    GameState {
        player,
        obstacles,
        projectiles,
        explosions,
        score,
        frame: state.frame + 1,
        ..state.clone()
    }
}
