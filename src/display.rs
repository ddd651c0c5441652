//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a `RenderContext` (the writer, the viewport that
//! maps play-field units onto terminal cells, and the sprite table) plus an
//! immutable view of the game state.  No game logic is performed; this
//! module only translates state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::assets::{AssetId, Assets, Sprite};
use crate::entities::{ExplosionEffect, GameState, Obstacle, Player, Projectile, Rect, Rgb, ScoreTracker};

/// Logical position the score text is centred on.
const SCORE_ANCHOR: (i32, i32) = (70, 50);

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Half-open range of terminal cells, in absolute terminal coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellSpan {
    pub col0: u16,
    pub row0: u16,
    pub col1: u16,
    pub row1: u16,
}

impl CellSpan {
    pub fn width(&self) -> u16 {
        self.col1 - self.col0
    }

    pub fn height(&self) -> u16 {
        self.row1 - self.row0
    }
}

/// Maps the logical play field onto a block of terminal cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Top-left terminal cell of the field.
    pub col: u16,
    pub row: u16,
    /// Size of the field in cells.
    pub cols: u16,
    pub rows: u16,
    pub field_width: i32,
    pub field_height: i32,
}

impl Viewport {
    /// Fit the field inside a one-cell border on a `term_cols × term_rows`
    /// terminal.
    pub fn fit(term_cols: u16, term_rows: u16, field_width: i32, field_height: i32) -> Self {
        Viewport {
            col: 1,
            row: 1,
            cols: term_cols.saturating_sub(2).max(1),
            rows: term_rows.saturating_sub(2).max(1),
            field_width: field_width.max(1),
            field_height: field_height.max(1),
        }
    }

    /// Field-relative cell containing logical point `(x, y)`.  May lie
    /// outside the field.
    pub fn to_cell(&self, x: i32, y: i32) -> (i64, i64) {
        let col = (i64::from(x) * i64::from(self.cols)).div_euclid(i64::from(self.field_width));
        let row = (i64::from(y) * i64::from(self.rows)).div_euclid(i64::from(self.field_height));
        (col, row)
    }

    /// Logical centre of a field-relative cell.
    pub fn cell_center(&self, col: u16, row: u16) -> (f64, f64) {
        let x = (f64::from(col) + 0.5) * f64::from(self.field_width) / f64::from(self.cols);
        let y = (f64::from(row) + 0.5) * f64::from(self.field_height) / f64::from(self.rows);
        (x, y)
    }

    /// Cells covered by `rect`, clipped to the field.  `None` when nothing
    /// of it is visible.
    pub fn span(&self, rect: &Rect) -> Option<CellSpan> {
        if rect.width <= 0 || rect.height <= 0 {
            return None;
        }
        let (c0, r0) = self.to_cell(rect.left, rect.top);
        let (c1, r1) = self.to_cell(rect.right() - 1, rect.bottom() - 1);
        let c0 = c0.max(0);
        let r0 = r0.max(0);
        let c1 = (c1 + 1).min(i64::from(self.cols));
        let r1 = (r1 + 1).min(i64::from(self.rows));
        if c0 >= c1 || r0 >= r1 {
            return None;
        }
        // Bounded by `cols`/`rows`, so the casts cannot truncate.
        Some(CellSpan {
            col0: self.col + c0 as u16,
            row0: self.row + r0 as u16,
            col1: self.col + c1 as u16,
            row1: self.row + r1 as u16,
        })
    }
}

// ── Render context ────────────────────────────────────────────────────────────

/// Explicit drawing handle threaded through every render call.
pub struct RenderContext<'a, W: Write> {
    pub out: &'a mut W,
    pub viewport: Viewport,
    pub assets: &'a Assets,
}

impl<'a, W: Write> RenderContext<'a, W> {
    pub fn new(out: &'a mut W, viewport: Viewport, assets: &'a Assets) -> Self {
        RenderContext { out, viewport, assets }
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame and present it.
pub fn render<W: Write>(
    ctx: &mut RenderContext<'_, W>,
    state: &GameState,
    now_ms: u64,
) -> std::io::Result<()> {
    ctx.out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_background(ctx)?;
    draw_player(ctx, &state.player)?;
    for obstacle in &state.obstacles {
        draw_obstacle(ctx, obstacle)?;
    }
    for projectile in &state.projectiles {
        draw_projectile(ctx, projectile)?;
    }
    draw_score(ctx, &state.score)?;
    for effect in &state.explosions {
        render_if_active(ctx, effect, now_ms)?;
    }

    present(ctx)
}

/// Draw `effect` if it is still within its lifetime.  Returns whether it
/// was drawn.
pub fn render_if_active<W: Write>(
    ctx: &mut RenderContext<'_, W>,
    effect: &ExplosionEffect,
    now_ms: u64,
) -> std::io::Result<bool> {
    if !effect.is_active(now_ms) {
        return Ok(false);
    }
    let sprite = ctx.assets.sprite(AssetId::Explosion);
    draw_sprite(ctx, &effect.rect, sprite)?;
    Ok(true)
}

/// Reset colours, park the cursor and flush.
pub fn present<W: Write>(ctx: &mut RenderContext<'_, W>) -> std::io::Result<()> {
    let v = ctx.viewport;
    ctx.out.queue(style::ResetColor)?;
    ctx.out.queue(cursor::MoveTo(0, v.row + v.rows))?;
    ctx.out.flush()?;
    Ok(())
}

// ── Background ────────────────────────────────────────────────────────────────

fn draw_background<W: Write>(ctx: &mut RenderContext<'_, W>) -> std::io::Result<()> {
    let v = ctx.viewport;
    let w = v.cols as usize;

    let border = ctx.assets.sprite(AssetId::Border);
    ctx.out.queue(style::SetForegroundColor(border.color))?;

    ctx.out.queue(cursor::MoveTo(v.col.saturating_sub(1), v.row.saturating_sub(1)))?;
    ctx.out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;

    ctx.out.queue(cursor::MoveTo(v.col.saturating_sub(1), v.row + v.rows))?;
    ctx.out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

    for row in v.row..v.row + v.rows {
        ctx.out.queue(cursor::MoveTo(v.col.saturating_sub(1), row))?;
        ctx.out.queue(Print(border.fill))?;
        ctx.out.queue(cursor::MoveTo(v.col + v.cols, row))?;
        ctx.out.queue(Print(border.fill))?;
    }

    // Sparse fixed starfield
    let stars = ctx.assets.sprite(AssetId::Background);
    ctx.out.queue(style::SetForegroundColor(stars.color))?;
    for row in 0..v.rows {
        for col in 0..v.cols {
            if (u32::from(col) * 7 + u32::from(row) * 13) % 29 == 0 {
                ctx.out.queue(cursor::MoveTo(v.col + col, v.row + row))?;
                ctx.out.queue(Print(stars.fill))?;
            }
        }
    }

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(ctx: &mut RenderContext<'_, W>, player: &Player) -> std::io::Result<()> {
    let sprite = ctx.assets.sprite(AssetId::Player(player.variant));
    draw_sprite(ctx, &player.rect, sprite)
}

fn draw_projectile<W: Write>(
    ctx: &mut RenderContext<'_, W>,
    projectile: &Projectile,
) -> std::io::Result<()> {
    let sprite = ctx.assets.sprite(AssetId::Projectile(projectile.direction));
    draw_sprite(ctx, &projectile.rect, sprite)
}

/// Fill the cells whose centres fall inside the circle; tiny circles that
/// cover no cell centre still get one cell.
fn draw_obstacle<W: Write>(ctx: &mut RenderContext<'_, W>, obstacle: &Obstacle) -> std::io::Result<()> {
    let v = ctx.viewport;
    let Some(span) = v.span(&obstacle.rect) else {
        return Ok(());
    };
    let (cx, cy) = obstacle.rect.center();
    let (cx, cy) = (f64::from(cx), f64::from(cy));
    let r2 = f64::from(obstacle.radius).powi(2);

    ctx.out.queue(style::SetForegroundColor(rgb(obstacle.color)))?;
    let mut drawn = 0usize;
    for row in span.row0..span.row1 {
        for col in span.col0..span.col1 {
            let (x, y) = v.cell_center(col - v.col, row - v.row);
            if (x - cx).powi(2) + (y - cy).powi(2) <= r2 {
                ctx.out.queue(cursor::MoveTo(col, row))?;
                ctx.out.queue(Print('●'))?;
                drawn += 1;
            }
        }
    }
    if drawn == 0 {
        ctx.out.queue(cursor::MoveTo(
            span.col0 + span.width() / 2,
            span.row0 + span.height() / 2,
        ))?;
        ctx.out.queue(Print('●'))?;
    }
    Ok(())
}

fn draw_score<W: Write>(ctx: &mut RenderContext<'_, W>, score: &ScoreTracker) -> std::io::Result<()> {
    let v = ctx.viewport;
    let text = format!("score:{}", score.destroyed);
    let (col, row) = v.to_cell(SCORE_ANCHOR.0, SCORE_ANCHOR.1);
    let half = text.chars().count() as i64 / 2;
    let col = (col - half).clamp(0, i64::from(v.cols.saturating_sub(1))) as u16;
    let row = row.clamp(0, i64::from(v.rows.saturating_sub(1))) as u16;

    let sprite = ctx.assets.sprite(AssetId::Score);
    ctx.out.queue(cursor::MoveTo(v.col + col, v.row + row))?;
    ctx.out.queue(style::SetForegroundColor(sprite.color))?;
    ctx.out.queue(Print(text))?;
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Paint `sprite.fill` over every visible cell of `rect`, then the mark on
/// the centre cell.
fn draw_sprite<W: Write>(
    ctx: &mut RenderContext<'_, W>,
    rect: &Rect,
    sprite: Sprite,
) -> std::io::Result<()> {
    let Some(span) = ctx.viewport.span(rect) else {
        return Ok(());
    };
    ctx.out.queue(style::SetForegroundColor(sprite.color))?;
    let row_text: String = std::iter::repeat(sprite.fill)
        .take(span.width() as usize)
        .collect();
    for row in span.row0..span.row1 {
        ctx.out.queue(cursor::MoveTo(span.col0, row))?;
        ctx.out.queue(Print(&row_text))?;
    }
    if let Some(mark) = sprite.mark {
        ctx.out.queue(cursor::MoveTo(
            span.col0 + span.width() / 2,
            span.row0 + span.height() / 2,
        ))?;
        ctx.out.queue(Print(mark))?;
    }
    Ok(())
}

fn rgb(color: Rgb) -> Color {
    let Rgb(r, g, b) = color;
    Color::Rgb { r, g, b }
}
