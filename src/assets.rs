//! Visual assets.
//!
//! A terminal has no bitmaps, so every asset is a small glyph sprite: a fill
//! character painted over the entity's box and an optional mark for the
//! centre cell.  The table is built once at start-up and looked up by
//! `AssetId` every frame.

use crossterm::style::Color;

use crate::entities::{Direction, PlayerVariant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub fill: char,
    pub mark: Option<char>,
    pub color: Color,
}

impl Sprite {
    const fn new(fill: char, mark: Option<char>, color: Color) -> Self {
        Sprite { fill, mark, color }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetId {
    Background,
    Border,
    Player(PlayerVariant),
    Projectile(Direction),
    Explosion,
    Score,
}

// Arrow marks, indexed by `Direction::index()`.
const FACING_MARKS: [char; 8] = ['→', '↗', '↑', '↖', '←', '↙', '↓', '↘'];
const BEAM_FILLS: [char; 8] = ['─', '╱', '│', '╲', '─', '╱', '│', '╲'];

const C_BACKGROUND: Color = Color::DarkGrey;
const C_BORDER: Color = Color::DarkBlue;
const C_PLAYER: Color = Color::White;
const C_PLAYER_HIT: Color = Color::Yellow;
const C_PLAYER_DEFEATED: Color = Color::Red;
const C_BEAM: Color = Color::Cyan;
const C_EXPLOSION: Color = Color::Rgb { r: 255, g: 140, b: 0 };
const C_SCORE: Color = Color::Blue;

#[derive(Clone, Debug)]
pub struct Assets {
    background: Sprite,
    border: Sprite,
    player_facing: [Sprite; 8],
    player_hit: Sprite,
    player_defeated: Sprite,
    projectile: [Sprite; 8],
    explosion: Sprite,
    score: Sprite,
}

impl Assets {
    /// Build the sprite table, including one player and one projectile
    /// sprite per facing direction.
    pub fn load() -> Self {
        let player_facing =
            Direction::ALL.map(|d| Sprite::new('▓', Some(FACING_MARKS[d.index()]), C_PLAYER));
        let projectile = Direction::ALL.map(|d| Sprite::new(BEAM_FILLS[d.index()], None, C_BEAM));
        log::debug!("built {} directional sprites", player_facing.len() + projectile.len());
        Assets {
            background: Sprite::new('·', None, C_BACKGROUND),
            border: Sprite::new('│', None, C_BORDER),
            player_facing,
            player_hit: Sprite::new('▓', Some('!'), C_PLAYER_HIT),
            player_defeated: Sprite::new('▒', Some('x'), C_PLAYER_DEFEATED),
            projectile,
            explosion: Sprite::new('*', Some('✺'), C_EXPLOSION),
            score: Sprite::new(' ', None, C_SCORE),
        }
    }

    pub fn sprite(&self, id: AssetId) -> Sprite {
        match id {
            AssetId::Background => self.background,
            AssetId::Border => self.border,
            AssetId::Player(PlayerVariant::Facing(d)) => self.player_facing[d.index()],
            AssetId::Player(PlayerVariant::Hit) => self.player_hit,
            AssetId::Player(PlayerVariant::Defeated) => self.player_defeated,
            AssetId::Projectile(d) => self.projectile[d.index()],
            AssetId::Explosion => self.explosion,
            AssetId::Score => self.score,
        }
    }
}
