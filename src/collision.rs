//! Player/block overlap, scoring and death.

use embassy_time::Instant;

use crate::{
    blocks::Block,
    config::{
        BLOCK_H,
        BLOCK_W,
        H,
        MAX_BLOCKS,
        PLAYER_H,
        PLAYER_W,
        SCORE_INCREMENT,
    },
    state::{
        GameState,
        Phase,
        Player,
    },
};

/// Axis-aligned rectangle, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn overlaps(&self, other: &Rect) -> bool {
        let disjoint_x = self.x + self.w <= other.x || other.x + other.w <= self.x;
        let disjoint_y = self.y + self.h <= other.y || other.y + other.h <= self.y;
        !disjoint_x && !disjoint_y
    }
}

impl From<&Player> for Rect {
    fn from(player: &Player) -> Self {
        Self {
            x: player.x,
            y: player.y,
            w: PLAYER_W,
            h: PLAYER_H,
        }
    }
}

impl From<&Block> for Rect {
    fn from(block: &Block) -> Self {
        Self {
            x: block.x,
            y: block.y,
            w: BLOCK_W,
            h: BLOCK_H,
        }
    }
}

impl GameState {
    /// Check every block on the field against the player.
    ///
    /// A hit ends the round immediately. A block that fell past the bottom
    /// without touching the player is parked for respawn and scores.
    pub fn check_collisions(&mut self, now: Instant) {
        let player = Rect::from(&self.player);

        for index in 0..MAX_BLOCKS {
            let block = self.blocks.get_mut(index);
            if !block.is_live() {
                continue;
            }

            if Rect::from(&*block).overlaps(&player) {
                info!("Player died with score {}", self.player.score);
                self.phase = Phase::Death { died_at: now };
                return;
            }

            if block.y >= H {
                block.awaiting_respawn = true;
                self.player.score += SCORE_INCREMENT;
            }
        }
    }
}
