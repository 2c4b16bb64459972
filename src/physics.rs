//! Frame-rate independent movement and difficulty scaling.
//!
//! Every step is scaled by the measured tick length, so the game plays at
//! the same speed whatever the real frame rate turns out to be.

use embassy_time::Instant;

use crate::{
    config::{
        BLOCK_UNLOCK_STEP,
        DIFFICULTY_THRESHOLD,
        MAX_BLOCKS,
        MAX_VELOCITY,
        PLAYER_VELOCITY_MULTIPLIER,
        PLAYER_W,
        STARTING_BLOCKS,
        STARTING_VELOCITY,
        VELOCITY_INCREMENT,
        VELOCITY_STEP,
        W,
    },
    event::Direction,
    state::{
        GameState,
        Phase,
    },
};

/// Distance covered at `velocity` px/s over `dt_us` microseconds, rounded up
/// so slow or short ticks still move things.
pub fn displacement(velocity: i32, dt_us: u64) -> i32 {
    let velocity = velocity.max(0) as u64;
    velocity.saturating_mul(dt_us).div_ceil(1_000_000) as i32
}

/// Enabled block count and fall speed for a score.
///
/// A step function of the score: flat up to [`DIFFICULTY_THRESHOLD`], then
/// one more block every [`BLOCK_UNLOCK_STEP`] points and
/// [`VELOCITY_INCREMENT`] more speed every [`VELOCITY_STEP`] points, capped
/// at pool capacity and [`MAX_VELOCITY`].
pub fn difficulty(score: u32) -> (usize, i32) {
    let Some(over) = score.checked_sub(DIFFICULTY_THRESHOLD).filter(|&o| o > 0) else {
        return (STARTING_BLOCKS, STARTING_VELOCITY);
    };

    let blocks = STARTING_BLOCKS + (over / BLOCK_UNLOCK_STEP) as usize;
    let velocity = STARTING_VELOCITY + (over / VELOCITY_STEP) as i32 * VELOCITY_INCREMENT;
    (blocks.min(MAX_BLOCKS), velocity.min(MAX_VELOCITY))
}

impl GameState {
    /// Advance the round by `dt_us`. Does nothing outside [`Phase::Game`].
    pub fn advance(&mut self, dt_us: u64, now: Instant) {
        if self.phase != Phase::Game {
            return;
        }

        let (blocks, velocity) = difficulty(self.player.score);
        self.blocks.enable_blocks(blocks);
        self.velocity = self.velocity.max(velocity);

        let step = displacement(self.velocity * PLAYER_VELOCITY_MULTIPLIER, dt_us);
        let dx = match self.player_direction {
            Direction::Left => -step,
            Direction::Right => step,
            Direction::None => 0,
        };
        self.player.x = (self.player.x + dx).clamp(0, W - PLAYER_W);

        let fall = displacement(self.velocity, dt_us);
        for index in 0..MAX_BLOCKS {
            if !self.blocks.get(index).enabled {
                continue;
            }
            if self.blocks.get(index).awaiting_respawn && !self.blocks.respawn(index, &mut self.rng) {
                continue;
            }
            self.blocks.get_mut(index).y += fall;
        }

        self.check_collisions(now);
    }
}
