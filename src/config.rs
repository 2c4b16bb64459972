//! Compile-time game tuning.
//!
//! Distances are display pixels, velocities are pixels per second and all
//! timing is expressed with `embassy_time` types.

use embassy_time::Duration;

// ── Display ─────────────────────────────────────────────────────────────────

/// Visible field width (landscape orientation).
pub const W: i32 = 320;
/// Visible field height.
pub const H: i32 = 170;
pub const PIXELS: usize = (W * H) as usize;

// ── Timing ──────────────────────────────────────────────────────────────────

pub const TARGET_FPS: u32 = 30;
/// Hardware timer period for one tick.
pub const TICK_PERIOD_US: u64 = 1_000_000 / TARGET_FPS as u64;

/// Mailbox slots between interrupt context and the game loop.
pub const MAILBOX_CAPACITY: usize = 10;
/// How long the game loop waits for an event before doing housekeeping.
pub const RECEIVE_TIMEOUT: Duration = Duration::from_millis(10);

/// Minimum time between two accepted transitions on a button pin.
pub const DEBOUNCE_US: u64 = 500;
/// Inputs in the first second after boot are spurious edges from the board.
pub const STARTUP_QUIET: Duration = Duration::from_secs(1);

pub const DEATH_SCREEN_DELAY: Duration = Duration::from_secs(2);
/// Input on the death screen is ignored until this much time has passed.
pub const DEATH_INPUT_GUARD: Duration = Duration::from_millis(200);

// ── Player ──────────────────────────────────────────────────────────────────

pub const PLAYER_W: i32 = 24;
pub const PLAYER_H: i32 = 8;
pub const PLAYER_Y: i32 = H - PLAYER_H - 6;
pub const PLAYER_VELOCITY_MULTIPLIER: i32 = 3;

// ── Blocks ──────────────────────────────────────────────────────────────────

pub const BLOCK_W: i32 = 16;
pub const BLOCK_H: i32 = 16;
pub const STARTING_BLOCKS: usize = 1;
pub const MAX_BLOCKS: usize = 20;
/// A new block may only spawn once the previous one is this far below the top.
pub const SPAWN_CLEARANCE: i32 = 3 * BLOCK_H;

// ── Difficulty ──────────────────────────────────────────────────────────────

pub const STARTING_VELOCITY: i32 = 60;
pub const MAX_VELOCITY: i32 = 240;
pub const SCORE_INCREMENT: u32 = 10;
/// Difficulty starts rising once the score exceeds this.
pub const DIFFICULTY_THRESHOLD: u32 = 50;
/// Points above the threshold per additional enabled block.
pub const BLOCK_UNLOCK_STEP: u32 = 50;
/// Points above the threshold per velocity increase.
pub const VELOCITY_STEP: u32 = 50;
pub const VELOCITY_INCREMENT: i32 = 10;
