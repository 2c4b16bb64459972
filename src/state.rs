//! Game state owned by the game loop.

use embassy_time::Instant;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::{
    blocks::BlockPool,
    config::{
        DEATH_SCREEN_DELAY,
        PLAYER_W,
        PLAYER_Y,
        STARTING_BLOCKS,
        STARTING_VELOCITY,
        STARTUP_QUIET,
        W,
    },
    event::Direction,
};

/// High-level mode of the game. Exactly one holds at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Game,
    /// Game over; remembers when the player died so the screen can time out.
    Death { died_at: Instant },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub score: u32,
}

impl Player {
    const fn start() -> Self {
        Self {
            x: (W - PLAYER_W) / 2,
            y: PLAYER_Y,
            score: 0,
        }
    }
}

pub struct GameState {
    pub phase: Phase,
    /// Global fall speed in pixels per second.
    pub velocity: i32,
    pub player_direction: Direction,
    /// Menu cursor: 0 = title, 1 = instructions.
    pub selection: u8,
    pub player: Player,
    pub blocks: BlockPool,
    pub(crate) rng: Pcg32,
    /// Inputs before this instant are boot noise.
    pub(crate) quiet_until: Instant,
}

impl GameState {
    /// Fresh state sitting on the menu.
    ///
    /// `seed` is taken once per boot; later games keep drawing from the same
    /// generator.
    pub fn new(seed: u64, booted: Instant) -> Self {
        Self {
            phase: Phase::Menu,
            velocity: STARTING_VELOCITY,
            player_direction: Direction::None,
            selection: 0,
            player: Player::start(),
            blocks: BlockPool::new(),
            rng: Pcg32::seed_from_u64(seed),
            quiet_until: booted + STARTUP_QUIET,
        }
    }

    /// Reset everything a new round needs and enter [`Phase::Game`].
    pub fn start_game(&mut self) {
        self.phase = Phase::Game;
        self.selection = 0;
        self.velocity = STARTING_VELOCITY;
        self.player_direction = Direction::None;
        self.player = Player::start();
        self.blocks.reset();
        self.blocks.enable_blocks(STARTING_BLOCKS);
    }

    /// When the death screen returns to the menu on its own.
    pub fn auto_advance_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Death { died_at } => Some(died_at + DEATH_SCREEN_DELAY),
            Phase::Menu | Phase::Game => None,
        }
    }
}
