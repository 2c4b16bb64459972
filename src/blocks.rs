//! Fixed pool of falling blocks.
//!
//! Slots are never created or destroyed; a block is enabled once by the
//! difficulty curve and after that only ever recycled back above the top
//! edge.

use rand::Rng;

use crate::config::{
    BLOCK_H,
    BLOCK_W,
    MAX_BLOCKS,
    SPAWN_CLEARANCE,
    W,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub x: i32,
    pub y: i32,
    /// Disabled slots are never drawn, moved or collided.
    pub enabled: bool,
    /// Enabled but parked off-field until a respawn succeeds.
    pub awaiting_respawn: bool,
}

impl Block {
    const DISABLED: Self = Self {
        x: 0,
        y: 0,
        enabled: false,
        awaiting_respawn: false,
    };

    /// Enabled and on the field.
    pub const fn is_live(&self) -> bool {
        self.enabled && !self.awaiting_respawn
    }
}

pub struct BlockPool {
    blocks: [Block; MAX_BLOCKS],
    /// Slot index of the most recent spawn. The pool owns the slot; this is
    /// only a lookup key.
    last_spawned: Option<usize>,
}

impl BlockPool {
    pub const fn new() -> Self {
        Self {
            blocks: [Block::DISABLED; MAX_BLOCKS],
            last_spawned: None,
        }
    }

    /// Disable every slot and forget the last spawn.
    pub fn reset(&mut self) {
        self.blocks = [Block::DISABLED; MAX_BLOCKS];
        self.last_spawned = None;
    }

    /// Enable every disabled slot below `up_to` (clamped to capacity).
    ///
    /// Newly enabled blocks start parked and enter the field through
    /// [`respawn`](Self::respawn). Blocks already enabled keep their position.
    pub fn enable_blocks(&mut self, up_to: usize) {
        for block in self.blocks.iter_mut().take(up_to.min(MAX_BLOCKS)) {
            if !block.enabled {
                block.enabled = true;
                block.awaiting_respawn = true;
            }
        }
    }

    pub fn enabled_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.enabled).count()
    }

    pub fn blocks(&self) -> &[Block; MAX_BLOCKS] {
        &self.blocks
    }

    pub fn get(&self, index: usize) -> &Block {
        &self.blocks[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Block {
        &mut self.blocks[index]
    }

    #[cfg(test)]
    fn last_spawned(&self) -> Option<usize> {
        self.last_spawned
    }

    /// Whether the previous spawn is far enough down for another to enter.
    fn spawn_line_clear(&self) -> bool {
        match self.last_spawned {
            None => true,
            Some(index) => {
                let last = &self.blocks[index];
                !last.is_live() || last.y > SPAWN_CLEARANCE
            }
        }
    }

    /// Try to put the block at `index` back just above the top edge at a
    /// random column.
    ///
    /// Fails while the most recent spawn is still within
    /// [`SPAWN_CLEARANCE`] of the top; the caller retries next tick.
    pub fn respawn(&mut self, index: usize, rng: &mut impl Rng) -> bool {
        if !self.blocks[index].enabled || !self.spawn_line_clear() {
            return false;
        }

        let block = &mut self.blocks[index];
        block.x = rng.random_range(0..=W - BLOCK_W);
        block.y = -BLOCK_H;
        block.awaiting_respawn = false;
        self.last_spawned = Some(index);
        true
    }
}

impl Default for BlockPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn enable_is_idempotent_and_keeps_positions() {
        let mut pool = BlockPool::new();
        pool.enable_blocks(2);
        pool.get_mut(0).awaiting_respawn = false;
        pool.get_mut(0).y = 80;

        pool.enable_blocks(2);
        pool.enable_blocks(4);

        assert_eq!(pool.enabled_count(), 4);
        assert_eq!(pool.get(0).y, 80);
        assert!(!pool.get(0).awaiting_respawn);
        assert!(pool.get(3).awaiting_respawn);
        assert!(!pool.get(4).enabled);
    }

    #[test]
    fn enable_is_capped_at_capacity() {
        let mut pool = BlockPool::new();
        pool.enable_blocks(MAX_BLOCKS + 5);
        assert_eq!(pool.enabled_count(), MAX_BLOCKS);
    }

    #[test]
    fn respawn_places_block_above_field_within_width() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut pool = BlockPool::new();
        pool.enable_blocks(1);

        for _ in 0..50 {
            pool.get_mut(0).awaiting_respawn = true;
            assert!(pool.respawn(0, &mut rng));
            let block = pool.get(0);
            assert_eq!(block.y, -BLOCK_H);
            assert!((0..=W - BLOCK_W).contains(&block.x));
            assert!(block.is_live());
        }
        assert_eq!(pool.last_spawned(), Some(0));
    }

    #[test]
    fn respawn_waits_for_clearance_below_last_spawn() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = BlockPool::new();
        pool.enable_blocks(2);

        assert!(pool.respawn(0, &mut rng));
        assert!(!pool.respawn(1, &mut rng));
        assert!(pool.get(1).awaiting_respawn);

        pool.get_mut(0).y = SPAWN_CLEARANCE;
        assert!(!pool.respawn(1, &mut rng));

        pool.get_mut(0).y = SPAWN_CLEARANCE + 1;
        assert!(pool.respawn(1, &mut rng));
        assert_eq!(pool.last_spawned(), Some(1));
    }

    #[test]
    fn parked_last_spawn_does_not_block_respawn() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = BlockPool::new();
        pool.enable_blocks(2);

        assert!(pool.respawn(0, &mut rng));
        pool.get_mut(0).awaiting_respawn = true;
        assert!(pool.respawn(1, &mut rng));
    }

    #[test]
    fn disabled_slot_never_respawns() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = BlockPool::new();
        assert!(!pool.respawn(5, &mut rng));
        assert_eq!(*pool.get(5), Block::default());
    }
}
