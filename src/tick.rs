//! Periodic tick generation.
//!
//! The hardware timer fires every [`TICK_PERIOD_US`](crate::config::TICK_PERIOD_US);
//! this measures how much time really passed so physics never assumes a
//! perfect frame time.

use embassy_time::Instant;

use crate::event::Packet;

pub struct TickSource {
    last_fire: Instant,
}

impl TickSource {
    /// `started` is when the hardware timer was armed.
    pub const fn new(started: Instant) -> Self {
        Self { last_fire: started }
    }

    /// Called from the timer interrupt. Bounded time, no allocation.
    pub fn fire(&mut self, now: Instant) -> Packet {
        let dt_us = now.saturating_duration_since(self.last_fire).as_micros();
        self.last_fire = now;
        Packet::Tick { dt_us }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_real_elapsed_time_between_fires() {
        let mut source = TickSource::new(Instant::from_micros(1_000));

        assert_eq!(source.fire(Instant::from_micros(34_333)), Packet::Tick { dt_us: 33_333 });
        // A late interrupt reports the longer gap instead of the nominal period.
        assert_eq!(source.fire(Instant::from_micros(84_333)), Packet::Tick { dt_us: 50_000 });
    }
}
