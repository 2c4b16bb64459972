//! Events passed from interrupt context to the game loop.
//!
//! Interrupt handlers only ever build a [`Packet`] and call
//! [`Mailbox::try_send`]. The game loop is the single consumer.

use core::sync::atomic::{
    AtomicU32,
    Ordering,
};

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::Channel,
};

use crate::config::MAILBOX_CAPACITY;

/// Horizontal intent derived from the two buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "board", derive(defmt::Format))]
pub enum Direction {
    Left,
    Right,
    None,
}

/// One unit of work for the game loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "board", derive(defmt::Format))]
pub enum Packet {
    /// Timer fired; carries the measured microseconds since the previous tick.
    Tick { dt_us: u64 },
    /// A debounced button transition.
    Input(Direction),
}

/// Bounded FIFO between interrupt context and the game loop.
///
/// Sending never blocks. When full, the new packet is dropped (ticks and
/// inputs alike) and only the drop counter records it.
pub struct Mailbox {
    channel: Channel<CriticalSectionRawMutex, Packet, MAILBOX_CAPACITY>,
    dropped: AtomicU32,
}

impl Mailbox {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Non-blocking send, safe from an interrupt handler.
    pub fn try_send(&self, packet: Packet) {
        if self.channel.try_send(packet).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Take the oldest packet, if any, without waiting.
    #[cfg(test)]
    fn try_receive(&self) -> Option<Packet> {
        self.channel.try_receive().ok()
    }

    /// Wait up to `timeout` for the next packet.
    ///
    /// Returns `None` on timeout so the caller can still do its periodic
    /// housekeeping while nothing is arriving.
    pub async fn receive_with_timeout(&self, timeout: embassy_time::Duration) -> Option<Packet> {
        embassy_time::with_timeout(timeout, self.channel.receive())
            .await
            .ok()
    }

    /// Packets lost to a full mailbox since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// The one mailbox shared by the button and timer interrupts.
pub static MAILBOX: Mailbox = Mailbox::new();
