//! # falling-blocks
//!
//! Dodge-the-falling-blocks arcade game for the Disobey 2026 badge.
//!
//! Two interrupt sources feed one cooperative game loop through a bounded
//! mailbox:
//! - **Buttons**: D-pad left/right, debounced in the GPIO interrupt
//! - **Timer**: hardware periodic timer measuring the real time per tick
//! - **Game loop**: drains the mailbox, runs the phase machine, physics
//!   and collisions, then flips a full frame onto the ST7789 panel
//!
//! Everything except the board glue builds on the host, which is where the
//! tests run. Enable the `board` feature to build the firmware.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let peripherals = falling_blocks::init();
//! let resources = falling_blocks::split_resources!(peripherals);
//!
//! let display: falling_blocks::Display = resources.display.into();
//! let buttons: falling_blocks::GameButtons = resources.buttons.into();
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod blocks;
pub mod collision;
pub mod config;
pub mod event;
pub mod game_loop;
pub mod input;
pub mod phase;
pub mod physics;
pub mod render;
pub mod state;
pub mod tick;

#[cfg(feature = "board")]
mod buttons;
#[cfg(feature = "board")]
mod display;
#[cfg(feature = "board")]
pub mod timer;

#[cfg(feature = "board")]
pub use board::*;
#[cfg(feature = "board")]
pub use buttons::GameButtons;
#[cfg(feature = "board")]
pub use display::{
    Display,
    backlight_on,
};
pub use event::{
    Direction,
    MAILBOX,
    Mailbox,
    Packet,
};
pub use game_loop::GameLoop;
pub use state::{
    GameState,
    Phase,
};

#[cfg(feature = "board")]
mod board {
    use esp_hal::{
        assign_resources,
        clock::{
            Clock,
            CpuClock,
        },
        rom,
    };

    // ── Pin / peripheral assignments ────────────────────────────────────────

    assign_resources! {
        pub Resources<'d> {
            display: DisplayResources<'d> {
                dc: GPIO15,
                rst: GPIO7,
                sck: GPIO4,
                cs: GPIO6,
                miso: GPIO16,
                mosi: GPIO5,
                spi: SPI2,
                dma: DMA_CH0,
            },
            backlight: BacklightResources<'d> {
                led: GPIO19,
            },
            buttons: ButtonResources<'d> {
                left: GPIO21,
                right: GPIO2,
            },
        }
    }

    // ── Board initialisation ────────────────────────────────────────────────

    /// Minimal CPU clock switcher for ESP32-S3.
    ///
    /// Steps through an intermediate frequency before reaching the target,
    /// which is required by the hardware.
    fn set_cpu_clock(cpu_clock_speed: CpuClock) {
        let _ = esp_hal::peripherals::SYSTEM::regs()
            .sysclk_conf()
            .modify(|_, w| unsafe { w.soc_clk_sel().bits(1) });
        let _ = esp_hal::peripherals::SYSTEM::regs()
            .cpu_per_conf()
            .modify(|_, w| unsafe {
                let _ = w.pll_freq_sel().set_bit();
                w.cpuperiod_sel().bits(match cpu_clock_speed {
                    CpuClock::_80MHz => 0,
                    CpuClock::_160MHz => 1,
                    CpuClock::_240MHz => 2,
                    _ => panic!("Unsupported CPU clock speed"),
                })
            });

        rom::ets_update_cpu_frequency_rom(cpu_clock_speed.frequency().as_mhz());
    }

    /// Bring up clocks and return the raw peripheral set.
    ///
    /// Call once at the top of `main`, then [`split_resources!`] the pins
    /// the game uses.
    #[must_use]
    pub fn init() -> esp_hal::peripherals::Peripherals {
        set_cpu_clock(CpuClock::_160MHz);
        let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
        esp_hal::init(config)
    }
}
