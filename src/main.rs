//! Falling blocks firmware for the Disobey 2026 badge.
//!
//! - Hold LEFT/RIGHT on the D-pad to move
//! - Any button on the menu advances title → instructions → game
//! - The game over screen returns to the menu on its own after two seconds

#![no_std]
#![no_main]

use defmt::info;
#[allow(clippy::wildcard_imports)]
use falling_blocks::*;
use embassy_executor::Spawner;
use embassy_time::{
    Duration,
    Instant,
    Timer,
};
use embedded_graphics::pixelcolor::Rgb565;
use esp_backtrace as _;
use esp_hal::{
    gpio::Io,
    rng::Rng,
    timer::timg::TimerGroup,
};
use esp_println as _;
use falling_blocks::{
    config::PIXELS,
    render::{
        FrameBuffer,
        Screen,
    },
};
use static_cell::ConstStaticCell;

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

static FRAME: ConstStaticCell<[Rgb565; PIXELS]> = ConstStaticCell::new([Rgb565::BLACK; PIXELS]);

#[embassy_executor::task]
async fn game_task(display: Display<'static>, seed: u64, booted: Instant) {
    info!("Game task started, seed {=u64:x}", seed);

    let mut screen = Screen::new(FrameBuffer::new(FRAME.take()), display);
    let mut game = GameLoop::new(GameState::new(seed, booted), booted);
    game.run(&MAILBOX, &mut screen).await;
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals = falling_blocks::init();
    let resources = split_resources!(peripherals);

    esp_alloc::heap_allocator!(size: 32 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);
    let booted = Instant::now();

    // Seeded once per boot; every game after that keeps drawing from it.
    let rng = Rng::new();
    let seed = (u64::from(rng.random()) << 32) | u64::from(rng.random());

    let display: Display<'static> = resources.display.into();
    let _backlight = backlight_on(resources.backlight);

    let mut io = Io::new(peripherals.IO_MUX);
    let buttons: GameButtons = resources.buttons.into();
    buttons.install(&mut io);

    let timg1 = TimerGroup::new(peripherals.TIMG1);
    timer::start(timg1.timer0);

    spawner.must_spawn(game_task(display, seed, booted));

    loop {
        Timer::after(Duration::from_secs(600)).await;
    }
}
