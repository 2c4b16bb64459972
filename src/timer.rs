//! Hardware periodic timer that produces [`Packet::Tick`]s.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Instant;
use esp_hal::{
    Blocking,
    handler,
    interrupt::Priority,
    time::Duration,
    timer::PeriodicTimer,
};

use crate::{
    config::TICK_PERIOD_US,
    event::{
        MAILBOX,
        Packet,
    },
    tick::TickSource,
};

struct Ticker {
    timer: PeriodicTimer<'static, Blocking>,
    source: TickSource,
}

static TICKER: Mutex<RefCell<Option<Ticker>>> = Mutex::new(RefCell::new(None));

/// Start firing ticks at the target frame rate on `timer`.
pub fn start(timer: impl esp_hal::timer::Timer + 'static) {
    let mut timer = PeriodicTimer::new(timer);
    timer.set_interrupt_handler(tick_interrupt);
    timer.listen();

    critical_section::with(|cs| {
        timer.start(Duration::from_micros(TICK_PERIOD_US)).unwrap();
        TICKER.borrow_ref_mut(cs).replace(Ticker {
            timer,
            source: TickSource::new(Instant::now()),
        });
    });
}

#[handler(priority = Priority::Priority2)]
fn tick_interrupt() {
    let now = Instant::now();

    critical_section::with(|cs| {
        if let Some(ticker) = TICKER.borrow_ref_mut(cs).as_mut() {
            ticker.timer.clear_interrupt();
            let packet: Packet = ticker.source.fire(now);
            MAILBOX.try_send(packet);
        }
    });
}
