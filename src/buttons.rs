//! GPIO interrupt side of the two game buttons.
//!
//! The handler runs the [`DebounceTracker`] and posts [`Packet::Input`]s.
//! It never touches game state.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Instant;
use esp_hal::{
    gpio::{
        Event,
        Input,
        InputConfig,
        Io,
        Pull,
    },
    handler,
};

use crate::{
    ButtonResources,
    event::{
        MAILBOX,
        Packet,
    },
    input::{
        Arm,
        DebounceTracker,
        Pin,
    },
};

/// D-pad left and right, active low.
pub struct GameButtons {
    left: Input<'static>,
    right: Input<'static>,
}

struct Capture {
    left: Input<'static>,
    right: Input<'static>,
    tracker: DebounceTracker,
}

static CAPTURE: Mutex<RefCell<Option<Capture>>> = Mutex::new(RefCell::new(None));

impl From<ButtonResources<'static>> for GameButtons {
    fn from(res: ButtonResources<'static>) -> Self {
        let pull_up = InputConfig::default().with_pull(Pull::Up);
        Self {
            left: Input::new(res.left, pull_up),
            right: Input::new(res.right, pull_up),
        }
    }
}

impl GameButtons {
    /// Hand both pins to the interrupt handler, armed for a press.
    pub fn install(self, io: &mut Io<'_>) {
        let Self {
            mut left,
            mut right,
        } = self;

        critical_section::with(|cs| {
            left.listen(Event::FallingEdge);
            right.listen(Event::FallingEdge);
            CAPTURE.borrow_ref_mut(cs).replace(Capture {
                left,
                right,
                tracker: DebounceTracker::new(),
            });
        });
        io.set_interrupt_handler(button_interrupt);
    }
}

#[handler]
fn button_interrupt() {
    let now = Instant::now();

    critical_section::with(|cs| {
        let mut capture = CAPTURE.borrow_ref_mut(cs);
        let Some(capture) = capture.as_mut() else {
            return;
        };

        let Capture {
            left,
            right,
            tracker,
        } = capture;

        for (pin, input) in [(Pin::Left, left), (Pin::Right, right)] {
            if !input.is_interrupt_set() {
                continue;
            }
            input.clear_interrupt();

            let Some(transition) = tracker.on_interrupt(pin, now) else {
                continue;
            };

            // Only listen for the opposite edge so a held button stays quiet.
            input.listen(match transition.arm {
                Arm::Press => Event::FallingEdge,
                Arm::Release => Event::RisingEdge,
            });
            MAILBOX.try_send(Packet::Input(transition.direction));
        }
    });
}
