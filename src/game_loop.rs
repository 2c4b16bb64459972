//! The single consumer of the mailbox.

use embassy_time::Instant;

use crate::{
    config::TARGET_FPS,
    event::Packet,
    render::{
        self,
        Surface,
    },
    state::GameState,
};

/// Rolling frame counter reported once every [`TARGET_FPS`] frames.
pub struct FpsCounter {
    frames: u32,
    started: Instant,
}

impl FpsCounter {
    pub const fn new(started: Instant) -> Self {
        Self { frames: 0, started }
    }

    /// Count one presented frame. Returns the average FPS since start on
    /// every [`TARGET_FPS`]th frame.
    pub fn frame(&mut self, now: Instant) -> Option<f32> {
        self.frames = self.frames.wrapping_add(1);
        if self.frames % TARGET_FPS != 0 {
            return None;
        }
        let elapsed_us = now.saturating_duration_since(self.started).as_micros();
        if elapsed_us == 0 {
            return None;
        }
        Some(self.frames as f32 * 1_000_000.0 / elapsed_us as f32)
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Reporting frames also do enough work that the loop may skip its yield.
    pub fn on_report_frame(&self) -> bool {
        self.frames != 0 && self.frames % TARGET_FPS == 0
    }
}

pub struct GameLoop {
    pub state: GameState,
    fps: FpsCounter,
}

impl GameLoop {
    pub fn new(state: GameState, started: Instant) -> Self {
        Self {
            state,
            fps: FpsCounter::new(started),
        }
    }

    /// Run one packet to completion.
    pub fn dispatch(&mut self, packet: Packet, now: Instant, surface: &mut impl Surface, dropped: u32) {
        match packet {
            Packet::Tick { dt_us } => {
                self.state.check_phase(now);
                self.state.advance(dt_us, now);
                render::render(surface, &self.state, now);

                if let Some(fps) = self.fps.frame(now) {
                    info!(
                        "FPS: {} ({}) @ frame #{}, {} events dropped",
                        fps,
                        TARGET_FPS,
                        self.fps.frames(),
                        dropped
                    );
                }
            }
            Packet::Input(direction) => self.state.handle_input(direction, now),
        }
    }

    /// Whether the loop should hand the CPU back to the scheduler after an
    /// iteration. Idle iterations always yield.
    pub fn should_yield(&self, received: Option<Packet>) -> bool {
        !matches!(received, Some(Packet::Tick { .. })) || !self.fps.on_report_frame()
    }

    /// Drain the mailbox forever.
    #[cfg(feature = "board")]
    pub async fn run(&mut self, mailbox: &crate::event::Mailbox, surface: &mut impl Surface) {
        use crate::config::RECEIVE_TIMEOUT;

        info!("Game loop running");
        loop {
            let received = mailbox.receive_with_timeout(RECEIVE_TIMEOUT).await;
            if let Some(packet) = received {
                self.dispatch(packet, Instant::now(), surface, mailbox.dropped());
            }
            if self.should_yield(received) {
                embassy_futures::yield_now().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::pixelcolor::Rgb565;

    use super::*;
    use crate::{
        config::{
            DEATH_SCREEN_DELAY,
            STARTUP_QUIET,
        },
        event::Direction,
        state::Phase,
    };

    #[derive(Default)]
    struct Recorder {
        flips: usize,
    }

    impl Surface for Recorder {
        fn clear(&mut self, _color: Rgb565) {}
        fn draw_rectangle(&mut self, _x: i32, _y: i32, _w: i32, _h: i32, _color: Rgb565) {}
        fn set_font(&mut self, _font: &'static embedded_graphics::mono_font::MonoFont<'static>) {}
        fn set_font_color(&mut self, _r: u8, _g: u8, _b: u8) {}
        fn print_text(&mut self, _text: &str, _x: i32, _y: i32) {}
        fn font_height(&self) -> i32 {
            10
        }
        fn font_width(&self) -> i32 {
            6
        }
        fn flip_frame(&mut self) {
            self.flips += 1;
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(0) + STARTUP_QUIET + embassy_time::Duration::from_millis(ms)
    }

    fn game_loop() -> GameLoop {
        GameLoop::new(GameState::new(11, Instant::from_millis(0)), Instant::from_millis(0))
    }

    #[test]
    fn ticks_render_and_inputs_do_not() {
        let mut game = game_loop();
        let mut screen = Recorder::default();

        game.dispatch(Packet::Input(Direction::Left), at(0), &mut screen, 0);
        assert_eq!(screen.flips, 0);
        assert_eq!(game.state.selection, 1);

        game.dispatch(Packet::Tick { dt_us: 33_333 }, at(33), &mut screen, 0);
        assert_eq!(screen.flips, 1);
    }

    #[test]
    fn menu_to_game_to_death_and_back() {
        let mut game = game_loop();
        let mut screen = Recorder::default();

        game.dispatch(Packet::Input(Direction::Left), at(0), &mut screen, 0);
        game.dispatch(Packet::Input(Direction::None), at(50), &mut screen, 0);
        game.dispatch(Packet::Input(Direction::Right), at(100), &mut screen, 0);
        assert_eq!(game.state.phase, Phase::Game);

        // Park the player under the only block and let it fall on them.
        game.dispatch(Packet::Tick { dt_us: 33_000 }, at(133), &mut screen, 0);
        let (x, y) = (game.state.player.x, game.state.player.y);
        let block = game.state.blocks.get_mut(0);
        block.x = x;
        block.y = y - 10;
        game.dispatch(Packet::Tick { dt_us: 33_000 }, at(166), &mut screen, 0);

        let died_at = at(166);
        assert_eq!(game.state.phase, Phase::Death { died_at });

        game.dispatch(Packet::Tick { dt_us: 33_000 }, died_at + DEATH_SCREEN_DELAY, &mut screen, 0);
        assert_eq!(game.state.phase, Phase::Menu);
        assert_eq!(game.state.selection, 0);
    }

    #[test]
    fn fps_reported_once_per_target_frames() {
        let mut fps = FpsCounter::new(Instant::from_millis(0));
        let mut reports = 0;
        for frame in 1..=TARGET_FPS * 2 {
            let now = Instant::from_micros(u64::from(frame) * 1_000_000 / u64::from(TARGET_FPS));
            if let Some(value) = fps.frame(now) {
                reports += 1;
                assert!((value - TARGET_FPS as f32).abs() < 0.5);
            }
        }
        assert_eq!(reports, 2);
    }

    #[test]
    fn idle_iterations_always_yield() {
        let game = game_loop();
        assert!(game.should_yield(None));
        assert!(game.should_yield(Some(Packet::Input(Direction::Left))));
        assert!(game.should_yield(Some(Packet::Tick { dt_us: 1 })));
    }

    #[test]
    fn reporting_tick_skips_the_yield() {
        let mut game = game_loop();
        let mut screen = Recorder::default();
        let tick = Packet::Tick { dt_us: 33_333 };

        for frame in 1..TARGET_FPS {
            game.dispatch(tick, at(u64::from(frame) * 33), &mut screen, 0);
            assert!(game.should_yield(Some(tick)));
        }
        game.dispatch(tick, at(u64::from(TARGET_FPS) * 33), &mut screen, 0);

        assert!(!game.should_yield(Some(tick)));
        assert!(game.should_yield(None));
        assert!(game.should_yield(Some(Packet::Input(Direction::Right))));

        game.dispatch(tick, at(u64::from(TARGET_FPS + 1) * 33), &mut screen, 0);
        assert!(game.should_yield(Some(tick)));
    }

    #[test]
    fn sub_millisecond_tick_moves_the_player() {
        let mut game = game_loop();
        let mut screen = Recorder::default();
        game.state.start_game();
        game.state.player_direction = Direction::Right;
        let x0 = game.state.player.x;

        game.dispatch(Packet::Tick { dt_us: 900 }, at(1), &mut screen, 0);

        assert_eq!(game.state.phase, Phase::Game);
        assert_eq!(game.state.player.x - x0, 1);
    }
}
