//! Menu / Game / Death transitions.

use embassy_time::Instant;

use crate::{
    config::DEATH_INPUT_GUARD,
    event::Direction,
    state::{
        GameState,
        Phase,
    },
};

impl GameState {
    /// Apply one debounced button transition.
    pub fn handle_input(&mut self, direction: Direction, now: Instant) {
        if now < self.quiet_until {
            return;
        }

        match self.phase {
            Phase::Menu => {
                if direction == Direction::None {
                    return;
                }
                debug_assert!(self.selection <= 1, "menu selection out of range");
                self.selection += 1;
                if self.selection > 1 {
                    info!("Starting game");
                    self.start_game();
                }
            }
            Phase::Game => self.player_direction = direction,
            Phase::Death { died_at } => {
                if direction == Direction::None || now < died_at + DEATH_INPUT_GUARD {
                    return;
                }
                info!("Death screen dismissed");
                self.return_to_menu();
            }
        }
    }

    /// Per-tick phase housekeeping, run before physics.
    pub fn check_phase(&mut self, now: Instant) {
        if let Some(deadline) = self.auto_advance_deadline()
            && now >= deadline
        {
            info!("Death screen timed out");
            self.return_to_menu();
        }
    }

    fn return_to_menu(&mut self) {
        self.phase = Phase::Menu;
        self.selection = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DEATH_SCREEN_DELAY,
        STARTUP_QUIET,
    };

    fn after_boot(ms: u64) -> Instant {
        Instant::from_millis(0) + STARTUP_QUIET + embassy_time::Duration::from_millis(ms)
    }

    fn menu() -> GameState {
        GameState::new(42, Instant::from_millis(0))
    }

    #[test]
    fn one_press_shows_instructions() {
        let mut state = menu();
        state.handle_input(Direction::Left, after_boot(0));
        assert_eq!(state.phase, Phase::Menu);
        assert_eq!(state.selection, 1);
    }

    #[test]
    fn two_presses_start_the_game() {
        let mut state = menu();
        state.handle_input(Direction::Right, after_boot(0));
        state.handle_input(Direction::Left, after_boot(10));
        assert_eq!(state.phase, Phase::Game);
        assert_eq!(state.selection, 0);
    }

    #[test]
    fn releases_do_not_advance_the_menu() {
        let mut state = menu();
        state.handle_input(Direction::Left, after_boot(0));
        state.handle_input(Direction::None, after_boot(5));
        assert_eq!(state.phase, Phase::Menu);
        assert_eq!(state.selection, 1);
    }

    #[test]
    fn boot_noise_is_discarded() {
        let mut state = menu();
        state.handle_input(Direction::Left, Instant::from_millis(10));
        state.handle_input(Direction::Left, Instant::from_millis(500));
        assert_eq!(state.phase, Phase::Menu);
        assert_eq!(state.selection, 0);
    }

    #[test]
    fn game_input_sets_direction_including_none() {
        let mut state = menu();
        state.start_game();

        state.handle_input(Direction::Left, after_boot(0));
        assert_eq!(state.player_direction, Direction::Left);
        state.handle_input(Direction::None, after_boot(1));
        assert_eq!(state.player_direction, Direction::None);
        assert_eq!(state.phase, Phase::Game);
    }

    #[test]
    fn death_ignores_input_inside_guard() {
        let mut state = menu();
        let died_at = after_boot(0);
        state.phase = Phase::Death { died_at };

        state.handle_input(Direction::Right, died_at + DEATH_INPUT_GUARD / 2);
        assert_eq!(state.phase, Phase::Death { died_at });

        state.handle_input(Direction::Right, died_at + DEATH_INPUT_GUARD);
        assert_eq!(state.phase, Phase::Menu);
        assert_eq!(state.selection, 0);
    }

    #[test]
    fn death_times_out_to_menu_without_input() {
        let mut state = menu();
        let died_at = after_boot(0);
        state.phase = Phase::Death { died_at };
        state.selection = 1;

        state.check_phase(died_at + DEATH_SCREEN_DELAY / 2);
        assert!(matches!(state.phase, Phase::Death { .. }));

        state.check_phase(died_at + DEATH_SCREEN_DELAY);
        assert_eq!(state.phase, Phase::Menu);
        assert_eq!(state.selection, 0);
    }
}
