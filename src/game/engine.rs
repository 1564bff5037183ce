use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{
    config::GameConfig,
    direction::Direction,
    state::{GameOverReason, GameState, Phase, Position, Snake},
};

/// Random food draws per grid cell before falling back to a free-cell scan
const FOOD_ATTEMPTS_PER_CELL: usize = 4;

/// Result of one call to [`GameEngine::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Snake moved one cell, length unchanged
    Continued,
    /// Snake moved onto the food and grew by one
    Ate { new_high_score: bool },
    /// The game is over, either this tick or earlier
    GameOver(GameOverReason),
    /// Not running (idle or paused); nothing changed
    Suspended,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration.
    ///
    /// The configuration is expected to have passed [`GameConfig::validate`].
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fresh running game. The high score is carried over.
    pub fn reset(&mut self, high_score: u32) -> GameState {
        self.fresh_state(high_score, Phase::Running)
    }

    /// Fresh board that waits for [`GameEngine::start`]
    pub fn idle(&mut self, high_score: u32) -> GameState {
        self.fresh_state(high_score, Phase::Idle)
    }

    /// Reset `state` in place, keeping its high score
    pub fn restart(&mut self, state: &mut GameState) {
        *state = self.reset(state.high_score);
        tracing::info!(high_score = state.high_score, "game restarted");
    }

    fn fresh_state(&mut self, high_score: u32, phase: Phase) -> GameState {
        let length = self.config.initial_snake_length.max(1);
        let max_x = self.config.grid_width.saturating_sub(1);
        let head_x = (length + 2).min(max_x);
        let head_y = self.config.grid_height / 2;

        let direction = Direction::Right;
        let snake = Snake::new(
            Position::new(head_x as i32, head_y as i32),
            direction,
            length,
        );

        let mut state = GameState::new(
            snake,
            direction,
            Position::new(0, 0),
            self.config.grid_width,
            self.config.grid_height,
            self.config.initial_tick(),
        );
        state.high_score = high_score;

        match self.place_food(&state) {
            Some(food) => {
                state.food = food;
                state.phase = phase;
            }
            // Only reachable with a config that failed validation.
            None => {
                state.food = state.snake.tail();
                state.phase = Phase::GameOver(GameOverReason::BoardFull);
            }
        }

        state
    }

    /// Queue a direction for the next tick.
    ///
    /// A request opposite to the committed direction is ignored. Returns whether
    /// the request was accepted.
    pub fn set_pending_direction(&self, state: &mut GameState, direction: Direction) -> bool {
        if state.direction.is_opposite(direction) {
            return false;
        }
        state.pending_direction = direction;
        true
    }

    /// Idle -> Running. On a finished game this starts a new one.
    pub fn start(&mut self, state: &mut GameState) -> bool {
        match state.phase {
            Phase::Idle => {
                state.phase = Phase::Running;
                tracing::info!("game started");
                true
            }
            Phase::GameOver(_) => {
                self.restart(state);
                true
            }
            Phase::Running | Phase::Paused => false,
        }
    }

    /// Running -> Paused
    pub fn pause(&self, state: &mut GameState) -> bool {
        if state.phase != Phase::Running {
            return false;
        }
        state.phase = Phase::Paused;
        tracing::debug!(steps = state.steps, "game paused");
        true
    }

    /// Paused -> Running
    pub fn resume(&self, state: &mut GameState) -> bool {
        if state.phase != Phase::Paused {
            return false;
        }
        state.phase = Phase::Running;
        tracing::debug!(steps = state.steps, "game resumed");
        true
    }

    /// Single start/pause button: start, pause, resume or restart depending on phase
    pub fn toggle_pause(&mut self, state: &mut GameState) {
        match state.phase {
            Phase::Running => {
                self.pause(state);
            }
            Phase::Paused => {
                self.resume(state);
            }
            Phase::Idle | Phase::GameOver(_) => {
                self.start(state);
            }
        }
    }

    /// Execute one tick of the game
    pub fn advance(&mut self, state: &mut GameState) -> TickOutcome {
        match state.phase {
            Phase::Running => {}
            Phase::GameOver(reason) => return TickOutcome::GameOver(reason),
            Phase::Idle | Phase::Paused => return TickOutcome::Suspended,
        }

        state.direction = state.pending_direction;
        let new_head = state.snake.head().moved_in_direction(state.direction);

        if let Some(reason) = self.check_collision(state, new_head) {
            state.phase = Phase::GameOver(reason);
            tracing::info!(score = state.score, steps = state.steps, ?reason, "game over");
            return TickOutcome::GameOver(reason);
        }

        let ate_food = new_head == state.food;
        state.snake.advance_to(new_head, ate_food);
        state.steps += 1;

        if !ate_food {
            return TickOutcome::Continued;
        }

        state.score += self.config.food_score;
        let new_high_score = state.score > state.high_score;
        if new_high_score {
            state.high_score = state.score;
        }

        let next_tick = self.config.next_tick(state.tick_interval);
        if next_tick != state.tick_interval {
            tracing::debug!(tick_ms = next_tick.as_millis() as u64, "speeding up");
            state.tick_interval = next_tick;
        }

        tracing::debug!(score = state.score, length = state.snake.len(), "food eaten");

        match self.place_food(state) {
            Some(food) => {
                state.food = food;
                TickOutcome::Ate { new_high_score }
            }
            None => {
                let reason = GameOverReason::BoardFull;
                state.phase = Phase::GameOver(reason);
                tracing::info!(score = state.score, "board full");
                TickOutcome::GameOver(reason)
            }
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<GameOverReason> {
        if !state.is_in_bounds(pos) {
            return Some(GameOverReason::Wall);
        }

        // The tail still occupies its cell when the head arrives.
        if state.is_occupied_by_snake(pos) {
            return Some(GameOverReason::SelfCollision);
        }

        None
    }

    /// Pick a random cell of `state`'s grid not covered by its snake.
    ///
    /// Rejection sampling with a bounded number of draws, then a uniform pick
    /// among the remaining free cells. `None` when the snake covers the grid.
    pub fn place_food(&mut self, state: &GameState) -> Option<Position> {
        let (Ok(width), Ok(height)) = (
            i32::try_from(state.grid_width),
            i32::try_from(state.grid_height),
        ) else {
            return None;
        };
        let area = state.grid_area();
        let snake = &state.snake;

        if snake.len() >= area {
            return None;
        }

        for _ in 0..area.saturating_mul(FOOD_ATTEMPTS_PER_CELL) {
            let pos = Position::new(self.rng.gen_range(0..width), self.rng.gen_range(0..height));

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }

        tracing::debug!(length = snake.len(), area, "food sampling exhausted, scanning free cells");

        let free: Vec<Position> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();

        free.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::small(), 7)
    }

    fn running_state(snake: Snake, direction: Direction, food: Position) -> GameState {
        GameState::new(snake, direction, food, 10, 10, Duration::from_millis(100))
    }

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        let state = engine.reset(0);

        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.pending_direction, Direction::Right);
        assert_eq!(state.tick_interval, Duration::from_millis(100));
        assert_eq!(
            state.snake.body,
            vec![Position::new(5, 10), Position::new(4, 10), Position::new(3, 10)]
        );
        assert!(!state.is_occupied_by_snake(state.food));
    }

    #[test]
    fn test_reset_twice_is_fresh_both_times() {
        let mut engine = engine();
        let mut state = engine.reset(40);
        state.score = 30;
        state.steps = 12;
        state.phase = Phase::GameOver(GameOverReason::Wall);

        engine.restart(&mut state);
        let mut first = state.clone();
        engine.restart(&mut state);
        let mut second = state.clone();

        assert!(!first.is_occupied_by_snake(first.food));
        assert!(!second.is_occupied_by_snake(second.food));

        // Equal apart from the random food cell
        first.food = Position::new(0, 0);
        second.food = Position::new(0, 0);
        assert_eq!(first, second);
        assert_eq!(first.high_score, 40);
        assert_eq!(first.score, 0);
    }

    #[test]
    fn test_reset_from_every_phase() {
        let mut engine = engine();
        let mut expected = engine.reset(40);
        expected.food = Position::new(0, 0);

        let phases = [
            Phase::Idle,
            Phase::Running,
            Phase::Paused,
            Phase::GameOver(GameOverReason::SelfCollision),
        ];
        for phase in phases {
            let mut state = engine.idle(40);
            state.phase = Phase::Running;
            state.food = state.snake.head().moved_in_direction(Direction::Right);
            engine.set_pending_direction(&mut state, Direction::Down);
            engine.advance(&mut state);
            state.phase = phase;

            engine.restart(&mut state);

            assert!(!state.is_occupied_by_snake(state.food), "{phase:?}");
            state.food = Position::new(0, 0);
            assert_eq!(state, expected, "{phase:?}");
        }
    }

    #[test]
    fn test_idle_waits_for_start() {
        let mut engine = engine();
        let mut state = engine.idle(0);
        let before = state.clone();

        assert_eq!(engine.advance(&mut state), TickOutcome::Suspended);
        assert_eq!(state, before);

        assert!(engine.start(&mut state));
        assert!(state.is_running());
        assert!(!engine.start(&mut state));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine();
        let mut state = engine.reset(0);
        state.food = Position::new(0, 0);
        let initial_head = state.snake.head();

        let outcome = engine.advance(&mut state);

        assert_eq!(outcome, TickOutcome::Continued);
        assert_eq!(state.steps, 1);
        assert_eq!(state.snake.head(), initial_head.moved_in_direction(Direction::Right));
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_pending_direction_applies_on_next_tick() {
        let mut engine = engine();
        let mut state = engine.reset(0);
        state.food = Position::new(0, 0);
        let head = state.snake.head();

        assert!(engine.set_pending_direction(&mut state, Direction::Down));
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.snake.head(), head);

        engine.advance(&mut state);
        assert_eq!(state.direction, Direction::Down);
        assert_eq!(state.snake.head(), head.moved_in_direction(Direction::Down));
    }

    #[test]
    fn test_opposite_pending_direction_is_ignored() {
        let engine = engine();

        for direction in Direction::ALL {
            let mut state = running_state(
                Snake::new(Position::new(5, 5), direction, 3),
                direction,
                Position::new(0, 0),
            );
            state.pending_direction = direction;

            assert!(!engine.set_pending_direction(&mut state, direction.opposite()));
            assert_eq!(state.pending_direction, direction);
        }
    }

    #[test]
    fn test_reversal_via_two_quick_turns_is_blocked() {
        let mut engine = engine();
        let mut state = engine.reset(0);
        state.food = Position::new(0, 0);

        // Up is accepted, but Left is still judged against the committed Right
        assert!(engine.set_pending_direction(&mut state, Direction::Up));
        assert!(!engine.set_pending_direction(&mut state, Direction::Left));
        assert_eq!(engine.advance(&mut state), TickOutcome::Continued);
        assert_eq!(state.direction, Direction::Up);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        let mut state = engine.reset(5);
        state.food = state.snake.head().moved_in_direction(Direction::Right);
        let initial_length = state.snake.len();

        let outcome = engine.advance(&mut state);

        assert_eq!(outcome, TickOutcome::Ate { new_high_score: true });
        assert_eq!(state.score, 10);
        assert_eq!(state.high_score, 10);
        assert_eq!(state.snake.len(), initial_length + 1);
        assert_eq!(state.tick_interval, Duration::from_millis(95));
        assert!(!state.is_occupied_by_snake(state.food));
    }

    #[test]
    fn test_eating_below_high_score_keeps_it() {
        let mut engine = engine();
        let mut state = engine.reset(100);
        state.food = state.snake.head().moved_in_direction(Direction::Right);

        let outcome = engine.advance(&mut state);

        assert_eq!(outcome, TickOutcome::Ate { new_high_score: false });
        assert_eq!(state.score, 10);
        assert_eq!(state.high_score, 100);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine();
        let mut state = running_state(
            Snake::new(Position::new(9, 4), Direction::Right, 3),
            Direction::Right,
            Position::new(0, 0),
        );
        let before = state.snake.clone();

        let outcome = engine.advance(&mut state);

        assert_eq!(outcome, TickOutcome::GameOver(GameOverReason::Wall));
        assert!(!state.is_running());
        assert!(state.is_over());
        assert_eq!(state.snake, before);
        assert_eq!(state.steps, 0);
    }

    #[test]
    fn test_wall_collision_on_every_edge() {
        let mut engine = engine();
        let cases = [
            (Position::new(5, 0), Direction::Up),
            (Position::new(5, 9), Direction::Down),
            (Position::new(0, 5), Direction::Left),
            (Position::new(9, 5), Direction::Right),
        ];

        for (head, direction) in cases {
            let mut state = running_state(
                Snake::from_segments(vec![head]),
                direction,
                Position::new(3, 3),
            );
            assert_eq!(
                engine.advance(&mut state),
                TickOutcome::GameOver(GameOverReason::Wall)
            );
        }
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine();
        // Head at (5,5) turning Up into (5,4), which the body occupies
        let snake = Snake::from_segments(vec![
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 4),
            Position::new(5, 4),
            Position::new(4, 4),
        ]);
        let mut state = running_state(snake, Direction::Left, Position::new(0, 0));
        assert!(engine.set_pending_direction(&mut state, Direction::Up));

        let outcome = engine.advance(&mut state);

        assert_eq!(outcome, TickOutcome::GameOver(GameOverReason::SelfCollision));
        assert!(!state.is_running());
    }

    #[test]
    fn test_moving_into_tail_cell_collides() {
        let mut engine = engine();
        // 2x2 loop: the head's next cell is the current tail
        let snake = Snake::from_segments(vec![
            Position::new(1, 1),
            Position::new(2, 1),
            Position::new(2, 2),
            Position::new(1, 2),
        ]);
        let mut state = running_state(snake, Direction::Left, Position::new(0, 0));
        engine.set_pending_direction(&mut state, Direction::Down);

        assert_eq!(
            engine.advance(&mut state),
            TickOutcome::GameOver(GameOverReason::SelfCollision)
        );
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine();
        let mut state = engine.reset(0);
        state.phase = Phase::GameOver(GameOverReason::SelfCollision);
        let before = state.clone();

        let outcome = engine.advance(&mut state);

        assert_eq!(outcome, TickOutcome::GameOver(GameOverReason::SelfCollision));
        assert_eq!(state, before);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut engine = engine();
        let mut state = engine.reset(0);
        state.food = Position::new(0, 0);

        assert!(engine.pause(&mut state));
        assert_eq!(state.phase, Phase::Paused);
        let paused = state.clone();
        assert_eq!(engine.advance(&mut state), TickOutcome::Suspended);
        assert_eq!(state, paused);

        assert!(!engine.pause(&mut state));
        assert!(engine.resume(&mut state));
        assert_eq!(engine.advance(&mut state), TickOutcome::Continued);
        assert!(!engine.resume(&mut state));
    }

    #[test]
    fn test_toggle_pause_cycle() {
        let mut engine = engine();
        let mut state = engine.idle(0);

        engine.toggle_pause(&mut state);
        assert_eq!(state.phase, Phase::Running);
        engine.toggle_pause(&mut state);
        assert_eq!(state.phase, Phase::Paused);
        engine.toggle_pause(&mut state);
        assert_eq!(state.phase, Phase::Running);

        state.phase = Phase::GameOver(GameOverReason::Wall);
        state.score = 50;
        engine.toggle_pause(&mut state);
        assert_eq!(state.phase, Phase::Running);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_length_changes_only_when_eating() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 99);
        let mut turn_rng = StdRng::seed_from_u64(1234);
        let mut state = engine.reset(0);
        let mut games = 0;

        for _ in 0..5_000 {
            let direction = Direction::ALL[turn_rng.gen_range(0..4)];
            engine.set_pending_direction(&mut state, direction);
            let length_before = state.snake.len();

            match engine.advance(&mut state) {
                TickOutcome::Continued => assert_eq!(state.snake.len(), length_before),
                TickOutcome::Ate { .. } => {
                    assert_eq!(state.snake.len(), length_before + 1);
                    assert!(!state.is_occupied_by_snake(state.food));
                }
                TickOutcome::GameOver(_) => {
                    assert_eq!(state.snake.len(), length_before);
                    games += 1;
                    engine.restart(&mut state);
                }
                TickOutcome::Suspended => unreachable!("game is always running here"),
            }
        }

        assert!(games > 0);
    }

    #[test]
    fn test_food_never_lands_on_snake() {
        let mut engine = engine();
        let state = running_state(
            Snake::new(Position::new(8, 5), Direction::Right, 7),
            Direction::Right,
            Position::new(0, 0),
        );

        for _ in 0..500 {
            let food = engine.place_food(&state).unwrap();
            assert!(!state.is_occupied_by_snake(food));
            assert!(state.is_in_bounds(food));
        }
    }

    #[test]
    fn test_food_uses_the_state_grid() {
        // Engine configured for 20x20, playing on a 6x4 board
        let mut engine = GameEngine::with_seed(GameConfig::default(), 13);
        let mut state = GameState::new(
            Snake::new(Position::new(2, 1), Direction::Right, 2),
            Direction::Right,
            Position::new(3, 1),
            6,
            4,
            Duration::from_millis(100),
        );

        for _ in 0..200 {
            assert!(state.is_in_bounds(engine.place_food(&state).unwrap()));
        }

        let mut eaten = 0;
        for _ in 0..50 {
            state.snake = Snake::new(Position::new(0, 0), Direction::Right, 1);
            state.food = Position::new(1, 0);
            state.direction = Direction::Right;
            state.pending_direction = Direction::Right;
            if let TickOutcome::Ate { .. } = engine.advance(&mut state) {
                eaten += 1;
            }
            assert!(state.is_in_bounds(state.food), "food at {:?}", state.food);
            assert!(!state.is_occupied_by_snake(state.food));
        }
        assert_eq!(eaten, 50);
    }

    #[test]
    fn test_food_finds_last_free_cell() {
        let mut engine = GameEngine::with_seed(GameConfig::new(4, 4), 3);
        let mut body: Vec<Position> = (0..4)
            .flat_map(|y| (0..4).map(move |x| Position::new(x, y)))
            .collect();
        let free = body.remove(9);
        let state = GameState::new(
            Snake::from_segments(body),
            Direction::Right,
            free,
            4,
            4,
            Duration::from_millis(100),
        );

        assert_eq!(engine.place_food(&state), Some(free));
    }

    #[test]
    fn test_food_on_full_board_is_none() {
        let mut engine = GameEngine::with_seed(GameConfig::new(2, 2), 3);
        let state = GameState::new(
            Snake::from_segments(vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(0, 1),
            ]),
            Direction::Left,
            Position::new(0, 0),
            2,
            2,
            Duration::from_millis(100),
        );

        assert_eq!(engine.place_food(&state), None);
    }

    #[test]
    fn test_filling_the_board_ends_the_game() {
        let config = GameConfig {
            grid_width: 3,
            grid_height: 1,
            initial_snake_length: 1,
            ..Default::default()
        };
        let mut engine = GameEngine::with_seed(config, 5);
        let mut state = GameState::new(
            Snake::from_segments(vec![Position::new(1, 0), Position::new(0, 0)]),
            Direction::Right,
            Position::new(2, 0),
            3,
            1,
            Duration::from_millis(100),
        );

        let outcome = engine.advance(&mut state);

        assert_eq!(outcome, TickOutcome::GameOver(GameOverReason::BoardFull));
        assert_eq!(state.score, 10);
        assert_eq!(state.high_score, 10);
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_speed_never_drops_below_floor() {
        let mut engine = engine();
        let mut state = engine.reset(0);
        state.tick_interval = Duration::from_millis(50);
        state.food = state.snake.head().moved_in_direction(Direction::Right);

        engine.advance(&mut state);

        assert_eq!(state.tick_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_seeded_engines_agree() {
        let mut a = GameEngine::with_seed(GameConfig::default(), 42);
        let mut b = GameEngine::with_seed(GameConfig::default(), 42);

        assert_eq!(a.reset(0), b.reset(0));
    }
}
