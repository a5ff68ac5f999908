use std::io;

use rand::Rng;
use tracing::{debug, info};

use crate::clock::FrameClock;
use crate::error::GameError;
use crate::render::{Canvas, Layout};
use crate::snake::{Direction, MoveResult, Snake};
use crate::term::{Input, TermManager};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Running,
    GameOver,
}

/// One playthrough at a time: the snake, its random source and whether the
/// game is still on. Every drawing side effect goes to the canvas passed in.
pub struct Session<R> {
    state: SessionState,
    snake: Option<Snake>,
    rng: R,
}

impl<R: Rng> Session<R> {
    pub fn new(rng: R) -> Self {
        Session { state: SessionState::NotStarted, snake: None, rng }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn snake(&self) -> Option<&Snake> {
        self.snake.as_ref()
    }

    /// Fits a fresh board into a `cols` x `rows` screen and starts playing.
    pub fn setup(&mut self, canvas: &mut dyn Canvas, cols: u16, rows: u16) -> Result<(), GameError> {
        let layout = Layout::fit(cols, rows)?;

        canvas.show_cursor(false)?;
        canvas.clear()?;
        layout.draw_border(canvas)?;

        let mut snake = Snake::new(layout);
        let placed = snake.start(canvas, &mut self.rng)?;
        self.snake = Some(snake);
        self.state = SessionState::Running;

        let (w, h) = layout.field_size();
        info!(cols, rows, field_w = w, field_h = h, "session started");

        if !placed {
            self.end_game(canvas)?;
        }

        canvas.flush()?;
        Ok(())
    }

    /// Starts over after a game over. Does nothing while a game is running.
    pub fn restart(&mut self, canvas: &mut dyn Canvas, cols: u16, rows: u16) -> Result<bool, GameError> {
        if self.state != SessionState::GameOver {
            return Ok(false);
        }

        info!("restarting");
        self.setup(canvas, cols, rows)?;
        Ok(true)
    }

    /// Steering is only listened to while the game is running.
    pub fn set_direction(&mut self, dir: Direction) {
        if self.state != SessionState::Running {
            return;
        }

        if let Some(snake) = self.snake.as_mut() {
            if !snake.set_direction(dir) {
                debug!(?dir, "ignored reversal");
            }
        }
    }

    /// One tick of the game.
    pub fn update(&mut self, canvas: &mut dyn Canvas) -> io::Result<()> {
        if self.state != SessionState::Running {
            return Ok(());
        }

        let snake = match self.snake.as_mut() {
            Some(snake) => snake,
            None => return Ok(()),
        };

        match snake.step(canvas, &mut self.rng)? {
            MoveResult::Crashed | MoveResult::BoardFull => self.end_game(canvas)?,
            MoveResult::Grew => debug!(score = snake.score(), "snack eaten"),
            MoveResult::Moved | MoveResult::Idle => {}
        }

        canvas.flush()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn end_game(&mut self, canvas: &mut dyn Canvas) -> io::Result<()> {
        self.state = SessionState::GameOver;

        if let Some(snake) = &self.snake {
            info!(score = snake.score(), "game over");
            snake.layout().draw_game_over(canvas)?;
        }

        Ok(())
    }
}

/// The terminal front end: owns the screen and drives a session off a fixed
/// frame clock until the player quits.
pub struct SnakeGame<R> {
    term: TermManager,
    session: Session<R>,
    frame_ms: u64,
}

impl<R: Rng> SnakeGame<R> {
    pub fn new(term: TermManager, rng: R, frame_ms: u64) -> Self {
        SnakeGame { term, session: Session::new(rng), frame_ms }
    }

    pub fn play(&mut self) -> Result<(), GameError> {
        self.term.setup()?;

        let (cols, rows) = self.term.get_terminal_size();
        self.session.setup(&mut self.term, cols, rows)?;

        let mut clock = FrameClock::new(self.frame_ms, self.term.now_ms());
        let mut interrupted = false;

        while !interrupted {
            let now = self.term.now_ms();
            if clock.poll(now) {
                self.session.update(&mut self.term)?;
            }

            match self.term.poll_input(clock.timeout(now))? {
                Input::Left => self.session.set_direction(Direction::Left),
                Input::Right => self.session.set_direction(Direction::Right),
                Input::Up => self.session.set_direction(Direction::Up),
                Input::Down => self.session.set_direction(Direction::Down),
                Input::Enter => {
                    // Pick up any resize that happened during the last game.
                    let (cols, rows) = self.term.get_terminal_size();
                    self.session.restart(&mut self.term, cols, rows)?;
                }
                Input::Escape => {
                    info!("quit requested");
                    break;
                }
                Input::Interrupt => {
                    info!("interrupted");
                    interrupted = true;
                }
                Input::None => {}
            }
        }

        self.term.restore()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;
    use crate::render::RecordingCanvas;
    use rand::{rngs::StdRng, RngCore, SeedableRng};

    /// Random source that returns the same bits forever. Zero always picks
    /// cell (0, 0); the top bit alone always picks the middle of the field.
    struct FixedRng(u64);

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            (self.0 >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn snack_count(session: &Session<impl Rng>) -> usize {
        let grid = session.snake().unwrap().grid();
        grid.positions().filter(|&(x, y)| grid.get(x, y) == Tile::Snack).count()
    }

    fn running() -> (Session<StdRng>, RecordingCanvas) {
        let mut canvas = RecordingCanvas::default();
        let mut session = Session::new(StdRng::seed_from_u64(3));
        session.setup(&mut canvas, 12, 8).unwrap();
        (session, canvas)
    }

    fn crash(session: &mut Session<StdRng>, canvas: &mut RecordingCanvas) {
        session.set_direction(Direction::Left);
        for _ in 0..10 {
            session.update(canvas).unwrap();
            if session.state() == SessionState::GameOver {
                return;
            }
        }
        panic!("snake never hit the wall");
    }

    #[test]
    fn nothing_happens_before_setup() {
        let mut canvas = RecordingCanvas::default();
        let mut session = Session::new(StdRng::seed_from_u64(3));

        session.set_direction(Direction::Up);
        session.update(&mut canvas).unwrap();

        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(session.snake().is_none());
        assert!(canvas.draws.is_empty());
    }

    #[test]
    fn tiny_terminal_is_fatal() {
        let mut canvas = RecordingCanvas::default();
        let mut session = Session::new(StdRng::seed_from_u64(3));

        let err = session.setup(&mut canvas, 6, 4).unwrap_err();
        assert!(matches!(err, GameError::TerminalTooSmall { cols: 6, rows: 4 }));
        assert_eq!(session.state(), SessionState::NotStarted);
    }

    #[test]
    fn setup_clears_and_starts_running() {
        let (session, canvas) = running();
        let snake = session.snake().unwrap();

        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(canvas.clears, 1);
        assert_eq!(snake.head(), (2, 2));
        assert_eq!(snake.score(), 0);
        assert!(canvas.draws.contains(&(0, 1, "+".to_string())));
        assert!(canvas.draws.contains(&(5, 4, "OO".to_string())));
    }

    #[test]
    fn idle_updates_change_nothing() {
        let (mut session, mut canvas) = running();
        canvas.take();

        session.update(&mut canvas).unwrap();
        session.update(&mut canvas).unwrap();

        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.snake().unwrap().head(), (2, 2));
        assert!(canvas.draws.is_empty());
    }

    #[test]
    fn crash_ends_the_game_and_freezes_it() {
        let (mut session, mut canvas) = running();
        crash(&mut session, &mut canvas);

        assert!(canvas.draws.iter().any(|(_, _, text)| text == " GAME OVER "));

        let head = session.snake().unwrap().head();
        canvas.take();
        session.set_direction(Direction::Right);
        session.update(&mut canvas).unwrap();

        assert_eq!(session.state(), SessionState::GameOver);
        assert_eq!(session.snake().unwrap().head(), head);
        assert_eq!(session.snake().unwrap().direction(), Some(Direction::Left));
        assert!(canvas.draws.is_empty());
    }

    #[test]
    fn restart_only_after_game_over() {
        let (mut session, mut canvas) = running();
        assert!(!session.restart(&mut canvas, 12, 8).unwrap());
        assert_eq!(canvas.clears, 1);

        crash(&mut session, &mut canvas);
        assert!(session.restart(&mut canvas, 20, 10).unwrap());

        let snake = session.snake().unwrap();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(canvas.clears, 2);
        assert_eq!(snake.score(), 0);
        assert_eq!(snake.direction(), None);
        assert_eq!(snake.layout().field_size(), (9, 7));
        assert_eq!(snake.head(), snake.tail());

        let grid = snake.grid();
        let snacks = grid.positions().filter(|&(x, y)| grid.get(x, y) == Tile::Snack).count();
        assert_eq!(snacks, 1);
    }

    #[test]
    fn no_room_for_the_next_snack_ends_the_game() {
        let mut canvas = RecordingCanvas::default();
        let mut session = Session::new(FixedRng(0));
        session.setup(&mut canvas, 12, 8).unwrap();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.snake().unwrap().grid().get(0, 0), Tile::Snack);

        // Walk onto the snack at (0, 0); the only cell the RNG ever offers
        // for the next one is now under the head.
        session.set_direction(Direction::Left);
        session.update(&mut canvas).unwrap();
        session.update(&mut canvas).unwrap();
        session.set_direction(Direction::Up);
        session.update(&mut canvas).unwrap();
        assert_eq!(session.state(), SessionState::Running);
        session.update(&mut canvas).unwrap();

        let snake = session.snake().unwrap();
        assert_eq!(session.state(), SessionState::GameOver);
        assert_eq!(snake.head(), (0, 0));
        assert_eq!(snake.score(), 1);
        assert_eq!(snack_count(&session), 0);
        assert!(canvas.draws.iter().any(|(_, _, text)| text == " GAME OVER "));

        canvas.take();
        session.set_direction(Direction::Right);
        session.update(&mut canvas).unwrap();

        assert_eq!(session.state(), SessionState::GameOver);
        assert_eq!(session.snake().unwrap().head(), (0, 0));
        assert_eq!(session.snake().unwrap().direction(), Some(Direction::Up));
        assert!(canvas.draws.is_empty());
    }

    #[test]
    fn setup_without_room_for_a_snack_is_already_over() {
        let mut canvas = RecordingCanvas::default();
        let mut session = Session::new(FixedRng(1 << 63));
        session.setup(&mut canvas, 12, 8).unwrap();

        assert_eq!(session.state(), SessionState::GameOver);
        assert_eq!(session.snake().unwrap().head(), (2, 2));
        assert_eq!(snack_count(&session), 0);
        assert!(canvas.draws.iter().any(|(_, _, text)| text == " GAME OVER "));

        session.set_direction(Direction::Left);
        session.update(&mut canvas).unwrap();
        assert_eq!(session.snake().unwrap().direction(), None);
        assert_eq!(session.snake().unwrap().head(), (2, 2));
    }
}
