use std::io;

use rand::Rng;
use tracing::{debug, warn};

use crate::grid::{Grid, Tile};
use crate::render::{Canvas, Layout};
use Direction::*;

// Enough tries to find a free cell on any board that isn't nearly full.
const SNACK_ATTEMPTS: u32 = 1000;

pub type Coords = (i32, i32);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> Coords {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// What the head would find if it moved onto a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellCheck {
    Blocked,
    Free,
    HasSnack,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// The snake sat still: no direction has been chosen yet.
    Idle,
    Moved,
    Grew,
    Crashed,
    /// A snack was eaten but no free cell could be found for the next one.
    BoardFull,
}

/// The snake and its playfield.
///
/// The body is never stored as a list. Every body cell carries a tag pointing
/// at the next segment toward the head, so the snake is the chain of tags
/// from `tail` to `head`. Moving writes one tag behind the head and erases one
/// at the tail, whatever the length.
pub struct Snake {
    grid: Grid,
    layout: Layout,
    head: Coords,
    tail: Coords,
    direction: Option<Direction>,
    score: u32,
}

impl Snake {
    /// A length-1 snake in the middle of an empty field. Nothing is drawn
    /// until `start`.
    pub fn new(layout: Layout) -> Self {
        let (w, h) = layout.field_size();
        let grid = Grid::new(w, h);
        let center = (grid.width() / 2, grid.height() / 2);

        Snake { grid, layout, head: center, tail: center, direction: None, score: 0 }
    }

    /// Puts the head and the first snack on the field and shows the score.
    /// Returns `false` if the snack could not be placed.
    pub fn start<R: Rng>(&mut self, canvas: &mut dyn Canvas, rng: &mut R) -> io::Result<bool> {
        let (x, y) = self.head;
        self.set_tile(canvas, x, y, Tile::Head)?;

        let placed = self.spawn_snack(canvas, rng)?;
        self.layout.draw_score(canvas, self.score)?;

        Ok(placed)
    }

    pub fn head(&self) -> Coords {
        self.head
    }

    pub fn tail(&self) -> Coords {
        self.tail
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn check_cell(&self, x: i32, y: i32) -> CellCheck {
        if !self.grid.contains(x, y) {
            return CellCheck::Blocked;
        }

        match self.grid.get(x, y) {
            Tile::Empty => CellCheck::Free,
            Tile::Snack => CellCheck::HasSnack,
            _ => CellCheck::Blocked,
        }
    }

    /// Takes a steering request. Once the snake has a body, turning straight
    /// back is a mis-tap and is ignored. Returns whether it was accepted.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if self.score > 0 && self.direction == Some(new_direction.opposite()) {
            return false;
        }

        self.direction = Some(new_direction);
        true
    }

    /// Advances the snake one cell in its current direction.
    pub fn step<R: Rng>(&mut self, canvas: &mut dyn Canvas, rng: &mut R) -> io::Result<MoveResult> {
        let dir = match self.direction {
            Some(dir) => dir,
            None => return Ok(MoveResult::Idle),
        };

        let (dx, dy) = dir.delta();
        let next = (self.head.0 + dx, self.head.1 + dy);

        let check = self.check_cell(next.0, next.1);
        if check == CellCheck::Blocked {
            debug!(head = ?self.head, ?next, "snake crashed");
            return Ok(MoveResult::Crashed);
        }

        let old_head = self.head;
        self.set_tile(canvas, next.0, next.1, Tile::Head)?;

        let result = if check == CellCheck::HasSnack {
            // The tail stays put this tick, which is what makes the snake grow.
            self.set_tile(canvas, old_head.0, old_head.1, Tile::toward(dir))?;
            let placed = self.spawn_snack(canvas, rng)?;
            self.set_score(canvas, self.score + 1)?;

            if placed {
                MoveResult::Grew
            } else {
                MoveResult::BoardFull
            }
        } else if old_head == self.tail {
            self.set_tile(canvas, old_head.0, old_head.1, Tile::Empty)?;
            self.tail = next;
            MoveResult::Moved
        } else {
            self.set_tile(canvas, old_head.0, old_head.1, Tile::toward(dir))?;
            self.cascade_tail(canvas)?;
            MoveResult::Moved
        };

        self.head = next;
        Ok(result)
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Moves the tail one cell along the tag it sits on and erases the cell it left.
    fn cascade_tail(&mut self, canvas: &mut dyn Canvas) -> io::Result<()> {
        let (x, y) = self.tail;

        match self.grid.get(x, y) {
            Tile::Head => {
                self.tail = self.head;
                Ok(())
            }
            tile => match tile.step() {
                Some((dx, dy)) => {
                    self.tail = (x + dx, y + dy);
                    self.set_tile(canvas, x, y, Tile::Empty)
                }
                None => {
                    warn!(tail = ?self.tail, ?tile, "tail is not on the snake");
                    Ok(())
                }
            },
        }
    }

    fn spawn_snack<R: Rng>(&mut self, canvas: &mut dyn Canvas, rng: &mut R) -> io::Result<bool> {
        let (w, h) = (self.grid.width(), self.grid.height());

        for _ in 0..SNACK_ATTEMPTS {
            let x = rng.gen_range(0..w);
            let y = rng.gen_range(0..h);
            if self.grid.get(x, y) == Tile::Empty {
                self.set_tile(canvas, x, y, Tile::Snack)?;
                return Ok(true);
            }
        }

        warn!(attempts = SNACK_ATTEMPTS, "no free cell for a snack");
        Ok(false)
    }

    fn set_score(&mut self, canvas: &mut dyn Canvas, score: u32) -> io::Result<()> {
        if score == self.score {
            return Ok(());
        }

        self.score = score;
        self.layout.draw_score(canvas, score)
    }

    fn set_tile(&mut self, canvas: &mut dyn Canvas, x: i32, y: i32, tile: Tile) -> io::Result<()> {
        if self.grid.set(x, y, tile) {
            self.layout.draw_tile(canvas, x, y, tile)?;
        }

        Ok(())
    }
}
