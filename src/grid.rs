use crate::snake::Direction;

// The game gets dull when the field is wide open, so big terminals are capped.
pub const MAX_FIELD_W: usize = 40;
pub const MAX_FIELD_H: usize = 30;

/// What a single cell holds. A body tag points at the next segment toward the head.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Left,
    Right,
    Up,
    Down,
    Head,
    Snack,
}

impl Tile {
    pub fn glyph(self) -> &'static str {
        match self {
            Tile::Empty => "  ",
            Tile::Left => "<<",
            Tile::Right => ">>",
            Tile::Up => "^^",
            Tile::Down => "vv",
            Tile::Head => "OO",
            Tile::Snack => ":)",
        }
    }

    /// Body tag left behind by a head moving in `dir`.
    pub fn toward(dir: Direction) -> Self {
        match dir {
            Direction::Left => Tile::Left,
            Direction::Right => Tile::Right,
            Direction::Up => Tile::Up,
            Direction::Down => Tile::Down,
        }
    }

    /// Offset to the neighbour a body tag points at.
    pub fn step(self) -> Option<(i32, i32)> {
        match self {
            Tile::Left => Some((-1, 0)),
            Tile::Right => Some((1, 0)),
            Tile::Up => Some((0, -1)),
            Tile::Down => Some((0, 1)),
            _ => None,
        }
    }
}

/// Fixed-capacity tile storage. Reads outside the field see `Tile::Empty`,
/// writes outside it are dropped.
#[derive(Clone, Debug)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: [Tile; MAX_FIELD_W * MAX_FIELD_H],
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Grid {
            width: width.min(MAX_FIELD_W) as i32,
            height: height.min(MAX_FIELD_H) as i32,
            tiles: [Tile::Empty; MAX_FIELD_W * MAX_FIELD_H],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Tile {
        match self.index(x, y) {
            Some(i) => self.tiles[i],
            None => Tile::Empty,
        }
    }

    /// Returns `true` only if the cell existed and its tag actually changed.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        match self.index(x, y) {
            Some(i) if self.tiles[i] != tile => {
                self.tiles[i] = tile;
                true
            }
            _ => false,
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y)))
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains(x, y) {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }
}
