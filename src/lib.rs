//! Terminal snake. The snake lives on a grid of direction tags (see
//! [`snake::Snake`]); everything else is drawing and key handling around it.

pub mod clock;
pub mod error;
pub mod game;
pub mod grid;
pub mod render;
pub mod snake;
pub mod term;
