pub mod grid;
pub mod pathfinding;

pub use grid::{Grid, Node};
pub use pathfinding::find_path;
