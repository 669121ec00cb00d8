//! Walkability grid derived from building positions

use crate::core::error::{Result, SimError};
use crate::core::types::{CellCoord, Vec2};
use crate::ecs::components::{Building, Position};
use crate::ecs::world::{ComponentSet, World};

/// Read-only view of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    pub x: i32,
    pub y: i32,
    pub walkable: bool,
}

impl Node {
    pub fn coord(&self) -> CellCoord {
        CellCoord::new(self.x, self.y)
    }
}

/// Width x height walkability map with a fixed cell size
///
/// The grid never owns buildings. It is rebuilt from them, so between
/// rebuilds it is a snapshot of the tick it was built in.
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub cell_size: f32,
    walkable: Vec<bool>,
}

impl Grid {
    pub fn new(width: i32, height: i32, cell_size: f32) -> Result<Self> {
        if width <= 0 || height <= 0 || cell_size.is_nan() || cell_size <= 0.0 {
            return Err(SimError::InvalidDimensions {
                width,
                height,
                cell_size,
            });
        }
        Ok(Self {
            width,
            height,
            cell_size,
            walkable: vec![true; width as usize * height as usize],
        })
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn cell_count(&self) -> usize {
        self.walkable.len()
    }

    pub fn get_node(&self, x: i32, y: i32) -> Option<Node> {
        self.index(x, y).map(|i| Node {
            x,
            y,
            walkable: self.walkable[i],
        })
    }

    /// Out-of-bounds cells are never walkable
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.index(cell.x, cell.y)
            .map(|i| self.walkable[i])
            .unwrap_or(false)
    }

    pub fn set_walkable(&mut self, x: i32, y: i32, walkable: bool) {
        if let Some(i) = self.index(x, y) {
            self.walkable[i] = walkable;
        }
    }

    /// Reset every cell to walkable, then block each listed cell
    pub fn rebuild(&mut self, blocked: impl IntoIterator<Item = CellCoord>) {
        self.walkable.fill(true);
        for cell in blocked {
            self.set_walkable(cell.x, cell.y, false);
        }
    }

    /// Rebuild from the completed buildings currently in the world
    pub fn rebuild_from_world(&mut self, world: &World) {
        let blocked: Vec<CellCoord> = world
            .query(ComponentSet::BUILDING | ComponentSet::POSITION)
            .into_iter()
            .filter(|&e| world.component::<Building>(e).blocks_movement())
            .map(|e| self.world_to_cell(world.component::<Position>(e).as_vec2()))
            .collect();
        self.rebuild(blocked);
    }

    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|w| **w).count()
    }

    /// Convert world position to cell coordinates (no clamping)
    #[inline]
    pub fn world_to_cell(&self, pos: Vec2) -> CellCoord {
        CellCoord::new(
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// Cell center in world coordinates
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            (cell.x as f32 + 0.5) * self.cell_size,
            (cell.y as f32 + 0.5) * self.cell_size,
        )
    }

    /// In-bounds cells in the 8-neighbourhood, cardinal and diagonal
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        (-1..=1).flat_map(move |dx| {
            (-1..=1).filter_map(move |dy| {
                if dx == 0 && dy == 0 {
                    return None;
                }
                let n = CellCoord::new(cell.x + dx, cell.y + dy);
                self.in_bounds(n.x, n.y).then_some(n)
            })
        })
    }
}
