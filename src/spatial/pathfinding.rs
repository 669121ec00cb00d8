//! A* pathfinding over the walkability grid
//!
//! 8-directional movement with a uniform step cost of 1 (diagonals are not
//! cost-adjusted) and a Manhattan-distance heuristic. All per-node search
//! state lives in maps owned by the call, so searches never leak into each
//! other through the grid.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::{AHashMap, AHashSet};
use ordered_float::OrderedFloat;

use crate::core::types::CellCoord;
use crate::spatial::grid::Grid;

const STEP_COST: f32 = 1.0;

/// Per-call search state for one cell
#[derive(Debug, Clone, Copy)]
struct Scratch {
    g: f32,
    parent: Option<CellCoord>,
}

/// Entry in the A* open set
///
/// Ordered so the max-heap pops the lowest `f` first; ties go to the lower
/// `h` (closer to the goal), then to the entry pushed first.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    coord: CellCoord,
    f: OrderedFloat<f32>,
    h: OrderedFloat<f32>,
    seq: u64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn heuristic(a: CellCoord, b: CellCoord) -> f32 {
    a.manhattan(&b) as f32
}

/// Find a path using A*
///
/// Returns the cells from `start` to `goal` inclusive, or None when either
/// end is out of bounds or blocked, or no route exists.
pub fn find_path(grid: &Grid, start: CellCoord, goal: CellCoord) -> Option<Vec<CellCoord>> {
    if !grid.is_walkable(start) || !grid.is_walkable(goal) {
        tracing::trace!("path {} -> {} rejected: endpoint blocked or out of bounds", start, goal);
        return None;
    }

    if start == goal {
        return Some(vec![start]);
    }

    let mut open_set = BinaryHeap::new();
    let mut closed: AHashSet<CellCoord> = AHashSet::new();
    let mut scratch: AHashMap<CellCoord, Scratch> = AHashMap::new();
    let mut seq = 0u64;

    let h_start = heuristic(start, goal);
    scratch.insert(start, Scratch { g: 0.0, parent: None });
    open_set.push(OpenEntry {
        coord: start,
        f: OrderedFloat(h_start),
        h: OrderedFloat(h_start),
        seq,
    });

    while let Some(current) = open_set.pop() {
        // Stale heap entry for a node that was already expanded
        if !closed.insert(current.coord) {
            continue;
        }

        if current.coord == goal {
            return Some(reconstruct_path(&scratch, goal));
        }

        let current_g = scratch
            .get(&current.coord)
            .map(|s| s.g)
            .unwrap_or(f32::INFINITY);

        for neighbor in grid.neighbors(current.coord) {
            if !grid.is_walkable(neighbor) || closed.contains(&neighbor) {
                continue;
            }

            let tentative_g = current_g + STEP_COST;
            let neighbor_g = scratch.get(&neighbor).map(|s| s.g).unwrap_or(f32::INFINITY);

            if tentative_g < neighbor_g {
                scratch.insert(
                    neighbor,
                    Scratch {
                        g: tentative_g,
                        parent: Some(current.coord),
                    },
                );

                let h = heuristic(neighbor, goal);
                seq += 1;
                open_set.push(OpenEntry {
                    coord: neighbor,
                    f: OrderedFloat(tentative_g + h),
                    h: OrderedFloat(h),
                    seq,
                });
            }
        }
    }

    tracing::trace!(
        "no path {} -> {} after expanding {} cells",
        start,
        goal,
        closed.len()
    );
    None
}

/// Reconstruct path from parent links
fn reconstruct_path(scratch: &AHashMap<CellCoord, Scratch>, goal: CellCoord) -> Vec<CellCoord> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(prev) = scratch.get(&current).and_then(|s| s.parent) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(path: &[CellCoord], start: CellCoord, goal: CellCoord) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(&pair[1]), "{} -> {} not adjacent", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_pathfind_straight_line() {
        let grid = Grid::new(10, 10, 15.0).unwrap();
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(5, 0);

        let path = find_path(&grid, start, goal).unwrap();
        assert_well_formed(&path, start, goal);
        assert_eq!(path.len(), 6);
    }

    #[test]
    fn test_pathfind_uses_diagonals() {
        let grid = Grid::new(10, 10, 15.0).unwrap();
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(4, 4);

        let path = find_path(&grid, start, goal).unwrap();
        assert_well_formed(&path, start, goal);
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn test_pathfind_around_building() {
        let mut grid = Grid::new(10, 10, 15.0).unwrap();
        grid.rebuild([CellCoord::new(5, 5)]);

        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(9, 9);
        let path = find_path(&grid, start, goal).unwrap();

        assert_well_formed(&path, start, goal);
        assert!(!path.contains(&CellCoord::new(5, 5)));
    }

    #[test]
    fn test_pathfind_through_gap_in_wall() {
        let mut grid = Grid::new(10, 10, 15.0).unwrap();
        // Vertical wall at x=5 with a single gap at y=9
        grid.rebuild((0..9).map(|y| CellCoord::new(5, y)));

        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(9, 0);
        let path = find_path(&grid, start, goal).unwrap();

        assert_well_formed(&path, start, goal);
        assert!(path.contains(&CellCoord::new(5, 9)));
    }

    #[test]
    fn test_pathfind_no_path() {
        let mut grid = Grid::new(10, 10, 15.0).unwrap();
        let goal = CellCoord::new(5, 5);
        let ring: Vec<_> = grid.neighbors(goal).collect();
        grid.rebuild(ring);

        assert!(find_path(&grid, CellCoord::new(0, 0), goal).is_none());
    }

    #[test]
    fn test_pathfind_blocked_endpoints() {
        let mut grid = Grid::new(10, 10, 15.0).unwrap();
        grid.rebuild([CellCoord::new(3, 3)]);

        assert!(find_path(&grid, CellCoord::new(3, 3), CellCoord::new(0, 0)).is_none());
        assert!(find_path(&grid, CellCoord::new(0, 0), CellCoord::new(3, 3)).is_none());
    }

    #[test]
    fn test_pathfind_out_of_bounds() {
        let grid = Grid::new(10, 10, 15.0).unwrap();
        assert!(find_path(&grid, CellCoord::new(-1, 0), CellCoord::new(2, 2)).is_none());
        assert!(find_path(&grid, CellCoord::new(0, 0), CellCoord::new(10, 2)).is_none());
    }

    #[test]
    fn test_pathfind_same_start_goal() {
        let grid = Grid::new(10, 10, 15.0).unwrap();
        let start = CellCoord::new(5, 5);

        let path = find_path(&grid, start, start).unwrap();
        assert_eq!(path, vec![start]);
    }

    #[test]
    fn test_repeated_searches_are_independent() {
        let mut grid = Grid::new(8, 8, 15.0).unwrap();
        let start = CellCoord::new(0, 0);
        let goal = CellCoord::new(7, 7);

        let first = find_path(&grid, start, goal).unwrap();
        // An unrelated search in between must not disturb the next one
        let _ = find_path(&grid, CellCoord::new(7, 0), CellCoord::new(0, 7));
        let second = find_path(&grid, start, goal).unwrap();
        assert_eq!(first, second);

        grid.rebuild([CellCoord::new(3, 3)]);
        let rerouted = find_path(&grid, start, goal).unwrap();
        assert!(!rerouted.contains(&CellCoord::new(3, 3)));
        assert_well_formed(&rerouted, start, goal);
    }
}
