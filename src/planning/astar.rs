//! A* path search over the occupancy grid.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::f32::consts::SQRT_2;

use thiserror::Error;

use super::grid::{Cell, OccupancyGrid};

/// Planning failure modes. Callers never see a partial path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("start cell {0:?} is outside the grid")]
    StartOutOfBounds(Cell),

    #[error("goal cell {0:?} is outside the grid")]
    GoalOutOfBounds(Cell),

    #[error("start cell {0:?} is occupied")]
    StartOccupied(Cell),

    #[error("goal cell {0:?} is occupied")]
    GoalOccupied(Cell),

    #[error("no path found from {start:?} to {goal:?}")]
    NoPathFound { start: Cell, goal: Cell },

    #[error("search budget of {0} expansions exhausted")]
    BudgetExhausted(usize),
}

/// Movement model for grid search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connectivity {
    /// Cardinal moves only, cost 1
    Four,
    /// Cardinal moves cost 1, diagonal moves cost sqrt(2)
    Eight,
}

impl Connectivity {
    /// Neighbor offsets with step costs.
    fn moves(&self) -> &'static [(i32, i32, f32)] {
        const CARDINAL: [(i32, i32, f32); 4] =
            [(-1, 0, 1.0), (1, 0, 1.0), (0, -1, 1.0), (0, 1, 1.0)];
        const ALL: [(i32, i32, f32); 8] = [
            (-1, 0, 1.0),
            (1, 0, 1.0),
            (0, -1, 1.0),
            (0, 1, 1.0),
            (-1, -1, SQRT_2),
            (-1, 1, SQRT_2),
            (1, -1, SQRT_2),
            (1, 1, SQRT_2),
        ];
        match self {
            Connectivity::Four => &CARDINAL,
            Connectivity::Eight => &ALL,
        }
    }
}

/// Result of a successful search: start-to-goal cell sequence and cost.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPath {
    pub cells: Vec<Cell>,
    pub cost: f32,
}

/// Node in the search frontier.
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    cell: Cell,
    f_score: f32,
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score && self.cell == other.cell
    }
}

impl Eq for SearchNode {}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (lower f_score = higher priority);
        // equal scores break ties on lexicographic cell order so expansion
        // is deterministic across runs
        other
            .f_score
            .partial_cmp(&self.f_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* planner over a binary occupancy grid.
pub struct AStarPlanner {
    connectivity: Connectivity,
    max_iterations: usize,
}

impl AStarPlanner {
    pub fn new(connectivity: Connectivity, max_iterations: usize) -> Self {
        Self {
            connectivity,
            max_iterations,
        }
    }

    /// Search for an optimal path from start to goal (inclusive).
    pub fn search(
        &self,
        grid: &OccupancyGrid,
        start: Cell,
        goal: Cell,
    ) -> Result<GridPath, PlanError> {
        if !grid.in_bounds(start) {
            return Err(PlanError::StartOutOfBounds(start));
        }
        if !grid.in_bounds(goal) {
            return Err(PlanError::GoalOutOfBounds(goal));
        }
        if grid.is_occupied(start) {
            return Err(PlanError::StartOccupied(start));
        }
        if grid.is_occupied(goal) {
            return Err(PlanError::GoalOccupied(goal));
        }

        let mut open_set = BinaryHeap::new();
        let mut g_score: HashMap<Cell, f32> = HashMap::new();
        let mut parent: HashMap<Cell, Cell> = HashMap::new();
        let mut closed_set: HashSet<Cell> = HashSet::new();

        g_score.insert(start, 0.0);
        open_set.push(SearchNode {
            cell: start,
            f_score: Self::heuristic(start, goal),
        });

        let mut iterations = 0;

        while let Some(node) = open_set.pop() {
            iterations += 1;
            if iterations > self.max_iterations {
                tracing::warn!("A* exceeded {} expansions", self.max_iterations);
                return Err(PlanError::BudgetExhausted(self.max_iterations));
            }

            let current = node.cell;

            if current == goal {
                let cells = Self::reconstruct_path(&parent, start, goal);
                let cost = g_score[&goal];
                return Ok(GridPath { cells, cost });
            }

            // Stale frontier entries for already-expanded cells are skipped
            if !closed_set.insert(current) {
                continue;
            }

            let current_g = g_score[&current];

            for &(dr, dc, step_cost) in self.connectivity.moves() {
                let neighbor = Cell::new(current.row + dr, current.col + dc);

                if grid.is_occupied(neighbor) || closed_set.contains(&neighbor) {
                    continue;
                }

                let tentative_g = current_g + step_cost;
                let existing_g = *g_score.get(&neighbor).unwrap_or(&f32::MAX);

                // Relax only on strictly better cost
                if tentative_g < existing_g {
                    g_score.insert(neighbor, tentative_g);
                    parent.insert(neighbor, current);
                    open_set.push(SearchNode {
                        cell: neighbor,
                        f_score: tentative_g + Self::heuristic(neighbor, goal),
                    });
                }
            }
        }

        Err(PlanError::NoPathFound { start, goal })
    }

    /// Euclidean distance heuristic. Never overestimates the true
    /// remaining cost for either movement model.
    #[inline]
    fn heuristic(from: Cell, to: Cell) -> f32 {
        from.distance(&to)
    }

    /// Reconstruct the start-to-goal sequence from the parent map.
    fn reconstruct_path(parent: &HashMap<Cell, Cell>, start: Cell, goal: Cell) -> Vec<Cell> {
        let mut path = vec![goal];
        let mut current = goal;

        while current != start {
            match parent.get(&current) {
                Some(&p) => {
                    path.push(p);
                    current = p;
                }
                None => break,
            }
        }

        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colliders::ObstacleRecord;

    /// Grid with a single tall obstacle whose inflated footprint covers
    /// exactly the center cell of a 5x5 grid.
    fn five_by_five_center_blocked() -> OccupancyGrid {
        let obstacles = [
            // Corner markers keep the bounding extent at 5x5 without
            // blocking anything (tops below altitude)
            ObstacleRecord {
                north: 0.0,
                east: 0.0,
                alt: 0.0,
                d_north: 0.0,
                d_east: 0.0,
                d_alt: 0.0,
            },
            ObstacleRecord {
                north: 4.0,
                east: 4.0,
                alt: 0.0,
                d_north: 0.0,
                d_east: 0.0,
                d_alt: 0.0,
            },
            // Tall point obstacle at the center
            ObstacleRecord {
                north: 2.0,
                east: 2.0,
                alt: 50.0,
                d_north: 0.0,
                d_east: 0.0,
                d_alt: 50.0,
            },
        ];
        let grid = OccupancyGrid::from_obstacles(&obstacles, 5.0, 0.0);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 5);
        assert_eq!(grid.occupied_count(), 1);
        grid
    }

    fn empty_grid() -> OccupancyGrid {
        OccupancyGrid::from_obstacles(
            &[
                ObstacleRecord {
                    north: 0.0,
                    east: 0.0,
                    alt: 0.0,
                    d_north: 0.0,
                    d_east: 0.0,
                    d_alt: 0.0,
                },
                ObstacleRecord {
                    north: 9.0,
                    east: 9.0,
                    alt: 0.0,
                    d_north: 0.0,
                    d_east: 0.0,
                    d_alt: 0.0,
                },
            ],
            5.0,
            0.0,
        )
    }

    #[test]
    fn test_trivial_start_equals_goal() {
        let grid = OccupancyGrid::from_obstacles(&[], 5.0, 5.0);
        let planner = AStarPlanner::new(Connectivity::Eight, 1000);
        let path = planner
            .search(&grid, Cell::new(0, 0), Cell::new(0, 0))
            .unwrap();
        assert_eq!(path.cells, vec![Cell::new(0, 0)]);
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn test_empty_grid_eight_connectivity_length() {
        let grid = empty_grid();
        let planner = AStarPlanner::new(Connectivity::Eight, 100_000);
        let start = Cell::new(0, 0);
        let goal = Cell::new(7, 3);
        let path = planner.search(&grid, start, goal).unwrap();
        // Path length (in moves) equals the Chebyshev distance
        assert_eq!(
            path.cells.len() as i32 - 1,
            start.chebyshev_distance(&goal)
        );
    }

    #[test]
    fn test_empty_grid_four_connectivity_length() {
        let grid = empty_grid();
        let planner = AStarPlanner::new(Connectivity::Four, 100_000);
        let start = Cell::new(1, 2);
        let goal = Cell::new(6, 8);
        let path = planner.search(&grid, start, goal).unwrap();
        // Path length (in moves) equals the Manhattan distance, and cost too
        assert_eq!(
            path.cells.len() as i32 - 1,
            start.manhattan_distance(&goal)
        );
        assert_eq!(path.cost, start.manhattan_distance(&goal) as f32);
    }

    #[test]
    fn test_blocked_endpoints_rejected() {
        let grid = five_by_five_center_blocked();
        let planner = AStarPlanner::new(Connectivity::Eight, 1000);
        let blocked = Cell::new(2, 2);
        let free = Cell::new(0, 0);

        assert_eq!(
            planner.search(&grid, blocked, free),
            Err(PlanError::StartOccupied(blocked))
        );
        assert_eq!(
            planner.search(&grid, free, blocked),
            Err(PlanError::GoalOccupied(blocked))
        );
    }

    #[test]
    fn test_out_of_bounds_endpoints_rejected() {
        let grid = empty_grid();
        let planner = AStarPlanner::new(Connectivity::Eight, 1000);
        let outside = Cell::new(-1, 0);
        let inside = Cell::new(0, 0);

        assert!(matches!(
            planner.search(&grid, outside, inside),
            Err(PlanError::StartOutOfBounds(_))
        ));
        assert!(matches!(
            planner.search(&grid, inside, Cell::new(0, 100)),
            Err(PlanError::GoalOutOfBounds(_))
        ));
    }

    #[test]
    fn test_detour_around_center_obstacle() {
        let grid = five_by_five_center_blocked();
        let planner = AStarPlanner::new(Connectivity::Eight, 10_000);
        let start = Cell::new(0, 2);
        let goal = Cell::new(4, 2);
        let path = planner.search(&grid, start, goal).unwrap();

        assert_eq!(path.cells.first(), Some(&start));
        assert_eq!(path.cells.last(), Some(&goal));
        assert!(path.cells.iter().all(|&c| !grid.is_occupied(c)));
        // Detour is longer than the blocked straight line of cost 4
        assert!(path.cost > 4.0);
        // ...but optimal: one diagonal out, two straight, one diagonal back
        let expected = 2.0 * SQRT_2 + 2.0;
        assert!((path.cost - expected).abs() < 1e-4);
    }

    #[test]
    fn test_no_path_when_goal_enclosed() {
        // Wall across the full width splits the grid in two
        let obstacles = [
            ObstacleRecord {
                north: 0.0,
                east: 0.0,
                alt: 0.0,
                d_north: 0.0,
                d_east: 0.0,
                d_alt: 0.0,
            },
            ObstacleRecord {
                north: 8.0,
                east: 8.0,
                alt: 0.0,
                d_north: 0.0,
                d_east: 0.0,
                d_alt: 0.0,
            },
            ObstacleRecord {
                north: 4.0,
                east: 4.0,
                alt: 50.0,
                d_north: 0.0,
                d_east: 10.0,
                d_alt: 50.0,
            },
        ];
        let grid = OccupancyGrid::from_obstacles(&obstacles, 5.0, 0.0);
        let planner = AStarPlanner::new(Connectivity::Eight, 100_000);
        let result = planner.search(&grid, Cell::new(0, 0), Cell::new(8, 8));
        assert!(matches!(result, Err(PlanError::NoPathFound { .. })));
    }

    #[test]
    fn test_budget_exhaustion() {
        let grid = empty_grid();
        let planner = AStarPlanner::new(Connectivity::Eight, 3);
        let result = planner.search(&grid, Cell::new(0, 0), Cell::new(9, 9));
        assert_eq!(result, Err(PlanError::BudgetExhausted(3)));
    }

    #[test]
    fn test_deterministic_result() {
        let grid = five_by_five_center_blocked();
        let planner = AStarPlanner::new(Connectivity::Eight, 10_000);
        let a = planner.search(&grid, Cell::new(0, 0), Cell::new(4, 4)).unwrap();
        let b = planner.search(&grid, Cell::new(0, 0), Cell::new(4, 4)).unwrap();
        assert_eq!(a, b);
    }
}
