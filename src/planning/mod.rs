//! Offline path planning pipeline: occupancy grid construction, A*
//! search, and collinearity pruning.

mod astar;
mod grid;
mod prune;

pub use astar::{AStarPlanner, Connectivity, GridPath, PlanError};
pub use grid::{Cell, OccupancyGrid};
pub use prune::prune_path;

use serde::{Deserialize, Serialize};

use crate::colliders::ObstacleRecord;
use crate::frame::LocalPosition;

/// A target pose in the local Cartesian frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub north: f32,
    pub east: f32,
    pub altitude: f32,
    pub heading: f32,
}

/// Run the full planning pipeline from a start to a goal position.
///
/// Builds the altitude-layer occupancy grid, searches it, prunes the raw
/// cell path, and converts the surviving cells back to world waypoints at
/// the target altitude. Returns the waypoint list ready for the mission
/// state machine; any failure leaves the caller without a partial plan.
pub fn plan_route(
    obstacles: &[ObstacleRecord],
    start: LocalPosition,
    goal: LocalPosition,
    target_altitude: f32,
    safety_distance: f32,
    connectivity: Connectivity,
    max_iterations: usize,
) -> Result<Vec<Waypoint>, PlanError> {
    let grid = OccupancyGrid::from_obstacles(obstacles, target_altitude, safety_distance);
    tracing::info!(
        "Occupancy grid: {}x{} cells, offset ({}, {}), {} occupied",
        grid.height(),
        grid.width(),
        grid.north_offset(),
        grid.east_offset(),
        grid.occupied_count()
    );

    let start_cell = grid.world_to_cell(start.north, start.east);
    let goal_cell = grid.world_to_cell(goal.north, goal.east);

    let planner = AStarPlanner::new(connectivity, max_iterations);
    let path = planner.search(&grid, start_cell, goal_cell)?;
    tracing::info!(
        "Path found: {} cells, cost {:.1}",
        path.cells.len(),
        path.cost
    );

    let pruned = prune_path(&path.cells);
    tracing::info!("Pruned to {} waypoints", pruned.len());

    let waypoints = pruned
        .iter()
        .map(|&cell| {
            let (north, east) = grid.cell_to_world(cell);
            Waypoint {
                north,
                east,
                altitude: target_altitude,
                heading: 0.0,
            }
        })
        .collect();

    Ok(waypoints)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(north: f32, east: f32) -> LocalPosition {
        LocalPosition {
            north,
            east,
            down: 0.0,
        }
    }

    #[test]
    fn test_route_through_open_field() {
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
                north: 20.0,
                east: 20.0,
                alt: 0.0,
                d_north: 0.0,
                d_east: 0.0,
                d_alt: 0.0,
            },
        ];
        let waypoints = plan_route(
            &obstacles,
            local(0.0, 0.0),
            local(18.0, 18.0),
            5.0,
            0.0,
            Connectivity::Eight,
            100_000,
        )
        .unwrap();

        // Straight diagonal collapses to just the endpoints
        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints[0].north, 0.0);
        assert_eq!(waypoints[1].north, 18.0);
        assert_eq!(waypoints[1].east, 18.0);
        assert!(waypoints.iter().all(|w| w.altitude == 5.0));
    }

    #[test]
    fn test_goal_inside_inflated_obstacle_fails() {
        // Tall obstacle whose inflated footprint swallows the goal
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
                north: 30.0,
                east: 30.0,
                alt: 40.0,
                d_north: 5.0,
                d_east: 5.0,
                d_alt: 40.0,
            },
        ];
        let result = plan_route(
            &obstacles,
            local(0.0, 0.0),
            local(30.0, 30.0),
            6.0,
            5.0,
            Connectivity::Eight,
            100_000,
        );
        assert!(matches!(result, Err(PlanError::GoalOccupied(_))));
    }

    #[test]
    fn test_waypoints_restore_world_offsets() {
        let obstacles = [
            ObstacleRecord {
                north: -50.0,
                east: -40.0,
                alt: 0.0,
                d_north: 0.0,
                d_east: 0.0,
                d_alt: 0.0,
            },
            ObstacleRecord {
                north: -30.0,
                east: -20.0,
                alt: 0.0,
                d_north: 0.0,
                d_east: 0.0,
                d_alt: 0.0,
            },
        ];
        let waypoints = plan_route(
            &obstacles,
            local(-45.0, -35.0),
            local(-35.0, -25.0),
            5.0,
            0.0,
            Connectivity::Eight,
            100_000,
        )
        .unwrap();

        // Waypoints come back in world coordinates, not grid indices
        assert_eq!(waypoints.first().unwrap().north, -45.0);
        assert_eq!(waypoints.first().unwrap().east, -35.0);
        assert_eq!(waypoints.last().unwrap().north, -35.0);
        assert_eq!(waypoints.last().unwrap().east, -25.0);
    }
}
