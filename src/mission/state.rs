//! Flight state of the mission state machine.

use std::fmt;

/// Mission phase. Exactly one is active at a time; only the
/// [`MissionController`](super::MissionController) transition methods
/// mutate it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightState {
    /// Pilot has control; mission not started or finished
    Manual,
    /// Arm command issued, waiting for confirmation
    Arming,
    /// Planning pipeline running
    Planning,
    /// Climbing to target altitude
    Takeoff,
    /// Flying the planned waypoint sequence
    Waypoint,
    /// Descending to touchdown
    Landing,
    /// Disarm command issued, waiting for confirmation
    Disarming,
}

impl fmt::Display for FlightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlightState::Manual => "MANUAL",
            FlightState::Arming => "ARMING",
            FlightState::Planning => "PLANNING",
            FlightState::Takeoff => "TAKEOFF",
            FlightState::Waypoint => "WAYPOINT",
            FlightState::Landing => "LANDING",
            FlightState::Disarming => "DISARMING",
        };
        f.write_str(name)
    }
}
