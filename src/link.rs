//! Vehicle link command surface.

use crate::error::Result;
use crate::planning::Waypoint;

/// Commands the mission state machine issues to the vehicle.
///
/// Telemetry flows back separately as [`crate::wire::TelemetryEvent`]
/// values; implementations only need to deliver commands.
pub trait VehicleLink {
    fn arm(&mut self) -> Result<()>;

    fn disarm(&mut self) -> Result<()>;

    /// Take guided (offboard) control of the vehicle.
    fn take_control(&mut self) -> Result<()>;

    fn release_control(&mut self) -> Result<()>;

    fn takeoff(&mut self, altitude: f32) -> Result<()>;

    fn land(&mut self) -> Result<()>;

    /// Command the vehicle to a local-frame pose.
    fn cmd_position(&mut self, north: f32, east: f32, altitude: f32, heading: f32) -> Result<()>;

    /// Set the vehicle's geodetic home reference.
    fn set_home(&mut self, longitude: f64, latitude: f64, altitude: f64) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    /// Broadcast the planned route for visualization. Not required for
    /// flight; callers may ignore failures.
    fn broadcast_waypoints(&mut self, waypoints: &[Waypoint]) -> Result<()>;
}
